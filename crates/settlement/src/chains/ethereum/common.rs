// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! EVM identity codecs
//!
//! Addresses are `0x` + 40 hex digits, kept lowercase. Item ids are
//! `<contract>:<tokenId>`, order ids are 32-byte `0x` hashes, collection ids
//! are the contract address. Union ids are accepted only when their tag is
//! the builder's own EVM chain.

use tessera_sdk::{Blockchain, CollectionId, ItemId, OrderId, Part, SdkError, UnionAddress};

use super::types::EthPart;
use crate::chains::split_item_id;

fn parse_hex(native: &str, bytes: usize, kind: &str) -> Result<String, SdkError> {
	let digits = native
		.strip_prefix("0x")
		.ok_or_else(|| SdkError::InvalidIdentifier(format!("{} without 0x prefix: {}", kind, native)))?;

	if digits.len() != bytes * 2 || hex::decode(digits).is_err() {
		return Err(SdkError::InvalidIdentifier(format!(
			"Malformed {}: {}",
			kind, native
		)));
	}

	Ok(format!("0x{}", digits.to_ascii_lowercase()))
}

/// Validate and normalize a native address
pub fn parse_address(native: &str) -> Result<String, SdkError> {
	parse_hex(native, 20, "EVM address")
}

/// Validate and normalize an order hash
pub fn parse_order_hash(native: &str) -> Result<String, SdkError> {
	parse_hex(native, 32, "order hash")
}

pub fn to_native_address(blockchain: Blockchain, address: &UnionAddress) -> Result<String, SdkError> {
	parse_address(address.ensure_chain(blockchain)?)
}

pub fn to_union_address(blockchain: Blockchain, native: &str) -> Result<UnionAddress, SdkError> {
	UnionAddress::new(blockchain, &parse_address(native)?)
}

/// Contract address and token id of an item
pub fn to_native_item_id(blockchain: Blockchain, item_id: &ItemId) -> Result<(String, String), SdkError> {
	let (contract, token_id) = split_item_id(item_id.ensure_chain(blockchain)?)?;
	Ok((parse_address(contract)?, token_id.to_string()))
}

pub fn to_union_item_id(blockchain: Blockchain, contract: &str, token_id: &str) -> Result<ItemId, SdkError> {
	ItemId::new(blockchain, &format!("{}:{}", parse_address(contract)?, token_id))
}

pub fn to_native_collection(blockchain: Blockchain, collection: &CollectionId) -> Result<String, SdkError> {
	parse_address(collection.ensure_chain(blockchain)?)
}

pub fn to_native_order_hash(blockchain: Blockchain, order_id: &OrderId) -> Result<String, SdkError> {
	parse_order_hash(order_id.ensure_chain(blockchain)?)
}

pub fn to_union_order_id(blockchain: Blockchain, hash: &str) -> Result<OrderId, SdkError> {
	OrderId::new(blockchain, &parse_order_hash(hash)?)
}

pub fn to_native_part(blockchain: Blockchain, part: &Part) -> Result<EthPart, SdkError> {
	Ok(EthPart {
		account: to_native_address(blockchain, &part.account)?,
		value: part.value,
	})
}

pub fn to_native_parts(blockchain: Blockchain, parts: &[Part]) -> Result<Vec<EthPart>, SdkError> {
	parts.iter().map(|p| to_native_part(blockchain, p)).collect()
}

pub fn to_union_part(blockchain: Blockchain, part: &EthPart) -> Result<Part, SdkError> {
	Ok(Part::new(to_union_address(blockchain, &part.account)?, part.value))
}

pub fn to_union_parts(blockchain: Blockchain, parts: &[EthPart]) -> Result<Vec<Part>, SdkError> {
	parts.iter().map(|p| to_union_part(blockchain, p)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	const ADDRESS: &str = "0x5BB1b2B4a2b4D7D9A4c59a6F17A1B5b1C1b1D1E1";

	#[test]
	fn test_address_normalized_lowercase() {
		let union = to_union_address(Blockchain::Ethereum, ADDRESS).unwrap();
		assert_eq!(union.as_str(), "ETHEREUM:0x5bb1b2b4a2b4d7d9a4c59a6f17a1b5b1c1b1d1e1");
		assert_eq!(
			to_native_address(Blockchain::Ethereum, &union).unwrap(),
			ADDRESS.to_ascii_lowercase()
		);
	}

	#[test]
	fn test_foreign_evm_chain_rejected() {
		let union = UnionAddress::new(Blockchain::Polygon, ADDRESS).unwrap();
		assert!(matches!(
			to_native_address(Blockchain::Ethereum, &union),
			Err(SdkError::WrongChain {
				expected: Blockchain::Ethereum,
				actual: Blockchain::Polygon
			})
		));
	}

	#[test]
	fn test_malformed_identifiers() {
		assert!(parse_address("5bb1b2b4a2b4d7d9a4c59a6f17a1b5b1c1b1d1e1").is_err());
		assert!(parse_address("0x5bb1").is_err());
		assert!(parse_address("0xzzb1b2b4a2b4d7d9a4c59a6f17a1b5b1c1b1d1e1").is_err());
		assert!(parse_order_hash(ADDRESS).is_err());
	}

	#[test]
	fn test_item_id() {
		let item_id = ItemId::parse(&format!("ETHEREUM:{}:42", ADDRESS)).unwrap();
		let (contract, token_id) = to_native_item_id(Blockchain::Ethereum, &item_id).unwrap();
		assert_eq!(contract, ADDRESS.to_ascii_lowercase());
		assert_eq!(token_id, "42");
		assert_eq!(
			to_union_item_id(Blockchain::Ethereum, &contract, &token_id).unwrap().native(),
			format!("{}:42", contract)
		);
	}
}
