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


//! Tezos identity codecs
//!
//! Addresses are base58 encoded, 36 characters long, with a `tz1`, `tz2`,
//! `tz3` (implicit accounts) or `KT1` (contracts) prefix. Item ids are
//! `<contract>:<tokenId>`; order ids are opaque indexer hashes.

use tessera_sdk::{Blockchain, CollectionId, ItemId, OrderId, Part, SdkError, UnionAddress};

use super::types::TezosPart;
use crate::chains::split_item_id;

const BLOCKCHAIN: Blockchain = Blockchain::Tezos;

const ADDRESS_LENGTH: usize = 36;

const ADDRESS_PREFIXES: [&str; 4] = ["tz1", "tz2", "tz3", "KT1"];

const CONTRACT_PREFIX: &str = "KT1";

/// Validate a native address
pub fn parse_address(native: &str) -> Result<&str, SdkError> {
	let known_prefix = ADDRESS_PREFIXES.iter().any(|p| native.starts_with(p));
	if native.len() != ADDRESS_LENGTH || !known_prefix || bs58::decode(native).into_vec().is_err() {
		return Err(SdkError::InvalidIdentifier(format!(
			"Malformed Tezos address: {}",
			native
		)));
	}
	Ok(native)
}

/// Validate a contract address
pub fn parse_contract(native: &str) -> Result<&str, SdkError> {
	let address = parse_address(native)?;
	if !address.starts_with(CONTRACT_PREFIX) {
		return Err(SdkError::InvalidIdentifier(format!(
			"Not a Tezos contract: {}",
			native
		)));
	}
	Ok(address)
}

fn parse_order_hash(native: &str) -> Result<&str, SdkError> {
	let valid = !native.is_empty()
		&& native
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
	if !valid {
		return Err(SdkError::InvalidIdentifier(format!(
			"Malformed Tezos order id: {}",
			native
		)));
	}
	Ok(native)
}

pub fn to_native_address(address: &UnionAddress) -> Result<String, SdkError> {
	Ok(parse_address(address.ensure_chain(BLOCKCHAIN)?)?.to_string())
}

pub fn to_union_address(native: &str) -> Result<UnionAddress, SdkError> {
	UnionAddress::new(BLOCKCHAIN, parse_address(native)?)
}

pub fn to_native_collection(collection: &CollectionId) -> Result<String, SdkError> {
	Ok(parse_contract(collection.ensure_chain(BLOCKCHAIN)?)?.to_string())
}

/// Contract and token id of an item
pub fn to_native_item_id(item_id: &ItemId) -> Result<(String, String), SdkError> {
	let (contract, token_id) = split_item_id(item_id.ensure_chain(BLOCKCHAIN)?)?;
	Ok((parse_contract(contract)?.to_string(), token_id.to_string()))
}

pub fn to_union_item_id(contract: &str, token_id: &str) -> Result<ItemId, SdkError> {
	ItemId::new(BLOCKCHAIN, &format!("{}:{}", parse_contract(contract)?, token_id))
}

pub fn to_native_order_hash(order_id: &OrderId) -> Result<String, SdkError> {
	Ok(parse_order_hash(order_id.ensure_chain(BLOCKCHAIN)?)?.to_string())
}

pub fn to_union_order_id(hash: &str) -> Result<OrderId, SdkError> {
	OrderId::new(BLOCKCHAIN, parse_order_hash(hash)?)
}

pub fn to_native_parts(parts: &[Part]) -> Result<Vec<TezosPart>, SdkError> {
	parts
		.iter()
		.map(|part| {
			Ok(TezosPart {
				account: to_native_address(&part.account)?,
				value: part.value,
			})
		})
		.collect()
}

pub fn to_union_parts(parts: &[TezosPart]) -> Result<Vec<Part>, SdkError> {
	parts
		.iter()
		.map(|part| Ok(Part::new(to_union_address(&part.account)?, part.value)))
		.collect()
}
