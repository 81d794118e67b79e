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


//! Flow identity codecs
//!
//! Addresses are `0x` + 16 hex digits. Contracts are `A.<address>.<Name>`
//! and item ids `<contract>:<tokenId>`. Listing ids are decimal numbers.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use tessera_sdk::{
	Blockchain, CollectionId, ContractAddress, Environment, ItemId, OrderId, Part, SdkError,
	UnionAddress,
};

use super::types::{FlowCurrency, FlowPayout};
use crate::chains::split_item_id;

const BLOCKCHAIN: Blockchain = Blockchain::Flow;

/// Decimal places of a share
const SHARE_SCALE: u32 = 4;

/// Validate and normalize a native address
pub fn parse_address(native: &str) -> Result<String, SdkError> {
	let digits = native.strip_prefix("0x").ok_or_else(|| {
		SdkError::InvalidIdentifier(format!("Flow address without 0x prefix: {}", native))
	})?;

	if digits.len() != 16 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
		return Err(SdkError::InvalidIdentifier(format!(
			"Malformed Flow address: {}",
			native
		)));
	}

	Ok(format!("0x{}", digits.to_ascii_lowercase()))
}

/// Validate a contract id, returning its address and name
pub fn parse_contract(native: &str) -> Result<(String, &str), SdkError> {
	let malformed = || SdkError::InvalidIdentifier(format!("Malformed Flow contract: {}", native));

	let mut parts = native.split('.');
	let (Some("A"), Some(address), Some(name), None) =
		(parts.next(), parts.next(), parts.next(), parts.next())
	else {
		return Err(malformed());
	};
	if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
		return Err(malformed());
	}
	let address = parse_address(&format!("0x{}", address)).map_err(|_| malformed())?;

	Ok((address, name))
}

pub fn to_native_address(address: &UnionAddress) -> Result<String, SdkError> {
	parse_address(address.ensure_chain(BLOCKCHAIN)?)
}

pub fn to_union_address(native: &str) -> Result<UnionAddress, SdkError> {
	UnionAddress::new(BLOCKCHAIN, &parse_address(native)?)
}

pub fn to_native_contract(contract: &ContractAddress) -> Result<String, SdkError> {
	let native = contract.ensure_chain(BLOCKCHAIN)?;
	parse_contract(native)?;
	Ok(native.to_string())
}

pub fn to_union_contract(native: &str) -> Result<ContractAddress, SdkError> {
	parse_contract(native)?;
	ContractAddress::new(BLOCKCHAIN, native)
}

pub fn to_native_collection(collection: &CollectionId) -> Result<String, SdkError> {
	let native = collection.ensure_chain(BLOCKCHAIN)?;
	parse_contract(native)?;
	Ok(native.to_string())
}

/// Contract and token id of an item
pub fn to_native_item_id(item_id: &ItemId) -> Result<(String, u64), SdkError> {
	let (contract, token_id) = split_item_id(item_id.ensure_chain(BLOCKCHAIN)?)?;
	parse_contract(contract)?;
	let token_id = token_id
		.parse()
		.map_err(|_| SdkError::InvalidIdentifier(format!("Malformed Flow token id: {}", item_id)))?;
	Ok((contract.to_string(), token_id))
}

pub fn to_union_item_id(contract: &str, token_id: u64) -> Result<ItemId, SdkError> {
	parse_contract(contract)?;
	ItemId::new(BLOCKCHAIN, &format!("{}:{}", contract, token_id))
}

pub fn to_native_order_id(order_id: &OrderId) -> Result<u64, SdkError> {
	let native = order_id.ensure_chain(BLOCKCHAIN)?;
	native
		.parse()
		.map_err(|_| SdkError::InvalidIdentifier(format!("Malformed Flow order id: {}", native)))
}

pub fn to_union_order_id(order_id: u64) -> Result<OrderId, SdkError> {
	OrderId::new(BLOCKCHAIN, &order_id.to_string())
}

/// Contract of a storefront currency
pub fn currency_contract(environment: Environment, currency: FlowCurrency) -> String {
	let address = match (environment, currency) {
		(Environment::Prod, FlowCurrency::Flow) => "1654653399040a61",
		(Environment::Prod, FlowCurrency::Fusd) => "3c5959b568896393",
		(_, FlowCurrency::Flow) => "7e60df042a9c0868",
		(_, FlowCurrency::Fusd) => "e223d8a629e49c68",
	};
	format!("A.{}.{}", address, currency.contract_name())
}

/// Token a fungible contract settles in
pub fn fungible_token(contract: &str) -> Result<FlowCurrency, SdkError> {
	let (_, name) = parse_contract(contract)?;
	match name {
		"FlowToken" => Ok(FlowCurrency::Flow),
		"FUSD" => Ok(FlowCurrency::Fusd),
		other => Err(SdkError::UnsupportedCurrency(format!("{} on FLOW", other))),
	}
}

pub fn to_native_payout(part: &Part) -> Result<FlowPayout, SdkError> {
	Ok(FlowPayout {
		account: to_native_address(&part.account)?,
		value: Decimal::new(i64::from(part.value), SHARE_SCALE)
			.normalize()
			.to_string(),
	})
}

pub fn to_native_payouts(parts: &[Part]) -> Result<Vec<FlowPayout>, SdkError> {
	parts.iter().map(to_native_payout).collect()
}

/// Fractional share back to basis points, refusing anything finer
pub fn to_union_payout(payout: &FlowPayout) -> Result<Part, SdkError> {
	let invalid = || SdkError::invalid_request(format!("Malformed Flow share: {}", payout.value));

	let share: Decimal = payout.value.parse().map_err(|_| invalid())?;
	let basis_points = share
		.checked_mul(Decimal::new(10_000, 0))
		.filter(|bp| bp.fract().is_zero() && !bp.is_sign_negative())
		.ok_or_else(invalid)?;
	let value = basis_points.to_u32().ok_or_else(invalid)?;

	Ok(Part::new(to_union_address(&payout.account)?, value))
}

pub fn to_union_payouts(payouts: &[FlowPayout]) -> Result<Vec<Part>, SdkError> {
	payouts.iter().map(to_union_payout).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	const CONTRACT: &str = "A.01658d9b94068f3c.CommonNFT";

	#[test]
	fn test_contract_parsing() {
		assert_eq!(
			parse_contract(CONTRACT).unwrap(),
			("0x01658d9b94068f3c".to_string(), "CommonNFT")
		);
		assert!(parse_contract("A.01658d9b94068f3c").is_err());
		assert!(parse_contract("B.01658d9b94068f3c.CommonNFT").is_err());
		assert!(parse_contract("A.01658d9b.CommonNFT").is_err());
		assert!(parse_contract("A.01658d9b94068f3c.Common.NFT").is_err());
	}

	#[test]
	fn test_item_id() {
		let item_id = ItemId::parse(&format!("FLOW:{}:42", CONTRACT)).unwrap();
		assert_eq!(
			to_native_item_id(&item_id).unwrap(),
			(CONTRACT.to_string(), 42)
		);
		assert_eq!(to_union_item_id(CONTRACT, 42).unwrap(), item_id);

		let foreign = ItemId::parse("TEZOS:KT1:42").unwrap();
		assert!(matches!(
			to_native_item_id(&foreign),
			Err(SdkError::WrongChain { .. })
		));
	}

	#[test]
	fn test_order_id() {
		let order_id = OrderId::parse("FLOW:106746924").unwrap();
		assert_eq!(to_native_order_id(&order_id).unwrap(), 106746924);
		assert!(to_native_order_id(&OrderId::parse("FLOW:0xabc").unwrap()).is_err());
	}

	#[test]
	fn test_fungible_token_names() {
		assert_eq!(
			fungible_token("A.7e60df042a9c0868.FlowToken").unwrap(),
			FlowCurrency::Flow
		);
		assert_eq!(
			fungible_token("A.e223d8a629e49c68.FUSD").unwrap(),
			FlowCurrency::Fusd
		);
		assert_eq!(
			fungible_token(&currency_contract(Environment::Prod, FlowCurrency::Fusd)).unwrap(),
			FlowCurrency::Fusd
		);
		assert!(matches!(
			fungible_token("A.e223d8a629e49c68.USDC"),
			Err(SdkError::UnsupportedCurrency(_))
		));
	}

	#[test]
	fn test_payout_shares() {
		let part = Part::new(UnionAddress::parse("FLOW:0x01658d9b94068f3c").unwrap(), 1000);
		let payout = to_native_payout(&part).unwrap();
		assert_eq!(payout.value, "0.1");
		assert_eq!(to_union_payout(&payout).unwrap(), part);

		let finer = FlowPayout {
			account: "0x01658d9b94068f3c".to_string(),
			value: "0.00001".to_string(),
		};
		assert!(to_union_payout(&finer).is_err());
	}
}
