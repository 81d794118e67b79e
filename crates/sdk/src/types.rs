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

use std::{cmp::Ordering, fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SdkError;
use crate::id::{Blockchain, ContractAddress, UnionAddress};

/// Base-10 decimal number carried as text
///
/// Values cross chains with different integer widths and fixed-point
/// scales, so they never pass through a machine number here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BigNumber(String);

impl BigNumber {
	pub fn parse(value: &str) -> Result<Self, SdkError> {
		let (int_part, frac_part) = match value.split_once('.') {
			Some((int_part, frac_part)) => (int_part, Some(frac_part)),
			None => (value, None),
		};

		let valid_int = !int_part.is_empty() && int_part.bytes().all(|b| b.is_ascii_digit());
		let valid_frac =
			frac_part.is_none_or(|f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()));

		if !valid_int || !valid_frac {
			return Err(SdkError::invalid_request(format!(
				"Not a decimal number: {:?}",
				value
			)));
		}

		Ok(Self(value.to_string()))
	}

	pub fn zero() -> Self {
		Self("0".to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_zero(&self) -> bool {
		self.0.bytes().all(|b| b == b'0' || b == b'.')
	}

	fn parts(&self) -> (&str, &str) {
		let (int_part, frac_part) = self.0.split_once('.').unwrap_or((&self.0, ""));
		let int_part = int_part.trim_start_matches('0');
		let frac_part = frac_part.trim_end_matches('0');
		(int_part, frac_part)
	}

	/// Canonical spelling: no leading zeros, no trailing fractional zeros
	pub fn normalized(&self) -> String {
		let (int_part, frac_part) = self.parts();
		let int_part = if int_part.is_empty() { "0" } else { int_part };
		if frac_part.is_empty() {
			int_part.to_string()
		} else {
			format!("{}.{}", int_part, frac_part)
		}
	}

	/// Compare by magnitude, ignoring formatting
	pub fn compare(&self, other: &BigNumber) -> Ordering {
		let (a_int, a_frac) = self.parts();
		let (b_int, b_frac) = other.parts();
		a_int
			.len()
			.cmp(&b_int.len())
			.then_with(|| a_int.cmp(b_int))
			.then_with(|| a_frac.cmp(b_frac))
	}

	pub fn same_magnitude(&self, other: &BigNumber) -> bool {
		self.compare(other) == Ordering::Equal
	}

	/// Shift the decimal point right by `decimals` places
	///
	/// Fails when the value has more significant fractional digits than
	/// `decimals`, i.e. when the conversion would lose precision.
	pub fn scale_to_integer(&self, decimals: u32) -> Result<BigNumber, SdkError> {
		let (int_part, frac_part) = self.parts();
		let decimals = decimals as usize;

		if frac_part.len() > decimals {
			return Err(SdkError::invalid_request(format!(
				"{} has more than {} fractional digits",
				self.0, decimals
			)));
		}

		let scaled = format!("{}{}{}", int_part, frac_part, "0".repeat(decimals - frac_part.len()));
		let scaled = scaled.trim_start_matches('0');
		if scaled.is_empty() {
			Ok(BigNumber::zero())
		} else {
			Ok(BigNumber(scaled.to_string()))
		}
	}

	/// Convert for arithmetic within `Decimal` range
	pub fn to_decimal(&self) -> Result<Decimal, SdkError> {
		Decimal::from_str(&self.0).map_err(|e| {
			SdkError::invalid_request(format!("{} is out of decimal range: {}", self.0, e))
		})
	}

	pub fn from_decimal(value: Decimal) -> Result<Self, SdkError> {
		if value.is_sign_negative() && !value.is_zero() {
			return Err(SdkError::invalid_request(format!(
				"Negative value: {}",
				value
			)));
		}
		Self::parse(&value.normalize().to_string())
	}
}

impl From<u64> for BigNumber {
	fn from(value: u64) -> Self {
		Self(value.to_string())
	}
}

impl fmt::Display for BigNumber {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl FromStr for BigNumber {
	type Err = SdkError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl TryFrom<String> for BigNumber {
	type Error = SdkError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(&value)
	}
}

impl From<BigNumber> for String {
	fn from(value: BigNumber) -> Self {
		value.0
	}
}

/// `0x`-prefixed hex blob (signatures, call data, markers)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Binary(String);

impl Binary {
	pub fn parse(value: &str) -> Result<Self, SdkError> {
		let digits = value
			.strip_prefix("0x")
			.ok_or_else(|| SdkError::invalid_request(format!("Missing 0x prefix: {}", value)))?;
		hex::decode(digits)
			.map_err(|e| SdkError::invalid_request(format!("Invalid hex {}: {}", value, e)))?;
		Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
	}

	pub fn from_bytes(bytes: &[u8]) -> Self {
		Self(format!("0x{}", hex::encode(bytes)))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn to_bytes(&self) -> Vec<u8> {
		// Validated in `parse`
		hex::decode(&self.0[2..]).unwrap_or_default()
	}
}

impl fmt::Display for Binary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl TryFrom<String> for Binary {
	type Error = SdkError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(&value)
	}
}

impl From<Binary> for String {
	fn from(value: Binary) -> Self {
		value.0
	}
}

/// Account share in basis points
///
/// Used for payouts, origin fees, creators and royalties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
	pub account: UnionAddress,
	pub value: u32,
}

impl Part {
	pub fn new(account: UnionAddress, value: u32) -> Self {
		Self { account, value }
	}
}

pub type Payout = Part;
pub type Creator = Part;
pub type Royalty = Part;

/// Chain-agnostic asset type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
	tag = "@type",
	rename_all = "SCREAMING_SNAKE_CASE",
	rename_all_fields = "camelCase"
)]
pub enum AssetType {
	Native {
		blockchain: Blockchain,
	},
	Fungible {
		contract: ContractAddress,
	},
	NonFungible {
		contract: ContractAddress,
		token_id: BigNumber,
	},
	NonFungibleLazy {
		contract: ContractAddress,
		token_id: BigNumber,
		uri: String,
		creators: Vec<Creator>,
		royalties: Vec<Royalty>,
		signatures: Vec<Binary>,
	},
	SemiFungible {
		contract: ContractAddress,
		token_id: BigNumber,
	},
	SemiFungibleLazy {
		contract: ContractAddress,
		token_id: BigNumber,
		uri: String,
		supply: BigNumber,
		creators: Vec<Creator>,
		royalties: Vec<Royalty>,
		signatures: Vec<Binary>,
	},
	GenArt {
		contract: ContractAddress,
	},
}

impl AssetType {
	/// Wire tag of the variant
	pub fn tag(&self) -> &'static str {
		match self {
			AssetType::Native { .. } => "NATIVE",
			AssetType::Fungible { .. } => "FUNGIBLE",
			AssetType::NonFungible { .. } => "NON_FUNGIBLE",
			AssetType::NonFungibleLazy { .. } => "NON_FUNGIBLE_LAZY",
			AssetType::SemiFungible { .. } => "SEMI_FUNGIBLE",
			AssetType::SemiFungibleLazy { .. } => "SEMI_FUNGIBLE_LAZY",
			AssetType::GenArt { .. } => "GEN_ART",
		}
	}

	pub fn blockchain(&self) -> Blockchain {
		match self {
			AssetType::Native { blockchain } => *blockchain,
			AssetType::Fungible { contract }
			| AssetType::NonFungible { contract, .. }
			| AssetType::NonFungibleLazy { contract, .. }
			| AssetType::SemiFungible { contract, .. }
			| AssetType::SemiFungibleLazy { contract, .. }
			| AssetType::GenArt { contract } => contract.blockchain(),
		}
	}

	/// Whether the asset is a token (as opposed to a currency)
	pub fn is_nft(&self) -> bool {
		!matches!(self, AssetType::Native { .. } | AssetType::Fungible { .. })
	}
}

/// Asset type plus amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
	#[serde(rename = "type")]
	pub asset_type: AssetType,
	pub value: BigNumber,
}

/// Currency class accepted by a prepared action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurrencyKind {
	Native,
	Fungible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyType {
	pub blockchain: Blockchain,
	#[serde(rename = "type")]
	pub kind: CurrencyKind,
}

impl CurrencyType {
	pub fn native(blockchain: Blockchain) -> Self {
		Self {
			blockchain,
			kind: CurrencyKind::Native,
		}
	}

	pub fn fungible(blockchain: Blockchain) -> Self {
		Self {
			blockchain,
			kind: CurrencyKind::Fungible,
		}
	}

	pub fn matches(&self, asset_type: &AssetType) -> bool {
		match asset_type {
			AssetType::Native { blockchain } => {
				self.kind == CurrencyKind::Native && self.blockchain == *blockchain
			}
			AssetType::Fungible { contract } => {
				self.kind == CurrencyKind::Fungible && self.blockchain == contract.blockchain()
			}
			_ => false,
		}
	}
}

/// Check a request currency against the prepared allowlist
pub fn ensure_supported_currency(
	supported: &[CurrencyType],
	currency: &AssetType,
) -> Result<(), SdkError> {
	if supported.iter().any(|c| c.matches(currency)) {
		Ok(())
	} else {
		Err(SdkError::UnsupportedCurrency(format!(
			"{} on {}",
			currency.tag(),
			currency.blockchain()
		)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn bn(value: &str) -> BigNumber {
		BigNumber::parse(value).unwrap()
	}

	#[test]
	fn test_big_number_validation() {
		assert!(BigNumber::parse("0").is_ok());
		assert!(BigNumber::parse("0.0000004").is_ok());
		assert!(BigNumber::parse("115792089237316195423570985008687907853269984665640564039457584007913129639935").is_ok());
		assert!(BigNumber::parse("").is_err());
		assert!(BigNumber::parse("1.").is_err());
		assert!(BigNumber::parse(".5").is_err());
		assert!(BigNumber::parse("-1").is_err());
		assert!(BigNumber::parse("1e18").is_err());
	}

	#[test]
	fn test_big_number_magnitude() {
		assert!(bn("007.50").same_magnitude(&bn("7.5")));
		assert_eq!(bn("0.000").normalized(), "0");
		assert_eq!(bn("10").compare(&bn("9.99")), Ordering::Greater);
		assert_eq!(bn("0.1").compare(&bn("0.09")), Ordering::Greater);
		assert!(bn("0.00").is_zero());
	}

	#[test]
	fn test_scale_to_integer() {
		assert_eq!(bn("0.0000004").scale_to_integer(18).unwrap().as_str(), "400000000000");
		assert_eq!(bn("1.5").scale_to_integer(6).unwrap().as_str(), "1500000");
		assert_eq!(bn("0").scale_to_integer(8).unwrap().as_str(), "0");
		assert_eq!(bn("2.10").scale_to_integer(1).unwrap().as_str(), "21");
		assert!(bn("0.1234567").scale_to_integer(6).is_err());
	}

	#[test]
	fn test_binary_codec() {
		let binary = Binary::parse("0xDEADbeef").unwrap();
		assert_eq!(binary.as_str(), "0xdeadbeef");
		assert_eq!(binary.to_bytes(), vec![0xde, 0xad, 0xbe, 0xef]);
		assert_eq!(Binary::from_bytes(&[1, 2]).as_str(), "0x0102");
		assert!(Binary::parse("0x").is_ok());
		assert!(Binary::parse("deadbeef").is_err());
		assert!(Binary::parse("0xabc").is_err());
	}

	#[test]
	fn test_asset_type_json_tag() {
		let asset_type = AssetType::NonFungible {
			contract: UnionAddress::parse("ETHEREUM:0x64f088254d7ede5dd6208639aabf3614c80d396d").unwrap(),
			token_id: bn("42"),
		};
		let json = serde_json::to_value(&asset_type).unwrap();
		assert_eq!(json["@type"], "NON_FUNGIBLE");
		assert_eq!(json["tokenId"], "42");

		let unknown = serde_json::json!({"@type": "CRYPTO_PUNKS", "contract": "ETHEREUM:0x01"});
		assert!(serde_json::from_value::<AssetType>(unknown).is_err());
	}

	#[test]
	fn test_currency_allowlist() {
		let supported = vec![
			CurrencyType::native(Blockchain::Tezos),
			CurrencyType::fungible(Blockchain::Tezos),
		];
		let xtz = AssetType::Native {
			blockchain: Blockchain::Tezos,
		};
		let eth = AssetType::Native {
			blockchain: Blockchain::Ethereum,
		};
		assert!(ensure_supported_currency(&supported, &xtz).is_ok());
		assert!(matches!(
			ensure_supported_currency(&supported, &eth),
			Err(SdkError::UnsupportedCurrency(_))
		));
	}
}
