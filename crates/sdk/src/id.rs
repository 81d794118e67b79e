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

//! Composite identifiers
//!
//! Every item, order, collection and address crossing the SDK boundary is a
//! `<CHAIN>:<native-id>` string. The chain tag is everything before the first
//! separator; the native part is opaque here and may itself contain
//! separators (e.g. `ETHEREUM:0xabc...:42`).

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::SdkError;

/// Separator between the chain tag and the native identifier
pub const ID_SEPARATOR: char = ':';

/// Supported chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Blockchain {
	Ethereum,
	Polygon,
	Flow,
	Tezos,
}

impl Blockchain {
	pub const ALL: [Blockchain; 4] = [
		Blockchain::Ethereum,
		Blockchain::Polygon,
		Blockchain::Flow,
		Blockchain::Tezos,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Blockchain::Ethereum => "ETHEREUM",
			Blockchain::Polygon => "POLYGON",
			Blockchain::Flow => "FLOW",
			Blockchain::Tezos => "TEZOS",
		}
	}

	/// Whether the chain is served by the EVM pipeline
	pub fn is_evm(&self) -> bool {
		matches!(self, Blockchain::Ethereum | Blockchain::Polygon)
	}
}

impl fmt::Display for Blockchain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Blockchain {
	type Err = SdkError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Blockchain::ALL
			.into_iter()
			.find(|chain| chain.as_str() == s)
			.ok_or_else(|| SdkError::InvalidIdentifier(format!("Unknown chain tag: {}", s)))
	}
}

/// Build a composite identifier from a chain tag and a native id
pub fn encode(blockchain: Blockchain, native_id: &str) -> String {
	format!("{}{}{}", blockchain, ID_SEPARATOR, native_id)
}

/// Split a composite identifier into its chain tag and native id
pub fn decode(id: &str) -> Result<(Blockchain, &str), SdkError> {
	let (tag, native_id) = id
		.split_once(ID_SEPARATOR)
		.ok_or_else(|| SdkError::InvalidIdentifier(format!("Missing chain tag: {}", id)))?;

	let blockchain = tag.parse::<Blockchain>()?;

	if native_id.is_empty() {
		return Err(SdkError::InvalidIdentifier(format!(
			"Empty native identifier: {}",
			id
		)));
	}

	Ok((blockchain, native_id))
}

macro_rules! composite_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name {
			blockchain: Blockchain,
			value: String,
		}

		impl $name {
			/// Build from a chain tag and a native id
			pub fn new(blockchain: Blockchain, native_id: &str) -> Result<Self, SdkError> {
				Self::parse(&encode(blockchain, native_id))
			}

			/// Parse and validate a composite identifier
			pub fn parse(value: &str) -> Result<Self, SdkError> {
				let (blockchain, _) = decode(value)?;
				Ok(Self {
					blockchain,
					value: value.to_string(),
				})
			}

			pub fn blockchain(&self) -> Blockchain {
				self.blockchain
			}

			/// Native part, after the chain tag
			pub fn native(&self) -> &str {
				&self.value[self.blockchain.as_str().len() + 1..]
			}

			pub fn as_str(&self) -> &str {
				&self.value
			}

			/// Return the native part when the tag matches `expected`
			pub fn ensure_chain(&self, expected: Blockchain) -> Result<&str, SdkError> {
				if self.blockchain != expected {
					return Err(SdkError::WrongChain {
						expected,
						actual: self.blockchain,
					});
				}
				Ok(self.native())
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.value)
			}
		}

		impl FromStr for $name {
			type Err = SdkError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::parse(s)
			}
		}

		impl TryFrom<String> for $name {
			type Error = SdkError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::parse(&value)
			}
		}

		impl From<$name> for String {
			fn from(id: $name) -> Self {
				id.value
			}
		}
	};
}

composite_id!(
	/// Identifier of an item (`<CHAIN>:<contract>:<tokenId>`)
	ItemId
);
composite_id!(
	/// Identifier of an order (`<CHAIN>:<order hash or number>`)
	OrderId
);
composite_id!(
	/// Chain-qualified account or contract address
	UnionAddress
);
composite_id!(
	/// Identifier of a collection (`<CHAIN>:<contract>`)
	CollectionId
);

/// Contracts are addressed like accounts
pub type ContractAddress = UnionAddress;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_decode_keeps_nested_separators() {
		let (chain, native) = decode("ETHEREUM:0xabc:42").unwrap();
		assert_eq!(chain, Blockchain::Ethereum);
		assert_eq!(native, "0xabc:42");
	}

	#[test]
	fn test_decode_rejects_missing_tag() {
		assert!(matches!(
			decode("0xabc"),
			Err(SdkError::InvalidIdentifier(_))
		));
	}

	#[test]
	fn test_decode_rejects_unknown_tag() {
		assert!(matches!(
			decode("SOLANA:abc"),
			Err(SdkError::InvalidIdentifier(_))
		));
		assert!(matches!(
			decode("ethereum:0xabc"),
			Err(SdkError::InvalidIdentifier(_))
		));
	}

	#[test]
	fn test_decode_rejects_empty_remainder() {
		assert!(matches!(
			decode("TEZOS:"),
			Err(SdkError::InvalidIdentifier(_))
		));
	}

	#[test]
	fn test_item_id_accessors() {
		let item = ItemId::parse("TEZOS:KT18pVpRXKPY2c4U2yFEGSH3ZnhB2kL8kwXS:46284").unwrap();
		assert_eq!(item.blockchain(), Blockchain::Tezos);
		assert_eq!(item.native(), "KT18pVpRXKPY2c4U2yFEGSH3ZnhB2kL8kwXS:46284");
		assert_eq!(
			item,
			ItemId::new(Blockchain::Tezos, "KT18pVpRXKPY2c4U2yFEGSH3ZnhB2kL8kwXS:46284").unwrap()
		);
	}

	#[test]
	fn test_ensure_chain() {
		let order = OrderId::parse("FLOW:1234").unwrap();
		assert_eq!(order.ensure_chain(Blockchain::Flow).unwrap(), "1234");

		let err = order.ensure_chain(Blockchain::Ethereum).unwrap_err();
		assert!(matches!(
			err,
			SdkError::WrongChain {
				expected: Blockchain::Ethereum,
				actual: Blockchain::Flow,
			}
		));
	}

	#[test]
	fn test_serde_as_plain_string() {
		let address = UnionAddress::parse("POLYGON:0x0000000000000000000000000000000000000001").unwrap();
		let json = serde_json::to_string(&address).unwrap();
		assert_eq!(json, "\"POLYGON:0x0000000000000000000000000000000000000001\"");

		let back: UnionAddress = serde_json::from_str(&json).unwrap();
		assert_eq!(back, address);

		assert!(serde_json::from_str::<UnionAddress>("\"nope\"").is_err());
	}
}
