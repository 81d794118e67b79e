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

use serde::{Deserialize, Serialize};

use crate::error::SdkError;
use crate::id::{CollectionId, ItemId, OrderId};
use crate::transaction::BlockchainTransaction;
use crate::types::{AssetType, BigNumber, Creator, Payout, Royalty};

/// Request to prepare a mint into a collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareMintRequest {
	pub collection_id: CollectionId,
}

/// Submit-time mint parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
	/// Metadata URI
	pub uri: String,
	/// Number of copies (1 for non-multiple collections)
	pub supply: u64,
	/// Sign the item off-chain instead of minting it
	pub lazy_mint: bool,
	#[serde(default)]
	pub creators: Vec<Creator>,
	#[serde(default)]
	pub royalties: Vec<Royalty>,
}

/// Request to prepare a sell or a bid on an item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareOrderRequest {
	pub item_id: ItemId,
}

/// Submit-time order parameters for sell and bid
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
	/// Number of tokens
	pub amount: u64,
	/// Price per token, in currency units (decimal)
	pub price: BigNumber,
	pub currency: AssetType,
	/// Defaults to the maker's own address at 100%
	pub payouts: Option<Vec<Payout>>,
	pub origin_fees: Option<Vec<Payout>>,
	/// Fee ceiling, required when the prepared action reports it
	pub max_fees_base_point: Option<u32>,
}

/// Request to prepare an update of an existing order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareOrderUpdateRequest {
	pub order_id: OrderId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdateRequest {
	/// New price per token (decimal)
	pub price: BigNumber,
}

/// Request to prepare a fill (buy or accept-bid)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareFillRequest {
	pub order_id: OrderId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillRequest {
	pub amount: u64,
	/// Approve the exchange for all tokens instead of this fill only
	#[serde(default)]
	pub infinite_approval: bool,
	pub payouts: Option<Vec<Payout>>,
	pub origin_fees: Option<Vec<Payout>>,
	pub max_fees_base_point: Option<u32>,
}

/// Whether a mutation touched the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MutationKind {
	OnChain,
	OffChain,
}

/// Result of a submit that may or may not produce a transaction
///
/// `OffChain` never carries a transaction; `OnChain` always carries a
/// non-empty one.
#[derive(Debug, Clone)]
pub enum SubmitResponse<T> {
	OnChain {
		transaction: BlockchainTransaction,
		value: T,
	},
	OffChain {
		value: T,
	},
}

impl<T> SubmitResponse<T> {
	/// Build an on-chain response, refusing empty transactions
	pub fn on_chain(transaction: BlockchainTransaction, value: T) -> Result<Self, SdkError> {
		if transaction.is_empty() {
			return Err(SdkError::invalid_request(
				"On-chain result without a transaction",
			));
		}
		Ok(SubmitResponse::OnChain { transaction, value })
	}

	pub fn off_chain(value: T) -> Self {
		SubmitResponse::OffChain { value }
	}

	pub fn kind(&self) -> MutationKind {
		match self {
			SubmitResponse::OnChain { .. } => MutationKind::OnChain,
			SubmitResponse::OffChain { .. } => MutationKind::OffChain,
		}
	}

	pub fn value(&self) -> &T {
		match self {
			SubmitResponse::OnChain { value, .. } | SubmitResponse::OffChain { value } => value,
		}
	}

	pub fn into_value(self) -> T {
		match self {
			SubmitResponse::OnChain { value, .. } | SubmitResponse::OffChain { value } => value,
		}
	}

	pub fn transaction(&self) -> Option<&BlockchainTransaction> {
		match self {
			SubmitResponse::OnChain { transaction, .. } => Some(transaction),
			SubmitResponse::OffChain { .. } => None,
		}
	}
}

/// Mint result, carrying the new item id
pub type MintResponse = SubmitResponse<ItemId>;

/// Sell/bid/update result, carrying the order id
pub type OrderResponse = SubmitResponse<OrderId>;

#[cfg(test)]
mod tests {
	use super::*;
	use crate::id::Blockchain;
	use crate::transaction::Environment;

	#[test]
	fn test_off_chain_response_has_no_transaction() {
		let response = OrderResponse::off_chain(OrderId::parse("TEZOS:abc").unwrap());
		assert_eq!(response.kind(), MutationKind::OffChain);
		assert!(response.transaction().is_none());
		assert_eq!(response.value().as_str(), "TEZOS:abc");
	}

	#[test]
	fn test_on_chain_response_requires_transaction() {
		let empty = BlockchainTransaction::empty(Blockchain::Flow, Environment::Prod);
		let result = OrderResponse::on_chain(empty, OrderId::parse("FLOW:1").unwrap());
		assert!(matches!(result, Err(SdkError::InvalidRequest(_))));
	}

	#[test]
	fn test_order_request_json_shape() {
		let json = serde_json::json!({
			"amount": 1,
			"price": "0.0000004",
			"currency": {"@type": "NATIVE", "blockchain": "ETHEREUM"},
			"originFees": [{"account": "ETHEREUM:0x0000000000000000000000000000000000000001", "value": 1000}],
			"maxFeesBasePoint": 500
		});
		let request: OrderRequest = serde_json::from_value(json).unwrap();
		assert_eq!(request.amount, 1);
		assert!(request.payouts.is_none());
		assert_eq!(request.origin_fees.unwrap()[0].value, 1000);
		assert_eq!(request.max_fees_base_point, Some(500));
	}
}
