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

//! Builder capability traits
//!
//! Each supported chain implements the operations it can serve. Every
//! `prepare` follows the same path: decode the identifier and reject foreign
//! chains, read whatever chain state the constraints need, then hand back the
//! constraints together with a submit [`Action`] bound to that snapshot.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::SdkError;
use crate::id::{OrderId, UnionAddress};
use crate::order::Order;
use crate::request::{
	FillRequest, MintRequest, MintResponse, OrderRequest, OrderResponse, OrderUpdateRequest,
	PrepareFillRequest, PrepareMintRequest, PrepareOrderRequest, PrepareOrderUpdateRequest,
};
use crate::transaction::BlockchainTransaction;
use crate::types::{AssetType, BigNumber, CurrencyType};

/// Operations routed by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
	Mint,
	Sell,
	SellUpdate,
	Bid,
	BidUpdate,
	Buy,
	AcceptBid,
	OrderRead,
	Balance,
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Operation::Mint => "MINT",
			Operation::Sell => "SELL",
			Operation::SellUpdate => "SELL_UPDATE",
			Operation::Bid => "BID",
			Operation::BidUpdate => "BID_UPDATE",
			Operation::Buy => "BUY",
			Operation::AcceptBid => "ACCEPT_BID",
			Operation::OrderRead => "ORDER_READ",
			Operation::Balance => "BALANCE",
		};
		f.write_str(name)
	}
}

/// Whether a fill or order honours `maxFeesBasePoint`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaxFeesBasePointSupport {
	Required,
	Ignored,
}

/// Origin fees a fill can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OriginFeeSupport {
	None,
	AmountOnly,
	Full,
}

/// Payouts a fill can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutsSupport {
	None,
	Single,
	Multiple,
}

#[derive(Debug, Clone)]
pub struct PrepareMintResponse {
	pub multiple: bool,
	pub supports_royalties: bool,
	pub supports_lazy_mint: bool,
	pub submit: Action<MintRequest, MintResponse>,
}

/// Prepared sell or bid
#[derive(Debug, Clone)]
pub struct PrepareOrderResponse {
	pub supported_currencies: Vec<CurrencyType>,
	pub multiple: bool,
	pub max_amount: Option<BigNumber>,
	/// Protocol fee in basis points, read from the chain
	pub base_fee: u32,
	pub max_fees_base_point_support: MaxFeesBasePointSupport,
	pub submit: Action<OrderRequest, OrderResponse>,
}

/// Prepared sell-update or bid-update
#[derive(Debug, Clone)]
pub struct PrepareOrderUpdateResponse {
	pub supported_currencies: Vec<CurrencyType>,
	pub base_fee: u32,
	pub submit: Action<OrderUpdateRequest, OrderResponse>,
}

/// Prepared buy or accept-bid
#[derive(Debug, Clone)]
pub struct PrepareFillResponse {
	pub multiple: bool,
	pub max_amount: BigNumber,
	pub base_fee: u32,
	pub supports_partial_fill: bool,
	pub origin_fee_support: OriginFeeSupport,
	pub payouts_support: PayoutsSupport,
	pub max_fees_base_point_support: MaxFeesBasePointSupport,
	pub submit: Action<FillRequest, BlockchainTransaction>,
}

#[async_trait]
pub trait MintBuilder: Send + Sync {
	async fn prepare(&self, request: PrepareMintRequest) -> Result<PrepareMintResponse, SdkError>;
}

/// Sell and bid
#[async_trait]
pub trait OrderBuilder: Send + Sync {
	async fn prepare(&self, request: PrepareOrderRequest)
	-> Result<PrepareOrderResponse, SdkError>;
}

/// Sell-update and bid-update
#[async_trait]
pub trait OrderUpdateBuilder: Send + Sync {
	async fn prepare(
		&self,
		request: PrepareOrderUpdateRequest,
	) -> Result<PrepareOrderUpdateResponse, SdkError>;
}

/// Buy and accept-bid
#[async_trait]
pub trait FillBuilder: Send + Sync {
	async fn prepare(&self, request: PrepareFillRequest) -> Result<PrepareFillResponse, SdkError>;
}

/// Read an order in canonical form
#[async_trait]
pub trait OrderReader: Send + Sync {
	async fn get_order(&self, order_id: &OrderId) -> Result<Order, SdkError>;
}

/// Read an account balance
#[async_trait]
pub trait BalanceReader: Send + Sync {
	async fn get_balance(
		&self,
		address: &UnionAddress,
		asset_type: &AssetType,
	) -> Result<BigNumber, SdkError>;
}

/// Check a submit amount against prepared constraints
pub fn ensure_amount(amount: u64, multiple: bool, max_amount: &BigNumber) -> Result<(), SdkError> {
	if amount == 0 {
		return Err(SdkError::invalid_request("Amount must be greater than zero"));
	}
	if !multiple && amount != 1 {
		return Err(SdkError::invalid_request(format!(
			"Only a single token can be transferred, got {}",
			amount
		)));
	}
	if BigNumber::from(amount).compare(max_amount).is_gt() {
		return Err(SdkError::invalid_request(format!(
			"Amount {} exceeds available {}",
			amount, max_amount
		)));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_ensure_amount() {
		let five = BigNumber::from(5);
		assert!(ensure_amount(3, true, &five).is_ok());
		assert!(ensure_amount(0, true, &five).is_err());
		assert!(ensure_amount(6, true, &five).is_err());
		assert!(ensure_amount(2, false, &five).is_err());
		assert!(ensure_amount(1, false, &BigNumber::from(1)).is_ok());
	}

	#[test]
	fn test_operation_display() {
		assert_eq!(Operation::AcceptBid.to_string(), "ACCEPT_BID");
		assert_eq!(
			serde_json::to_string(&Operation::SellUpdate).unwrap(),
			"\"SELL_UPDATE\""
		);
	}
}
