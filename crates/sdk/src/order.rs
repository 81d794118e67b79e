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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{OrderId, UnionAddress};
use crate::types::{Asset, BigNumber, Binary, Part, Payout};

/// Basis points representing 100%
pub const FULL_UNIT_BASIS_POINTS: u32 = 10_000;

/// Marketplace that created the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
	Rarible,
	OpenSea,
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
	Active,
	Filled,
	Historical,
	Inactive,
	Cancelled,
}

impl OrderStatus {
	/// Derive the status from stock, fill and cancellation
	pub fn derive(cancelled: bool, make_stock: &BigNumber, fill: &BigNumber) -> Self {
		if cancelled {
			OrderStatus::Cancelled
		} else if make_stock.is_zero() && !fill.is_zero() {
			OrderStatus::Filled
		} else if make_stock.is_zero() {
			OrderStatus::Inactive
		} else {
			OrderStatus::Active
		}
	}
}

/// Canonical order
///
/// Always produced by a chain translator from native chain state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	pub id: OrderId,
	pub fill: BigNumber,
	pub platform: Platform,
	pub status: OrderStatus,
	pub make_stock: BigNumber,
	pub cancelled: bool,
	pub created_at: DateTime<Utc>,
	pub last_updated_at: DateTime<Utc>,
	pub make_price: Option<BigNumber>,
	pub take_price: Option<BigNumber>,
	pub maker: UnionAddress,
	pub taker: Option<UnionAddress>,
	pub make: Asset,
	pub take: Asset,
	pub salt: String,
	pub signature: Option<Binary>,
	pub pending: Vec<PendingOrderEvent>,
	pub price_history: Vec<PriceHistoryRecord>,
	pub data: OrderData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryRecord {
	pub date: DateTime<Utc>,
	pub make_value: BigNumber,
	pub take_value: BigNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
	Left,
	Right,
}

/// Exchange-history record attached to an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
	tag = "@type",
	rename_all = "SCREAMING_SNAKE_CASE",
	rename_all_fields = "camelCase"
)]
pub enum PendingOrderEvent {
	Cancel {
		id: OrderId,
		date: DateTime<Utc>,
		make: Option<Asset>,
		take: Option<Asset>,
		maker: Option<UnionAddress>,
		owner: Option<UnionAddress>,
	},
	OrderSideMatch {
		id: OrderId,
		date: DateTime<Utc>,
		make: Option<Asset>,
		take: Option<Asset>,
		maker: Option<UnionAddress>,
		taker: Option<UnionAddress>,
		side: Option<OrderSide>,
		fill: Option<BigNumber>,
		counter_hash: Option<Binary>,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpenSeaFeeMethod {
	ProtocolFee,
	SplitFee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpenSeaSide {
	Buy,
	Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpenSeaSaleKind {
	FixedPrice,
	DutchAuction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpenSeaHowToCall {
	Call,
	DelegateCall,
}

/// Protocol-specific order data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type", rename_all_fields = "camelCase")]
pub enum OrderData {
	/// Legacy single-fee exchange
	#[serde(rename = "ETH_RARIBLE_V1")]
	EthRaribleV1 { fee: u32 },
	#[serde(rename = "ETH_RARIBLE_V2")]
	EthRaribleV2 {
		payouts: Vec<Payout>,
		origin_fees: Vec<Payout>,
	},
	#[serde(rename = "ETH_RARIBLE_V2_DATA_V3_SELL")]
	EthRaribleV2DataV3Sell {
		payout: Option<Payout>,
		origin_fee_first: Option<Payout>,
		origin_fee_second: Option<Payout>,
		max_fees_base_point: u32,
		marketplace_marker: Option<Binary>,
	},
	#[serde(rename = "ETH_RARIBLE_V2_DATA_V3_BUY")]
	EthRaribleV2DataV3Buy {
		payout: Option<Payout>,
		origin_fee_first: Option<Payout>,
		origin_fee_second: Option<Payout>,
		marketplace_marker: Option<Binary>,
	},
	#[serde(rename = "ETH_OPEN_SEA_V1")]
	EthOpenSeaV1 {
		exchange: UnionAddress,
		maker_relayer_fee: BigNumber,
		taker_relayer_fee: BigNumber,
		maker_protocol_fee: BigNumber,
		taker_protocol_fee: BigNumber,
		fee_recipient: UnionAddress,
		fee_method: OpenSeaFeeMethod,
		side: OpenSeaSide,
		sale_kind: OpenSeaSaleKind,
		how_to_call: OpenSeaHowToCall,
		call_data: Binary,
		replacement_pattern: Binary,
		static_target: UnionAddress,
		static_extra_data: Binary,
		extra: BigNumber,
	},
	#[serde(rename = "FLOW_RARIBLE_V1")]
	FlowRaribleV1 {
		payouts: Vec<Payout>,
		origin_fees: Vec<Payout>,
	},
	#[serde(rename = "TEZOS_RARIBLE_V2")]
	TezosRaribleV2 {
		payouts: Vec<Payout>,
		origin_fees: Vec<Payout>,
	},
}

impl OrderData {
	pub fn tag(&self) -> &'static str {
		match self {
			OrderData::EthRaribleV1 { .. } => "ETH_RARIBLE_V1",
			OrderData::EthRaribleV2 { .. } => "ETH_RARIBLE_V2",
			OrderData::EthRaribleV2DataV3Sell { .. } => "ETH_RARIBLE_V2_DATA_V3_SELL",
			OrderData::EthRaribleV2DataV3Buy { .. } => "ETH_RARIBLE_V2_DATA_V3_BUY",
			OrderData::EthOpenSeaV1 { .. } => "ETH_OPEN_SEA_V1",
			OrderData::FlowRaribleV1 { .. } => "FLOW_RARIBLE_V1",
			OrderData::TezosRaribleV2 { .. } => "TEZOS_RARIBLE_V2",
		}
	}
}

/// Payouts for a new order
///
/// An absent or empty list pays everything to the maker.
pub fn payouts_or_default(requested: Option<&[Payout]>, maker: &UnionAddress) -> Vec<Payout> {
	match requested {
		Some(payouts) if !payouts.is_empty() => payouts.to_vec(),
		_ => vec![Part::new(maker.clone(), FULL_UNIT_BASIS_POINTS)],
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn address(value: &str) -> UnionAddress {
		UnionAddress::parse(value).unwrap()
	}

	#[test]
	fn test_default_payouts_go_to_maker() {
		let maker = address("TEZOS:tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb");

		for requested in [None, Some(&[][..])] {
			let payouts = payouts_or_default(requested, &maker);
			assert_eq!(payouts, vec![Part::new(maker.clone(), FULL_UNIT_BASIS_POINTS)]);
		}
	}

	#[test]
	fn test_explicit_payouts_kept() {
		let maker = address("FLOW:0x01658d9b94068f3c");
		let other = address("FLOW:0x0000000000000001");
		let requested = vec![Part::new(other.clone(), 4000), Part::new(maker.clone(), 6000)];

		assert_eq!(payouts_or_default(Some(&requested), &maker), requested);
	}

	#[test]
	fn test_status_derivation() {
		let zero = BigNumber::zero();
		let one = BigNumber::from(1);
		assert_eq!(OrderStatus::derive(true, &one, &zero), OrderStatus::Cancelled);
		assert_eq!(OrderStatus::derive(false, &zero, &one), OrderStatus::Filled);
		assert_eq!(OrderStatus::derive(false, &zero, &zero), OrderStatus::Inactive);
		assert_eq!(OrderStatus::derive(false, &one, &zero), OrderStatus::Active);
	}

	#[test]
	fn test_order_data_tag_on_wire() {
		let data = OrderData::EthRaribleV1 { fee: 250 };
		let json = serde_json::to_value(&data).unwrap();
		assert_eq!(json["@type"], data.tag());
		assert_eq!(json["fee"], 250);
	}
}
