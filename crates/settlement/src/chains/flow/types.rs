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


//! Native Flow types

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tessera_sdk::NativeTransaction;

/// Fungible tokens the storefront settles in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowCurrency {
	Flow,
	Fusd,
}

impl FlowCurrency {
	/// Contract name of the token
	pub fn contract_name(&self) -> &'static str {
		match self {
			FlowCurrency::Flow => "FlowToken",
			FlowCurrency::Fusd => "FUSD",
		}
	}
}

/// Share of a sale, as a fraction of one (`"0.1"` is 10%)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowPayout {
	pub account: String,
	pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
	tag = "@type",
	rename_all = "SCREAMING_SNAKE_CASE",
	rename_all_fields = "camelCase"
)]
pub enum FlowAssetType {
	FlowNft { contract: String, token_id: u64 },
	FlowFt { contract: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowAsset {
	pub asset_type: FlowAssetType,
	/// Decimal amount
	pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowOrderData {
	pub payouts: Vec<FlowPayout>,
	pub origin_fees: Vec<FlowPayout>,
}

/// Storefront listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowOrder {
	pub id: u64,
	pub item_id: String,
	pub maker: String,
	pub taker: Option<String>,
	pub make: FlowAsset,
	pub take: FlowAsset,
	pub fill: String,
	pub make_stock: String,
	pub cancelled: bool,
	pub created_at: DateTime<Utc>,
	pub last_updated_at: DateTime<Utc>,
	pub data: FlowOrderData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowCollection {
	/// `A.<address>.<Name>`
	pub id: String,
	pub name: String,
	pub owner: String,
	/// Whether anyone may mint, or only the owner
	pub public: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowItem {
	pub id: String,
	pub contract: String,
	pub token_id: u64,
	pub owner: String,
	pub creator: String,
	pub royalties: Vec<FlowPayout>,
	pub meta_uri: String,
	pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowMintRequest {
	pub collection: String,
	pub meta_uri: String,
	pub royalties: Vec<FlowPayout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSellRequest {
	pub collection: String,
	pub token_id: u64,
	pub currency: FlowCurrency,
	/// UFix64 price
	pub price: String,
	pub payouts: Vec<FlowPayout>,
	pub origin_fees: Vec<FlowPayout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowUpdateRequest {
	pub order_id: u64,
	/// UFix64 price
	pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowBuyRequest {
	pub order_id: u64,
	pub origin_fees: Vec<FlowPayout>,
}

#[derive(Debug, Clone)]
pub struct FlowMintOutcome {
	pub transaction: Arc<dyn NativeTransaction>,
	pub token_id: u64,
}

/// Transaction that created a listing, with the listing id
#[derive(Debug, Clone)]
pub struct FlowOrderOutcome {
	pub transaction: Arc<dyn NativeTransaction>,
	pub order_id: u64,
}
