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


//! Native Tezos indexer types

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tessera_sdk::NativeTransaction;

/// Account share in basis points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TezosPart {
	pub account: String,
	pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "assetClass", rename_all_fields = "camelCase")]
pub enum TezosAssetType {
	#[serde(rename = "XTZ")]
	Xtz,
	#[serde(rename = "FA_1_2")]
	Fa12 { contract: String },
	#[serde(rename = "NFT")]
	Nft { contract: String, token_id: String },
	#[serde(rename = "MT")]
	Mt { contract: String, token_id: String },
}

impl TezosAssetType {
	pub fn class(&self) -> &'static str {
		match self {
			TezosAssetType::Xtz => "XTZ",
			TezosAssetType::Fa12 { .. } => "FA_1_2",
			TezosAssetType::Nft { .. } => "NFT",
			TezosAssetType::Mt { .. } => "MT",
		}
	}

	pub fn is_currency(&self) -> bool {
		matches!(self, TezosAssetType::Xtz | TezosAssetType::Fa12 { .. })
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TezosAsset {
	pub asset_type: TezosAssetType,
	/// Decimal amount
	pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TezosOrderData {
	pub payouts: Vec<TezosPart>,
	pub origin_fees: Vec<TezosPart>,
}

/// Order as reported by the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TezosOrder {
	pub hash: String,
	pub maker: String,
	/// Maker public key
	pub maker_edpk: String,
	pub taker: Option<String>,
	pub make: TezosAsset,
	pub take: TezosAsset,
	pub fill: String,
	pub make_stock: String,
	pub cancelled: bool,
	pub salt: String,
	pub signature: Option<String>,
	pub created_at: DateTime<Utc>,
	pub last_updated_at: DateTime<Utc>,
	pub data: TezosOrderData,
}

/// Signed order sent to the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TezosOrderForm {
	pub maker: String,
	pub maker_edpk: String,
	pub taker: Option<String>,
	pub make: TezosAsset,
	pub take: TezosAsset,
	pub salt: String,
	pub data: TezosOrderData,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub signature: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TezosCollectionType {
	Nft,
	Mt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TezosCollection {
	pub id: String,
	#[serde(rename = "type")]
	pub kind: TezosCollectionType,
	pub name: String,
	pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TezosItem {
	pub id: String,
	pub contract: String,
	pub token_id: String,
	pub creators: Vec<TezosPart>,
	pub supply: String,
	pub lazy_supply: String,
	pub owners: Vec<String>,
	pub royalties: Vec<TezosPart>,
	pub date: DateTime<Utc>,
	pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TezosOwnership {
	pub id: String,
	pub contract: String,
	pub token_id: String,
	pub owner: String,
	pub value: String,
	pub lazy_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TezosMintForm {
	pub contract: String,
	pub owner: String,
	pub amount: u64,
	pub uri: String,
	pub creators: Vec<TezosPart>,
	pub royalties: Vec<TezosPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TezosFillForm {
	pub order_hash: String,
	pub amount: u64,
	pub infinite_approval: bool,
	pub payouts: Vec<TezosPart>,
	pub origin_fees: Vec<TezosPart>,
}

#[derive(Debug, Clone)]
pub struct TezosMintOutcome {
	pub transaction: Arc<dyn NativeTransaction>,
	pub token_id: String,
}
