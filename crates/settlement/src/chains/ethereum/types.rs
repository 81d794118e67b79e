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


//! Native EVM indexer and exchange types

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tessera_sdk::{
	NativeTransaction, OpenSeaFeeMethod, OpenSeaHowToCall, OpenSeaSaleKind, OpenSeaSide, OrderSide,
};

/// Account share in basis points, with a raw `0x` address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthPart {
	pub account: String,
	pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
	tag = "assetClass",
	rename_all = "SCREAMING_SNAKE_CASE",
	rename_all_fields = "camelCase"
)]
pub enum EthAssetType {
	Eth,
	Erc20 {
		contract: String,
	},
	Erc721 {
		contract: String,
		token_id: String,
	},
	Erc721Lazy {
		contract: String,
		token_id: String,
		uri: String,
		creators: Vec<EthPart>,
		royalties: Vec<EthPart>,
		signatures: Vec<String>,
	},
	Erc1155 {
		contract: String,
		token_id: String,
	},
	Erc1155Lazy {
		contract: String,
		token_id: String,
		uri: String,
		/// Older indexers omit the supply of lazy items
		supply: Option<String>,
		creators: Vec<EthPart>,
		royalties: Vec<EthPart>,
		signatures: Vec<String>,
	},
	GenArt {
		contract: String,
	},
	CryptoPunks {
		contract: String,
		token_id: u64,
	},
}

impl EthAssetType {
	pub fn class(&self) -> &'static str {
		match self {
			EthAssetType::Eth => "ETH",
			EthAssetType::Erc20 { .. } => "ERC20",
			EthAssetType::Erc721 { .. } => "ERC721",
			EthAssetType::Erc721Lazy { .. } => "ERC721_LAZY",
			EthAssetType::Erc1155 { .. } => "ERC1155",
			EthAssetType::Erc1155Lazy { .. } => "ERC1155_LAZY",
			EthAssetType::GenArt { .. } => "GEN_ART",
			EthAssetType::CryptoPunks { .. } => "CRYPTO_PUNKS",
		}
	}

	pub fn is_currency(&self) -> bool {
		matches!(self, EthAssetType::Eth | EthAssetType::Erc20 { .. })
	}

	pub fn is_semi_fungible(&self) -> bool {
		matches!(
			self,
			EthAssetType::Erc1155 { .. } | EthAssetType::Erc1155Lazy { .. }
		)
	}
}

/// Asset amount in base units, with the decimal value when the indexer knows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthAsset {
	pub asset_type: EthAssetType,
	pub value: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value_decimal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "dataType", rename_all_fields = "camelCase")]
pub enum EthOrderData {
	#[serde(rename = "LEGACY")]
	Legacy { fee: u32 },
	#[serde(rename = "RARIBLE_V2_DATA_V1")]
	RaribleV2DataV1 {
		payouts: Vec<EthPart>,
		origin_fees: Vec<EthPart>,
	},
	#[serde(rename = "RARIBLE_V2_DATA_V3_SELL")]
	RaribleV2DataV3Sell {
		payout: Option<EthPart>,
		origin_fee_first: Option<EthPart>,
		origin_fee_second: Option<EthPart>,
		max_fees_base_point: u32,
		marketplace_marker: Option<String>,
	},
	#[serde(rename = "RARIBLE_V2_DATA_V3_BUY")]
	RaribleV2DataV3Buy {
		payout: Option<EthPart>,
		origin_fee_first: Option<EthPart>,
		origin_fee_second: Option<EthPart>,
		marketplace_marker: Option<String>,
	},
	#[serde(rename = "OPEN_SEA_V1_DATA_V1")]
	OpenSeaV1DataV1 {
		exchange: String,
		maker_relayer_fee: String,
		taker_relayer_fee: String,
		maker_protocol_fee: String,
		taker_protocol_fee: String,
		fee_recipient: String,
		fee_method: OpenSeaFeeMethod,
		side: OpenSeaSide,
		sale_kind: OpenSeaSaleKind,
		how_to_call: OpenSeaHowToCall,
		call_data: String,
		replacement_pattern: String,
		static_target: String,
		static_extra_data: String,
		extra: String,
	},
	#[serde(rename = "CRYPTO_PUNKS_DATA")]
	CryptoPunksData,
}

impl EthOrderData {
	pub fn data_type(&self) -> &'static str {
		match self {
			EthOrderData::Legacy { .. } => "LEGACY",
			EthOrderData::RaribleV2DataV1 { .. } => "RARIBLE_V2_DATA_V1",
			EthOrderData::RaribleV2DataV3Sell { .. } => "RARIBLE_V2_DATA_V3_SELL",
			EthOrderData::RaribleV2DataV3Buy { .. } => "RARIBLE_V2_DATA_V3_BUY",
			EthOrderData::OpenSeaV1DataV1 { .. } => "OPEN_SEA_V1_DATA_V1",
			EthOrderData::CryptoPunksData => "CRYPTO_PUNKS_DATA",
		}
	}
}

/// Exchange history attached to an indexed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
	tag = "type",
	rename_all = "SCREAMING_SNAKE_CASE",
	rename_all_fields = "camelCase"
)]
pub enum EthOrderExchangeHistory {
	Cancel {
		hash: String,
		date: DateTime<Utc>,
		make: Option<EthAsset>,
		take: Option<EthAsset>,
		maker: Option<String>,
		owner: Option<String>,
	},
	OrderSideMatch {
		hash: String,
		date: DateTime<Utc>,
		make: Option<EthAsset>,
		take: Option<EthAsset>,
		maker: Option<String>,
		taker: Option<String>,
		side: Option<OrderSide>,
		fill: Option<String>,
		counter_hash: Option<String>,
	},
	OnChainOrder {
		hash: String,
		date: DateTime<Utc>,
		make: Option<EthAsset>,
		take: Option<EthAsset>,
		maker: Option<String>,
	},
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthPriceHistoryRecord {
	pub date: DateTime<Utc>,
	pub make_value: String,
	pub take_value: String,
}

/// Order as reported by the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthOrder {
	pub hash: String,
	pub maker: String,
	pub taker: Option<String>,
	pub make: EthAsset,
	pub take: EthAsset,
	/// Filled token amount
	pub fill: String,
	/// Remaining make amount in base units
	pub make_stock: String,
	pub make_stock_value: Option<String>,
	pub cancelled: bool,
	pub salt: String,
	pub signature: Option<String>,
	pub created_at: DateTime<Utc>,
	pub last_updated_at: DateTime<Utc>,
	pub make_price: Option<String>,
	pub take_price: Option<String>,
	#[serde(default)]
	pub pending: Vec<EthOrderExchangeHistory>,
	#[serde(default)]
	pub price_history: Vec<EthPriceHistoryRecord>,
	pub data: EthOrderData,
}

/// Unsigned or signed order submitted to the order book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthOrderForm {
	pub maker: String,
	pub taker: Option<String>,
	pub make: EthAsset,
	pub take: EthAsset,
	pub salt: String,
	pub data: EthOrderData,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub signature: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EthCollectionType {
	Erc721,
	Erc1155,
	CryptoPunks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EthCollectionFeature {
	/// Lazy minting
	MintAndTransfer,
	SecondarySaleFees,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthCollection {
	pub id: String,
	#[serde(rename = "type")]
	pub kind: EthCollectionType,
	pub name: String,
	pub owner: Option<String>,
	#[serde(default)]
	pub features: Vec<EthCollectionFeature>,
}

impl EthCollection {
	pub fn has_feature(&self, feature: EthCollectionFeature) -> bool {
		self.features.contains(&feature)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthItem {
	/// `<contract>:<tokenId>`
	pub id: String,
	pub contract: String,
	pub token_id: String,
	#[serde(default)]
	pub creators: Vec<EthPart>,
	pub supply: String,
	pub lazy_supply: String,
	pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthOwnership {
	pub id: String,
	pub contract: String,
	pub token_id: String,
	pub owner: String,
	pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthBalance {
	pub owner: String,
	/// Base units
	pub balance: String,
	pub decimal_balance: String,
}

/// Token to mint, on-chain or as a signed lazy item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthMintForm {
	pub contract: String,
	pub token_id: String,
	pub uri: String,
	pub supply: String,
	pub creators: Vec<EthPart>,
	pub royalties: Vec<EthPart>,
	#[serde(default)]
	pub signatures: Vec<String>,
}

/// Match of an indexed order by the connected wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthFillForm {
	pub order_hash: String,
	/// Token amount to match
	pub amount: u64,
	pub infinite_approval: bool,
	pub payouts: Vec<EthPart>,
	pub origin_fees: Vec<EthPart>,
	pub max_fees_base_point: Option<u32>,
	pub marketplace_marker: Option<String>,
}

/// Outcome of a mint
#[derive(Debug, Clone)]
pub struct EthMintOutcome {
	pub contract: String,
	pub token_id: String,
	/// `None` for lazy mints
	pub transaction: Option<Arc<dyn NativeTransaction>>,
}
