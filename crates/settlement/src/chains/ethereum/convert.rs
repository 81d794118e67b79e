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


//! Translation between native EVM and canonical shapes

use tessera_sdk::{
	Asset, AssetType, BigNumber, Binary, Blockchain, Order, OrderData, OrderStatus,
	PendingOrderEvent, Platform, PriceHistoryRecord, SdkError,
};

use super::common::{
	to_native_address, to_native_part, to_native_parts, to_union_address, to_union_order_id,
	to_union_part, to_union_parts,
};
use super::types::{EthAsset, EthAssetType, EthOrder, EthOrderData, EthOrderExchangeHistory};

/// Native EVM asset type to canonical
pub fn to_union_asset_type(
	blockchain: Blockchain,
	asset_type: &EthAssetType,
) -> Result<AssetType, SdkError> {
	let contract = |address: &str| to_union_address(blockchain, address);
	let token = |token_id: &str| BigNumber::parse(token_id);
	let signatures = |signatures: &[String]| -> Result<Vec<Binary>, SdkError> {
		signatures.iter().map(|s| Binary::parse(s)).collect()
	};

	match asset_type {
		EthAssetType::Eth => Ok(AssetType::Native { blockchain }),
		EthAssetType::Erc20 { contract: address } => Ok(AssetType::Fungible {
			contract: contract(address)?,
		}),
		EthAssetType::Erc721 {
			contract: address,
			token_id,
		} => Ok(AssetType::NonFungible {
			contract: contract(address)?,
			token_id: token(token_id)?,
		}),
		EthAssetType::Erc721Lazy {
			contract: address,
			token_id,
			uri,
			creators,
			royalties,
			signatures: sigs,
		} => Ok(AssetType::NonFungibleLazy {
			contract: contract(address)?,
			token_id: token(token_id)?,
			uri: uri.clone(),
			creators: to_union_parts(blockchain, creators)?,
			royalties: to_union_parts(blockchain, royalties)?,
			signatures: signatures(sigs)?,
		}),
		EthAssetType::Erc1155 {
			contract: address,
			token_id,
		} => Ok(AssetType::SemiFungible {
			contract: contract(address)?,
			token_id: token(token_id)?,
		}),
		EthAssetType::Erc1155Lazy {
			contract: address,
			token_id,
			uri,
			supply,
			creators,
			royalties,
			signatures: sigs,
		} => Ok(AssetType::SemiFungibleLazy {
			contract: contract(address)?,
			token_id: token(token_id)?,
			uri: uri.clone(),
			supply: BigNumber::parse(supply.as_deref().unwrap_or("1"))?,
			creators: to_union_parts(blockchain, creators)?,
			royalties: to_union_parts(blockchain, royalties)?,
			signatures: signatures(sigs)?,
		}),
		EthAssetType::GenArt { contract: address } => Ok(AssetType::GenArt {
			contract: contract(address)?,
		}),
		EthAssetType::CryptoPunks { .. } => {
			Err(SdkError::UnsupportedAssetType(asset_type.class().to_string()))
		}
	}
}

/// Canonical asset type to native EVM
pub fn to_native_asset_type(
	blockchain: Blockchain,
	asset_type: &AssetType,
) -> Result<EthAssetType, SdkError> {
	let signatures = |signatures: &[Binary]| -> Vec<String> {
		signatures.iter().map(|s| s.as_str().to_string()).collect()
	};

	match asset_type {
		AssetType::Native { blockchain: chain } => {
			if *chain != blockchain {
				return Err(SdkError::WrongChain {
					expected: blockchain,
					actual: *chain,
				});
			}
			Ok(EthAssetType::Eth)
		}
		AssetType::Fungible { contract } => Ok(EthAssetType::Erc20 {
			contract: to_native_address(blockchain, contract)?,
		}),
		AssetType::NonFungible { contract, token_id } => Ok(EthAssetType::Erc721 {
			contract: to_native_address(blockchain, contract)?,
			token_id: token_id.normalized(),
		}),
		AssetType::NonFungibleLazy {
			contract,
			token_id,
			uri,
			creators,
			royalties,
			signatures: sigs,
		} => Ok(EthAssetType::Erc721Lazy {
			contract: to_native_address(blockchain, contract)?,
			token_id: token_id.normalized(),
			uri: uri.clone(),
			creators: to_native_parts(blockchain, creators)?,
			royalties: to_native_parts(blockchain, royalties)?,
			signatures: signatures(sigs),
		}),
		AssetType::SemiFungible { contract, token_id } => Ok(EthAssetType::Erc1155 {
			contract: to_native_address(blockchain, contract)?,
			token_id: token_id.normalized(),
		}),
		AssetType::SemiFungibleLazy {
			contract,
			token_id,
			uri,
			supply,
			creators,
			royalties,
			signatures: sigs,
		} => Ok(EthAssetType::Erc1155Lazy {
			contract: to_native_address(blockchain, contract)?,
			token_id: token_id.normalized(),
			uri: uri.clone(),
			supply: Some(supply.normalized()),
			creators: to_native_parts(blockchain, creators)?,
			royalties: to_native_parts(blockchain, royalties)?,
			signatures: signatures(sigs),
		}),
		AssetType::GenArt { contract } => Ok(EthAssetType::GenArt {
			contract: to_native_address(blockchain, contract)?,
		}),
	}
}

/// Native asset to canonical, preferring the decimal value
pub fn to_union_asset(blockchain: Blockchain, asset: &EthAsset) -> Result<Asset, SdkError> {
	Ok(Asset {
		asset_type: to_union_asset_type(blockchain, &asset.asset_type)?,
		value: BigNumber::parse(asset.value_decimal.as_deref().unwrap_or(&asset.value))?,
	})
}

fn optional_part(
	blockchain: Blockchain,
	part: &Option<super::types::EthPart>,
) -> Result<Option<tessera_sdk::Part>, SdkError> {
	part.as_ref().map(|p| to_union_part(blockchain, p)).transpose()
}

fn optional_native_part(
	blockchain: Blockchain,
	part: &Option<tessera_sdk::Part>,
) -> Result<Option<super::types::EthPart>, SdkError> {
	part.as_ref().map(|p| to_native_part(blockchain, p)).transpose()
}

fn optional_binary(value: &Option<String>) -> Result<Option<Binary>, SdkError> {
	value.as_deref().map(Binary::parse).transpose()
}

pub fn to_union_order_data(
	blockchain: Blockchain,
	data: &EthOrderData,
) -> Result<OrderData, SdkError> {
	match data {
		EthOrderData::Legacy { fee } => Ok(OrderData::EthRaribleV1 { fee: *fee }),
		EthOrderData::RaribleV2DataV1 {
			payouts,
			origin_fees,
		} => Ok(OrderData::EthRaribleV2 {
			payouts: to_union_parts(blockchain, payouts)?,
			origin_fees: to_union_parts(blockchain, origin_fees)?,
		}),
		EthOrderData::RaribleV2DataV3Sell {
			payout,
			origin_fee_first,
			origin_fee_second,
			max_fees_base_point,
			marketplace_marker,
		} => Ok(OrderData::EthRaribleV2DataV3Sell {
			payout: optional_part(blockchain, payout)?,
			origin_fee_first: optional_part(blockchain, origin_fee_first)?,
			origin_fee_second: optional_part(blockchain, origin_fee_second)?,
			max_fees_base_point: *max_fees_base_point,
			marketplace_marker: optional_binary(marketplace_marker)?,
		}),
		EthOrderData::RaribleV2DataV3Buy {
			payout,
			origin_fee_first,
			origin_fee_second,
			marketplace_marker,
		} => Ok(OrderData::EthRaribleV2DataV3Buy {
			payout: optional_part(blockchain, payout)?,
			origin_fee_first: optional_part(blockchain, origin_fee_first)?,
			origin_fee_second: optional_part(blockchain, origin_fee_second)?,
			marketplace_marker: optional_binary(marketplace_marker)?,
		}),
		EthOrderData::OpenSeaV1DataV1 {
			exchange,
			maker_relayer_fee,
			taker_relayer_fee,
			maker_protocol_fee,
			taker_protocol_fee,
			fee_recipient,
			fee_method,
			side,
			sale_kind,
			how_to_call,
			call_data,
			replacement_pattern,
			static_target,
			static_extra_data,
			extra,
		} => Ok(OrderData::EthOpenSeaV1 {
			exchange: to_union_address(blockchain, exchange)?,
			maker_relayer_fee: BigNumber::parse(maker_relayer_fee)?,
			taker_relayer_fee: BigNumber::parse(taker_relayer_fee)?,
			maker_protocol_fee: BigNumber::parse(maker_protocol_fee)?,
			taker_protocol_fee: BigNumber::parse(taker_protocol_fee)?,
			fee_recipient: to_union_address(blockchain, fee_recipient)?,
			fee_method: *fee_method,
			side: *side,
			sale_kind: *sale_kind,
			how_to_call: *how_to_call,
			call_data: Binary::parse(call_data)?,
			replacement_pattern: Binary::parse(replacement_pattern)?,
			static_target: to_union_address(blockchain, static_target)?,
			static_extra_data: Binary::parse(static_extra_data)?,
			extra: BigNumber::parse(extra)?,
		}),
		EthOrderData::CryptoPunksData => {
			Err(SdkError::UnsupportedOrderData(data.data_type().to_string()))
		}
	}
}

pub fn to_native_order_data(
	blockchain: Blockchain,
	data: &OrderData,
) -> Result<EthOrderData, SdkError> {
	let marker = |m: &Option<Binary>| m.as_ref().map(|b| b.as_str().to_string());

	match data {
		OrderData::EthRaribleV1 { fee } => Ok(EthOrderData::Legacy { fee: *fee }),
		OrderData::EthRaribleV2 {
			payouts,
			origin_fees,
		} => Ok(EthOrderData::RaribleV2DataV1 {
			payouts: to_native_parts(blockchain, payouts)?,
			origin_fees: to_native_parts(blockchain, origin_fees)?,
		}),
		OrderData::EthRaribleV2DataV3Sell {
			payout,
			origin_fee_first,
			origin_fee_second,
			max_fees_base_point,
			marketplace_marker,
		} => Ok(EthOrderData::RaribleV2DataV3Sell {
			payout: optional_native_part(blockchain, payout)?,
			origin_fee_first: optional_native_part(blockchain, origin_fee_first)?,
			origin_fee_second: optional_native_part(blockchain, origin_fee_second)?,
			max_fees_base_point: *max_fees_base_point,
			marketplace_marker: marker(marketplace_marker),
		}),
		OrderData::EthRaribleV2DataV3Buy {
			payout,
			origin_fee_first,
			origin_fee_second,
			marketplace_marker,
		} => Ok(EthOrderData::RaribleV2DataV3Buy {
			payout: optional_native_part(blockchain, payout)?,
			origin_fee_first: optional_native_part(blockchain, origin_fee_first)?,
			origin_fee_second: optional_native_part(blockchain, origin_fee_second)?,
			marketplace_marker: marker(marketplace_marker),
		}),
		OrderData::EthOpenSeaV1 {
			exchange,
			maker_relayer_fee,
			taker_relayer_fee,
			maker_protocol_fee,
			taker_protocol_fee,
			fee_recipient,
			fee_method,
			side,
			sale_kind,
			how_to_call,
			call_data,
			replacement_pattern,
			static_target,
			static_extra_data,
			extra,
		} => Ok(EthOrderData::OpenSeaV1DataV1 {
			exchange: to_native_address(blockchain, exchange)?,
			maker_relayer_fee: maker_relayer_fee.normalized(),
			taker_relayer_fee: taker_relayer_fee.normalized(),
			maker_protocol_fee: maker_protocol_fee.normalized(),
			taker_protocol_fee: taker_protocol_fee.normalized(),
			fee_recipient: to_native_address(blockchain, fee_recipient)?,
			fee_method: *fee_method,
			side: *side,
			sale_kind: *sale_kind,
			how_to_call: *how_to_call,
			call_data: call_data.as_str().to_string(),
			replacement_pattern: replacement_pattern.as_str().to_string(),
			static_target: to_native_address(blockchain, static_target)?,
			static_extra_data: static_extra_data.as_str().to_string(),
			extra: extra.normalized(),
		}),
		OrderData::FlowRaribleV1 { .. } | OrderData::TezosRaribleV2 { .. } => {
			Err(SdkError::UnsupportedOrderData(data.tag().to_string()))
		}
	}
}

fn optional_asset(blockchain: Blockchain, asset: &Option<EthAsset>) -> Result<Option<Asset>, SdkError> {
	asset.as_ref().map(|a| to_union_asset(blockchain, a)).transpose()
}

fn optional_address(
	blockchain: Blockchain,
	address: &Option<String>,
) -> Result<Option<tessera_sdk::UnionAddress>, SdkError> {
	address.as_deref().map(|a| to_union_address(blockchain, a)).transpose()
}

/// Exchange history to a pending order event
pub fn to_union_pending_event(
	blockchain: Blockchain,
	event: &EthOrderExchangeHistory,
) -> Result<PendingOrderEvent, SdkError> {
	match event {
		EthOrderExchangeHistory::Cancel {
			hash,
			date,
			make,
			take,
			maker,
			owner,
		} => Ok(PendingOrderEvent::Cancel {
			id: to_union_order_id(blockchain, hash)?,
			date: *date,
			make: optional_asset(blockchain, make)?,
			take: optional_asset(blockchain, take)?,
			maker: optional_address(blockchain, maker)?,
			owner: optional_address(blockchain, owner)?,
		}),
		EthOrderExchangeHistory::OrderSideMatch {
			hash,
			date,
			make,
			take,
			maker,
			taker,
			side,
			fill,
			counter_hash,
		} => Ok(PendingOrderEvent::OrderSideMatch {
			id: to_union_order_id(blockchain, hash)?,
			date: *date,
			make: optional_asset(blockchain, make)?,
			take: optional_asset(blockchain, take)?,
			maker: optional_address(blockchain, maker)?,
			taker: optional_address(blockchain, taker)?,
			side: *side,
			fill: fill.as_deref().map(BigNumber::parse).transpose()?,
			counter_hash: optional_binary(counter_hash)?,
		}),
		EthOrderExchangeHistory::OnChainOrder { .. } => Err(SdkError::UnsupportedHistoryEvent(
			"ON_CHAIN_ORDER".to_string(),
		)),
	}
}

/// Indexed order to canonical
pub fn to_union_order(blockchain: Blockchain, order: &EthOrder) -> Result<Order, SdkError> {
	let fill = BigNumber::parse(&order.fill)?;
	let make_stock = BigNumber::parse(
		order
			.make_stock_value
			.as_deref()
			.unwrap_or(&order.make_stock),
	)?;
	let platform = match order.data {
		EthOrderData::OpenSeaV1DataV1 { .. } => Platform::OpenSea,
		_ => Platform::Rarible,
	};

	Ok(Order {
		id: to_union_order_id(blockchain, &order.hash)?,
		status: OrderStatus::derive(order.cancelled, &make_stock, &fill),
		fill,
		platform,
		make_stock,
		cancelled: order.cancelled,
		created_at: order.created_at,
		last_updated_at: order.last_updated_at,
		make_price: order.make_price.as_deref().map(BigNumber::parse).transpose()?,
		take_price: order.take_price.as_deref().map(BigNumber::parse).transpose()?,
		maker: to_union_address(blockchain, &order.maker)?,
		taker: optional_address(blockchain, &order.taker)?,
		make: to_union_asset(blockchain, &order.make)?,
		take: to_union_asset(blockchain, &order.take)?,
		salt: order.salt.clone(),
		signature: optional_binary(&order.signature)?,
		pending: order
			.pending
			.iter()
			.map(|e| to_union_pending_event(blockchain, e))
			.collect::<Result<_, _>>()?,
		price_history: order
			.price_history
			.iter()
			.map(|r| {
				Ok(PriceHistoryRecord {
					date: r.date,
					make_value: BigNumber::parse(&r.make_value)?,
					take_value: BigNumber::parse(&r.take_value)?,
				})
			})
			.collect::<Result<_, SdkError>>()?,
		data: to_union_order_data(blockchain, &order.data)?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chains::ethereum::types::EthPart;
	use chrono::Utc;
	use tessera_sdk::{OpenSeaFeeMethod, OpenSeaHowToCall, OpenSeaSaleKind, OpenSeaSide};

	const CONTRACT: &str = "0x6ede7f3c26975aad32a475e1021d8f6f39c89d82";
	const MAKER: &str = "0x1f90b8f6b5c1e43b9e2d5a7a1a8a0f6e7b8c9d0e";

	fn part(value: u32) -> EthPart {
		EthPart {
			account: MAKER.to_string(),
			value,
		}
	}

	fn open_sea_data() -> EthOrderData {
		EthOrderData::OpenSeaV1DataV1 {
			exchange: CONTRACT.to_string(),
			maker_relayer_fee: "0".to_string(),
			taker_relayer_fee: "250".to_string(),
			maker_protocol_fee: "0".to_string(),
			taker_protocol_fee: "0".to_string(),
			fee_recipient: MAKER.to_string(),
			fee_method: OpenSeaFeeMethod::SplitFee,
			side: OpenSeaSide::Sell,
			sale_kind: OpenSeaSaleKind::FixedPrice,
			how_to_call: OpenSeaHowToCall::Call,
			call_data: "0xf242432a".to_string(),
			replacement_pattern: "0x000000ff".to_string(),
			static_target: "0x0000000000000000000000000000000000000000".to_string(),
			static_extra_data: "0x".to_string(),
			extra: "0".to_string(),
		}
	}

	fn order(make: EthAsset, take: EthAsset, data: EthOrderData) -> EthOrder {
		EthOrder {
			hash: format!("0x{}", "ab".repeat(32)),
			maker: MAKER.to_string(),
			taker: None,
			make,
			take,
			fill: "0".to_string(),
			make_stock: "1".to_string(),
			make_stock_value: None,
			cancelled: false,
			salt: "1".to_string(),
			signature: Some("0x1234".to_string()),
			created_at: Utc::now(),
			last_updated_at: Utc::now(),
			make_price: Some("0.0000004".to_string()),
			take_price: None,
			pending: Vec::new(),
			price_history: Vec::new(),
			data,
		}
	}

	fn nft() -> EthAsset {
		EthAsset {
			asset_type: EthAssetType::Erc721 {
				contract: CONTRACT.to_string(),
				token_id: "7".to_string(),
			},
			value: "1".to_string(),
			value_decimal: None,
		}
	}

	fn eth(value: &str, decimal: &str) -> EthAsset {
		EthAsset {
			asset_type: EthAssetType::Eth,
			value: value.to_string(),
			value_decimal: Some(decimal.to_string()),
		}
	}

	#[test]
	fn test_asset_types_round_trip() {
		let asset_types = vec![
			EthAssetType::Eth,
			EthAssetType::Erc20 {
				contract: CONTRACT.to_string(),
			},
			nft().asset_type,
			EthAssetType::Erc721Lazy {
				contract: CONTRACT.to_string(),
				token_id: "8".to_string(),
				uri: "ipfs://item".to_string(),
				creators: vec![part(10000)],
				royalties: vec![part(1000)],
				signatures: vec!["0xabcd".to_string()],
			},
			EthAssetType::Erc1155 {
				contract: CONTRACT.to_string(),
				token_id: "9".to_string(),
			},
			EthAssetType::Erc1155Lazy {
				contract: CONTRACT.to_string(),
				token_id: "10".to_string(),
				uri: "ipfs://multi".to_string(),
				supply: Some("25".to_string()),
				creators: vec![part(10000)],
				royalties: Vec::new(),
				signatures: vec!["0xabcd".to_string()],
			},
			EthAssetType::GenArt {
				contract: CONTRACT.to_string(),
			},
		];

		for asset_type in asset_types {
			let union = to_union_asset_type(Blockchain::Polygon, &asset_type).unwrap();
			assert_eq!(union.blockchain(), Blockchain::Polygon);
			assert_eq!(to_native_asset_type(Blockchain::Polygon, &union).unwrap(), asset_type);
		}
	}

	#[test]
	fn test_lazy_semi_fungible_supply_defaults_to_one() {
		let lazy = EthAssetType::Erc1155Lazy {
			contract: CONTRACT.to_string(),
			token_id: "10".to_string(),
			uri: "ipfs://multi".to_string(),
			supply: None,
			creators: Vec::new(),
			royalties: Vec::new(),
			signatures: Vec::new(),
		};
		match to_union_asset_type(Blockchain::Ethereum, &lazy).unwrap() {
			AssetType::SemiFungibleLazy { supply, .. } => assert_eq!(supply.as_str(), "1"),
			other => panic!("unexpected asset type {:?}", other),
		}
	}

	#[test]
	fn test_crypto_punks_unsupported() {
		let punks = EthAssetType::CryptoPunks {
			contract: CONTRACT.to_string(),
			token_id: 1,
		};
		match to_union_asset_type(Blockchain::Ethereum, &punks) {
			Err(SdkError::UnsupportedAssetType(tag)) => assert_eq!(tag, "CRYPTO_PUNKS"),
			other => panic!("unexpected result {:?}", other),
		}
		match to_union_order_data(Blockchain::Ethereum, &EthOrderData::CryptoPunksData) {
			Err(SdkError::UnsupportedOrderData(tag)) => assert_eq!(tag, "CRYPTO_PUNKS_DATA"),
			other => panic!("unexpected result {:?}", other),
		}
	}

	#[test]
	fn test_foreign_native_currency_rejected() {
		let result = to_native_asset_type(
			Blockchain::Ethereum,
			&AssetType::Native {
				blockchain: Blockchain::Polygon,
			},
		);
		assert!(matches!(result, Err(SdkError::WrongChain { .. })));
	}

	#[test]
	fn test_order_data_round_trip() {
		let datas = vec![
			EthOrderData::Legacy { fee: 250 },
			EthOrderData::RaribleV2DataV1 {
				payouts: vec![part(10000)],
				origin_fees: vec![part(100)],
			},
			EthOrderData::RaribleV2DataV3Sell {
				payout: Some(part(10000)),
				origin_fee_first: Some(part(100)),
				origin_fee_second: None,
				max_fees_base_point: 500,
				marketplace_marker: Some("0x00000000000000000000000000000000000000000000000000000000000000ff".to_string()),
			},
			EthOrderData::RaribleV2DataV3Buy {
				payout: None,
				origin_fee_first: None,
				origin_fee_second: None,
				marketplace_marker: None,
			},
			open_sea_data(),
		];

		for data in datas {
			let union = to_union_order_data(Blockchain::Ethereum, &data).unwrap();
			assert_eq!(to_native_order_data(Blockchain::Ethereum, &union).unwrap(), data);
		}
	}

	#[test]
	fn test_open_sea_patterns_translated_independently() {
		match to_union_order_data(Blockchain::Ethereum, &open_sea_data()).unwrap() {
			OrderData::EthOpenSeaV1 {
				call_data,
				replacement_pattern,
				..
			} => {
				assert_eq!(call_data.as_str(), "0xf242432a");
				assert_eq!(replacement_pattern.as_str(), "0x000000ff");
			}
			other => panic!("unexpected order data {:?}", other),
		}
	}

	#[test]
	fn test_foreign_order_data_rejected() {
		let flow = OrderData::FlowRaribleV1 {
			payouts: Vec::new(),
			origin_fees: Vec::new(),
		};
		assert!(matches!(
			to_native_order_data(Blockchain::Ethereum, &flow),
			Err(SdkError::UnsupportedOrderData(tag)) if tag == "FLOW_RARIBLE_V1"
		));
	}

	#[test]
	fn test_order_translation() {
		let native = order(
			nft(),
			eth("400000000000", "0.0000004"),
			EthOrderData::RaribleV2DataV1 {
				payouts: vec![part(10000)],
				origin_fees: Vec::new(),
			},
		);
		let union = to_union_order(Blockchain::Ethereum, &native).unwrap();

		assert_eq!(union.id.native(), native.hash);
		assert_eq!(union.platform, Platform::Rarible);
		assert_eq!(union.status, OrderStatus::Active);
		assert_eq!(union.take.value.as_str(), "0.0000004");
		assert_eq!(union.maker.as_str(), format!("ETHEREUM:{}", MAKER));
		assert_eq!(union.data.tag(), "ETH_RARIBLE_V2");

		let mut filled = native.clone();
		filled.make_stock = "0".to_string();
		filled.fill = "1".to_string();
		assert_eq!(
			to_union_order(Blockchain::Ethereum, &filled).unwrap().status,
			OrderStatus::Filled
		);

		let mut open_sea = native;
		open_sea.data = open_sea_data();
		assert_eq!(
			to_union_order(Blockchain::Ethereum, &open_sea).unwrap().platform,
			Platform::OpenSea
		);
	}

	#[test]
	fn test_exchange_history() {
		let hash = format!("0x{}", "cd".repeat(32));
		let side_match = EthOrderExchangeHistory::OrderSideMatch {
			hash: hash.clone(),
			date: Utc::now(),
			make: Some(nft()),
			take: None,
			maker: Some(MAKER.to_string()),
			taker: None,
			side: Some(tessera_sdk::OrderSide::Left),
			fill: Some("1".to_string()),
			counter_hash: Some(format!("0x{}", "ef".repeat(32))),
		};
		match to_union_pending_event(Blockchain::Ethereum, &side_match).unwrap() {
			PendingOrderEvent::OrderSideMatch { id, fill, .. } => {
				assert_eq!(id.as_str(), format!("ETHEREUM:{}", hash));
				assert_eq!(fill.unwrap().as_str(), "1");
			}
			other => panic!("unexpected event {:?}", other),
		}

		let cancel = EthOrderExchangeHistory::Cancel {
			hash: hash.clone(),
			date: Utc::now(),
			make: None,
			take: None,
			maker: None,
			owner: Some(MAKER.to_string()),
		};
		assert!(matches!(
			to_union_pending_event(Blockchain::Ethereum, &cancel).unwrap(),
			PendingOrderEvent::Cancel { .. }
		));

		let on_chain = EthOrderExchangeHistory::OnChainOrder {
			hash,
			date: Utc::now(),
			make: None,
			take: None,
			maker: None,
		};
		assert!(matches!(
			to_union_pending_event(Blockchain::Ethereum, &on_chain),
			Err(SdkError::UnsupportedHistoryEvent(_))
		));
	}
}
