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


//! Translation between native Tezos and canonical shapes

use tessera_sdk::{
	Asset, AssetType, BigNumber, Binary, Blockchain, ContractAddress, Order, OrderData,
	OrderStatus, Platform, SdkError,
};

use super::common::{
	parse_contract, to_native_parts, to_union_address, to_union_order_id, to_union_parts,
};
use super::types::{TezosAsset, TezosAssetType, TezosOrder, TezosOrderData};

fn to_union_contract(native: &str) -> Result<ContractAddress, SdkError> {
	ContractAddress::new(Blockchain::Tezos, parse_contract(native)?)
}

fn to_native_contract(contract: &ContractAddress) -> Result<String, SdkError> {
	Ok(parse_contract(contract.ensure_chain(Blockchain::Tezos)?)?.to_string())
}

pub fn to_union_asset_type(asset_type: &TezosAssetType) -> Result<AssetType, SdkError> {
	match asset_type {
		TezosAssetType::Xtz => Ok(AssetType::Native {
			blockchain: Blockchain::Tezos,
		}),
		TezosAssetType::Fa12 { contract } => Ok(AssetType::Fungible {
			contract: to_union_contract(contract)?,
		}),
		TezosAssetType::Nft { contract, token_id } => Ok(AssetType::NonFungible {
			contract: to_union_contract(contract)?,
			token_id: BigNumber::parse(token_id)?,
		}),
		TezosAssetType::Mt { contract, token_id } => Ok(AssetType::SemiFungible {
			contract: to_union_contract(contract)?,
			token_id: BigNumber::parse(token_id)?,
		}),
	}
}

pub fn to_native_asset_type(asset_type: &AssetType) -> Result<TezosAssetType, SdkError> {
	match asset_type {
		AssetType::Native { blockchain } => {
			if *blockchain != Blockchain::Tezos {
				return Err(SdkError::WrongChain {
					expected: Blockchain::Tezos,
					actual: *blockchain,
				});
			}
			Ok(TezosAssetType::Xtz)
		}
		AssetType::Fungible { contract } => Ok(TezosAssetType::Fa12 {
			contract: to_native_contract(contract)?,
		}),
		AssetType::NonFungible { contract, token_id } => Ok(TezosAssetType::Nft {
			contract: to_native_contract(contract)?,
			token_id: token_id.normalized(),
		}),
		AssetType::SemiFungible { contract, token_id } => Ok(TezosAssetType::Mt {
			contract: to_native_contract(contract)?,
			token_id: token_id.normalized(),
		}),
		other => Err(SdkError::UnsupportedAssetType(other.tag().to_string())),
	}
}

pub fn to_union_asset(asset: &TezosAsset) -> Result<Asset, SdkError> {
	Ok(Asset {
		asset_type: to_union_asset_type(&asset.asset_type)?,
		value: BigNumber::parse(&asset.value)?,
	})
}

pub fn to_union_order_data(data: &TezosOrderData) -> Result<OrderData, SdkError> {
	Ok(OrderData::TezosRaribleV2 {
		payouts: to_union_parts(&data.payouts)?,
		origin_fees: to_union_parts(&data.origin_fees)?,
	})
}

pub fn to_native_order_data(data: &OrderData) -> Result<TezosOrderData, SdkError> {
	match data {
		OrderData::TezosRaribleV2 {
			payouts,
			origin_fees,
		} => Ok(TezosOrderData {
			payouts: to_native_parts(payouts)?,
			origin_fees: to_native_parts(origin_fees)?,
		}),
		other => Err(SdkError::UnsupportedOrderData(other.tag().to_string())),
	}
}

pub fn to_union_order(order: &TezosOrder) -> Result<Order, SdkError> {
	let fill = BigNumber::parse(&order.fill)?;
	let make_stock = BigNumber::parse(&order.make_stock)?;

	Ok(Order {
		id: to_union_order_id(&order.hash)?,
		status: OrderStatus::derive(order.cancelled, &make_stock, &fill),
		fill,
		platform: Platform::Rarible,
		make_stock,
		cancelled: order.cancelled,
		created_at: order.created_at,
		last_updated_at: order.last_updated_at,
		make_price: None,
		take_price: None,
		maker: to_union_address(&order.maker)?,
		taker: order.taker.as_deref().map(to_union_address).transpose()?,
		make: to_union_asset(&order.make)?,
		take: to_union_asset(&order.take)?,
		salt: order.salt.clone(),
		signature: order.signature.as_deref().map(Binary::parse).transpose()?,
		pending: Vec::new(),
		price_history: Vec::new(),
		data: to_union_order_data(&order.data)?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	const CONTRACT: &str = "KT18pVpRXKPY2c4U2yFEGSH3ZnhB2kL8kwXS";

	#[test]
	fn test_asset_type_round_trip() {
		let native = [
			TezosAssetType::Xtz,
			TezosAssetType::Fa12 {
				contract: CONTRACT.to_string(),
			},
			TezosAssetType::Nft {
				contract: CONTRACT.to_string(),
				token_id: "46284".to_string(),
			},
			TezosAssetType::Mt {
				contract: CONTRACT.to_string(),
				token_id: "50".to_string(),
			},
		];
		for asset_type in native {
			let union = to_union_asset_type(&asset_type).unwrap();
			assert_eq!(to_native_asset_type(&union).unwrap(), asset_type);
		}
	}

	#[test]
	fn test_wire_names() {
		let fa12 = TezosAssetType::Fa12 {
			contract: CONTRACT.to_string(),
		};
		assert_eq!(
			serde_json::to_value(&fa12).unwrap(),
			serde_json::json!({"assetClass": "FA_1_2", "contract": CONTRACT})
		);
		let mt: TezosAssetType = serde_json::from_value(serde_json::json!({
			"assetClass": "MT", "contract": CONTRACT, "tokenId": "50"
		}))
		.unwrap();
		assert_eq!(mt.class(), "MT");
	}

	#[test]
	fn test_unsupported_variants() {
		let gen_art = AssetType::GenArt {
			contract: ContractAddress::parse(&format!("TEZOS:{}", CONTRACT)).unwrap(),
		};
		assert!(matches!(
			to_native_asset_type(&gen_art),
			Err(SdkError::UnsupportedAssetType(tag)) if tag == "GEN_ART"
		));

		let flow = OrderData::FlowRaribleV1 {
			payouts: Vec::new(),
			origin_fees: Vec::new(),
		};
		assert!(matches!(
			to_native_order_data(&flow),
			Err(SdkError::UnsupportedOrderData(tag)) if tag == "FLOW_RARIBLE_V1"
		));
	}
}
