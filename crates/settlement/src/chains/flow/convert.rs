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


//! Translation between native Flow and canonical shapes

use tessera_sdk::{
	Asset, AssetType, BigNumber, Blockchain, Environment, Order, OrderData, OrderStatus, Platform,
	SdkError,
};

use super::common::{
	currency_contract, fungible_token, parse_contract, to_native_contract, to_native_payouts,
	to_union_address, to_union_contract, to_union_order_id, to_union_payouts,
};
use super::types::{FlowAsset, FlowAssetType, FlowCurrency, FlowOrder, FlowOrderData};

pub fn to_union_asset_type(asset_type: &FlowAssetType) -> Result<AssetType, SdkError> {
	match asset_type {
		FlowAssetType::FlowNft { contract, token_id } => Ok(AssetType::NonFungible {
			contract: to_union_contract(contract)?,
			token_id: BigNumber::from(*token_id),
		}),
		FlowAssetType::FlowFt { contract } => {
			let (_, name) = parse_contract(contract)?;
			if name == FlowCurrency::Flow.contract_name() {
				Ok(AssetType::Native {
					blockchain: Blockchain::Flow,
				})
			} else {
				Ok(AssetType::Fungible {
					contract: to_union_contract(contract)?,
				})
			}
		}
	}
}

/// Canonical asset type to native Flow
///
/// Native FLOW maps to the FlowToken contract of `environment`.
pub fn to_native_asset_type(
	environment: Environment,
	asset_type: &AssetType,
) -> Result<FlowAssetType, SdkError> {
	match asset_type {
		AssetType::Native { blockchain } => {
			if *blockchain != Blockchain::Flow {
				return Err(SdkError::WrongChain {
					expected: Blockchain::Flow,
					actual: *blockchain,
				});
			}
			Ok(FlowAssetType::FlowFt {
				contract: currency_contract(environment, FlowCurrency::Flow),
			})
		}
		AssetType::Fungible { contract } => Ok(FlowAssetType::FlowFt {
			contract: to_native_contract(contract)?,
		}),
		AssetType::NonFungible { contract, token_id } => Ok(FlowAssetType::FlowNft {
			contract: to_native_contract(contract)?,
			token_id: token_id.normalized().parse().map_err(|_| {
				SdkError::InvalidIdentifier(format!("Flow token id out of range: {}", token_id))
			})?,
		}),
		other => Err(SdkError::UnsupportedAssetType(other.tag().to_string())),
	}
}

/// Storefront currency of a canonical currency asset
pub fn to_native_currency(asset_type: &AssetType) -> Result<FlowCurrency, SdkError> {
	match asset_type {
		AssetType::Native { blockchain } if *blockchain == Blockchain::Flow => Ok(FlowCurrency::Flow),
		AssetType::Native { blockchain } => Err(SdkError::WrongChain {
			expected: Blockchain::Flow,
			actual: *blockchain,
		}),
		AssetType::Fungible { contract } => fungible_token(&to_native_contract(contract)?),
		other => Err(SdkError::UnsupportedAssetType(other.tag().to_string())),
	}
}

pub fn to_union_asset(asset: &FlowAsset) -> Result<Asset, SdkError> {
	Ok(Asset {
		asset_type: to_union_asset_type(&asset.asset_type)?,
		value: BigNumber::parse(&asset.value)?,
	})
}

pub fn to_union_order_data(data: &FlowOrderData) -> Result<OrderData, SdkError> {
	Ok(OrderData::FlowRaribleV1 {
		payouts: to_union_payouts(&data.payouts)?,
		origin_fees: to_union_payouts(&data.origin_fees)?,
	})
}

pub fn to_native_order_data(data: &OrderData) -> Result<FlowOrderData, SdkError> {
	match data {
		OrderData::FlowRaribleV1 {
			payouts,
			origin_fees,
		} => Ok(FlowOrderData {
			payouts: to_native_payouts(payouts)?,
			origin_fees: to_native_payouts(origin_fees)?,
		}),
		other => Err(SdkError::UnsupportedOrderData(other.tag().to_string())),
	}
}

/// Price per token of a listing
fn unit_price(order: &FlowOrder) -> Result<Option<BigNumber>, SdkError> {
	let make = BigNumber::parse(&order.make.value)?.to_decimal()?;
	if make.is_zero() {
		return Ok(None);
	}
	let take = BigNumber::parse(&order.take.value)?.to_decimal()?;
	take.checked_div(make)
		.map(|d| d.normalize())
		.map(BigNumber::from_decimal)
		.transpose()
}

pub fn to_union_order(order: &FlowOrder) -> Result<Order, SdkError> {
	let fill = BigNumber::parse(&order.fill)?;
	let make_stock = BigNumber::parse(&order.make_stock)?;

	Ok(Order {
		id: to_union_order_id(order.id)?,
		status: OrderStatus::derive(order.cancelled, &make_stock, &fill),
		fill,
		platform: Platform::Rarible,
		make_stock,
		cancelled: order.cancelled,
		created_at: order.created_at,
		last_updated_at: order.last_updated_at,
		make_price: unit_price(order)?,
		take_price: None,
		maker: to_union_address(&order.maker)?,
		taker: order.taker.as_deref().map(to_union_address).transpose()?,
		make: to_union_asset(&order.make)?,
		take: to_union_asset(&order.take)?,
		salt: String::new(),
		signature: None,
		pending: Vec::new(),
		price_history: Vec::new(),
		data: to_union_order_data(&order.data)?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Utc;
	use tessera_sdk::{ContractAddress, Part, UnionAddress};

	use crate::chains::flow::types::FlowPayout;

	const NFT: &str = "A.01658d9b94068f3c.CommonNFT";
	const MAKER: &str = "0x01658d9b94068f3c";

	fn listing(price: &str) -> FlowOrder {
		FlowOrder {
			id: 7,
			item_id: format!("{}:3", NFT),
			maker: MAKER.to_string(),
			taker: None,
			make: FlowAsset {
				asset_type: FlowAssetType::FlowNft {
					contract: NFT.to_string(),
					token_id: 3,
				},
				value: "1".to_string(),
			},
			take: FlowAsset {
				asset_type: FlowAssetType::FlowFt {
					contract: currency_contract(Environment::Testnet, FlowCurrency::Flow),
				},
				value: price.to_string(),
			},
			fill: "0".to_string(),
			make_stock: "1".to_string(),
			cancelled: false,
			created_at: Utc::now(),
			last_updated_at: Utc::now(),
			data: FlowOrderData {
				payouts: vec![FlowPayout {
					account: MAKER.to_string(),
					value: "1".to_string(),
				}],
				origin_fees: Vec::new(),
			},
		}
	}

	#[test]
	fn test_flow_token_is_native() {
		let native = AssetType::Native {
			blockchain: Blockchain::Flow,
		};
		let flow = to_native_asset_type(Environment::Prod, &native).unwrap();
		assert_eq!(
			flow,
			FlowAssetType::FlowFt {
				contract: "A.1654653399040a61.FlowToken".to_string()
			}
		);
		assert_eq!(to_union_asset_type(&flow).unwrap(), native);

		let fusd = AssetType::Fungible {
			contract: ContractAddress::parse("FLOW:A.3c5959b568896393.FUSD").unwrap(),
		};
		let native_fusd = to_native_asset_type(Environment::Prod, &fusd).unwrap();
		assert_eq!(to_union_asset_type(&native_fusd).unwrap(), fusd);
		assert_eq!(to_native_currency(&fusd).unwrap(), FlowCurrency::Fusd);
	}

	#[test]
	fn test_unsupported_asset_types() {
		let native_eth = AssetType::Native {
			blockchain: Blockchain::Ethereum,
		};
		assert!(matches!(
			to_native_asset_type(Environment::Prod, &native_eth),
			Err(SdkError::WrongChain { .. })
		));

		let gen_art = AssetType::GenArt {
			contract: ContractAddress::parse(&format!("FLOW:{}", NFT)).unwrap(),
		};
		assert!(matches!(
			to_native_asset_type(Environment::Prod, &gen_art),
			Err(SdkError::UnsupportedAssetType(tag)) if tag == "GEN_ART"
		));
	}

	#[test]
	fn test_foreign_order_data_rejected() {
		let tezos = OrderData::TezosRaribleV2 {
			payouts: Vec::new(),
			origin_fees: Vec::new(),
		};
		assert!(matches!(
			to_native_order_data(&tezos),
			Err(SdkError::UnsupportedOrderData(tag)) if tag == "TEZOS_RARIBLE_V2"
		));
	}

	#[test]
	fn test_listing_to_union() {
		let order = to_union_order(&listing("12.5")).unwrap();
		assert_eq!(order.id.as_str(), "FLOW:7");
		assert_eq!(order.status, OrderStatus::Active);
		assert_eq!(order.make_price.unwrap().as_str(), "12.5");
		assert_eq!(
			order.take.asset_type,
			AssetType::Native {
				blockchain: Blockchain::Flow
			}
		);
		assert_eq!(
			order.data,
			OrderData::FlowRaribleV1 {
				payouts: vec![Part::new(
					UnionAddress::parse(&format!("FLOW:{}", MAKER)).unwrap(),
					10_000
				)],
				origin_fees: Vec::new(),
			}
		);
	}
}
