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


use async_trait::async_trait;
use tessera_sdk::{
	AssetType, BalanceReader, BigNumber, Order, OrderId, OrderReader, SdkError, UnionAddress,
};

use super::EthereumContext;
use super::common::{to_native_address, to_native_order_hash};
use super::convert::{to_native_asset_type, to_union_order};
use super::types::EthAssetType;

/// Order and balance reads
#[derive(Debug, Clone)]
pub struct EthereumReader {
	context: EthereumContext,
}

impl EthereumReader {
	pub fn new(context: EthereumContext) -> Self {
		Self { context }
	}
}

#[async_trait]
impl OrderReader for EthereumReader {
	async fn get_order(&self, order_id: &OrderId) -> Result<Order, SdkError> {
		let context = &self.context;
		let hash = to_native_order_hash(context.blockchain(), order_id)?;
		let order = context
			.client
			.get_order(&hash)
			.await
			.map_err(|e| context.read_failed(e))?;
		to_union_order(context.blockchain(), &order)
	}
}

#[async_trait]
impl BalanceReader for EthereumReader {
	async fn get_balance(
		&self,
		address: &UnionAddress,
		asset_type: &AssetType,
	) -> Result<BigNumber, SdkError> {
		let context = &self.context;
		let owner = to_native_address(context.blockchain(), address)?;
		let asset_type = match to_native_asset_type(context.blockchain(), asset_type)? {
			currency @ (EthAssetType::Eth | EthAssetType::Erc20 { .. }) => currency,
			other => return Err(SdkError::UnsupportedAssetType(other.class().to_string())),
		};

		let balance = context
			.client
			.get_balance(&owner, &asset_type)
			.await
			.map_err(|e| context.read_failed(e))?;
		BigNumber::parse(&balance.decimal_balance)
	}
}
