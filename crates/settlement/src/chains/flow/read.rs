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

use super::FlowContext;
use super::common::{to_native_address, to_native_order_id};
use super::convert::{to_native_currency, to_union_order};

/// Listing and balance reads
#[derive(Debug, Clone)]
pub struct FlowReader {
	context: FlowContext,
}

impl FlowReader {
	pub fn new(context: FlowContext) -> Self {
		Self { context }
	}
}

#[async_trait]
impl OrderReader for FlowReader {
	async fn get_order(&self, order_id: &OrderId) -> Result<Order, SdkError> {
		let context = &self.context;
		let order = context
			.client
			.get_order(to_native_order_id(order_id)?)
			.await
			.map_err(|e| context.read_failed(e))?;
		to_union_order(&order)
	}
}

#[async_trait]
impl BalanceReader for FlowReader {
	async fn get_balance(
		&self,
		address: &UnionAddress,
		asset_type: &AssetType,
	) -> Result<BigNumber, SdkError> {
		let context = &self.context;
		let owner = to_native_address(address)?;
		let currency = to_native_currency(asset_type)?;

		let balance = context
			.client
			.get_balance(&owner, currency)
			.await
			.map_err(|e| context.read_failed(e))?;
		BigNumber::parse(&balance)
	}
}
