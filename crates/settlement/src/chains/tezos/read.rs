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
use tessera_sdk::{Order, OrderId, OrderReader, SdkError};

use super::TezosContext;
use super::common::to_native_order_hash;
use super::convert::to_union_order;

#[derive(Debug, Clone)]
pub struct TezosReader {
	context: TezosContext,
}

impl TezosReader {
	pub fn new(context: TezosContext) -> Self {
		Self { context }
	}
}

#[async_trait]
impl OrderReader for TezosReader {
	async fn get_order(&self, order_id: &OrderId) -> Result<Order, SdkError> {
		let context = &self.context;
		let order = context
			.api
			.get_order(&to_native_order_hash(order_id)?)
			.await
			.map_err(|e| context.read_failed(e))?;
		to_union_order(&order)
	}
}
