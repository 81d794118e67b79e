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


use std::sync::Arc;

use async_trait::async_trait;
use tessera_sdk::{
	Action, BigNumber, Blockchain, CurrencyType, OrderResponse, OrderUpdateBuilder,
	OrderUpdateRequest, PrepareOrderUpdateRequest, PrepareOrderUpdateResponse, SdkError,
};

use super::common::{to_native_order_hash, to_union_order_id};
use super::types::{TezosAssetType, TezosOrder};
use super::{LOG_TARGET, OrderDraft, OrderKind, TezosContext};
use crate::chains::ensure_positive_price;

/// Re-prices an existing sell order under its original salt
#[derive(Debug, Clone)]
pub struct TezosSellUpdate {
	context: TezosContext,
}

impl TezosSellUpdate {
	pub fn new(context: TezosContext) -> Self {
		Self { context }
	}
}

#[async_trait]
impl OrderUpdateBuilder for TezosSellUpdate {
	async fn prepare(
		&self,
		request: PrepareOrderUpdateRequest,
	) -> Result<PrepareOrderUpdateResponse, SdkError> {
		let context = &self.context;
		let hash = to_native_order_hash(&request.order_id)?;

		let order = context
			.api
			.get_order(&hash)
			.await
			.map_err(|e| context.read_failed(e))?;
		if order.make.asset_type.is_currency() || !order.take.asset_type.is_currency() {
			return Err(SdkError::invalid_request(format!(
				"Order {} is not a sell order",
				request.order_id
			)));
		}
		let base_fee = context
			.provider
			.get_protocol_fee()
			.await
			.map_err(|e| context.read_failed(e))?;

		let supported_currencies = vec![match order.take.asset_type {
			TezosAssetType::Xtz => CurrencyType::native(Blockchain::Tezos),
			_ => CurrencyType::fungible(Blockchain::Tezos),
		}];

		tracing::debug!(target: LOG_TARGET, "Prepared update of sell order {}", hash);

		let draft = Arc::new(OrderDraft {
			kind: OrderKind::Sell,
			maker: order.maker.clone(),
			maker_edpk: order.maker_edpk.clone(),
			nft: order.make.asset_type.clone(),
			currency: order.take.asset_type.clone(),
			amount: BigNumber::parse(&order.make.value)?,
			price: BigNumber::zero(),
			salt: Some(order.salt.clone()),
			data: order.data.clone(),
		});

		let submit = Action::new("update-order", {
			let context = context.clone();
			move |draft: OrderDraft| {
				let context = context.clone();
				async move { context.place_order(draft).await }
			}
		})
		.before(move |request: OrderUpdateRequest| {
			ensure_positive_price(&request.price)?;
			Ok(OrderDraft {
				price: request.price,
				..(*draft).clone()
			})
		})
		.after(|order: TezosOrder| Ok(OrderResponse::off_chain(to_union_order_id(&order.hash)?)));

		Ok(PrepareOrderUpdateResponse {
			supported_currencies,
			base_fee,
			submit,
		})
	}
}
