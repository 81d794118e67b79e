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
	Action, BigNumber, CurrencyType, OrderResponse, OrderUpdateBuilder, OrderUpdateRequest,
	PrepareOrderUpdateRequest, PrepareOrderUpdateResponse, SdkError,
};

use super::common::{to_native_order_hash, to_union_order_id};
use super::types::{EthAssetType, EthOrder, EthOrderData};
use super::{EthereumContext, LOG_TARGET, OrderDraft, OrderKind};
use crate::chains::ensure_positive_price;

/// Re-prices an existing off-chain sell or bid
///
/// The order keeps its salt, so the order book replaces it in place.
#[derive(Debug, Clone)]
pub struct EthereumOrderUpdate {
	context: EthereumContext,
	kind: OrderKind,
}

impl EthereumOrderUpdate {
	pub fn sell(context: EthereumContext) -> Self {
		Self {
			context,
			kind: OrderKind::Sell,
		}
	}

	pub fn bid(context: EthereumContext) -> Self {
		Self {
			context,
			kind: OrderKind::Bid,
		}
	}
}

#[async_trait]
impl OrderUpdateBuilder for EthereumOrderUpdate {
	async fn prepare(
		&self,
		request: PrepareOrderUpdateRequest,
	) -> Result<PrepareOrderUpdateResponse, SdkError> {
		let context = &self.context;
		let blockchain = context.blockchain();
		let hash = to_native_order_hash(blockchain, &request.order_id)?;

		let order = context
			.client
			.get_order(&hash)
			.await
			.map_err(|e| context.read_failed(e))?;

		let (nft, currency) = match self.kind {
			OrderKind::Sell => (&order.make, &order.take),
			OrderKind::Bid => (&order.take, &order.make),
		};
		if nft.asset_type.is_currency() || !currency.asset_type.is_currency() {
			return Err(SdkError::invalid_request(format!(
				"Order {} is not a {:?} order",
				request.order_id, self.kind
			)));
		}
		if matches!(
			order.data,
			EthOrderData::OpenSeaV1DataV1 { .. } | EthOrderData::CryptoPunksData
		) {
			return Err(SdkError::UnsupportedOrderData(
				order.data.data_type().to_string(),
			));
		}
		if order.cancelled || BigNumber::parse(&order.make_stock)?.is_zero() {
			return Err(SdkError::invalid_request(format!(
				"Order {} is no longer active",
				request.order_id
			)));
		}
		let maker = context
			.client
			.address()
			.await
			.map_err(|e| context.read_failed(e))?;
		if order.maker != maker {
			return Err(SdkError::invalid_request(format!(
				"Order {} belongs to {}",
				request.order_id, order.maker
			)));
		}

		let base_fee = context
			.client
			.get_base_order_fee()
			.await
			.map_err(|e| context.read_failed(e))?;

		let supported_currencies = vec![match currency.asset_type {
			EthAssetType::Eth => CurrencyType::native(blockchain),
			_ => CurrencyType::fungible(blockchain),
		}];

		tracing::debug!(
			target: LOG_TARGET,
			"Prepared update of {:?} order {}",
			self.kind,
			hash
		);

		let draft = Arc::new(OrderDraft {
			kind: self.kind,
			maker: order.maker.clone(),
			nft: nft.asset_type.clone(),
			currency: currency.asset_type.clone(),
			amount: BigNumber::parse(&nft.value)?,
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
		.after(move |order: EthOrder| {
			Ok(OrderResponse::off_chain(to_union_order_id(
				blockchain,
				&order.hash,
			)?))
		});

		Ok(PrepareOrderUpdateResponse {
			supported_currencies,
			base_fee,
			submit,
		})
	}
}
