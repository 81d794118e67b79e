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
	Action, AssetType, BigNumber, Blockchain, CurrencyType, MaxFeesBasePointSupport,
	OrderBuilder, OrderRequest, OrderResponse, OrderUpdateBuilder, OrderUpdateRequest,
	PrepareOrderRequest, PrepareOrderResponse, PrepareOrderUpdateRequest,
	PrepareOrderUpdateResponse, SdkError, ensure_amount, ensure_supported_currency,
	payouts_or_default,
};

use super::common::{
	to_native_item_id, to_native_order_id, to_native_payouts, to_union_address, to_union_order_id,
};
use super::convert::{to_native_currency, to_union_asset_type};
use super::types::{FlowAssetType, FlowOrderOutcome, FlowSellRequest, FlowUpdateRequest};
use super::{FlowContext, LOG_TARGET, UFIX64_DECIMALS};
use crate::chains::{
	ensure_fee_shares, ensure_payout_shares, ensure_positive_price, fixed_point, total_price,
};

/// Storefront listings, created on-chain
#[derive(Debug, Clone)]
pub struct FlowSell {
	context: FlowContext,
}

impl FlowSell {
	pub fn new(context: FlowContext) -> Self {
		Self { context }
	}
}

#[derive(Debug)]
struct SellSnapshot {
	contract: String,
	token_id: u64,
	seller: String,
	max_amount: BigNumber,
	supported_currencies: Vec<CurrencyType>,
}

impl SellSnapshot {
	fn request(&self, request: OrderRequest) -> Result<FlowSellRequest, SdkError> {
		ensure_supported_currency(&self.supported_currencies, &request.currency)?;
		let currency = to_native_currency(&request.currency)?;
		ensure_amount(request.amount, false, &self.max_amount)?;
		ensure_positive_price(&request.price)?;

		let payouts = payouts_or_default(request.payouts.as_deref(), &to_union_address(&self.seller)?);
		ensure_payout_shares(&payouts)?;
		let origin_fees = request.origin_fees.unwrap_or_default();
		ensure_fee_shares(&origin_fees)?;

		let total = total_price(&request.price, &BigNumber::from(request.amount))?;

		Ok(FlowSellRequest {
			collection: self.contract.clone(),
			token_id: self.token_id,
			currency,
			price: fixed_point(&total, UFIX64_DECIMALS)?,
			payouts: to_native_payouts(&payouts)?,
			origin_fees: to_native_payouts(&origin_fees)?,
		})
	}
}

/// Transaction result of a listing call, as an order response
fn listed(context: &FlowContext, outcome: FlowOrderOutcome) -> Result<OrderResponse, SdkError> {
	OrderResponse::on_chain(
		context.transaction(outcome.transaction),
		to_union_order_id(outcome.order_id)?,
	)
}

#[async_trait]
impl OrderBuilder for FlowSell {
	async fn prepare(
		&self,
		request: PrepareOrderRequest,
	) -> Result<PrepareOrderResponse, SdkError> {
		let context = &self.context;
		let (contract, token_id) = to_native_item_id(&request.item_id)?;

		let item = context
			.client
			.get_item(&format!("{}:{}", contract, token_id))
			.await
			.map_err(|e| context.read_failed(e))?;
		if item.deleted {
			return Err(SdkError::invalid_request(format!(
				"Item {} is burned",
				request.item_id
			)));
		}
		let seller = context
			.client
			.address()
			.await
			.map_err(|e| context.read_failed(e))?;
		let base_fee = context
			.client
			.get_protocol_fee()
			.await
			.map_err(|e| context.read_failed(e))?;

		let max_amount = if item.owner == seller {
			BigNumber::from(1)
		} else {
			BigNumber::zero()
		};
		let supported_currencies = vec![
			CurrencyType::native(Blockchain::Flow),
			CurrencyType::fungible(Blockchain::Flow),
		];

		tracing::debug!(
			target: LOG_TARGET,
			"Prepared sell of {} for {}: max amount {}",
			request.item_id,
			seller,
			max_amount
		);

		let snapshot = Arc::new(SellSnapshot {
			contract,
			token_id,
			seller,
			max_amount: max_amount.clone(),
			supported_currencies: supported_currencies.clone(),
		});

		let submit = Action::new("sell", {
			let context = context.clone();
			move |request: FlowSellRequest| {
				let context = context.clone();
				async move {
					let price = request.price.clone();
					let outcome = context
						.client
						.sell(request)
						.await
						.map_err(|e| context.rejected(e))?;

					tracing::info!(
						target: LOG_TARGET,
						"Listed order {} at {} in {}",
						outcome.order_id,
						price,
						outcome.transaction.hash()
					);
					Ok(outcome)
				}
			}
		})
		.before(move |request: OrderRequest| snapshot.request(request))
		.after({
			let context = context.clone();
			move |outcome: FlowOrderOutcome| listed(&context, outcome)
		});

		Ok(PrepareOrderResponse {
			supported_currencies,
			multiple: false,
			max_amount: Some(max_amount),
			base_fee,
			max_fees_base_point_support: MaxFeesBasePointSupport::Ignored,
			submit,
		})
	}
}

/// Relists a storefront listing at a new price
#[derive(Debug, Clone)]
pub struct FlowSellUpdate {
	context: FlowContext,
}

impl FlowSellUpdate {
	pub fn new(context: FlowContext) -> Self {
		Self { context }
	}
}

#[derive(Debug)]
struct UpdateSnapshot {
	order_id: u64,
	amount: BigNumber,
}

impl UpdateSnapshot {
	fn request(&self, request: OrderUpdateRequest) -> Result<FlowUpdateRequest, SdkError> {
		ensure_positive_price(&request.price)?;
		let total = total_price(&request.price, &self.amount)?;

		Ok(FlowUpdateRequest {
			order_id: self.order_id,
			price: fixed_point(&total, UFIX64_DECIMALS)?,
		})
	}
}

#[async_trait]
impl OrderUpdateBuilder for FlowSellUpdate {
	async fn prepare(
		&self,
		request: PrepareOrderUpdateRequest,
	) -> Result<PrepareOrderUpdateResponse, SdkError> {
		let context = &self.context;
		let order_id = to_native_order_id(&request.order_id)?;

		let order = context
			.client
			.get_order(order_id)
			.await
			.map_err(|e| context.read_failed(e))?;
		if !matches!(order.make.asset_type, FlowAssetType::FlowNft { .. }) {
			return Err(SdkError::invalid_request(format!(
				"Order {} is not a sell order",
				request.order_id
			)));
		}
		if order.cancelled || BigNumber::parse(&order.make_stock)?.is_zero() {
			return Err(SdkError::invalid_request(format!(
				"Order {} is no longer active",
				request.order_id
			)));
		}
		let seller = context
			.client
			.address()
			.await
			.map_err(|e| context.read_failed(e))?;
		if order.maker != seller {
			return Err(SdkError::invalid_request(format!(
				"Order {} belongs to {}",
				request.order_id, order.maker
			)));
		}
		let base_fee = context
			.client
			.get_protocol_fee()
			.await
			.map_err(|e| context.read_failed(e))?;

		let supported_currencies = match to_union_asset_type(&order.take.asset_type)? {
			AssetType::Native { blockchain } => vec![CurrencyType::native(blockchain)],
			currency => vec![CurrencyType::fungible(currency.blockchain())],
		};

		let snapshot = Arc::new(UpdateSnapshot {
			order_id,
			amount: BigNumber::parse(&order.make.value)?,
		});

		let submit = Action::new("update-order", {
			let context = context.clone();
			move |request: FlowUpdateRequest| {
				let context = context.clone();
				async move {
					let previous = request.order_id;
					let outcome = context
						.client
						.update_order(request)
						.await
						.map_err(|e| context.rejected(e))?;

					tracing::info!(
						target: LOG_TARGET,
						"Relisted order {} as {}",
						previous,
						outcome.order_id
					);
					Ok(outcome)
				}
			}
		})
		.before(move |request: OrderUpdateRequest| snapshot.request(request))
		.after({
			let context = context.clone();
			move |outcome: FlowOrderOutcome| listed(&context, outcome)
		});

		Ok(PrepareOrderUpdateResponse {
			supported_currencies,
			base_fee,
			submit,
		})
	}
}
