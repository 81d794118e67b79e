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
	Action, BigNumber, BlockchainTransaction, FillBuilder, FillRequest, MaxFeesBasePointSupport,
	NativeTransaction, OriginFeeSupport, PayoutsSupport, PrepareFillRequest, PrepareFillResponse,
	SdkError,
};

use super::common::{to_native_order_id, to_native_payouts};
use super::types::{FlowAssetType, FlowBuyRequest};
use super::{FlowContext, LOG_TARGET};
use crate::chains::FillCapabilities;

/// Buys storefront listings
#[derive(Debug, Clone)]
pub struct FlowBuy {
	context: FlowContext,
}

impl FlowBuy {
	pub fn new(context: FlowContext) -> Self {
		Self { context }
	}
}

#[derive(Debug)]
struct BuySnapshot {
	order_id: u64,
	capabilities: FillCapabilities,
}

impl BuySnapshot {
	fn request(&self, request: FillRequest) -> Result<FlowBuyRequest, SdkError> {
		self.capabilities.check(&request)?;
		Ok(FlowBuyRequest {
			order_id: self.order_id,
			origin_fees: to_native_payouts(&request.origin_fees.unwrap_or_default())?,
		})
	}
}

#[async_trait]
impl FillBuilder for FlowBuy {
	async fn prepare(&self, request: PrepareFillRequest) -> Result<PrepareFillResponse, SdkError> {
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
		let base_fee = context
			.client
			.get_protocol_fee()
			.await
			.map_err(|e| context.read_failed(e))?;

		let max_amount = if order.cancelled {
			BigNumber::zero()
		} else {
			BigNumber::parse(&order.make_stock)?
		};
		let capabilities = FillCapabilities {
			multiple: false,
			max_amount,
			origin_fee_support: OriginFeeSupport::Full,
			payouts_support: PayoutsSupport::None,
			max_fees_base_point_support: MaxFeesBasePointSupport::Ignored,
		};

		tracing::debug!(
			target: LOG_TARGET,
			"Prepared buy of order {}: max amount {}",
			order_id,
			capabilities.max_amount
		);

		let snapshot = Arc::new(BuySnapshot {
			order_id,
			capabilities: capabilities.clone(),
		});

		let submit = Action::new("fill", {
			let context = context.clone();
			move |request: FlowBuyRequest| {
				let context = context.clone();
				async move {
					let order_id = request.order_id;
					let transaction = context
						.client
						.buy(request)
						.await
						.map_err(|e| context.rejected(e))?;

					tracing::info!(
						target: LOG_TARGET,
						"Bought order {} in {}",
						order_id,
						transaction.hash()
					);
					Ok(transaction)
				}
			}
		})
		.before(move |request: FillRequest| snapshot.request(request))
		.after({
			let context = context.clone();
			move |transaction: Arc<dyn NativeTransaction>| -> Result<BlockchainTransaction, SdkError> {
				Ok(context.transaction(transaction))
			}
		});

		Ok(PrepareFillResponse {
			multiple: false,
			max_amount: capabilities.max_amount,
			base_fee,
			supports_partial_fill: false,
			origin_fee_support: capabilities.origin_fee_support,
			payouts_support: capabilities.payouts_support,
			max_fees_base_point_support: capabilities.max_fees_base_point_support,
			submit,
		})
	}
}
