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

use super::common::{to_native_order_hash, to_native_parts};
use super::convert::to_union_order;
use super::types::{TezosAssetType, TezosFillForm, TezosOrder};
use super::{LOG_TARGET, OrderKind, TezosContext};
use crate::chains::{FillCapabilities, remaining_take};

/// On-chain fills: buy for sells, accept-bid for bids
#[derive(Debug, Clone)]
pub struct TezosFill {
	context: TezosContext,
	kind: OrderKind,
}

impl TezosFill {
	pub fn buy(context: TezosContext) -> Self {
		Self {
			context,
			kind: OrderKind::Sell,
		}
	}

	pub fn accept_bid(context: TezosContext) -> Self {
		Self {
			context,
			kind: OrderKind::Bid,
		}
	}
}

fn max_amount(kind: OrderKind, order: &TezosOrder) -> Result<BigNumber, SdkError> {
	let make_stock = BigNumber::parse(&order.make_stock)?;
	match kind {
		OrderKind::Sell => Ok(make_stock),
		OrderKind::Bid => remaining_take(
			&BigNumber::parse(&order.make.value)?,
			&BigNumber::parse(&order.take.value)?,
			&make_stock,
		),
	}
}

#[derive(Debug)]
struct FillSnapshot {
	order_hash: String,
	capabilities: FillCapabilities,
}

impl FillSnapshot {
	fn form(&self, request: FillRequest) -> Result<TezosFillForm, SdkError> {
		self.capabilities.check(&request)?;
		Ok(TezosFillForm {
			order_hash: self.order_hash.clone(),
			amount: request.amount,
			infinite_approval: request.infinite_approval,
			payouts: to_native_parts(&request.payouts.unwrap_or_default())?,
			origin_fees: to_native_parts(&request.origin_fees.unwrap_or_default())?,
		})
	}
}

#[async_trait]
impl FillBuilder for TezosFill {
	async fn prepare(&self, request: PrepareFillRequest) -> Result<PrepareFillResponse, SdkError> {
		let context = &self.context;
		let hash = to_native_order_hash(&request.order_id)?;

		let order = context
			.api
			.get_order(&hash)
			.await
			.map_err(|e| context.read_failed(e))?;
		to_union_order(&order)?;

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
		let base_fee = context
			.provider
			.get_protocol_fee()
			.await
			.map_err(|e| context.read_failed(e))?;

		let multiple = matches!(nft.asset_type, TezosAssetType::Mt { .. });
		let capabilities = FillCapabilities {
			multiple,
			max_amount: if order.cancelled {
				BigNumber::zero()
			} else {
				max_amount(self.kind, &order)?
			},
			origin_fee_support: OriginFeeSupport::Full,
			payouts_support: PayoutsSupport::Multiple,
			max_fees_base_point_support: MaxFeesBasePointSupport::Ignored,
		};

		tracing::debug!(
			target: LOG_TARGET,
			"Prepared fill of {}: max amount {}",
			hash,
			capabilities.max_amount
		);

		let snapshot = Arc::new(FillSnapshot {
			order_hash: hash,
			capabilities: capabilities.clone(),
		});

		let submit = Action::new("fill", {
			let context = context.clone();
			move |form: TezosFillForm| {
				let context = context.clone();
				async move {
					let hash = form.order_hash.clone();
					let amount = form.amount;
					let transaction = context
						.provider
						.fill_order(form)
						.await
						.map_err(|e| context.rejected(e))?;

					tracing::info!(
						target: LOG_TARGET,
						"Filled {} of order {} in {}",
						amount,
						hash,
						transaction.hash()
					);
					Ok(transaction)
				}
			}
		})
		.before(move |request: FillRequest| snapshot.form(request))
		.after({
			let context = context.clone();
			move |transaction: Arc<dyn NativeTransaction>| -> Result<BlockchainTransaction, SdkError> {
				Ok(context.transaction(transaction))
			}
		});

		Ok(PrepareFillResponse {
			multiple,
			max_amount: capabilities.max_amount,
			base_fee,
			supports_partial_fill: multiple,
			origin_fee_support: capabilities.origin_fee_support,
			payouts_support: capabilities.payouts_support,
			max_fees_base_point_support: capabilities.max_fees_base_point_support,
			submit,
		})
	}
}
