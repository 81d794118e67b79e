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
use super::types::{EthFillForm, EthOrder, EthOrderData};
use super::{EthereumContext, LOG_TARGET, OrderKind};
use crate::chains::{FillCapabilities, remaining_take};

/// Origin fee slots in data V3 orders
const DATA_V3_ORIGIN_FEES: usize = 2;

/// Matches an indexed order on-chain: buy for sells, accept-bid for bids
#[derive(Debug, Clone)]
pub struct EthereumFill {
	context: EthereumContext,
	kind: OrderKind,
}

impl EthereumFill {
	/// Buy from sell orders
	pub fn buy(context: EthereumContext) -> Self {
		Self {
			context,
			kind: OrderKind::Sell,
		}
	}

	/// Accept bids
	pub fn accept_bid(context: EthereumContext) -> Self {
		Self {
			context,
			kind: OrderKind::Bid,
		}
	}
}

/// What an order's data lets the taker add
fn fill_support(data: &EthOrderData) -> (OriginFeeSupport, PayoutsSupport) {
	match data {
		EthOrderData::Legacy { .. } => (OriginFeeSupport::AmountOnly, PayoutsSupport::Single),
		EthOrderData::RaribleV2DataV1 { .. } => (OriginFeeSupport::Full, PayoutsSupport::Multiple),
		EthOrderData::RaribleV2DataV3Sell { .. } | EthOrderData::RaribleV2DataV3Buy { .. } => {
			(OriginFeeSupport::Full, PayoutsSupport::Single)
		}
		EthOrderData::OpenSeaV1DataV1 { .. } | EthOrderData::CryptoPunksData => {
			(OriginFeeSupport::None, PayoutsSupport::None)
		}
	}
}

/// Remaining token amount of an order
fn max_amount(kind: OrderKind, order: &EthOrder) -> Result<BigNumber, SdkError> {
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
	context: EthereumContext,
	order_hash: String,
	data_v3: bool,
	capabilities: FillCapabilities,
}

impl FillSnapshot {
	fn form(&self, request: FillRequest) -> Result<EthFillForm, SdkError> {
		let max_fees_base_point = self.capabilities.check(&request)?;
		let blockchain = self.context.blockchain();

		let origin_fees = request.origin_fees.unwrap_or_default();
		if self.data_v3 && origin_fees.len() > DATA_V3_ORIGIN_FEES {
			return Err(SdkError::invalid_request(format!(
				"Data V3 orders accept at most {} origin fees",
				DATA_V3_ORIGIN_FEES
			)));
		}

		Ok(EthFillForm {
			order_hash: self.order_hash.clone(),
			amount: request.amount,
			infinite_approval: request.infinite_approval,
			payouts: to_native_parts(blockchain, &request.payouts.unwrap_or_default())?,
			origin_fees: to_native_parts(blockchain, &origin_fees)?,
			max_fees_base_point,
			marketplace_marker: self
				.context
				.config()
				.marketplace_marker
				.as_ref()
				.map(|marker| marker.as_str().to_string()),
		})
	}
}

#[async_trait]
impl FillBuilder for EthereumFill {
	async fn prepare(&self, request: PrepareFillRequest) -> Result<PrepareFillResponse, SdkError> {
		let context = &self.context;
		let blockchain = context.blockchain();
		let hash = to_native_order_hash(blockchain, &request.order_id)?;

		let order = context
			.client
			.get_order(&hash)
			.await
			.map_err(|e| context.read_failed(e))?;
		// Refuse orders the canonical schema cannot describe
		to_union_order(blockchain, &order)?;

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
			.client
			.get_base_order_fee()
			.await
			.map_err(|e| context.read_failed(e))?;

		let multiple = nft.asset_type.is_semi_fungible();
		let (origin_fee_support, payouts_support) = fill_support(&order.data);
		let max_fees_base_point_support = match (&order.data, self.kind) {
			(EthOrderData::RaribleV2DataV3Buy { .. }, OrderKind::Bid) => {
				MaxFeesBasePointSupport::Required
			}
			_ => MaxFeesBasePointSupport::Ignored,
		};
		let max_amount = if order.cancelled {
			BigNumber::zero()
		} else {
			max_amount(self.kind, &order)?
		};
		let capabilities = FillCapabilities {
			multiple,
			max_amount,
			origin_fee_support,
			payouts_support,
			max_fees_base_point_support,
		};

		tracing::debug!(
			target: LOG_TARGET,
			"Prepared fill of {} ({}): max amount {}",
			hash,
			order.data.data_type(),
			capabilities.max_amount
		);

		let snapshot = Arc::new(FillSnapshot {
			context: context.clone(),
			order_hash: hash,
			data_v3: matches!(
				order.data,
				EthOrderData::RaribleV2DataV3Sell { .. } | EthOrderData::RaribleV2DataV3Buy { .. }
			),
			capabilities: capabilities.clone(),
		});

		let submit = Action::new("fill", {
			let context = context.clone();
			move |form: EthFillForm| {
				let context = context.clone();
				async move {
					let hash = form.order_hash.clone();
					let amount = form.amount;
					let transaction = context
						.client
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
			origin_fee_support,
			payouts_support,
			max_fees_base_point_support,
			submit,
		})
	}
}
