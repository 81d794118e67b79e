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
	Action, BigNumber, CurrencyType, ItemId, MaxFeesBasePointSupport, OrderBuilder, OrderRequest,
	OrderResponse, Payout, PrepareOrderRequest, PrepareOrderResponse, SdkError, ensure_amount,
	ensure_supported_currency, payouts_or_default,
};

use super::common::{to_native_item_id, to_native_parts, to_union_address, to_union_order_id};
use super::convert::to_native_asset_type;
use super::types::{EthAssetType, EthCollectionType, EthOrder, EthOrderData};
use super::{EthereumContext, LOG_TARGET, OrderDraft, OrderKind};
use crate::chains::{ensure_fee_shares, ensure_payout_shares, ensure_positive_price, resolve_max_fees};

/// Origin fee slots in data V3 orders
const DATA_V3_ORIGIN_FEES: usize = 2;

/// Off-chain sell orders
#[derive(Debug, Clone)]
pub struct EthereumSell {
	context: EthereumContext,
}

impl EthereumSell {
	pub fn new(context: EthereumContext) -> Self {
		Self { context }
	}
}

#[async_trait]
impl OrderBuilder for EthereumSell {
	async fn prepare(
		&self,
		request: PrepareOrderRequest,
	) -> Result<PrepareOrderResponse, SdkError> {
		prepare_order(&self.context, OrderKind::Sell, &request.item_id).await
	}
}

/// Off-chain bids, paid in ERC-20 tokens
#[derive(Debug, Clone)]
pub struct EthereumBid {
	context: EthereumContext,
}

impl EthereumBid {
	pub fn new(context: EthereumContext) -> Self {
		Self { context }
	}
}

#[async_trait]
impl OrderBuilder for EthereumBid {
	async fn prepare(
		&self,
		request: PrepareOrderRequest,
	) -> Result<PrepareOrderResponse, SdkError> {
		prepare_order(&self.context, OrderKind::Bid, &request.item_id).await
	}
}

async fn prepare_order(
	context: &EthereumContext,
	kind: OrderKind,
	item_id: &ItemId,
) -> Result<PrepareOrderResponse, SdkError> {
	let blockchain = context.blockchain();
	let (contract, token_id) = to_native_item_id(blockchain, item_id)?;
	let native_item_id = format!("{}:{}", contract, token_id);
	let client = &context.client;

	let item = client
		.get_item(&native_item_id)
		.await
		.map_err(|e| context.read_failed(e))?;
	if item.deleted {
		return Err(SdkError::invalid_request(format!("Item {} is burned", item_id)));
	}
	let collection = client
		.get_collection(&contract)
		.await
		.map_err(|e| context.read_failed(e))?;
	let nft = context.nft_asset_type(&collection, &token_id)?;
	let maker = client.address().await.map_err(|e| context.read_failed(e))?;

	let max_amount = match kind {
		OrderKind::Sell => client
			.get_ownership(&native_item_id, &maker)
			.await
			.map_err(|e| context.read_failed(e))?
			.map(|ownership| BigNumber::parse(&ownership.value))
			.transpose()?
			.unwrap_or_else(BigNumber::zero),
		OrderKind::Bid => BigNumber::parse(&item.supply)?,
	};
	let base_fee = client
		.get_base_order_fee()
		.await
		.map_err(|e| context.read_failed(e))?;

	let supported_currencies = match kind {
		OrderKind::Sell => vec![
			CurrencyType::native(blockchain),
			CurrencyType::fungible(blockchain),
		],
		OrderKind::Bid => vec![CurrencyType::fungible(blockchain)],
	};
	let max_fees_base_point_support = match kind {
		OrderKind::Sell if context.config().use_data_v3 => MaxFeesBasePointSupport::Required,
		_ => MaxFeesBasePointSupport::Ignored,
	};
	let multiple = collection.kind == EthCollectionType::Erc1155;

	tracing::debug!(
		target: LOG_TARGET,
		"Prepared {:?} of {} for {}: max amount {}, base fee {}",
		kind,
		item_id,
		maker,
		max_amount,
		base_fee
	);

	let snapshot = Arc::new(OrderSnapshot {
		context: context.clone(),
		kind,
		maker,
		nft,
		multiple,
		max_amount: max_amount.clone(),
		supported_currencies: supported_currencies.clone(),
		max_fees_base_point_support,
	});

	let submit = Action::new(action_id(kind), {
		let context = context.clone();
		move |draft: OrderDraft| {
			let context = context.clone();
			async move { context.place_order(draft).await }
		}
	})
	.before(move |request: OrderRequest| snapshot.draft(request))
	.after(move |order: EthOrder| {
		Ok(OrderResponse::off_chain(to_union_order_id(
			blockchain,
			&order.hash,
		)?))
	});

	Ok(PrepareOrderResponse {
		supported_currencies,
		multiple,
		max_amount: Some(max_amount),
		base_fee,
		max_fees_base_point_support,
		submit,
	})
}

fn action_id(kind: OrderKind) -> &'static str {
	match kind {
		OrderKind::Sell => "sell",
		OrderKind::Bid => "bid",
	}
}

/// Constraints captured by a prepared sell or bid
#[derive(Debug)]
struct OrderSnapshot {
	context: EthereumContext,
	kind: OrderKind,
	maker: String,
	nft: EthAssetType,
	multiple: bool,
	max_amount: BigNumber,
	supported_currencies: Vec<CurrencyType>,
	max_fees_base_point_support: MaxFeesBasePointSupport,
}

impl OrderSnapshot {
	fn draft(&self, request: OrderRequest) -> Result<OrderDraft, SdkError> {
		let blockchain = self.context.blockchain();

		ensure_supported_currency(&self.supported_currencies, &request.currency)?;
		let currency = to_native_asset_type(blockchain, &request.currency)?;
		ensure_amount(request.amount, self.multiple, &self.max_amount)?;
		ensure_positive_price(&request.price)?;

		let maker = to_union_address(blockchain, &self.maker)?;
		let payouts = payouts_or_default(request.payouts.as_deref(), &maker);
		ensure_payout_shares(&payouts)?;
		let origin_fees = request.origin_fees.unwrap_or_default();
		ensure_fee_shares(&origin_fees)?;
		let max_fees_base_point =
			resolve_max_fees(request.max_fees_base_point, self.max_fees_base_point_support)?;

		Ok(OrderDraft {
			kind: self.kind,
			maker: self.maker.clone(),
			nft: self.nft.clone(),
			currency,
			amount: BigNumber::from(request.amount),
			price: request.price,
			salt: None,
			data: self.order_data(&payouts, &origin_fees, max_fees_base_point)?,
		})
	}

	fn order_data(
		&self,
		payouts: &[Payout],
		origin_fees: &[Payout],
		max_fees_base_point: Option<u32>,
	) -> Result<EthOrderData, SdkError> {
		let blockchain = self.context.blockchain();
		let payouts = to_native_parts(blockchain, payouts)?;
		let origin_fees = to_native_parts(blockchain, origin_fees)?;
		let config = self.context.config();

		if !config.use_data_v3 {
			return Ok(EthOrderData::RaribleV2DataV1 {
				payouts,
				origin_fees,
			});
		}

		if payouts.len() != 1 {
			return Err(SdkError::invalid_request(
				"Data V3 orders accept a single payout",
			));
		}
		if origin_fees.len() > DATA_V3_ORIGIN_FEES {
			return Err(SdkError::invalid_request(format!(
				"Data V3 orders accept at most {} origin fees",
				DATA_V3_ORIGIN_FEES
			)));
		}

		let payout = payouts.into_iter().next();
		let mut origin_fees = origin_fees.into_iter();
		let origin_fee_first = origin_fees.next();
		let origin_fee_second = origin_fees.next();
		let marketplace_marker = config
			.marketplace_marker
			.as_ref()
			.map(|marker| marker.as_str().to_string());

		match self.kind {
			OrderKind::Sell => Ok(EthOrderData::RaribleV2DataV3Sell {
				payout,
				origin_fee_first,
				origin_fee_second,
				max_fees_base_point: max_fees_base_point.ok_or_else(|| {
					SdkError::invalid_request("maxFeesBasePoint is required for data V3 sells")
				})?,
				marketplace_marker,
			}),
			OrderKind::Bid => Ok(EthOrderData::RaribleV2DataV3Buy {
				payout,
				origin_fee_first,
				origin_fee_second,
				marketplace_marker,
			}),
		}
	}
}
