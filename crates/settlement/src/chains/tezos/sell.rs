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
	Action, BigNumber, Blockchain, CurrencyType, ItemId, MaxFeesBasePointSupport, OrderBuilder,
	OrderRequest, OrderResponse, PrepareOrderRequest, PrepareOrderResponse, SdkError,
	ensure_amount, ensure_supported_currency, payouts_or_default,
};

use super::common::{to_native_item_id, to_native_parts, to_union_address, to_union_order_id};
use super::convert::to_native_asset_type;
use super::types::{TezosAssetType, TezosCollectionType, TezosOrder, TezosOrderData};
use super::{LOG_TARGET, OrderDraft, OrderKind, TezosContext};
use crate::chains::{ensure_fee_shares, ensure_payout_shares, ensure_positive_price};

/// Off-chain sell orders
#[derive(Debug, Clone)]
pub struct TezosSell {
	context: TezosContext,
}

impl TezosSell {
	pub fn new(context: TezosContext) -> Self {
		Self { context }
	}
}

#[async_trait]
impl OrderBuilder for TezosSell {
	async fn prepare(
		&self,
		request: PrepareOrderRequest,
	) -> Result<PrepareOrderResponse, SdkError> {
		prepare_order(&self.context, OrderKind::Sell, &request.item_id).await
	}
}

/// Off-chain bids, paid in FA 1.2 tokens
#[derive(Debug, Clone)]
pub struct TezosBid {
	context: TezosContext,
}

impl TezosBid {
	pub fn new(context: TezosContext) -> Self {
		Self { context }
	}
}

#[async_trait]
impl OrderBuilder for TezosBid {
	async fn prepare(
		&self,
		request: PrepareOrderRequest,
	) -> Result<PrepareOrderResponse, SdkError> {
		prepare_order(&self.context, OrderKind::Bid, &request.item_id).await
	}
}

async fn prepare_order(
	context: &TezosContext,
	kind: OrderKind,
	item_id: &ItemId,
) -> Result<PrepareOrderResponse, SdkError> {
	let (contract, token_id) = to_native_item_id(item_id)?;
	let native_item_id = format!("{}:{}", contract, token_id);

	let item = context
		.api
		.get_item(&native_item_id)
		.await
		.map_err(|e| context.read_failed(e))?;
	if item.deleted {
		return Err(SdkError::invalid_request(format!("Item {} is burned", item_id)));
	}
	let collection = context
		.api
		.get_collection(&contract)
		.await
		.map_err(|e| context.read_failed(e))?;
	let maker = context
		.provider
		.address()
		.await
		.map_err(|e| context.read_failed(e))?;
	let maker_edpk = context
		.provider
		.public_key()
		.await
		.map_err(|e| context.read_failed(e))?;

	let max_amount = match kind {
		OrderKind::Sell => context
			.api
			.get_ownership(&native_item_id, &maker)
			.await
			.map_err(|e| context.read_failed(e))?
			.map(|ownership| BigNumber::parse(&ownership.value))
			.transpose()?
			.unwrap_or_else(BigNumber::zero),
		OrderKind::Bid => BigNumber::parse(&item.supply)?,
	};
	let base_fee = context
		.provider
		.get_protocol_fee()
		.await
		.map_err(|e| context.read_failed(e))?;

	let (nft, multiple) = match collection.kind {
		TezosCollectionType::Nft => (TezosAssetType::Nft { contract, token_id }, false),
		TezosCollectionType::Mt => (TezosAssetType::Mt { contract, token_id }, true),
	};
	let supported_currencies = match kind {
		OrderKind::Sell => vec![
			CurrencyType::native(Blockchain::Tezos),
			CurrencyType::fungible(Blockchain::Tezos),
		],
		OrderKind::Bid => vec![CurrencyType::fungible(Blockchain::Tezos)],
	};

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
		kind,
		maker,
		maker_edpk,
		nft,
		multiple,
		max_amount: max_amount.clone(),
		supported_currencies: supported_currencies.clone(),
	});

	let submit = Action::new(action_id(kind), {
		let context = context.clone();
		move |draft: OrderDraft| {
			let context = context.clone();
			async move { context.place_order(draft).await }
		}
	})
	.before(move |request: OrderRequest| snapshot.draft(request))
	.after(|order: TezosOrder| Ok(OrderResponse::off_chain(to_union_order_id(&order.hash)?)));

	Ok(PrepareOrderResponse {
		supported_currencies,
		multiple,
		max_amount: Some(max_amount),
		base_fee,
		max_fees_base_point_support: MaxFeesBasePointSupport::Ignored,
		submit,
	})
}

fn action_id(kind: OrderKind) -> &'static str {
	match kind {
		OrderKind::Sell => "sell",
		OrderKind::Bid => "bid",
	}
}

#[derive(Debug)]
struct OrderSnapshot {
	kind: OrderKind,
	maker: String,
	maker_edpk: String,
	nft: TezosAssetType,
	multiple: bool,
	max_amount: BigNumber,
	supported_currencies: Vec<CurrencyType>,
}

impl OrderSnapshot {
	fn draft(&self, request: OrderRequest) -> Result<OrderDraft, SdkError> {
		ensure_supported_currency(&self.supported_currencies, &request.currency)?;
		let currency = to_native_asset_type(&request.currency)?;
		ensure_amount(request.amount, self.multiple, &self.max_amount)?;
		ensure_positive_price(&request.price)?;

		let payouts = payouts_or_default(request.payouts.as_deref(), &to_union_address(&self.maker)?);
		ensure_payout_shares(&payouts)?;
		let origin_fees = request.origin_fees.unwrap_or_default();
		ensure_fee_shares(&origin_fees)?;

		Ok(OrderDraft {
			kind: self.kind,
			maker: self.maker.clone(),
			maker_edpk: self.maker_edpk.clone(),
			nft: self.nft.clone(),
			currency,
			amount: BigNumber::from(request.amount),
			price: request.price,
			salt: None,
			data: TezosOrderData {
				payouts: to_native_parts(&payouts)?,
				origin_fees: to_native_parts(&origin_fees)?,
			},
		})
	}
}
