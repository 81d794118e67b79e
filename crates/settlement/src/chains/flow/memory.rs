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


//! In-memory Flow chain with a storefront

use std::sync::{
	Arc,
	atomic::{AtomicU32, AtomicU64, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rand::RngCore;
use rust_decimal::Decimal;
use tessera_sdk::{Environment, NativeError, NativeTransaction};

use super::FlowClient;
use super::common::{currency_contract, fungible_token};
use super::types::{
	FlowAsset, FlowAssetType, FlowBuyRequest, FlowCollection, FlowCurrency, FlowItem,
	FlowMintOutcome, FlowMintRequest, FlowOrder, FlowOrderData, FlowOrderOutcome, FlowSellRequest,
	FlowUpdateRequest,
};
use crate::chains::memory::{ChainIo, not_found, transaction_hash};

#[derive(Debug, Default)]
struct FlowState {
	io: ChainIo,
	protocol_fee: AtomicU32,
	last_token_id: AtomicU64,
	last_order_id: AtomicU64,
	collections: DashMap<String, FlowCollection>,
	items: DashMap<String, FlowItem>,
	orders: DashMap<u64, FlowOrder>,
	balances: DashMap<(String, FlowCurrency), Decimal>,
}

/// Shared in-memory Flow chain
///
/// Storefront currencies use the testnet token contracts.
#[derive(Debug, Clone, Default)]
pub struct MemoryFlowChain {
	state: Arc<FlowState>,
}

fn random_address() -> String {
	let mut bytes = [0u8; 8];
	rand::thread_rng().fill_bytes(&mut bytes);
	format!("0x{}", hex::encode(bytes))
}

fn parse_amount(value: &str) -> Result<Decimal, NativeError> {
	value
		.parse()
		.map_err(|_| NativeError::with_code("BAD_VALUE", format!("Not a UFix64 value: {}", value)))
}

impl MemoryFlowChain {
	pub fn new() -> Self {
		Self::default()
	}

	/// Connect a wallet with a fresh account
	pub fn wallet(&self) -> MemoryFlowClient {
		MemoryFlowClient {
			state: self.state.clone(),
			address: random_address(),
		}
	}

	/// Deploy a collection anyone can mint into, returning its contract id
	pub fn deploy_collection(&self, name: &str) -> String {
		let owner = random_address();
		let contract = format!("A.{}.{}", &owner[2..], name);
		self.state.collections.insert(
			contract.clone(),
			FlowCollection {
				id: contract.clone(),
				name: name.to_string(),
				owner,
				public: true,
			},
		);
		contract
	}

	pub fn set_protocol_fee(&self, fee: u32) {
		self.state.protocol_fee.store(fee, Ordering::SeqCst);
	}

	/// Set a decimal currency balance
	pub fn set_balance(&self, owner: &str, currency: FlowCurrency, amount: &str) -> Result<(), NativeError> {
		self.state
			.balances
			.insert((owner.to_string(), currency), parse_amount(amount)?);
		Ok(())
	}

	pub fn balance(&self, owner: &str, currency: FlowCurrency) -> Decimal {
		self.state
			.balances
			.get(&(owner.to_string(), currency))
			.map(|b| *b)
			.unwrap_or_default()
	}

	pub fn item(&self, item_id: &str) -> Option<FlowItem> {
		self.state.items.get(item_id).map(|i| i.clone())
	}

	pub fn order(&self, order_id: u64) -> Option<FlowOrder> {
		self.state.orders.get(&order_id).map(|o| o.clone())
	}

	pub fn io(&self) -> &ChainIo {
		&self.state.io
	}
}

impl FlowState {
	fn next_order_id(&self) -> u64 {
		self.last_order_id.fetch_add(1, Ordering::SeqCst) + 1
	}

	fn active_order(&self, order_id: u64) -> Result<FlowOrder, NativeError> {
		let order = self
			.orders
			.get(&order_id)
			.map(|o| o.clone())
			.ok_or_else(|| not_found("Order", &order_id.to_string()))?;
		if order.cancelled || order.make_stock == "0" {
			return Err(NativeError::with_code(
				"ORDER_INACTIVE",
				format!("Listing {} is no longer available", order_id),
			));
		}
		Ok(order)
	}

	fn listing(
		&self,
		order_id: u64,
		item: &FlowItem,
		contract: String,
		price: Decimal,
		data: FlowOrderData,
	) -> FlowOrder {
		let now = Utc::now();
		FlowOrder {
			id: order_id,
			item_id: item.id.clone(),
			maker: item.owner.clone(),
			taker: None,
			make: FlowAsset {
				asset_type: FlowAssetType::FlowNft {
					contract: item.contract.clone(),
					token_id: item.token_id,
				},
				value: "1".to_string(),
			},
			take: FlowAsset {
				asset_type: FlowAssetType::FlowFt { contract },
				value: price.normalize().to_string(),
			},
			fill: "0".to_string(),
			make_stock: "1".to_string(),
			cancelled: false,
			created_at: now,
			last_updated_at: now,
			data,
		}
	}
}

/// Wallet connected to a [`MemoryFlowChain`]
#[derive(Debug, Clone)]
pub struct MemoryFlowClient {
	state: Arc<FlowState>,
	address: String,
}

impl MemoryFlowClient {
	pub fn wallet_address(&self) -> &str {
		&self.address
	}
}

#[async_trait]
impl FlowClient for MemoryFlowClient {
	async fn address(&self) -> Result<String, NativeError> {
		Ok(self.address.clone())
	}

	async fn get_item(&self, item_id: &str) -> Result<FlowItem, NativeError> {
		self.state.io.read();
		self.state
			.items
			.get(item_id)
			.map(|i| i.clone())
			.ok_or_else(|| not_found("Item", item_id))
	}

	async fn get_collection(&self, contract: &str) -> Result<FlowCollection, NativeError> {
		self.state.io.read();
		self.state
			.collections
			.get(contract)
			.map(|c| c.clone())
			.ok_or_else(|| not_found("Collection", contract))
	}

	async fn get_order(&self, order_id: u64) -> Result<FlowOrder, NativeError> {
		self.state.io.read();
		self.state
			.orders
			.get(&order_id)
			.map(|o| o.clone())
			.ok_or_else(|| not_found("Order", &order_id.to_string()))
	}

	async fn get_protocol_fee(&self) -> Result<u32, NativeError> {
		self.state.io.read();
		Ok(self.state.protocol_fee.load(Ordering::SeqCst))
	}

	async fn get_balance(&self, owner: &str, currency: FlowCurrency) -> Result<String, NativeError> {
		self.state.io.read();
		let balance = self
			.state
			.balances
			.get(&(owner.to_string(), currency))
			.map(|b| *b)
			.unwrap_or_default();
		Ok(balance.normalize().to_string())
	}

	async fn mint(&self, request: FlowMintRequest) -> Result<FlowMintOutcome, NativeError> {
		let state = &self.state;
		state.io.write()?;
		if !state.collections.contains_key(&request.collection) {
			return Err(not_found("Collection", &request.collection));
		}

		let token_id = state.last_token_id.fetch_add(1, Ordering::SeqCst) + 1;
		let transaction = state.io.transaction(transaction_hash(), vec!["Minted".to_string()]);
		if transaction.succeeded() {
			let item_id = format!("{}:{}", request.collection, token_id);
			state.items.insert(
				item_id.clone(),
				FlowItem {
					id: item_id,
					contract: request.collection,
					token_id,
					owner: self.address.clone(),
					creator: self.address.clone(),
					royalties: request.royalties,
					meta_uri: request.meta_uri,
					deleted: false,
				},
			);
		}

		Ok(FlowMintOutcome {
			transaction: Arc::new(transaction),
			token_id,
		})
	}

	async fn sell(&self, request: FlowSellRequest) -> Result<FlowOrderOutcome, NativeError> {
		let state = &self.state;
		state.io.write()?;

		let item_id = format!("{}:{}", request.collection, request.token_id);
		let item = state
			.items
			.get(&item_id)
			.map(|i| i.clone())
			.ok_or_else(|| not_found("Item", &item_id))?;
		if item.owner != self.address {
			return Err(NativeError::with_code(
				"NOT_OWNER",
				format!("{} does not own {}", self.address, item_id),
			));
		}

		let price = parse_amount(&request.price)?;
		let order_id = state.next_order_id();
		let transaction = state.io.transaction(transaction_hash(), vec!["ListingAvailable".to_string()]);
		if transaction.succeeded() {
			let data = FlowOrderData {
				payouts: request.payouts,
				origin_fees: request.origin_fees,
			};
			let contract = currency_contract(Environment::Testnet, request.currency);
			let order = state.listing(order_id, &item, contract, price, data);
			state.orders.insert(order_id, order);
		}

		Ok(FlowOrderOutcome {
			transaction: Arc::new(transaction),
			order_id,
		})
	}

	async fn update_order(&self, request: FlowUpdateRequest) -> Result<FlowOrderOutcome, NativeError> {
		let state = &self.state;
		state.io.write()?;

		let mut previous = state.active_order(request.order_id)?;
		if previous.maker != self.address {
			return Err(NativeError::with_code(
				"NOT_OWNER",
				format!("Listing {} belongs to {}", previous.id, previous.maker),
			));
		}
		let item = state
			.items
			.get(&previous.item_id)
			.map(|i| i.clone())
			.ok_or_else(|| not_found("Item", &previous.item_id))?;
		let FlowAssetType::FlowFt { contract } = previous.take.asset_type.clone() else {
			return Err(NativeError::with_code("BAD_ORDER", "Listing is not priced in a token"));
		};

		let price = parse_amount(&request.price)?;
		let order_id = state.next_order_id();
		let transaction = state.io.transaction(
			transaction_hash(),
			vec!["ListingCompleted".to_string(), "ListingAvailable".to_string()],
		);
		if transaction.succeeded() {
			previous.cancelled = true;
			previous.last_updated_at = Utc::now();
			let replacement = state.listing(order_id, &item, contract, price, previous.data.clone());
			state.orders.insert(previous.id, previous);
			state.orders.insert(order_id, replacement);
		}

		Ok(FlowOrderOutcome {
			transaction: Arc::new(transaction),
			order_id,
		})
	}

	async fn buy(&self, request: FlowBuyRequest) -> Result<Arc<dyn NativeTransaction>, NativeError> {
		let state = &self.state;
		state.io.write()?;

		let mut order = state.active_order(request.order_id)?;
		let FlowAssetType::FlowFt { contract } = &order.take.asset_type else {
			return Err(NativeError::with_code("BAD_ORDER", "Listing is not priced in a token"));
		};
		let currency = fungible_token(contract).map_err(|e| NativeError::with_code("BAD_ORDER", e.to_string()))?;
		let price = parse_amount(&order.take.value)?;

		let buyer_key = (self.address.clone(), currency);
		let funds = state.balances.get(&buyer_key).map(|b| *b).unwrap_or_default();
		if funds < price {
			return Err(NativeError::with_code(
				"INSUFFICIENT_FUNDS",
				format!("{} holds {} {:?}, needs {}", self.address, funds, currency, price),
			));
		}

		let transaction = state.io.transaction(transaction_hash(), vec!["ListingCompleted".to_string()]);
		if transaction.succeeded() {
			state.balances.insert(buyer_key, funds - price);
			*state
				.balances
				.entry((order.maker.clone(), currency))
				.or_default() += price;
			if let Some(mut item) = state.items.get_mut(&order.item_id) {
				item.owner = self.address.clone();
			}
			order.fill = "1".to_string();
			order.make_stock = "0".to_string();
			order.taker = Some(self.address.clone());
			order.last_updated_at = Utc::now();
			state.orders.insert(order.id, order);
		}

		Ok(Arc::new(transaction))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_buy_moves_item_and_funds() {
		let chain = MemoryFlowChain::new();
		let seller = chain.wallet();
		let buyer = chain.wallet();
		let contract = chain.deploy_collection("CommonNFT");

		let minted = seller
			.mint(FlowMintRequest {
				collection: contract.clone(),
				meta_uri: "ipfs://meta".to_string(),
				royalties: Vec::new(),
			})
			.await
			.unwrap();
		let listed = seller
			.sell(FlowSellRequest {
				collection: contract.clone(),
				token_id: minted.token_id,
				currency: FlowCurrency::Flow,
				price: "2.50000000".to_string(),
				payouts: Vec::new(),
				origin_fees: Vec::new(),
			})
			.await
			.unwrap();

		let request = FlowBuyRequest {
			order_id: listed.order_id,
			origin_fees: Vec::new(),
		};
		let err = buyer.buy(request.clone()).await.unwrap_err();
		assert_eq!(err.code.as_deref(), Some("INSUFFICIENT_FUNDS"));

		chain.set_balance(buyer.wallet_address(), FlowCurrency::Flow, "10").unwrap();
		buyer.buy(request).await.unwrap();

		let item = chain.item(&format!("{}:{}", contract, minted.token_id)).unwrap();
		assert_eq!(item.owner, buyer.wallet_address());
		assert_eq!(chain.order(listed.order_id).unwrap().make_stock, "0");
		assert_eq!(
			chain.balance(seller.wallet_address(), FlowCurrency::Flow),
			Decimal::new(25, 1)
		);
	}
}
