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


//! In-memory EVM chain
//!
//! Holds collections, items, ownerships, balances and the order book of one
//! EVM chain. Wallets sign with secp256k1 keys and the order book checks
//! every signature. Transactions apply their effects as soon as they are
//! sent.

use std::sync::{
	Arc, Mutex,
	atomic::{AtomicU32, AtomicU64, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use tessera_sdk::{
	Blockchain, NativeError, NativeTransaction, SignatureAlgorithm, sign_payload, verify_payload,
};

use super::EthereumClient;
use super::types::{
	EthAssetType, EthBalance, EthCollection, EthCollectionFeature, EthCollectionType,
	EthFillForm, EthItem, EthMintForm, EthOrder, EthOrderForm, EthOwnership, EthPriceHistoryRecord,
};
use crate::chains::memory::{
	ChainIo, content_hash, generate_key, not_found, transaction_hash,
};

const DEFAULT_DECIMALS: u32 = 18;

#[derive(Debug)]
struct EthState {
	blockchain: Blockchain,
	io: ChainIo,
	base_fee: AtomicU32,
	next_token_id: AtomicU64,
	collections: DashMap<String, EthCollection>,
	items: DashMap<String, EthItem>,
	/// (item id, owner) -> token amount
	ownerships: DashMap<(String, String), u64>,
	orders: DashMap<String, EthOrder>,
	decimals: DashMap<String, u32>,
	/// (owner, currency key) -> base units
	balances: DashMap<(String, String), u128>,
	/// Wallet address -> SEC1 public key
	signers: DashMap<String, Vec<u8>>,
	last_order_form: Mutex<Option<EthOrderForm>>,
}

/// Shared in-memory EVM chain
#[derive(Debug, Clone)]
pub struct MemoryEthereumChain {
	state: Arc<EthState>,
}

fn random_address() -> String {
	let digest = Sha256::digest(uuid::Uuid::new_v4().as_bytes());
	format!("0x{}", hex::encode(&digest[12..]))
}

fn currency_key(asset_type: &EthAssetType) -> Option<String> {
	match asset_type {
		EthAssetType::Eth => Some("ETH".to_string()),
		EthAssetType::Erc20 { contract } => Some(format!("ERC20:{}", contract)),
		_ => None,
	}
}

fn nft_item_id(asset_type: &EthAssetType) -> Option<String> {
	match asset_type {
		EthAssetType::Erc721 { contract, token_id }
		| EthAssetType::Erc721Lazy {
			contract, token_id, ..
		}
		| EthAssetType::Erc1155 { contract, token_id }
		| EthAssetType::Erc1155Lazy {
			contract, token_id, ..
		} => Some(format!("{}:{}", contract, token_id)),
		EthAssetType::CryptoPunks { contract, token_id } => {
			Some(format!("{}:{}", contract, token_id))
		}
		_ => None,
	}
}

fn parse_units(value: &str) -> Result<u128, NativeError> {
	value
		.parse::<u128>()
		.map_err(|e| NativeError::with_code("BAD_VALUE", format!("{}: {}", value, e)))
}

fn to_decimal_string(units: u128, decimals: u32) -> Result<String, NativeError> {
	let units = i128::try_from(units).map_err(|e| NativeError::new(e.to_string()))?;
	Decimal::try_from_i128_with_scale(units, decimals)
		.map(|d| d.normalize().to_string())
		.map_err(|e| NativeError::new(e.to_string()))
}

impl MemoryEthereumChain {
	pub fn new(blockchain: Blockchain) -> Self {
		Self {
			state: Arc::new(EthState {
				blockchain,
				io: ChainIo::default(),
				base_fee: AtomicU32::new(0),
				next_token_id: AtomicU64::new(1),
				collections: DashMap::new(),
				items: DashMap::new(),
				ownerships: DashMap::new(),
				orders: DashMap::new(),
				decimals: DashMap::new(),
				balances: DashMap::new(),
				signers: DashMap::new(),
				last_order_form: Mutex::new(None),
			}),
		}
	}

	pub fn blockchain(&self) -> Blockchain {
		self.state.blockchain
	}

	/// Connect a new wallet with a fresh key
	pub fn wallet(&self) -> MemoryEthereumClient {
		let (key, public) = generate_key(SignatureAlgorithm::Ecdsa);
		let address = format!("0x{}", hex::encode(&Sha256::digest(&public)[12..]));
		self.state.signers.insert(address.clone(), public);
		MemoryEthereumClient {
			state: self.state.clone(),
			key,
			address,
		}
	}

	/// Deploy a collection and return its address
	pub fn deploy_collection(
		&self,
		kind: EthCollectionType,
		features: Vec<EthCollectionFeature>,
	) -> String {
		let address = random_address();
		self.state.collections.insert(
			address.clone(),
			EthCollection {
				id: address.clone(),
				kind,
				name: format!("{:?} collection", kind),
				owner: None,
				features,
			},
		);
		address
	}

	/// Deploy an ERC-20 token and return its address
	pub fn deploy_token(&self, decimals: u32) -> String {
		let address = random_address();
		self.state.decimals.insert(address.clone(), decimals);
		address
	}

	pub fn set_base_fee(&self, base_fee: u32) {
		self.state.base_fee.store(base_fee, Ordering::SeqCst);
	}

	/// Credit a currency balance, in base units
	pub fn set_balance(&self, owner: &str, currency: &EthAssetType, units: u128) {
		if let Some(key) = currency_key(currency) {
			self.state.balances.insert((owner.to_string(), key), units);
		}
	}

	/// Put an order into the book as is, bypassing signature checks
	pub fn insert_order(&self, order: EthOrder) {
		self.state.orders.insert(order.hash.clone(), order);
	}

	pub fn order(&self, hash: &str) -> Option<EthOrder> {
		self.state.orders.get(hash).map(|o| o.clone())
	}

	pub fn ownership(&self, item_id: &str, owner: &str) -> u64 {
		self.state
			.ownerships
			.get(&(item_id.to_string(), owner.to_string()))
			.map(|v| *v)
			.unwrap_or(0)
	}

	/// Last order form accepted by the order book
	pub fn last_order_form(&self) -> Option<EthOrderForm> {
		self.state
			.last_order_form
			.lock()
			.ok()
			.and_then(|form| form.clone())
	}

	pub fn io(&self) -> &ChainIo {
		&self.state.io
	}
}

impl EthState {
	fn decimals_of(&self, asset_type: &EthAssetType) -> Option<u32> {
		match asset_type {
			EthAssetType::Eth => Some(super::NATIVE_DECIMALS),
			EthAssetType::Erc20 { contract } => Some(
				self.decimals
					.get(contract)
					.map(|d| *d)
					.unwrap_or(DEFAULT_DECIMALS),
			),
			_ => None,
		}
	}

	/// Order as the indexer reports it, with decimal values filled in
	fn render(&self, order: &EthOrder) -> Result<EthOrder, NativeError> {
		let mut order = order.clone();
		for asset in [&mut order.make, &mut order.take] {
			if let Some(decimals) = self.decimals_of(&asset.asset_type) {
				asset.value_decimal = Some(to_decimal_string(parse_units(&asset.value)?, decimals)?);
			}
		}
		order.make_stock_value = match self.decimals_of(&order.make.asset_type) {
			Some(decimals) => Some(to_decimal_string(parse_units(&order.make_stock)?, decimals)?),
			None => None,
		};
		Ok(order)
	}

	fn transfer(&self, item_id: &str, from: &str, to: &str, amount: u64) -> Result<(), NativeError> {
		let from_key = (item_id.to_string(), from.to_string());
		let held = self.ownerships.get(&from_key).map(|v| *v).unwrap_or(0);
		if held < amount {
			return Err(NativeError::with_code(
				"INSUFFICIENT_BALANCE",
				format!("{} holds {} of {}, needs {}", from, held, item_id, amount),
			));
		}
		self.ownerships.insert(from_key, held - amount);
		*self
			.ownerships
			.entry((item_id.to_string(), to.to_string()))
			.or_insert(0) += amount;
		Ok(())
	}

	fn verify<T: serde::Serialize>(
		&self,
		payload: &T,
		signer: &str,
		signature: &str,
	) -> Result<(), NativeError> {
		let public = self
			.signers
			.get(signer)
			.map(|k| k.clone())
			.ok_or_else(|| not_found("Signer", signer))?;
		let signature = tessera_sdk::Binary::parse(signature)
			.map_err(|e| NativeError::with_code("INVALID_SIGNATURE", e.to_string()))?;
		// Wallets sign the JSON value, whose object keys are sorted
		let payload = serde_json::to_value(payload).map_err(|e| NativeError::new(e.to_string()))?;

		match verify_payload(&payload, &signature, &public, SignatureAlgorithm::Ecdsa) {
			Ok(true) => Ok(()),
			Ok(false) => Err(NativeError::with_code(
				"INVALID_SIGNATURE",
				format!("Signature does not match {}", signer),
			)),
			Err(e) => Err(NativeError::with_code("INVALID_SIGNATURE", e.to_string())),
		}
	}
}

/// Wallet connected to a [`MemoryEthereumChain`]
#[derive(Debug, Clone)]
pub struct MemoryEthereumClient {
	state: Arc<EthState>,
	key: [u8; 32],
	address: String,
}

impl MemoryEthereumClient {
	pub fn wallet_address(&self) -> &str {
		&self.address
	}
}

#[async_trait]
impl EthereumClient for MemoryEthereumClient {
	async fn address(&self) -> Result<String, NativeError> {
		Ok(self.address.clone())
	}

	async fn get_item(&self, item_id: &str) -> Result<EthItem, NativeError> {
		self.state.io.read();
		self.state
			.items
			.get(item_id)
			.map(|i| i.clone())
			.ok_or_else(|| not_found("Item", item_id))
	}

	async fn get_collection(&self, contract: &str) -> Result<EthCollection, NativeError> {
		self.state.io.read();
		self.state
			.collections
			.get(contract)
			.map(|c| c.clone())
			.ok_or_else(|| not_found("Collection", contract))
	}

	async fn get_ownership(
		&self,
		item_id: &str,
		owner: &str,
	) -> Result<Option<EthOwnership>, NativeError> {
		self.state.io.read();
		let value = self
			.state
			.ownerships
			.get(&(item_id.to_string(), owner.to_string()))
			.map(|v| *v)
			.unwrap_or(0);
		if value == 0 {
			return Ok(None);
		}

		let (contract, token_id) = item_id
			.rsplit_once(':')
			.ok_or_else(|| not_found("Item", item_id))?;
		Ok(Some(EthOwnership {
			id: format!("{}:{}", item_id, owner),
			contract: contract.to_string(),
			token_id: token_id.to_string(),
			owner: owner.to_string(),
			value: value.to_string(),
		}))
	}

	async fn get_order(&self, hash: &str) -> Result<EthOrder, NativeError> {
		self.state.io.read();
		let order = self
			.state
			.orders
			.get(hash)
			.map(|o| o.clone())
			.ok_or_else(|| not_found("Order", hash))?;
		self.state.render(&order)
	}

	async fn get_base_order_fee(&self) -> Result<u32, NativeError> {
		self.state.io.read();
		Ok(self.state.base_fee.load(Ordering::SeqCst))
	}

	async fn get_decimals(&self, contract: &str) -> Result<u32, NativeError> {
		self.state.io.read();
		Ok(self
			.state
			.decimals
			.get(contract)
			.map(|d| *d)
			.unwrap_or(DEFAULT_DECIMALS))
	}

	async fn get_balance(
		&self,
		owner: &str,
		asset_type: &EthAssetType,
	) -> Result<EthBalance, NativeError> {
		self.state.io.read();
		let key = currency_key(asset_type).ok_or_else(|| {
			NativeError::with_code("BAD_ASSET", format!("{} has no balance", asset_type.class()))
		})?;
		let units = self
			.state
			.balances
			.get(&(owner.to_string(), key))
			.map(|v| *v)
			.unwrap_or(0);
		let decimals = self.state.decimals_of(asset_type).unwrap_or(DEFAULT_DECIMALS);

		Ok(EthBalance {
			owner: owner.to_string(),
			balance: units.to_string(),
			decimal_balance: to_decimal_string(units, decimals)?,
		})
	}

	async fn generate_token_id(&self, _contract: &str, _minter: &str) -> Result<String, NativeError> {
		self.state.io.read();
		Ok(self
			.state
			.next_token_id
			.fetch_add(1, Ordering::SeqCst)
			.to_string())
	}

	async fn sign(&self, payload: &serde_json::Value) -> Result<String, NativeError> {
		sign_payload(payload, &self.key, SignatureAlgorithm::Ecdsa)
			.map(|signature| signature.as_str().to_string())
			.map_err(|e| NativeError::with_code("SIGNING_FAILED", e.to_string()))
	}

	async fn upsert_order(&self, form: EthOrderForm) -> Result<EthOrder, NativeError> {
		let state = &self.state;
		state.io.write()?;

		let signature = form
			.signature
			.clone()
			.ok_or_else(|| NativeError::with_code("INVALID_SIGNATURE", "Order is not signed"))?;
		let unsigned = EthOrderForm {
			signature: None,
			..form.clone()
		};
		state.verify(&unsigned, &form.maker, &signature)?;

		let hash = content_hash(&(
			&form.maker,
			&form.make.asset_type,
			&form.take.asset_type,
			&form.salt,
		))?;
		let now = Utc::now();
		let make_value = parse_units(&form.make.value)?;
		let take_value = parse_units(&form.take.value)?;

		let order = match state.orders.get(&hash).map(|o| o.clone()) {
			Some(mut existing) => {
				let fill = parse_units(&existing.fill)?;
				let make_stock = if form.make.asset_type.is_currency() {
					make_value.saturating_sub(fill.saturating_mul(make_value) / take_value.max(1))
				} else {
					make_value.saturating_sub(fill)
				};
				existing.price_history.push(EthPriceHistoryRecord {
					date: now,
					make_value: existing.make.value.clone(),
					take_value: existing.take.value.clone(),
				});
				existing.make = form.make.clone();
				existing.take = form.take.clone();
				existing.make_stock = make_stock.to_string();
				existing.signature = Some(signature);
				existing.data = form.data.clone();
				existing.last_updated_at = now;
				existing
			}
			None => EthOrder {
				hash: hash.clone(),
				maker: form.maker.clone(),
				taker: form.taker.clone(),
				make: form.make.clone(),
				take: form.take.clone(),
				fill: "0".to_string(),
				make_stock: make_value.to_string(),
				make_stock_value: None,
				cancelled: false,
				salt: form.salt.clone(),
				signature: Some(signature),
				created_at: now,
				last_updated_at: now,
				make_price: None,
				take_price: None,
				pending: Vec::new(),
				price_history: Vec::new(),
				data: form.data.clone(),
			},
		};

		state.orders.insert(hash, order.clone());
		if let Ok(mut last) = state.last_order_form.lock() {
			*last = Some(form);
		}
		state.render(&order)
	}

	async fn mint(&self, form: EthMintForm) -> Result<Arc<dyn NativeTransaction>, NativeError> {
		let state = &self.state;
		state.io.write()?;

		let collection = state
			.collections
			.get(&form.contract)
			.map(|c| c.kind)
			.ok_or_else(|| not_found("Collection", &form.contract))?;
		let supply = parse_units(&form.supply)?;
		let supply = u64::try_from(supply).map_err(|e| NativeError::new(e.to_string()))?;

		let event = match collection {
			EthCollectionType::Erc1155 => "TransferSingle",
			_ => "Transfer",
		};
		let transaction = state.io.transaction(transaction_hash(), vec![event.to_string()]);
		if transaction.succeeded() {
			let item_id = format!("{}:{}", form.contract, form.token_id);
			state.items.insert(
				item_id.clone(),
				EthItem {
					id: item_id.clone(),
					contract: form.contract.clone(),
					token_id: form.token_id.clone(),
					creators: form.creators.clone(),
					supply: form.supply.clone(),
					lazy_supply: "0".to_string(),
					deleted: false,
				},
			);
			*state.ownerships.entry((item_id, self.address.clone())).or_insert(0) += supply;
		}

		Ok(Arc::new(transaction))
	}

	async fn mint_lazy(&self, form: EthMintForm) -> Result<EthItem, NativeError> {
		let state = &self.state;
		state.io.write()?;

		let creator = form
			.creators
			.first()
			.map(|c| c.account.clone())
			.ok_or_else(|| NativeError::with_code("INVALID_MINT", "Lazy mint without creators"))?;
		let signature = form
			.signatures
			.first()
			.cloned()
			.ok_or_else(|| NativeError::with_code("INVALID_SIGNATURE", "Lazy mint is not signed"))?;
		let unsigned = EthMintForm {
			signatures: Vec::new(),
			..form.clone()
		};
		state.verify(&unsigned, &creator, &signature)?;

		let supply = u64::try_from(parse_units(&form.supply)?)
			.map_err(|e| NativeError::new(e.to_string()))?;
		let item_id = format!("{}:{}", form.contract, form.token_id);
		let item = EthItem {
			id: item_id.clone(),
			contract: form.contract,
			token_id: form.token_id,
			creators: form.creators,
			supply: form.supply.clone(),
			lazy_supply: form.supply,
			deleted: false,
		};
		state.items.insert(item_id.clone(), item.clone());
		*state.ownerships.entry((item_id, creator)).or_insert(0) += supply;

		Ok(item)
	}

	async fn fill_order(&self, form: EthFillForm) -> Result<Arc<dyn NativeTransaction>, NativeError> {
		let state = &self.state;
		state.io.write()?;

		let mut order = state
			.orders
			.get(&form.order_hash)
			.map(|o| o.clone())
			.ok_or_else(|| not_found("Order", &form.order_hash))?;
		if order.cancelled {
			return Err(NativeError::with_code(
				"ORDER_CANCELLED",
				format!("Order {} is cancelled", order.hash),
			));
		}

		let amount = u128::from(form.amount);
		let make_value = parse_units(&order.make.value)?;
		let take_value = parse_units(&order.take.value)?;
		let make_stock = parse_units(&order.make_stock)?;
		let is_sell = !order.make.asset_type.is_currency();

		let (item_id, spent_stock) = if is_sell {
			(nft_item_id(&order.make.asset_type), amount)
		} else {
			(
				nft_item_id(&order.take.asset_type),
				amount * make_value / take_value.max(1),
			)
		};
		let item_id = item_id.ok_or_else(|| {
			NativeError::with_code("BAD_ORDER", format!("Order {} trades no token", order.hash))
		})?;
		if spent_stock == 0 || spent_stock > make_stock {
			return Err(NativeError::with_code(
				"INSUFFICIENT_STOCK",
				format!("Order {} has {} left, needs {}", order.hash, make_stock, spent_stock),
			));
		}

		let transaction = state.io.transaction(transaction_hash(), vec!["Match".to_string()]);
		if transaction.succeeded() {
			if is_sell {
				state.transfer(&item_id, &order.maker, &self.address, form.amount)?;
			} else {
				state.transfer(&item_id, &self.address, &order.maker, form.amount)?;
			}
			order.make_stock = (make_stock - spent_stock).to_string();
			order.fill = (parse_units(&order.fill)? + amount).to_string();
			order.taker = Some(self.address.clone());
			order.last_updated_at = Utc::now();
			state.orders.insert(order.hash.clone(), order);
		}

		Ok(Arc::new(transaction))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chains::ethereum::types::{EthAsset, EthOrderData};

	fn form(maker: &str, contract: &str) -> EthOrderForm {
		EthOrderForm {
			maker: maker.to_string(),
			taker: None,
			make: EthAsset {
				asset_type: EthAssetType::Erc721 {
					contract: contract.to_string(),
					token_id: "1".to_string(),
				},
				value: "1".to_string(),
				value_decimal: None,
			},
			take: EthAsset {
				asset_type: EthAssetType::Eth,
				value: "1000000000000000000".to_string(),
				value_decimal: None,
			},
			salt: "7".to_string(),
			data: EthOrderData::RaribleV2DataV1 {
				payouts: Vec::new(),
				origin_fees: Vec::new(),
			},
			signature: None,
		}
	}

	#[tokio::test]
	async fn test_upsert_requires_maker_signature() {
		let chain = MemoryEthereumChain::new(Blockchain::Ethereum);
		let alice = chain.wallet();
		let mallory = chain.wallet();
		let contract = chain.deploy_collection(EthCollectionType::Erc721, Vec::new());

		let mut forged = form(alice.wallet_address(), &contract);
		let payload = serde_json::to_value(&forged).unwrap();
		forged.signature = Some(mallory.sign(&payload).await.unwrap());
		let err = alice.upsert_order(forged).await.unwrap_err();
		assert_eq!(err.code.as_deref(), Some("INVALID_SIGNATURE"));

		let mut signed = form(alice.wallet_address(), &contract);
		let payload = serde_json::to_value(&signed).unwrap();
		signed.signature = Some(alice.sign(&payload).await.unwrap());
		let order = alice.upsert_order(signed).await.unwrap();

		assert_eq!(order.make_stock, "1");
		assert_eq!(order.take.value_decimal.as_deref(), Some("1"));
		assert_eq!(chain.io().writes(), 2);
	}

	#[tokio::test]
	async fn test_same_salt_updates_in_place() {
		let chain = MemoryEthereumChain::new(Blockchain::Ethereum);
		let alice = chain.wallet();
		let contract = chain.deploy_collection(EthCollectionType::Erc721, Vec::new());

		let mut first = form(alice.wallet_address(), &contract);
		first.signature = Some(alice.sign(&serde_json::to_value(&first).unwrap()).await.unwrap());
		let created = alice.upsert_order(first).await.unwrap();

		let mut second = form(alice.wallet_address(), &contract);
		second.take.value = "2000000000000000000".to_string();
		second.signature = Some(alice.sign(&serde_json::to_value(&second).unwrap()).await.unwrap());
		let updated = alice.upsert_order(second).await.unwrap();

		assert_eq!(created.hash, updated.hash);
		assert_eq!(updated.take.value_decimal.as_deref(), Some("2"));
		assert_eq!(updated.price_history.len(), 1);
	}
}
