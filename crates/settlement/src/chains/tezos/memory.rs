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


//! In-memory Tezos node, indexer and wallet
//!
//! Addresses are real base58check encodings but hash the public key with
//! SHA-256 rather than BLAKE2b.

use std::sync::{
	Arc,
	atomic::{AtomicU32, AtomicU64, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rand::RngCore;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use tessera_sdk::{
	Binary, NativeError, NativeTransaction, SignatureAlgorithm, sign_payload, verify_payload,
};

use super::types::{
	TezosAssetType, TezosCollection, TezosCollectionType, TezosFillForm, TezosItem, TezosMintForm,
	TezosMintOutcome, TezosOrder, TezosOrderForm, TezosOwnership,
};
use super::{TezosApi, TezosProvider};
use crate::chains::memory::{ChainIo, content_hash, generate_key, not_found, transaction_hash};

const IMPLICIT_PREFIX: [u8; 3] = [6, 161, 159];
const CONTRACT_PREFIX: [u8; 3] = [2, 90, 121];
const PUBLIC_KEY_PREFIX: [u8; 4] = [13, 15, 37, 217];

fn encode_check(prefix: &[u8], payload: &[u8]) -> String {
	let mut bytes = prefix.to_vec();
	bytes.extend_from_slice(payload);
	bs58::encode(bytes).with_check().into_string()
}

fn implicit_address(public: &[u8]) -> String {
	encode_check(&IMPLICIT_PREFIX, &Sha256::digest(public)[..20])
}

fn random_contract() -> String {
	let mut bytes = [0u8; 20];
	rand::thread_rng().fill_bytes(&mut bytes);
	encode_check(&CONTRACT_PREFIX, &bytes)
}

fn parse_value(value: &str) -> Result<Decimal, NativeError> {
	value
		.parse()
		.map_err(|_| NativeError::with_code("BAD_VALUE", format!("Not a decimal value: {}", value)))
}

fn nft_item_id(asset_type: &TezosAssetType) -> Option<String> {
	match asset_type {
		TezosAssetType::Nft { contract, token_id } | TezosAssetType::Mt { contract, token_id } => {
			Some(format!("{}:{}", contract, token_id))
		}
		_ => None,
	}
}

#[derive(Debug, Default)]
struct TezosState {
	io: ChainIo,
	protocol_fee: AtomicU32,
	last_token_id: AtomicU64,
	collections: DashMap<String, TezosCollection>,
	items: DashMap<String, TezosItem>,
	ownerships: DashMap<(String, String), Decimal>,
	orders: DashMap<String, TezosOrder>,
	/// Public keys by public key hash
	signers: DashMap<String, Vec<u8>>,
}

impl TezosState {
	fn balance(&self, item_id: &str, owner: &str) -> Decimal {
		self.ownerships
			.get(&(item_id.to_string(), owner.to_string()))
			.map(|v| *v)
			.unwrap_or_default()
	}

	fn transfer(&self, item_id: &str, from: &str, to: &str, amount: Decimal) -> Result<(), NativeError> {
		let held = self.balance(item_id, from);
		if held < amount {
			return Err(NativeError::with_code(
				"FA2_INSUFFICIENT_BALANCE",
				format!("{} holds {} of {}, needs {}", from, held, item_id, amount),
			));
		}
		self.ownerships
			.insert((item_id.to_string(), from.to_string()), held - amount);
		*self
			.ownerships
			.entry((item_id.to_string(), to.to_string()))
			.or_default() += amount;
		Ok(())
	}

	fn verify(&self, form: &TezosOrderForm, signature: &str) -> Result<(), NativeError> {
		let public = self
			.signers
			.get(&form.maker)
			.map(|k| k.clone())
			.ok_or_else(|| not_found("Signer", &form.maker))?;
		let signature = Binary::parse(signature)
			.map_err(|e| NativeError::with_code("INVALID_SIGNATURE", e.to_string()))?;
		let unsigned = TezosOrderForm {
			signature: None,
			..form.clone()
		};
		let payload = serde_json::to_value(&unsigned).map_err(|e| NativeError::new(e.to_string()))?;

		match verify_payload(&payload, &signature, &public, SignatureAlgorithm::Ed25519) {
			Ok(true) => Ok(()),
			Ok(false) => Err(NativeError::with_code(
				"INVALID_SIGNATURE",
				format!("Signature does not match {}", form.maker),
			)),
			Err(e) => Err(NativeError::with_code("INVALID_SIGNATURE", e.to_string())),
		}
	}
}

/// Shared in-memory Tezos chain
#[derive(Debug, Clone, Default)]
pub struct MemoryTezosChain {
	state: Arc<TezosState>,
}

impl MemoryTezosChain {
	pub fn new() -> Self {
		Self::default()
	}

	/// Connect a wallet with a fresh Ed25519 key
	pub fn wallet(&self) -> MemoryTezosWallet {
		let (key, public) = generate_key(SignatureAlgorithm::Ed25519);
		let address = implicit_address(&public);
		let edpk = encode_check(&PUBLIC_KEY_PREFIX, &public);
		self.state.signers.insert(address.clone(), public);
		MemoryTezosWallet {
			state: self.state.clone(),
			key,
			address,
			edpk,
		}
	}

	/// Deploy a public collection, returning its `KT1` address
	pub fn deploy_collection(&self, kind: TezosCollectionType) -> String {
		let contract = random_contract();
		self.state.collections.insert(
			contract.clone(),
			TezosCollection {
				id: contract.clone(),
				kind,
				name: format!("{:?} collection", kind),
				owner: None,
			},
		);
		contract
	}

	pub fn set_protocol_fee(&self, fee: u32) {
		self.state.protocol_fee.store(fee, Ordering::SeqCst);
	}

	pub fn ownership(&self, item_id: &str, owner: &str) -> Decimal {
		self.state.balance(item_id, owner)
	}

	pub fn order(&self, hash: &str) -> Option<TezosOrder> {
		self.state.orders.get(hash).map(|o| o.clone())
	}

	pub fn io(&self) -> &ChainIo {
		&self.state.io
	}
}

/// Wallet connected to a [`MemoryTezosChain`], also serving indexer reads
#[derive(Debug, Clone)]
pub struct MemoryTezosWallet {
	state: Arc<TezosState>,
	key: [u8; 32],
	address: String,
	edpk: String,
}

impl MemoryTezosWallet {
	pub fn wallet_address(&self) -> &str {
		&self.address
	}
}

#[async_trait]
impl TezosApi for MemoryTezosWallet {
	async fn get_item(&self, item_id: &str) -> Result<TezosItem, NativeError> {
		self.state.io.read();
		self.state
			.items
			.get(item_id)
			.map(|i| i.clone())
			.ok_or_else(|| not_found("Item", item_id))
	}

	async fn get_collection(&self, contract: &str) -> Result<TezosCollection, NativeError> {
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
	) -> Result<Option<TezosOwnership>, NativeError> {
		self.state.io.read();
		let Some(item) = self.state.items.get(item_id).map(|i| i.clone()) else {
			return Err(not_found("Item", item_id));
		};
		let value = self.state.balance(item_id, owner);
		if value.is_zero() {
			return Ok(None);
		}
		Ok(Some(TezosOwnership {
			id: format!("{}:{}", item_id, owner),
			contract: item.contract,
			token_id: item.token_id,
			owner: owner.to_string(),
			value: value.normalize().to_string(),
			lazy_value: "0".to_string(),
		}))
	}

	async fn get_order(&self, hash: &str) -> Result<TezosOrder, NativeError> {
		self.state.io.read();
		self.state
			.orders
			.get(hash)
			.map(|o| o.clone())
			.ok_or_else(|| not_found("Order", hash))
	}

	async fn upsert_order(&self, form: TezosOrderForm) -> Result<TezosOrder, NativeError> {
		let state = &self.state;
		state.io.write()?;

		let signature = form
			.signature
			.clone()
			.ok_or_else(|| NativeError::with_code("INVALID_SIGNATURE", "Order is not signed"))?;
		state.verify(&form, &signature)?;

		let key = content_hash(&(
			&form.maker,
			&form.make.asset_type,
			&form.take.asset_type,
			&form.salt,
		))?;
		let hash = key.trim_start_matches("0x").to_string();
		let now = Utc::now();
		let make_value = parse_value(&form.make.value)?;

		let order = match state.orders.get(&hash).map(|o| o.clone()) {
			Some(mut existing) => {
				let fill = parse_value(&existing.fill)?;
				let take_value = parse_value(&form.take.value)?;
				let spent = if form.make.asset_type.is_currency() && !take_value.is_zero() {
					fill * make_value / take_value
				} else {
					fill
				};
				existing.make = form.make.clone();
				existing.take = form.take.clone();
				existing.make_stock = (make_value - spent).max(Decimal::ZERO).normalize().to_string();
				existing.signature = Some(signature);
				existing.data = form.data.clone();
				existing.last_updated_at = now;
				existing
			}
			None => TezosOrder {
				hash: hash.clone(),
				maker: form.maker.clone(),
				maker_edpk: form.maker_edpk.clone(),
				taker: form.taker.clone(),
				make: form.make.clone(),
				take: form.take.clone(),
				fill: "0".to_string(),
				make_stock: make_value.normalize().to_string(),
				cancelled: false,
				salt: form.salt.clone(),
				signature: Some(signature),
				created_at: now,
				last_updated_at: now,
				data: form.data.clone(),
			},
		};

		state.orders.insert(hash, order.clone());
		Ok(order)
	}
}

#[async_trait]
impl TezosProvider for MemoryTezosWallet {
	async fn address(&self) -> Result<String, NativeError> {
		Ok(self.address.clone())
	}

	async fn public_key(&self) -> Result<String, NativeError> {
		Ok(self.edpk.clone())
	}

	async fn get_protocol_fee(&self) -> Result<u32, NativeError> {
		self.state.io.read();
		Ok(self.state.protocol_fee.load(Ordering::SeqCst))
	}

	async fn sign(&self, payload: &serde_json::Value) -> Result<String, NativeError> {
		sign_payload(payload, &self.key, SignatureAlgorithm::Ed25519)
			.map(|signature| signature.as_str().to_string())
			.map_err(|e| NativeError::with_code("SIGNING_FAILED", e.to_string()))
	}

	async fn mint(&self, form: TezosMintForm) -> Result<TezosMintOutcome, NativeError> {
		let state = &self.state;
		state.io.write()?;

		let kind = state
			.collections
			.get(&form.contract)
			.map(|c| c.kind)
			.ok_or_else(|| not_found("Collection", &form.contract))?;
		if form.amount == 0 || (kind == TezosCollectionType::Nft && form.amount != 1) {
			return Err(NativeError::with_code(
				"FA2_INVALID_AMOUNT",
				format!("Cannot mint {} into {}", form.amount, form.contract),
			));
		}

		let token_id = (state.last_token_id.fetch_add(1, Ordering::SeqCst) + 1).to_string();
		let transaction = state.io.transaction(transaction_hash(), vec!["mint".to_string()]);
		if transaction.succeeded() {
			let item_id = format!("{}:{}", form.contract, token_id);
			let supply = Decimal::from(form.amount);
			state.items.insert(
				item_id.clone(),
				TezosItem {
					id: item_id.clone(),
					contract: form.contract,
					token_id: token_id.clone(),
					creators: form.creators,
					supply: supply.to_string(),
					lazy_supply: "0".to_string(),
					owners: vec![form.owner.clone()],
					royalties: form.royalties,
					date: Utc::now(),
					deleted: false,
				},
			);
			state.ownerships.insert((item_id, form.owner), supply);
		}

		Ok(TezosMintOutcome {
			transaction: Arc::new(transaction),
			token_id,
		})
	}

	async fn fill_order(&self, form: TezosFillForm) -> Result<Arc<dyn NativeTransaction>, NativeError> {
		let state = &self.state;
		state.io.write()?;

		let mut order = state
			.orders
			.get(&form.order_hash)
			.map(|o| o.clone())
			.ok_or_else(|| not_found("Order", &form.order_hash))?;
		let amount = Decimal::from(form.amount);
		let make_stock = parse_value(&order.make_stock)?;

		// Sells carry the item on the make side, bids on the take side
		let (item_id, spent, seller, buyer) = match nft_item_id(&order.make.asset_type) {
			Some(item_id) => (item_id, amount, order.maker.clone(), self.address.clone()),
			None => {
				let item_id = nft_item_id(&order.take.asset_type)
					.ok_or_else(|| NativeError::with_code("BAD_ORDER", "Order trades no token"))?;
				let make = parse_value(&order.make.value)?;
				let take = parse_value(&order.take.value)?;
				if take.is_zero() {
					return Err(NativeError::with_code("BAD_ORDER", "Order takes nothing"));
				}
				(item_id, amount * make / take, self.address.clone(), order.maker.clone())
			}
		};
		if order.cancelled || spent > make_stock {
			return Err(NativeError::with_code(
				"ORDER_INACTIVE",
				format!("Order {} cannot fill {}", order.hash, form.amount),
			));
		}
		if state.balance(&item_id, &seller) < amount {
			return Err(NativeError::with_code(
				"FA2_INSUFFICIENT_BALANCE",
				format!("{} does not hold {} of {}", seller, amount, item_id),
			));
		}

		let transaction = state.io.transaction(transaction_hash(), vec!["match_orders".to_string()]);
		if transaction.succeeded() {
			state.transfer(&item_id, &seller, &buyer, amount)?;
			let fill = parse_value(&order.fill)? + amount;
			order.fill = fill.normalize().to_string();
			order.make_stock = (make_stock - spent).normalize().to_string();
			order.last_updated_at = Utc::now();
			state.orders.insert(order.hash.clone(), order);
		}

		Ok(Arc::new(transaction))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chains::tezos::common::parse_address;
	use crate::chains::tezos::types::{TezosAsset, TezosOrderData};

	fn listing(maker: &MemoryTezosWallet, contract: &str, price: &str) -> TezosOrderForm {
		TezosOrderForm {
			maker: maker.address.clone(),
			maker_edpk: maker.edpk.clone(),
			taker: None,
			make: TezosAsset {
				asset_type: TezosAssetType::Mt {
					contract: contract.to_string(),
					token_id: "1".to_string(),
				},
				value: "5".to_string(),
			},
			take: TezosAsset {
				asset_type: TezosAssetType::Xtz,
				value: price.to_string(),
			},
			salt: "42".to_string(),
			data: TezosOrderData {
				payouts: Vec::new(),
				origin_fees: Vec::new(),
			},
			signature: None,
		}
	}

	async fn sign(wallet: &MemoryTezosWallet, mut form: TezosOrderForm) -> TezosOrderForm {
		let payload = serde_json::to_value(&form).unwrap();
		form.signature = Some(wallet.sign(&payload).await.unwrap());
		form
	}

	#[tokio::test]
	async fn test_generated_addresses_are_valid() {
		let chain = MemoryTezosChain::new();
		let wallet = chain.wallet();
		let contract = chain.deploy_collection(TezosCollectionType::Nft);

		assert!(parse_address(wallet.wallet_address()).is_ok());
		assert!(parse_address(&contract).is_ok());
		assert!(contract.starts_with("KT1"));
		assert!(wallet.edpk.starts_with("edpk"));
	}

	#[tokio::test]
	async fn test_upsert_checks_signer_and_updates_in_place() {
		let chain = MemoryTezosChain::new();
		let alice = chain.wallet();
		let mallory = chain.wallet();
		let contract = chain.deploy_collection(TezosCollectionType::Mt);

		let forged = sign(&mallory, listing(&alice, &contract, "10")).await;
		let err = alice.upsert_order(forged).await.unwrap_err();
		assert_eq!(err.code.as_deref(), Some("INVALID_SIGNATURE"));

		let first = alice
			.upsert_order(sign(&alice, listing(&alice, &contract, "10")).await)
			.await
			.unwrap();
		let second = alice
			.upsert_order(sign(&alice, listing(&alice, &contract, "7.5")).await)
			.await
			.unwrap();

		assert_eq!(first.hash, second.hash);
		assert_eq!(chain.order(&first.hash).unwrap().take.value, "7.5");
		assert_eq!(second.make_stock, "5");
	}

	#[tokio::test]
	async fn test_reverted_fill_keeps_ownership() {
		let chain = MemoryTezosChain::new();
		let seller = chain.wallet();
		let buyer = chain.wallet();
		let contract = chain.deploy_collection(TezosCollectionType::Mt);

		let minted = seller
			.mint(TezosMintForm {
				contract: contract.clone(),
				owner: seller.address.clone(),
				amount: 5,
				uri: "ipfs://meta".to_string(),
				creators: Vec::new(),
				royalties: Vec::new(),
			})
			.await
			.unwrap();
		assert_eq!(minted.token_id, "1");

		let order = seller
			.upsert_order(sign(&seller, listing(&seller, &contract, "10")).await)
			.await
			.unwrap();
		let fill = TezosFillForm {
			order_hash: order.hash.clone(),
			amount: 2,
			infinite_approval: false,
			payouts: Vec::new(),
			origin_fees: Vec::new(),
		};

		chain.io().set_revert_transactions(true);
		let reverted = buyer.fill_order(fill.clone()).await.unwrap();
		assert!(!reverted.wait().await.unwrap().success);
		assert_eq!(chain.ownership(&format!("{}:1", contract), buyer.wallet_address()), Decimal::ZERO);

		chain.io().set_revert_transactions(false);
		buyer.fill_order(fill).await.unwrap();
		let item_id = format!("{}:1", contract);
		assert_eq!(chain.ownership(&item_id, buyer.wallet_address()), Decimal::from(2));
		assert_eq!(chain.ownership(&item_id, seller.wallet_address()), Decimal::from(3));
		assert_eq!(chain.order(&order.hash).unwrap().make_stock, "3");
	}
}
