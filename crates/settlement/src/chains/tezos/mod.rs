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


//! Tezos
//!
//! Orders are signed by the wallet and published to the indexer; mints and
//! fills are on-chain operations sent through the wallet provider. Values
//! stay decimal end to end.

pub mod api;
pub mod common;
pub mod convert;
pub mod fill;
pub mod memory;
pub mod mint;
pub mod read;
pub mod sell;
pub mod types;
pub mod update;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use tessera_sdk::{
	BigNumber, Blockchain, BlockchainTransaction, Environment, NativeError, NativeTransaction,
	SdkError,
};

pub use api::HttpTezosApi;
pub use fill::TezosFill;
pub use memory::{MemoryTezosChain, MemoryTezosWallet};
pub use mint::TezosMint;
pub use read::TezosReader;
pub use sell::{TezosBid, TezosSell};
pub use update::TezosSellUpdate;
use types::{
	TezosAsset, TezosAssetType, TezosCollection, TezosFillForm, TezosItem, TezosMintForm,
	TezosMintOutcome, TezosOrder, TezosOrderData, TezosOrderForm, TezosOwnership,
};

use crate::chains::{generate_salt, total_price};

pub(crate) const LOG_TARGET: &str = "settlement::tezos";

/// Indexer API
#[async_trait]
pub trait TezosApi: Send + Sync {
	async fn get_item(&self, item_id: &str) -> Result<TezosItem, NativeError>;

	async fn get_collection(&self, contract: &str) -> Result<TezosCollection, NativeError>;

	/// `None` when the owner holds none of the item
	async fn get_ownership(
		&self,
		item_id: &str,
		owner: &str,
	) -> Result<Option<TezosOwnership>, NativeError>;

	async fn get_order(&self, hash: &str) -> Result<TezosOrder, NativeError>;

	/// Publish a signed order; the same maker, assets and salt update in place
	async fn upsert_order(&self, form: TezosOrderForm) -> Result<TezosOrder, NativeError>;
}

/// Wallet and node access
#[async_trait]
pub trait TezosProvider: Send + Sync {
	/// Public key hash of the wallet
	async fn address(&self) -> Result<String, NativeError>;

	/// Wallet public key
	async fn public_key(&self) -> Result<String, NativeError>;

	/// Exchange fee in basis points
	async fn get_protocol_fee(&self) -> Result<u32, NativeError>;

	async fn sign(&self, payload: &serde_json::Value) -> Result<String, NativeError>;

	async fn mint(&self, form: TezosMintForm) -> Result<TezosMintOutcome, NativeError>;

	async fn fill_order(&self, form: TezosFillForm) -> Result<Arc<dyn NativeTransaction>, NativeError>;
}

#[derive(Clone)]
pub struct TezosContext {
	environment: Environment,
	api: Arc<dyn TezosApi>,
	provider: Arc<dyn TezosProvider>,
}

impl fmt::Debug for TezosContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TezosContext")
			.field("environment", &self.environment)
			.finish()
	}
}

/// Which side of the book an order sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OrderKind {
	Sell,
	Bid,
}

/// Validated order waiting to be signed and published
#[derive(Debug, Clone)]
pub(crate) struct OrderDraft {
	pub kind: OrderKind,
	pub maker: String,
	pub maker_edpk: String,
	pub nft: TezosAssetType,
	pub currency: TezosAssetType,
	pub amount: BigNumber,
	/// Price per token, decimal
	pub price: BigNumber,
	/// Existing salt when updating, fresh otherwise
	pub salt: Option<String>,
	pub data: TezosOrderData,
}

impl TezosContext {
	pub fn new(
		environment: Environment,
		api: Arc<dyn TezosApi>,
		provider: Arc<dyn TezosProvider>,
	) -> Self {
		Self {
			environment,
			api,
			provider,
		}
	}

	pub(crate) fn read_failed(&self, error: NativeError) -> SdkError {
		SdkError::fetch_failed(Blockchain::Tezos, error)
	}

	pub(crate) fn rejected(&self, error: NativeError) -> SdkError {
		SdkError::rejected(Blockchain::Tezos, error)
	}

	pub(crate) fn transaction(&self, transaction: Arc<dyn NativeTransaction>) -> BlockchainTransaction {
		BlockchainTransaction::new(Blockchain::Tezos, self.environment, transaction)
	}

	/// Sign and publish an order
	pub(crate) async fn place_order(&self, draft: OrderDraft) -> Result<TezosOrder, SdkError> {
		let total = total_price(&draft.price, &draft.amount)?;
		let nft = TezosAsset {
			asset_type: draft.nft,
			value: draft.amount.normalized(),
		};
		let currency = TezosAsset {
			asset_type: draft.currency,
			value: total.normalized(),
		};
		let (make, take) = match draft.kind {
			OrderKind::Sell => (nft, currency),
			OrderKind::Bid => (currency, nft),
		};

		let mut form = TezosOrderForm {
			maker: draft.maker,
			maker_edpk: draft.maker_edpk,
			taker: None,
			make,
			take,
			salt: draft.salt.unwrap_or_else(generate_salt),
			data: draft.data,
			signature: None,
		};

		let payload = serde_json::to_value(&form)
			.map_err(|e| SdkError::invalid_request(format!("Unencodable order: {}", e)))?;
		form.signature = Some(
			self.provider
				.sign(&payload)
				.await
				.map_err(|e| self.rejected(e))?,
		);

		let order = self
			.api
			.upsert_order(form)
			.await
			.map_err(|e| self.rejected(e))?;

		tracing::info!(
			target: LOG_TARGET,
			"Published {:?} order {} at {} per token",
			draft.kind,
			order.hash,
			draft.price
		);

		Ok(order)
	}
}
