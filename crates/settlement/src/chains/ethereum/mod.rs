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


//! EVM chains (Ethereum, Polygon)
//!
//! One pipeline serves every EVM chain; the chain tag travels in the
//! [`EthereumContext`] and every codec call checks it. Sells, bids and their
//! updates are signed off-chain orders, fills and regular mints are
//! transactions, lazy mints are signed items.

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
use serde::{Deserialize, Serialize};
use tessera_sdk::{
	BigNumber, Binary, Blockchain, BlockchainTransaction, Environment, NativeError,
	NativeTransaction, SdkError,
};

use crate::chains::{generate_salt, total_price};
pub use fill::EthereumFill;
pub use memory::{MemoryEthereumChain, MemoryEthereumClient};
pub use mint::EthereumMint;
pub use read::EthereumReader;
pub use sell::{EthereumBid, EthereumSell};
use types::{
	EthAsset, EthAssetType, EthBalance, EthCollection, EthCollectionType, EthFillForm, EthItem,
	EthMintForm, EthOrder, EthOrderData, EthOrderForm, EthOwnership,
};
pub use update::EthereumOrderUpdate;

/// Decimals of the native currency on every supported EVM chain
pub const NATIVE_DECIMALS: u32 = 18;

const LOG_TARGET: &str = "settlement::ethereum";

/// Wallet and indexer access for one EVM chain
///
/// Reads fail with the indexer's error, writes with the node's or order
/// book's. Implementations never retry.
#[async_trait]
pub trait EthereumClient: Send + Sync {
	/// Address of the connected wallet
	async fn address(&self) -> Result<String, NativeError>;

	async fn get_item(&self, item_id: &str) -> Result<EthItem, NativeError>;

	async fn get_collection(&self, contract: &str) -> Result<EthCollection, NativeError>;

	async fn get_ownership(
		&self,
		item_id: &str,
		owner: &str,
	) -> Result<Option<EthOwnership>, NativeError>;

	async fn get_order(&self, hash: &str) -> Result<EthOrder, NativeError>;

	/// Protocol fee in basis points
	async fn get_base_order_fee(&self) -> Result<u32, NativeError>;

	/// Decimals of an ERC-20 contract
	async fn get_decimals(&self, contract: &str) -> Result<u32, NativeError>;

	async fn get_balance(
		&self,
		owner: &str,
		asset_type: &EthAssetType,
	) -> Result<EthBalance, NativeError>;

	/// Reserve a token id for a mint by `minter`
	async fn generate_token_id(&self, contract: &str, minter: &str) -> Result<String, NativeError>;

	/// Sign a payload with the connected wallet
	async fn sign(&self, payload: &serde_json::Value) -> Result<String, NativeError>;

	/// Create or update a signed order in the order book
	async fn upsert_order(&self, form: EthOrderForm) -> Result<EthOrder, NativeError>;

	async fn mint(&self, form: EthMintForm) -> Result<Arc<dyn NativeTransaction>, NativeError>;

	/// Register a signed lazy item
	async fn mint_lazy(&self, form: EthMintForm) -> Result<EthItem, NativeError>;

	async fn fill_order(&self, form: EthFillForm) -> Result<Arc<dyn NativeTransaction>, NativeError>;
}

/// Per-chain EVM settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmConfig {
	/// Emit order data V3 for new orders
	#[serde(default)]
	pub use_data_v3: bool,
	/// Marker attached to V3 orders and fills
	#[serde(default)]
	pub marketplace_marker: Option<Binary>,
}

/// Everything an EVM builder needs, shared by all its prepared actions
#[derive(Clone)]
pub struct EthereumContext {
	blockchain: Blockchain,
	environment: Environment,
	client: Arc<dyn EthereumClient>,
	config: EvmConfig,
}

impl fmt::Debug for EthereumContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EthereumContext")
			.field("blockchain", &self.blockchain)
			.field("environment", &self.environment)
			.field("config", &self.config)
			.finish()
	}
}

/// Which side of the book an order sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OrderKind {
	Sell,
	Bid,
}

/// Validated order waiting to be priced, signed and published
#[derive(Debug, Clone)]
pub(crate) struct OrderDraft {
	pub kind: OrderKind,
	pub maker: String,
	pub nft: EthAssetType,
	pub currency: EthAssetType,
	/// Token amount
	pub amount: BigNumber,
	/// Price per token, decimal
	pub price: BigNumber,
	/// Existing salt when updating, fresh otherwise
	pub salt: Option<String>,
	pub data: EthOrderData,
}

impl EthereumContext {
	pub fn new(
		blockchain: Blockchain,
		environment: Environment,
		client: Arc<dyn EthereumClient>,
		config: EvmConfig,
	) -> Result<Self, SdkError> {
		if !blockchain.is_evm() {
			return Err(SdkError::invalid_request(format!(
				"{} is not an EVM chain",
				blockchain
			)));
		}

		Ok(Self {
			blockchain,
			environment,
			client,
			config,
		})
	}

	pub fn blockchain(&self) -> Blockchain {
		self.blockchain
	}

	pub fn config(&self) -> &EvmConfig {
		&self.config
	}

	pub(crate) fn read_failed(&self, error: NativeError) -> SdkError {
		SdkError::fetch_failed(self.blockchain, error)
	}

	pub(crate) fn rejected(&self, error: NativeError) -> SdkError {
		SdkError::rejected(self.blockchain, error)
	}

	pub(crate) fn transaction(&self, transaction: Arc<dyn NativeTransaction>) -> BlockchainTransaction {
		BlockchainTransaction::new(self.blockchain, self.environment, transaction)
	}

	/// NFT asset type of a token in a collection
	pub(crate) fn nft_asset_type(
		&self,
		collection: &EthCollection,
		token_id: &str,
	) -> Result<EthAssetType, SdkError> {
		match collection.kind {
			EthCollectionType::Erc721 => Ok(EthAssetType::Erc721 {
				contract: collection.id.clone(),
				token_id: token_id.to_string(),
			}),
			EthCollectionType::Erc1155 => Ok(EthAssetType::Erc1155 {
				contract: collection.id.clone(),
				token_id: token_id.to_string(),
			}),
			EthCollectionType::CryptoPunks => {
				Err(SdkError::UnsupportedAssetType("CRYPTO_PUNKS".to_string()))
			}
		}
	}

	async fn currency_decimals(&self, currency: &EthAssetType) -> Result<u32, SdkError> {
		match currency {
			EthAssetType::Eth => Ok(NATIVE_DECIMALS),
			EthAssetType::Erc20 { contract } => self
				.client
				.get_decimals(contract)
				.await
				.map_err(|e| self.read_failed(e)),
			other => Err(SdkError::UnsupportedCurrency(other.class().to_string())),
		}
	}

	/// Price, sign and publish an order
	pub(crate) async fn place_order(&self, draft: OrderDraft) -> Result<EthOrder, SdkError> {
		let decimals = self.currency_decimals(&draft.currency).await?;
		let total = total_price(&draft.price, &draft.amount)?;
		let nft = EthAsset {
			asset_type: draft.nft,
			value: draft.amount.normalized(),
			value_decimal: None,
		};
		let currency = EthAsset {
			asset_type: draft.currency,
			value: total.scale_to_integer(decimals)?.normalized(),
			value_decimal: Some(total.normalized()),
		};
		let (make, take) = match draft.kind {
			OrderKind::Sell => (nft, currency),
			OrderKind::Bid => (currency, nft),
		};

		let mut form = EthOrderForm {
			maker: draft.maker,
			taker: None,
			make,
			take,
			salt: draft.salt.unwrap_or_else(generate_salt),
			data: draft.data,
			signature: None,
		};

		let payload = serde_json::to_value(&form)
			.map_err(|e| SdkError::invalid_request(format!("Unencodable order: {}", e)))?;
		let signature = self
			.client
			.sign(&payload)
			.await
			.map_err(|e| self.rejected(e))?;
		form.signature = Some(signature);

		let order = self
			.client
			.upsert_order(form)
			.await
			.map_err(|e| self.rejected(e))?;

		tracing::info!(
			target: LOG_TARGET,
			"Published {:?} order {} on {} at {} per token",
			draft.kind,
			order.hash,
			self.blockchain,
			draft.price
		);

		Ok(order)
	}
}
