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


//! Flow
//!
//! Every Flow mutation is an on-chain transaction: mints, storefront
//! listings, listing updates and purchases. Tokens are never semi-fungible
//! and prices are UFix64 values with eight fractional digits.

pub mod common;
pub mod convert;
pub mod fill;
pub mod memory;
pub mod mint;
pub mod read;
pub mod sell;
pub mod types;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use tessera_sdk::{
	Blockchain, BlockchainTransaction, Environment, NativeError, NativeTransaction, SdkError,
};

pub use fill::FlowBuy;
pub use memory::{MemoryFlowChain, MemoryFlowClient};
pub use mint::FlowMint;
pub use read::FlowReader;
pub use sell::{FlowSell, FlowSellUpdate};
use types::{
	FlowBuyRequest, FlowCollection, FlowCurrency, FlowItem, FlowMintOutcome, FlowMintRequest,
	FlowOrder, FlowOrderOutcome, FlowSellRequest, FlowUpdateRequest,
};

/// Fractional digits of a UFix64 price
pub const UFIX64_DECIMALS: u32 = 8;

pub(crate) const LOG_TARGET: &str = "settlement::flow";

/// Flow access node and wallet
#[async_trait]
pub trait FlowClient: Send + Sync {
	/// Address of the connected wallet
	async fn address(&self) -> Result<String, NativeError>;

	async fn get_item(&self, item_id: &str) -> Result<FlowItem, NativeError>;

	async fn get_collection(&self, contract: &str) -> Result<FlowCollection, NativeError>;

	async fn get_order(&self, order_id: u64) -> Result<FlowOrder, NativeError>;

	/// Storefront fee in basis points
	async fn get_protocol_fee(&self) -> Result<u32, NativeError>;

	/// Decimal balance of a storefront currency
	async fn get_balance(&self, owner: &str, currency: FlowCurrency) -> Result<String, NativeError>;

	async fn mint(&self, request: FlowMintRequest) -> Result<FlowMintOutcome, NativeError>;

	/// List an item on the storefront
	async fn sell(&self, request: FlowSellRequest) -> Result<FlowOrderOutcome, NativeError>;

	/// Replace a listing with one at a new price
	async fn update_order(&self, request: FlowUpdateRequest) -> Result<FlowOrderOutcome, NativeError>;

	async fn buy(&self, request: FlowBuyRequest) -> Result<Arc<dyn NativeTransaction>, NativeError>;
}

#[derive(Clone)]
pub struct FlowContext {
	environment: Environment,
	client: Arc<dyn FlowClient>,
}

impl fmt::Debug for FlowContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FlowContext")
			.field("environment", &self.environment)
			.finish()
	}
}

impl FlowContext {
	pub fn new(environment: Environment, client: Arc<dyn FlowClient>) -> Self {
		Self {
			environment,
			client,
		}
	}

	pub fn environment(&self) -> Environment {
		self.environment
	}

	pub(crate) fn read_failed(&self, error: NativeError) -> SdkError {
		SdkError::fetch_failed(Blockchain::Flow, error)
	}

	pub(crate) fn rejected(&self, error: NativeError) -> SdkError {
		SdkError::rejected(Blockchain::Flow, error)
	}

	pub(crate) fn transaction(&self, transaction: Arc<dyn NativeTransaction>) -> BlockchainTransaction {
		BlockchainTransaction::new(Blockchain::Flow, self.environment, transaction)
	}
}
