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


//! SDK façade
//!
//! [`Sdk`] routes every chain-agnostic call to the chain named by its
//! identifier. Chains are connected through [`SdkBuilder`]; an operation a
//! chain does not serve fails with `UnsupportedChain`.

use std::sync::Arc;

use anyhow::Context;
use tessera_sdk::{
	AssetType, BigNumber, Blockchain, Order, OrderId, PrepareFillRequest, PrepareFillResponse,
	PrepareMintRequest, PrepareMintResponse, PrepareOrderRequest, PrepareOrderResponse,
	PrepareOrderUpdateRequest, PrepareOrderUpdateResponse, SdkError, UnionAddress,
};
use tessera_settlement::chains::{
	ethereum::{
		EthereumBid, EthereumClient, EthereumContext, EthereumFill, EthereumMint,
		EthereumOrderUpdate, EthereumReader, EthereumSell,
	},
	flow::{FlowBuy, FlowClient, FlowContext, FlowMint, FlowReader, FlowSell, FlowSellUpdate},
	tezos::{
		HttpTezosApi, TezosApi, TezosBid, TezosContext, TezosFill, TezosMint, TezosProvider,
		TezosReader, TezosSell, TezosSellUpdate,
	},
};

use crate::config::SdkConfig;
use crate::dispatcher::{ChainBuilders, Dispatcher};
use crate::logging::init_logging;

const LOG_TARGET: &str = "gateway::sdk";

/// Multi-chain marketplace SDK
#[derive(Clone)]
pub struct Sdk {
	config: SdkConfig,
	dispatcher: Dispatcher,
}

impl Sdk {
	pub fn builder(config: SdkConfig) -> SdkBuilder {
		SdkBuilder {
			config,
			dispatcher: Dispatcher::new(),
		}
	}

	pub fn config(&self) -> &SdkConfig {
		&self.config
	}

	pub fn dispatcher(&self) -> &Dispatcher {
		&self.dispatcher
	}

	pub async fn prepare_mint(
		&self,
		request: PrepareMintRequest,
	) -> Result<PrepareMintResponse, SdkError> {
		let blockchain = request.collection_id.blockchain();
		self.dispatcher.mint(blockchain)?.prepare(request).await
	}

	pub async fn prepare_sell(
		&self,
		request: PrepareOrderRequest,
	) -> Result<PrepareOrderResponse, SdkError> {
		let blockchain = request.item_id.blockchain();
		self.dispatcher.sell(blockchain)?.prepare(request).await
	}

	pub async fn prepare_sell_update(
		&self,
		request: PrepareOrderUpdateRequest,
	) -> Result<PrepareOrderUpdateResponse, SdkError> {
		let blockchain = request.order_id.blockchain();
		self.dispatcher.sell_update(blockchain)?.prepare(request).await
	}

	pub async fn prepare_bid(
		&self,
		request: PrepareOrderRequest,
	) -> Result<PrepareOrderResponse, SdkError> {
		let blockchain = request.item_id.blockchain();
		self.dispatcher.bid(blockchain)?.prepare(request).await
	}

	pub async fn prepare_bid_update(
		&self,
		request: PrepareOrderUpdateRequest,
	) -> Result<PrepareOrderUpdateResponse, SdkError> {
		let blockchain = request.order_id.blockchain();
		self.dispatcher.bid_update(blockchain)?.prepare(request).await
	}

	pub async fn prepare_buy(
		&self,
		request: PrepareFillRequest,
	) -> Result<PrepareFillResponse, SdkError> {
		let blockchain = request.order_id.blockchain();
		self.dispatcher.buy(blockchain)?.prepare(request).await
	}

	pub async fn prepare_accept_bid(
		&self,
		request: PrepareFillRequest,
	) -> Result<PrepareFillResponse, SdkError> {
		let blockchain = request.order_id.blockchain();
		self.dispatcher.accept_bid(blockchain)?.prepare(request).await
	}

	/// Current state of an order, including its remaining stock
	pub async fn get_order(&self, order_id: &OrderId) -> Result<Order, SdkError> {
		self.dispatcher
			.order_reader(order_id.blockchain())?
			.get_order(order_id)
			.await
	}

	pub async fn get_balance(
		&self,
		address: &UnionAddress,
		asset_type: &AssetType,
	) -> Result<BigNumber, SdkError> {
		self.dispatcher
			.balance_reader(address.blockchain())?
			.get_balance(address, asset_type)
			.await
	}
}

/// Connects chains to an [`Sdk`]
pub struct SdkBuilder {
	config: SdkConfig,
	dispatcher: Dispatcher,
}

impl SdkBuilder {
	/// Connect an EVM chain; its settings come from the matching config section
	pub fn with_ethereum(
		mut self,
		blockchain: Blockchain,
		client: Arc<dyn EthereumClient>,
	) -> Result<Self, SdkError> {
		let evm_config = match blockchain {
			Blockchain::Polygon => self.config.polygon.clone(),
			_ => self.config.ethereum.clone(),
		};
		let context = EthereumContext::new(blockchain, self.config.environment, client, evm_config)?;
		let reader = Arc::new(EthereumReader::new(context.clone()));

		self.dispatcher.register(
			blockchain,
			ChainBuilders {
				mint: Some(Arc::new(EthereumMint::new(context.clone()))),
				sell: Some(Arc::new(EthereumSell::new(context.clone()))),
				sell_update: Some(Arc::new(EthereumOrderUpdate::sell(context.clone()))),
				bid: Some(Arc::new(EthereumBid::new(context.clone()))),
				bid_update: Some(Arc::new(EthereumOrderUpdate::bid(context.clone()))),
				buy: Some(Arc::new(EthereumFill::buy(context.clone()))),
				accept_bid: Some(Arc::new(EthereumFill::accept_bid(context))),
				order_reader: Some(reader.clone()),
				balance_reader: Some(reader),
			},
		);
		Ok(self)
	}

	/// Connect Flow; bids are not served
	pub fn with_flow(mut self, client: Arc<dyn FlowClient>) -> Self {
		let context = FlowContext::new(self.config.environment, client);
		let reader = Arc::new(FlowReader::new(context.clone()));

		self.dispatcher.register(
			Blockchain::Flow,
			ChainBuilders {
				mint: Some(Arc::new(FlowMint::new(context.clone()))),
				sell: Some(Arc::new(FlowSell::new(context.clone()))),
				sell_update: Some(Arc::new(FlowSellUpdate::new(context.clone()))),
				buy: Some(Arc::new(FlowBuy::new(context))),
				order_reader: Some(reader.clone()),
				balance_reader: Some(reader),
				..ChainBuilders::default()
			},
		);
		self
	}

	/// Connect Tezos; bid updates and balances are not served
	pub fn with_tezos(mut self, api: Arc<dyn TezosApi>, provider: Arc<dyn TezosProvider>) -> Self {
		let context = TezosContext::new(self.config.environment, api, provider);

		self.dispatcher.register(
			Blockchain::Tezos,
			ChainBuilders {
				mint: Some(Arc::new(TezosMint::new(context.clone()))),
				sell: Some(Arc::new(TezosSell::new(context.clone()))),
				sell_update: Some(Arc::new(TezosSellUpdate::new(context.clone()))),
				bid: Some(Arc::new(TezosBid::new(context.clone()))),
				buy: Some(Arc::new(TezosFill::buy(context.clone()))),
				accept_bid: Some(Arc::new(TezosFill::accept_bid(context.clone()))),
				order_reader: Some(Arc::new(TezosReader::new(context))),
				..ChainBuilders::default()
			},
		);
		self
	}

	/// Connect Tezos through the configured indexer
	pub fn with_tezos_provider(self, provider: Arc<dyn TezosProvider>) -> Result<Self, SdkError> {
		let url = self
			.config
			.tezos_api_url
			.clone()
			.ok_or_else(|| SdkError::invalid_request("tezos_api_url is not configured"))?;
		let api = HttpTezosApi::new(url)
			.map_err(|e| SdkError::invalid_request(format!("Invalid Tezos indexer: {}", e)))?;
		Ok(self.with_tezos(Arc::new(api), provider))
	}

	/// Finish the SDK, installing logging when the config asks for it
	pub fn build(self) -> anyhow::Result<Sdk> {
		init_logging(self.config.logs).context("Failed to initialize SDK logging")?;

		tracing::info!(
			target: LOG_TARGET,
			"SDK ready in {:?} for {:?}",
			self.config.environment,
			self.dispatcher.blockchains()
		);

		Ok(Sdk {
			config: self.config,
			dispatcher: self.dispatcher,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tessera_sdk::{Environment, Operation};

	#[test]
	fn test_tezos_provider_requires_indexer_url() {
		let wallet = tessera_settlement::chains::tezos::MemoryTezosChain::new().wallet();
		let result = Sdk::builder(SdkConfig::default()).with_tezos_provider(Arc::new(wallet));
		assert!(matches!(result, Err(SdkError::InvalidRequest(_))));
	}

	#[test]
	fn test_indexer_from_config() {
		let config = SdkConfig {
			environment: Environment::Testnet,
			tezos_api_url: Some("http://127.0.0.1:1/v0.1".to_string()),
			..SdkConfig::default()
		};
		let wallet = tessera_settlement::chains::tezos::MemoryTezosChain::new().wallet();
		let sdk = Sdk::builder(config)
			.with_tezos_provider(Arc::new(wallet))
			.unwrap()
			.build()
			.unwrap();

		assert!(sdk.dispatcher().supports(Blockchain::Tezos, Operation::AcceptBid));
		assert!(!sdk.dispatcher().supports(Blockchain::Tezos, Operation::BidUpdate));
	}
}
