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


//! Chain dispatch
//!
//! Maps `(Blockchain, Operation)` to the builder registered for it. The map
//! is filled once when the SDK is built and only read afterwards.

use std::{collections::HashMap, sync::Arc};

use tessera_sdk::{
	BalanceReader, Blockchain, FillBuilder, MintBuilder, Operation, OrderBuilder, OrderReader,
	OrderUpdateBuilder, SdkError,
};

const LOG_TARGET: &str = "gateway::dispatcher";

/// Builders one chain serves; `None` leaves the operation unsupported
#[derive(Clone, Default)]
pub struct ChainBuilders {
	pub mint: Option<Arc<dyn MintBuilder>>,
	pub sell: Option<Arc<dyn OrderBuilder>>,
	pub sell_update: Option<Arc<dyn OrderUpdateBuilder>>,
	pub bid: Option<Arc<dyn OrderBuilder>>,
	pub bid_update: Option<Arc<dyn OrderUpdateBuilder>>,
	pub buy: Option<Arc<dyn FillBuilder>>,
	pub accept_bid: Option<Arc<dyn FillBuilder>>,
	pub order_reader: Option<Arc<dyn OrderReader>>,
	pub balance_reader: Option<Arc<dyn BalanceReader>>,
}

impl ChainBuilders {
	/// Operations with a registered builder
	pub fn operations(&self) -> Vec<Operation> {
		[
			(Operation::Mint, self.mint.is_some()),
			(Operation::Sell, self.sell.is_some()),
			(Operation::SellUpdate, self.sell_update.is_some()),
			(Operation::Bid, self.bid.is_some()),
			(Operation::BidUpdate, self.bid_update.is_some()),
			(Operation::Buy, self.buy.is_some()),
			(Operation::AcceptBid, self.accept_bid.is_some()),
			(Operation::OrderRead, self.order_reader.is_some()),
			(Operation::Balance, self.balance_reader.is_some()),
		]
		.into_iter()
		.filter_map(|(operation, registered)| registered.then_some(operation))
		.collect()
	}
}

/// Routes operations to chain builders
#[derive(Clone, Default)]
pub struct Dispatcher {
	chains: HashMap<Blockchain, ChainBuilders>,
}

impl Dispatcher {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register the builders of one chain, replacing earlier ones
	pub fn register(&mut self, blockchain: Blockchain, builders: ChainBuilders) {
		tracing::info!(
			target: LOG_TARGET,
			"Registered {} with operations {:?}",
			blockchain,
			builders.operations()
		);
		self.chains.insert(blockchain, builders);
	}

	/// Registered chains, in enum order
	pub fn blockchains(&self) -> Vec<Blockchain> {
		let mut chains: Vec<_> = self.chains.keys().copied().collect();
		chains.sort();
		chains
	}

	pub fn supports(&self, blockchain: Blockchain, operation: Operation) -> bool {
		self.chains
			.get(&blockchain)
			.is_some_and(|builders| builders.operations().contains(&operation))
	}

	fn lookup<T: ?Sized>(
		&self,
		blockchain: Blockchain,
		operation: Operation,
		select: impl FnOnce(&ChainBuilders) -> Option<&Arc<T>>,
	) -> Result<Arc<T>, SdkError> {
		match self.chains.get(&blockchain).and_then(select) {
			Some(builder) => {
				tracing::debug!(target: LOG_TARGET, "Dispatching {} to {}", operation, blockchain);
				Ok(builder.clone())
			}
			None => {
				tracing::debug!(
					target: LOG_TARGET,
					"No builder for {} on {}",
					operation,
					blockchain
				);
				Err(SdkError::UnsupportedChain {
					blockchain,
					operation,
				})
			}
		}
	}

	pub fn mint(&self, blockchain: Blockchain) -> Result<Arc<dyn MintBuilder>, SdkError> {
		self.lookup(blockchain, Operation::Mint, |b| b.mint.as_ref())
	}

	pub fn sell(&self, blockchain: Blockchain) -> Result<Arc<dyn OrderBuilder>, SdkError> {
		self.lookup(blockchain, Operation::Sell, |b| b.sell.as_ref())
	}

	pub fn sell_update(
		&self,
		blockchain: Blockchain,
	) -> Result<Arc<dyn OrderUpdateBuilder>, SdkError> {
		self.lookup(blockchain, Operation::SellUpdate, |b| b.sell_update.as_ref())
	}

	pub fn bid(&self, blockchain: Blockchain) -> Result<Arc<dyn OrderBuilder>, SdkError> {
		self.lookup(blockchain, Operation::Bid, |b| b.bid.as_ref())
	}

	pub fn bid_update(
		&self,
		blockchain: Blockchain,
	) -> Result<Arc<dyn OrderUpdateBuilder>, SdkError> {
		self.lookup(blockchain, Operation::BidUpdate, |b| b.bid_update.as_ref())
	}

	pub fn buy(&self, blockchain: Blockchain) -> Result<Arc<dyn FillBuilder>, SdkError> {
		self.lookup(blockchain, Operation::Buy, |b| b.buy.as_ref())
	}

	pub fn accept_bid(&self, blockchain: Blockchain) -> Result<Arc<dyn FillBuilder>, SdkError> {
		self.lookup(blockchain, Operation::AcceptBid, |b| b.accept_bid.as_ref())
	}

	pub fn order_reader(&self, blockchain: Blockchain) -> Result<Arc<dyn OrderReader>, SdkError> {
		self.lookup(blockchain, Operation::OrderRead, |b| b.order_reader.as_ref())
	}

	pub fn balance_reader(
		&self,
		blockchain: Blockchain,
	) -> Result<Arc<dyn BalanceReader>, SdkError> {
		self.lookup(blockchain, Operation::Balance, |b| b.balance_reader.as_ref())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use tessera_sdk::{Order, OrderId};

	struct NoOrders;

	#[async_trait]
	impl OrderReader for NoOrders {
		async fn get_order(&self, order_id: &OrderId) -> Result<Order, SdkError> {
			Err(SdkError::invalid_request(format!("{} is unknown", order_id)))
		}
	}

	#[test]
	fn test_missing_binding_is_unsupported_chain() {
		let mut dispatcher = Dispatcher::new();
		dispatcher.register(
			Blockchain::Flow,
			ChainBuilders {
				order_reader: Some(Arc::new(NoOrders)),
				..ChainBuilders::default()
			},
		);

		assert!(dispatcher.order_reader(Blockchain::Flow).is_ok());
		assert!(dispatcher.supports(Blockchain::Flow, Operation::OrderRead));
		assert!(!dispatcher.supports(Blockchain::Flow, Operation::Bid));

		assert!(matches!(
			dispatcher.bid(Blockchain::Flow),
			Err(SdkError::UnsupportedChain {
				blockchain: Blockchain::Flow,
				operation: Operation::Bid
			})
		));
		assert!(matches!(
			dispatcher.order_reader(Blockchain::Tezos),
			Err(SdkError::UnsupportedChain {
				blockchain: Blockchain::Tezos,
				operation: Operation::OrderRead
			})
		));
	}

	#[test]
	fn test_operations_lists_registered_builders() {
		let builders = ChainBuilders {
			order_reader: Some(Arc::new(NoOrders)),
			..ChainBuilders::default()
		};
		assert_eq!(builders.operations(), vec![Operation::OrderRead]);
		assert!(ChainBuilders::default().operations().is_empty());
	}
}
