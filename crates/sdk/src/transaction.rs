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

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{NativeError, SdkError};
use crate::id::Blockchain;

/// Deployment environment, selects block explorers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
	#[default]
	Prod,
	Testnet,
	Development,
}

/// Receipt reported by a chain once a transaction is final
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeReceipt {
	/// Whether the transaction executed successfully
	pub success: bool,
	/// Block (or level) the transaction landed in
	pub block_number: Option<u64>,
	/// Raw event names emitted by the transaction
	pub events: Vec<String>,
}

/// Chain-native transaction handle
#[async_trait]
pub trait NativeTransaction: Send + Sync + fmt::Debug {
	/// Transaction hash (or id) as reported by the chain
	fn hash(&self) -> &str;

	/// Encoded call data, for chains that expose it
	fn data(&self) -> Option<&str> {
		None
	}

	/// Wait for the transaction to be final
	async fn wait(&self) -> Result<NativeReceipt, NativeError>;
}

/// Result of waiting on a [`BlockchainTransaction`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
	pub blockchain: Blockchain,
	pub hash: String,
	/// `None` when the operation had no on-chain effect
	pub receipt: Option<NativeReceipt>,
}

/// Uniform wrapper over a chain's transaction handle
///
/// An empty wrapper stands for an operation with no on-chain effect:
/// `wait` resolves immediately and `hash` is empty.
#[derive(Debug, Clone)]
pub struct BlockchainTransaction {
	blockchain: Blockchain,
	environment: Environment,
	transaction: Option<Arc<dyn NativeTransaction>>,
}

impl BlockchainTransaction {
	pub fn new(
		blockchain: Blockchain,
		environment: Environment,
		transaction: Arc<dyn NativeTransaction>,
	) -> Self {
		Self {
			blockchain,
			environment,
			transaction: Some(transaction),
		}
	}

	pub fn empty(blockchain: Blockchain, environment: Environment) -> Self {
		Self {
			blockchain,
			environment,
			transaction: None,
		}
	}

	pub fn blockchain(&self) -> Blockchain {
		self.blockchain
	}

	pub fn is_empty(&self) -> bool {
		self.transaction.is_none()
	}

	/// The wrapped native handle
	pub fn transaction(&self) -> Option<&Arc<dyn NativeTransaction>> {
		self.transaction.as_ref()
	}

	pub fn hash(&self) -> &str {
		self.transaction.as_ref().map(|tx| tx.hash()).unwrap_or("")
	}

	/// Wait for finality
	///
	/// May block for as long as the chain takes to confirm; callers apply
	/// their own polling or timeout policy.
	pub async fn wait(&self) -> Result<TransactionResult, SdkError> {
		let Some(transaction) = &self.transaction else {
			return Ok(TransactionResult {
				blockchain: self.blockchain,
				hash: String::new(),
				receipt: None,
			});
		};

		let receipt = transaction
			.wait()
			.await
			.map_err(|e| SdkError::fetch_failed(self.blockchain, e))?;

		if !receipt.success {
			return Err(SdkError::rejected(
				self.blockchain,
				NativeError::with_code(
					"REVERTED",
					format!("Transaction {} failed", transaction.hash()),
				),
			));
		}

		tracing::debug!(
			target: "sdk::transaction",
			"Transaction {} confirmed on {}",
			transaction.hash(),
			self.blockchain
		);

		Ok(TransactionResult {
			blockchain: self.blockchain,
			hash: transaction.hash().to_string(),
			receipt: Some(receipt),
		})
	}

	/// Block explorer link for the transaction
	pub fn tx_link(&self) -> String {
		tx_link(self.blockchain, self.environment, self.hash())
	}
}

/// Build a block explorer URL, without any I/O
pub fn tx_link(blockchain: Blockchain, environment: Environment, hash: &str) -> String {
	match (blockchain, environment) {
		(Blockchain::Ethereum, Environment::Prod) => format!("https://etherscan.io/tx/{}", hash),
		(Blockchain::Ethereum, _) => format!("https://sepolia.etherscan.io/tx/{}", hash),
		(Blockchain::Polygon, Environment::Prod) => format!("https://polygonscan.com/tx/{}", hash),
		(Blockchain::Polygon, _) => format!("https://amoy.polygonscan.com/tx/{}", hash),
		(Blockchain::Flow, Environment::Prod) => {
			format!("https://flowscan.org/transaction/{}", hash)
		}
		(Blockchain::Flow, _) => format!("https://testnet.flowscan.org/transaction/{}", hash),
		(Blockchain::Tezos, Environment::Prod) => format!("https://tzkt.io/{}", hash),
		(Blockchain::Tezos, _) => format!("https://ghostnet.tzkt.io/{}", hash),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug)]
	struct StubTransaction {
		hash: String,
		success: bool,
	}

	#[async_trait]
	impl NativeTransaction for StubTransaction {
		fn hash(&self) -> &str {
			&self.hash
		}

		async fn wait(&self) -> Result<NativeReceipt, NativeError> {
			Ok(NativeReceipt {
				success: self.success,
				block_number: Some(7),
				events: vec![],
			})
		}
	}

	fn wrap(success: bool) -> BlockchainTransaction {
		BlockchainTransaction::new(
			Blockchain::Ethereum,
			Environment::Prod,
			Arc::new(StubTransaction {
				hash: "0xabc".to_string(),
				success,
			}),
		)
	}

	#[tokio::test]
	async fn test_empty_transaction_resolves_immediately() {
		let tx = BlockchainTransaction::empty(Blockchain::Flow, Environment::Testnet);
		assert!(tx.is_empty());
		assert_eq!(tx.hash(), "");

		let result = tx.wait().await.unwrap();
		assert_eq!(result.blockchain, Blockchain::Flow);
		assert!(result.receipt.is_none());
	}

	#[tokio::test]
	async fn test_wait_returns_receipt() {
		let tx = wrap(true);
		assert!(!tx.is_empty());
		assert_eq!(tx.hash(), tx.hash());

		let result = tx.wait().await.unwrap();
		assert_eq!(result.hash, "0xabc");
		assert_eq!(result.receipt.unwrap().block_number, Some(7));
	}

	#[tokio::test]
	async fn test_failed_receipt_is_rejection() {
		let err = wrap(false).wait().await.unwrap_err();
		assert!(matches!(
			err,
			SdkError::ChainRejected {
				blockchain: Blockchain::Ethereum,
				..
			}
		));
	}

	#[test]
	fn test_tx_link() {
		assert_eq!(wrap(true).tx_link(), "https://etherscan.io/tx/0xabc");
		assert_eq!(
			tx_link(Blockchain::Tezos, Environment::Testnet, "oo1"),
			"https://ghostnet.tzkt.io/oo1"
		);
		assert_eq!(
			tx_link(Blockchain::Flow, Environment::Prod, "f00"),
			"https://flowscan.org/transaction/f00"
		);
	}
}
