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

use thiserror::Error;

use crate::builder::Operation;
use crate::id::Blockchain;
use crate::signing::SigningError;

/// Error reported by a chain client
///
/// Carries the native detail untouched so callers can diagnose
/// node/indexer failures and protocol rejections themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NativeError {
	/// Native error code, when the chain reports one
	pub code: Option<String>,
	/// Native error message
	pub message: String,
}

impl NativeError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			code: None,
			message: message.into(),
		}
	}

	pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			code: Some(code.into()),
			message: message.into(),
		}
	}
}

/// Error types for SDK operations
#[derive(Debug, Error)]
pub enum SdkError {
	#[error("Invalid identifier: {0}")]
	InvalidIdentifier(String),
	#[error("Wrong chain: expected {expected}, got {actual}")]
	WrongChain {
		expected: Blockchain,
		actual: Blockchain,
	},
	#[error("Operation {operation} is not supported on {blockchain}")]
	UnsupportedChain {
		blockchain: Blockchain,
		operation: Operation,
	},
	#[error("Unsupported asset type: {0}")]
	UnsupportedAssetType(String),
	#[error("Unsupported order data: {0}")]
	UnsupportedOrderData(String),
	#[error("Unsupported order exchange history: {0}")]
	UnsupportedHistoryEvent(String),
	#[error("Unsupported currency: {0}")]
	UnsupportedCurrency(String),
	#[error("Invalid request: {0}")]
	InvalidRequest(String),
	#[error("Failed to fetch {blockchain} chain state: {source}")]
	ChainStateFetchFailed {
		blockchain: Blockchain,
		#[source]
		source: NativeError,
	},
	#[error("{blockchain} rejected the request: {source}")]
	ChainRejected {
		blockchain: Blockchain,
		#[source]
		source: NativeError,
	},
	#[error("Signing error: {0}")]
	Signing(#[from] SigningError),
}

impl SdkError {
	/// Wrap a failed read against chain state
	pub fn fetch_failed(blockchain: Blockchain, source: NativeError) -> Self {
		Self::ChainStateFetchFailed { blockchain, source }
	}

	/// Wrap a refused transaction or call
	pub fn rejected(blockchain: Blockchain, source: NativeError) -> Self {
		Self::ChainRejected { blockchain, source }
	}

	pub fn invalid_request(message: impl Into<String>) -> Self {
		Self::InvalidRequest(message.into())
	}
}
