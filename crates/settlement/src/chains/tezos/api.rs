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


//! HTTP client for the Tezos indexer

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Response, StatusCode};
use serde::de::DeserializeOwned;
use tessera_sdk::NativeError;

use super::TezosApi;
use super::types::{TezosCollection, TezosItem, TezosOrder, TezosOrderForm, TezosOwnership};

/// [`TezosApi`] backed by the indexer's REST API
///
/// Requests carry no deadline unless the caller sets one with
/// [`HttpTezosApi::with_timeout`].
#[derive(Debug, Clone)]
pub struct HttpTezosApi {
	base_url: String,
	client: ReqwestClient,
	timeout: Option<Duration>,
}

impl HttpTezosApi {
	pub fn new(base_url: impl Into<String>) -> Result<Self, NativeError> {
		Self::build(base_url.into(), None)
	}

	pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, NativeError> {
		Self::build(base_url.into(), Some(timeout))
	}

	fn build(base_url: String, timeout: Option<Duration>) -> Result<Self, NativeError> {
		let mut builder = ReqwestClient::builder();
		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}
		let client = builder
			.build()
			.map_err(|e| NativeError::new(format!("Failed to create HTTP client: {}", e)))?;

		Ok(Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			client,
			timeout,
		})
	}

	pub fn timeout(&self) -> Option<Duration> {
		self.timeout
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path)
	}

	async fn get(&self, path: &str) -> Result<Response, NativeError> {
		let url = self.url(path);
		tracing::debug!(target: super::LOG_TARGET, "GET {}", url);

		self.client
			.get(&url)
			.send()
			.await
			.map_err(|e| NativeError::with_code("NETWORK", format!("Request failed: {}", e)))
	}

	async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, NativeError> {
		let status = response.status();
		if !status.is_success() {
			let error_text = response
				.text()
				.await
				.unwrap_or_else(|_| format!("HTTP {}", status));
			return Err(NativeError::with_code(status.as_str(), error_text));
		}

		response
			.json()
			.await
			.map_err(|e| NativeError::with_code("DECODE", format!("Failed to parse response: {}", e)))
	}
}

#[async_trait]
impl TezosApi for HttpTezosApi {
	async fn get_item(&self, item_id: &str) -> Result<TezosItem, NativeError> {
		Self::decode(self.get(&format!("items/{}", item_id)).await?).await
	}

	async fn get_collection(&self, contract: &str) -> Result<TezosCollection, NativeError> {
		Self::decode(self.get(&format!("collections/{}", contract)).await?).await
	}

	async fn get_ownership(
		&self,
		item_id: &str,
		owner: &str,
	) -> Result<Option<TezosOwnership>, NativeError> {
		let response = self
			.get(&format!("ownerships/{}:{}", item_id, owner))
			.await?;
		if response.status() == StatusCode::NOT_FOUND {
			return Ok(None);
		}
		Self::decode(response).await.map(Some)
	}

	async fn get_order(&self, hash: &str) -> Result<TezosOrder, NativeError> {
		Self::decode(self.get(&format!("orders/{}", hash)).await?).await
	}

	async fn upsert_order(&self, form: TezosOrderForm) -> Result<TezosOrder, NativeError> {
		let url = self.url("orders");
		tracing::debug!(target: super::LOG_TARGET, "POST {}", url);

		let response = self
			.client
			.post(&url)
			.json(&form)
			.send()
			.await
			.map_err(|e| NativeError::with_code("NETWORK", format!("Request failed: {}", e)))?;
		Self::decode(response).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_url_joining() {
		let api = HttpTezosApi::new("https://tezos-api.example.org/v0.1/").unwrap();
		assert_eq!(
			api.url("orders/abc"),
			"https://tezos-api.example.org/v0.1/orders/abc"
		);
	}

	#[test]
	fn test_timeout_is_left_to_the_caller() {
		let api = HttpTezosApi::new("https://tezos-api.example.org/v0.1").unwrap();
		assert_eq!(api.timeout(), None);

		let api =
			HttpTezosApi::with_timeout("https://tezos-api.example.org/v0.1", Duration::from_secs(5))
				.unwrap();
		assert_eq!(api.timeout(), Some(Duration::from_secs(5)));
	}

	#[tokio::test]
	async fn test_unreachable_indexer_is_a_network_error() {
		let api = HttpTezosApi::with_timeout("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
		let err = api.get_order("abc").await.unwrap_err();
		assert_eq!(err.code.as_deref(), Some("NETWORK"));
	}
}
