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


use std::sync::Arc;

use async_trait::async_trait;
use tessera_sdk::{
	Action, MintBuilder, MintRequest, MintResponse, PrepareMintRequest,
	PrepareMintResponse, SdkError,
};

use super::common::{to_native_address, to_native_collection, to_native_payouts, to_union_item_id};
use super::types::{FlowMintOutcome, FlowMintRequest};
use super::{FlowContext, LOG_TARGET};
use crate::chains::ensure_fee_shares;

/// On-chain mints into Flow NFT collections
#[derive(Debug, Clone)]
pub struct FlowMint {
	context: FlowContext,
}

impl FlowMint {
	pub fn new(context: FlowContext) -> Self {
		Self { context }
	}
}

#[derive(Debug)]
struct MintSnapshot {
	collection: String,
	minter: String,
}

impl MintSnapshot {
	fn request(&self, request: MintRequest) -> Result<FlowMintRequest, SdkError> {
		if request.supply != 1 {
			return Err(SdkError::invalid_request(format!(
				"Flow collections mint single tokens, got supply {}",
				request.supply
			)));
		}
		if request.lazy_mint {
			return Err(SdkError::invalid_request("Flow does not support lazy minting"));
		}
		if request.uri.is_empty() {
			return Err(SdkError::invalid_request("Token URI is empty"));
		}
		// The minting account is always the creator
		for creator in &request.creators {
			if to_native_address(&creator.account)? != self.minter {
				return Err(SdkError::invalid_request(format!(
					"Flow mints are credited to the minter, not {}",
					creator.account
				)));
			}
		}
		ensure_fee_shares(&request.royalties)?;

		Ok(FlowMintRequest {
			collection: self.collection.clone(),
			meta_uri: request.uri,
			royalties: to_native_payouts(&request.royalties)?,
		})
	}
}

#[async_trait]
impl MintBuilder for FlowMint {
	async fn prepare(&self, request: PrepareMintRequest) -> Result<PrepareMintResponse, SdkError> {
		let context = &self.context;
		let contract = to_native_collection(&request.collection_id)?;

		let collection = context
			.client
			.get_collection(&contract)
			.await
			.map_err(|e| context.read_failed(e))?;
		let minter = context
			.client
			.address()
			.await
			.map_err(|e| context.read_failed(e))?;
		if !collection.public && collection.owner != minter {
			return Err(SdkError::invalid_request(format!(
				"Only {} can mint into {}",
				collection.owner, request.collection_id
			)));
		}

		tracing::debug!(target: LOG_TARGET, "Prepared mint into {}", request.collection_id);

		let snapshot = Arc::new(MintSnapshot {
			collection: contract,
			minter,
		});

		let submit = Action::new("mint", {
			let context = context.clone();
			move |request: FlowMintRequest| {
				let context = context.clone();
				async move {
					let collection = request.collection.clone();
					let outcome = context
						.client
						.mint(request)
						.await
						.map_err(|e| context.rejected(e))?;

					tracing::info!(
						target: LOG_TARGET,
						"Minted {}:{} in {}",
						collection,
						outcome.token_id,
						outcome.transaction.hash()
					);
					Ok((collection, outcome))
				}
			}
		})
		.before(move |request: MintRequest| snapshot.request(request))
		.after({
			let context = context.clone();
			move |(collection, outcome): (String, FlowMintOutcome)| {
				MintResponse::on_chain(
					context.transaction(outcome.transaction),
					to_union_item_id(&collection, outcome.token_id)?,
				)
			}
		});

		Ok(PrepareMintResponse {
			multiple: false,
			supports_royalties: true,
			supports_lazy_mint: false,
			submit,
		})
	}
}
