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
	Action, MintBuilder, MintRequest, MintResponse, Part, PrepareMintRequest,
	PrepareMintResponse, SdkError, order::FULL_UNIT_BASIS_POINTS,
};

use super::common::{to_native_collection, to_native_parts, to_union_address, to_union_item_id};
use super::types::{TezosCollectionType, TezosMintForm, TezosMintOutcome};
use super::{LOG_TARGET, TezosContext};
use crate::chains::{ensure_fee_shares, ensure_payout_shares};

/// On-chain mints into NFT and MT collections
#[derive(Debug, Clone)]
pub struct TezosMint {
	context: TezosContext,
}

impl TezosMint {
	pub fn new(context: TezosContext) -> Self {
		Self { context }
	}
}

#[derive(Debug)]
struct MintSnapshot {
	contract: String,
	owner: String,
	multiple: bool,
}

impl MintSnapshot {
	fn form(&self, request: MintRequest) -> Result<TezosMintForm, SdkError> {
		if request.supply == 0 {
			return Err(SdkError::invalid_request("Supply must be greater than zero"));
		}
		if !self.multiple && request.supply != 1 {
			return Err(SdkError::invalid_request(format!(
				"Collection {} mints single tokens, got supply {}",
				self.contract, request.supply
			)));
		}
		if request.lazy_mint {
			return Err(SdkError::invalid_request("Tezos does not support lazy minting"));
		}
		if request.uri.is_empty() {
			return Err(SdkError::invalid_request("Token URI is empty"));
		}

		let creators = if request.creators.is_empty() {
			vec![Part::new(to_union_address(&self.owner)?, FULL_UNIT_BASIS_POINTS)]
		} else {
			request.creators
		};
		ensure_payout_shares(&creators)?;
		ensure_fee_shares(&request.royalties)?;

		Ok(TezosMintForm {
			contract: self.contract.clone(),
			owner: self.owner.clone(),
			amount: request.supply,
			uri: request.uri,
			creators: to_native_parts(&creators)?,
			royalties: to_native_parts(&request.royalties)?,
		})
	}
}

#[async_trait]
impl MintBuilder for TezosMint {
	async fn prepare(&self, request: PrepareMintRequest) -> Result<PrepareMintResponse, SdkError> {
		let context = &self.context;
		let contract = to_native_collection(&request.collection_id)?;

		let collection = context
			.api
			.get_collection(&contract)
			.await
			.map_err(|e| context.read_failed(e))?;
		let owner = context
			.provider
			.address()
			.await
			.map_err(|e| context.read_failed(e))?;
		let multiple = collection.kind == TezosCollectionType::Mt;

		tracing::debug!(
			target: LOG_TARGET,
			"Prepared mint into {} (multiple: {})",
			request.collection_id,
			multiple
		);

		let snapshot = Arc::new(MintSnapshot {
			contract,
			owner,
			multiple,
		});

		let submit = Action::new("mint", {
			let context = context.clone();
			move |form: TezosMintForm| {
				let context = context.clone();
				async move {
					let contract = form.contract.clone();
					let outcome = context
						.provider
						.mint(form)
						.await
						.map_err(|e| context.rejected(e))?;

					tracing::info!(
						target: LOG_TARGET,
						"Minted {}:{} in {}",
						contract,
						outcome.token_id,
						outcome.transaction.hash()
					);
					Ok((contract, outcome))
				}
			}
		})
		.before(move |request: MintRequest| snapshot.form(request))
		.after({
			let context = context.clone();
			move |(contract, outcome): (String, TezosMintOutcome)| {
				MintResponse::on_chain(
					context.transaction(outcome.transaction),
					to_union_item_id(&contract, &outcome.token_id)?,
				)
			}
		});

		Ok(PrepareMintResponse {
			multiple,
			supports_royalties: true,
			supports_lazy_mint: false,
			submit,
		})
	}
}
