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
	Action, Blockchain, MintBuilder, MintRequest, MintResponse, Part,
	PrepareMintRequest, PrepareMintResponse, SdkError, order::FULL_UNIT_BASIS_POINTS,
};

use super::common::{to_native_collection, to_native_parts, to_union_address, to_union_item_id};
use super::types::{EthCollectionFeature, EthCollectionType, EthMintForm, EthMintOutcome};
use super::{EthereumContext, LOG_TARGET};
use crate::chains::{ensure_fee_shares, ensure_payout_shares};

/// Mints into ERC-721 and ERC-1155 collections, on-chain or lazily
#[derive(Debug, Clone)]
pub struct EthereumMint {
	context: EthereumContext,
}

impl EthereumMint {
	pub fn new(context: EthereumContext) -> Self {
		Self { context }
	}
}

/// Mint validated against the collection
#[derive(Debug, Clone)]
struct MintDraft {
	lazy: bool,
	minter: String,
	form: EthMintForm,
}

#[derive(Debug)]
struct MintSnapshot {
	blockchain: Blockchain,
	contract: String,
	minter: String,
	multiple: bool,
	supports_royalties: bool,
	supports_lazy_mint: bool,
}

impl MintSnapshot {
	fn draft(&self, request: MintRequest) -> Result<MintDraft, SdkError> {
		if request.supply == 0 {
			return Err(SdkError::invalid_request("Supply must be greater than zero"));
		}
		if !self.multiple && request.supply != 1 {
			return Err(SdkError::invalid_request(format!(
				"Collection {} mints single tokens, got supply {}",
				self.contract, request.supply
			)));
		}
		if request.lazy_mint && !self.supports_lazy_mint {
			return Err(SdkError::invalid_request(format!(
				"Collection {} does not support lazy minting",
				self.contract
			)));
		}
		if !request.royalties.is_empty() && !self.supports_royalties {
			return Err(SdkError::invalid_request(format!(
				"Collection {} does not support royalties",
				self.contract
			)));
		}
		if request.uri.is_empty() {
			return Err(SdkError::invalid_request("Token URI is empty"));
		}

		let creators = if request.creators.is_empty() {
			vec![Part::new(
				to_union_address(self.blockchain, &self.minter)?,
				FULL_UNIT_BASIS_POINTS,
			)]
		} else {
			request.creators
		};
		ensure_payout_shares(&creators)?;
		ensure_fee_shares(&request.royalties)?;

		Ok(MintDraft {
			lazy: request.lazy_mint,
			minter: self.minter.clone(),
			form: EthMintForm {
				contract: self.contract.clone(),
				token_id: String::new(),
				uri: request.uri,
				supply: request.supply.to_string(),
				creators: to_native_parts(self.blockchain, &creators)?,
				royalties: to_native_parts(self.blockchain, &request.royalties)?,
				signatures: Vec::new(),
			},
		})
	}
}

#[async_trait]
impl MintBuilder for EthereumMint {
	async fn prepare(&self, request: PrepareMintRequest) -> Result<PrepareMintResponse, SdkError> {
		let context = &self.context;
		let blockchain = context.blockchain();
		let contract = to_native_collection(blockchain, &request.collection_id)?;

		let collection = context
			.client
			.get_collection(&contract)
			.await
			.map_err(|e| context.read_failed(e))?;
		if collection.kind == EthCollectionType::CryptoPunks {
			return Err(SdkError::UnsupportedAssetType("CRYPTO_PUNKS".to_string()));
		}
		let minter = context
			.client
			.address()
			.await
			.map_err(|e| context.read_failed(e))?;

		let snapshot = Arc::new(MintSnapshot {
			blockchain,
			contract,
			minter,
			multiple: collection.kind == EthCollectionType::Erc1155,
			supports_royalties: collection.has_feature(EthCollectionFeature::SecondarySaleFees),
			supports_lazy_mint: collection.has_feature(EthCollectionFeature::MintAndTransfer),
		});

		tracing::debug!(
			target: LOG_TARGET,
			"Prepared mint into {} (multiple: {}, lazy: {})",
			request.collection_id,
			snapshot.multiple,
			snapshot.supports_lazy_mint
		);

		let response = PrepareMintResponse {
			multiple: snapshot.multiple,
			supports_royalties: snapshot.supports_royalties,
			supports_lazy_mint: snapshot.supports_lazy_mint,
			submit: Action::new("mint", {
				let context = context.clone();
				move |draft: MintDraft| {
					let context = context.clone();
					async move { mint(&context, draft).await }
				}
			})
			.before({
				let snapshot = snapshot.clone();
				move |request: MintRequest| snapshot.draft(request)
			})
			.after({
				let context = context.clone();
				move |outcome: EthMintOutcome| {
					let item_id = to_union_item_id(blockchain, &outcome.contract, &outcome.token_id)?;
					match outcome.transaction {
						Some(transaction) => {
							MintResponse::on_chain(context.transaction(transaction), item_id)
						}
						None => Ok(MintResponse::off_chain(item_id)),
					}
				}
			}),
		};

		Ok(response)
	}
}

async fn mint(context: &EthereumContext, draft: MintDraft) -> Result<EthMintOutcome, SdkError> {
	let client = &context.client;
	let mut form = draft.form;

	form.token_id = client
		.generate_token_id(&form.contract, &draft.minter)
		.await
		.map_err(|e| context.read_failed(e))?;

	if draft.lazy {
		let payload = serde_json::to_value(&form)
			.map_err(|e| SdkError::invalid_request(format!("Unencodable mint: {}", e)))?;
		let signature = client
			.sign(&payload)
			.await
			.map_err(|e| context.rejected(e))?;
		form.signatures = vec![signature];

		let item = client
			.mint_lazy(form)
			.await
			.map_err(|e| context.rejected(e))?;

		tracing::info!(target: LOG_TARGET, "Lazy minted {} on {}", item.id, context.blockchain());

		return Ok(EthMintOutcome {
			contract: item.contract,
			token_id: item.token_id,
			transaction: None,
		});
	}

	let contract = form.contract.clone();
	let token_id = form.token_id.clone();
	let transaction = client.mint(form).await.map_err(|e| context.rejected(e))?;

	tracing::info!(
		target: LOG_TARGET,
		"Minted {}:{} on {} in {}",
		contract,
		token_id,
		context.blockchain(),
		transaction.hash()
	);

	Ok(EthMintOutcome {
		contract,
		token_id,
		transaction: Some(transaction),
	})
}
