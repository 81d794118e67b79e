//! Flow builders against the in-memory storefront

use std::sync::Arc;

use rust_decimal::Decimal;
use tessera_sdk::{
	AssetType, BigNumber, Blockchain, CollectionId, Environment, FillBuilder, FillRequest, ItemId,
	MintBuilder, MintRequest, MutationKind, OrderBuilder, OrderReader, OrderRequest, OrderStatus,
	OrderUpdateBuilder, OrderUpdateRequest, OriginFeeSupport, PayoutsSupport, PrepareFillRequest,
	PrepareMintRequest, PrepareOrderRequest, PrepareOrderUpdateRequest, SdkError,
};
use tessera_settlement::chains::flow::{
	FlowBuy, FlowContext, FlowMint, FlowReader, FlowSell, FlowSellUpdate, MemoryFlowChain,
	MemoryFlowClient, types::FlowCurrency,
};

fn context(client: &MemoryFlowClient) -> FlowContext {
	FlowContext::new(Environment::Testnet, Arc::new(client.clone()))
}

fn flow_currency() -> AssetType {
	AssetType::Native {
		blockchain: Blockchain::Flow,
	}
}

async fn mint(chain: &MemoryFlowChain, owner: &MemoryFlowClient) -> ItemId {
	let contract = chain.deploy_collection("CommonNFT");
	let prepared = FlowMint::new(context(owner))
		.prepare(PrepareMintRequest {
			collection_id: CollectionId::new(Blockchain::Flow, &contract).unwrap(),
		})
		.await
		.unwrap();
	assert!(!prepared.multiple);
	assert!(!prepared.supports_lazy_mint);

	let response = prepared
		.submit
		.submit(MintRequest {
			uri: "ipfs://QmFlow".to_string(),
			supply: 1,
			lazy_mint: false,
			creators: Vec::new(),
			royalties: Vec::new(),
		})
		.await
		.unwrap();
	assert_eq!(response.kind(), MutationKind::OnChain);
	response.into_value()
}

#[tokio::test]
async fn test_lazy_mint_is_refused_before_writing() {
	let chain = MemoryFlowChain::new();
	let owner = chain.wallet();
	let contract = chain.deploy_collection("CommonNFT");

	let prepared = FlowMint::new(context(&owner))
		.prepare(PrepareMintRequest {
			collection_id: CollectionId::new(Blockchain::Flow, &contract).unwrap(),
		})
		.await
		.unwrap();
	let result = prepared
		.submit
		.submit(MintRequest {
			uri: "ipfs://QmFlow".to_string(),
			supply: 1,
			lazy_mint: true,
			creators: Vec::new(),
			royalties: Vec::new(),
		})
		.await;

	assert!(matches!(result, Err(SdkError::InvalidRequest(_))));
	assert_eq!(chain.io().writes(), 0);
}

#[tokio::test]
async fn test_non_owner_cannot_sell() {
	let chain = MemoryFlowChain::new();
	let owner = chain.wallet();
	let stranger = chain.wallet();
	let item_id = mint(&chain, &owner).await;

	let prepared = FlowSell::new(context(&stranger))
		.prepare(PrepareOrderRequest { item_id })
		.await
		.unwrap();
	assert!(prepared.max_amount.unwrap().is_zero());

	let result = prepared
		.submit
		.submit(OrderRequest {
			amount: 1,
			price: BigNumber::parse("1").unwrap(),
			currency: flow_currency(),
			payouts: None,
			origin_fees: None,
			max_fees_base_point: None,
		})
		.await;
	assert!(matches!(result, Err(SdkError::InvalidRequest(_))));
}

#[tokio::test]
async fn test_sell_update_buy() {
	let chain = MemoryFlowChain::new();
	let seller = chain.wallet();
	let buyer = chain.wallet();
	let item_id = mint(&chain, &seller).await;

	let listed = FlowSell::new(context(&seller))
		.prepare(PrepareOrderRequest { item_id })
		.await
		.unwrap()
		.submit
		.submit(OrderRequest {
			amount: 1,
			price: BigNumber::parse("4").unwrap(),
			currency: flow_currency(),
			payouts: None,
			origin_fees: None,
			max_fees_base_point: None,
		})
		.await
		.unwrap();
	assert_eq!(listed.kind(), MutationKind::OnChain);
	let first_id = listed.into_value();

	let relisted = FlowSellUpdate::new(context(&seller))
		.prepare(PrepareOrderUpdateRequest {
			order_id: first_id.clone(),
		})
		.await
		.unwrap()
		.submit
		.submit(OrderUpdateRequest {
			price: BigNumber::parse("2.5").unwrap(),
		})
		.await
		.unwrap();
	let order_id = relisted.into_value();
	assert_ne!(order_id, first_id);

	let reader = FlowReader::new(context(&buyer));
	let previous = reader.get_order(&first_id).await.unwrap();
	assert_eq!(previous.status, OrderStatus::Cancelled);

	let fill = FlowBuy::new(context(&buyer))
		.prepare(PrepareFillRequest {
			order_id: order_id.clone(),
		})
		.await
		.unwrap();
	assert_eq!(fill.origin_fee_support, OriginFeeSupport::Full);
	assert_eq!(fill.payouts_support, PayoutsSupport::None);
	assert!(!fill.supports_partial_fill);

	chain
		.set_balance(buyer.wallet_address(), FlowCurrency::Flow, "10")
		.unwrap();
	let transaction = fill
		.submit
		.submit(FillRequest {
			amount: 1,
			..FillRequest::default()
		})
		.await
		.unwrap();
	transaction.wait().await.unwrap();

	let order = reader.get_order(&order_id).await.unwrap();
	assert_eq!(order.status, OrderStatus::Filled);
	assert_eq!(order.take.value, BigNumber::parse("2.5").unwrap());
	assert_eq!(
		chain.balance(seller.wallet_address(), FlowCurrency::Flow),
		Decimal::new(25, 1)
	);
}
