//! EVM builders against the in-memory chain
//!
//! These tests verify:
//! - Identity and currency gates run before any chain I/O
//! - Default payouts and data V3 rules
//! - The mint, sell and buy flow end to end
//! - Bids, order updates, accept-bid and lazy mints
//! - Cancelled orders and foreign makers never reach the chain

use std::sync::Arc;

use tessera_sdk::{
	AssetType, BigNumber, Blockchain, CollectionId, ContractAddress, Environment, FillBuilder,
	FillRequest, ItemId, MaxFeesBasePointSupport, MintBuilder, MintRequest, MutationKind,
	OrderBuilder, OrderId, OrderReader, OrderRequest, OrderStatus, OrderUpdateBuilder,
	OrderUpdateRequest, Part, PrepareFillRequest, PrepareMintRequest, PrepareOrderRequest,
	PrepareOrderUpdateRequest, SdkError, UnionAddress,
};
use tessera_settlement::chains::ethereum::{
	EthereumBid, EthereumContext, EthereumFill, EthereumMint, EthereumOrderUpdate, EthereumReader,
	EthereumSell, EvmConfig, MemoryEthereumChain, MemoryEthereumClient,
	types::{EthCollectionFeature, EthCollectionType, EthOrderData, EthPart},
};

const ORIGIN: &str = "0x00000000000000000000000000000000000000f1";

fn context(client: &MemoryEthereumClient, config: EvmConfig) -> EthereumContext {
	EthereumContext::new(
		Blockchain::Ethereum,
		Environment::Development,
		Arc::new(client.clone()),
		config,
	)
	.unwrap()
}

fn eth() -> AssetType {
	AssetType::Native {
		blockchain: Blockchain::Ethereum,
	}
}

fn order_request(price: &str) -> OrderRequest {
	OrderRequest {
		amount: 1,
		price: BigNumber::parse(price).unwrap(),
		currency: eth(),
		payouts: None,
		origin_fees: None,
		max_fees_base_point: None,
	}
}

fn erc20(contract: &str) -> AssetType {
	AssetType::Fungible {
		contract: ContractAddress::new(Blockchain::Ethereum, contract).unwrap(),
	}
}

async fn list(seller: &MemoryEthereumClient, item_id: &ItemId, price: &str) -> OrderId {
	let prepared = EthereumSell::new(context(seller, EvmConfig::default()))
		.prepare(PrepareOrderRequest {
			item_id: item_id.clone(),
		})
		.await
		.unwrap();
	prepared
		.submit
		.submit(order_request(price))
		.await
		.unwrap()
		.into_value()
}

async fn mint(chain: &MemoryEthereumChain, owner: &MemoryEthereumClient) -> ItemId {
	let contract = chain.deploy_collection(EthCollectionType::Erc721, Vec::new());
	let prepared = EthereumMint::new(context(owner, EvmConfig::default()))
		.prepare(PrepareMintRequest {
			collection_id: CollectionId::new(Blockchain::Ethereum, &contract).unwrap(),
		})
		.await
		.unwrap();
	let response = prepared
		.submit
		.submit(MintRequest {
			uri: "ipfs://QmMeta".to_string(),
			supply: 1,
			lazy_mint: false,
			creators: Vec::new(),
			royalties: Vec::new(),
		})
		.await
		.unwrap();

	assert_eq!(response.kind(), MutationKind::OnChain);
	response.transaction().unwrap().wait().await.unwrap();
	response.into_value()
}

#[tokio::test]
async fn test_foreign_item_is_rejected_without_reads() {
	let chain = MemoryEthereumChain::new(Blockchain::Ethereum);
	let wallet = chain.wallet();

	let result = EthereumSell::new(context(&wallet, EvmConfig::default()))
		.prepare(PrepareOrderRequest {
			item_id: ItemId::parse("FLOW:A.0000000000000001.CommonNFT:7").unwrap(),
		})
		.await;

	assert!(matches!(
		result,
		Err(SdkError::WrongChain {
			expected: Blockchain::Ethereum,
			actual: Blockchain::Flow
		})
	));
	assert_eq!(chain.io().reads(), 0);
}

#[tokio::test]
async fn test_bid_in_native_currency_never_writes() {
	let chain = MemoryEthereumChain::new(Blockchain::Ethereum);
	let owner = chain.wallet();
	let bidder = chain.wallet();
	let item_id = mint(&chain, &owner).await;
	let writes = chain.io().writes();

	let prepared = EthereumBid::new(context(&bidder, EvmConfig::default()))
		.prepare(PrepareOrderRequest { item_id })
		.await
		.unwrap();
	let result = prepared.submit.submit(order_request("1")).await;

	assert!(matches!(result, Err(SdkError::UnsupportedCurrency(_))));
	assert_eq!(chain.io().writes(), writes);
}

#[tokio::test]
async fn test_sell_defaults_payouts_to_maker() {
	let chain = MemoryEthereumChain::new(Blockchain::Ethereum);
	let owner = chain.wallet();
	let item_id = mint(&chain, &owner).await;

	let prepared = EthereumSell::new(context(&owner, EvmConfig::default()))
		.prepare(PrepareOrderRequest { item_id })
		.await
		.unwrap();
	assert_eq!(prepared.max_amount, Some(BigNumber::from(1)));
	prepared.submit.submit(order_request("0.5")).await.unwrap();

	let form = chain.last_order_form().unwrap();
	let EthOrderData::RaribleV2DataV1 { payouts, .. } = form.data else {
		panic!("expected data V1, got {:?}", form.data);
	};
	assert_eq!(
		payouts,
		vec![EthPart {
			account: owner.wallet_address().to_string(),
			value: 10000,
		}]
	);
}

#[tokio::test]
async fn test_data_v3_sell_rules() {
	let chain = MemoryEthereumChain::new(Blockchain::Ethereum);
	let owner = chain.wallet();
	let item_id = mint(&chain, &owner).await;
	let config = EvmConfig {
		use_data_v3: true,
		marketplace_marker: None,
	};

	let prepared = EthereumSell::new(context(&owner, config))
		.prepare(PrepareOrderRequest { item_id })
		.await
		.unwrap();
	assert_eq!(
		prepared.max_fees_base_point_support,
		MaxFeesBasePointSupport::Required
	);

	let missing = prepared.submit.submit(order_request("1")).await;
	assert!(matches!(missing, Err(SdkError::InvalidRequest(_))));

	let maker = UnionAddress::new(Blockchain::Ethereum, owner.wallet_address()).unwrap();
	let origin = UnionAddress::new(Blockchain::Ethereum, ORIGIN).unwrap();
	let split = OrderRequest {
		payouts: Some(vec![Part::new(maker, 5000), Part::new(origin, 5000)]),
		max_fees_base_point: Some(500),
		..order_request("1")
	};
	assert!(matches!(
		prepared.submit.submit(split).await,
		Err(SdkError::InvalidRequest(_))
	));

	let valid = OrderRequest {
		max_fees_base_point: Some(500),
		..order_request("1")
	};
	prepared.submit.submit(valid).await.unwrap();
	let form = chain.last_order_form().unwrap();
	assert!(matches!(
		form.data,
		EthOrderData::RaribleV2DataV3Sell {
			max_fees_base_point: 500,
			..
		}
	));
}

#[tokio::test]
async fn test_rejected_write_surfaces_chain_error() {
	let chain = MemoryEthereumChain::new(Blockchain::Ethereum);
	let owner = chain.wallet();
	let item_id = mint(&chain, &owner).await;

	let prepared = EthereumSell::new(context(&owner, EvmConfig::default()))
		.prepare(PrepareOrderRequest { item_id })
		.await
		.unwrap();
	chain.io().set_reject_writes(true);

	let result = prepared.submit.submit(order_request("1")).await;
	assert!(matches!(
		result,
		Err(SdkError::ChainRejected {
			blockchain: Blockchain::Ethereum,
			..
		})
	));
}

#[tokio::test]
async fn test_mint_sell_buy() {
	let chain = MemoryEthereumChain::new(Blockchain::Ethereum);
	let seller = chain.wallet();
	let buyer = chain.wallet();
	let item_id = mint(&chain, &seller).await;

	let prepared = EthereumSell::new(context(&seller, EvmConfig::default()))
		.prepare(PrepareOrderRequest {
			item_id: item_id.clone(),
		})
		.await
		.unwrap();
	let origin = UnionAddress::new(Blockchain::Ethereum, ORIGIN).unwrap();
	let listed = prepared
		.submit
		.submit(OrderRequest {
			origin_fees: Some(vec![Part::new(origin, 1000)]),
			..order_request("0.0000004")
		})
		.await
		.unwrap();
	assert_eq!(listed.kind(), MutationKind::OffChain);
	let order_id = listed.into_value();

	let fill = EthereumFill::buy(context(&buyer, EvmConfig::default()))
		.prepare(PrepareFillRequest {
			order_id: order_id.clone(),
		})
		.await
		.unwrap();
	assert!(!fill.multiple);
	assert_eq!(fill.max_amount, BigNumber::from(1));

	let transaction = fill
		.submit
		.submit(FillRequest {
			amount: 1,
			..FillRequest::default()
		})
		.await
		.unwrap();
	let result = transaction.wait().await.unwrap();
	assert!(result.receipt.is_some());

	let order = EthereumReader::new(context(&buyer, EvmConfig::default()))
		.get_order(&order_id)
		.await
		.unwrap();
	assert!(order.make_stock.is_zero());
	assert_eq!(order.status, OrderStatus::Filled);
	assert_eq!(chain.ownership(item_id.native(), buyer.wallet_address()), 1);
}

#[tokio::test]
async fn test_cancelled_order_is_refused_before_the_chain() {
	let chain = MemoryEthereumChain::new(Blockchain::Ethereum);
	let seller = chain.wallet();
	let buyer = chain.wallet();
	let item_id = mint(&chain, &seller).await;
	let order_id = list(&seller, &item_id, "1").await;

	let mut order = chain.order(order_id.native()).unwrap();
	order.cancelled = true;
	chain.insert_order(order);

	let fill = EthereumFill::buy(context(&buyer, EvmConfig::default()))
		.prepare(PrepareFillRequest { order_id })
		.await
		.unwrap();
	assert!(fill.max_amount.is_zero());

	let writes = chain.io().writes();
	let result = fill
		.submit
		.submit(FillRequest {
			amount: 1,
			..FillRequest::default()
		})
		.await;
	assert!(matches!(result, Err(SdkError::InvalidRequest(_))));
	assert_eq!(chain.io().writes(), writes);
}

#[tokio::test]
async fn test_sell_update_keeps_order_id() {
	let chain = MemoryEthereumChain::new(Blockchain::Ethereum);
	let seller = chain.wallet();
	let item_id = mint(&chain, &seller).await;
	let order_id = list(&seller, &item_id, "0.0000004").await;

	let prepared = EthereumOrderUpdate::sell(context(&seller, EvmConfig::default()))
		.prepare(PrepareOrderUpdateRequest {
			order_id: order_id.clone(),
		})
		.await
		.unwrap();
	let updated = prepared
		.submit
		.submit(OrderUpdateRequest {
			price: BigNumber::parse("0.0000008").unwrap(),
		})
		.await
		.unwrap();
	assert_eq!(updated.kind(), MutationKind::OffChain);
	assert_eq!(updated.value(), &order_id);

	let order = EthereumReader::new(context(&seller, EvmConfig::default()))
		.get_order(&order_id)
		.await
		.unwrap();
	assert_eq!(order.take.value, BigNumber::parse("0.0000008").unwrap());
	assert_eq!(order.price_history.len(), 1);
	assert_eq!(order.status, OrderStatus::Active);
}

#[tokio::test]
async fn test_update_requires_the_maker() {
	let chain = MemoryEthereumChain::new(Blockchain::Ethereum);
	let seller = chain.wallet();
	let stranger = chain.wallet();
	let item_id = mint(&chain, &seller).await;
	let order_id = list(&seller, &item_id, "1").await;
	let writes = chain.io().writes();

	let result = EthereumOrderUpdate::sell(context(&stranger, EvmConfig::default()))
		.prepare(PrepareOrderUpdateRequest { order_id })
		.await;
	assert!(matches!(result, Err(SdkError::InvalidRequest(_))));
	assert_eq!(chain.io().writes(), writes);
}

#[tokio::test]
async fn test_bid_update_and_accept_bid() {
	let chain = MemoryEthereumChain::new(Blockchain::Ethereum);
	let owner = chain.wallet();
	let bidder = chain.wallet();
	let token = chain.deploy_token(18);
	let item_id = mint(&chain, &owner).await;

	let prepared = EthereumBid::new(context(&bidder, EvmConfig::default()))
		.prepare(PrepareOrderRequest {
			item_id: item_id.clone(),
		})
		.await
		.unwrap();
	assert_eq!(prepared.max_amount, Some(BigNumber::from(1)));
	let bid = prepared
		.submit
		.submit(OrderRequest {
			currency: erc20(&token),
			..order_request("2")
		})
		.await
		.unwrap();
	assert_eq!(bid.kind(), MutationKind::OffChain);
	let order_id = bid.into_value();

	let update = EthereumOrderUpdate::bid(context(&bidder, EvmConfig::default()))
		.prepare(PrepareOrderUpdateRequest {
			order_id: order_id.clone(),
		})
		.await
		.unwrap();
	let updated = update
		.submit
		.submit(OrderUpdateRequest {
			price: BigNumber::parse("3").unwrap(),
		})
		.await
		.unwrap();
	assert_eq!(updated.value(), &order_id);

	let reader = EthereumReader::new(context(&owner, EvmConfig::default()));
	let order = reader.get_order(&order_id).await.unwrap();
	assert_eq!(order.make.value, BigNumber::from(3));

	let fill = EthereumFill::accept_bid(context(&owner, EvmConfig::default()))
		.prepare(PrepareFillRequest {
			order_id: order_id.clone(),
		})
		.await
		.unwrap();
	assert_eq!(fill.max_amount, BigNumber::from(1));
	assert_eq!(
		fill.max_fees_base_point_support,
		MaxFeesBasePointSupport::Ignored
	);

	let transaction = fill
		.submit
		.submit(FillRequest {
			amount: 1,
			..FillRequest::default()
		})
		.await
		.unwrap();
	transaction.wait().await.unwrap();

	assert_eq!(chain.ownership(item_id.native(), bidder.wallet_address()), 1);
	assert_eq!(chain.ownership(item_id.native(), owner.wallet_address()), 0);
	let order = reader.get_order(&order_id).await.unwrap();
	assert!(order.make_stock.is_zero());
	assert_eq!(order.status, OrderStatus::Filled);
}

#[tokio::test]
async fn test_lazy_mint_then_sell_and_buy() {
	let chain = MemoryEthereumChain::new(Blockchain::Ethereum);
	let creator = chain.wallet();
	let buyer = chain.wallet();
	let contract = chain.deploy_collection(
		EthCollectionType::Erc721,
		vec![EthCollectionFeature::MintAndTransfer],
	);

	let prepared = EthereumMint::new(context(&creator, EvmConfig::default()))
		.prepare(PrepareMintRequest {
			collection_id: CollectionId::new(Blockchain::Ethereum, &contract).unwrap(),
		})
		.await
		.unwrap();
	assert!(prepared.supports_lazy_mint);

	let minted = prepared
		.submit
		.submit(MintRequest {
			uri: "ipfs://QmLazy".to_string(),
			supply: 1,
			lazy_mint: true,
			creators: Vec::new(),
			royalties: Vec::new(),
		})
		.await
		.unwrap();
	assert_eq!(minted.kind(), MutationKind::OffChain);
	assert!(minted.transaction().is_none());
	let item_id = minted.into_value();
	assert_eq!(chain.ownership(item_id.native(), creator.wallet_address()), 1);

	let order_id = list(&creator, &item_id, "0.5").await;
	let fill = EthereumFill::buy(context(&buyer, EvmConfig::default()))
		.prepare(PrepareFillRequest { order_id })
		.await
		.unwrap();
	fill.submit
		.submit(FillRequest {
			amount: 1,
			..FillRequest::default()
		})
		.await
		.unwrap()
		.wait()
		.await
		.unwrap();

	assert_eq!(chain.ownership(item_id.native(), buyer.wallet_address()), 1);
}
