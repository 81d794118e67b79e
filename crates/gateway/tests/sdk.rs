//! SDK façade over in-memory chains
//!
//! These tests verify:
//! - Dispatch by identifier prefix
//! - `UnsupportedChain` for unregistered operations
//! - The EVM mint, sell and buy flow through the façade

use std::sync::Arc;

use tessera_gateway::{Sdk, SdkConfig};
use tessera_sdk::{
	AssetType, BigNumber, Blockchain, CollectionId, Environment, FillRequest, ItemId, MintRequest,
	MutationKind, Operation, OrderId, OrderRequest, OrderStatus, Part, PrepareFillRequest,
	PrepareMintRequest, PrepareOrderRequest, PrepareOrderUpdateRequest, SdkError, UnionAddress,
};
use tessera_settlement::chains::{
	ethereum::{
		MemoryEthereumChain,
		types::{EthAssetType, EthCollectionType},
	},
	flow::MemoryFlowChain,
	tezos::MemoryTezosChain,
};

fn config() -> SdkConfig {
	SdkConfig {
		environment: Environment::Development,
		..SdkConfig::default()
	}
}

#[tokio::test]
async fn test_mint_sell_buy_through_sdk() {
	let chain = MemoryEthereumChain::new(Blockchain::Ethereum);
	let seller = chain.wallet();
	let buyer = chain.wallet();
	let contract = chain.deploy_collection(EthCollectionType::Erc721, Vec::new());

	let seller_sdk = Sdk::builder(config())
		.with_ethereum(Blockchain::Ethereum, Arc::new(seller.clone()))
		.unwrap()
		.build()
		.unwrap();
	let buyer_sdk = Sdk::builder(config())
		.with_ethereum(Blockchain::Ethereum, Arc::new(buyer.clone()))
		.unwrap()
		.build()
		.unwrap();

	let minted = seller_sdk
		.prepare_mint(PrepareMintRequest {
			collection_id: CollectionId::new(Blockchain::Ethereum, &contract).unwrap(),
		})
		.await
		.unwrap()
		.submit
		.submit(MintRequest {
			uri: "ipfs://QmItem".to_string(),
			supply: 1,
			lazy_mint: false,
			creators: Vec::new(),
			royalties: Vec::new(),
		})
		.await
		.unwrap();
	minted.transaction().unwrap().wait().await.unwrap();
	let item_id: ItemId = minted.into_value();

	let sell = seller_sdk
		.prepare_sell(PrepareOrderRequest {
			item_id: item_id.clone(),
		})
		.await
		.unwrap();
	let origin = UnionAddress::new(
		Blockchain::Ethereum,
		"0x00000000000000000000000000000000000000f1",
	)
	.unwrap();
	let listed = sell
		.submit
		.submit(OrderRequest {
			amount: 1,
			price: BigNumber::parse("0.0000004").unwrap(),
			currency: AssetType::Native {
				blockchain: Blockchain::Ethereum,
			},
			payouts: None,
			origin_fees: Some(vec![Part::new(origin, 1000)]),
			max_fees_base_point: None,
		})
		.await
		.unwrap();
	assert_eq!(listed.kind(), MutationKind::OffChain);
	let order_id = listed.into_value();
	assert_eq!(order_id.blockchain(), Blockchain::Ethereum);

	let transaction = buyer_sdk
		.prepare_buy(PrepareFillRequest {
			order_id: order_id.clone(),
		})
		.await
		.unwrap()
		.submit
		.submit(FillRequest {
			amount: 1,
			..FillRequest::default()
		})
		.await
		.unwrap();
	assert!(!transaction.is_empty());
	assert!(transaction.tx_link().ends_with(transaction.hash()));
	transaction.wait().await.unwrap();

	let order = buyer_sdk.get_order(&order_id).await.unwrap();
	assert_eq!(order.make_stock, BigNumber::zero());
	assert_eq!(order.status, OrderStatus::Filled);
	assert_eq!(chain.ownership(item_id.native(), buyer.wallet_address()), 1);
}

#[tokio::test]
async fn test_balance_read_is_dispatched() {
	let chain = MemoryEthereumChain::new(Blockchain::Polygon);
	let wallet = chain.wallet();
	chain.set_balance(wallet.wallet_address(), &EthAssetType::Eth, 1_500_000_000_000_000_000);

	let sdk = Sdk::builder(config())
		.with_ethereum(Blockchain::Polygon, Arc::new(wallet.clone()))
		.unwrap()
		.build()
		.unwrap();

	let address = UnionAddress::new(Blockchain::Polygon, wallet.wallet_address()).unwrap();
	let balance = sdk
		.get_balance(
			&address,
			&AssetType::Native {
				blockchain: Blockchain::Polygon,
			},
		)
		.await
		.unwrap();
	assert_eq!(balance, BigNumber::parse("1.5").unwrap());

	let on_ethereum = UnionAddress::new(Blockchain::Ethereum, wallet.wallet_address()).unwrap();
	let result = sdk
		.get_balance(
			&on_ethereum,
			&AssetType::Native {
				blockchain: Blockchain::Ethereum,
			},
		)
		.await;
	assert!(matches!(
		result,
		Err(SdkError::UnsupportedChain {
			blockchain: Blockchain::Ethereum,
			operation: Operation::Balance
		})
	));
}

#[tokio::test]
async fn test_unregistered_operations_are_unsupported() {
	let flow = MemoryFlowChain::new();
	let tezos = MemoryTezosChain::new();
	let wallet = tezos.wallet();
	let sdk = Sdk::builder(config())
		.with_flow(Arc::new(flow.wallet()))
		.with_tezos(Arc::new(wallet.clone()), Arc::new(wallet))
		.build()
		.unwrap();

	let flow_bid = sdk
		.prepare_bid(PrepareOrderRequest {
			item_id: ItemId::parse("FLOW:A.0000000000000001.CommonNFT:1").unwrap(),
		})
		.await;
	assert!(matches!(
		flow_bid,
		Err(SdkError::UnsupportedChain {
			blockchain: Blockchain::Flow,
			operation: Operation::Bid
		})
	));

	let tezos_bid_update = sdk
		.prepare_bid_update(PrepareOrderUpdateRequest {
			order_id: OrderId::parse("TEZOS:abc123").unwrap(),
		})
		.await;
	assert!(matches!(
		tezos_bid_update,
		Err(SdkError::UnsupportedChain {
			blockchain: Blockchain::Tezos,
			operation: Operation::BidUpdate
		})
	));

	let ethereum_mint = sdk
		.prepare_mint(PrepareMintRequest {
			collection_id: CollectionId::parse("ETHEREUM:0x00000000000000000000000000000000000000aa")
				.unwrap(),
		})
		.await;
	assert!(matches!(
		ethereum_mint,
		Err(SdkError::UnsupportedChain {
			blockchain: Blockchain::Ethereum,
			operation: Operation::Mint
		})
	));
	assert_eq!(flow.io().reads(), 0);
	assert_eq!(tezos.io().reads(), 0);
}
