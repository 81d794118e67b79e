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

//! Tessera SDK - canonical schema and action primitives
//!
//! This crate provides the chain-agnostic data model shared by every chain
//! backend, composite identifiers, the two-phase prepare/submit action, the
//! transaction wrapper and the builder capability traits.
//!
//! The SDK is designed to be lightweight and embeddable:
//! - No background threads
//! - No runtime initialization
//! - No environment or configuration loading

pub mod action;
pub mod builder;
pub mod error;
pub mod id;
pub mod order;
pub mod request;
pub mod signing;
pub mod transaction;
pub mod types;

pub use action::Action;
pub use builder::*;
pub use error::{NativeError, SdkError};
pub use id::{Blockchain, CollectionId, ContractAddress, ItemId, OrderId, UnionAddress};
pub use order::*;
pub use request::*;
pub use signing::{SignatureAlgorithm, SigningError, public_key, sign_payload, verify_payload};
pub use transaction::{
	BlockchainTransaction, Environment, NativeReceipt, NativeTransaction, TransactionResult,
};
pub use types::*;
