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


//! Settlement core
//!
//! Chain translators and prepare/submit builders for every supported chain.
//! Each builder talks to its chain through a client trait; the in-memory
//! chains under `chains::*::memory` implement those traits for tests and
//! local development.

pub mod chains;

pub use chains::ethereum::{EthereumClient, EthereumContext, EvmConfig};
pub use chains::flow::{FlowClient, FlowContext};
pub use chains::tezos::{TezosApi, TezosContext, TezosProvider};
