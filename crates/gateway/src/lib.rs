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


//! Tessera gateway
//!
//! The entry point callers hold: configuration, logging, and the [`Sdk`]
//! façade that dispatches chain-agnostic requests to the chain builders in
//! `tessera-settlement`.

pub mod config;
pub mod dispatcher;
pub mod logging;
pub mod sdk;

pub use config::{LogsLevel, SdkConfig};
pub use dispatcher::{ChainBuilders, Dispatcher};
pub use sdk::{Sdk, SdkBuilder};
