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


use serde::{Deserialize, Serialize};
use tessera_sdk::Environment;
use tessera_settlement::EvmConfig;

// Logging configuration constants
/// Default log level when the SDK logs at `TRACE` (can be overridden by RUST_LOG)
pub const DEFAULT_LOG_LEVEL: &str = "trace";

/// Default log directory component name
pub const LOG_COMPONENT_NAME: &str = "tessera";

/// Default console output enabled (can be overridden by LOG_TO_CONSOLE environment variable)
pub const DEFAULT_LOG_TO_CONSOLE: bool = false;

/// Environment variable prefix for [`SdkConfig::from_env`]
pub const ENV_PREFIX: &str = "TESSERA";

/// How much the SDK logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogsLevel {
	/// Install no subscriber
	#[default]
	Disabled,
	Error,
	Trace,
}

impl LogsLevel {
	/// Filter directive, `None` when logging is off
	pub fn directive(&self) -> Option<&'static str> {
		match self {
			LogsLevel::Disabled => None,
			LogsLevel::Error => Some("error"),
			LogsLevel::Trace => Some(DEFAULT_LOG_LEVEL),
		}
	}
}

/// SDK configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
	pub environment: Environment,
	pub logs: LogsLevel,
	pub ethereum: EvmConfig,
	pub polygon: EvmConfig,
	/// Base URL of the Tezos indexer
	pub tezos_api_url: Option<String>,
}

impl SdkConfig {
	/// Load configuration from environment variables
	///
	/// Nested keys use `__`, e.g. `TESSERA_ETHEREUM__USE_DATA_V3=true`.
	pub fn from_env() -> Result<Self, config::ConfigError> {
		dotenv::dotenv().ok();

		let cfg = config::Config::builder()
			.add_source(environment_source())
			.build()?;

		cfg.try_deserialize()
	}

	/// Load configuration from file, with environment overrides
	pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
		dotenv::dotenv().ok();

		let cfg = config::Config::builder()
			.add_source(config::File::with_name(path))
			.add_source(environment_source())
			.build()?;

		cfg.try_deserialize()
	}
}

fn environment_source() -> config::Environment {
	config::Environment::with_prefix(ENV_PREFIX)
		.prefix_separator("_")
		.separator("__")
		.try_parsing(true)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = SdkConfig::default();
		assert_eq!(config.environment, Environment::Prod);
		assert_eq!(config.logs, LogsLevel::Disabled);
		assert!(!config.ethereum.use_data_v3);
		assert!(config.tezos_api_url.is_none());
	}

	#[test]
	fn test_from_file() {
		let dir = std::env::temp_dir().join(format!("tessera-config-{}", std::process::id()));
		std::fs::create_dir_all(&dir).unwrap();
		let path = dir.join("sdk.json");
		std::fs::write(
			&path,
			r#"{
				"environment": "testnet",
				"logs": "ERROR",
				"polygon": {"use_data_v3": true},
				"tezos_api_url": "https://indexer.example/v0.1"
			}"#,
		)
		.unwrap();

		let config = SdkConfig::from_file(path.to_str().unwrap()).unwrap();
		assert_eq!(config.environment, Environment::Testnet);
		assert_eq!(config.logs.directive(), Some("error"));
		assert!(config.polygon.use_data_v3);
		assert!(!config.ethereum.use_data_v3);
		assert_eq!(
			config.tezos_api_url.as_deref(),
			Some("https://indexer.example/v0.1")
		);
		std::fs::remove_dir_all(&dir).ok();
	}
}
