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


//! Logging initialization for the SDK
//!
//! # Configuration
//!
//! - [`LogsLevel`](crate::config::LogsLevel) from the SDK config picks the
//!   default filter; `DISABLED` installs nothing.
//! - `RUST_LOG` overrides the filter, e.g.
//!   `RUST_LOG=settlement::ethereum=debug,gateway::dispatcher=info`.
//! - `LOG_DIR`: root directory for log files (default: `{project_root}/logs`).
//!   Files go to `{LOG_DIR}/tessera/`.
//! - `LOG_TO_CONSOLE`: also log to stderr (`true`, `1` or `yes`).
//!
//! # Log File Format
//!
//! - Rotation: one file per day (UTC), `tessera.{date}.log`
//! - Format: UTC timestamp, thread ID, log level, target, message
//! - ANSI colors: disabled in files, enabled on the console

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use tracing::info;
use tracing_appender::{
	non_blocking,
	rolling::{self, Rotation},
};
use tracing_subscriber::{
	EnvFilter, fmt, layer::SubscriberExt, registry::Registry, util::SubscriberInitExt,
};

use crate::config::{DEFAULT_LOG_TO_CONSOLE, LOG_COMPONENT_NAME, LogsLevel};

// Keeps the file writer flushing until exit
static LOG_GUARD: OnceLock<non_blocking::WorkerGuard> = OnceLock::new();

/// Find the workspace root by walking up from the crate or current directory
fn find_project_root() -> std::path::PathBuf {
	let start = env::var("CARGO_MANIFEST_DIR")
		.map(std::path::PathBuf::from)
		.or_else(|_| env::current_dir())
		.unwrap_or_else(|_| Path::new(".").to_path_buf());

	let mut current = start.clone();
	loop {
		if let Ok(content) = std::fs::read_to_string(current.join("Cargo.toml"))
			&& content.contains("[workspace]")
		{
			return current;
		}
		match current.parent() {
			Some(parent) => current = parent.to_path_buf(),
			None => return start,
		}
	}
}

fn get_log_root() -> String {
	env::var("LOG_DIR").unwrap_or_else(|_| {
		find_project_root()
			.join("logs")
			.to_string_lossy()
			.to_string()
	})
}

/// Daily rolling file writer, `{prefix}.{date}.log`
fn setup_file_logging(log_dir: &Path) -> Result<non_blocking::NonBlocking> {
	let file_appender = rolling::RollingFileAppender::builder()
		.rotation(Rotation::DAILY)
		.filename_prefix(LOG_COMPONENT_NAME.to_string())
		.filename_suffix(".log")
		.build(log_dir)
		.with_context(|| {
			format!(
				"Failed to create rolling file appender in {}",
				log_dir.display()
			)
		})?;

	let (file_writer, guard) = non_blocking(file_appender);
	LOG_GUARD.set(guard).ok();

	Ok(file_writer)
}

/// Install the global subscriber
///
/// Returns `Ok(false)` when `logs` is `DISABLED` or a subscriber was already
/// installed by an earlier call.
pub fn init_logging(logs: LogsLevel) -> Result<bool> {
	let Some(default_level) = logs.directive() else {
		return Ok(false);
	};
	if LOG_GUARD.get().is_some() {
		return Ok(false);
	}
	dotenv::dotenv().ok();

	let log_dir = Path::new(&get_log_root()).join(LOG_COMPONENT_NAME);
	std::fs::create_dir_all(&log_dir)
		.with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
	let file_writer = setup_file_logging(&log_dir)?;

	let log_to_console = env::var("LOG_TO_CONSOLE")
		.map(|v| v == "true" || v == "1" || v == "yes")
		.unwrap_or(DEFAULT_LOG_TO_CONSOLE);

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	let subscriber = Registry::default().with(filter).with(
		fmt::layer()
			.with_writer(file_writer)
			.with_timer(fmt::time::UtcTime::rfc_3339())
			.with_thread_ids(true)
			.with_target(true)
			.with_thread_names(false)
			.with_ansi(false),
	);

	let installed = if log_to_console {
		subscriber
			.with(
				fmt::layer()
					.with_writer(std::io::stderr)
					.with_timer(fmt::time::UtcTime::rfc_3339())
					.with_thread_ids(true)
					.with_target(true)
					.with_thread_names(false)
					.with_ansi(true),
			)
			.try_init()
	} else {
		subscriber.try_init()
	};
	// Another subscriber owns the process, e.g. the host application's
	if installed.is_err() {
		return Ok(false);
	}

	info!(target: "gateway::logging", "Log level: {:?}", logs);
	info!(target: "gateway::logging", "Log directory: {}", log_dir.display());
	if log_to_console {
		info!(target: "gateway::logging", "Console output: enabled");
	}

	Ok(true)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_disabled_installs_nothing() {
		assert!(!init_logging(LogsLevel::Disabled).unwrap());
	}

	#[test]
	fn test_project_root_is_workspace() {
		let root = find_project_root();
		let manifest = std::fs::read_to_string(root.join("Cargo.toml")).unwrap();
		assert!(manifest.contains("[workspace]"));
	}
}
