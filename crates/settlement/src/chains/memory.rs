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


//! Building blocks shared by the in-memory chains

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tessera_sdk::{NativeError, NativeReceipt, NativeTransaction, SignatureAlgorithm, public_key};

/// Transaction handle produced by the in-memory chains
///
/// The effects are already applied when the handle is created, so `wait`
/// only reports the receipt.
#[derive(Debug, Clone)]
pub struct MemoryTransaction {
	hash: String,
	receipt: NativeReceipt,
}

impl MemoryTransaction {
	pub fn confirmed(hash: String, block_number: u64, events: Vec<String>) -> Self {
		Self {
			hash,
			receipt: NativeReceipt {
				success: true,
				block_number: Some(block_number),
				events,
			},
		}
	}

	pub fn reverted(hash: String, block_number: u64) -> Self {
		Self {
			hash,
			receipt: NativeReceipt {
				success: false,
				block_number: Some(block_number),
				events: Vec::new(),
			},
		}
	}

	/// Whether the transaction's effects should be applied
	pub fn succeeded(&self) -> bool {
		self.receipt.success
	}
}

#[async_trait]
impl NativeTransaction for MemoryTransaction {
	fn hash(&self) -> &str {
		&self.hash
	}

	async fn wait(&self) -> Result<NativeReceipt, NativeError> {
		Ok(self.receipt.clone())
	}
}

/// Chain I/O accounting
///
/// Every client call counts as a read or a write, which lets tests assert
/// that validation failures never reach the chain.
#[derive(Debug, Default)]
pub struct ChainIo {
	reads: AtomicUsize,
	writes: AtomicUsize,
	reject_writes: AtomicBool,
	revert_transactions: AtomicBool,
	block: AtomicU64,
}

impl ChainIo {
	pub fn read(&self) {
		self.reads.fetch_add(1, Ordering::SeqCst);
	}

	/// Count a write, failing when writes are being rejected
	pub fn write(&self) -> Result<(), NativeError> {
		self.writes.fetch_add(1, Ordering::SeqCst);
		if self.reject_writes.load(Ordering::SeqCst) {
			return Err(NativeError::with_code("REJECTED", "Write rejected by node"));
		}
		Ok(())
	}

	pub fn reads(&self) -> usize {
		self.reads.load(Ordering::SeqCst)
	}

	pub fn writes(&self) -> usize {
		self.writes.load(Ordering::SeqCst)
	}

	pub fn set_reject_writes(&self, reject: bool) {
		self.reject_writes.store(reject, Ordering::SeqCst);
	}

	pub fn set_revert_transactions(&self, revert: bool) {
		self.revert_transactions.store(revert, Ordering::SeqCst);
	}

	/// Seal a new block and return a handle for a transaction in it
	pub fn transaction(&self, hash: String, events: Vec<String>) -> MemoryTransaction {
		let block = self.block.fetch_add(1, Ordering::SeqCst) + 1;
		if self.revert_transactions.load(Ordering::SeqCst) {
			MemoryTransaction::reverted(hash, block)
		} else {
			MemoryTransaction::confirmed(hash, block, events)
		}
	}
}

pub(crate) fn not_found(kind: &str, id: &str) -> NativeError {
	NativeError::with_code("NOT_FOUND", format!("{} {} not found", kind, id))
}

/// Random `0x` transaction hash
pub(crate) fn transaction_hash() -> String {
	let digest = Sha256::digest(uuid::Uuid::new_v4().as_bytes());
	format!("0x{}", hex::encode(digest))
}

/// SHA-256 of a value's JSON encoding, `0x`-prefixed
pub(crate) fn content_hash<T: serde::Serialize>(value: &T) -> Result<String, NativeError> {
	let encoded = serde_json::to_vec(value).map_err(|e| NativeError::new(e.to_string()))?;
	Ok(format!("0x{}", hex::encode(Sha256::digest(&encoded))))
}

/// Random 32-byte key accepted by `algorithm`, with its public key
pub(crate) fn generate_key(algorithm: SignatureAlgorithm) -> ([u8; 32], Vec<u8>) {
	let mut rng = rand::thread_rng();
	loop {
		let mut key = [0u8; 32];
		rng.fill_bytes(&mut key);
		if let Ok(public) = public_key(&key, algorithm) {
			return (key, public);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_rejected_writes_still_count() {
		let io = ChainIo::default();
		io.read();
		assert!(io.write().is_ok());

		io.set_reject_writes(true);
		let err = io.write().unwrap_err();
		assert_eq!(err.code.as_deref(), Some("REJECTED"));
		assert_eq!(io.reads(), 1);
		assert_eq!(io.writes(), 2);
	}

	#[tokio::test]
	async fn test_transactions_land_in_new_blocks() {
		let io = ChainIo::default();
		let first = io.transaction("0x01".to_string(), vec!["Transfer".to_string()]);
		let second = io.transaction("0x02".to_string(), Vec::new());

		assert_eq!(first.wait().await.unwrap().block_number, Some(1));
		assert_eq!(second.wait().await.unwrap().block_number, Some(2));

		io.set_revert_transactions(true);
		let reverted = io.transaction("0x03".to_string(), Vec::new());
		assert!(!reverted.wait().await.unwrap().success);
	}
}
