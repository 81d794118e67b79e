// Copyright 2025 chenjjiaa
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

//! Payload signing for off-chain orders and lazy mints
//!
//! Payloads are signed over their canonical JSON encoding. Ed25519 signs the
//! SHA-256 digest of the encoding; ECDSA (secp256k1) hashes with SHA-256
//! internally.

use ed25519_dalek::{Signer as _, Verifier as _};
use k256::ecdsa::signature::{Signer as _, Verifier as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::Binary;

/// Signature algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
	Ed25519,
	Ecdsa,
}

/// Error types for signing operations
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
	#[error("Serialization error: {0}")]
	Serialization(String),
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	#[error("Invalid signature: {0}")]
	InvalidSignature(String),
}

fn encode_payload<T: Serialize>(payload: &T) -> Result<Vec<u8>, SigningError> {
	serde_json::to_vec(payload).map_err(|e| SigningError::Serialization(e.to_string()))
}

fn ed25519_key(private_key: &[u8]) -> Result<ed25519_dalek::SigningKey, SigningError> {
	let bytes: [u8; 32] = private_key
		.try_into()
		.map_err(|_| SigningError::InvalidKey("Ed25519 key must be 32 bytes".to_string()))?;
	Ok(ed25519_dalek::SigningKey::from_bytes(&bytes))
}

fn ecdsa_key(private_key: &[u8]) -> Result<k256::ecdsa::SigningKey, SigningError> {
	k256::ecdsa::SigningKey::from_slice(private_key)
		.map_err(|e| SigningError::InvalidKey(e.to_string()))
}

/// Derive the public key for a private key
///
/// Ed25519 keys are 32 raw bytes; ECDSA keys are SEC1 compressed points.
pub fn public_key(private_key: &[u8], algorithm: SignatureAlgorithm) -> Result<Vec<u8>, SigningError> {
	match algorithm {
		SignatureAlgorithm::Ed25519 => Ok(ed25519_key(private_key)?
			.verifying_key()
			.to_bytes()
			.to_vec()),
		SignatureAlgorithm::Ecdsa => Ok(ecdsa_key(private_key)?
			.verifying_key()
			.to_encoded_point(true)
			.as_bytes()
			.to_vec()),
	}
}

/// Sign a payload
pub fn sign_payload<T: Serialize>(
	payload: &T,
	private_key: &[u8],
	algorithm: SignatureAlgorithm,
) -> Result<Binary, SigningError> {
	let message = encode_payload(payload)?;

	match algorithm {
		SignatureAlgorithm::Ed25519 => {
			let digest = Sha256::digest(&message);
			let signature = ed25519_key(private_key)?.sign(&digest);
			Ok(Binary::from_bytes(&signature.to_bytes()))
		}
		SignatureAlgorithm::Ecdsa => {
			let signature: k256::ecdsa::Signature = ecdsa_key(private_key)?.sign(&message);
			Ok(Binary::from_bytes(&signature.to_bytes()))
		}
	}
}

/// Verify a payload signature
pub fn verify_payload<T: Serialize>(
	payload: &T,
	signature: &Binary,
	public_key: &[u8],
	algorithm: SignatureAlgorithm,
) -> Result<bool, SigningError> {
	let message = encode_payload(payload)?;
	let signature = signature.to_bytes();

	match algorithm {
		SignatureAlgorithm::Ed25519 => {
			let key: [u8; 32] = public_key.try_into().map_err(|_| {
				SigningError::InvalidKey("Ed25519 public key must be 32 bytes".to_string())
			})?;
			let verifying_key = ed25519_dalek::VerifyingKey::from_bytes(&key)
				.map_err(|e| SigningError::InvalidKey(e.to_string()))?;
			let signature = ed25519_dalek::Signature::from_slice(&signature)
				.map_err(|e| SigningError::InvalidSignature(e.to_string()))?;
			let digest = Sha256::digest(&message);
			Ok(verifying_key.verify(&digest, &signature).is_ok())
		}
		SignatureAlgorithm::Ecdsa => {
			let verifying_key = k256::ecdsa::VerifyingKey::from_sec1_bytes(public_key)
				.map_err(|e| SigningError::InvalidKey(e.to_string()))?;
			let signature = k256::ecdsa::Signature::from_slice(&signature)
				.map_err(|e| SigningError::InvalidSignature(e.to_string()))?;
			Ok(verifying_key.verify(&message, &signature).is_ok())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::RngCore;

	#[derive(Serialize)]
	struct Payload {
		maker: &'static str,
		price: &'static str,
	}

	fn random_key() -> [u8; 32] {
		let mut key = [0u8; 32];
		rand::thread_rng().fill_bytes(&mut key);
		key
	}

	#[test]
	fn test_sign_and_verify() {
		let payload = Payload {
			maker: "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb",
			price: "1.5",
		};
		let tampered = Payload {
			maker: "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb",
			price: "0.1",
		};

		for algorithm in [SignatureAlgorithm::Ed25519, SignatureAlgorithm::Ecdsa] {
			let key = random_key();
			let public = public_key(&key, algorithm).unwrap();
			let signature = sign_payload(&payload, &key, algorithm).unwrap();

			assert!(verify_payload(&payload, &signature, &public, algorithm).unwrap());
			assert!(!verify_payload(&tampered, &signature, &public, algorithm).unwrap());
		}
	}

	#[test]
	fn test_invalid_key_length() {
		let payload = Payload {
			maker: "x",
			price: "1",
		};
		assert!(matches!(
			sign_payload(&payload, &[1, 2, 3], SignatureAlgorithm::Ed25519),
			Err(SigningError::InvalidKey(_))
		));
	}
}
