//! # Cryptographic Primitives
//!
//! Everything the keyring needs from the cryptography side of the house:
//!
//! - **Keccak-256** for transaction digests, message digests and addresses.
//! - **secp256k1 ECDSA** (RFC 6979 deterministic nonces, low-s) for signing.
//! - **Public-key recovery** so signatures can be checked against addresses.
//!
//! The curve arithmetic is `k256`; the hash is `alloy-primitives`' Keccak.
//! This module only wraps them in the shapes the ledger expects.

pub mod hash;
pub mod keys;
pub mod messages;
pub mod signatures;

pub use hash::keccak256;
pub use keys::{format_address, parse_address, Account, KeyProvider, Secp256k1Provider};
pub use messages::{personal_message_digest, typed_data_digest, TypedDataField};
pub use signatures::Signature;
