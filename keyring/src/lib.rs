// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # MOAC Keyring: Core Library
//!
//! An in-memory keyring of secp256k1 private keys for the MOAC ledger. It
//! derives account addresses, signs arbitrary digests and personal/typed
//! messages, and, most importantly, turns a loosely-typed transaction request
//! into the exact RLP byte string the network will accept.
//!
//! MOAC transactions carry nine pre-signature fields instead of Ethereum's
//! six: a system-contract flag after the nonce, and a sharding flag plus a
//! `via` address after the payload. Get one byte of that layout wrong and the
//! node rejects the transaction, so the encoding path is small, explicit, and
//! pinned by a golden test.
//!
//! ## Architecture
//!
//! - **crypto**: Keccak-256, secp256k1 keys, signatures, message digests.
//! - **transaction**: Field normalization, RLP codec, signer, and the
//!   signing pipeline that ties them together.
//! - **vault**: The [`Keyring`](vault::Keyring) itself: the account set and
//!   the public signing surface.
//! - **config**: Protocol constants.
//! - **error**: The single error type every operation returns.

pub mod config;
pub mod crypto;
pub mod error;
pub mod transaction;
pub mod vault;

pub use error::KeyringError;
pub use transaction::{SignedTransaction, TransactionRequest, UnsignedTransaction};
pub use vault::Keyring;
