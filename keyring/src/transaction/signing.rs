//! Digesting, signing, and chain-binding of the recovery value.
//!
//! The ledger folds the chain id into `v` so a signature made for one network
//! is worthless on another:
//!
//! ```text
//! v = (27 + recovery_id) + 8 + 2 * chain_id
//! ```
//!
//! `27 + recovery_id` is the legacy recovery value every secp256k1 signer
//! reports; the constant `8` is the ledger's offset on top of it. The sum
//! lands on the same `35 + recovery_id + 2 * chain_id` that replay-protected
//! Ethereum transactions use, which is what MOAC nodes verify.

use alloy_primitives::{Bytes, B256, U256};

use super::codec::encode_quantity;
use crate::config::{CHAIN_ID_RECOVERY_OFFSET, LEGACY_RECOVERY_BASE};
use crate::crypto::hash::keccak256;
use crate::crypto::keys::KeyProvider;
use crate::crypto::signatures::Signature;
use crate::error::KeyringError;

/// Digest signed for a transaction: Keccak-256 of its 12-slot encoding.
pub fn digest(encoded: &[u8]) -> B256 {
    keccak256(encoded)
}

/// Signs `digest` with `key` through `provider`.
///
/// Whatever the backend reports is surfaced as [`KeyringError::SigningFailure`].
pub fn sign<P: KeyProvider>(
    provider: &P,
    key: &P::Key,
    digest: &B256,
) -> Result<Signature, KeyringError> {
    provider.sign_digest(digest, key).map_err(|err| match err {
        KeyringError::SigningFailure(_) => err,
        other => KeyringError::SigningFailure(other.to_string()),
    })
}

/// `v` with the chain id folded in.
pub fn bound_recovery_value(signature: &Signature, chain_id: u64) -> Result<u64, KeyringError> {
    chain_id
        .checked_mul(2)
        .and_then(|doubled| doubled.checked_add(signature.v() + CHAIN_ID_RECOVERY_OFFSET))
        .ok_or_else(|| {
            KeyringError::InvalidChainId(format!(
                "chain id {} overflows the recovery value",
                chain_id
            ))
        })
}

/// Splits a bound `v` back into `(chain_id, recovery_id)`.
pub fn split_recovery_value(v: u64) -> Result<(u64, u8), KeyringError> {
    let base = LEGACY_RECOVERY_BASE + CHAIN_ID_RECOVERY_OFFSET;
    // Chain id 0 is never valid, so the smallest bound value is base + 2.
    if v < base + 2 {
        return Err(KeyringError::InvalidChainId(format!(
            "recovery value {} carries no chain id",
            v
        )));
    }
    let offset = v - base;
    Ok((offset / 2, (offset % 2) as u8))
}

/// The three trailing slots of a signed transaction: `[v, r, s]`, each as a
/// minimal big-endian integer.
pub fn signature_fields(signature: &Signature, chain_id: u64) -> Result<[Bytes; 3], KeyringError> {
    let v = bound_recovery_value(signature, chain_id)?;
    Ok([
        encode_quantity(U256::from(v)),
        encode_quantity(U256::from_be_bytes(*signature.r())),
        encode_quantity(U256::from_be_bytes(*signature.s())),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
