//! # Hashing Utilities
//!
//! The ledger uses exactly one hash function: the original Keccak-256 (not
//! the NIST-finalized SHA3-256, which pads differently). Transaction digests,
//! message digests and address derivation all go through here.

use alloy_primitives::{Keccak256, B256};

/// Compute the Keccak-256 digest of `data`.
///
/// # Example
///
/// ```
/// use moac_keyring::crypto::keccak256;
///
/// let digest = keccak256(b"");
/// assert_eq!(
///     hex::encode(digest),
///     "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
/// );
/// ```
pub fn keccak256(data: &[u8]) -> B256 {
    alloy_primitives::keccak256(data)
}

/// Keccak-256 over the concatenation of `parts`, without building the
/// concatenated buffer first.
pub fn keccak256_concat(parts: &[&[u8]]) -> B256 {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize()
}
