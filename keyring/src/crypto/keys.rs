//! # Key Management
//!
//! secp256k1 key handles, address derivation, and the [`KeyProvider`] seam
//! the rest of the crate signs through.
//!
//! The keyring never touches curve arithmetic directly. It asks a provider
//! to generate or import a key, derive its address, sign a 32-byte digest,
//! or export the raw scalar. [`Secp256k1Provider`] is the production
//! implementation; tests plug in providers that fail on purpose.
//!
//! ## Security considerations
//!
//! - Keys are generated from `OsRng`.
//! - `k256::ecdsa::SigningKey` zeroizes its scalar on drop.
//! - Key bytes are never logged and never appear in `Debug` output.

use std::fmt;

use alloy_primitives::{Address, B256};
use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;

use super::hash::keccak256;
use super::signatures::Signature;
use crate::config::{ADDRESS_LENGTH, SECRET_KEY_LENGTH};
use crate::error::KeyringError;

// ---------------------------------------------------------------------------
// KeyProvider
// ---------------------------------------------------------------------------

/// The capability set the keyring needs from a key backend.
///
/// Implementations must be deterministic in `derive_address` and must not
/// mutate the key in `sign_digest`; the keyring signs concurrently through
/// shared references.
pub trait KeyProvider: Send + Sync + 'static {
    /// Opaque key handle.
    type Key: Clone + Send + Sync + 'static;

    /// Creates a fresh random key.
    fn generate(&self) -> Self::Key;

    /// Rebuilds a key from its raw secret bytes.
    fn import(&self, raw: &[u8]) -> Result<Self::Key, KeyringError>;

    /// Derives the 20-byte account address for `key`.
    fn derive_address(&self, key: &Self::Key) -> Address;

    /// Signs a 32-byte digest, returning `(recovery_id, r, s)`.
    fn sign_digest(&self, digest: &B256, key: &Self::Key) -> Result<Signature, KeyringError>;

    /// Exports the raw secret bytes of `key`.
    fn export_raw(&self, key: &Self::Key) -> Vec<u8>;
}

/// secp256k1 provider backed by `k256`.
///
/// Signing uses RFC 6979 deterministic nonces and normalizes `s` to the lower
/// half of the curve order, so signing the same digest twice yields the same
/// bytes and every signature is accepted by the network's malleability check.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Provider;

impl KeyProvider for Secp256k1Provider {
    type Key = SigningKey;

    fn generate(&self) -> SigningKey {
        SigningKey::random(&mut OsRng)
    }

    fn import(&self, raw: &[u8]) -> Result<SigningKey, KeyringError> {
        if raw.len() != SECRET_KEY_LENGTH {
            return Err(KeyringError::InvalidSecretKey);
        }
        SigningKey::from_slice(raw).map_err(|_| KeyringError::InvalidSecretKey)
    }

    fn derive_address(&self, key: &SigningKey) -> Address {
        address_from_verifying_key(key.verifying_key())
    }

    fn sign_digest(&self, digest: &B256, key: &SigningKey) -> Result<Signature, KeyringError> {
        let (signature, recovery_id) = key
            .sign_prehash_recoverable(digest.as_slice())
            .map_err(|e| KeyringError::SigningFailure(e.to_string()))?;

        let bytes = signature.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        Signature::new(recovery_id.to_byte(), r, s)
    }

    fn export_raw(&self, key: &SigningKey) -> Vec<u8> {
        key.to_bytes().to_vec()
    }
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Derives the account address of a public key: the last 20 bytes of
/// `keccak256(X || Y)` over the uncompressed point without its `0x04` tag.
pub fn address_from_verifying_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&digest[32 - ADDRESS_LENGTH..])
}

/// Parses a `0x`-prefixed (or bare) hex address, ignoring case.
///
/// Checksums are not enforced: the wallet host hands us addresses in
/// whatever case the user typed them.
pub fn parse_address(input: &str) -> Result<Address, KeyringError> {
    let trimmed = input.trim();
    let digits = strip_hex_prefix(trimmed);
    let bytes = hex::decode(digits).map_err(|_| KeyringError::InvalidAddress(input.to_string()))?;
    if bytes.len() != ADDRESS_LENGTH {
        return Err(KeyringError::InvalidAddress(input.to_string()));
    }
    Ok(Address::from_slice(&bytes))
}

/// Renders an address the way the keyring reports it: lower-case hex with a
/// `0x` prefix, no checksum.
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Parses a hex secret key with or without a `0x` prefix.
pub fn decode_secret_key(input: &str) -> Result<Vec<u8>, KeyringError> {
    let bytes =
        hex::decode(strip_hex_prefix(input.trim())).map_err(|_| KeyringError::InvalidSecretKey)?;
    if bytes.len() != SECRET_KEY_LENGTH {
        return Err(KeyringError::InvalidSecretKey);
    }
    Ok(bytes)
}

pub(crate) fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

/// Decodes hex with an optional prefix, left-padding odd-length input with a
/// zero nibble (`0x0` is the single byte `0x00`, `0x` is empty).
pub(crate) fn decode_hex_padded(input: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits = strip_hex_prefix(input.trim());
    if digits.len() % 2 == 1 {
        hex::decode(format!("0{}", digits))
    } else {
        hex::decode(digits)
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// A key handle paired with its derived address.
///
/// Immutable once created: signing only ever borrows the key.
#[derive(Clone)]
pub struct Account<K> {
    key: K,
    address: Address,
}

impl<K> Account<K> {
    /// Pairs a key with the address its provider derived for it.
    pub fn new(key: K, address: Address) -> Self {
        Self { key, address }
    }

    /// Derives the address through `provider` and wraps the key.
    pub fn from_key<P: KeyProvider<Key = K>>(provider: &P, key: K) -> Self {
        let address = provider.derive_address(&key);
        Self { key, address }
    }

    /// The key handle.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The derived address.
    pub fn address(&self) -> Address {
        self.address
    }
}

impl<K> fmt::Debug for Account<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Address only. Key material stays out of logs and panics.
        write!(f, "Account({})", format_address(&self.address))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
