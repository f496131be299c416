//! # Recoverable Signatures
//!
//! A secp256k1 ECDSA signature together with the recovery id that lets a
//! verifier rebuild the signer's public key from `(digest, signature)` alone.
//! That is how the ledger identifies senders: transactions carry no public
//! key, only `v`, `r` and `s`.

use alloy_primitives::{Address, B256};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};

use super::keys::address_from_verifying_key;
use crate::config::{LEGACY_RECOVERY_BASE, RPC_SIGNATURE_LENGTH};
use crate::error::KeyringError;

/// `(recovery_id, r, s)` with `r` and `s` as 32-byte big-endian integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    recovery_id: u8,
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    /// Builds a signature, rejecting recovery ids other than 0 and 1.
    ///
    /// Ids 2 and 3 (x-coordinate overflow) are astronomically unlikely and
    /// are not representable in the ledger's `v` encoding.
    pub fn new(recovery_id: u8, r: [u8; 32], s: [u8; 32]) -> Result<Self, KeyringError> {
        if recovery_id > 1 {
            return Err(KeyringError::SigningFailure(format!(
                "unsupported recovery id {}",
                recovery_id
            )));
        }
        Ok(Self { recovery_id, r, s })
    }

    /// Builds a signature from `r` and `s` given as big-endian byte strings
    /// of at most 32 bytes (leading zeros may have been stripped).
    pub fn from_components(recovery_id: u8, r: &[u8], s: &[u8]) -> Result<Self, KeyringError> {
        Self::new(recovery_id, left_pad_32(r)?, left_pad_32(s)?)
    }

    /// Recovery id, 0 or 1.
    pub fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// The `r` scalar.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// The `s` scalar.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// The legacy recovery value, `27 + recovery_id`.
    pub fn v(&self) -> u64 {
        LEGACY_RECOVERY_BASE + u64::from(self.recovery_id)
    }

    /// `r || s || v` in the 65-byte layout RPC callers expect.
    pub fn to_rpc_bytes(&self) -> [u8; RPC_SIGNATURE_LENGTH] {
        let mut out = [0u8; RPC_SIGNATURE_LENGTH];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v() as u8;
        out
    }

    /// `0x`-prefixed hex of [`to_rpc_bytes`](Self::to_rpc_bytes).
    pub fn to_rpc_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_rpc_bytes()))
    }

    /// Parses the 65-byte `r || s || v` form (`v` as 27/28 or 0/1).
    pub fn from_rpc_bytes(bytes: &[u8]) -> Result<Self, KeyringError> {
        if bytes.len() != RPC_SIGNATURE_LENGTH {
            return Err(KeyringError::InvalidMessage(format!(
                "signature must be {} bytes, got {}",
                RPC_SIGNATURE_LENGTH,
                bytes.len()
            )));
        }
        let v = bytes[64];
        let recovery_id = if u64::from(v) >= LEGACY_RECOVERY_BASE {
            v - LEGACY_RECOVERY_BASE as u8
        } else {
            v
        };
        Self::from_components(recovery_id, &bytes[..32], &bytes[32..64])
    }

    /// Recovers the address that produced this signature over `digest`.
    pub fn recover_address(&self, digest: &B256) -> Result<Address, KeyringError> {
        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(&self.r);
        compact[32..].copy_from_slice(&self.s);

        let signature = EcdsaSignature::from_slice(&compact)
            .map_err(|e| KeyringError::SigningFailure(e.to_string()))?;
        let recovery_id = RecoveryId::from_byte(self.recovery_id)
            .ok_or_else(|| KeyringError::SigningFailure("invalid recovery id".to_string()))?;
        let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id)
            .map_err(|e| KeyringError::SigningFailure(e.to_string()))?;

        Ok(address_from_verifying_key(&key))
    }
}

fn left_pad_32(bytes: &[u8]) -> Result<[u8; 32], KeyringError> {
    if bytes.len() > 32 {
        return Err(KeyringError::Codec(format!(
            "signature scalar is {} bytes, at most 32 allowed",
            bytes.len()
        )));
    }
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
