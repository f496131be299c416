//! Recovering the signer of an encoded transaction.
//!
//! The inverse of the signing pipeline: split the bound `v` back into chain id
//! and recovery id, rebuild the exact 12-slot encoding that was hashed, and
//! recover the public key from `(r, s)`. Nodes do the same before they accept
//! a transaction, so this is also how the crate checks its own output.

use alloy_primitives::{Address, Bytes, U256};

use super::codec::{decode_fields, decode_quantity, encode_fields, encode_quantity};
use super::signing::{digest, split_recovery_value};
use crate::config::{PAYLOAD_FIELD_COUNT, SIGNED_FIELD_COUNT};
use crate::crypto::signatures::Signature;
use crate::error::KeyringError;

/// Who signed a transaction, and for which network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveredSigner {
    pub address: Address,
    pub chain_id: u64,
}

/// Recovers the signer of the signed transaction encoding `raw`.
pub fn recover_signer(raw: &[u8]) -> Result<RecoveredSigner, KeyringError> {
    let fields = decode_fields(raw)?;
    if fields.len() != SIGNED_FIELD_COUNT {
        return Err(KeyringError::Codec(format!(
            "signed transaction has {} fields, expected {}",
            fields.len(),
            SIGNED_FIELD_COUNT
        )));
    }

    let v = decode_quantity(&fields[PAYLOAD_FIELD_COUNT])?;
    let v = u64::try_from(v)
        .map_err(|_| KeyringError::InvalidChainId(format!("recovery value {} is too large", v)))?;
    let (chain_id, recovery_id) = split_recovery_value(v)?;

    let mut signing_fields: Vec<Bytes> = fields[..PAYLOAD_FIELD_COUNT].to_vec();
    signing_fields.push(encode_quantity(U256::from(chain_id)));
    signing_fields.push(Bytes::new());
    signing_fields.push(Bytes::new());
    let digest = digest(&encode_fields(&signing_fields));

    let signature = Signature::from_components(
        recovery_id,
        &fields[PAYLOAD_FIELD_COUNT + 1],
        &fields[PAYLOAD_FIELD_COUNT + 2],
    )?;
    let address = signature.recover_address(&digest)?;

    Ok(RecoveredSigner { address, chain_id })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
