//! # Message Digests
//!
//! Digests for the three non-transaction signing flavors a wallet host asks
//! for:
//!
//! - **raw**: the caller already hashed; the 32 bytes are signed as-is.
//! - **personal**: `keccak256("\x19Ethereum Signed Message:\n" || len || msg)`,
//!   so a signed message can never double as a signed transaction.
//! - **typed (v1)**: the legacy array-of-fields format: a hash of the
//!   schema (`"type name"` strings) and a hash of the tightly packed values,
//!   hashed together.

use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

use super::hash::{keccak256, keccak256_concat};
use super::keys::{decode_hex_padded, parse_address};
use crate::config::{DIGEST_LENGTH, PERSONAL_MESSAGE_PREFIX};
use crate::error::KeyringError;
use crate::transaction::types::Quantity;

/// Checks that a raw message is exactly one digest long.
pub fn raw_message_digest(message: &[u8]) -> Result<B256, KeyringError> {
    if message.len() != DIGEST_LENGTH {
        return Err(KeyringError::InvalidMessage(format!(
            "expected a {}-byte digest, got {} bytes",
            DIGEST_LENGTH,
            message.len()
        )));
    }
    Ok(B256::from_slice(message))
}

/// Digest of a personal message.
pub fn personal_message_digest(message: &[u8]) -> B256 {
    let length = message.len().to_string();
    keccak256_concat(&[PERSONAL_MESSAGE_PREFIX.as_bytes(), length.as_bytes(), message])
}

// ---------------------------------------------------------------------------
// Typed data (v1)
// ---------------------------------------------------------------------------

/// One entry of a legacy typed-data array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedDataField {
    /// Solidity type name (`string`, `uint256`, `address`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Field name; only contributes to the schema hash.
    pub name: String,
    /// JSON value, interpreted according to `kind`.
    pub value: serde_json::Value,
}

impl TypedDataField {
    /// Convenience constructor.
    pub fn new(kind: &str, name: &str, value: serde_json::Value) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
            value,
        }
    }
}

/// Digest of a legacy typed-data array.
pub fn typed_data_digest(fields: &[TypedDataField]) -> Result<B256, KeyringError> {
    if fields.is_empty() {
        return Err(KeyringError::TypedData(
            "typed data must contain at least one field".to_string(),
        ));
    }

    let mut schema = Vec::new();
    let mut values = Vec::new();
    for field in fields {
        schema.extend_from_slice(field.kind.as_bytes());
        schema.push(b' ');
        schema.extend_from_slice(field.name.as_bytes());
        values.extend(pack_value(&field.kind, &field.value)?);
    }

    let schema_hash = keccak256(&schema);
    let values_hash = keccak256(&values);
    Ok(keccak256_concat(&[schema_hash.as_slice(), values_hash.as_slice()]))
}

/// Tightly packs one value the way `abi.encodePacked` would.
fn pack_value(kind: &str, value: &serde_json::Value) -> Result<Vec<u8>, KeyringError> {
    match kind {
        "string" => value
            .as_str()
            .map(|s| s.as_bytes().to_vec())
            .ok_or_else(|| type_mismatch(kind, value)),
        "bytes" => bytes_value(kind, value),
        "bool" => value
            .as_bool()
            .map(|b| vec![u8::from(b)])
            .ok_or_else(|| type_mismatch(kind, value)),
        "address" => {
            let text = value.as_str().ok_or_else(|| type_mismatch(kind, value))?;
            Ok(parse_address(text)
                .map_err(|e| KeyringError::TypedData(e.to_string()))?
                .to_vec())
        }
        _ if kind.starts_with("bytes") => {
            let size: usize = kind[5..]
                .parse()
                .ok()
                .filter(|n| (1..=32).contains(n))
                .ok_or_else(|| unsupported(kind))?;
            let mut bytes = bytes_value(kind, value)?;
            if bytes.len() > size {
                return Err(KeyringError::TypedData(format!(
                    "{} value is {} bytes long",
                    kind,
                    bytes.len()
                )));
            }
            bytes.resize(size, 0);
            Ok(bytes)
        }
        _ if kind.starts_with("uint") => {
            let bits = integer_bits(kind, &kind[4..])?;
            let (negative, magnitude) = integer_value(kind, value)?;
            if negative || magnitude.bit_len() > bits {
                return Err(out_of_range(kind, value));
            }
            Ok(low_bytes(magnitude, bits))
        }
        _ if kind.starts_with("int") => {
            let bits = integer_bits(kind, &kind[3..])?;
            let (negative, magnitude) = integer_value(kind, value)?;
            let limit = U256::from(1u8) << (bits - 1);
            let fits = if negative {
                magnitude <= limit
            } else {
                magnitude < limit
            };
            if !fits {
                return Err(out_of_range(kind, value));
            }
            let twos = if negative {
                U256::ZERO.wrapping_sub(magnitude)
            } else {
                magnitude
            };
            Ok(low_bytes(twos, bits))
        }
        _ => Err(unsupported(kind)),
    }
}

fn bytes_value(kind: &str, value: &serde_json::Value) -> Result<Vec<u8>, KeyringError> {
    let text = value.as_str().ok_or_else(|| type_mismatch(kind, value))?;
    if text.starts_with("0x") || text.starts_with("0X") {
        decode_hex_padded(text).map_err(|e| KeyringError::TypedData(e.to_string()))
    } else {
        Ok(text.as_bytes().to_vec())
    }
}

fn integer_bits(kind: &str, suffix: &str) -> Result<usize, KeyringError> {
    if suffix.is_empty() {
        return Ok(256);
    }
    suffix
        .parse::<usize>()
        .ok()
        .filter(|bits| *bits >= 8 && *bits <= 256 && bits % 8 == 0)
        .ok_or_else(|| unsupported(kind))
}

fn integer_value(kind: &str, value: &serde_json::Value) -> Result<(bool, U256), KeyringError> {
    let quantity: Quantity =
        serde_json::from_value(value.clone()).map_err(|_| type_mismatch(kind, value))?;
    let parsed = quantity
        .parse("value")
        .map_err(|_| type_mismatch(kind, value))?;
    Ok((parsed.negative, parsed.magnitude))
}

fn low_bytes(value: U256, bits: usize) -> Vec<u8> {
    let full = value.to_be_bytes::<32>();
    full[32 - bits / 8..].to_vec()
}

fn type_mismatch(kind: &str, value: &serde_json::Value) -> KeyringError {
    KeyringError::TypedData(format!("value {} does not match type {}", value, kind))
}

fn out_of_range(kind: &str, value: &serde_json::Value) -> KeyringError {
    KeyringError::TypedData(format!("value {} is out of range for {}", value, kind))
}

fn unsupported(kind: &str) -> KeyringError {
    KeyringError::TypedData(format!("unsupported type {}", kind))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
