//! Core type definitions for MOAC transactions.
//!
//! Two shapes of the same transaction live here:
//!
//! - [`TransactionRequest`] is what a wallet host hands us: every field
//!   optional, numbers as JSON integers or hex/decimal strings, addresses in
//!   whatever case the user pasted. It is deserialized straight from the
//!   host's JSON and never mutated by the keyring.
//! - [`UnsignedTransaction`] is the validated, canonical form produced by
//!   [`normalize`](super::normalize::normalize). Every field is typed, every
//!   default filled in, and it maps one-to-one onto the RLP slots.
//!
//! [`SignedTransaction`] is the final artifact: the twelve-field RLP list the
//! network consumes.

use std::fmt;

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use super::codec::{decode_fields, encode_address, encode_quantity};
use crate::crypto::hash::keccak256;
use crate::error::KeyringError;

// ---------------------------------------------------------------------------
// Quantity
// ---------------------------------------------------------------------------

/// A numeric field as supplied by the caller.
///
/// Wallet hosts are inconsistent: the same request may carry `"nonce": 108`,
/// `"nonce": "0x6c"` or `"nonce": "108"`. All three are accepted. Negative
/// values are representable on purpose, so validation can reject them with a
/// precise error instead of a generic parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    /// A JSON integer that fits in `i64`.
    Int(i64),
    /// A JSON integer above `i64::MAX`.
    Uint(u64),
    /// `0x`-prefixed hex (odd length allowed, `0x` alone is zero) or decimal
    /// digits, optionally preceded by `-`.
    Text(String),
}

/// Sign and magnitude of a parsed [`Quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedQuantity {
    /// `true` for strictly negative values (`-0` is not negative).
    pub negative: bool,
    /// Absolute value.
    pub magnitude: U256,
}

impl ParsedQuantity {
    /// Returns `true` if the value is zero.
    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }
}

impl fmt::Display for ParsedQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}

impl Quantity {
    /// Parses the quantity into sign and magnitude.
    ///
    /// `field` is only used to label the error.
    pub fn parse(&self, field: &'static str) -> Result<ParsedQuantity, KeyringError> {
        match self {
            Quantity::Int(v) => Ok(ParsedQuantity {
                negative: *v < 0,
                magnitude: U256::from(v.unsigned_abs()),
            }),
            Quantity::Uint(v) => Ok(ParsedQuantity {
                negative: false,
                magnitude: U256::from(*v),
            }),
            Quantity::Text(text) => parse_text(field, text),
        }
    }
}

fn parse_text(field: &'static str, text: &str) -> Result<ParsedQuantity, KeyringError> {
    let invalid = || KeyringError::InvalidQuantity {
        field,
        value: text.to_string(),
    };

    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let magnitude = if let Some(digits) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X"))
    {
        if digits.is_empty() {
            U256::ZERO
        } else if digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            U256::from_str_radix(digits, 16).map_err(|_| invalid())?
        } else {
            return Err(invalid());
        }
    } else if body.is_empty() {
        if negative {
            return Err(invalid());
        }
        U256::ZERO
    } else if body.bytes().all(|b| b.is_ascii_digit()) {
        U256::from_str_radix(body, 10).map_err(|_| invalid())?
    } else {
        return Err(invalid());
    };

    Ok(ParsedQuantity {
        negative: negative && !magnitude.is_zero(),
        magnitude,
    })
}

impl From<i32> for Quantity {
    fn from(value: i32) -> Self {
        Quantity::Int(i64::from(value))
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Quantity::Int(i64::from(value))
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Quantity::Int(value)
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(v) => Quantity::Int(v),
            Err(_) => Quantity::Uint(value),
        }
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Quantity::Text(value.to_string())
    }
}

impl From<String> for Quantity {
    fn from(value: String) -> Self {
        Quantity::Text(value)
    }
}

// ---------------------------------------------------------------------------
// TransactionRequest
// ---------------------------------------------------------------------------

/// A raw transaction as a wallet host submits it.
///
/// Field names follow the host's JSON (`gasPrice`, `shardingFlag`, ...).
/// `gas` is accepted as an alias of `gasLimit`; `from` is carried along for
/// the host's benefit but signing uses the explicit account argument.
///
/// # Usage
///
/// ```
/// use moac_keyring::transaction::TransactionRequest;
///
/// let request = TransactionRequest::new()
///     .nonce("0x6c")
///     .gas_price("0xbebc200")
///     .gas_limit("0x4c4b40")
///     .to("0xD814F2ac2c4cA49b33066582E4e97EBae02F2aB9")
///     .value("0x115dd030eb169800")
///     .chain_id(101);
/// assert!(request.via.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Sender address as the host knows it. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Account sequence number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Quantity>,
    /// Reserved flag; always encoded as zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_contract: Option<Quantity>,
    /// Price per unit of gas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<Quantity>,
    /// Gas limit. Takes precedence over `gas`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<Quantity>,
    /// Alias of `gas_limit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<Quantity>,
    /// Recipient; empty or absent for contract creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Amount transferred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Quantity>,
    /// Hex call data or contract init code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Target shard; zero for the main chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharding_flag: Option<Quantity>,
    /// Auxiliary recipient for cross-shard calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
    /// Network the transaction is bound to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Quantity>,
}

impl TransactionRequest {
    /// An empty request. Chain id and gas limit must be set before signing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the informational `from` address.
    pub fn sender(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Sets the nonce.
    pub fn nonce(mut self, nonce: impl Into<Quantity>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Sets the reserved system-contract flag (ignored during encoding).
    pub fn system_contract(mut self, flag: impl Into<Quantity>) -> Self {
        self.system_contract = Some(flag.into());
        self
    }

    /// Sets the gas price.
    pub fn gas_price(mut self, gas_price: impl Into<Quantity>) -> Self {
        self.gas_price = Some(gas_price.into());
        self
    }

    /// Sets the gas limit.
    pub fn gas_limit(mut self, gas_limit: impl Into<Quantity>) -> Self {
        self.gas_limit = Some(gas_limit.into());
        self
    }

    /// Sets the `gas` alias.
    pub fn gas(mut self, gas: impl Into<Quantity>) -> Self {
        self.gas = Some(gas.into());
        self
    }

    /// Sets the recipient.
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Sets the transferred value.
    pub fn value(mut self, value: impl Into<Quantity>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the hex payload.
    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Sets the sharding flag.
    pub fn sharding_flag(mut self, flag: impl Into<Quantity>) -> Self {
        self.sharding_flag = Some(flag.into());
        self
    }

    /// Sets the `via` address.
    pub fn via(mut self, via: impl Into<String>) -> Self {
        self.via = Some(via.into());
        self
    }

    /// Sets the chain id.
    pub fn chain_id(mut self, chain_id: impl Into<Quantity>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }
}

// ---------------------------------------------------------------------------
// UnsignedTransaction
// ---------------------------------------------------------------------------

/// A validated transaction in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    /// Account sequence number.
    pub nonce: U256,
    /// Reserved; zero in this protocol version.
    pub system_contract: U256,
    /// Price per unit of gas.
    pub gas_price: U256,
    /// Gas limit.
    pub gas_limit: U256,
    /// Recipient, `None` for contract creation.
    pub to: Option<Address>,
    /// Amount transferred.
    pub value: U256,
    /// Call data, verbatim.
    pub data: Bytes,
    /// Target shard.
    pub sharding_flag: U256,
    /// Auxiliary cross-shard recipient.
    pub via: Option<Address>,
    /// Network id, at least 1.
    pub chain_id: u64,
}

impl UnsignedTransaction {
    /// The nine payload slots, in consensus order.
    pub fn payload_fields(&self) -> Vec<Bytes> {
        vec![
            encode_quantity(self.nonce),
            encode_quantity(self.system_contract),
            encode_quantity(self.gas_price),
            encode_quantity(self.gas_limit),
            encode_address(self.to),
            encode_quantity(self.value),
            self.data.clone(),
            encode_quantity(self.sharding_flag),
            encode_address(self.via),
        ]
    }

    /// The twelve slots hashed for signing: the payload, the chain id in the
    /// `v` slot, and empty `r`/`s` placeholders.
    pub fn signing_fields(&self) -> Vec<Bytes> {
        let mut fields = self.payload_fields();
        fields.push(encode_quantity(U256::from(self.chain_id)));
        fields.push(Bytes::new());
        fields.push(Bytes::new());
        fields
    }
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// The RLP encoding of a signed transaction, ready for `sendRawTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    raw: Bytes,
    hash: B256,
}

impl SignedTransaction {
    /// Wraps an encoding and computes its transaction hash.
    pub fn from_raw(raw: impl Into<Bytes>) -> Self {
        let raw = raw.into();
        let hash = keccak256(&raw);
        Self { raw, hash }
    }

    /// The encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Consumes the wrapper, returning the encoded bytes.
    pub fn into_bytes(self) -> Bytes {
        self.raw
    }

    /// `0x`-prefixed lower-case hex of the encoding.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }

    /// Keccak-256 of the encoding, the id the network reports.
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// Decodes the encoding back into its twelve byte-string fields.
    pub fn fields(&self) -> Result<Vec<Bytes>, KeyringError> {
        decode_fields(&self.raw)
    }
}

impl fmt::Display for SignedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(q: Quantity) -> ParsedQuantity {
        q.parse("nonce").unwrap()
    }

    #[test]
    fn parses_hex_decimal_and_integers() {
        assert_eq!(parse("0x6c".into()).magnitude, U256::from(108));
        assert_eq!(parse("0xbebc200".into()).magnitude, U256::from(200_000_000));
        assert_eq!(parse("108".into()).magnitude, U256::from(108));
        assert_eq!(parse(108.into()).magnitude, U256::from(108));
        assert_eq!(parse(u64::MAX.into()).magnitude, U256::from(u64::MAX));
    }

    #[test]
    fn empty_forms_are_zero() {
        assert!(parse("0x".into()).is_zero());
        assert!(parse("".into()).is_zero());
        assert!(parse("0x00".into()).is_zero());
    }

    #[test]
    fn negative_values_are_flagged() {
        assert!(parse((-1).into()).negative);
        assert!(parse("-0x5".into()).negative);
        assert!(parse("-7".into()).negative);
        assert!(!parse("-0".into()).negative);
    }

    #[test]
    fn garbage_is_rejected_with_field_name() {
        match Quantity::from("0xzz").parse("gasPrice") {
            Err(KeyringError::InvalidQuantity { field, value }) => {
                assert_eq!(field, "gasPrice");
                assert_eq!(value, "0xzz");
            }
            other => panic!("expected InvalidQuantity, got {:?}", other),
        }
        assert!(Quantity::from("12abc").parse("nonce").is_err());
        assert!(Quantity::from("1_000").parse("nonce").is_err());
    }

    #[test]
    fn request_deserializes_host_json() {
        let json = r#"{
            "from": "0x7312F4B8A4457a36827f185325Fd6B66a3f8BB8B",
            "nonce": "0x6c",
            "gasPrice": "0xbebc200",
            "gas": 53001,
            "to": "0xD814F2ac2c4cA49b33066582E4e97EBae02F2aB9",
            "shardingFlag": "0x0",
            "chainId": 101
        }"#;
        let request: TransactionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.nonce, Some(Quantity::Text("0x6c".into())));
        assert_eq!(request.gas, Some(Quantity::Int(53001)));
        assert_eq!(request.chain_id, Some(Quantity::Int(101)));
        assert!(request.gas_limit.is_none());
        assert!(request.via.is_none());
    }

    #[test]
    fn request_serialization_skips_absent_fields() {
        let request = TransactionRequest::new().chain_id(99).gas_limit("0x5208");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"gasLimit": "0x5208", "chainId": 99}));
    }

    #[test]
    fn signing_fields_layout() {
        let tx = UnsignedTransaction {
            nonce: U256::from(1),
            system_contract: U256::ZERO,
            gas_price: U256::from(2),
            gas_limit: U256::from(21_000),
            to: None,
            value: U256::ZERO,
            data: Bytes::new(),
            sharding_flag: U256::ZERO,
            via: None,
            chain_id: 101,
        };
        let fields = tx.signing_fields();
        assert_eq!(fields.len(), 12);
        assert_eq!(fields[..9], tx.payload_fields()[..]);
        assert_eq!(fields[9], Bytes::from(vec![101u8]));
        assert!(fields[10].is_empty() && fields[11].is_empty());
    }

    #[test]
    fn signed_transaction_hex_and_hash() {
        let signed = SignedTransaction::from_raw(vec![0xc0]);
        assert_eq!(signed.to_hex(), "0xc0");
        assert_eq!(signed.to_string(), "0xc0");
        assert_eq!(signed.hash(), keccak256(&[0xc0]));
        assert!(signed.fields().unwrap().is_empty());
    }
}
