//! Error types for the keyring.
//!
//! Every fallible operation, from field validation to the final RLP encode,
//! returns a [`KeyringError`]. Nothing inside the signing pipeline panics or
//! throws past its boundary, and a failed call never leaves the key set
//! half-modified.

use thiserror::Error;

/// Errors that can occur while managing keys or signing.
///
/// Messages never include key material. Addresses are fine; secrets are not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyringError {
    /// `chainId` is missing, zero, negative, or too large to fold into `v`.
    #[error("chain id is invalid: {0}")]
    InvalidChainId(String),

    /// Neither `gasLimit` nor its `gas` alias is present.
    #[error("gas limit is missing")]
    MissingGasLimit,

    /// A numeric transaction field was negative.
    #[error("numeric field `{field}` must not be negative")]
    NegativeNumericField {
        /// Name of the offending field as the caller spelled it.
        field: &'static str,
    },

    /// A numeric transaction field could not be parsed.
    #[error("numeric field `{field}` has an unparseable value `{value}`")]
    InvalidQuantity {
        /// Name of the offending field.
        field: &'static str,
        /// The raw value supplied.
        value: String,
    },

    /// An address was not 20 bytes of hex.
    #[error("invalid address `{0}`")]
    InvalidAddress(String),

    /// The `data` payload was not valid hex.
    #[error("invalid data payload: {0}")]
    InvalidData(String),

    /// No key in the keyring matches the requested address.
    #[error("no account in the keyring matches address {0}")]
    UnknownAccount(String),

    /// The signature backend rejected the digest or the key.
    #[error("signing failed: {0}")]
    SigningFailure(String),

    /// Malformed input to the RLP encoder or decoder.
    #[error("codec error: {0}")]
    Codec(String),

    /// Raw key bytes were not a valid secp256k1 secret scalar.
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    /// A message handed to `sign_message` was not a 32-byte digest.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Typed data could not be packed.
    #[error("invalid typed data: {0}")]
    TypedData(String),
}

impl KeyringError {
    /// Short, stable name of the failure kind, for logs and stage reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidChainId(_) => "invalid_chain_id",
            Self::MissingGasLimit => "missing_gas_limit",
            Self::NegativeNumericField { .. } => "negative_numeric_field",
            Self::InvalidQuantity { .. } => "invalid_quantity",
            Self::InvalidAddress(_) => "invalid_address",
            Self::InvalidData(_) => "invalid_data",
            Self::UnknownAccount(_) => "unknown_account",
            Self::SigningFailure(_) => "signing_failure",
            Self::Codec(_) => "codec",
            Self::InvalidSecretKey => "invalid_secret_key",
            Self::InvalidMessage(_) => "invalid_message",
            Self::TypedData(_) => "typed_data",
        }
    }
}

impl From<alloy_rlp::Error> for KeyringError {
    fn from(err: alloy_rlp::Error) -> Self {
        KeyringError::Codec(err.to_string())
    }
}
