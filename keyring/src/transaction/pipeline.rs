//! The transaction signing pipeline.
//!
//! ```text
//! Validating → Encoding → Hashing → Signing → Patching → Done
//!      └───────────┴──────────┴─────────┴──────────┴──→ Failed(kind)
//! ```
//!
//! 1. **Validating**: [`normalize`] the request.
//! 2. **Encoding**: RLP-encode the 12 signing slots (payload, chain id,
//!    two empty placeholders).
//! 3. **Hashing**: Keccak-256 of that exact encoding.
//! 4. **Signing**: resolve the account by address and sign the digest.
//! 5. **Patching**: decode the step-2 encoding, keep the first nine items,
//!    append `[v, r, s]`.
//! 6. **Done**: re-encode the twelve items.
//!
//! The pipeline only reads the account list. A failure at any stage ends in
//! [`SigningStage::Failed`] carrying the error kind; the error itself is
//! returned and logged with the stage it happened in.

use std::fmt;

use tracing::{debug, warn};

use super::codec::{decode_fields_truncated, encode_fields};
use super::normalize::normalize;
use super::signing::{digest, sign, signature_fields};
use super::types::{SignedTransaction, TransactionRequest};
use crate::config::{network_name, PAYLOAD_FIELD_COUNT, SIGNED_FIELD_COUNT};
use crate::crypto::keys::{format_address, parse_address, Account, KeyProvider};
use crate::error::KeyringError;

/// Where the pipeline is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningStage {
    Validating,
    Encoding,
    Hashing,
    Signing,
    Patching,
    Done,
    /// Terminal failure, with the [`KeyringError::kind`] that caused it.
    Failed(&'static str),
}

impl fmt::Display for SigningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Encoding => "encoding",
            Self::Hashing => "hashing",
            Self::Signing => "signing",
            Self::Patching => "patching",
            Self::Done => "done",
            Self::Failed(kind) => return write!(f, "failed({})", kind),
        };
        f.write_str(name)
    }
}

/// Signs transaction requests with keys held by a [`KeyProvider`].
pub struct SigningPipeline<'a, P: KeyProvider> {
    provider: &'a P,
}

impl<'a, P: KeyProvider> SigningPipeline<'a, P> {
    /// A pipeline signing through `provider`.
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Runs the pipeline for the account at `address` among `accounts`.
    pub fn run(
        &self,
        accounts: &[Account<P::Key>],
        address: &str,
        request: &TransactionRequest,
    ) -> Result<SignedTransaction, KeyringError> {
        self.execute(accounts, address, request).1
    }

    /// Like [`run`](Self::run), also reporting the terminal stage:
    /// [`SigningStage::Done`] or [`SigningStage::Failed`].
    pub fn execute(
        &self,
        accounts: &[Account<P::Key>],
        address: &str,
        request: &TransactionRequest,
    ) -> (SigningStage, Result<SignedTransaction, KeyringError>) {
        let mut stage = SigningStage::Validating;
        match self.advance(&mut stage, accounts, address, request) {
            Ok(signed) => (SigningStage::Done, Ok(signed)),
            Err(err) => {
                warn!(
                    failed_at = %stage,
                    account = %address,
                    error = %err,
                    "transaction signing failed"
                );
                (SigningStage::Failed(err.kind()), Err(err))
            }
        }
    }

    fn advance(
        &self,
        stage: &mut SigningStage,
        accounts: &[Account<P::Key>],
        address: &str,
        request: &TransactionRequest,
    ) -> Result<SignedTransaction, KeyringError> {
        let tx = normalize(request)?;

        *stage = SigningStage::Encoding;
        let encoded = encode_fields(&tx.signing_fields());

        *stage = SigningStage::Hashing;
        let digest = digest(&encoded);

        *stage = SigningStage::Signing;
        let account = find_account(accounts, address)?;
        debug!(
            account = %format_address(&account.address()),
            chain_id = tx.chain_id,
            network = %network_name(tx.chain_id),
            "signing transaction"
        );
        let signature = sign(self.provider, account.key(), &digest)?;

        *stage = SigningStage::Patching;
        let mut fields = decode_fields_truncated(&encoded, PAYLOAD_FIELD_COUNT)?;
        fields.extend(signature_fields(&signature, tx.chain_id)?);
        if fields.len() != SIGNED_FIELD_COUNT {
            return Err(KeyringError::Codec(format!(
                "patched transaction has {} fields, expected {}",
                fields.len(),
                SIGNED_FIELD_COUNT
            )));
        }

        *stage = SigningStage::Done;
        let signed = SignedTransaction::from_raw(encode_fields(&fields));
        debug!(hash = %signed.hash(), "transaction signed");
        Ok(signed)
    }
}

/// Finds the account whose address matches `address` (any case, prefix
/// optional). Text that is not an address matches no account.
pub fn find_account<'a, K>(
    accounts: &'a [Account<K>],
    address: &str,
) -> Result<&'a Account<K>, KeyringError> {
    let wanted = parse_address(address)
        .map_err(|_| KeyringError::UnknownAccount(address.to_string()))?;
    accounts
        .iter()
        .find(|account| account.address() == wanted)
        .ok_or_else(|| KeyringError::UnknownAccount(format_address(&wanted)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{decode_secret_key, Secp256k1Provider};
    use crate::transaction::codec::decode_fields;

    const KEY: &str = "c75a5f85ef779dcf95c651612efb3c3b9a6dfafb1bb5375905454d9fc8be8a6b";
    const ADDRESS: &str = "0x7312f4b8a4457a36827f185325fd6b66a3f8bb8b";

    fn accounts(provider: &Secp256k1Provider) -> Vec<Account<k256::ecdsa::SigningKey>> {
        let key = provider.import(&decode_secret_key(KEY).unwrap()).unwrap();
        vec![Account::from_key(provider, key)]
    }

    fn request() -> TransactionRequest {
        TransactionRequest::new()
            .nonce(1)
            .gas_price("0x4a817c800")
            .gas_limit("0xcf09")
            .to("0xb55a404b860be17fcb5623bb4dd24e904a674b44")
            .value("0xde0b6b3a7640000")
            .chain_id(101)
    }

    #[test]
    fn stage_display() {
        assert_eq!(SigningStage::Validating.to_string(), "validating");
        assert_eq!(SigningStage::Done.to_string(), "done");
    }

    #[test]
    fn produces_twelve_fields_with_normalized_prefix() {
        let provider = Secp256k1Provider;
        let accounts = accounts(&provider);
        let signed = SigningPipeline::new(&provider)
            .run(&accounts, ADDRESS, &request())
            .unwrap();

        let fields = decode_fields(signed.as_bytes()).unwrap();
        assert_eq!(fields.len(), 12);

        let expected = normalize(&request()).unwrap().payload_fields();
        assert_eq!(fields[..9], expected[..]);
    }

    #[test]
    fn address_lookup_ignores_case() {
        let provider = Secp256k1Provider;
        let accounts = accounts(&provider);
        let result = SigningPipeline::new(&provider).run(
            &accounts,
            "0x7312F4B8A4457a36827f185325Fd6B66a3f8BB8B",
            &request(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn unknown_account_is_reported() {
        let provider = Secp256k1Provider;
        let accounts = accounts(&provider);
        let err = SigningPipeline::new(&provider)
            .run(
                &accounts,
                "0x01560cd3bac62cc6d7e6380600d9317363400896",
                &request(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            KeyringError::UnknownAccount("0x01560cd3bac62cc6d7e6380600d9317363400896".to_string())
        );
    }

    #[test]
    fn malformed_address_is_an_unknown_account() {
        let provider = Secp256k1Provider;
        let accounts = accounts(&provider);
        for address in ["0x1234", "not an address", ""] {
            let err = SigningPipeline::new(&provider)
                .run(&accounts, address, &request())
                .unwrap_err();
            assert_eq!(err, KeyringError::UnknownAccount(address.to_string()));
        }
    }

    #[test]
    fn terminal_stage_is_reported() {
        let provider = Secp256k1Provider;
        let accounts = accounts(&provider);
        let pipeline = SigningPipeline::new(&provider);

        let (stage, result) = pipeline.execute(&accounts, ADDRESS, &request());
        assert_eq!(stage, SigningStage::Done);
        assert!(result.is_ok());

        let (stage, result) = pipeline.execute(&accounts, ADDRESS, &request().chain_id(0));
        assert_eq!(stage, SigningStage::Failed("invalid_chain_id"));
        assert!(result.is_err());

        let (stage, _) = pipeline.execute(&[], ADDRESS, &request());
        assert_eq!(stage, SigningStage::Failed("unknown_account"));
        assert_eq!(stage.to_string(), "failed(unknown_account)");
    }

    #[test]
    fn validation_runs_before_account_lookup() {
        let provider = Secp256k1Provider;
        let err = SigningPipeline::new(&provider)
            .run(&[], ADDRESS, &request().chain_id(0))
            .unwrap_err();
        assert!(matches!(err, KeyringError::InvalidChainId(_)));
    }

    #[test]
    fn repeated_signing_is_identical() {
        let provider = Secp256k1Provider;
        let accounts = accounts(&provider);
        let pipeline = SigningPipeline::new(&provider);
        let first = pipeline.run(&accounts, ADDRESS, &request()).unwrap();
        let second = pipeline.run(&accounts, ADDRESS, &request()).unwrap();
        assert_eq!(first, second);
    }
}
