//! # Keyring
//!
//! The in-memory account set and everything a wallet host calls on it.
//!
//! ## Locking
//!
//! Accounts live behind a `parking_lot::RwLock`. Signing takes the read lock
//! and only borrows keys, so any number of signatures run in parallel.
//! Mutations (`import_keys`, `add_accounts`, `remove_account`) take the
//! write lock, build the new state first, and swap it in only once nothing
//! can fail.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, B256};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::KEYRING_TYPE;
use crate::crypto::keys::{decode_secret_key, format_address, Account, KeyProvider, Secp256k1Provider};
use crate::crypto::messages::{
    personal_message_digest, raw_message_digest, typed_data_digest, TypedDataField,
};
use crate::crypto::signatures::Signature;
use crate::error::KeyringError;
use crate::transaction::pipeline::{find_account, SigningPipeline};
use crate::transaction::signing::sign;
use crate::transaction::types::{SignedTransaction, TransactionRequest};

/// An in-memory set of signing accounts.
pub struct Keyring<P: KeyProvider = Secp256k1Provider> {
    provider: P,
    accounts: RwLock<Vec<Account<P::Key>>>,
}

impl Keyring<Secp256k1Provider> {
    /// An empty secp256k1 keyring.
    pub fn new() -> Self {
        Self::with_provider(Secp256k1Provider)
    }

    /// A secp256k1 keyring holding `keys` (hex, `0x` optional).
    pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> Result<Self, KeyringError> {
        let keyring = Self::new();
        keyring.import_keys(keys)?;
        Ok(keyring)
    }
}

impl Default for Keyring<Secp256k1Provider> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: KeyProvider> Keyring<P> {
    /// An empty keyring signing through `provider`.
    pub fn with_provider(provider: P) -> Self {
        Self {
            provider,
            accounts: RwLock::new(Vec::new()),
        }
    }

    /// The keyring type string hosts register this keyring under.
    pub fn keyring_type(&self) -> &'static str {
        KEYRING_TYPE
    }

    /// Account addresses, in insertion order.
    pub fn list_accounts(&self) -> Vec<Address> {
        self.accounts.read().iter().map(Account::address).collect()
    }

    /// Number of accounts held.
    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    /// Whether the keyring holds no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    /// Replaces the whole account set with `keys`.
    ///
    /// Every key is decoded before the set is touched; one bad key leaves the
    /// keyring exactly as it was.
    pub fn import_keys<S: AsRef<str>>(&self, keys: &[S]) -> Result<(), KeyringError> {
        let imported = keys
            .iter()
            .map(|key| {
                let raw = decode_secret_key(key.as_ref())?;
                let key = self.provider.import(&raw)?;
                Ok(Account::from_key(&self.provider, key))
            })
            .collect::<Result<Vec<_>, KeyringError>>()?;

        let count = imported.len();
        *self.accounts.write() = imported;
        info!(count, "imported keys");
        Ok(())
    }

    /// Raw secret keys as lower-case hex without a prefix, in insertion order.
    pub fn export_keys(&self) -> Vec<String> {
        self.accounts
            .read()
            .iter()
            .map(|account| hex::encode(self.provider.export_raw(account.key())))
            .collect()
    }

    /// The raw secret key of one account, lower-case hex without a prefix.
    pub fn export_account(&self, address: &str) -> Result<String, KeyringError> {
        let accounts = self.accounts.read();
        let account = find_account(&accounts, address)?;
        Ok(hex::encode(self.provider.export_raw(account.key())))
    }

    /// Generates `count` fresh accounts and appends them.
    pub fn add_accounts(&self, count: usize) -> Vec<Address> {
        let fresh: Vec<Account<P::Key>> = (0..count)
            .map(|_| Account::from_key(&self.provider, self.provider.generate()))
            .collect();
        let addresses: Vec<Address> = fresh.iter().map(Account::address).collect();

        self.accounts.write().extend(fresh);
        info!(count, "generated accounts");
        addresses
    }

    /// Removes the account at `address`.
    pub fn remove_account(&self, address: &str) -> Result<(), KeyringError> {
        let mut accounts = self.accounts.write();
        let wanted = find_account(&accounts, address)?.address();
        accounts.retain(|account| account.address() != wanted);
        info!(account = %format_address(&wanted), "removed account");
        Ok(())
    }

    /// Signs a transaction request with the account at `address`.
    pub fn sign_transaction(
        &self,
        address: &str,
        request: &TransactionRequest,
    ) -> Result<SignedTransaction, KeyringError> {
        let accounts = self.accounts.read();
        SigningPipeline::new(&self.provider).run(&accounts, address, request)
    }

    /// Signs a 32-byte digest as-is.
    pub fn sign_message(&self, address: &str, message: &[u8]) -> Result<Signature, KeyringError> {
        let digest = raw_message_digest(message)?;
        self.sign_digest(address, &digest, "raw")
    }

    /// Signs `message` under the personal-message prefix.
    pub fn sign_personal_message(
        &self,
        address: &str,
        message: &[u8],
    ) -> Result<Signature, KeyringError> {
        let digest = personal_message_digest(message);
        self.sign_digest(address, &digest, "personal")
    }

    /// Signs legacy typed data.
    pub fn sign_typed_data(
        &self,
        address: &str,
        fields: &[TypedDataField],
    ) -> Result<Signature, KeyringError> {
        let digest = typed_data_digest(fields)?;
        self.sign_digest(address, &digest, "typed")
    }

    fn sign_digest(
        &self,
        address: &str,
        digest: &B256,
        kind: &'static str,
    ) -> Result<Signature, KeyringError> {
        let accounts = self.accounts.read();
        let account = find_account(&accounts, address)?;
        debug!(account = %format_address(&account.address()), kind, "signing message");
        sign(&self.provider, account.key(), digest)
    }
}

impl<P: KeyProvider> Keyring<P> {
    /// [`sign_transaction`](Self::sign_transaction) on tokio's blocking pool,
    /// so an async host never stalls its reactor on curve arithmetic.
    pub async fn sign_transaction_offloaded(
        self: Arc<Self>,
        address: String,
        request: TransactionRequest,
    ) -> Result<SignedTransaction, KeyringError> {
        tokio::task::spawn_blocking(move || self.sign_transaction(&address, &request))
            .await
            .map_err(|e| KeyringError::SigningFailure(format!("signing task failed: {}", e)))?
    }
}

impl<P: KeyProvider> fmt::Debug for Keyring<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyring")
            .field("type", &KEYRING_TYPE)
            .field("accounts", &self.list_accounts())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
