//! # Protocol Configuration & Constants
//!
//! Every magic number the keyring depends on lives here. Most of them are
//! consensus rules of the MOAC network: change one and the signed bytes stop
//! being valid transactions.

// ---------------------------------------------------------------------------
// Keyring
// ---------------------------------------------------------------------------

/// Type tag reported by the keyring to the wallet host.
pub const KEYRING_TYPE: &str = "MOAC Key Pair";

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// MOAC mainnet chain id.
pub const CHAIN_ID_MAINNET: u64 = 99;

/// MOAC public testnet chain id.
pub const CHAIN_ID_TESTNET: u64 = 101;

/// Local development networks conventionally run on 100.
pub const CHAIN_ID_DEVNET: u64 = 100;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// secp256k1 secret scalars are 32 bytes.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Account addresses are the trailing 20 bytes of a Keccak-256 digest.
pub const ADDRESS_LENGTH: usize = 20;

/// Keccak-256 output length.
pub const DIGEST_LENGTH: usize = 32;

/// `r || s || v` as returned to RPC callers.
pub const RPC_SIGNATURE_LENGTH: usize = 65;

/// Prefix hashed in front of a personal message.
pub const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

// ---------------------------------------------------------------------------
// Transaction Layout
// ---------------------------------------------------------------------------

/// Fields before the signature: nonce, systemContract, gasPrice, gasLimit,
/// to, value, data, shardingFlag, via.
pub const PAYLOAD_FIELD_COUNT: usize = 9;

/// Fields of the signed encoding: the payload plus `v`, `r`, `s`.
pub const SIGNED_FIELD_COUNT: usize = 12;

/// Base of the legacy recovery value: `v = 27 + recovery_id`.
pub const LEGACY_RECOVERY_BASE: u64 = 27;

/// Offset added on top of the legacy recovery value when the chain id is
/// folded in: `v = 27 + recovery_id + 8 + 2 * chain_id`.
pub const CHAIN_ID_RECOVERY_OFFSET: u64 = 8;

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Friendly name for a chain id, for logs and CLI output.
pub fn network_name(chain_id: u64) -> String {
    match chain_id {
        CHAIN_ID_MAINNET => "mainnet".to_string(),
        CHAIN_ID_TESTNET => "testnet".to_string(),
        CHAIN_ID_DEVNET => "devnet".to_string(),
        other => format!("unknown({})", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_ids_are_distinct() {
        assert_ne!(CHAIN_ID_MAINNET, CHAIN_ID_TESTNET);
        assert_ne!(CHAIN_ID_MAINNET, CHAIN_ID_DEVNET);
        assert_ne!(CHAIN_ID_TESTNET, CHAIN_ID_DEVNET);
    }

    #[test]
    fn test_network_name_formatting() {
        assert_eq!(network_name(CHAIN_ID_MAINNET), "mainnet");
        assert_eq!(network_name(CHAIN_ID_TESTNET), "testnet");
        assert_eq!(network_name(7), "unknown(7)");
    }

    #[test]
    fn test_field_counts() {
        assert_eq!(SIGNED_FIELD_COUNT, PAYLOAD_FIELD_COUNT + 3);
    }

    #[test]
    fn test_recovery_offsets_match_eip155_base() {
        // 27 + 8 = 35, the same base EIP-155 uses for `v`.
        assert_eq!(LEGACY_RECOVERY_BASE + CHAIN_ID_RECOVERY_OFFSET, 35);
    }

    #[test]
    fn test_crypto_parameter_sizes() {
        assert_eq!(SECRET_KEY_LENGTH, 32);
        assert_eq!(ADDRESS_LENGTH, 20);
        assert_eq!(DIGEST_LENGTH, 32);
        assert_eq!(RPC_SIGNATURE_LENGTH, 65);
    }
}
