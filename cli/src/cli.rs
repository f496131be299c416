//! # CLI Interface
//!
//! Argument structure for `moac-keyring`, using `clap` derive.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::logging::LogFormat;

/// Offline MOAC key management and transaction signing.
///
/// Keys are read from `--key` or `MOAC_KEYRING_KEYS` and held in memory for
/// the duration of one command. Results are printed as JSON on stdout.
#[derive(Parser, Debug)]
#[command(
    name = "moac-keyring",
    about = "Offline MOAC key management and transaction signing",
    version,
    propagate_version = true
)]
pub struct KeyringCli {
    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log output format.
    #[arg(
        long,
        global = true,
        value_enum,
        env = "MOAC_LOG_FORMAT",
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate fresh accounts and print their addresses and keys.
    New(NewArgs),
    /// List the addresses of the configured keys.
    Accounts(KeyArgs),
    /// Sign a JSON transaction request.
    SignTx(SignTxArgs),
    /// Sign a 32-byte digest as-is.
    SignMessage(SignMessageArgs),
    /// Sign a message under the personal-message prefix.
    PersonalSign(PersonalSignArgs),
    /// Recover the signer and chain id of a signed transaction.
    Verify(VerifyArgs),
    /// Print version information and exit.
    Version,
}

/// Where the private keys come from.
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Hex private key, `0x` optional. Repeat the flag or separate with commas.
    ///
    /// Prefer the environment variable: flags end up in shell history.
    #[arg(
        long = "key",
        env = "MOAC_KEYRING_KEYS",
        value_delimiter = ',',
        hide_env_values = true
    )]
    pub keys: Vec<String>,
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Number of accounts to generate.
    #[arg(long, short = 'n', default_value_t = 1)]
    pub count: usize,
}

#[derive(Args, Debug)]
pub struct SignTxArgs {
    #[command(flatten)]
    pub keys: KeyArgs,

    /// Signing account. Falls back to the request's `from` field.
    #[arg(long)]
    pub from: Option<String>,

    /// JSON request file, or `-` for stdin.
    #[arg(long, default_value = "-")]
    pub tx: PathBuf,
}

#[derive(Args, Debug)]
pub struct SignMessageArgs {
    #[command(flatten)]
    pub keys: KeyArgs,

    /// Signing account.
    #[arg(long)]
    pub from: String,

    /// The 32-byte digest, hex.
    #[arg(long)]
    pub digest: String,
}

#[derive(Args, Debug)]
pub struct PersonalSignArgs {
    #[command(flatten)]
    pub keys: KeyArgs,

    /// Signing account.
    #[arg(long)]
    pub from: String,

    /// Message text.
    #[arg(long)]
    pub message: String,

    /// Treat `--message` as hex bytes instead of UTF-8 text.
    #[arg(long)]
    pub hex: bool,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Signed transaction, hex.
    #[arg(long)]
    pub raw: String,
}
