//! # Vault
//!
//! The keyring: which accounts exist, and the public calls that sign with
//! them. Key material never leaves this module except through the explicit
//! export calls.

pub mod keyring;

pub use keyring::Keyring;
