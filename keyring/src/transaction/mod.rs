//! # Transactions
//!
//! Everything between a caller's loosely-typed request and the signed bytes
//! that go on the wire.
//!
//! ```text
//! TransactionRequest ──normalize──▶ UnsignedTransaction
//!        │                               │ signing_fields()
//!        │                               ▼
//!        │                      RLP ──keccak──▶ digest ──sign──▶ (rec, r, s)
//!        │                                                          │
//!        └────────────── SigningPipeline ◀── patch [v, r, s] ◀──────┘
//!                              │
//!                              ▼
//!                      SignedTransaction
//! ```
//!
//! A MOAC transaction is nine payload fields followed by the signature:
//!
//! | # | Field            | Encoding                          |
//! |---|------------------|-----------------------------------|
//! | 0 | `nonce`          | minimal integer                   |
//! | 1 | `systemContract` | minimal integer, always zero      |
//! | 2 | `gasPrice`       | minimal integer                   |
//! | 3 | `gasLimit`       | minimal integer                   |
//! | 4 | `to`             | 20 bytes, empty for creation      |
//! | 5 | `value`          | minimal integer                   |
//! | 6 | `data`           | raw bytes                         |
//! | 7 | `shardingFlag`   | minimal integer                   |
//! | 8 | `via`            | 20 bytes or empty                 |
//! | 9 | `v`              | chain-bound recovery value        |
//! | 10| `r`              | minimal integer                   |
//! | 11| `s`              | minimal integer                   |

pub mod codec;
pub mod normalize;
pub mod pipeline;
pub mod signing;
pub mod types;
pub mod verification;

pub use codec::{decode_fields, encode_fields};
pub use normalize::normalize;
pub use pipeline::{SigningPipeline, SigningStage};
pub use types::{ParsedQuantity, Quantity, SignedTransaction, TransactionRequest, UnsignedTransaction};
pub use verification::{recover_signer, RecoveredSigner};
