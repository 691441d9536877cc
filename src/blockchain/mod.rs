//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (mnemonic or private key)
//!     → wallet.rs (HD derivation, signing)
//!     → address.rs (bech32 account address)
//! Network config (LCD URL, chain id)
//!     → client.rs (REST calls with timeouts and failover)
//!     → transaction.rs (build, simulate, sign, broadcast, confirm)
//!         → proto.rs (protobuf wire types)
//! ```
//!
//! # Security Constraints
//! - Key material ONLY from environment variables
//! - Never log private keys, mnemonics or seeds
//! - All LCD calls have configurable timeouts

pub mod address;
pub mod client;
pub mod proto;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use address::AccAddress;
pub use client::LcdClient;
pub use transaction::TxBuilder;
pub use types::{ChainError, ChainId, ChainResult, Coin, ConfirmationStatus, TxResponse};
pub use wallet::Wallet;
