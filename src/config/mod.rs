//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! oracle.toml (optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → OracleConfig (validated, immutable)
//!     → CLI overrides (--contract, --lcd-url) re-validated
//!
//! .env / environment
//!     → blockchain::wallet (mnemonic or private key, never in the file)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_or_default, ConfigError};
pub use schema::OracleConfig;
pub use schema::{ContractConfig, FeeConfig, NetworkConfig, RetryConfig, WalletConfig};
