//! Chain-specific types and error definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export config types used throughout the chain layer
pub use crate::config::schema::{BroadcastMode, FeeConfig, NetworkConfig, WasmApi};

/// Cosmos chain identifier (e.g. `bombay-12`, `columbus-5`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainId(pub String);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Transport failure or every LCD endpoint failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// LCD request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// LCD answered with a non-success status.
    #[error("LCD returned status {status}: {body}")]
    Http { status: u16, body: String },

    /// Response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid key material or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Malformed or wrong-prefix bech32 address.
    #[error("Address error: {0}")]
    Address(String),

    /// Transaction was rejected by the node or failed in the block.
    #[error("Transaction {txhash} failed with code {code} ({codespace}): {raw_log}")]
    TxFailed {
        txhash: String,
        code: u32,
        codespace: String,
        raw_log: String,
    },

    /// Transaction was not found in a block after polling.
    #[error("Transaction {txhash} not included after {attempts} attempts")]
    ConfirmationTimeout { txhash: String, attempts: u32 },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: String, actual: String },
}

impl ChainError {
    /// Whether retrying the same read-only request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ChainError::Rpc(_) | ChainError::Timeout(_) => true,
            ChainError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// A native coin amount, e.g. `100000uluna`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    #[serde(with = "str_u128")]
    pub amount: u128,
}

impl Coin {
    pub fn new(amount: u128, denom: impl Into<String>) -> Self {
        Self {
            amount,
            denom: denom.into(),
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = String;

    /// Parses `<amount><denom>`; denoms follow the Cosmos SDK rule
    /// (3-128 chars, leading letter, then alphanumerics and `/:._-`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| format!("coin '{}' has no denom", s))?;
        let (amount, denom) = s.split_at(split);
        if amount.is_empty() {
            return Err(format!("coin '{}' has no amount", s));
        }
        if !is_valid_denom(denom) {
            return Err(format!("invalid denom '{}'", denom));
        }
        let amount = amount
            .parse::<u128>()
            .map_err(|e| format!("invalid amount in '{}': {}", s, e))?;
        Ok(Coin::new(amount, denom))
    }
}

/// Parse a comma-separated coin list such as `100000uluna,5uusd`.
pub fn parse_coins(s: &str) -> Result<Vec<Coin>, String> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(',').map(str::parse).collect()
}

pub fn is_valid_denom(denom: &str) -> bool {
    let mut chars = denom.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (3..=128).contains(&denom.len())
        && first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c))
}

/// Account number and sequence needed to sign a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_number: u64,
    pub sequence: u64,
}

/// `tx_response` object as returned by the LCD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    #[serde(default, with = "str_u64")]
    pub height: u64,
    pub txhash: String,
    #[serde(default)]
    pub codespace: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default, with = "str_u64")]
    pub gas_wanted: u64,
    #[serde(default, with = "str_u64")]
    pub gas_used: u64,
}

impl TxResponse {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Convert a non-zero code into `ChainError::TxFailed`.
    pub fn into_result(self) -> ChainResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ChainError::TxFailed {
                txhash: self.txhash,
                code: self.code,
                codespace: self.codespace,
                raw_log: self.raw_log,
            })
        }
    }
}

/// Transaction confirmation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Transaction is included at the given height.
    Confirmed { height: u64 },
    /// Transaction was included but execution failed.
    Failed(String),
}

/// Cosmos REST encodes 64-bit integers as JSON strings; accept both forms.
pub(crate) mod str_u64 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(u64),
    }

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Str(s) if s.is_empty() => Ok(0),
            Raw::Str(s) => s.parse().map_err(de::Error::custom),
            Raw::Num(n) => Ok(n),
        }
    }
}

pub(crate) mod str_u128 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
