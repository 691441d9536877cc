//! Oracle errors and call results.

use serde::Serialize;
use thiserror::Error;

use crate::blockchain::types::{ChainError, TxResponse};

#[derive(Debug, Error)]
pub enum OracleError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// Sender is not the contract owner.
    #[error("Unauthorized")]
    Unauthorized,

    /// Contract state was read before instantiation.
    #[error("{0} not found")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// `update_price` needs a signer but none was configured.
    #[error("No wallet configured: set ORACLE_MNEMONIC or ORACLE_PRIVATE_KEY")]
    NoWallet,
}

pub type OracleResult<T> = Result<T, OracleError>;

/// Key/value event attribute emitted by a contract call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Attributes produced by a locally executed contract call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContractResponse {
    pub attributes: Vec<Attribute>,
}

impl ContractResponse {
    pub fn add_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(key, value));
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }
}

/// Outcome of `update_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UpdateReceipt {
    /// The transaction as accepted by the node.
    Broadcast(TxResponse),
    /// The simulator's response.
    Local(ContractResponse),
}

impl UpdateReceipt {
    pub fn txhash(&self) -> Option<&str> {
        match self {
            UpdateReceipt::Broadcast(tx) => Some(&tx.txhash),
            UpdateReceipt::Local(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(OracleError::Unauthorized.to_string(), "Unauthorized");
        assert_eq!(
            OracleError::NotFound("oracle state".into()).to_string(),
            "oracle state not found"
        );
        let chain: OracleError = ChainError::Timeout(5).into();
        assert_eq!(chain.to_string(), "RPC timeout after 5 seconds");
    }

    #[test]
    fn test_local_receipt_serializes_attributes() {
        let receipt = UpdateReceipt::Local(
            ContractResponse::default().add_attribute("method", "try_update_price"),
        );
        assert_eq!(
            serde_json::to_value(&receipt).unwrap(),
            serde_json::json!({
                "attributes": [{ "key": "method", "value": "try_update_price" }]
            })
        );
        assert!(receipt.txhash().is_none());
    }
}
