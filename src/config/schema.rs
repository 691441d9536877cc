//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the oracle
//! client. All types derive Serde traits for deserialization from config files.
//! Secrets (mnemonic, private key) are deliberately absent; see
//! `blockchain::wallet`.

use serde::{Deserialize, Serialize};

/// Root configuration for the oracle client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct OracleConfig {
    /// Chain and LCD endpoint settings.
    pub network: NetworkConfig,

    /// Gas and fee settings for transactions.
    pub fees: FeeConfig,

    /// The oracle contract being read and written.
    pub oracle: ContractConfig,

    /// HD derivation parameters for mnemonic wallets.
    pub wallet: WalletConfig,

    /// Retry and confirmation polling configuration.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// REST flavor of the chain's wasm module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WasmApi {
    /// Terra classic `terra.wasm.v1beta1`.
    #[default]
    TerraV1beta1,
    /// Upstream wasmd `cosmwasm.wasm.v1`.
    CosmwasmV1,
}

impl WasmApi {
    pub fn execute_type_url(self) -> &'static str {
        match self {
            WasmApi::TerraV1beta1 => "/terra.wasm.v1beta1.MsgExecuteContract",
            WasmApi::CosmwasmV1 => "/cosmwasm.wasm.v1.MsgExecuteContract",
        }
    }
}

/// How long `broadcast` waits before the LCD answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastMode {
    /// Return after CheckTx.
    #[default]
    Sync,
    /// Return immediately.
    Async,
    /// Return after the tx is committed (deprecated on newer SDKs).
    Block,
}

impl BroadcastMode {
    pub fn as_proto_str(self) -> &'static str {
        match self {
            BroadcastMode::Sync => "BROADCAST_MODE_SYNC",
            BroadcastMode::Async => "BROADCAST_MODE_ASYNC",
            BroadcastMode::Block => "BROADCAST_MODE_BLOCK",
        }
    }
}

/// Network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Chain ID used in sign docs (e.g., "bombay-12").
    pub chain_id: String,

    /// Primary LCD (REST) endpoint URL.
    pub lcd_url: String,

    /// Failover LCD endpoint URLs, tried in order.
    pub failover_urls: Vec<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Bech32 account prefix.
    pub address_prefix: String,

    /// Wasm REST flavor.
    pub wasm_api: WasmApi,

    /// Broadcast mode for signed transactions.
    pub broadcast_mode: BroadcastMode,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: "bombay-12".to_string(),
            lcd_url: "https://bombay-lcd.terra.dev".to_string(),
            failover_urls: Vec::new(),
            request_timeout_secs: 10,
            address_prefix: "terra".to_string(),
            wasm_api: WasmApi::default(),
            broadcast_mode: BroadcastMode::default(),
        }
    }
}

/// Fee configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Price per unit of gas in `fee_denom`.
    pub gas_price: f64,

    /// Denom the fee is paid in.
    pub fee_denom: String,

    /// Multiplier applied to simulated gas (1.0 = exact, 1.4 = 40% buffer).
    pub gas_adjustment: f64,

    /// Fixed gas limit; skips simulation when set.
    pub gas_limit: Option<u64>,

    /// Memo attached to every transaction.
    pub memo: String,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            gas_price: 0.15,
            fee_denom: "uluna".to_string(),
            gas_adjustment: 1.4,
            gas_limit: None,
            memo: String::new(),
        }
    }
}

/// Oracle contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Bech32 address of the oracle contract.
    pub address: String,

    /// Coins sent along with `update_price`, e.g. "100000uluna".
    pub update_funds: String,

    /// Price the local simulator is instantiated with.
    pub simulated_initial_price: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: "terra1lyla4th5dtx85chq5qqht77kfwywgn42jgvjgs".to_string(),
            update_funds: "100000uluna".to_string(),
            simulated_initial_price: 0,
        }
    }
}

/// BIP-44 derivation parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// SLIP-44 coin type (330 = Terra, 118 = Cosmos Hub).
    pub coin_type: u32,

    /// Account component of the HD path.
    pub account: u32,

    /// Address index component of the HD path.
    pub index: u32,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            coin_type: 330,
            account: 0,
            index: 0,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum attempts for read-only queries.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Polls of the tx endpoint before giving up on confirmation.
    pub confirm_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 8000,
            confirm_attempts: 12,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` overrides.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_bombay() {
        let config = OracleConfig::default();
        assert_eq!(config.network.chain_id, "bombay-12");
        assert_eq!(config.network.address_prefix, "terra");
        assert_eq!(config.oracle.update_funds, "100000uluna");
        assert_eq!(config.wallet.coin_type, 330);
        assert!(config.fees.gas_limit.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: OracleConfig = toml::from_str(
            r#"
            [network]
            chain_id = "localterra"
            wasm_api = "cosmwasm_v1"
            broadcast_mode = "block"

            [fees]
            gas_limit = 250000
            "#,
        )
        .unwrap();
        assert_eq!(config.network.chain_id, "localterra");
        assert_eq!(config.network.wasm_api, WasmApi::CosmwasmV1);
        assert_eq!(config.network.broadcast_mode, BroadcastMode::Block);
        assert_eq!(config.network.request_timeout_secs, 10);
        assert_eq!(config.fees.gas_limit, Some(250_000));
        assert_eq!(config.fees.fee_denom, "uluna");
    }

    #[test]
    fn test_type_urls() {
        assert_eq!(
            WasmApi::TerraV1beta1.execute_type_url(),
            "/terra.wasm.v1beta1.MsgExecuteContract"
        );
        assert_eq!(
            WasmApi::CosmwasmV1.execute_type_url(),
            "/cosmwasm.wasm.v1.MsgExecuteContract"
        );
        assert_eq!(BroadcastMode::Sync.as_proto_str(), "BROADCAST_MODE_SYNC");
    }
}
