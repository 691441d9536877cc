//! Wiring between configuration, wallet and oracle backends for the CLI.

use serde::Serialize;
use thiserror::Error;

use crate::blockchain::address::AccAddress;
use crate::blockchain::client::LcdClient;
use crate::blockchain::transaction::TxBuilder;
use crate::blockchain::types::{parse_coins, ChainError, ConfirmationStatus};
use crate::blockchain::wallet::Wallet;
use crate::config::loader::ConfigError;
use crate::config::schema::OracleConfig;
use crate::config::validation::validate_config;
use crate::oracle::{LocalOracle, OracleContract, OracleError, PriceOracle, UpdateReceipt};

/// Sender used by the simulator when no wallet is configured.
pub const SIMULATOR_OWNER: &str = "simulator";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub contract: Option<String>,
    pub lcd_url: Option<String>,
    pub funds: Option<String>,
}

/// Apply overrides and re-validate.
pub fn apply_overrides(mut config: OracleConfig, overrides: &Overrides) -> AppResult<OracleConfig> {
    if let Some(contract) = &overrides.contract {
        config.oracle.address = contract.clone();
    }
    if let Some(lcd_url) = &overrides.lcd_url {
        config.network.lcd_url = lcd_url.clone();
    }
    if let Some(funds) = &overrides.funds {
        config.oracle.update_funds = funds.clone();
    }
    validate_config(&config).map_err(|errors| AppError::Config(ConfigError::Validation(errors)))?;
    Ok(config)
}

/// Either the deployed contract or the in-memory simulator.
#[derive(Debug)]
pub enum OracleHandle {
    OnChain(OracleContract),
    Local(LocalOracle),
}

impl OracleHandle {
    /// Build the on-chain handle; `with_signer` loads the wallet from the
    /// environment so that `update_price` can sign.
    pub async fn on_chain(config: &OracleConfig, with_signer: bool) -> AppResult<Self> {
        let client = LcdClient::new(config.network.clone())?;
        if let Err(e) = client.verify_chain_id().await {
            tracing::warn!(error = %e, "Chain verification failed, continuing");
        }

        let address =
            AccAddress::parse_with_prefix(&config.oracle.address, &config.network.address_prefix)?;
        let mut contract = OracleContract::new(address, client.clone(), config.retries.clone());

        if with_signer {
            let wallet = Wallet::from_env(&config.wallet, &config.network.address_prefix)?;
            let funds = parse_coins(&config.oracle.update_funds).map_err(ChainError::Decode)?;
            let signer = TxBuilder::new(client, wallet, config.fees.clone());
            contract = contract.with_signer(signer, funds);
        }

        Ok(OracleHandle::OnChain(contract))
    }

    /// Build a simulator owned by the configured wallet, or by
    /// `SIMULATOR_OWNER` when no wallet secret is set.
    pub fn simulated(config: &OracleConfig) -> AppResult<Self> {
        let owner = match Wallet::from_env_if_set(&config.wallet, &config.network.address_prefix)? {
            Some(wallet) => wallet.address().to_string(),
            None => SIMULATOR_OWNER.to_string(),
        };
        let local = LocalOracle::instantiate(owner, config.oracle.simulated_initial_price)?;
        Ok(OracleHandle::Local(local))
    }

    pub fn oracle(&self) -> &dyn PriceOracle {
        match self {
            OracleHandle::OnChain(contract) => contract,
            OracleHandle::Local(local) => local,
        }
    }

    /// Wait for a broadcast update to be included. Local updates are
    /// already final.
    pub async fn confirm(&self, receipt: &UpdateReceipt) -> AppResult<Option<ConfirmationStatus>> {
        match (self, receipt.txhash()) {
            (OracleHandle::OnChain(contract), Some(txhash)) => {
                Ok(Some(contract.wait_for_inclusion(txhash).await?))
            }
            _ => Ok(None),
        }
    }
}

/// Pretty JSON for stdout.
pub fn render<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// One-line summary of a confirmation outcome.
pub fn describe_confirmation(status: &ConfirmationStatus) -> String {
    match status {
        ConfirmationStatus::Confirmed { height } => format!("confirmed at height {}", height),
        ConfirmationStatus::Failed(log) => format!("failed: {}", log),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::PriceResponse;

    #[test]
    fn test_overrides_are_applied() {
        let overrides = Overrides {
            contract: Some("terra1w508d6qejxtdg4y5r3zarvary0c5xw7kued6dc".into()),
            lcd_url: Some("http://localhost:1317".into()),
            funds: Some("5uluna".into()),
        };
        let config = apply_overrides(OracleConfig::default(), &overrides).unwrap();
        assert_eq!(config.oracle.address, "terra1w508d6qejxtdg4y5r3zarvary0c5xw7kued6dc");
        assert_eq!(config.network.lcd_url, "http://localhost:1317");
        assert_eq!(config.oracle.update_funds, "5uluna");
    }

    #[test]
    fn test_invalid_override_rejected() {
        let overrides = Overrides {
            contract: Some("cosmos1w508d6qejxtdg4y5r3zarvary0c5xw7k6ah60c".into()),
            ..Overrides::default()
        };
        let err = apply_overrides(OracleConfig::default(), &overrides).unwrap_err();
        assert!(err.to_string().contains("oracle.address"));
    }

    #[test]
    fn test_render_price() {
        let rendered = render(&PriceResponse { price: 1234 }).unwrap();
        assert_eq!(rendered, "{\n  \"price\": 1234\n}");
    }

    #[test]
    fn test_describe_confirmation() {
        assert_eq!(
            describe_confirmation(&ConfirmationStatus::Confirmed { height: 9 }),
            "confirmed at height 9"
        );
        assert_eq!(
            describe_confirmation(&ConfirmationStatus::Failed("out of gas".into())),
            "failed: out of gas"
        );
    }

    #[tokio::test]
    async fn test_local_handle_has_nothing_to_confirm() {
        let handle = OracleHandle::Local(LocalOracle::instantiate("owner", 7).unwrap());

        assert_eq!(handle.oracle().query_price().await.unwrap().price, 7);
        let receipt = handle.oracle().update_price(8).await.unwrap();
        assert!(handle.confirm(&receipt).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_simulated_owner_follows_environment() {
        use crate::blockchain::wallet::{ENV_LOCK, MNEMONIC_ENV_VAR, PRIVATE_KEY_ENV_VAR};

        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let config = OracleConfig::default();
        std::env::remove_var(MNEMONIC_ENV_VAR);
        std::env::remove_var(PRIVATE_KEY_ENV_VAR);

        let handle = OracleHandle::simulated(&config).unwrap();
        match handle.oracle().update_price(10).await.unwrap() {
            UpdateReceipt::Local(response) => {
                assert_eq!(response.attribute("owner"), Some(SIMULATOR_OWNER));
            }
            other => panic!("unexpected receipt: {other:?}"),
        }

        std::env::set_var(
            PRIVATE_KEY_ENV_VAR,
            "da02ede4c818876fe19b5a789f84e8591debd74fd4c134546c9cd7c95e9233a6",
        );
        let handle = OracleHandle::simulated(&config).unwrap();
        match handle.oracle().update_price(11).await.unwrap() {
            UpdateReceipt::Local(response) => assert_eq!(
                response.attribute("owner"),
                Some("terra1x46rqay4d3cssq8gxxvqz8xt6nwlz4td20k38v")
            ),
            other => panic!("unexpected receipt: {other:?}"),
        }

        std::env::set_var(PRIVATE_KEY_ENV_VAR, "zz");
        let err = OracleHandle::simulated(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid private key"));

        std::env::remove_var(PRIVATE_KEY_ENV_VAR);
    }
}
