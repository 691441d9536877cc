//! On-chain oracle contract accessed through the LCD.

use async_trait::async_trait;

use crate::blockchain::address::AccAddress;
use crate::blockchain::client::LcdClient;
use crate::blockchain::transaction::TxBuilder;
use crate::blockchain::types::{ChainError, Coin, ConfirmationStatus};
use crate::config::schema::RetryConfig;
use crate::oracle::msg::{ExecuteMsg, PriceResponse, QueryMsg};
use crate::oracle::types::{OracleError, OracleResult, UpdateReceipt};
use crate::oracle::PriceOracle;
use crate::resilience::retries::retry_with_backoff;

/// Handle to a deployed oracle contract.
///
/// Queries need only an LCD client; updates additionally need a signer.
#[derive(Debug, Clone)]
pub struct OracleContract {
    address: AccAddress,
    client: LcdClient,
    signer: Option<TxBuilder>,
    /// Coins attached to every `update_price`.
    funds: Vec<Coin>,
    retries: RetryConfig,
}

impl OracleContract {
    pub fn new(address: AccAddress, client: LcdClient, retries: RetryConfig) -> Self {
        Self {
            address,
            client,
            signer: None,
            funds: Vec::new(),
            retries,
        }
    }

    /// Attach a signer and the coins sent with each update.
    pub fn with_signer(mut self, signer: TxBuilder, funds: Vec<Coin>) -> Self {
        self.signer = Some(signer);
        self.funds = funds;
        self
    }

    /// Poll until `txhash` lands in a block.
    pub async fn wait_for_inclusion(&self, txhash: &str) -> OracleResult<ConfirmationStatus> {
        let signer = self.signer.as_ref().ok_or(OracleError::NoWallet)?;
        Ok(signer.wait_for_confirmation(txhash, &self.retries).await?)
    }
}

#[async_trait]
impl PriceOracle for OracleContract {
    async fn query_price(&self) -> OracleResult<PriceResponse> {
        let query = QueryMsg::QueryPrice {};
        let response = retry_with_backoff(
            &self.retries,
            "query_price",
            ChainError::is_transient,
            || self.client.query_contract::<_, PriceResponse>(&self.address, &query),
        )
        .await?;

        tracing::debug!(contract = %self.address, price = response.price, "Price queried");
        Ok(response)
    }

    async fn update_price(&self, price: u64) -> OracleResult<UpdateReceipt> {
        let signer = self.signer.as_ref().ok_or(OracleError::NoWallet)?;
        let msg = signer.execute_contract_msg(
            &self.address,
            &ExecuteMsg::UpdatePrice { price },
            &self.funds,
        )?;

        tracing::info!(
            contract = %self.address,
            sender = %signer.address(),
            price = price,
            funds = ?self.funds.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "Updating price"
        );
        let response = signer.sign_and_broadcast(vec![msg]).await?;
        Ok(UpdateReceipt::Broadcast(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::NetworkConfig;

    fn contract() -> OracleContract {
        let client = LcdClient::new(NetworkConfig {
            lcd_url: "http://127.0.0.1:9".into(),
            ..NetworkConfig::default()
        })
        .unwrap();
        let address = "terra1lyla4th5dtx85chq5qqht77kfwywgn42jgvjgs".parse().unwrap();
        OracleContract::new(address, client, RetryConfig::default())
    }

    #[tokio::test]
    async fn test_update_without_wallet() {
        let err = contract().update_price(5).await.unwrap_err();
        assert!(matches!(err, OracleError::NoWallet));
    }

    #[tokio::test]
    async fn test_wait_without_wallet() {
        let err = contract().wait_for_inclusion("AB").await.unwrap_err();
        assert!(matches!(err, OracleError::NoWallet));
    }
}
