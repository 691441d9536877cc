//! Transaction building, signing, broadcasting and confirmation monitoring.
//!
//! # Responsibilities
//! - Wrap contract calls in `MsgExecuteContract`
//! - Estimate gas by simulation and derive the fee
//! - Sign with `SIGN_MODE_DIRECT` and broadcast
//! - Poll for inclusion with backoff

use prost::Message;
use serde::Serialize;

use crate::blockchain::address::AccAddress;
use crate::blockchain::client::LcdClient;
use crate::blockchain::proto::{
    Any, AuthInfo, Fee, ModeInfo, MsgExecuteContract, ProtoCoin, Secp256k1PubKey, SignDoc,
    SignerInfo, TxBody, TxRaw, SECP256K1_PUBKEY_TYPE_URL,
};
use crate::blockchain::types::{
    AccountInfo, ChainError, ChainResult, Coin, ConfirmationStatus, FeeConfig, TxResponse,
};
use crate::blockchain::wallet::Wallet;
use crate::config::schema::RetryConfig;
use crate::resilience::backoff::backoff_for;

/// Builds, signs and broadcasts transactions for one wallet.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    client: LcdClient,
    wallet: Wallet,
    fees: FeeConfig,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(client: LcdClient, wallet: Wallet, fees: FeeConfig) -> Self {
        Self {
            client,
            wallet,
            fees,
        }
    }

    /// Wrap a contract execute message sent from this wallet.
    pub fn execute_contract_msg<M: Serialize + ?Sized>(
        &self,
        contract: &AccAddress,
        msg: &M,
        funds: &[Coin],
    ) -> ChainResult<Any> {
        let msg = serde_json::to_vec(msg)
            .map_err(|e| ChainError::Decode(format!("Failed to encode execute msg: {}", e)))?;
        let execute = MsgExecuteContract {
            sender: self.wallet.address().to_string(),
            contract: contract.to_string(),
            msg,
            funds: funds.iter().map(ProtoCoin::from).collect(),
        };
        Ok(Any::pack(
            self.client.config().wasm_api.execute_type_url(),
            &execute,
        ))
    }

    /// Sign `messages` and broadcast them in one transaction.
    ///
    /// A non-zero result code from the node is returned as
    /// `ChainError::TxFailed`.
    pub async fn sign_and_broadcast(&self, messages: Vec<Any>) -> ChainResult<TxResponse> {
        let account = self.client.get_account(self.wallet.address()).await?;
        let body = TxBody {
            messages,
            memo: self.fees.memo.clone(),
            timeout_height: 0,
        };

        let gas_limit = match self.fees.gas_limit {
            Some(fixed) => fixed,
            None => self.estimate_gas(&body, account).await?,
        };
        let fee = compute_fee(gas_limit, self.fees.gas_price, &self.fees.fee_denom);

        tracing::info!(
            sender = %self.wallet.address(),
            account_number = account.account_number,
            sequence = account.sequence,
            gas_limit = gas_limit,
            fee = %fee,
            "Signing transaction"
        );

        let tx_bytes = self.sign(&body, account, gas_limit, &fee)?;
        let response = self.client.broadcast(&tx_bytes).await?.into_result()?;

        tracing::info!(
            txhash = %response.txhash,
            height = response.height,
            "Transaction broadcast"
        );
        Ok(response)
    }

    /// Simulate with an empty signature and scale by the gas adjustment.
    async fn estimate_gas(&self, body: &TxBody, account: AccountInfo) -> ChainResult<u64> {
        let zero_fee = Coin::new(0, self.fees.fee_denom.clone());
        let auth_info = self.auth_info(account.sequence, 0, &zero_fee);
        let tx = TxRaw {
            body_bytes: body.encode_to_vec(),
            auth_info_bytes: auth_info.encode_to_vec(),
            signatures: vec![Vec::new()],
        };
        let gas_used = self.client.simulate(&tx.encode_to_vec()).await?;
        let gas_limit = adjust_gas(gas_used, self.fees.gas_adjustment);

        tracing::debug!(gas_used = gas_used, gas_limit = gas_limit, "Gas estimated");
        Ok(gas_limit)
    }

    fn auth_info(&self, sequence: u64, gas_limit: u64, fee: &Coin) -> AuthInfo {
        let public_key = Secp256k1PubKey {
            key: self.wallet.public_key().to_vec(),
        };
        AuthInfo {
            signer_infos: vec![SignerInfo {
                public_key: Some(Any::pack(SECP256K1_PUBKEY_TYPE_URL, &public_key)),
                mode_info: Some(ModeInfo::direct()),
                sequence,
            }],
            fee: Some(Fee {
                amount: if fee.amount == 0 {
                    Vec::new()
                } else {
                    vec![ProtoCoin::from(fee)]
                },
                gas_limit,
                payer: String::new(),
                granter: String::new(),
            }),
        }
    }

    /// Produce signed `TxRaw` bytes.
    fn sign(
        &self,
        body: &TxBody,
        account: AccountInfo,
        gas_limit: u64,
        fee: &Coin,
    ) -> ChainResult<Vec<u8>> {
        let body_bytes = body.encode_to_vec();
        let auth_info_bytes = self.auth_info(account.sequence, gas_limit, fee).encode_to_vec();
        let sign_doc = SignDoc {
            body_bytes: body_bytes.clone(),
            auth_info_bytes: auth_info_bytes.clone(),
            chain_id: self.client.config().chain_id.clone(),
            account_number: account.account_number,
        };
        let signature = self.wallet.sign(&sign_doc.encode_to_vec());

        Ok(TxRaw {
            body_bytes,
            auth_info_bytes,
            signatures: vec![signature],
        }
        .encode_to_vec())
    }

    /// Poll until the transaction is in a block or attempts run out.
    pub async fn wait_for_confirmation(
        &self,
        txhash: &str,
        policy: &RetryConfig,
    ) -> ChainResult<ConfirmationStatus> {
        let attempts = policy.confirm_attempts.max(1);

        for attempt in 1..=attempts {
            tokio::time::sleep(backoff_for(policy, attempt)).await;

            match self.client.get_tx(txhash).await {
                Ok(Some(tx)) if tx.is_success() => {
                    tracing::info!(txhash = %txhash, height = tx.height, "Transaction confirmed");
                    return Ok(ConfirmationStatus::Confirmed { height: tx.height });
                }
                Ok(Some(tx)) => {
                    tracing::warn!(txhash = %txhash, code = tx.code, "Transaction failed in block");
                    return Ok(ConfirmationStatus::Failed(tx.raw_log));
                }
                Ok(None) => {
                    tracing::debug!(txhash = %txhash, attempt = attempt, "Transaction pending");
                }
                Err(e) if e.is_transient() => {
                    tracing::warn!(txhash = %txhash, error = %e, "Lookup failed, will poll again");
                }
                Err(e) => return Err(e),
            }
        }

        Err(ChainError::ConfirmationTimeout {
            txhash: txhash.to_string(),
            attempts,
        })
    }

    /// Get the wallet address.
    pub fn address(&self) -> &AccAddress {
        self.wallet.address()
    }
}

/// `ceil(gas_limit * gas_price)` in `denom`.
pub fn compute_fee(gas_limit: u64, gas_price: f64, denom: &str) -> Coin {
    let amount = (gas_limit as f64 * gas_price).ceil();
    Coin::new(amount.max(0.0) as u128, denom)
}

/// Scale simulated gas by the adjustment factor, rounding up.
pub fn adjust_gas(gas_used: u64, adjustment: f64) -> u64 {
    (gas_used as f64 * adjustment).ceil() as u64
}
