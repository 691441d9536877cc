//! LCD (REST) client with timeout, failover and error handling.
//!
//! # Responsibilities
//! - Talk to the chain's LCD endpoints (primary + failovers)
//! - Query chain state (node info, accounts, txs, contract smart queries)
//! - Simulate and broadcast signed transactions
//! - Handle timeouts and network errors gracefully

use std::time::Duration;

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::time::timeout;
use url::Url;

use crate::blockchain::address::AccAddress;
use crate::blockchain::types::{
    AccountInfo, ChainError, ChainId, ChainResult, NetworkConfig, TxResponse, WasmApi,
};

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// LCD client wrapper with failover support.
#[derive(Clone)]
pub struct LcdClient {
    http: reqwest::Client,
    /// Primary endpoint followed by failovers.
    endpoints: Vec<Url>,
    config: NetworkConfig,
    timeout_duration: Duration,
}

impl LcdClient {
    /// Create a new LCD client. No request is made until the first call.
    pub fn new(config: NetworkConfig) -> ChainResult<Self> {
        let timeout_duration = Duration::from_secs(config.request_timeout_secs);
        let mut endpoints = Vec::with_capacity(1 + config.failover_urls.len());

        let primary: Url = config.lcd_url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid LCD URL '{}': {}", config.lcd_url, e))
        })?;
        endpoints.push(primary);

        for url_str in &config.failover_urls {
            match url_str.parse() {
                Ok(url) => endpoints.push(url),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover LCD URL"),
            }
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("oracle-price/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChainError::Rpc(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            lcd_url = %config.lcd_url,
            failovers = endpoints.len() - 1,
            chain_id = %config.chain_id,
            "LCD client initialized"
        );

        Ok(Self {
            http,
            endpoints,
            config,
            timeout_duration,
        })
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> ChainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(ChainError::ChainMismatch {
                expected: self.config.chain_id.clone(),
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the network name reported by the node.
    pub async fn get_chain_id(&self) -> ChainResult<ChainId> {
        let body = self
            .get("/cosmos/base/tendermint/v1beta1/node_info", &[])
            .await?
            .ok_or_else(|| not_found("node info"))?;
        let network = body
            .get("default_node_info")
            .or_else(|| body.get("node_info"))
            .and_then(|info| info.get("network"))
            .and_then(Value::as_str)
            .ok_or_else(|| ChainError::Decode("node_info response has no network".into()))?;
        Ok(ChainId(network.to_string()))
    }

    /// Fetch the account number and sequence for signing.
    pub async fn get_account(&self, address: &AccAddress) -> ChainResult<AccountInfo> {
        let path = format!("/cosmos/auth/v1beta1/accounts/{}", address);
        let body = self.get(&path, &[]).await?.ok_or_else(|| ChainError::Http {
            status: StatusCode::NOT_FOUND.as_u16(),
            body: format!("account {} not found on chain; fund it first", address),
        })?;
        parse_account(&body)
    }

    /// Run a smart query against a contract and decode its JSON result.
    pub async fn query_contract<Q, R>(&self, contract: &AccAddress, query: &Q) -> ChainResult<R>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let msg = serde_json::to_vec(query)
            .map_err(|e| ChainError::Decode(format!("Failed to encode query: {}", e)))?;

        let (body, field) = match self.config.wasm_api {
            WasmApi::TerraV1beta1 => {
                let path = format!("/terra/wasm/v1beta1/contracts/{}/store", contract);
                let body = self
                    .get(&path, &[("query_msg", STANDARD.encode(&msg))])
                    .await?;
                (body, "query_result")
            }
            WasmApi::CosmwasmV1 => {
                let path = format!(
                    "/cosmwasm/wasm/v1/contract/{}/smart/{}",
                    contract,
                    URL_SAFE.encode(&msg)
                );
                (self.get(&path, &[]).await?, "data")
            }
        };

        let body = body.ok_or_else(|| not_found(&format!("contract {}", contract)))?;
        let result = body
            .get(field)
            .cloned()
            .ok_or_else(|| ChainError::Decode(format!("query response has no '{}'", field)))?;
        serde_json::from_value(result)
            .map_err(|e| ChainError::Decode(format!("Unexpected query result: {}", e)))
    }

    /// Simulate a transaction and return the gas it used.
    pub async fn simulate(&self, tx_bytes: &[u8]) -> ChainResult<u64> {
        let body = self
            .post(
                "/cosmos/tx/v1beta1/simulate",
                &json!({ "tx_bytes": STANDARD.encode(tx_bytes) }),
            )
            .await?
            .ok_or_else(|| not_found("simulate endpoint"))?;
        let gas_used = body
            .get("gas_info")
            .and_then(|info| info.get("gas_used"))
            .ok_or_else(|| ChainError::Decode("simulate response has no gas_info".into()))?;
        json_u64(gas_used)
            .ok_or_else(|| ChainError::Decode(format!("invalid gas_used: {}", gas_used)))
    }

    /// Broadcast a signed transaction using the configured mode.
    ///
    /// The returned response may carry a non-zero `code`; callers decide
    /// whether that is an error.
    pub async fn broadcast(&self, tx_bytes: &[u8]) -> ChainResult<TxResponse> {
        let body = self
            .post(
                "/cosmos/tx/v1beta1/txs",
                &json!({
                    "tx_bytes": STANDARD.encode(tx_bytes),
                    "mode": self.config.broadcast_mode.as_proto_str(),
                }),
            )
            .await?
            .ok_or_else(|| not_found("broadcast endpoint"))?;
        parse_tx_response(body)
    }

    /// Look up a transaction by hash; `None` while it is not in a block.
    pub async fn get_tx(&self, txhash: &str) -> ChainResult<Option<TxResponse>> {
        let path = format!("/cosmos/tx/v1beta1/txs/{}", txhash);
        match self.get(&path, &[]).await? {
            Some(body) => parse_tx_response(body).map(Some),
            None => Ok(None),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> ChainResult<Option<Value>> {
        self.request(Method::GET, path, query, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> ChainResult<Option<Value>> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    /// Send a request to each endpoint in turn until one answers.
    ///
    /// Transport errors, timeouts and gateway errors move on to the next
    /// endpoint; any other answer is final. 404 maps to `Ok(None)`.
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> ChainResult<Option<Value>> {
        let mut last_error = None;

        for (i, base) in self.endpoints.iter().enumerate() {
            let url = endpoint_url(base, path)?;
            let mut builder = self.http.request(method.clone(), url).query(query);
            if let Some(body) = body {
                builder = builder.json(body);
            }

            let attempt = async {
                let response = builder.send().await?;
                let status = response.status();
                let text = response.text().await?;
                Ok::<_, reqwest::Error>((status, text))
            };

            match timeout(self.timeout_duration, attempt).await {
                Ok(Ok((status, text))) if is_gateway_error(status) => {
                    tracing::warn!(endpoint_idx = i, %status, path, "LCD gateway error, trying next endpoint");
                    last_error = Some(http_error(status, &text));
                }
                Ok(Ok((status, text))) => return read_body(status, &text),
                Ok(Err(e)) => {
                    tracing::warn!(endpoint_idx = i, error = %e, path, "LCD error, trying next endpoint");
                    last_error = Some(ChainError::Rpc(e.to_string()));
                }
                Err(_) => {
                    tracing::warn!(endpoint_idx = i, path, "LCD timeout, trying next endpoint");
                    last_error = Some(ChainError::Timeout(self.config.request_timeout_secs));
                }
            }
        }

        Err(match last_error {
            Some(err @ ChainError::Timeout(_)) if self.endpoints.len() == 1 => err,
            Some(err @ ChainError::Http { .. }) if self.endpoints.len() == 1 => err,
            Some(err) => ChainError::Rpc(format!("All LCD endpoints failed, last error: {}", err)),
            None => ChainError::Rpc("No LCD endpoints configured".to_string()),
        })
    }
}

impl std::fmt::Debug for LcdClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LcdClient")
            .field("lcd_url", &self.config.lcd_url)
            .field("chain_id", &self.config.chain_id)
            .field("endpoints", &self.endpoints.len())
            .field("timeout_secs", &self.config.request_timeout_secs)
            .finish()
    }
}

/// Append an absolute API path to a base URL, keeping any base path prefix.
fn endpoint_url(base: &Url, path: &str) -> ChainResult<Url> {
    let joined = format!("{}{}", base.as_str().trim_end_matches('/'), path);
    joined
        .parse()
        .map_err(|e| ChainError::Rpc(format!("Invalid request URL '{}': {}", joined, e)))
}

fn is_gateway_error(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

fn http_error(status: StatusCode, text: &str) -> ChainError {
    let mut body = text.trim().to_string();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    ChainError::Http {
        status: status.as_u16(),
        body,
    }
}

fn read_body(status: StatusCode, text: &str) -> ChainResult<Option<Value>> {
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(http_error(status, text));
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| ChainError::Decode(format!("Invalid JSON from LCD: {}", e)))
}

fn not_found(what: &str) -> ChainError {
    ChainError::Http {
        status: StatusCode::NOT_FOUND.as_u16(),
        body: format!("{} not found", what),
    }
}

/// Read a Cosmos integer that may be encoded as a string or a number.
fn json_u64(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// Extract account number and sequence, looking through vesting wrappers.
fn parse_account(body: &Value) -> ChainResult<AccountInfo> {
    let account = body
        .get("account")
        .ok_or_else(|| ChainError::Decode("account response has no 'account'".into()))?;
    let base = account
        .get("base_vesting_account")
        .and_then(|v| v.get("base_account"))
        .or_else(|| account.get("base_account"))
        .unwrap_or(account);

    let account_number = base
        .get("account_number")
        .and_then(json_u64)
        .ok_or_else(|| ChainError::Decode("account has no account_number".into()))?;
    let sequence = base.get("sequence").and_then(json_u64).unwrap_or(0);

    Ok(AccountInfo {
        account_number,
        sequence,
    })
}

fn parse_tx_response(body: Value) -> ChainResult<TxResponse> {
    let tx_response = body
        .get("tx_response")
        .cloned()
        .ok_or_else(|| ChainError::Decode("response has no tx_response".into()))?;
    serde_json::from_value(tx_response)
        .map_err(|e| ChainError::Decode(format!("Invalid tx_response: {}", e)))
}
