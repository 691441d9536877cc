//! Shared fixtures for integration tests against a mocked LCD.

#![allow(dead_code)]

use oracle_price::blockchain::{AccAddress, LcdClient, TxBuilder, Wallet};
use oracle_price::config::schema::{FeeConfig, NetworkConfig, RetryConfig};
use oracle_price::OracleContract;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// LocalTerra `test1` key and address.
pub const TEST_PRIVATE_KEY: &str = "da02ede4c818876fe19b5a789f84e8591debd74fd4c134546c9cd7c95e9233a6";
pub const TEST_ADDRESS: &str = "terra1x46rqay4d3cssq8gxxvqz8xt6nwlz4td20k38v";
pub const ORACLE_CONTRACT: &str = "terra1lyla4th5dtx85chq5qqht77kfwywgn42jgvjgs";
pub const CHAIN_ID: &str = "localterra";

pub fn network_config(uri: &str) -> NetworkConfig {
    NetworkConfig {
        chain_id: CHAIN_ID.to_string(),
        lcd_url: uri.to_string(),
        request_timeout_secs: 2,
        ..NetworkConfig::default()
    }
}

pub fn fast_retries() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        base_delay_ms: 1,
        max_delay_ms: 5,
        confirm_attempts: 4,
    }
}

pub fn test_wallet() -> Wallet {
    Wallet::from_private_key(TEST_PRIVATE_KEY, "terra").unwrap()
}

pub fn contract_address() -> AccAddress {
    ORACLE_CONTRACT.parse().unwrap()
}

/// Read-only contract handle.
pub fn query_contract(network: NetworkConfig) -> OracleContract {
    let client = LcdClient::new(network).unwrap();
    OracleContract::new(contract_address(), client, fast_retries())
}

/// Contract handle able to sign updates as `test1`.
pub fn signing_contract(network: NetworkConfig, fees: FeeConfig) -> OracleContract {
    let client = LcdClient::new(network).unwrap();
    let signer = TxBuilder::new(client.clone(), test_wallet(), fees);
    OracleContract::new(contract_address(), client, fast_retries())
        .with_signer(signer, vec!["100000uluna".parse().unwrap()])
}

pub async fn mount_account(server: &MockServer, account_number: u64, sequence: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/cosmos/auth/v1beta1/accounts/{}", TEST_ADDRESS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account": {
                "@type": "/cosmos.auth.v1beta1.BaseAccount",
                "address": TEST_ADDRESS,
                "pub_key": null,
                "account_number": account_number.to_string(),
                "sequence": sequence.to_string()
            }
        })))
        .mount(server)
        .await;
}

pub async fn mount_simulate(server: &MockServer, gas_used: u64) {
    Mock::given(method("POST"))
        .and(path("/cosmos/tx/v1beta1/simulate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "gas_info": { "gas_wanted": "0", "gas_used": gas_used.to_string() },
            "result": { "data": "", "log": "", "events": [] }
        })))
        .mount(server)
        .await;
}

pub fn tx_response_json(txhash: &str, height: u64, code: u32, raw_log: &str) -> serde_json::Value {
    json!({
        "tx_response": {
            "height": height.to_string(),
            "txhash": txhash,
            "codespace": if code == 0 { "" } else { "sdk" },
            "code": code,
            "data": "",
            "raw_log": raw_log,
            "logs": [],
            "info": "",
            "gas_wanted": "140000",
            "gas_used": "98000",
            "tx": null,
            "timestamp": ""
        }
    })
}
