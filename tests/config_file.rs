//! Loading configuration files from disk.

use std::io::Write;

use oracle_price::app::{apply_overrides, Overrides};
use oracle_price::config::schema::{BroadcastMode, LogFormat, WasmApi};
use oracle_price::config::{load_config, read_or_default, ConfigError};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_full_config_file() {
    let file = write_config(
        r#"
        [network]
        chain_id = "columbus-5"
        lcd_url = "https://lcd.terra.dev"
        failover_urls = ["https://terra-classic-lcd.publicnode.com"]
        request_timeout_secs = 20
        address_prefix = "terra"
        wasm_api = "terra_v1beta1"
        broadcast_mode = "async"

        [fees]
        gas_price = 28.325
        fee_denom = "uluna"
        gas_adjustment = 1.2
        memo = "price feed"

        [oracle]
        address = "terra1lyla4th5dtx85chq5qqht77kfwywgn42jgvjgs"
        update_funds = "100000uluna"

        [wallet]
        coin_type = 330
        index = 2

        [retries]
        max_attempts = 5
        base_delay_ms = 250
        max_delay_ms = 4000
        confirm_attempts = 20

        [observability]
        log_level = "debug"
        log_format = "json"
        "#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.network.chain_id, "columbus-5");
    assert_eq!(config.network.failover_urls.len(), 1);
    assert_eq!(config.network.wasm_api, WasmApi::TerraV1beta1);
    assert_eq!(config.network.broadcast_mode, BroadcastMode::Async);
    assert_eq!(config.fees.memo, "price feed");
    assert_eq!(config.wallet.index, 2);
    assert_eq!(config.retries.confirm_attempts, 20);
    assert_eq!(config.observability.log_format, LogFormat::Json);
}

#[test]
fn test_invalid_config_file_reports_every_problem() {
    let file = write_config(
        r#"
        [network]
        lcd_url = "bombay-lcd"

        [oracle]
        address = "terra1notanaddress"
        update_funds = "lots"
        "#,
    );

    match load_config(file.path()).unwrap_err() {
        ConfigError::Validation(errors) => {
            let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
            assert_eq!(
                fields,
                vec!["network.lcd_url", "oracle.address", "oracle.update_funds"]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_enum_value_is_a_parse_error() {
    let file = write_config(
        r#"
        [network]
        wasm_api = "secret_compute"
        "#,
    );
    assert!(matches!(
        load_config(file.path()).unwrap_err(),
        ConfigError::Parse(_)
    ));
}

#[test]
fn test_override_replaces_invalid_file_value() {
    let file = write_config(
        r#"
        [oracle]
        address = "terra1notanaddress"
        "#,
    );

    let config = read_or_default(Some(file.path())).unwrap();
    let overrides = Overrides {
        contract: Some("terra1lyla4th5dtx85chq5qqht77kfwywgn42jgvjgs".into()),
        ..Overrides::default()
    };
    let config = apply_overrides(config, &overrides).unwrap();
    assert_eq!(config.oracle.address, "terra1lyla4th5dtx85chq5qqht77kfwywgn42jgvjgs");

    let config = read_or_default(Some(file.path())).unwrap();
    assert!(apply_overrides(config, &Overrides::default()).is_err());
}
