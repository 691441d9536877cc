//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, gas adjustment >= 1)
//! - Check that URLs, denoms, coins and addresses are well-formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: OracleConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::blockchain::address::AccAddress;
use crate::blockchain::types::{is_valid_denom, parse_coins};
use crate::config::schema::OracleConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a deserialized configuration.
pub fn validate_config(config: &OracleConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let network = &config.network;
    if network.chain_id.trim().is_empty() {
        errors.push(ValidationError::new("network.chain_id", "must not be empty"));
    }
    if let Err(e) = url::Url::parse(&network.lcd_url) {
        errors.push(ValidationError::new(
            "network.lcd_url",
            format!("invalid URL '{}': {}", network.lcd_url, e),
        ));
    }
    for failover in &network.failover_urls {
        if let Err(e) = url::Url::parse(failover) {
            errors.push(ValidationError::new(
                "network.failover_urls",
                format!("invalid URL '{}': {}", failover, e),
            ));
        }
    }
    if network.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "network.request_timeout_secs",
            "must be greater than 0",
        ));
    }

    let fees = &config.fees;
    if !fees.gas_price.is_finite() || fees.gas_price < 0.0 {
        errors.push(ValidationError::new(
            "fees.gas_price",
            "must be a non-negative number",
        ));
    }
    if !fees.gas_adjustment.is_finite() || fees.gas_adjustment < 1.0 {
        errors.push(ValidationError::new(
            "fees.gas_adjustment",
            "must be at least 1.0",
        ));
    }
    if !is_valid_denom(&fees.fee_denom) {
        errors.push(ValidationError::new(
            "fees.fee_denom",
            format!("invalid denom '{}'", fees.fee_denom),
        ));
    }
    if fees.gas_limit == Some(0) {
        errors.push(ValidationError::new("fees.gas_limit", "must be greater than 0"));
    }

    let oracle = &config.oracle;
    if let Err(e) = AccAddress::parse_with_prefix(&oracle.address, &network.address_prefix) {
        errors.push(ValidationError::new("oracle.address", e.to_string()));
    }
    if let Err(e) = parse_coins(&oracle.update_funds) {
        errors.push(ValidationError::new("oracle.update_funds", e));
    }

    let retries = &config.retries;
    if retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be at least 1"));
    }
    if retries.confirm_attempts == 0 {
        errors.push(ValidationError::new(
            "retries.confirm_attempts",
            "must be at least 1",
        ));
    }
    if retries.base_delay_ms > retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
