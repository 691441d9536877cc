//! Client library for a CosmWasm price oracle.

pub mod app;
pub mod blockchain;
pub mod config;
pub mod observability;
pub mod oracle;
pub mod resilience;

pub use config::schema::OracleConfig;
pub use oracle::{OracleContract, PriceOracle};
