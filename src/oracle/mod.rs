//! Price oracle subsystem.
//!
//! # Data Flow
//! ```text
//! get-price:  PriceOracle::query_price  → QueryMsg::QueryPrice {}
//!                 → contract.rs (LCD smart query, retried)  | simulator.rs
//!                 → PriceResponse
//!
//! set-price:  PriceOracle::update_price → ExecuteMsg::UpdatePrice { price }
//!                 → contract.rs (MsgExecuteContract + funds, signed, broadcast)
//!                 | simulator.rs (owner check, attributes)
//!                 → UpdateReceipt
//! ```

pub mod contract;
pub mod msg;
pub mod simulator;
pub mod types;

use async_trait::async_trait;

pub use contract::OracleContract;
pub use msg::{ExecuteMsg, InstantiateMsg, PriceResponse, QueryMsg};
pub use simulator::{LocalOracle, OracleSimulator};
pub use types::{OracleError, OracleResult, UpdateReceipt};

/// Read and write access to a single price value.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Current price stored by the oracle.
    async fn query_price(&self) -> OracleResult<PriceResponse>;

    /// Replace the stored price. Only the contract owner may do this.
    async fn update_price(&self, price: u64) -> OracleResult<UpdateReceipt>;
}
