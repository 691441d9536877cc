//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Read-only LCD request:
//!     → blockchain::client (per-request timeout, endpoint failover)
//!     → On transient failure: retries.rs (retry with backoff)
//!
//! Broadcast transaction:
//!     → single attempt
//!     → confirmation polling paced by backoff.rs
//! ```

pub mod backoff;
pub mod retries;

pub use backoff::calculate_backoff;
pub use retries::retry_with_backoff;
