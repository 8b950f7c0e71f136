//! PIX payment and withdrawal gateway core.
//!
//! Routes payment operations to third-party subacquirers with incompatible
//! wire formats, normalizes their statuses onto canonical lifecycles, and
//! reconciles asynchronous webhook notifications back into transaction
//! state — idempotently and strictly forward.

pub mod actions;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod subacquirers;
pub mod webhooks;

pub use config::{Config, GatewayMode};
pub use error::{GatewayError, GatewayResult};
