//! Gateway error taxonomy
//!
//! Adapter-boundary failures are *not* represented here: a provider call
//! that times out or returns garbage yields a `ProviderFailure` value from
//! the adapter itself, and the caller branches on it. `GatewayError` covers
//! everything that is a genuine fault of the gateway: configuration problems
//! and storage failures.

use thiserror::Error;

use crate::store::StoreError;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// No driver is bound for the given subacquirer code. Raised at registry
    /// resolution; a configuration-level fault, not a per-request transient.
    #[error("subacquirer {code} not supported")]
    UnsupportedSubacquirer { code: String },

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl GatewayError {
    /// Transient errors are retried by the webhook job runner; everything
    /// else fails the job immediately.
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::Store(e) if e.is_transient())
    }
}
