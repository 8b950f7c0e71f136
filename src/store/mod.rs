//! Storage abstraction
//!
//! The gateway core does not pick a persistence technology; it talks to
//! these traits. The in-memory implementation in [`memory`] backs the demo
//! binary and the test suite; a SQL-backed implementation would slot in the
//! same way.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{PixTransaction, Subacquirer, Withdrawal};

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Transient storage failure; the webhook job runner retries these.
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }
}

#[async_trait]
pub trait SubacquirerStore: Send + Sync {
    async fn insert(&self, subacquirer: Subacquirer) -> Result<(), StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subacquirer>, StoreError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Subacquirer>, StoreError>;
}

#[async_trait]
pub trait PixTransactionStore: Send + Sync {
    async fn insert(&self, transaction: PixTransaction) -> Result<(), StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PixTransaction>, StoreError>;
    /// Replace the stored record; `NotFound` if it was never inserted.
    async fn update(&self, transaction: &PixTransaction) -> Result<(), StoreError>;
}

#[async_trait]
pub trait WithdrawalStore: Send + Sync {
    async fn insert(&self, withdrawal: Withdrawal) -> Result<(), StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Withdrawal>, StoreError>;
    async fn update(&self, withdrawal: &Withdrawal) -> Result<(), StoreError>;
}
