//! In-memory store implementations backed by `tokio::sync::RwLock` maps.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{PixTransaction, Subacquirer, Withdrawal};
use crate::store::{PixTransactionStore, StoreError, SubacquirerStore, WithdrawalStore};

#[derive(Default)]
pub struct InMemorySubacquirerStore {
    records: RwLock<HashMap<Uuid, Subacquirer>>,
}

impl InMemorySubacquirerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubacquirerStore for InMemorySubacquirerStore {
    async fn insert(&self, subacquirer: Subacquirer) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(subacquirer.id, subacquirer);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subacquirer>, StoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Subacquirer>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|s| s.code == code)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryPixStore {
    records: RwLock<HashMap<Uuid, PixTransaction>>,
}

impl InMemoryPixStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PixTransactionStore for InMemoryPixStore {
    async fn insert(&self, transaction: PixTransaction) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(transaction.id, transaction);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PixTransaction>, StoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn update(&self, transaction: &PixTransaction) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(&transaction.id) {
            Some(existing) => {
                *existing = transaction.clone();
                Ok(())
            }
            None => Err(StoreError::not_found("pix transaction", transaction.id)),
        }
    }
}

#[derive(Default)]
pub struct InMemoryWithdrawalStore {
    records: RwLock<HashMap<Uuid, Withdrawal>>,
}

impl InMemoryWithdrawalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WithdrawalStore for InMemoryWithdrawalStore {
    async fn insert(&self, withdrawal: Withdrawal) -> Result<(), StoreError> {
        self.records.write().await.insert(withdrawal.id, withdrawal);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Withdrawal>, StoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn update(&self, withdrawal: &Withdrawal) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(&withdrawal.id) {
            Some(existing) => {
                *existing = withdrawal.clone();
                Ok(())
            }
            None => Err(StoreError::not_found("withdrawal", withdrawal.id)),
        }
    }
}
