//! Webhook reconciliation engine
//!
//! Applies an inbound provider notification to its aggregate. Safe to invoke
//! any number of times with the same or stale payload: duplicates and
//! notifications against completed transactions are discarded, and writes
//! for the same aggregate are serialized through a per-id mutex so the
//! compare-and-update is atomic with respect to concurrent deliveries.

use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{GatewayError, GatewayResult};
use crate::models::{Document, Subacquirer};
use crate::store::{PixTransactionStore, StoreError, SubacquirerStore, WithdrawalStore};
use crate::subacquirers::SubacquirerRegistry;

/// What the engine did with a notification. Everything except `Applied` is a
/// deliberate no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Applied,
    /// Payload carried no status field at all.
    Malformed,
    /// Parsed status equals the current status.
    Duplicate,
    /// Aggregate already reached a terminal status.
    AlreadyFinal,
}

/// One async mutex per aggregate id, created on first use.
#[derive(Default)]
struct KeyedLocks {
    inner: StdMutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyedLocks {
    async fn acquire(&self, id: Uuid) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().expect("lock map poisoned");
            map.entry(id)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

pub struct ReconcileEngine {
    pix_store: Arc<dyn PixTransactionStore>,
    withdrawal_store: Arc<dyn WithdrawalStore>,
    subacquirer_store: Arc<dyn SubacquirerStore>,
    registry: Arc<SubacquirerRegistry>,
    locks: KeyedLocks,
}

impl ReconcileEngine {
    pub fn new(
        pix_store: Arc<dyn PixTransactionStore>,
        withdrawal_store: Arc<dyn WithdrawalStore>,
        subacquirer_store: Arc<dyn SubacquirerStore>,
        registry: Arc<SubacquirerRegistry>,
    ) -> Self {
        Self {
            pix_store,
            withdrawal_store,
            subacquirer_store,
            registry,
            locks: KeyedLocks::default(),
        }
    }

    async fn subacquirer_for(&self, id: Uuid) -> GatewayResult<Subacquirer> {
        self.subacquirer_store
            .find_by_id(id)
            .await?
            .ok_or_else(|| GatewayError::Store(StoreError::not_found("subacquirer", id)))
    }

    pub async fn reconcile_pix(
        &self,
        transaction_id: Uuid,
        payload: &Value,
    ) -> GatewayResult<ReconcileOutcome> {
        let _guard = self.locks.acquire(transaction_id).await;

        let mut transaction = self
            .pix_store
            .find_by_id(transaction_id)
            .await?
            .ok_or_else(|| {
                GatewayError::Store(StoreError::not_found("pix transaction", transaction_id))
            })?;

        let subacquirer = self.subacquirer_for(transaction.subacquirer_id).await?;
        let driver = self.registry.resolve(&subacquirer)?;
        let parsed = driver.parse_pix_webhook(payload);

        let Some(status) = parsed.status else {
            warn!(
                transaction_id = %transaction.transaction_id,
                "pix webhook without status field discarded"
            );
            return Ok(ReconcileOutcome::Malformed);
        };

        if status == transaction.status {
            info!(
                transaction_id = %transaction.transaction_id,
                status = ?status,
                "duplicate pix webhook ignored"
            );
            return Ok(ReconcileOutcome::Duplicate);
        }

        if transaction.status.is_terminal() {
            info!(
                transaction_id = %transaction.transaction_id,
                current = ?transaction.status,
                incoming = ?status,
                "pix webhook for finalized transaction ignored"
            );
            return Ok(ReconcileOutcome::AlreadyFinal);
        }

        transaction.status = status;
        if status.is_terminal_success() && transaction.paid_at.is_none() {
            transaction.paid_at = Some(parsed.paid_at.unwrap_or_else(Utc::now));
        }
        if let Some(name) = parsed.payer_name {
            transaction.payer_name = Some(name);
        }
        if let Some(document) = parsed.payer_document {
            transaction.payer_document = Some(Document::new(&document));
        }
        transaction.webhook_payload = Some(payload.clone());

        self.pix_store.update(&transaction).await?;

        info!(
            transaction_id = %transaction.transaction_id,
            status = ?status,
            "pix webhook processed"
        );
        Ok(ReconcileOutcome::Applied)
    }

    pub async fn reconcile_withdrawal(
        &self,
        withdrawal_id: Uuid,
        payload: &Value,
    ) -> GatewayResult<ReconcileOutcome> {
        let _guard = self.locks.acquire(withdrawal_id).await;

        let mut withdrawal = self
            .withdrawal_store
            .find_by_id(withdrawal_id)
            .await?
            .ok_or_else(|| {
                GatewayError::Store(StoreError::not_found("withdrawal", withdrawal_id))
            })?;

        let subacquirer = self.subacquirer_for(withdrawal.subacquirer_id).await?;
        let driver = self.registry.resolve(&subacquirer)?;
        let parsed = driver.parse_withdrawal_webhook(payload);

        let Some(status) = parsed.status else {
            warn!(
                withdrawal_id = %withdrawal.withdrawal_id,
                "withdrawal webhook without status field discarded"
            );
            return Ok(ReconcileOutcome::Malformed);
        };

        if status == withdrawal.status {
            info!(
                withdrawal_id = %withdrawal.withdrawal_id,
                status = ?status,
                "duplicate withdrawal webhook ignored"
            );
            return Ok(ReconcileOutcome::Duplicate);
        }

        if withdrawal.status.is_terminal() {
            info!(
                withdrawal_id = %withdrawal.withdrawal_id,
                current = ?withdrawal.status,
                incoming = ?status,
                "withdrawal webhook for finalized withdrawal ignored"
            );
            return Ok(ReconcileOutcome::AlreadyFinal);
        }

        withdrawal.status = status;
        if status.is_terminal_success() && withdrawal.completed_at.is_none() {
            withdrawal.completed_at = Some(parsed.completed_at.unwrap_or_else(Utc::now));
        }
        withdrawal.webhook_payload = Some(payload.clone());

        self.withdrawal_store.update(&withdrawal).await?;

        info!(
            withdrawal_id = %withdrawal.withdrawal_id,
            status = ?status,
            "withdrawal webhook processed"
        );
        Ok(ReconcileOutcome::Applied)
    }
}
