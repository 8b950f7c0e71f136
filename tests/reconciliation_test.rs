//! Reconciliation engine properties: idempotence, terminal monotonicity,
//! malformed-payload handling, per-aggregate serialization, and the bounded
//! retry policy of the webhook job runner.

mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

use common::{fast_webhook_config, mock_harness, Harness};
use pix_gateway::models::withdrawal::AccountType;
use pix_gateway::models::{
    Document, PixStatus, PixTransaction, Withdrawal, WithdrawalStatus,
};
use pix_gateway::store::memory::InMemoryPixStore;
use pix_gateway::store::{PixTransactionStore, StoreError};
use pix_gateway::webhooks::{ReconcileEngine, ReconcileOutcome, WebhookJob, WebhookJobRunner};

/// Insert a PENDING pix transaction bound to subadq_a, bypassing the create
/// flow so no simulated webhook interferes.
async fn seed_pix(h: &Harness) -> PixTransaction {
    let mut tx = PixTransaction::new(h.user_id, h.subadq_a.id, dec!(125.50));
    tx.external_id = Some("PIX_SEEDED01".to_string());
    h.pix_store.insert(tx.clone()).await.unwrap();
    tx
}

async fn seed_withdrawal(h: &Harness, status: WithdrawalStatus) -> Withdrawal {
    let now = Utc::now();
    let wd = Withdrawal {
        id: Uuid::new_v4(),
        user_id: h.user_id,
        subacquirer_id: h.subadq_b.id,
        withdrawal_id: format!("WD-{}", Uuid::new_v4()),
        external_id: Some("WD_SEEDED01".to_string()),
        amount: dec!(300.00),
        status,
        bank_code: "001".to_string(),
        agency: "0001".to_string(),
        account: "12345-6".to_string(),
        account_type: AccountType::Checking,
        document: Document::new("98765432100"),
        requested_at: now,
        completed_at: None,
        raw_request: None,
        raw_response: None,
        webhook_payload: None,
        created_at: now,
    };
    h.withdrawal_store.insert(wd.clone()).await.unwrap();
    wd
}

fn subadq_a_confirmed_payload(external_id: &str) -> serde_json::Value {
    json!({
        "event": "pix_payment_confirmed",
        "transaction_id": external_id,
        "pix_id": external_id,
        "status": "CONFIRMED",
        "amount": 125.5,
        "payer_name": "João da Silva",
        "payer_cpf": "***8901",
        "payment_date": "2026-01-15T12:00:00+00:00",
        "metadata": {"source": "SubadqA", "environment": "sandbox"},
    })
}

#[tokio::test]
async fn confirmed_webhook_moves_pending_to_confirmed() {
    let h = mock_harness().await;
    let tx = seed_pix(&h).await;
    let payload = subadq_a_confirmed_payload("PIX_SEEDED01");

    let outcome = h.engine.reconcile_pix(tx.id, &payload).await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::Applied);

    let stored = h.pix_store.find_by_id(tx.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PixStatus::Confirmed);
    assert!(stored.paid_at.is_some());
    assert_eq!(stored.payer_name.as_deref(), Some("João da Silva"));
    assert_eq!(stored.webhook_payload, Some(payload));
}

#[tokio::test]
async fn replaying_the_same_webhook_is_a_noop() {
    let h = mock_harness().await;
    let tx = seed_pix(&h).await;
    let payload = subadq_a_confirmed_payload("PIX_SEEDED01");

    h.engine.reconcile_pix(tx.id, &payload).await.unwrap();
    let after_first = h.pix_store.find_by_id(tx.id).await.unwrap().unwrap();

    let outcome = h.engine.reconcile_pix(tx.id, &payload).await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::Duplicate);

    let after_second = h.pix_store.find_by_id(tx.id).await.unwrap().unwrap();
    assert_eq!(after_second.status, after_first.status);
    assert_eq!(after_second.paid_at, after_first.paid_at);
    assert_eq!(after_second.payer_name, after_first.payer_name);
}

#[tokio::test]
async fn terminal_success_is_never_overwritten() {
    let h = mock_harness().await;
    let tx = seed_pix(&h).await;

    h.engine
        .reconcile_pix(tx.id, &subadq_a_confirmed_payload("PIX_SEEDED01"))
        .await
        .unwrap();
    let confirmed = h.pix_store.find_by_id(tx.id).await.unwrap().unwrap();

    // A late CANCELLED notification must not reopen the transaction.
    let stale = json!({
        "event": "pix_payment_cancelled",
        "pix_id": "PIX_SEEDED01",
        "status": "CANCELLED",
    });
    let outcome = h.engine.reconcile_pix(tx.id, &stale).await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::AlreadyFinal);

    let stored = h.pix_store.find_by_id(tx.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PixStatus::Confirmed);
    assert_eq!(stored.paid_at, confirmed.paid_at);
    assert_eq!(stored.webhook_payload, confirmed.webhook_payload);
}

#[tokio::test]
async fn failed_transaction_is_not_reopened_by_late_confirmation() {
    let h = mock_harness().await;
    let mut tx = PixTransaction::new(h.user_id, h.subadq_a.id, dec!(125.50));
    tx.external_id = Some("PIX_SEEDED01".to_string());
    tx.status = PixStatus::Failed;
    h.pix_store.insert(tx.clone()).await.unwrap();

    let outcome = h
        .engine
        .reconcile_pix(tx.id, &subadq_a_confirmed_payload("PIX_SEEDED01"))
        .await
        .unwrap();
    assert_eq!(outcome, ReconcileOutcome::AlreadyFinal);

    let stored = h.pix_store.find_by_id(tx.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PixStatus::Failed);
    assert!(stored.paid_at.is_none());
}

#[tokio::test]
async fn done_webhook_against_done_withdrawal_is_a_noop() {
    let h = mock_harness().await;
    let wd = seed_withdrawal(&h, WithdrawalStatus::Done).await;

    let payload = json!({
        "type": "withdraw.status_update",
        "data": {
            "id": "WD_SEEDED01",
            "status": "DONE",
            "amount": 300.0,
            "bank_account": {"bank": "001", "agency": "0001", "account": "12345-6"},
            "processed_at": "2026-01-15T12:00:00+00:00",
        },
        "signature": "aabbccddeeff112233",
    });

    let outcome = h.engine.reconcile_withdrawal(wd.id, &payload).await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::Duplicate);

    let stored = h.withdrawal_store.find_by_id(wd.id).await.unwrap().unwrap();
    assert_eq!(stored.status, WithdrawalStatus::Done);
    assert!(stored.completed_at.is_none());
    assert!(stored.webhook_payload.is_none());
}

#[tokio::test]
async fn success_webhook_against_done_withdrawal_is_discarded() {
    let h = mock_harness().await;
    let wd = seed_withdrawal(&h, WithdrawalStatus::Done).await;

    let payload = json!({
        "event": "withdraw_completed",
        "withdraw_id": "WD_SEEDED01",
        "status": "SUCCESS",
    });

    let outcome = h.engine.reconcile_withdrawal(wd.id, &payload).await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::AlreadyFinal);
}

#[tokio::test]
async fn payload_without_status_is_logged_and_discarded() {
    let h = mock_harness().await;
    let tx = seed_pix(&h).await;

    let payload = json!({"pix_id": "PIX_SEEDED01", "amount": 125.5});
    let outcome = h.engine.reconcile_pix(tx.id, &payload).await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::Malformed);

    let stored = h.pix_store.find_by_id(tx.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PixStatus::Pending);
    assert!(stored.webhook_payload.is_none());
}

#[tokio::test]
async fn concurrent_duplicate_deliveries_apply_exactly_once() {
    let h = mock_harness().await;
    let tx = seed_pix(&h).await;
    let payload = subadq_a_confirmed_payload("PIX_SEEDED01");

    let (a, b, c) = tokio::join!(
        h.engine.reconcile_pix(tx.id, &payload),
        h.engine.reconcile_pix(tx.id, &payload),
        h.engine.reconcile_pix(tx.id, &payload),
    );

    let outcomes = [a.unwrap(), b.unwrap(), c.unwrap()];
    let applied = outcomes
        .iter()
        .filter(|o| **o == ReconcileOutcome::Applied)
        .count();
    assert_eq!(applied, 1, "exactly one delivery should win: {outcomes:?}");

    let stored = h.pix_store.find_by_id(tx.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PixStatus::Confirmed);
}

/// Pix store whose `update` fails a configured number of times with a
/// transient error before recovering.
struct FlakyPixStore {
    inner: InMemoryPixStore,
    failures_left: AtomicU32,
    update_calls: AtomicU32,
}

impl FlakyPixStore {
    fn new(failures: u32) -> Self {
        Self {
            inner: InMemoryPixStore::new(),
            failures_left: AtomicU32::new(failures),
            update_calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl PixTransactionStore for FlakyPixStore {
    async fn insert(&self, transaction: PixTransaction) -> Result<(), StoreError> {
        self.inner.insert(transaction).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PixTransaction>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn update(&self, transaction: &PixTransaction) -> Result<(), StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(StoreError::Unavailable {
                message: "injected failure".to_string(),
            });
        }
        self.inner.update(transaction).await
    }
}

async fn flaky_runner(failures: u32, tries: u32) -> (Arc<FlakyPixStore>, WebhookJobRunner, Uuid) {
    let h = mock_harness().await;
    let flaky = Arc::new(FlakyPixStore::new(failures));

    let mut tx = PixTransaction::new(h.user_id, h.subadq_a.id, dec!(125.50));
    tx.external_id = Some("PIX_SEEDED01".to_string());
    flaky.insert(tx.clone()).await.unwrap();

    let engine = Arc::new(ReconcileEngine::new(
        Arc::clone(&flaky) as Arc<dyn PixTransactionStore>,
        Arc::clone(&h.withdrawal_store),
        Arc::clone(&h.subacquirer_store),
        Arc::clone(&h.registry),
    ));

    let mut config = fast_webhook_config();
    config.tries = tries;
    config.backoff = vec![Duration::from_millis(10), Duration::from_millis(15)];

    (flaky, WebhookJobRunner::new(engine, config), tx.id)
}

#[tokio::test]
async fn transient_store_failure_is_retried_until_it_sticks() {
    let (flaky, runner, tx_id) = flaky_runner(2, 3).await;

    runner
        .run(WebhookJob::Pix {
            transaction_id: tx_id,
            payload: subadq_a_confirmed_payload("PIX_SEEDED01"),
        })
        .await;

    assert_eq!(flaky.update_calls.load(Ordering::SeqCst), 3);
    let stored = flaky.find_by_id(tx_id).await.unwrap().unwrap();
    assert_eq!(stored.status, PixStatus::Confirmed);
}

#[tokio::test]
async fn exhausted_retries_leave_the_aggregate_untouched() {
    let (flaky, runner, tx_id) = flaky_runner(10, 3).await;

    runner
        .run(WebhookJob::Pix {
            transaction_id: tx_id,
            payload: subadq_a_confirmed_payload("PIX_SEEDED01"),
        })
        .await;

    // Three attempts, all failed; the job is dead-lettered and the record
    // stays PENDING for the operator to act on.
    assert_eq!(flaky.update_calls.load(Ordering::SeqCst), 3);
    let stored = flaky.find_by_id(tx_id).await.unwrap().unwrap();
    assert_eq!(stored.status, PixStatus::Pending);
}
