//! Delayed webhook jobs
//!
//! Stands in for a queue worker: each job sleeps its delivery delay, then
//! runs reconciliation with a bounded retry policy. Transient failures are
//! retried with increasing backoff; exhaustion (or a non-transient failure)
//! lands in an operator-visible dead-letter log entry carrying the aggregate
//! id and the full payload — never silently dropped.

use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, warn};
use uuid::Uuid;

use crate::config::WebhookJobConfig;
use crate::webhooks::reconcile::ReconcileEngine;

#[derive(Debug, Clone)]
pub enum WebhookJob {
    Pix {
        transaction_id: Uuid,
        payload: Value,
    },
    Withdrawal {
        withdrawal_id: Uuid,
        payload: Value,
    },
}

impl WebhookJob {
    fn aggregate_id(&self) -> Uuid {
        match self {
            WebhookJob::Pix { transaction_id, .. } => *transaction_id,
            WebhookJob::Withdrawal { withdrawal_id, .. } => *withdrawal_id,
        }
    }

    fn payload(&self) -> &Value {
        match self {
            WebhookJob::Pix { payload, .. } => payload,
            WebhookJob::Withdrawal { payload, .. } => payload,
        }
    }
}

pub struct WebhookJobRunner {
    engine: Arc<ReconcileEngine>,
    config: WebhookJobConfig,
}

impl WebhookJobRunner {
    pub fn new(engine: Arc<ReconcileEngine>, config: WebhookJobConfig) -> Self {
        Self { engine, config }
    }

    /// Schedule a job for execution after `delay`. The returned handle is
    /// only needed by callers that want to await completion (tests do).
    pub fn schedule(self: Arc<Self>, job: WebhookJob, delay: std::time::Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            self.run(job).await;
        })
    }

    /// Run a job to completion, retrying transient failures.
    pub async fn run(&self, job: WebhookJob) {
        let tries = self.config.tries.max(1);

        for attempt in 1..=tries {
            let result = match &job {
                WebhookJob::Pix {
                    transaction_id,
                    payload,
                } => self.engine.reconcile_pix(*transaction_id, payload).await,
                WebhookJob::Withdrawal {
                    withdrawal_id,
                    payload,
                } => {
                    self.engine
                        .reconcile_withdrawal(*withdrawal_id, payload)
                        .await
                }
            };

            match result {
                Ok(_) => return,
                Err(e) if e.is_transient() && attempt < tries => {
                    let backoff = self
                        .config
                        .backoff
                        .get(attempt as usize - 1)
                        .or(self.config.backoff.last())
                        .copied()
                        .unwrap_or_default();
                    warn!(
                        aggregate_id = %job.aggregate_id(),
                        attempt,
                        backoff_secs = backoff.as_secs(),
                        error = %e,
                        "webhook job failed, will retry"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    // Dead letter: exhausted retries or a non-retryable fault.
                    error!(
                        aggregate_id = %job.aggregate_id(),
                        attempt,
                        error = %e,
                        payload = %job.payload(),
                        "webhook job permanently failed"
                    );
                    return;
                }
            }
        }
    }
}
