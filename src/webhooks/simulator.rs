//! Webhook notification simulator
//!
//! Stands in for real provider webhook delivery: after a successful create
//! call, manufactures the notification that provider would send for a
//! completed transaction — in that provider's exact wire shape — and
//! schedules it for delayed reconciliation. Live webhook traffic would enter
//! through the same parse path.

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::WebhookJobConfig;
use crate::models::{PixTransaction, Withdrawal};
use crate::webhooks::jobs::{WebhookJob, WebhookJobRunner};

pub struct WebhookSimulator {
    runner: Arc<WebhookJobRunner>,
    config: WebhookJobConfig,
}

impl WebhookSimulator {
    pub fn new(runner: Arc<WebhookJobRunner>, config: WebhookJobConfig) -> Self {
        Self { runner, config }
    }

    pub fn simulate_pix(
        &self,
        transaction: &PixTransaction,
        subacquirer_code: &str,
    ) -> JoinHandle<()> {
        let payload = pix_confirmation_payload(transaction, subacquirer_code);

        info!(
            transaction_id = %transaction.transaction_id,
            subacquirer = subacquirer_code,
            delay_secs = self.config.pix_delay.as_secs(),
            "scheduling simulated pix webhook"
        );

        Arc::clone(&self.runner).schedule(
            WebhookJob::Pix {
                transaction_id: transaction.id,
                payload,
            },
            self.config.pix_delay,
        )
    }

    pub fn simulate_withdrawal(
        &self,
        withdrawal: &Withdrawal,
        subacquirer_code: &str,
    ) -> JoinHandle<()> {
        let payload = withdrawal_completion_payload(withdrawal, subacquirer_code);

        info!(
            withdrawal_id = %withdrawal.withdrawal_id,
            subacquirer = subacquirer_code,
            delay_secs = self.config.withdrawal_delay.as_secs(),
            "scheduling simulated withdrawal webhook"
        );

        Arc::clone(&self.runner).schedule(
            WebhookJob::Withdrawal {
                withdrawal_id: withdrawal.id,
                payload,
            },
            self.config.withdrawal_delay,
        )
    }
}

/// Success notification in the subacquirer's own webhook dialect.
pub fn pix_confirmation_payload(transaction: &PixTransaction, subacquirer_code: &str) -> Value {
    let external_id = transaction.external_id.clone().unwrap_or_default();
    let amount = transaction.amount.to_f64().unwrap_or(0.0);
    let masked_document = transaction
        .payer_document
        .as_ref()
        .map(|d| d.masked())
        .unwrap_or_else(|| "***".to_string());

    if subacquirer_code == "subadq_a" {
        json!({
            "event": "pix_payment_confirmed",
            "transaction_id": external_id,
            "pix_id": external_id,
            "status": "CONFIRMED",
            "amount": amount,
            "payer_name": "João da Silva",
            "payer_cpf": masked_document,
            "payment_date": Utc::now().to_rfc3339(),
            "metadata": {
                "source": "SubadqA",
                "environment": "sandbox",
            },
        })
    } else {
        json!({
            "type": "pix.status_update",
            "data": {
                "id": external_id,
                "status": "PAID",
                "value": amount,
                "payer": {
                    "name": "Maria Oliveira",
                    "document": masked_document,
                },
                "confirmed_at": Utc::now().to_rfc3339(),
            },
            "signature": "d1c4b6f98eaa",
        })
    }
}

/// Completion notification in the subacquirer's own webhook dialect.
pub fn withdrawal_completion_payload(withdrawal: &Withdrawal, subacquirer_code: &str) -> Value {
    let external_id = withdrawal.external_id.clone().unwrap_or_default();
    let amount = withdrawal.amount.to_f64().unwrap_or(0.0);

    if subacquirer_code == "subadq_a" {
        json!({
            "event": "withdraw_completed",
            "withdraw_id": external_id,
            "transaction_id": external_id,
            "status": "SUCCESS",
            "amount": amount,
            "requested_at": withdrawal.requested_at.to_rfc3339(),
            "completed_at": Utc::now().to_rfc3339(),
            "metadata": {
                "source": "SubadqA",
                "destination_bank": withdrawal.bank_code,
            },
        })
    } else {
        json!({
            "type": "withdraw.status_update",
            "data": {
                "id": external_id,
                "status": "DONE",
                "amount": amount,
                "bank_account": {
                    "bank": withdrawal.bank_code,
                    "agency": withdrawal.agency,
                    "account": withdrawal.account,
                },
                "processed_at": Utc::now().to_rfc3339(),
            },
            "signature": "aabbccddeeff112233",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::withdrawal::AccountType;
    use crate::models::{Document, WithdrawalStatus};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn pix_fixture() -> PixTransaction {
        let mut tx = PixTransaction::new(Uuid::new_v4(), Uuid::new_v4(), dec!(125.50));
        tx.external_id = Some("PIX_ABCDEF".to_string());
        tx.payer_document = Some(Document::new("12345678901"));
        tx
    }

    fn withdrawal_fixture() -> Withdrawal {
        Withdrawal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            subacquirer_id: Uuid::new_v4(),
            withdrawal_id: format!("WD-{}", Uuid::new_v4()),
            external_id: Some("WD_ABCDEF".to_string()),
            amount: dec!(300.00),
            status: WithdrawalStatus::Pending,
            bank_code: "001".to_string(),
            agency: "0001".to_string(),
            account: "12345-6".to_string(),
            account_type: AccountType::Checking,
            document: Document::new("98765432100"),
            requested_at: Utc::now(),
            completed_at: None,
            raw_request: None,
            raw_response: None,
            webhook_payload: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn subadq_a_pix_payload_is_flat_event_shape() {
        let payload = pix_confirmation_payload(&pix_fixture(), "subadq_a");
        assert_eq!(payload["event"], "pix_payment_confirmed");
        assert_eq!(payload["pix_id"], "PIX_ABCDEF");
        assert_eq!(payload["status"], "CONFIRMED");
        assert_eq!(payload["amount"], json!(125.5));
        assert_eq!(payload["payer_cpf"], "***8901");
        assert_eq!(payload["metadata"]["source"], "SubadqA");
        assert_eq!(payload["metadata"]["environment"], "sandbox");
    }

    #[test]
    fn subadq_b_pix_payload_is_nested_signed_shape() {
        let payload = pix_confirmation_payload(&pix_fixture(), "subadq_b");
        assert_eq!(payload["type"], "pix.status_update");
        assert_eq!(payload["data"]["id"], "PIX_ABCDEF");
        assert_eq!(payload["data"]["status"], "PAID");
        assert_eq!(payload["data"]["value"], json!(125.5));
        assert_eq!(payload["data"]["payer"]["document"], "***8901");
        assert_eq!(payload["signature"], "d1c4b6f98eaa");
    }

    #[test]
    fn subadq_a_withdrawal_payload_carries_destination_bank() {
        let payload = withdrawal_completion_payload(&withdrawal_fixture(), "subadq_a");
        assert_eq!(payload["event"], "withdraw_completed");
        assert_eq!(payload["status"], "SUCCESS");
        assert_eq!(payload["metadata"]["destination_bank"], "001");
    }

    #[test]
    fn subadq_b_withdrawal_payload_is_nested_signed_shape() {
        let payload = withdrawal_completion_payload(&withdrawal_fixture(), "subadq_b");
        assert_eq!(payload["type"], "withdraw.status_update");
        assert_eq!(payload["data"]["status"], "DONE");
        assert_eq!(payload["data"]["bank_account"]["bank"], "001");
        assert_eq!(payload["data"]["bank_account"]["agency"], "0001");
        assert_eq!(payload["signature"], "aabbccddeeff112233");
    }

    #[test]
    fn payload_never_contains_full_document() {
        let rendered = pix_confirmation_payload(&pix_fixture(), "subadq_a").to_string();
        assert!(!rendered.contains("12345678901"));
    }
}
