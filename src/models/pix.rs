use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Document;

/// Canonical PIX payment status.
///
/// CONFIRMED and PAID are terminal-success; CANCELLED and FAILED are
/// terminal. A transaction that reached a terminal-success status is never
/// overwritten by a later notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PixStatus {
    Pending,
    Processing,
    Confirmed,
    Paid,
    Cancelled,
    Failed,
}

impl PixStatus {
    pub fn is_terminal_success(&self) -> bool {
        matches!(self, PixStatus::Confirmed | PixStatus::Paid)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PixStatus::Confirmed | PixStatus::Paid | PixStatus::Cancelled | PixStatus::Failed
        )
    }
}

/// A PIX charge created on behalf of a user.
///
/// Inserted with status PENDING *before* the provider call is attempted, so
/// the record exists and is auditable even if the call fails or the process
/// crashes mid-flight. After that it is mutated exactly once by the create
/// flow, and zero or more times by webhook reconciliation, strictly forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subacquirer_id: Uuid,
    /// Our own external key, `PIX-<uuid>`.
    pub transaction_id: String,
    /// Provider-side id, set only after a successful create call.
    pub external_id: Option<String>,
    pub amount: Decimal,
    pub status: PixStatus,
    pub payer_name: Option<String>,
    pub payer_document: Option<Document>,
    pub qr_code: Option<String>,
    pub qr_code_url: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub raw_request: Option<serde_json::Value>,
    pub raw_response: Option<serde_json::Value>,
    pub webhook_payload: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl PixTransaction {
    pub fn new(user_id: Uuid, subacquirer_id: Uuid, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            subacquirer_id,
            transaction_id: format!("PIX-{}", Uuid::new_v4()),
            external_id: None,
            amount,
            status: PixStatus::Pending,
            payer_name: None,
            payer_document: None,
            qr_code: None,
            qr_code_url: None,
            paid_at: None,
            raw_request: None,
            raw_response: None,
            webhook_payload: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, PixStatus::Pending | PixStatus::Processing)
    }

    pub fn is_paid(&self) -> bool {
        self.status.is_terminal_success()
    }
}
