//! Canonical request/response types shared by every subacquirer driver.
//!
//! The rest of the system only ever sees these shapes; each driver absorbs
//! the full variance of its provider's wire format.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Document, PixStatus, WithdrawalStatus};
use crate::models::withdrawal::AccountType;

/// Input for creating a PIX charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePixRequest {
    pub amount: Decimal,
    pub description: Option<String>,
    pub customer_name: Option<String>,
    pub customer_document: Option<Document>,
}

/// Input for creating a withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWithdrawalRequest {
    pub amount: Decimal,
    pub bank_code: String,
    pub agency: String,
    pub account: String,
    pub account_type: AccountType,
    pub holder_name: String,
    pub holder_document: Document,
}

/// Successful PIX creation, already normalized.
#[derive(Debug, Clone)]
pub struct PixCreated {
    pub external_id: String,
    pub qr_code: Option<String>,
    pub qr_code_url: Option<String>,
    pub status: PixStatus,
    pub raw_response: serde_json::Value,
}

/// Successful withdrawal creation, already normalized.
#[derive(Debug, Clone)]
pub struct WithdrawalCreated {
    pub external_id: String,
    pub status: WithdrawalStatus,
    pub raw_response: serde_json::Value,
}

/// Failure value produced at the adapter boundary.
///
/// Transport errors, timeouts, non-2xx responses, and unparseable bodies all
/// end up here; the boundary never propagates them as exceptions. The raw
/// response is kept whenever one was received so the aggregate can capture
/// it for audit.
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct ProviderFailure {
    pub reason: String,
    pub raw_response: Option<serde_json::Value>,
}

impl ProviderFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            raw_response: None,
        }
    }

    pub fn with_response(reason: impl Into<String>, raw: serde_json::Value) -> Self {
        Self {
            reason: reason.into(),
            raw_response: Some(raw),
        }
    }
}

/// Normalized data extracted from an inbound PIX notification.
///
/// `status` is `None` only when the payload carried no status field at all;
/// an unrecognized token still normalizes to PENDING.
#[derive(Debug, Clone, PartialEq)]
pub struct PixWebhookData {
    pub external_id: Option<String>,
    pub status: Option<PixStatus>,
    pub amount: Option<Decimal>,
    pub payer_name: Option<String>,
    pub payer_document: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Normalized data extracted from an inbound withdrawal notification.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawalWebhookData {
    pub external_id: Option<String>,
    pub status: Option<WithdrawalStatus>,
    pub amount: Option<Decimal>,
    pub completed_at: Option<DateTime<Utc>>,
}
