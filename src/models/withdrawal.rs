use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Document;

/// Canonical withdrawal status. SUCCESS and DONE are terminal-success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalStatus {
    Pending,
    Processing,
    Success,
    Done,
    Cancelled,
    Failed,
}

impl WithdrawalStatus {
    pub fn is_terminal_success(&self) -> bool {
        matches!(self, WithdrawalStatus::Success | WithdrawalStatus::Done)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WithdrawalStatus::Success
                | WithdrawalStatus::Done
                | WithdrawalStatus::Cancelled
                | WithdrawalStatus::Failed
        )
    }
}

/// Bank account type for withdrawal destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
}

impl Default for AccountType {
    fn default() -> Self {
        AccountType::Checking
    }
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
        }
    }
}

/// An outbound bank transfer requested by a user.
///
/// Same lifecycle discipline as [`crate::models::PixTransaction`]: inserted
/// PENDING before the provider call, then updated exactly once by the create
/// flow and strictly forward by reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subacquirer_id: Uuid,
    /// Our own external key, `WD-<uuid>`.
    pub withdrawal_id: String,
    pub external_id: Option<String>,
    pub amount: Decimal,
    pub status: WithdrawalStatus,
    pub bank_code: String,
    pub agency: String,
    pub account: String,
    pub account_type: AccountType,
    pub document: Document,
    pub requested_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub raw_request: Option<serde_json::Value>,
    pub raw_response: Option<serde_json::Value>,
    pub webhook_payload: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl Withdrawal {
    pub fn is_pending(&self) -> bool {
        matches!(
            self.status,
            WithdrawalStatus::Pending | WithdrawalStatus::Processing
        )
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_terminal_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_success_statuses() {
        assert!(WithdrawalStatus::Success.is_terminal_success());
        assert!(WithdrawalStatus::Done.is_terminal_success());
        assert!(!WithdrawalStatus::Failed.is_terminal_success());
        assert!(WithdrawalStatus::Failed.is_terminal());
        assert!(!WithdrawalStatus::Pending.is_terminal());
    }

    #[test]
    fn account_type_defaults_to_checking() {
        assert_eq!(AccountType::default(), AccountType::Checking);
        assert_eq!(AccountType::Savings.as_str(), "savings");
    }
}
