//! Status normalization
//!
//! Maps a provider's raw status token onto the canonical enums. Total
//! functions: any unrecognized token, including one that belongs to the
//! other operation kind, degrades to PENDING rather than corrupting state.

use crate::models::{PixStatus, WithdrawalStatus};

/// Normalize a raw PIX status token, case-insensitively.
pub fn normalize_pix(raw: &str) -> PixStatus {
    match raw.trim().to_ascii_uppercase().as_str() {
        "PENDING" => PixStatus::Pending,
        "PROCESSING" => PixStatus::Processing,
        "CONFIRMED" => PixStatus::Confirmed,
        "PAID" => PixStatus::Paid,
        "CANCELLED" => PixStatus::Cancelled,
        "FAILED" => PixStatus::Failed,
        _ => PixStatus::Pending,
    }
}

/// Normalize a raw withdrawal status token, case-insensitively.
pub fn normalize_withdrawal(raw: &str) -> WithdrawalStatus {
    match raw.trim().to_ascii_uppercase().as_str() {
        "PENDING" => WithdrawalStatus::Pending,
        "PROCESSING" => WithdrawalStatus::Processing,
        "SUCCESS" => WithdrawalStatus::Success,
        "DONE" => WithdrawalStatus::Done,
        "CANCELLED" => WithdrawalStatus::Cancelled,
        "FAILED" => WithdrawalStatus::Failed,
        _ => WithdrawalStatus::Pending,
    }
}
