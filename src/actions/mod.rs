//! Application-level create flows.

pub mod create_pix;
pub mod create_withdrawal;

pub use create_pix::{CreatePixAction, CreatePixOutcome};
pub use create_withdrawal::{CreateWithdrawalAction, CreateWithdrawalOutcome};
