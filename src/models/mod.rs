pub mod document;
pub mod pix;
pub mod subacquirer;
pub mod withdrawal;

pub use document::Document;
pub use pix::{PixStatus, PixTransaction};
pub use subacquirer::Subacquirer;
pub use withdrawal::{Withdrawal, WithdrawalStatus};
