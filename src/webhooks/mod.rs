//! Asynchronous webhook machinery: the notification simulator, the delayed
//! job runner, and the reconciliation engine.

pub mod jobs;
pub mod reconcile;
pub mod simulator;

pub use jobs::{WebhookJob, WebhookJobRunner};
pub use reconcile::{ReconcileEngine, ReconcileOutcome};
pub use simulator::WebhookSimulator;
