//! Subacquirer driver trait
//!
//! Defines the capability set every provider driver implements. Drivers
//! translate a canonical request into the provider's wire shape, perform the
//! call, and translate the response back using the status normalizer.

use async_trait::async_trait;

use crate::subacquirers::types::{
    CreatePixRequest, CreateWithdrawalRequest, PixCreated, PixWebhookData, ProviderFailure,
    WithdrawalCreated, WithdrawalWebhookData,
};

/// Unified interface over every subacquirer (plus the mock driver).
///
/// The `Err` arm of the create calls is a [`ProviderFailure`] *value* —
/// callers branch on it and record the failure; it is never propagated with
/// `?` past the create flow.
#[async_trait]
pub trait SubacquirerDriver: Send + Sync {
    /// Create a PIX charge on the provider.
    async fn create_pix(&self, request: &CreatePixRequest) -> Result<PixCreated, ProviderFailure>;

    /// Create a withdrawal on the provider.
    async fn create_withdrawal(
        &self,
        request: &CreateWithdrawalRequest,
    ) -> Result<WithdrawalCreated, ProviderFailure>;

    /// Extract normalized fields from an inbound PIX notification.
    ///
    /// Must not fail: missing fields come back as `None` and the
    /// reconciliation engine decides what to do with them.
    fn parse_pix_webhook(&self, payload: &serde_json::Value) -> PixWebhookData;

    /// Extract normalized fields from an inbound withdrawal notification.
    fn parse_withdrawal_webhook(&self, payload: &serde_json::Value) -> WithdrawalWebhookData;

    /// Verify a webhook signature header against the raw payload bytes.
    ///
    /// Providers that do not sign their webhooks accept everything.
    fn verify_webhook_signature(&self, _payload: &[u8], _signature: &str) -> bool {
        true
    }
}
