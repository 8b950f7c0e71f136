//! PIX creation flow
//!
//! The aggregate is inserted PENDING *before* the provider call so a crash
//! or provider failure mid-flight still leaves an auditable record. After
//! the call it is updated exactly once: FAILED with the captured failure, or
//! the provider's identifiers plus a scheduled webhook simulation.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::GatewayResult;
use crate::models::{PixStatus, PixTransaction, Subacquirer};
use crate::store::PixTransactionStore;
use crate::subacquirers::types::CreatePixRequest;
use crate::subacquirers::SubacquirerRegistry;
use crate::webhooks::WebhookSimulator;

/// Result handed back to the caller. Both arms carry the aggregate — a
/// rejected create still produced a FAILED record.
#[derive(Debug)]
pub enum CreatePixOutcome {
    Created(PixTransaction),
    Rejected {
        transaction: PixTransaction,
        reason: String,
    },
}

pub struct CreatePixAction {
    pix_store: Arc<dyn PixTransactionStore>,
    registry: Arc<SubacquirerRegistry>,
    simulator: Arc<WebhookSimulator>,
}

impl CreatePixAction {
    pub fn new(
        pix_store: Arc<dyn PixTransactionStore>,
        registry: Arc<SubacquirerRegistry>,
        simulator: Arc<WebhookSimulator>,
    ) -> Self {
        Self {
            pix_store,
            registry,
            simulator,
        }
    }

    pub async fn handle(
        &self,
        user_id: Uuid,
        subacquirer: &Subacquirer,
        request: CreatePixRequest,
    ) -> GatewayResult<CreatePixOutcome> {
        let mut transaction = PixTransaction::new(user_id, subacquirer.id, request.amount);
        transaction.raw_request = serde_json::to_value(&request).ok();

        self.pix_store.insert(transaction.clone()).await?;

        let driver = self.registry.resolve(subacquirer)?;

        match driver.create_pix(&request).await {
            Ok(created) => {
                transaction.external_id = Some(created.external_id);
                transaction.status = created.status;
                transaction.qr_code = created.qr_code;
                transaction.qr_code_url = created.qr_code_url;
                transaction.raw_response = Some(created.raw_response);
                self.pix_store.update(&transaction).await?;

                self.simulator.simulate_pix(&transaction, &subacquirer.code);

                info!(
                    transaction_id = %transaction.transaction_id,
                    subacquirer = %subacquirer.code,
                    "pix transaction created"
                );
                Ok(CreatePixOutcome::Created(transaction))
            }
            Err(failure) => {
                transaction.status = PixStatus::Failed;
                transaction.raw_response = Some(json!({
                    "success": false,
                    "error": failure.reason,
                    "response": failure.raw_response,
                }));
                self.pix_store.update(&transaction).await?;

                warn!(
                    transaction_id = %transaction.transaction_id,
                    subacquirer = %subacquirer.code,
                    error = %failure.reason,
                    "failed to create pix transaction on subacquirer"
                );
                Ok(CreatePixOutcome::Rejected {
                    transaction,
                    reason: failure.reason,
                })
            }
        }
    }
}
