//! Withdrawal creation flow; same create-before-call discipline as PIX.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::GatewayResult;
use crate::models::{Subacquirer, Withdrawal, WithdrawalStatus};
use crate::store::WithdrawalStore;
use crate::subacquirers::types::CreateWithdrawalRequest;
use crate::subacquirers::SubacquirerRegistry;
use crate::webhooks::WebhookSimulator;

#[derive(Debug)]
pub enum CreateWithdrawalOutcome {
    Created(Withdrawal),
    Rejected {
        withdrawal: Withdrawal,
        reason: String,
    },
}

pub struct CreateWithdrawalAction {
    withdrawal_store: Arc<dyn WithdrawalStore>,
    registry: Arc<SubacquirerRegistry>,
    simulator: Arc<WebhookSimulator>,
}

impl CreateWithdrawalAction {
    pub fn new(
        withdrawal_store: Arc<dyn WithdrawalStore>,
        registry: Arc<SubacquirerRegistry>,
        simulator: Arc<WebhookSimulator>,
    ) -> Self {
        Self {
            withdrawal_store,
            registry,
            simulator,
        }
    }

    pub async fn handle(
        &self,
        user_id: Uuid,
        subacquirer: &Subacquirer,
        request: CreateWithdrawalRequest,
    ) -> GatewayResult<CreateWithdrawalOutcome> {
        let now = Utc::now();
        let mut withdrawal = Withdrawal {
            id: Uuid::new_v4(),
            user_id,
            subacquirer_id: subacquirer.id,
            withdrawal_id: format!("WD-{}", Uuid::new_v4()),
            external_id: None,
            amount: request.amount,
            status: WithdrawalStatus::Pending,
            bank_code: request.bank_code.clone(),
            agency: request.agency.clone(),
            account: request.account.clone(),
            account_type: request.account_type,
            document: request.holder_document.clone(),
            requested_at: now,
            completed_at: None,
            raw_request: serde_json::to_value(&request).ok(),
            raw_response: None,
            webhook_payload: None,
            created_at: now,
        };

        self.withdrawal_store.insert(withdrawal.clone()).await?;

        let driver = self.registry.resolve(subacquirer)?;

        match driver.create_withdrawal(&request).await {
            Ok(created) => {
                withdrawal.external_id = Some(created.external_id);
                withdrawal.status = created.status;
                withdrawal.raw_response = Some(created.raw_response);
                self.withdrawal_store.update(&withdrawal).await?;

                self.simulator
                    .simulate_withdrawal(&withdrawal, &subacquirer.code);

                info!(
                    withdrawal_id = %withdrawal.withdrawal_id,
                    subacquirer = %subacquirer.code,
                    "withdrawal created"
                );
                Ok(CreateWithdrawalOutcome::Created(withdrawal))
            }
            Err(failure) => {
                withdrawal.status = WithdrawalStatus::Failed;
                withdrawal.raw_response = Some(json!({
                    "success": false,
                    "error": failure.reason,
                    "response": failure.raw_response,
                }));
                self.withdrawal_store.update(&withdrawal).await?;

                warn!(
                    withdrawal_id = %withdrawal.withdrawal_id,
                    subacquirer = %subacquirer.code,
                    error = %failure.reason,
                    "failed to create withdrawal on subacquirer"
                );
                Ok(CreateWithdrawalOutcome::Rejected {
                    withdrawal,
                    reason: failure.reason,
                })
            }
        }
    }
}
