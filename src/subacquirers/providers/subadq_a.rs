//! SubadqA driver
//!
//! Flat wire dialect: top-level fields, `amount` naming, `bank_code` inside
//! `bank_account`, webhooks shaped as `{event, ..., status}`.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::models::Subacquirer;
use crate::subacquirers::providers::http::ProviderClient;
use crate::subacquirers::providers::{datetime_field, decimal_field, string_field};
use crate::subacquirers::status::{normalize_pix, normalize_withdrawal};
use crate::subacquirers::traits::SubacquirerDriver;
use crate::subacquirers::types::{
    CreatePixRequest, CreateWithdrawalRequest, PixCreated, PixWebhookData, ProviderFailure,
    WithdrawalCreated, WithdrawalWebhookData,
};

pub struct SubadqADriver {
    http: ProviderClient,
}

impl SubadqADriver {
    pub fn new(subacquirer: &Subacquirer, client: Client) -> Self {
        Self {
            http: ProviderClient::new(&subacquirer.code, &subacquirer.base_url, client),
        }
    }
}

#[async_trait]
impl SubacquirerDriver for SubadqADriver {
    async fn create_pix(&self, request: &CreatePixRequest) -> Result<PixCreated, ProviderFailure> {
        let payload = json!({
            "amount": request.amount,
            "description": request.description.as_deref().unwrap_or("Pagamento via PIX"),
            "customer": {
                "name": request.customer_name.as_deref().unwrap_or("Cliente"),
                "document": request
                    .customer_document
                    .as_ref()
                    .map(|d| d.raw())
                    .unwrap_or(""),
            },
        });

        let body = self.http.post("/pix/create", &payload).await?;

        let external_id = match body["pix_id"].as_str() {
            Some(id) => id.to_string(),
            None => {
                return Err(ProviderFailure::with_response(
                    "response missing pix_id",
                    body,
                ))
            }
        };

        Ok(PixCreated {
            external_id,
            qr_code: string_field(&body["qr_code"]),
            qr_code_url: string_field(&body["qr_code_url"]),
            status: normalize_pix(body["status"].as_str().unwrap_or("PENDING")),
            raw_response: body,
        })
    }

    async fn create_withdrawal(
        &self,
        request: &CreateWithdrawalRequest,
    ) -> Result<WithdrawalCreated, ProviderFailure> {
        let payload = json!({
            "amount": request.amount,
            "bank_account": {
                "bank_code": request.bank_code,
                "agency": request.agency,
                "account": request.account,
                "account_type": request.account_type.as_str(),
                "holder_name": request.holder_name,
                "holder_document": request.holder_document.raw(),
            },
        });

        let body = self.http.post("/withdraw", &payload).await?;

        let external_id = match body["withdraw_id"].as_str() {
            Some(id) => id.to_string(),
            None => {
                return Err(ProviderFailure::with_response(
                    "response missing withdraw_id",
                    body,
                ))
            }
        };

        Ok(WithdrawalCreated {
            external_id,
            status: normalize_withdrawal(body["status"].as_str().unwrap_or("PENDING")),
            raw_response: body,
        })
    }

    fn parse_pix_webhook(&self, payload: &serde_json::Value) -> PixWebhookData {
        PixWebhookData {
            external_id: string_field(&payload["pix_id"]),
            status: payload["status"].as_str().map(normalize_pix),
            amount: decimal_field(&payload["amount"]),
            payer_name: string_field(&payload["payer_name"]),
            payer_document: string_field(&payload["payer_cpf"]),
            paid_at: datetime_field(&payload["payment_date"]),
        }
    }

    fn parse_withdrawal_webhook(&self, payload: &serde_json::Value) -> WithdrawalWebhookData {
        WithdrawalWebhookData {
            external_id: string_field(&payload["withdraw_id"]),
            status: payload["status"].as_str().map(normalize_withdrawal),
            amount: decimal_field(&payload["amount"]),
            completed_at: datetime_field(&payload["completed_at"]),
        }
    }
}
