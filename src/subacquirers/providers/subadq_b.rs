//! SubadqB driver
//!
//! Nested wire dialect: envelope with a `data` object, `value` instead of
//! `amount` for PIX, `bank` instead of `bank_code`, and signed webhooks
//! (`{type, data, signature}`).

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde_json::{json, Value};
use sha2::Sha256;

use crate::models::Subacquirer;
use crate::subacquirers::providers::http::ProviderClient;
use crate::subacquirers::providers::{datetime_field, decimal_field, string_field};
use crate::subacquirers::status::{normalize_pix, normalize_withdrawal};
use crate::subacquirers::traits::SubacquirerDriver;
use crate::subacquirers::types::{
    CreatePixRequest, CreateWithdrawalRequest, PixCreated, PixWebhookData, ProviderFailure,
    WithdrawalCreated, WithdrawalWebhookData,
};

type HmacSha256 = Hmac<Sha256>;

pub struct SubadqBDriver {
    http: ProviderClient,
    webhook_secret: Option<String>,
}

impl SubadqBDriver {
    pub fn new(
        subacquirer: &Subacquirer,
        client: Client,
        webhook_secret: Option<String>,
    ) -> Self {
        Self {
            http: ProviderClient::new(&subacquirer.code, &subacquirer.base_url, client),
            webhook_secret,
        }
    }

    /// SubadqB wraps responses in a `data` envelope, but not consistently.
    fn unwrap_data(body: &Value) -> &Value {
        if body["data"].is_object() {
            &body["data"]
        } else {
            body
        }
    }
}

#[async_trait]
impl SubacquirerDriver for SubadqBDriver {
    async fn create_pix(&self, request: &CreatePixRequest) -> Result<PixCreated, ProviderFailure> {
        let payload = json!({
            "value": request.amount,
            "description": request.description.as_deref().unwrap_or("Pagamento via PIX"),
            "payer": {
                "name": request.customer_name.as_deref().unwrap_or("Cliente"),
                "document": request
                    .customer_document
                    .as_ref()
                    .map(|d| d.raw())
                    .unwrap_or(""),
            },
        });

        let body = self.http.post("/pix/create", &payload).await?;
        let data = Self::unwrap_data(&body);

        let external_id = match data["id"].as_str() {
            Some(id) => id.to_string(),
            None => return Err(ProviderFailure::with_response("response missing id", body)),
        };

        Ok(PixCreated {
            external_id,
            qr_code: string_field(&data["qr_code"]),
            qr_code_url: string_field(&data["qr_code_url"]),
            status: normalize_pix(data["status"].as_str().unwrap_or("PENDING")),
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
                "bank": request.bank_code,
                "agency": request.agency,
                "account": request.account,
                "account_type": request.account_type.as_str(),
                "holder_name": request.holder_name,
                "holder_document": request.holder_document.raw(),
            },
        });

        let body = self.http.post("/withdraw", &payload).await?;
        let data = Self::unwrap_data(&body);

        let external_id = match data["id"].as_str() {
            Some(id) => id.to_string(),
            None => return Err(ProviderFailure::with_response("response missing id", body)),
        };

        Ok(WithdrawalCreated {
            external_id,
            status: normalize_withdrawal(data["status"].as_str().unwrap_or("PENDING")),
            raw_response: body,
        })
    }

    fn parse_pix_webhook(&self, payload: &Value) -> PixWebhookData {
        let data = Self::unwrap_data(payload);

        PixWebhookData {
            external_id: string_field(&data["id"]),
            status: data["status"].as_str().map(normalize_pix),
            amount: decimal_field(&data["value"]),
            payer_name: string_field(&data["payer"]["name"]),
            payer_document: string_field(&data["payer"]["document"]),
            paid_at: datetime_field(&data["confirmed_at"]),
        }
    }

    fn parse_withdrawal_webhook(&self, payload: &Value) -> WithdrawalWebhookData {
        let data = Self::unwrap_data(payload);

        WithdrawalWebhookData {
            external_id: string_field(&data["id"]),
            status: data["status"].as_str().map(normalize_withdrawal),
            amount: decimal_field(&data["amount"]),
            completed_at: datetime_field(&data["processed_at"]),
        }
    }

    /// HMAC-SHA256 over the raw payload, hex-encoded. Sandbox traffic is not
    /// signed with a real key, so without a configured secret everything is
    /// accepted.
    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> bool {
        let Some(secret) = &self.webhook_secret else {
            return true;
        };

        let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return false,
        };
        mac.update(payload);
        let computed = hex::encode(mac.finalize().into_bytes());
        let provided = signature.trim();

        // Constant-time comparison.
        if computed.len() != provided.len() {
            return false;
        }
        computed
            .as_bytes()
            .iter()
            .zip(provided.as_bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}
