//! Mock driver
//!
//! Used whenever the gateway runs in mock mode or a subacquirer has no real
//! endpoint configured. Generates synthetic identifiers and QR payloads
//! without any network call; always succeeds with status PENDING.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::json;
use tracing::info;

use crate::subacquirers::providers::{datetime_field, decimal_field, string_field};
use crate::subacquirers::status::{normalize_pix, normalize_withdrawal};
use crate::subacquirers::traits::SubacquirerDriver;
use crate::subacquirers::types::{
    CreatePixRequest, CreateWithdrawalRequest, PixCreated, PixWebhookData, ProviderFailure,
    WithdrawalCreated, WithdrawalWebhookData,
};

/// Static EMV payload standing in for a real BR Code.
const MOCK_QR_CODE: &str = "00020126580014br.gov.bcb.pix0136mockpix@example.com52040000530398654040.005802BR5913MOCK MERCHANT6009SAO PAULO62070503***63041D3D";

pub struct MockDriver {
    subacquirer_code: String,
}

impl MockDriver {
    pub fn new(subacquirer_code: &str) -> Self {
        Self {
            subacquirer_code: subacquirer_code.to_string(),
        }
    }

    fn random_token(len: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(|c| (c as char).to_ascii_uppercase())
            .collect()
    }
}

#[async_trait]
impl SubacquirerDriver for MockDriver {
    async fn create_pix(&self, request: &CreatePixRequest) -> Result<PixCreated, ProviderFailure> {
        let pix_id = format!("PIX_{}", Self::random_token(16));
        let transaction_id = format!("TXN_{}", Self::random_token(12));
        let now = Utc::now();

        let raw_response = json!({
            "pix_id": pix_id,
            "transaction_id": transaction_id,
            "amount": request.amount,
            "status": "PENDING",
            "qr_code": MOCK_QR_CODE,
            "qr_code_url": format!("https://mock-qrcode.example.com/{pix_id}"),
            "expires_at": (now + Duration::minutes(30)).to_rfc3339(),
            "created_at": now.to_rfc3339(),
        });

        info!(
            subacquirer = %self.subacquirer_code,
            %pix_id,
            amount = %request.amount,
            "mock subacquirer created pix"
        );

        Ok(PixCreated {
            external_id: pix_id.clone(),
            qr_code: Some(MOCK_QR_CODE.to_string()),
            qr_code_url: Some(format!("https://mock-qrcode.example.com/{pix_id}")),
            status: normalize_pix("PENDING"),
            raw_response,
        })
    }

    async fn create_withdrawal(
        &self,
        request: &CreateWithdrawalRequest,
    ) -> Result<WithdrawalCreated, ProviderFailure> {
        let withdraw_id = format!("WD_{}", Self::random_token(16));
        let transaction_id = format!("TXN_{}", Self::random_token(12));
        let now = Utc::now();

        let raw_response = json!({
            "withdraw_id": withdraw_id,
            "transaction_id": transaction_id,
            "amount": request.amount,
            "status": "PENDING",
            "bank_code": request.bank_code,
            "agency": request.agency,
            "account": request.account,
            "estimated_completion": (now + Duration::hours(2)).to_rfc3339(),
            "created_at": now.to_rfc3339(),
        });

        info!(
            subacquirer = %self.subacquirer_code,
            %withdraw_id,
            amount = %request.amount,
            "mock subacquirer created withdrawal"
        );

        Ok(WithdrawalCreated {
            external_id: withdraw_id,
            status: normalize_withdrawal("PENDING"),
            raw_response,
        })
    }

    /// Accepts both wire dialects; the simulator may shape payloads either
    /// way depending on the subacquirer being mocked.
    fn parse_pix_webhook(&self, payload: &serde_json::Value) -> PixWebhookData {
        let data = if payload["data"].is_object() {
            &payload["data"]
        } else {
            payload
        };

        PixWebhookData {
            external_id: string_field(&data["pix_id"]).or_else(|| string_field(&data["id"])),
            status: data["status"].as_str().map(normalize_pix),
            amount: decimal_field(&data["amount"]).or_else(|| decimal_field(&data["value"])),
            payer_name: string_field(&data["payer_name"])
                .or_else(|| string_field(&data["payer"]["name"])),
            payer_document: string_field(&data["payer_cpf"])
                .or_else(|| string_field(&data["payer_document"]))
                .or_else(|| string_field(&data["payer"]["document"])),
            paid_at: datetime_field(&data["payment_date"])
                .or_else(|| datetime_field(&data["paid_at"]))
                .or_else(|| datetime_field(&data["confirmed_at"])),
        }
    }

    fn parse_withdrawal_webhook(&self, payload: &serde_json::Value) -> WithdrawalWebhookData {
        let data = if payload["data"].is_object() {
            &payload["data"]
        } else {
            payload
        };

        WithdrawalWebhookData {
            external_id: string_field(&data["withdraw_id"]).or_else(|| string_field(&data["id"])),
            status: data["status"].as_str().map(normalize_withdrawal),
            amount: decimal_field(&data["amount"]),
            completed_at: datetime_field(&data["completed_at"])
                .or_else(|| datetime_field(&data["processed_at"])),
        }
    }
}
