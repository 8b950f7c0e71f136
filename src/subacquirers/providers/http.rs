//! Shared HTTP plumbing for the real subacquirer drivers.
//!
//! Every outbound request and inbound response is logged with document
//! fields masked to their last 4 characters. Transport errors, timeouts,
//! non-2xx statuses, and unparseable bodies are all folded into a
//! [`ProviderFailure`] value.

use reqwest::Client;
use serde_json::Value;
use tracing::{error, info};

use crate::subacquirers::types::ProviderFailure;

/// JSON keys whose values are CPF/CNPJ documents and must never be logged
/// in full.
const SENSITIVE_KEYS: &[&str] = &["document", "payer_cpf", "payer_document", "holder_document"];

pub(crate) struct ProviderClient {
    code: String,
    base_url: String,
    client: Client,
}

impl ProviderClient {
    pub fn new(code: &str, base_url: &str, client: Client) -> Self {
        Self {
            code: code.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// POST a JSON payload and return the parsed JSON body.
    pub async fn post(&self, endpoint: &str, payload: &Value) -> Result<Value, ProviderFailure> {
        let url = format!("{}{}", self.base_url, endpoint);

        info!(
            subacquirer = %self.code,
            %url,
            data = %mask_sensitive(payload),
            "subacquirer request"
        );

        let response = match self.client.post(&url).json(payload).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(subacquirer = %self.code, error = %e, "subacquirer request error");
                return Err(ProviderFailure::new(format!("request error: {e}")));
            }
        };

        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                error!(subacquirer = %self.code, error = %e, "subacquirer response not json");
                return Err(ProviderFailure::new(format!(
                    "invalid response body: {e}"
                )));
            }
        };

        info!(
            subacquirer = %self.code,
            status = status.as_u16(),
            response = %mask_sensitive(&body),
            "subacquirer response"
        );

        if !status.is_success() {
            return Err(ProviderFailure::with_response(
                format!("request failed with status {status}"),
                body,
            ));
        }

        Ok(body)
    }
}

/// Recursively mask document values so a payload is safe to log.
pub fn mask_sensitive(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| {
                    let masked = if val.is_object() || val.is_array() {
                        mask_sensitive(val)
                    } else if SENSITIVE_KEYS.contains(&key.as_str()) {
                        Value::String(mask_document(&value_to_string(val)))
                    } else {
                        val.clone()
                    };
                    (key.clone(), masked)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(mask_sensitive).collect()),
        other => other.clone(),
    }
}

fn mask_document(document: &str) -> String {
    let chars: Vec<char> = document.chars().collect();
    let start = chars.len().saturating_sub(4);
    format!("***{}", chars[start..].iter().collect::<String>())
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_document_keys_at_any_depth() {
        let payload = json!({
            "amount": 100.0,
            "customer": {
                "name": "Cliente",
                "document": "12345678901",
            },
            "holder_document": "98765432100",
        });

        let masked = mask_sensitive(&payload);
        assert_eq!(masked["customer"]["document"], json!("***8901"));
        assert_eq!(masked["holder_document"], json!("***2100"));
        assert_eq!(masked["amount"], json!(100.0));
    }

    #[test]
    fn masked_payload_never_contains_full_document() {
        let payload = json!({"payer_cpf": "11122233344"});
        let rendered = mask_sensitive(&payload).to_string();
        assert!(!rendered.contains("11122233344"));
        assert!(rendered.contains("***3344"));
    }

    #[test]
    fn non_sensitive_fields_pass_through() {
        let payload = json!({"status": "PENDING", "items": [{"document": "55566677788"}]});
        let masked = mask_sensitive(&payload);
        assert_eq!(masked["status"], json!("PENDING"));
        assert_eq!(masked["items"][0]["document"], json!("***7788"));
    }
}
