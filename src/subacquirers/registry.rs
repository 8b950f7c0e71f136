//! Driver resolution
//!
//! Binds a [`Subacquirer`] record to the driver that talks its dialect.
//! Mock mode, a `"mock"` endpoint, or an empty endpoint all short-circuit to
//! the mock driver; an unknown code with a real endpoint is a configuration
//! error and fails fast.

use reqwest::Client;
use std::sync::Arc;

use crate::config::{Config, GatewayMode};
use crate::error::{GatewayError, GatewayResult};
use crate::models::Subacquirer;
use crate::subacquirers::providers::{MockDriver, SubadqADriver, SubadqBDriver};
use crate::subacquirers::traits::SubacquirerDriver;

pub struct SubacquirerRegistry {
    mode: GatewayMode,
    client: Client,
    subadq_b_webhook_secret: Option<String>,
}

impl SubacquirerRegistry {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            mode: config.mode,
            client,
            subadq_b_webhook_secret: config.subadq_b_webhook_secret.clone(),
        }
    }

    pub fn resolve(&self, subacquirer: &Subacquirer) -> GatewayResult<Arc<dyn SubacquirerDriver>> {
        if self.mode == GatewayMode::Mock || subacquirer.uses_mock_endpoint() {
            return Ok(Arc::new(MockDriver::new(&subacquirer.code)));
        }

        match subacquirer.code.as_str() {
            "subadq_a" => Ok(Arc::new(SubadqADriver::new(
                subacquirer,
                self.client.clone(),
            ))),
            "subadq_b" => Ok(Arc::new(SubadqBDriver::new(
                subacquirer,
                self.client.clone(),
                self.subadq_b_webhook_secret.clone(),
            ))),
            _ => Err(GatewayError::UnsupportedSubacquirer {
                code: subacquirer.code.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;
    use crate::subacquirers::types::CreatePixRequest;
    use rust_decimal_macros::dec;

    fn real_config() -> Config {
        let mut config = Config::mock();
        config.mode = GatewayMode::Real;
        config.subadq_a_base_url = "https://subadq-a.example.com".to_string();
        config
    }

    #[tokio::test]
    async fn mock_mode_overrides_everything() {
        let registry = SubacquirerRegistry::new(&Config::mock());
        let provider = Subacquirer::new("subadq_a", "A", "https://subadq-a.example.com");

        let driver = registry.resolve(&provider).unwrap();
        let created = driver
            .create_pix(&CreatePixRequest {
                amount: dec!(10.00),
                description: None,
                customer_name: None,
                customer_document: Some(Document::new("12345678901")),
            })
            .await
            .unwrap();
        assert!(created.external_id.starts_with("PIX_"));
    }

    #[test]
    fn mock_sentinel_endpoint_selects_mock_driver() {
        let registry = SubacquirerRegistry::new(&real_config());
        let provider = Subacquirer::new("subadq_a", "A", "mock");
        assert!(registry.resolve(&provider).is_ok());
    }

    #[tokio::test]
    async fn empty_endpoint_selects_mock_driver_regardless_of_code() {
        let registry = SubacquirerRegistry::new(&real_config());
        let provider = Subacquirer::new("anything_else", "X", "");

        // Resolves even though no real driver exists for this code.
        let driver = registry.resolve(&provider).unwrap();
        let parsed = driver.parse_pix_webhook(&serde_json::json!({"status": "PAID"}));
        assert!(parsed.status.is_some());
    }

    #[test]
    fn unknown_code_with_real_endpoint_fails_fast() {
        let registry = SubacquirerRegistry::new(&real_config());
        let provider = Subacquirer::new("subadq_z", "Z", "https://subadq-z.example.com");

        let err = registry
            .resolve(&provider)
            .err()
            .expect("unknown code must not resolve");
        match err {
            GatewayError::UnsupportedSubacquirer { code } => assert_eq!(code, "subadq_z"),
            other => panic!("expected UnsupportedSubacquirer, got {other}"),
        }
    }

    #[test]
    fn known_codes_resolve_real_drivers() {
        let mut config = real_config();
        config.subadq_b_base_url = "https://subadq-b.example.com".to_string();
        let registry = SubacquirerRegistry::new(&config);

        let a = Subacquirer::new("subadq_a", "A", "https://subadq-a.example.com");
        let b = Subacquirer::new("subadq_b", "B", "https://subadq-b.example.com");
        assert!(registry.resolve(&a).is_ok());
        assert!(registry.resolve(&b).is_ok());
    }
}
