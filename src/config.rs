use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::models::Subacquirer;

/// Global routing mode. In mock mode every subacquirer resolves to the mock
/// driver regardless of its configured endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    Mock,
    Real,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: GatewayMode,
    /// Bound on every outbound provider call; a timeout is treated the same
    /// as a failed response.
    pub http_timeout: Duration,
    pub subadq_a_base_url: String,
    pub subadq_b_base_url: String,
    pub subadq_b_webhook_secret: Option<String>,
    pub webhook: WebhookJobConfig,
}

/// Scheduling and retry policy for webhook reconciliation jobs.
#[derive(Debug, Clone)]
pub struct WebhookJobConfig {
    /// Maximum delivery attempts before the job is dead-lettered.
    pub tries: u32,
    /// Delay before each retry, one entry per attempt after the first.
    pub backoff: Vec<Duration>,
    pub pix_delay: Duration,
    pub withdrawal_delay: Duration,
}

impl Default for WebhookJobConfig {
    fn default() -> Self {
        Self {
            tries: 3,
            backoff: vec![
                Duration::from_secs(60),
                Duration::from_secs(300),
                Duration::from_secs(900),
            ],
            pix_delay: Duration::from_secs(2),
            withdrawal_delay: Duration::from_secs(3),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mode = match env::var("SUBACQUIRER_MODE")
            .unwrap_or_else(|_| "mock".to_string())
            .to_lowercase()
            .as_str()
        {
            "mock" => GatewayMode::Mock,
            "real" => GatewayMode::Real,
            other => {
                return Err(anyhow!(
                    "SUBACQUIRER_MODE must be 'mock' or 'real', got {other}"
                ))
            }
        };

        let http_timeout = Duration::from_secs(
            env::var("SUBACQUIRER_HTTP_TIMEOUT")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("SUBACQUIRER_HTTP_TIMEOUT must be a number of seconds")?,
        );

        let webhook = WebhookJobConfig {
            tries: env::var("WEBHOOK_JOB_TRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("WEBHOOK_JOB_TRIES must be a number")?,
            backoff: parse_backoff(
                &env::var("WEBHOOK_JOB_BACKOFF").unwrap_or_else(|_| "60,300,900".to_string()),
            )?,
            pix_delay: Duration::from_secs(
                env::var("WEBHOOK_PIX_DELAY_SECS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()
                    .context("WEBHOOK_PIX_DELAY_SECS must be a number of seconds")?,
            ),
            withdrawal_delay: Duration::from_secs(
                env::var("WEBHOOK_WITHDRAWAL_DELAY_SECS")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()
                    .context("WEBHOOK_WITHDRAWAL_DELAY_SECS must be a number of seconds")?,
            ),
        };

        let config = Config {
            mode,
            http_timeout,
            subadq_a_base_url: env::var("SUBADQ_A_BASE_URL").unwrap_or_default(),
            subadq_b_base_url: env::var("SUBADQ_B_BASE_URL").unwrap_or_default(),
            subadq_b_webhook_secret: env::var("SUBADQ_B_WEBHOOK_SECRET").ok(),
            webhook,
        };

        config.validate()?;
        Ok(config)
    }

    /// All-mock configuration. The demo binary and tests start from this.
    pub fn mock() -> Self {
        Self {
            mode: GatewayMode::Mock,
            http_timeout: Duration::from_secs(5),
            subadq_a_base_url: String::new(),
            subadq_b_base_url: String::new(),
            subadq_b_webhook_secret: None,
            webhook: WebhookJobConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.http_timeout.is_zero() {
            return Err(anyhow!("SUBACQUIRER_HTTP_TIMEOUT must be greater than 0"));
        }

        if self.webhook.tries == 0 {
            return Err(anyhow!("WEBHOOK_JOB_TRIES must be greater than 0"));
        }

        if self.mode == GatewayMode::Real
            && self.subadq_a_base_url.trim().is_empty()
            && self.subadq_b_base_url.trim().is_empty()
        {
            return Err(anyhow!(
                "real mode requires at least one of SUBADQ_A_BASE_URL / SUBADQ_B_BASE_URL"
            ));
        }

        Ok(())
    }

    /// Subacquirer records seeded from this configuration.
    pub fn seed_subacquirers(&self) -> Vec<Subacquirer> {
        vec![
            Subacquirer::new("subadq_a", "Subadquirente A", &self.subadq_a_base_url),
            Subacquirer::new("subadq_b", "Subadquirente B", &self.subadq_b_base_url),
        ]
    }
}

fn parse_backoff(raw: &str) -> Result<Vec<Duration>> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .with_context(|| format!("invalid WEBHOOK_JOB_BACKOFF entry: {s}"))
        })
        .collect()
}
