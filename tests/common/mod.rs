//! Shared wiring for integration tests: the full gateway stack over
//! in-memory stores, with webhook delays shrunk to keep tests fast.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use pix_gateway::actions::{CreatePixAction, CreateWithdrawalAction};
use pix_gateway::config::{Config, WebhookJobConfig};
use pix_gateway::models::Subacquirer;
use pix_gateway::store::memory::{
    InMemoryPixStore, InMemorySubacquirerStore, InMemoryWithdrawalStore,
};
use pix_gateway::store::{PixTransactionStore, SubacquirerStore, WithdrawalStore};
use pix_gateway::subacquirers::SubacquirerRegistry;
use pix_gateway::webhooks::{ReconcileEngine, WebhookJobRunner, WebhookSimulator};

pub struct Harness {
    pub pix_store: Arc<dyn PixTransactionStore>,
    pub withdrawal_store: Arc<dyn WithdrawalStore>,
    pub subacquirer_store: Arc<dyn SubacquirerStore>,
    pub registry: Arc<SubacquirerRegistry>,
    pub engine: Arc<ReconcileEngine>,
    pub create_pix: CreatePixAction,
    pub create_withdrawal: CreateWithdrawalAction,
    pub subadq_a: Subacquirer,
    pub subadq_b: Subacquirer,
    pub user_id: Uuid,
}

pub fn fast_webhook_config() -> WebhookJobConfig {
    WebhookJobConfig {
        tries: 3,
        backoff: vec![
            Duration::from_millis(20),
            Duration::from_millis(30),
            Duration::from_millis(40),
        ],
        pix_delay: Duration::from_millis(10),
        withdrawal_delay: Duration::from_millis(10),
    }
}

pub async fn harness_with_config(mut config: Config) -> Harness {
    config.webhook = fast_webhook_config();

    let pix_store: Arc<dyn PixTransactionStore> = Arc::new(InMemoryPixStore::new());
    let withdrawal_store: Arc<dyn WithdrawalStore> = Arc::new(InMemoryWithdrawalStore::new());
    let subacquirer_store: Arc<dyn SubacquirerStore> = Arc::new(InMemorySubacquirerStore::new());

    let subadq_a = Subacquirer::new("subadq_a", "Subadquirente A", &config.subadq_a_base_url);
    let subadq_b = Subacquirer::new("subadq_b", "Subadquirente B", &config.subadq_b_base_url);
    subacquirer_store.insert(subadq_a.clone()).await.unwrap();
    subacquirer_store.insert(subadq_b.clone()).await.unwrap();

    let registry = Arc::new(SubacquirerRegistry::new(&config));
    let engine = Arc::new(ReconcileEngine::new(
        Arc::clone(&pix_store),
        Arc::clone(&withdrawal_store),
        Arc::clone(&subacquirer_store),
        Arc::clone(&registry),
    ));
    let runner = Arc::new(WebhookJobRunner::new(
        Arc::clone(&engine),
        config.webhook.clone(),
    ));
    let simulator = Arc::new(WebhookSimulator::new(runner, config.webhook.clone()));

    let create_pix = CreatePixAction::new(
        Arc::clone(&pix_store),
        Arc::clone(&registry),
        Arc::clone(&simulator),
    );
    let create_withdrawal = CreateWithdrawalAction::new(
        Arc::clone(&withdrawal_store),
        Arc::clone(&registry),
        Arc::clone(&simulator),
    );

    Harness {
        pix_store,
        withdrawal_store,
        subacquirer_store,
        registry,
        engine,
        create_pix,
        create_withdrawal,
        subadq_a,
        subadq_b,
        user_id: Uuid::new_v4(),
    }
}

pub async fn mock_harness() -> Harness {
    harness_with_config(Config::mock()).await
}

/// Sleep long enough for any scheduled webhook job to have run.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(200)).await;
}
