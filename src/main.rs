use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use pix_gateway::actions::{
    CreatePixAction, CreatePixOutcome, CreateWithdrawalAction, CreateWithdrawalOutcome,
};
use pix_gateway::config::Config;
use pix_gateway::models::withdrawal::AccountType;
use pix_gateway::models::Document;
use pix_gateway::store::memory::{
    InMemoryPixStore, InMemorySubacquirerStore, InMemoryWithdrawalStore,
};
use pix_gateway::store::{PixTransactionStore, SubacquirerStore, WithdrawalStore};
use pix_gateway::subacquirers::types::{CreatePixRequest, CreateWithdrawalRequest};
use pix_gateway::subacquirers::SubacquirerRegistry;
use pix_gateway::webhooks::{ReconcileEngine, WebhookJobRunner, WebhookSimulator};

/// Runs one PIX charge and one withdrawal end-to-end (create, simulated
/// webhook, reconciliation) and prints the final state of both records.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    tracing::info!(mode = ?config.mode, "starting pix-gateway demo");

    let pix_store: Arc<dyn PixTransactionStore> = Arc::new(InMemoryPixStore::new());
    let withdrawal_store: Arc<dyn WithdrawalStore> = Arc::new(InMemoryWithdrawalStore::new());
    let subacquirer_store: Arc<dyn SubacquirerStore> = Arc::new(InMemorySubacquirerStore::new());

    for subacquirer in config.seed_subacquirers() {
        subacquirer_store.insert(subacquirer).await?;
    }

    let registry = Arc::new(SubacquirerRegistry::new(&config));
    let engine = Arc::new(ReconcileEngine::new(
        Arc::clone(&pix_store),
        Arc::clone(&withdrawal_store),
        Arc::clone(&subacquirer_store),
        Arc::clone(&registry),
    ));
    let runner = Arc::new(WebhookJobRunner::new(engine, config.webhook.clone()));
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

    let user_id = Uuid::new_v4();
    let subadq_a = subacquirer_store
        .find_by_code("subadq_a")
        .await?
        .expect("subadq_a seeded");
    let subadq_b = subacquirer_store
        .find_by_code("subadq_b")
        .await?
        .expect("subadq_b seeded");

    let pix = match create_pix
        .handle(
            user_id,
            &subadq_a,
            CreatePixRequest {
                amount: Decimal::new(12550, 2),
                description: Some("Pedido #1042".to_string()),
                customer_name: Some("Cliente Demo".to_string()),
                customer_document: Some(Document::new("123.456.789-01")),
            },
        )
        .await?
    {
        CreatePixOutcome::Created(tx) => tx,
        CreatePixOutcome::Rejected { reason, .. } => {
            anyhow::bail!("pix creation rejected: {reason}")
        }
    };

    let withdrawal = match create_withdrawal
        .handle(
            user_id,
            &subadq_b,
            CreateWithdrawalRequest {
                amount: Decimal::new(30000, 2),
                bank_code: "001".to_string(),
                agency: "0001".to_string(),
                account: "12345-6".to_string(),
                account_type: AccountType::Checking,
                holder_name: "Cliente Demo".to_string(),
                holder_document: Document::new("123.456.789-01"),
            },
        )
        .await?
    {
        CreateWithdrawalOutcome::Created(wd) => wd,
        CreateWithdrawalOutcome::Rejected { reason, .. } => {
            anyhow::bail!("withdrawal rejected: {reason}")
        }
    };

    // Give the simulated webhooks time to land.
    let settle = config.webhook.withdrawal_delay.max(config.webhook.pix_delay)
        + std::time::Duration::from_millis(500);
    tokio::time::sleep(settle).await;

    let pix = pix_store
        .find_by_id(pix.id)
        .await?
        .expect("pix record exists");
    let withdrawal = withdrawal_store
        .find_by_id(withdrawal.id)
        .await?
        .expect("withdrawal record exists");

    tracing::info!(
        transaction_id = %pix.transaction_id,
        status = ?pix.status,
        paid_at = ?pix.paid_at,
        "final pix state"
    );
    tracing::info!(
        withdrawal_id = %withdrawal.withdrawal_id,
        status = ?withdrawal.status,
        completed_at = ?withdrawal.completed_at,
        "final withdrawal state"
    );

    Ok(())
}
