mod worker;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use veggie_catalog::CatalogService;
use veggie_order::{OrderBuilder, OrderSettings, RecurringOrderSweep};
use veggie_store::{app_config::Config, DbClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veggie_worker=debug,veggie_store=info,veggie_order=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        "Starting veggie worker (locale {}, credit policy {:?})",
        config.settings.locale,
        config.orders.credit_policy
    );

    let db = DbClient::new(&config.database.url, config.database.max_connections).await?;
    db.init_schema().await?;
    let store = Arc::new(db.store());

    CatalogService::new(store.clone()).seed().await?;

    let settings = OrderSettings {
        fulfilment_location: config.orders.fulfilment_location.clone(),
        credit_policy: config.orders.credit_policy,
    };
    let builder = Arc::new(OrderBuilder::new(store, settings));
    let sweep = Arc::new(RecurringOrderSweep::new(builder));

    tokio::select! {
        _ = worker::start_recurring_order_worker(sweep, config.recurrence.sweep_interval_seconds) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Shutdown signal received, stopping worker");
        }
    }

    Ok(())
}
