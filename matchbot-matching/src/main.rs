use std::sync::Arc;

use matchbot_matching::config::AppConfig;
use matchbot_matching::{build_router, store, AppState};
use matchbot_shared::clients::db::create_pool;
use matchbot_shared::clients::rabbitmq::RabbitMQClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    matchbot_shared::middleware::init_tracing("matchbot-matching");

    let config = AppConfig::load()?;
    let port = config.port;

    // Database pool + schema
    let db = create_pool(&config.database_url, config.db_pool_size)?;
    store::init_schema(&db)?;

    let metrics_handle = matchbot_shared::middleware::init_metrics()?;
    let rabbitmq = match config.rabbitmq_url.as_deref() {
        Some(url) => Some(RabbitMQClient::connect(url).await?),
        None => {
            tracing::warn!("MATCHBOT__RABBITMQ_URL not set, match notifications will only be logged");
            None
        }
    };

    let mut state = AppState::new(db, config).with_metrics(metrics_handle);
    if let Some(rabbitmq) = rabbitmq {
        state = state.with_rabbitmq(rabbitmq);
    }
    let app = build_router(Arc::new(state));

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "matchbot-matching starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
