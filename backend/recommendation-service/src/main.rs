use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recommendation_service::config::Config;
use recommendation_service::db::PgTopicRepo;
use recommendation_service::jobs::{start_hot_score_refresher, HotScoreRefresherConfig};
use recommendation_service::services::HotScoreService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Starting {} v{}",
        config.app.service_name,
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database
    let db_pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    let topic_repo = Arc::new(PgTopicRepo::new(db_pool));
    let hot_score_service = Arc::new(HotScoreService::new(topic_repo, config.hot_score.clone()));

    let refresher_config = HotScoreRefresherConfig {
        enabled: config.jobs.hot_score_refresh_enabled,
        refresh_interval: Duration::from_secs(config.jobs.hot_score_refresh_interval_secs),
    };
    let refresher = tokio::spawn(start_hot_score_refresher(
        hot_score_service,
        refresher_config,
    ));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping");
    refresher.abort();

    Ok(())
}
