use anyhow::{Context, Result};
use collab_core::EventService;
use collab_storage::{Database, DbEventRepository, DbMembershipOracle};
use collab_worker::{RealizeSweeper, SweeperConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "collab_worker=info,collab_core=info,collab_storage=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("collab-worker starting...");

    let config = SweeperConfig::from_env().context("Invalid worker configuration")?;
    tracing::info!(
        interval_secs = config.interval.as_secs(),
        max_connections = config.max_connections,
        run_once = config.run_once,
        "Sweeper configured"
    );

    let db = Database::with_max_connections(&config.database_url, config.max_connections)
        .await
        .context("Failed to connect to database")?;

    if config.run_migrations {
        db.migrate().await.context("Failed to run migrations")?;
        tracing::info!("Database migrations applied");
    }

    let events = EventService::new(
        Arc::new(DbEventRepository::new(db.clone())),
        Arc::new(DbMembershipOracle::new(db)),
    );
    let sweeper = RealizeSweeper::new(events, config.interval);

    if config.run_once {
        let realized = sweeper.run_once().await.context("Realize sweep failed")?;
        tracing::info!(realized, "Single sweep complete");
        return Ok(());
    }

    sweeper
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await;

    tracing::info!("Worker shutdown complete");
    Ok(())
}
