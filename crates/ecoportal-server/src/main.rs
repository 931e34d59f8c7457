mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use ecoportal_db::PgCatalogStore;
use ecoportal_recommend::RecommendationEngine;
use ecoportal_sync::SyncCoordinator;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ecoportal_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool = ecoportal_db::connect_pool_from_config(&config).await?;
    let applied = ecoportal_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let engine = Arc::new(RecommendationEngine::from_catalog_path(
        &config.catalog_path,
    )?);
    let coordinator = Arc::new(SyncCoordinator::new(PgCatalogStore::new(pool)));

    if config.sync_on_startup {
        match coordinator.perform_comprehensive_sync().await {
            Ok(metrics) => tracing::info!(
                total_brands = metrics.total_brands,
                integrity_score = metrics.integrity_score,
                "startup sync complete"
            ),
            Err(e) => tracing::warn!(error = %e, "startup sync failed; serving without an index"),
        }
    }

    let _scheduler = scheduler::build_scheduler(Arc::clone(&coordinator), &config.sync_cron).await?;

    let auth = AuthState::from_env(matches!(
        config.env,
        ecoportal_core::Environment::Development
    ))?;
    let app = build_app(
        AppState {
            coordinator,
            engine,
        },
        auth,
        default_rate_limit_state(),
    );

    tracing::info!(addr = %config.bind_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
