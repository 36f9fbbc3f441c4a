use std::sync::Arc;

use anyhow::Context;
use payroll_management_backend::{
    AppState, create_router,
    db::{PayrollStore, memory::MemoryStore, pg::PgStore},
    shared::setting::{self, Settings, StorageBackend},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logger(level: &str) {
    // RUST_LOG 优先于配置文件
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn build_store(settings: &Settings) -> anyhow::Result<Arc<dyn PayrollStore>> {
    match settings.database.backend {
        StorageBackend::Memory => {
            info!("using in-memory storage, data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let store = PgStore::new(&settings.database.url, settings.database.max_connections)
                .await
                .context("failed to connect to PostgreSQL")?;
            if settings.database.run_migrations {
                store.migrate().await.context("failed to run migrations")?;
            }
            info!("PostgreSQL connected");
            Ok(Arc::new(store))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = setting::load_config().context("failed to load configuration")?;
    init_logger(&settings.log.level);

    let store = build_store(&settings).await?;
    let app = create_router(
        AppState::new(store.clone(), &settings.jwt),
        &settings.cors,
    );

    let addr = settings.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    Ok(())
}
