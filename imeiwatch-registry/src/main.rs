use std::net::SocketAddr;
use std::sync::Arc;

use imeiwatch_registry::config::{AppConfig, StoreBackend};
use imeiwatch_registry::services::auth_service::AdminCredential;
use imeiwatch_registry::services::login_throttle::SystemClock;
use imeiwatch_registry::store::{MemoryReportStore, PgReportStore, ReportStore, SCHEMA_SQL};
use imeiwatch_registry::{build_router, AppState};
use imeiwatch_shared::clients::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    imeiwatch_shared::middleware::init_tracing("imeiwatch-registry");

    let config = AppConfig::load()?;
    let port = config.port;

    let store: Arc<dyn ReportStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = db::create_pool(&config.database_url, config.db_pool_size)?;
            db::ensure_schema(&pool, SCHEMA_SQL)?;
            Arc::new(PgReportStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory report store, reports are lost on restart");
            Arc::new(MemoryReportStore::new())
        }
    };

    let metrics_handle = imeiwatch_shared::middleware::init_metrics()?;

    let state = AppState::new(config, store, Arc::new(SystemClock)).with_metrics(metrics_handle);
    if matches!(state.credential, AdminCredential::Unconfigured) {
        tracing::warn!("no admin password configured, admin login is disabled");
    }

    let app = build_router(Arc::new(state));

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "imeiwatch-registry starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
