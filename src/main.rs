// ==========================================
// Quotation system - HTTP server entry point
// ==========================================
// Settings: QUOTATION_DB_PATH / QUOTATION_BIND_ADDR / QUOTATION_LOCALE
// Logging: RUST_LOG / LOG_FORMAT
// ==========================================

use std::sync::Arc;

use anyhow::Context;
use saho_quotation::app::{build_router, AppState};
use saho_quotation::config::{AppConfig, ImportConfigReader};
use saho_quotation::{i18n, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", saho_quotation::APP_NAME, saho_quotation::VERSION);
    tracing::info!("==================================================");

    let config = AppConfig::from_env();
    i18n::set_locale(&config.locale);
    tracing::info!(db_path = %config.db_path, locale = %config.locale, "configuration loaded");

    let state = AppState::new(config.db_path.clone())
        .with_context(|| format!("failed to initialize database at {}", config.db_path))?;

    let max_upload_mb = state
        .config
        .get_max_upload_mb()
        .await
        .map_err(|e| anyhow::anyhow!("failed to read import.max_upload_mb: {e}"))?;

    let app = build_router(Arc::new(state), max_upload_mb);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(bind_addr = %config.bind_addr, max_upload_mb, "server listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
