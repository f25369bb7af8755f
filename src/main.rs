use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use labsight::analysis::model::DisabledModel;
use labsight::analysis::AnalysisOrchestrator;
use labsight::api::AppState;
use labsight::pipeline::acquire::ocr::DisabledOcr;
use labsight::{api, config, db};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Labsight starting v{}", config::APP_VERSION);

    if let Err(e) = run().await {
        tracing::error!(error = %e, "fatal");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = config::database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // Open once at startup so migrations run before the first request
    db::open_database(&db_path)?;
    tracing::info!(path = %db_path.display(), "database ready");

    // Without configured collaborators every analysis degrades to the
    // deterministic fallback; wire real OcrEngine / AnalysisModel
    // implementations here.
    tracing::warn!("no OCR or analysis backend configured; running in degraded mode");
    let state = AppState::new(
        db_path,
        Arc::new(AnalysisOrchestrator::new(Arc::new(DisabledModel))),
        Arc::new(DisabledOcr),
    );

    api::server::serve(config::bind_addr(), state).await?;
    Ok(())
}
