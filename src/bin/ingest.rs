//! Batch ingestion: indexes `<POLICIES_DIR>/<airline>/*` for every configured airline.

use std::sync::Arc;

use anyhow::Result;
use rag_pipeline::IndicatifProgress;
use tracing::{Level, info, warn};
use travel_assistant_backend::{build_services, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(Level::INFO)?;

    let services = build_services(Arc::new(IndicatifProgress::new()))?;
    let cfg = &services.config;
    info!(
        dir = %cfg.policies_dir.display(),
        airlines = ?cfg.ingest_airlines,
        locale = %cfg.ingest_locale,
        version = %cfg.ingest_policy_version,
        "ingestion started"
    );

    let reports = services
        .ingestor
        .ingest_all(
            &cfg.policies_dir,
            &cfg.ingest_airlines,
            &cfg.ingest_locale,
            &cfg.ingest_policy_version,
        )
        .await;

    let mut failed = 0;
    for report in &reports {
        println!(
            "{}: {} documents, {} chunks, {} skipped, {} failed",
            report.airline,
            report.documents_indexed,
            report.chunks_indexed,
            report.skipped,
            report.failures.len()
        );
        for f in &report.failures {
            warn!(airline = %report.airline, doc_id = %f.doc_id, reason = %f.reason, "document failed");
        }
        failed += report.failures.len();
    }

    anyhow::ensure!(failed == 0, "{failed} document(s) failed to ingest");
    Ok(())
}
