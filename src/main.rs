use std::sync::Arc;

use anyhow::Result;
use api::{AppState, IngestDefaults};
use rag_pipeline::NoopProgress;
use tracing::{Level, info};
use travel_assistant_backend::{build_services, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win.
    dotenvy::dotenv().ok();
    init_tracing(Level::DEBUG)?;

    let services = build_services(Arc::new(NoopProgress))?;
    let address = std::env::var("API_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".into());

    let state = AppState::new(
        services.assistant,
        services.ingestor,
        IngestDefaults::from(&services.config),
    );

    info!(%address, "starting travel assistant backend");
    api::start(state, &address).await?;
    Ok(())
}
