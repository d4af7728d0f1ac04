//! Maintenance Inference API - Main Entry Point

use api::{init_logging, run_server, ServiceSettings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Equipment Maintenance API v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = ServiceSettings::load()?;
    run_server(&settings).await?;

    Ok(())
}
