//! REST API server for trade calculations

use item_catalog::ItemCatalog;
use std::sync::Arc;
use trade_engine::FairnessClassifier;
use trade_gateway::logging::initialize_logging;
use trade_gateway::{rest_api, GatewayConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = match std::env::var("TRADE_CONFIG") {
        Ok(path) => GatewayConfig::load_from_file(&path)?,
        Err(_) => GatewayConfig::default(),
    }
    .apply_env()?;

    initialize_logging(&config.logging)?;

    info!("Starting trade gateway v{}", trade_gateway::VERSION);

    // Load item catalog
    let catalog = match &config.catalog.path {
        Some(path) => ItemCatalog::load_from_file(path).await?,
        None => ItemCatalog::builtin()?,
    };
    info!("Loaded {} items into catalog", catalog.len());

    let classifier = FairnessClassifier::new(config.classifier.clone());
    info!("Using threshold model: {:?}", classifier.config().model);

    // Create routes
    let routes = rest_api::create_routes(
        Arc::new(catalog),
        Arc::new(classifier),
        config.server.max_body_bytes,
    );

    // Start server
    let addr = config.server_addr()?;
    info!("Starting REST API server on {}", addr);

    warp::serve(routes).run(addr).await;

    Ok(())
}
