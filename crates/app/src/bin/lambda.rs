//! Letterbox API - AWS Lambda Runtime

use lambda_http::{run, Error};
use tracing::info;

use letterbox_app::{create_app, with_http_layers};
use letterbox_common::config::Config;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .without_time()
        .init();

    info!("Initializing Letterbox API Lambda");

    let config =
        Config::from_env().map_err(|e| Error::from(format!("Configuration error: {}", e)))?;

    let cors_origins = config
        .cors_allowed_origins
        .clone()
        .ok_or_else(|| Error::from("CORS_ALLOWED_ORIGINS environment variable is required"))?;

    let app = create_app(&config)
        .await
        .map_err(|e| Error::from(format!("App initialization error: {}", e)))?;

    let app = with_http_layers(app, &cors_origins);

    info!("Letterbox API Lambda ready to serve requests");

    run(app).await
}
