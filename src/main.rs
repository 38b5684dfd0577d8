mod classifier;
mod config;
mod drive;
mod error;
mod handlers;
mod multipart;
mod naming;
mod response;

use crate::config::Config;
use crate::drive::{ClientFactory, DriveClientFactory};
use anyhow::Context;
use axum::{routing::any, Extension, Router};
use envconfig::Envconfig;
use std::{sync::Arc, time::Duration};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::init_from_env().context("Failed to load config")?;

    let storage = config.storage();
    if storage.service_account_email.is_empty()
        || storage.private_key.is_empty()
        || storage.folder_id.is_empty()
    {
        warn!("Drive credentials are incomplete, uploads will fail until they are configured");
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let factory: Arc<dyn ClientFactory> = Arc::new(DriveClientFactory::new(storage, http));

    let app = Router::new()
        .route("/upload", any(handlers::upload))
        .layer(Extension(factory))
        .layer(TraceLayer::new_for_http());

    info!("Listening on {}", config.listen_address);

    axum::Server::bind(
        &config
            .listen_address
            .parse()
            .context("Invalid listen address")?,
    )
    .serve(app.into_make_service())
    .await?;

    Ok(())
}
