//! # tutordesk-server
//!
//! HTTP server for the tutordesk tutoring administration backend.
//!
//! This binary provides:
//! - REST API for invoice generation, PDF storage, and student records
//! - OpenAPI documentation via Swagger UI
//! - Structured logging to file and stdout
//!
//! ## Running
//!
//! ```bash
//! # Development
//! cargo run --package tutordesk-server
//!
//! # Production
//! TUTORDESK_ENV=production ./tutordesk-server
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::net::TcpListener;
use tracing::info;
use tutordesk_core::TutordeskConfig;

use tutordesk_server::{api, logging, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("TUTORDESK_ENV").is_ok_and(|v| v == "production");
    logging::init(is_production)?;

    info!("Starting tutordesk-server");

    let config_path = std::env::var_os("TUTORDESK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(TutordeskConfig::default_path);
    let config = TutordeskConfig::load_or_default(&config_path)?;

    info!(
        storage_root = %config.storage.root.display(),
        database = %config.database.path.display(),
        "Configuration loaded"
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState::new(config)?;
    let app = api::create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
