//! HTTP server exposing the capture pipeline.
//!
//! Provides three endpoints:
//! - `GET /` - capture the visit and render the report page
//! - `POST /log_gps` - record client-reported coordinates
//! - `POST /delete_data` - purge the caller's records

mod handlers;
mod page;
mod types;

use std::net::SocketAddr;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use handlers::{delete_data_handler, index_handler, log_gps_handler};
pub use page::{escape_html, render_index};
pub use types::{AppState, DeleteAck, GpsAck};

use crate::config::Config;
use crate::initialization::init_pipeline;

/// Builds the router. Handlers need `ConnectInfo<SocketAddr>`, so serve it
/// with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/log_gps", post(log_gps_handler))
        .route("/delete_data", post(delete_data_handler))
        .with_state(state)
}

/// Initializes the pipeline from `config`, binds, and serves until the
/// process is stopped.
pub async fn serve(config: Config) -> Result<(), anyhow::Error> {
    let pipeline = init_pipeline(&config).context("Failed to initialize capture pipeline")?;
    let state = AppState::new(pipeline, config.cookie_name.as_str());

    let address = config.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to {}: {}", address, e))?;

    log::info!("Recording visits to {}", config.log_file.display());
    serve_on(listener, state).await
}

/// Serves on an already-bound listener.
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<(), anyhow::Error> {
    let local = listener
        .local_addr()
        .context("Failed to read listener address")?;
    log::info!("Listening on http://{}/", local);

    axum::serve(
        listener,
        build_router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
