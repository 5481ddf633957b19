// Shared test helpers for spinning up the service against a mock geolocation API.

use std::path::PathBuf;

use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;

use visitor_log::initialization::init_pipeline;
use visitor_log::{serve_on, AppState, Config};

/// A running server with its own temporary log file.
pub struct TestApp {
    pub base_url: String,
    pub log_file: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    /// Parses every line of the log as JSON.
    #[allow(dead_code)] // Used by other test files
    pub fn records(&self) -> Vec<Value> {
        std::fs::read_to_string(&self.log_file)
            .expect("Failed to read record log")
            .lines()
            .map(|line| serde_json::from_str(line).expect("Log line is not JSON"))
            .collect()
    }
}

/// Starts the service on an ephemeral port, with geolocation lookups going
/// to `geo_endpoint`.
pub async fn spawn_app(geo_endpoint: &str) -> TestApp {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let log_file = dir.path().join("user_data.log");

    let config = Config {
        log_file: log_file.clone(),
        geo_endpoint: geo_endpoint.to_string(),
        geo_timeout_seconds: 2,
        ..Default::default()
    };

    let pipeline = init_pipeline(&config).expect("Failed to build pipeline");
    let state = AppState::new(pipeline, config.cookie_name.as_str());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        let _ = serve_on(listener, state).await;
    });

    TestApp {
        base_url: format!("http://{}", addr),
        log_file,
        _dir: dir,
    }
}
