//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

/// Builds the client used for geolocation lookups.
///
/// The timeout bounds the whole request (connect, send, and body), so a slow
/// upstream can stall a capture for at most `timeout`.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_geo_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(concat!("visitor_log/", env!("CARGO_PKG_VERSION")))
        .build()
}
