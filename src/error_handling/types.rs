//! Error type definitions.
//!
//! Each component owns one error enum. Enrichment and write errors are
//! recovered by the component that raises them and only ever surface as log
//! events; capture errors reach the HTTP boundary as a generic failure.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Failures of a single geolocation lookup.
#[derive(Error, Debug)]
pub enum EnrichmentError {
    /// Transport failure, including timeouts.
    #[error("geolocation request failed: {0}")]
    Request(#[source] ReqwestError),

    /// The service answered with something other than 200.
    #[error("geolocation service returned HTTP {0}")]
    Status(u16),

    /// The body was not the expected JSON object.
    #[error("geolocation response could not be parsed: {0}")]
    Decode(#[source] ReqwestError),
}

impl EnrichmentError {
    /// Whether the lookup was cut off by the client timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, EnrichmentError::Request(e) if e.is_timeout())
    }
}

/// Record store I/O and encoding errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error while reading, appending or replacing the log.
    #[error("record store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded as JSON.
    #[error("record serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The blocking rewrite task panicked or was cancelled.
    #[error("record store rewrite task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Failures that abort a capture before anything is persisted.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The assembled record could not be serialized.
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// GPS capture was invoked without usable coordinates.
    #[error("no GPS data provided")]
    EmptyPayload,
}
