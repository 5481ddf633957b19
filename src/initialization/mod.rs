//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger
//! - HTTP client for geolocation lookups
//! - The capture pipeline with its record store

mod client;
mod logger;

use std::sync::Arc;

use crate::capture::CapturePipeline;
use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::geoip::GeoEnricher;
use crate::storage::RecordStore;

// Re-export public API
pub use client::init_geo_client;
pub use logger::init_logger_with;

/// Wires the record store and geo enricher described by `config` into a
/// shareable capture pipeline.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if the lookup client cannot
/// be built.
pub fn init_pipeline(config: &Config) -> Result<Arc<CapturePipeline>, InitializationError> {
    let client = init_geo_client(config.geo_timeout())?;
    let enricher = GeoEnricher::new(client, config.geo_endpoint.clone());
    let store = RecordStore::new(config.log_file.clone(), config.malformed_lines);
    Ok(Arc::new(CapturePipeline::new(enricher, store)))
}
