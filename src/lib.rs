//! visitor_log library: visitor capture, enrichment and storage
//!
//! Turns inbound page views into JSON Lines records carrying the client
//! address, a geolocation guess, and OS/browser/device labels. Records can be
//! purged retroactively by address.
//!
//! # Example
//!
//! ```no_run
//! use visitor_log::{serve, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     port: 8080,
//!     ..Default::default()
//! };
//! serve(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod address;
pub mod capture;
pub mod config;
pub mod error_handling;
pub mod geoip;
pub mod initialization;
pub mod server;
pub mod storage;
pub mod user_agent;

// Re-export public API
pub use capture::{CapturePipeline, GpsRecord, RequestContext, VisitorRecord};
pub use config::{Config, LogFormat, LogLevel, MalformedLinePolicy};
pub use geoip::{GeoEnricher, LocationRecord};
pub use server::{build_router, serve, serve_on, AppState};
pub use storage::{DeleteOutcome, RecordStore};
