//! Error handling.
//!
//! Error types are split by the component that produces them:
//! - **Initialization**: logger and HTTP client setup
//! - **Enrichment**: geolocation lookups (always recovered, never propagated)
//! - **Store**: record log I/O (recovered on append, typed on delete)
//! - **Capture**: pipeline failures surfaced to the HTTP layer

mod types;

// Re-export public API
pub use types::{CaptureError, EnrichmentError, InitializationError, StoreError};
