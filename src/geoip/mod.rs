//! Geolocation enrichment via an ipinfo-compatible HTTP service.
//!
//! Private/local addresses are answered locally; everything else costs one
//! bounded HTTP request. Lookups never fail from the caller's point of view:
//! errors degrade to `LocationRecord::unknown()` and are logged.

mod lookup;
mod types;

// Re-export public API
pub use lookup::GeoEnricher;
pub use types::LocationRecord;
