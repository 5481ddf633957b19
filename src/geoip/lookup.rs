//! Address lookup against the geolocation service.

use std::net::IpAddr;

use log::{debug, warn};
use serde_json::Value;

use super::types::LocationRecord;
use crate::address::{classify_address, AddressScope};
use crate::error_handling::EnrichmentError;

/// Resolves addresses to `LocationRecord`s.
///
/// Holds the HTTP client (whose timeout bounds every lookup) and the service
/// base URL. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct GeoEnricher {
    client: reqwest::Client,
    base_url: String,
}

impl GeoEnricher {
    /// Creates an enricher querying `{base_url}/{ip}/json`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Looks up `address`, degrading to the fallback record on any failure.
    ///
    /// Local addresses return `LocationRecord::local()` without touching the
    /// network. Strings that are not IP addresses (such as the `unknown`
    /// marker or a forged forwarding header) are not sent upstream.
    pub async fn enrich(&self, address: &str) -> LocationRecord {
        if classify_address(address) == AddressScope::Local {
            return LocationRecord::local();
        }

        if address.parse::<IpAddr>().is_err() {
            debug!("Skipping geolocation lookup for non-IP address {:?}", address);
            return LocationRecord::unknown();
        }

        match self.lookup(address).await {
            Ok(record) => record,
            Err(e) => {
                if e.is_timeout() {
                    warn!("Geolocation lookup for {} timed out", address);
                } else {
                    warn!("Geolocation lookup for {} failed: {}", address, e);
                }
                LocationRecord::unknown()
            }
        }
    }

    async fn lookup(&self, address: &str) -> Result<LocationRecord, EnrichmentError> {
        let response = self
            .client
            .get(self.lookup_url(address))
            .send()
            .await
            .map_err(EnrichmentError::Request)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(EnrichmentError::Status(status.as_u16()));
        }

        let body: Value = response.json().await.map_err(EnrichmentError::Decode)?;
        Ok(LocationRecord::from_lookup_body(&body))
    }

    fn lookup_url(&self, address: &str) -> String {
        format!("{}/{}/json", self.base_url, address)
    }
}
