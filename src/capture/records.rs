//! Persisted record shapes.
//!
//! Field names are the on-disk keys of the JSON Lines log.

use chrono::Local;
use serde::Serialize;
use serde_json::Value;

use crate::config::RECORD_TIME_FORMAT;
use crate::geoip::LocationRecord;
use crate::user_agent::{BrowserFamily, DeviceClass, OsFamily};

/// One page view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitorRecord {
    pub time: String,
    pub ip: String,
    pub user_agent: String,
    pub os: OsFamily,
    pub browser: BrowserFamily,
    pub device: DeviceClass,
    pub geo: LocationRecord,
}

/// One client-reported geolocation fix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpsRecord {
    pub time: String,
    pub ip: String,
    /// Payload as posted by the page, typically `{lat, lon, acc}`
    pub gps_data: Value,
}

/// Current local time in the record timestamp format.
pub fn record_timestamp() -> String {
    Local::now().format(RECORD_TIME_FORMAT).to_string()
}
