//! Configuration constants.
//!
//! Defaults for the CLI surface plus the fixed labels written into records.

/// Default location of the JSON Lines visitor log
pub const DEFAULT_LOG_FILE: &str = "user_data.log";

/// Default name of the consent cookie set by the page script
pub const DEFAULT_COOKIE_NAME: &str = "user_consent";

/// Default listen address
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 5000;

/// Base URL of the ipinfo-compatible geolocation service.
/// Lookups are issued as `{base}/{ip}/json`.
pub const DEFAULT_GEO_ENDPOINT: &str = "https://ipinfo.io";

/// Geolocation lookup timeout in seconds
pub const GEO_TIMEOUT_SECS: u64 = 5;

/// Fallback value for any field that could not be determined
pub const UNKNOWN_LABEL: &str = "unknown";

/// Value used for every geo field of a private/local address
pub const LOCAL_NETWORK_LABEL: &str = "local network";

/// Textual prefixes treated as private/local.
///
/// `172.` is deliberately coarse: it covers all of 172.0.0.0/8, not only the
/// 172.16.0.0/12 private block.
pub const LOCAL_ADDRESS_PREFIXES: &[&str] = &["127.", "10.", "192.168.", "172."];

/// Timestamp format for persisted records (local clock)
pub const RECORD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
