//! HTTP header names read from inbound requests.

/// Proxy-supplied client address chain (`client, proxy1, proxy2`)
pub const HEADER_X_FORWARDED_FOR: &str = "X-Forwarded-For";

/// Raw browser identification string
pub const HEADER_USER_AGENT: &str = "User-Agent";
