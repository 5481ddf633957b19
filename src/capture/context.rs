//! Transport-independent view of an inbound request.

use std::net::IpAddr;

use crate::address::resolve_client_address;

/// The parts of a request the capture pipeline reads.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Raw `X-Forwarded-For` header, if present
    pub forwarded_for: Option<String>,
    /// Transport-level peer address
    pub peer: Option<IpAddr>,
    /// Raw `User-Agent` header, if present
    pub user_agent: Option<String>,
}

impl RequestContext {
    /// Client address as recorded in the log; never empty.
    pub fn client_address(&self) -> String {
        resolve_client_address(self.forwarded_for.as_deref(), self.peer)
    }
}
