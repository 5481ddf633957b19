//! Client address classification and resolution.
//!
//! Key functions:
//! - `classify_address()` - decides whether an address needs an external geo lookup
//! - `resolve_client_address()` - picks the client address from proxy headers and the peer

use std::net::IpAddr;

use crate::config::{LOCAL_ADDRESS_PREFIXES, UNKNOWN_LABEL};

/// Whether an address is private/local or must be resolved externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressScope {
    /// Loopback or private range; never sent to the geolocation service
    Local,
    /// Anything else
    External,
}

/// Classifies an address by its textual prefix.
///
/// This is a prefix check on the string, not a CIDR match: every address
/// starting with `172.` is local, including ones outside 172.16.0.0/12.
/// IPv6 addresses are always external.
pub fn classify_address(address: &str) -> AddressScope {
    if LOCAL_ADDRESS_PREFIXES
        .iter()
        .any(|prefix| address.starts_with(prefix))
    {
        AddressScope::Local
    } else {
        AddressScope::External
    }
}

/// Resolves the client address for a request.
///
/// Prefers the first entry of `X-Forwarded-For`, falling back to the transport
/// peer. A forwarded loopback address is ignored in favor of the peer, which
/// guards against local setups that trust the header blindly. Returns the
/// `unknown` marker when neither source yields anything, so callers never
/// see an empty address.
pub fn resolve_client_address(forwarded_for: Option<&str>, peer: Option<IpAddr>) -> String {
    let peer_address = peer.map(|ip| ip.to_string());

    let candidate = forwarded_for
        .and_then(first_forwarded_entry)
        .map(str::to_string)
        .or_else(|| peer_address.clone());

    let resolved = match candidate {
        Some(address) if is_loopback(&address) => peer_address.or(Some(address)),
        other => other,
    };

    resolved.unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}

fn first_forwarded_entry(header: &str) -> Option<&str> {
    header
        .split(',')
        .next()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

fn is_loopback(address: &str) -> bool {
    address
        .parse::<IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}
