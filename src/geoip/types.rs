//! Location record produced by enrichment.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{LOCAL_NETWORK_LABEL, UNKNOWN_LABEL};

/// Normalized geolocation for one address.
///
/// Always has all three fields; anything the lookup could not provide is
/// `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub country: String,
    pub city: String,
    /// Organization / ISP (ipinfo's `org`, usually `"AS<n> <name>"`)
    pub org: String,
}

impl LocationRecord {
    /// Record used for private/local addresses.
    pub fn local() -> Self {
        Self::filled(LOCAL_NETWORK_LABEL)
    }

    /// Fallback record for failed or skipped lookups.
    pub fn unknown() -> Self {
        Self::filled(UNKNOWN_LABEL)
    }

    fn filled(label: &str) -> Self {
        Self {
            country: label.to_string(),
            city: label.to_string(),
            org: label.to_string(),
        }
    }

    /// Maps an ipinfo-style JSON body onto the fixed shape.
    ///
    /// Missing, null or non-string fields become `"unknown"`; extra fields are
    /// ignored.
    pub fn from_lookup_body(body: &Value) -> Self {
        let field = |name: &str| {
            body.get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_LABEL)
                .to_string()
        };

        Self {
            country: field("country"),
            city: field("city"),
            org: field("org"),
        }
    }
}
