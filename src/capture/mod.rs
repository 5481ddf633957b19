//! Per-request capture pipeline.
//!
//! Turns a `RequestContext` into a persisted record:
//! address resolution → geo enrichment → user-agent classification →
//! record assembly → append. The record is serialized before anything is
//! written, so a failed capture leaves no partial line behind.

mod context;
mod records;

use log::debug;
use serde_json::Value;

pub use context::RequestContext;
pub use records::{record_timestamp, GpsRecord, VisitorRecord};

use crate::config::UNKNOWN_LABEL;
use crate::error_handling::{CaptureError, StoreError};
use crate::geoip::GeoEnricher;
use crate::storage::{DeleteOutcome, RecordStore};
use crate::user_agent::classify_user_agent;

/// Orchestrates enrichment and storage for each request.
#[derive(Debug)]
pub struct CapturePipeline {
    geo: GeoEnricher,
    store: RecordStore,
}

impl CapturePipeline {
    pub fn new(geo: GeoEnricher, store: RecordStore) -> Self {
        Self { geo, store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Captures one page view.
    ///
    /// Enrichment and write failures are recovered below this call; an `Err`
    /// means the record could not be assembled and nothing was written.
    pub async fn capture(&self, ctx: &RequestContext) -> Result<VisitorRecord, CaptureError> {
        let ip = ctx.client_address();
        let ua = classify_user_agent(ctx.user_agent.as_deref());
        let geo = self.geo.enrich(&ip).await;

        let record = VisitorRecord {
            time: record_timestamp(),
            ip,
            user_agent: ctx
                .user_agent
                .clone()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            os: ua.os,
            browser: ua.browser,
            device: ua.device,
            geo,
        };

        let line = serde_json::to_string(&record)?;
        self.store.append_line(&line).await;
        debug!(
            "Captured visit from {} ({}, {}, {})",
            record.ip, record.os, record.browser, record.device
        );
        Ok(record)
    }

    /// Captures a client-reported geolocation fix without re-running
    /// enrichment.
    ///
    /// `payload` must be present JSON with some content; `null`, `false`,
    /// `0`, `""`, `{}` and `[]` are rejected with `CaptureError::EmptyPayload`.
    pub async fn capture_gps(
        &self,
        ctx: &RequestContext,
        payload: Value,
    ) -> Result<GpsRecord, CaptureError> {
        if is_empty_payload(&payload) {
            return Err(CaptureError::EmptyPayload);
        }

        let record = GpsRecord {
            time: record_timestamp(),
            ip: ctx.client_address(),
            gps_data: payload,
        };

        let line = serde_json::to_string(&record)?;
        self.store.append_line(&line).await;
        debug!("Captured GPS fix from {}", record.ip);
        Ok(record)
    }

    /// Deletes every record (visits and GPS fixes) for the request's address.
    pub async fn forget(&self, ctx: &RequestContext) -> Result<DeleteOutcome, StoreError> {
        let ip = ctx.client_address();
        self.store.try_delete_by_address(&ip).await
    }
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MalformedLinePolicy;
    use crate::geoip::LocationRecord;
    use crate::storage::test_helpers::read_lines;
    use crate::user_agent::{BrowserFamily, DeviceClass, OsFamily};
    use serde_json::json;
    use std::net::{IpAddr, Ipv4Addr};
    use tempfile::TempDir;

    fn pipeline(dir: &TempDir) -> CapturePipeline {
        // Nothing listens on port 9; external lookups degrade to "unknown".
        let geo = GeoEnricher::new(reqwest::Client::new(), "http://127.0.0.1:9");
        let store = RecordStore::new(dir.path().join("user_data.log"), MalformedLinePolicy::Drop);
        CapturePipeline::new(geo, store)
    }

    fn ctx(forwarded_for: Option<&str>, peer: [u8; 4], ua: Option<&str>) -> RequestContext {
        RequestContext {
            forwarded_for: forwarded_for.map(str::to_string),
            peer: Some(IpAddr::V4(Ipv4Addr::from(peer))),
            user_agent: ua.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_capture_local_visitor() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir);

        let record = pipeline
            .capture(&ctx(
                None,
                [192, 168, 1, 20],
                Some("Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0"),
            ))
            .await
            .unwrap();

        assert_eq!(record.ip, "192.168.1.20");
        assert_eq!(record.os, OsFamily::MacOsX);
        assert_eq!(record.browser, BrowserFamily::Firefox);
        assert_eq!(record.device, DeviceClass::Desktop);
        assert_eq!(record.geo, LocationRecord::local());

        let lines = read_lines(pipeline.store().path());
        assert_eq!(lines, vec![serde_json::to_string(&record).unwrap()]);
    }

    #[tokio::test]
    async fn test_capture_without_user_agent() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir);

        let record = pipeline.capture(&ctx(None, [10, 0, 0, 7], None)).await.unwrap();

        assert_eq!(record.user_agent, "unknown");
        assert_eq!(record.os, OsFamily::Unknown);
        assert_eq!(record.browser, BrowserFamily::Unknown);
        assert_eq!(record.device, DeviceClass::Unknown);
    }

    #[tokio::test]
    async fn test_capture_external_visitor_with_unreachable_lookup() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir);

        let record = pipeline
            .capture(&ctx(Some("203.0.113.5, 10.0.0.1"), [10, 0, 0, 1], Some("curl/8.4.0")))
            .await
            .unwrap();

        assert_eq!(record.ip, "203.0.113.5");
        assert_eq!(record.geo, LocationRecord::unknown());
    }

    #[tokio::test]
    async fn test_capture_gps_uses_resolved_address() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir);
        let payload = json!({"lat": 55.75, "lon": 37.61, "acc": 35.0});

        let record = pipeline
            .capture_gps(&ctx(Some("198.51.100.4, 10.0.0.1"), [10, 0, 0, 1], None), payload.clone())
            .await
            .unwrap();

        assert_eq!(record.ip, "198.51.100.4");
        let lines = read_lines(pipeline.store().path());
        assert_eq!(lines.len(), 1);
        let stored: Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(stored["gps_data"], payload);
        assert!(stored.get("geo").is_none());
    }

    #[tokio::test]
    async fn test_capture_gps_rejects_empty_payload() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir);

        for payload in [
            Value::Null,
            json!({}),
            json!([]),
            json!(""),
            json!(false),
            json!(0),
            json!(0.0),
        ] {
            let result = pipeline.capture_gps(&ctx(None, [10, 0, 0, 1], None), payload).await;
            assert!(matches!(result, Err(CaptureError::EmptyPayload)));
        }
        assert!(!pipeline.store().path().exists());
    }

    #[tokio::test]
    async fn test_capture_gps_accepts_truthy_scalars() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir);

        for payload in [json!(true), json!(1), json!("52.37,4.89")] {
            pipeline
                .capture_gps(&ctx(None, [10, 0, 0, 1], None), payload)
                .await
                .unwrap();
        }
        assert_eq!(read_lines(pipeline.store().path()).len(), 3);
    }

    #[tokio::test]
    async fn test_forget_removes_visits_and_gps_fixes() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir);
        let me = ctx(None, [192, 168, 0, 2], Some("curl/8.4.0"));
        let other = ctx(None, [192, 168, 0, 3], Some("curl/8.4.0"));

        pipeline.capture(&me).await.unwrap();
        pipeline.capture(&other).await.unwrap();
        pipeline.capture_gps(&me, json!({"lat": 1, "lon": 2, "acc": 3})).await.unwrap();

        let outcome = pipeline.forget(&me).await.unwrap();
        assert_eq!(
            outcome,
            DeleteOutcome::Rewritten {
                removed: 2,
                kept: 1,
                dropped_malformed: 0
            }
        );
        let lines = read_lines(pipeline.store().path());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("\"ip\":\"192.168.0.3\""));
    }
}
