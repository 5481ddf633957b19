//! Shared state and response bodies for the HTTP server.

use std::sync::Arc;

use serde::Serialize;

use crate::capture::CapturePipeline;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<CapturePipeline>,
    pub cookie_name: Arc<str>,
}

impl AppState {
    pub fn new(pipeline: Arc<CapturePipeline>, cookie_name: impl Into<Arc<str>>) -> Self {
        Self {
            pipeline,
            cookie_name: cookie_name.into(),
        }
    }
}

/// JSON response for `/log_gps`
#[derive(Debug, Serialize)]
pub struct GpsAck {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl GpsAck {
    pub fn success() -> Self {
        Self {
            status: "success",
            message: None,
        }
    }

    pub fn error(message: &'static str) -> Self {
        Self {
            status: "error",
            message: Some(message),
        }
    }
}

/// JSON response for `/delete_data`
#[derive(Debug, Serialize)]
pub struct DeleteAck {
    pub success: bool,
}
