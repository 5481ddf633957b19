//! Request handlers.
//!
//! Each handler converts the request into a `RequestContext`, calls the
//! capture pipeline, and maps failures to generic responses so no internal
//! detail reaches the client.

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::Value;

use super::page::render_index;
use super::types::{AppState, DeleteAck, GpsAck};
use crate::capture::RequestContext;
use crate::config::{HEADER_USER_AGENT, HEADER_X_FORWARDED_FOR};
use crate::error_handling::CaptureError;
use crate::storage::DeleteOutcome;

const GENERIC_ERROR_PAGE: &str = "An error occurred while processing the request";
const NO_DATA_MESSAGE: &str = "No data provided";
const INTERNAL_ERROR_MESSAGE: &str = "internal error";

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

fn request_context(headers: &HeaderMap, peer: SocketAddr) -> RequestContext {
    RequestContext {
        forwarded_for: header_value(headers, HEADER_X_FORWARDED_FOR),
        peer: Some(peer.ip()),
        user_agent: header_value(headers, HEADER_USER_AGENT),
    }
}

/// `GET /` - capture the visit and render the report page
pub async fn index_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let ctx = request_context(&headers, peer);

    match state.pipeline.capture(&ctx).await {
        Ok(record) => Html(render_index(&record, &state.cookie_name)).into_response(),
        Err(e) => {
            log::error!("Capture failed for {}: {}", peer, e);
            (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_PAGE).into_response()
        }
    }
}

/// `POST /log_gps` - record client-reported coordinates
pub async fn log_gps_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            log::debug!("Rejecting GPS payload from {}: {}", peer, e);
            return (StatusCode::BAD_REQUEST, Json(GpsAck::error(NO_DATA_MESSAGE))).into_response();
        }
    };

    let ctx = request_context(&headers, peer);
    match state.pipeline.capture_gps(&ctx, payload).await {
        Ok(_) => Json(GpsAck::success()).into_response(),
        Err(CaptureError::EmptyPayload) => {
            (StatusCode::BAD_REQUEST, Json(GpsAck::error(NO_DATA_MESSAGE))).into_response()
        }
        Err(e) => {
            log::error!("GPS capture failed for {}: {}", peer, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(GpsAck::error(INTERNAL_ERROR_MESSAGE)),
            )
                .into_response()
        }
    }
}

/// `POST /delete_data` - purge every record for the caller's address
///
/// Answers `success: true` when the log was rewritten or did not exist yet;
/// in both cases nothing is left stored for the caller.
pub async fn delete_data_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let ctx = request_context(&headers, peer);

    let success = match state.pipeline.forget(&ctx).await {
        Ok(DeleteOutcome::Rewritten { .. }) | Ok(DeleteOutcome::Missing) => true,
        Err(e) => {
            log::error!("Deleting records for {} failed: {}", ctx.client_address(), e);
            false
        }
    };

    Json(DeleteAck { success }).into_response()
}
