//! Endpoint handlers.
//!
//! Handlers are synchronous: the body is already collected by the service
//! and the signing core performs no I/O.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use realtime_auth::NormalizedHeaders;
use realtime_http::{PresenceMember, RealtimeClient};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Response type produced by every handler.
pub type ServerResponse = http::Response<Full<Bytes>>;

/// `GET /health`.
pub fn health() -> ServerResponse {
    json_response(StatusCode::OK, &serde_json::json!({ "status": "ok" }))
}

/// `POST /realtime/auth`: issue a channel auth token.
///
/// Expects a form body with `socket_id`, `channel_name`, and for presence
/// channels a JSON `channel_data` member object.
pub fn channel_auth(client: &RealtimeClient, body: &[u8]) -> ServerResponse {
    let form: HashMap<String, String> = form_urlencoded::parse(body).into_owned().collect();

    let (Some(socket_id), Some(channel_name)) = (form.get("socket_id"), form.get("channel_name"))
    else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "`socket_id` and `channel_name` are required",
        );
    };

    let member = match form
        .get("channel_data")
        .map(|raw| serde_json::from_str::<PresenceMember>(raw))
        .transpose()
    {
        Ok(member) => member,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("`channel_data` is not a valid member object: {e}"),
            );
        }
    };

    match client.authorize_channel(socket_id, channel_name, member.as_ref()) {
        Ok(token) => {
            info!(%socket_id, %channel_name, "issued channel auth token");
            json_response(StatusCode::OK, &token)
        }
        Err(e) if e.is_validation() => {
            debug!(%socket_id, %channel_name, error = %e, "refused channel auth");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(e) => {
            error!(error = %e, "channel auth failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

/// `POST /realtime/webhooks`: verify and acknowledge a webhook delivery.
pub fn webhook(client: &RealtimeClient, headers: &HeaderMap, body: &[u8]) -> ServerResponse {
    let Ok(body) = std::str::from_utf8(body) else {
        return error_response(StatusCode::BAD_REQUEST, "webhook body is not UTF-8");
    };

    match client.webhook(&NormalizedHeaders::from(headers), body) {
        Ok(payload) => {
            for event in &payload.events {
                info!(
                    name = %event.name,
                    channel = event.channel.as_deref().unwrap_or_default(),
                    "received webhook event",
                );
            }
            json_response(
                StatusCode::OK,
                &serde_json::json!({ "received": payload.events.len() }),
            )
        }
        Err(e) if e.is_authentication() => {
            warn!("rejected webhook with invalid signature");
            error_response(StatusCode::UNAUTHORIZED, "invalid webhook signature")
        }
        Err(e) => {
            debug!(error = %e, "rejected malformed webhook payload");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

/// Fallback for unknown routes.
pub fn not_found(path: &str) -> ServerResponse {
    error_response(StatusCode::NOT_FOUND, &format!("no route for {path}"))
}

/// Serialize `value` as a JSON response.
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> ServerResponse {
    match serde_json::to_vec(value) {
        Ok(body) => build(status, Bytes::from(body)),
        Err(e) => {
            error!(error = %e, "failed to serialize response");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

/// A `{"error": message}` JSON response.
pub fn error_response(status: StatusCode, message: &str) -> ServerResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    build(status, Bytes::from(body))
}

fn build(status: StatusCode, body: Bytes) -> ServerResponse {
    http::Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Full::new(body))
        .expect("static response parts are valid")
}
