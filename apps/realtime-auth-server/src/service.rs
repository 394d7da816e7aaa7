//! Hyper service that routes requests to the endpoint handlers.
//!
//! Every response carries an `x-request-id` header. Request bodies larger
//! than [`MAX_BODY_BYTES`] are rejected with `413` before routing.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderValue, Method, StatusCode};
use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use realtime_http::RealtimeClient;
use tracing::debug;

use crate::handler::{self, ServerResponse};

/// Channel authorization endpoint.
pub const AUTH_PATH: &str = "/realtime/auth";

/// Webhook receiver endpoint.
pub const WEBHOOK_PATH: &str = "/realtime/webhooks";

/// Health probe endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// The auth server's request handler.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: Arc<RealtimeClient>,
}

impl AuthService {
    /// Create a service that signs with `client`'s credentials.
    pub fn new(client: RealtimeClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl hyper::service::Service<http::Request<Incoming>> for AuthService {
    type Response = ServerResponse;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let client = Arc::clone(&self.client);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let (parts, incoming) = req.into_parts();
            let response = match collect_body(incoming).await {
                Ok(body) => route(&client, &parts, &body),
                Err(response) => response,
            };
            debug!(
                method = %parts.method,
                path = parts.uri.path(),
                status = response.status().as_u16(),
                %request_id,
                "handled request",
            );
            Ok(with_request_id(response, &request_id))
        })
    }
}

/// Dispatch a collected request to its handler.
pub fn route(client: &RealtimeClient, parts: &http::request::Parts, body: &Bytes) -> ServerResponse {
    match (&parts.method, parts.uri.path()) {
        (&Method::GET, HEALTH_PATH) => handler::health(),
        (&Method::POST, AUTH_PATH) => handler::channel_auth(client, body),
        (&Method::POST, WEBHOOK_PATH) => handler::webhook(client, &parts.headers, body),
        (_, path) => handler::not_found(path),
    }
}

/// Collect the body, enforcing [`MAX_BODY_BYTES`].
async fn collect_body(incoming: Incoming) -> Result<Bytes, ServerResponse> {
    Limited::new(incoming, MAX_BODY_BYTES)
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| {
            if e.is::<http_body_util::LengthLimitError>() {
                handler::error_response(StatusCode::PAYLOAD_TOO_LARGE, "request body too large")
            } else {
                handler::error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("failed to read request body: {e}"),
                )
            }
        })
}

fn with_request_id(mut response: ServerResponse, request_id: &str) -> ServerResponse {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}
