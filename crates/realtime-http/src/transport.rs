//! Pluggable HTTP transport.
//!
//! [`RealtimeClient`](crate::RealtimeClient) builds fully signed
//! `http::Request`s and hands them to a [`Transport`]. The default
//! implementation is backed by `reqwest`; tests substitute a recorder.

use std::time::Duration;

use bytes::Bytes;
use realtime_core::{RealtimeError, RealtimeResult};
use tracing::debug;

/// Sends one signed request and returns the raw response.
///
/// Implementations must not retry, and must map connection and timeout
/// failures onto [`RealtimeError::Transport`]. Non-2xx statuses are not
/// errors at this layer.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send `request` and collect the full response body.
    async fn send(&self, request: http::Request<Bytes>) -> RealtimeResult<http::Response<Bytes>>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Transport`] if the underlying client cannot
    /// be constructed (for example, if no TLS backend is available).
    pub fn new(timeout: Duration) -> RealtimeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RealtimeError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: http::Request<Bytes>) -> RealtimeResult<http::Response<Bytes>> {
        let (parts, body) = request.into_parts();
        let url = parts.uri.to_string();
        debug!(method = %parts.method, %url, "sending API request");

        let response = self
            .client
            .request(parts.method, &url)
            .headers(parts.headers)
            .body(body)
            .send()
            .await
            .map_err(|e| RealtimeError::Transport(e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| RealtimeError::Transport(e.to_string()))?;
        debug!(%status, body_len = body.len(), "received API response");

        let mut out = http::Response::new(body);
        *out.status_mut() = status;
        *out.headers_mut() = headers;
        Ok(out)
    }
}
