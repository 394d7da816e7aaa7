//! Integration tests for the Realtime SDK and auth server.
//!
//! Tests that talk to a running `realtime-auth-server` (default
//! `http://localhost:4567`) are marked `#[ignore]`. Start the server with the
//! same credentials the tests use, then run:
//!
//! ```text
//! REALTIME_APP_ID=123 REALTIME_KEY=test-key REALTIME_SECRET=test-secret \
//!     cargo run -p realtime-auth-server &
//! cargo test -p realtime-integration -- --ignored
//! ```
//!
//! The remaining tests exercise the crates together in-process.

use std::sync::Once;

use realtime_core::Secret;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Base URL of the auth server under test.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("REALTIME_AUTH_URL").unwrap_or_else(|_| "http://localhost:4567".to_owned())
}

/// Application key the server was started with.
#[must_use]
pub fn test_key() -> String {
    std::env::var("REALTIME_KEY").unwrap_or_else(|_| "test-key".to_owned())
}

/// Application secret the server was started with.
#[must_use]
pub fn test_secret() -> Secret {
    Secret::new(std::env::var("REALTIME_SECRET").unwrap_or_else(|_| "test-secret".to_owned()))
}

/// HTTP client for talking to the auth server.
#[must_use]
pub fn http_client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Generate a unique, well-formed socket id.
#[must_use]
pub fn test_socket_id() -> String {
    let (hi, lo) = uuid::Uuid::new_v4().as_u64_pair();
    format!("{}.{}", hi % 1_000_000, lo % 1_000_000)
}

/// Current Unix time in seconds, as sent in `X-Realtime-Timestamp`.
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

mod test_auth;
mod test_flow;
mod test_webhook;
