//! Request signing, channel authorization, and webhook verification for the
//! Realtime server SDK.
//!
//! Everything in this crate is a pure, synchronous function of its inputs.
//! There is no shared state and no I/O, so every operation is safe to call
//! concurrently.
//!
//! # Overview
//!
//! Three message shapes are signed with HMAC-SHA256 under the application
//! secret, each with its own canonical form:
//!
//! ```text
//! API request : {timestamp}\n{METHOD}\n{path}\n{md5(body) or ""}
//! channel auth: {socket_id}:{channel_name}[:{channel_data}]
//! webhook     : {timestamp}.{raw_body}
//! ```
//!
//! # Usage
//!
//! ```rust
//! use realtime_auth::{authorize_channel, sign_webhook, verify_webhook, NormalizedHeaders};
//! use realtime_core::Secret;
//!
//! let secret = Secret::new("app-secret");
//!
//! // Issue a subscription token for a private channel.
//! let token = authorize_channel(&secret, "app-key", "1234.5678", "private-orders", None);
//! assert!(token.auth.starts_with("app-key:"));
//!
//! // Verify an inbound webhook.
//! let body = r#"{"time_ms":1700000000000,"events":[]}"#;
//! let signature = sign_webhook(&secret, "1700000000", body);
//! let headers = NormalizedHeaders::from_pairs([
//!     ("X-Realtime-Signature", format!("sha256={signature}")),
//!     ("X-Realtime-Timestamp", "1700000000".to_owned()),
//! ]);
//! assert!(verify_webhook(&secret, &headers, body, None));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical string construction for each signed message shape
//! - [`signer`] - HMAC-SHA256 signing of canonical messages
//! - [`channel`] - Channel subscription auth tokens
//! - [`request`] - Outbound API request signatures and headers
//! - [`headers`] - Case-insensitive header normalization
//! - [`clock`] - Injectable time source
//! - [`webhook`] - Inbound webhook verification

pub mod canonical;
pub mod channel;
pub mod clock;
pub mod headers;
pub mod request;
pub mod signer;
pub mod webhook;

pub use canonical::{SignableMessage, body_digest, canonical_path};
pub use channel::{AuthToken, authorize_channel};
pub use clock::{Clock, FixedClock, SystemClock};
pub use headers::NormalizedHeaders;
pub use request::{RequestAuthenticator, sign_for_transport};
pub use signer::{Signature, sign, sign_channel_auth, sign_request, sign_webhook};
pub use webhook::{WebhookVerifier, verify_webhook, verify_webhook_with_clock};
