//! Channel subscription auth tokens.
//!
//! A client socket that wants to join a private or presence channel asks the
//! application backend for a token. The backend signs the socket id and
//! channel name (plus the presence payload, if any) and hands back
//! `"{key}:{signature}"`, which the client relays to the service.

use realtime_core::Secret;

use crate::signer::sign_channel_auth;

/// Subscription auth token returned to a client socket.
///
/// Serializes as `{"auth": "..."}`, with `channel_data` included only when
/// it was supplied at authorization time.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuthToken {
    /// `"{key}:{signature}"`.
    pub auth: String,
    /// Presence payload, echoed verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_data: Option<String>,
}

/// Authorize `socket_id` to subscribe to `channel_name`.
///
/// `channel_data`, when present (even empty), is part of the signed string
/// and is echoed unchanged in the token. This is a pure function: identical
/// inputs always produce an identical token.
///
/// # Examples
///
/// ```
/// use realtime_auth::authorize_channel;
/// use realtime_core::Secret;
///
/// let token = authorize_channel(&Secret::new("s"), "key", "1234.5678", "private-x", None);
/// assert!(token.auth.starts_with("key:"));
/// assert!(token.channel_data.is_none());
/// ```
#[must_use]
pub fn authorize_channel(
    secret: &Secret,
    key: &str,
    socket_id: &str,
    channel_name: &str,
    channel_data: Option<&str>,
) -> AuthToken {
    let signature = sign_channel_auth(secret, socket_id, channel_name, channel_data);

    tracing::debug!(socket_id, channel_name, presence = channel_data.is_some(), "authorized channel");

    AuthToken {
        auth: format!("{key}:{signature}"),
        channel_data: channel_data.map(ToOwned::to_owned),
    }
}
