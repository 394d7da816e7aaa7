//! HMAC-SHA256 signing of canonical messages.

use std::fmt;

use hmac::{Hmac, KeyInit, Mac};
use realtime_core::Secret;
use sha2::Sha256;

use crate::canonical::SignableMessage;

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex encoding of a 32-byte HMAC-SHA256 digest.
///
/// Signatures can only be obtained by signing a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    /// Length of a hex-encoded signature.
    pub const HEX_LEN: usize = 64;

    /// Get the signature as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the signature, returning the hex string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Sign a message under `secret`.
#[must_use]
pub fn sign(secret: &Secret, message: &SignableMessage<'_>) -> Signature {
    Signature(hmac_sha256_hex(
        secret.expose().as_bytes(),
        message.canonical_string().as_bytes(),
    ))
}

/// Sign an API request. `path` must already be stripped of its query string.
///
/// # Examples
///
/// ```
/// use realtime_auth::sign_request;
/// use realtime_core::Secret;
///
/// let sig = sign_request(&Secret::new("s"), 1_700_000_000, "GET", "/apps/1/channels", "");
/// assert_eq!(sig.as_str().len(), 64);
/// ```
#[must_use]
pub fn sign_request(
    secret: &Secret,
    timestamp: i64,
    method: &str,
    path: &str,
    body: &str,
) -> Signature {
    sign(secret, &SignableMessage::request(timestamp, method, path, body))
}

/// Sign a channel subscription for `socket_id` on `channel_name`.
#[must_use]
pub fn sign_channel_auth(
    secret: &Secret,
    socket_id: &str,
    channel_name: &str,
    channel_data: Option<&str>,
) -> Signature {
    sign(
        secret,
        &SignableMessage::ChannelAuth {
            socket_id,
            channel_name,
            channel_data,
        },
    )
}

/// Sign a webhook delivery from its raw timestamp header and raw body.
#[must_use]
pub fn sign_webhook(secret: &Secret, timestamp: &str, raw_body: &str) -> Signature {
    sign(
        secret,
        &SignableMessage::Webhook {
            timestamp,
            raw_body,
        },
    )
}

/// Compute HMAC-SHA256 and return it hex-encoded.
fn hmac_sha256_hex(key: &[u8], data: &[u8]) -> String {
    let mut mac =
        <HmacSha256 as KeyInit>::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    hex::encode(mac.finalize().into_bytes())
}
