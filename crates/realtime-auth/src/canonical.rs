//! Canonical string construction for signed messages.
//!
//! Each message shape has exactly one canonical form. Field order and
//! separators are part of the wire contract with the service:
//!
//! ```text
//! Request    : {timestamp}\n{method}\n{path}\n{body_digest}
//! ChannelAuth: {socket_id}:{channel_name}            (no channel data)
//!              {socket_id}:{channel_name}:{channel_data}
//! Webhook    : {timestamp}.{raw_body}
//! ```
//!
//! No normalization is applied beyond what is listed here. Method casing,
//! path encoding, and channel data are inserted exactly as given.

use md5::{Digest, Md5};

/// A message in one of the three signable shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignableMessage<'a> {
    /// An outbound API request.
    Request {
        /// Unix timestamp in seconds.
        timestamp: i64,
        /// Uppercase HTTP verb.
        method: &'a str,
        /// Path component only, without a query string.
        path: &'a str,
        /// Output of [`body_digest`] for the request body.
        body_digest: String,
    },
    /// A channel subscription authorization.
    ChannelAuth {
        /// Socket id of the subscribing connection.
        socket_id: &'a str,
        /// Channel being subscribed to.
        channel_name: &'a str,
        /// Optional presence payload, inserted verbatim.
        channel_data: Option<&'a str>,
    },
    /// An inbound webhook delivery.
    Webhook {
        /// Raw timestamp header value, unparsed.
        timestamp: &'a str,
        /// Raw request body as received.
        raw_body: &'a str,
    },
}

impl<'a> SignableMessage<'a> {
    /// Build a request message, digesting `body` with [`body_digest`].
    #[must_use]
    pub fn request(timestamp: i64, method: &'a str, path: &'a str, body: &str) -> Self {
        Self::Request {
            timestamp,
            method,
            path,
            body_digest: body_digest(body),
        }
    }

    /// Render the canonical string to be signed.
    ///
    /// # Examples
    ///
    /// ```
    /// use realtime_auth::canonical::SignableMessage;
    ///
    /// let msg = SignableMessage::request(1_700_000_000, "GET", "/apps/123/channels", "");
    /// assert_eq!(msg.canonical_string(), "1700000000\nGET\n/apps/123/channels\n");
    ///
    /// let msg = SignableMessage::Webhook { timestamp: "1700000000", raw_body: "{}" };
    /// assert_eq!(msg.canonical_string(), "1700000000.{}");
    /// ```
    #[must_use]
    pub fn canonical_string(&self) -> String {
        match self {
            Self::Request {
                timestamp,
                method,
                path,
                body_digest,
            } => format!("{timestamp}\n{method}\n{path}\n{body_digest}"),
            Self::ChannelAuth {
                socket_id,
                channel_name,
                channel_data: None,
            } => format!("{socket_id}:{channel_name}"),
            Self::ChannelAuth {
                socket_id,
                channel_name,
                channel_data: Some(data),
            } => format!("{socket_id}:{channel_name}:{data}"),
            Self::Webhook {
                timestamp,
                raw_body,
            } => format!("{timestamp}.{raw_body}"),
        }
    }
}

/// Digest of a request body for the request canonical string.
///
/// An empty body digests to the empty string, not to the MD5 of zero bytes.
/// Any other body digests to the lowercase hex MD5 of its UTF-8 bytes. MD5
/// here is a content fingerprint only.
///
/// # Examples
///
/// ```
/// use realtime_auth::canonical::body_digest;
///
/// assert_eq!(body_digest(""), "");
/// assert_eq!(body_digest("hello"), "5d41402abc4b2a76b9719d911017c592");
/// ```
#[must_use]
pub fn body_digest(body: &str) -> String {
    if body.is_empty() {
        return String::new();
    }
    hex::encode(Md5::digest(body.as_bytes()))
}

/// Strip the query string from a request target, splitting at the first `?`.
///
/// Only the path component takes part in request signing.
///
/// # Examples
///
/// ```
/// use realtime_auth::canonical::canonical_path;
///
/// assert_eq!(canonical_path("/apps/1/channels?filter_by_prefix=presence-"), "/apps/1/channels");
/// assert_eq!(canonical_path("/apps/1/events"), "/apps/1/events");
/// ```
#[must_use]
pub fn canonical_path(path_and_query: &str) -> &str {
    path_and_query
        .split_once('?')
        .map_or(path_and_query, |(path, _)| path)
}
