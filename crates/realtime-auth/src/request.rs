//! Outbound API request signatures.
//!
//! Every API call carries three headers computed here:
//!
//! - `X-Realtime-Key` - the application key
//! - `X-Realtime-Timestamp` - Unix seconds, as captured by the caller
//! - `X-Realtime-Signature` - hex HMAC-SHA256 of the request canonical string
//!
//! The signature covers the path only. [`RequestAuthenticator::signed_headers`]
//! strips the query string itself. [`sign_for_transport`] signs whatever path
//! it is given.

use http::{HeaderMap, HeaderValue, Method};
use realtime_core::{RealtimeError, RealtimeResult, Secret};

use crate::canonical::canonical_path;
use crate::headers::{KEY_HEADER, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::signer::{Signature, sign_request};

/// Sign an outbound request.
///
/// `path` must already be stripped of any query string and `timestamp` is
/// the Unix time the caller will also send in `X-Realtime-Timestamp`.
///
/// # Examples
///
/// ```
/// use realtime_auth::sign_for_transport;
/// use realtime_core::Secret;
///
/// let a = sign_for_transport(&Secret::new("s"), "GET", "/apps/1/channels", "", 1_700_000_000);
/// let b = sign_for_transport(&Secret::new("s"), "GET", "/apps/1/channels", "", 1_700_000_000);
/// assert_eq!(a, b);
/// ```
#[must_use]
pub fn sign_for_transport(
    secret: &Secret,
    method: &str,
    path: &str,
    body: &str,
    timestamp: i64,
) -> Signature {
    sign_request(secret, timestamp, method, path, body)
}

/// Produces signed headers for outbound API requests.
#[derive(Debug, Clone)]
pub struct RequestAuthenticator {
    key: HeaderValue,
    secret: Secret,
}

impl RequestAuthenticator {
    /// Create an authenticator for the given application credentials.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Validation`] if `key` is empty or cannot be
    /// sent as a header value.
    pub fn new(key: &str, secret: Secret) -> RealtimeResult<Self> {
        if key.is_empty() {
            return Err(RealtimeError::validation("application key is empty"));
        }
        let key = HeaderValue::from_str(key)
            .map_err(|_| RealtimeError::validation("application key is not a valid header value"))?;
        Ok(Self { key, secret })
    }

    /// Sign a request and return its three authentication headers.
    ///
    /// `path_and_query` may include a query string; only the path is signed.
    #[must_use]
    pub fn signed_headers(
        &self,
        method: &Method,
        path_and_query: &str,
        body: &str,
        timestamp: i64,
    ) -> HeaderMap {
        let path = canonical_path(path_and_query);
        let signature = sign_for_transport(&self.secret, method.as_str(), path, body, timestamp);

        tracing::debug!(%method, path, timestamp, body_len = body.len(), "signed API request");

        let mut headers = HeaderMap::with_capacity(3);
        headers.insert(KEY_HEADER, self.key.clone());
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from(timestamp));
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_str(signature.as_str()).expect("hex digest is a valid header value"),
        );
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: i64 = 1_700_000_000;

    fn secret() -> Secret {
        Secret::new("my-secret-key")
    }

    #[test]
    fn test_should_be_deterministic() {
        let a = sign_for_transport(&secret(), "POST", "/apps/1/events", "{}", TS);
        let b = sign_for_transport(&secret(), "POST", "/apps/1/events", "{}", TS);
        assert_eq!(a, b);
    }

    #[test]
    fn test_should_change_with_every_input() {
        let base = sign_for_transport(&secret(), "POST", "/apps/1/events", "{}", TS);
        let variants = [
            sign_for_transport(&Secret::new("other"), "POST", "/apps/1/events", "{}", TS),
            sign_for_transport(&secret(), "PUT", "/apps/1/events", "{}", TS),
            sign_for_transport(&secret(), "POST", "/apps/2/events", "{}", TS),
            sign_for_transport(&secret(), "POST", "/apps/1/events", "{ }", TS),
            sign_for_transport(&secret(), "POST", "/apps/1/events", "{}", TS + 1),
        ];
        for variant in variants {
            assert_ne!(base, variant);
        }
    }

    #[test]
    fn test_should_use_empty_digest_for_empty_body() {
        let sig = sign_for_transport(&secret(), "GET", "/apps/123/channels", "", TS);
        assert_eq!(
            sig.as_str(),
            "ef64acd57f8011c92968cb57c875ed59c06adc5b4bc7f1aed04f739bd1856e34"
        );
    }

    #[test]
    fn test_should_sign_query_string_differently_from_stripped_path() {
        let with_query = sign_for_transport(
            &secret(),
            "GET",
            "/apps/123/channels?filter_by_prefix=presence-",
            "",
            TS,
        );
        let stripped = sign_for_transport(&secret(), "GET", "/apps/123/channels", "", TS);
        assert_ne!(with_query, stripped);
    }

    #[test]
    fn test_should_strip_query_when_building_headers() {
        let auth = RequestAuthenticator::new("app-key", secret()).unwrap();
        let headers = auth.signed_headers(
            &Method::GET,
            "/apps/123/channels?filter_by_prefix=presence-",
            "",
            TS,
        );
        let stripped = sign_for_transport(&secret(), "GET", "/apps/123/channels", "", TS);

        assert_eq!(headers.len(), 3);
        assert_eq!(headers[KEY_HEADER], "app-key");
        assert_eq!(headers[TIMESTAMP_HEADER], "1700000000");
        assert_eq!(headers[SIGNATURE_HEADER], stripped.as_str());
    }

    #[test]
    fn test_should_not_prefix_outbound_signature() {
        let auth = RequestAuthenticator::new("app-key", secret()).unwrap();
        let headers = auth.signed_headers(&Method::POST, "/apps/1/events", "{}", TS);
        let value = headers[SIGNATURE_HEADER].to_str().unwrap();
        assert!(!value.starts_with("sha256="));
        assert_eq!(value.len(), 64);
    }

    #[test]
    fn test_should_reject_invalid_keys() {
        assert!(RequestAuthenticator::new("", secret()).unwrap_err().is_validation());
        assert!(RequestAuthenticator::new("bad\nkey", secret()).is_err());
    }

    #[test]
    fn test_should_not_leak_secret_in_debug() {
        let auth = RequestAuthenticator::new("app-key", Secret::new("hunter2")).unwrap();
        assert!(!format!("{auth:?}").contains("hunter2"));
    }
}
