//! Case-insensitive header normalization.
//!
//! Web frameworks hand over headers in different shapes: `http::HeaderMap`,
//! plain string pairs, multi-valued pairs, or a JSON object forwarded by a
//! serverless runtime. [`NormalizedHeaders`] folds all of them into a single
//! lowercase-name to first-string-value map, which is what the webhook
//! verifier works on.

use std::collections::BTreeMap;

use http::HeaderName;

/// Header carrying the application key on outbound requests.
pub const KEY_HEADER: HeaderName = HeaderName::from_static("x-realtime-key");

/// Header carrying the Unix timestamp on outbound requests and webhooks.
pub const TIMESTAMP_HEADER: HeaderName = HeaderName::from_static("x-realtime-timestamp");

/// Header carrying the hex signature on outbound requests and webhooks.
pub const SIGNATURE_HEADER: HeaderName = HeaderName::from_static("x-realtime-signature");

/// Header map keyed by lowercase name, holding the first string value seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedHeaders {
    values: BTreeMap<String, String>,
}

impl NormalizedHeaders {
    /// Create an empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from single-valued `(name, value)` pairs.
    ///
    /// When several names differ only by case, the first one wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut headers = Self::new();
        for (name, value) in pairs {
            headers.insert(name.as_ref(), value.into());
        }
        headers
    }

    /// Build from multi-valued `(name, values)` pairs, taking the first value
    /// of each. A name with no values is treated as absent.
    pub fn from_multi<I, K, V, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut headers = Self::new();
        for (name, values) in pairs {
            if let Some(first) = values.into_iter().next() {
                headers.insert(name.as_ref(), first.into());
            }
        }
        headers
    }

    /// Build from a JSON object whose values are strings or arrays.
    ///
    /// Only string-typed entries count: for an array the first string element
    /// is used, and values with no string at all are skipped. Anything other
    /// than an object yields an empty map.
    ///
    /// Keys are visited in `serde_json::Map` iteration order, which is sorted
    /// by name rather than arrival order. When several names differ only by
    /// case, the first in that order wins, so uppercase spellings take
    /// precedence over lowercase ones.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut headers = Self::new();
        let Some(object) = value.as_object() else {
            return headers;
        };
        for (name, value) in object {
            let first = match value {
                serde_json::Value::String(s) => Some(s.as_str()),
                serde_json::Value::Array(items) => items.iter().find_map(serde_json::Value::as_str),
                _ => None,
            };
            if let Some(first) = first {
                headers.insert(name, first.to_owned());
            }
        }
        headers
    }

    /// Record `value` under the lowercased `name` unless one is already present.
    pub fn insert(&mut self, name: &str, value: String) {
        self.values.entry(name.to_ascii_lowercase()).or_insert(value);
    }

    /// Look up a header by name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no headers are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<&http::HeaderMap> for NormalizedHeaders {
    /// Values that are not valid visible ASCII are not string-typed and are
    /// skipped; for repeated headers the first string value wins.
    fn from(map: &http::HeaderMap) -> Self {
        let mut headers = Self::new();
        for (name, value) in map {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str(), value.to_owned());
            }
        }
        headers
    }
}
