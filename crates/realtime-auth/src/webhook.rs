//! Inbound webhook verification.
//!
//! The service signs each webhook delivery with
//! `HMAC-SHA256(secret, "{timestamp}.{raw_body}")` and sends the result in
//! `X-Realtime-Signature` (optionally prefixed with `sha256=`), alongside the
//! raw timestamp in `X-Realtime-Timestamp`.
//!
//! Verification is a single pass that stops at the first failing check:
//!
//! 1. Locate the signature header and strip an optional `sha256=` prefix
//! 2. Locate the timestamp header
//! 3. If a maximum age is configured, reject stale or future timestamps
//! 4. Recompute the expected signature from the raw timestamp string
//! 5. Hex-decode both signatures and reject on decode failure or length mismatch
//! 6. Compare the bytes in constant time
//!
//! Every failure yields `false`; nothing here panics or returns an error.

use std::sync::Arc;

use realtime_core::Secret;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::headers::{NormalizedHeaders, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::signer::sign_webhook;

/// Optional prefix on the inbound signature header.
const SIGNATURE_PREFIX: &str = "sha256=";

/// Verify a webhook against the wall clock.
///
/// With `max_age_seconds` set, the timestamp must parse as a base-10 integer
/// and lie within `[now - max_age, now]`. Without it, freshness is not
/// checked at all and the timestamp may be any string.
#[must_use]
pub fn verify_webhook(
    secret: &Secret,
    headers: &NormalizedHeaders,
    body: &str,
    max_age_seconds: Option<u64>,
) -> bool {
    verify_webhook_with_clock(secret, headers, body, max_age_seconds, &SystemClock)
}

/// Verify a webhook, reading the current time from `clock`.
#[must_use]
pub fn verify_webhook_with_clock(
    secret: &Secret,
    headers: &NormalizedHeaders,
    body: &str,
    max_age_seconds: Option<u64>,
    clock: &dyn Clock,
) -> bool {
    let Some(signature) = headers.get(SIGNATURE_HEADER.as_str()) else {
        debug!("webhook rejected: missing signature header");
        return false;
    };
    let claimed = signature.strip_prefix(SIGNATURE_PREFIX).unwrap_or(signature);

    let Some(timestamp) = headers.get(TIMESTAMP_HEADER.as_str()) else {
        debug!("webhook rejected: missing timestamp header");
        return false;
    };

    if let Some(max_age) = max_age_seconds {
        if !is_fresh(timestamp, max_age, clock.now_unix_seconds()) {
            return false;
        }
    }

    let expected = sign_webhook(secret, timestamp, body);

    let (Ok(claimed), Ok(expected)) = (hex::decode(claimed), hex::decode(expected.as_str())) else {
        debug!("webhook rejected: signature is not valid hex");
        return false;
    };
    if claimed.len() != expected.len() {
        debug!(len = claimed.len(), "webhook rejected: signature has wrong length");
        return false;
    }

    let matches: bool = claimed.ct_eq(&expected).into();
    if !matches {
        debug!("webhook rejected: signature mismatch");
    }
    matches
}

/// Check `timestamp` against the replay window ending at `now`.
fn is_fresh(timestamp: &str, max_age: u64, now: i64) -> bool {
    let Ok(sent_at) = timestamp.parse::<i64>() else {
        debug!(timestamp, "webhook rejected: timestamp is not an integer");
        return false;
    };
    let Some(age) = now.checked_sub(sent_at) else {
        debug!(timestamp, "webhook rejected: timestamp out of range");
        return false;
    };
    match u64::try_from(age) {
        Ok(age) if age <= max_age => true,
        Ok(age) => {
            debug!(age, max_age, "webhook rejected: timestamp too old");
            false
        }
        Err(_) => {
            debug!(age, "webhook rejected: timestamp in the future");
            false
        }
    }
}

/// Verifies webhooks for one application secret.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use realtime_auth::{FixedClock, NormalizedHeaders, WebhookVerifier, sign_webhook};
/// use realtime_core::Secret;
///
/// let secret = Secret::new("app-secret");
/// let verifier = WebhookVerifier::new(secret.clone(), Some(300))
///     .with_clock(Arc::new(FixedClock(1_700_000_100)));
///
/// let sig = sign_webhook(&secret, "1700000000", "{}");
/// let headers = NormalizedHeaders::from_pairs([
///     ("x-realtime-signature", sig.into_string()),
///     ("x-realtime-timestamp", "1700000000".to_owned()),
/// ]);
/// assert!(verifier.verify(&headers, "{}"));
/// ```
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    secret: Secret,
    max_age_seconds: Option<u64>,
    clock: Arc<dyn Clock>,
}

impl WebhookVerifier {
    /// Create a verifier using the wall clock.
    #[must_use]
    pub fn new(secret: Secret, max_age_seconds: Option<u64>) -> Self {
        Self {
            secret,
            max_age_seconds,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The configured replay window, if any.
    #[must_use]
    pub fn max_age_seconds(&self) -> Option<u64> {
        self.max_age_seconds
    }

    /// Verify a delivery. See [`verify_webhook`].
    #[must_use]
    pub fn verify(&self, headers: &NormalizedHeaders, body: &str) -> bool {
        verify_webhook_with_clock(
            &self.secret,
            headers,
            body,
            self.max_age_seconds,
            self.clock.as_ref(),
        )
    }
}
