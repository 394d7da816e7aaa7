//! Webhook payload types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A verified webhook delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Milliseconds since the Unix epoch at which the service emitted the batch.
    pub time_ms: i64,
    /// Events in emission order.
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

impl WebhookPayload {
    /// The emission time, if `time_ms` is in range.
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time_ms)
    }
}

/// One event inside a webhook delivery.
///
/// Which optional fields are set depends on `name`: `channel_occupied` and
/// `channel_vacated` carry only the channel, `member_added` and
/// `member_removed` add `user_id`, `client_event` adds `event`, `data` and
/// `socket_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event kind, e.g. `channel_occupied`.
    pub name: String,
    /// Channel the event concerns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Client event name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Client event payload, as sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Originating socket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<String>,
    /// Presence member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}
