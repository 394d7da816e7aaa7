//! Request parameters, limits, and response shapes for the HTTP API.

use std::collections::BTreeMap;

use realtime_core::{ChannelName, RealtimeError, RealtimeResult, SocketId};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Maximum number of channels a single trigger may target.
pub const MAX_TRIGGER_CHANNELS: usize = 100;

/// Maximum number of events in one batch trigger.
pub const MAX_BATCH_EVENTS: usize = 10;

/// Maximum event name length, in bytes.
pub const MAX_EVENT_NAME_LEN: usize = 200;

/// Maximum serialized event data size, in bytes.
pub const MAX_EVENT_DATA_BYTES: usize = 10_240;

/// The only attribute that is restricted to presence channels.
const USER_COUNT: &str = "user_count";

/// Parameters for triggering one event on one or more channels.
///
/// Exactly one of `channel` and `channels` must be set.
///
/// # Examples
///
/// ```
/// use realtime_http::TriggerParams;
///
/// let params = TriggerParams::builder()
///     .name("greeting")
///     .data("hello")
///     .channels(vec!["a".to_owned(), "b".to_owned()])
///     .build();
/// assert_eq!(params.channels.as_ref().map(Vec::len), Some(2));
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct TriggerParams {
    /// Event name.
    #[builder(setter(into))]
    pub name: String,
    /// Event payload. Strings are sent as-is; anything else is serialized to
    /// a JSON string.
    #[builder(setter(into))]
    pub data: serde_json::Value,
    /// Single target channel.
    #[builder(default, setter(strip_option, into))]
    pub channel: Option<String>,
    /// Multiple target channels.
    #[builder(default, setter(strip_option))]
    pub channels: Option<Vec<String>>,
    /// Socket to exclude from delivery.
    #[builder(default, setter(strip_option, into))]
    pub socket_id: Option<String>,
    /// Comma-separated channel attributes to return.
    #[builder(default, setter(strip_option, into))]
    pub info: Option<String>,
}

/// Wire body for `POST /apps/{app_id}/events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct TriggerBody {
    pub name: String,
    pub data: String,
    pub channels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl TriggerParams {
    /// Validate the parameters and produce the wire body.
    pub(crate) fn into_body(self) -> RealtimeResult<TriggerBody> {
        let channels = match (self.channel, self.channels) {
            (Some(_), Some(_)) => {
                return Err(RealtimeError::validation(
                    "`channel` and `channels` are mutually exclusive",
                ));
            }
            (None, None) => {
                return Err(RealtimeError::validation(
                    "one of `channel` or `channels` is required",
                ));
            }
            (Some(channel), None) => vec![channel],
            (None, Some(channels)) => channels,
        };

        if channels.is_empty() {
            return Err(RealtimeError::validation("`channels` must not be empty"));
        }
        if channels.len() > MAX_TRIGGER_CHANNELS {
            return Err(RealtimeError::Validation(format!(
                "cannot trigger on more than {MAX_TRIGGER_CHANNELS} channels ({} given)",
                channels.len()
            )));
        }
        for channel in &channels {
            ChannelName::new(channel.as_str())?;
        }
        validate_info(self.info.as_deref(), &channels)?;

        let data = validate_event(&self.name, &self.data, self.socket_id.as_deref())?;

        Ok(TriggerBody {
            name: self.name,
            data,
            channels,
            socket_id: self.socket_id,
            info: self.info,
        })
    }
}

/// One event in a batch trigger.
#[derive(Debug, Clone, TypedBuilder)]
pub struct BatchEvent {
    /// Event name.
    #[builder(setter(into))]
    pub name: String,
    /// Event payload, encoded like [`TriggerParams::data`].
    #[builder(setter(into))]
    pub data: serde_json::Value,
    /// Target channel.
    #[builder(setter(into))]
    pub channel: String,
    /// Socket to exclude from delivery.
    #[builder(default, setter(strip_option, into))]
    pub socket_id: Option<String>,
    /// Comma-separated channel attributes to return.
    #[builder(default, setter(strip_option, into))]
    pub info: Option<String>,
}

/// Wire form of one batch event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct BatchEventBody {
    pub name: String,
    pub data: String,
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

/// Wire body for `POST /apps/{app_id}/batch_events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct BatchBody {
    pub batch: Vec<BatchEventBody>,
}

/// Validate a batch and produce the wire body.
pub(crate) fn batch_body(events: Vec<BatchEvent>) -> RealtimeResult<BatchBody> {
    if events.is_empty() {
        return Err(RealtimeError::validation("batch must contain at least one event"));
    }
    if events.len() > MAX_BATCH_EVENTS {
        return Err(RealtimeError::Validation(format!(
            "batch may contain at most {MAX_BATCH_EVENTS} events ({} given)",
            events.len()
        )));
    }

    let batch = events
        .into_iter()
        .map(|event| {
            ChannelName::new(event.channel.as_str())?;
            validate_info(event.info.as_deref(), std::slice::from_ref(&event.channel))?;
            let data = validate_event(&event.name, &event.data, event.socket_id.as_deref())?;
            Ok(BatchEventBody {
                name: event.name,
                data,
                channel: event.channel,
                socket_id: event.socket_id,
                info: event.info,
            })
        })
        .collect::<RealtimeResult<Vec<_>>>()?;

    Ok(BatchBody { batch })
}

/// Validate name, socket id, and data size; return the encoded data.
fn validate_event(
    name: &str,
    data: &serde_json::Value,
    socket_id: Option<&str>,
) -> RealtimeResult<String> {
    if name.is_empty() {
        return Err(RealtimeError::validation("event name must not be empty"));
    }
    if name.len() > MAX_EVENT_NAME_LEN {
        return Err(RealtimeError::Validation(format!(
            "event name too long ({} > {MAX_EVENT_NAME_LEN} bytes)",
            name.len()
        )));
    }
    if let Some(socket_id) = socket_id {
        SocketId::new(socket_id)?;
    }

    let encoded = match data {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if encoded.len() > MAX_EVENT_DATA_BYTES {
        return Err(RealtimeError::Validation(format!(
            "event data too large ({} > {MAX_EVENT_DATA_BYTES} bytes)",
            encoded.len()
        )));
    }
    Ok(encoded)
}

/// `user_count` may only be requested when every channel is a presence channel.
fn validate_info(info: Option<&str>, channels: &[String]) -> RealtimeResult<()> {
    let wants_user_count = info.is_some_and(|info| info.split(',').any(|a| a.trim() == USER_COUNT));
    if wants_user_count && !channels.iter().all(|c| c.starts_with("presence-")) {
        return Err(RealtimeError::validation(
            "`user_count` can only be requested for presence channels",
        ));
    }
    Ok(())
}

/// Attributes of a channel, as returned by trigger and query endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAttributes {
    /// Whether the channel currently has subscribers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupied: Option<bool>,
    /// Number of subscribed connections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_count: Option<u64>,
    /// Number of distinct presence members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_count: Option<u64>,
}

/// Response to a single trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TriggerResponse {
    /// Requested attributes per channel; empty unless `info` was set.
    #[serde(default)]
    pub channels: BTreeMap<String, ChannelAttributes>,
}

/// Response to a batch trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BatchTriggerResponse {
    /// Requested attributes per batch entry, in request order.
    #[serde(default)]
    pub batch: Vec<ChannelAttributes>,
}

/// Query for `GET /apps/{app_id}/channels`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelsQuery {
    /// Only list channels whose name starts with this prefix.
    pub filter_by_prefix: Option<String>,
    /// Attributes to return per channel.
    pub info: Vec<String>,
}

impl ChannelsQuery {
    /// Validate and render the query string (without the leading `?`).
    pub(crate) fn to_query_string(&self) -> RealtimeResult<String> {
        let presence_filter = self
            .filter_by_prefix
            .as_deref()
            .is_some_and(|p| p.starts_with("presence-"));
        if self.info.iter().any(|a| a == USER_COUNT) && !presence_filter {
            return Err(RealtimeError::validation(
                "`user_count` requires a `presence-` prefix filter",
            ));
        }

        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(prefix) = &self.filter_by_prefix {
            query.append_pair("filter_by_prefix", prefix);
        }
        if !self.info.is_empty() {
            query.append_pair("info", &self.info.join(","));
        }
        Ok(query.finish())
    }
}

/// Response to `GET /apps/{app_id}/channels`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChannelsResponse {
    /// Occupied channels keyed by name.
    #[serde(default)]
    pub channels: BTreeMap<String, ChannelAttributes>,
}

/// Query for `GET /apps/{app_id}/channels/{channel}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelInfoQuery {
    /// Attributes to return.
    pub info: Vec<String>,
}

impl ChannelInfoQuery {
    /// Validate against `channel` and render the query string.
    pub(crate) fn to_query_string(&self, channel: &ChannelName) -> RealtimeResult<String> {
        if self.info.iter().any(|a| a == USER_COUNT) && !channel.is_presence() {
            return Err(RealtimeError::validation(
                "`user_count` can only be requested for presence channels",
            ));
        }
        let mut query = form_urlencoded::Serializer::new(String::new());
        if !self.info.is_empty() {
            query.append_pair("info", &self.info.join(","));
        }
        Ok(query.finish())
    }
}

/// A member currently subscribed to a presence channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PresenceUser {
    /// The member's user id.
    pub id: String,
}

/// Response to `GET /apps/{app_id}/channels/{channel}/users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct UsersResponse {
    #[serde(default)]
    pub users: Vec<PresenceUser>,
}

/// Presence payload attached to a presence-channel auth token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceMember {
    /// Stable identifier of the user.
    pub user_id: String,
    /// Arbitrary public information about the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<serde_json::Value>,
}
