//! The signed Realtime API client.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method, StatusCode};
use realtime_auth::{AuthToken, Clock, NormalizedHeaders, RequestAuthenticator, SystemClock, WebhookVerifier};
use realtime_core::{
    AppId, ChannelKind, ChannelName, RealtimeConfig, RealtimeError, RealtimeResult, Secret,
    SocketId,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::model::{
    BatchEvent, BatchTriggerResponse, ChannelAttributes, ChannelInfoQuery, ChannelsQuery,
    ChannelsResponse, PresenceMember, PresenceUser, TriggerParams, TriggerResponse,
    UsersResponse, batch_body,
};
use crate::transport::{ReqwestTransport, Transport};
use crate::webhook::WebhookPayload;

/// Client for one Realtime application.
///
/// Cloning is cheap; the transport and clock are shared.
#[derive(Debug, Clone)]
pub struct RealtimeClient {
    app_id: AppId,
    key: String,
    secret: Secret,
    base_url: String,
    authenticator: RequestAuthenticator,
    verifier: WebhookVerifier,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl RealtimeClient {
    /// Create a client backed by a `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Config`] if credentials are missing, or
    /// [`RealtimeError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &RealtimeConfig) -> RealtimeResult<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs))?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client that sends requests through `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Config`] if credentials are missing or
    /// malformed.
    pub fn with_transport(
        config: &RealtimeConfig,
        transport: Arc<dyn Transport>,
    ) -> RealtimeResult<Self> {
        config.validate()?;
        let authenticator = RequestAuthenticator::new(&config.key, config.secret.clone())
            .map_err(|e| RealtimeError::Config(e.to_string()))?;

        Ok(Self {
            app_id: config.app_id()?,
            key: config.key.clone(),
            secret: config.secret.clone(),
            base_url: config.base_url(),
            authenticator,
            verifier: WebhookVerifier::new(config.secret.clone(), config.webhook_max_age_secs),
            transport,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source used for request timestamps and webhook
    /// freshness.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.verifier = self.verifier.with_clock(Arc::clone(&clock));
        self.clock = clock;
        self
    }

    /// The application this client talks to.
    #[must_use]
    pub fn app_id(&self) -> &AppId {
        &self.app_id
    }

    /// Trigger one event on one or more channels.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Validation`] before any I/O if the parameters
    /// are invalid, and transport or API errors otherwise.
    pub async fn trigger(&self, params: TriggerParams) -> RealtimeResult<TriggerResponse> {
        let body = params.into_body()?;
        let body = serde_json::to_string(&body).context("failed to encode trigger body")?;
        let path = format!("/apps/{}/events", self.app_id);
        self.execute(Method::POST, &path, "", body).await
    }

    /// Trigger up to ten events in one request.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Validation`] if the batch is empty, too large,
    /// or contains an invalid event.
    pub async fn trigger_batch(
        &self,
        events: Vec<BatchEvent>,
    ) -> RealtimeResult<BatchTriggerResponse> {
        let body = batch_body(events)?;
        let body = serde_json::to_string(&body).context("failed to encode batch body")?;
        let path = format!("/apps/{}/batch_events", self.app_id);
        self.execute(Method::POST, &path, "", body).await
    }

    /// List occupied channels.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Validation`] if `user_count` is requested
    /// without a `presence-` prefix filter.
    pub async fn channels(&self, query: &ChannelsQuery) -> RealtimeResult<ChannelsResponse> {
        let query = query.to_query_string()?;
        let path = format!("/apps/{}/channels", self.app_id);
        self.execute(Method::GET, &path, &query, String::new()).await
    }

    /// Fetch attributes of one channel.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Validation`] for an invalid channel name or
    /// when `user_count` is requested on a non-presence channel.
    pub async fn channel_info(
        &self,
        channel: &str,
        query: &ChannelInfoQuery,
    ) -> RealtimeResult<ChannelAttributes> {
        let channel = ChannelName::new(channel)?;
        let query = query.to_query_string(&channel)?;
        let path = format!("/apps/{}/channels/{channel}", self.app_id);
        self.execute(Method::GET, &path, &query, String::new()).await
    }

    /// List members of a presence channel.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Validation`] if `channel` is not a presence
    /// channel.
    pub async fn presence_users(&self, channel: &str) -> RealtimeResult<Vec<PresenceUser>> {
        let channel = ChannelName::new(channel)?;
        if !channel.is_presence() {
            return Err(RealtimeError::Validation(format!(
                "`{channel}` is not a presence channel"
            )));
        }
        let path = format!("/apps/{}/channels/{channel}/users", self.app_id);
        let response: UsersResponse = self.execute(Method::GET, &path, "", String::new()).await?;
        Ok(response.users)
    }

    /// Issue an auth token for a socket subscribing to a protected channel.
    ///
    /// Presence channels require `member`; it is serialized once and the same
    /// string is both signed and returned as `channel_data`.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Validation`] for malformed ids, for public
    /// channels, for presence channels without member data, and for member
    /// data on non-presence channels.
    pub fn authorize_channel(
        &self,
        socket_id: &str,
        channel: &str,
        member: Option<&PresenceMember>,
    ) -> RealtimeResult<AuthToken> {
        let socket_id = SocketId::new(socket_id)?;
        let channel = ChannelName::new(channel)?;

        let channel_data = match (channel.kind(), member) {
            (ChannelKind::Public, _) => {
                return Err(RealtimeError::Validation(format!(
                    "`{channel}` is a public channel and needs no authorization"
                )));
            }
            (ChannelKind::Presence, None) => {
                return Err(RealtimeError::validation(
                    "presence channels require member data",
                ));
            }
            (ChannelKind::Presence, Some(member)) => {
                Some(serde_json::to_string(member).context("failed to encode member data")?)
            }
            (_, Some(_)) => {
                return Err(RealtimeError::validation(
                    "member data is only allowed on presence channels",
                ));
            }
            (_, None) => None,
        };

        Ok(realtime_auth::authorize_channel(
            &self.secret,
            &self.key,
            socket_id.as_str(),
            channel.as_str(),
            channel_data.as_deref(),
        ))
    }

    /// Verify and parse an inbound webhook.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Authentication`] if verification fails and
    /// [`RealtimeError::InvalidResponse`] if the verified body is not a
    /// webhook payload.
    pub fn webhook(&self, headers: &NormalizedHeaders, body: &str) -> RealtimeResult<WebhookPayload> {
        if !self.verifier.verify(headers, body) {
            debug!("webhook failed verification");
            return Err(RealtimeError::Authentication {
                status: StatusCode::UNAUTHORIZED.as_u16(),
                body: "invalid webhook signature".to_owned(),
            });
        }
        serde_json::from_str(body).map_err(|e| RealtimeError::InvalidResponse(e.to_string()))
    }

    async fn execute<T>(&self, method: Method, path: &str, query: &str, body: String) -> RealtimeResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let path_and_query = if query.is_empty() {
            path.to_owned()
        } else {
            format!("{path}?{query}")
        };
        let timestamp = self.clock.now_unix_seconds();
        let signed = self
            .authenticator
            .signed_headers(&method, &path_and_query, &body, timestamp);

        let has_body = !body.is_empty();
        let mut request = http::Request::builder()
            .method(method)
            .uri(format!("{}{path_and_query}", self.base_url))
            .body(Bytes::from(body))
            .context("failed to build API request")?;
        request.headers_mut().extend(signed);
        if has_body {
            request
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let response = self.transport.send(request).await?;
        decode_response(response)
    }
}

/// Map a raw response onto the result type or an error by status.
fn decode_response<T>(response: http::Response<Bytes>) -> RealtimeResult<T>
where
    T: DeserializeOwned + Default,
{
    let status = response.status();
    let body = response.into_body();

    if status.is_success() {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        return serde_json::from_slice(&body)
            .map_err(|e| RealtimeError::InvalidResponse(e.to_string()));
    }

    let body = String::from_utf8_lossy(&body).into_owned();
    debug!(%status, "API request failed");
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(RealtimeError::Authentication {
            status: status.as_u16(),
            body,
        }),
        _ => Err(RealtimeError::Api {
            status: status.as_u16(),
            body,
        }),
    }
}
