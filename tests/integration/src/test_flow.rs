//! In-process flows across the auth and HTTP crates.
//!
//! A fake service checks request signatures the way the real one does, so
//! these run without a server.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use realtime_auth::{
        AuthToken, FixedClock, NormalizedHeaders, authorize_channel, sign_for_transport,
        sign_webhook,
    };
    use realtime_core::{RealtimeConfig, RealtimeError, RealtimeResult, Secret};
    use realtime_http::{
        ChannelsQuery, PresenceMember, RealtimeClient, Transport, TriggerParams,
    };

    const NOW: i64 = 1_700_000_000;
    const KEY: &str = "flow-key";

    /// Accepts a request only if its signature matches `secret`.
    #[derive(Debug)]
    struct FakeService {
        secret: Secret,
        max_skew: i64,
    }

    impl FakeService {
        fn check(&self, request: &http::Request<Bytes>) -> bool {
            let header = |name: &str| {
                request
                    .headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(ToOwned::to_owned)
            };
            let (Some(key), Some(ts), Some(sig)) = (
                header("x-realtime-key"),
                header("x-realtime-timestamp"),
                header("x-realtime-signature"),
            ) else {
                return false;
            };
            let Ok(ts) = ts.parse::<i64>() else {
                return false;
            };
            let body = std::str::from_utf8(request.body()).unwrap_or_default();
            let expected = sign_for_transport(
                &self.secret,
                request.method().as_str(),
                request.uri().path(),
                body,
                ts,
            );
            key == KEY && (NOW - ts).abs() <= self.max_skew && sig == expected.as_str()
        }
    }

    #[async_trait::async_trait]
    impl Transport for FakeService {
        async fn send(
            &self,
            request: http::Request<Bytes>,
        ) -> RealtimeResult<http::Response<Bytes>> {
            let (status, body) = if self.check(&request) {
                (http::StatusCode::OK, r#"{"channels":{"presence-lobby":{"user_count":1}}}"#)
            } else {
                (http::StatusCode::UNAUTHORIZED, "invalid signature")
            };
            let mut response = http::Response::new(Bytes::from_static(body.as_bytes()));
            *response.status_mut() = status;
            Ok(response)
        }
    }

    fn client(secret: &str) -> RealtimeClient {
        let config = RealtimeConfig::builder()
            .app_id("flow-app".to_owned())
            .key(KEY.to_owned())
            .secret(secret)
            .build();
        let service = FakeService {
            secret: Secret::new("flow-secret"),
            max_skew: 600,
        };
        RealtimeClient::with_transport(&config, Arc::new(service))
            .unwrap()
            .with_clock(Arc::new(FixedClock(NOW)))
    }

    #[tokio::test]
    async fn test_should_pass_service_signature_check() {
        let client = client("flow-secret");

        let channels = client
            .channels(&ChannelsQuery {
                filter_by_prefix: Some("presence-".to_owned()),
                info: vec!["user_count".to_owned()],
            })
            .await
            .unwrap();
        assert_eq!(channels.channels["presence-lobby"].user_count, Some(1));

        client
            .trigger(
                TriggerParams::builder()
                    .name("order-shipped")
                    .data(serde_json::json!({"id": 42}))
                    .channels(vec!["private-orders".to_owned(), "audit".to_owned()])
                    .build(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_should_surface_service_rejection() {
        let client = client("wrong-secret");
        let err = client.channels(&ChannelsQuery::default()).await.unwrap_err();
        assert!(
            matches!(err, RealtimeError::Authentication { status: 401, .. }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_should_match_standalone_channel_authorizer() {
        let client = client("flow-secret");
        let secret = Secret::new("flow-secret");

        let from_client = client.authorize_channel("7.11", "private-orders", None).unwrap();
        let standalone = authorize_channel(&secret, KEY, "7.11", "private-orders", None);
        assert_eq!(from_client, standalone);

        let member = PresenceMember {
            user_id: "u-1".to_owned(),
            user_info: Some(serde_json::json!({"name": "Ada"})),
        };
        let token = client
            .authorize_channel("7.11", "presence-lobby", Some(&member))
            .unwrap();
        let data = token.channel_data.as_deref().unwrap();
        assert_eq!(
            token,
            authorize_channel(&secret, KEY, "7.11", "presence-lobby", Some(data))
        );

        let wire: AuthToken = serde_json::from_str(&serde_json::to_string(&token).unwrap()).unwrap();
        assert_eq!(wire, token);
    }

    #[test]
    fn test_should_verify_webhook_from_raw_header_map() {
        let client = client("flow-secret");
        let body = r#"{"time_ms":1700000000000,"events":[{"name":"member_removed","channel":"presence-lobby","user_id":"u-1"}]}"#;
        let sig = sign_webhook(&Secret::new("flow-secret"), "1699999990", body);

        let mut headers = http::HeaderMap::new();
        headers.append("x-realtime-signature", format!("sha256={sig}").parse().unwrap());
        headers.append("x-realtime-signature", "ignored".parse().unwrap());
        headers.append("x-realtime-timestamp", "1699999990".parse().unwrap());

        let payload = client
            .webhook(&NormalizedHeaders::from(&headers), body)
            .unwrap();
        assert_eq!(payload.events[0].user_id.as_deref(), Some("u-1"));
    }
}
