//! Channel authorization endpoint tests.

#[cfg(test)]
mod tests {
    use realtime_auth::sign_channel_auth;

    use crate::{endpoint_url, http_client, test_key, test_secret, test_socket_id};

    async fn post_auth(form: &[(&str, &str)]) -> reqwest::Response {
        http_client()
            .post(format!("{}/realtime/auth", endpoint_url()))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(
                form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(form)
                    .finish(),
            )
            .send()
            .await
            .expect("auth server should be reachable")
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_health() {
        let resp = http_client()
            .get(format!("{}/health", endpoint_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert!(resp.headers().contains_key("x-request-id"));
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_issue_verifiable_private_token() {
        let socket_id = test_socket_id();
        let resp = post_auth(&[("socket_id", socket_id.as_str()), ("channel_name", "private-orders")]).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = resp.json().await.unwrap();
        let expected = sign_channel_auth(&test_secret(), &socket_id, "private-orders", None);
        assert_eq!(body["auth"], format!("{}:{expected}", test_key()));
        assert!(body.get("channel_data").is_none());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_issue_presence_token_with_channel_data() {
        let socket_id = test_socket_id();
        let member = r#"{"user_id":"u-1","user_info":{"name":"Ada"}}"#;
        let resp = post_auth(&[
            ("socket_id", socket_id.as_str()),
            ("channel_name", "presence-lobby"),
            ("channel_data", member),
        ])
        .await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = resp.json().await.unwrap();
        let channel_data = body["channel_data"].as_str().unwrap();
        let expected =
            sign_channel_auth(&test_secret(), &socket_id, "presence-lobby", Some(channel_data));
        assert_eq!(body["auth"], format!("{}:{expected}", test_key()));

        let echoed: serde_json::Value = serde_json::from_str(channel_data).unwrap();
        assert_eq!(echoed["user_id"], "u-1");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_invalid_auth_requests() {
        let socket_id = test_socket_id();
        let cases: [&[(&str, &str)]; 4] = [
            &[("channel_name", "private-a")],
            &[("socket_id", socket_id.as_str()), ("channel_name", "public-a")],
            &[("socket_id", "garbage"), ("channel_name", "private-a")],
            &[("socket_id", socket_id.as_str()), ("channel_name", "presence-a")],
        ];
        for form in cases {
            let resp = post_auth(form).await;
            assert_eq!(resp.status(), 400, "form {form:?} should be rejected");
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_found_for_unknown_route() {
        let resp = http_client()
            .get(format!("{}/realtime/unknown", endpoint_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }
}
