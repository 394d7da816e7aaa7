//! Webhook receiver endpoint tests.

#[cfg(test)]
mod tests {
    use realtime_auth::sign_webhook;
    use realtime_core::Secret;

    use crate::{endpoint_url, http_client, now_timestamp, test_secret};

    const BODY: &str = r#"{"time_ms":1700000000000,"events":[{"name":"channel_occupied","channel":"private-orders"},{"name":"member_added","channel":"presence-lobby","user_id":"u-1"}]}"#;

    async fn deliver(signature: &str, timestamp: &str, body: &str) -> reqwest::Response {
        http_client()
            .post(format!("{}/realtime/webhooks", endpoint_url()))
            .header("X-Realtime-Signature", signature)
            .header("X-Realtime-Timestamp", timestamp)
            .header("Content-Type", "application/json")
            .body(body.to_owned())
            .send()
            .await
            .expect("auth server should be reachable")
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_accept_signed_webhook() {
        let ts = now_timestamp();
        let sig = sign_webhook(&test_secret(), &ts, BODY);

        let resp = deliver(&format!("sha256={sig}"), &ts, BODY).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["received"], 2);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_accept_unprefixed_signature() {
        let ts = now_timestamp();
        let sig = sign_webhook(&test_secret(), &ts, BODY);
        assert_eq!(deliver(sig.as_str(), &ts, BODY).await.status(), 200);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_tampered_or_foreign_webhooks() {
        let ts = now_timestamp();
        let sig = sign_webhook(&test_secret(), &ts, BODY);
        let tampered = BODY.replace("u-1", "u-2");
        assert_eq!(deliver(sig.as_str(), &ts, &tampered).await.status(), 401);

        let foreign = sign_webhook(&Secret::new("someone-else"), &ts, BODY);
        assert_eq!(deliver(foreign.as_str(), &ts, BODY).await.status(), 401);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_stale_webhook() {
        let ts = (chrono::Utc::now().timestamp() - 3_600).to_string();
        let sig = sign_webhook(&test_secret(), &ts, BODY);
        assert_eq!(deliver(sig.as_str(), &ts, BODY).await.status(), 401);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_signed_garbage_payload() {
        let ts = now_timestamp();
        let body = "not json";
        let sig = sign_webhook(&test_secret(), &ts, body);
        assert_eq!(deliver(sig.as_str(), &ts, body).await.status(), 400);
    }
}
