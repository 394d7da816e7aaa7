//! Configuration for the Realtime client and auth server.
//!
//! Configuration is driven by environment variables. [`RealtimeConfig::from_env`]
//! starts from the defaults and overrides whatever is set.

use typed_builder::TypedBuilder;

use crate::types::{AppId, Secret};
use crate::{RealtimeError, RealtimeResult};

/// Default API host.
const DEFAULT_HOST: &str = "api.realtime.local";

/// Default webhook replay window, in seconds.
const DEFAULT_WEBHOOK_MAX_AGE_SECS: u64 = 300;

/// Configuration for talking to the Realtime service.
///
/// # Examples
///
/// ```
/// use realtime_core::RealtimeConfig;
///
/// let config = RealtimeConfig::builder()
///     .app_id("123".to_owned())
///     .key("app-key".to_owned())
///     .secret("app-secret")
///     .build();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.base_url(), "https://api.realtime.local");
/// ```
#[derive(Debug, Clone, serde::Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase", default)]
pub struct RealtimeConfig {
    /// Application id assigned by the service.
    #[builder(default)]
    pub app_id: String,

    /// Public application key, sent as `X-Realtime-Key` and used in auth tokens.
    #[builder(default)]
    pub key: String,

    /// Application secret used as the HMAC key.
    #[builder(default, setter(into))]
    pub secret: Secret,

    /// API host name.
    #[builder(default = String::from(DEFAULT_HOST))]
    pub host: String,

    /// Explicit API port. When unset the scheme default is used.
    #[builder(default, setter(strip_option))]
    pub port: Option<u16>,

    /// Whether to talk to the API over HTTPS.
    #[builder(default = true)]
    pub use_tls: bool,

    /// Request timeout, in seconds.
    #[builder(default = 30)]
    pub timeout_secs: u64,

    /// Maximum accepted webhook age, in seconds. `None` disables the
    /// freshness check.
    #[builder(default = Some(DEFAULT_WEBHOOK_MAX_AGE_SECS))]
    pub webhook_max_age_secs: Option<u64>,

    /// Bind address for the auth server.
    #[builder(default = String::from("0.0.0.0:4567"))]
    pub gateway_listen: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RealtimeConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `REALTIME_APP_ID` | *(empty)* |
    /// | `REALTIME_KEY` | *(empty)* |
    /// | `REALTIME_SECRET` | *(empty)* |
    /// | `REALTIME_HOST` | `api.realtime.local` |
    /// | `REALTIME_PORT` | *(scheme default)* |
    /// | `REALTIME_USE_TLS` | `true` |
    /// | `REALTIME_TIMEOUT_SECS` | `30` |
    /// | `REALTIME_WEBHOOK_MAX_AGE_SECS` | `300` (`off` disables) |
    /// | `GATEWAY_LISTEN` | `0.0.0.0:4567` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("REALTIME_APP_ID") {
            config.app_id = v;
        }
        if let Some(v) = lookup("REALTIME_KEY") {
            config.key = v;
        }
        if let Some(v) = lookup("REALTIME_SECRET") {
            config.secret = Secret::new(v);
        }
        if let Some(v) = lookup("REALTIME_HOST") {
            config.host = v;
        }
        if let Some(v) = lookup("REALTIME_PORT") {
            match v.parse::<u16>() {
                Ok(port) => config.port = Some(port),
                Err(_) => tracing::warn!(value = %v, "ignoring invalid REALTIME_PORT"),
            }
        }
        if let Some(v) = lookup("REALTIME_USE_TLS") {
            config.use_tls = parse_bool(&v);
        }
        if let Some(v) = lookup("REALTIME_TIMEOUT_SECS") {
            if let Ok(n) = v.parse::<u64>() {
                config.timeout_secs = n;
            }
        }
        if let Some(v) = lookup("REALTIME_WEBHOOK_MAX_AGE_SECS") {
            if v.eq_ignore_ascii_case("off") {
                config.webhook_max_age_secs = None;
            } else if let Ok(n) = v.parse::<u64>() {
                config.webhook_max_age_secs = Some(n);
            }
        }
        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Check that the credentials needed for signing are present.
    ///
    /// # Errors
    /// Returns [`RealtimeError::Config`] if the app id is invalid or the key
    /// or secret is empty.
    pub fn validate(&self) -> RealtimeResult<()> {
        self.app_id()?;
        if self.key.is_empty() {
            return Err(RealtimeError::Config("REALTIME_KEY is not set".to_owned()));
        }
        if self.secret.is_empty() {
            return Err(RealtimeError::Config(
                "REALTIME_SECRET is not set".to_owned(),
            ));
        }
        Ok(())
    }

    /// The configured app id, validated.
    ///
    /// # Errors
    /// Returns [`RealtimeError::Config`] if the app id is empty or malformed.
    pub fn app_id(&self) -> RealtimeResult<AppId> {
        AppId::new(self.app_id.clone()).map_err(|e| RealtimeError::Config(e.to_string()))
    }

    /// Base URL of the API, e.g. `https://api.realtime.local:8443`.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        match self.port {
            Some(port) => format!("{scheme}://{}:{port}", self.host),
            None => format!("{scheme}://{}", self.host),
        }
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_should_create_default_config() {
        let config = RealtimeConfig::default();
        assert_eq!(config.host, "api.realtime.local");
        assert!(config.use_tls);
        assert_eq!(config.port, None);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.webhook_max_age_secs, Some(300));
        assert_eq!(config.gateway_listen, "0.0.0.0:4567");
        assert_eq!(config.log_level, "info");
        assert!(config.secret.is_empty());
    }

    #[test]
    fn test_should_load_from_lookup() {
        let config = RealtimeConfig::from_lookup(lookup_from(&[
            ("REALTIME_APP_ID", "123"),
            ("REALTIME_KEY", "app-key"),
            ("REALTIME_SECRET", "app-secret"),
            ("REALTIME_HOST", "localhost"),
            ("REALTIME_PORT", "8080"),
            ("REALTIME_USE_TLS", "false"),
            ("REALTIME_WEBHOOK_MAX_AGE_SECS", "off"),
            ("LOG_LEVEL", "debug"),
        ]));

        assert_eq!(config.app_id, "123");
        assert_eq!(config.key, "app-key");
        assert_eq!(config.secret.expose(), "app-secret");
        assert_eq!(config.base_url(), "http://localhost:8080");
        assert_eq!(config.webhook_max_age_secs, None);
        assert_eq!(config.log_level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_should_ignore_invalid_numbers() {
        let config = RealtimeConfig::from_lookup(lookup_from(&[
            ("REALTIME_PORT", "not-a-port"),
            ("REALTIME_TIMEOUT_SECS", "soon"),
            ("REALTIME_WEBHOOK_MAX_AGE_SECS", "-5"),
        ]));
        assert_eq!(config.port, None);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.webhook_max_age_secs, Some(300));
    }

    #[test]
    fn test_should_reject_missing_credentials() {
        let config = RealtimeConfig::default();
        assert!(matches!(config.validate(), Err(RealtimeError::Config(_))));

        let config = RealtimeConfig::builder()
            .app_id("123".to_owned())
            .key("app-key".to_owned())
            .build();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("REALTIME_SECRET"));
    }

    #[test]
    fn test_should_not_leak_secret_in_debug() {
        let config = RealtimeConfig::builder().secret("hunter2").build();
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn test_should_deserialize_camel_case_json() {
        let config: RealtimeConfig = serde_json::from_str(
            r#"{"appId":"42","key":"k","secret":"s","useTls":false,"port":9000}"#,
        )
        .expect("test deserialization");
        assert_eq!(config.app_id, "42");
        assert_eq!(config.base_url(), "http://api.realtime.local:9000");
        assert_eq!(config.webhook_max_age_secs, Some(300));
    }

    #[test]
    fn test_should_parse_bool_values() {
        assert!(parse_bool("1"));
        assert!(parse_bool("TRUE"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool(""));
    }
}
