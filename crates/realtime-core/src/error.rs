//! Error types for the Realtime SDK.

/// Error type shared by the Realtime client, auth helpers, and server.
///
/// Variants fall into three families: caller mistakes ([`Validation`]),
/// rejected credentials or signatures ([`Authentication`]), and everything
/// that went wrong talking to the service ([`Api`], [`Transport`],
/// [`InvalidResponse`]).
///
/// [`Validation`]: RealtimeError::Validation
/// [`Authentication`]: RealtimeError::Authentication
/// [`Api`]: RealtimeError::Api
/// [`Transport`]: RealtimeError::Transport
/// [`InvalidResponse`]: RealtimeError::InvalidResponse
#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    /// The caller supplied structurally invalid input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A signature or token was rejected.
    #[error("authentication failed (status {status}): {body}")]
    Authentication {
        /// HTTP status associated with the rejection.
        status: u16,
        /// Response body or rejection reason.
        body: String,
    },

    /// The service answered with an unexpected non-success status.
    #[error("unexpected API response (status {status}): {body}")]
    Api {
        /// HTTP status returned by the service.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl RealtimeError {
    /// Build a validation error from anything string-like.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error was caused by invalid caller input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether this error is an authentication rejection.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// The HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience result type for Realtime operations.
pub type RealtimeResult<T> = Result<T, RealtimeError>;
