//! Validated identifiers shared across the SDK.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::RealtimeError;

/// Characters allowed in a channel name.
static CHANNEL_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-=@,.;]+$").expect("channel name pattern is valid")
});

/// Socket ids are two dot-separated decimal numbers.
static SOCKET_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+$").expect("socket id pattern is valid"));

/// Application secret used as the HMAC key.
///
/// The value is never printed: `Debug` renders a placeholder and there is no
/// `Display` or `Serialize` implementation. Use [`Secret::expose`] only at the
/// point of signing.
#[derive(Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Borrow the raw secret for signing.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the secret is empty (i.e. not configured).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Application identifier assigned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppId(String);

impl AppId {
    /// Create a new app id.
    ///
    /// # Errors
    /// Returns [`RealtimeError::Validation`] if the id is empty or contains
    /// characters other than ASCII alphanumerics, `-` and `_`.
    pub fn new(id: impl Into<String>) -> Result<Self, RealtimeError> {
        let id = id.into();
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(RealtimeError::Validation(format!("invalid app id: {id:?}")));
        }
        Ok(Self(id))
    }

    /// Get the app id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AppId {
    type Error = RealtimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AppId> for String {
    fn from(value: AppId) -> Self {
        value.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access class of a channel, derived from its name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Anyone may subscribe; no auth token needed.
    Public,
    /// `private-` channels require an auth token.
    Private,
    /// `private-encrypted-` channels require an auth token.
    PrivateEncrypted,
    /// `presence-` channels require an auth token carrying member data.
    Presence,
}

impl ChannelKind {
    /// Whether subscribing to this kind of channel requires an auth token.
    #[must_use]
    pub fn requires_auth(self) -> bool {
        !matches!(self, Self::Public)
    }
}

/// A validated channel name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelName(String);

impl ChannelName {
    /// Longest channel name the service accepts.
    pub const MAX_LEN: usize = 164;

    /// Create a new channel name.
    ///
    /// # Errors
    /// Returns [`RealtimeError::Validation`] if the name is empty, longer than
    /// [`ChannelName::MAX_LEN`], or contains characters outside
    /// `[A-Za-z0-9_\-=@,.;]`.
    pub fn new(name: impl Into<String>) -> Result<Self, RealtimeError> {
        let name = name.into();
        if name.len() > Self::MAX_LEN {
            return Err(RealtimeError::Validation(format!(
                "channel name too long ({} > {} characters)",
                name.len(),
                Self::MAX_LEN
            )));
        }
        if !CHANNEL_NAME_RE.is_match(&name) {
            return Err(RealtimeError::Validation(format!(
                "invalid channel name: {name:?}"
            )));
        }
        Ok(Self(name))
    }

    /// Get the channel name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the channel by its prefix.
    #[must_use]
    pub fn kind(&self) -> ChannelKind {
        if self.0.starts_with("private-encrypted-") {
            ChannelKind::PrivateEncrypted
        } else if self.0.starts_with("private-") {
            ChannelKind::Private
        } else if self.0.starts_with("presence-") {
            ChannelKind::Presence
        } else {
            ChannelKind::Public
        }
    }

    /// Whether this is a presence channel.
    #[must_use]
    pub fn is_presence(&self) -> bool {
        self.kind() == ChannelKind::Presence
    }
}

impl TryFrom<String> for ChannelName {
    type Error = RealtimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChannelName> for String {
    fn from(value: ChannelName) -> Self {
        value.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a client socket connection, e.g. `"1234.5678"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SocketId(String);

impl SocketId {
    /// Create a new socket id.
    ///
    /// # Errors
    /// Returns [`RealtimeError::Validation`] unless the id matches `\d+\.\d+`.
    pub fn new(id: impl Into<String>) -> Result<Self, RealtimeError> {
        let id = id.into();
        if !SOCKET_ID_RE.is_match(&id) {
            return Err(RealtimeError::Validation(format!("invalid socket id: {id:?}")));
        }
        Ok(Self(id))
    }

    /// Get the socket id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SocketId {
    type Error = RealtimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SocketId> for String {
    fn from(value: SocketId) -> Self {
        value.0
    }
}

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
