//! Core types, configuration, and error taxonomy for the Realtime server SDK.
//!
//! This crate provides the building blocks shared by the signing core
//! (`realtime-auth`), the HTTP client (`realtime-http`), and the auth server
//! binary: validated identifiers for apps, channels, and sockets, the
//! redacting [`Secret`] wrapper, environment-driven configuration, and the
//! single [`RealtimeError`] enum every fallible operation returns.

mod config;
mod error;
mod types;

pub use config::RealtimeConfig;
pub use error::{RealtimeError, RealtimeResult};
pub use types::{AppId, ChannelKind, ChannelName, Secret, SocketId};
