//! HTTP client for the Realtime service.
//!
//! [`RealtimeClient`] validates caller input, signs each API request with
//! `realtime-auth`, sends it through a pluggable [`Transport`], and maps the
//! response onto [`realtime_core::RealtimeError`]. It also wraps the signing
//! core's channel authorization and webhook verification with input
//! validation and payload parsing.
//!
//! # Usage
//!
//! ```rust,no_run
//! use realtime_core::RealtimeConfig;
//! use realtime_http::{RealtimeClient, TriggerParams};
//!
//! # async fn run() -> realtime_core::RealtimeResult<()> {
//! let client = RealtimeClient::new(&RealtimeConfig::from_env())?;
//! client
//!     .trigger(
//!         TriggerParams::builder()
//!             .name("order-shipped")
//!             .data(serde_json::json!({ "id": 42 }))
//!             .channel("private-orders")
//!             .build(),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`client`] - The signed API client
//! - [`model`] - Request parameters, limits, and response shapes
//! - [`transport`] - Transport trait and reqwest implementation
//! - [`webhook`] - Webhook payload types

pub mod client;
pub mod model;
pub mod transport;
pub mod webhook;

pub use client::RealtimeClient;
pub use model::{
    BatchEvent, BatchTriggerResponse, ChannelAttributes, ChannelInfoQuery, ChannelsQuery,
    ChannelsResponse, PresenceMember, PresenceUser, TriggerParams, TriggerResponse,
};
pub use transport::{ReqwestTransport, Transport};
pub use webhook::{WebhookEvent, WebhookPayload};
