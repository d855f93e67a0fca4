//! WhatsApp Business Cloud API channel adapter
//!
//! Translates outbound intents into the Graph API wire format, normalizes
//! inbound webhook payloads into events, and performs the outbound calls.

mod client;
mod error;
mod inbound;
mod wire;

pub use client::WhatsAppClient;
pub use error::{SendError, SendErrorKind};
pub use inbound::{normalize, InboundMessage};

use crate::state_machine::OutboundIntent;
use async_trait::async_trait;

/// Send-only interface to the outbound messaging channel
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Deliver one intent to one recipient
    async fn send(&self, to: &str, intent: &OutboundIntent) -> Result<(), SendError>;
}
