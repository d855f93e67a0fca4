//! HTTP API: webhook intake and operator endpoints

mod handlers;
mod types;

pub use handlers::create_router;

use crate::engine::ConversationEngine;
use crate::whatsapp::MessageTransport;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ConversationEngine>,
    pub transport: Arc<dyn MessageTransport>,
    pub verify_token: String,
}
