//! Medlink - WhatsApp hospital bed booking bot
//!
//! A webhook-driven service connecting the WhatsApp Business Cloud API to a
//! hospital bed booking workflow: list hospitals, pick one, confirm whether
//! an ambulance is needed, record the booking.

mod api;
mod config;
mod db;
mod engine;
mod session;
mod state_machine;
mod whatsapp;

#[cfg(test)]
mod testing;

use api::{create_router, AppState};
use config::Config;
use db::Database;
use engine::ConversationEngine;
use session::SessionStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use whatsapp::{MessageTransport, WhatsAppClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medlink=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env()?;

    // Ensure database directory exists
    if let Some(parent) = PathBuf::from(&config.db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.db_path, "Opening database");
    let db = Database::open(&config.db_path)?;

    if config.seed_demo && db.count_hospitals()? == 0 {
        let seeded = db.seed_demo_hospitals()?;
        tracing::info!(count = seeded, "Seeded demo hospitals");
    }

    let transport: Arc<dyn MessageTransport> = Arc::new(WhatsAppClient::new(
        config.access_token.clone(),
        &config.phone_number_id,
    ));
    let sessions = SessionStore::new(config.session_ttl);
    let engine = Arc::new(ConversationEngine::new(db, sessions, transport.clone()));

    let state = AppState {
        engine,
        transport,
        verify_token: config.verify_token.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Medlink server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
