//! HTTP request handlers

use super::types::{ErrorResponse, TestSendRequest, TestSendResponse, VerifyQuery};
use super::AppState;
use crate::state_machine::OutboundIntent;
use crate::whatsapp::normalize;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .route("/test/send", post(test_send))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Webhook Verification
// ============================================================

/// Meta's subscription handshake: echo the challenge iff the token matches
async fn verify_webhook(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Response {
    let verified = query.mode.as_deref() == Some("subscribe")
        && query.token.as_deref() == Some(state.verify_token.as_str());

    if verified {
        tracing::info!("webhook verified");
        (StatusCode::OK, query.challenge.unwrap_or_default()).into_response()
    } else {
        tracing::warn!(mode = ?query.mode, "webhook verification rejected");
        StatusCode::FORBIDDEN.into_response()
    }
}

// ============================================================
// Webhook Delivery
// ============================================================

/// Receive one webhook delivery and acknowledge it.
///
/// Every classifiable payload gets a 200, including status updates and
/// shapes with no message; faults inside message handling never reach the
/// response.
async fn receive_webhook(State(state): State<AppState>, Json(payload): Json<Value>) -> StatusCode {
    match normalize(&payload) {
        Some(message) => {
            tracing::debug!(from = %message.from, "handling inbound message");
            state.engine.handle_message(&message).await;
        }
        None => tracing::debug!("webhook carried no user message"),
    }
    StatusCode::OK
}

// ============================================================
// Operator Test Send
// ============================================================

async fn test_send(
    State(state): State<AppState>,
    Json(req): Json<TestSendRequest>,
) -> Result<Json<TestSendResponse>, AppError> {
    state
        .transport
        .send(&req.to, &OutboundIntent::plain_text(req.body))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(TestSendResponse { sent: true }))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("medlink ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Internal(message) = self;
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(message)),
        )
            .into_response()
    }
}
