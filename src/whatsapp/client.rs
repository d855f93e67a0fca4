//! Outbound client for the WhatsApp Business Cloud API

use super::error::SendError;
use super::wire::{fallback_text, WireMessage, WirePayload};
use super::MessageTransport;
use crate::state_machine::OutboundIntent;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const GRAPH_API_VERSION: &str = "v17.0";
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Production transport: one Graph API `POST .../messages` per send
pub struct WhatsAppClient {
    client: Client,
    access_token: String,
    base_url: String,
}

impl WhatsAppClient {
    pub fn new(access_token: impl Into<String>, phone_number_id: &str) -> Self {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            access_token: access_token.into(),
            base_url: format!("https://graph.facebook.com/{GRAPH_API_VERSION}/{phone_number_id}"),
        }
    }

    async fn post_message(&self, message: &WireMessage) -> Result<(), SendError> {
        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .bearer_auth(&self.access_token)
            .json(message)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SendError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    SendError::network(format!("Connection failed: {e}"))
                } else {
                    SendError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_error(status, &body))
    }
}

fn classify_error(status: reqwest::StatusCode, body: &str) -> SendError {
    match status.as_u16() {
        401 | 403 => SendError::auth(format!("Authentication failed: {body}")),
        429 => SendError::rate_limit(format!("Rate limited: {body}")),
        400 => SendError::invalid_request(format!("Invalid request: {body}")),
        500..=599 => SendError::server_error(format!("Server error: {body}")),
        _ => SendError::unknown(format!("HTTP {status}: {body}")),
    }
}

#[async_trait]
impl MessageTransport for WhatsAppClient {
    async fn send(&self, to: &str, intent: &OutboundIntent) -> Result<(), SendError> {
        let message = WireMessage::new(to, WirePayload::from_intent(intent));
        match self.post_message(&message).await {
            Ok(()) => {
                tracing::debug!(to, "message sent");
                Ok(())
            }
            Err(err) => {
                // Interactive shapes degrade to a plain-text rendering; the
                // original error still propagates to the caller.
                if let Some(text) = fallback_text(intent) {
                    tracing::warn!(to, error = %err, "interactive send failed, falling back to text");
                    let fallback = WireMessage::new(to, WirePayload::text(text));
                    if let Err(fallback_err) = self.post_message(&fallback).await {
                        tracing::warn!(to, error = %fallback_err, "fallback send failed");
                    }
                } else {
                    tracing::error!(to, error = %err, "text send failed");
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whatsapp::SendErrorKind;
    use reqwest::StatusCode;

    #[test]
    fn http_statuses_classify_into_error_kinds() {
        let cases = [
            (401, SendErrorKind::Auth),
            (403, SendErrorKind::Auth),
            (429, SendErrorKind::RateLimit),
            (400, SendErrorKind::InvalidRequest),
            (500, SendErrorKind::ServerError),
            (503, SendErrorKind::ServerError),
            (418, SendErrorKind::Unknown),
        ];

        for (status, kind) in cases {
            let err = classify_error(StatusCode::from_u16(status).unwrap(), "boom");
            assert_eq!(err.kind, kind, "status {status}");
        }
    }

    #[test]
    fn classified_errors_keep_the_response_body() {
        let err = classify_error(StatusCode::from_u16(500).unwrap(), "upstream exploded");
        assert!(err.message.contains("upstream exploded"));
    }
}
