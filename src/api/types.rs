//! API request and response types

use serde::{Deserialize, Serialize};

/// Meta webhook verification handshake query parameters
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Request for the operator test-send endpoint
#[derive(Debug, Deserialize)]
pub struct TestSendRequest {
    pub to: String,
    pub body: String,
}

/// Response for the operator test-send endpoint
#[derive(Debug, Serialize)]
pub struct TestSendResponse {
    pub sent: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
