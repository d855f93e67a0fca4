//! Mock implementations for testing
//!
//! These mocks enable engine and handler tests without real I/O.

use crate::state_machine::OutboundIntent;
use crate::whatsapp::{MessageTransport, SendError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Transport that records every send and returns queued failures
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, OutboundIntent)>>,
    failures: Mutex<VecDeque<SendError>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a failure for the next send attempt
    pub fn queue_failure(&self, error: SendError) {
        self.failures.lock().unwrap().push_back(error);
    }

    /// All recorded sends, including failed attempts
    pub fn sent(&self) -> Vec<(String, OutboundIntent)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send(&self, to: &str, intent: &OutboundIntent) -> Result<(), SendError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), intent.clone()));

        match self.failures.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
