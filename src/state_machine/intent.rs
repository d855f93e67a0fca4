//! Outbound message intents

use crate::db::Hospital;

/// A message the bot wants delivered, independent of the wire format
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundIntent {
    PlainText { body: String },
    HospitalMenu { hospitals: Vec<Hospital> },
    AmbulanceQuestion { hospital_name: String },
}

impl OutboundIntent {
    pub fn plain_text(body: impl Into<String>) -> Self {
        OutboundIntent::PlainText { body: body.into() }
    }
}
