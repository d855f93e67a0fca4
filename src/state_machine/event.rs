//! Normalized inbound message events

/// What the user sent, independent of the wire format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Free-form text message
    Text { body: String },
    /// Selection from an interactive list
    ListReply { id: String },
    /// Tap on an interactive reply button
    ButtonReply { id: String },
    /// A message shape the bot does not understand
    Unrecognized,
}
