//! Pure decision table for the booking conversation

use super::event::Event;
use crate::session::ConversationStep;

/// Keyword that starts the booking flow, matched case-insensitively
pub const BOOKING_KEYWORD: &str = "book hospital";

/// Reply-button id meaning the user wants an ambulance
pub const AMBULANCE_YES_ID: &str = "ambulance_yes";

/// Reply-button id meaning the user will make their own way
pub const AMBULANCE_NO_ID: &str = "ambulance_no";

/// What the engine should do in response to an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch hospitals and present the selection menu (or report none)
    ShowHospitalMenu,
    /// Greet the user and explain how to start
    SendWelcome,
    /// Look up the chosen hospital and ask about an ambulance
    SelectHospital { hospital_id: String },
    /// Create the booking and confirm it
    FinalizeBooking { requires_ambulance: bool },
    /// Nudge the user back to the Yes/No buttons
    RemindAmbulanceChoice,
    /// Silently acknowledge
    Ignore,
}

/// Map the user's current step and an inbound event to a command.
///
/// Pure function: lookups and sends happen in the engine, so the table stays
/// exhaustively matchable. New event shapes must be handled here
/// deliberately rather than falling through.
pub fn transition(step: Option<ConversationStep>, event: &Event) -> Command {
    match (step, event) {
        (None, Event::Text { body }) => {
            if body.trim().eq_ignore_ascii_case(BOOKING_KEYWORD) {
                Command::ShowHospitalMenu
            } else {
                Command::SendWelcome
            }
        }
        (None, Event::ListReply { id }) => Command::SelectHospital {
            hospital_id: id.clone(),
        },
        // A button tap with no pending selection is a stale or replayed reply.
        (None, Event::ButtonReply { .. }) => Command::Ignore,

        (Some(ConversationStep::AwaitingAmbulanceConfirmation), Event::ButtonReply { id }) => {
            Command::FinalizeBooking {
                requires_ambulance: id == AMBULANCE_YES_ID,
            }
        }
        (Some(ConversationStep::AwaitingAmbulanceConfirmation), Event::Text { .. }) => {
            Command::RemindAmbulanceChoice
        }
        // Re-selecting from an old menu while a confirmation is pending would
        // let an out-of-order delivery clobber the selection; drop it.
        (Some(ConversationStep::AwaitingAmbulanceConfirmation), Event::ListReply { .. }) => {
            Command::Ignore
        }

        (_, Event::Unrecognized) => Command::Ignore,
    }
}
