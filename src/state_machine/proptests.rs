//! Property-based tests for the conversation decision table
//!
//! These tests verify key invariants hold across all possible inputs.

use super::event::Event;
use super::transition::{transition, Command, AMBULANCE_YES_ID, BOOKING_KEYWORD};
use crate::session::ConversationStep;
use proptest::prelude::*;

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "\\PC{0,40}".prop_map(|body| Event::Text { body }),
        "[a-z0-9-]{1,24}".prop_map(|id| Event::ListReply { id }),
        "[a-z_]{1,24}".prop_map(|id| Event::ButtonReply { id }),
        Just(Event::Unrecognized),
    ]
}

fn arb_step() -> impl Strategy<Value = Option<ConversationStep>> {
    prop_oneof![
        Just(None),
        Just(Some(ConversationStep::AwaitingAmbulanceConfirmation)),
    ]
}

proptest! {
    // The decision table is total: no (step, event) pair may panic.
    #[test]
    fn transition_is_total(step in arb_step(), event in arb_event()) {
        let _ = transition(step, &event);
    }

    #[test]
    fn booking_keyword_matches_any_casing(
        flips in proptest::collection::vec(any::<bool>(), BOOKING_KEYWORD.len())
    ) {
        let body: String = BOOKING_KEYWORD
            .chars()
            .zip(flips)
            .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
            .collect();
        prop_assert_eq!(transition(None, &Event::Text { body }), Command::ShowHospitalMenu);
    }

    // A booking can only be finalized from a pending session.
    #[test]
    fn no_booking_without_pending_session(event in arb_event()) {
        let is_finalize = matches!(
            transition(None, &event),
            Command::FinalizeBooking { .. }
        );
        prop_assert!(!is_finalize);
    }

    // Only the yes button requests an ambulance, whatever else gets tapped.
    #[test]
    fn only_the_yes_button_requests_an_ambulance(id in "[a-z_]{1,24}") {
        let command = transition(
            Some(ConversationStep::AwaitingAmbulanceConfirmation),
            &Event::ButtonReply { id: id.clone() },
        );
        prop_assert_eq!(
            command,
            Command::FinalizeBooking { requires_ambulance: id == AMBULANCE_YES_ID }
        );
    }
}
