//! Core conversation state machine
//!
//! A pure decision table over normalized inbound events; the engine executes
//! the resulting commands.

mod event;
mod intent;
mod transition;

#[cfg(test)]
mod proptests;

pub use event::Event;
pub use intent::OutboundIntent;
pub use transition::{transition, Command, AMBULANCE_NO_ID, AMBULANCE_YES_ID};
