//! Conversation engine
//!
//! Executes the commands produced by the pure transition against the
//! repository, session store, and outbound transport. Each inbound event is
//! handled to completion, serialized per user.

use crate::db::{Database, DbError};
use crate::session::{Session, SessionStore};
use crate::state_machine::{transition, Command, Event, OutboundIntent};
use crate::whatsapp::{InboundMessage, MessageTransport, SendError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Upper bound on menu size, a wire-format constraint of interactive lists
const HOSPITAL_MENU_LIMIT: u32 = 5;

const WELCOME_TEXT: &str = r#"Welcome to Medlink! Send "book hospital" to start booking."#;
const NO_HOSPITALS_TEXT: &str = "No hospitals found. Please try again later.";
const REMINDER_TEXT: &str = "Please tap Yes or No to let us know whether you need an ambulance.";
const GENERIC_ERROR_TEXT: &str = "Sorry, there was an error. Please try again.";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Repository error: {0}")]
    Db(#[from] DbError),
    #[error("Transport error: {0}")]
    Send(#[from] SendError),
}

/// Decision core wired to its collaborators
pub struct ConversationEngine {
    db: Database,
    sessions: SessionStore,
    transport: Arc<dyn MessageTransport>,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ConversationEngine {
    pub fn new(db: Database, sessions: SessionStore, transport: Arc<dyn MessageTransport>) -> Self {
        Self {
            db,
            sessions,
            transport,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Handle one inbound message to completion.
    ///
    /// Faults become a generic apology to the user and a log line; the
    /// caller acknowledges the webhook either way.
    pub async fn handle_message(&self, message: &InboundMessage) {
        let lock = self.user_lock(&message.from).await;
        let _guard = lock.lock().await;

        if let Err(err) = self.dispatch(&message.from, &message.event).await {
            tracing::error!(user = %message.from, error = %err, "message handling failed");
            let apology = OutboundIntent::plain_text(GENERIC_ERROR_TEXT);
            if let Err(send_err) = self.transport.send(&message.from, &apology).await {
                tracing::warn!(user = %message.from, error = %send_err, "failed to notify user");
            }
        }
    }

    // Two events for the same user must not interleave session reads and
    // writes; events for different users proceed concurrently.
    async fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.user_locks.lock().await;
        locks.entry(user_id.to_string()).or_default().clone()
    }

    async fn dispatch(&self, from: &str, event: &Event) -> Result<(), EngineError> {
        let session = self.sessions.get(from);
        let command = transition(session.as_ref().map(|s| s.step), event);

        match command {
            Command::ShowHospitalMenu => {
                let hospitals = self.db.list_hospitals(HOSPITAL_MENU_LIMIT)?;
                let intent = if hospitals.is_empty() {
                    OutboundIntent::plain_text(NO_HOSPITALS_TEXT)
                } else {
                    OutboundIntent::HospitalMenu { hospitals }
                };
                self.transport.send(from, &intent).await?;
            }
            Command::SendWelcome => {
                self.transport
                    .send(from, &OutboundIntent::plain_text(WELCOME_TEXT))
                    .await?;
            }
            Command::SelectHospital { hospital_id } => match self.db.get_hospital(&hospital_id)? {
                Some(hospital) => {
                    self.transport
                        .send(
                            from,
                            &OutboundIntent::AmbulanceQuestion {
                                hospital_name: hospital.name.clone(),
                            },
                        )
                        .await?;
                    self.sessions
                        .set(from, Session::awaiting_ambulance_confirmation(hospital.id));
                }
                // An id we no longer know about: a stale menu tap.
                None => {
                    tracing::debug!(user = %from, hospital_id = %hospital_id, "selection for unknown hospital ignored");
                }
            },
            Command::FinalizeBooking { requires_ambulance } => {
                if let Some(session) = session {
                    let booking =
                        self.db
                            .create_booking(from, &session.hospital_id, requires_ambulance)?;
                    tracing::info!(
                        booking_id = %booking.id,
                        user = %booking.user_id,
                        hospital_id = %booking.hospital_id,
                        requires_ambulance = booking.requires_ambulance,
                        "booking created"
                    );

                    let body = if booking.requires_ambulance {
                        "Booking confirmed! An ambulance will be dispatched."
                    } else {
                        "Booking confirmed! Please arrive at the hospital."
                    };
                    self.transport
                        .send(from, &OutboundIntent::plain_text(body))
                        .await?;
                    self.sessions.remove(from);
                }
            }
            Command::RemindAmbulanceChoice => {
                self.transport
                    .send(from, &OutboundIntent::plain_text(REMINDER_TEXT))
                    .await?;
            }
            Command::Ignore => {}
        }

        Ok(())
    }
}
