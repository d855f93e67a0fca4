//! Per-user conversation sessions.
//!
//! A session exists only while a hospital selection is pending. The store is
//! an injected handle rather than ambient state, and entries expire after a
//! TTL so an abandoned selection cannot linger indefinitely.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Where the user is in the booking conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationStep {
    AwaitingAmbulanceConfirmation,
}

/// Pending selection for one user
#[derive(Debug, Clone)]
pub struct Session {
    pub step: ConversationStep,
    pub hospital_id: String,
    created_at: Instant,
}

impl Session {
    pub fn awaiting_ambulance_confirmation(hospital_id: impl Into<String>) -> Self {
        Self {
            step: ConversationStep::AwaitingAmbulanceConfirmation,
            hospital_id: hospital_id.into(),
            created_at: Instant::now(),
        }
    }

    fn expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Shared in-memory session store with lazy TTL expiry
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Current session for the user, dropping it first if it has expired
    pub fn get(&self, user_id: &str) -> Option<Session> {
        let mut sessions = self.inner.lock().unwrap();
        match sessions.get(user_id) {
            Some(session) if session.expired(self.ttl) => {
                sessions.remove(user_id);
                None
            }
            Some(session) => Some(session.clone()),
            None => None,
        }
    }

    pub fn set(&self, user_id: impl Into<String>, session: Session) {
        self.inner.lock().unwrap().insert(user_id.into(), session);
    }

    pub fn remove(&self, user_id: &str) {
        self.inner.lock().unwrap().remove(user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip() {
        let store = SessionStore::new(Duration::from_secs(60));
        store.set("user-1", Session::awaiting_ambulance_confirmation("H1"));

        let session = store.get("user-1").unwrap();
        assert_eq!(session.step, ConversationStep::AwaitingAmbulanceConfirmation);
        assert_eq!(session.hospital_id, "H1");
        assert!(store.get("user-2").is_none());
    }

    #[test]
    fn remove_clears_the_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        store.set("user-1", Session::awaiting_ambulance_confirmation("H1"));
        store.remove("user-1");
        assert!(store.get("user-1").is_none());
    }

    #[test]
    fn expired_sessions_read_as_absent() {
        let store = SessionStore::new(Duration::ZERO);
        store.set("user-1", Session::awaiting_ambulance_confirmation("H1"));
        std::thread::sleep(Duration::from_millis(2));
        assert!(store.get("user-1").is_none());
    }
}
