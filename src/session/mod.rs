//! Signed-in identity and its change notifications.
//!
//! [`SessionStore`] is the single source of truth for "who is signed in".
//! It is passed explicitly to every view that needs it. Reads always go to
//! storage, and every mutation is followed by a [`SessionEvent`] on a
//! broadcast channel, so any number of mounted views observe the same
//! identity without polling.

pub mod storage;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError, SESSION_KEY};

use crate::config::{StorageBackend, StorageConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Pending events kept per subscriber before it is considered lagged
const EVENT_CAPACITY: usize = 16;

/// Account role; decides which dashboards a user may open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Applies to jobs, attends interviews
    Candidate,
    /// Posts jobs, shortlists and interviews candidates
    Interviewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Candidate => "Candidate",
            Role::Interviewer => "Interviewer",
        }
    }

    /// Path segment used by the registration endpoints
    pub fn registration_slug(&self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Interviewer => "interviewer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "candidate" => Ok(Role::Candidate),
            "interviewer" => Ok(Role::Interviewer),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

/// The signed-in identity. `email` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    /// Label shown in the navigation bar
    pub fn display_label(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

/// Change notification published after storage has been updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Login or registration completed
    SignedIn(Session),
    /// Display name changed through a profile edit
    Updated(Session),
    SignedOut,
}

impl SessionEvent {
    /// Session in effect after this event
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionEvent::SignedIn(s) | SessionEvent::Updated(s) => Some(s),
            SessionEvent::SignedOut => None,
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { storage, events }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        match config.backend {
            StorageBackend::File => Self::new(Arc::new(FileStorage::new(&config.data_dir))),
            StorageBackend::Memory => Self::in_memory(),
        }
    }

    /// Current identity. Unreadable or malformed records count as signed out.
    pub fn get_session(&self) -> Option<Session> {
        let raw = match self.storage.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted session");
                return None;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed persisted session");
                None
            }
        }
    }

    pub fn set_session(&self, session: Session) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&session)?;
        self.storage.write(&encoded)?;
        tracing::info!(email = %session.email, role = %session.role, "Signed in");
        self.publish(SessionEvent::SignedIn(session));
        Ok(())
    }

    pub fn clear_session(&self) -> Result<(), StorageError> {
        self.storage.remove()?;
        tracing::info!("Signed out");
        self.publish(SessionEvent::SignedOut);
        Ok(())
    }

    /// Change only the display name. Returns `None` when nobody is signed in.
    pub fn update_display_name(&self, name: &str) -> Result<Option<Session>, StorageError> {
        let Some(mut session) = self.get_session() else {
            return Ok(None);
        };
        session.name = name.to_string();

        let encoded = serde_json::to_string(&session)?;
        self.storage.write(&encoded)?;
        tracing::debug!(email = %session.email, "Updated display name");
        self.publish(SessionEvent::Updated(session.clone()));
        Ok(Some(session))
    }

    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.events.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    fn publish(&self, event: SessionEvent) {
        // Err only means nobody is listening
        let _ = self.events.send(event);
    }
}

/// A listener's handle on session changes. Dropping it unsubscribes.
#[derive(Debug)]
pub struct SessionSubscription {
    rx: broadcast::Receiver<SessionEvent>,
}

impl SessionSubscription {
    /// Next pending event without waiting
    pub fn try_next(&mut self) -> Option<SessionEvent> {
        use broadcast::error::TryRecvError;

        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Session subscriber lagged, skipping to newer events");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Consume every pending event and return the newest one
    pub fn drain_latest(&mut self) -> Option<SessionEvent> {
        let mut latest = None;
        while let Some(event) = self.try_next() {
            latest = Some(event);
        }
        latest
    }

    /// Wait for the next event. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<SessionEvent> {
        use broadcast::error::RecvError;

        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Session subscriber lagged, skipping to newer events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
