use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use claims_engine::Session;
use config_engine::Settings;
use dashmap::DashMap;
use logger_redacted::PiiRedactor;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct ClaimsServer {
    /// Settings the server was started with
    pub settings: Arc<Settings>,
    /// Redacts user-supplied text before it is logged
    pub redactor: Arc<PiiRedactor>,
    sessions: Arc<DashMap<Uuid, Arc<Session>>>,
    /// Held sessions plus slots reserved by requests still building one
    occupied: Arc<AtomicUsize>,
    started_at: Instant,
}

/// A session slot claimed ahead of generation or ingest
///
/// Dropping an unused slot hands it back.
#[must_use = "a slot is released as soon as it is dropped"]
pub struct SessionSlot {
    occupied: Arc<AtomicUsize>,
    filled: bool,
}

impl Drop for SessionSlot {
    fn drop(&mut self) {
        if !self.filled {
            self.occupied.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

impl ClaimsServer {
    pub fn new(settings: Settings) -> Self {
        let redactor = PiiRedactor::from_logger_config(&settings.logging);
        Self {
            settings: Arc::new(settings),
            redactor: Arc::new(redactor),
            sessions: Arc::new(DashMap::new()),
            occupied: Arc::new(AtomicUsize::new(0)),
            started_at: Instant::now(),
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Claim a slot before any expensive work
    ///
    /// Concurrent requests never claim more slots than the cap allows.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ServiceUnavailable`] at the session cap.
    pub fn reserve(&self) -> ApiResult<SessionSlot> {
        let max = self.settings.server.max_sessions;
        self.occupied
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |taken| (taken < max).then_some(taken + 1))
            .map_err(|_| {
                ApiError::service_unavailable(format!("session limit of {max} reached; delete a session and retry"))
            })?;
        Ok(SessionSlot {
            occupied: Arc::clone(&self.occupied),
            filled: false,
        })
    }

    /// Hold `session` in a slot claimed by [`reserve`](Self::reserve)
    pub fn insert(&self, mut slot: SessionSlot, session: Session) -> Arc<Session> {
        slot.filled = true;
        let session = Arc::new(session);
        self.sessions.insert(session.id(), Arc::clone(&session));
        info!(session_id = %session.id(), live = self.sessions.len(), "Session opened");
        session
    }

    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub fn get(&self, id: Uuid) -> ApiResult<Arc<Session>> {
        self.sessions
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ApiError::not_found(format!("session {id}")))
    }

    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub fn remove(&self, id: Uuid) -> ApiResult<()> {
        self.sessions
            .remove(&id)
            .map(|_| {
                self.occupied.fetch_sub(1, Ordering::AcqRel);
                debug!(session_id = %id, live = self.sessions.len(), "Session closed");
            })
            .ok_or_else(|| ApiError::not_found(format!("session {id}")))
    }
}
