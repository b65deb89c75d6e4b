//! Active-player tracking and admission control.
//!
//! The registry maps session ids to their last activity time and is the
//! only state shared across players. One mutex guards the map; every
//! operation takes it once, so concurrent interactions cannot corrupt the
//! count. Time is injected as `now` so expiry is deterministic under test.

use rand::Rng as _;
use rand::distributions::Alphanumeric;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a player session.
pub type SessionId = String;

/// Maximum number of concurrently active players.
pub const MAX_CONCURRENT_PLAYERS: usize = 50;

/// Inactivity threshold after which a session expires.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Result of an admission check.
#[derive(Debug, Clone, Serialize)]
pub struct Admission {
    /// Whether the caller may play.
    pub allowed: bool,
    /// The admitted session's id; `None` when denied.
    pub session_id: Option<SessionId>,
    /// Active player count after the check.
    pub active: usize,
    /// Concurrent-player cap.
    pub capacity: usize,
    /// Sessions the check purged for inactivity. Callers retire any state
    /// keyed by these ids; not part of the wire response.
    #[serde(skip)]
    pub expired: Vec<SessionId>,
}

/// Tracks active player sessions and decides admission.
///
/// Capacity is enforced only at the point of new-session creation: an
/// already-registered player is never evicted by the cap, only by
/// inactivity. This favors continuity for players mid-round over fairness
/// to waiting ones.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    active: Arc<Mutex<HashMap<SessionId, Instant>>>,
    capacity: usize,
}

impl SessionRegistry {
    /// Creates a registry with the standard player cap.
    pub fn new() -> Self {
        Self::with_capacity(MAX_CONCURRENT_PLAYERS)
    }

    /// Creates a registry with an explicit cap (tests use small ones).
    pub fn with_capacity(capacity: usize) -> Self {
        info!(capacity, "Creating session registry");
        Self {
            active: Arc::new(Mutex::new(HashMap::new())),
            capacity,
        }
    }

    /// The concurrent-player cap.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts or refreshes a session's activity timestamp.
    pub fn register(&self, id: &str, now: Instant) {
        let mut active = self.active.lock().unwrap();
        active.insert(id.to_string(), now);
        debug!(session_id = id, active = active.len(), "Session registered");
    }

    /// Whether the session is currently registered.
    pub fn contains(&self, id: &str) -> bool {
        self.active.lock().unwrap().contains_key(id)
    }

    /// Number of registered sessions.
    ///
    /// Callers that need the count to reflect expiry purge first.
    pub fn count(&self) -> usize {
        self.active.lock().unwrap().len()
    }

    /// Removes sessions idle longer than [`SESSION_IDLE_TIMEOUT`].
    ///
    /// Returns the removed ids so the caller can retire any state keyed by
    /// them (a session's round is discarded when the session expires).
    #[instrument(skip(self))]
    pub fn purge_expired(&self, now: Instant) -> Vec<SessionId> {
        let mut active = self.active.lock().unwrap();
        let expired = purge_locked(&mut active, now);
        if !expired.is_empty() {
            info!(
                expired = expired.len(),
                active = active.len(),
                "Purged expired sessions"
            );
        }
        expired
    }

    /// Decides whether a caller may play.
    ///
    /// Expired sessions are purged first, so a caller whose session just
    /// idled out counts as new. A still-registered `session_id` is
    /// refreshed and re-admitted regardless of the cap. A new session is
    /// registered only while the cap has room, under the supplied id if
    /// the caller presented one (re-registration after expiry), or a
    /// freshly minted id.
    #[instrument(skip(self, session_id))]
    pub fn check_admission(&self, session_id: Option<&str>, now: Instant) -> Admission {
        let mut active = self.active.lock().unwrap();

        let expired = purge_locked(&mut active, now);
        if !expired.is_empty() {
            debug!(expired = expired.len(), "Purged during admission check");
        }

        if let Some(id) = session_id
            && let Some(last_activity) = active.get_mut(id)
        {
            *last_activity = now;
            debug!(session_id = id, "Returning session re-admitted");
            return Admission {
                allowed: true,
                session_id: Some(id.to_string()),
                active: active.len(),
                capacity: self.capacity,
                expired,
            };
        }

        if active.len() >= self.capacity {
            warn!(
                active = active.len(),
                capacity = self.capacity,
                "Admission denied, game at capacity"
            );
            return Admission {
                allowed: false,
                session_id: None,
                active: active.len(),
                capacity: self.capacity,
                expired,
            };
        }

        let id = session_id.map(str::to_string).unwrap_or_else(mint_session_id);
        active.insert(id.clone(), now);
        info!(session_id = %id, active = active.len(), "New session admitted");
        Admission {
            allowed: true,
            session_id: Some(id),
            active: active.len(),
            capacity: self.capacity,
            expired,
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn purge_locked(active: &mut HashMap<SessionId, Instant>, now: Instant) -> Vec<SessionId> {
    let expired: Vec<SessionId> = active
        .iter()
        .filter(|(_, last)| now.duration_since(**last) > SESSION_IDLE_TIMEOUT)
        .map(|(id, _)| id.clone())
        .collect();
    for id in &expired {
        active.remove(id);
    }
    expired
}

fn mint_session_id() -> SessionId {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sessions_admitted_under_cap() {
        let registry = SessionRegistry::with_capacity(2);
        let now = Instant::now();

        let first = registry.check_admission(None, now);
        assert!(first.allowed);
        assert_eq!(first.active, 1);

        let second = registry.check_admission(None, now);
        assert!(second.allowed);
        assert_eq!(second.active, 2);
        assert_ne!(first.session_id, second.session_id);
    }

    #[test]
    fn test_new_session_denied_at_cap() {
        let registry = SessionRegistry::with_capacity(1);
        let now = Instant::now();
        registry.check_admission(None, now);

        let denied = registry.check_admission(None, now);
        assert!(!denied.allowed);
        assert!(denied.session_id.is_none());
        assert_eq!(denied.active, 1);
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_registered_session_readmitted_at_cap() {
        let registry = SessionRegistry::with_capacity(1);
        let now = Instant::now();
        let id = registry
            .check_admission(None, now)
            .session_id
            .expect("admitted");

        let again = registry.check_admission(Some(&id), now + Duration::from_secs(10));
        assert!(again.allowed);
        assert_eq!(again.session_id.as_deref(), Some(id.as_str()));
        assert_eq!(again.active, 1);
    }

    #[test]
    fn test_idle_sessions_expire() {
        let registry = SessionRegistry::with_capacity(10);
        let now = Instant::now();
        registry.register("idle", now);
        registry.register("busy", now);

        let later = now + SESSION_IDLE_TIMEOUT + Duration::from_secs(1);
        registry.register("busy", later);
        let expired = registry.purge_expired(later);

        assert_eq!(expired, vec!["idle".to_string()]);
        assert_eq!(registry.count(), 1);
        assert!(registry.contains("busy"));
    }

    #[test]
    fn test_refresh_defers_expiry() {
        let registry = SessionRegistry::with_capacity(10);
        let now = Instant::now();
        registry.register("player", now);

        // Refreshed through admission just before the threshold.
        let near = now + SESSION_IDLE_TIMEOUT - Duration::from_secs(1);
        assert!(registry.check_admission(Some("player"), near).allowed);

        let past_original = now + SESSION_IDLE_TIMEOUT + Duration::from_secs(1);
        assert!(registry.purge_expired(past_original).is_empty());
    }

    #[test]
    fn test_expired_caller_treated_as_new() {
        let registry = SessionRegistry::with_capacity(1);
        let now = Instant::now();
        registry.register("stale", now);
        registry.register("fresh", now + SESSION_IDLE_TIMEOUT);

        // "stale" expired; presenting its id re-registers it, subject to
        // the cap, which "fresh" already fills.
        let later = now + SESSION_IDLE_TIMEOUT + Duration::from_secs(1);
        let denied = registry.check_admission(Some("stale"), later);
        assert!(!denied.allowed);
    }
}
