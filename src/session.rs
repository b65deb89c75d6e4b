//! Per-player game sessions and the store that owns them.
//!
//! A [`GameSession`] owns at most one [`Round`]; rounds are never shared
//! between sessions. The [`SessionStore`] is the mutex-guarded map the web
//! layer reads sessions out of and writes them back into, one interaction
//! at a time.

use crate::game::{Outcome, Round, RoundStatus, Vocabulary};
use crate::registry::SessionId;
use derive_more::{Display, Error};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Where a session stands in its round lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No round has been initialized yet (start screen).
    NotStarted,
    /// A round is underway.
    InProgress,
    /// The round ended with the given outcome.
    Finished(Outcome),
}

/// Round initialization failed because no secret word is available.
#[derive(Debug, Clone, Display, Error)]
#[display("vocabulary has no admissible words")]
pub struct EmptyVocabulary;

/// A player's session and the round it owns.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    round: Option<Round>,
}

impl GameSession {
    /// Creates a session with no round (start screen).
    pub fn new(id: SessionId) -> Self {
        debug!(session_id = %id, "Creating game session");
        Self { id, round: None }
    }

    /// Session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The current round, if one was initialized.
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Mutable access to the current round.
    pub fn round_mut(&mut self) -> Option<&mut Round> {
        self.round.as_mut()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        match &self.round {
            None => Phase::NotStarted,
            Some(round) => match round.status() {
                RoundStatus::InProgress => Phase::InProgress,
                RoundStatus::Finished(outcome) => Phase::Finished(outcome),
            },
        }
    }

    /// Starts a fresh round with a secret drawn from the vocabulary.
    ///
    /// Replaces any existing round; guesses start empty and both clocks
    /// start at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyVocabulary`] when no secret can be drawn.
    #[instrument(skip(self, vocabulary, rng), fields(session_id = %self.id))]
    pub fn initialize(
        &mut self,
        vocabulary: &Vocabulary,
        rng: &mut impl Rng,
        now: Instant,
    ) -> Result<&Round, EmptyVocabulary> {
        let secret = vocabulary.choose(rng).ok_or(EmptyVocabulary)?;
        info!(session_id = %self.id, "Initializing round");
        self.round = Some(Round::start(secret.to_string(), now));
        Ok(self.round.as_ref().expect("round was just initialized"))
    }

    /// Discards the round entirely, returning to the start screen.
    ///
    /// The session identity (and its registry entry) is untouched.
    pub fn reset(&mut self) {
        info!(session_id = %self.id, "Resetting session round");
        self.round = None;
    }
}

/// Owns every session's round state, keyed by session id.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, GameSession>>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        info!("Creating session store");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Gets a session by id.
    pub fn get_session(&self, id: &str) -> Option<GameSession> {
        self.sessions.lock().unwrap().get(id).cloned()
    }

    /// Gets a session, creating it at the start screen if absent.
    pub fn ensure_session(&self, id: &str) -> GameSession {
        let mut sessions = self.sessions.lock().unwrap();
        sessions
            .entry(id.to_string())
            .or_insert_with(|| GameSession::new(id.to_string()))
            .clone()
    }

    /// Writes a session back after mutation.
    pub fn update_session(&self, session: GameSession) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(session.id.clone(), session);
    }

    /// Drops the sessions with the given ids (registry expiry).
    pub fn retire(&self, ids: &[SessionId]) {
        if ids.is_empty() {
            return;
        }
        let mut sessions = self.sessions.lock().unwrap();
        for id in ids {
            if sessions.remove(id).is_some() {
                debug!(session_id = %id, "Retired expired session round");
            }
        }
    }

    /// Number of stored sessions.
    pub fn count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
