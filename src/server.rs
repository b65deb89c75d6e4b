//! HTTP presentation layer.
//!
//! A thin JSON API over the game core. Each handler is one discrete
//! interaction: it takes the clock reading for the request, runs the
//! admission check, drives the session's round through the core
//! transitions, and writes the session back. All waiting happens on the
//! client, which polls `/api/game/state` to advance the guess clock.

use crate::game::{MAX_GUESSES, Outcome, Vocabulary};
use crate::registry::{Admission, SessionRegistry};
use crate::session::{GameSession, Phase, SessionStore};
use crate::sink::{WinnerRecord, WinnerSink};
use axum::extract::{Query, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    registry: SessionRegistry,
    store: SessionStore,
    vocabulary: Arc<Vocabulary>,
    sink: Arc<dyn WinnerSink>,
}

impl AppState {
    /// Assembles the application state.
    pub fn new(
        registry: SessionRegistry,
        store: SessionStore,
        vocabulary: Vocabulary,
        sink: Arc<dyn WinnerSink>,
    ) -> Self {
        info!("Creating application state");
        Self {
            registry,
            store,
            vocabulary: Arc::new(vocabulary),
            sink,
        }
    }

    /// Runs the admission check and retires rounds of any session the
    /// check purged for inactivity.
    fn admit(&self, session_id: Option<&str>, now: Instant) -> Admission {
        let admission = self.registry.check_admission(session_id, now);
        self.store.retire(&admission.expired);
        admission
    }
}

/// Request to join the game, or rejoin with a known session id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    /// Session id from a previous admission, if any.
    pub session_id: Option<String>,
}

/// Admission outcome plus player counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinResponse {
    /// Whether the caller may play.
    pub allowed: bool,
    /// Session id to use on subsequent calls; `None` when denied.
    pub session_id: Option<String>,
    /// Players currently online.
    pub active: usize,
    /// Concurrent-player cap.
    pub capacity: usize,
    /// Capacity message when denied.
    pub message: Option<String>,
}

/// Identifies the calling session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    /// Session id from admission.
    pub session_id: String,
}

/// Query form of session identification, for GET endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionQuery {
    /// Session id from admission.
    pub session_id: String,
}

/// Request to submit a guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessRequest {
    /// Session id from admission.
    pub session_id: String,
    /// The guess text as typed.
    pub guess: String,
}

/// Request to submit a winning handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinnerRequest {
    /// Session id from admission.
    pub session_id: String,
    /// Social handle to record (without the leading `@`).
    pub handle: String,
}

/// One guess and its feedback, render-ready.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessRow {
    /// The guess as submitted (or the timed-out marker).
    pub guess: String,
    /// Feedback as glyphs (🟩🟨⬜), aligned with the guess.
    pub glyphs: String,
}

/// Snapshot of a session's round, as the UI renders it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateResponse {
    /// Lifecycle phase: `not_started`, `in_progress`, `won`, or `lost`.
    pub phase: String,
    /// Secret word length, once a round exists.
    pub word_len: Option<usize>,
    /// 1-based number of the guess being typed, while in progress.
    pub guess_number: Option<usize>,
    /// Guesses allowed per round.
    pub max_guesses: usize,
    /// Whole seconds left on the guess clock, while in progress.
    pub remaining_seconds: Option<u64>,
    /// Guesses submitted so far, oldest first.
    pub rows: Vec<GuessRow>,
    /// True once the round is over.
    pub finished: bool,
    /// True when the round was won.
    pub won: bool,
    /// The secret, revealed once the round is over.
    pub secret: Option<String>,
}

/// Envelope for game-endpoint replies.
///
/// `ok = false` covers every recoverable rejection (capacity, validation,
/// round over); the message is the re-prompt text and the state, when
/// present, is current. Nothing here is an HTTP error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResponse {
    /// Whether the requested transition was applied.
    pub ok: bool,
    /// Re-prompt or status text when `ok` is false.
    pub message: Option<String>,
    /// Current round snapshot.
    pub state: Option<StateResponse>,
}

/// Reply to a winner submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinnerResponse {
    /// Whether the record reached the sink.
    pub submitted: bool,
    /// Human-readable status.
    pub message: String,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/session", post(join))
        .route("/api/game/start", post(start))
        .route("/api/game/state", get(game_state))
        .route("/api/game/guess", post(guess))
        .route("/api/game/reset", post(reset))
        .route("/api/winner", post(winner))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    info!(method = %method, uri = %uri, status = %response.status(), "Handled request");
    response
}

fn capacity_message(admission: &Admission) -> String {
    format!(
        "Game is at capacity: {}/{} players online. Try again in a few minutes.",
        admission.active, admission.capacity
    )
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::NotStarted => "not_started",
        Phase::InProgress => "in_progress",
        Phase::Finished(Outcome::Won) => "won",
        Phase::Finished(Outcome::Lost) => "lost",
    }
}

fn render_state(session: &GameSession, now: Instant) -> StateResponse {
    let round = session.round();
    let rows = round
        .map(|r| {
            r.guesses()
                .iter()
                .map(|g| GuessRow {
                    guess: g.raw().to_string(),
                    glyphs: g.feedback().glyphs(),
                })
                .collect()
        })
        .unwrap_or_default();

    let finished = round.map(|r| r.finished()).unwrap_or(false);
    StateResponse {
        phase: phase_label(session.phase()).to_string(),
        word_len: round.map(|r| r.word_len()),
        guess_number: round
            .filter(|r| !r.finished())
            .map(|r| r.guesses().len() + 1),
        max_guesses: MAX_GUESSES,
        remaining_seconds: round
            .filter(|r| !r.finished())
            .map(|r| r.guess_remaining(now).as_secs()),
        rows,
        finished,
        won: round.map(|r| r.won()).unwrap_or(false),
        secret: round
            .filter(|_| finished)
            .map(|r| r.secret().to_string()),
    }
}

fn denied(admission: &Admission) -> Json<GameResponse> {
    Json(GameResponse {
        ok: false,
        message: Some(capacity_message(admission)),
        state: None,
    })
}

/// Admission gate: lets a caller in, or reports the game is full.
#[instrument(skip(state, req))]
async fn join(State(state): State<AppState>, Json(req): Json<JoinRequest>) -> Json<JoinResponse> {
    let now = Instant::now();
    let admission = state.admit(req.session_id.as_deref(), now);
    let message = (!admission.allowed).then(|| capacity_message(&admission));
    Json(JoinResponse {
        allowed: admission.allowed,
        session_id: admission.session_id,
        active: admission.active,
        capacity: admission.capacity,
        message,
    })
}

/// Starts a round for the session.
#[instrument(skip(state, req), fields(session_id = %req.session_id))]
async fn start(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Json<GameResponse> {
    let now = Instant::now();
    let admission = state.admit(Some(&req.session_id), now);
    if !admission.allowed {
        return denied(&admission);
    }

    let mut session = state.store.ensure_session(&req.session_id);
    if let Err(e) = session.initialize(&state.vocabulary, &mut rand::thread_rng(), now) {
        warn!(error = %e, "Round initialization failed");
        return Json(GameResponse {
            ok: false,
            message: Some(e.to_string()),
            state: Some(render_state(&session, now)),
        });
    }
    state.store.update_session(session.clone());

    Json(GameResponse {
        ok: true,
        message: None,
        state: Some(render_state(&session, now)),
    })
}

/// Returns the session's current round snapshot.
///
/// Also drives the guess clock: polling this endpoint is what forces the
/// timeout transition, so a stalled guess slot is spent even if the player
/// never submits.
#[instrument(skip(state, query), fields(session_id = %query.session_id))]
async fn game_state(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Json<GameResponse> {
    let now = Instant::now();
    let admission = state.admit(Some(&query.session_id), now);
    if !admission.allowed {
        return denied(&admission);
    }

    let mut session = state.store.ensure_session(&query.session_id);
    let timed_out = session
        .round_mut()
        .map(|r| r.check_timeout(now))
        .unwrap_or(false);
    if timed_out {
        state.store.update_session(session.clone());
    }

    Json(GameResponse {
        ok: true,
        message: None,
        state: Some(render_state(&session, now)),
    })
}

/// Submits a guess for the session's round.
#[instrument(skip(state, req), fields(session_id = %req.session_id))]
async fn guess(State(state): State<AppState>, Json(req): Json<GuessRequest>) -> Json<GameResponse> {
    let now = Instant::now();
    let admission = state.admit(Some(&req.session_id), now);
    if !admission.allowed {
        return denied(&admission);
    }

    let mut session = state.store.ensure_session(&req.session_id);
    if session.round().is_none() {
        return Json(GameResponse {
            ok: false,
            message: Some("No round in progress. Start a game first.".to_string()),
            state: Some(render_state(&session, now)),
        });
    }

    // A guess arriving after the limit spends the stalled slot first.
    let round = session.round_mut().expect("round presence was just checked");
    let timed_out = round.check_timeout(now);
    let result = round.submit_guess(&req.guess, now).map(|_| ());
    if timed_out || result.is_ok() {
        state.store.update_session(session.clone());
    }

    match result {
        Ok(()) => Json(GameResponse {
            ok: true,
            message: None,
            state: Some(render_state(&session, now)),
        }),
        Err(e) => Json(GameResponse {
            ok: false,
            message: Some(e.to_string()),
            state: Some(render_state(&session, now)),
        }),
    }
}

/// Discards the session's round, keeping the session itself.
#[instrument(skip(state, req), fields(session_id = %req.session_id))]
async fn reset(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Json<GameResponse> {
    let now = Instant::now();
    let admission = state.admit(Some(&req.session_id), now);
    if !admission.allowed {
        return denied(&admission);
    }

    let mut session = state.store.ensure_session(&req.session_id);
    session.reset();
    state.store.update_session(session.clone());

    Json(GameResponse {
        ok: true,
        message: None,
        state: Some(render_state(&session, now)),
    })
}

/// Forwards a winning submission to the winner sink.
///
/// Sink failures are reported in the reply; the round's outcome is not
/// affected either way.
#[instrument(skip(state, req), fields(session_id = %req.session_id))]
async fn winner(
    State(state): State<AppState>,
    Json(req): Json<WinnerRequest>,
) -> Json<WinnerResponse> {
    let now = Instant::now();
    let admission = state.admit(Some(&req.session_id), now);
    if !admission.allowed {
        return Json(WinnerResponse {
            submitted: false,
            message: capacity_message(&admission),
        });
    }

    let handle = req.handle.trim();
    if handle.is_empty() {
        return Json(WinnerResponse {
            submitted: false,
            message: "Please enter a valid handle.".to_string(),
        });
    }

    let won_round = state
        .store
        .get_session(&req.session_id)
        .and_then(|s| s.round().filter(|r| r.won()).cloned());
    let Some(round) = won_round else {
        return Json(WinnerResponse {
            submitted: false,
            message: "Only won rounds can be submitted.".to_string(),
        });
    };

    let record = WinnerRecord::new(handle, round.secret(), round.guesses().len());
    match state.sink.submit(&record).await {
        Ok(()) => Json(WinnerResponse {
            submitted: true,
            message: format!("Handle @{} submitted successfully.", handle),
        }),
        Err(e) => {
            warn!(error = %e, "Winner submission failed");
            Json(WinnerResponse {
                submitted: false,
                message: format!("Submission failed: {}", e.message),
            })
        }
    }
}
