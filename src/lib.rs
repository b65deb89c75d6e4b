//! Wordrush library - capacity-gated, timed word-guessing game.
//!
//! A Wordle-style game with hard-mode rules: three guesses, fifteen seconds
//! per guess, and a cap on how many players may be online at once.
//!
//! # Architecture
//!
//! - **Game**: pure scoring, the vocabulary, and the round state machine
//! - **Registry**: active-player tracking and the admission gate
//! - **Session**: per-player round ownership and the shared store
//! - **Server**: JSON web API driving the core, one interaction per request
//! - **Sink**: downstream persistence for winning submissions
//!
//! All time-dependent transitions take `now` explicitly and the secret is
//! drawn through an injected random source, so every piece is deterministic
//! under test.
//!
//! # Example
//!
//! ```
//! use wordrush::{LetterTag, score};
//!
//! let feedback = score("volume", "voltme");
//! assert_eq!(feedback.tags()[0], LetterTag::Correct);
//! assert_eq!(feedback.tags()[3], LetterTag::Absent);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod game;
mod registry;
mod server;
mod session;
mod sink;

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Game core
pub use game::{
    Feedback, GUESS_TIME_LIMIT, GuessError, GuessRecord, LetterTag, MAX_GUESSES, Outcome, Round,
    RoundStatus, TIMED_OUT_TEXT, Vocabulary, WORD_MAX_LEN, WORD_MIN_LEN, score,
};

// Crate-level exports - Registry and admission
pub use registry::{
    Admission, MAX_CONCURRENT_PLAYERS, SESSION_IDLE_TIMEOUT, SessionId, SessionRegistry,
};

// Crate-level exports - Session management
pub use session::{EmptyVocabulary, GameSession, Phase, SessionStore};

// Crate-level exports - Winner sink
pub use sink::{DisabledSink, SinkError, WebhookSink, WinnerRecord, WinnerSink};

// Crate-level exports - Web server
pub use server::{
    AppState, GameResponse, GuessRequest, GuessRow, JoinRequest, JoinResponse, SessionRequest,
    StateResponse, WinnerRequest, WinnerResponse, router,
};
