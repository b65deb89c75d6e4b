//! Round bookkeeping and the guess/timeout state machine.
//!
//! A [`Round`] starts in progress with a fixed secret and ends `Won` or
//! `Lost`. All time-dependent transitions take `now` explicitly, so the
//! clock is owned by the caller and rounds are fully deterministic under
//! test.

use super::feedback::{Feedback, score};
use derive_more::{Display, Error};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Number of guesses allowed per round.
pub const MAX_GUESSES: usize = 3;

/// Time allowed for each guess.
pub const GUESS_TIME_LIMIT: Duration = Duration::from_secs(15);

/// Guess text recorded when a slot is consumed by the clock.
pub const TIMED_OUT_TEXT: &str = "(timed out)";

/// Terminal result of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// A guess matched the secret.
    Won,
    /// All guess slots were spent without a match.
    Lost,
}

/// Status of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    /// Guess slots remain and no guess has matched yet.
    InProgress,
    /// Round is over.
    Finished(Outcome),
}

/// One submitted guess and its feedback.
///
/// The raw text is kept as submitted; normalization applies to validation
/// and scoring only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuessRecord {
    raw: String,
    feedback: Feedback,
}

impl GuessRecord {
    /// The guess text as the player submitted it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Feedback pattern for this guess.
    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }
}

/// Reasons a guess is rejected without touching round state.
///
/// All of these are recoverable: the caller re-prompts and the round
/// continues unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GuessError {
    /// Guess was empty after trimming.
    #[display("guess must not be empty")]
    Empty,
    /// Guess length does not match the secret length.
    #[display("guess must be exactly {expected} letters, got {actual}")]
    WrongLength {
        /// Required letter count (the secret's length).
        expected: usize,
        /// Letter count of the submitted guess.
        actual: usize,
    },
    /// Round already reached a terminal state.
    #[display("round is already finished")]
    RoundOver,
}

/// One play-through against a single secret word.
#[derive(Debug, Clone)]
pub struct Round {
    secret: String,
    guesses: Vec<GuessRecord>,
    started_at: Instant,
    guess_started_at: Instant,
    status: RoundStatus,
}

impl Round {
    /// Starts a round against the given secret.
    ///
    /// The secret is expected to be normalized (lower-case, admissible
    /// length); [`crate::Vocabulary`] guarantees this for its entries.
    pub fn start(secret: String, now: Instant) -> Self {
        info!(word_len = secret.chars().count(), "Round started");
        Self {
            secret,
            guesses: Vec::new(),
            started_at: now,
            guess_started_at: now,
            status: RoundStatus::InProgress,
        }
    }

    /// The secret word. Constant for the lifetime of the round.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Letter count of the secret.
    pub fn word_len(&self) -> usize {
        self.secret.chars().count()
    }

    /// Guesses submitted so far, oldest first.
    pub fn guesses(&self) -> &[GuessRecord] {
        &self.guesses
    }

    /// Current status.
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// True once the round reached a terminal state.
    pub fn finished(&self) -> bool {
        matches!(self.status, RoundStatus::Finished(_))
    }

    /// True when the round ended with a matching guess.
    pub fn won(&self) -> bool {
        self.status == RoundStatus::Finished(Outcome::Won)
    }

    /// Terminal outcome, once finished.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            RoundStatus::InProgress => None,
            RoundStatus::Finished(outcome) => Some(outcome),
        }
    }

    /// Time elapsed since the round started.
    pub fn round_elapsed(&self, now: Instant) -> Duration {
        now.duration_since(self.started_at)
    }

    /// Time left on the current guess clock. Zero once the limit passed.
    pub fn guess_remaining(&self, now: Instant) -> Duration {
        GUESS_TIME_LIMIT.saturating_sub(now.duration_since(self.guess_started_at))
    }

    /// Submits a guess.
    ///
    /// The text is trimmed and lower-cased before validation and scoring.
    /// Rejected guesses (wrong length, empty, round over) leave the round
    /// untouched. An accepted guess is recorded with its feedback, resets
    /// the guess clock, and may finish the round.
    ///
    /// # Errors
    ///
    /// Returns a [`GuessError`] describing why the guess was rejected.
    #[instrument(skip(self, raw), fields(guess_no = self.guesses.len() + 1))]
    pub fn submit_guess(&mut self, raw: &str, now: Instant) -> Result<&GuessRecord, GuessError> {
        if self.finished() {
            return Err(GuessError::RoundOver);
        }

        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            debug!("Rejected empty guess");
            return Err(GuessError::Empty);
        }
        let expected = self.word_len();
        let actual = normalized.chars().count();
        if actual != expected {
            debug!(expected, actual, "Rejected guess with wrong length");
            return Err(GuessError::WrongLength { expected, actual });
        }

        let feedback = score(&self.secret, &normalized);
        self.guesses.push(GuessRecord {
            raw: raw.to_string(),
            feedback,
        });
        self.guess_started_at = now;

        if normalized == self.secret {
            info!(guesses = self.guesses.len(), "Round won");
            self.status = RoundStatus::Finished(Outcome::Won);
        } else if self.guesses.len() >= MAX_GUESSES {
            info!("Round lost, guesses exhausted");
            self.status = RoundStatus::Finished(Outcome::Lost);
        }

        Ok(self.guesses.last().expect("guess was just recorded"))
    }

    /// Forces a timeout transition when the guess clock has run out.
    ///
    /// Past the limit, one synthetic [`TIMED_OUT_TEXT`] guess with an
    /// all-Absent pattern is recorded and the guess clock resets; spending
    /// the last slot loses the round. Within the limit this is a no-op, so
    /// callers may poll freely. Not an error path in either case.
    #[instrument(skip(self))]
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        if self.finished() {
            return false;
        }
        if now.duration_since(self.guess_started_at) <= GUESS_TIME_LIMIT {
            return false;
        }

        warn!(guess_no = self.guesses.len() + 1, "Guess timed out");
        self.guesses.push(GuessRecord {
            raw: TIMED_OUT_TEXT.to_string(),
            feedback: Feedback::absent(self.word_len()),
        });
        self.guess_started_at = now;

        if self.guesses.len() >= MAX_GUESSES {
            info!("Round lost, final guess timed out");
            self.status = RoundStatus::Finished(Outcome::Lost);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(secret: &str) -> (Round, Instant) {
        let now = Instant::now();
        (Round::start(secret.to_string(), now), now)
    }

    #[test]
    fn test_winning_guess_finishes_round() {
        let (mut round, now) = round("volume");
        round.submit_guess("VOLUME ", now).unwrap();
        assert!(round.won());
        assert!(round.finished());
        assert_eq!(round.guesses().len(), 1);
    }

    #[test]
    fn test_rejected_guess_leaves_state_unchanged() {
        let (mut round, now) = round("volume");
        assert_eq!(
            round.submit_guess("vol", now),
            Err(GuessError::WrongLength {
                expected: 6,
                actual: 3
            })
        );
        assert_eq!(round.submit_guess("   ", now), Err(GuessError::Empty));
        assert!(round.guesses().is_empty());
        assert_eq!(round.status(), RoundStatus::InProgress);
    }

    #[test]
    fn test_guesses_exhausted_loses_round() {
        let (mut round, now) = round("volume");
        for _ in 0..MAX_GUESSES {
            round.submit_guess("losing", now).unwrap();
        }
        assert_eq!(round.outcome(), Some(Outcome::Lost));
        assert_eq!(round.submit_guess("volume", now), Err(GuessError::RoundOver));
        assert_eq!(round.guesses().len(), MAX_GUESSES);
    }

    #[test]
    fn test_timeout_appends_synthetic_guess() {
        let (mut round, now) = round("volume");
        let late = now + GUESS_TIME_LIMIT + Duration::from_secs(1);
        assert!(round.check_timeout(late));
        assert_eq!(round.guesses().len(), 1);
        assert_eq!(round.guesses()[0].raw(), TIMED_OUT_TEXT);
        assert!(
            round.guesses()[0]
                .feedback()
                .tags()
                .iter()
                .all(|t| *t == crate::game::feedback::LetterTag::Absent)
        );
        // Clock was reset; an immediate second check is a no-op.
        assert!(!round.check_timeout(late));
        assert_eq!(round.guesses().len(), 1);
    }

    #[test]
    fn test_timeout_within_limit_is_noop() {
        let (mut round, now) = round("volume");
        assert!(!round.check_timeout(now + Duration::from_secs(14)));
        assert!(round.guesses().is_empty());
    }

    #[test]
    fn test_guess_clock_resets_on_submission() {
        let (mut round, now) = round("volume");
        let mid = now + Duration::from_secs(10);
        round.submit_guess("losing", mid).unwrap();
        assert_eq!(round.guess_remaining(mid), GUESS_TIME_LIMIT);
    }
}
