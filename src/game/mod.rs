//! Core game logic: scoring, vocabulary, and the round state machine.

pub mod feedback;
pub mod round;
pub mod vocabulary;

pub use feedback::{Feedback, LetterTag, score};
pub use round::{
    GUESS_TIME_LIMIT, GuessError, GuessRecord, MAX_GUESSES, Outcome, Round, RoundStatus,
    TIMED_OUT_TEXT,
};
pub use vocabulary::{Vocabulary, WORD_MAX_LEN, WORD_MIN_LEN};
