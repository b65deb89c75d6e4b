//! Letter-feedback scoring for guesses.
//!
//! This module contains the pure scoring function that compares a guess
//! against the secret word. Scoring is separated from round bookkeeping so
//! it can be exercised independently of any clock or session state.

use serde::{Deserialize, Serialize};

/// Accuracy tag for a single guessed letter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum LetterTag {
    /// Right letter in the right position.
    Correct,
    /// Letter occurs in the secret, but at a different position.
    Present,
    /// Letter does not occur in the secret (or its occurrences are spent).
    Absent,
}

impl LetterTag {
    /// Display glyph used by the web UI.
    pub fn glyph(self) -> char {
        match self {
            LetterTag::Correct => '🟩',
            LetterTag::Present => '🟨',
            LetterTag::Absent => '⬜',
        }
    }
}

/// Positional feedback for one guess, aligned letter-for-letter with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback(Vec<LetterTag>);

impl Feedback {
    /// Builds an all-Absent pattern of the given length.
    ///
    /// Used for the synthetic guess recorded when a guess slot times out.
    pub fn absent(len: usize) -> Self {
        Self(vec![LetterTag::Absent; len])
    }

    /// Returns the per-letter tags.
    pub fn tags(&self) -> &[LetterTag] {
        &self.0
    }

    /// True when every letter is in the right position.
    pub fn all_correct(&self) -> bool {
        self.0.iter().all(|t| *t == LetterTag::Correct)
    }

    /// Renders the pattern as a glyph string (🟩🟨⬜).
    pub fn glyphs(&self) -> String {
        self.0.iter().map(|t| t.glyph()).collect()
    }
}

/// Scores a guess against the secret word.
///
/// Two passes, canonical Wordle semantics:
/// 1. Exact positions are marked `Correct` and consume their secret letter.
/// 2. Remaining guess letters scan the unused secret letters left to right;
///    a match marks `Present` and consumes the leftmost unused occurrence,
///    otherwise the letter is `Absent`.
///
/// The leftmost-unused rule keeps duplicate-letter accounting deterministic:
/// a repeated guess letter never earns more `Correct` + `Present` tags than
/// the secret contains occurrences of it.
///
/// Callers must normalize and length-check the guess first; `guess` and
/// `secret` are required to have the same character count.
pub fn score(secret: &str, guess: &str) -> Feedback {
    let secret: Vec<char> = secret.chars().collect();
    let guess: Vec<char> = guess.chars().collect();
    debug_assert_eq!(secret.len(), guess.len(), "caller must length-check");

    let mut tags = vec![LetterTag::Absent; guess.len()];
    let mut used = vec![false; secret.len()];

    // Pass 1: exact positions.
    for (i, &ch) in guess.iter().enumerate() {
        if secret[i] == ch {
            tags[i] = LetterTag::Correct;
            used[i] = true;
        }
    }

    // Pass 2: misplaced letters consume the leftmost unused occurrence.
    for (i, &ch) in guess.iter().enumerate() {
        if tags[i] == LetterTag::Correct {
            continue;
        }
        if let Some(j) = (0..secret.len()).find(|&j| !used[j] && secret[j] == ch) {
            tags[i] = LetterTag::Present;
            used[j] = true;
        }
    }

    Feedback(tags)
}
