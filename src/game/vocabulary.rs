//! Secret-word vocabulary.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Shortest admissible secret word.
pub const WORD_MIN_LEN: usize = 3;
/// Longest admissible secret word.
pub const WORD_MAX_LEN: usize = 15;

/// The standard word list, drawn from the project's vision and mechanics.
const RAW_WORDS: [&str; 22] = [
    "composability",
    "nontransferable",
    "participation",
    "reflections",
    "ownership",
    "flywheel",
    "deflation",
    "gamified",
    "ecosystem",
    "recursive",
    "shareincreasing",
    "volume",
    "airdrop",
    "internaltoken",
    "boosted",
    "trading",
    "utilityburn",
    "farming",
    "creativity",
    "rewards",
    "APY",
    "EthOS",
];

/// Fixed list of candidate secret words.
///
/// Words are lower-cased and filtered to [`WORD_MIN_LEN`]..=[`WORD_MAX_LEN`]
/// characters at construction, so every entry is admissible as a secret.
/// Consumed read-only at round initialization.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    /// Builds the standard vocabulary.
    pub fn standard() -> Self {
        Self::from_words(RAW_WORDS.iter().copied())
    }

    /// Builds a vocabulary from arbitrary candidate words.
    ///
    /// Candidates outside the admissible length range are dropped.
    pub fn from_words<'a>(candidates: impl IntoIterator<Item = &'a str>) -> Self {
        let words: Vec<String> = candidates
            .into_iter()
            .map(|w| w.to_lowercase())
            .filter(|w| (WORD_MIN_LEN..=WORD_MAX_LEN).contains(&w.chars().count()))
            .collect();
        debug!(count = words.len(), "Vocabulary constructed");
        Self { words }
    }

    /// Returns the admissible words.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of admissible words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when no candidate survived the length filter.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Draws a secret word uniformly at random.
    ///
    /// Returns `None` when the vocabulary is empty. The random source is
    /// injected so tests can select deterministically.
    pub fn choose(&self, rng: &mut impl Rng) -> Option<&str> {
        self.words.choose(rng).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_standard_vocabulary_is_normalized() {
        let vocab = Vocabulary::standard();
        assert_eq!(vocab.len(), 22);
        for word in vocab.words() {
            assert_eq!(word, &word.to_lowercase());
            let len = word.chars().count();
            assert!((WORD_MIN_LEN..=WORD_MAX_LEN).contains(&len), "{word}");
        }
        assert!(vocab.words().iter().any(|w| w == "apy"));
    }

    #[test]
    fn test_length_filter_drops_outliers() {
        let vocab = Vocabulary::from_words(["ok", "valid", "waytoolongforthisgame"]);
        assert_eq!(vocab.words(), ["valid"]);
    }

    #[test]
    fn test_choose_is_deterministic_for_a_seed() {
        let vocab = Vocabulary::standard();
        let first = vocab.choose(&mut StdRng::seed_from_u64(7)).unwrap();
        let second = vocab.choose(&mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_choose_on_empty_vocabulary() {
        let vocab = Vocabulary::from_words(std::iter::empty());
        assert!(vocab.is_empty());
        assert!(vocab.choose(&mut StdRng::seed_from_u64(0)).is_none());
    }
}
