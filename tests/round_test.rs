//! Tests for the round state machine.

use std::time::{Duration, Instant};
use wordrush::{
    GUESS_TIME_LIMIT, GuessError, MAX_GUESSES, Outcome, Round, RoundStatus, TIMED_OUT_TEXT,
};

fn start(secret: &str) -> (Round, Instant) {
    let now = Instant::now();
    (Round::start(secret.to_string(), now), now)
}

#[test]
fn test_three_losing_guesses_finish_the_round() {
    let (mut round, now) = start("volume");
    for i in 0..MAX_GUESSES {
        assert_eq!(round.status(), RoundStatus::InProgress, "before guess {i}");
        round.submit_guess("losing", now).expect("valid guess");
    }

    assert_eq!(round.status(), RoundStatus::Finished(Outcome::Lost));
    assert!(round.finished());
    assert!(!round.won());

    // The round is closed: nothing mutates the record any more.
    assert_eq!(round.submit_guess("volume", now), Err(GuessError::RoundOver));
    assert!(!round.check_timeout(now + GUESS_TIME_LIMIT * 2));
    assert_eq!(round.guesses().len(), MAX_GUESSES);
}

#[test]
fn test_win_on_second_guess() {
    let (mut round, now) = start("volume");
    round.submit_guess("losing", now).unwrap();
    round.submit_guess("volume", now).unwrap();

    assert!(round.won());
    assert!(round.finished());
    assert_eq!(round.outcome(), Some(Outcome::Won));
    assert_eq!(round.guesses().len(), 2);
}

#[test]
fn test_normalization_before_matching() {
    let (mut round, now) = start("volume");
    let record = round.submit_guess("  VoLuMe \n", now).unwrap().clone();
    // Raw text is preserved; matching used the normalized form.
    assert_eq!(record.raw(), "  VoLuMe \n");
    assert!(round.won());
}

#[test]
fn test_rejections_do_not_consume_guess_slots() {
    let (mut round, now) = start("volume");
    assert!(round.submit_guess("", now).is_err());
    assert!(round.submit_guess("      ", now).is_err());
    assert!(round.submit_guess("vol", now).is_err());
    assert!(round.submit_guess("volumes", now).is_err());
    assert!(round.guesses().is_empty());
    assert_eq!(round.status(), RoundStatus::InProgress);
}

#[test]
fn test_timeouts_spend_slots_until_lost() {
    let (mut round, t0) = start("volume");
    let step = GUESS_TIME_LIMIT + Duration::from_secs(1);

    let t1 = t0 + step;
    assert!(round.check_timeout(t1));
    let t2 = t1 + step;
    assert!(round.check_timeout(t2));
    let t3 = t2 + step;
    assert!(round.check_timeout(t3));

    assert_eq!(round.status(), RoundStatus::Finished(Outcome::Lost));
    assert_eq!(round.guesses().len(), MAX_GUESSES);
    for record in round.guesses() {
        assert_eq!(record.raw(), TIMED_OUT_TEXT);
        assert!(
            record
                .feedback()
                .tags()
                .iter()
                .all(|t| *t == wordrush::LetterTag::Absent)
        );
    }
}

#[test]
fn test_timeout_is_idempotent_within_the_limit() {
    let (mut round, t0) = start("volume");

    // Twice inside the limit: no effect.
    assert!(!round.check_timeout(t0 + Duration::from_secs(5)));
    assert!(!round.check_timeout(t0 + Duration::from_secs(14)));
    assert!(round.guesses().is_empty());

    // Once past the limit: exactly one synthetic guess.
    let late = t0 + GUESS_TIME_LIMIT + Duration::from_secs(1);
    assert!(round.check_timeout(late));
    assert!(!round.check_timeout(late));
    assert_eq!(round.guesses().len(), 1);
}

#[test]
fn test_boundary_is_strictly_greater_than_limit() {
    let (mut round, t0) = start("volume");
    // Exactly at the limit the slot survives.
    assert!(!round.check_timeout(t0 + GUESS_TIME_LIMIT));
}

#[test]
fn test_guess_resets_the_guess_clock() {
    let (mut round, t0) = start("volume");
    let mid = t0 + Duration::from_secs(10);
    round.submit_guess("losing", mid).unwrap();

    // The next slot's clock starts at the submission time.
    assert!(!round.check_timeout(mid + GUESS_TIME_LIMIT));
    assert!(round.check_timeout(mid + GUESS_TIME_LIMIT + Duration::from_secs(1)));
}

#[test]
fn test_secret_is_constant_for_the_round() {
    let (mut round, now) = start("volume");
    let before = round.secret().to_string();
    round.submit_guess("losing", now).unwrap();
    let _ = round.check_timeout(now + GUESS_TIME_LIMIT * 2);
    assert_eq!(round.secret(), before);
}
