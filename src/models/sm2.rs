//! Card scheduling after a review.
//!
//! Quality is clamped into 0-5 first, so any integer is accepted. A rating
//! below 3 is a lapse: the streak of repetitions drops to zero and the card
//! is due again tomorrow. A pass gives 1 day, then 6 days, then the previous
//! interval times the ease factor the card had *before* this review. The ease
//! factor moves by the SM-2 quadratic in `5 - quality` on every rating,
//! lapses included, and is floored at 1.3 afterwards.
//!
//! Corrupted input state (negative interval, NaN ease) is not validated. The
//! result is meaningless for such input but the computation never panics.

use super::card_state::{CardState, MILLIS_PER_DAY, MIN_EASE_FACTOR};
use super::rating::{PASSING_QUALITY, Rating, clamp_quality};

/// Computes the next scheduling state for a card rated `quality` at `now`.
///
/// `state` is `None` for a card that was never reviewed, which is treated
/// exactly like [`CardState::default`]. `now` is epoch milliseconds.
pub fn schedule(state: Option<&CardState>, quality: i64, now: i64) -> CardState {
    let default_state = CardState::default();
    let state = state.unwrap_or(&default_state);

    let quality = clamp_quality(quality);

    let (interval, repetitions) = if quality >= PASSING_QUALITY {
        let interval = match state.repetitions {
            0 => 1,
            1 => 6,
            _ => (state.interval as f64 * state.ease_factor).round() as i64,
        };
        (interval, state.repetitions.saturating_add(1))
    } else {
        (1, 0)
    };

    // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02)), using the old EF
    let q = quality as f64;
    let ease_factor =
        (state.ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02))).max(MIN_EASE_FACTOR);

    let next_review = now.saturating_add(interval.saturating_mul(MILLIS_PER_DAY));

    CardState {
        interval,
        repetitions,
        ease_factor,
        next_review,
    }
}

/// Intervals that Again, Hard, Good and Easy would produce for `state`.
pub fn preview_intervals(state: Option<&CardState>) -> [i64; 4] {
    Rating::ALL.map(|rating| schedule(state, rating.quality(), 0).interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn state(interval: i64, repetitions: u32, ease_factor: f64) -> CardState {
        CardState {
            interval,
            repetitions,
            ease_factor,
            next_review: NOW,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_first_review() {
        let next = schedule(Some(&CardState::default()), 4, NOW);
        assert_eq!(next.interval, 1);
        assert_eq!(next.repetitions, 1);
    }

    #[test]
    fn test_missing_state_same_as_default() {
        for quality in 0..=5 {
            assert_eq!(
                schedule(None, quality, NOW),
                schedule(Some(&CardState::default()), quality, NOW)
            );
        }
    }

    #[test]
    fn test_second_review_ignores_prior_interval() {
        for prior in [0, 1, 3, 40] {
            let next = schedule(Some(&state(prior, 1, 2.5)), 3, NOW);
            assert_eq!(next.interval, 6);
            assert_eq!(next.repetitions, 2);
        }
    }

    #[test]
    fn test_third_review_multiplies_by_ease() {
        let next = schedule(Some(&state(6, 2, 2.5)), 4, NOW);
        assert_eq!(next.interval, 15);
        assert_eq!(next.repetitions, 3);
    }

    #[test]
    fn test_long_interval_uses_old_ease() {
        // Easy raises EF to 2.6, but the interval is computed with 2.5
        let next = schedule(Some(&state(10, 4, 2.5)), 5, NOW);
        assert_eq!(next.interval, 25);
        assert_close(next.ease_factor, 2.6);
    }

    #[test]
    fn test_long_interval_rounds_half_away_from_zero() {
        // 5 * 1.3 = 6.5
        let next = schedule(Some(&state(5, 3, 1.3)), 4, NOW);
        assert_eq!(next.interval, 7);
    }

    #[test]
    fn test_quality_below_3_resets() {
        for quality in 0..3 {
            let next = schedule(Some(&state(10, 5, 2.5)), quality, NOW);
            assert_eq!(next.interval, 1);
            assert_eq!(next.repetitions, 0);
            // EF should still be updated
            assert!(next.ease_factor < 2.5);
        }
    }

    #[test]
    fn test_ease_adjustment_polynomial() {
        let expected = [-0.8, -0.54, -0.32, -0.14, 0.0, 0.1];
        for (quality, delta) in expected.iter().enumerate() {
            let next = schedule(Some(&state(6, 2, 2.5)), quality as i64, NOW);
            assert_close(next.ease_factor, 2.5 + delta);
        }
    }

    #[test]
    fn test_ef_floor() {
        for ease in [1.3, 1.4, 2.0, 2.5, 3.1] {
            for quality in 0..=5 {
                for repetitions in [0, 1, 2, 7] {
                    let next = schedule(Some(&state(6, repetitions, ease)), quality, NOW);
                    assert!(next.ease_factor >= MIN_EASE_FACTOR);
                }
            }
        }
        let next = schedule(Some(&state(1, 1, 1.3)), 0, NOW);
        assert_eq!(next.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn test_next_review_is_now_plus_interval_days() {
        for quality in 0..=5 {
            let next = schedule(Some(&state(6, 2, 2.5)), quality, NOW);
            assert_eq!(next.next_review, NOW + next.interval * 86_400_000);
        }
    }

    #[test]
    fn test_quality_is_clamped() {
        let current = state(15, 3, 2.2);
        assert_eq!(
            schedule(Some(&current), -5, NOW),
            schedule(Some(&current), 0, NOW)
        );
        assert_eq!(
            schedule(Some(&current), 99, NOW),
            schedule(Some(&current), 5, NOW)
        );
    }

    #[test]
    fn test_three_good_ratings_in_a_row() {
        let mut current: Option<CardState> = None;
        let mut now = NOW;
        let mut intervals = Vec::new();

        for _ in 0..3 {
            let next = schedule(current.as_ref(), Rating::Good.quality(), now);
            intervals.push(next.interval);
            assert_eq!(next.ease_factor, 2.5);
            now = next.next_review;
            current = Some(next);
        }

        assert_eq!(intervals, vec![1, 6, 15]);
    }

    #[test]
    fn test_lapse_then_recover() {
        let lapsed = schedule(Some(&state(15, 3, 2.5)), Rating::Again.quality(), NOW);
        assert_eq!(lapsed.interval, 1);
        assert_eq!(lapsed.repetitions, 0);
        assert_close(lapsed.ease_factor, 1.96);

        let recovered = schedule(Some(&lapsed), Rating::Good.quality(), lapsed.next_review);
        assert_eq!(recovered.interval, 1);
        assert_eq!(recovered.repetitions, 1);
    }

    #[test]
    fn test_corrupted_state_does_not_panic() {
        let zero = schedule(Some(&state(0, 2, 2.5)), 4, NOW);
        assert_eq!(zero.interval, 0);
        assert_eq!(zero.next_review, NOW);

        let negative = schedule(Some(&state(-4, 2, 2.5)), 4, NOW);
        assert_eq!(negative.interval, -10);

        let nan = schedule(Some(&state(6, 2, f64::NAN)), 4, NOW);
        assert!(nan.ease_factor >= MIN_EASE_FACTOR);

        let huge = schedule(Some(&state(i64::MAX, u32::MAX, 2.5)), 5, i64::MAX);
        assert_eq!(huge.repetitions, u32::MAX);
        assert_eq!(huge.next_review, i64::MAX);
    }

    #[test]
    fn test_preview_intervals() {
        assert_eq!(preview_intervals(None), [1, 1, 1, 1]);
        assert_eq!(preview_intervals(Some(&state(6, 2, 2.5))), [1, 15, 15, 15]);
    }
}
