//! Per-card scheduling record.

use serde::{Deserialize, Serialize};

/// Ease factor given to a card that has never been reviewed.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Ease factor never drops below this value.
pub const MIN_EASE_FACTOR: f64 = 1.3;

pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Scheduling state of one card for one learner.
///
/// Serialized with exactly four fields: `interval`, `repetitions`,
/// `easeFactor` and `nextReview` (epoch milliseconds). A missing record means
/// the card was never reviewed and is due now; [`CardState::default`] is
/// the equivalent explicit value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    pub interval: i64,
    pub repetitions: u32,
    pub ease_factor: f64,
    pub next_review: i64,
}

impl Default for CardState {
    fn default() -> Self {
        Self {
            interval: 0,
            repetitions: 0,
            ease_factor: INITIAL_EASE_FACTOR,
            next_review: 0,
        }
    }
}

impl CardState {
    pub fn is_due(&self, now: i64) -> bool {
        self.next_review <= now
    }
}
