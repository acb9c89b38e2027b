//! Time sources for review sessions.
//!
//! The scheduler takes `now` as a parameter; a session driver samples a
//! clock once per rating and passes that instant through.

use chrono::{Duration, Utc};

use super::card_state::MILLIS_PER_DAY;

pub trait Clock {
    /// Current instant in epoch milliseconds.
    fn now(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// System time shifted by whole days, for reviewing "tomorrow" today.
pub struct OffsetClock {
    pub offset_days: i64,
}

impl Clock for OffsetClock {
    fn now(&self) -> i64 {
        let now = Utc::now();
        Duration::try_days(self.offset_days)
            .and_then(|offset| now.checked_add_signed(offset))
            .map(|shifted| shifted.timestamp_millis())
            .unwrap_or_else(|| {
                now.timestamp_millis()
                    .saturating_add(self.offset_days.saturating_mul(MILLIS_PER_DAY))
            })
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl FixedClock {
    pub fn advance_days(&mut self, days: i64) {
        self.0 = self.0.saturating_add(days.saturating_mul(MILLIS_PER_DAY));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}
