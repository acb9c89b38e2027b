//! Quality ratings.
//!
//! The scheduler accepts any integer quality and clamps it to 0-5:
//! - 0: Complete blackout
//! - 1: Incorrect, but the answer was recognized
//! - 2: Incorrect, but the answer seemed easy to recall
//! - 3: Correct with serious difficulty
//! - 4: Correct after hesitation
//! - 5: Perfect response
//!
//! Learners only see four buttons, mapped onto that scale by [`Rating`].

pub const MIN_QUALITY: i64 = 0;
pub const MAX_QUALITY: i64 = 5;

/// Lowest quality that counts as a successful recall.
pub const PASSING_QUALITY: i64 = 3;

pub fn clamp_quality(quality: i64) -> i64 {
    quality.clamp(MIN_QUALITY, MAX_QUALITY)
}

pub fn is_passing(quality: i64) -> bool {
    clamp_quality(quality) >= PASSING_QUALITY
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    pub fn quality(self) -> i64 {
        match self {
            Rating::Again => 1,
            Rating::Hard => 3,
            Rating::Good => 4,
            Rating::Easy => 5,
        }
    }

    /// Maps a 1-4 button index to a rating.
    pub fn from_button(button: u8) -> Option<Self> {
        match button {
            1 => Some(Rating::Again),
            2 => Some(Rating::Hard),
            3 => Some(Rating::Good),
            4 => Some(Rating::Easy),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Again => "Again",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        }
    }
}
