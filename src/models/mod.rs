pub mod card;
pub mod card_state;
pub mod clock;
pub mod deck;
pub mod due;
pub mod learning_session;
pub mod rating;
pub mod sm2;

pub use card::Card;
pub use card_state::{CardState, INITIAL_EASE_FACTOR, MILLIS_PER_DAY, MIN_EASE_FACTOR};
pub use clock::{Clock, FixedClock, OffsetClock, SystemClock};
pub use deck::Deck;
pub use due::{CardFilter, count_due, is_due, select_due};
pub use learning_session::{ReviewSession, SessionStats};
pub use rating::{Rating, clamp_quality, is_passing};
pub use sm2::{preview_intervals, schedule};
