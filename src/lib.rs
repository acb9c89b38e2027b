pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use database::{MemoryStateStore, SqliteStateStore, StateStore};
pub use error::{Result, StoreError};
pub use models::{Card, CardState, Deck, Rating, ReviewSession, schedule};
