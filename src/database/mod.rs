//! Persistence of per-card scheduling state.
//!
//! The scheduler never touches storage. A session driver reads a card's
//! state, schedules it and writes the result back through a [`StateStore`].

pub mod db;
pub mod memory;

pub use db::SqliteStateStore;
pub use memory::MemoryStateStore;

use crate::error::Result;
use crate::models::CardState;
use std::collections::BTreeMap;

/// Keyed storage of [`CardState`] records.
///
/// An absent record means "never reviewed". Implementations that come
/// across a corrupt record report it as absent instead of failing.
pub trait StateStore {
    fn get(&self, card_id: &str) -> Result<Option<CardState>>;

    /// Stores `state`, replacing any previous record for the card.
    fn put(&mut self, card_id: &str, state: &CardState) -> Result<()>;

    /// Removes the record. Returns whether one existed.
    fn delete(&mut self, card_id: &str) -> Result<bool>;

    fn all(&self) -> Result<BTreeMap<String, CardState>>;

    /// Removes every record, returning all cards to "never reviewed".
    fn clear(&mut self) -> Result<()>;
}
