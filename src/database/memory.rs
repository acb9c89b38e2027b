use super::StateStore;
use crate::error::Result;
use crate::models::CardState;
use std::collections::BTreeMap;

/// In-process state store, used for tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStateStore {
    states: BTreeMap<String, CardState>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl FromIterator<(String, CardState)> for MemoryStateStore {
    fn from_iter<I: IntoIterator<Item = (String, CardState)>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, card_id: &str) -> Result<Option<CardState>> {
        Ok(self.states.get(card_id).cloned())
    }

    fn put(&mut self, card_id: &str, state: &CardState) -> Result<()> {
        self.states.insert(card_id.to_string(), state.clone());
        Ok(())
    }

    fn delete(&mut self, card_id: &str) -> Result<bool> {
        Ok(self.states.remove(card_id).is_some())
    }

    fn all(&self) -> Result<BTreeMap<String, CardState>> {
        Ok(self.states.clone())
    }

    fn clear(&mut self) -> Result<()> {
        self.states.clear();
        Ok(())
    }
}
