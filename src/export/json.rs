//! JSON import/export for decks and scheduling state.
//!
//! State files map card ids to `{interval, repetitions, easeFactor, nextReview}`.
//! Reading them is tolerant: an entry that does not parse is dropped with a
//! warning, so that card is simply treated as never reviewed.

use crate::database::StateStore;
use crate::error::Result;
use crate::models::{CardState, Deck};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Exports a deck to a JSON file at the specified path.
pub fn export_deck_to_path(deck: &Deck, path: impl AsRef<Path>) -> Result<()> {
    let json_string = serde_json::to_string_pretty(deck)?;
    fs::write(path, json_string)?;
    Ok(())
}

/// Imports a deck from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_deck(path: impl AsRef<Path>) -> Result<Deck> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let deck: Deck = serde_json::from_str(&contents)?;

    log::info!(
        "Deck '{}' ({} cards) imported from '{}'",
        deck.name,
        deck.cards.len(),
        path.display()
    );
    Ok(deck)
}

/// Parses a state document, keeping every entry that is a valid [`CardState`].
pub fn parse_states(json: &str) -> BTreeMap<String, CardState> {
    let entries = match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(entries)) => entries,
        Ok(_) => {
            log::warn!("State document is not an object, starting fresh");
            return BTreeMap::new();
        }
        Err(e) => {
            log::warn!("Unreadable state document, starting fresh: {}", e);
            return BTreeMap::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|(card_id, value)| match serde_json::from_value(value) {
            Ok(state) => Some((card_id, state)),
            Err(e) => {
                log::warn!("Dropping corrupt state for card '{}': {}", card_id, e);
                None
            }
        })
        .collect()
}

/// Writes every state in `store` to `path`.
pub fn export_states_to_path<S: StateStore + ?Sized>(
    store: &S,
    path: impl AsRef<Path>,
) -> Result<usize> {
    let states = store.all()?;
    fs::write(path, serde_json::to_string_pretty(&states)?)?;
    Ok(states.len())
}

/// Loads states from `path` into `store`.
///
/// With `reset`, the store is cleared first so cards missing from the file
/// go back to "never reviewed". Returns the number of states written.
pub fn import_states<S: StateStore + ?Sized>(
    store: &mut S,
    path: impl AsRef<Path>,
    reset: bool,
) -> Result<usize> {
    let contents = fs::read_to_string(path)?;
    let states = parse_states(&contents);

    if reset {
        store.clear()?;
    }
    for (card_id, state) in &states {
        store.put(card_id, state)?;
    }

    log::info!("Imported {} card states", states.len());
    Ok(states.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStateStore;
    use crate::models::Card;

    fn create_test_deck() -> Deck {
        Deck {
            name: "Test Deck".to_string(),
            cards: vec![
                Card::new("1", "hello", "cześć"),
                Card::new("2", "goodbye", "do widzenia").with_tags(["phrases"]),
            ],
        }
    }

    fn sample_state() -> CardState {
        CardState {
            interval: 6,
            repetitions: 2,
            ease_factor: 2.36,
            next_review: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_export_and_import_deck() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        let original_deck = create_test_deck();

        export_deck_to_path(&original_deck, &path).unwrap();
        let imported_deck = import_deck(&path).unwrap();

        assert_eq!(original_deck.name, imported_deck.name);
        assert_eq!(original_deck.cards, imported_deck.cards);
    }

    #[test]
    fn test_import_deck_nonexistent_file() {
        let result = import_deck("nonexistent_file_xyz123.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_import_deck_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        assert!(import_deck(&path).is_err());
    }

    #[test]
    fn test_parse_states() {
        let json = r#"{
  "a": {"interval": 6, "repetitions": 2, "easeFactor": 2.36, "nextReview": 1700000000000},
  "b": {"interval": 1, "repetitions": 0, "easeFactor": 1.96, "nextReview": 5}
}"#;
        let states = parse_states(json);

        assert_eq!(states.len(), 2);
        assert_eq!(states["a"], sample_state());
        assert_eq!(states["b"].ease_factor, 1.96);
    }

    #[test]
    fn test_parse_states_drops_corrupt_entries() {
        let json = r#"{
  "good": {"interval": 6, "repetitions": 2, "easeFactor": 2.36, "nextReview": 1700000000000},
  "text": {"interval": "six", "repetitions": 2, "easeFactor": 2.36, "nextReview": 0},
  "partial": {"interval": 6},
  "null": null
}"#;
        let states = parse_states(json);

        assert_eq!(states.len(), 1);
        assert!(states.contains_key("good"));
    }

    #[test]
    fn test_parse_states_garbage_document() {
        assert!(parse_states("not json").is_empty());
        assert!(parse_states("[1, 2, 3]").is_empty());
        assert!(parse_states("").is_empty());
    }

    #[test]
    fn test_states_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("states.json");

        let mut source = MemoryStateStore::new();
        source.put("a", &sample_state()).unwrap();
        assert_eq!(export_states_to_path(&source, &path).unwrap(), 1);

        let mut target = MemoryStateStore::new();
        assert_eq!(import_states(&mut target, &path, false).unwrap(), 1);
        assert_eq!(target.get("a").unwrap(), Some(sample_state()));
    }

    #[test]
    fn test_import_with_reset_forgets_other_cards() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("states.json");
        let json = r#"{"a": {"interval": 6, "repetitions": 2, "easeFactor": 2.36,
            "nextReview": 1700000000000}}"#;
        fs::write(&path, json).unwrap();

        let mut store = MemoryStateStore::new();
        store.put("b", &CardState::default()).unwrap();
        import_states(&mut store, &path, true).unwrap();

        assert_eq!(store.get("b").unwrap(), None);
        assert_eq!(store.get("a").unwrap(), Some(sample_state()));
    }
}
