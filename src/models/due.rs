//! Selection of the cards that are due for review.
//!
//! Filtering happens before the due check, so cards excluded by a filter
//! never count toward what is left to review. The due set is shuffled
//! uniformly so sessions do not always start with the same cards. Card ids
//! are unique within a due set; later cards reusing an id are skipped.

use super::{Card, CardState};
use crate::database::StateStore;
use crate::error::Result;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// A card without a state has never been reviewed and is always due.
pub fn is_due(state: Option<&CardState>, now: i64) -> bool {
    state.is_none_or(|s| s.is_due(now))
}

/// Restricts a session to a subset of the cards.
///
/// A card matches when it carries any of `tags` (or `tags` is empty) and
/// `query`, if set, occurs in its front, back or full text.
#[derive(Debug, Clone, Default)]
pub struct CardFilter {
    pub tags: Vec<String>,
    pub query: Option<String>,
}

impl CardFilter {
    pub fn matches(&self, card: &Card) -> bool {
        let tag_ok = self.tags.is_empty() || self.tags.iter().any(|t| card.has_tag(t));
        let query_ok = match &self.query {
            Some(query) => {
                let query = query.to_lowercase();
                [&card.front, &card.back, &card.full_text]
                    .iter()
                    .any(|text| text.to_lowercase().contains(&query))
            }
            None => true,
        };
        tag_ok && query_ok
    }
}

fn filtered_due<'a, S, P>(
    cards: &'a [Card],
    store: &S,
    predicate: P,
    now: i64,
) -> Result<Vec<&'a Card>>
where
    S: StateStore + ?Sized,
    P: Fn(&Card) -> bool,
{
    let mut due = Vec::new();
    let mut seen = HashSet::new();
    for card in cards {
        if !predicate(card) {
            continue;
        }
        if !seen.insert(card.id.as_str()) {
            log::warn!("Skipping duplicate card id '{}'", card.id);
            continue;
        }
        if is_due(store.get(&card.id)?.as_ref(), now) {
            due.push(card);
        }
    }
    Ok(due)
}

/// Returns the cards that match `predicate` and are due at `now`, shuffled.
pub fn select_due<'a, S, P, R>(
    cards: &'a [Card],
    store: &S,
    predicate: P,
    now: i64,
    rng: &mut R,
) -> Result<Vec<&'a Card>>
where
    S: StateStore + ?Sized,
    P: Fn(&Card) -> bool,
    R: Rng + ?Sized,
{
    let mut due = filtered_due(cards, store, predicate, now)?;
    due.shuffle(rng);

    log::debug!("{} of {} cards due", due.len(), cards.len());
    Ok(due)
}

/// Number of cards matching `predicate` that are due at `now`.
pub fn count_due<S, P>(cards: &[Card], store: &S, predicate: P, now: i64) -> Result<usize>
where
    S: StateStore + ?Sized,
    P: Fn(&Card) -> bool,
{
    Ok(filtered_due(cards, store, predicate, now)?.len())
}
