//! Review session driver.
//!
//! Presents the due cards of a deck one at a time, collects a rating for
//! each, runs the scheduler and writes the new state back to the store.

use super::due::{CardFilter, select_due};
use super::rating::{Rating, is_passing};
use super::sm2::schedule;
use super::{Card, CardState, Deck};
use crate::database::StateStore;
use crate::error::Result;
use rand::Rng;

/// Running totals for one session. `correct` counts ratings of 3 or more.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub reviewed: usize,
    pub correct: usize,
}

pub struct ReviewSession<S: StateStore> {
    pub deck_name: String,
    cards: Vec<Card>,
    filter: CardFilter,
    queue: Vec<String>,
    current_index: usize,
    show_back: bool,
    rated_current: bool,
    stats: SessionStats,
    store: S,
}

impl<S: StateStore> ReviewSession<S> {
    /// Starts a session over the cards of `deck` that pass `filter` and are due at `now`.
    pub fn start<R: Rng + ?Sized>(
        deck: Deck,
        store: S,
        filter: CardFilter,
        now: i64,
        rng: &mut R,
    ) -> Result<Self> {
        let mut session = Self {
            deck_name: deck.name,
            cards: deck.cards,
            filter,
            queue: Vec::new(),
            current_index: 0,
            show_back: false,
            rated_current: false,
            stats: SessionStats::default(),
            store,
        };
        session.refresh(now, rng)?;

        log::info!(
            "Session for '{}' started with {} due cards",
            session.deck_name,
            session.queue.len()
        );
        Ok(session)
    }

    /// Re-queries the due set, picking up every state written so far.
    pub fn refresh<R: Rng + ?Sized>(&mut self, now: i64, rng: &mut R) -> Result<()> {
        let filter = &self.filter;
        let due = select_due(&self.cards, &self.store, |c| filter.matches(c), now, rng)?;
        self.queue = due.into_iter().map(|c| c.id.clone()).collect();
        self.current_index = 0;
        self.show_back = false;
        self.rated_current = false;
        Ok(())
    }

    pub fn current_card(&self) -> Option<&Card> {
        let id = self.queue.get(self.current_index)?;
        self.cards.iter().find(|c| &c.id == id)
    }

    pub fn toggle_back(&mut self) {
        self.show_back = !self.show_back;
    }

    pub fn is_back_shown(&self) -> bool {
        self.show_back
    }

    pub fn is_current_rated(&self) -> bool {
        self.rated_current
    }

    /// Current stored state of the card on screen, if it has one.
    pub fn current_state(&self) -> Result<Option<CardState>> {
        match self.queue.get(self.current_index) {
            Some(id) => self.store.get(id),
            None => Ok(None),
        }
    }

    /// Rates the current card and persists its new state.
    ///
    /// Returns `None` without touching the store when there is no current
    /// card or it was already rated; the card must be left with
    /// [`next_card`](Self::next_card) first.
    pub fn rate(&mut self, quality: i64, now: i64) -> Result<Option<CardState>> {
        if self.rated_current {
            log::debug!("Ignoring repeated rating for the current card");
            return Ok(None);
        }
        let Some(card_id) = self.queue.get(self.current_index) else {
            return Ok(None);
        };

        let previous = self.store.get(card_id)?;
        let next = schedule(previous.as_ref(), quality, now);
        self.store.put(card_id, &next)?;

        self.rated_current = true;
        self.stats.reviewed += 1;
        if is_passing(quality) {
            self.stats.correct += 1;
        }

        log::info!(
            "Rated '{}' with quality {}: next review in {} day(s)",
            card_id,
            quality,
            next.interval
        );
        Ok(Some(next))
    }

    pub fn rate_with(&mut self, rating: Rating, now: i64) -> Result<Option<CardState>> {
        self.rate(rating.quality(), now)
    }

    pub fn next_card(&mut self) {
        if self.current_index < self.queue.len() {
            self.current_index += 1;
        }
        self.show_back = false;
        self.rated_current = false;
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn total_count(&self) -> usize {
        self.queue.len()
    }

    /// Cards in the queue that have not been rated yet.
    pub fn remaining_count(&self) -> usize {
        self.queue
            .len()
            .saturating_sub(self.current_index + usize::from(self.rated_current))
    }

    pub fn is_completed(&self) -> bool {
        self.current_index >= self.queue.len()
    }

    pub fn progress_message(&self) -> String {
        if self.is_completed() {
            format!(
                "Done: {} reviewed, {} correct",
                self.stats.reviewed, self.stats.correct
            )
        } else {
            format!(
                "Card {} of {} ({} correct so far)",
                self.current_index + 1,
                self.total_count(),
                self.stats.correct
            )
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
