//! SQLite-backed state store.
//!
//! Holds one row per reviewed card in the `card_states` table. Cards without
//! a row have never been reviewed.

use super::StateStore;
use crate::error::Result;
use crate::models::CardState;
use rusqlite::{Connection, Row, params};
use std::collections::BTreeMap;
use std::path::Path;

pub struct SqliteStateStore {
    conn: Connection,
}

impl SqliteStateStore {
    /// Opens (or creates) the database file and makes sure the table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS card_states (
                card_id TEXT PRIMARY KEY,
                interval INTEGER NOT NULL DEFAULT 0,
                repetitions INTEGER NOT NULL DEFAULT 0,
                ease_factor REAL NOT NULL DEFAULT 2.5,
                next_review INTEGER NOT NULL DEFAULT 0
            )",
            (),
        )?;

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn state_from_row(row: &Row<'_>) -> rusqlite::Result<CardState> {
    Ok(CardState {
        interval: row.get("interval")?,
        repetitions: row.get("repetitions")?,
        ease_factor: row.get("ease_factor")?,
        next_review: row.get("next_review")?,
    })
}

/// Errors caused by a row holding values of the wrong type or range.
fn is_corrupt_row(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)
    )
}

impl StateStore for SqliteStateStore {
    fn get(&self, card_id: &str) -> Result<Option<CardState>> {
        let result = self.conn.query_row(
            "SELECT interval, repetitions, ease_factor, next_review
             FROM card_states WHERE card_id = ?1",
            params![card_id],
            state_from_row,
        );

        match result {
            Ok(state) => Ok(Some(state)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) if is_corrupt_row(&e) => {
                log::warn!("Corrupt state for card '{}', treating as new: {}", card_id, e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, card_id: &str, state: &CardState) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO card_states
             (card_id, interval, repetitions, ease_factor, next_review)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                card_id,
                state.interval,
                state.repetitions,
                state.ease_factor,
                state.next_review
            ],
        )?;

        log::debug!(
            "Stored state for '{}': interval={} repetitions={} ease={:.2}",
            card_id,
            state.interval,
            state.repetitions,
            state.ease_factor
        );
        Ok(())
    }

    fn delete(&mut self, card_id: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM card_states WHERE card_id = ?1", params![card_id])?;
        Ok(removed > 0)
    }

    fn all(&self) -> Result<BTreeMap<String, CardState>> {
        let mut stmt = self.conn.prepare(
            "SELECT card_id, interval, repetitions, ease_factor, next_review FROM card_states",
        )?;

        let rows = stmt.query_map([], |row| {
            let card_id: String = row.get("card_id")?;
            Ok((card_id, state_from_row(row)))
        })?;

        let mut states = BTreeMap::new();
        for row in rows {
            let (card_id, state) = row?;
            match state {
                Ok(state) => {
                    states.insert(card_id, state);
                }
                Err(e) if is_corrupt_row(&e) => {
                    log::warn!("Skipping corrupt state for card '{}': {}", card_id, e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(states)
    }

    fn clear(&mut self) -> Result<()> {
        let removed = self.conn.execute("DELETE FROM card_states", ())?;
        log::info!("Cleared {} card states", removed);
        Ok(())
    }
}
