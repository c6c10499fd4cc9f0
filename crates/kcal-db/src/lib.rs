//! Storage layer for the calorie ledger.
//!
//! Provides persistence for food entries using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! This means a `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! For concurrent access, open a separate `Database` per thread against the same file.
//! `SQLite` serializes the writers; a busy timeout makes a blocked writer wait instead
//! of failing immediately. Ids come from `AUTOINCREMENT`, so concurrent inserts never
//! share or reuse an id.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in RFC 3339 format with millisecond precision and a
//! `Z` suffix (e.g., `2024-01-15T10:30:00.000Z`). Both [`format_timestamp`] and the
//! column default produce exactly this shape, which ensures:
//! - Lexicographic ordering matches chronological ordering
//! - Day ranges can be compared as plain text bounds
//! - Timezone-free values (always UTC)
//!
//! The shape only sorts correctly for years `0000` through `9999`. Inserts outside
//! that span are rejected, and a range bound past it is left open.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use kcal_core::{
    CalorieOverflow, Calories, Clock, EntryId, EntryStore, FoodEntry, FoodName, NewFoodEntry,
    SystemClock,
};
use rusqlite::{Connection, Row, Transaction, TransactionBehavior, params};
use thiserror::Error;

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Years whose timestamps keep text order equal to chronological order.
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

const ENTRY_COLUMNS: &str = "id, name, calories, created_at";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for entry {entry_id}: {timestamp}")]
    TimestampParse {
        entry_id: i64,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored row violates an entry invariant.
    #[error("invalid food entry {entry_id}: {message}")]
    InvalidEntry { entry_id: i64, message: String },
    /// The timestamp cannot be stored in the sortable text format.
    #[error("timestamp {timestamp} is outside the storable range")]
    UnstorableTimestamp { timestamp: DateTime<Utc> },
    /// A calorie sum did not fit in an `i64`.
    #[error(transparent)]
    Overflow(#[from] CalorieOverflow),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A food entry row as read from the database, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EntryRow {
    id: i64,
    name: String,
    calories: i64,
    created_at: String,
}

impl EntryRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            calories: row.get(2)?,
            created_at: row.get(3)?,
        })
    }

    fn into_entry(self) -> Result<FoodEntry, DbError> {
        let invalid = |err: kcal_core::ValidationError| DbError::InvalidEntry {
            entry_id: self.id,
            message: err.to_string(),
        };
        Ok(FoodEntry {
            id: EntryId::new(self.id),
            name: FoodName::new(self.name).map_err(invalid)?,
            calories: Calories::new(self.calories).map_err(invalid)?,
            created_at: parse_timestamp(&self.created_at, self.id)?,
        })
    }
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- Food entries: append-only ledger
            -- id: AUTOINCREMENT so ids are never reused
            -- created_at: RFC 3339 UTC with milliseconds (e.g., '2024-01-15T10:30:00.000Z')
            CREATE TABLE IF NOT EXISTS food_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL CHECK (length(name) > 0),
                calories INTEGER NOT NULL CHECK (calories >= 0),
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE INDEX IF NOT EXISTS idx_food_entries_created_at ON food_entries(created_at);
            ",
        )?;
        Ok(())
    }

    /// Inserts an entry and returns it as stored.
    ///
    /// A missing `created_at` is stamped from the system clock.
    pub fn insert_entry(&self, entry: &NewFoodEntry) -> Result<FoodEntry, DbError> {
        self.insert_entry_with(entry, &SystemClock)
    }

    /// Inserts an entry, stamping a missing `created_at` from `clock`.
    ///
    /// The clock is read after `BEGIN IMMEDIATE` has taken the write lock, so
    /// concurrent writers stamp instants in the same order they get ids.
    pub fn insert_entry_with(
        &self,
        entry: &NewFoodEntry,
        clock: &dyn Clock,
    ) -> Result<FoodEntry, DbError> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let created_at = entry.created_at.unwrap_or_else(|| clock.now());
        if !STORABLE_YEARS.contains(&created_at.year()) {
            return Err(DbError::UnstorableTimestamp {
                timestamp: created_at,
            });
        }

        let row = tx.query_row(
            &format!(
                "
                INSERT INTO food_entries (name, calories, created_at)
                VALUES (?1, ?2, ?3)
                RETURNING {ENTRY_COLUMNS}
                "
            ),
            params![
                entry.name.as_str(),
                entry.calories.value(),
                format_timestamp(created_at)
            ],
            EntryRow::from_row,
        )?;
        tx.commit()?;
        tracing::debug!(id = row.id, created_at = %row.created_at, "inserted food entry");
        row.into_entry()
    }

    /// Lists all entries, most recent first, ties broken by descending ID.
    pub fn list_entries(&self) -> Result<Vec<FoodEntry>, DbError> {
        self.query_entries(
            &format!(
                "
                SELECT {ENTRY_COLUMNS}
                FROM food_entries
                ORDER BY created_at DESC, id DESC
                "
            ),
            [],
        )
    }

    /// Lists entries within a time range, earliest first, ties broken by ascending ID.
    ///
    /// The range is inclusive of `start` and exclusive of `end`.
    pub fn list_entries_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FoodEntry>, DbError> {
        let Some((start, end)) = text_range(start, end) else {
            return Ok(Vec::new());
        };
        tracing::debug!(%start, ?end, "listing entries in range");
        self.query_entries(
            &format!(
                "
                SELECT {ENTRY_COLUMNS}
                FROM food_entries
                WHERE created_at >= ?1 AND (?2 IS NULL OR created_at < ?2)
                ORDER BY created_at ASC, id ASC
                "
            ),
            params![start, end],
        )
    }

    /// Sums calories within a time range, computed by `SQLite`.
    ///
    /// The range is inclusive of `start` and exclusive of `end`. An empty range sums to 0.
    pub fn sum_calories_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, DbError> {
        let Some((start, end)) = text_range(start, end) else {
            return Ok(0);
        };
        let total = self.conn.query_row(
            "
            SELECT COALESCE(SUM(calories), 0)
            FROM food_entries
            WHERE created_at >= ?1 AND (?2 IS NULL OR created_at < ?2)
            ",
            params![start, end],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Counts all stored entries.
    pub fn count_entries(&self) -> Result<i64, DbError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM food_entries", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Returns the most recently recorded entry, if any.
    pub fn latest_entry(&self) -> Result<Option<FoodEntry>, DbError> {
        let mut entries = self.query_entries(
            &format!(
                "
                SELECT {ENTRY_COLUMNS}
                FROM food_entries
                ORDER BY created_at DESC, id DESC
                LIMIT 1
                "
            ),
            [],
        )?;
        Ok(entries.pop())
    }

    fn query_entries<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<FoodEntry>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, EntryRow::from_row)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.into_entry()?);
        }
        Ok(entries)
    }
}

impl EntryStore for Database {
    type Error = DbError;

    fn insert_entry(
        &self,
        entry: &NewFoodEntry,
        clock: &dyn Clock,
    ) -> Result<FoodEntry, Self::Error> {
        self.insert_entry_with(entry, clock)
    }

    fn list_entries(&self) -> Result<Vec<FoodEntry>, Self::Error> {
        Self::list_entries(self)
    }

    fn list_entries_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FoodEntry>, Self::Error> {
        Self::list_entries_in_range(self, start, end)
    }

    fn sum_calories_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, Self::Error> {
        Self::sum_calories_in_range(self, start, end)
    }
}

/// Text bounds for `[start, end)`, or `None` when nothing storable can match.
///
/// An end past year 9999 would format as `+10000-…`, which sorts before every
/// stored value, so it is left open instead.
fn text_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<(String, Option<String>)> {
    if end <= start || start.year() > *STORABLE_YEARS.end() {
        return None;
    }
    let end = (end.year() <= *STORABLE_YEARS.end()).then(|| format_timestamp(end));
    Some((format_timestamp(start), end))
}

fn parse_timestamp(timestamp: &str, entry_id: i64) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            entry_id,
            timestamp: timestamp.to_string(),
            source,
        })
}

/// Formats an instant the way it is stored: RFC 3339, UTC, milliseconds, `Z`.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
