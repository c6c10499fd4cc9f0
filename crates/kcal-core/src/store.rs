//! Storage seam for the ledger.
//!
//! The ledger and aggregator only talk to storage through [`EntryStore`], so the
//! day-boundary and summation rules can be exercised against any backend
//! (the `SQLite` store in `kcal-db`, or an in-memory double in tests).

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::clock::Clock;
use crate::entry::{FoodEntry, NewFoodEntry};

/// A calorie sum that does not fit in an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("calorie total overflowed")]
pub struct CalorieOverflow;

/// Append-only persistence for food entries.
///
/// Implementations own id assignment: ids must be unique, increase with each
/// insert and never be reused, even under concurrent inserts.
pub trait EntryStore {
    /// Error raised by the underlying storage.
    type Error: std::error::Error + Send + Sync + 'static + From<CalorieOverflow>;

    /// Persists a new entry and returns it with its assigned id.
    ///
    /// When `entry.created_at` is `None` the store reads `clock` while it holds
    /// its write lock, so automatically stamped instants never decrease in id
    /// order.
    fn insert_entry(
        &self,
        entry: &NewFoodEntry,
        clock: &dyn Clock,
    ) -> Result<FoodEntry, Self::Error>;

    /// Lists every entry, most recent first (ties: higher id first).
    fn list_entries(&self) -> Result<Vec<FoodEntry>, Self::Error>;

    /// Lists entries with `start <= created_at < end`, earliest first
    /// (ties: lower id first). An empty or inverted range yields no entries.
    fn list_entries_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FoodEntry>, Self::Error>;

    /// Sums calories over the same half-open range. Zero when nothing matches.
    ///
    /// Backends that can aggregate natively should override this to avoid
    /// materializing every row.
    fn sum_calories_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, Self::Error> {
        self.list_entries_in_range(start, end)?
            .iter()
            .try_fold(0_i64, |total, entry| total.checked_add(entry.calories.value()))
            .ok_or_else(|| CalorieOverflow.into())
    }
}
