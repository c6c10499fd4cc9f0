//! The ledger service: typed boundary operations over a store and a clock.

use chrono::NaiveDate;
use thiserror::Error;

use crate::aggregate::Aggregator;
use crate::clock::{Clock, SystemClock};
use crate::day::day_boundaries;
use crate::entry::{DailyTotal, DayEntries, FoodEntry};
use crate::request::{CreateEntryRequest, DateQuery};
use crate::store::EntryStore;
use crate::types::ValidationError;

/// Errors surfaced by ledger operations.
///
/// Neither kind is retried here: validation failures are permanent until the
/// caller fixes its input, and retrying storage failures is up to the caller.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The request failed shape or range checks. Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The underlying store failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LedgerError {
    fn storage<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Storage(Box::new(err))
    }

    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Date-scoped food-entry ledger.
///
/// Stateless apart from its store and clock: every call issues one store
/// operation and returns.
pub struct Ledger<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: EntryStore> Ledger<S> {
    /// Creates a ledger that reads the system clock.
    pub const fn with_system_clock(store: S) -> Self {
        Self::new(store, SystemClock)
    }
}

impl<S: EntryStore, C: Clock> Ledger<S, C> {
    pub const fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub const fn aggregator(&self) -> Aggregator<'_, S, C> {
        Aggregator::new(&self.store, &self.clock)
    }

    /// Current UTC calendar date according to the injected clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Validates and records a new entry.
    ///
    /// The store stamps `created_at` from the ledger's clock inside its write.
    pub fn create_entry(&self, request: CreateEntryRequest) -> Result<FoodEntry, LedgerError> {
        let entry = request.validate()?;
        let stored = self
            .store
            .insert_entry(&entry, &self.clock)
            .map_err(LedgerError::storage)?;
        tracing::debug!(
            id = %stored.id,
            name = %stored.name,
            calories = %stored.calories,
            "created food entry"
        );
        Ok(stored)
    }

    /// Every entry, most recent first.
    pub fn list_entries(&self) -> Result<Vec<FoodEntry>, LedgerError> {
        self.store.list_entries().map_err(LedgerError::storage)
    }

    /// Entries recorded on the requested UTC date (default today), earliest first.
    pub fn list_entries_by_date(&self, query: &DateQuery) -> Result<Vec<FoodEntry>, LedgerError> {
        self.entries_for_day(query).map(|day| day.entries)
    }

    /// Like [`Self::list_entries_by_date`], also reporting which date was used.
    pub fn entries_for_day(&self, query: &DateQuery) -> Result<DayEntries, LedgerError> {
        let date = self.aggregator().resolve_date(query.resolve()?);
        let (start, end) = day_boundaries(date);
        let entries = self
            .store
            .list_entries_in_range(start, end)
            .map_err(LedgerError::storage)?;
        tracing::debug!(%date, count = entries.len(), "listed entries by date");
        Ok(DayEntries { date, entries })
    }

    /// Calorie total for the requested UTC date (default today).
    pub fn daily_total(&self, query: &DateQuery) -> Result<DailyTotal, LedgerError> {
        let date = query.resolve()?;
        self.aggregator()
            .total_for(date)
            .map_err(LedgerError::storage)
    }
}
