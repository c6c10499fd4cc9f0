//! Per-day calorie totals.

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::day::day_boundaries;
use crate::entry::DailyTotal;
use crate::store::EntryStore;

/// Computes [`DailyTotal`]s from a store.
///
/// Owns the "which date" policy: an absent date means the clock's current UTC
/// calendar date.
pub struct Aggregator<'a, S, C> {
    store: &'a S,
    clock: &'a C,
}

impl<'a, S: EntryStore, C: Clock> Aggregator<'a, S, C> {
    pub const fn new(store: &'a S, clock: &'a C) -> Self {
        Self { store, clock }
    }

    /// Returns `date`, or today in UTC when absent.
    pub fn resolve_date(&self, date: Option<NaiveDate>) -> NaiveDate {
        date.unwrap_or_else(|| self.clock.today())
    }

    /// Sums calories for the effective date. A day with no entries totals zero.
    pub fn total_for(&self, date: Option<NaiveDate>) -> Result<DailyTotal, S::Error> {
        let date = self.resolve_date(date);
        let (start, end) = day_boundaries(date);
        let total_calories = self.store.sum_calories_in_range(start, end)?;
        tracing::debug!(%date, total_calories, "computed daily total");
        Ok(DailyTotal {
            date,
            total_calories,
        })
    }
}
