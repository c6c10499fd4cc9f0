//! Core domain logic for the calorie ledger.
//!
//! This crate contains the fundamental types and logic for:
//! - Entries: validated food entries and the daily total derived from them
//! - Day boundaries: mapping a UTC calendar date to a half-open instant range
//! - Aggregation: per-day calorie totals with default-to-today policy
//! - The ledger service: typed boundary operations over an [`EntryStore`]

mod aggregate;
pub mod clock;
pub mod day;
mod entry;
mod ledger;
mod request;
mod store;
pub mod types;

pub use aggregate::Aggregator;
pub use clock::{Clock, FixedClock, SystemClock};
pub use entry::{DailyTotal, DayEntries, FoodEntry, NewFoodEntry};
pub use ledger::{Ledger, LedgerError};
pub use request::{CreateEntryRequest, DateQuery};
pub use store::{CalorieOverflow, EntryStore};
pub use types::{Calories, EntryId, FoodName, ValidationError};
