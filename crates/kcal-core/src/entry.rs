//! Food entries and the daily total derived from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Calories, EntryId, FoodName};

/// A recorded food-consumption event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodEntry {
    /// Store-assigned identifier.
    pub id: EntryId,
    /// What was eaten, exactly as entered.
    pub name: FoodName,
    /// Calorie count, never negative.
    pub calories: Calories,
    /// When the entry was recorded. Immutable once stored.
    pub created_at: DateTime<Utc>,
}

/// A validated entry ready to be inserted.
///
/// `created_at` is normally stamped by the ledger from its clock. When left
/// as `None` the store assigns the insertion instant itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFoodEntry {
    pub name: FoodName,
    pub calories: Calories,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewFoodEntry {
    pub const fn new(name: FoodName, calories: Calories) -> Self {
        Self {
            name,
            calories,
            created_at: None,
        }
    }

    /// Pins the entry to a specific instant.
    #[must_use]
    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Entries recorded on one UTC calendar day, earliest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntries {
    /// The effective date, after defaulting to today.
    pub date: NaiveDate,
    pub entries: Vec<FoodEntry>,
}

/// Calories summed over one UTC calendar day. Computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_calories: i64,
}
