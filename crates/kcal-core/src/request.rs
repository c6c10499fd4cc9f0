//! Typed boundary requests.
//!
//! Transports deserialize into these loose shapes and call `validate` /
//! `resolve` before anything touches the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::day::parse_date;
use crate::entry::NewFoodEntry;
use crate::types::{Calories, FoodName, ValidationError};

/// Request to record a food entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    pub name: String,
    pub calories: i64,
}

impl CreateEntryRequest {
    pub fn new(name: impl Into<String>, calories: i64) -> Self {
        Self {
            name: name.into(),
            calories,
        }
    }

    /// Checks the name is non-empty and calories are non-negative.
    pub fn validate(self) -> Result<NewFoodEntry, ValidationError> {
        let name = FoodName::new(self.name)?;
        let calories = Calories::new(self.calories)?;
        Ok(NewFoodEntry::new(name, calories))
    }
}

/// Query scoped to an optional `YYYY-MM-DD` date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl DateQuery {
    /// Query for today.
    pub const fn today() -> Self {
        Self { date: None }
    }

    pub fn on(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
        }
    }

    /// Parses the date if one was given. `None` means "today" and is resolved
    /// later against the clock.
    pub fn resolve(&self) -> Result<Option<NaiveDate>, ValidationError> {
        self.date.as_deref().map(parse_date).transpose()
    }
}
