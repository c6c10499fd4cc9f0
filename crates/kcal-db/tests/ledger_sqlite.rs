//! Ledger behavior over the `SQLite` store.
//!
//! Drives `kcal_core::Ledger` end to end against real databases, both
//! in-memory and on disk.

use std::collections::HashSet;
use std::thread;

use chrono::{DateTime, Utc};
use kcal_core::{
    Calories, CreateEntryRequest, DateQuery, FixedClock, FoodEntry, FoodName, Ledger, LedgerError,
    NewFoodEntry, SystemClock, ValidationError,
};
use kcal_db::Database;
use tempfile::TempDir;

fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn ledger_at(now: &str) -> Ledger<Database, FixedClock> {
    Ledger::new(Database::open_in_memory().unwrap(), FixedClock::new(ts(now)))
}

/// Inserts a fixture entry with an explicit timestamp, bypassing the clock.
fn seed(ledger: &Ledger<Database, FixedClock>, name: &str, calories: i64, at: &str) -> FoodEntry {
    let entry = NewFoodEntry::new(FoodName::new(name).unwrap(), Calories::new(calories).unwrap())
        .at(ts(at));
    ledger.store().insert_entry(&entry).unwrap()
}

fn names(entries: &[FoodEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn daily_total_for_three_meals() {
    let ledger = ledger_at("2024-01-20T00:00:00Z");
    seed(&ledger, "Breakfast", 350, "2024-01-15T08:00:00Z");
    seed(&ledger, "Lunch", 600, "2024-01-15T12:30:00Z");
    seed(&ledger, "Dinner", 750, "2024-01-15T19:00:00Z");

    let total = ledger.daily_total(&DateQuery::on("2024-01-15")).unwrap();
    assert_eq!(
        serde_json::to_value(total).unwrap(),
        serde_json::json!({"date": "2024-01-15", "total_calories": 1700})
    );
}

#[test]
fn entries_split_at_utc_midnight() {
    let ledger = ledger_at("2024-01-20T00:00:00Z");
    seed(&ledger, "Late Snack", 100, "2024-01-15T23:59:59.999Z");
    seed(&ledger, "Early Breakfast", 250, "2024-01-16T00:01:00Z");

    let jan15 = ledger
        .list_entries_by_date(&DateQuery::on("2024-01-15"))
        .unwrap();
    let jan16 = ledger
        .list_entries_by_date(&DateQuery::on("2024-01-16"))
        .unwrap();
    assert_eq!(names(&jan15), ["Late Snack"]);
    assert_eq!(names(&jan16), ["Early Breakfast"]);
}

#[test]
fn entry_at_exact_midnight_belongs_to_that_day() {
    let ledger = ledger_at("2024-01-20T00:00:00Z");
    seed(&ledger, "Midnight Toast", 120, "2024-01-15T00:00:00.000Z");

    assert!(
        ledger
            .list_entries_by_date(&DateQuery::on("2024-01-14"))
            .unwrap()
            .is_empty()
    );
    let total = ledger.daily_total(&DateQuery::on("2024-01-15")).unwrap();
    assert_eq!(total.total_calories, 120);
}

#[test]
fn entries_by_date_are_chronological() {
    let ledger = ledger_at("2024-01-20T00:00:00Z");
    seed(&ledger, "Dinner", 600, "2024-01-15T20:15:00Z");
    seed(&ledger, "Breakfast", 300, "2024-01-15T08:00:00Z");
    seed(&ledger, "Lunch", 450, "2024-01-15T14:30:00Z");

    let entries = ledger
        .list_entries_by_date(&DateQuery::on("2024-01-15"))
        .unwrap();
    assert_eq!(names(&entries), ["Breakfast", "Lunch", "Dinner"]);
    assert!(
        entries
            .windows(2)
            .all(|pair| pair[0].created_at < pair[1].created_at)
    );
}

#[test]
fn list_entries_is_most_recent_first() {
    let db = Database::open_in_memory().unwrap();
    let ledger = Ledger::new(db, FixedClock::new(ts("2024-01-15T08:00:00Z")));
    ledger.create_entry(CreateEntryRequest::new("A", 100)).unwrap();
    let ledger = Ledger::new(
        ledger.into_store(),
        FixedClock::new(ts("2024-01-15T08:00:01Z")),
    );
    ledger.create_entry(CreateEntryRequest::new("B", 200)).unwrap();
    let ledger = Ledger::new(
        ledger.into_store(),
        FixedClock::new(ts("2024-01-15T08:00:02Z")),
    );
    ledger.create_entry(CreateEntryRequest::new("C", 300)).unwrap();

    let entries = ledger.list_entries().unwrap();
    assert_eq!(names(&entries), ["C", "B", "A"]);
}

#[test]
fn total_without_date_uses_clock_today() {
    let ledger = ledger_at("2024-01-15T18:00:00Z");
    let created = ledger
        .create_entry(CreateEntryRequest::new("Today Meal", 450))
        .unwrap();
    seed(&ledger, "Yesterday Meal", 200, "2024-01-14T18:00:00Z");

    assert_eq!(created.created_at, ts("2024-01-15T18:00:00Z"));

    let defaulted = ledger.daily_total(&DateQuery::today()).unwrap();
    let explicit = ledger.daily_total(&DateQuery::on("2024-01-15")).unwrap();
    assert_eq!(defaulted, explicit);
    assert_eq!(defaulted.total_calories, 450);

    let today = ledger.list_entries_by_date(&DateQuery::today()).unwrap();
    assert_eq!(names(&today), ["Today Meal"]);
}

#[test]
fn total_matches_listed_entries_for_every_day() {
    let ledger = ledger_at("2024-01-20T00:00:00Z");
    seed(&ledger, "Apple", 95, "2024-01-15T10:30:00Z");
    seed(&ledger, "Banana", 105, "2024-01-15T10:30:00Z");
    seed(&ledger, "Orange", 85, "2024-01-14T15:45:00Z");
    seed(&ledger, "Water", 0, "2024-01-16T00:00:00Z");

    for day in ["2024-01-13", "2024-01-14", "2024-01-15", "2024-01-16"] {
        let query = DateQuery::on(day);
        let listed: i64 = ledger
            .list_entries_by_date(&query)
            .unwrap()
            .iter()
            .map(|e| e.calories.value())
            .sum();
        let total = ledger.daily_total(&query).unwrap();
        assert_eq!(total.total_calories, listed, "{day}");
    }
}

#[test]
fn rejected_requests_write_nothing() {
    let ledger = ledger_at("2024-01-15T08:00:00Z");

    let err = ledger
        .create_entry(CreateEntryRequest::new("Apple", -95))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::NegativeCalories { value: -95 })
    ));
    let err = ledger
        .create_entry(CreateEntryRequest::new("", 95))
        .unwrap_err();
    assert!(err.is_validation());

    assert_eq!(ledger.store().count_entries().unwrap(), 0);
}

#[test]
fn empty_ledger_returns_empty_results() {
    let ledger = ledger_at("2024-01-01T12:00:00Z");

    assert!(ledger.list_entries().unwrap().is_empty());
    assert!(
        ledger
            .list_entries_by_date(&DateQuery::on("2024-01-01"))
            .unwrap()
            .is_empty()
    );
    let total = ledger.daily_total(&DateQuery::on("2024-01-01")).unwrap();
    assert_eq!(total.total_calories, 0);
}

#[test]
fn entries_survive_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("kcal.db");

    let created = {
        let ledger = Ledger::with_system_clock(Database::open(&path).unwrap());
        ledger
            .create_entry(CreateEntryRequest::new("Pizza Slice", 285))
            .unwrap()
    };

    let ledger = Ledger::new(Database::open(&path).unwrap(), SystemClock);
    let entries = ledger.list_entries().unwrap();
    assert_eq!(entries, vec![created]);
}

#[test]
fn concurrent_writers_get_unique_ids() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 25;

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("kcal.db");
    // Create the schema once before the writers race.
    drop(Database::open(&path).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let path = path.clone();
            thread::spawn(move || {
                let ledger = Ledger::with_system_clock(Database::open(&path).unwrap());
                (0..PER_THREAD)
                    .map(|i| {
                        let name = format!("worker-{t}-{i}");
                        ledger
                            .create_entry(CreateEntryRequest::new(name, 10))
                            .unwrap()
                            .id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let thread_ids = handle.join().unwrap();
        // Each writer sees its own ids strictly increase.
        assert!(thread_ids.windows(2).all(|pair| pair[0] < pair[1]));
        ids.extend(thread_ids);
    }
    assert_eq!(ids.len(), THREADS * PER_THREAD);

    let db = Database::open(&path).unwrap();
    assert_eq!(
        db.count_entries().unwrap(),
        i64::try_from(THREADS * PER_THREAD).unwrap()
    );

    // Stamps are taken under the write lock, so id order is also time order.
    let mut entries = db.list_entries().unwrap();
    entries.sort_by_key(|e| e.id);
    assert!(
        entries
            .windows(2)
            .all(|pair| pair[0].created_at <= pair[1].created_at)
    );
}

#[test]
fn last_calendar_day_is_listed_and_totaled() {
    let ledger = ledger_at("2024-01-20T00:00:00Z");
    seed(&ledger, "Final Meal", 800, "9999-12-31T12:00:00Z");
    seed(&ledger, "Midnight Bite", 50, "9999-12-31T23:59:59.999Z");

    let entries = ledger
        .list_entries_by_date(&DateQuery::on("9999-12-31"))
        .unwrap();
    assert_eq!(names(&entries), ["Final Meal", "Midnight Bite"]);

    let total = ledger.daily_total(&DateQuery::on("9999-12-31")).unwrap();
    assert_eq!(total.total_calories, 850);
}
