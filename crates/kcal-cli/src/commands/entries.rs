//! Entries command listing one UTC day's entries, earliest first.

use std::io::Write;

use anyhow::Result;
use kcal_core::{Clock, DateQuery, DayEntries, EntryStore, Ledger};

use super::util::{entry_count, format_time_of_day, write_json};

pub fn run<W: Write, S: EntryStore, C: Clock>(
    writer: &mut W,
    ledger: &Ledger<S, C>,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let DayEntries { date, entries } = ledger.entries_for_day(&DateQuery { date })?;

    if json {
        return write_json(writer, &entries);
    }

    writeln!(writer, "Entries for {date} (UTC)")?;
    writeln!(writer)?;

    if entries.is_empty() {
        writeln!(writer, "No entries recorded on this day.")?;
        return Ok(());
    }

    writeln!(writer, "{:<5}  {:>8}  Name", "Time", "Calories")?;
    for entry in &entries {
        writeln!(
            writer,
            "{:<5}  {:>8}  {}",
            format_time_of_day(entry.created_at),
            entry.calories.value(),
            entry.name
        )?;
    }
    writeln!(writer)?;
    writeln!(writer, "{}", entry_count(entries.len()))?;
    Ok(())
}
