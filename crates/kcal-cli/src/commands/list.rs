//! List command showing every entry, most recent first.

use std::io::Write;

use anyhow::Result;
use kcal_core::{Clock, EntryStore, FoodEntry, Ledger};

use super::util::{entry_count, format_instant, write_json};

pub fn run<W: Write, S: EntryStore, C: Clock>(
    writer: &mut W,
    ledger: &Ledger<S, C>,
    json: bool,
) -> Result<()> {
    let entries = ledger.list_entries()?;

    if json {
        return write_json(writer, &entries);
    }

    if entries.is_empty() {
        writeln!(writer, "No entries recorded.")?;
        return Ok(());
    }

    write_table(writer, &entries)?;
    writeln!(writer)?;
    writeln!(writer, "{}", entry_count(entries.len()))?;
    Ok(())
}

fn write_table<W: Write>(writer: &mut W, entries: &[FoodEntry]) -> Result<()> {
    writeln!(
        writer,
        "{:<5} {:<16}  {:>8}  Name",
        "ID", "Recorded (UTC)", "Calories"
    )?;
    for entry in entries {
        writeln!(
            writer,
            "{:<5} {:<16}  {:>8}  {}",
            format!("#{}", entry.id),
            format_instant(entry.created_at),
            entry.calories.value(),
            entry.name
        )?;
    }
    Ok(())
}
