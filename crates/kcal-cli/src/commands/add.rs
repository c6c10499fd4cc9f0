//! Add command for recording a food entry.

use std::io::Write;

use anyhow::Result;
use kcal_core::{Clock, CreateEntryRequest, EntryStore, Ledger};

use super::util::{format_instant, write_json};

/// Records `name` with `calories` and prints the stored entry.
pub fn run<W: Write, S: EntryStore, C: Clock>(
    writer: &mut W,
    ledger: &Ledger<S, C>,
    name: &str,
    calories: i64,
    json: bool,
) -> Result<()> {
    let entry = ledger.create_entry(CreateEntryRequest::new(name, calories))?;

    if json {
        return write_json(writer, &entry);
    }

    writeln!(
        writer,
        "Recorded #{} {}: {} kcal at {} UTC",
        entry.id,
        entry.name,
        entry.calories,
        format_instant(entry.created_at)
    )?;
    Ok(())
}
