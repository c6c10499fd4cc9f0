//! Total command printing one UTC day's calorie total.

use std::io::Write;

use anyhow::Result;
use kcal_core::{Clock, DateQuery, EntryStore, Ledger};

use super::util::write_json;

pub fn run<W: Write, S: EntryStore, C: Clock>(
    writer: &mut W,
    ledger: &Ledger<S, C>,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let total = ledger.daily_total(&DateQuery { date })?;

    if json {
        return write_json(writer, &total);
    }

    writeln!(writer, "{}: {} kcal", total.date, total.total_calories)?;
    Ok(())
}
