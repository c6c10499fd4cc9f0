//! Status command for showing database location and ledger health.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use kcal_core::Clock;
use kcal_db::Database;

use super::util::format_instant;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    database_path: &Path,
    clock: &impl Clock,
) -> Result<()> {
    let count = db.count_entries()?;

    writeln!(writer, "Calorie ledger status")?;
    writeln!(writer, "Database: {}", database_path.display())?;
    writeln!(writer, "Entries:  {count}")?;

    match db.latest_entry()? {
        Some(latest) => writeln!(
            writer,
            "Latest:   #{} {} ({} kcal) at {} UTC",
            latest.id,
            latest.name,
            latest.calories,
            format_instant(latest.created_at)
        )?,
        None => writeln!(writer, "Latest:   none")?,
    }

    writeln!(writer, "Now:      {} UTC", format_instant(clock.now()))?;
    Ok(())
}
