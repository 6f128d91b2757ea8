//! Status command for showing journal contents and configuration.

use std::io::Write;

use anyhow::Result;
use chrono::TimeZone;
use cj_db::Key;

use crate::Config;
use crate::journal::Journal;

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    journal: &Journal<Tz>,
    config: &Config,
) -> Result<()> {
    let entries = journal.store().entries();
    let preferences = journal.preferences();

    writeln!(writer, "Circadian journal status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;

    if entries.is_empty() {
        writeln!(writer, "No entries recorded.")?;
    } else {
        let first = entries.iter().map(|entry| entry.date).min();
        let last = entries.iter().map(|entry| entry.date).max();
        let sleep = entries.iter().filter(|entry| entry.is_sleep).count();
        writeln!(writer, "Entries: {} ({sleep} sleep)", entries.len())?;
        if let (Some(first), Some(last)) = (first, last) {
            writeln!(writer, "Range: {first} to {last}")?;
        }
        if let Some(updated) = journal.database().updated_at(Key::Entries)? {
            writeln!(writer, "Last change: {updated}")?;
        }
    }

    writeln!(writer, "Tags: {}", journal.tags().len())?;
    writeln!(
        writer,
        "Theme: {} ({})",
        preferences.theme().name,
        if preferences.dark_mode { "dark" } else { "light" }
    )?;
    writeln!(
        writer,
        "Insights: {} ({})",
        if config.api_key().is_some() { "configured" } else { "not configured" },
        config.model
    )?;
    Ok(())
}
