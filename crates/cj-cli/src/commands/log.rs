//! Log command for rating a slot or marking it as sleep.

use std::io::Write;

use anyhow::Result;
use chrono::{NaiveDate, TimeZone};
use clap::Args;
use cj_core::{EnergyLevel, LogEntry, Slot, SlotFields, TagRegistry};

use super::util::{parse_date, resolve_tags, tag_labels};
use crate::journal::Journal;

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Slot start time, HH:00 or HH:30.
    pub slot: Slot,

    /// Energy level from 1 (exhausted) to 5 (peak).
    #[arg(required_unless_present = "sleep")]
    pub energy: Option<EnergyLevel>,

    /// Mark the slot as sleep instead of rating it.
    #[arg(long, conflicts_with_all = ["energy", "tags"])]
    pub sleep: bool,

    /// Factor tag by ID or label. Repeat for several.
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Day to log on.
    #[arg(short, long, default_value = "today")]
    pub date: String,
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    args: &LogArgs,
    journal: &mut Journal<Tz>,
    today: NaiveDate,
) -> Result<()> {
    let date = parse_date(&args.date, today)?;
    let fields = match args.energy {
        Some(level) if !args.sleep => {
            SlotFields::energy(level, resolve_tags(journal.tags(), &args.tags)?)
        }
        _ => SlotFields::sleep(),
    };
    let entry = journal.log_slot(date, args.slot, fields)?;
    writeln!(writer, "{}", describe_entry(&entry, journal.tags()))?;
    Ok(())
}

/// One-line summary of a freshly written entry.
pub(crate) fn describe_entry(entry: &LogEntry, tags: &TagRegistry) -> String {
    let what = match entry.energy() {
        Some(level) => {
            let mut text = format!("{level} ({})", level.descriptor().label);
            if !entry.tags.is_empty() {
                text.push_str(&format!(" [{}]", tag_labels(tags, &entry.tags)));
            }
            text
        }
        None => "sleep".to_string(),
    };
    format!(
        "Logged {} on {}: {what}",
        entry.slot.range_label(),
        entry.date
    )
}
