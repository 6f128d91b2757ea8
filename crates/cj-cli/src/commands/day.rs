//! Day command: the slot timeline and statistics of one date.

use std::io::Write;

use anyhow::Result;
use chrono::{NaiveDate, TimeZone};
use clap::Args;
use cj_core::aggregate::round_to;
use cj_core::{DayData, EnergyLevel, LogEntry, Slot, TagRegistry};

use super::util::{parse_date, progress_bar, tag_labels};
use crate::journal::Journal;

#[derive(Debug, Args)]
pub struct DayArgs {
    /// Day to show.
    #[arg(short, long, default_value = "today")]
    pub date: String,

    /// Include empty slots.
    #[arg(short, long)]
    pub all: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    args: &DayArgs,
    journal: &Journal<Tz>,
    today: NaiveDate,
) -> Result<()> {
    let date = parse_date(&args.date, today)?;
    let entries: Vec<LogEntry> = journal
        .store()
        .entries_for_day(date)
        .into_iter()
        .cloned()
        .collect();
    let day = DayData::new(date, entries);

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&day)?)?;
        return Ok(());
    }

    write!(writer, "{}", format_day(&day, journal.tags(), args.all))?;
    Ok(())
}

/// Renders the human-readable day view.
pub fn format_day(day: &DayData, tags: &TagRegistry, all_slots: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    writeln!(output, "{}", day.date.format("%A, %b %-d, %Y")).unwrap();

    if day.entries.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No entries logged.").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: Run 'cj log <HH:MM> <1-5>' to rate a slot.").unwrap();
        return output;
    }

    writeln!(output).unwrap();
    for slot in Slot::all() {
        let entry = day.entries.iter().find(|entry| entry.slot == slot);
        match entry {
            Some(entry) => writeln!(output, "{}", format_slot_line(entry, tags)).unwrap(),
            None if all_slots => writeln!(output, "{}  ·", slot.range_label()).unwrap(),
            None => {}
        }
    }

    let peaks = day
        .peak_slots()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Slots logged:   {} of {}", day.entries.len(), cj_core::SLOTS_PER_DAY).unwrap();
    writeln!(output, "Average energy: {:.1}", round_to(day.average_energy, 1)).unwrap();
    writeln!(output, "Productivity:   {:.1}", day.total_productivity).unwrap();
    writeln!(output, "Sleep:          {}h", day.sleep_hours()).unwrap();
    if !peaks.is_empty() {
        writeln!(output, "Peak slots:     {}", peaks.join(", ")).unwrap();
    }
    output
}

fn format_slot_line(entry: &LogEntry, tags: &TagRegistry) -> String {
    let label = entry.slot.range_label();
    let Some(level) = entry.energy() else {
        return format!("{label}  sleep");
    };
    let bar = progress_bar(
        f64::from(level.value()),
        f64::from(EnergyLevel::MAX.value()),
        5,
    );
    let mut line = format!("{label}  {bar}  {level} {:<10} ", level.descriptor().label);
    if !entry.tags.is_empty() {
        line.push_str(&tag_labels(tags, &entry.tags));
    }
    line.trim_end().to_string()
}
