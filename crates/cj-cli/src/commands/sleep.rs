//! Sleep command for logging a sleep range.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use clap::Args;
use cj_core::slot::parse_clock;

use super::util::parse_date;
use crate::journal::Journal;

#[derive(Debug, Args)]
pub struct SleepArgs {
    /// Time you fell asleep, HH:MM.
    #[arg(value_parser = parse_clock)]
    pub start: NaiveTime,

    /// Time you woke up, HH:MM. Earlier than the start means the next day.
    #[arg(value_parser = parse_clock)]
    pub end: NaiveTime,

    /// Day the range starts on.
    #[arg(short, long, default_value = "today")]
    pub date: String,
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    args: &SleepArgs,
    journal: &mut Journal<Tz>,
    today: NaiveDate,
) -> Result<()> {
    let date = parse_date(&args.date, today)?;
    let range = journal.log_sleep(date, args.start, args.end)?;

    let tz = journal.tz();
    let start = local_label(tz, range.start_ms);
    let end = local_label(tz, range.end_ms);
    let minutes = (range.end_ms - range.start_ms) / 60_000;
    writeln!(
        writer,
        "Logged {}h {}m of sleep: {start} to {end}",
        minutes / 60,
        minutes % 60
    )?;
    writeln!(
        writer,
        "  {} slots written, {} replaced",
        range.created, range.overwritten
    )?;
    Ok(())
}

fn local_label<Tz: TimeZone>(tz: &Tz, millis: i64) -> String {
    DateTime::from_timestamp_millis(millis).map_or_else(
        || millis.to_string(),
        |dt| dt.with_timezone(tz).naive_local().format("%Y-%m-%d %H:%M").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use cj_core::{EnergyLevel, SlotFields};
    use insta::assert_snapshot;

    use crate::journal::test_support::{date, journal};

    fn args(start: &str, end: &str) -> SleepArgs {
        SleepArgs {
            start: parse_clock(start).unwrap(),
            end: parse_clock(end).unwrap(),
            date: "2024-01-15".to_string(),
        }
    }

    #[test]
    fn overnight_range_replaces_late_entry() {
        let mut journal = journal();
        journal
            .log_slot(
                date("2024-01-15"),
                "23:30".parse().unwrap(),
                SlotFields::energy(EnergyLevel::new(2).unwrap(), Vec::new()),
            )
            .unwrap();

        let mut output = Vec::new();
        run(&mut output, &args("23:00", "07:00"), &mut journal, date("2024-01-15")).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        Logged 8h 0m of sleep: 2024-01-15 23:00 to 2024-01-16 07:00
          16 slots written, 1 replaced
        ");
        assert_eq!(journal.store().len(), 16);
        assert!(journal.store().entries().iter().all(|e| e.is_sleep));
    }

    #[test]
    fn equal_times_cover_a_full_day() {
        let mut journal = journal();
        let mut output = Vec::new();
        run(&mut output, &args("22:00", "22:00"), &mut journal, date("2024-01-15")).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Logged 24h 0m of sleep"));
        assert_eq!(journal.store().len(), 48);
    }
}
