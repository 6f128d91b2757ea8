//! Reset command for wiping one day.

use std::io::Write;

use anyhow::Result;
use chrono::{NaiveDate, TimeZone};
use clap::Args;

use super::util::parse_date;
use crate::journal::Journal;

#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Day to clear.
    #[arg(short, long, default_value = "today")]
    pub date: String,
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    args: &ResetArgs,
    journal: &mut Journal<Tz>,
    today: NaiveDate,
) -> Result<()> {
    let date = parse_date(&args.date, today)?;
    let removed = journal.reset_day(date)?;
    writeln!(writer, "Removed {removed} entries from {date}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use cj_core::SlotFields;
    use insta::assert_snapshot;

    use crate::journal::test_support::{date, journal};

    #[test]
    fn reset_leaves_other_days() {
        let mut journal = journal();
        journal
            .log_sleep(date("2024-01-15"), "23:00".parse().unwrap(), "01:00".parse().unwrap())
            .unwrap();
        journal
            .log_slot(date("2024-01-15"), "12:00".parse().unwrap(), SlotFields::sleep())
            .unwrap();

        let mut output = Vec::new();
        let args = ResetArgs {
            date: "today".to_string(),
        };
        run(&mut output, &args, &mut journal, date("2024-01-15")).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @"Removed 3 entries from 2024-01-15");
        assert_eq!(journal.store().len(), 2);
        assert!(journal.store().entries().iter().all(|e| e.date == date("2024-01-16")));
    }
}
