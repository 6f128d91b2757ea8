//! Delete command for clearing a single slot.

use std::io::Write;

use anyhow::Result;
use chrono::{NaiveDate, TimeZone};
use clap::Args;
use cj_core::Slot;

use super::util::parse_date;
use crate::journal::Journal;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Slot start time, HH:00 or HH:30.
    pub slot: Slot,

    /// Day the slot belongs to.
    #[arg(short, long, default_value = "today")]
    pub date: String,
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    args: &DeleteArgs,
    journal: &mut Journal<Tz>,
    today: NaiveDate,
) -> Result<()> {
    let date = parse_date(&args.date, today)?;
    if journal.delete_slot(date, args.slot)?.is_some() {
        writeln!(writer, "Cleared {} on {date}", args.slot.range_label())?;
    } else {
        writeln!(writer, "No entry at {} on {date}", args.slot)?;
    }
    Ok(())
}
