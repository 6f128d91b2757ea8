//! Now command: rate the slot that contains the current time.

use std::io::Write;

use anyhow::Result;
use chrono::{NaiveDateTime, TimeZone};
use clap::Args;
use cj_core::{EnergyLevel, Slot, SlotFields};

use super::log::describe_entry;
use super::util::resolve_tags;
use crate::journal::Journal;

#[derive(Debug, Args)]
pub struct NowArgs {
    /// Energy level from 1 (exhausted) to 5 (peak).
    pub energy: EnergyLevel,

    /// Factor tag by ID or label. Repeat for several.
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    args: &NowArgs,
    journal: &mut Journal<Tz>,
    now: NaiveDateTime,
) -> Result<()> {
    let slot = Slot::containing(now.time());
    let tags = resolve_tags(journal.tags(), &args.tags)?;
    let entry = journal.log_slot(now.date(), slot, SlotFields::energy(args.energy, tags))?;
    writeln!(writer, "{}", describe_entry(&entry, journal.tags()))?;
    Ok(())
}
