//! Export command for writing all entries as CSV.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone};
use clap::Args;
use cj_core::export::{default_file_name, write_csv};

use crate::journal::Journal;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// File or directory to write to. Defaults to stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    args: &ExportArgs,
    journal: &Journal<Tz>,
    today: NaiveDate,
) -> Result<()> {
    let entries = journal.store().entries();
    let Some(output) = &args.output else {
        write_csv(writer, entries, journal.tags()).context("failed to write CSV")?;
        return Ok(());
    };

    let path = if output.is_dir() {
        output.join(default_file_name(today))
    } else {
        output.clone()
    };
    let file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut file = BufWriter::new(file);
    let rows = write_csv(&mut file, entries, journal.tags())
        .and_then(|rows| file.flush().map(|()| rows))
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::debug!(path = %path.display(), rows, "exported entries");
    writeln!(writer, "Exported {rows} entries to {}", path.display())?;
    Ok(())
}
