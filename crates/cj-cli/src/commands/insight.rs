//! Insight command: an AI-written analysis of recent days.
//!
//! The insight is tied to the date it was requested for. A cached insight is
//! shown again until an entry on or before that date changes; `--refresh`
//! always asks again. Failures never abort the command; a fixed message is shown instead
//! and nothing is cached.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone};
use clap::Args;
use cj_core::{Completion, DayData, LogEntry, weekly_series};
use cj_llm::InsightText;

use super::util::parse_date;
use crate::Config;
use crate::journal::Journal;

#[derive(Debug, Args)]
pub struct InsightArgs {
    /// Day to analyze, along with the days before it.
    #[arg(short, long, default_value = "today")]
    pub date: String,

    /// Ignore a cached insight and generate a new one.
    #[arg(long)]
    pub refresh: bool,
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    args: &InsightArgs,
    journal: &mut Journal<Tz>,
    config: &Config,
    today: NaiveDate,
) -> Result<()> {
    let date = parse_date(&args.date, today)?;
    if let Some(cached) = journal.view_insight(date) {
        if !args.refresh {
            writeln!(writer, "Insight for {date} (cached)")?;
            writeln!(writer)?;
            writeln!(writer, "{}", cached.text)?;
            return Ok(());
        }
    }

    let series = series_through(journal.store().entries(), date);
    let ticket = journal.begin_insight();
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let text = runtime.block_on(cj_llm::generate_insight_or_fallback(
        config.api_key(),
        &config.model,
        &series,
    ));

    finish(writer, journal, ticket, text)
}

/// Daily series up to and including `date`.
fn series_through(entries: &[LogEntry], date: NaiveDate) -> Vec<DayData> {
    let mut series = weekly_series(entries);
    series.retain(|day| day.date <= date);
    series
}

fn finish<W: Write, Tz: TimeZone>(
    writer: &mut W,
    journal: &mut Journal<Tz>,
    ticket: cj_core::InsightTicket,
    text: InsightText,
) -> Result<()> {
    let date = ticket.date();
    let InsightText::Generated(text) = text else {
        writeln!(writer, "{}", text.as_str())?;
        return Ok(());
    };

    match journal.complete_insight(ticket, text)? {
        Completion::Accepted => {
            if let Some(insight) = journal.insight() {
                writeln!(writer, "Insight for {date}")?;
                writeln!(writer)?;
                writeln!(writer, "{}", insight.text)?;
            }
        }
        Completion::Stale => {
            writeln!(writer, "Discarded an insight for {date}; the journal moved on.")?;
        }
    }
    Ok(())
}
