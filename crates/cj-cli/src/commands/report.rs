//! Report command: daily averages and factor impact across recent days.
//!
//! The daily section covers the most recent logged days; factor impact is
//! computed over every entry in the journal.

use std::fmt::Write;

use anyhow::Result;
use chrono::TimeZone;
use clap::Args;
use cj_core::aggregate::{recent, round_to};
use cj_core::{DayData, EnergyLevel, FactorImpact, RECENT_DAYS, factor_correlation, weekly_series};
use serde::Serialize;

use super::util::progress_bar;
use crate::journal::Journal;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Number of most recent logged days to include.
    #[arg(long, default_value_t = RECENT_DAYS)]
    pub days: usize,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub days: Vec<DayData>,
    pub factors: Vec<FactorImpact>,
}

/// Builds the report from the journal.
pub fn generate_report_data<Tz: TimeZone>(journal: &Journal<Tz>, days: usize) -> ReportData {
    let entries = journal.store().entries();
    let series = weekly_series(entries);
    ReportData {
        days: recent(&series, days).to_vec(),
        factors: factor_correlation(entries, journal.tags()),
    }
}

pub fn run<W: std::io::Write, Tz: TimeZone>(
    writer: &mut W,
    args: &ReportArgs,
    journal: &Journal<Tz>,
) -> Result<()> {
    let data = generate_report_data(journal, args.days);
    if args.json {
        let report = JsonReport::from(&data);
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(writer, "{}", format_report(&data))?;
    }
    Ok(())
}

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();
    let count = data.days.len();
    let day_word = if count == 1 { "day" } else { "days" };
    writeln!(output, "ENERGY REPORT: last {count} logged {day_word}").unwrap();

    if data.days.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "Not enough data yet.").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: Log a few days with 'cj log' or 'cj now'.").unwrap();
        return output;
    }

    let max_energy = f64::from(EnergyLevel::MAX.value());
    writeln!(output).unwrap();
    writeln!(output, "DAILY").unwrap();
    writeln!(output, "─────").unwrap();
    for day in &data.days {
        let average = round_to(day.average_energy, 1);
        writeln!(
            output,
            "{}  avg {average:.1} {}  productivity {:>5.1}  sleep {:>4.1}h",
            day.date.format("%m/%d"),
            progress_bar(average, max_energy, 10),
            day.total_productivity,
            day.sleep_hours(),
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "FACTORS").unwrap();
    writeln!(output, "───────").unwrap();
    if data.factors.is_empty() {
        writeln!(output, "(no tagged entries)").unwrap();
    }
    for factor in &data.factors {
        let slots = if factor.count == 1 { "slot" } else { "slots" };
        writeln!(
            output,
            "{:<14}{:.2} vs baseline {:.2} ({:+.2})  {} {slots}",
            factor.label,
            round_to(factor.average_energy, 2),
            round_to(factor.baseline, 2),
            round_to(factor.delta(), 2),
            factor.count,
        )
        .unwrap();
    }

    let total_productivity: f64 = data.days.iter().map(|day| day.total_productivity).sum();
    let logged: Vec<f64> = data
        .days
        .iter()
        .map(|day| day.average_energy)
        .filter(|average| *average > 0.0)
        .collect();
    let overall = if logged.is_empty() {
        0.0
    } else {
        logged.iter().sum::<f64>() / f64::from(u32::try_from(logged.len()).unwrap_or(u32::MAX))
    };
    let best = data
        .days
        .iter()
        .max_by(|a, b| a.total_productivity.total_cmp(&b.total_productivity));

    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Average energy:     {overall:.1}").unwrap();
    writeln!(output, "Total productivity: {total_productivity:.1}").unwrap();
    if let Some(best) = best {
        writeln!(
            output,
            "Most productive:    {} ({:.1})",
            best.date, best.total_productivity
        )
        .unwrap();
    }
    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub days: Vec<JsonDay>,
    pub factors: Vec<JsonFactor>,
}

#[derive(Debug, Serialize)]
pub struct JsonDay {
    pub date: String,
    pub average_energy: f64,
    pub total_productivity: f64,
    pub sleep_hours: f64,
    pub entries: usize,
}

#[derive(Debug, Serialize)]
pub struct JsonFactor {
    pub tag_id: String,
    pub label: String,
    pub color: String,
    pub average_energy: f64,
    pub baseline: f64,
    pub count: usize,
}

impl From<&ReportData> for JsonReport {
    fn from(data: &ReportData) -> Self {
        Self {
            days: data
                .days
                .iter()
                .map(|day| JsonDay {
                    date: day.date.to_string(),
                    average_energy: round_to(day.average_energy, 1),
                    total_productivity: day.total_productivity,
                    sleep_hours: day.sleep_hours(),
                    entries: day.entries.len(),
                })
                .collect(),
            factors: data
                .factors
                .iter()
                .map(|factor| JsonFactor {
                    tag_id: factor.tag_id.to_string(),
                    label: factor.label.clone(),
                    color: factor.color.clone(),
                    average_energy: round_to(factor.average_energy, 2),
                    baseline: round_to(factor.baseline, 2),
                    count: factor.count,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use cj_core::{SlotFields, TagId};
    use insta::assert_snapshot;

    use crate::journal::Journal;
    use crate::journal::test_support::{date, journal};

    fn energy(value: i64, tags: &[&str]) -> SlotFields {
        SlotFields::energy(
            EnergyLevel::new(value).unwrap(),
            tags.iter().map(|t| TagId::new(*t).unwrap()).collect(),
        )
    }

    fn seeded() -> Journal<chrono::Utc> {
        let mut journal = journal();
        let d1 = date("2024-01-14");
        let d2 = date("2024-01-15");
        journal.log_slot(d1, "08:00".parse().unwrap(), energy(5, &["caffeine"])).unwrap();
        journal.log_slot(d1, "09:00".parse().unwrap(), energy(3, &[])).unwrap();
        journal.log_slot(d2, "08:00".parse().unwrap(), energy(4, &["caffeine"])).unwrap();
        journal.log_slot(d2, "15:00".parse().unwrap(), energy(2, &[])).unwrap();
        journal
            .log_sleep(d1, "23:00".parse().unwrap(), "06:00".parse().unwrap())
            .unwrap();
        journal
    }

    #[test]
    fn report_lists_days_and_factors() {
        let journal = seeded();
        let mut output = Vec::new();
        let args = ReportArgs {
            days: RECENT_DAYS,
            json: false,
        };
        run(&mut output, &args, &journal).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        ENERGY REPORT: last 2 logged days

        DAILY
        ─────
        01/14  avg 4.0 ████████░░  productivity   4.0  sleep  1.0h
        01/15  avg 3.0 ██████░░░░  productivity   3.0  sleep  6.0h

        FACTORS
        ───────
        Caffeine      4.50 vs baseline 2.50 (+2.00)  2 slots

        SUMMARY
        ───────
        Average energy:     3.5
        Total productivity: 7.0
        Most productive:    2024-01-14 (4.0)
        ");
    }

    #[test]
    fn days_flag_limits_series() {
        let journal = seeded();
        let data = generate_report_data(&journal, 1);
        assert_eq!(data.days.len(), 1);
        assert_eq!(data.days[0].date, date("2024-01-15"));
    }

    #[test]
    fn empty_journal_shows_hint() {
        let journal = journal();
        let text = format_report(&generate_report_data(&journal, RECENT_DAYS));
        assert_snapshot!(text, @r"
        ENERGY REPORT: last 0 logged days

        Not enough data yet.

        Hint: Log a few days with 'cj log' or 'cj now'.
        ");
    }

    #[test]
    fn json_report_rounds_values() {
        let journal = seeded();
        let mut output = Vec::new();
        let args = ReportArgs {
            days: RECENT_DAYS,
            json: true,
        };
        run(&mut output, &args, &journal).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["days"].as_array().unwrap().len(), 2);
        assert_eq!(value["days"][1]["sleep_hours"], 6.0);
        assert_eq!(value["factors"][0]["tag_id"], "caffeine");
        assert_eq!(value["factors"][0]["baseline"], 2.5);
    }
}
