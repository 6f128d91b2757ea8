//! Daily and weekly statistics derived from raw entries.
//!
//! Everything here is a pure function of its inputs and is recomputed on
//! every call. Nothing is cached.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::entry::LogEntry;
use crate::slot::Slot;
use crate::tags::TagRegistry;
use crate::types::{EnergyLevel, TagId};

/// Productivity points earned per energy point in one half-hour slot.
const PRODUCTIVITY_PER_LEVEL: f64 = 0.5;

/// Number of trailing days shown in charts and sent for insights.
pub const RECENT_DAYS: usize = 7;

/// Statistics for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayData {
    #[serde(rename = "dateStr")]
    pub date: NaiveDate,
    pub entries: Vec<LogEntry>,
    pub total_productivity: f64,
    pub average_energy: f64,
}

impl DayData {
    /// Builds the day summary for entries already filtered to `date`.
    pub fn new(date: NaiveDate, entries: Vec<LogEntry>) -> Self {
        let total_productivity = daily_productivity(&entries);
        let average_energy = average_energy(&entries);
        Self {
            date,
            entries,
            total_productivity,
            average_energy,
        }
    }

    pub fn sleep_hours(&self) -> f64 {
        sleep_hours(&self.entries)
    }

    pub fn peak_slots(&self) -> Vec<Slot> {
        peak_slots(&self.entries)
    }
}

/// Sum of `energy * 0.5` over awake entries.
pub fn daily_productivity<'a, I>(entries: I) -> f64
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    entries
        .into_iter()
        .filter_map(LogEntry::energy)
        .map(|level| f64::from(level.value()) * PRODUCTIVITY_PER_LEVEL)
        .sum()
}

/// Mean energy over awake entries, or 0 when there are none.
pub fn average_energy<'a, I>(entries: I) -> f64
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    mean(entries.into_iter().filter_map(LogEntry::energy))
}

/// Hours of sleep, counting each sleep entry as half an hour.
pub fn sleep_hours<'a, I>(entries: I) -> f64
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let slots = entries.into_iter().filter(|entry| entry.is_sleep).count();
    count_as_f64(slots) / 2.0
}

/// Awake slots rated at peak energy, in slot order.
pub fn peak_slots<'a, I>(entries: I) -> Vec<Slot>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut slots: Vec<Slot> = entries
        .into_iter()
        .filter(|entry| {
            entry
                .energy()
                .is_some_and(|level| level >= EnergyLevel::PEAK_THRESHOLD)
        })
        .map(|entry| entry.slot)
        .collect();
    slots.sort_unstable();
    slots
}

/// One [`DayData`] per distinct date, oldest first.
pub fn weekly_series(entries: &[LogEntry]) -> Vec<DayData> {
    let mut by_date: BTreeMap<NaiveDate, Vec<LogEntry>> = BTreeMap::new();
    for entry in entries {
        by_date.entry(entry.date).or_default().push(entry.clone());
    }
    by_date
        .into_iter()
        .map(|(date, entries)| DayData::new(date, entries))
        .collect()
}

/// The last `days` items of a series.
pub fn recent(series: &[DayData], days: usize) -> &[DayData] {
    &series[series.len().saturating_sub(days)..]
}

/// Average energy with a tag present, compared against untagged entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorImpact {
    pub tag_id: TagId,
    pub label: String,
    pub color: String,
    pub average_energy: f64,
    pub baseline: f64,
    pub count: usize,
}

impl FactorImpact {
    /// Difference between the tagged average and the baseline.
    pub fn delta(&self) -> f64 {
        self.average_energy - self.baseline
    }
}

/// Per-tag average energy versus the untagged baseline.
///
/// Only awake entries count. The baseline is the mean energy of awake
/// entries with no tags at all. Tags that no awake entry carries are left
/// out. Output follows registry order.
pub fn factor_correlation(entries: &[LogEntry], tags: &TagRegistry) -> Vec<FactorImpact> {
    let baseline = mean(
        entries
            .iter()
            .filter(|entry| entry.tags.is_empty())
            .filter_map(LogEntry::energy),
    );

    tags.iter()
        .filter_map(|tag| {
            let levels: Vec<EnergyLevel> = entries
                .iter()
                .filter(|entry| entry.has_tag(&tag.id))
                .filter_map(LogEntry::energy)
                .collect();
            if levels.is_empty() {
                return None;
            }
            Some(FactorImpact {
                tag_id: tag.id.clone(),
                label: tag.label.clone(),
                color: tag.color.clone(),
                average_energy: mean(levels.iter().copied()),
                baseline,
                count: levels.len(),
            })
        })
        .collect()
}

/// Rounds to a fixed number of decimals for display.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

fn mean(levels: impl Iterator<Item = EnergyLevel>) -> f64 {
    let (sum, count) = levels.fold((0_u32, 0_usize), |(sum, count), level| {
        (sum + u32::from(level.value()), count + 1)
    });
    if count == 0 {
        0.0
    } else {
        f64::from(sum) / count_as_f64(count)
    }
}

#[allow(clippy::cast_precision_loss)]
const fn count_as_f64(count: usize) -> f64 {
    count as f64
}
