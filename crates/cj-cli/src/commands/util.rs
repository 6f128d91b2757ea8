//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use chrono::{Days, NaiveDate};
use cj_core::{TagId, TagRegistry};
use regex::Regex;

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+days?\s+ago$").unwrap());

/// Conservative bound for relative dates (~1000 years).
const MAX_RELATIVE_DAYS: u64 = 1000 * 366;

/// Parse a date as ISO `YYYY-MM-DD`, a keyword, or a relative day count.
///
/// Supports:
/// - ISO: "2024-01-15"
/// - Keywords: "today", "yesterday", "tomorrow"
/// - Relative: "3 days ago", "1 day ago"
pub fn parse_date(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        "today" => return Ok(today),
        "yesterday" => return shift(today, 1),
        "tomorrow" => {
            return today
                .checked_add_days(Days::new(1))
                .context("date out of range");
        }
        _ => {}
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let Some(caps) = RELATIVE_DATE_RE.captures(s) else {
        bail!("Invalid date: {s}. Use YYYY-MM-DD, today, yesterday, tomorrow, or 'N days ago'");
    };
    let n: u64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;
    if n > MAX_RELATIVE_DAYS {
        bail!("Relative date too far back: {n} days");
    }
    shift(today, n)
}

fn shift(today: NaiveDate, days: u64) -> Result<NaiveDate> {
    today
        .checked_sub_days(Days::new(days))
        .context("date out of range")
}

/// Resolves tag arguments by ID or label.
pub fn resolve_tags(registry: &TagRegistry, keys: &[String]) -> Result<Vec<TagId>> {
    let mut ids: Vec<TagId> = Vec::with_capacity(keys.len());
    for key in keys {
        let Some(tag) = registry.find(key) else {
            bail!("unknown tag: {key} (see 'cj tags list')");
        };
        if !ids.contains(&tag.id) {
            ids.push(tag.id.clone());
        }
    }
    Ok(ids)
}

/// Generates a fixed-width progress bar.
///
/// Non-zero values below 5% of `max` still get a single block.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn progress_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return "░".repeat(width);
    }
    let ratio = (value / max).clamp(0.0, 1.0);
    let filled = if ratio < 0.05 && value > 0.0 {
        1
    } else {
        ((ratio * width as f64).round() as usize).min(width)
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Joins tag labels for display, keeping unknown IDs as-is.
pub fn tag_labels(registry: &TagRegistry, ids: &[TagId]) -> String {
    ids.iter()
        .map(|id| registry.resolve_label(id).unwrap_or(id.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn parse_date_keywords() {
        assert_eq!(parse_date("today", today()).unwrap().to_string(), "2024-03-01");
        assert_eq!(parse_date("Yesterday", today()).unwrap().to_string(), "2024-02-29");
        assert_eq!(parse_date("tomorrow", today()).unwrap().to_string(), "2024-03-02");
    }

    #[test]
    fn parse_date_iso_and_relative() {
        assert_eq!(parse_date("2023-12-31", today()).unwrap().to_string(), "2023-12-31");
        assert_eq!(parse_date("3 days ago", today()).unwrap().to_string(), "2024-02-27");
        assert_eq!(parse_date("1 day ago", today()).unwrap().to_string(), "2024-02-29");
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("last week", today()).is_err());
        assert!(parse_date("2024-13-01", today()).is_err());
        assert!(parse_date("99999999 days ago", today()).is_err());
    }

    #[test]
    fn resolve_tags_by_id_or_label() {
        let registry = TagRegistry::defaults();
        let ids = resolve_tags(
            &registry,
            &["Caffeine".to_string(), "exercise".to_string(), "caffeine".to_string()],
        )
        .unwrap();
        let ids: Vec<&str> = ids.iter().map(TagId::as_str).collect();
        assert_eq!(ids, vec!["caffeine", "exercise"]);

        let err = resolve_tags(&registry, &["naps".to_string()]).unwrap_err();
        assert!(err.to_string().contains("unknown tag: naps"));
    }

    #[test]
    fn progress_bar_scales() {
        assert_eq!(progress_bar(5.0, 5.0, 5), "█████");
        assert_eq!(progress_bar(0.0, 5.0, 5), "░░░░░");
        assert_eq!(progress_bar(0.1, 5.0, 10), "█░░░░░░░░░");
        assert_eq!(progress_bar(2.5, 5.0, 10), "█████░░░░░");
        assert_eq!(progress_bar(1.0, 0.0, 3), "░░░");
    }
}
