//! CSV export of raw entries.

use std::io::{self, Write};

use chrono::NaiveDate;

use crate::entry::LogEntry;
use crate::tags::TagRegistry;

/// Byte order mark written before the header so spreadsheet tools pick UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const CSV_HEADER: &str = "Date,Hour,Minute,Energy Level,Is Sleep,Factors";

/// Default file name for an export made on `today`.
pub fn default_file_name(today: NaiveDate) -> String {
    format!("circadian_data_{today}.csv")
}

/// Writes every entry as one CSV row, oldest first.
///
/// Lines are separated by `\n` with no trailing newline. Returns the number
/// of data rows written.
pub fn write_csv<W: Write>(
    writer: &mut W,
    entries: &[LogEntry],
    tags: &TagRegistry,
) -> io::Result<usize> {
    let mut sorted: Vec<&LogEntry> = entries.iter().collect();
    sorted.sort_by_key(|entry| entry.timestamp);

    writer.write_all(UTF8_BOM)?;
    writer.write_all(CSV_HEADER.as_bytes())?;
    for entry in &sorted {
        writer.write_all(b"\n")?;
        writer.write_all(csv_row(entry, tags).as_bytes())?;
    }
    Ok(sorted.len())
}

fn csv_row(entry: &LogEntry, tags: &TagRegistry) -> String {
    let (energy, sleep) = match entry.energy() {
        Some(level) => (level.to_string(), "No"),
        None => ("N/A".to_string(), "Yes"),
    };
    let factors = entry
        .tags
        .iter()
        .map(|id| tags.resolve_label(id).unwrap_or(id.as_str()))
        .collect::<Vec<_>>()
        .join("|");

    format!(
        "{},{},{},{energy},{sleep},\"{}\"",
        entry.date,
        entry.slot.hour(),
        entry.slot.minute(),
        factors.replace('"', "\"\""),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnergyLevel, EntryId, TagId};

    fn entry(date: &str, slot: &str, timestamp: i64, level: i64, sleep: bool, tags: &[&str]) -> LogEntry {
        LogEntry {
            id: EntryId::generate(),
            timestamp,
            date: date.parse().unwrap(),
            slot: slot.parse().unwrap(),
            energy_level: EnergyLevel::new(level).unwrap(),
            is_sleep: sleep,
            tags: tags.iter().map(|t| TagId::new(*t).unwrap()).collect(),
        }
    }

    fn export(entries: &[LogEntry], tags: &TagRegistry) -> String {
        let mut out = Vec::new();
        let rows = write_csv(&mut out, entries, tags).unwrap();
        assert_eq!(rows, entries.len());
        assert!(out.starts_with(UTF8_BOM));
        String::from_utf8(out[UTF8_BOM.len()..].to_vec()).unwrap()
    }

    #[test]
    fn rows_sorted_by_timestamp() {
        let entries = vec![
            entry("2024-01-15", "09:30", 2_000, 4, false, &["caffeine", "exercise"]),
            entry("2024-01-15", "01:00", 1_000, 3, true, &[]),
        ];
        let csv = export(&entries, &TagRegistry::defaults());
        insta::assert_snapshot!(csv, @r#"
        Date,Hour,Minute,Energy Level,Is Sleep,Factors
        2024-01-15,1,0,N/A,Yes,""
        2024-01-15,9,30,4,No,"Caffeine|Exercise"
        "#);
    }

    #[test]
    fn unknown_tag_falls_back_to_raw_id() {
        let entries = vec![entry("2024-01-15", "10:00", 0, 5, false, &["gone", "meditation"])];
        let csv = export(&entries, &TagRegistry::defaults());
        assert!(csv.ends_with("2024-01-15,10,0,5,No,\"gone|Meditation\""));
    }

    #[test]
    fn quotes_in_labels_are_doubled() {
        let mut tags = TagRegistry::default();
        let id = tags.add("Said \"hi\"", None).unwrap();
        let entries = vec![entry("2024-01-15", "10:00", 0, 3, false, &[id.as_str()])];
        let csv = export(&entries, &tags);
        assert!(csv.ends_with(",\"Said \"\"hi\"\"\""));
    }

    #[test]
    fn empty_export_is_header_only() {
        let csv = export(&[], &TagRegistry::defaults());
        assert_eq!(csv, CSV_HEADER);
    }

    #[test]
    fn each_entry_appears_once() {
        let entries: Vec<LogEntry> = (0..6)
            .map(|i| entry("2024-01-15", &format!("{:02}:00", 10 + i), 10 - i, 3, false, &[]))
            .collect();
        let csv = export(&entries, &TagRegistry::defaults());
        assert_eq!(csv.lines().count(), 7);
        for i in 0..6 {
            let needle = format!("2024-01-15,{},0,", 10 + i);
            assert_eq!(csv.matches(&needle).count(), 1);
        }
    }

    #[test]
    fn default_file_name_uses_date() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(default_file_name(today), "circadian_data_2024-03-09.csv");
    }
}
