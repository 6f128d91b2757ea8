//! The entry store: slot reconciliation and sleep range expansion.
//!
//! The store holds entries in insertion order. It does not enforce slot
//! uniqueness itself; every write goes through [`EntryStore::upsert`] or
//! [`EntryStore::expand_sleep`], which remove whatever they displace before
//! appending.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate, NaiveTime, TimeDelta, TimeZone};

use crate::entry::{LogEntry, SlotFields};
use crate::slot::{SLOT_MINUTES, Slot, resolve_local};
use crate::types::EntryId;

/// In-memory ordered collection of log entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryStore {
    entries: Vec<LogEntry>,
}

/// Outcome of committing a sleep range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SleepRange {
    /// Inclusive start in epoch milliseconds.
    pub start_ms: i64,
    /// Exclusive end in epoch milliseconds.
    pub end_ms: i64,
    /// Number of sleep entries written.
    pub created: usize,
    /// Number of previous entries removed because they fell in the range.
    pub overwritten: usize,
    /// Every date that gained or lost an entry.
    pub dates: BTreeSet<NaiveDate>,
}

impl EntryStore {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Wraps previously persisted entries as-is.
    pub const fn from_entries(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes `fields` into the slot, replacing any entry already there.
    ///
    /// The new entry gets a fresh ID and a timestamp derived from `date` and
    /// `slot` in `tz`.
    pub fn upsert<Tz: TimeZone>(
        &mut self,
        tz: &Tz,
        date: NaiveDate,
        slot: Slot,
        fields: SlotFields,
    ) -> &LogEntry {
        let replaced = self.remove_slot(date, slot).is_some();
        let fields = fields.normalized();
        let timestamp = resolve_local(tz, date, slot.start_time()).timestamp_millis();

        tracing::debug!(%date, %slot, replaced, is_sleep = fields.is_sleep, "upsert slot");

        let index = self.entries.len();
        self.entries.push(LogEntry {
            id: EntryId::generate(),
            timestamp,
            date,
            slot,
            energy_level: fields.energy_level,
            is_sleep: fields.is_sleep,
            tags: fields.tags,
        });
        &self.entries[index]
    }

    /// Removes the entry at the given slot, if any.
    pub fn remove_slot(&mut self, date: NaiveDate, slot: Slot) -> Option<LogEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.occupies(date, slot))?;
        Some(self.entries.remove(index))
    }

    /// Removes every entry filed under `date`. Returns how many were removed.
    pub fn reset_day(&mut self, date: NaiveDate) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.date != date);
        let removed = before - self.entries.len();
        tracing::debug!(%date, removed, "reset day");
        removed
    }

    /// Returns the entry at the given slot, if any.
    pub fn entry_at(&self, date: NaiveDate, slot: Slot) -> Option<&LogEntry> {
        self.entries.iter().find(|entry| entry.occupies(date, slot))
    }

    /// Entries filed under `date`, in slot order.
    pub fn entries_for_day(&self, date: NaiveDate) -> Vec<&LogEntry> {
        let mut day: Vec<&LogEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.date == date)
            .collect();
        day.sort_by_key(|entry| entry.slot);
        day
    }

    /// Fills `[start, end)` on `date` with half-hour sleep entries.
    ///
    /// If `end <= start` the range crosses midnight and `end` moves to the
    /// next day, so equal times cover a full 24 hours. Existing entries whose
    /// timestamp falls in the range are removed first, whatever their slot.
    pub fn expand_sleep<Tz: TimeZone>(
        &mut self,
        tz: &Tz,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> SleepRange {
        let start = resolve_local(tz, date, start_time);
        let mut end = resolve_local(tz, date, end_time);
        if end <= start {
            if let Some(next_day) = date.checked_add_days(Days::new(1)) {
                end = resolve_local(tz, next_day, end_time);
            }
        }

        let start_ms = start.timestamp_millis();
        let end_ms = end.timestamp_millis();
        let mut dates = BTreeSet::new();

        let before = self.entries.len();
        self.entries.retain(|entry| {
            let inside = entry.timestamp >= start_ms && entry.timestamp < end_ms;
            if inside {
                dates.insert(entry.date);
            }
            !inside
        });
        let mut overwritten = before - self.entries.len();

        let step = TimeDelta::minutes(SLOT_MINUTES);
        let mut current = start;
        let mut created = 0;
        while current < end {
            let local = current.naive_local();
            let entry_date = local.date();
            let slot = Slot::containing(local.time());
            let timestamp = current.timestamp_millis();
            current = current + step;
            // A repeated local hour maps back onto a slot this range already wrote.
            if self
                .entry_at(entry_date, slot)
                .is_some_and(|entry| entry.timestamp >= start_ms && entry.timestamp < end_ms)
            {
                continue;
            }
            // An unaligned start can land on a slot whose entry began before the range.
            if self.remove_slot(entry_date, slot).is_some() {
                overwritten += 1;
            }
            let fields = SlotFields::sleep();
            self.entries.push(LogEntry {
                id: EntryId::generate(),
                timestamp,
                date: entry_date,
                slot,
                energy_level: fields.energy_level,
                is_sleep: true,
                tags: fields.tags,
            });
            dates.insert(entry_date);
            created += 1;
        }

        tracing::debug!(%date, created, overwritten, "expanded sleep range");

        SleepRange {
            start_ms,
            end_ms,
            created,
            overwritten,
            dates,
        }
    }
}
