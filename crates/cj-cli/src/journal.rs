//! The journal application context.
//!
//! Owns the entry store, tag registry, preferences and cached insight, all
//! loaded from the database at open. Every mutation writes back the domain it
//! changed before returning, and entry mutations drop a cached insight whose
//! history they touched.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use cj_core::{
    Completion, EntryStore, Insight, InsightState, InsightTicket, LogEntry, Preferences,
    SleepRange, Slot, SlotFields, Tag, TagId, TagRegistry,
};
use cj_db::Database;

/// Loaded journal state plus the database it persists to.
pub struct Journal<Tz: TimeZone> {
    db: Database,
    tz: Tz,
    store: EntryStore,
    tags: TagRegistry,
    preferences: Preferences,
    insight: InsightState,
}

impl<Tz: TimeZone> Journal<Tz> {
    /// Opens the journal at `path`, creating the file and its parent directory.
    pub fn open(path: &Path, tz: Tz) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("failed to create database directory")?;
        }
        let db = Database::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        Self::load(db, tz)
    }

    /// Loads every domain from an already-open database.
    pub fn load(db: Database, tz: Tz) -> Result<Self> {
        let store = EntryStore::from_entries(db.load_entries()?);
        let tags = db.load_tags()?;
        let preferences = db.load_preferences()?;
        let cached = db.load_insight()?;
        let viewed = cached
            .as_ref()
            .map_or_else(|| Utc::now().with_timezone(&tz).date_naive(), |insight| insight.date);
        tracing::debug!(entries = store.len(), tags = tags.len(), "loaded journal");
        Ok(Self {
            db,
            tz,
            store,
            tags,
            preferences,
            insight: InsightState::new(viewed, cached),
        })
    }

    pub const fn tz(&self) -> &Tz {
        &self.tz
    }

    /// Current wall-clock time in the journal's timezone.
    pub fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }

    pub const fn store(&self) -> &EntryStore {
        &self.store
    }

    pub const fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub const fn database(&self) -> &Database {
        &self.db
    }

    /// Writes `fields` into a slot, replacing whatever was there.
    pub fn log_slot(&mut self, date: NaiveDate, slot: Slot, fields: SlotFields) -> Result<LogEntry> {
        let entry = self.store.upsert(&self.tz, date, slot, fields).clone();
        self.entries_changed([date])?;
        Ok(entry)
    }

    /// Clears a single slot.
    pub fn delete_slot(&mut self, date: NaiveDate, slot: Slot) -> Result<Option<LogEntry>> {
        let removed = self.store.remove_slot(date, slot);
        if removed.is_some() {
            self.entries_changed([date])?;
        }
        Ok(removed)
    }

    /// Removes every entry filed under `date`.
    pub fn reset_day(&mut self, date: NaiveDate) -> Result<usize> {
        let removed = self.store.reset_day(date);
        if removed > 0 {
            self.entries_changed([date])?;
        }
        Ok(removed)
    }

    /// Fills a sleep range starting on `date`.
    pub fn log_sleep(&mut self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Result<SleepRange> {
        let range = self.store.expand_sleep(&self.tz, date, start, end);
        self.entries_changed(range.dates.iter().copied())?;
        Ok(range)
    }

    /// Adds a tag. A blank label changes nothing and returns `None`.
    pub fn add_tag(&mut self, label: &str, color: Option<&str>) -> Result<Option<TagId>> {
        let Some(id) = self.tags.add(label, color) else {
            return Ok(None);
        };
        self.save_tags()?;
        Ok(Some(id))
    }

    /// Removes a tag. Entries keep referring to its ID.
    pub fn remove_tag(&mut self, id: &TagId) -> Result<Option<Tag>> {
        let removed = self.tags.remove(id);
        if removed.is_some() {
            self.save_tags()?;
        }
        Ok(removed)
    }

    /// Moves a tag between zero-based positions.
    pub fn move_tag(&mut self, from: usize, to: usize) -> Result<bool> {
        let moved = self.tags.reorder(from, to);
        if moved {
            self.save_tags()?;
        }
        Ok(moved)
    }

    /// Selects a theme. Unknown IDs change nothing.
    pub fn set_theme(&mut self, id: &str) -> Result<bool> {
        let changed = self.preferences.set_theme(id);
        if changed {
            self.save_preferences()?;
        }
        Ok(changed)
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) -> Result<()> {
        self.preferences.dark_mode = dark_mode;
        self.save_preferences()
    }

    /// Switches the insight view to `date` and returns its cached insight.
    pub fn view_insight(&mut self, date: NaiveDate) -> Option<&Insight> {
        self.insight.view(date);
        self.insight.insight()
    }

    /// Starts an insight request for the viewed date.
    pub fn begin_insight(&mut self) -> InsightTicket {
        self.insight.begin()
    }

    /// Stores a generated insight if its request is still current.
    pub fn complete_insight(&mut self, ticket: InsightTicket, text: String) -> Result<Completion> {
        let completion = self.insight.complete(ticket, text);
        if let Some(insight) = self.insight.insight() {
            if completion == Completion::Accepted {
                self.db
                    .save_insight(insight)
                    .context("failed to save insight")?;
            }
        }
        Ok(completion)
    }

    /// The cached insight, if it belongs to the viewed date.
    pub const fn insight(&self) -> Option<&Insight> {
        self.insight.insight()
    }

    fn entries_changed(&mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Result<()> {
        self.db
            .save_entries(self.store.entries())
            .context("failed to save entries")?;
        let mut cleared = false;
        for date in dates {
            cleared |= self.insight.invalidate(date);
        }
        if cleared {
            tracing::debug!("entries changed, dropping cached insight");
            self.db.clear_insight().context("failed to clear insight")?;
        }
        Ok(())
    }

    fn save_tags(&self) -> Result<()> {
        self.db.save_tags(&self.tags).context("failed to save tags")
    }

    fn save_preferences(&self) -> Result<()> {
        self.db
            .save_preferences(&self.preferences)
            .context("failed to save preferences")
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A fresh in-memory journal pinned to UTC.
    pub fn journal() -> Journal<Utc> {
        Journal::load(Database::open_in_memory().unwrap(), Utc).unwrap()
    }

    pub fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    pub fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }
}
