//! Core domain logic for the circadian energy journal.
//!
//! This crate contains the fundamental types and logic for:
//! - Slots: the 48 half-hour windows of a day and local-time resolution
//! - The entry store: slot-unique upserts and sleep range expansion
//! - Aggregation: daily scores, weekly series and factor correlation
//! - Tags, preferences, insight bookkeeping and CSV export

pub mod aggregate;
pub mod entry;
pub mod export;
pub mod insight;
pub mod preferences;
pub mod slot;
pub mod store;
pub mod tags;
pub mod types;

pub use aggregate::{DayData, FactorImpact, RECENT_DAYS, factor_correlation, weekly_series};
pub use entry::{LogEntry, SlotFields};
pub use export::write_csv;
pub use insight::{Completion, Insight, InsightState, InsightTicket};
pub use preferences::{Preferences, THEMES, Theme};
pub use slot::{SLOTS_PER_DAY, SLOT_MINUTES, Slot};
pub use store::{EntryStore, SleepRange};
pub use tags::{Tag, TagRegistry};
pub use types::{EnergyLevel, EntryId, TagId, ValidationError};
