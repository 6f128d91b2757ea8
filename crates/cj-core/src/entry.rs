//! Log entries: one recorded 30-minute slot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::slot::Slot;
use crate::types::{EnergyLevel, EntryId, TagId};

/// One 30-minute slot's recorded state.
///
/// Entries are never edited in place. A new write to the same slot replaces
/// the whole entry, including its ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: EntryId,
    /// Absolute start of the slot in epoch milliseconds, fixed at creation.
    pub timestamp: i64,
    /// Calendar date the entry is filed under.
    #[serde(rename = "dateStr")]
    pub date: NaiveDate,
    #[serde(flatten)]
    pub slot: Slot,
    /// Only meaningful when `is_sleep` is false.
    pub energy_level: EnergyLevel,
    pub is_sleep: bool,
    /// Weak references into the tag registry.
    #[serde(default)]
    pub tags: Vec<TagId>,
}

impl LogEntry {
    /// Returns the energy rating, or `None` for sleep entries.
    pub const fn energy(&self) -> Option<EnergyLevel> {
        if self.is_sleep {
            None
        } else {
            Some(self.energy_level)
        }
    }

    /// True if this entry sits at the given date and slot.
    pub fn occupies(&self, date: NaiveDate, slot: Slot) -> bool {
        self.date == date && self.slot == slot
    }

    /// True if the entry carries the given tag.
    pub fn has_tag(&self, tag: &TagId) -> bool {
        self.tags.contains(tag)
    }
}

/// User-supplied content for a slot write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFields {
    pub energy_level: EnergyLevel,
    pub is_sleep: bool,
    pub tags: Vec<TagId>,
}

impl SlotFields {
    /// An awake entry with the given rating and tags.
    pub const fn energy(energy_level: EnergyLevel, tags: Vec<TagId>) -> Self {
        Self {
            energy_level,
            is_sleep: false,
            tags,
        }
    }

    /// A sleep entry. Sleep never carries energy or tags.
    pub const fn sleep() -> Self {
        Self {
            energy_level: EnergyLevel::SLEEP_PLACEHOLDER,
            is_sleep: true,
            tags: Vec::new(),
        }
    }

    /// Drops energy and tags from sleep fields.
    pub(crate) fn normalized(self) -> Self {
        if self.is_sleep { Self::sleep() } else { self }
    }
}
