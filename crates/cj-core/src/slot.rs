//! Half-hour slots and their mapping onto absolute instants.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// Length of one slot in minutes.
pub const SLOT_MINUTES: i64 = 30;

/// Number of slots in a calendar day.
pub const SLOTS_PER_DAY: usize = 48;

/// A fixed 30-minute bucket within a day, identified by hour and minute.
///
/// The minute is always 0 or 30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawSlot", into = "RawSlot")]
pub struct Slot {
    hour: u32,
    minute: u32,
}

#[derive(Serialize, Deserialize)]
struct RawSlot {
    hour: u32,
    minute: u32,
}

impl Slot {
    /// Creates a slot after validation.
    pub fn new(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        if hour > 23 || (minute != 0 && minute != 30) {
            return Err(ValidationError::InvalidSlot { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    /// Returns the slot that contains the given wall-clock time.
    pub fn containing(time: NaiveTime) -> Self {
        Self {
            hour: time.hour(),
            minute: if time.minute() >= 30 { 30 } else { 0 },
        }
    }

    pub const fn hour(self) -> u32 {
        self.hour
    }

    pub const fn minute(self) -> u32 {
        self.minute
    }

    /// Wall-clock time at which the slot starts.
    pub fn start_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Wall-clock time at which the slot ends, wrapping to 00:00 after 23:30.
    pub fn end_time(self) -> NaiveTime {
        self.start_time() + TimeDelta::minutes(SLOT_MINUTES)
    }

    /// Renders the slot as `HH:MM-HH:MM`.
    pub fn range_label(self) -> String {
        format!(
            "{}-{}",
            self.start_time().format("%H:%M"),
            self.end_time().format("%H:%M")
        )
    }

    /// Iterates over all 48 slots of a day in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..24).flat_map(|hour| [0, 30].map(|minute| Self { hour, minute }))
    }
}

impl TryFrom<RawSlot> for Slot {
    type Error = ValidationError;

    fn try_from(raw: RawSlot) -> Result<Self, Self::Error> {
        Self::new(raw.hour, raw.minute)
    }
}

impl From<Slot> for RawSlot {
    fn from(slot: Slot) -> Self {
        Self {
            hour: slot.hour,
            minute: slot.minute,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for Slot {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let time = parse_clock(s)?;
        Self::new(time.hour(), time.minute())
    }
}

/// Parses an `HH:MM` wall-clock time. Any minute is accepted.
pub fn parse_clock(s: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M").map_err(|_| ValidationError::InvalidClock {
        value: trimmed.to_string(),
    })
}

/// Resolves a wall-clock date and time to an absolute instant in `tz`.
///
/// Ambiguous times (clocks going back) resolve to the earlier instant.
/// Times that fall inside a gap (clocks going forward) move forward to the
/// first instant that exists.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => skip_gap(tz, naive),
    }
}

fn skip_gap<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    // Gaps are at most a few hours; probe forward in quarter hours.
    for quarters in 1..=16 {
        let probe = naive + TimeDelta::minutes(15 * quarters);
        if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
            return dt;
        }
    }
    tz.from_utc_datetime(&naive)
}
