//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The energy level was outside 1..=5.
    #[error("energy level must be between 1 and 5, got {value}")]
    EnergyOutOfRange { value: i64 },

    /// The energy level was not a number.
    #[error("energy level must be a number from 1 to 5, got '{value}'")]
    InvalidEnergy { value: String },

    /// The hour/minute pair does not name a half-hour slot.
    #[error("invalid slot {hour:02}:{minute:02}: hour must be 0-23 and minute 00 or 30")]
    InvalidSlot { hour: u32, minute: u32 },

    /// A wall-clock time could not be parsed.
    #[error("invalid time '{value}', expected HH:MM")]
    InvalidClock { value: String },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated log entry identifier.
    ///
    /// Generated once when the entry is created and never reused, even when
    /// a later write replaces the entry at the same slot.
    EntryId, "entry ID"
);

define_string_id!(
    /// A validated tag identifier.
    ///
    /// Entries reference tags by this ID only. Nothing guarantees the tag
    /// still exists in the registry.
    TagId, "tag ID"
);

impl EntryId {
    /// Generates a fresh random entry ID.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl TagId {
    /// Generates a short random tag ID, easy to type on the command line.
    pub(crate) fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        Self(uuid[..9].to_string())
    }

    /// Wraps one of the built-in tag IDs.
    pub(crate) fn builtin(id: &'static str) -> Self {
        Self(id.to_string())
    }
}

/// Static description of one energy level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergyDescriptor {
    pub label: &'static str,
    pub description: &'static str,
    pub examples: &'static str,
    pub color: &'static str,
}

const ENERGY_DESCRIPTORS: [EnergyDescriptor; 5] = [
    EnergyDescriptor {
        label: "Exhausted",
        description: "Extremely drowsy, needs rest.",
        examples: "Cannot focus at all.",
        color: "#fca5a5",
    },
    EnergyDescriptor {
        label: "Distracted",
        description: "Easily distracted, suited to small chores.",
        examples: "Cleaning, answering email.",
        color: "#fdba74",
    },
    EnergyDescriptor {
        label: "Stable",
        description: "Even mood, fine for mechanical tasks.",
        examples: "Searching references, tidying notes.",
        color: "#93c5fd",
    },
    EnergyDescriptor {
        label: "High",
        description: "Focused with strong follow-through.",
        examples: "Routine research, logical analysis.",
        color: "#86efac",
    },
    EnergyDescriptor {
        label: "Peak",
        description: "Very sharp, takes on the hardest problems.",
        examples: "Creative design, deep learning.",
        color: "#fcd34d",
    },
];

/// A subjective energy rating from 1 (exhausted) to 5 (peak).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct EnergyLevel(u8);

impl EnergyLevel {
    /// Lowest rating.
    pub const MIN: Self = Self(1);

    /// Highest rating.
    pub const MAX: Self = Self(5);

    /// Value stored on sleep entries. It carries no energy meaning.
    pub const SLEEP_PLACEHOLDER: Self = Self(3);

    /// Ratings at or above this count as peak time.
    pub const PEAK_THRESHOLD: Self = Self(4);

    /// Creates an energy level after validation.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        match u8::try_from(value) {
            Ok(level @ 1..=5) => Ok(Self(level)),
            _ => Err(ValidationError::EnergyOutOfRange { value }),
        }
    }

    /// Returns the numeric rating.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the label, description and color for this level.
    pub fn descriptor(self) -> &'static EnergyDescriptor {
        &ENERGY_DESCRIPTORS[usize::from(self.0 - 1)]
    }

    /// All levels from highest to lowest, the order they are offered in.
    pub fn all_descending() -> impl Iterator<Item = Self> {
        (1..=5).rev().map(Self)
    }
}

impl Default for EnergyLevel {
    fn default() -> Self {
        Self::SLEEP_PLACEHOLDER
    }
}

impl TryFrom<i64> for EnergyLevel {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EnergyLevel> for u8 {
    fn from(level: EnergyLevel) -> Self {
        level.0
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EnergyLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = trimmed
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidEnergy {
                value: trimmed.to_string(),
            })?;
        Self::new(value)
    }
}
