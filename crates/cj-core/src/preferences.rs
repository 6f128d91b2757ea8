//! Display preferences: color theme and dark mode.

use serde::{Deserialize, Serialize};

/// A named color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub primary: &'static str,
    pub primary_hex: &'static str,
    pub background: &'static str,
}

/// Available themes. The first one is the default.
pub const THEMES: [Theme; 6] = [
    Theme {
        id: "midnight",
        name: "Midnight",
        primary: "indigo",
        primary_hex: "#6366f1",
        background: "slate",
    },
    Theme {
        id: "zen",
        name: "Zen Forest",
        primary: "emerald",
        primary_hex: "#10b981",
        background: "stone",
    },
    Theme {
        id: "cyber",
        name: "Neon",
        primary: "violet",
        primary_hex: "#8b5cf6",
        background: "neutral",
    },
    Theme {
        id: "sunset",
        name: "Sunset",
        primary: "rose",
        primary_hex: "#f43f5e",
        background: "zinc",
    },
    Theme {
        id: "ocean",
        name: "Deep Ocean",
        primary: "cyan",
        primary_hex: "#06b6d4",
        background: "slate",
    },
    Theme {
        id: "void",
        name: "Void",
        primary: "slate",
        primary_hex: "#94a3b8",
        background: "black",
    },
];

/// Persisted display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default = "default_theme_id")]
    pub theme: String,
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,
}

fn default_theme_id() -> String {
    THEMES[0].id.to_string()
}

const fn default_dark_mode() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: default_theme_id(),
            dark_mode: default_dark_mode(),
        }
    }
}

impl Preferences {
    /// The selected theme, or the default when the stored ID is unknown.
    pub fn theme(&self) -> &'static Theme {
        find_theme(&self.theme).unwrap_or(&THEMES[0])
    }

    /// Selects a theme by ID. Unknown IDs leave the preference unchanged.
    pub fn set_theme(&mut self, id: &str) -> bool {
        match find_theme(id) {
            Some(theme) => {
                self.theme = theme.id.to_string();
                true
            }
            None => false,
        }
    }
}

fn find_theme(id: &str) -> Option<&'static Theme> {
    let id = id.trim();
    THEMES.iter().find(|theme| theme.id.eq_ignore_ascii_case(id))
}
