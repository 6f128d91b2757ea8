//! Theme command for display preferences.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::TimeZone;
use clap::{Subcommand, ValueEnum};
use cj_core::THEMES;

use crate::journal::Journal;

#[derive(Debug, Subcommand)]
pub enum ThemeAction {
    /// List available themes.
    List,

    /// Select a theme by ID.
    Set {
        /// Theme ID, e.g. midnight or ocean.
        id: String,
    },

    /// Turn dark mode on or off.
    Dark {
        #[arg(value_enum)]
        mode: DarkMode,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DarkMode {
    On,
    Off,
    Toggle,
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    action: &ThemeAction,
    journal: &mut Journal<Tz>,
) -> Result<()> {
    match action {
        ThemeAction::List => {
            let current = journal.preferences().theme().id;
            for theme in &THEMES {
                let marker = if theme.id == current { '*' } else { ' ' };
                writeln!(
                    writer,
                    "{marker} {:<10}{:<12}{}",
                    theme.id, theme.name, theme.primary_hex
                )?;
            }
        }
        ThemeAction::Set { id } => {
            if !journal.set_theme(id)? {
                let known: Vec<&str> = THEMES.iter().map(|theme| theme.id).collect();
                bail!("unknown theme: {id} (choose from {})", known.join(", "));
            }
            writeln!(writer, "Theme set to {}", journal.preferences().theme().name)?;
        }
        ThemeAction::Dark { mode } => {
            let dark = match mode {
                DarkMode::On => true,
                DarkMode::Off => false,
                DarkMode::Toggle => !journal.preferences().dark_mode,
            };
            journal.set_dark_mode(dark)?;
            writeln!(writer, "Dark mode {}", if dark { "on" } else { "off" })?;
        }
    }
    Ok(())
}
