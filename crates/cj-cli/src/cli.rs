//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{
    day::DayArgs, delete::DeleteArgs, export::ExportArgs, insight::InsightArgs, log::LogArgs,
    now::NowArgs, report::ReportArgs, reset::ResetArgs, sleep::SleepArgs, tags::TagsAction,
    theme::ThemeAction,
};

/// Circadian energy journal.
///
/// Rates energy in half-hour slots, logs sleep ranges, and summarizes how
/// energy and habits line up across days.
#[derive(Debug, Parser)]
#[command(name = "cj", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rate a half-hour slot, or mark it as sleep.
    Log(LogArgs),

    /// Rate the slot containing the current time.
    Now(NowArgs),

    /// Clear a single slot.
    Delete(DeleteArgs),

    /// Log a sleep range, crossing midnight if the end is not after the start.
    Sleep(SleepArgs),

    /// Remove every entry of a day.
    Reset(ResetArgs),

    /// Show the entries and statistics of one day.
    Day(DayArgs),

    /// Describe the energy scale.
    Levels,

    /// Show daily averages and factor impact across recent days.
    Report(ReportArgs),

    /// Manage factor tags.
    #[command(subcommand)]
    Tags(TagsAction),

    /// Export all entries as CSV.
    Export(ExportArgs),

    /// Generate an AI analysis of recent days.
    Insight(InsightArgs),

    /// Manage the color theme and dark mode.
    #[command(subcommand)]
    Theme(ThemeAction),

    /// Show journal status and configuration.
    Status,
}
