//! Circadian energy journal CLI library.
//!
//! This crate provides the CLI interface for the journal.

mod cli;
pub mod commands;
mod config;
pub mod journal;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use journal::Journal;
