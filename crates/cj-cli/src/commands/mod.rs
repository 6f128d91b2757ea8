//! CLI subcommand implementations.

pub mod day;
pub mod delete;
pub mod export;
pub mod insight;
pub mod levels;
pub mod log;
pub mod now;
pub mod report;
pub mod reset;
pub mod sleep;
pub mod status;
pub mod tags;
pub mod theme;
pub mod util;
