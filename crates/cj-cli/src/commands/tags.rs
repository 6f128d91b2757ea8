//! Tags command for managing the ordered factor list.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::TimeZone;
use clap::Subcommand;

use crate::journal::Journal;

#[derive(Debug, Subcommand)]
pub enum TagsAction {
    /// List tags in display order.
    List,

    /// Add a tag at the end of the list.
    Add {
        /// Display label.
        label: String,

        /// Hex color, e.g. #6366f1.
        #[arg(long)]
        color: Option<String>,
    },

    /// Remove a tag. Past entries keep their reference to it.
    Remove {
        /// Tag ID or label.
        tag: String,
    },

    /// Move a tag from one position to another (1-based).
    Move { from: usize, to: usize },
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    action: &TagsAction,
    journal: &mut Journal<Tz>,
) -> Result<()> {
    match action {
        TagsAction::List => list(writer, journal),
        TagsAction::Add { label, color } => {
            if let Some(id) = journal.add_tag(label, color.as_deref())? {
                writeln!(writer, "Added tag {} ({id})", label.trim())?;
            }
            Ok(())
        }
        TagsAction::Remove { tag } => {
            let Some(id) = journal.tags().find(tag).map(|found| found.id.clone()) else {
                bail!("tag not found: {tag}");
            };
            if let Some(removed) = journal.remove_tag(&id)? {
                writeln!(writer, "Removed tag {} ({})", removed.label, removed.id)?;
            }
            Ok(())
        }
        TagsAction::Move { from, to } => {
            let moved = from.checked_sub(1).zip(to.checked_sub(1)).map_or(Ok(false), |(from, to)| {
                journal.move_tag(from, to)
            })?;
            if moved {
                list(writer, journal)
            } else {
                writeln!(writer, "Tag order unchanged.")?;
                Ok(())
            }
        }
    }
}

fn list<W: Write, Tz: TimeZone>(writer: &mut W, journal: &Journal<Tz>) -> Result<()> {
    let tags = journal.tags();
    if tags.is_empty() {
        writeln!(writer, "No tags defined.")?;
        return Ok(());
    }
    for (index, tag) in tags.iter().enumerate() {
        writeln!(
            writer,
            "{}. {:<14}{:<11}{}  {}",
            index + 1,
            tag.label,
            tag.id.as_str(),
            tag.color,
            tag.icon
        )?;
    }
    Ok(())
}
