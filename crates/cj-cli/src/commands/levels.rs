//! Levels command describing the energy scale.

use std::io::Write;

use anyhow::Result;
use cj_core::EnergyLevel;

pub fn run<W: Write>(writer: &mut W) -> Result<()> {
    for level in EnergyLevel::all_descending() {
        let descriptor = level.descriptor();
        writeln!(
            writer,
            "{level} {:<11}{}  {}",
            descriptor.label, descriptor.color, descriptor.description
        )?;
        writeln!(writer, "  e.g. {}", descriptor.examples)?;
    }
    Ok(())
}
