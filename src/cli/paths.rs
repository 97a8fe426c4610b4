//! Paths subcommand: show where a profile would be loaded from.

use crate::config::{ConfigProfile, SearchPaths};
use anyhow::Result;
use std::io::Write;

/// Print each candidate path with its origin and whether it exists.
pub fn run_paths(profile: &ConfigProfile, out: &mut impl Write) -> Result<()> {
    let paths = SearchPaths::discover(profile);
    for candidate in paths.candidates() {
        let marker = if candidate.path.is_file() { "found" } else { "missing" };
        writeln!(
            out,
            "{:<11} {:<7} {}",
            candidate.origin,
            marker,
            candidate.path.display()
        )?;
    }
    Ok(())
}
