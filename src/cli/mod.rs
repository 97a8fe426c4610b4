//! CLI command definitions for cleanconfig
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod lock;
pub mod paths;
pub mod show;

use crate::config::{ConfigProfile, Schema};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lock::LockArgs;
use show::{GetArgs, ShowArgs};
use std::path::PathBuf;

/// Inspect, snapshot and clear layered YAML configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration slug: files are named {slug}.yml and env vars {SLUG}_*
    #[arg(short, long, global = true, default_value = "config")]
    pub slug: String,

    /// Search directory, lowest priority first (repeatable, before the subcommand)
    #[arg(short, long = "dir", value_name = "DIR")]
    pub dirs: Vec<PathBuf>,

    /// Also search /etc/{slug}, the platform config dir and ~/.{slug} before --dir
    #[arg(long, global = true)]
    pub default_dirs: bool,

    /// Directory holding {slug}.lock.yml (default: system temp dir)
    #[arg(long, value_name = "DIR", global = true)]
    pub lock_dir: Option<PathBuf>,

    /// YAML schema description to validate against (default: accept anything)
    #[arg(long, value_name = "FILE", global = true)]
    pub schema: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List candidate files in priority order
    Paths,

    /// Print the merged, validated configuration
    Show(ShowArgs),

    /// Print a single value by dotted key path
    Get(GetArgs),

    /// Write the resolved configuration to the lock file
    Lock(LockArgs),

    /// Remove the lock file
    Unlock,
}

impl Cli {
    /// Build the profile described by the global options.
    pub fn profile(&self) -> Result<ConfigProfile> {
        let mut profile = ConfigProfile::new(&self.slug);

        if self.default_dirs {
            profile = profile.with_default_dirs();
        }
        for dir in &self.dirs {
            profile = profile.with_dir(dir);
        }
        if let Some(ref lock_dir) = self.lock_dir {
            profile = profile.with_lock_dir(lock_dir);
        }

        let schema = match self.schema {
            Some(ref path) => Schema::from_file(path)
                .with_context(|| format!("Failed to load schema {}", path.display()))?,
            None => Schema::permissive(),
        };

        Ok(profile.with_schema(schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cleanconfig",
            "--slug",
            "project",
            "-d",
            "/a",
            "--dir",
            "/b",
            "show",
            "--lock-dir",
            "/locks",
        ])
        .unwrap();

        assert!(matches!(cli.command, Command::Show(_)));
        let profile = cli.profile().unwrap();
        assert_eq!(profile.slug(), "project");
        assert_eq!(profile.config_dirs(), &[PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(profile.lock_path(), PathBuf::from("/locks/project.lock.yml"));
    }

    #[test]
    fn test_dirs_are_only_accepted_before_the_subcommand() {
        let split = Cli::try_parse_from(["cleanconfig", "-d", "/a", "show", "--dir", "/b"]);
        assert!(split.is_err());

        let cli = Cli::try_parse_from(["cleanconfig", "-d", "/a", "-d", "/b", "-d", "/c", "paths"])
            .unwrap();
        let profile = cli.profile().unwrap();
        assert_eq!(
            profile.config_dirs(),
            &[PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")]
        );
    }

    #[test]
    fn test_default_profile_is_permissive() {
        let cli = Cli::try_parse_from(["cleanconfig", "paths"]).unwrap();
        let profile = cli.profile().unwrap();
        assert_eq!(profile.slug(), "config");
        assert_eq!(profile.schema(), &Schema::permissive());
    }

    #[test]
    fn test_missing_schema_file_is_an_error() {
        let cli = Cli::try_parse_from([
            "cleanconfig",
            "--schema",
            "/definitely/not/here.yml",
            "unlock",
        ])
        .unwrap();
        assert!(cli.profile().is_err());
    }
}
