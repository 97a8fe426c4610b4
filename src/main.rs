//! cleanconfig command-line tool
//!
//! Resolves a layered YAML configuration and prints, snapshots or clears it.

use anyhow::Result;
use clap::Parser;
use cleanconfig::cli::lock::{run_lock, run_unlock};
use cleanconfig::cli::paths::run_paths;
use cleanconfig::cli::show::{run_get, run_show};
use cleanconfig::cli::{Cli, Command};
use cleanconfig::logging::{LogTarget, init_logging};
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&LogTarget::parse(&cli.log), cli.verbose)?;

    let profile = cli.profile()?;
    debug!(slug = profile.slug(), dirs = profile.config_dirs().len(), "Using profile");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Paths => run_paths(&profile, &mut out),
        Command::Show(ref args) => run_show(&profile, args, &mut out),
        Command::Get(ref args) => run_get(&profile, args, &mut out),
        Command::Lock(ref args) => run_lock(&profile, args, &mut out),
        Command::Unlock => run_unlock(&profile, &mut out),
    }
}
