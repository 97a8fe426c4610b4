//! Show and get subcommands.

use crate::config::{ConfigProfile, ResolvedConfig};
use crate::format::{OutputFormat, render_value};
use anyhow::{Result, bail};
use clap::Args;
use std::io::Write;

/// Arguments for the show subcommand
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Output format: yaml (default) or json
    #[arg(short, long, default_value = "yaml", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// List the files that contributed, as YAML comments, before the values
    #[arg(long)]
    pub sources: bool,
}

/// Arguments for the get subcommand
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Dotted key path, e.g. server.port
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Output format for non-string values: yaml (default) or json
    #[arg(short, long, default_value = "yaml", value_name = "FORMAT")]
    pub format: OutputFormat,
}

pub fn run_show(profile: &ConfigProfile, args: &ShowArgs, out: &mut impl Write) -> Result<()> {
    let config = ResolvedConfig::read(profile)?;

    if args.sources {
        for source in config.sources() {
            writeln!(out, "# {}", source.display())?;
        }
    }

    write!(out, "{}", args.format.render(config.as_map())?)?;
    Ok(())
}

pub fn run_get(profile: &ConfigProfile, args: &GetArgs, out: &mut impl Write) -> Result<()> {
    let config = ResolvedConfig::read(profile)?;

    let Some(value) = config.lookup(&args.key) else {
        bail!("Key '{}' not found in {} configuration", args.key, profile.slug());
    };

    write!(out, "{}", render_value(value, args.format)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Schema;
    use tempfile::TempDir;

    fn profile(temp: &TempDir) -> ConfigProfile {
        std::fs::write(
            temp.path().join("cleanconfig-show-unit.yml"),
            "name: demo\nserver:\n  port: 8080\n",
        )
        .unwrap();
        ConfigProfile::new("cleanconfig-show-unit")
            .with_dirs([temp.path()])
            .with_lock_dir(temp.path().join("locks"))
            .with_schema(Schema::permissive())
    }

    #[test]
    fn test_show_json_with_sources() {
        let temp = TempDir::new().unwrap();
        let profile = profile(&temp);
        let args = ShowArgs {
            format: OutputFormat::Json,
            sources: true,
        };

        let mut out = Vec::new();
        run_show(&profile, &args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("# "));
        assert!(text.contains("cleanconfig-show-unit.yml"));
        assert!(text.contains("\"port\": 8080"));
    }

    #[test]
    fn test_get_nested_and_missing() {
        let temp = TempDir::new().unwrap();
        let profile = profile(&temp);

        let mut out = Vec::new();
        let args = GetArgs {
            key: "server.port".into(),
            format: OutputFormat::Yaml,
        };
        run_get(&profile, &args, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "8080\n");

        let mut out = Vec::new();
        let args = GetArgs {
            key: "name".into(),
            format: OutputFormat::Json,
        };
        run_get(&profile, &args, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "demo\n");

        let args = GetArgs {
            key: "server.host".into(),
            format: OutputFormat::Yaml,
        };
        assert!(run_get(&profile, &args, &mut std::io::sink()).is_err());
    }
}
