//! Lock and unlock subcommands.

use crate::config::{ConfigProfile, ResolvedConfig, remove_snapshot};
use anyhow::{Context, Result, anyhow};
use clap::Args;
use serde_json::{Map, Value};
use std::io::Write;

/// Arguments for the lock subcommand
#[derive(Args, Debug)]
pub struct LockArgs {
    /// Override a value before locking, e.g. --set server.port=9000 (repeatable)
    ///
    /// Values are parsed as YAML, so `true`, `42` and `[a, b]` keep their types.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
}

/// Split `KEY=VALUE` and parse the value as YAML.
pub fn parse_override(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid override '{}': expected KEY=VALUE", raw))?;
    let key = key.trim();
    if key.is_empty() || key.split('.').any(str::is_empty) {
        return Err(anyhow!("Invalid override '{}': empty key segment", raw));
    }

    let yaml: serde_yaml::Value = serde_yaml::from_str(value)
        .with_context(|| format!("Invalid override value for '{}'", key))?;
    Ok((key.to_string(), serde_json::to_value(yaml)?))
}

/// Set `value` at a dotted path, creating or replacing intermediate mappings.
fn set_path(map: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(inner) = entry {
                set_path(inner, rest, value);
            }
        }
    }
}

pub fn run_lock(profile: &ConfigProfile, args: &LockArgs, out: &mut impl Write) -> Result<()> {
    let overrides = args
        .overrides
        .iter()
        .map(|raw| parse_override(raw))
        .collect::<Result<Vec<_>>>()?;

    let mut config = ResolvedConfig::read(profile)?;
    for (key, value) in overrides {
        let head = key.split_once('.').map(|(head, _)| head.to_string());
        match head {
            None => {
                config.insert(key, value);
            }
            Some(head) => {
                let mut root = Map::new();
                if let Some(existing) = config.remove(&head) {
                    root.insert(head, existing);
                }
                set_path(&mut root, &key, value);
                for (k, v) in root {
                    config.insert(k, v);
                }
            }
        }
    }

    config.lock()?;
    writeln!(out, "Locked {}", config.lock_path().display())?;
    Ok(())
}

pub fn run_unlock(profile: &ConfigProfile, out: &mut impl Write) -> Result<()> {
    let path = profile.lock_path();
    remove_snapshot(&path)?;
    writeln!(out, "Unlocked {}", path.display())?;
    Ok(())
}
