//! Configuration profiles.
//!
//! A profile names a configuration (its slug), the directories searched for
//! its files, where its lock snapshot lives, and the schema its merged values
//! must satisfy.

use super::schema::Schema;
use std::path::{Path, PathBuf};

/// Environment variable suffix selecting an environment-specific file.
pub const ENV_SUFFIX: &str = "ENV";

/// Environment variable suffix listing extra search directories.
pub const CONFIG_DIRS_SUFFIX: &str = "CONFIG_DIRS";

/// A named, statically-declared configuration profile.
#[derive(Debug, Clone)]
pub struct ConfigProfile {
    slug: String,
    config_dirs: Vec<PathBuf>,
    lock_dir: PathBuf,
    schema: Schema,
}

impl ConfigProfile {
    /// Create a profile with no search directories, the system temp dir as
    /// lock directory, and an empty schema.
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            config_dirs: Vec::new(),
            lock_dir: std::env::temp_dir(),
            schema: Schema::new(),
        }
    }

    /// Replace the search directories (lowest to highest priority).
    pub fn with_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Append one search directory with higher priority than the existing ones.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dirs.push(dir.into());
        self
    }

    /// Append the conventional system and user locations:
    /// `/etc/{slug}`, the platform config dir, then `~/.{slug}`.
    pub fn with_default_dirs(mut self) -> Self {
        self.config_dirs.push(PathBuf::from("/etc").join(&self.slug));
        if let Some(config_dir) = dirs::config_dir() {
            self.config_dirs.push(config_dir.join(&self.slug));
        }
        self.config_dirs.push(PathBuf::from(format!("~/.{}", self.slug)));
        self
    }

    pub fn with_lock_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lock_dir = dir.into();
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn config_dirs(&self) -> &[PathBuf] {
        &self.config_dirs
    }

    pub fn lock_dir(&self) -> &Path {
        &self.lock_dir
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Name of the environment variable `{SLUG}_{suffix}`.
    ///
    /// The slug is upper-cased as is, so `myApp` becomes `MYAPP`. Characters
    /// not allowed in variable names map to `_`, so `my-app` becomes `MY_APP`.
    pub fn env_var(&self, suffix: &str) -> String {
        let prefix: String = self
            .slug
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}_{}", prefix, suffix)
    }

    /// `{dir}/{slug}.yml`
    pub fn yml_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.yml", self.slug))
    }

    /// `{dir}/{slug}.{env}.yml`
    pub fn env_yml_path(&self, dir: &Path, env: &str) -> PathBuf {
        dir.join(format!("{}.{}.yml", self.slug, env))
    }

    /// `{lock_dir}/{slug}.lock.yml`
    pub fn lock_path(&self) -> PathBuf {
        self.lock_dir.join(format!("{}.lock.yml", self.slug))
    }
}
