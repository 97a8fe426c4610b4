//! The resolved configuration handed to the rest of an application.

use super::profile::ConfigProfile;
use crate::error::Result;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// A validated, merged configuration mapping.
///
/// Built once by [`ResolvedConfig::read`] or [`ResolvedConfig::from_paths`] and
/// meant to be treated as read-only afterwards. [`insert`](Self::insert) and
/// [`remove`](Self::remove) exist to stage in-memory edits before a
/// [`lock`](Self::lock); they are not re-validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    slug: String,
    lock_path: PathBuf,
    values: Map<String, Value>,
    sources: Vec<PathBuf>,
}

impl ResolvedConfig {
    pub(crate) fn new(profile: &ConfigProfile, values: Map<String, Value>, sources: Vec<PathBuf>) -> Self {
        Self {
            slug: profile.slug().to_string(),
            lock_path: profile.lock_path(),
            values,
            sources,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Where [`lock`](Self::lock) writes its snapshot.
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Files that contributed to this configuration, lowest priority first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Look up a nested value by dotted path, e.g. `server.port`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        parts.try_fold(self.values.get(first)?, |value, part| value.as_object()?.get(part))
    }

    /// Deserialize the value at `key` into `T`.
    ///
    /// Returns `Ok(None)` if the key is absent.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.values.get(key) {
            Some(value) => Ok(Some(<T as Deserialize>::deserialize(value)?)),
            None => Ok(None),
        }
    }

    /// Deserialize the whole mapping into a typed configuration struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let value = Value::Object(self.values.clone());
        Ok(serde_json::from_value(value)?)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.values()
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }

    /// Stage an in-memory value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }
}

impl<'a> IntoIterator for &'a ResolvedConfig {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
