//! Configuration loader with priority-ordered merging.
//!
//! Reads every existing candidate file, merges them field-by-field (later
//! files win), and validates the result against the profile's schema.

use super::merge::deep_merge_all;
use super::paths::SearchPaths;
use super::profile::ConfigProfile;
use super::resolved::ResolvedConfig;
use crate::error::{ConfigError, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Merged, not yet validated, contents of a set of candidate files.
#[derive(Debug, Clone, Default)]
pub struct MergedLayers {
    pub values: Map<String, Value>,
    /// Files that were found and read, lowest to highest priority.
    pub sources: Vec<PathBuf>,
}

/// Read one YAML file as a mapping.
///
/// Returns `Ok(None)` when the file does not exist. Anchors and `<<` merge
/// keys are expanded. An empty document is an empty mapping; any other
/// non-mapping document is a parse error, as is a file that is not UTF-8.
pub fn load_file(path: &Path) -> Result<Option<Map<String, Value>>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Config file not found, skipping");
            return Ok(None);
        }
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            return Err(ConfigError::parse(path, e));
        }
        Err(e) => return Err(ConfigError::io(path, e)),
    };

    let mut yaml: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::parse(path, e))?;
    yaml.apply_merge().map_err(|e| ConfigError::parse(path, e))?;
    let value = yaml_to_json(yaml, "").map_err(|e| ConfigError::parse(path, e))?;

    match value {
        Value::Object(map) => Ok(Some(map)),
        Value::Null => Ok(Some(Map::new())),
        other => Err(ConfigError::parse(
            path,
            format!(
                "top-level value must be a mapping, found {}",
                match other {
                    Value::Array(_) => "a sequence",
                    _ => "a scalar",
                }
            ),
        )),
    }
}

/// Convert a parsed YAML value into the JSON value model used for merging.
///
/// `at` is the dotted path of `yaml` inside the document. Scalar mapping keys
/// become strings; non-finite floats have no JSON form and are rejected.
fn yaml_to_json(yaml: serde_yaml::Value, at: &str) -> std::result::Result<Value, String> {
    use serde_yaml::Value as Yaml;

    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(b)),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| format!("unsupported non-finite float {} @ {}", n, at))
            }
        }
        Yaml::String(s) => Ok(Value::String(s)),
        Yaml::Sequence(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| yaml_to_json(item, &format!("{}[{}]", at, i)))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::Array),
        Yaml::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                let key = match key {
                    Yaml::String(s) => s,
                    Yaml::Bool(b) => b.to_string(),
                    Yaml::Number(n) => n.to_string(),
                    _ => return Err(format!("mapping keys must be scalars @ {}", at)),
                };
                let child = if at.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", at, key)
                };
                map.insert(key, yaml_to_json(value, &child)?);
            }
            Ok(Value::Object(map))
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value, at),
    }
}

/// Load and merge every existing file in `paths`, lowest priority first.
pub fn load_merged(paths: &SearchPaths) -> Result<MergedLayers> {
    let mut layers = Vec::new();
    let mut sources = Vec::new();

    for path in paths.iter() {
        if let Some(map) = load_file(path)? {
            debug!(path = %path.display(), keys = map.len(), "Loaded config file");
            layers.push(map);
            sources.push(path.to_path_buf());
        }
    }

    Ok(MergedLayers {
        values: deep_merge_all(layers),
        sources,
    })
}

impl ResolvedConfig {
    /// Load the profile from its environment-derived default paths.
    pub fn read(profile: &ConfigProfile) -> Result<Self> {
        Self::from_search_paths(profile, &SearchPaths::discover(profile))
    }

    /// Load the profile from an explicit path list (lowest to highest priority).
    pub fn from_paths<I, P>(profile: &ConfigProfile, paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::from_search_paths(profile, &SearchPaths::from_paths(paths))
    }

    /// Load, merge and validate the given candidate paths.
    pub fn from_search_paths(profile: &ConfigProfile, paths: &SearchPaths) -> Result<Self> {
        let layers = load_merged(paths)?;

        let values = profile.schema().validate(layers.values).map_err(|errors| {
            warn!(
                slug = profile.slug(),
                violations = errors.len(),
                "Configuration failed validation: {}",
                errors
            );
            ConfigError::Validation(errors)
        })?;

        debug!(
            slug = profile.slug(),
            sources = layers.sources.len(),
            keys = values.len(),
            "Resolved configuration"
        );

        Ok(Self::new(profile, values, layers.sources))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Kind, Schema};
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_file_missing_is_none() {
        let temp = TempDir::new().unwrap();
        assert!(load_file(&temp.path().join("nope.yml")).unwrap().is_none());
    }

    #[test]
    fn test_load_file_empty_is_empty_mapping() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "empty.yml", "# nothing here\n");
        assert_eq!(load_file(&path).unwrap(), Some(Map::new()));
    }

    #[test]
    fn test_load_file_rejects_non_mapping() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "list.yml", "- a\n- b\n");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("a sequence"));
    }

    #[test]
    fn test_malformed_yaml_names_the_file() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "bad.yml", "key: [unclosed\n");
        let err = load_file(&path).unwrap_err();
        match err {
            ConfigError::Parse { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn test_load_file_expands_anchors_and_merge_keys() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "anchors.yml",
            "defaults: &defaults\n  port: 80\n  host: localhost\nserver:\n  <<: *defaults\n  host: a\nbackup: *defaults\n",
        );
        let map = load_file(&path).unwrap().unwrap();
        assert_eq!(map["server"], json!({"port": 80, "host": "a"}));
        assert_eq!(map["backup"], json!({"port": 80, "host": "localhost"}));
    }

    #[test]
    fn test_load_file_rejects_non_finite_floats() {
        let temp = TempDir::new().unwrap();
        for (name, content, at) in [
            ("inf.yml", "ratio: .inf\n", "@ ratio"),
            ("neg.yml", "limits:\n  min: -.inf\n", "@ limits.min"),
            ("nan.yml", "samples: [1.5, .nan]\n", "@ samples[1]"),
        ] {
            let path = write(temp.path(), name, content);
            let err = load_file(&path).unwrap_err();
            assert!(matches!(err, ConfigError::Parse { .. }), "{name}: {err}");
            assert!(err.to_string().contains(at), "{name}: {err}");
        }
    }

    #[test]
    fn test_load_file_finite_floats_and_scalar_keys() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "f.yml", "ratio: 0.25\n8080: http\ntrue: yes\n");
        let map = load_file(&path).unwrap().unwrap();
        assert_eq!(map["ratio"], json!(0.25));
        assert_eq!(map["8080"], json!("http"));
        assert_eq!(map["true"], json!("yes"));
    }

    #[test]
    fn test_load_file_invalid_utf8_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("latin1.yml");
        std::fs::write(&path, b"name: caf\xe9\n").unwrap();
        let err = load_file(&path).unwrap_err();
        match err {
            ConfigError::Parse { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn test_load_merged_skips_missing_and_records_sources() {
        let temp = TempDir::new().unwrap();
        let a = write(&temp.path().join("a"), "c.yml", "key: 1\nserver: {host: a, port: 1}\n");
        let missing = temp.path().join("b").join("c.yml");
        let c = write(&temp.path().join("c"), "c.yml", "server: {port: 3}\n");

        let layers =
            load_merged(&SearchPaths::from_paths([a.clone(), missing, c.clone()])).unwrap();
        assert_eq!(layers.sources, vec![a, c]);
        assert_eq!(
            Value::Object(layers.values),
            json!({"key": 1, "server": {"host": "a", "port": 3}})
        );
    }

    #[test]
    fn test_parse_error_aborts_merge() {
        let temp = TempDir::new().unwrap();
        let good = write(temp.path(), "good.yml", "key: 1\n");
        let bad = write(temp.path(), "bad.yml", "key: {unclosed: [1, 2\n");
        let result = load_merged(&SearchPaths::from_paths([good, bad]));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_from_paths_validates() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "c.yml", "key1: one\nkey2: 2\n");
        let profile = ConfigProfile::new("c").with_schema(
            Schema::new()
                .required("key1", Kind::String)
                .required("key2", Kind::Integer),
        );

        let config = ResolvedConfig::from_paths(&profile, [&path]).unwrap();
        assert_eq!(config.get("key1"), Some(&json!("one")));
        assert_eq!(config.sources(), &[path]);

        let strict = ConfigProfile::new("c")
            .with_schema(Schema::new().required("key1", Kind::Integer));
        let err = ResolvedConfig::from_paths(&strict, [temp.path().join("c.yml")]).unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.paths(), vec!["key1", "key2"]);
    }
}
