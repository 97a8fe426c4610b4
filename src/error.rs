//! Structured error types for configuration loading.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Violation codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    /// A required key is absent.
    MissingRequiredKey,
    /// A value has the wrong type and could not be coerced.
    InvalidType,
    /// A key is not declared by the schema and extra keys are rejected.
    ExtraKeyNotAllowed,
}

/// A single schema violation, addressed by its dotted key path.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Violation {
    pub code: ViolationCode,
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(code: ViolationCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn missing_key(path: &str) -> Self {
        Self::new(
            ViolationCode::MissingRequiredKey,
            path,
            format!("required key not provided @ {}", path),
        )
    }

    pub fn invalid_type(path: &str, expected: &str, found: &str) -> Self {
        Self::new(
            ViolationCode::InvalidType,
            path,
            format!("expected {} but found {} @ {}", expected, found, path),
        )
    }

    pub fn extra_key(path: &str) -> Self {
        Self::new(
            ViolationCode::ExtraKeyNotAllowed,
            path,
            format!("extra key not allowed @ {}", path),
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Every violation found in one validation pass.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ValidationErrors {
    pub violations: Vec<Violation>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Paths of all violations, in discovery order.
    pub fn paths(&self) -> Vec<&str> {
        self.iter().map(|v| v.path.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.iter().map(|v| v.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Errors raised while resolving, loading, validating or snapshotting a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("configuration failed validation ({count} violation(s)): {0}", count = .0.len())]
    Validation(ValidationErrors),

    #[error("lock file not found: {}", .path.display())]
    LockFileMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("failed to deserialize configuration value: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("invalid schema definition: {0}")]
    Schema(String),
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// The aggregated violations, if this is a validation failure.
    pub fn violations(&self) -> Option<&ValidationErrors> {
        match self {
            ConfigError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
