//! Declarative schema for validating merged configuration.
//!
//! A [`Schema`] lists the keys a mapping may contain, whether each is
//! required, and the type its value must have. Validation walks the whole
//! mapping and reports every violation at once instead of stopping at the
//! first one. Fields marked as coercible accept string spellings of numbers
//! and booleans, and scalars where a string is expected.
//!
//! Schemas can be built in code:
//!
//! ```
//! use cleanconfig::config::{Field, Kind, Schema};
//!
//! let schema = Schema::new()
//!     .required("key1", Kind::String)
//!     .field(Field::required("key2", Kind::Integer).coerce())
//!     .optional("server", Kind::Map(Schema::new().required("port", Kind::Integer)));
//! ```
//!
//! or loaded from a YAML description, see [`Schema::from_yaml_str`].

use crate::error::{ConfigError, Result, ValidationErrors, Violation};
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// What to do with keys the schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraKeys {
    /// Report each undeclared key as a violation.
    #[default]
    Reject,
    /// Keep undeclared keys unvalidated.
    Allow,
    /// Silently drop undeclared keys.
    Remove,
}

/// Expected type of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Any,
    String,
    Integer,
    Float,
    Bool,
    /// A sequence whose items all have the given kind.
    List(Box<Kind>),
    /// A nested mapping validated by its own schema.
    Map(Schema),
}

impl Kind {
    pub fn list_of(item: Kind) -> Self {
        Kind::List(Box::new(item))
    }

    fn name(&self) -> &'static str {
        match self {
            Kind::Any => "any",
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Bool => "boolean",
            Kind::List(_) => "list",
            Kind::Map(_) => "mapping",
        }
    }

    /// Check `value` against this kind, returning the (possibly coerced) value.
    ///
    /// Violations are pushed onto `errors`; `None` means the value was rejected.
    fn check(
        &self,
        value: Value,
        coerce: bool,
        path: &str,
        errors: &mut ValidationErrors,
    ) -> Option<Value> {
        let checked = match (self, value) {
            (Kind::Any, value) => Ok(value),
            (Kind::String, Value::String(s)) => Ok(Value::String(s)),
            (Kind::String, Value::Number(n)) if coerce => Ok(Value::String(n.to_string())),
            (Kind::String, Value::Bool(b)) if coerce => Ok(Value::String(b.to_string())),
            (Kind::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(Value::Number(n)),
            (Kind::Integer, Value::String(s)) if coerce => s
                .trim()
                .parse::<i64>()
                .map(|i| Value::Number(i.into()))
                .map_err(|_| Value::String(s)),
            (Kind::Float, Value::Number(n)) => Ok(Value::Number(n)),
            (Kind::Float, Value::String(s)) if coerce => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or(Value::String(s)),
            (Kind::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
            (Kind::Bool, Value::String(s)) if coerce => {
                parse_bool(&s).map(Value::Bool).ok_or(Value::String(s))
            }
            (Kind::List(item), Value::Array(items)) => {
                let checked = items
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, v)| item.check(v, coerce, &format!("{}[{}]", path, i), errors))
                    .collect();
                Ok(Value::Array(checked))
            }
            (Kind::Map(schema), Value::Object(map)) => {
                Ok(Value::Object(schema.validate_map(map, path, errors)))
            }
            (_, other) => Err(other),
        };

        match checked {
            Ok(value) => Some(value),
            Err(rejected) => {
                errors.push(Violation::invalid_type(path, self.name(), type_name(&rejected)));
                None
            }
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::List(item) => write!(f, "list of {}", item),
            other => write!(f, "{}", other.name()),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// A declared key.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub kind: Kind,
    pub required: bool,
    pub coerce: bool,
}

impl Field {
    pub fn required(key: impl Into<String>, kind: Kind) -> Self {
        Self {
            key: key.into(),
            kind,
            required: true,
            coerce: false,
        }
    }

    pub fn optional(key: impl Into<String>, kind: Kind) -> Self {
        Self {
            required: false,
            ..Self::required(key, kind)
        }
    }

    /// Accept string spellings of the declared type (and scalars for strings).
    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }
}

/// Declarative description of a configuration mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
    extra: ExtraKeys,
}

impl Schema {
    /// An empty schema that rejects every key.
    pub fn new() -> Self {
        Self::default()
    }

    /// A schema that accepts any mapping unchanged.
    pub fn permissive() -> Self {
        Self::new().extra(ExtraKeys::Allow)
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn required(self, key: impl Into<String>, kind: Kind) -> Self {
        self.field(Field::required(key, kind))
    }

    pub fn optional(self, key: impl Into<String>, kind: Kind) -> Self {
        self.field(Field::optional(key, kind))
    }

    pub fn extra(mut self, extra: ExtraKeys) -> Self {
        self.extra = extra;
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn extra_keys(&self) -> ExtraKeys {
        self.extra
    }

    /// Validate a mapping, returning the coerced mapping or every violation found.
    pub fn validate(&self, input: Map<String, Value>) -> std::result::Result<Map<String, Value>, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let output = self.validate_map(input, "", &mut errors);
        if errors.is_empty() {
            Ok(output)
        } else {
            Err(errors)
        }
    }

    fn validate_map(
        &self,
        mut input: Map<String, Value>,
        prefix: &str,
        errors: &mut ValidationErrors,
    ) -> Map<String, Value> {
        let mut output = Map::new();

        for field in &self.fields {
            let path = join_path(prefix, &field.key);
            match input.remove(&field.key) {
                Some(value) => {
                    if let Some(checked) = field.kind.check(value, field.coerce, &path, errors) {
                        output.insert(field.key.clone(), checked);
                    }
                }
                None if field.required => errors.push(Violation::missing_key(&path)),
                None => {}
            }
        }

        for (key, value) in input {
            match self.extra {
                ExtraKeys::Reject => errors.push(Violation::extra_key(&join_path(prefix, &key))),
                ExtraKeys::Allow => {
                    output.insert(key, value);
                }
                ExtraKeys::Remove => {}
            }
        }

        output
    }

    /// Parse a schema from its YAML description.
    ///
    /// ```yaml
    /// extra: reject          # reject | allow | remove
    /// fields:
    ///   name: { type: string, required: true }
    ///   port: { type: integer, coerce: true }
    ///   tags: { type: list, items: { type: string } }
    ///   server:
    ///     type: map
    ///     extra: allow
    ///     fields:
    ///       host: { type: string, required: true }
    /// ```
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let spec: SchemaSpec =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Schema(e.to_string()))?;
        spec.into_schema()
    }

    /// Read and parse a schema description from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_yaml_str(&content)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaSpec {
    #[serde(default)]
    extra: ExtraKeys,
    #[serde(default)]
    fields: BTreeMap<String, FieldSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindName {
    Any,
    String,
    Integer,
    Float,
    #[serde(alias = "bool")]
    Boolean,
    List,
    #[serde(alias = "mapping")]
    Map,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldSpec {
    #[serde(rename = "type")]
    kind: KindName,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    coerce: bool,
    items: Option<Box<FieldSpec>>,
    #[serde(default)]
    extra: ExtraKeys,
    fields: Option<BTreeMap<String, FieldSpec>>,
}

impl SchemaSpec {
    fn into_schema(self) -> Result<Schema> {
        build_schema(self.fields, self.extra)
    }
}

fn build_schema(fields: BTreeMap<String, FieldSpec>, extra: ExtraKeys) -> Result<Schema> {
    let mut schema = Schema::new().extra(extra);
    for (key, spec) in fields {
        let required = spec.required;
        let coerce = spec.coerce;
        let kind = spec
            .into_kind()
            .map_err(|e| ConfigError::Schema(format!("field '{}': {}", key, e)))?;
        schema = schema.field(Field {
            key,
            kind,
            required,
            coerce,
        });
    }
    Ok(schema)
}

impl FieldSpec {
    fn into_kind(self) -> std::result::Result<Kind, String> {
        match self.kind {
            KindName::Any => Ok(Kind::Any),
            KindName::String => Ok(Kind::String),
            KindName::Integer => Ok(Kind::Integer),
            KindName::Float => Ok(Kind::Float),
            KindName::Boolean => Ok(Kind::Bool),
            KindName::List => match self.items {
                Some(items) => Ok(Kind::list_of(items.into_kind()?)),
                None => Ok(Kind::list_of(Kind::Any)),
            },
            KindName::Map => {
                let fields = self.fields.unwrap_or_default();
                build_schema(fields, self.extra)
                    .map(Kind::Map)
                    .map_err(|e| e.to_string())
            }
        }
    }
}
