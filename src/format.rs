//! Output formatting for resolved configuration.

use anyhow::Result;
use serde::Serialize;

/// Output format for printed values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format '{}'. Valid options: yaml, json", s)),
        }
    }
}

impl OutputFormat {
    /// Render any serializable value. JSON output is pretty-printed; both end in a newline.
    pub fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let mut out = match self {
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
        };
        if !out.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    }
}

/// Render a single value for `get`: bare strings are printed unquoted.
pub fn render_value(value: &serde_json::Value, format: OutputFormat) -> Result<String> {
    match value {
        serde_json::Value::String(s) => Ok(format!("{}\n", s)),
        other => format.render(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_format() {
        assert_eq!("YAML".parse::<OutputFormat>(), Ok(OutputFormat::Yaml));
        assert_eq!("yml".parse::<OutputFormat>(), Ok(OutputFormat::Yaml));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("toml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render() {
        let value = json!({"key": 1});
        assert_eq!(OutputFormat::Yaml.render(&value).unwrap(), "key: 1\n");
        assert_eq!(
            OutputFormat::Json.render(&value).unwrap(),
            "{\n  \"key\": 1\n}\n"
        );
    }

    #[test]
    fn test_render_value_unquotes_strings() {
        assert_eq!(render_value(&json!("abc"), OutputFormat::Json).unwrap(), "abc\n");
        assert_eq!(render_value(&json!(3), OutputFormat::Yaml).unwrap(), "3\n");
    }
}
