//! Client-side config file validation.
//!
//! Files are checked before upload to give immediate feedback. The check is
//! purely syntactic; the backend performs the authoritative validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::value::ConfigValue;

/// Declared format of an uploaded config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Resolves a format from a (case-insensitive) extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Returns the text after the last `.` of a file name, lower-cased.
///
/// A name without a dot yields the whole name.
pub fn file_extension(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    base.rsplit('.').next().unwrap_or(base).to_ascii_lowercase()
}

/// A selected file: its name and raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    name: String,
    content: Vec<u8>,
}

impl ConfigFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Format declared by the file name, if recognized.
    pub fn format(&self) -> Option<ConfigFormat> {
        ConfigFormat::from_extension(&file_extension(&self.name))
    }
}

/// A successfully parsed config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedConfig {
    pub format: ConfigFormat,
    pub value: ConfigValue,
}

/// Reason a selected file was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("Unsupported file format. Please upload JSON or YAML files.")]
    UnsupportedFormat { extension: String },

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid YAML: {0}")]
    InvalidYaml(String),

    #[error("Unable to read file: {0}")]
    Unreadable(String),
}

impl ParseFailure {
    /// Message suitable for showing next to the file picker.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Result of validating a selected file.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Success(ParsedConfig),
    Failure(ParseFailure),
}

impl ValidationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn parsed(&self) -> Option<&ParsedConfig> {
        match self {
            Self::Success(parsed) => Some(parsed),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ParseFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<ParsedConfig, ParseFailure> {
        match self {
            Self::Success(parsed) => Ok(parsed),
            Self::Failure(failure) => Err(failure),
        }
    }
}

impl From<Result<ParsedConfig, ParseFailure>> for ValidationOutcome {
    fn from(result: Result<ParsedConfig, ParseFailure>) -> Self {
        match result {
            Ok(parsed) => Self::Success(parsed),
            Err(failure) => Self::Failure(failure),
        }
    }
}

/// Parses a selected file according to its extension.
///
/// The extension is checked before the content is looked at, so an
/// unsupported name fails the same way whatever the file holds.
pub fn parse_config_file(file: &ConfigFile) -> ValidationOutcome {
    let outcome: ValidationOutcome = parse_inner(file).into();
    match &outcome {
        ValidationOutcome::Success(parsed) => tracing::debug!(
            file = file.name(),
            format = %parsed.format,
            kind = parsed.value.kind(),
            "config file validated"
        ),
        ValidationOutcome::Failure(failure) => {
            tracing::debug!(file = file.name(), error = %failure, "config file rejected")
        }
    }
    outcome
}

fn parse_inner(file: &ConfigFile) -> Result<ParsedConfig, ParseFailure> {
    let extension = file_extension(file.name());
    let format = ConfigFormat::from_extension(&extension)
        .ok_or(ParseFailure::UnsupportedFormat { extension })?;

    let text = std::str::from_utf8(file.bytes())
        .map_err(|e| ParseFailure::Unreadable(format!("file is not valid UTF-8 ({e})")))?;

    let value = match format {
        ConfigFormat::Json => parse_json(text)?,
        ConfigFormat::Yaml => parse_yaml(text)?,
    };

    Ok(ParsedConfig { format, value })
}

/// Strict JSON parse of a whole document.
pub fn parse_json(text: &str) -> Result<ConfigValue, ParseFailure> {
    serde_json::from_str::<serde_json::Value>(text)
        .map(ConfigValue::from)
        .map_err(|e| ParseFailure::InvalidJson(e.to_string()))
}

/// Single-document YAML parse.
pub fn parse_yaml(text: &str) -> Result<ConfigValue, ParseFailure> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| ParseFailure::InvalidYaml(e.to_string()))?;
    ConfigValue::try_from_yaml(yaml).map_err(ParseFailure::InvalidYaml)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content: &str) -> ConfigFile {
        ConfigFile::new(name, content.as_bytes().to_vec())
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("config.json"), "json");
        assert_eq!(file_extension("Config.YML"), "yml");
        assert_eq!(file_extension("archive.tar.yaml"), "yaml");
        assert_eq!(file_extension("Makefile"), "makefile");
        assert_eq!(file_extension("dir.d/settings"), "settings");
        assert_eq!(file_extension(".json"), "json");
    }

    #[test]
    fn test_parse_valid_json() {
        let outcome = parse_config_file(&file("x.json", r#"{"a": 1, "b": [true, null]}"#));
        let parsed = outcome.parsed().expect("json should parse");

        assert_eq!(parsed.format, ConfigFormat::Json);
        let expected: serde_json::Value = serde_json::json!({"a": 1, "b": [true, null]});
        assert_eq!(parsed.value, ConfigValue::from(expected));
    }

    #[test]
    fn test_parse_invalid_json() {
        let outcome = parse_config_file(&file("x.json", "{ invalid json"));
        match outcome {
            ValidationOutcome::Failure(ParseFailure::InvalidJson(message)) => {
                assert!(!message.is_empty());
            }
            other => panic!("Expected InvalidJson, got {other:?}"),
        }
    }

    #[test]
    fn test_json_rejects_trailing_comma() {
        let outcome = parse_config_file(&file("x.json", r#"{"a": 1,}"#));
        assert!(matches!(
            outcome.failure(),
            Some(ParseFailure::InvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_yaml_with_both_extensions() {
        for name in ["svc.yaml", "svc.yml", "SVC.YAML"] {
            let outcome = parse_config_file(&file(name, "server:\n  port: 8080\n  hosts: [a, b]\n"));
            let parsed = outcome.parsed().expect("yaml should parse");
            assert_eq!(parsed.format, ConfigFormat::Yaml);
            assert_eq!(
                parsed
                    .value
                    .get("server")
                    .and_then(|s| s.get("port"))
                    .and_then(ConfigValue::as_i64),
                Some(8080)
            );
        }
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let outcome = parse_config_file(&file("x.yaml", "key: [unclosed"));
        match outcome.failure() {
            Some(ParseFailure::InvalidYaml(message)) => assert!(!message.is_empty()),
            other => panic!("Expected InvalidYaml, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_wide_object() {
        let width = 80_000;
        let json = format!(
            "{{{}}}",
            (0..width)
                .map(|i| format!("\"key{i}\":{i}"))
                .collect::<Vec<_>>()
                .join(",")
        );
        let yaml: String = (0..width).map(|i| format!("key{i}: {i}\n")).collect();

        for outcome in [
            parse_config_file(&file("wide.json", &json)),
            parse_config_file(&file("wide.yaml", &yaml)),
        ] {
            let parsed = outcome.parsed().expect("wide object should parse");
            let map = parsed.value.as_map().expect("top level is a map");
            assert_eq!(map.len(), width);
            assert_eq!(map.keys().last(), Some("key79999"));
            assert_eq!(map.get("key40000").and_then(ConfigValue::as_i64), Some(40_000));
        }
    }

    #[test]
    fn test_multi_document_yaml_rejected() {
        let outcome = parse_config_file(&file("x.yml", "a: 1\n---\nb: 2\n"));
        assert!(matches!(
            outcome.failure(),
            Some(ParseFailure::InvalidYaml(_))
        ));
    }

    #[test]
    fn test_unsupported_extension_ignores_content() {
        for name in ["config.txt", "config.toml", "config", "config.json.bak"] {
            let outcome = parse_config_file(&file(name, r#"{"a": 1}"#));
            assert!(
                matches!(
                    outcome.failure(),
                    Some(ParseFailure::UnsupportedFormat { .. })
                ),
                "{name} should be unsupported"
            );
        }
    }

    #[test]
    fn test_non_utf8_content() {
        let outcome = parse_config_file(&ConfigFile::new("x.json", vec![0xff, 0xfe, 0x00]));
        assert!(matches!(
            outcome.failure(),
            Some(ParseFailure::Unreadable(_))
        ));
    }

    #[test]
    fn test_failure_messages_are_prefixed() {
        let json = parse_config_file(&file("a.json", "nope")).into_result().unwrap_err();
        assert!(json.message().starts_with("Invalid JSON: "));

        let yaml = parse_config_file(&file("a.yml", "a: b: c")).into_result().unwrap_err();
        assert!(yaml.message().starts_with("Invalid YAML: "));

        let unsupported = parse_config_file(&file("a.ini", "")).into_result().unwrap_err();
        assert_eq!(
            unsupported.message(),
            "Unsupported file format. Please upload JSON or YAML files."
        );
    }
}
