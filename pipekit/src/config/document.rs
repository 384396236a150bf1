//! Pipeline configuration documents.

use crate::errors::ConfigError;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Key holding the ordered step names.
pub const STEPS_KEY: &str = "steps";

/// Key holding the optional namespace name.
pub const MODULE_KEY: &str = "module";

/// A parsed pipeline configuration document.
///
/// Only `steps` and `module` are interpreted; any other key is kept but
/// ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    document: Map<String, Value>,
    origin: String,
}

impl PipelineConfig {
    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid JSON or the top-level
    /// value is not an object.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Self::parse(raw, "<inline>")
    }

    /// Builds a configuration from an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        Self::from_value_with_origin(value, "<inline>")
    }

    fn parse(raw: &str, origin: impl Into<String>) -> Result<Self, ConfigError> {
        let origin = origin.into();
        let value: Value = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            origin: origin.clone(),
            source,
        })?;
        Self::from_value_with_origin(value, origin)
    }

    fn from_value_with_origin(value: Value, origin: impl Into<String>) -> Result<Self, ConfigError> {
        let origin = origin.into();
        match value {
            Value::Object(document) => Ok(Self { document, origin }),
            other => Err(ConfigError::NotAnObject {
                origin,
                found: json_kind(&other),
            }),
        }
    }

    /// Returns where the document came from (a file path or `<inline>`).
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the raw value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    /// Returns the configured namespace, if it is a string.
    ///
    /// A non-string `module` value is treated as absent.
    #[must_use]
    pub fn module(&self) -> Option<&str> {
        match self.document.get(MODULE_KEY)? {
            Value::String(name) => Some(name.as_str()),
            other => {
                warn!(
                    origin = %self.origin,
                    found = json_kind(other),
                    "Ignoring non-string 'module' value"
                );
                None
            }
        }
    }

    /// Returns the validated step list.
    ///
    /// # Errors
    ///
    /// See [`validate_steps`].
    pub fn steps(&self) -> Result<Vec<String>, ConfigError> {
        validate_steps(self)
    }
}

/// Loads a configuration document from disk.
///
/// # Errors
///
/// Returns an error if the file does not exist or cannot be read, is not
/// valid JSON, or does not hold a JSON object.
pub fn load_config(path: impl AsRef<Path>) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let config = PipelineConfig::parse(&raw, path.display().to_string())?;
    debug!(path = %path.display(), keys = config.document.len(), "Loaded pipeline configuration");
    Ok(config)
}

/// Validates and returns the `steps` of a configuration.
///
/// # Errors
///
/// Returns an error if `steps` is absent, not an array, empty, or holds an
/// entry that is not a non-empty string. The error names the offending index.
pub fn validate_steps(config: &PipelineConfig) -> Result<Vec<String>, ConfigError> {
    let raw = config.get(STEPS_KEY).ok_or(ConfigError::MissingSteps)?;
    let entries = raw.as_array().ok_or(ConfigError::StepsNotArray {
        found: json_kind(raw),
    })?;

    if entries.is_empty() {
        return Err(ConfigError::EmptySteps);
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::String(name) if name.is_empty() => Err(ConfigError::InvalidStep {
                index,
                reason: "step name is an empty string".to_string(),
            }),
            Value::String(name) => Ok(name.clone()),
            other => Err(ConfigError::InvalidStep {
                index,
                reason: format!("expected a string, found {}", json_kind(other)),
            }),
        })
        .collect()
}

/// Returns a human readable name for a JSON value's type.
#[must_use]
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
