//! Engine settings.

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured namespace.
pub const DEFAULT_NAMESPACE_ENV_VAR: &str = "PLUGINS_MODULE";

/// Namespace used when neither the environment nor the configuration names one.
pub const DEFAULT_NAMESPACE: &str = "plugins";

/// Settings that tune namespace resolution and caching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Environment variable consulted for a namespace override.
    #[serde(default = "default_namespace_env_var")]
    pub namespace_env_var: String,
    /// Namespace used when nothing else names one.
    #[serde(default = "default_namespace")]
    pub default_namespace: String,
    /// Maximum number of distinct namespaces whose registries stay cached.
    #[serde(default = "default_registry_cache_capacity")]
    pub registry_cache_capacity: usize,
    /// Maximum number of available step names shown in a missing-step report.
    #[serde(default = "default_available_preview_limit")]
    pub available_preview_limit: usize,
}

fn default_namespace_env_var() -> String {
    DEFAULT_NAMESPACE_ENV_VAR.to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_registry_cache_capacity() -> usize {
    32
}

fn default_available_preview_limit() -> usize {
    20
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            namespace_env_var: default_namespace_env_var(),
            default_namespace: default_namespace(),
            registry_cache_capacity: default_registry_cache_capacity(),
            available_preview_limit: default_available_preview_limit(),
        }
    }
}

impl EngineSettings {
    /// Creates settings with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses settings from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid JSON for this shape.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Sets the override environment variable name.
    #[must_use]
    pub fn with_namespace_env_var(mut self, name: impl Into<String>) -> Self {
        self.namespace_env_var = name.into();
        self
    }

    /// Sets the fallback namespace.
    #[must_use]
    pub fn with_default_namespace(mut self, name: impl Into<String>) -> Self {
        self.default_namespace = name.into();
        self
    }

    /// Sets the registry cache capacity. Zero is treated as one.
    #[must_use]
    pub fn with_registry_cache_capacity(mut self, capacity: usize) -> Self {
        self.registry_cache_capacity = capacity;
        self
    }

    /// Sets the preview limit for available step names.
    #[must_use]
    pub fn with_available_preview_limit(mut self, limit: usize) -> Self {
        self.available_preview_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.namespace_env_var, "PLUGINS_MODULE");
        assert_eq!(settings.default_namespace, "plugins");
        assert_eq!(settings.registry_cache_capacity, 32);
        assert_eq!(settings.available_preview_limit, 20);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = EngineSettings::from_json_str(r#"{"registry_cache_capacity": 4}"#).unwrap();
        assert_eq!(settings.registry_cache_capacity, 4);
        assert_eq!(settings.default_namespace, "plugins");
    }

    #[test]
    fn test_builder_methods() {
        let settings = EngineSettings::new()
            .with_namespace_env_var("APP_PLUGINS")
            .with_default_namespace("core")
            .with_available_preview_limit(5);
        assert_eq!(settings.namespace_env_var, "APP_PLUGINS");
        assert_eq!(settings.default_namespace, "core");
        assert_eq!(settings.available_preview_limit, 5);
    }
}
