//! Namespace resolution and registry caching.

use super::{NamespaceLoader, Registry};
use crate::config::{EngineSettings, EnvSource, PipelineConfig, ProcessEnv};
use crate::errors::RegistryError;
use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

/// Where a resolved namespace name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceSource {
    /// The override environment variable.
    Environment,
    /// The configuration's `module` key.
    Config,
    /// The fallback default.
    Default,
}

impl fmt::Display for NamespaceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Environment => "environment",
            Self::Config => "config",
            Self::Default => "default",
        };
        write!(f, "{s}")
    }
}

/// A namespace name together with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNamespace {
    /// The namespace name.
    pub name: String,
    /// Where the name came from.
    pub source: NamespaceSource,
}

/// Picks the namespace for a configuration.
///
/// A non-empty environment value wins; then a non-empty `module` from the
/// configuration; then `default`. Never fails.
#[must_use]
pub fn resolve_namespace(
    config: &PipelineConfig,
    env_value: Option<&str>,
    default: &str,
) -> ResolvedNamespace {
    if let Some(name) = env_value.filter(|v| !v.is_empty()) {
        return ResolvedNamespace {
            name: name.to_string(),
            source: NamespaceSource::Environment,
        };
    }

    if let Some(name) = config.module().filter(|v| !v.is_empty()) {
        return ResolvedNamespace {
            name: name.to_string(),
            source: NamespaceSource::Config,
        };
    }

    ResolvedNamespace {
        name: default.to_string(),
        source: NamespaceSource::Default,
    }
}

/// Resolves namespaces and loads their registries.
///
/// Validated registries are kept in an LRU cache keyed by namespace name.
/// The loader is never called while the cache lock is held.
pub struct RegistryResolver {
    loader: Arc<dyn NamespaceLoader>,
    env: Arc<dyn EnvSource>,
    settings: EngineSettings,
    cache: Mutex<LruCache<String, Arc<Registry>>>,
}

impl RegistryResolver {
    /// Creates a resolver reading the process environment.
    pub fn new(loader: Arc<dyn NamespaceLoader>, settings: EngineSettings) -> Self {
        let capacity =
            NonZeroUsize::new(settings.registry_cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            loader,
            env: Arc::new(ProcessEnv),
            settings,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Replaces the environment source.
    #[must_use]
    pub fn with_env(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = env;
        self
    }

    /// Returns the settings in use.
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Resolves the namespace for a configuration using the current environment.
    #[must_use]
    pub fn namespace_for(&self, config: &PipelineConfig) -> ResolvedNamespace {
        let env_value = self.env.var(&self.settings.namespace_env_var);
        let resolved = resolve_namespace(
            config,
            env_value.as_deref(),
            &self.settings.default_namespace,
        );
        debug!(
            namespace = %resolved.name,
            source = %resolved.source,
            "Resolved plugin namespace"
        );
        resolved
    }

    /// Returns the validated registry of a namespace, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace cannot be found or loaded, exposes no
    /// registry, its factory fails, or the registry is malformed. Failures are
    /// not cached.
    pub fn load_registry(&self, namespace: &str) -> Result<Arc<Registry>, RegistryError> {
        if let Some(registry) = self.cache.lock().get(namespace) {
            debug!(namespace, "Registry cache hit");
            return Ok(Arc::clone(registry));
        }

        debug!(namespace, "Registry cache miss, loading namespace");
        let provider = self.loader.load(namespace)?;
        let entries = provider.provide_registry(namespace)?;
        let registry = Arc::new(Registry::from_entries(namespace, entries)?);

        let mut cache = self.cache.lock();
        if let Some(existing) = cache.get(namespace) {
            return Ok(Arc::clone(existing));
        }
        if let Some((evicted, _)) = cache.push(namespace.to_string(), Arc::clone(&registry)) {
            debug!(evicted = %evicted, "Evicted least recently used registry");
        }
        debug!(namespace, steps = registry.len(), "Registry loaded");

        Ok(registry)
    }

    /// Returns true if the namespace's registry is cached.
    #[must_use]
    pub fn is_cached(&self, namespace: &str) -> bool {
        self.cache.lock().contains(namespace)
    }

    /// Returns the number of cached registries.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Drops every cached registry.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }
}

impl fmt::Debug for RegistryResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryResolver")
            .field("env", &self.env)
            .field("settings", &self.settings)
            .field("cached", &self.cached_len())
            .finish()
    }
}
