//! The pipeline cache and public entry point.

use super::CacheKey;
use crate::config::{load_config, validate_steps, EngineSettings, EnvSource, PipelineConfig};
use crate::errors::PipelineError;
use crate::pipeline::{Pipeline, PipelineBuilder};
use crate::registry::{NamespaceLoader, RegistryResolver};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Hit and miss counters of a [`PipelineCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that built a new pipeline.
    pub misses: u64,
    /// Pipelines currently cached.
    pub entries: usize,
}

/// Builds pipelines from configuration and memoizes them.
///
/// Configuration is always loaded and its steps validated. Only registry
/// loading and pipeline composition are skipped when the
/// `(namespace, steps)` key has been seen before.
pub struct PipelineCache {
    resolver: RegistryResolver,
    builder: PipelineBuilder,
    entries: Mutex<HashMap<CacheKey, Arc<Pipeline>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PipelineCache {
    /// Creates a cache with default settings.
    pub fn new(loader: Arc<dyn NamespaceLoader>) -> Self {
        Self::with_settings(loader, EngineSettings::default())
    }

    /// Creates a cache with the given settings.
    pub fn with_settings(loader: Arc<dyn NamespaceLoader>, settings: EngineSettings) -> Self {
        let builder = PipelineBuilder::new().with_preview_limit(settings.available_preview_limit);
        Self {
            resolver: RegistryResolver::new(loader, settings),
            builder,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Replaces the environment source used for namespace overrides.
    #[must_use]
    pub fn with_env(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.resolver = self.resolver.with_env(env);
        self
    }

    /// Returns the registry resolver.
    #[must_use]
    pub fn resolver(&self) -> &RegistryResolver {
        &self.resolver
    }

    /// Loads the configuration at `path` and returns its pipeline.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file is missing or malformed, a
    /// registry error if the namespace cannot be used, or a construction error
    /// if configured steps are missing from the registry.
    pub fn init_pipeline(&self, path: impl AsRef<Path>) -> Result<Arc<Pipeline>, PipelineError> {
        let config = load_config(path)?;
        self.init_pipeline_from_config(&config)
    }

    /// Returns the pipeline for an in-memory configuration.
    ///
    /// # Errors
    ///
    /// See [`PipelineCache::init_pipeline`].
    pub fn init_pipeline_from_config(
        &self,
        config: &PipelineConfig,
    ) -> Result<Arc<Pipeline>, PipelineError> {
        let steps = validate_steps(config)?;
        let namespace = self.resolver.namespace_for(config);
        let key = CacheKey::new(namespace.name, &steps);

        if let Some(pipeline) = self.entries.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, fingerprint = %key.fingerprint(), "Pipeline cache hit");
            return Ok(Arc::clone(pipeline));
        }

        let registry = self.resolver.load_registry(key.namespace())?;
        let pipeline = Arc::new(self.builder.build(key.namespace(), &registry, key.steps())?);

        Ok(self.publish(key, pipeline, config.origin()))
    }

    /// Stores a freshly built pipeline, or returns the entry a concurrent
    /// caller stored first. Either way the lookup was a miss.
    fn publish(&self, key: CacheKey, pipeline: Arc<Pipeline>, origin: &str) -> Arc<Pipeline> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.lock();
        if let Some(existing) = entries.get(&key) {
            debug!(key = %key, "Pipeline already published by another caller");
            return Arc::clone(existing);
        }
        info!(
            key = %key,
            fingerprint = %key.fingerprint(),
            origin,
            "Pipeline built and cached"
        );
        entries.insert(key, Arc::clone(&pipeline));
        pipeline
    }

    /// Drops every cached pipeline and every cached registry.
    pub fn clear(&self) {
        self.entries.lock().clear();
        self.resolver.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        debug!("Pipeline cache cleared");
    }

    /// Returns the number of cached pipelines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Returns the hit and miss counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl fmt::Debug for PipelineCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineCache")
            .field("resolver", &self.resolver)
            .field("stats", &self.stats())
            .finish()
    }
}
