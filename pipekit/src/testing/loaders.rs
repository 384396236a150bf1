//! Instrumented namespace loaders.

use crate::errors::RegistryError;
use crate::registry::{NamespaceLoader, ProvidesRegistry, StaticNamespaceLoader};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Wraps a static loader and counts how often each namespace is loaded.
#[derive(Debug, Default)]
pub struct CountingLoader {
    inner: StaticNamespaceLoader,
    calls: Mutex<HashMap<String, usize>>,
}

impl CountingLoader {
    /// Creates a counting loader around `inner`.
    #[must_use]
    pub fn new(inner: StaticNamespaceLoader) -> Self {
        Self {
            inner,
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Returns how often `namespace` was requested.
    #[must_use]
    pub fn calls(&self, namespace: &str) -> usize {
        self.calls.lock().get(namespace).copied().unwrap_or(0)
    }

    /// Returns the total number of load requests.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

impl NamespaceLoader for CountingLoader {
    fn load(&self, namespace: &str) -> Result<Arc<dyn ProvidesRegistry>, RegistryError> {
        *self.calls.lock().entry(namespace.to_string()).or_insert(0) += 1;
        self.inner.load(namespace)
    }
}

/// A loader that panics when used.
///
/// Proves a code path never reaches namespace loading.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForbiddenLoader;

impl NamespaceLoader for ForbiddenLoader {
    fn load(&self, namespace: &str) -> Result<Arc<dyn ProvidesRegistry>, RegistryError> {
        panic!("namespace '{namespace}' must not be loaded on this path");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryEntries;

    #[test]
    fn test_counting_loader_counts_failures_too() {
        let loader = CountingLoader::new(
            StaticNamespaceLoader::new().with_namespace("demo", RegistryEntries::new()),
        );

        assert!(loader.load("demo").is_ok());
        assert!(loader.load("ghost").is_err());
        assert!(loader.load("demo").is_ok());

        assert_eq!(loader.calls("demo"), 2);
        assert_eq!(loader.calls("ghost"), 1);
        assert_eq!(loader.total_calls(), 3);
    }

    #[test]
    #[should_panic(expected = "must not be loaded")]
    fn test_forbidden_loader_panics() {
        let _ = ForbiddenLoader.load("demo");
    }
}
