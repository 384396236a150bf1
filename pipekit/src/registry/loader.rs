//! Namespace loaders.

use super::ProvidesRegistry;
use crate::errors::RegistryError;
use crate::plugins;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Locates a namespace by name.
///
/// Implementations decide how namespaces are found: a statically linked
/// table, a dynamic library, a remote fetch, an embedded map.
#[cfg_attr(test, mockall::automock)]
pub trait NamespaceLoader: Send + Sync {
    /// Loads the namespace called `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NamespaceNotFound`] if the name is unknown,
    /// or [`RegistryError::LoadFailed`] if locating it failed.
    fn load(&self, namespace: &str) -> Result<Arc<dyn ProvidesRegistry>, RegistryError>;
}

/// A loader backed by a fixed table of namespaces.
#[derive(Clone, Default)]
pub struct StaticNamespaceLoader {
    namespaces: HashMap<String, Arc<dyn ProvidesRegistry>>,
}

impl StaticNamespaceLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader that already knows the built-in `plugins` namespace.
    #[must_use]
    pub fn with_builtin_plugins() -> Self {
        Self::new().with_namespace(plugins::NAMESPACE, plugins::namespace())
    }

    /// Adds a namespace.
    #[must_use]
    pub fn with_namespace(mut self, name: impl Into<String>, provider: impl ProvidesRegistry + 'static) -> Self {
        self.register(name, provider);
        self
    }

    /// Adds a namespace in place, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, provider: impl ProvidesRegistry + 'static) {
        self.namespaces.insert(name.into(), Arc::new(provider));
    }

    /// Returns the known namespace names, sorted.
    #[must_use]
    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.namespaces.keys().cloned().collect();
        names.sort();
        names
    }
}

impl NamespaceLoader for StaticNamespaceLoader {
    fn load(&self, namespace: &str) -> Result<Arc<dyn ProvidesRegistry>, RegistryError> {
        self.namespaces
            .get(namespace)
            .cloned()
            .ok_or_else(|| RegistryError::NamespaceNotFound {
                namespace: namespace.to_string(),
            })
    }
}

impl fmt::Debug for StaticNamespaceLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticNamespaceLoader")
            .field("namespaces", &self.namespaces())
            .finish()
    }
}
