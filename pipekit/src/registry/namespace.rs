//! The namespace contract.
//!
//! A namespace hands out its registry either directly or through a
//! zero-argument factory. Both forms go through [`ProvidesRegistry`] so the
//! resolver never needs to know which one it got.

use super::RegistryEntries;
use crate::errors::RegistryError;
use std::fmt;
use std::sync::Arc;

/// Zero-argument factory producing a namespace's registry.
pub type RegistryFactory = Arc<dyn Fn() -> anyhow::Result<RegistryEntries> + Send + Sync>;

/// Capability of producing a registry.
pub trait ProvidesRegistry: Send + Sync {
    /// Returns the registry entries exposed under `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if no registry is exposed or producing it fails.
    fn provide_registry(&self, namespace: &str) -> Result<RegistryEntries, RegistryError>;
}

impl ProvidesRegistry for RegistryEntries {
    fn provide_registry(&self, _namespace: &str) -> Result<RegistryEntries, RegistryError> {
        Ok(self.clone())
    }
}

/// A namespace exposing a direct registry, a factory, or neither.
///
/// When both are present the direct registry wins.
#[derive(Clone, Default)]
pub struct Namespace {
    registry: Option<RegistryEntries>,
    factory: Option<RegistryFactory>,
}

impl Namespace {
    /// Creates a namespace that exposes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a namespace exposing a direct registry.
    #[must_use]
    pub fn from_registry(entries: RegistryEntries) -> Self {
        Self::new().with_registry(entries)
    }

    /// Creates a namespace exposing a registry factory.
    #[must_use]
    pub fn from_factory<F>(factory: F) -> Self
    where
        F: Fn() -> anyhow::Result<RegistryEntries> + Send + Sync + 'static,
    {
        Self::new().with_factory(factory)
    }

    /// Sets the direct registry.
    #[must_use]
    pub fn with_registry(mut self, entries: RegistryEntries) -> Self {
        self.registry = Some(entries);
        self
    }

    /// Sets the registry factory.
    #[must_use]
    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> anyhow::Result<RegistryEntries> + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }
}

impl ProvidesRegistry for Namespace {
    fn provide_registry(&self, namespace: &str) -> Result<RegistryEntries, RegistryError> {
        if let Some(ref entries) = self.registry {
            return Ok(entries.clone());
        }

        match self.factory {
            Some(ref factory) => factory().map_err(|source| RegistryError::FactoryFailed {
                namespace: namespace.to_string(),
                source: source.into(),
            }),
            None => Err(RegistryError::NoRegistryExposed {
                namespace: namespace.to_string(),
            }),
        }
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("registry", &self.registry)
            .field("has_factory", &self.factory.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::step_fn;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entries() -> RegistryEntries {
        RegistryEntries::new().with_step("noop", step_fn(Ok))
    }

    #[test]
    fn test_direct_registry() {
        let provided = Namespace::from_registry(entries()).provide_registry("demo").unwrap();
        assert_eq!(provided.len(), 1);
    }

    #[test]
    fn test_factory_registry() {
        let provided = Namespace::from_factory(|| Ok(entries()))
            .provide_registry("demo")
            .unwrap();
        assert_eq!(provided.len(), 1);
    }

    #[test]
    fn test_direct_registry_wins_over_factory() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let namespace = Namespace::from_registry(entries()).with_factory(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(RegistryEntries::new())
        });

        assert_eq!(namespace.provide_registry("demo").unwrap().len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_nothing_exposed() {
        let err = Namespace::new().provide_registry("bare").unwrap_err();
        assert!(matches!(err, RegistryError::NoRegistryExposed { ref namespace } if namespace == "bare"));
    }

    #[test]
    fn test_factory_failure_is_chained() {
        let err = Namespace::from_factory(|| anyhow::bail!("database offline"))
            .provide_registry("remote")
            .unwrap_err();

        assert!(matches!(err, RegistryError::FactoryFailed { .. }));
        let cause = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(cause, Some("database offline".to_string()));
    }

    #[test]
    fn test_entries_provide_themselves() {
        assert_eq!(entries().provide_registry("any").unwrap().len(), 1);
    }
}
