//! Step callables and registries.

use crate::errors::RegistryError;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// A registry-supplied transformation: one value in, one value out.
pub type StepFn = Arc<dyn Fn(Value) -> anyhow::Result<Value> + Send + Sync>;

/// Wraps a closure as a [`StepFn`].
pub fn step_fn<F>(func: F) -> StepFn
where
    F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
{
    Arc::new(func)
}

/// Unvalidated step entries as exposed by a namespace.
///
/// Entries keep their exposure order so validation errors can point at a
/// position.
#[derive(Clone, Default)]
pub struct RegistryEntries {
    entries: Vec<(String, StepFn)>,
}

impl RegistryEntries {
    /// Creates an empty set of entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a step.
    #[must_use]
    pub fn with_step(mut self, name: impl Into<String>, func: StepFn) -> Self {
        self.insert(name, func);
        self
    }

    /// Adds a step built from a closure.
    #[must_use]
    pub fn with_fn<F>(self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.with_step(name, step_fn(func))
    }

    /// Adds a step in place.
    pub fn insert(&mut self, name: impl Into<String>, func: StepFn) {
        self.entries.push((name.into(), func));
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, StepFn)> for RegistryEntries {
    fn from_iter<I: IntoIterator<Item = (String, StepFn)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for RegistryEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntries")
            .field("names", &self.entries.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .finish()
    }
}

/// A validated mapping from step name to callable.
#[derive(Clone, Default)]
pub struct Registry {
    steps: BTreeMap<String, StepFn>,
}

impl Registry {
    /// Validates exposed entries into a registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is empty or appears twice.
    pub fn from_entries(namespace: &str, entries: RegistryEntries) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        let mut steps = BTreeMap::new();

        for (position, (name, func)) in entries.entries.into_iter().enumerate() {
            if name.is_empty() {
                return Err(RegistryError::InvalidStepName {
                    namespace: namespace.to_string(),
                    position,
                });
            }
            if !seen.insert(name.clone()) {
                return Err(RegistryError::DuplicateStepName {
                    namespace: namespace.to_string(),
                    name,
                });
            }
            steps.insert(name, func);
        }

        Ok(Self { steps })
    }

    /// Looks up a step.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StepFn> {
        self.steps.get(name)
    }

    /// Returns true if the step is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }

    /// Returns the number of registered steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if no steps are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("steps", &self.steps.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity() -> StepFn {
        step_fn(Ok)
    }

    #[test]
    fn test_registry_from_entries() {
        let entries = RegistryEntries::new()
            .with_step("upper", identity())
            .with_step("strip", identity());

        let registry = Registry::from_entries("demo", entries).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("upper"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["strip", "upper"]);
    }

    #[test]
    fn test_registry_rejects_empty_name() {
        let entries = RegistryEntries::new()
            .with_step("ok", identity())
            .with_step("", identity());

        let err = Registry::from_entries("demo", entries).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidStepName { position: 1, .. }));
    }

    #[test]
    fn test_registry_accepts_whitespace_name() {
        let entries = RegistryEntries::new().with_step("  ", identity());

        let registry = Registry::from_entries("demo", entries).unwrap();
        assert!(registry.contains("  "));
    }

    #[test]
    fn test_registry_rejects_duplicate_name() {
        let entries = RegistryEntries::new()
            .with_step("upper", identity())
            .with_step("upper", identity());

        let err = Registry::from_entries("demo", entries).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateStepName { ref name, .. } if name == "upper"));
    }

    #[test]
    fn test_registered_step_is_callable() {
        let entries = RegistryEntries::new().with_fn("double", |v| {
            Ok(json!(v.as_i64().unwrap_or_default() * 2))
        });
        let registry = Registry::from_entries("math", entries).unwrap();

        let double = registry.get("double").unwrap();
        assert_eq!(double(json!(21)).unwrap(), json!(42));
    }

    #[test]
    fn test_empty_registry_is_valid() {
        let registry = Registry::from_entries("void", RegistryEntries::new()).unwrap();
        assert!(registry.is_empty());
    }
}
