//! Step registries and namespace resolution.
//!
//! This module provides:
//! - Step callables and validated registries
//! - The namespace contract ([`ProvidesRegistry`]) and loaders
//! - Namespace resolution with a bounded registry cache

mod entries;
mod loader;
mod namespace;
mod resolver;

pub use entries::{step_fn, Registry, RegistryEntries, StepFn};
pub use loader::{NamespaceLoader, StaticNamespaceLoader};
#[cfg(test)]
pub use loader::MockNamespaceLoader;
pub use namespace::{Namespace, ProvidesRegistry, RegistryFactory};
pub use resolver::{resolve_namespace, NamespaceSource, RegistryResolver, ResolvedNamespace};
