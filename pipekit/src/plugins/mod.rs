//! Built-in plugin namespace.
//!
//! The default namespace, `plugins`, ships a handful of text steps so a
//! configuration that names no module still has something to run.

mod text;

use crate::registry::{step_fn, Namespace, RegistryEntries};

pub use text::{count_word_frequencies, lower, strip, upper, word_frequencies};

/// Name of the built-in namespace.
pub const NAMESPACE: &str = "plugins";

/// Returns the built-in step entries.
#[must_use]
pub fn registry() -> RegistryEntries {
    RegistryEntries::new()
        .with_step("strip", step_fn(strip))
        .with_step("upper", step_fn(upper))
        .with_step("lower", step_fn(lower))
        .with_step("word_frequencies", step_fn(word_frequencies))
}

/// Returns the built-in namespace, exposed through a factory.
#[must_use]
pub fn namespace() -> Namespace {
    Namespace::from_factory(|| Ok(registry()))
}
