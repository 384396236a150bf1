//! Pipeline builder with validation.

use super::composed::{BoundStep, Pipeline};
use crate::config::EngineSettings;
use crate::errors::PipelineConstructionError;
use crate::registry::Registry;
use std::collections::HashSet;
use tracing::debug;

/// Binds configured step names to registry callables.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    /// How many available names a missing-step report lists.
    preview_limit: usize,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            preview_limit: EngineSettings::default().available_preview_limit,
        }
    }
}

impl PipelineBuilder {
    /// Creates a builder with the preview limit of [`EngineSettings::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many available names a missing-step report lists.
    #[must_use]
    pub fn with_preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = limit;
        self
    }

    /// Builds a pipeline from a registry and an ordered step list.
    ///
    /// Every step is checked up front. If any are missing, all of them are
    /// reported together.
    ///
    /// # Errors
    ///
    /// Returns an error if the step list is empty or names steps the registry
    /// does not have.
    pub fn build(
        &self,
        namespace: &str,
        registry: &Registry,
        steps: &[String],
    ) -> Result<Pipeline, PipelineConstructionError> {
        if steps.is_empty() {
            return Err(PipelineConstructionError::Empty {
                namespace: namespace.to_string(),
            });
        }

        let mut seen = HashSet::new();
        let missing: Vec<String> = steps
            .iter()
            .filter(|name| !registry.contains(name))
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Err(PipelineConstructionError::MissingSteps {
                namespace: namespace.to_string(),
                missing,
                available: registry
                    .names()
                    .take(self.preview_limit)
                    .map(String::from)
                    .collect(),
                available_total: registry.len(),
            });
        }

        let bound = steps
            .iter()
            .filter_map(|name| {
                registry.get(name).map(|func| BoundStep {
                    name: name.clone(),
                    func: func.clone(),
                })
            })
            .collect::<Vec<_>>();

        debug!(namespace, steps = bound.len(), "Pipeline built");
        Ok(Pipeline::new(namespace, bound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{step_fn, RegistryEntries};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry(names: &[&str]) -> Registry {
        let entries = names
            .iter()
            .fold(RegistryEntries::new(), |acc, name| acc.with_step(*name, step_fn(Ok)));
        Registry::from_entries("test", entries).unwrap()
    }

    fn steps(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_build_success() {
        let pipeline = PipelineBuilder::new()
            .build("test", &registry(&["a", "b"]), &steps(&["b", "a", "b"]))
            .unwrap();

        assert_eq!(pipeline.len(), 3);
        assert_eq!(pipeline.namespace(), "test");
        assert_eq!(pipeline.step_names().collect::<Vec<_>>(), vec!["b", "a", "b"]);
    }

    #[test]
    fn test_build_reports_all_missing() {
        let err = PipelineBuilder::new()
            .build("test", &registry(&["a"]), &steps(&["x", "a", "y", "x"]))
            .unwrap_err();

        match err {
            PipelineConstructionError::MissingSteps {
                missing,
                available,
                available_total,
                ..
            } => {
                assert_eq!(missing, vec!["x".to_string(), "y".to_string()]);
                assert_eq!(available, vec!["a".to_string()]);
                assert_eq!(available_total, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_build_preview_is_bounded() {
        let err = PipelineBuilder::new()
            .with_preview_limit(2)
            .build("test", &registry(&["d", "c", "b", "a"]), &steps(&["zzz"]))
            .unwrap_err();

        assert!(err.to_string().contains("a, b, ... and 2 more"));
    }

    #[test]
    fn test_default_preview_limit_matches_settings() {
        let limit = EngineSettings::default().available_preview_limit;
        let names = (0..limit + 5).map(|i| format!("s{i:03}")).collect::<Vec<_>>();
        let names = names.iter().map(String::as_str).collect::<Vec<_>>();

        let err = PipelineBuilder::default()
            .build("test", &registry(&names), &steps(&["zzz"]))
            .unwrap_err();

        match err {
            PipelineConstructionError::MissingSteps {
                available,
                available_total,
                ..
            } => {
                assert_eq!(available.len(), limit);
                assert_eq!(available_total, limit + 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_build_empty() {
        let err = PipelineBuilder::new()
            .build("test", &registry(&["a"]), &[])
            .unwrap_err();
        assert_eq!(err.code(), "PIPELINE-EMPTY");
    }

    #[test]
    fn test_built_pipeline_runs_bound_steps() {
        let entries = RegistryEntries::new().with_fn("inc", |v| {
            Ok(json!(v.as_i64().unwrap_or_default() + 1))
        });
        let registry = Registry::from_entries("math", entries).unwrap();

        let pipeline = PipelineBuilder::new()
            .build("math", &registry, &steps(&["inc", "inc", "inc"]))
            .unwrap();
        assert_eq!(pipeline.apply(json!(0)).unwrap(), json!(3));
    }
}
