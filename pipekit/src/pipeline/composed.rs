//! The composed pipeline.

use crate::errors::PipelineExecutionError;
use crate::registry::StepFn;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::time::Instant;
use tracing::{debug, warn};

/// A step name bound to its callable.
#[derive(Clone)]
pub(crate) struct BoundStep {
    pub(crate) name: String,
    pub(crate) func: StepFn,
}

/// An immutable, ordered composition of bound steps.
///
/// Built once by [`PipelineBuilder`](super::PipelineBuilder); no name
/// lookups happen at execution time.
#[derive(Clone)]
pub struct Pipeline {
    namespace: String,
    steps: Vec<BoundStep>,
    built_at: DateTime<Utc>,
}

impl Pipeline {
    pub(crate) fn new(namespace: impl Into<String>, steps: Vec<BoundStep>) -> Self {
        Self {
            namespace: namespace.into(),
            steps,
            built_at: Utc::now(),
        }
    }

    /// Runs every step in order, feeding each the previous step's output.
    ///
    /// # Errors
    ///
    /// Returns an error naming the failing step and its 0-based index as soon
    /// as a step fails. Later steps do not run.
    pub fn apply(&self, input: Value) -> Result<Value, PipelineExecutionError> {
        let started = Instant::now();
        let mut value = input;

        for (index, step) in self.steps.iter().enumerate() {
            value = (step.func)(value).map_err(|source| {
                warn!(
                    namespace = %self.namespace,
                    step = %step.name,
                    index,
                    error = %source,
                    "Pipeline step failed"
                );
                PipelineExecutionError::new(index, step.name.as_str(), source)
            })?;
        }

        debug!(
            namespace = %self.namespace,
            steps = self.steps.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Pipeline applied"
        );
        Ok(value)
    }

    /// Runs the pipeline on a string input.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::apply`].
    pub fn apply_str(&self, input: &str) -> Result<Value, PipelineExecutionError> {
        self.apply(Value::String(input.to_string()))
    }

    /// Returns the namespace the steps were resolved from.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the step names in execution order.
    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.name.as_str())
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the pipeline has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns when the pipeline was built.
    #[must_use]
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("namespace", &self.namespace)
            .field("steps", &self.step_names().collect::<Vec<_>>())
            .field("built_at", &self.built_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::step_fn;
    use serde_json::json;
    use std::error::Error as _;

    fn bound(name: &str, func: StepFn) -> BoundStep {
        BoundStep {
            name: name.to_string(),
            func,
        }
    }

    fn append(suffix: &'static str) -> StepFn {
        step_fn(move |v| Ok(json!(format!("{}{suffix}", v.as_str().unwrap_or_default()))))
    }

    #[test]
    fn test_apply_runs_left_to_right() {
        let pipeline = Pipeline::new(
            "demo",
            vec![bound("a", append("a")), bound("b", append("b")), bound("c", append("c"))],
        );

        assert_eq!(pipeline.apply_str(">").unwrap(), json!(">abc"));
        assert_eq!(pipeline.step_names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_apply_reports_failing_step() {
        let failing = step_fn(|_| anyhow::bail!("refused"));
        let pipeline = Pipeline::new("demo", vec![bound("a", append("a")), bound("b", failing)]);

        let err = pipeline.apply_str("x").unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.step, "b");
        assert_eq!(err.source().unwrap().to_string(), "refused");
    }

    #[test]
    fn test_pipeline_is_reusable() {
        let pipeline = Pipeline::new("demo", vec![bound("a", append("!"))]);
        assert_eq!(pipeline.apply_str("one").unwrap(), json!("one!"));
        assert_eq!(pipeline.apply_str("two").unwrap(), json!("two!"));
        assert_eq!(pipeline.len(), 1);
        assert!(!pipeline.is_empty());
    }

    #[test]
    fn test_pipeline_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }
}
