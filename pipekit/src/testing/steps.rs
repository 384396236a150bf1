//! Step helpers for tests.

use crate::registry::{step_fn, StepFn};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Shared record of which steps ran, in order.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps `func` so every invocation is recorded under `name` first.
    pub fn step<F>(&self, name: &str, func: F) -> StepFn
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        let calls = Arc::clone(&self.calls);
        let name = name.to_string();
        step_fn(move |value| {
            calls.lock().push(name.clone());
            func(value)
        })
    }

    /// Returns the recorded step names.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Clears the log.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_log_records_in_order() {
        let log = CallLog::new();
        let a = log.step("a", Ok);
        let b = log.step("b", Ok);

        b(json!(1)).unwrap();
        a(json!(1)).unwrap();
        assert_eq!(log.calls(), vec!["b", "a"]);

        log.reset();
        assert!(log.calls().is_empty());
    }
}
