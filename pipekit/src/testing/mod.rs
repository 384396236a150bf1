//! Testing utilities for pipekit.
//!
//! This module provides:
//! - Loaders that count or forbid namespace loads
//! - A call log for observing which steps ran

mod loaders;
mod steps;

pub use loaders::{CountingLoader, ForbiddenLoader};
pub use steps::CallLog;
