//! Pipeline building and execution.
//!
//! This module provides:
//! - The builder that binds configured step names to registry callables
//! - The composed [`Pipeline`] that runs the bound steps in order

mod builder;
mod composed;

pub use builder::PipelineBuilder;
pub use composed::Pipeline;
