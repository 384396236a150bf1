//! Configuration loading and engine settings.
//!
//! This module provides:
//! - Pipeline configuration documents and step validation
//! - Engine settings with serde defaults
//! - Environment lookup abstraction

mod document;
mod env;
mod settings;

pub use document::{json_kind, load_config, validate_steps, PipelineConfig};
pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use settings::{EngineSettings, DEFAULT_NAMESPACE, DEFAULT_NAMESPACE_ENV_VAR};
