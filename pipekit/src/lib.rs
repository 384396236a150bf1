//! # Pipekit
//!
//! Configuration-driven pipeline construction and execution.
//!
//! A JSON configuration names an ordered list of steps and, optionally, the
//! plugin namespace that supplies them. Pipekit:
//!
//! - **Loads configuration**: parses the document and validates `steps`
//! - **Resolves the namespace**: environment override, then `module`, then `plugins`
//! - **Loads the registry**: through a pluggable [`NamespaceLoader`](registry::NamespaceLoader)
//! - **Builds the pipeline**: binds every step up front and reports all missing names
//! - **Memoizes**: identical `(namespace, steps)` keys share one built pipeline
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pipekit::prelude::*;
//! use std::sync::Arc;
//!
//! let loader = StaticNamespaceLoader::with_builtin_plugins().with_namespace(
//!     "demo",
//!     RegistryEntries::new()
//!         .with_fn("strip", pipekit::plugins::strip)
//!         .with_fn("upper", pipekit::plugins::upper),
//! );
//!
//! let cache = PipelineCache::new(Arc::new(loader));
//! let pipeline = cache.init_pipeline("pipeline.json")?;
//! let output = pipeline.apply_str("  hello world  ")?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cache;
pub mod config;
pub mod errors;
pub mod observability;
pub mod pipeline;
pub mod plugins;
pub mod registry;
pub mod testing;


/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cache::{CacheKey, CacheStats, PipelineCache};
    pub use crate::config::{
        load_config, validate_steps, EngineSettings, EnvSource, MapEnv, PipelineConfig,
        ProcessEnv,
    };
    pub use crate::errors::{
        ConfigError, PipelineConstructionError, PipelineError, PipelineExecutionError,
        RegistryError,
    };
    pub use crate::pipeline::{Pipeline, PipelineBuilder};
    pub use crate::registry::{
        resolve_namespace, step_fn, Namespace, NamespaceLoader, ProvidesRegistry, Registry,
        RegistryEntries, RegistryResolver, StaticNamespaceLoader, StepFn,
    };
}
