//! Pipeline build cache.
//!
//! This module provides:
//! - The cache key (namespace plus ordered step names)
//! - [`PipelineCache`], the public entry point that ties configuration,
//!   namespace resolution and pipeline building together

mod key;
mod pipeline_cache;

pub use key::CacheKey;
pub use pipeline_cache::{CacheStats, PipelineCache};
