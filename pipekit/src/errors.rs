//! Error types for pipekit.
//!
//! Four disjoint failure domains share one base type, [`PipelineError`], so
//! callers can handle "anything that went wrong building or running a
//! pipeline" uniformly while still matching on the specific kind.

use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed cause carried by errors that wrap a foreign failure.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for pipekit operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configuration document was missing or malformed.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// The plugin namespace could not be loaded or exposed an unusable registry.
    #[error("{0}")]
    Registry(#[from] RegistryError),

    /// One or more configured steps are absent from the registry.
    #[error("{0}")]
    Construction(#[from] PipelineConstructionError),

    /// A bound step failed while processing a value.
    #[error("{0}")]
    Execution(#[from] PipelineExecutionError),
}

impl PipelineError {
    /// Returns a stable, machine-readable code for the error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(err) => err.code(),
            Self::Registry(err) => err.code(),
            Self::Construction(err) => err.code(),
            Self::Execution(_) => "PIPELINE-EXECUTION",
        }
    }

    /// Returns a short name for the failure domain.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigurationError",
            Self::Registry(_) => "RegistryError",
            Self::Construction(_) => "PipelineConstructionError",
            Self::Execution(_) => "PipelineExecutionError",
        }
    }

    /// Converts to a dictionary representation for structured reporting.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.kind()));
        map.insert("code".to_string(), serde_json::json!(self.code()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));

        match self {
            Self::Registry(err) => {
                if let Some(namespace) = err.namespace() {
                    map.insert("namespace".to_string(), serde_json::json!(namespace));
                }
            }
            Self::Construction(PipelineConstructionError::MissingSteps {
                namespace,
                missing,
                ..
            }) => {
                map.insert("namespace".to_string(), serde_json::json!(namespace));
                map.insert("missing".to_string(), serde_json::json!(missing));
            }
            Self::Construction(PipelineConstructionError::Empty { namespace }) => {
                map.insert("namespace".to_string(), serde_json::json!(namespace));
            }
            Self::Execution(err) => {
                map.insert("step".to_string(), serde_json::json!(err.step));
                map.insert("index".to_string(), serde_json::json!(err.index));
                map.insert("cause".to_string(), serde_json::json!(err.source.to_string()));
            }
            Self::Config(_) => {}
        }

        map
    }
}

/// Errors raised while loading or validating a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Configuration file not found: {}", path.display())]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file {}: {source}", path.display())]
    Io {
        /// The path that was read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON.
    #[error("Configuration {origin} is not valid JSON: {source}")]
    Parse {
        /// Where the document came from.
        origin: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The top-level value is not an object.
    #[error("Configuration {origin} must be a JSON object, found {found}")]
    NotAnObject {
        /// Where the document came from.
        origin: String,
        /// The JSON type that was found instead.
        found: &'static str,
    },

    /// The `steps` key is absent.
    #[error("Configuration is missing required key 'steps'")]
    MissingSteps,

    /// The `steps` value is not an array.
    #[error("Configuration key 'steps' must be an array, found {found}")]
    StepsNotArray {
        /// The JSON type that was found instead.
        found: &'static str,
    },

    /// The `steps` array is empty.
    #[error("Configuration key 'steps' must contain at least one step")]
    EmptySteps,

    /// An entry of `steps` is not a non-empty string.
    #[error("Invalid step at index {index}: {reason}")]
    InvalidStep {
        /// Position of the offending entry.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    /// Returns a stable code for the error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "CONFIG-NOT-FOUND",
            Self::Io { .. } => "CONFIG-IO",
            Self::Parse { .. } => "CONFIG-PARSE",
            Self::NotAnObject { .. } => "CONFIG-NOT-OBJECT",
            Self::MissingSteps => "CONFIG-MISSING-STEPS",
            Self::StepsNotArray { .. } => "CONFIG-STEPS-NOT-ARRAY",
            Self::EmptySteps => "CONFIG-EMPTY-STEPS",
            Self::InvalidStep { .. } => "CONFIG-INVALID-STEP",
        }
    }
}

/// Errors raised while locating a namespace or validating its registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No namespace with this name is known to the loader.
    #[error("Plugin namespace '{namespace}' could not be found")]
    NamespaceNotFound {
        /// The namespace name.
        namespace: String,
    },

    /// The loader located the namespace but failed to load it.
    #[error("Plugin namespace '{namespace}' failed to load: {source}")]
    LoadFailed {
        /// The namespace name.
        namespace: String,
        /// The underlying failure.
        #[source]
        source: BoxedCause,
    },

    /// The namespace exposes neither a registry nor a registry factory.
    #[error("Plugin namespace '{namespace}' exposes neither a registry nor a registry factory")]
    NoRegistryExposed {
        /// The namespace name.
        namespace: String,
    },

    /// The namespace's registry factory failed.
    #[error("Registry factory of namespace '{namespace}' failed: {source}")]
    FactoryFailed {
        /// The namespace name.
        namespace: String,
        /// The underlying failure.
        #[source]
        source: BoxedCause,
    },

    /// A registry entry has an empty step name.
    #[error("Registry of namespace '{namespace}' has an empty step name at position {position}")]
    InvalidStepName {
        /// The namespace name.
        namespace: String,
        /// Position of the entry in the exposed registry.
        position: usize,
    },

    /// Two registry entries share the same step name.
    #[error("Registry of namespace '{namespace}' defines step '{name}' more than once")]
    DuplicateStepName {
        /// The namespace name.
        namespace: String,
        /// The duplicated step name.
        name: String,
    },
}

impl RegistryError {
    /// Creates a load failure from any error.
    pub fn load_failed(namespace: impl Into<String>, source: impl Into<BoxedCause>) -> Self {
        Self::LoadFailed {
            namespace: namespace.into(),
            source: source.into(),
        }
    }

    /// Returns the namespace the error relates to.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::NamespaceNotFound { namespace }
            | Self::LoadFailed { namespace, .. }
            | Self::NoRegistryExposed { namespace }
            | Self::FactoryFailed { namespace, .. }
            | Self::InvalidStepName { namespace, .. }
            | Self::DuplicateStepName { namespace, .. } => Some(namespace),
        }
    }

    /// Returns a stable code for the error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NamespaceNotFound { .. } => "REGISTRY-NOT-FOUND",
            Self::LoadFailed { .. } => "REGISTRY-LOAD-FAILED",
            Self::NoRegistryExposed { .. } => "REGISTRY-NOT-EXPOSED",
            Self::FactoryFailed { .. } => "REGISTRY-FACTORY-FAILED",
            Self::InvalidStepName { .. } => "REGISTRY-INVALID-NAME",
            Self::DuplicateStepName { .. } => "REGISTRY-DUPLICATE-NAME",
        }
    }
}

/// Errors raised while binding configured steps to a registry.
#[derive(Debug, Clone, Error)]
pub enum PipelineConstructionError {
    /// Some configured step names are not in the registry.
    #[error(
        "Namespace '{namespace}' is missing {} step(s): {} (available: {})",
        missing.len(),
        quote_all(missing),
        describe_available(available, *available_total)
    )]
    MissingSteps {
        /// The namespace that was searched.
        namespace: String,
        /// Every missing step name, in first-appearance order.
        missing: Vec<String>,
        /// A bounded, sorted preview of registered step names.
        available: Vec<String>,
        /// Total number of registered step names.
        available_total: usize,
    },

    /// No steps were given.
    #[error("Cannot build an empty pipeline for namespace '{namespace}'")]
    Empty {
        /// The namespace the pipeline was built against.
        namespace: String,
    },
}

impl PipelineConstructionError {
    /// Returns a stable code for the error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingSteps { .. } => "PIPELINE-MISSING-STEPS",
            Self::Empty { .. } => "PIPELINE-EMPTY",
        }
    }
}

fn quote_all(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_available(preview: &[String], total: usize) -> String {
    if total == 0 {
        return "none".to_string();
    }
    let mut out = preview.join(", ");
    if total > preview.len() {
        out.push_str(&format!(", ... and {} more", total - preview.len()));
    }
    out
}

/// Error raised when a bound step fails during execution.
#[derive(Debug, Error)]
#[error("Step '{step}' at index {index} failed: {source}")]
pub struct PipelineExecutionError {
    /// 0-based position of the failing step.
    pub index: usize,
    /// Name of the failing step.
    pub step: String,
    /// The failure reported by the step.
    #[source]
    pub source: BoxedCause,
}

impl PipelineExecutionError {
    /// Creates a new execution error.
    pub fn new(index: usize, step: impl Into<String>, source: impl Into<BoxedCause>) -> Self {
        Self {
            index,
            step: step.into(),
            source: source.into(),
        }
    }
}
