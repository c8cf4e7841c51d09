//! Error types for the lifecycle orchestrator.

use thiserror::Error;

/// Error reported by a node collaborator.
///
/// Nodes own their failure modes; the orchestrator only needs something it
/// can log and surface, so the cause is kept as an opaque boxed error.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct NodeError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl NodeError {
    /// Create a node error with a plain message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a node error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Unrecoverable failures of a run.
///
/// Both variants end the run before it reaches the running state. Callers are
/// expected to terminate the process.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The process working directory could not be resolved.
    #[error("failed to resolve working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    /// The node collaborator failed to start.
    #[error("node startup failed: {0}")]
    NodeStartup(#[source] NodeError),
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;
