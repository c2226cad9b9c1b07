use std::path::PathBuf;
use std::time::Duration;

/// Result type alias for kubeforge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of a failed leaf task.
///
/// Capability failures carry an operator-facing explanation that the failure
/// report surfaces ahead of the raw error chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFailureKind {
    Generic,
    CapabilityUnsupported,
}

/// Core error type for kubeforge operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two mutually exclusive inputs were given together
    #[error("{first} and {second} cannot be used at the same time")]
    ConfigurationConflict { first: String, second: String },

    /// The resolved control-plane version is too old for a requested feature
    #[error("{feature} requires Kubernetes version {required} or newer, but the cluster uses {actual}")]
    CapabilityUnsupported {
        feature: String,
        required: String,
        actual: String,
    },

    /// Imported or available infrastructure cannot satisfy the specification
    #[error("insufficient resources: {message}")]
    InsufficientResources { message: String },

    /// A single leaf task failed while a plan was executing
    #[error("task '{task}' failed: {source}")]
    TaskFailure {
        task: String,
        kind: TaskFailureKind,
        #[source]
        source: Box<Error>,
    },

    /// The specification is invalid on its own
    #[error("invalid cluster specification: {message}")]
    Validation { message: String },

    /// Generic configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// An external system call failed
    #[error("{operation} failed: {message}")]
    Provider { operation: String, message: String },

    /// Operation timeout errors
    #[error("operation '{operation}' timed out after {duration:?}")]
    Timeout { operation: String, duration: Duration },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization errors
    #[error("{format} error: {message}")]
    Serialization { format: String, message: String },
}

// Conversion implementations
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::serialization("JSON", error.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(error: serde_yaml::Error) -> Self {
        Error::serialization("YAML", error.to_string())
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create a configuration conflict naming both offending inputs
    #[must_use]
    pub fn conflict(first: impl Into<String>, second: impl Into<String>) -> Self {
        Error::ConfigurationConflict {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a capability error for a feature gated on a minimum version
    #[must_use]
    pub fn capability_unsupported(
        feature: impl Into<String>,
        required: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Error::CapabilityUnsupported {
            feature: feature.into(),
            required: required.into(),
            actual: actual.into(),
        }
    }

    /// Create an insufficient resources error
    #[must_use]
    pub fn insufficient_resources(message: impl Into<String>) -> Self {
        Error::InsufficientResources {
            message: message.into(),
        }
    }

    /// Wrap the error returned by a leaf task, tagging it with the task name.
    ///
    /// The failure kind is derived from the wrapped error so that capability
    /// errors stay distinguishable after aggregation.
    #[must_use]
    pub fn task_failure(task: impl Into<String>, source: Error) -> Self {
        let kind = match &source {
            Error::CapabilityUnsupported { .. } => TaskFailureKind::CapabilityUnsupported,
            Error::TaskFailure { kind, .. } => *kind,
            _ => TaskFailureKind::Generic,
        };
        Error::TaskFailure {
            task: task.into(),
            kind,
            source: Box::new(source),
        }
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create an external call error
    #[must_use]
    pub fn provider(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Provider {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a serialization error
    #[must_use]
    pub fn serialization(format: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Serialization {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Name of the task that produced this error, if it is a task failure
    pub fn task_name(&self) -> Option<&str> {
        match self {
            Error::TaskFailure { task, .. } => Some(task),
            _ => None,
        }
    }

    /// Whether this error (or the task failure wrapping it) is a capability gap
    pub fn is_capability_error(&self) -> bool {
        matches!(
            self,
            Error::CapabilityUnsupported { .. }
                | Error::TaskFailure {
                    kind: TaskFailureKind::CapabilityUnsupported,
                    ..
                }
        )
    }

    /// The operator-facing explanation of a capability gap
    pub fn capability_message(&self) -> Option<String> {
        match self {
            Error::CapabilityUnsupported { .. } => Some(self.to_string()),
            Error::TaskFailure {
                kind: TaskFailureKind::CapabilityUnsupported,
                source,
                ..
            } => source.capability_message(),
            _ => None,
        }
    }
}
