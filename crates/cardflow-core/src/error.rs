use thiserror::Error;

/// Core error type for the Cardflow engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Connection not found
    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referential integrity error
    #[error("Reference error: {0}")]
    Reference(String),

    /// Snapshot storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Input/output error
    #[error("Input/output error: {0}")]
    Io(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for FlowError {
    fn from(err: serde_json::Error) -> Self {
        FlowError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for FlowError {
    fn from(err: std::io::Error) -> Self {
        FlowError::Io(err.to_string())
    }
}

impl From<String> for FlowError {
    fn from(err: String) -> Self {
        FlowError::Other(err)
    }
}

impl From<&str> for FlowError {
    fn from(err: &str) -> Self {
        FlowError::Other(err.to_string())
    }
}
