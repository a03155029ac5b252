//! Eir error types

/// Eir error types
#[derive(Debug, thiserror::Error)]
pub enum EirError {
    // Per-request pipeline errors
    /// The text itself was rejected: empty, or refused by the tokenizer.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A loaded model failed at runtime: poisoned session lock, failed
    /// session run or unexpected output shape.
    #[error("inference error: {0}")]
    Inference(String),

    /// The classifier failed while running on an assembled vector.
    #[error("classification error: {0}")]
    Classification(String),

    // Configuration errors
    /// Width mismatch, label index out of range, bad config value.
    ///
    /// Never recoverable by retrying the same request.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// One of the startup artifacts (encoder, classifier, labels,
    /// precautions) could not be loaded.
    #[error("failed to load {resource}: {message}")]
    ResourceLoad {
        resource: &'static str,
        message: String,
    },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EirError {
    /// Build a [`EirError::ResourceLoad`] for the named artifact.
    pub fn resource_load(resource: &'static str, message: impl std::fmt::Display) -> Self {
        EirError::ResourceLoad {
            resource,
            message: message.to_string(),
        }
    }

    /// Whether the error was caused by the request content itself rather
    /// than by the service's artifacts or configuration.
    pub fn is_client_error(&self) -> bool {
        matches!(self, EirError::Encoding(_))
    }
}

/// Result type alias for Eir operations
pub type Result<T> = std::result::Result<T, EirError>;
