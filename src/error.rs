//! Error types for the revealer extraction engine.
//!
//! Only startup errors are meant to halt a batch run. Everything raised while
//! processing a single sample is isolated by the engine and logged.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for revealer operations.
#[derive(Debug, Error)]
pub enum RevealerError {
    /// Configuration file missing, unreadable or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dataset root missing or not a directory
    #[error("Dataset root unusable: {}: {reason}", path.display())]
    DatasetRoot { path: PathBuf, reason: String },

    /// Sample larger than the configured read limit
    #[error("File too large: {found} bytes (limit {limit})")]
    FileTooLarge { limit: u64, found: u64 },

    /// Bytes do not match the format a provider targets
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A provider failed while extracting from a sample
    #[error("Extraction failed in {provider}: {message}")]
    Extraction { provider: String, message: String },

    /// Image encoding or construction errors
    #[error("Image error: {0}")]
    Image(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RevealerError {
    /// Shorthand for a provider failure.
    pub fn extraction(provider: impl Into<String>, message: impl Into<String>) -> Self {
        RevealerError::Extraction {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error must abort a run before any sample is processed.
    pub fn is_fatal_startup(&self) -> bool {
        matches!(
            self,
            RevealerError::Config(_) | RevealerError::DatasetRoot { .. }
        )
    }
}

impl From<serde_json::Error> for RevealerError {
    fn from(err: serde_json::Error) -> Self {
        RevealerError::Serialization(err.to_string())
    }
}

impl From<image::ImageError> for RevealerError {
    fn from(err: image::ImageError) -> Self {
        RevealerError::Image(err.to_string())
    }
}

/// Result type alias for revealer operations
pub type Result<T> = std::result::Result<T, RevealerError>;
