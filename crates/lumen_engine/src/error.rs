//! Unified error types for lumen_engine

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for lumen operations
#[derive(Debug, Error)]
pub enum EngineError {
    // === History Errors ===
    #[error("No image is open")]
    NoImage,

    #[error("Nothing to undo")]
    EmptyHistory,

    #[error("Nothing to redo")]
    EmptyRedo,

    #[error("An operation recorder is active")]
    RecordingInProgress,

    // === Operation Errors ===
    #[error("Invalid parameter '{name}': {message}")]
    Parameter { name: &'static str, message: String },

    #[error("Invalid geometry for '{parameter}': {message}")]
    Geometry { parameter: &'static str, message: String },

    // === Persistence Errors ===
    #[error("Failed to persist '{path}': {message}")]
    Persistence { path: PathBuf, message: String },

    #[error("Invalid settings: {message}")]
    Settings { message: String },

    // === External Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Operation log error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for lumen operations
pub type Result<T> = std::result::Result<T, EngineError>;

// === Convenience constructors ===
impl EngineError {
    /// Create an error for an out-of-range operation parameter
    pub fn parameter(name: &'static str, msg: impl Into<String>) -> Self {
        Self::Parameter { name, message: msg.into() }
    }

    /// Create an error for an operation that doesn't fit the image it is applied to
    pub fn geometry(parameter: &'static str, msg: impl Into<String>) -> Self {
        Self::Geometry {
            parameter,
            message: msg.into(),
        }
    }

    /// Create a persistence error for a file
    pub fn persistence(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Persistence {
            path: path.into(),
            message: msg.into(),
        }
    }
}
