//! Error types for RutaVerde

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RutaverdeError {
    // Document errors
    #[error("Malformed GeoJSON document {document}: {reason}")]
    MalformedDocument { document: String, reason: String },

    #[error("Invalid feature {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },

    // Loading errors
    #[error("Transport error fetching {document}: {reason}")]
    Transport { document: String, reason: String },

    #[error("HTTP {status} fetching {document}")]
    HttpStatus { document: String, status: u16 },

    #[error("Failed to load {document} after {attempts} attempt(s): {reason}")]
    LoadFailed {
        document: String,
        attempts: u32,
        reason: String,
    },

    // Projection errors
    #[error("Cannot build projection from {from} to {to}: {reason}")]
    Projection { from: String, to: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RutaverdeError {
    /// Whether a fetch that failed with this error is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RutaverdeError::Transport { .. })
    }
}

pub type Result<T> = std::result::Result<T, RutaverdeError>;
