//! Error types for the import/export core

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, TransferError>;

/// Failures that reject a whole import document.
///
/// CSV decoding is lenient and never produces one of these.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The document is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is valid JSON but not an array of dossiers
    #[error("expected a JSON array of dossiers, found {found}")]
    NotAnArray { found: &'static str },
}
