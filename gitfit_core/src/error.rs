//! Error types for the gitfit_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for gitfit_core operations
///
/// Corrupt persisted documents, unknown ids and bad import rows are not
/// errors; stores recover from those locally. What remains here is storage
/// I/O, encoding, and whole-document failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text that is not a `slug:id` exercise key
    #[error("Invalid exercise key: {0}")]
    Key(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Import document could not be used at all
    #[error("Import error: {0}")]
    Import(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
