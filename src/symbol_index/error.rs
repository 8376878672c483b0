//! Error types for building, querying and persisting the symbol index

use thiserror::Error;

/// Errors raised while building an index
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("record list is empty but a non-empty index is required")]
    EmptyRecordList,

    #[error("symbol `{raw_name}` has an empty or malformed locator")]
    InvalidLocator { raw_name: String },

    #[error("symbol `{raw_name}` contains no identifier characters")]
    NormalizationFailure { raw_name: String },
}

/// Errors raised by caller misuse of the query API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("result limit must not be negative (got {0})")]
    InvalidLimit(i64),
}

/// Errors raised while reading or writing persisted artifacts
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported index schema version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("index key `{key}` is not in normalized form")]
    UnnormalizedKey { key: String },

    #[error("index key `{key}` holds the same entry more than once")]
    DuplicateEntry { key: String },
}
