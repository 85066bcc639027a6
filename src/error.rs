//! Error types for lexmerge

use thiserror::Error;

/// Errors produced by the merge engine and its collaborators
#[derive(Debug, Error)]
pub enum Error {
    /// No column with this id exists in the merge tree
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// The column exists but holds no slot with this id
    #[error("slot {slot} not found in column {column}")]
    SlotNotFound {
        /// Column id
        column: String,
        /// Slot id
        slot: String,
    },

    /// A sense guid is not part of the session snapshot
    #[error("sense not found: {0}")]
    SenseNotFound(String),

    /// A reference that is well-formed but not usable for this operation
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// The operation would alter protected data and no override is set
    #[error("protected: {0}")]
    Protected(String),

    /// A step of an operation script failed
    #[error("script step {index} failed: {source}")]
    Script {
        /// Zero-based step index
        index: usize,
        /// What went wrong
        #[source]
        source: Box<Error>,
    },

    /// The storage collaborator failed
    #[error("store error: {0}")]
    Store(String),

    /// Exclusion list persistence failed
    #[error("exclusion list error: {0}")]
    Exclusions(String),

    /// Configuration could not be loaded
    #[error("config error: {0}")]
    Config(String),

    /// A merge tree invariant does not hold
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
