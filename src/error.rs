//! Error types for the vector store

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the similarity metric.
///
/// These are recovered locally during a top-k scan: the offending entry is
/// skipped and the scan carries on.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricError {
    /// The two vectors have different lengths
    #[error("vector dimensions do not match ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },

    /// One of the vectors has zero magnitude, cosine is undefined
    #[error("zero length vector encountered")]
    ZeroVectorMagnitude,
}

/// Errors surfaced to callers of the store
#[derive(Error, Debug)]
pub enum Error {
    /// An entry with this id is already stored
    #[error("vector with id '{0}' already exists")]
    DuplicateId(String),

    /// No entry with this id is stored
    #[error("vector with id '{0}' does not exist")]
    NotFound(String),

    /// Empty query vector or k of zero
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Query issued against a store with no entries
    #[error("vector store is empty")]
    EmptyStore,

    /// Similarity could not be computed
    #[error(transparent)]
    Metric(#[from] MetricError),

    /// The file could not be created, opened or written
    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is truncated or malformed
    #[error("file corrupted '{}': {reason}", path.display())]
    CorruptFile { path: PathBuf, reason: String },
}
