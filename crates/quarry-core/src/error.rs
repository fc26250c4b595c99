//! Error taxonomy for the retrieval core.
//!
//! Every fallible core operation reports one of these variants. Callers
//! propagate them through `anyhow::Result`; layers that need to react to a
//! specific failure (the HTTP server maps `NotFound` to 404, for example)
//! recover the variant with `downcast_ref`.

use thiserror::Error;

/// Failures produced by the chunker, vector codec, ranker, and corpus store.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Chunking parameters that would make the window advance non-positive.
    /// Rejected eagerly — a non-positive step would loop forever.
    #[error("invalid chunking configuration: window={window} must be greater than overlap={overlap}")]
    InvalidConfiguration { window: usize, overlap: usize },

    /// A vector with the wrong number of components reached the ranker or
    /// the ingestion pipeline. Dimensions are fixed for the corpus lifetime.
    #[error("embedding dimension mismatch: expected {expected} components, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A persisted embedding blob whose byte length is not a multiple of 4.
    #[error("corrupt embedding blob: {0} bytes is not a whole number of f32 values")]
    CorruptData(usize),

    /// An operation referenced a document id that does not exist.
    #[error("document not found: {0}")]
    NotFound(i64),

    /// The durable medium failed. Never retried internally; retry policy
    /// belongs to the caller.
    #[error("storage error: {0}")]
    Storage(String),
}
