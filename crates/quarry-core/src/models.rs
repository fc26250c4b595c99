//! Core data models used throughout Quarry.
//!
//! These types represent the documents, chunks, and ranked results that
//! flow through the ingestion and retrieval pipeline.

use serde::Serialize;

/// A document stored in the corpus.
///
/// Ids are opaque integers assigned monotonically by the store. `content`
/// is the full extracted text and is immutable after creation.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: i64,
    pub name: String,
    pub content: String,
    /// Unix timestamp of the upload.
    pub uploaded_at: i64,
    /// Always equals the number of chunks currently owned by this document.
    pub chunk_count: i64,
}

/// Lightweight document listing entry.
///
/// `size` is the byte length of the original content, not the sum of
/// chunk sizes.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub id: i64,
    pub name: String,
    pub chunk_count: i64,
    pub uploaded_at: i64,
    pub size: i64,
}

/// A stored chunk joined with its owning document's name, as produced by
/// the store's full scan and consumed by the ranker.
#[derive(Debug, Clone)]
pub struct ChunkEntry {
    pub text: String,
    pub doc_name: String,
    pub vector: Vec<f32>,
}

/// One ranked retrieval result.
#[derive(Debug, Clone)]
pub struct RankedChunk {
    pub text: String,
    pub doc_name: String,
    pub score: f32,
}
