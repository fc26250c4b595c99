//! Storage abstraction for the corpus.
//!
//! The [`CorpusStore`] trait defines the durable record of documents and
//! their chunks, enabling pluggable backends (SQLite in the application
//! crate, in-memory here for tests).
//!
//! # Invariants every implementation must uphold
//!
//! - A chunk's document id always resolves to an existing document; chunks
//!   cannot outlive their document.
//! - A document's `chunk_count` always matches the live count of its
//!   chunks. The insert-chunk + increment-count pair is observably atomic:
//!   a reader never sees one without the other.
//! - Chunk order within a document is the order the chunks were produced
//!   (display only; the ranker must not rely on it).
//!
//! Storage failures surface unmodified — no operation is retried
//! internally; retry policy belongs to the caller.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ChunkEntry, Document, DocumentSummary};

/// Abstract corpus backend.
///
/// All operations are async (via `async-trait`). The in-memory
/// implementation returns immediately-ready futures.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`add_document`](CorpusStore::add_document) | Create a document with zero chunks |
/// | [`add_chunk`](CorpusStore::add_chunk) | Append a chunk + vector to a document |
/// | [`get_document`](CorpusStore::get_document) | Fetch one document by id |
/// | [`get_all_documents`](CorpusStore::get_all_documents) | List documents, newest upload first |
/// | [`delete_document`](CorpusStore::delete_document) | Cascading, idempotent delete |
/// | [`iterate_chunks`](CorpusStore::iterate_chunks) | Full scan for the ranker |
#[async_trait]
pub trait CorpusStore: Send + Sync {
    /// Create a document with `chunk_count` 0 and return its new id.
    async fn add_document(&self, name: &str, content: &str) -> Result<i64>;

    /// Persist a chunk owned by `doc_id` and atomically increment that
    /// document's `chunk_count`.
    ///
    /// Fails with [`CoreError::NotFound`](crate::CoreError::NotFound) when
    /// `doc_id` does not reference an existing document.
    async fn add_chunk(&self, doc_id: i64, text: &str, vector: &[f32]) -> Result<()>;

    /// Fetch a single document, or `None` when the id is unknown.
    async fn get_document(&self, doc_id: i64) -> Result<Option<Document>>;

    /// List all documents ordered by upload time, most recent first
    /// (ties broken by id descending).
    async fn get_all_documents(&self) -> Result<Vec<DocumentSummary>>;

    /// Remove the document and every chunk it owns as one atomic
    /// operation. Deleting a missing id is a no-op, not an error.
    async fn delete_document(&self, doc_id: i64) -> Result<()>;

    /// Full scan across every chunk joined with its owning document's
    /// name. Storage order; no ordering guarantee.
    async fn iterate_chunks(&self) -> Result<Vec<ChunkEntry>>;
}
