//! In-memory [`CorpusStore`] implementation for tests.
//!
//! Uses a `Vec` of documents and a `Vec` of chunks behind a single
//! `std::sync::RwLock`, so the insert-chunk + increment-count pair runs
//! under one write guard and is trivially atomic to readers.

use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::{ChunkEntry, Document, DocumentSummary};

use super::CorpusStore;

struct StoredChunk {
    doc_id: i64,
    text: String,
    vector: Vec<f32>,
}

#[derive(Default)]
struct Inner {
    docs: Vec<Document>,
    chunks: Vec<StoredChunk>,
    next_doc_id: i64,
}

/// In-memory corpus for unit and service-level tests.
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_doc_id: 1,
                ..Inner::default()
            }),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CorpusStore for InMemoryStore {
    async fn add_document(&self, name: &str, content: &str) -> Result<i64> {
        let mut inner = self.inner.write().unwrap();
        let id = inner.next_doc_id;
        inner.next_doc_id += 1;
        inner.docs.push(Document {
            id,
            name: name.to_string(),
            content: content.to_string(),
            uploaded_at: chrono::Utc::now().timestamp(),
            chunk_count: 0,
        });
        Ok(id)
    }

    async fn add_chunk(&self, doc_id: i64, text: &str, vector: &[f32]) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        let doc = inner
            .docs
            .iter_mut()
            .find(|d| d.id == doc_id)
            .ok_or(CoreError::NotFound(doc_id))?;
        doc.chunk_count += 1;
        inner.chunks.push(StoredChunk {
            doc_id,
            text: text.to_string(),
            vector: vector.to_vec(),
        });
        Ok(())
    }

    async fn get_document(&self, doc_id: i64) -> Result<Option<Document>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.docs.iter().find(|d| d.id == doc_id).cloned())
    }

    async fn get_all_documents(&self) -> Result<Vec<DocumentSummary>> {
        let inner = self.inner.read().unwrap();
        let mut summaries: Vec<DocumentSummary> = inner
            .docs
            .iter()
            .map(|d| DocumentSummary {
                id: d.id,
                name: d.name.clone(),
                chunk_count: d.chunk_count,
                uploaded_at: d.uploaded_at,
                size: d.content.len() as i64,
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then(b.id.cmp(&a.id))
        });
        Ok(summaries)
    }

    async fn delete_document(&self, doc_id: i64) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.docs.retain(|d| d.id != doc_id);
        inner.chunks.retain(|c| c.doc_id != doc_id);
        Ok(())
    }

    async fn iterate_chunks(&self) -> Result<Vec<ChunkEntry>> {
        let inner = self.inner.read().unwrap();
        inner
            .chunks
            .iter()
            .map(|c| {
                let doc_name = inner
                    .docs
                    .iter()
                    .find(|d| d.id == c.doc_id)
                    .map(|d| d.name.clone())
                    .ok_or(CoreError::NotFound(c.doc_id))?;
                Ok(ChunkEntry {
                    text: c.text.clone(),
                    doc_name,
                    vector: c.vector.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_document_assigns_monotonic_ids() {
        let store = InMemoryStore::new();
        let a = store.add_document("a.txt", "alpha").await.unwrap();
        let b = store.add_document("b.txt", "beta").await.unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn test_add_chunk_requires_existing_document() {
        let store = InMemoryStore::new();
        let err = store.add_chunk(42, "text", &[1.0]).await.unwrap_err();
        let core = err.downcast_ref::<CoreError>().unwrap();
        assert!(matches!(core, CoreError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_chunk_count_tracks_chunks() {
        let store = InMemoryStore::new();
        let id = store.add_document("a.txt", "alpha").await.unwrap();
        store.add_chunk(id, "c1", &[1.0, 0.0]).await.unwrap();
        store.add_chunk(id, "c2", &[0.0, 1.0]).await.unwrap();
        let doc = store.get_document(id).await.unwrap().unwrap();
        assert_eq!(doc.chunk_count, 2);
        assert_eq!(store.iterate_chunks().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_cascades_and_is_idempotent() {
        let store = InMemoryStore::new();
        let id = store.add_document("a.txt", "alpha").await.unwrap();
        store.add_chunk(id, "c1", &[1.0]).await.unwrap();
        store.delete_document(id).await.unwrap();
        assert!(store.get_all_documents().await.unwrap().is_empty());
        assert!(store.iterate_chunks().await.unwrap().is_empty());
        // Second delete of the same id is a no-op.
        store.delete_document(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_listing_newest_first() {
        let store = InMemoryStore::new();
        let a = store.add_document("a.txt", "alpha").await.unwrap();
        let b = store.add_document("b.txt", "beta").await.unwrap();
        let docs = store.get_all_documents().await.unwrap();
        // Equal timestamps fall back to id descending.
        assert_eq!(docs[0].id, b);
        assert_eq!(docs[1].id, a);
    }

    #[tokio::test]
    async fn test_size_is_content_byte_length() {
        let store = InMemoryStore::new();
        store.add_document("u.txt", "héllo").await.unwrap();
        let docs = store.get_all_documents().await.unwrap();
        assert_eq!(docs[0].size, "héllo".len() as i64); // 6 bytes, 5 chars
    }
}
