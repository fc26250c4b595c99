//! SQLite-backed [`CorpusStore`] implementation.
//!
//! Maps each store operation to SQL against the documents/chunks schema.
//! The two-step "insert chunk + increment chunk_count" sequence runs in a
//! single transaction, so a reader never observes an incremented count
//! without the corresponding chunk (or vice versa). Document deletion is
//! likewise one transaction covering the document row and every chunk it
//! owns.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use quarry_core::embedding::{blob_to_vec, vec_to_blob};
use quarry_core::models::{ChunkEntry, Document, DocumentSummary};
use quarry_core::store::CorpusStore;
use quarry_core::CoreError;

/// SQLite implementation of the [`CorpusStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Durable-medium failures surface as [`CoreError::Storage`], unmodified
/// and never retried here.
fn storage(e: sqlx::Error) -> CoreError {
    CoreError::Storage(e.to_string())
}

#[async_trait]
impl CorpusStore for SqliteStore {
    async fn add_document(&self, name: &str, content: &str) -> Result<i64> {
        let now = chrono::Utc::now().timestamp();
        let result = sqlx::query(
            "INSERT INTO documents (name, content, uploaded_at, chunk_count) VALUES (?, ?, ?, 0)",
        )
        .bind(name)
        .bind(content)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        Ok(result.last_insert_rowid())
    }

    async fn add_chunk(&self, doc_id: i64, text: &str, vector: &[f32]) -> Result<()> {
        let blob = vec_to_blob(vector);

        let mut tx = self.pool.begin().await.map_err(storage)?;

        // The current chunk_count doubles as the next chunk_index, keeping
        // chunk order within a document equal to production order.
        let chunk_count: Option<i64> =
            sqlx::query_scalar("SELECT chunk_count FROM documents WHERE id = ?")
                .bind(doc_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(storage)?;

        let chunk_index = chunk_count.ok_or(CoreError::NotFound(doc_id))?;

        sqlx::query("INSERT INTO chunks (doc_id, chunk_index, text, embedding) VALUES (?, ?, ?, ?)")
            .bind(doc_id)
            .bind(chunk_index)
            .bind(text)
            .bind(&blob)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        sqlx::query("UPDATE documents SET chunk_count = chunk_count + 1 WHERE id = ?")
            .bind(doc_id)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        tx.commit().await.map_err(storage)?;
        Ok(())
    }

    async fn get_document(&self, doc_id: i64) -> Result<Option<Document>> {
        let row = sqlx::query(
            "SELECT id, name, content, uploaded_at, chunk_count FROM documents WHERE id = ?",
        )
        .bind(doc_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        Ok(row.map(|r| Document {
            id: r.get("id"),
            name: r.get("name"),
            content: r.get("content"),
            uploaded_at: r.get("uploaded_at"),
            chunk_count: r.get("chunk_count"),
        }))
    }

    async fn get_all_documents(&self) -> Result<Vec<DocumentSummary>> {
        // CAST to BLOB so LENGTH reports bytes, not characters.
        let rows = sqlx::query(
            r#"
            SELECT id, name, chunk_count, uploaded_at,
                   LENGTH(CAST(content AS BLOB)) AS size
            FROM documents
            ORDER BY uploaded_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(rows
            .iter()
            .map(|r| DocumentSummary {
                id: r.get("id"),
                name: r.get("name"),
                chunk_count: r.get("chunk_count"),
                uploaded_at: r.get("uploaded_at"),
                size: r.get("size"),
            })
            .collect())
    }

    async fn delete_document(&self, doc_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        // Explicit chunk delete alongside the ON DELETE CASCADE constraint,
        // so the cascade holds even against databases created before
        // foreign-key enforcement was enabled.
        sqlx::query("DELETE FROM chunks WHERE doc_id = ?")
            .bind(doc_id)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        // Missing ids delete zero rows: idempotent, not an error.
        sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(doc_id)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        tx.commit().await.map_err(storage)?;
        Ok(())
    }

    async fn iterate_chunks(&self) -> Result<Vec<ChunkEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT c.text, d.name, c.embedding
            FROM chunks c
            JOIN documents d ON d.id = c.doc_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let blob: Vec<u8> = row.get("embedding");
            let vector = blob_to_vec(&blob)?;
            entries.push(ChunkEntry {
                text: row.get("text"),
                doc_name: row.get("name"),
                vector,
            });
        }

        Ok(entries)
    }
}
