//! Retrieval service: the ingestion and question-answering pipelines.
//!
//! Both entry points take the store and the embedder as explicit trait
//! objects, so the CLI, the HTTP server, and the tests all drive the same
//! code paths with different backends.
//!
//! Ingestion embeds every chunk before anything touches the store: the
//! vectors are buffered in memory, and only once all of them are in hand
//! is the document row created and each chunk persisted. An embedding
//! failure (the dominant failure mode) therefore leaves the store
//! untouched. A storage failure during the final write sequence can still
//! leave a partial document; each chunk insert is individually atomic.

use anyhow::{Context, Result};
use serde::Serialize;

use quarry_core::chunk::chunk_text;
use quarry_core::embedding::Embedder;
use quarry_core::rank::rank;
use quarry_core::store::CorpusStore;
use quarry_core::CoreError;

use crate::config::{ChunkingConfig, EmbeddingConfig};

/// Maximum characters of a source excerpt in an [`Answer`].
const EXCERPT_CHARS: usize = 300;

/// Maximum characters of the assembled answer text.
const ANSWER_CHARS: usize = 500;

/// Number of top sources stitched into the answer text.
const ANSWER_SOURCES: usize = 3;

/// Outcome of ingesting one document.
#[derive(Debug, Serialize)]
pub struct IngestResult {
    pub doc_id: i64,
    pub chunk_count: usize,
}

/// One ranked source backing an [`Answer`].
#[derive(Debug, Serialize)]
pub struct Source {
    pub doc_name: String,
    pub excerpt: String,
    pub score: f32,
}

/// Response to a retrieval query.
#[derive(Debug, Serialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<Source>,
}

/// Chunk, embed, and persist a document.
pub async fn ingest(
    store: &dyn CorpusStore,
    embedder: &dyn Embedder,
    name: &str,
    content: &str,
    chunking: &ChunkingConfig,
    embedding: &EmbeddingConfig,
) -> Result<IngestResult> {
    let chunks = chunk_text(content, chunking.window, chunking.overlap)?;
    let batch_size = embedding.batch_size.max(1);

    // Embed everything up front. Nothing is persisted until every vector
    // has been produced and validated.
    let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(chunks.len());
    for batch in chunks.chunks(batch_size) {
        let batch_vectors = embedder
            .embed_batch(batch)
            .await
            .with_context(|| format!("Failed to embed chunks of '{}'", name))?;

        if batch_vectors.len() != batch.len() {
            anyhow::bail!(
                "Embedding provider returned {} vectors for {} inputs",
                batch_vectors.len(),
                batch.len()
            );
        }

        for vector in &batch_vectors {
            check_dims(embedder, vector)?;
        }
        vectors.extend(batch_vectors);
    }

    let doc_id = store
        .add_document(name, content)
        .await
        .with_context(|| format!("Failed to store document '{}'", name))?;

    for (text, vector) in chunks.iter().zip(&vectors) {
        store.add_chunk(doc_id, text, vector).await?;
    }

    Ok(IngestResult {
        doc_id,
        chunk_count: chunks.len(),
    })
}

/// Embed the query, scan the corpus, and assemble a ranked answer.
pub async fn answer(
    store: &dyn CorpusStore,
    embedder: &dyn Embedder,
    query: &str,
    top_k: i64,
) -> Result<Answer> {
    let query_vec = embedder
        .embed(query)
        .await
        .context("Failed to embed query")?;
    check_dims(embedder, &query_vec)?;

    let entries = store.iterate_chunks().await?;
    let ranked = rank(&query_vec, &entries, top_k)?;

    if ranked.is_empty() {
        return Ok(Answer {
            answer: "No matching passages in the corpus.".to_string(),
            sources: Vec::new(),
        });
    }

    let combined = ranked
        .iter()
        .take(ANSWER_SOURCES)
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let answer = format!(
        "Based on the retrieved information: {}",
        truncate_chars(&combined, ANSWER_CHARS)
    );

    let sources = ranked
        .into_iter()
        .map(|r| Source {
            excerpt: truncate_chars(&r.text, EXCERPT_CHARS),
            doc_name: r.doc_name,
            score: r.score,
        })
        .collect();

    Ok(Answer { answer, sources })
}

/// Validate vector width against the provider's declared dimensionality.
fn check_dims(embedder: &dyn Embedder, vector: &[f32]) -> Result<()> {
    let expected = embedder.dims();
    if expected != 0 && vector.len() != expected {
        return Err(CoreError::DimensionMismatch {
            expected,
            actual: vector.len(),
        }
        .into());
    }
    Ok(())
}

/// Truncate on a character boundary, appending `...` when text was cut.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
