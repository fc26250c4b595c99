//! Embedding abstraction and the vector codec.
//!
//! Defines the [`Embedder`] trait that all embedding backends implement,
//! plus the pure binary codec used to persist vectors. Concrete providers
//! (OpenAI, Ollama) live in the `quarry` application crate; tests supply
//! deterministic in-process implementations.

use anyhow::Result;
use async_trait::async_trait;

use crate::error::CoreError;

/// An embedding model: opaque text → fixed-dimension f32 vector.
///
/// The dimension `dims()` is discovered once at startup (from
/// configuration) and enforced thereafter — every vector entering the
/// corpus must have exactly that many components.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model identifier (e.g. `"text-embedding-3-small"`).
    fn model_name(&self) -> &str;

    /// Embedding vector dimensionality (e.g. `384`).
    fn dims(&self) -> usize;

    /// Embed a batch of texts, returning one vector per input in order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text (e.g. a search query).
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("empty embedding response"))
    }
}

/// Encode a float vector as a BLOB (little-endian f32 bytes, no header).
///
/// Each `f32` is stored as 4 bytes in little-endian order, producing a
/// BLOB of `vec.len() × 4` bytes. The codec never normalizes or
/// compresses — it is a pure binary transcription layer, so the stored
/// size is always predictable.
///
/// # Example
///
/// ```rust
/// use quarry_core::embedding::{vec_to_blob, blob_to_vec};
///
/// let v = vec![1.0f32, -2.5, 3.125];
/// let blob = vec_to_blob(&v);
/// assert_eq!(blob.len(), 12); // 3 × 4 bytes
/// assert_eq!(blob_to_vec(&blob).unwrap(), v);
/// ```
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vec.len() * 4);
    for &v in vec {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Decode a BLOB back into a float vector.
///
/// Reverses [`vec_to_blob`]; the dimension is recovered as
/// `blob.len() / 4`. Fails with [`CoreError::CorruptData`] when the byte
/// length is not a multiple of 4.
pub fn blob_to_vec(blob: &[u8]) -> Result<Vec<f32>, CoreError> {
    if blob.len() % 4 != 0 {
        return Err(CoreError::CorruptData(blob.len()));
    }
    Ok(blob
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
