//! Brute-force cosine-similarity ranker.
//!
//! Given a query vector and the full set of stored chunk vectors, computes
//! a similarity score per chunk and returns the top-k by score. This is an
//! exact O(N·D) scan with no indexing structure — a deliberate scalability
//! ceiling, since approximate nearest-neighbor search is out of scope. An
//! ANN index can later replace the scan behind the same contract.
//!
//! # Determinism
//!
//! The sort is stable and ties keep original scan order, so identical
//! inputs (including floating-point vectors) always produce identical
//! output. Floating-point score equality is otherwise too fragile to test
//! against.

use crate::error::CoreError;
use crate::models::{ChunkEntry, RankedChunk};

/// Compute cosine similarity between two vectors of equal dimension.
///
/// Returns a value in `[-1.0, 1.0]`:
/// - `1.0` = identical direction
/// - `0.0` = orthogonal, or either vector has zero magnitude
/// - `-1.0` = opposite direction
///
/// A zero-magnitude vector means "no directional relationship", not an
/// error. Mismatched dimensions are a precondition violation and fail with
/// [`CoreError::DimensionMismatch`] rather than silently truncating.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, CoreError> {
    if a.len() != b.len() {
        return Err(CoreError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return Ok(0.0);
    }

    Ok(dot / denom)
}

/// Score every chunk against the query vector and return the top `top_k`.
///
/// The result length is `min(top_k, entries.len())`; `top_k <= 0` yields
/// an empty Vec (not an error). Entries are sorted descending by score
/// with ties broken by scan order. Any entry whose vector dimension
/// differs from the query's fails the whole call with
/// [`CoreError::DimensionMismatch`].
pub fn rank(
    query_vec: &[f32],
    entries: &[ChunkEntry],
    top_k: i64,
) -> Result<Vec<RankedChunk>, CoreError> {
    if top_k <= 0 {
        return Ok(Vec::new());
    }

    let mut scored: Vec<RankedChunk> = Vec::with_capacity(entries.len());
    for entry in entries {
        let score = cosine_similarity(query_vec, &entry.vector)?;
        scored.push(RankedChunk {
            text: entry.text.clone(),
            doc_name: entry.doc_name.clone(),
            score,
        });
    }

    // sort_by is stable: equal scores keep scan order.
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(top_k as usize);

    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, doc: &str, vector: Vec<f32>) -> ChunkEntry {
        ChunkEntry {
            text: text.to_string(),
            doc_name: doc.to_string(),
            vector,
        }
    }

    #[test]
    fn test_cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_magnitude_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[0.0], &[0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_dimension_mismatch_errors() {
        let err = cosine_similarity(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_rank_orders_by_score() {
        let entries = vec![
            entry("far", "d1", vec![0.0, 1.0]),
            entry("near", "d2", vec![1.0, 0.0]),
            entry("mid", "d3", vec![1.0, 1.0]),
        ];
        let ranked = rank(&[1.0, 0.0], &entries, 3).unwrap();
        let order: Vec<&str> = ranked.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(order, vec!["near", "mid", "far"]);
        assert!((ranked[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rank_top_k_bound() {
        let entries: Vec<ChunkEntry> = (0..5)
            .map(|i| entry(&format!("c{i}"), "d", vec![i as f32, 1.0]))
            .collect();
        for k in 0..10 {
            let ranked = rank(&[1.0, 1.0], &entries, k).unwrap();
            assert_eq!(ranked.len(), (k.max(0) as usize).min(entries.len()));
        }
        assert!(rank(&[1.0, 1.0], &entries, -3).unwrap().is_empty());
    }

    #[test]
    fn test_rank_ties_keep_scan_order() {
        // Identical vectors score identically; stable sort preserves the
        // order they were scanned in.
        let entries = vec![
            entry("first", "d1", vec![1.0, 0.0]),
            entry("second", "d2", vec![1.0, 0.0]),
            entry("third", "d3", vec![1.0, 0.0]),
        ];
        let ranked = rank(&[1.0, 0.0], &entries, 3).unwrap();
        let order: Vec<&str> = ranked.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_rank_deterministic() {
        let entries: Vec<ChunkEntry> = (0..50)
            .map(|i| {
                entry(
                    &format!("c{i}"),
                    "d",
                    vec![(i % 7) as f32 * 0.1, (i % 3) as f32 * 0.2, 0.5],
                )
            })
            .collect();
        let q = vec![0.3, 0.4, 0.5];
        let a = rank(&q, &entries, 20).unwrap();
        let b = rank(&q, &entries, 20).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.text, y.text);
            assert_eq!(x.score.to_bits(), y.score.to_bits());
        }
    }

    #[test]
    fn test_rank_zero_vector_chunk_never_errors() {
        let entries = vec![
            entry("zero", "d1", vec![0.0, 0.0, 0.0]),
            entry("real", "d2", vec![1.0, 0.0, 0.0]),
        ];
        let ranked = rank(&[1.0, 0.0, 0.0], &entries, 2).unwrap();
        assert_eq!(ranked[0].text, "real");
        assert_eq!(ranked[1].text, "zero");
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_rank_mismatched_chunk_fails_loudly() {
        let entries = vec![
            entry("ok", "d1", vec![1.0, 0.0]),
            entry("bad", "d2", vec![1.0, 0.0, 0.0]),
        ];
        let err = rank(&[1.0, 0.0], &entries, 2).unwrap_err();
        assert!(matches!(err, CoreError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_rank_empty_corpus() {
        assert!(rank(&[1.0], &[], 5).unwrap().is_empty());
    }
}
