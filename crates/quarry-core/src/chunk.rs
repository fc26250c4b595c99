//! Overlapping word-window text chunker.
//!
//! Splits document text into fixed-size windows of whitespace-separated
//! words, with a configurable overlap between consecutive windows so that
//! passages spanning a window boundary are still retrievable as one chunk.
//!
//! # Algorithm
//!
//! 1. Split the text on whitespace into a word sequence.
//! 2. Starting at word 0, take `window` consecutive words and join them
//!    with single spaces to form one chunk.
//! 3. Advance the start index by `window - overlap` and repeat until the
//!    start index reaches the word count.
//! 4. Drop chunks that are empty after joining.
//!
//! The last chunk may hold fewer than `window` words. Chunk boundaries are
//! never persisted separately from chunk text, so the split must be
//! reproducible: identical input and parameters always yield identical
//! output.
//!
//! # Example
//!
//! ```rust
//! use quarry_core::chunk::chunk_text;
//!
//! let chunks = chunk_text("one two three four", 3, 1).unwrap();
//! assert_eq!(chunks, vec!["one two three", "three four"]);
//! ```

use crate::error::CoreError;

/// Default words per chunk.
pub const DEFAULT_WINDOW: usize = 500;
/// Default words shared between consecutive chunks.
pub const DEFAULT_OVERLAP: usize = 50;

/// Split `text` into overlapping word windows.
///
/// Returns the chunks in production order. Requires `window > overlap`
/// (which also implies `window > 0`); anything else is
/// [`CoreError::InvalidConfiguration`], since the advance step
/// `window - overlap` would be zero or would underflow.
///
/// Empty or whitespace-only input produces an empty Vec.
pub fn chunk_text(text: &str, window: usize, overlap: usize) -> Result<Vec<String>, CoreError> {
    if window <= overlap {
        return Err(CoreError::InvalidConfiguration { window, overlap });
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let step = window - overlap;

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < words.len() {
        let end = (start + window).min(words.len());
        let chunk = words[start..end].join(" ");
        if !chunk.is_empty() {
            chunks.push(chunk);
        }
        start += step;
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunk_text("hello world", 500, 50).unwrap();
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[test]
    fn test_empty_text_no_chunks() {
        assert!(chunk_text("", 500, 50).unwrap().is_empty());
        assert!(chunk_text("   \n\t  ", 500, 50).unwrap().is_empty());
    }

    #[test]
    fn test_windows_overlap() {
        // 10 words, window 4, overlap 2 -> starts at 0, 2, 4, 6, 8
        let text = "w0 w1 w2 w3 w4 w5 w6 w7 w8 w9";
        let chunks = chunk_text(text, 4, 2).unwrap();
        assert_eq!(
            chunks,
            vec![
                "w0 w1 w2 w3",
                "w2 w3 w4 w5",
                "w4 w5 w6 w7",
                "w6 w7 w8 w9",
                "w8 w9",
            ]
        );
    }

    #[test]
    fn test_600_words_default_parameters() {
        // The canonical sizing case: 600 words with window 500 / overlap 50
        // yields exactly two chunks covering words [0,500) and [450,600).
        let words: Vec<String> = (0..600).map(|i| format!("word{i}")).collect();
        let text = words.join(" ");
        let chunks = chunk_text(&text, DEFAULT_WINDOW, DEFAULT_OVERLAP).unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].starts_with("word0 "));
        assert!(chunks[0].ends_with(" word499"));
        assert!(chunks[1].starts_with("word450 "));
        assert!(chunks[1].ends_with(" word599"));
    }

    #[test]
    fn test_coverage_no_gaps() {
        // Stepping each chunk by (window - overlap) words reconstructs the
        // original word sequence exactly.
        let words: Vec<String> = (0..137).map(|i| format!("t{i}")).collect();
        let text = words.join(" ");
        let (window, overlap) = (20, 7);
        let chunks = chunk_text(&text, window, overlap).unwrap();

        let mut reassembled: Vec<&str> = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let chunk_words: Vec<&str> = chunk.split(' ').collect();
            let skip = if i == 0 { 0 } else { overlap };
            reassembled.extend(&chunk_words[skip.min(chunk_words.len())..]);
        }
        let original: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(reassembled, original);
    }

    #[test]
    fn test_deterministic() {
        let words: Vec<String> = (0..1000).map(|i| format!("x{i}")).collect();
        let text = words.join(" ");
        let a = chunk_text(&text, 300, 40).unwrap();
        let b = chunk_text(&text, 300, 40).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_collapses_internal_whitespace() {
        let chunks = chunk_text("a  b\n\nc\td", 10, 0).unwrap();
        assert_eq!(chunks, vec!["a b c d"]);
    }

    #[test]
    fn test_rejects_overlap_not_less_than_window() {
        assert!(matches!(
            chunk_text("a b c", 50, 50),
            Err(CoreError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            chunk_text("a b c", 10, 25),
            Err(CoreError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            chunk_text("a b c", 0, 0),
            Err(CoreError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_zero_overlap_allowed() {
        let chunks = chunk_text("a b c d e f", 2, 0).unwrap();
        assert_eq!(chunks, vec!["a b", "c d", "e f"]);
    }
}
