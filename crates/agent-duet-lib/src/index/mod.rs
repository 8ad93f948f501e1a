//! Lexical index over a single ingested document.
//!
//! A [`LexicalIndex`] is built in one shot from extracted document text: the
//! text is split into fixed-size chunks, a TF-IDF space is fitted over exactly
//! that chunk set, and every chunk is projected into it. The chunk sequence and
//! the fitted space live in the same value, so replacing the index always
//! replaces both together. There is no incremental update.

use std::time::Instant;

use ndarray::{Array1, Array2};
use tracing::{debug, info};

use crate::model::chunk::{split_chunks, Chunk, CHUNK_CHARS};

/// Submodules
pub mod tfidf;

pub use tfidf::TfidfVectorizer;

/// Chunked document plus its fitted TF-IDF space.
///
/// An index built from empty text holds no chunks and no vectorizer; retrieval
/// against it yields nothing.
#[derive(Debug, Clone, Default)]
pub struct LexicalIndex {
    chunks: Vec<Chunk>,
    vectorizer: Option<TfidfVectorizer>,
    /// One L2-normalized row per chunk, in chunk order.
    matrix: Option<Array2<f32>>,
}

impl LexicalIndex {
    /// An index with no chunks.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Chunk `text` and fit a TF-IDF space over the chunks.
    ///
    /// # Arguments
    ///
    /// * `text` - extracted document text (may be empty)
    ///
    /// # Returns
    ///
    /// A fully built index. Empty text produces [`LexicalIndex::empty`].
    pub fn build(text: &str) -> Self {
        Self::build_with_chunk_size(text, CHUNK_CHARS)
    }

    /// Same as [`LexicalIndex::build`] with an explicit chunk length in characters.
    pub fn build_with_chunk_size(text: &str, chunk_chars: usize) -> Self {
        let start = Instant::now();
        let chunks = split_chunks(text, chunk_chars);
        if chunks.is_empty() {
            debug!("no chunks produced; index left empty");
            return Self::empty();
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let vectorizer = TfidfVectorizer::fit(&texts);
        let matrix = vectorizer.transform_many(&texts);

        info!(
            chunks = chunks.len(),
            vocabulary = vectorizer.vocabulary_len(),
            elapsed = ?start.elapsed(),
            "built lexical index"
        );

        Self {
            chunks,
            vectorizer: Some(vectorizer),
            matrix: Some(matrix),
        }
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of terms in the fitted space (0 for an empty index).
    pub fn vocabulary_len(&self) -> usize {
        self.vectorizer
            .as_ref()
            .map(TfidfVectorizer::vocabulary_len)
            .unwrap_or(0)
    }

    /// The document text the index was built from.
    pub fn document_text(&self) -> String {
        self.chunks.iter().map(|c| c.text.as_str()).collect()
    }

    pub fn vectorizer(&self) -> Option<&TfidfVectorizer> {
        self.vectorizer.as_ref()
    }

    /// Chunk vectors, one row per chunk. `None` for an empty index.
    pub fn matrix(&self) -> Option<&Array2<f32>> {
        self.matrix.as_ref()
    }

    /// Project `query` into the fixed space. `None` for an empty index.
    pub fn project(&self, query: &str) -> Option<Array1<f32>> {
        self.vectorizer.as_ref().map(|v| v.transform(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_empty_text_yields_empty_index() {
        let idx = LexicalIndex::build("");
        assert!(idx.is_empty());
        assert_eq!(idx.vocabulary_len(), 0);
        assert!(idx.matrix().is_none());
        assert!(idx.project("anything").is_none());
    }

    #[test]
    fn build_keeps_rows_aligned_with_chunks() {
        let text = "apples and pears ".repeat(200);
        let idx = LexicalIndex::build(&text);
        let mat = idx.matrix().expect("matrix present");
        assert_eq!(mat.nrows(), idx.len());
        assert_eq!(mat.ncols(), idx.vocabulary_len());
        assert_eq!(idx.document_text(), text);
    }

    #[test]
    fn chunks_without_tokens_give_empty_vocabulary() {
        let idx = LexicalIndex::build_with_chunk_size("a b c d e f", 4);
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.vocabulary_len(), 0);
    }
}
