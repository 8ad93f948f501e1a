//! Ranked chunk retrieval against a [`LexicalIndex`].
//!
//! Ranking is by cosine similarity between the projected query and each chunk
//! row, highest first. Equal scores keep ascending chunk position, so results
//! are deterministic. Identical chunk texts are ranked independently and are
//! not merged.

use ndarray::{ArrayView1, Axis};
use rayon::prelude::*;
use tracing::debug;

use crate::index::LexicalIndex;
use crate::model::chunk::Chunk;

/// Number of chunks used for grounding when the caller does not say otherwise.
pub const DEFAULT_TOP_K: usize = 3;

/// Separator placed between chunk texts in a grounding context.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// A chunk together with its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredChunk<'a> {
    pub chunk: &'a Chunk,
    pub score: f32,
}

fn cosine(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f32 {
    let dot = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Cosine similarity of `query` against every chunk, in chunk order.
///
/// # Returns
///
/// One score per chunk; empty for an empty index.
pub fn score_chunks(index: &LexicalIndex, query: &str) -> Vec<f32> {
    let (Some(matrix), Some(q)) = (index.matrix(), index.project(query)) else {
        return Vec::new();
    };
    let qv = q.view();
    matrix
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|row| cosine(row, qv))
        .collect()
}

/// Retrieve the `top_k` chunks most similar to `query`.
///
/// # Arguments
///
/// * `index` - the index to search (may be empty)
/// * `query` - any string, including the empty string
/// * `top_k` - maximum number of chunks to return
///
/// # Returns
///
/// At most `min(top_k, index.len())` chunks ordered by non-increasing score,
/// ties broken by ascending chunk position. An empty index yields an empty
/// vector; this is never an error.
pub fn retrieve<'a>(index: &'a LexicalIndex, query: &str, top_k: usize) -> Vec<ScoredChunk<'a>> {
    let scores = score_chunks(index, query);
    if scores.is_empty() || top_k == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top_k);

    debug!(
        query_len = query.len(),
        top = ?ranked.iter().map(|(i, s)| (*i, *s)).collect::<Vec<_>>(),
        "ranked chunks"
    );

    let chunks = index.chunks();
    ranked
        .into_iter()
        .map(|(i, score)| ScoredChunk {
            chunk: &chunks[i],
            score,
        })
        .collect()
}

/// Retrieve the `top_k` best chunks and join their texts into one context block.
///
/// Chunk texts are joined with a blank line, best match first. Returns an
/// empty string when nothing can be retrieved.
pub fn retrieve_context(index: &LexicalIndex, query: &str, top_k: usize) -> String {
    retrieve(index, query, top_k)
        .iter()
        .map(|sc| sc.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}
