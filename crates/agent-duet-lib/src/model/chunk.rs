use serde::{Deserialize, Serialize};

/// Fixed chunk length, measured in characters (not bytes).
pub const CHUNK_CHARS: usize = 1000;

/// Contiguous slice of extracted document text.
///
/// `position` is the zero-based index of the chunk in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub position: usize,
    pub text: String,
}

/// Split `text` into non-overlapping chunks of `chunk_chars` characters.
///
/// The last chunk may be shorter. Concatenating the returned chunk texts in
/// order reproduces `text` exactly. Empty input yields no chunks.
///
/// # Panics
///
/// Panics if `chunk_chars` is zero.
pub fn split_chunks(text: &str, chunk_chars: usize) -> Vec<Chunk> {
    assert!(chunk_chars > 0, "chunk size must be positive");

    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut count = 0usize;

    for (byte_idx, _) in text.char_indices() {
        if count == chunk_chars {
            chunks.push(Chunk {
                position: chunks.len(),
                text: text[start..byte_idx].to_string(),
            });
            start = byte_idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(Chunk {
            position: chunks.len(),
            text: text[start..].to_string(),
        });
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(split_chunks("", CHUNK_CHARS).is_empty());
    }

    #[test]
    fn exact_multiple_has_no_short_tail() {
        let text = "x".repeat(2000);
        let chunks = split_chunks(&text, CHUNK_CHARS);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.text.chars().count() == 1000));
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 5 two-byte characters, chunked by 2 characters.
        let text = "ééééé";
        let chunks = split_chunks(text, 2);
        let sizes: Vec<usize> = chunks.iter().map(|c| c.text.chars().count()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(chunks.iter().map(|c| c.text.as_str()).collect::<String>(), text);
        assert_eq!(chunks[2].position, 2);
    }
}
