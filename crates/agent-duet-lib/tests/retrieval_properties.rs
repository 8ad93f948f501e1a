use agent_duet::model::chunk::split_chunks;
use agent_duet::retrieval::{retrieve, retrieve_context};
use agent_duet::LexicalIndex;

/// Document whose 40-character chunks each carry a distinct vocabulary.
fn topical_document() -> String {
    [
        "solar panels convert sunlight power",
        "wind turbines spin blades generators",
        "hydro dams store water reservoirs",
        "nuclear reactors split uranium atoms",
        "batteries buffer grid storage peaks",
    ]
    .iter()
    .map(|s| format!("{:<40}", s))
    .collect()
}

#[test]
fn chunking_is_deterministic() {
    let text: String = "lorem ipsum dolor sit amet ".repeat(100).chars().take(2500).collect();
    let first = split_chunks(&text, 1000);
    let second = split_chunks(&text, 1000);
    assert_eq!(first, second);

    let lens: Vec<usize> = first.iter().map(|c| c.text.chars().count()).collect();
    assert_eq!(lens, vec![1000, 1000, 500]);
    let rejoined: String = first.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(rejoined, text);
}

#[test]
fn empty_index_retrieves_nothing() {
    let index = LexicalIndex::build("");
    assert!(index.is_empty());
    assert!(retrieve(&index, "anything at all", 3).is_empty());
    assert_eq!(retrieve_context(&index, "anything at all", 3), "");
    assert!(retrieve(&index, "", 3).is_empty());
}

#[test]
fn top_k_bound_and_ordering() {
    let index = LexicalIndex::build_with_chunk_size(&topical_document(), 40);
    assert_eq!(index.len(), 5);

    for k in 0..8 {
        let hits = retrieve(&index, "solar power storage for the grid", k);
        assert_eq!(hits.len(), k.min(index.len()));
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                assert!(pair[0].chunk.position < pair[1].chunk.position);
            }
        }
    }
}

#[test]
fn chunk_text_retrieves_itself_first() {
    let index = LexicalIndex::build_with_chunk_size(&topical_document(), 40);
    for chunk in index.chunks() {
        let hits = retrieve(&index, &chunk.text, 1);
        assert_eq!(hits[0].chunk.position, chunk.position);
        assert!((hits[0].score - 1.0).abs() < 1e-4);
    }
}

#[test]
fn unrelated_query_scores_zero_in_chunk_order() {
    let index = LexicalIndex::build_with_chunk_size(&topical_document(), 40);
    let hits = retrieve(&index, "zebra xylophone", 3);
    let positions: Vec<usize> = hits.iter().map(|h| h.chunk.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
    assert!(hits.iter().all(|h| h.score == 0.0));
}

#[test]
fn context_joins_best_first() {
    let index = LexicalIndex::build_with_chunk_size(&topical_document(), 40);
    let context = retrieve_context(&index, "wind turbines and hydro dams", 2);
    let parts: Vec<&str> = context.split("\n\n").collect();
    assert_eq!(parts.len(), 2);
    assert!(parts.iter().any(|p| p.starts_with("wind turbines")));
    assert!(parts.iter().any(|p| p.starts_with("hydro dams")));
}
