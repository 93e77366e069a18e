//! BM25 ranking: shorter documents win ties via length normalization, and
//! a document missing a query term still ranks, just lower.

use engram_core::search::Bm25Index;

fn three_doc_index() -> Bm25Index {
    let mut idx = Bm25Index::new();
    idx.add_document("d1", "apple");
    idx.add_document("d2", "apple banana");
    idx.add_document("d3", "apple banana cherry");
    idx.build();
    idx
}

#[test]
fn single_term_query_favors_the_shorter_document() {
    let idx = three_doc_index();
    let results = idx.search("apple", 10);
    let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["d1", "d2", "d3"]);
}

#[test]
fn two_term_query_ranks_the_single_match_doc_last() {
    let idx = three_doc_index();
    let results = idx.search("apple banana", 10);
    let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids.last(), Some(&"d1"));
}

#[test]
fn adding_a_non_matching_document_preserves_ranking_of_the_others() {
    let before = three_doc_index().search("apple", 10);
    let before_ids: Vec<&str> = before.iter().map(|(id, _)| id.as_str()).collect();

    let mut idx = three_doc_index();
    idx.add_document("d4", "zephyr quasar nebula");
    idx.build();
    let after = idx.search("apple", 10);
    let after_ids: Vec<&str> = after.iter().filter(|(id, _)| id != "d4").map(|(id, _)| id.as_str()).collect();

    assert_eq!(before_ids, after_ids);
    assert!(!after.iter().any(|(id, _)| id == "d4"));
}
