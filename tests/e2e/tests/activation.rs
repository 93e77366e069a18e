//! Spreading activation: seed a single node, watch it decay across a
//! weighted chain.

use engram_core::activation::{activate, ActivationConfig};
use engram_core::graph::Graph;

#[test]
fn activation_decays_through_a_weighted_chain() {
    let mut graph = Graph::new();
    graph.add_edge("A", "B", 100);
    graph.add_edge("B", "C", 50);

    // BM25 and vector modalities agree A is the sole match, so the fused
    // seed keeps its full weight regardless of the fusion's alpha.
    let bm25 = vec![("A".to_string(), 1.0)];
    let vector = vec![("A".to_string(), 1.0)];

    let results = activate(&graph, &bm25, &vector, ActivationConfig::default(), &|| false).unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);

    let a = results.iter().find(|r| r.id == "A").unwrap();
    let b = results.iter().find(|r| r.id == "B").unwrap();
    let c = results.iter().find(|r| r.id == "C").unwrap();
    assert!((a.activation - 1.0).abs() < 1e-9);
    assert!((b.activation - 0.5).abs() < 1e-9);
    assert!((c.activation - 0.125).abs() < 1e-9);
}
