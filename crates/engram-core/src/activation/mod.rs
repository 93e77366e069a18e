//! Activation Engine — seed from BM25/vector relevance, then spread through
//! the graph with multiplicative decay.

use std::collections::HashMap;

use crate::error::{EngramError, Result};
use crate::graph::Graph;
use crate::search;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationConfig {
    /// Seed fusion weight for BM25 vs. vector (`alpha` and `1 - alpha`).
    pub alpha: f64,
    pub decay: f64,
    pub max_depth: usize,
    pub epsilon: f64,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            decay: 0.5,
            max_depth: 4,
            epsilon: 1e-4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivationResult {
    pub id: String,
    pub activation: f64,
    pub depth: usize,
}

/// Spread activation from the fused BM25/vector seed scores through `graph`.
/// `cancel` is polled between BFS levels; returning `true` short-circuits
/// with [`EngramError::Cancelled`].
pub fn activate(
    graph: &Graph,
    bm25_scores: &[(String, f64)],
    vector_scores: &[(String, f64)],
    config: ActivationConfig,
    cancel: &dyn Fn() -> bool,
) -> Result<Vec<ActivationResult>> {
    let seeds = search::fuse(bm25_scores, vector_scores, config.alpha, 1.0 - config.alpha, usize::MAX);

    let mut best: HashMap<String, (f64, usize)> = HashMap::new();
    let mut current: Vec<(String, f64)> = Vec::new();
    for (id, a) in seeds {
        if a > 0.0 {
            best.insert(id.clone(), (a, 0));
            current.push((id, a));
        }
    }

    let mut depth = 0usize;
    while !current.is_empty() && depth < config.max_depth {
        if cancel() {
            return Err(EngramError::Cancelled);
        }
        depth += 1;
        let mut proposals: HashMap<String, f64> = HashMap::new();
        for (u, a_u) in &current {
            for edge in graph.get_adjacent(u) {
                let proposed = a_u * config.decay * (edge.weight as f64 / 100.0);
                if proposed < config.epsilon {
                    continue;
                }
                let slot = proposals.entry(edge.target.clone()).or_insert(0.0);
                if proposed > *slot {
                    *slot = proposed;
                }
            }
        }

        let mut next = Vec::new();
        for (id, proposed) in proposals {
            let improves = match best.get(&id) {
                Some((existing, _)) => proposed > *existing,
                None => true,
            };
            if improves {
                best.insert(id.clone(), (proposed, depth));
                next.push((id, proposed));
            }
        }
        current = next;
    }

    let mut results: Vec<ActivationResult> = best
        .into_iter()
        .map(|(id, (activation, depth))| ActivationResult { id, activation, depth })
        .collect();
    results.sort_by(|a, b| {
        b.activation
            .partial_cmp(&a.activation)
            .unwrap()
            .then_with(|| a.depth.cmp(&b.depth))
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_graph() -> Graph {
        let mut g = Graph::new();
        g.add_edge("a", "b", 100);
        g.add_edge("b", "c", 100);
        g
    }

    #[test]
    fn activation_decays_with_depth() {
        let g = chain_graph();
        let bm25 = vec![("a".to_string(), 1.0)];
        let vector: Vec<(String, f64)> = Vec::new();
        let results = activate(&g, &bm25, &vector, ActivationConfig::default(), &|| false).unwrap();
        let a = results.iter().find(|r| r.id == "a").unwrap();
        let b = results.iter().find(|r| r.id == "b").unwrap();
        assert!(a.activation > b.activation);
        assert_eq!(a.depth, 0);
        assert_eq!(b.depth, 1);
    }

    #[test]
    fn stops_propagating_below_epsilon() {
        let mut g = Graph::new();
        // Long chain where decay quickly drops under epsilon.
        for i in 0..20 {
            g.add_edge(&format!("n{i}"), &format!("n{}", i + 1), 10);
        }
        let bm25 = vec![("n0".to_string(), 1.0)];
        let results = activate(&g, &bm25, &[], ActivationConfig::default(), &|| false).unwrap();
        assert!(results.len() < 20);
    }

    #[test]
    fn cancellation_short_circuits() {
        let g = chain_graph();
        let bm25 = vec![("a".to_string(), 1.0)];
        let err = activate(&g, &bm25, &[], ActivationConfig::default(), &|| true).unwrap_err();
        assert!(matches!(err, EngramError::Cancelled));
    }

    #[test]
    fn no_seeds_yields_empty_result() {
        let g = chain_graph();
        let results = activate(&g, &[], &[], ActivationConfig::default(), &|| false).unwrap();
        assert!(results.is_empty());
    }
}
