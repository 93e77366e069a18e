//! Fuse lexical and vector scores by weighted sum after min-max normalization.

use std::collections::HashMap;

/// Min-max normalize `scores` into `[0, 1]`. A lone entry has no range to
/// normalize against and keeps its full weight (`1.0`); two or more tied
/// entries are genuinely ambiguous and all normalize to `0.0`.
pub fn min_max_normalize(scores: &[(String, f64)]) -> HashMap<String, f64> {
    let mut out = HashMap::new();
    if scores.is_empty() {
        return out;
    }
    if scores.len() == 1 {
        out.insert(scores[0].0.clone(), 1.0);
        return out;
    }
    let min = scores.iter().map(|(_, s)| *s).fold(f64::INFINITY, f64::min);
    let max = scores.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    for (id, s) in scores {
        let normalized = if range.abs() < f64::EPSILON { 0.0 } else { (s - min) / range };
        out.insert(id.clone(), normalized);
    }
    out
}

/// Weighted sum of two normalized score maps over their id union, sorted
/// descending, truncated to `limit`.
pub fn fuse(
    bm25: &[(String, f64)],
    vector: &[(String, f64)],
    bm25_weight: f64,
    vector_weight: f64,
    limit: usize,
) -> Vec<(String, f64)> {
    let bm25_norm = min_max_normalize(bm25);
    let vector_norm = min_max_normalize(vector);

    let mut ids: Vec<String> = bm25_norm.keys().chain(vector_norm.keys()).cloned().collect();
    ids.sort_unstable();
    ids.dedup();

    let mut fused: Vec<(String, f64)> = ids
        .into_iter()
        .map(|id| {
            let b = bm25_norm.get(&id).copied().unwrap_or(0.0);
            let v = vector_norm.get(&id).copied().unwrap_or(0.0);
            let score = bm25_weight * b + vector_weight * v;
            (id, score)
        })
        .collect();
    fused.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then_with(|| a.0.cmp(&b.0)));
    fused.truncate(limit);
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_equal_scores_to_zero() {
        let scores = vec![("a".to_string(), 5.0), ("b".to_string(), 5.0)];
        let norm = min_max_normalize(&scores);
        assert_eq!(norm["a"], 0.0);
        assert_eq!(norm["b"], 0.0);
    }

    #[test]
    fn fuse_favors_document_strong_in_both() {
        let bm25 = vec![("a".to_string(), 10.0), ("b".to_string(), 1.0)];
        let vector = vec![("a".to_string(), 0.9), ("b".to_string(), 0.1)];
        let fused = fuse(&bm25, &vector, 0.6, 0.4, 10);
        assert_eq!(fused[0].0, "a");
    }

    #[test]
    fn fuse_treats_missing_side_as_zero() {
        let bm25 = vec![("a".to_string(), 10.0)];
        let vector: Vec<(String, f64)> = Vec::new();
        let fused = fuse(&bm25, &vector, 0.6, 0.4, 10);
        assert_eq!(fused[0].0, "a");
    }
}
