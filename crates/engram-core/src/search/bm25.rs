//! BM25 lexical index over `title + " " + tags`.

use std::collections::HashMap;

use crate::text::tokenize;

const K1: f64 = 1.2;
const B: f64 = 0.75;

#[derive(Debug, Clone, Default)]
pub struct Bm25Index {
    /// term -> (doc id -> term frequency in that doc)
    term_freqs: HashMap<String, HashMap<String, u32>>,
    /// term -> number of documents containing it
    term_docs: HashMap<String, u32>,
    doc_lengths: HashMap<String, u32>,
    avg_doc_length: f64,
    doc_count: usize,
    built: bool,
}

impl Bm25Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index one document's text under `id`. Must be called for every
    /// document before [`Bm25Index::build`].
    pub fn add_document(&mut self, id: &str, text: &str) {
        let tokens = tokenize(text);
        self.doc_lengths.insert(id.to_string(), tokens.len() as u32);
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for t in &tokens {
            *counts.entry(t.as_str()).or_insert(0) += 1;
        }
        for (term, count) in counts {
            self.term_freqs
                .entry(term.to_string())
                .or_default()
                .insert(id.to_string(), count);
            *self.term_docs.entry(term.to_string()).or_insert(0) += 1;
        }
        self.doc_count += 1;
        self.built = false;
    }

    /// Finalize `avg_doc_length` after all documents are added.
    pub fn build(&mut self) {
        let total: u32 = self.doc_lengths.values().sum();
        self.avg_doc_length = if self.doc_count == 0 {
            0.0
        } else {
            total as f64 / self.doc_count as f64
        };
        self.built = true;
    }

    fn idf(&self, term: &str) -> f64 {
        let n = self.doc_count as f64;
        let df = *self.term_docs.get(term).unwrap_or(&0) as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    fn score_doc(&self, term: &str, doc_id: &str) -> f64 {
        let f = *self
            .term_freqs
            .get(term)
            .and_then(|m| m.get(doc_id))
            .unwrap_or(&0) as f64;
        if f == 0.0 {
            return 0.0;
        }
        let doc_len = *self.doc_lengths.get(doc_id).unwrap_or(&0) as f64;
        let denom = f + K1 * (1.0 - B + B * doc_len / self.avg_doc_length.max(1e-9));
        self.idf(term) * (f * (K1 + 1.0)) / denom
    }

    /// Top-`limit` documents with positive score, descending. Empty query
    /// yields an empty result.
    pub fn search(&self, query: &str, limit: usize) -> Vec<(String, f64)> {
        if !self.built {
            return Vec::new();
        }
        let terms = tokenize(query);
        if terms.is_empty() {
            return Vec::new();
        }
        let mut scores: HashMap<&str, f64> = HashMap::new();
        for term in &terms {
            let Some(docs) = self.term_freqs.get(term) else { continue };
            for doc_id in docs.keys() {
                *scores.entry(doc_id.as_str()).or_insert(0.0) += self.score_doc(term, doc_id);
            }
        }
        let mut results: Vec<(String, f64)> = scores
            .into_iter()
            .filter(|(_, s)| *s > 0.0)
            .map(|(id, s)| (id.to_string(), s))
            .collect();
        results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then_with(|| a.0.cmp(&b.0)));
        results.truncate(limit);
        results
    }
}
