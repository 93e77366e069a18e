//! Sync Orchestrator — the deterministic scan → graph → cache → vectors
//! pipeline that keeps `.activations/*` coherent with the Markdown source
//! of truth, grounded on `consolidation::sleep`'s staged
//! config-struct-plus-runner shape.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::embeddings::{self, GloveTable};
use crate::error::Result;
use crate::graph::{self, Graph};
use crate::model::Neurona;
use crate::search::VectorIndex;
use crate::store;
use crate::validate;

mod cache;

pub use cache::LlmCache;

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncConfig {
    pub force: bool,
}

/// Wall-clock and outcome of one pipeline stage.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub name: &'static str,
    pub duration: Duration,
    pub detail: String,
}

#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub stages: Vec<StageReport>,
    pub neurona_count: usize,
    pub warnings: Vec<String>,
}

impl SyncReport {
    fn record(&mut self, name: &'static str, start: Instant, detail: impl Into<String>) {
        self.stages.push(StageReport {
            name,
            duration: start.elapsed(),
            detail: detail.into(),
        });
    }
}

struct Layout {
    neuronas_dir: PathBuf,
    graph_path: PathBuf,
    summaries_path: PathBuf,
    tokens_path: PathBuf,
    vectors_path: PathBuf,
    glove_cache_path: PathBuf,
}

impl Layout {
    fn new(cortex_dir: &Path) -> Self {
        let activations = cortex_dir.join(".activations");
        let cache = activations.join("cache");
        Self {
            neuronas_dir: cortex_dir.join("neuronas"),
            graph_path: activations.join("graph.idx"),
            summaries_path: cache.join("summaries.cache"),
            tokens_path: cache.join("tokens.cache"),
            vectors_path: activations.join("vectors.bin"),
            glove_cache_path: std::env::var("ENGRAM_GLOVE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| cache.join("glove_cache.bin")),
        }
    }
}

/// Run the sync pipeline for `cortex_dir`. Per-file Neurona errors are
/// warnings, never fatal; a fatal index-write failure deletes the stale
/// index rather than leaving it corrupted. `cancel` is polled between
/// stages and between files within the vector stage.
pub fn run(cortex_dir: &Path, config: SyncConfig, cancel: &dyn Fn() -> bool) -> Result<SyncReport> {
    let layout = Layout::new(cortex_dir);
    let mut report = SyncReport::default();

    if cancel() {
        return Err(crate::error::EngramError::Cancelled);
    }

    let scan_start = Instant::now();
    let neuronas = store::scan_neuronas(&layout.neuronas_dir)?;
    report.neurona_count = neuronas.len();
    report.record("scan", scan_start, format!("{} neuronas", neuronas.len()));

    if cancel() {
        return Err(crate::error::EngramError::Cancelled);
    }

    let graph_start = Instant::now();
    let graph_detail = sync_graph(&layout, &neuronas, config.force, &mut report.warnings)?;
    report.record("graph", graph_start, graph_detail);

    if cancel() {
        return Err(crate::error::EngramError::Cancelled);
    }

    let cache_start = Instant::now();
    let cache_detail = sync_cache(&layout)?;
    report.record("cache", cache_start, cache_detail);

    if cancel() {
        return Err(crate::error::EngramError::Cancelled);
    }

    let vectors_start = Instant::now();
    let vectors_detail = sync_vectors(&layout, &neuronas, config.force, &mut report.warnings, cancel)?;
    report.record("vectors", vectors_start, vectors_detail);

    Ok(report)
}

/// Rebuilds the Graph from Neuronas' connections, unless a valid
/// `graph.idx` already exists and `!force` (step 1's "index-validated"
/// fast path). Dangling targets, cycles, and orphans become warnings, never
/// failures — the graph is a derived cache.
fn sync_graph(
    layout: &Layout,
    neuronas: &[Neurona],
    force: bool,
    warnings: &mut Vec<String>,
) -> Result<String> {
    if !force {
        if let Some(existing) = graph::load_graph(&layout.graph_path) {
            return Ok(format!(
                "index-validated ({} nodes, {} edges)",
                existing.node_count(),
                existing.edge_count()
            ));
        }
    }

    let known_ids: std::collections::HashSet<&str> = neuronas.iter().map(|n| n.id.as_str()).collect();

    let mut g = Graph::new();
    for n in neuronas {
        g.insert_node(&n.id);
        for conn in n.all_connections() {
            if !known_ids.contains(conn.target_id.as_str()) {
                warnings.push(format!("{}: dangling target {}", n.id, conn.target_id));
            }
            g.add_edge(&n.id, &conn.target_id, conn.weight);
        }
    }

    for witness in validate::detect_cycles(&g) {
        warnings.push(format!("cycle detected through {witness}"));
    }
    for orphan in validate::detect_orphans(&g) {
        warnings.push(format!("orphan neurona: {orphan}"));
    }

    if let Err(e) = graph::save_graph(&g, &layout.graph_path) {
        let _ = std::fs::remove_file(&layout.graph_path);
        return Err(crate::error::EngramError::io(&layout.graph_path, e));
    }

    Ok(format!("rebuilt ({} nodes, {} edges)", g.node_count(), g.edge_count()))
}

/// Loads the LLM summary/token caches (missing → empty) and writes them
/// back unchanged, matching spec's "idempotent write-back" rule.
fn sync_cache(layout: &Layout) -> Result<String> {
    let cache = LlmCache::load(&layout.summaries_path, &layout.tokens_path);
    let summaries_len = cache.summaries.len();
    let tokens_len = cache.token_counts.len();
    if let Err(e) = cache.save(&layout.summaries_path, &layout.tokens_path) {
        return Err(crate::error::EngramError::io(&layout.summaries_path, e));
    }
    Ok(format!("{summaries_len} summaries, {tokens_len} token counts"))
}

/// Rebuilds the vector index when stale, forced, or absent, using the
/// shared GloVe cache. Absent GloVe cache degrades to a skipped stage with
/// a warning rather than failing sync outright.
fn sync_vectors(
    layout: &Layout,
    neuronas: &[Neurona],
    force: bool,
    warnings: &mut Vec<String>,
    cancel: &dyn Fn() -> bool,
) -> Result<String> {
    let latest_mtime = store::latest_modification_time(&layout.neuronas_dir);

    let needs_rebuild = match VectorIndex::load(&layout.vectors_path) {
        Some((_, stored_ts)) => {
            force || match latest_mtime {
                Some(m) => m > stored_ts,
                None => true,
            }
        }
        None => true,
    };

    if !needs_rebuild {
        return Ok("up to date".to_string());
    }

    let Some(glove) = load_glove(&layout.glove_cache_path) else {
        warnings.push("GloVe cache absent; skipping vector stage (filter/text modes still work)".to_string());
        return Ok("skipped: no GloVe cache".to_string());
    };

    // Embarrassingly parallel per-file embedding pass. `par_iter().map()` is
    // an indexed parallel iterator, so `.collect()` preserves `neuronas`'
    // order regardless of how rayon schedules the work across threads —
    // persisted vector order stays thread-count-independent.
    let embedded: Vec<(String, Vec<f32>)> = neuronas
        .par_iter()
        .map(|n| (n.id.clone(), embeddings::embed_text(&glove, &n.indexable_text())))
        .collect();

    if cancel() {
        return Err(crate::error::EngramError::Cancelled);
    }

    let mut index = VectorIndex::new(glove.dim());
    for (id, vector) in embedded {
        // add_vector only fails on a dimension mismatch, which cannot occur
        // here since every vector comes from the same table.
        let _ = index.add_vector(&id, &vector);
    }

    let source_timestamp = latest_mtime.unwrap_or_else(chrono::Utc::now);
    if let Err(e) = index.save(&layout.vectors_path, source_timestamp) {
        let _ = std::fs::remove_file(&layout.vectors_path);
        return Err(crate::error::EngramError::io(&layout.vectors_path, e));
    }

    Ok(format!("rebuilt ({} vectors, dim {})", index.len(), index.dim()))
}

fn load_glove(path: &Path) -> Option<GloveTable> {
    GloveTable::load_cache(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_cortex(dir: &Path) {
        std::fs::create_dir_all(dir.join("neuronas")).unwrap();
        std::fs::write(
            dir.join("neuronas/req.one.md"),
            "---\nid: req.one\ntitle: One\ntype: requirement\nupdated: 2024-01-01T00:00:00Z\nconnections:\n  blocked_by:\n    - id: issue.missing\n      weight: 50\n---\nbody\n",
        )
        .unwrap();
    }

    #[test]
    fn sync_scans_builds_graph_and_reports_stages() {
        let dir = tempdir().unwrap();
        make_cortex(dir.path());

        let report = run(dir.path(), SyncConfig::default(), &|| false).unwrap();

        assert_eq!(report.neurona_count, 1);
        assert_eq!(report.stages.len(), 4);
        assert!(report.stages.iter().any(|s| s.name == "graph"));
        assert!(report.warnings.iter().any(|w| w.contains("dangling target issue.missing")));
        assert!(dir.path().join(".activations/graph.idx").exists());
    }

    #[test]
    fn second_sync_without_force_reuses_valid_graph() {
        let dir = tempdir().unwrap();
        make_cortex(dir.path());
        run(dir.path(), SyncConfig::default(), &|| false).unwrap();

        let report = run(dir.path(), SyncConfig { force: false }, &|| false).unwrap();
        let graph_stage = report.stages.iter().find(|s| s.name == "graph").unwrap();
        assert!(graph_stage.detail.starts_with("index-validated"));
    }

    #[test]
    fn force_rebuilds_graph_even_when_cached() {
        let dir = tempdir().unwrap();
        make_cortex(dir.path());
        run(dir.path(), SyncConfig::default(), &|| false).unwrap();

        let report = run(dir.path(), SyncConfig { force: true }, &|| false).unwrap();
        let graph_stage = report.stages.iter().find(|s| s.name == "graph").unwrap();
        assert!(graph_stage.detail.starts_with("rebuilt"));
    }

    #[test]
    fn missing_glove_cache_skips_vector_stage_with_warning() {
        let dir = tempdir().unwrap();
        make_cortex(dir.path());
        let report = run(dir.path(), SyncConfig::default(), &|| false).unwrap();
        assert!(report.warnings.iter().any(|w| w.contains("GloVe cache absent")));
    }

    #[test]
    fn cancellation_before_scan_short_circuits() {
        let dir = tempdir().unwrap();
        make_cortex(dir.path());
        let err = run(dir.path(), SyncConfig::default(), &|| true).unwrap_err();
        assert!(matches!(err, crate::error::EngramError::Cancelled));
    }
}
