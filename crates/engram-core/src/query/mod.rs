//! Query Planner — EQL filter evaluation plus text/vector/hybrid/activation
//! search modes, dispatched from one `execute` entry point.

mod ast;
mod eval;
mod lexer;
mod parser;

pub use ast::{Condition, Expr, Op};
pub use eval::{eval as eval_expr, NeuronaView};
pub use parser::parse;

use std::collections::HashMap;

use crate::activation::{self, ActivationConfig};
use crate::embeddings::{self, GloveTable};
use crate::error::Result;
use crate::graph::Graph;
use crate::model::Neurona;
use crate::search::{self, Bm25Index, VectorIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Filter,
    Text,
    Vector,
    Hybrid,
    Activation,
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub mode: QueryMode,
    /// EQL expression, used by `Filter` mode.
    pub eql: Option<String>,
    /// Free-text query, used by `Text`/`Vector`/`Hybrid`/`Activation`.
    pub text: Option<String>,
    pub limit: usize,
}

/// A matched Neurona with its mode-specific score (`1.0` for filter matches).
#[derive(Debug, Clone)]
pub struct RankedNeurona {
    pub neurona: Neurona,
    pub score: f64,
}

/// The indices `execute` draws on. Any absent optional index degrades that
/// mode gracefully rather than erroring (e.g. vector mode with no
/// `VectorIndex` returns an empty result).
pub struct QueryContext<'a> {
    pub neuronas: &'a [Neurona],
    pub bm25: Option<&'a Bm25Index>,
    pub vectors: Option<&'a VectorIndex>,
    pub glove: Option<&'a GloveTable>,
    pub graph: Option<&'a Graph>,
}

pub fn execute(config: &QueryConfig, ctx: &QueryContext) -> Result<Vec<RankedNeurona>> {
    match config.mode {
        QueryMode::Filter => execute_filter(config, ctx),
        QueryMode::Text => Ok(execute_text(config, ctx)),
        QueryMode::Vector => Ok(execute_vector(config, ctx)),
        QueryMode::Hybrid => Ok(execute_hybrid(config, ctx)),
        QueryMode::Activation => execute_activation(config, ctx),
    }
}

fn execute_filter(config: &QueryConfig, ctx: &QueryContext) -> Result<Vec<RankedNeurona>> {
    let Some(eql) = &config.eql else { return Ok(Vec::new()) };
    let expr = parse(eql)?;
    let mut out = Vec::new();
    for n in ctx.neuronas {
        let view = NeuronaView::from_neurona(n);
        if eval_expr(&expr, &view) {
            out.push(RankedNeurona { neurona: n.clone(), score: 1.0 });
            if out.len() >= config.limit {
                break;
            }
        }
    }
    Ok(out)
}

fn by_id<'a>(ctx: &'a QueryContext) -> HashMap<&'a str, &'a Neurona> {
    ctx.neuronas.iter().map(|n| (n.id.as_str(), n)).collect()
}

fn bm25_scores(config: &QueryConfig, ctx: &QueryContext, limit: usize) -> Vec<(String, f64)> {
    match (config.text.as_deref(), ctx.bm25) {
        (Some(q), Some(index)) => index.search(q, limit),
        _ => Vec::new(),
    }
}

fn vector_scores(config: &QueryConfig, ctx: &QueryContext, limit: usize) -> Vec<(String, f64)> {
    match (config.text.as_deref(), ctx.vectors, ctx.glove) {
        (Some(q), Some(index), Some(glove)) => {
            let query_vec = embeddings::embed_text(glove, q);
            index.search(&query_vec, limit)
        }
        _ => Vec::new(),
    }
}

fn to_ranked(scores: Vec<(String, f64)>, index: &HashMap<&str, &Neurona>) -> Vec<RankedNeurona> {
    scores
        .into_iter()
        .filter_map(|(id, score)| index.get(id.as_str()).map(|n| RankedNeurona { neurona: (*n).clone(), score }))
        .collect()
}

fn execute_text(config: &QueryConfig, ctx: &QueryContext) -> Vec<RankedNeurona> {
    let index = by_id(ctx);
    to_ranked(bm25_scores(config, ctx, config.limit), &index)
}

fn execute_vector(config: &QueryConfig, ctx: &QueryContext) -> Vec<RankedNeurona> {
    let index = by_id(ctx);
    to_ranked(vector_scores(config, ctx, config.limit), &index)
}

fn execute_hybrid(config: &QueryConfig, ctx: &QueryContext) -> Vec<RankedNeurona> {
    let index = by_id(ctx);
    let bm25 = bm25_scores(config, ctx, usize::MAX);
    let vector = vector_scores(config, ctx, usize::MAX);
    let fused = search::fuse(&bm25, &vector, 0.6, 0.4, config.limit);
    to_ranked(fused, &index)
}

fn execute_activation(config: &QueryConfig, ctx: &QueryContext) -> Result<Vec<RankedNeurona>> {
    let Some(graph) = ctx.graph else { return Ok(Vec::new()) };
    let index = by_id(ctx);
    let bm25 = bm25_scores(config, ctx, usize::MAX);
    let vector = vector_scores(config, ctx, usize::MAX);
    let results = activation::activate(graph, &bm25, &vector, ActivationConfig::default(), &|| false)?;
    let mut ranked: Vec<RankedNeurona> = results
        .into_iter()
        .filter_map(|r| index.get(r.id.as_str()).map(|n| RankedNeurona { neurona: (*n).clone(), score: r.activation }))
        .collect();
    ranked.truncate(config.limit);
    Ok(ranked)
}
