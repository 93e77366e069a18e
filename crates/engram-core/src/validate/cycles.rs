//! Cycle and orphan detection over the forward graph.

use std::collections::HashMap;

use crate::graph::Graph;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Three-color DFS over the forward graph. Each back edge encountered
/// records its closing node as a cycle witness (possibly empty, and a
/// witness may repeat if multiple back edges close on the same node).
pub fn detect_cycles(graph: &Graph) -> Vec<String> {
    let mut color: HashMap<String, Color> = HashMap::new();
    let mut witnesses = Vec::new();
    let mut nodes: Vec<&str> = graph.nodes().collect();
    nodes.sort_unstable();

    for start in nodes {
        if !matches!(color.get(start), None | Some(Color::White)) {
            continue;
        }
        visit(graph, start, &mut color, &mut witnesses);
    }
    witnesses
}

fn visit(graph: &Graph, id: &str, color: &mut HashMap<String, Color>, witnesses: &mut Vec<String>) {
    color.insert(id.to_string(), Color::Gray);
    for edge in graph.get_adjacent(id) {
        match color.get(edge.target.as_str()) {
            Some(Color::Gray) => witnesses.push(edge.target.clone()),
            Some(Color::Black) => {}
            _ => visit(graph, &edge.target, color, witnesses),
        }
    }
    color.insert(id.to_string(), Color::Black);
}

/// A Neurona is orphan iff it has neither outgoing nor incoming edges.
/// Never fatal — callers surface these as warnings only.
pub fn detect_orphans(graph: &Graph) -> Vec<String> {
    let mut orphans: Vec<String> = graph
        .nodes()
        .filter(|id| graph.degree(id) == 0 && graph.in_degree(id) == 0)
        .map(String::from)
        .collect();
    orphans.sort_unstable();
    orphans
}
