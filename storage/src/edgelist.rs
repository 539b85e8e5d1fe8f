//! Storage-neutral conversions: graph <-> [`GraphSnapshot`] and its JSON edge-list form.

use crate::index::{EdgeWeight, WeightedGraph};
use cograph_core::error::{CographError, ErrorCode};
use cograph_core::model::{EdgeRecord, GraphSnapshot};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EdgeListError {
    #[error("invalid edge list: {0}")]
    Json(#[from] serde_json::Error),
    #[error("edge {from} - {to} has invalid weight {weight}")]
    InvalidWeight {
        from: String,
        to: String,
        weight: f64,
    },
}

impl CographError for EdgeListError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidArgument
    }
}

pub fn to_snapshot<W: EdgeWeight>(graph: &WeightedGraph<W>) -> GraphSnapshot {
    GraphSnapshot {
        nodes: graph.node_ids().map(str::to_string).collect(),
        edges: graph
            .edges()
            .into_iter()
            .map(|(source, target, weight)| EdgeRecord::new(source, target, weight.to_f64()))
            .collect(),
    }
}

pub fn from_snapshot<W: EdgeWeight>(
    snapshot: &GraphSnapshot,
) -> Result<WeightedGraph<W>, EdgeListError> {
    let mut graph = WeightedGraph::new();
    for node in &snapshot.nodes {
        graph.add_node(node.clone());
    }
    for edge in &snapshot.edges {
        if !edge.weight.is_finite() || edge.weight < 0.0 {
            return Err(EdgeListError::InvalidWeight {
                from: edge.source.clone(),
                to: edge.target.clone(),
                weight: edge.weight,
            });
        }
        graph.add_edge(
            edge.source.clone(),
            edge.target.clone(),
            W::from_f64(edge.weight),
        );
    }
    Ok(graph)
}

pub fn to_json<W: EdgeWeight>(graph: &WeightedGraph<W>) -> Result<String, EdgeListError> {
    Ok(serde_json::to_string_pretty(&to_snapshot(graph))?)
}

/// Accepts `{ "nodes": [...], "edges": [...] }`; a missing `weight` counts as one.
pub fn from_json<W: EdgeWeight>(raw: &str) -> Result<WeightedGraph<W>, EdgeListError> {
    let loose: LooseSnapshot = serde_json::from_str(raw)?;
    let snapshot = GraphSnapshot {
        nodes: loose.nodes,
        edges: loose
            .edges
            .into_iter()
            .map(|edge| EdgeRecord::new(edge.source, edge.target, edge.weight.unwrap_or(1.0)))
            .collect(),
    };
    from_snapshot(&snapshot)
}

#[derive(serde::Deserialize)]
struct LooseSnapshot {
    #[serde(default)]
    nodes: Vec<String>,
    #[serde(default)]
    edges: Vec<LooseEdge>,
}

#[derive(serde::Deserialize)]
struct LooseEdge {
    source: String,
    target: String,
    #[serde(default)]
    weight: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CooccurrenceGraph;

    #[test]
    fn test_json_keeps_isolated_nodes_and_case() {
        let mut graph = CooccurrenceGraph::new();
        graph.add_edge("Irani Chai", "Osmania Biscuit", 7.0);
        graph.add_node("irani chai");

        let json = to_json(&graph).unwrap();
        let restored: CooccurrenceGraph = from_json(&json).unwrap();
        assert_eq!(restored.node_count(), 3);
        assert!(restored.contains("irani chai"));
        assert_eq!(restored.weight("Osmania Biscuit", "Irani Chai"), Some(7.0));
    }

    #[test]
    fn test_missing_weight_defaults_to_one() {
        let raw = r#"{"edges": [{"source": "Haleem", "target": "Charminar"}]}"#;
        let graph: WeightedGraph<u32> = from_json(raw).unwrap();
        assert_eq!(graph.weight("Haleem", "Charminar"), Some(1));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let raw = r#"{"edges": [{"source": "A", "target": "B", "weight": -2.0}]}"#;
        let err = from_json::<f64>(raw).unwrap_err();
        assert!(matches!(err, EdgeListError::InvalidWeight { .. }));
    }
}
