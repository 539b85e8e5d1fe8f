//! Personalized PageRank by power iteration over edge-weighted transitions.

use cograph_core::error::{CographError, ErrorCode};
use std::collections::HashMap;
use storage::{EdgeWeight, WeightedGraph};
use thiserror::Error;

const DEFAULT_ALPHA: f64 = 0.85;
const DEFAULT_MAX_ITERATIONS: usize = 100;
const DEFAULT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRankConfig {
    /// Probability of following an edge rather than restarting at the source.
    pub alpha: f64,
    pub max_iterations: usize,
    /// Converged when the L1 change between iterations is below `N * tolerance`.
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PageRankError {
    #[error("personalization source {0:?} is not in the graph")]
    UnknownSource(String),
    #[error("power iteration failed to converge within {iterations} iterations")]
    NotConverged { iterations: usize },
}

impl CographError for PageRankError {
    fn error_code(&self) -> ErrorCode {
        match self {
            PageRankError::UnknownSource(_) => ErrorCode::NotFound,
            PageRankError::NotConverged { .. } => ErrorCode::Internal,
        }
    }
}

/// Stationary scores with every restart (and all dangling mass) sent to `source`.
pub fn personalized_pagerank<W: EdgeWeight>(
    graph: &WeightedGraph<W>,
    source: &str,
    config: &PageRankConfig,
) -> Result<HashMap<String, f64>, PageRankError> {
    if !graph.contains(source) {
        return Err(PageRankError::UnknownSource(source.to_string()));
    }

    let nodes: Vec<&str> = graph.node_ids().collect();
    let n = nodes.len();
    let index: HashMap<&str, usize> = nodes.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let source_idx = index[source];

    // Row-normalized outgoing transitions; nodes with zero out-weight are dangling.
    let mut transitions: Vec<Vec<(usize, f64)>> = Vec::with_capacity(n);
    let mut dangling = Vec::new();
    for (i, id) in nodes.iter().enumerate() {
        let out: Vec<(usize, f64)> = graph
            .neighbors(id)
            .map(|(neighbor, weight)| (index[neighbor], weight.to_f64()))
            .collect();
        let total: f64 = out.iter().map(|(_, w)| w).sum();
        if total > 0.0 {
            transitions.push(out.into_iter().map(|(j, w)| (j, w / total)).collect());
        } else {
            transitions.push(Vec::new());
            dangling.push(i);
        }
    }

    let alpha = config.alpha;
    let mut x = vec![1.0 / n as f64; n];
    for _ in 0..config.max_iterations {
        let last = x;
        x = vec![0.0; n];
        let dangling_sum = alpha * dangling.iter().map(|&i| last[i]).sum::<f64>();

        for (i, out) in transitions.iter().enumerate() {
            for &(j, w) in out {
                x[j] += alpha * last[i] * w;
            }
        }
        x[source_idx] += dangling_sum + (1.0 - alpha);

        let err: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if err < n as f64 * config.tolerance {
            return Ok(nodes
                .iter()
                .zip(x)
                .map(|(id, score)| (id.to_string(), score))
                .collect());
        }
    }

    Err(PageRankError::NotConverged {
        iterations: config.max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::CooccurrenceGraph;

    fn star() -> CooccurrenceGraph {
        let mut graph = CooccurrenceGraph::new();
        graph.add_edge("hub", "a", 1.0);
        graph.add_edge("hub", "b", 3.0);
        graph.add_edge("b", "c", 1.0);
        graph
    }

    #[test]
    fn test_scores_sum_to_one_and_favor_source() {
        let scores = personalized_pagerank(&star(), "a", &PageRankConfig::default()).unwrap();
        let total: f64 = scores.values().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(scores["a"] > scores["c"]);
        assert!(scores["b"] > scores["c"]);
    }

    #[test]
    fn test_isolated_source_keeps_all_mass() {
        let mut graph = star();
        graph.add_node("alone");
        let scores = personalized_pagerank(&graph, "alone", &PageRankConfig::default()).unwrap();
        assert!((scores["alone"] - 1.0).abs() < 1e-4);
        assert!(scores["hub"] < 1e-4);
    }

    #[test]
    fn test_iteration_cap_reports_non_convergence() {
        let config = PageRankConfig {
            max_iterations: 1,
            ..PageRankConfig::default()
        };
        let err = personalized_pagerank(&star(), "a", &config).unwrap_err();
        assert_eq!(err, PageRankError::NotConverged { iterations: 1 });
        assert_eq!(err.error_code(), ErrorCode::Internal);
    }

    #[test]
    fn test_unknown_source() {
        let err = personalized_pagerank(&star(), "zzz", &PageRankConfig::default()).unwrap_err();
        assert!(matches!(err, PageRankError::UnknownSource(_)));
    }
}
