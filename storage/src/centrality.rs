//! Per-node centrality over the unweighted structure of a network.

use crate::index::{EdgeWeight, WeightedGraph};
use crate::stats::bfs_hops;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use tracing::warn;

const EIGENVECTOR_MAX_ITERATIONS: usize = 1000;
const EIGENVECTOR_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CentralityMeasure {
    Degree,
    Eigenvector,
    Betweenness,
    Closeness,
}

impl CentralityMeasure {
    pub const ALL: [CentralityMeasure; 4] = [
        CentralityMeasure::Degree,
        CentralityMeasure::Eigenvector,
        CentralityMeasure::Betweenness,
        CentralityMeasure::Closeness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CentralityMeasure::Degree => "degree",
            CentralityMeasure::Eigenvector => "eigenvector",
            CentralityMeasure::Betweenness => "betweenness",
            CentralityMeasure::Closeness => "closeness",
        }
    }
}

impl fmt::Display for CentralityMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Scores = BTreeMap<String, f64>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CentralityScores {
    pub degree: Scores,
    pub eigenvector: Scores,
    pub betweenness: Scores,
    pub closeness: Scores,
}

impl CentralityScores {
    pub fn of<W: EdgeWeight>(graph: &WeightedGraph<W>) -> Self {
        let eigenvector = eigenvector_centrality(graph).unwrap_or_else(|| {
            warn!("Eigenvector centrality did not converge; reporting zeros");
            graph.node_ids().map(|id| (id.to_string(), 0.0)).collect()
        });

        Self {
            degree: degree_centrality(graph),
            eigenvector,
            betweenness: betweenness_centrality(graph),
            closeness: closeness_centrality(graph),
        }
    }

    pub fn measure(&self, measure: CentralityMeasure) -> &Scores {
        match measure {
            CentralityMeasure::Degree => &self.degree,
            CentralityMeasure::Eigenvector => &self.eigenvector,
            CentralityMeasure::Betweenness => &self.betweenness,
            CentralityMeasure::Closeness => &self.closeness,
        }
    }

    /// The `n` highest-scoring nodes for one measure; ties in ascending id order.
    pub fn top_nodes(&self, measure: CentralityMeasure, n: usize) -> Vec<(String, f64)> {
        let mut ranked: Vec<(&String, f64)> = self
            .measure(measure)
            .iter()
            .map(|(id, score)| (id, *score))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked
            .into_iter()
            .take(n)
            .map(|(id, score)| (id.clone(), score))
            .collect()
    }
}

/// Degree over `N - 1`. A lone node scores 1.
pub fn degree_centrality<W: EdgeWeight>(graph: &WeightedGraph<W>) -> Scores {
    let n = graph.node_count();
    graph
        .node_ids()
        .map(|id| {
            let score = if n <= 1 {
                1.0
            } else {
                graph.degree(id) as f64 / (n - 1) as f64
            };
            (id.to_string(), score)
        })
        .collect()
}

/// Reachable-set closeness, scaled by the share of the graph each node reaches.
pub fn closeness_centrality<W: EdgeWeight>(graph: &WeightedGraph<W>) -> Scores {
    let n = graph.node_count();
    graph
        .node_ids()
        .map(|id| {
            let hops = bfs_hops(graph, id);
            let total: usize = hops.values().sum();
            let reached = hops.len() - 1;
            let score = if total > 0 && n > 1 {
                (reached as f64 / total as f64) * (reached as f64 / (n - 1) as f64)
            } else {
                0.0
            };
            (id.to_string(), score)
        })
        .collect()
}

/// Brandes' shortest-path betweenness, normalized by `(N-1)(N-2)`.
pub fn betweenness_centrality<W: EdgeWeight>(graph: &WeightedGraph<W>) -> Scores {
    let nodes: Vec<&str> = graph.node_ids().collect();
    let n = nodes.len();
    let index: HashMap<&str, usize> = nodes.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let adjacency: Vec<Vec<usize>> = nodes
        .iter()
        .map(|id| graph.neighbors(id).map(|(nb, _)| index[nb]).collect())
        .collect();

    let mut centrality = vec![0.0; n];
    for s in 0..n {
        let mut order = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut distance: Vec<Option<usize>> = vec![None; n];
        sigma[s] = 1.0;
        distance[s] = Some(0);

        let mut queue = VecDeque::from([s]);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            let dv = distance[v].unwrap_or(0);
            for &w in &adjacency[v] {
                if distance[w].is_none() {
                    distance[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if distance[w] == Some(dv + 1) {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0f64; n];
        while let Some(w) = order.pop() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    // Each unordered pair was counted from both ends.
    let scale = if n > 2 {
        1.0 / ((n - 1) * (n - 2)) as f64
    } else {
        1.0
    };
    nodes
        .iter()
        .zip(centrality)
        .map(|(id, score)| (id.to_string(), score * scale))
        .collect()
}

/// Principal eigenvector of the adjacency matrix by power iteration on `A + I`,
/// L2-normalized. `None` when it fails to converge.
pub fn eigenvector_centrality<W: EdgeWeight>(graph: &WeightedGraph<W>) -> Option<Scores> {
    let nodes: Vec<&str> = graph.node_ids().collect();
    let n = nodes.len();
    if n == 0 {
        return Some(Scores::new());
    }
    let index: HashMap<&str, usize> = nodes.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let adjacency: Vec<Vec<usize>> = nodes
        .iter()
        .map(|id| graph.neighbors(id).map(|(nb, _)| index[nb]).collect())
        .collect();

    let mut x = vec![1.0 / n as f64; n];
    for _ in 0..EIGENVECTOR_MAX_ITERATIONS {
        let last = x;
        x = last.clone();
        for (i, out) in adjacency.iter().enumerate() {
            for &j in out {
                x[j] += last[i];
            }
        }

        let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            x.iter_mut().for_each(|v| *v /= norm);
        }

        let err: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if err < n as f64 * EIGENVECTOR_TOLERANCE {
            return Some(
                nodes
                    .iter()
                    .zip(x)
                    .map(|(id, score)| (id.to_string(), score))
                    .collect(),
            );
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CooccurrenceGraph;

    fn path() -> CooccurrenceGraph {
        let mut graph = CooccurrenceGraph::new();
        graph.add_edge("A", "B", 5.0);
        graph.add_edge("B", "C", 1.0);
        graph
    }

    fn star() -> CooccurrenceGraph {
        let mut graph = CooccurrenceGraph::new();
        for leaf in ["a", "b", "c"] {
            graph.add_edge("hub", leaf, 2.0);
        }
        graph
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_path_graph_centrality() {
        let scores = CentralityScores::of(&path());

        assert!(close(scores.degree["A"], 0.5));
        assert!(close(scores.degree["B"], 1.0));

        assert!(close(scores.betweenness["B"], 1.0));
        assert!(close(scores.betweenness["A"], 0.0));

        assert!(close(scores.closeness["A"], 2.0 / 3.0));
        assert!(close(scores.closeness["B"], 1.0));

        // (1, sqrt 2, 1) / 2
        assert!(close(scores.eigenvector["A"], 0.5));
        assert!(close(scores.eigenvector["B"], std::f64::consts::FRAC_1_SQRT_2));
        assert!(close(scores.eigenvector["C"], 0.5));
    }

    #[test]
    fn test_star_graph_centrality() {
        let scores = CentralityScores::of(&star());

        assert!(close(scores.degree["hub"], 1.0));
        assert!(close(scores.degree["a"], 1.0 / 3.0));
        assert!(close(scores.betweenness["hub"], 1.0));
        assert!(close(scores.betweenness["c"], 0.0));
        assert!(close(scores.closeness["hub"], 1.0));
        assert!(close(scores.closeness["b"], 0.6));
        assert!(close(scores.eigenvector["hub"], std::f64::consts::FRAC_1_SQRT_2));
        assert!(close(scores.eigenvector["a"], 1.0 / 6f64.sqrt()));
    }

    #[test]
    fn test_closeness_is_scaled_by_reach() {
        let mut graph = path();
        graph.add_edge("X", "Y", 1.0);
        let closeness = closeness_centrality(&graph);
        // B reaches 2 of 4 others at total distance 2.
        assert!(close(closeness["B"], 0.5));
        assert!(close(closeness["X"], 0.25));
    }

    #[test]
    fn test_top_nodes_breaks_ties_by_id() {
        let scores = CentralityScores::of(&star());
        let top = scores.top_nodes(CentralityMeasure::Degree, 3);
        let ids: Vec<&str> = top.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["hub", "a", "b"]);
        assert_eq!(scores.top_nodes(CentralityMeasure::Closeness, 10).len(), 4);
    }

    #[test]
    fn test_empty_and_single_node_graphs() {
        let scores = CentralityScores::of(&CooccurrenceGraph::new());
        assert!(scores.eigenvector.is_empty());
        assert!(scores.degree.is_empty());

        let mut graph = CooccurrenceGraph::new();
        graph.add_node("solo");
        let scores = CentralityScores::of(&graph);
        assert_eq!(scores.degree["solo"], 1.0);
        assert_eq!(scores.closeness["solo"], 0.0);
        assert_eq!(scores.betweenness["solo"], 0.0);
        assert!(close(scores.eigenvector["solo"], 1.0));
    }
}
