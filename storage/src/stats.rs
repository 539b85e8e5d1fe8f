use crate::index::{EdgeWeight, WeightedGraph};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub avg_degree: f64,
    pub components: usize,
    /// Mean local clustering coefficient; nodes with degree below 2 count as 0.
    pub avg_clustering: f64,
    /// Longest shortest path inside the largest component.
    pub diameter: usize,
    /// Mean hop distance over ordered node pairs of the largest component.
    pub avg_path_length: f64,
}

impl NetworkStats {
    pub fn of<W: EdgeWeight>(graph: &WeightedGraph<W>) -> Self {
        let nodes = graph.node_count();
        let edges = graph.edge_count();
        let density = if nodes < 2 {
            0.0
        } else {
            (2.0 * edges as f64) / (nodes as f64 * (nodes as f64 - 1.0))
        };
        let avg_degree = if nodes == 0 {
            0.0
        } else {
            2.0 * edges as f64 / nodes as f64
        };

        let components = connected_components(graph);
        let (diameter, avg_path_length) = largest_component(&components)
            .map(|component| path_lengths(graph, component))
            .unwrap_or((0, 0.0));

        Self {
            nodes,
            edges,
            density,
            avg_degree,
            components: components.len(),
            avg_clustering: average_clustering(graph),
            diameter,
            avg_path_length,
        }
    }
}

/// Hop counts from `source` to every node it can reach, itself included at 0.
pub(crate) fn bfs_hops<'a, W: EdgeWeight>(
    graph: &'a WeightedGraph<W>,
    source: &'a str,
) -> HashMap<&'a str, usize> {
    let mut hops = HashMap::new();
    let mut queue = VecDeque::new();
    hops.insert(source, 0);
    queue.push_back(source);

    while let Some(node) = queue.pop_front() {
        let next = hops[node] + 1;
        for (neighbor, _) in graph.neighbors(node) {
            if !hops.contains_key(neighbor) {
                hops.insert(neighbor, next);
                queue.push_back(neighbor);
            }
        }
    }

    hops
}

/// The first of the biggest components.
fn largest_component(components: &[Vec<String>]) -> Option<&Vec<String>> {
    components.iter().fold(None, |best: Option<&Vec<String>>, c| match best {
        Some(b) if b.len() >= c.len() => Some(b),
        _ => Some(c),
    })
}

fn path_lengths<W: EdgeWeight>(graph: &WeightedGraph<W>, component: &[String]) -> (usize, f64) {
    let n = component.len();
    if n < 2 {
        return (0, 0.0);
    }

    let mut diameter = 0;
    let mut total = 0usize;
    for node in component {
        for &hops in bfs_hops(graph, node).values() {
            diameter = diameter.max(hops);
            total += hops;
        }
    }

    (diameter, total as f64 / (n * (n - 1)) as f64)
}

fn local_clustering<W: EdgeWeight>(graph: &WeightedGraph<W>, node: &str) -> f64 {
    let neighbors: Vec<&str> = graph.neighbors(node).map(|(id, _)| id).collect();
    let k = neighbors.len();
    if k < 2 {
        return 0.0;
    }

    let mut links = 0usize;
    for (i, a) in neighbors.iter().enumerate() {
        for b in &neighbors[i + 1..] {
            if graph.has_edge(a, b) {
                links += 1;
            }
        }
    }

    2.0 * links as f64 / (k * (k - 1)) as f64
}

pub fn average_clustering<W: EdgeWeight>(graph: &WeightedGraph<W>) -> f64 {
    let n = graph.node_count();
    if n == 0 {
        return 0.0;
    }
    let total: f64 = graph.node_ids().map(|id| local_clustering(graph, id)).sum();
    total / n as f64
}

/// Connected components, each sorted, ordered by their first node.
pub fn connected_components<W: EdgeWeight>(graph: &WeightedGraph<W>) -> Vec<Vec<String>> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut components = Vec::new();

    for start in graph.node_ids() {
        if visited.contains(start) {
            continue;
        }

        let mut queue = VecDeque::new();
        let mut component = Vec::new();

        visited.insert(start);
        queue.push_back(start);

        while let Some(node_id) = queue.pop_front() {
            component.push(node_id.to_string());
            for (neighbor_id, _) in graph.neighbors(node_id) {
                if visited.insert(neighbor_id) {
                    queue.push_back(neighbor_id);
                }
            }
        }

        component.sort_unstable();
        components.push(component);
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CooccurrenceGraph;

    #[test]
    fn test_stats_for_two_components() {
        let mut graph = CooccurrenceGraph::new();
        graph.add_edge("A", "B", 1.0);
        graph.add_edge("B", "C", 2.0);
        graph.add_edge("X", "Y", 1.0);

        let stats = NetworkStats::of(&graph);
        assert_eq!(stats.nodes, 5);
        assert_eq!(stats.edges, 3);
        assert_eq!(stats.components, 2);
        assert!((stats.density - 0.3).abs() < 1e-12);
        assert!((stats.avg_degree - 1.2).abs() < 1e-12);
        assert_eq!(stats.diameter, 2);
        assert!((stats.avg_path_length - 8.0 / 6.0).abs() < 1e-12);

        let components = connected_components(&graph);
        assert_eq!(components[0], vec!["A", "B", "C"]);
        assert_eq!(components[1], vec!["X", "Y"]);
    }

    #[test]
    fn test_stats_for_empty_graph() {
        let stats = NetworkStats::of(&CooccurrenceGraph::new());
        assert_eq!(stats.nodes, 0);
        assert_eq!(stats.components, 0);
        assert_eq!(stats.density, 0.0);
        assert_eq!(stats.diameter, 0);
        assert_eq!(stats.avg_path_length, 0.0);
    }

    #[test]
    fn test_clustering_of_triangle_with_tail() {
        let mut graph = CooccurrenceGraph::new();
        graph.add_edge("A", "B", 1.0);
        graph.add_edge("B", "C", 1.0);
        graph.add_edge("A", "C", 1.0);
        graph.add_edge("C", "D", 1.0);

        assert!((local_clustering(&graph, "C") - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(local_clustering(&graph, "D"), 0.0);
        assert!((average_clustering(&graph) - 7.0 / 12.0).abs() < 1e-12);

        let stats = NetworkStats::of(&graph);
        assert_eq!(stats.diameter, 2);
        // 8 pairs at 1 hop, 4 at 2 hops
        assert!((stats.avg_path_length - 16.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_node_component_has_no_paths() {
        let mut graph = CooccurrenceGraph::new();
        graph.add_node("solo");
        let stats = NetworkStats::of(&graph);
        assert_eq!(stats.components, 1);
        assert_eq!(stats.avg_degree, 0.0);
        assert_eq!(stats.diameter, 0);
        assert_eq!(stats.avg_path_length, 0.0);
    }
}
