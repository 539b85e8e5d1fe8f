use super::{attraction, choose_weighted, prefer_unvisited, weighted_neighbors};
use cograph_core::model::PathEntry;
use rand::Rng;
use std::collections::HashSet;
use storage::index::UNREACHABLE_DISTANCE;
use storage::{EdgeWeight, WeightedGraph};

/// Weighted random walk of up to `length` steps, preferring unvisited neighbors.
pub fn random_walk<W, R>(
    graph: &WeightedGraph<W>,
    entity: &str,
    length: usize,
    rng: &mut R,
) -> Vec<PathEntry>
where
    W: EdgeWeight,
    R: Rng + ?Sized,
{
    if !graph.contains(entity) {
        return Vec::new();
    }

    let mut path = vec![PathEntry::step(entity)];
    let mut visited: HashSet<String> = HashSet::from([entity.to_string()]);
    let mut current = entity.to_string();

    for _ in 0..length {
        let candidates = prefer_unvisited(weighted_neighbors(graph, &current, None), &visited);
        let Some(next) = choose_weighted(rng, &candidates) else {
            break;
        };
        visited.insert(next.to_string());
        path.push(PathEntry::step(next));
        current = next.to_string();
    }

    path
}

/// Walk from `start` toward `end`, sampling neighbors by edge weight times
/// closeness to `end`. Never steps straight back to the previous node.
pub fn guided_walk<W, R>(
    graph: &WeightedGraph<W>,
    start: &str,
    end: &str,
    max_steps: usize,
    rng: &mut R,
) -> Vec<PathEntry>
where
    W: EdgeWeight,
    R: Rng + ?Sized,
{
    if !graph.contains(start) || !graph.contains(end) {
        return Vec::new();
    }

    let distances = graph.hop_distances_to(end);
    let mut path = vec![PathEntry::step(start)];
    let mut visited: HashSet<String> = HashSet::from([start.to_string()]);
    let mut current = start.to_string();

    for _ in 0..max_steps {
        if current == end {
            break;
        }

        let previous = previous_node(&path);
        let neighbors = weighted_neighbors(graph, &current, previous);
        if neighbors.is_empty() {
            break;
        }

        let scored: Vec<(&str, f64)> = prefer_unvisited(neighbors, &visited)
            .into_iter()
            .map(|(id, weight)| {
                let hops = distances.get(id).copied().unwrap_or(UNREACHABLE_DISTANCE);
                (id, attraction(weight, hops))
            })
            .collect();
        let Some(next) = choose_weighted(rng, &scored) else {
            break;
        };
        visited.insert(next.to_string());
        path.push(PathEntry::step(next));
        current = next.to_string();
    }

    path
}

/// The node visited just before the current one.
pub(super) fn previous_node(path: &[PathEntry]) -> Option<&str> {
    path.len()
        .checked_sub(2)
        .map(|idx| path[idx].node_id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use storage::CooccurrenceGraph;

    fn ids(path: &[PathEntry]) -> Vec<&str> {
        path.iter().map(|entry| entry.node_id.as_str()).collect()
    }

    #[test]
    fn test_random_walk_follows_edges() {
        let mut graph = CooccurrenceGraph::new();
        graph.add_edge("a", "b", 1.0);
        graph.add_edge("b", "c", 2.0);
        graph.add_edge("c", "d", 1.0);
        let mut rng = StdRng::seed_from_u64(11);

        let path = random_walk(&graph, "a", 6, &mut rng);
        assert_eq!(path.len(), 7);
        for pair in path.windows(2) {
            assert!(graph.has_edge(&pair[0].node_id, &pair[1].node_id));
        }
        assert_eq!(&ids(&path)[..4], &["a", "b", "c", "d"]);
    }

    #[test]
    fn test_random_walk_stops_on_isolated_start() {
        let mut graph = CooccurrenceGraph::new();
        graph.add_node("alone");
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(ids(&random_walk(&graph, "alone", 5, &mut rng)), vec!["alone"]);
        assert!(random_walk(&graph, "missing", 5, &mut rng).is_empty());
    }

    #[test]
    fn test_guided_walk_reaches_adjacent_end() {
        let mut graph = CooccurrenceGraph::new();
        graph.add_edge("start", "end", 1.0);
        let mut rng = StdRng::seed_from_u64(5);
        let path = guided_walk(&graph, "start", "end", 10, &mut rng);
        assert_eq!(ids(&path), vec!["start", "end"]);
    }

    #[test]
    fn test_guided_walk_suppresses_backtrack() {
        let mut graph = CooccurrenceGraph::new();
        graph.add_edge("a", "b", 1.0);
        let mut rng = StdRng::seed_from_u64(9);
        graph.add_node("z");
        let path = guided_walk(&graph, "a", "z", 8, &mut rng);
        assert_eq!(ids(&path), vec!["a", "b"]);
    }

    #[test]
    fn test_previous_node() {
        let path = vec![PathEntry::step("a"), PathEntry::teleport("b")];
        assert_eq!(previous_node(&path), Some("a"));
        assert_eq!(previous_node(&path[..1]), None);
    }
}
