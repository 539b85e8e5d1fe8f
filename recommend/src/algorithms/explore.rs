use super::walk::previous_node;
use super::{
    attraction, choose_weighted, prefer_unvisited, teleport_target, weighted_neighbors,
};
use cograph_core::model::PathEntry;
use rand::Rng;
use std::collections::HashSet;
use storage::index::UNREACHABLE_DISTANCE;
use storage::{EdgeWeight, WeightedGraph};

struct Walker<'g, W: EdgeWeight> {
    graph: &'g WeightedGraph<W>,
    path: Vec<PathEntry>,
    visited: HashSet<String>,
    current: String,
}

impl<'g, W: EdgeWeight> Walker<'g, W> {
    fn new(graph: &'g WeightedGraph<W>, start: &str) -> Self {
        Self {
            graph,
            path: vec![PathEntry::step(start)],
            visited: HashSet::from([start.to_string()]),
            current: start.to_string(),
        }
    }

    fn advance(&mut self, next: &str, is_teleport: bool) {
        self.visited.insert(next.to_string());
        self.path.push(if is_teleport {
            PathEntry::teleport(next)
        } else {
            PathEntry::step(next)
        });
        self.current = next.to_string();
    }

    /// Jump to a random unvisited node outside `excluded`. False when none is left.
    fn teleport<R: Rng + ?Sized>(&mut self, excluded: &[&str], rng: &mut R) -> bool {
        match teleport_target(self.graph, &self.visited, excluded, rng) {
            Some(target) => {
                self.advance(target, true);
                true
            }
            None => false,
        }
    }
}

/// Weighted random walk of `length` steps that jumps to an unvisited node
/// with probability `teleport_prob` at each step.
pub fn exploratory_walk<W, R>(
    graph: &WeightedGraph<W>,
    entity: &str,
    length: usize,
    teleport_prob: f64,
    rng: &mut R,
) -> Vec<PathEntry>
where
    W: EdgeWeight,
    R: Rng + ?Sized,
{
    if !graph.contains(entity) {
        return Vec::new();
    }

    let mut walker = Walker::new(graph, entity);
    for _ in 0..length {
        if rng.gen::<f64>() < teleport_prob && walker.teleport(&[], rng) {
            continue;
        }

        let neighbors = weighted_neighbors(graph, &walker.current, None);
        if neighbors.is_empty() {
            // Dead end: forced detour, or stop if every node is already on the path.
            if walker.teleport(&[], rng) {
                continue;
            }
            break;
        }

        let candidates = prefer_unvisited(neighbors, &walker.visited);
        let Some(next) = choose_weighted(rng, &candidates) else {
            break;
        };
        walker.advance(next, false);
    }

    walker.path
}

/// Guided walk toward `end` with random detours. Detours never land on either
/// endpoint, and the walk ends once no detour target is left.
pub fn guided_exploratory_walk<W, R>(
    graph: &WeightedGraph<W>,
    start: &str,
    end: &str,
    max_steps: usize,
    teleport_prob: f64,
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
    let endpoints = [start, end];
    let mut walker = Walker::new(graph, start);

    for _ in 0..max_steps {
        if walker.current == end {
            break;
        }

        if rng.gen::<f64>() < teleport_prob {
            if walker.teleport(&endpoints, rng) {
                continue;
            }
            break;
        }

        let previous = previous_node(&walker.path);
        let neighbors = weighted_neighbors(graph, &walker.current, previous);
        let unvisited: Vec<(&str, f64)> = neighbors
            .into_iter()
            .filter(|(id, _)| !walker.visited.contains(*id))
            .collect();
        if unvisited.is_empty() {
            if walker.teleport(&endpoints, rng) {
                continue;
            }
            break;
        }

        let scored: Vec<(&str, f64)> = unvisited
            .into_iter()
            .map(|(id, weight)| {
                let hops = distances.get(id).copied().unwrap_or(UNREACHABLE_DISTANCE);
                (id, attraction(weight, hops))
            })
            .collect();
        let Some(next) = choose_weighted(rng, &scored) else {
            break;
        };
        walker.advance(next, false);
    }

    walker.path
}
