//! The seven query algorithms. Each takes a graph plus scalar parameters and
//! an injected random source; an entity missing from the graph yields an
//! empty result rather than an error.

mod explore;
mod rank;
mod walk;

pub use explore::{exploratory_walk, guided_exploratory_walk};
pub use rank::{recommend_inverse_frequency, recommend_pagerank, recommend_simple};
pub use walk::{guided_walk, random_walk};

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use storage::{EdgeWeight, WeightedGraph};

/// Pull toward the destination: edge weight scaled by `1 / (1 + hops)`.
pub fn attraction(weight: f64, hops_to_end: usize) -> f64 {
    weight * (1.0 / (1.0 + hops_to_end as f64))
}

/// Weighted pick; uniform when the weights cannot form a distribution
/// (all zero, negative or non-finite).
pub(crate) fn choose_weighted<'a, R>(rng: &mut R, candidates: &[(&'a str, f64)]) -> Option<&'a str>
where
    R: Rng + ?Sized,
{
    if candidates.is_empty() {
        return None;
    }
    match WeightedIndex::new(candidates.iter().map(|(_, w)| *w)) {
        Ok(dist) => Some(candidates[dist.sample(rng)].0),
        Err(_) => candidates.choose(rng).map(|(id, _)| *id),
    }
}

/// Uniform pick among nodes not yet visited and not excluded. The pool is
/// materialized first so an exhausted graph returns `None` instead of spinning.
pub(crate) fn teleport_target<'g, W, R>(
    graph: &'g WeightedGraph<W>,
    visited: &HashSet<String>,
    excluded: &[&str],
    rng: &mut R,
) -> Option<&'g str>
where
    W: EdgeWeight,
    R: Rng + ?Sized,
{
    let pool: Vec<&str> = graph
        .node_ids()
        .filter(|id| !visited.contains(*id) && !excluded.contains(id))
        .collect();
    pool.choose(rng).copied()
}

/// Neighbors of `node` as `(id, weight)` pairs, minus `skip` when given.
pub(crate) fn weighted_neighbors<'g, W: EdgeWeight>(
    graph: &'g WeightedGraph<W>,
    node: &str,
    skip: Option<&str>,
) -> Vec<(&'g str, f64)> {
    graph
        .neighbors(node)
        .filter(|(id, _)| Some(*id) != skip)
        .map(|(id, weight)| (id, weight.to_f64()))
        .collect()
}

/// Candidates not yet on the path, or all of them when every one was visited.
pub(crate) fn prefer_unvisited<'g>(
    candidates: Vec<(&'g str, f64)>,
    visited: &HashSet<String>,
) -> Vec<(&'g str, f64)> {
    let unvisited: Vec<(&str, f64)> = candidates
        .iter()
        .filter(|(id, _)| !visited.contains(*id))
        .copied()
        .collect();
    if unvisited.is_empty() {
        candidates
    } else {
        unvisited
    }
}
