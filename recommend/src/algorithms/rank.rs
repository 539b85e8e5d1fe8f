use crate::pagerank::{personalized_pagerank, PageRankConfig, PageRankError};
use std::cmp::Ordering;
use storage::{EdgeWeight, WeightedGraph};

/// Highest score first; equal scores in ascending id order.
fn top_k_by_score(mut scored: Vec<(&str, f64)>, top_k: usize) -> Vec<String> {
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });
    scored
        .into_iter()
        .take(top_k)
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Neighbors by raw co-occurrence count.
pub fn recommend_simple<W: EdgeWeight>(
    graph: &WeightedGraph<W>,
    entity: &str,
    top_k: usize,
) -> Vec<String> {
    let scored = graph
        .neighbors(entity)
        .map(|(id, weight)| (id, weight.to_f64()))
        .collect();
    top_k_by_score(scored, top_k)
}

/// Every other node ranked by PageRank restarted at `entity`.
pub fn recommend_pagerank<W: EdgeWeight>(
    graph: &WeightedGraph<W>,
    entity: &str,
    top_k: usize,
    config: &PageRankConfig,
) -> Result<Vec<String>, PageRankError> {
    if !graph.contains(entity) {
        return Ok(Vec::new());
    }
    let scores = personalized_pagerank(graph, entity, config)?;
    let scored = scores
        .iter()
        .filter(|(id, _)| id.as_str() != entity)
        .map(|(id, score)| (id.as_str(), *score))
        .collect();
    Ok(top_k_by_score(scored, top_k))
}

/// Neighbors by co-occurrence count times degree rarity, so distinctive
/// entities can outrank merely popular ones.
pub fn recommend_inverse_frequency<W: EdgeWeight>(
    graph: &WeightedGraph<W>,
    entity: &str,
    top_k: usize,
) -> Vec<String> {
    if !graph.contains(entity) {
        return Vec::new();
    }
    let idf = graph.inverse_degree_weights();
    let scored = graph
        .neighbors(entity)
        .map(|(id, weight)| (id, weight.to_f64() * idf.get(id).copied().unwrap_or(0.0)))
        .collect();
    top_k_by_score(scored, top_k)
}
