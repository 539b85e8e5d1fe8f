use crate::chunker::{chunker_for, ChunkingConfig};
use crate::document::ScrapedDocument;
use crate::matcher::EntityMatcher;
use cograph_core::config::IngestionConfig;
use cograph_core::entities::DirectoryError;
use cograph_core::error::{CographError, ErrorCode};
use cograph_core::model::NetworkKind;
use std::collections::BTreeMap;
use storage::{CooccurrenceGraph, GraphStoreError, NetworkStats};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid documents file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Entity directory error: {0}")]
    Entities(#[from] DirectoryError),
    #[error("Snapshot error: {0}")]
    Storage(#[from] GraphStoreError),
}

impl CographError for BuildError {
    fn error_code(&self) -> ErrorCode {
        match self {
            BuildError::Parse(_) => ErrorCode::InvalidArgument,
            _ => ErrorCode::Internal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuilderConfig {
    pub chunking: ChunkingConfig,
    pub remove_isolated: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            remove_isolated: true,
        }
    }
}

impl From<&IngestionConfig> for BuilderConfig {
    fn from(config: &IngestionConfig) -> Self {
        Self {
            chunking: ChunkingConfig::from(config),
            remove_isolated: config.remove_isolated,
        }
    }
}

/// Counts how often entity pairs are mentioned in the same unit of text.
pub struct CooccurrenceBuilder {
    matcher: EntityMatcher,
    entities: Vec<String>,
    config: BuilderConfig,
}

impl CooccurrenceBuilder {
    pub fn new(entities: &[String], config: BuilderConfig) -> Self {
        let matcher = EntityMatcher::new(entities.iter().cloned());
        Self {
            matcher,
            entities: entities.to_vec(),
            config,
        }
    }

    pub fn build(&self, kind: NetworkKind, documents: &[ScrapedDocument]) -> CooccurrenceGraph {
        let chunker = chunker_for(kind, &self.config.chunking);
        let mut graph = CooccurrenceGraph::new();
        for entity in &self.entities {
            graph.add_node(entity.as_str());
        }

        let mut units = 0usize;
        for document in documents {
            for unit in chunker.units(&document.text) {
                units += 1;
                let found = self.matcher.find_in(unit);
                for (i, a) in found.iter().enumerate() {
                    for b in &found[i + 1..] {
                        graph.increment_edge(a, b);
                    }
                }
            }
        }

        if self.config.remove_isolated {
            let removed = graph.remove_isolated_nodes();
            debug!("Removed {} isolated nodes from {} network", removed, kind);
        }

        let stats = NetworkStats::of(&graph);
        info!(
            "Built {} network from {} units: {} nodes, {} edges, density {:.4}, {} components",
            kind, units, stats.nodes, stats.edges, stats.density, stats.components
        );
        debug!(
            "{} network: avg degree {:.2}, avg clustering {:.4}, diameter {}, avg path length {:.2}",
            kind, stats.avg_degree, stats.avg_clustering, stats.diameter, stats.avg_path_length
        );
        graph
    }

    pub fn build_kinds(
        &self,
        kinds: &[NetworkKind],
        documents: &[ScrapedDocument],
    ) -> BTreeMap<NetworkKind, CooccurrenceGraph> {
        kinds
            .iter()
            .map(|kind| (*kind, self.build(*kind, documents)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities() -> Vec<String> {
        ["Charminar", "Haleem", "Irani Chai", "Golconda Fort"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_sentence_pairs_counted_once_per_unit() {
        let builder = CooccurrenceBuilder::new(&entities(), BuilderConfig::default());
        let docs = vec![ScrapedDocument::from_text(
            "Haleem near Charminar is a must. Charminar and haleem again, haleem! Irani Chai alone here.",
        )];
        let graph = builder.build(NetworkKind::Sentence, &docs);
        assert_eq!(graph.weight("Charminar", "Haleem"), Some(2.0));
        assert!(!graph.contains("Golconda Fort"));
        assert!(!graph.contains("Irani Chai"));
    }

    #[test]
    fn test_page_network_links_across_sentences() {
        let config = BuilderConfig {
            remove_isolated: false,
            ..BuilderConfig::default()
        };
        let builder = CooccurrenceBuilder::new(&entities(), config);
        let docs = vec![ScrapedDocument::from_text(
            "Visit Golconda Fort in the morning. Later have Irani Chai in the old city.",
        )];
        let networks = builder.build_kinds(&NetworkKind::ALL, &docs);
        assert_eq!(networks.len(), 3);
        assert_eq!(
            networks[&NetworkKind::Page].weight("Golconda Fort", "Irani Chai"),
            Some(1.0)
        );
        assert!(!networks[&NetworkKind::Sentence].has_edge("Golconda Fort", "Irani Chai"));
        assert_eq!(networks[&NetworkKind::Sentence].node_count(), 4);
    }
}
