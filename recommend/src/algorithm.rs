use crate::algorithms;
use crate::pagerank::{PageRankConfig, PageRankError};
use cograph_core::model::PathEntry;
use rand::Rng;
use serde::{Deserialize, Serialize};
use storage::{EdgeWeight, WeightedGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Simple,
    Pagerank,
    InverseFrequency,
    RandomWalk,
    GuidedWalk,
    ExploratoryWalk,
    GuidedExploratoryWalk,
}

impl Algorithm {
    pub fn all() -> [Algorithm; 7] {
        [
            Algorithm::Simple,
            Algorithm::Pagerank,
            Algorithm::InverseFrequency,
            Algorithm::RandomWalk,
            Algorithm::GuidedWalk,
            Algorithm::ExploratoryWalk,
            Algorithm::GuidedExploratoryWalk,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            Algorithm::Simple => "simple",
            Algorithm::Pagerank => "pagerank",
            Algorithm::InverseFrequency => "inverse_frequency",
            Algorithm::RandomWalk => "random_walk",
            Algorithm::GuidedWalk => "guided_walk",
            Algorithm::ExploratoryWalk => "exploratory_walk",
            Algorithm::GuidedExploratoryWalk => "guided_exploratory_walk",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Algorithm::Simple => "Simple Co-occurrence",
            Algorithm::Pagerank => "PageRank",
            Algorithm::InverseFrequency => "Inverse Frequency",
            Algorithm::RandomWalk => "Random Walk (Explore)",
            Algorithm::GuidedWalk => "Guided Walk (A->B)",
            Algorithm::ExploratoryWalk => "Exploratory Walk (Explore + Detours)",
            Algorithm::GuidedExploratoryWalk => "Guided Exploratory (A->B + Detours)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Algorithm::Simple => "Most frequently co-occurring neighbors",
            Algorithm::Pagerank => "Personalized PageRank-based recommendations",
            Algorithm::InverseFrequency => "Balances popularity with rarity",
            Algorithm::RandomWalk => "Weighted random walk paths",
            Algorithm::GuidedWalk => "Finds a smart path between two entities",
            Algorithm::ExploratoryWalk => "Random walk with teleportation",
            Algorithm::GuidedExploratoryWalk => "Guided path with random detours",
        }
    }

    /// Guided algorithms route between two endpoints instead of starting from one entity.
    pub fn is_guided(&self) -> bool {
        matches!(
            self,
            Algorithm::GuidedWalk | Algorithm::GuidedExploratoryWalk
        )
    }

    pub fn info(&self) -> AlgorithmInfo {
        AlgorithmInfo {
            key: self.key(),
            name: self.display_name(),
            description: self.description(),
        }
    }

    pub fn run<W, R>(
        &self,
        graph: &WeightedGraph<W>,
        target: &Target,
        params: &WalkParams,
        pagerank: &PageRankConfig,
        rng: &mut R,
    ) -> Result<Recommendation, PageRankError>
    where
        W: EdgeWeight,
        R: Rng + ?Sized,
    {
        let (start, end) = match target {
            Target::Entity(entity) => (entity.as_str(), None),
            Target::Route { start, end } => (start.as_str(), Some(end.as_str())),
        };

        let recommendation = match (*self, end) {
            (Algorithm::Simple, _) => {
                Recommendation::Ranked(algorithms::recommend_simple(graph, start, params.top_k))
            }
            (Algorithm::Pagerank, _) => Recommendation::Ranked(algorithms::recommend_pagerank(
                graph,
                start,
                params.top_k,
                pagerank,
            )?),
            (Algorithm::InverseFrequency, _) => Recommendation::Ranked(
                algorithms::recommend_inverse_frequency(graph, start, params.top_k),
            ),
            (Algorithm::RandomWalk, _) => {
                Recommendation::Path(algorithms::random_walk(graph, start, params.length, rng))
            }
            (Algorithm::ExploratoryWalk, _) => Recommendation::Path(algorithms::exploratory_walk(
                graph,
                start,
                params.length,
                params.teleport_prob,
                rng,
            )),
            (Algorithm::GuidedWalk, Some(end)) => Recommendation::Path(algorithms::guided_walk(
                graph,
                start,
                end,
                params.max_steps,
                rng,
            )),
            (Algorithm::GuidedExploratoryWalk, Some(end)) => {
                Recommendation::Path(algorithms::guided_exploratory_walk(
                    graph,
                    start,
                    end,
                    params.max_steps,
                    params.teleport_prob,
                    rng,
                ))
            }
            // A guided algorithm without a destination has nothing to route to.
            (Algorithm::GuidedWalk | Algorithm::GuidedExploratoryWalk, None) => {
                Recommendation::Path(Vec::new())
            }
        };
        Ok(recommendation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Entity(String),
    Route { start: String, end: String },
}

/// Resolved parameters for one request; every field is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkParams {
    pub top_k: usize,
    pub length: usize,
    pub max_steps: usize,
    pub teleport_prob: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum Recommendation {
    Ranked(Vec<String>),
    Path(Vec<PathEntry>),
}

impl Recommendation {
    pub fn is_empty(&self) -> bool {
        match self {
            Recommendation::Ranked(items) => items.is_empty(),
            Recommendation::Path(path) => path.is_empty(),
        }
    }

    /// Node ids in order, without detour markers.
    pub fn node_ids(&self) -> Vec<&str> {
        match self {
            Recommendation::Ranked(items) => items.iter().map(String::as_str).collect(),
            Recommendation::Path(path) => path.iter().map(|e| e.node_id.as_str()).collect(),
        }
    }
}

/// One result in a response, keyed by its source entity or `"start → end"` route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecommendation {
    pub key: String,
    pub entities: Vec<String>,
    pub result: Recommendation,
}

impl EntityRecommendation {
    pub fn for_target(target: &Target, result: Recommendation) -> Self {
        match target {
            Target::Entity(entity) => Self {
                key: entity.clone(),
                entities: vec![entity.clone()],
                result,
            },
            Target::Route { start, end } => Self {
                key: format!("{} → {}", start, end),
                entities: vec![start.clone(), end.clone()],
                result,
            },
        }
    }
}
