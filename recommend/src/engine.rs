use crate::algorithm::{Algorithm, AlgorithmInfo, EntityRecommendation, Target};
use crate::dsl::{RecommendRequest, RequestLimits, RequestValidationError};
use crate::pagerank::{PageRankConfig, PageRankError};
use crate::reinforcement::{involved_groups, reinforce};
use cograph_core::config::{AppConfig, RecommenderConfig};
use cograph_core::error::{CographError, ErrorCode};
use cograph_core::metrics::{MetricsCollector, MetricsSnapshot};
use cograph_core::model::NetworkKind;
use ingestion::EntityMatcher;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use storage::{
    CentralityScores, CooccurrenceGraph, GraphStoreError, NetworkStats, SnapshotStore,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub network: NetworkKind,
    pub algorithm: Algorithm,
    /// Entities the request resolved to in the selected network.
    pub entities: Vec<String>,
    pub recommendations: Vec<EntityRecommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub latency_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestValidationError),
    #[error("invalid request: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("network {network} is unavailable: {reason}")]
    NetworkUnavailable {
        network: NetworkKind,
        reason: &'static str,
    },
    #[error("pagerank failed: {0}")]
    PageRank(#[from] PageRankError),
    #[error("storage error: {0}")]
    Storage(#[from] GraphStoreError),
}

impl CographError for RecommendError {
    fn error_code(&self) -> ErrorCode {
        match self {
            RecommendError::InvalidRequest(_) | RecommendError::Parse(_) => {
                ErrorCode::InvalidArgument
            }
            RecommendError::NetworkUnavailable { .. } => ErrorCode::FailedPrecondition,
            RecommendError::PageRank(_) | RecommendError::Storage(_) => ErrorCode::Internal,
        }
    }
}

impl RecommendError {
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error_code: self.error_code(),
            message: self.to_string(),
        }
    }
}

/// Serves recommendations over the sentence, paragraph and page networks.
///
/// Each network sits behind its own lock, held for a request's whole
/// read, reinforce and persist cycle so concurrent requests never lose updates.
pub struct RecommendationEngine {
    networks: BTreeMap<NetworkKind, Arc<Mutex<CooccurrenceGraph>>>,
    store: Option<Arc<SnapshotStore>>,
    config: RecommenderConfig,
    pagerank: PageRankConfig,
    metrics: Arc<MetricsCollector>,
}

impl RecommendationEngine {
    pub fn new(config: RecommenderConfig) -> Self {
        Self {
            networks: BTreeMap::new(),
            store: None,
            config,
            pagerank: PageRankConfig::default(),
            metrics: Arc::new(MetricsCollector::default()),
        }
    }

    pub fn with_network(mut self, kind: NetworkKind, graph: CooccurrenceGraph) -> Self {
        self.networks.insert(kind, Arc::new(Mutex::new(graph)));
        self
    }

    /// Persist reinforced networks to `store` after each request.
    pub fn with_store(mut self, store: SnapshotStore) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    pub fn with_pagerank(mut self, config: PageRankConfig) -> Self {
        self.pagerank = config;
        self
    }

    /// Load every network kind from the configured data directory. Kinds
    /// without a snapshot start empty and reject requests until rebuilt.
    pub async fn open(config: &AppConfig) -> Result<Self, RecommendError> {
        let store = SnapshotStore::new(&config.storage.data_dir);
        let mut engine = Self::new(config.recommender.clone());
        for kind in NetworkKind::ALL {
            let graph = match store.load(kind).await? {
                Some(graph) => graph,
                None => {
                    warn!("No {} network snapshot in {}", kind, store.dir().display());
                    CooccurrenceGraph::new()
                }
            };
            info!(
                "Loaded {} network: {} nodes, {} edges",
                kind,
                graph.node_count(),
                graph.edge_count()
            );
            engine = engine.with_network(kind, graph);
        }
        Ok(engine.with_store(store))
    }

    pub async fn stats(&self, kind: NetworkKind) -> Option<NetworkStats> {
        let handle = self.networks.get(&kind)?;
        let graph = handle.lock().await;
        Some(NetworkStats::of(&*graph))
    }

    /// Degree, eigenvector, betweenness and closeness for every node, as of now.
    pub async fn centrality(&self, kind: NetworkKind) -> Option<CentralityScores> {
        let handle = self.networks.get(&kind)?;
        let graph = handle.lock().await;
        Some(CentralityScores::of(&*graph))
    }

    /// Copy of a network's current state.
    pub async fn graph(&self, kind: NetworkKind) -> Option<CooccurrenceGraph> {
        let handle = self.networks.get(&kind)?;
        let graph = handle.lock().await;
        Some(graph.clone())
    }

    pub fn recommenders(&self) -> Vec<AlgorithmInfo> {
        Algorithm::all().iter().map(Algorithm::info).collect()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub async fn execute_json(&self, raw: &str) -> Result<RecommendResponse, RecommendError> {
        let request = match RecommendRequest::parse_json(raw) {
            Ok(request) => request,
            Err(err) => {
                self.metrics.record_request("unknown", 0, false);
                return Err(err.into());
            }
        };
        self.execute(request).await
    }

    pub async fn execute(
        &self,
        request: RecommendRequest,
    ) -> Result<RecommendResponse, RecommendError> {
        let start = Instant::now();
        let algorithm = request.algorithm;
        let result = self.execute_internal(request, start).await;

        let latency_us = start.elapsed().as_micros() as u64;
        self.metrics
            .record_request(algorithm.key(), latency_us, result.is_ok());
        if let Err(err) = &result {
            warn!("{} request failed: {}", algorithm.key(), err);
        }
        result
    }

    async fn execute_internal(
        &self,
        request: RecommendRequest,
        start: Instant,
    ) -> Result<RecommendResponse, RecommendError> {
        request.validate(&RequestLimits::from(&self.config))?;

        let kind = request.network.unwrap_or(self.config.default_network);
        let handle = self
            .networks
            .get(&kind)
            .ok_or(RecommendError::NetworkUnavailable {
                network: kind,
                reason: "not loaded",
            })?;
        let mut graph = handle.lock().await;
        if graph.is_empty() {
            return Err(RecommendError::NetworkUnavailable {
                network: kind,
                reason: "empty",
            });
        }

        let mut rng = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let params = request.params(self.config.default_top_k, &mut rng);
        let algorithm = request.algorithm;

        let (targets, entities, missing) = resolve_targets(&request, &*graph);
        debug!(
            "Dispatching {} on {} network for {} targets",
            algorithm.key(),
            kind,
            targets.len()
        );

        let mut recommendations = Vec::with_capacity(targets.len());
        for target in &targets {
            let result = algorithm.run(&*graph, target, &params, &self.pagerank, &mut rng)?;
            if !result.is_empty() {
                recommendations.push(EntityRecommendation::for_target(target, result));
            }
        }

        let groups = involved_groups(self.config.reinforcement, &entities, &recommendations);
        let pairs = reinforce(&mut *graph, &groups);
        self.metrics.record_reinforcement(pairs);
        if pairs > 0 {
            info!("Reinforced {} entity pairs in {} network", pairs, kind);
            if self.config.persist_after_request {
                if let Some(store) = &self.store {
                    store.save(kind, &*graph).await?;
                    self.metrics.record_persist();
                }
            }
        }
        drop(graph);

        let message = if entities.is_empty() {
            Some(format!(
                "No entities from your request were found in the {} network.",
                kind
            ))
        } else if !missing.is_empty() {
            Some(format!(
                "Not found in the {} network: {}",
                kind,
                missing.join(", ")
            ))
        } else {
            None
        };

        Ok(RecommendResponse {
            network: kind,
            algorithm,
            entities,
            recommendations,
            message,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Work items for a request plus the entities they resolved to and the
/// named entities the graph does not contain.
fn resolve_targets(
    request: &RecommendRequest,
    graph: &CooccurrenceGraph,
) -> (Vec<Target>, Vec<String>, Vec<String>) {
    if request.algorithm.is_guided() {
        let (found, missing): (Vec<String>, Vec<String>) =
            [&request.start_entity, &request.end_entity]
                .into_iter()
                .map(|endpoint| endpoint.as_deref().unwrap_or_default().trim().to_string())
                .partition(|id| graph.contains(id));
        if !missing.is_empty() {
            return (Vec::new(), found, missing);
        }
        return (request.route().into_iter().collect(), found, Vec::new());
    }

    let mut seen = HashSet::new();
    let mut entities = Vec::new();
    let mut missing = Vec::new();
    for name in &request.entities {
        let name = name.trim();
        if !seen.insert(name.to_string()) {
            continue;
        }
        if graph.contains(name) {
            entities.push(name.to_string());
        } else {
            missing.push(name.to_string());
        }
    }
    if let Some(text) = request.text.as_deref() {
        let matcher = EntityMatcher::new(graph.node_ids());
        for name in matcher.find_in(text) {
            if seen.insert(name.to_string()) {
                entities.push(name.to_string());
            }
        }
    }

    let targets = entities.iter().cloned().map(Target::Entity).collect();
    (targets, entities, missing)
}
