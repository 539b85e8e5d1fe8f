use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
pub struct RequestMetrics {
    pub total_requests: u64,
    pub failed_requests: u64,
    pub per_algorithm: BTreeMap<String, u64>,
    pub latencies: VecDeque<u64>, // microseconds
}

#[derive(Debug, Clone, Default)]
pub struct GraphMetrics {
    pub reinforced_pairs: u64,
    pub persisted_snapshots: u64,
}

pub struct MetricsCollector {
    state: Arc<Mutex<MetricsState>>,
}

struct MetricsState {
    request_metrics: RequestMetrics,
    graph_metrics: GraphMetrics,
    max_history: usize,
}

impl MetricsCollector {
    pub fn new(max_history: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(MetricsState {
                request_metrics: RequestMetrics::default(),
                graph_metrics: GraphMetrics::default(),
                max_history,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MetricsState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record_request(&self, algorithm: &str, latency_us: u64, succeeded: bool) {
        let mut state = self.lock();
        let max_history = state.max_history;
        let requests = &mut state.request_metrics;
        requests.total_requests += 1;
        if !succeeded {
            requests.failed_requests += 1;
        }
        *requests
            .per_algorithm
            .entry(algorithm.to_string())
            .or_insert(0) += 1;
        requests.latencies.push_back(latency_us);
        if requests.latencies.len() > max_history {
            requests.latencies.pop_front();
        }
    }

    pub fn record_reinforcement(&self, pairs: usize) {
        let mut state = self.lock();
        state.graph_metrics.reinforced_pairs += pairs as u64;
    }

    pub fn record_persist(&self) {
        let mut state = self.lock();
        state.graph_metrics.persisted_snapshots += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.lock();
        let r = &state.request_metrics;
        let g = &state.graph_metrics;

        let mut sorted_latencies: Vec<u64> = r.latencies.iter().copied().collect();
        sorted_latencies.sort_unstable();

        let p50 = percentile(&sorted_latencies, 50.0);
        let p95 = percentile(&sorted_latencies, 95.0);
        let p99 = percentile(&sorted_latencies, 99.0);

        let error_rate = if r.total_requests > 0 {
            r.failed_requests as f32 / r.total_requests as f32
        } else {
            0.0
        };

        MetricsSnapshot {
            total_requests: r.total_requests,
            failed_requests: r.failed_requests,
            error_rate,
            per_algorithm: r.per_algorithm.clone(),
            p50,
            p95,
            p99,
            history_count: r.latencies.len(),
            reinforced_pairs: g.reinforced_pairs,
            persisted_snapshots: g.persisted_snapshots,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(1_000)
    }
}

fn percentile(sorted: &[u64], p: f32) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let idx = ((p / 100.0) * (sorted.len() as f32)).ceil() as usize;
    sorted[idx.saturating_sub(1).min(sorted.len() - 1)]
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub failed_requests: u64,
    pub error_rate: f32,
    pub per_algorithm: BTreeMap<String, u64>,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub history_count: usize,
    pub reinforced_pairs: u64,
    pub persisted_snapshots: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentiles_and_history_bound() {
        let metrics = MetricsCollector::new(10);
        for latency in 1..=20u64 {
            metrics.record_request("simple", latency, true);
        }
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 20);
        assert_eq!(snapshot.history_count, 10);
        assert_eq!(snapshot.p50, 15);
        assert_eq!(snapshot.p99, 20);
        assert!(snapshot.p95 >= snapshot.p50);
    }

    #[test]
    fn test_failures_and_algorithm_counts() {
        let metrics = MetricsCollector::default();
        metrics.record_request("pagerank", 5, false);
        metrics.record_request("simple", 5, true);
        metrics.record_request("simple", 5, true);
        metrics.record_reinforcement(3);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.failed_requests, 1);
        assert_eq!(snapshot.per_algorithm["simple"], 2);
        assert_eq!(snapshot.per_algorithm["pagerank"], 1);
        assert_eq!(snapshot.reinforced_pairs, 3);
        assert!((snapshot.error_rate - 1.0 / 3.0).abs() < 1e-6);
    }
}
