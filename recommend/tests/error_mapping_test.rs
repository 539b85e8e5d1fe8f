use cograph_core::config::RecommenderConfig;
use cograph_core::error::{CographError, ErrorCode};
use cograph_core::model::NetworkKind;
use recommend::{PageRankConfig, RecommendError, RecommendationEngine};
use storage::CooccurrenceGraph;

fn line() -> CooccurrenceGraph {
    let mut graph = CooccurrenceGraph::new();
    graph.add_edge("A", "B", 4.0);
    graph.add_edge("B", "C", 1.0);
    graph
}

#[tokio::test]
async fn test_error_mapping_standard_categories() {
    let engine = RecommendationEngine::new(RecommenderConfig::default())
        .with_network(NetworkKind::Sentence, line())
        .with_network(NetworkKind::Page, CooccurrenceGraph::new());

    // INVALID_ARGUMENT: top_k of zero
    let err = engine
        .execute_json(r#"{"entities": ["A"], "top_k": 0}"#)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::InvalidArgument);
    let response = err.to_response();
    assert_eq!(response.error_code, ErrorCode::InvalidArgument);
    assert!(response.message.contains("top_k"));

    // INVALID_ARGUMENT: malformed JSON
    let err = engine.execute_json("{not json").await.unwrap_err();
    assert!(matches!(err, RecommendError::Parse(_)));
    assert_eq!(err.error_code(), ErrorCode::InvalidArgument);

    // INVALID_ARGUMENT: guided walk without a destination
    let err = engine
        .execute_json(r#"{"algorithm": "guided_walk", "start_entity": "A"}"#)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::InvalidArgument);

    // FAILED_PRECONDITION: empty and unloaded networks
    let err = engine
        .execute_json(r#"{"entities": ["A"], "network": "page"}"#)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::FailedPrecondition);
    let err = engine
        .execute_json(r#"{"entities": ["A"], "network": "paragraph"}"#)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RecommendError::NetworkUnavailable {
            network: NetworkKind::Paragraph,
            ..
        }
    ));

    let metrics = engine.metrics();
    assert_eq!(metrics.total_requests, 5);
    assert_eq!(metrics.failed_requests, 5);
}

#[tokio::test]
async fn test_pagerank_failure_is_internal_and_skips_reinforcement() {
    let engine = RecommendationEngine::new(RecommenderConfig::default())
        .with_network(NetworkKind::Sentence, line())
        .with_pagerank(PageRankConfig {
            max_iterations: 1,
            ..PageRankConfig::default()
        });

    let err = engine
        .execute_json(r#"{"algorithm": "pagerank", "entities": ["A", "C"]}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, RecommendError::PageRank(_)));
    assert_eq!(err.error_code(), ErrorCode::Internal);

    let graph = engine.graph(NetworkKind::Sentence).await.unwrap();
    assert_eq!(graph.weight("A", "B"), Some(4.0));
    assert!(!graph.has_edge("A", "C"));
    assert_eq!(engine.metrics().reinforced_pairs, 0);
}

#[tokio::test]
async fn test_metrics_percentiles_track_requests() {
    let engine = RecommendationEngine::new(RecommenderConfig::default())
        .with_network(NetworkKind::Sentence, line());

    for _ in 0..10 {
        engine
            .execute_json(r#"{"algorithm": "random_walk", "entities": ["B"], "seed": 1}"#)
            .await
            .unwrap();
    }

    let metrics = engine.metrics();
    assert_eq!(metrics.total_requests, 10);
    assert_eq!(metrics.per_algorithm["random_walk"], 10);
    assert_eq!(metrics.history_count, 10);
    assert!(metrics.p95 >= metrics.p50);
    assert!(metrics.p99 >= metrics.p95);
    assert_eq!(metrics.error_rate, 0.0);
}
