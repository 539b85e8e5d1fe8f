pub mod algorithm;
pub mod algorithms;
pub mod dsl;
pub mod engine;
pub mod pagerank;
pub mod reinforcement;

pub use algorithm::{Algorithm, EntityRecommendation, Recommendation, Target, WalkParams};
pub use dsl::{RecommendRequest, RequestLimits, RequestValidationError};
pub use engine::{ErrorResponse, RecommendError, RecommendResponse, RecommendationEngine};
pub use pagerank::{PageRankConfig, PageRankError};
