use crate::algorithm::{Algorithm, Target, WalkParams};
use cograph_core::config::RecommenderConfig;
use cograph_core::model::NetworkKind;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::{Range, RangeInclusive};
use thiserror::Error;

const RANDOM_WALK_LENGTH: RangeInclusive<usize> = 3..=8;
const EXPLORATORY_WALK_LENGTH: RangeInclusive<usize> = 4..=10;
const GUIDED_WALK_MAX_STEPS: RangeInclusive<usize> = 7..=12;
const GUIDED_EXPLORATORY_MAX_STEPS: RangeInclusive<usize> = 12..=18;
const TELEPORT_PROB: Range<f64> = 0.05..0.4;

/// A recommendation request. Omitted walk options are drawn at random from
/// per-algorithm ranges; omitted `top_k` and `network` use configured defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct RecommendRequest {
    #[serde(default)]
    pub algorithm: Algorithm,
    #[serde(default)]
    pub network: Option<NetworkKind>,
    /// Source entities named directly.
    #[serde(default)]
    pub entities: Vec<String>,
    /// Free text scanned for entity mentions.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub start_entity: Option<String>,
    #[serde(default)]
    pub end_entity: Option<String>,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(default)]
    pub length: Option<usize>,
    #[serde(default)]
    pub max_steps: Option<usize>,
    #[serde(default)]
    pub teleport_prob: Option<f64>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    pub max_top_k: usize,
    pub max_walk_steps: usize,
}

impl From<&RecommenderConfig> for RequestLimits {
    fn from(config: &RecommenderConfig) -> Self {
        Self {
            max_top_k: config.max_top_k,
            max_walk_steps: config.max_walk_steps,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RequestValidationError {
    #[error("guided algorithms require both start_entity and end_entity")]
    MissingEndpoints,
    #[error("provide entities or text to analyze")]
    MissingEntities,
    #[error("entities must not contain empty values")]
    EmptyEntity,
    #[error("top_k must be between 1 and {0}")]
    InvalidTopK(usize),
    #[error("{field} must be at most {max}")]
    WalkTooLong { field: &'static str, max: usize },
    #[error("teleport_prob must be within [0, 1], got {0}")]
    InvalidTeleportProb(f64),
}

impl RecommendRequest {
    pub fn parse_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn validate(&self, limits: &RequestLimits) -> Result<(), RequestValidationError> {
        if self.algorithm.is_guided() {
            if is_blank(&self.start_entity) || is_blank(&self.end_entity) {
                return Err(RequestValidationError::MissingEndpoints);
            }
        } else {
            if self.entities.iter().any(|e| e.trim().is_empty()) {
                return Err(RequestValidationError::EmptyEntity);
            }
            if self.entities.is_empty() && is_blank(&self.text) {
                return Err(RequestValidationError::MissingEntities);
            }
        }
        if let Some(top_k) = self.top_k {
            if top_k == 0 || top_k > limits.max_top_k {
                return Err(RequestValidationError::InvalidTopK(limits.max_top_k));
            }
        }
        for (field, value) in [("length", self.length), ("max_steps", self.max_steps)] {
            if value.is_some_and(|v| v > limits.max_walk_steps) {
                return Err(RequestValidationError::WalkTooLong {
                    field,
                    max: limits.max_walk_steps,
                });
            }
        }
        if let Some(p) = self.teleport_prob {
            if !(0.0..=1.0).contains(&p) {
                return Err(RequestValidationError::InvalidTeleportProb(p));
            }
        }
        Ok(())
    }

    /// The route for guided algorithms; `None` otherwise.
    pub fn route(&self) -> Option<Target> {
        if !self.algorithm.is_guided() {
            return None;
        }
        let start = self.start_entity.as_deref()?.trim();
        let end = self.end_entity.as_deref()?.trim();
        Some(Target::Route {
            start: start.to_string(),
            end: end.to_string(),
        })
    }

    /// Fill in every option the caller left out.
    pub fn params<R: Rng + ?Sized>(&self, default_top_k: usize, rng: &mut R) -> WalkParams {
        let length = self.length.unwrap_or_else(|| match self.algorithm {
            Algorithm::ExploratoryWalk => rng.gen_range(EXPLORATORY_WALK_LENGTH),
            _ => rng.gen_range(RANDOM_WALK_LENGTH),
        });
        let max_steps = self.max_steps.unwrap_or_else(|| match self.algorithm {
            Algorithm::GuidedExploratoryWalk => rng.gen_range(GUIDED_EXPLORATORY_MAX_STEPS),
            _ => rng.gen_range(GUIDED_WALK_MAX_STEPS),
        });
        let teleport_prob = self
            .teleport_prob
            .unwrap_or_else(|| rng.gen_range(TELEPORT_PROB));

        WalkParams {
            top_k: self.top_k.unwrap_or(default_top_k),
            length,
            max_steps,
            teleport_prob,
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
