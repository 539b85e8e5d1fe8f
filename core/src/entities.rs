//! Entity directory: which cultural category each known entity belongs to.
//!
//! Ranking never looks at categories; they are for presentation and for
//! seeding the node set when networks are built.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

use crate::error::{CographError, ErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Food,
    Restaurant,
    Monument,
    TouristPlace,
    Other,
}

impl EntityCategory {
    /// Maps the group names used in the entity file onto categories.
    pub fn from_group(group: &str) -> Self {
        match group {
            "food_items" | "food" => EntityCategory::Food,
            "restaurants" | "restaurant" => EntityCategory::Restaurant,
            "monuments" | "monument" => EntityCategory::Monument,
            "tourist_places" | "tourist_place" => EntityCategory::TouristPlace,
            _ => EntityCategory::Other,
        }
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid entity file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CographError for DirectoryError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::Internal
    }
}

#[derive(Debug, Deserialize)]
struct EntityFile {
    #[serde(default)]
    all_entities: Vec<String>,
    #[serde(default)]
    categorized: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct EntityDirectory {
    entities: Vec<String>,
    categories: HashMap<String, EntityCategory>,
}

impl EntityDirectory {
    pub fn from_json(raw: &str) -> Result<Self, DirectoryError> {
        let file: EntityFile = serde_json::from_str(raw)?;

        let mut groups: Vec<(&String, &Vec<String>)> = file.categorized.iter().collect();
        groups.sort_by(|a, b| a.0.cmp(b.0));

        let mut directory = Self::default();
        let mut seen = HashSet::new();
        for name in &file.all_entities {
            if seen.insert(name.clone()) {
                directory.entities.push(name.clone());
            }
        }

        for (group, names) in groups {
            let category = EntityCategory::from_group(group);
            for name in names {
                directory.categories.entry(name.clone()).or_insert(category);
                if seen.insert(name.clone()) {
                    directory.entities.push(name.clone());
                }
            }
        }

        Ok(directory)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn insert(&mut self, name: impl Into<String>, category: EntityCategory) {
        let name = name.into();
        if !self.categories.contains_key(&name) && !self.entities.contains(&name) {
            self.entities.push(name.clone());
        }
        self.categories.insert(name, category);
    }

    pub fn category(&self, name: &str) -> EntityCategory {
        self.categories
            .get(name)
            .copied()
            .unwrap_or(EntityCategory::Other)
    }

    /// Every known entity, deduplicated, in file order.
    pub fn all_entities(&self) -> &[String] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
