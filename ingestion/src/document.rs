use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::builder::BuildError;

/// One scraped page. Fields other than `text` are carried for provenance only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedDocument {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ScrapedDocument {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            source: None,
            kind: None,
            text: text.into(),
            timestamp: None,
        }
    }
}

pub fn parse_documents(raw: &str) -> Result<Vec<ScrapedDocument>, BuildError> {
    Ok(serde_json::from_str(raw)?)
}

pub fn load_documents(path: impl AsRef<Path>) -> Result<Vec<ScrapedDocument>, BuildError> {
    let raw = std::fs::read_to_string(path)?;
    parse_documents(&raw)
}
