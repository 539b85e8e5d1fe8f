use std::fmt;
use std::str::FromStr;

/// Co-occurrence granularity a network was built at.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NetworkKind {
    #[default]
    Sentence,
    Paragraph,
    Page,
}

impl NetworkKind {
    pub const ALL: [NetworkKind; 3] = [
        NetworkKind::Sentence,
        NetworkKind::Paragraph,
        NetworkKind::Page,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkKind::Sentence => "sentence",
            NetworkKind::Paragraph => "paragraph",
            NetworkKind::Page => "page",
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown network kind: {0}")]
pub struct UnknownNetworkKind(pub String);

impl FromStr for NetworkKind {
    type Err = UnknownNetworkKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sentence" => Ok(NetworkKind::Sentence),
            "paragraph" => Ok(NetworkKind::Paragraph),
            "page" => Ok(NetworkKind::Page),
            other => Err(UnknownNetworkKind(other.to_string())),
        }
    }
}

/// One stop on a walk. Teleport entries were reached by a jump that ignored adjacency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PathEntry {
    pub node_id: String,
    #[serde(default)]
    pub is_teleport: bool,
}

pub const DETOUR_SUFFIX: &str = " (Detour!)";

impl PathEntry {
    pub fn step(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            is_teleport: false,
        }
    }

    pub fn teleport(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            is_teleport: true,
        }
    }
}

impl fmt::Display for PathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_teleport {
            write!(f, "{}{}", self.node_id, DETOUR_SUFFIX)
        } else {
            f.write_str(&self.node_id)
        }
    }
}

#[derive(
    rkyv::Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
    Debug,
    PartialEq,
    Clone,
)]
#[archive(check_bytes)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

impl EdgeRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }
}

/// Flat, storage-neutral form of a whole network. `nodes` lists every node, isolated or not.
#[derive(
    rkyv::Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
    Debug,
    PartialEq,
    Clone,
    Default,
)]
#[archive(check_bytes)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_entry_display_tags_teleports() {
        assert_eq!(PathEntry::step("Charminar").to_string(), "Charminar");
        assert_eq!(
            PathEntry::teleport("Golconda Fort").to_string(),
            "Golconda Fort (Detour!)"
        );
    }

    #[test]
    fn test_network_kind_parse_and_serde() {
        assert_eq!("Paragraph".parse::<NetworkKind>().unwrap(), NetworkKind::Paragraph);
        assert!("chapter".parse::<NetworkKind>().is_err());
        let json = serde_json::to_string(&NetworkKind::Page).unwrap();
        assert_eq!(json, "\"page\"");
    }
}
