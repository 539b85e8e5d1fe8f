use std::collections::HashSet;

/// Case-insensitive substring matcher over a fixed entity list.
#[derive(Debug, Clone, Default)]
pub struct EntityMatcher {
    entities: Vec<(String, String)>, // (name, lowercase name)
}

impl EntityMatcher {
    pub fn new<I, S>(entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for entity in entities {
            let name: String = entity.into();
            if name.trim().is_empty() || !seen.insert(name.clone()) {
                continue;
            }
            let lower = name.to_lowercase();
            out.push((name, lower));
        }
        Self { entities: out }
    }

    /// Entities mentioned in `text`, in entity-list order.
    pub fn find_in(&self, text: &str) -> Vec<&str> {
        let lower = text.to_lowercase();
        self.entities
            .iter()
            .filter(|(_, needle)| lower.contains(needle.as_str()))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
