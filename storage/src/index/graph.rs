use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::Debug;

/// Hop distance assumed for nodes that cannot reach the target.
pub const UNREACHABLE_DISTANCE: usize = 99;

/// Numeric edge weight. Co-occurrence counts are integers but networks
/// loaded from other tools may carry fractional weights.
pub trait EdgeWeight: Copy + PartialOrd + Debug + Send + Sync + 'static {
    const ONE: Self;

    fn to_f64(self) -> f64;

    fn from_f64(value: f64) -> Self;

    fn increment(self) -> Self;
}

macro_rules! impl_integer_weight {
    ($($ty:ty),*) => {
        $(
            impl EdgeWeight for $ty {
                const ONE: Self = 1;

                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn from_f64(value: f64) -> Self {
                    value.round().max(0.0) as $ty
                }

                fn increment(self) -> Self {
                    self.saturating_add(1)
                }
            }
        )*
    };
}

macro_rules! impl_float_weight {
    ($($ty:ty),*) => {
        $(
            impl EdgeWeight for $ty {
                const ONE: Self = 1.0;

                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn from_f64(value: f64) -> Self {
                    value as $ty
                }

                fn increment(self) -> Self {
                    self + 1.0
                }
            }
        )*
    };
}

impl_integer_weight!(u32, u64);
impl_float_weight!(f32, f64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeData<W> {
    pub weight: W,
}

/// Undirected weighted graph keyed by entity name.
///
/// Both directions of every edge are stored. Adjacency is ordered, so
/// neighbor enumeration is lexicographic and seeded walks are reproducible.
#[derive(Debug, Clone)]
pub struct WeightedGraph<W: EdgeWeight = f64> {
    adjacency: BTreeMap<String, BTreeMap<String, EdgeData<W>>>,
}

pub type CooccurrenceGraph = WeightedGraph<f64>;

impl<W: EdgeWeight> WeightedGraph<W> {
    pub fn new() -> Self {
        Self {
            adjacency: BTreeMap::new(),
        }
    }

    /// Returns false when the node already existed.
    pub fn add_node(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.adjacency.contains_key(&id) {
            return false;
        }
        self.adjacency.insert(id, BTreeMap::new());
        true
    }

    /// Insert or overwrite the edge between `a` and `b`. Self-loops are dropped.
    pub fn add_edge(&mut self, a: impl Into<String>, b: impl Into<String>, weight: W) {
        let a = a.into();
        let b = b.into();
        if a == b {
            self.add_node(a);
            return;
        }
        self.adjacency
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), EdgeData { weight });
        self.adjacency
            .entry(b)
            .or_default()
            .insert(a, EdgeData { weight });
    }

    /// Add one to the edge weight, creating the edge at weight one. Returns the new weight.
    pub fn increment_edge(&mut self, a: &str, b: &str) -> Option<W> {
        if a == b {
            return None;
        }
        let weight = match self.weight(a, b) {
            Some(current) => current.increment(),
            None => W::ONE,
        };
        self.add_edge(a, b, weight);
        Some(weight)
    }

    /// Drop every node without edges. Returns how many were removed.
    pub fn remove_isolated_nodes(&mut self) -> usize {
        let before = self.adjacency.len();
        self.adjacency.retain(|_, edges| !edges.is_empty());
        before - self.adjacency.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = (&'a str, W)> + 'a {
        self.adjacency
            .get(id)
            .into_iter()
            .flat_map(|edges| edges.iter().map(|(n, e)| (n.as_str(), e.weight)))
    }

    pub fn weight(&self, a: &str, b: &str) -> Option<W> {
        self.adjacency
            .get(a)
            .and_then(|edges| edges.get(b))
            .map(|edge| edge.weight)
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.weight(a, b).is_some()
    }

    pub fn degree(&self, id: &str) -> usize {
        self.adjacency.get(id).map(|edges| edges.len()).unwrap_or(0)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(|id| id.as_str())
    }

    /// Each undirected edge once, with `source < target`.
    pub fn edges(&self) -> Vec<(&str, &str, W)> {
        let mut out = Vec::new();
        for (source, edges) in &self.adjacency {
            for (target, edge) in edges {
                if source < target {
                    out.push((source.as_str(), target.as_str(), edge.weight));
                }
            }
        }
        out
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|edges| edges.len()).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Degree rarity per node: `ln(N / (1 + degree))`.
    pub fn inverse_degree_weights(&self) -> HashMap<String, f64> {
        let n = self.node_count();
        if n == 0 {
            return HashMap::new();
        }
        let n = n as f64;
        self.adjacency
            .iter()
            .map(|(id, edges)| (id.clone(), (n / (1.0 + edges.len() as f64)).ln()))
            .collect()
    }

    /// Unweighted BFS hop counts from every node that can reach `target`.
    /// Unreachable nodes are absent; an unknown target yields an empty map.
    pub fn hop_distances_to(&self, target: &str) -> HashMap<String, usize> {
        let mut distances = HashMap::new();
        if !self.contains(target) {
            return distances;
        }

        let mut queue = VecDeque::new();
        distances.insert(target.to_string(), 0);
        queue.push_back((target, 0usize));

        while let Some((node, hops)) = queue.pop_front() {
            for (neighbor, _) in self.neighbors(node) {
                if !distances.contains_key(neighbor) {
                    distances.insert(neighbor.to_string(), hops + 1);
                    queue.push_back((neighbor, hops + 1));
                }
            }
        }

        distances
    }
}

impl<W: EdgeWeight> Default for WeightedGraph<W> {
    fn default() -> Self {
        Self::new()
    }
}
