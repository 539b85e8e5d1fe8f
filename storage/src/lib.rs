pub mod centrality;
pub mod edgelist;
pub mod index;
pub mod snapshot;
pub mod stats;

pub use centrality::{CentralityMeasure, CentralityScores};
pub use index::{CooccurrenceGraph, EdgeWeight, WeightedGraph};
pub use snapshot::{GraphStoreError, SnapshotStore};
pub use stats::NetworkStats;
