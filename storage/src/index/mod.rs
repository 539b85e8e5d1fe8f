pub mod graph;

pub use graph::{CooccurrenceGraph, EdgeData, EdgeWeight, WeightedGraph, UNREACHABLE_DISTANCE};
