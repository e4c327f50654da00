//! Scored street network input schema and the routable graph variants

pub mod components;
pub mod graph;

pub use components::{NetworkNode, ScoredEdge, ScoredNetwork, ScoredNode, SegmentRecord};
pub use graph::{CycleGraph, GraphSet};
