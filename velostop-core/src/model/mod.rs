//! Data model for bicycle accessibility evaluation
//!
//! Contains the scored-network input schema, the routable graph variants,
//! disaggregated point and trip types, and the evaluation result rows.

pub mod config;
pub mod extent;
pub mod network;
pub mod points;
pub mod results;

pub use config::{EngineConfig, distance_for};
pub use extent::Extent;
pub use network::{
    CycleGraph, GraphSet, NetworkNode, ScoredEdge, ScoredNetwork, ScoredNode, SegmentRecord,
};
pub use points::{Cluster, DemandPoint, Stop, TripEdge};
pub use results::{AccessibilityRecord, EvaluationOutput, RouteRecord, StopEdges, StopSummary};
