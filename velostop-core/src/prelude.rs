// Re-export of key components
pub use crate::disaggregate::{
    disaggregate_table_to_edges, distribute_points_in_raster, random_points_in_polygon, seeded_rng,
};
pub use crate::evaluate::evaluate_stops;
pub use crate::filter::filter_by_network_distance;
pub use crate::loading::{TripRecord, build_graph_set, read_trip_table};
pub use crate::model::{
    AccessibilityRecord, Cluster, CycleGraph, DemandPoint, EngineConfig, EvaluationOutput,
    GraphSet, ScoredNetwork, Stop, StopSummary, TripEdge,
};
pub use crate::pipeline::{PipelineInput, PipelineOutput, run_pipeline, timed_stage};
pub use crate::snap::{NodeLocator, SnapSlot, snap_points};

// Core identifier types
pub use crate::EdgeId;
pub use crate::NodeId;
