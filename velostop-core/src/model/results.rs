//! Evaluation result rows handed to the export collaborators

use geo::{LineString, Point};
use serde::{Deserialize, Serialize};

use crate::{EdgeId, NodeId};

/// Household-level accessibility of one stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessibilityRecord {
    pub household_id: u64,
    pub stop_id: i64,
    pub from_node: NodeId,
    pub to_node: NodeId,
    /// Shortest distance to the stop on the base graph, meters.
    pub length_base: Option<f64>,
    /// Shortest distance to the stop on the quality graph, meters.
    pub length_quality: Option<f64>,
    /// `length_quality / length_base`, when both are defined.
    pub length_ratio: Option<f64>,
    /// Length-weighted index average along the base path.
    pub index_base: Option<f64>,
    /// Length-weighted index average along the quality path.
    pub index_quality: Option<f64>,
    /// Whether the stop counts as quality-accessible from this household.
    pub access: bool,
    pub geometry: Point<f64>,
}

/// Aggregate accessibility of one stop over its reachable network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopSummary {
    pub stop_id: i64,
    /// Base-graph node the stop was snapped to.
    pub node_id: Option<NodeId>,
    /// Total length of the reachable base network, meters.
    pub length_base: f64,
    /// Total length of the reachable quality network, meters.
    pub length_quality: f64,
    /// `length_quality / length_base`, 0 when no base network is reachable.
    pub length_ratio: f64,
    /// Households within the base-graph search cutoff.
    pub households_base: usize,
    /// Households classified as quality-accessible.
    pub households_quality: usize,
    /// `households_quality / households_base`, 0 when the base count is 0.
    pub households_ratio: f64,
    /// Length-weighted index average over the reachable base edges.
    pub index_average_base: Option<f64>,
    /// Length-weighted index average over the reachable quality edges.
    pub index_average_quality: Option<f64>,
    pub geometry: Point<f64>,
}

/// Traversed route between a household and a stop on one graph variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRecord {
    pub household_id: u64,
    pub stop_id: i64,
    pub from_node: NodeId,
    pub to_node: NodeId,
    pub length: Option<f64>,
    pub index_average: Option<f64>,
    pub geometry: LineString<f64>,
}

/// External edge ids reachable from one stop on one graph variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopEdges {
    pub stop_id: i64,
    pub edge_ids: Vec<EdgeId>,
}

/// Everything the evaluator produces, in stop input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationOutput {
    pub households: Vec<AccessibilityRecord>,
    pub stops: Vec<StopSummary>,
    pub routes_base: Vec<RouteRecord>,
    pub routes_quality: Vec<RouteRecord>,
    pub edges_base: Vec<StopEdges>,
    pub edges_quality: Vec<StopEdges>,
}
