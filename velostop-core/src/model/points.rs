//! Disaggregated points, cluster inputs, stops and trip edges

use geo::{Geometry, LineString, Point};
use serde::{Deserialize, Serialize};

use crate::NodeId;

/// Cluster polygon with an aggregate count (residents, jobs, ...).
///
/// Rows with a missing, empty or invalid geometry, or without a positive
/// count, are silently dropped during disaggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub cluster_id: i64,
    pub count: Option<f64>,
    pub geometry: Option<Geometry<f64>>,
}

/// Individual location produced by disaggregating a cluster count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandPoint {
    pub point_id: u64,
    pub cluster_id: i64,
    /// WGS84 location inside the source cluster polygon.
    pub geometry: Point<f64>,
    /// Nearest base-graph node, set by snapping.
    pub node_base: Option<NodeId>,
    /// Nearest quality-graph node, set by snapping.
    pub node_quality: Option<NodeId>,
}

impl DemandPoint {
    pub fn new(point_id: u64, cluster_id: i64, geometry: Point<f64>) -> Self {
        Self {
            point_id,
            cluster_id,
            geometry,
            node_base: None,
            node_quality: None,
        }
    }
}

/// Public transport stop with its per-variant node assignments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    pub stop_id: i64,
    pub geometry: Point<f64>,
    pub node_base: Option<NodeId>,
    pub node_quality: Option<NodeId>,
}

impl Stop {
    pub fn new(stop_id: i64, geometry: Point<f64>) -> Self {
        Self {
            stop_id,
            geometry,
            node_base: None,
            node_quality: None,
        }
    }
}

/// Single trip between two disaggregated points.
///
/// Each endpoint point belongs to at most one trip edge; the geometry is
/// the straight line between the endpoint locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripEdge {
    pub origin: u64,
    pub destination: u64,
    pub origin_cluster: i64,
    pub destination_cluster: i64,
    pub geometry: LineString<f64>,
    /// Base-graph shortest-path distance in meters, set by the distance
    /// filter. `None` means no usable path was found.
    pub network_distance: Option<f64>,
}
