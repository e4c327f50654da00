//! Scored network records and graph node/segment components

use geo::{LineString, Point};
use serde::{Deserialize, Serialize};

use crate::{EdgeId, NodeId};

/// Edge row of the scored network dataset.
///
/// A row describes one undirected street segment; the access flags state
/// which directions are rideable and the indices rate each direction's
/// bikeability in `[0, 1]`. Geometry coordinates run from `from_node` to
/// `to_node`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredEdge {
    pub from_node: NodeId,
    pub to_node: NodeId,
    pub geometry: LineString<f64>,
    pub access_forward: bool,
    pub access_backward: bool,
    pub index_forward: Option<f64>,
    pub index_backward: Option<f64>,
    /// Segment length in meters.
    pub length: f64,
    pub external_id: EdgeId,
}

/// Node row of the scored network dataset, WGS84.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredNode {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

/// The scored edge/node dataset produced by the external scoring tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoredNetwork {
    pub edges: Vec<ScoredEdge>,
    pub nodes: Vec<ScoredNode>,
}

impl ScoredNetwork {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() || self.nodes.is_empty()
    }
}

/// Node of a routable graph variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: NodeId,
    pub geometry: Point<f64>,
}

/// Directed segment of a routable graph variant.
///
/// `index_along` and `index_against` are the bikeability indices in and
/// against the traversal direction of this directed edge; the geometry
/// coordinate order matches the traversal direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Segment length in meters.
    pub length: f64,
    pub index_along: Option<f64>,
    pub index_against: Option<f64>,
    pub external_id: EdgeId,
    pub geometry: LineString<f64>,
}
