//! Nearest-node assignment of arbitrary points onto a graph variant

use geo::{Distance, Haversine, Point};
use log::trace;
use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::NodeId;
use crate::model::{CycleGraph, DemandPoint, Stop};

type IndexedNode = GeomWithData<[f64; 2], NodeId>;

/// Spatial index over the node coordinates of one graph variant.
pub struct NodeLocator {
    tree: RTree<IndexedNode>,
}

impl NodeLocator {
    /// Builds the index over all kept graph nodes.
    pub fn new(graph: &CycleGraph) -> Self {
        let entries: Vec<IndexedNode> = graph
            .nodes()
            .map(|node| GeomWithData::new([node.geometry.x(), node.geometry.y()], node.id))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Nearest node id for a point, `None` only for an empty graph.
    pub fn nearest(&self, point: &Point<f64>) -> Option<NodeId> {
        self.tree
            .nearest_neighbor(&[point.x(), point.y()])
            .map(|entry| entry.data)
    }

    /// Like [`nearest`](Self::nearest), rejecting matches farther than
    /// `max_distance` meters.
    pub fn nearest_within(&self, point: &Point<f64>, max_distance: f64) -> Option<NodeId> {
        let entry = self.tree.nearest_neighbor(&[point.x(), point.y()])?;
        let node_point = Point::new(entry.geom()[0], entry.geom()[1]);
        if Haversine.distance(*point, node_point) <= max_distance {
            Some(entry.data)
        } else {
            trace!(
                "Point at {:?} is farther than {max_distance} m from the nearest graph node",
                point
            );
            None
        }
    }
}

/// Which per-variant assignment slot a snap run writes, letting the same
/// point set be snapped against the base and quality graphs without
/// collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapSlot {
    Base,
    Quality,
}

/// Anything with a location and per-variant node assignment slots.
pub trait Snappable {
    fn location(&self) -> Point<f64>;
    fn assign(&mut self, slot: SnapSlot, node: Option<NodeId>);
}

impl Snappable for DemandPoint {
    fn location(&self) -> Point<f64> {
        self.geometry
    }

    fn assign(&mut self, slot: SnapSlot, node: Option<NodeId>) {
        match slot {
            SnapSlot::Base => self.node_base = node,
            SnapSlot::Quality => self.node_quality = node,
        }
    }
}

impl Snappable for Stop {
    fn location(&self) -> Point<f64> {
        self.geometry
    }

    fn assign(&mut self, slot: SnapSlot, node: Option<NodeId>) {
        match slot {
            SnapSlot::Base => self.node_base = node,
            SnapSlot::Quality => self.node_quality = node,
        }
    }
}

/// Assigns every point its nearest graph node in the chosen slot.
///
/// Without `max_distance` every point receives an assignment no matter how
/// far away the nearest node is; with it, distant points get `None` and
/// are treated downstream like any node absent from the graph.
pub fn snap_points<T: Snappable>(
    items: &mut [T],
    locator: &NodeLocator,
    slot: SnapSlot,
    max_distance: Option<f64>,
) {
    for item in items.iter_mut() {
        let location = item.location();
        let node = match max_distance {
            Some(max) => locator.nearest_within(&location, max),
            None => locator.nearest(&location),
        };
        item.assign(slot, node);
    }
}
