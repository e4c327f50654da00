//! Directed cycling graph with stable external node ids

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use super::components::{NetworkNode, SegmentRecord};
use crate::NodeId;

/// Routable directed graph over scored street segments.
///
/// Node indices are assigned once at build time; the lookup table maps the
/// dataset's external node ids onto them. Only the operations the
/// evaluator needs are exposed: node lookup, segment lookup, outgoing
/// iteration and edge reversal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleGraph {
    pub graph: DiGraph<NetworkNode, SegmentRecord>,
    node_lookup: HashMap<NodeId, NodeIndex>,
}

impl CycleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Internal index of an external node id, if the node was kept.
    pub fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_lookup.get(&id).copied()
    }

    pub fn node(&self, index: NodeIndex) -> Option<&NetworkNode> {
        self.graph.node_weight(index)
    }

    /// All kept nodes, in index order.
    pub fn nodes(&self) -> impl Iterator<Item = &NetworkNode> {
        self.graph.node_weights()
    }

    /// Segment of the directed edge `from -> to`, if present.
    pub fn segment(&self, from: NodeIndex, to: NodeIndex) -> Option<&SegmentRecord> {
        self.graph
            .find_edge(from, to)
            .and_then(|edge| self.graph.edge_weight(edge))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Adds the node if its id is new, returning its stable index.
    pub(crate) fn ensure_node(&mut self, node: NetworkNode) -> NodeIndex {
        match self.node_lookup.entry(node.id) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let index = self.graph.add_node(node);
                entry.insert(index);
                index
            }
        }
    }

    pub(crate) fn add_segment(&mut self, from: NodeIndex, to: NodeIndex, segment: SegmentRecord) {
        self.graph.add_edge(from, to, segment);
    }

    /// Edge-reversed copy of this graph.
    ///
    /// Nodes are re-added in index order, so every node keeps the index it
    /// has in the source graph and search results can be joined across the
    /// two without translation.
    pub fn reversed(&self) -> Self {
        let mut graph =
            DiGraph::with_capacity(self.graph.node_count(), self.graph.edge_count());
        for node in self.graph.node_weights() {
            graph.add_node(node.clone());
        }
        for edge in self.graph.edge_references() {
            graph.add_edge(edge.target(), edge.source(), edge.weight().clone());
        }
        Self {
            graph,
            node_lookup: self.node_lookup.clone(),
        }
    }
}

/// The four graph variants consumed by the evaluator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSet {
    pub base: CycleGraph,
    pub base_reversed: CycleGraph,
    pub quality: CycleGraph,
    pub quality_reversed: CycleGraph,
}

#[cfg(test)]
mod tests {
    use geo::{LineString, Point, line_string};

    use super::*;

    fn segment(external_id: i64) -> SegmentRecord {
        SegmentRecord {
            length: 100.0,
            index_along: Some(0.8),
            index_against: Some(0.4),
            external_id,
            geometry: line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)],
        }
    }

    fn node(id: NodeId) -> NetworkNode {
        NetworkNode {
            id,
            geometry: Point::new(id as f64, 0.0),
        }
    }

    #[test]
    fn ensure_node_is_idempotent() {
        let mut graph = CycleGraph::new();
        let a = graph.ensure_node(node(7));
        let b = graph.ensure_node(node(7));
        assert_eq!(a, b);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn reversed_preserves_node_indices_and_flips_edges() {
        let mut graph = CycleGraph::new();
        let a = graph.ensure_node(node(1));
        let b = graph.ensure_node(node(2));
        graph.add_segment(a, b, segment(10));

        let reversed = graph.reversed();
        assert_eq!(reversed.node_index(1), Some(a));
        assert_eq!(reversed.node_index(2), Some(b));
        assert!(reversed.segment(a, b).is_none());
        let flipped = reversed.segment(b, a).unwrap();
        assert_eq!(flipped.external_id, 10);
        // the segment record itself is carried over unchanged
        assert_eq!(
            flipped.geometry,
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0)])
        );
    }
}
