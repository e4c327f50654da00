use std::{cmp::Ordering, collections::BinaryHeap};

use hashbrown::HashMap;
use petgraph::{graph::NodeIndex, visit::EdgeRef};

use crate::model::CycleGraph;

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: NodeIndex,
}

impl Eq for State {}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap)
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-source shortest-path tree with predecessor chains.
///
/// Built by searching a reversed graph from a stop; a predecessor walk
/// from any reached node then yields that node's traversal sequence
/// toward the stop in forward-graph orientation.
#[derive(Debug, Clone)]
pub struct SearchTree {
    distances: HashMap<NodeIndex, f64>,
    predecessors: HashMap<NodeIndex, NodeIndex>,
    start: NodeIndex,
}

impl SearchTree {
    /// Shortest distance to `node`, when reached within the cutoff.
    pub fn distance(&self, node: NodeIndex) -> Option<f64> {
        self.distances.get(&node).copied()
    }

    pub fn reached(&self, node: NodeIndex) -> bool {
        self.distances.contains_key(&node)
    }

    /// All reached nodes with their distances.
    pub fn reached_nodes(&self) -> &HashMap<NodeIndex, f64> {
        &self.distances
    }

    /// Node sequence from `node` along predecessors back to the search
    /// start, or `None` when the node was not reached.
    pub fn path_from(&self, node: NodeIndex) -> Option<Vec<NodeIndex>> {
        if !self.reached(node) {
            return None;
        }
        let mut path = vec![node];
        let mut current = node;
        while current != self.start {
            let &previous = self.predecessors.get(&current)?;
            path.push(previous);
            current = previous;
        }
        Some(path)
    }
}

/// Dijkstra's algorithm recording predecessors for path reconstruction.
pub fn shortest_path_tree(graph: &CycleGraph, start: NodeIndex, cutoff: Option<f64>) -> SearchTree {
    let estimated_nodes = graph.node_count().min(1000);
    let mut distances: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, NodeIndex> =
        HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    heap.push(State {
        cost: 0.0,
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        // Skip if we've found a better path
        if let Some(&best) = distances.get(&node) {
            if cost > best {
                continue;
            }
        }

        // Examine neighbors
        for edge in graph.graph.edges(node) {
            let next = edge.target();
            let next_cost = cost + edge.weight().length;

            if let Some(max) = cutoff {
                if next_cost > max {
                    continue;
                }
            }

            // Add or update distance if better using Entry API
            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                    predecessors.insert(next, node);
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                        predecessors.insert(next, node);
                    }
                }
            }
        }
    }

    SearchTree {
        distances,
        predecessors,
        start,
    }
}
