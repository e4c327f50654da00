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

/// Dijkstra's algorithm over edge lengths in meters.
/// Returns a map of reached node indices to shortest distances; nodes
/// beyond the cutoff are not reached at all.
pub fn shortest_path_lengths(
    graph: &CycleGraph,
    start: NodeIndex,
    target: Option<NodeIndex>,
    cutoff: Option<f64>,
) -> HashMap<NodeIndex, f64> {
    let mut distances: HashMap<NodeIndex, f64> = HashMap::new();
    let mut heap = BinaryHeap::new();

    heap.push(State {
        cost: 0.0,
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        // Check if we've reached the target
        if let Some(target_node) = target {
            if node == target_node {
                break;
            }
        }

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
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    distances
}

#[cfg(test)]
mod tests {
    use geo::{LineString, Point};

    use super::*;
    use crate::model::{NetworkNode, SegmentRecord};

    /// Chain 1 -> 2 -> 3 -> 4 with 1000 m segments.
    fn chain_graph() -> CycleGraph {
        let mut graph = CycleGraph::new();
        let indices: Vec<NodeIndex> = (1..=4)
            .map(|id| {
                graph.ensure_node(NetworkNode {
                    id,
                    geometry: Point::new(id as f64, 0.0),
                })
            })
            .collect();
        for pair in indices.windows(2) {
            graph.add_segment(
                pair[0],
                pair[1],
                SegmentRecord {
                    length: 1000.0,
                    index_along: Some(0.7),
                    index_against: None,
                    external_id: 1,
                    geometry: LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]),
                },
            );
        }
        graph
    }

    #[test]
    fn distances_accumulate_edge_lengths() {
        let graph = chain_graph();
        let start = graph.node_index(1).unwrap();
        let distances = shortest_path_lengths(&graph, start, None, None);
        assert_eq!(distances[&graph.node_index(4).unwrap()], 3000.0);
    }

    #[test]
    fn cutoff_excludes_far_nodes_entirely() {
        let graph = chain_graph();
        let start = graph.node_index(1).unwrap();
        let distances = shortest_path_lengths(&graph, start, None, Some(2500.0));
        assert!(distances.contains_key(&graph.node_index(3).unwrap()));
        assert!(!distances.contains_key(&graph.node_index(4).unwrap()));
    }

    #[test]
    fn directionality_is_respected() {
        let graph = chain_graph();
        let start = graph.node_index(4).unwrap();
        let distances = shortest_path_lengths(&graph, start, None, None);
        assert_eq!(distances.len(), 1);
    }
}
