//! Network-distance pruning of disaggregated trips

use hashbrown::{HashMap, HashSet};
use log::info;

use crate::NodeId;
use crate::model::{CycleGraph, DemandPoint, TripEdge};
use crate::routing::shortest_path_lengths;

/// Annotates trip edges with their base-graph network distance and drops
/// the unusable ones.
///
/// A trip edge survives when both endpoints are snapped to nodes present
/// in the graph and a path no longer than `max_distance` connects them;
/// everything else — unsnapped endpoints, disconnected pairs, distances
/// beyond the threshold — is dropped without raising. Points no longer
/// referenced by any surviving trip edge are pruned from both point sets.
pub fn filter_by_network_distance(
    trip_edges: Vec<TripEdge>,
    mut points_a: Vec<DemandPoint>,
    mut points_b: Vec<DemandPoint>,
    graph: &CycleGraph,
    max_distance: f64,
) -> (Vec<TripEdge>, Vec<DemandPoint>, Vec<DemandPoint>) {
    let nodes_a = snapped_nodes(&points_a);
    let nodes_b = snapped_nodes(&points_b);

    let total = trip_edges.len();
    let mut kept = Vec::with_capacity(total);
    for mut edge in trip_edges {
        let distance = network_distance(
            graph,
            nodes_a.get(&edge.origin),
            nodes_b.get(&edge.destination),
            max_distance,
        );
        if let Some(distance) = distance {
            edge.network_distance = Some(distance);
            kept.push(edge);
        }
    }
    info!(
        "Kept {} of {total} trip edges within {max_distance} m network distance",
        kept.len()
    );

    let used_a: HashSet<u64> = kept.iter().map(|edge| edge.origin).collect();
    let used_b: HashSet<u64> = kept.iter().map(|edge| edge.destination).collect();
    points_a.retain(|point| used_a.contains(&point.point_id));
    points_b.retain(|point| used_b.contains(&point.point_id));

    (kept, points_a, points_b)
}

fn snapped_nodes(points: &[DemandPoint]) -> HashMap<u64, NodeId> {
    points
        .iter()
        .filter_map(|point| point.node_base.map(|node| (point.point_id, node)))
        .collect()
}

fn network_distance(
    graph: &CycleGraph,
    origin: Option<&NodeId>,
    destination: Option<&NodeId>,
    max_distance: f64,
) -> Option<f64> {
    let origin = graph.node_index(*origin?)?;
    let destination = graph.node_index(*destination?)?;
    let distances = shortest_path_lengths(graph, origin, Some(destination), Some(max_distance));
    distances.get(&destination).copied()
}

#[cfg(test)]
mod tests {
    use geo::{LineString, Point};

    use super::*;
    use crate::model::{NetworkNode, SegmentRecord};

    /// Chain 1 -> 2 -> 3 with 2000 m segments plus isolated node 9.
    fn graph() -> CycleGraph {
        let mut graph = CycleGraph::new();
        let nodes: Vec<_> = [1, 2, 3, 9]
            .into_iter()
            .map(|id| {
                graph.ensure_node(NetworkNode {
                    id,
                    geometry: Point::new(id as f64, 0.0),
                })
            })
            .collect();
        for pair in nodes[..3].windows(2) {
            graph.add_segment(
                pair[0],
                pair[1],
                SegmentRecord {
                    length: 2000.0,
                    index_along: Some(0.6),
                    index_against: None,
                    external_id: 1,
                    geometry: LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]),
                },
            );
        }
        graph
    }

    fn snapped_point(point_id: u64, node: Option<NodeId>) -> DemandPoint {
        let mut point = DemandPoint::new(point_id, 1, Point::new(0.0, 0.0));
        point.node_base = node;
        point
    }

    fn trip(origin: u64, destination: u64) -> TripEdge {
        TripEdge {
            origin,
            destination,
            origin_cluster: 1,
            destination_cluster: 2,
            geometry: LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]),
            network_distance: None,
        }
    }

    #[test]
    fn reachable_trips_get_a_distance() {
        let points_a = vec![snapped_point(1, Some(1))];
        let points_b = vec![snapped_point(2, Some(2))];
        let (kept, a, b) =
            filter_by_network_distance(vec![trip(1, 2)], points_a, points_b, &graph(), 3750.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].network_distance, Some(2000.0));
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn over_threshold_and_disconnected_trips_are_dropped() {
        let points_a = vec![snapped_point(1, Some(1)), snapped_point(2, Some(1))];
        let points_b = vec![snapped_point(3, Some(3)), snapped_point(4, Some(9))];
        let trips = vec![trip(1, 3), trip(2, 4)];
        let (kept, a, b) =
            filter_by_network_distance(trips, points_a, points_b, &graph(), 3750.0);
        // 1 -> 3 is 4000 m, over the threshold; node 9 is disconnected
        assert!(kept.is_empty());
        assert!(a.is_empty());
        assert!(b.is_empty());
    }

    #[test]
    fn unsnapped_endpoints_drop_the_trip() {
        let points_a = vec![snapped_point(1, None)];
        let points_b = vec![snapped_point(2, Some(2))];
        let (kept, ..) =
            filter_by_network_distance(vec![trip(1, 2)], points_a, points_b, &graph(), 3750.0);
        assert!(kept.is_empty());
    }

    #[test]
    fn unused_points_are_pruned() {
        let points_a = vec![snapped_point(1, Some(1)), snapped_point(5, Some(1))];
        let points_b = vec![snapped_point(2, Some(2)), snapped_point(6, Some(3))];
        let (kept, a, b) =
            filter_by_network_distance(vec![trip(1, 2)], points_a, points_b, &graph(), 3750.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].point_id, 1);
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].point_id, 2);
    }
}
