//! Per-stop accessibility evaluation
//!
//! For every stop, a reverse shortest-path search on the base and quality
//! graph variants determines the reachable network and the households in
//! proximity; household records and stop aggregates are derived from the
//! two search trees. Stops carry no data dependency on each other, so
//! they are evaluated in parallel.

pub mod metrics;

use hashbrown::HashSet;
use log::info;
use rayon::prelude::*;

use crate::EdgeId;
use crate::model::{
    AccessibilityRecord, CycleGraph, DemandPoint, EngineConfig, EvaluationOutput, GraphSet,
    RouteRecord, Stop, StopEdges, StopSummary,
};
use crate::routing::{SearchTree, shortest_path_tree};
use metrics::{
    edges_index_average, path_geometry, path_index_average, reachable_edge_ids, reachable_length,
};

struct StopEvaluation {
    summary: StopSummary,
    records: Vec<AccessibilityRecord>,
    routes_base: Vec<RouteRecord>,
    routes_quality: Vec<RouteRecord>,
    edges_base: Option<StopEdges>,
    edges_quality: Option<StopEdges>,
}

/// Evaluates household and network accessibility for every stop.
///
/// Output collections keep the stop input order; household records follow
/// the household input order within each stop.
pub fn evaluate_stops(
    graphs: &GraphSet,
    households: &[DemandPoint],
    stops: &[Stop],
    config: &EngineConfig,
) -> EvaluationOutput {
    info!(
        "Evaluating {} stops against {} households",
        stops.len(),
        households.len()
    );

    let evaluations: Vec<StopEvaluation> = stops
        .par_iter()
        .map(|stop| evaluate_stop(graphs, households, stop, config))
        .collect();

    let mut output = EvaluationOutput::default();
    for evaluation in evaluations {
        output.households.extend(evaluation.records);
        output.stops.push(evaluation.summary);
        output.routes_base.extend(evaluation.routes_base);
        output.routes_quality.extend(evaluation.routes_quality);
        if let Some(edges) = evaluation.edges_base {
            output.edges_base.push(edges);
        }
        if let Some(edges) = evaluation.edges_quality {
            output.edges_quality.push(edges);
        }
    }
    output
}

fn evaluate_stop(
    graphs: &GraphSet,
    households: &[DemandPoint],
    stop: &Stop,
    config: &EngineConfig,
) -> StopEvaluation {
    let cutoff = Some(config.evaluation_cutoff);
    let base_tree = stop
        .node_base
        .and_then(|id| graphs.base_reversed.node_index(id))
        .map(|start| shortest_path_tree(&graphs.base_reversed, start, cutoff));
    let quality_tree = stop
        .node_quality
        .and_then(|id| graphs.quality_reversed.node_index(id))
        .map(|start| shortest_path_tree(&graphs.quality_reversed, start, cutoff));

    let mut records = Vec::new();
    let mut routes_base = Vec::new();
    let mut routes_quality = Vec::new();
    let mut households_base = 0usize;
    let mut households_quality = 0usize;

    if let (Some(tree), Some(stop_node)) = (&base_tree, stop.node_base) {
        for household in households {
            let Some(node_id) = household.node_base else {
                continue;
            };
            let Some(node_index) = graphs.base.node_index(node_id) else {
                continue;
            };
            if !tree.reached(node_index) {
                continue;
            }
            households_base += 1;

            // Household snapped onto the stop's own node
            if node_id == stop_node {
                households_quality += 1;
                records.push(AccessibilityRecord {
                    household_id: household.point_id,
                    stop_id: stop.stop_id,
                    from_node: node_id,
                    to_node: stop_node,
                    length_base: Some(0.0),
                    length_quality: Some(0.0),
                    length_ratio: Some(1.0),
                    index_base: None,
                    index_quality: None,
                    access: true,
                    geometry: household.geometry,
                });
                continue;
            }

            let length_base = tree.distance(node_index);
            let quality_index = graphs.quality.node_index(node_id);
            let length_quality = match (&quality_tree, quality_index) {
                (Some(tree), Some(index)) => tree.distance(index),
                _ => None,
            };

            let mut index_base = None;
            let mut index_quality = None;
            if config.generate_routes {
                if let Some(path) = tree.path_from(node_index) {
                    index_base = path_index_average(&graphs.base, &path);
                    if let Some(geometry) = path_geometry(&graphs.base, &path) {
                        routes_base.push(RouteRecord {
                            household_id: household.point_id,
                            stop_id: stop.stop_id,
                            from_node: node_id,
                            to_node: stop_node,
                            length: length_base,
                            index_average: index_base,
                            geometry,
                        });
                    }
                }
                if let (Some(tree), Some(index)) = (&quality_tree, quality_index) {
                    if let Some(path) = tree.path_from(index) {
                        index_quality = path_index_average(&graphs.quality, &path);
                        if let Some(geometry) = path_geometry(&graphs.quality, &path) {
                            routes_quality.push(RouteRecord {
                                household_id: household.point_id,
                                stop_id: stop.stop_id,
                                from_node: node_id,
                                to_node: stop_node,
                                length: length_quality,
                                index_average: index_quality,
                                geometry,
                            });
                        }
                    }
                }
            }

            let mut access = false;
            let mut length_ratio = None;
            if let (Some(base), Some(quality)) = (length_base, length_quality) {
                if base > 0.0 {
                    let ratio = quality / base;
                    length_ratio = Some(ratio);
                    if ratio <= config.access_ratio_max {
                        access = true;
                        households_quality += 1;
                    }
                }
            }

            records.push(AccessibilityRecord {
                household_id: household.point_id,
                stop_id: stop.stop_id,
                from_node: node_id,
                to_node: stop_node,
                length_base,
                length_quality,
                length_ratio,
                index_base,
                index_quality,
                access,
                geometry: household.geometry,
            });
        }
    }

    let (edge_ids_base, length_base, index_average_base) =
        reachable_aggregate(&graphs.base, base_tree.as_ref());
    let (edge_ids_quality, length_quality, index_average_quality) =
        reachable_aggregate(&graphs.quality, quality_tree.as_ref());

    let length_ratio = if length_base > 0.0 {
        length_quality / length_base
    } else {
        0.0
    };
    let households_ratio = if households_base > 0 {
        households_quality as f64 / households_base as f64
    } else {
        0.0
    };

    let summary = StopSummary {
        stop_id: stop.stop_id,
        node_id: stop.node_base,
        length_base,
        length_quality,
        length_ratio,
        households_base,
        households_quality,
        households_ratio,
        index_average_base,
        index_average_quality,
        geometry: stop.geometry,
    };

    StopEvaluation {
        summary,
        records,
        routes_base,
        routes_quality,
        edges_base: config
            .generate_graphs
            .then(|| stop_edges(stop.stop_id, edge_ids_base)),
        edges_quality: config
            .generate_graphs
            .then(|| stop_edges(stop.stop_id, edge_ids_quality)),
    }
}

fn reachable_aggregate(
    graph: &CycleGraph,
    tree: Option<&SearchTree>,
) -> (HashSet<EdgeId>, f64, Option<f64>) {
    match tree {
        Some(tree) => {
            let ids = reachable_edge_ids(graph, tree);
            let length = reachable_length(graph, &ids);
            let index = edges_index_average(graph, &ids);
            (ids, length, index)
        }
        None => (HashSet::new(), 0.0, None),
    }
}

fn stop_edges(stop_id: i64, edge_ids: HashSet<EdgeId>) -> StopEdges {
    let mut edge_ids: Vec<EdgeId> = edge_ids.into_iter().collect();
    edge_ids.sort_unstable();
    StopEdges { stop_id, edge_ids }
}

#[cfg(test)]
mod tests {
    use geo::{LineString, Point};

    use super::*;
    use crate::loading::build_graph_set;
    use crate::model::{ScoredEdge, ScoredNetwork, ScoredNode};

    fn edge(
        external_id: i64,
        from_node: i64,
        to_node: i64,
        length: f64,
        index_forward: Option<f64>,
        index_backward: Option<f64>,
    ) -> ScoredEdge {
        ScoredEdge {
            from_node,
            to_node,
            geometry: LineString::from(vec![
                (from_node as f64, 0.0),
                (to_node as f64, 0.0),
            ]),
            access_forward: true,
            access_backward: true,
            index_forward,
            index_backward,
            length,
            external_id,
        }
    }

    fn node(id: i64) -> ScoredNode {
        ScoredNode {
            id,
            x: id as f64,
            y: 0.0,
        }
    }

    /// Chain 1 - 2 - 3 - 4; the last link is below the quality threshold.
    fn chain_network() -> ScoredNetwork {
        ScoredNetwork {
            edges: vec![
                edge(1, 1, 2, 500.0, Some(0.9), Some(0.9)),
                edge(2, 2, 3, 500.0, Some(0.9), Some(0.9)),
                edge(3, 3, 4, 500.0, Some(0.2), Some(0.2)),
            ],
            nodes: vec![node(1), node(2), node(3), node(4)],
        }
    }

    fn household(point_id: u64, node_base: i64) -> DemandPoint {
        let mut point = DemandPoint::new(point_id, 1, Point::new(point_id as f64, 0.0));
        point.node_base = Some(node_base);
        point
    }

    fn snapped_stop(stop_id: i64, node: i64) -> Stop {
        let mut stop = Stop::new(stop_id, Point::new(0.0, 0.0));
        stop.node_base = Some(node);
        stop.node_quality = Some(node);
        stop
    }

    #[test]
    fn household_at_stop_node_is_trivially_accessible() {
        let graphs = build_graph_set(&chain_network(), &EngineConfig::default()).unwrap();
        let households = vec![household(1, 1)];
        let stops = vec![snapped_stop(10, 1)];
        let output = evaluate_stops(&graphs, &households, &stops, &EngineConfig::default());

        let record = &output.households[0];
        assert_eq!(record.length_base, Some(0.0));
        assert_eq!(record.length_quality, Some(0.0));
        assert_eq!(record.length_ratio, Some(1.0));
        assert!(record.access);
        assert_eq!(output.stops[0].households_quality, 1);
    }

    #[test]
    fn base_reachable_quality_unreachable_household_has_no_access() {
        let graphs = build_graph_set(&chain_network(), &EngineConfig::default()).unwrap();
        // node 4 sits behind the low-quality link
        let households = vec![household(1, 3), household(2, 4)];
        let stops = vec![snapped_stop(10, 1)];
        let output = evaluate_stops(&graphs, &households, &stops, &EngineConfig::default());

        let summary = &output.stops[0];
        assert_eq!(summary.households_base, 2);
        assert_eq!(summary.households_quality, 1);
        assert_eq!(summary.households_ratio, 0.5);

        let at_four = output
            .households
            .iter()
            .find(|r| r.household_id == 2)
            .unwrap();
        assert_eq!(at_four.length_base, Some(1500.0));
        assert_eq!(at_four.length_quality, None);
        assert_eq!(at_four.length_ratio, None);
        assert!(!at_four.access);
    }

    #[test]
    fn detour_beyond_ratio_threshold_denies_access() {
        // direct low-quality link 1 - 2 of 1000 m, high-quality detour via 3
        // of 1600 m: quality/base = 1.6 > 1.5
        let network = ScoredNetwork {
            edges: vec![
                edge(1, 1, 2, 1000.0, Some(0.3), Some(0.3)),
                edge(2, 1, 3, 800.0, Some(0.9), Some(0.9)),
                edge(3, 3, 2, 800.0, Some(0.9), Some(0.9)),
            ],
            nodes: vec![node(1), node(2), node(3)],
        };
        let graphs = build_graph_set(&network, &EngineConfig::default()).unwrap();
        let households = vec![household(1, 2)];
        let stops = vec![snapped_stop(10, 1)];
        let output = evaluate_stops(&graphs, &households, &stops, &EngineConfig::default());

        let record = &output.households[0];
        assert_eq!(record.length_base, Some(1000.0));
        assert_eq!(record.length_quality, Some(1600.0));
        assert_eq!(record.length_ratio, Some(1.6));
        assert!(!record.access);
        assert_eq!(output.stops[0].households_quality, 0);
    }

    #[test]
    fn stop_aggregates_count_each_edge_once() {
        let graphs = build_graph_set(&chain_network(), &EngineConfig::default()).unwrap();
        let stops = vec![snapped_stop(10, 1)];
        let output = evaluate_stops(&graphs, &[], &stops, &EngineConfig::default());

        let summary = &output.stops[0];
        // all three edges reachable on base, two on quality, despite both
        // directions of each being present in the graphs
        assert_eq!(summary.length_base, 1500.0);
        assert_eq!(summary.length_quality, 1000.0);
        assert!((summary.length_ratio - 1000.0 / 1500.0).abs() < 1e-9);
        // base mean indices: (0.9 + 0.9 + 0.2) weighted equally
        let expected = (0.9 * 500.0 + 0.9 * 500.0 + 0.2 * 500.0) / 1500.0;
        assert!((summary.index_average_base.unwrap() - expected).abs() < 1e-9);
        assert!((summary.index_average_quality.unwrap() - 0.9).abs() < 1e-9);

        assert_eq!(output.edges_base[0].edge_ids, vec![1, 2, 3]);
        assert_eq!(output.edges_quality[0].edge_ids, vec![1, 2]);
    }

    #[test]
    fn unsnapped_stop_reports_zeroed_summary() {
        let graphs = build_graph_set(&chain_network(), &EngineConfig::default()).unwrap();
        let stops = vec![Stop::new(10, Point::new(0.0, 0.0))];
        let households = vec![household(1, 2)];
        let output = evaluate_stops(&graphs, &households, &stops, &EngineConfig::default());

        let summary = &output.stops[0];
        assert_eq!(summary.node_id, None);
        assert_eq!(summary.households_base, 0);
        assert_eq!(summary.households_ratio, 0.0);
        assert_eq!(summary.length_base, 0.0);
        assert_eq!(summary.length_ratio, 0.0);
        assert!(output.households.is_empty());
    }

    #[test]
    fn path_metrics_follow_the_traversed_direction() {
        // asymmetric indices: riding toward the stop uses the backward
        // direction of both edges
        let network = ScoredNetwork {
            edges: vec![
                edge(1, 1, 2, 500.0, Some(0.8), Some(0.6)),
                edge(2, 2, 3, 500.0, Some(0.8), Some(0.6)),
            ],
            nodes: vec![node(1), node(2), node(3)],
        };
        let config = EngineConfig {
            quality_threshold: 0.5,
            ..EngineConfig::default()
        };
        let graphs = build_graph_set(&network, &config).unwrap();
        let households = vec![household(1, 3)];
        let stops = vec![snapped_stop(10, 1)];
        let output = evaluate_stops(&graphs, &households, &stops, &config);

        let record = &output.households[0];
        assert_eq!(record.length_base, Some(1000.0));
        // both traversed segments ride against the digitized direction
        assert!((record.index_base.unwrap() - 0.6).abs() < 1e-9);

        let route = &output.routes_base[0];
        assert_eq!(
            route.geometry,
            LineString::from(vec![(3.0, 0.0), (2.0, 0.0), (1.0, 0.0)])
        );
    }

    #[test]
    fn route_outputs_can_be_disabled() {
        let graphs = build_graph_set(&chain_network(), &EngineConfig::default()).unwrap();
        let config = EngineConfig {
            generate_routes: false,
            generate_graphs: false,
            ..EngineConfig::default()
        };
        let households = vec![household(1, 3)];
        let stops = vec![snapped_stop(10, 1)];
        let output = evaluate_stops(&graphs, &households, &stops, &config);

        assert!(output.routes_base.is_empty());
        assert!(output.edges_base.is_empty());
        // without routes no path index average is computed
        assert_eq!(output.households[0].index_base, None);
        assert!(output.households[0].access);
    }
}
