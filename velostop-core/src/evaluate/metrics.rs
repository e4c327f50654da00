//! Path and reachable-network metrics
//!
//! Two different quality-index statistics live here on purpose: paths
//! traversed by a household average the index of the direction actually
//! ridden, while the reachable-network aggregate averages the mean of
//! each edge's two directional indices.

use geo::{Coord, LineString};
use hashbrown::HashSet;
use itertools::Itertools;
use log::warn;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::EdgeId;
use crate::model::CycleGraph;
use crate::routing::SearchTree;

/// Concatenates segment geometries along `path` into one line.
///
/// `path` is a node sequence in forward-graph orientation; joint
/// coordinates shared by consecutive segments appear once.
pub fn path_geometry(graph: &CycleGraph, path: &[NodeIndex]) -> Option<LineString<f64>> {
    let mut coords: Vec<Coord<f64>> = Vec::new();
    for (&from, &to) in path.iter().tuple_windows() {
        let Some(segment) = graph.segment(from, to) else {
            warn!("No segment between consecutive path nodes");
            continue;
        };
        for &coord in &segment.geometry.0 {
            if coords.last() != Some(&coord) {
                coords.push(coord);
            }
        }
    }
    (coords.len() >= 2).then(|| LineString::new(coords))
}

/// Length-weighted average of the quality index along `path`, using each
/// segment's index in the direction actually traversed. Segments without
/// an index contribute neither index nor length.
pub fn path_index_average(graph: &CycleGraph, path: &[NodeIndex]) -> Option<f64> {
    let mut index_sum = 0.0;
    let mut length_sum = 0.0;
    for (&from, &to) in path.iter().tuple_windows() {
        let Some(segment) = graph.segment(from, to) else {
            warn!("No segment between consecutive path nodes");
            continue;
        };
        if let Some(index) = segment.index_along {
            index_sum += index * segment.length;
            length_sum += segment.length;
        }
    }
    (length_sum > 0.0).then(|| index_sum / length_sum)
}

/// External ids of the edges whose both endpoints were reached.
pub fn reachable_edge_ids(graph: &CycleGraph, tree: &SearchTree) -> HashSet<EdgeId> {
    graph
        .graph
        .edge_references()
        .filter(|edge| tree.reached(edge.source()) && tree.reached(edge.target()))
        .map(|edge| edge.weight().external_id)
        .collect()
}

/// Total length in meters over a reachable edge set, counting every
/// external edge once even when both of its directions were kept.
pub fn reachable_length(graph: &CycleGraph, edge_ids: &HashSet<EdgeId>) -> f64 {
    let mut seen: HashSet<EdgeId> = HashSet::with_capacity(edge_ids.len());
    let mut total = 0.0;
    for edge in graph.graph.edge_references() {
        let id = edge.weight().external_id;
        if edge_ids.contains(&id) && seen.insert(id) {
            total += edge.weight().length;
        }
    }
    total
}

/// Length-weighted average of the quality index over a reachable edge
/// set, where each edge contributes the mean of its present directional
/// index values. Edges without any index, or without positive length, are
/// skipped.
pub fn edges_index_average(graph: &CycleGraph, edge_ids: &HashSet<EdgeId>) -> Option<f64> {
    let mut seen: HashSet<EdgeId> = HashSet::with_capacity(edge_ids.len());
    let mut index_sum = 0.0;
    let mut length_sum = 0.0;
    for edge in graph.graph.edge_references() {
        let segment = edge.weight();
        if !edge_ids.contains(&segment.external_id) || !seen.insert(segment.external_id) {
            continue;
        }
        if segment.length <= 0.0 {
            continue;
        }
        let indices: Vec<f64> = [segment.index_along, segment.index_against]
            .into_iter()
            .flatten()
            .collect();
        if indices.is_empty() {
            continue;
        }
        let mean = indices.iter().sum::<f64>() / indices.len() as f64;
        index_sum += mean * segment.length;
        length_sum += segment.length;
    }
    (length_sum > 0.0).then(|| index_sum / length_sum)
}
