//! Graph construction from the scored network dataset

use geo::{LineString, Point};
use hashbrown::HashMap;
use log::{debug, info, warn};

use super::cache;
use crate::model::{CycleGraph, EngineConfig, GraphSet, NetworkNode, ScoredNetwork, SegmentRecord};
use crate::{Error, NodeId};

/// Builds the base and quality graph variants plus their reversed copies.
///
/// A direction of an edge enters the base graph when its access flag is
/// set; the quality variant additionally requires that direction's
/// bikeability index to reach the configured threshold. Nodes are kept
/// only when referenced by a kept edge.
///
/// With a cache directory configured, a previously persisted build for the
/// same dataset content and threshold is returned instead of rebuilding.
///
/// # Errors
///
/// Returns [`Error::MissingNetwork`] when the dataset has no edges or no
/// nodes.
pub fn build_graph_set(network: &ScoredNetwork, config: &EngineConfig) -> Result<GraphSet, Error> {
    if network.is_empty() {
        return Err(Error::MissingNetwork);
    }

    if let Some(dir) = config.cache_dir.as_deref() {
        match cache::cache_key(network, config.quality_threshold) {
            Ok(key) => {
                if let Some(set) = cache::load(dir, key) {
                    return Ok(set);
                }
                let set = build_all_variants(network, config.quality_threshold);
                cache::store(dir, key, &set);
                return Ok(set);
            }
            Err(e) => warn!("Graph cache disabled: {e}"),
        }
    }

    Ok(build_all_variants(network, config.quality_threshold))
}

fn build_all_variants(network: &ScoredNetwork, quality_threshold: f64) -> GraphSet {
    let node_coords: HashMap<NodeId, Point<f64>> = network
        .nodes
        .iter()
        .map(|node| (node.id, Point::new(node.x, node.y)))
        .collect();

    info!("Building base graph");
    let base = build_variant(network, &node_coords, None);
    info!(
        "Base graph: {} nodes, {} directed edges",
        base.node_count(),
        base.edge_count()
    );

    info!("Building quality graph (threshold {quality_threshold})");
    let quality = build_variant(network, &node_coords, Some(quality_threshold));
    info!(
        "Quality graph: {} nodes, {} directed edges",
        quality.node_count(),
        quality.edge_count()
    );

    GraphSet {
        base_reversed: base.reversed(),
        quality_reversed: quality.reversed(),
        base,
        quality,
    }
}

/// One graph variant; `min_index` of `None` builds the unrestricted base.
fn build_variant(
    network: &ScoredNetwork,
    node_coords: &HashMap<NodeId, Point<f64>>,
    min_index: Option<f64>,
) -> CycleGraph {
    let mut graph = CycleGraph::new();

    for edge in &network.edges {
        let (Some(&from_point), Some(&to_point)) =
            (node_coords.get(&edge.from_node), node_coords.get(&edge.to_node))
        else {
            debug!(
                "Skipping edge {}: unknown endpoint node {} or {}",
                edge.external_id, edge.from_node, edge.to_node
            );
            continue;
        };

        if keep_direction(edge.access_forward, edge.index_forward, min_index) {
            let from = graph.ensure_node(NetworkNode {
                id: edge.from_node,
                geometry: from_point,
            });
            let to = graph.ensure_node(NetworkNode {
                id: edge.to_node,
                geometry: to_point,
            });
            graph.add_segment(
                from,
                to,
                SegmentRecord {
                    length: edge.length,
                    index_along: edge.index_forward,
                    index_against: edge.index_backward,
                    external_id: edge.external_id,
                    geometry: edge.geometry.clone(),
                },
            );
        }

        if keep_direction(edge.access_backward, edge.index_backward, min_index) {
            let from = graph.ensure_node(NetworkNode {
                id: edge.from_node,
                geometry: from_point,
            });
            let to = graph.ensure_node(NetworkNode {
                id: edge.to_node,
                geometry: to_point,
            });
            graph.add_segment(
                to,
                from,
                SegmentRecord {
                    length: edge.length,
                    index_along: edge.index_backward,
                    index_against: edge.index_forward,
                    external_id: edge.external_id,
                    geometry: reverse_geometry(&edge.geometry),
                },
            );
        }
    }

    graph
}

fn keep_direction(access: bool, index: Option<f64>, min_index: Option<f64>) -> bool {
    access
        && match min_index {
            None => true,
            Some(threshold) => index.is_some_and(|value| value >= threshold),
        }
}

fn reverse_geometry(geometry: &LineString<f64>) -> LineString<f64> {
    LineString::new(geometry.0.iter().rev().copied().collect())
}
