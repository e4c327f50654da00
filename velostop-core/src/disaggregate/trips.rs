//! Pairing disaggregated points into origin-destination trip edges

use geo::{LineString, Point};
use hashbrown::HashMap;
use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::loading::TripRecord;
use crate::model::{DemandPoint, TripEdge};

/// Disaggregates a cluster-level trip table into individual trip edges.
///
/// Points are grouped into per-cluster pools and consumed exclusively: a
/// point joins at most one trip edge. Pools and the table row order are
/// shuffled up front so later rows are not systematically starved. A row
/// requesting more trips than either pool still holds is capped to the
/// remaining availability, with a logged reduction.
pub fn disaggregate_table_to_edges(
    points_a: &[DemandPoint],
    points_b: &[DemandPoint],
    table: &[TripRecord],
    rng: &mut StdRng,
) -> Vec<TripEdge> {
    let mut pools_a = cluster_pools(points_a);
    let mut pools_b = cluster_pools(points_b);
    shuffle_pools(&mut pools_a, rng);
    shuffle_pools(&mut pools_b, rng);

    let mut rows: Vec<&TripRecord> = table.iter().collect();
    rows.shuffle(rng);

    let locations_a = locations(points_a);
    let locations_b = locations(points_b);

    let mut edges = Vec::new();
    for row in rows {
        let trips = if row.trips.is_finite() && row.trips > 0.0 {
            row.trips as usize
        } else {
            continue;
        };

        let Some(pool_a) = pools_a.get_mut(&row.origin_cluster) else {
            continue;
        };
        let Some(pool_b) = pools_b.get_mut(&row.destination_cluster) else {
            continue;
        };
        if pool_a.is_empty() || pool_b.is_empty() {
            continue;
        }

        let k = trips.min(pool_a.len()).min(pool_b.len());
        if k < trips {
            warn!(
                "Reducing trips {trips} -> {k} for {} -> {} due to remaining pool availability",
                row.origin_cluster, row.destination_cluster
            );
        }

        for _ in 0..k {
            let (Some(origin), Some(destination)) = (pool_a.pop(), pool_b.pop()) else {
                break;
            };
            let (Some(&from), Some(&to)) = (locations_a.get(&origin), locations_b.get(&destination))
            else {
                continue;
            };
            edges.push(TripEdge {
                origin,
                destination,
                origin_cluster: row.origin_cluster,
                destination_cluster: row.destination_cluster,
                geometry: LineString::from(vec![from, to]),
                network_distance: None,
            });
        }
    }

    edges
}

fn cluster_pools(points: &[DemandPoint]) -> HashMap<i64, Vec<u64>> {
    let mut pools: HashMap<i64, Vec<u64>> = HashMap::new();
    for point in points {
        pools.entry(point.cluster_id).or_default().push(point.point_id);
    }
    pools
}

/// Shuffles every pool in sorted-cluster order, keeping seeded runs
/// reproducible regardless of map iteration order.
fn shuffle_pools(pools: &mut HashMap<i64, Vec<u64>>, rng: &mut StdRng) {
    let mut cluster_ids: Vec<i64> = pools.keys().copied().collect();
    cluster_ids.sort_unstable();
    for cluster_id in cluster_ids {
        if let Some(pool) = pools.get_mut(&cluster_id) {
            pool.shuffle(rng);
        }
    }
}

fn locations(points: &[DemandPoint]) -> HashMap<u64, Point<f64>> {
    points
        .iter()
        .map(|point| (point.point_id, point.geometry))
        .collect()
}
