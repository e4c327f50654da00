//! Random point placement inside cluster polygons

use geo::{
    Area, BoundingRect, Contains, Geometry, HasDimensions, InteriorPoint, MultiPolygon, Point,
    Polygon, Validation,
};
use log::{debug, warn};
use rand::Rng;
use rand::rngs::StdRng;

use crate::Error;
use crate::model::{Cluster, DemandPoint};

/// Attempt budget for rejection sampling, per requested point count.
const ATTEMPTS_PER_POINT: usize = 2048;
const MIN_ATTEMPTS: usize = 4096;

/// Uniform random points strictly contained by `polygon`.
///
/// Rejection-samples the bounding rectangle. Thin sliver shapes can make
/// the acceptance rate arbitrarily poor, so the attempt budget is bounded;
/// once exhausted, the remaining points are placed on the polygon's
/// interior point so the requested count is still produced exactly.
///
/// # Errors
///
/// Returns [`Error::Sampling`] for degenerate polygons without a bounding
/// rectangle or interior point.
pub fn random_points_in_polygon(
    polygon: &Polygon<f64>,
    count: usize,
    rng: &mut StdRng,
) -> Result<Vec<Point<f64>>, Error> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let Some(rect) = polygon.bounding_rect() else {
        return Err(Error::Sampling(
            "polygon has no bounding rectangle".to_string(),
        ));
    };

    let max_attempts = (count * ATTEMPTS_PER_POINT).max(MIN_ATTEMPTS);
    let mut points = Vec::with_capacity(count);
    let mut attempts = 0;
    while points.len() < count && attempts < max_attempts {
        attempts += 1;
        let candidate = Point::new(
            rng.random_range(rect.min().x..=rect.max().x),
            rng.random_range(rect.min().y..=rect.max().y),
        );
        if polygon.contains(&candidate) {
            points.push(candidate);
        }
    }

    if points.len() < count {
        let fallback = polygon.interior_point().ok_or_else(|| {
            Error::Sampling("degenerate polygon has no interior point".to_string())
        })?;
        warn!(
            "Rejection sampling exhausted {max_attempts} attempts, placing {} of {count} points \
             on the polygon's interior point",
            count - points.len()
        );
        points.resize(count, fallback);
    }

    Ok(points)
}

/// Turns cluster polygons with aggregate counts into individual points.
///
/// Clusters without usable geometry or a positive count are skipped.
/// Multi-part geometries split their count across parts proportionally to
/// area; the rounding drift is redistributed one unit at a time so the
/// total over all parts reproduces the declared count exactly. Points get
/// sequential ids starting at 1 and carry their cluster id.
pub fn distribute_points_in_raster(
    clusters: &[Cluster],
    rng: &mut StdRng,
) -> Result<Vec<DemandPoint>, Error> {
    let mut points = Vec::new();
    let mut point_id: u64 = 1;

    for cluster in clusters {
        let Some(geometry) = cluster.geometry.as_ref() else {
            continue;
        };
        if geometry.is_empty() || !geometry.is_valid() {
            debug!("Skipping cluster {}: unusable geometry", cluster.cluster_id);
            continue;
        }
        let count = cluster.count.unwrap_or(0.0);
        if !(count > 0.0) {
            continue;
        }
        let count = count as usize;

        match geometry {
            Geometry::Polygon(polygon) => {
                for point in random_points_in_polygon(polygon, count, rng)? {
                    points.push(DemandPoint::new(point_id, cluster.cluster_id, point));
                    point_id += 1;
                }
            }
            Geometry::MultiPolygon(multi) => {
                for (part, part_count) in split_count_by_area(multi, count) {
                    for point in random_points_in_polygon(part, part_count, rng)? {
                        points.push(DemandPoint::new(point_id, cluster.cluster_id, point));
                        point_id += 1;
                    }
                }
            }
            _ => {
                debug!(
                    "Skipping cluster {}: geometry is not areal",
                    cluster.cluster_id
                );
            }
        }
    }

    Ok(points)
}

/// Splits `count` across the multipolygon's parts proportionally to area,
/// correcting rounding drift so the shares sum to `count` exactly.
fn split_count_by_area(multi: &MultiPolygon<f64>, count: usize) -> Vec<(&Polygon<f64>, usize)> {
    let parts: Vec<&Polygon<f64>> = multi
        .0
        .iter()
        .filter(|part| part.is_valid() && part.unsigned_area() > 0.0)
        .collect();
    let total_area: f64 = parts.iter().map(|part| part.unsigned_area()).sum();
    if parts.is_empty() || total_area == 0.0 {
        return Vec::new();
    }

    let mut shares: Vec<i64> = parts
        .iter()
        .map(|part| (count as f64 * part.unsigned_area() / total_area).round() as i64)
        .collect();

    let mut drift = count as i64 - shares.iter().sum::<i64>();
    let mut cursor = 0;
    while drift != 0 {
        let index = cursor % shares.len();
        if drift > 0 {
            shares[index] += 1;
            drift -= 1;
        } else if shares[index] > 0 {
            shares[index] -= 1;
            drift += 1;
        }
        cursor += 1;
    }

    parts
        .into_iter()
        .zip(shares)
        .filter(|(_, share)| *share > 0)
        .map(|(part, share)| (part, share as usize))
        .collect()
}
