//! Combined WGS84 extent of the cluster inputs
//!
//! The extent is the contract handed to the external network scoring
//! tool: a `miny,minx,maxy,maxx` bounding box string and the UTM SRID of
//! the box center.

use geo::BoundingRect;

use super::points::Cluster;

/// WGS84 bounding box over a set of cluster geometries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    /// Combined extent of all cluster geometries, `None` when no cluster
    /// carries a usable geometry.
    pub fn from_clusters<'a>(clusters: impl IntoIterator<Item = &'a Cluster>) -> Option<Self> {
        let mut extent: Option<Extent> = None;
        for cluster in clusters {
            let Some(rect) = cluster.geometry.as_ref().and_then(|g| g.bounding_rect()) else {
                continue;
            };
            extent = Some(match extent {
                None => Extent {
                    min_x: rect.min().x,
                    min_y: rect.min().y,
                    max_x: rect.max().x,
                    max_y: rect.max().y,
                },
                Some(e) => Extent {
                    min_x: e.min_x.min(rect.min().x),
                    min_y: e.min_y.min(rect.min().y),
                    max_x: e.max_x.max(rect.max().x),
                    max_y: e.max_y.max(rect.max().y),
                },
            });
        }
        extent
    }

    /// Bounding box formatted as `miny,minx,maxy,maxx` with 4 decimals.
    pub fn bbox_string(&self) -> String {
        format!(
            "{:.4},{:.4},{:.4},{:.4}",
            self.min_y, self.min_x, self.max_y, self.max_x
        )
    }

    /// UTM zone SRID of the extent center.
    pub fn utm_srid(&self) -> i32 {
        let center_lon = (self.min_x + self.max_x) / 2.0;
        let center_lat = (self.min_y + self.max_y) / 2.0;
        let zone = ((center_lon + 180.0) / 6.0) as i32 + 1;
        if center_lat >= 0.0 {
            32600 + zone
        } else {
            32700 + zone
        }
    }
}
