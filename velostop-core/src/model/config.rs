use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    ACCESS_RATIO_MAX, EVALUATION_CUTOFF, MAX_TRAVEL_MINUTES, QUALITY_INDEX_THRESHOLD,
    TRAVEL_SPEED_KMH,
};

/// Tuning parameters of the evaluation engine.
///
/// The defaults reproduce the reference parameters: a 0.5 quality
/// threshold, a 3250 m stop search cutoff, and a trip distance limit of
/// 15 minutes at 15 km/h.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum per-direction bikeability index for the quality graph.
    pub quality_threshold: f64,
    /// Cutoff distance in meters for the per-stop reverse search.
    pub evaluation_cutoff: f64,
    /// Largest quality/base distance ratio still counted as access.
    pub access_ratio_max: f64,
    /// Assumed cycling speed for the trip distance threshold.
    pub travel_speed_kmh: f64,
    /// Maximum tolerated travel time for the trip distance threshold.
    pub max_travel_minutes: f64,
    /// Optional snap rejection distance in meters. `None` assigns every
    /// point a nearest node no matter how far away it is.
    pub max_snap_distance: Option<f64>,
    /// Emit per-household route geometries and path index averages.
    pub generate_routes: bool,
    /// Emit per-stop reachable edge subsets.
    pub generate_graphs: bool,
    /// Directory for the persisted graph cache. `None` disables caching.
    pub cache_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quality_threshold: QUALITY_INDEX_THRESHOLD,
            evaluation_cutoff: EVALUATION_CUTOFF,
            access_ratio_max: ACCESS_RATIO_MAX,
            travel_speed_kmh: TRAVEL_SPEED_KMH,
            max_travel_minutes: MAX_TRAVEL_MINUTES,
            max_snap_distance: None,
            generate_routes: true,
            generate_graphs: true,
            cache_dir: None,
        }
    }
}

impl EngineConfig {
    /// Largest network distance a disaggregated trip may span.
    pub fn max_network_distance(&self) -> f64 {
        distance_for(self.travel_speed_kmh, self.max_travel_minutes)
    }
}

/// Distance in meters covered at `speed_kmh` within `minutes`.
pub fn distance_for(speed_kmh: f64, minutes: f64) -> f64 {
    (speed_kmh * (minutes / 60.0) * 1000.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_trip_threshold_is_3750_m() {
        let config = EngineConfig::default();
        assert_eq!(config.max_network_distance(), 3750.0);
    }

    #[test]
    fn distance_scales_with_speed_and_time() {
        assert_eq!(distance_for(20.0, 30.0), 10_000.0);
        assert_eq!(distance_for(0.0, 15.0), 0.0);
    }
}
