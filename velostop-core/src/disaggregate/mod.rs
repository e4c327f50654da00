//! Disaggregation of cluster-level statistics
//!
//! Turns aggregate cluster counts into individual point sets and a
//! cluster-level trip table into point-to-point trip edges. All
//! randomness flows through an explicit generator passed by the caller,
//! so a fixed seed reproduces the exact same points and pairings.

mod sampling;
mod trips;

use rand::SeedableRng;
use rand::rngs::StdRng;

pub use sampling::{distribute_points_in_raster, random_points_in_polygon};
pub use trips::disaggregate_table_to_edges;

/// Generator for the disaggregation stages: seeded for reproducible runs,
/// OS-seeded otherwise.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
