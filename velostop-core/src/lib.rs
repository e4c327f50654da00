//! Core engine for scoring bicycle-network accessibility of public
//! transport stops.
//!
//! Takes a street network pre-scored with per-direction bikeability
//! indices, disaggregates coarse origin-destination statistics into
//! individual points and trips, and evaluates for every stop how much of
//! the surrounding network — and how many households — remain reachable
//! when riding is restricted to high-quality infrastructure.

pub mod disaggregate;
pub mod error;
pub mod evaluate;
pub mod export;
pub mod filter;
pub mod loading;
pub mod model;
pub mod pipeline;
pub mod prelude;
pub mod routing;
pub mod snap;

pub use error::Error;

/// External node identifier carried by the scored network dataset.
pub type NodeId = i64;

/// External edge identifier carried by the scored network dataset.
pub type EdgeId = i64;

/// Minimum per-direction bikeability index for the quality graph.
pub const QUALITY_INDEX_THRESHOLD: f64 = 0.5;

/// Search cutoff in meters for the per-stop reverse shortest-path search.
pub const EVALUATION_CUTOFF: f64 = 3250.0;

/// Largest tolerated quality/base distance ratio for household access.
pub const ACCESS_RATIO_MAX: f64 = 1.5;

/// Assumed cycling speed used to derive the trip distance threshold.
pub const TRAVEL_SPEED_KMH: f64 = 15.0;

/// Maximum tolerated travel time used to derive the trip distance threshold.
pub const MAX_TRAVEL_MINUTES: f64 = 15.0;
