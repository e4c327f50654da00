//! Explicit pipeline driver
//!
//! Threads each stage's results into the next through a plain struct —
//! there is no shared pipeline state beyond what is passed here. Stage
//! timing is handled by wrapping each call in [`timed_stage`].

use std::time::Instant;

use log::info;
use rand::rngs::StdRng;

use crate::Error;
use crate::disaggregate::{disaggregate_table_to_edges, distribute_points_in_raster};
use crate::evaluate::evaluate_stops;
use crate::filter::filter_by_network_distance;
use crate::loading::{TripRecord, build_graph_set};
use crate::model::{
    Cluster, DemandPoint, EngineConfig, EvaluationOutput, GraphSet, ScoredNetwork, Stop, TripEdge,
};
use crate::snap::{NodeLocator, SnapSlot, snap_points};

/// Everything the engine consumes, assembled by the I/O collaborators.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    /// Scored street network; a run cannot start without one.
    pub network: ScoredNetwork,
    /// Origin-side cluster polygons (e.g. residents).
    pub clusters_a: Vec<Cluster>,
    /// Destination-side cluster polygons (e.g. jobs).
    pub clusters_b: Vec<Cluster>,
    pub trip_table: Vec<TripRecord>,
    pub stops: Vec<Stop>,
}

/// Results of every pipeline stage, handed to the export collaborators.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub points_a: Vec<DemandPoint>,
    pub points_b: Vec<DemandPoint>,
    pub trip_edges: Vec<TripEdge>,
    pub stops: Vec<Stop>,
    pub graphs: GraphSet,
    pub evaluation: EvaluationOutput,
}

/// Runs `f`, logging its wall-clock time under `name`.
pub fn timed_stage<T>(name: &str, f: impl FnOnce() -> T) -> T {
    let started = Instant::now();
    let result = f();
    info!("Stage '{name}' finished in {:.2?}", started.elapsed());
    result
}

/// Runs the whole accessibility evaluation pipeline.
///
/// # Errors
///
/// Fails before any computation when no scored network is provided;
/// otherwise only unrecoverable sampling degeneracies abort the run.
pub fn run_pipeline(
    input: PipelineInput,
    config: &EngineConfig,
    rng: &mut StdRng,
) -> Result<PipelineOutput, Error> {
    if input.network.is_empty() {
        return Err(Error::MissingNetwork);
    }

    let mut points_a = timed_stage("disaggregate clusters a", || {
        distribute_points_in_raster(&input.clusters_a, rng)
    })?;
    let mut points_b = timed_stage("disaggregate clusters b", || {
        distribute_points_in_raster(&input.clusters_b, rng)
    })?;
    info!(
        "Disaggregated {} origin and {} destination points",
        points_a.len(),
        points_b.len()
    );

    let trip_edges = timed_stage("disaggregate trip table", || {
        disaggregate_table_to_edges(&points_a, &points_b, &input.trip_table, rng)
    });

    let graphs = timed_stage("build graphs", || build_graph_set(&input.network, config))?;

    let mut stops = input.stops;
    timed_stage("snap points", || {
        let locator_base = NodeLocator::new(&graphs.base);
        let locator_quality = NodeLocator::new(&graphs.quality);
        snap_points(
            &mut points_a,
            &locator_base,
            SnapSlot::Base,
            config.max_snap_distance,
        );
        snap_points(
            &mut points_b,
            &locator_base,
            SnapSlot::Base,
            config.max_snap_distance,
        );
        snap_points(
            &mut stops,
            &locator_base,
            SnapSlot::Base,
            config.max_snap_distance,
        );
        snap_points(
            &mut stops,
            &locator_quality,
            SnapSlot::Quality,
            config.max_snap_distance,
        );
    });

    let (trip_edges, points_a, points_b) = timed_stage("filter trips by network distance", || {
        filter_by_network_distance(
            trip_edges,
            points_a,
            points_b,
            &graphs.base,
            config.max_network_distance(),
        )
    });

    let evaluation = timed_stage("evaluate stops", || {
        evaluate_stops(&graphs, &points_a, &stops, config)
    });

    Ok(PipelineOutput {
        points_a,
        points_b,
        trip_edges,
        stops,
        graphs,
        evaluation,
    })
}
