//! GeoJSON conversions for the engine's outputs
//!
//! Builds in-memory `FeatureCollection`s only; writing them anywhere is
//! the caller's concern.

use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::Error;
use crate::model::{
    AccessibilityRecord, DemandPoint, RouteRecord, Stop, StopSummary, TripEdge,
};

fn feature(geometry: Geometry, properties: serde_json::Value) -> Result<Feature, Error> {
    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": properties,
    });
    serde_json::from_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}

pub fn demand_points_to_geojson(points: &[DemandPoint]) -> Result<FeatureCollection, Error> {
    let features = points
        .iter()
        .map(|point| {
            feature(
                Geometry::new(GeoJsonValue::from(&point.geometry)),
                json!({
                    "point_id": point.point_id,
                    "cluster_id": point.cluster_id,
                    "node_base": point.node_base,
                    "node_quality": point.node_quality,
                }),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(collection(features))
}

pub fn trip_edges_to_geojson(edges: &[TripEdge]) -> Result<FeatureCollection, Error> {
    let features = edges
        .iter()
        .map(|edge| {
            feature(
                Geometry::new(GeoJsonValue::from(&edge.geometry)),
                json!({
                    "origin": edge.origin,
                    "destination": edge.destination,
                    "origin_cluster": edge.origin_cluster,
                    "destination_cluster": edge.destination_cluster,
                    "distance": edge.network_distance,
                }),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(collection(features))
}

pub fn stops_to_geojson(stops: &[Stop]) -> Result<FeatureCollection, Error> {
    let features = stops
        .iter()
        .map(|stop| {
            feature(
                Geometry::new(GeoJsonValue::from(&stop.geometry)),
                json!({
                    "stop_id": stop.stop_id,
                    "node_base": stop.node_base,
                    "node_quality": stop.node_quality,
                }),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(collection(features))
}

pub fn accessibility_to_geojson(
    records: &[AccessibilityRecord],
) -> Result<FeatureCollection, Error> {
    let features = records
        .iter()
        .map(|record| {
            feature(
                Geometry::new(GeoJsonValue::from(&record.geometry)),
                json!({
                    "household_id": record.household_id,
                    "stop_id": record.stop_id,
                    "from_node": record.from_node,
                    "to_node": record.to_node,
                    "length_base": record.length_base,
                    "length_quality": record.length_quality,
                    "length_ratio": record.length_ratio,
                    "index_base": record.index_base,
                    "index_quality": record.index_quality,
                    "access": record.access,
                }),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(collection(features))
}

pub fn stop_summaries_to_geojson(stops: &[StopSummary]) -> Result<FeatureCollection, Error> {
    let features = stops
        .iter()
        .map(|stop| {
            feature(
                Geometry::new(GeoJsonValue::from(&stop.geometry)),
                json!({
                    "stop_id": stop.stop_id,
                    "node_id": stop.node_id,
                    "length_base": stop.length_base,
                    "length_quality": stop.length_quality,
                    "length_ratio": stop.length_ratio,
                    "households_base": stop.households_base,
                    "households_quality": stop.households_quality,
                    "households_ratio": stop.households_ratio,
                    "index_average_base": stop.index_average_base,
                    "index_average_quality": stop.index_average_quality,
                }),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(collection(features))
}

pub fn routes_to_geojson(routes: &[RouteRecord]) -> Result<FeatureCollection, Error> {
    let features = routes
        .iter()
        .map(|route| {
            feature(
                Geometry::new(GeoJsonValue::from(&route.geometry)),
                json!({
                    "household_id": route.household_id,
                    "stop_id": route.stop_id,
                    "from_node": route.from_node,
                    "to_node": route.to_node,
                    "length": route.length,
                    "index_average": route.index_average,
                }),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(collection(features))
}

#[cfg(test)]
mod tests {
    use geo::{LineString, Point};

    use super::*;

    #[test]
    fn one_feature_per_demand_point() {
        let mut point = DemandPoint::new(1, 4, Point::new(10.0, 47.0));
        point.node_base = Some(12);
        let fc = demand_points_to_geojson(&[point]).unwrap();
        assert_eq!(fc.features.len(), 1);
        let properties = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(properties["point_id"], 1);
        assert_eq!(properties["node_base"], 12);
    }

    #[test]
    fn trip_edge_features_carry_distances() {
        let edge = TripEdge {
            origin: 1,
            destination: 2,
            origin_cluster: 10,
            destination_cluster: 20,
            geometry: LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]),
            network_distance: Some(1234.5),
        };
        let fc = trip_edges_to_geojson(&[edge]).unwrap();
        let properties = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(properties["distance"], 1234.5);
    }
}
