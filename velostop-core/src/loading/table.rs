//! OD trip table ingest

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Row of the origin-destination trip table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub origin_cluster: i64,
    pub destination_cluster: i64,
    pub trips: f64,
}

/// Reads a semicolon-delimited trip table with caller-named columns.
///
/// Rows whose cluster ids fail to parse are dropped with a warning; an
/// unparseable trip count becomes 0 and the row is skipped later during
/// disaggregation.
pub fn read_trip_table<R: Read>(
    reader: R,
    origin_field: &str,
    destination_field: &str,
    trips_field: &str,
) -> Result<Vec<TripRecord>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| Error::InvalidData(format!("Trip table column '{name}' not found")))
    };
    let origin_column = column(origin_field)?;
    let destination_column = column(destination_field)?;
    let trips_column = column(trips_field)?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let origin = record.get(origin_column).and_then(|v| v.parse::<i64>().ok());
        let destination = record
            .get(destination_column)
            .and_then(|v| v.parse::<i64>().ok());
        let (Some(origin_cluster), Some(destination_cluster)) = (origin, destination) else {
            warn!(
                "Dropping trip table row with unparseable cluster ids: {:?}",
                record
            );
            continue;
        };
        let trips = record
            .get(trips_column)
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(0.0);
        rows.push(TripRecord {
            origin_cluster,
            destination_cluster,
            trips,
        });
    }
    Ok(rows)
}

/// [`read_trip_table`] over a file path.
pub fn read_trip_table_path(
    path: &Path,
    origin_field: &str,
    destination_field: &str,
    trips_field: &str,
) -> Result<Vec<TripRecord>, Error> {
    let file = File::open(path)?;
    read_trip_table(file, origin_field, destination_field, trips_field)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
home_cluster;work_cluster;count
1;2;10
1;3;0
bad;3;5
2;3;n/a
";

    #[test]
    fn reads_named_columns_with_semicolons() {
        let rows =
            read_trip_table(TABLE.as_bytes(), "home_cluster", "work_cluster", "count").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            TripRecord {
                origin_cluster: 1,
                destination_cluster: 2,
                trips: 10.0
            }
        );
        // unparseable trip count becomes 0
        assert_eq!(rows[2].trips, 0.0);
    }

    #[test]
    fn unknown_column_is_an_error() {
        let result = read_trip_table(TABLE.as_bytes(), "nope", "work_cluster", "count");
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn unparseable_cluster_rows_are_dropped() {
        let rows =
            read_trip_table(TABLE.as_bytes(), "home_cluster", "work_cluster", "count").unwrap();
        assert!(rows.iter().all(|row| row.origin_cluster != 0));
        assert_eq!(rows.len(), 3);
    }
}
