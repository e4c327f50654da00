//! This module is responsible for turning the scored network dataset into
//! the routable graph variants and for reading the OD trip table.

mod builder;
mod cache;
mod table;

pub use builder::build_graph_set;
pub use table::{TripRecord, read_trip_table, read_trip_table_path};
