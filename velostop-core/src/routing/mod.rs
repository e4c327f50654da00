//! Shortest-path search over the routable graph variants

pub mod dijkstra;
pub mod traced;

pub use dijkstra::shortest_path_lengths;
pub use traced::{SearchTree, shortest_path_tree};
