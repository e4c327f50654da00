//! Persisted graph cache keyed by dataset content
//!
//! The cache key is a content hash of the encoded scored network plus the
//! quality threshold, so edited inputs or changed build parameters miss
//! the cache instead of silently serving stale graphs. Unreadable cache
//! files degrade to a rebuild.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::Error;
use crate::model::{GraphSet, ScoredNetwork};

pub(crate) fn cache_key(network: &ScoredNetwork, quality_threshold: f64) -> Result<u64, Error> {
    let mut payload =
        bincode::serialize(network).map_err(|e| Error::CacheError(e.to_string()))?;
    payload.extend_from_slice(&quality_threshold.to_le_bytes());
    Ok(xxh3_64(&payload))
}

fn cache_path(dir: &Path, key: u64) -> PathBuf {
    dir.join(format!("graphs_{key:016x}.bin"))
}

pub(crate) fn load(dir: &Path, key: u64) -> Option<GraphSet> {
    let path = cache_path(dir, key);
    if !path.exists() {
        return None;
    }
    let result = File::open(&path)
        .map_err(|e| Error::CacheError(e.to_string()))
        .and_then(|file| {
            bincode::deserialize_from(BufReader::new(file))
                .map_err(|e| Error::CacheError(e.to_string()))
        });
    match result {
        Ok(set) => {
            debug!("Loaded graph cache {}", path.display());
            Some(set)
        }
        Err(e) => {
            warn!("Discarding unreadable graph cache {}: {e}", path.display());
            None
        }
    }
}

pub(crate) fn store(dir: &Path, key: u64, set: &GraphSet) {
    if let Err(e) = try_store(dir, key, set) {
        warn!("Failed to persist graph cache: {e}");
    }
}

fn try_store(dir: &Path, key: u64, set: &GraphSet) -> Result<(), Error> {
    fs::create_dir_all(dir)?;
    let path = cache_path(dir, key);
    let file = File::create(&path)?;
    bincode::serialize_into(BufWriter::new(file), set)
        .map_err(|e| Error::CacheError(e.to_string()))?;
    debug!("Persisted graph cache {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CycleGraph, NetworkNode, ScoredNode};
    use geo::Point;

    fn network() -> ScoredNetwork {
        ScoredNetwork {
            edges: Vec::new(),
            nodes: vec![ScoredNode {
                id: 1,
                x: 10.0,
                y: 47.0,
            }],
        }
    }

    fn graph_set() -> GraphSet {
        let mut base = CycleGraph::new();
        base.ensure_node(NetworkNode {
            id: 1,
            geometry: Point::new(10.0, 47.0),
        });
        GraphSet {
            base_reversed: base.reversed(),
            quality: CycleGraph::new(),
            quality_reversed: CycleGraph::new(),
            base,
        }
    }

    #[test]
    fn key_changes_with_threshold_and_content() {
        let net = network();
        let a = cache_key(&net, 0.5).unwrap();
        let b = cache_key(&net, 0.7).unwrap();
        assert_ne!(a, b);

        let mut edited = net.clone();
        edited.nodes[0].x += 0.1;
        assert_ne!(cache_key(&edited, 0.5).unwrap(), a);
    }

    #[test]
    fn round_trip_restores_graphs() {
        let dir = tempfile::tempdir().unwrap();
        let key = cache_key(&network(), 0.5).unwrap();
        assert!(load(dir.path(), key).is_none());

        store(dir.path(), key, &graph_set());
        let restored = load(dir.path(), key).unwrap();
        assert_eq!(restored.base.node_count(), 1);
        assert!(restored.base.node_index(1).is_some());
    }

    #[test]
    fn corrupt_cache_degrades_to_miss() {
        let dir = tempfile::tempdir().unwrap();
        let key = cache_key(&network(), 0.5).unwrap();
        fs::write(cache_path(dir.path(), key), b"not a graph").unwrap();
        assert!(load(dir.path(), key).is_none());
    }
}
