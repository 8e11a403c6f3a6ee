use std::path::PathBuf;

use hecs::Entity;
use thiserror::Error;

/// Errors raised while loading or validating a [`crate::config::RunnerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A single content spawn that could not be carried out.
///
/// These never abort the segment: the caller logs them and the segment is
/// simply left without that piece of content.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("no {0} prefab configured")]
    MissingPrefab(&'static str),
    #[error("flower variant list is empty")]
    NoFlowerVariants,
    #[error("segment {0:?} no longer exists")]
    MissingSegment(Entity),
    #[error("no valid point found in region after {attempts} attempts")]
    PlacementExhausted { attempts: u32 },
}
