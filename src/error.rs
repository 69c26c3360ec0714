use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlobeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: simd_json::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse coastlines {path}: {source}")]
    Coastlines {
        path: PathBuf,
        #[source]
        source: simd_json::Error,
    },

    #[error("coastline file {0} contains no polygons")]
    NoPolygons(PathBuf),

    #[error("failed to spawn render worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("render worker disconnected")]
    WorkerDisconnected,
}

pub type Result<T> = std::result::Result<T, GlobeError>;
