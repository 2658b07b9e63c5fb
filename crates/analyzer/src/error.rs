use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("failed to read address list {path:?}: {source}")]
    AddressFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read cache file {path:?}: {source}")]
    CacheRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cache file {path:?} is corrupt ({source}); fix or delete it to start over")]
    CorruptCache {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to read config file {path:?}: {message}")]
    Config { path: PathBuf, message: String },
    #[error("RPC endpoint unreachable: {0}")]
    Connection(String),
}
