use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },
    #[error("Invalid depth directive '{0}', expected root+N")]
    InvalidDepth(String),
    #[error("No valid paths found")]
    NoValidPaths,
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
impl ScanError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::Io {
            path: path.into(),
            source,
        }
    }
}
