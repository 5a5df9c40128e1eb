use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid gallery config: {0}")]
    Json(#[from] serde_json::Error),
}
