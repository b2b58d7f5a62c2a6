use std::path::PathBuf;

use thiserror::Error;

/// Failures of the outer conversion layers. Field extraction itself never fails.
#[derive(Error, Debug)]
pub enum ContentsError {
    #[error("contents.xml not found at {0}")]
    MissingContentsFile(PathBuf),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("root element is not <contents>, found <{0}>")]
    MissingRoot(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to walk asset directory: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl ContentsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ContentsError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, ContentsError>;
