use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Source file or path does not exist (download/copy path).
    #[error("file not found or invalid input: {0}")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("{}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Caller supplied an empty name or an unsupported file.
    #[error("{0}")]
    Validation(String),

    #[error("invalid path configuration: {0}")]
    Config(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // The URL is logged by the caller; keep only the reason here.
        Error::Network(err.without_url().to_string())
    }
}
