//! Error type for the loading APIs

use std::path::PathBuf;

/// Failures when reading fact reports or configuration.
///
/// Parsing, normalization and analysis never fail; only the code that touches
/// the filesystem or decodes external input returns this.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid extraction report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration in {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("extraction failed for {file}: {message}")]
    Extraction { file: String, message: String },
}
