//! Error types for the mirroring pipeline.
//!
//! Only [`MirrorError::InputParse`] (and the I/O failure reading the input
//! file) aborts a run. Everything else is recovered at the call site: fetch
//! and URL errors are folded into per-asset outcomes, filesystem errors into
//! per-article outcomes.

use std::path::PathBuf;

/// All failure modes of the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// The input collection could not be parsed. Fatal for the run.
    #[error("failed to parse input {path}: {source}")]
    InputParse {
        path: String,
        source: serde_json::Error,
    },

    /// A record could not be serialized back to JSON.
    #[error("failed to serialize record for {path}: {source}")]
    RecordSerialize {
        path: String,
        source: serde_json::Error,
    },

    /// A media reference is not a usable URL.
    #[error("malformed media URL {url}: {reason}")]
    MalformedUrl { url: String, reason: String },

    /// A fetch got a non-success response status.
    #[error("HTTP {status} fetching {url}")]
    FetchHttp {
        url: String,
        status: reqwest::StatusCode,
    },

    /// DNS failure, connection reset, unsupported scheme, and the like.
    #[error("transport failure fetching {url}: {source}")]
    FetchTransport {
        url: String,
        source: reqwest::Error,
    },

    /// Directory creation or file read/write failed.
    #[error("filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl MirrorError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MirrorError>;
