//! Error types for the appblocker-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for appblocker operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can escape the core components.
///
/// Corrupt or missing block-list files are recovered inside the store and
/// never surface here; process-level failures during enumeration or killing
/// are swallowed per-process. What remains is the unrecoverable tail: the
/// daemon cannot keep running when it no longer knows what is on disk.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to write a block-list file. Fatal: after a failed write the
    /// on-disk state is unknown, so the loop must stop.
    #[error("Failed to persist block list to {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error (e.g. no home directory to anchor file paths).
    #[error("Configuration error: {0}")]
    Config(String),
}
