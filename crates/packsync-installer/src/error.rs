use std::io;
use std::path::PathBuf;

use packsync_transport::TransportError;

/// Errors raised while converging a working directory.
///
/// Per-entry variants (`ChecksumExhausted`, `UnsupportedChecksum`,
/// `Transport`, `Extraction`) are collected by the completion barrier; the
/// run itself only fails with `AggregateFailure` once every entry reported.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("manifest lists entry '{name}' more than once")]
    DuplicateEntry { name: String },

    #[error(
        "checksum mismatch for '{entry}' after {attempts} attempts: expected {expected}, got {actual}"
    )]
    ChecksumExhausted {
        entry: String,
        attempts: u32,
        expected: String,
        actual: String,
    },

    #[error("entry '{entry}' has an unsupported checksum '{checksum}'")]
    UnsupportedChecksum { entry: String, checksum: String },

    #[error("failed to download '{entry}': {source}")]
    Transport {
        entry: String,
        #[source]
        source: TransportError,
    },

    #[error("failed to extract '{entry}': {reason}")]
    Extraction { entry: String, reason: String },

    #[error("{} of the build's entries failed to install: {}", failed.len(), failed.join(", "))]
    AggregateFailure { failed: Vec<String> },

    #[error("completion barrier finished with {remaining} entries still outstanding")]
    IncompleteBatch { remaining: usize },

    #[error("invalid state file {}: {reason}", path.display())]
    State { path: PathBuf, reason: String },

    #[error(
        "working directory is locked by another run ({holder}): {}; delete it if no run is active",
        path.display()
    )]
    Locked { path: PathBuf, holder: String },

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy platform artifact from {} to {}: {source}", from.display(), to.display())]
    ArtifactCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SyncError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
