use std::io;

use thiserror::Error;

/// Error type for configuration, corpus scanning, and serialization failures.
///
/// Partition assignment itself never fails; only the surfaces that validate
/// caller input or touch the filesystem return this type.
#[derive(Debug, Error)]
pub enum PartitionError {
    /// Invalid caller-supplied settings.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Dataset root missing or not a directory.
    #[error("corpus root '{root}' is unusable: {reason}")]
    Corpus {
        /// Root path as given.
        root: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Settings could not be rendered as JSON.
    #[error("failed to serialize settings: {0}")]
    Serialization(#[from] serde_json::Error),
}
