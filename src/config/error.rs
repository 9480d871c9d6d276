//! Configuration errors

use std::path::PathBuf;

/// Errors surfaced while loading configuration.
///
/// Only an explicitly requested env file can produce one; a discovered file
/// that fails is logged and ignored.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("env file not found: {}", .0.display())]
    EnvFileMissing(PathBuf),

    #[error("failed to read env file {}: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("invalid entry {key:?} in env file {}: {reason}", .path.display())]
    InvalidEntry {
        path: PathBuf,
        key: String,
        reason: &'static str,
    },
}
