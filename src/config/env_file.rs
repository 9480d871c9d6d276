//! `.env` discovery and ingestion

use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::store::EnvStore;

pub const ENV_FILE_NAME: &str = ".env";

/// What an ingestion pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFileReport {
    /// File that was ingested; `None` when no file was used.
    pub path: Option<PathBuf>,
    /// Keys written to the store.
    pub applied: Vec<String>,
    /// Keys left alone because the store already had them.
    pub skipped: Vec<String>,
}

impl EnvFileReport {
    pub fn was_applied(&self, key: &str) -> bool {
        self.applied.iter().any(|k| k == key)
    }
}

/// Find `.env` in `start` or the nearest ancestor that has one.
///
/// The walk stops after `ceiling` when it is one of the ancestors.
pub fn discover_env_file(start: &Path, ceiling: Option<&Path>) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let candidate = dir.join(ENV_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if ceiling.is_some_and(|stop| dir == stop) {
            break;
        }
    }
    None
}

/// Load `path` into `store` without overriding keys the store already has.
///
/// The file is parsed completely before anything is written, so a malformed
/// file leaves the store untouched. `${VAR}` substitution is done by dotenvy
/// against the process environment and earlier lines of the file, never
/// against `store`.
pub fn ingest_env_file(path: &Path, store: &mut impl EnvStore) -> Result<EnvFileReport, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::EnvFileMissing(path.to_path_buf()));
    }

    let entries = read_entries(path)?;
    let mut report = EnvFileReport { path: Some(path.to_path_buf()), ..Default::default() };

    for (key, value) in entries {
        if store.contains(&key) {
            tracing::debug!("{} already set, not overriding from {}", key, path.display());
            report.skipped.push(key);
            continue;
        }
        store.set(&key, &value);
        report.applied.push(key);
    }

    tracing::debug!(
        "Ingested {}: {} applied, {} skipped",
        path.display(),
        report.applied.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Parse the file into ordered pairs; a repeated key keeps its last value.
fn read_entries(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    let to_error = |source| ConfigError::EnvFile { path: path.to_path_buf(), source };

    // The handle lives inside the iterator and closes when it drops
    let iter = dotenvy::from_path_iter(path).map_err(to_error)?;

    let mut entries: Vec<(String, String)> = Vec::new();
    for item in iter {
        let (key, value) = item.map_err(to_error)?;
        if let Some(reason) = invalid_entry_reason(&key, &value) {
            return Err(ConfigError::InvalidEntry { path: path.to_path_buf(), key, reason });
        }
        match entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
    }
    Ok(entries)
}

/// Entries the process environment cannot hold.
fn invalid_entry_reason(key: &str, value: &str) -> Option<&'static str> {
    if key.is_empty() {
        Some("empty key")
    } else if key.contains('=') {
        Some("key contains '='")
    } else if key.contains('\0') {
        Some("key contains a NUL byte")
    } else if value.contains('\0') {
        Some("value contains a NUL byte")
    } else {
        None
    }
}
