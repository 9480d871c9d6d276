//! Settings loading

use std::fmt;
use std::path::PathBuf;

use super::env_file::{discover_env_file, ingest_env_file, EnvFileReport};
use super::error::ConfigError;
use super::settings::{lookup, Setting, Settings};
use super::store::{EnvStore, ProcessEnv};

/// Load the startup settings from the process environment.
///
/// A `.env` found from the working directory upward is ingested first, without
/// overriding variables already set. Never fails: problems with the env file
/// are logged and the file is ignored.
pub fn load() -> Settings {
    match Loader::new().load(&mut ProcessEnv) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Falling back to process environment only: {}", e);
            Settings::from_store(&ProcessEnv)
        }
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Already present in the store before any env file was read.
    Environment,
    /// Injected from this env file.
    EnvFile(PathBuf),
    Default,
    Unset,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Environment => f.write_str("environment"),
            Source::EnvFile(path) => write!(f, "env file {}", path.display()),
            Source::Default => f.write_str("default"),
            Source::Unset => f.write_str("unset"),
        }
    }
}

/// Settings together with the provenance of each value.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub settings: Settings,
    pub sources: Vec<(Setting, Source)>,
    pub env_file: EnvFileReport,
}

impl Resolution {
    pub fn source(&self, setting: Setting) -> Option<&Source> {
        self.sources.iter().find(|(s, _)| *s == setting).map(|(_, source)| source)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum EnvFileChoice {
    #[default]
    Discover,
    Explicit(PathBuf),
    Skip,
}

/// Builder for a settings load.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    env_file: EnvFileChoice,
    search_from: Option<PathBuf>,
    search_ceiling: Option<PathBuf>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest exactly this file. A missing or malformed file is an error.
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = EnvFileChoice::Explicit(path.into());
        self
    }

    /// Start `.env` discovery here instead of the working directory.
    pub fn search_from(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_from = Some(dir.into());
        self
    }

    /// Do not look for `.env` above this directory.
    pub fn search_ceiling(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_ceiling = Some(dir.into());
        self
    }

    pub fn skip_env_file(mut self) -> Self {
        self.env_file = EnvFileChoice::Skip;
        self
    }

    pub fn load(&self, store: &mut impl EnvStore) -> Result<Settings, ConfigError> {
        self.resolve(store).map(|resolution| resolution.settings)
    }

    pub fn resolve(&self, store: &mut impl EnvStore) -> Result<Resolution, ConfigError> {
        let env_file = self.ingest(store)?;
        let settings = Settings::from_store(store);
        let sources = Setting::ALL
            .into_iter()
            .map(|setting| (setting, source_of(setting, store, &env_file)))
            .collect();

        tracing::debug!("Resolved settings: {:?}", settings);
        Ok(Resolution { settings, sources, env_file })
    }

    fn ingest(&self, store: &mut impl EnvStore) -> Result<EnvFileReport, ConfigError> {
        match &self.env_file {
            EnvFileChoice::Skip => Ok(EnvFileReport::default()),
            EnvFileChoice::Explicit(path) => ingest_env_file(path, store),
            EnvFileChoice::Discover => {
                let Some(path) = self.discover() else {
                    return Ok(EnvFileReport::default());
                };
                match ingest_env_file(&path, store) {
                    Ok(report) => Ok(report),
                    Err(e) => {
                        // Discovered, not requested: soft-fail
                        tracing::warn!("Ignoring env file {}: {}", path.display(), e);
                        Ok(EnvFileReport::default())
                    }
                }
            }
        }
    }

    fn discover(&self) -> Option<PathBuf> {
        let start = match &self.search_from {
            Some(dir) => dir.clone(),
            None => match std::env::current_dir() {
                Ok(dir) => dir,
                Err(e) => {
                    tracing::warn!("Cannot determine working directory for .env lookup: {}", e);
                    return None;
                }
            },
        };

        let found = discover_env_file(&start, self.search_ceiling.as_deref());
        if found.is_none() {
            tracing::debug!("No .env found from {}", start.display());
        }
        found
    }
}

fn source_of(setting: Setting, store: &impl EnvStore, env_file: &EnvFileReport) -> Source {
    if lookup(store, setting).is_some() {
        return match env_file.path.as_deref() {
            Some(path) if env_file.was_applied(setting.key()) => Source::EnvFile(path.to_path_buf()),
            _ => Source::Environment,
        };
    }
    match setting.default_value() {
        Some(_) => Source::Default,
        None => Source::Unset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::MapEnv;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_env_file() {
        let mut store = MapEnv::new();
        let settings = Loader::new().skip_env_file().load(&mut store).expect("load");
        assert_eq!(settings.server_url(), "0.0.0.0");
        assert_eq!(settings.port(), "8000");
        assert_eq!(settings.env(), "production");
        assert!(settings.gemini_api_key().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_discovered_file_is_not_an_error() {
        let tmp = TempDir::new().expect("tmp");
        let resolution = Loader::new()
            .search_from(tmp.path())
            .search_ceiling(tmp.path())
            .resolve(&mut MapEnv::new())
            .expect("resolve");
        assert_eq!(resolution.settings.port(), "8000");
        assert!(resolution.env_file.path.is_none());
    }

    #[test]
    fn test_ceiling_hides_parent_env_file() {
        let tmp = TempDir::new().expect("tmp");
        let service = tmp.path().join("service");
        fs::create_dir_all(&service).expect("mkdir");
        fs::write(tmp.path().join(".env"), "PORT=7000\n").expect("write");

        let loader = Loader::new().search_from(&service);
        assert_eq!(loader.clone().load(&mut MapEnv::new()).expect("load").port(), "7000");
        let bounded = loader.search_ceiling(&service).load(&mut MapEnv::new()).expect("load");
        assert_eq!(bounded.port(), "8000");
    }

    #[test]
    fn test_nul_byte_in_discovered_file_falls_back() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(".env"), b"SERVER_URL=a\0b\nPORT=7000\n").expect("write");

        let mut store = MapEnv::new();
        let resolution =
            Loader::new().search_from(tmp.path()).resolve(&mut store).expect("soft-fail");
        assert_eq!(resolution.settings.server_url(), "0.0.0.0");
        assert_eq!(resolution.settings.port(), "8000");
        assert!(resolution.env_file.path.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_nul_byte_in_explicit_file_errors() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("prod.env");
        fs::write(&path, b"GEMINI_API_KEY=a\0b\n").expect("write");

        let result = Loader::new().env_file(&path).load(&mut MapEnv::new());
        assert!(matches!(result, Err(ConfigError::InvalidEntry { .. })));
    }

    #[test]
    fn test_discovered_file_sets_server_url() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(".env"), "SERVER_URL=127.0.0.1\n").expect("write");

        let mut store = MapEnv::new();
        let settings = Loader::new().search_from(tmp.path()).load(&mut store).expect("load");
        assert_eq!(settings.server_url(), "127.0.0.1");
        assert_eq!(store.get("SERVER_URL").as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn test_process_value_beats_env_file() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(".env"), "SERVER_URL=127.0.0.1\n").expect("write");

        let mut store = MapEnv::new().with("SERVER_URL", "10.0.0.5");
        let settings = Loader::new().search_from(tmp.path()).load(&mut store).expect("load");
        assert_eq!(settings.server_url(), "10.0.0.5");
    }

    #[test]
    fn test_malformed_discovered_file_falls_back() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(".env"), "PORT=7000\nENV=\"broken\n").expect("write");

        let resolution =
            Loader::new().search_from(tmp.path()).resolve(&mut MapEnv::new()).expect("soft-fail");
        assert_eq!(resolution.settings.port(), "8000");
        assert!(resolution.env_file.path.is_none());
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        let tmp = TempDir::new().expect("tmp");
        let result = Loader::new().env_file(tmp.path().join("prod.env")).load(&mut MapEnv::new());
        assert!(matches!(result, Err(ConfigError::EnvFileMissing(_))));
    }

    #[test]
    fn test_explicit_malformed_file_errors() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("prod.env");
        fs::write(&path, "GEMINI_API_KEY='open\n").expect("write");

        let result = Loader::new().env_file(&path).load(&mut MapEnv::new());
        assert!(matches!(result, Err(ConfigError::EnvFile { .. })));
    }

    #[test]
    fn test_explicit_file_skips_discovery() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(".env"), "PORT=1111\n").expect("write");
        let explicit = tmp.path().join("other.env");
        fs::write(&explicit, "ENV=staging\n").expect("write");

        let settings = Loader::new()
            .search_from(tmp.path())
            .env_file(&explicit)
            .load(&mut MapEnv::new())
            .expect("load");
        assert_eq!(settings.env(), "staging");
        assert_eq!(settings.port(), "8000");
    }

    #[test]
    fn test_sources_are_reported() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join(".env");
        fs::write(&path, "SERVER_URL=127.0.0.1\nPORT=7000\n").expect("write");

        let mut store = MapEnv::new().with("PORT", "9090");
        let resolution = Loader::new().search_from(tmp.path()).resolve(&mut store).expect("resolve");

        assert_eq!(resolution.source(Setting::ServerUrl), Some(&Source::EnvFile(path.clone())));
        assert_eq!(resolution.source(Setting::Port), Some(&Source::Environment));
        assert_eq!(resolution.source(Setting::Env), Some(&Source::Default));
        assert_eq!(resolution.source(Setting::GeminiApiKey), Some(&Source::Unset));
        assert_eq!(resolution.env_file.skipped, vec!["PORT".to_string()]);
    }

    #[test]
    fn test_empty_env_file_value_counts_as_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(".env"), "ENV=\n").expect("write");

        let resolution =
            Loader::new().search_from(tmp.path()).resolve(&mut MapEnv::new()).expect("resolve");
        assert_eq!(resolution.settings.env(), "production");
        assert_eq!(resolution.source(Setting::Env), Some(&Source::Default));
    }

    #[test]
    fn test_second_load_is_identical() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(".env"), "GEMINI_API_KEY=abc123\n").expect("write");

        let mut store = MapEnv::new();
        let loader = Loader::new().search_from(tmp.path());
        let first = loader.load(&mut store).expect("first");
        let second = loader.load(&mut store).expect("second");
        assert_eq!(first, second);
        assert_eq!(second.gemini_api_key(), Some("abc123"));
    }

    #[test]
    fn test_source_display() {
        assert_eq!(Source::Default.to_string(), "default");
        assert_eq!(Source::EnvFile(PathBuf::from("/srv/.env")).to_string(), "env file /srv/.env");
    }
}
