//! Configuration loading
//!
//! Ingests an optional `.env` file into the environment, then resolves the
//! startup settings with precedence (process env > .env file > defaults).

pub mod env_file;
pub mod error;
pub mod loader;
pub mod settings;
pub mod store;

pub use env_file::{discover_env_file, ingest_env_file, EnvFileReport};
pub use error::ConfigError;
pub use loader::{load, Loader, Resolution, Source};
pub use settings::{Setting, Settings};
pub use store::{EnvStore, MapEnv, ProcessEnv};
