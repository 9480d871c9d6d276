//! cal-config: startup configuration for the cal backend
//!
//! Loads an optional `.env` file into the environment and resolves the
//! server host, port, environment name and Gemini API key, falling back to
//! literal defaults. The result is an immutable [`Settings`] snapshot meant to
//! be built once at startup and passed to whatever needs it.

pub mod config;
pub mod redact;

pub use config::{load, ConfigError, Loader, Setting, Settings};
