//! The resolved configuration snapshot

use serde::{Serialize, Serializer};
use std::fmt;

use super::store::EnvStore;
use crate::redact::mask_secret;

pub const DEFAULT_SERVER_URL: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "8000";
pub const DEFAULT_ENV: &str = "production";

/// One named setting and the environment variable backing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    ServerUrl,
    Port,
    Env,
    GeminiApiKey,
}

impl Setting {
    pub const ALL: [Setting; 4] =
        [Setting::ServerUrl, Setting::Port, Setting::Env, Setting::GeminiApiKey];

    pub fn key(self) -> &'static str {
        match self {
            Setting::ServerUrl => "SERVER_URL",
            Setting::Port => "PORT",
            Setting::Env => "ENV",
            Setting::GeminiApiKey => "GEMINI_API_KEY",
        }
    }

    /// Literal fallback; the API key has none.
    pub fn default_value(self) -> Option<&'static str> {
        match self {
            Setting::ServerUrl => Some(DEFAULT_SERVER_URL),
            Setting::Port => Some(DEFAULT_PORT),
            Setting::Env => Some(DEFAULT_ENV),
            Setting::GeminiApiKey => None,
        }
    }

    pub fn is_secret(self) -> bool {
        matches!(self, Setting::GeminiApiKey)
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Store value for `setting`, with empty strings treated as absent.
pub(crate) fn lookup(store: &impl EnvStore, setting: Setting) -> Option<String> {
    store.get(setting.key()).filter(|value| !value.is_empty())
}

fn lookup_or_default(store: &impl EnvStore, setting: Setting, default: &str) -> String {
    lookup(store, setting).unwrap_or_else(|| default.to_string())
}

/// Startup settings, resolved once and read-only afterwards.
///
/// Values are kept as text exactly as found; nothing is parsed or validated.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    #[serde(rename = "SERVER_URL")]
    server_url: String,
    #[serde(rename = "PORT")]
    port: String,
    #[serde(rename = "ENV")]
    env: String,
    #[serde(rename = "GEMINI_API_KEY", serialize_with = "serialize_masked")]
    gemini_api_key: Option<String>,
}

impl Settings {
    /// Resolve every setting from `store`, substituting defaults.
    pub fn from_store(store: &impl EnvStore) -> Self {
        Self {
            server_url: lookup_or_default(store, Setting::ServerUrl, DEFAULT_SERVER_URL),
            port: lookup_or_default(store, Setting::Port, DEFAULT_PORT),
            env: lookup_or_default(store, Setting::Env, DEFAULT_ENV),
            gemini_api_key: lookup(store, Setting::GeminiApiKey),
        }
    }

    /// Intended bind address.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    /// Free-form environment label, e.g. `production`.
    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini_api_key.as_deref()
    }

    pub fn value(&self, setting: Setting) -> Option<&str> {
        match setting {
            Setting::ServerUrl => Some(self.server_url()),
            Setting::Port => Some(self.port()),
            Setting::Env => Some(self.env()),
            Setting::GeminiApiKey => self.gemini_api_key(),
        }
    }

    /// Printable form of a value: secrets masked, absent values as `<unset>`.
    pub fn display_value(&self, setting: Setting) -> String {
        match self.value(setting) {
            Some(value) if setting.is_secret() => mask_secret(value),
            Some(value) => value.to_string(),
            None => "<unset>".to_string(),
        }
    }
}

fn serialize_masked<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(secret) => serializer.serialize_some(&mask_secret(secret)),
        None => serializer.serialize_none(),
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("server_url", &self.server_url)
            .field("port", &self.port)
            .field("env", &self.env)
            .field("gemini_api_key", &self.gemini_api_key.as_deref().map(mask_secret))
            .finish()
    }
}

/// One `KEY=value` line per setting.
impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for setting in Setting::ALL {
            writeln!(f, "{}={}", setting.key(), self.display_value(setting))?;
        }
        Ok(())
    }
}
