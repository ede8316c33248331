//! Configuration loading and validation.
//!
//! Loads `config.toml` from `$GEOMENTOR_CONFIG_PATH` or `~/.geomentor/`.
//! A missing file yields defaults. Environment variables override file
//! values; file values override defaults.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::session::{Profile, Role};

/// Env var pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "GEOMENTOR_CONFIG_PATH";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generative backend settings.
    pub backend: BackendConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
    /// Replacement credential registry. Empty means the built-in registry.
    pub users: Vec<UserEntry>,
}

/// Generative backend settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Gemini model name.
    pub model: String,
    /// API base URL, without the version path.
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Optional output token cap.
    pub max_output_tokens: Option<u32>,
    /// HTTP timeout for one backend round trip.
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            temperature: 0.7,
            max_output_tokens: None,
            timeout_secs: 60,
            api_key_env: default_api_key_env(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for rotated JSON logs. Defaults to `~/.geomentor/logs`.
    pub dir: Option<PathBuf>,
}

/// One registry entry from `[[users]]`.
#[derive(Clone, Deserialize)]
pub struct UserEntry {
    /// Login name, matched case-sensitively.
    pub username: String,
    /// Plain password; compared as an opaque string.
    pub password: String,
    /// Access level.
    pub role: Role,
    /// Tone calibration.
    #[serde(default = "default_profile")]
    pub profile: Profile,
}

impl fmt::Debug for UserEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserEntry")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("profile", &self.profile)
            .finish()
    }
}

// Default value functions for serde

fn default_model() -> String {
    "gemini-1.5-pro".to_owned()
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_owned()
}
fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_owned()
}
fn default_profile() -> Profile {
    Profile::General
}

impl Config {
    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str).context("failed to parse config TOML")
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("GEOMENTOR_MODEL") {
            self.backend.model = v;
        }
        if let Some(v) = env("GEOMENTOR_BASE_URL") {
            self.backend.base_url = v;
        }
        if let Some(v) = env("GEOMENTOR_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.backend.timeout_secs = n,
                Err(_) => tracing::warn!(
                    var = "GEOMENTOR_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("GEOMENTOR_LOG_DIR") {
            self.logging.dir = Some(PathBuf::from(v));
        }
    }
}

/// Load config from a TOML file. A missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            tracing::info!(path = %path.display(), "loading config from file");
            toml::from_str(&contents)
                .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(anyhow::anyhow!(
            "failed to read config at {}: {e}",
            path.display()
        )),
    }
}

// ---------------------------------------------------------------------------
// Runtime paths
// ---------------------------------------------------------------------------

/// Filesystem layout under the runtime directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    /// `~/.geomentor`
    pub root: PathBuf,
    /// `~/.geomentor/config.toml`, or `$GEOMENTOR_CONFIG_PATH`
    pub config_file: PathBuf,
    /// `~/.geomentor/.env`
    pub env_file: PathBuf,
    /// `~/.geomentor/logs`
    pub logs_dir: PathBuf,
}

/// Resolve the default config directory (`~/.geomentor/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".geomentor"))
}

/// Resolve runtime paths, honouring `$GEOMENTOR_CONFIG_PATH`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn runtime_paths() -> anyhow::Result<RuntimePaths> {
    runtime_paths_with(|key| std::env::var(key).ok())
}

/// Resolve runtime paths using a custom env resolver (for testing).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn runtime_paths_with(env: impl Fn(&str) -> Option<String>) -> anyhow::Result<RuntimePaths> {
    let root = config_dir()?;
    let config_file = env(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| root.join("config.toml"));
    Ok(RuntimePaths {
        env_file: root.join(".env"),
        logs_dir: root.join("logs"),
        config_file,
        root,
    })
}
