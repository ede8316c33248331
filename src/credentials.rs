//! Backend credential loading from the process environment and the runtime
//! `.env` file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

/// Runtime credentials loaded from the `.env` file.
#[derive(Clone, Default)]
pub struct Credentials {
    vars: BTreeMap<String, String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .field("values", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Build credentials from a key-value map.
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    /// Returns a credential value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

/// Backend API key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for the request header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ApiKey").field(&"[REDACTED]").finish()
    }
}

/// The backend API key could not be found anywhere.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing backend API key: set {env_var} in the environment or in {}", .env_file.display())]
pub struct MissingConfiguration {
    /// Environment variable that was consulted.
    pub env_var: String,
    /// `.env` file that was consulted.
    pub env_file: PathBuf,
}

/// Load credentials from a specific `.env` path.
///
/// # Errors
///
/// Returns an error if the file does not exist, permissions are too broad,
/// or parsing fails.
pub fn load_credentials(path: &Path) -> anyhow::Result<Credentials> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "credentials file does not exist: {}",
            path.display()
        ));
    }

    validate_private_permissions(path)?;

    let mut vars = BTreeMap::new();
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("failed to read credentials at {}", path.display()))?;

    for item in iter {
        let (key, value) = item.with_context(|| {
            format!(
                "failed to parse key-value entry in credentials file {}",
                path.display()
            )
        })?;
        vars.insert(key, value);
    }

    Ok(Credentials { vars })
}

/// Load credentials from `path` when it exists; an absent file yields empty
/// credentials.
///
/// # Errors
///
/// Returns an error if the file exists but is unreadable or too permissive.
pub fn load_optional_credentials(path: &Path) -> anyhow::Result<Credentials> {
    if !path.exists() {
        debug!(path = %path.display(), "no credentials file");
        return Ok(Credentials::default());
    }
    load_credentials(path)
}

/// Resolve the backend API key.
///
/// Resolution order:
/// 1. `env_var` from the process environment (via `env`)
/// 2. `env_var` from the loaded `.env` credentials
///
/// Blank values count as missing.
///
/// # Errors
///
/// Returns [`MissingConfiguration`] when neither source has a value.
pub fn resolve_api_key(
    env_var: &str,
    env: impl Fn(&str) -> Option<String>,
    file: &Credentials,
    env_file: &Path,
) -> Result<ApiKey, MissingConfiguration> {
    if let Some(key) = env(env_var).filter(|v| !v.trim().is_empty()) {
        debug!(source = "environment", env_var, "backend API key resolved");
        return Ok(ApiKey::new(key.trim()));
    }
    if let Some(key) = file.get(env_var).filter(|v| !v.trim().is_empty()) {
        debug!(source = "env_file", env_var, "backend API key resolved");
        return Ok(ApiKey::new(key.trim()));
    }
    Err(MissingConfiguration {
        env_var: env_var.to_owned(),
        env_file: env_file.to_path_buf(),
    })
}

#[cfg(unix)]
fn validate_private_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path)
        .with_context(|| format!("failed to inspect credentials file {}", path.display()))?;
    let mode = metadata.permissions().mode() & 0o777;

    if mode & 0o077 != 0 {
        return Err(anyhow::anyhow!(
            "credentials file {} must be 0600, found {:o}",
            path.display(),
            mode
        ));
    }

    Ok(())
}

#[cfg(not(unix))]
fn validate_private_permissions(_path: &Path) -> anyhow::Result<()> {
    Ok(())
}
