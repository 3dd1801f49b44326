//! Persisted session state for the CLI.
//!
//! A small JSON file at `~/.voluum-cli/config.json` holds the last
//! saved base URL and auth token metadata. The file is rewritten
//! wholesale on save (owner-only permissions), read at the start of
//! every invocation, and merged with environment variables and explicit
//! flags with precedence: flag > environment > file.

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use thiserror::Error;
use tracing::warn;
use voluum_types::SessionConfig;

pub const CONFIG_DIR_NAME: &str = ".voluum-cli";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Overrides the config file location; used by tests.
pub const CONFIG_PATH_ENV: &str = "VOLUUM_CONFIG_PATH";
pub const BASE_URL_ENV: &str = "VOLUUM_BASE_URL";
pub const TOKEN_ENV: &str = "VOLUUM_TOKEN";

/// Error surfaced when reading or writing the session config fails.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Trim a string-ish value; whitespace-only collapses to `None`.
pub fn clean_string(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|text| !text.is_empty()).map(str::to_string)
}

pub fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && let Some(path) = clean_string(Some(&path))
    {
        return PathBuf::from(path);
    }

    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

/// Load the persisted config. A missing file is an empty config, not an
/// error; unreadable or invalid JSON is surfaced.
pub fn load_config() -> Result<SessionConfig, SessionError> {
    let path = config_file_path();

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Ok(SessionConfig::default());
        }
        Err(error) => return Err(SessionError::Read { path, source: error }),
    };

    let parsed: SessionConfig = serde_json::from_str(&raw)
        .map_err(|error| SessionError::Parse { path, source: error })?;
    Ok(sanitize(parsed))
}

/// Overwrite the config file with the compacted (non-empty-only) view
/// of `config`. The directory is created `0700` and the file written
/// `0600` on unix.
pub fn save_config(config: &SessionConfig) -> Result<(), SessionError> {
    let path = config_file_path();
    let compacted = sanitize(config.clone());
    let payload = format!("{}\n", serde_json::to_string_pretty(&compacted)?);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|error| SessionError::Write { path: path.clone(), source: error })?;
        restrict_permissions(parent, 0o700);
    }

    write_private(&path, &payload)
        .map_err(|error| SessionError::Write { path: path.clone(), source: error })?;
    restrict_permissions(&path, 0o600);
    Ok(())
}

pub fn delete_config_file() -> Result<(), SessionError> {
    let path = config_file_path();
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(SessionError::Write { path, source: error }),
    }
}

/// Drop the persisted token fields. When nothing else remains the file
/// is deleted outright; environment-variable tokens are never touched.
pub fn clear_stored_token() -> Result<(), SessionError> {
    let mut config = load_config()?;
    config.token = None;
    config.token_created_at = None;
    config.token_expires_at = None;

    if config.is_empty() {
        delete_config_file()
    } else {
        save_config(&config)
    }
}

/// Base URL and token overrides taken from the environment.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EnvConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
}

pub fn env_config() -> EnvConfig {
    EnvConfig {
        base_url: clean_string(env::var(BASE_URL_ENV).ok().as_deref()),
        token: clean_string(env::var(TOKEN_ENV).ok().as_deref()),
    }
}

/// Explicit per-invocation overrides (the `--baseUrl`/`--token` flags).
#[derive(Debug, Default, Clone)]
pub struct RuntimeOverrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
}

/// The merged view a command operates on.
#[derive(Debug, Clone)]
pub struct ResolvedRuntimeConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    /// The raw file config, kept for login merging and whoami metadata.
    pub file_config: SessionConfig,
}

pub fn resolve_runtime_config(
    overrides: RuntimeOverrides,
) -> Result<ResolvedRuntimeConfig, SessionError> {
    let file_config = load_config()?;
    let env_config = env_config();

    Ok(ResolvedRuntimeConfig {
        base_url: clean_string(overrides.base_url.as_deref())
            .or(env_config.base_url)
            .or_else(|| file_config.base_url.clone()),
        token: clean_string(overrides.token.as_deref())
            .or(env_config.token)
            .or_else(|| file_config.token.clone()),
        file_config,
    })
}

fn sanitize(config: SessionConfig) -> SessionConfig {
    SessionConfig {
        base_url: clean_string(config.base_url.as_deref()),
        token: clean_string(config.token.as_deref()),
        token_created_at: clean_string(config.token_created_at.as_deref()),
        token_expires_at: clean_string(config.token_expires_at.as_deref()),
        last_login_email: clean_string(config.last_login_email.as_deref()),
    }
}

#[cfg(unix)]
fn write_private(path: &Path, payload: &str) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(payload.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, payload: &str) -> io::Result<()> {
    fs::write(path, payload)
}

/// Tighten permissions after the fact. Best effort only; some
/// filesystems ignore it.
fn restrict_permissions(path: &Path, mode: u32) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(error) = fs::set_permissions(path, fs::Permissions::from_mode(mode)) {
            warn!(path = %path.display(), %error, "failed to restrict config permissions");
        }
    }
    #[cfg(not(unix))]
    {
        let _ = (path, mode);
    }
}
