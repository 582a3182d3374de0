pub mod init;
mod schema;

pub use schema::{ColorMode, Config};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::dashboard::DEFAULT_UPCOMING_LIMIT;

/// Get the config directory path (~/.config/college-ready/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("college-ready"))
}

/// Get the default config file path (~/.config/college-ready/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Expand a leading `~/` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/college-ready/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing file at the default path is not an error; defaults apply.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => expand_home(&p),
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let mut config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;
    config.source_dir = config_path.parent().map(Path::to_path_buf);

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Validate configuration values at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.upcoming_limit == Some(0) {
        errors.push("upcoming_limit: must be at least 1".to_string());
    }

    if let Some(ref snapshot) = config.snapshot {
        if snapshot.as_os_str().is_empty() {
            errors.push("snapshot: path must not be empty".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl Config {
    /// Snapshot path. A configured relative path and the unconfigured
    /// default both sit in the config file's directory. Without a config file
    /// the default location is used.
    pub fn snapshot_path(&self) -> Result<PathBuf> {
        match (&self.snapshot, &self.source_dir) {
            (Some(p), Some(dir)) if p.is_relative() && !p.starts_with("~") => Ok(dir.join(p)),
            (Some(p), _) => Ok(expand_home(p)),
            (None, Some(dir)) => Ok(dir.join("snapshot.yaml")),
            (None, None) => crate::student::get_snapshot_path(),
        }
    }

    pub fn upcoming_limit(&self) -> usize {
        self.upcoming_limit.unwrap_or(DEFAULT_UPCOMING_LIMIT)
    }
}
