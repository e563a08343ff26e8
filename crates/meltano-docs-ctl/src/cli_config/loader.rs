//! `.meltano-docs.toml` discovery.
//!
//! The first existing file wins:
//! 1. `./.meltano-docs.toml`
//! 2. `~/.config/meltano-docs.toml`
//!
//! An unreadable or malformed file is logged and ignored.

use std::path::{Path, PathBuf};

use super::CliConfig;

const CONFIG_FILENAME: &str = ".meltano-docs.toml";
const GLOBAL_CONFIG_DIR: &str = ".config";
const GLOBAL_CONFIG_FILENAME: &str = "meltano-docs.toml";

#[derive(Debug, thiserror::Error)]
enum ConfigFileError {
    #[error("failed to read: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse: {0}")]
    Parse(#[from] toml::de::Error),
}

pub(crate) fn load_cli_config() -> CliConfig {
    let Some(path) = config_candidates().into_iter().find(|p| p.is_file()) else {
        return CliConfig::default();
    };
    read_config(&path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Ignoring CLI config");
        CliConfig::default()
    })
}

fn read_config(path: &Path) -> Result<CliConfig, ConfigFileError> {
    let config = toml::from_str(&std::fs::read_to_string(path)?)?;
    tracing::debug!(path = %path.display(), "Loaded CLI config");
    Ok(config)
}

fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILENAME)];
    candidates.extend(
        home_dir().map(|home| home.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILENAME)),
    );
    candidates
}

/// `~/rest` becomes `$HOME/rest`; anything else is taken as is.
pub(crate) fn expand_path(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}
