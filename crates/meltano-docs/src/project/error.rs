//! Errors raised while loading a project or resolving its plugins and settings.

use std::path::PathBuf;

use super::manifest::PluginType;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Dotenv {
        path: PathBuf,
        source: dotenvy::Error,
    },

    #[error("{plugin_type} plugin '{name}' is not defined in the project")]
    PluginNotFound {
        plugin_type: PluginType,
        name: String,
    },

    #[error("environment '{0}' is not defined in the project")]
    EnvironmentNotFound(String),

    #[error("environment '{0}' is defined more than once")]
    DuplicateEnvironment(String),

    #[error("{plugin_type} plugin '{name}' inherits from itself through: {chain}")]
    InheritanceCycle {
        plugin_type: PluginType,
        name: String,
        chain: String,
    },
}
