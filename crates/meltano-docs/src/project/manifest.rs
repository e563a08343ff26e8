//! `meltano.yml` parsing.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::model::{Capability, Setting};

pub(crate) const MANIFEST_FILENAME: &str = "meltano.yml";

/// Plugin categories a project can declare under `plugins:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginType {
    Extractors,
    Loaders,
    Transformers,
    Orchestrators,
    Utilities,
    Mappers,
    Files,
}

impl PluginType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extractors => "extractors",
            Self::Loaders => "loaders",
            Self::Transformers => "transformers",
            Self::Orchestrators => "orchestrators",
            Self::Utilities => "utilities",
            Self::Mappers => "mappers",
            Self::Files => "files",
        }
    }
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level project manifest.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectManifest {
    #[serde(default)]
    pub version: Option<u32>,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub default_environment: Option<String>,

    #[serde(default)]
    pub plugins: PluginsBlock<PluginDecl>,

    #[serde(default)]
    pub environments: Vec<EnvironmentDecl>,
}

/// Plugin lists keyed by plugin type. Unknown plugin types are rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsBlock<T> {
    #[serde(default = "Vec::new")]
    pub extractors: Vec<T>,
    #[serde(default = "Vec::new")]
    pub loaders: Vec<T>,
    #[serde(default = "Vec::new")]
    pub transformers: Vec<T>,
    #[serde(default = "Vec::new")]
    pub orchestrators: Vec<T>,
    #[serde(default = "Vec::new")]
    pub utilities: Vec<T>,
    #[serde(default = "Vec::new")]
    pub mappers: Vec<T>,
    #[serde(default = "Vec::new")]
    pub files: Vec<T>,
}

impl<T> Default for PluginsBlock<T> {
    fn default() -> Self {
        Self {
            extractors: Vec::new(),
            loaders: Vec::new(),
            transformers: Vec::new(),
            orchestrators: Vec::new(),
            utilities: Vec::new(),
            mappers: Vec::new(),
            files: Vec::new(),
        }
    }
}

impl<T> PluginsBlock<T> {
    pub fn of_type(&self, plugin_type: PluginType) -> &[T] {
        match plugin_type {
            PluginType::Extractors => &self.extractors,
            PluginType::Loaders => &self.loaders,
            PluginType::Transformers => &self.transformers,
            PluginType::Orchestrators => &self.orchestrators,
            PluginType::Utilities => &self.utilities,
            PluginType::Mappers => &self.mappers,
            PluginType::Files => &self.files,
        }
    }
}

/// A plugin as declared in `meltano.yml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginDecl {
    pub name: String,
    #[serde(default)]
    pub inherit_from: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub pip_url: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capabilities: Option<Vec<Capability>>,
    #[serde(default)]
    pub settings: Vec<Setting>,
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// A named deployment environment.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentDecl {
    pub name: String,
    #[serde(default)]
    pub config: EnvironmentConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub plugins: PluginsBlock<EnvironmentPluginConfig>,
}

/// Per-environment config overlay for one plugin.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentPluginConfig {
    pub name: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl EnvironmentDecl {
    /// The config overlay this environment declares for a plugin, if any.
    pub fn plugin_config(&self, plugin_type: PluginType, name: &str) -> Option<&Map<String, Value>> {
        self.config
            .plugins
            .of_type(plugin_type)
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.config)
    }
}
