//! Meltano project loading.
//!
//! A project is a directory containing `meltano.yml`, an optional `.env` file,
//! and optional lock files under `plugins/<type>/`. This module is the
//! read-only view of that directory the rest of the crate works from:
//!
//! ```text
//! meltano.yml  ─┐
//! .env          ├─→ Project ─→ ProjectPlugins (enumerate, inherit, find parent)
//! plugins/*.lock┘           └→ SettingsService (layered values)
//! ```

mod error;
mod lockfile;
mod manifest;
mod plugins;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

pub use error::ProjectError;
pub use lockfile::PluginDefinition;
pub use manifest::{
    EnvironmentConfig, EnvironmentDecl, EnvironmentPluginConfig, PluginDecl, PluginType,
    PluginsBlock, ProjectManifest,
};
pub use plugins::{DefinitionSource, ParentDefinition, PluginParent, ProjectPlugin, ProjectPlugins};

use manifest::MANIFEST_FILENAME;

const DOTENV_FILENAME: &str = ".env";

/// A loaded Meltano project.
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    manifest: ProjectManifest,
    dotenv: HashMap<String, String>,
}

impl Project {
    /// Load the project rooted at `root`.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();
        let manifest_path = root.join(MANIFEST_FILENAME);
        let contents = std::fs::read_to_string(&manifest_path).map_err(|e| ProjectError::Io {
            path: manifest_path.clone(),
            source: e,
        })?;
        let manifest: ProjectManifest =
            serde_yaml::from_str(&contents).map_err(|e| ProjectError::Yaml {
                path: manifest_path.clone(),
                source: e,
            })?;

        let mut seen = HashSet::new();
        for env in &manifest.environments {
            if !seen.insert(env.name.as_str()) {
                return Err(ProjectError::DuplicateEnvironment(env.name.clone()));
            }
        }

        let dotenv = load_dotenv(&root.join(DOTENV_FILENAME))?;

        tracing::debug!(
            root = %root.display(),
            extractors = manifest.plugins.extractors.len(),
            environments = manifest.environments.len(),
            dotenv_vars = dotenv.len(),
            "Loaded Meltano project"
        );

        Ok(Self {
            root,
            manifest,
            dotenv,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &ProjectManifest {
        &self.manifest
    }

    /// Declared environments, in declaration order.
    pub fn environments(&self) -> &[EnvironmentDecl] {
        &self.manifest.environments
    }

    /// Look up a declared environment by name.
    pub fn environment(&self, name: &str) -> Result<&EnvironmentDecl, ProjectError> {
        self.manifest
            .environments
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| ProjectError::EnvironmentNotFound(name.to_string()))
    }

    /// Variables from the project's `.env` file.
    pub fn dotenv(&self) -> &HashMap<String, String> {
        &self.dotenv
    }
}

fn load_dotenv(path: &Path) -> Result<HashMap<String, String>, ProjectError> {
    if !path.is_file() {
        return Ok(HashMap::new());
    }
    let to_error = |e| ProjectError::Dotenv {
        path: path.to_path_buf(),
        source: e,
    };
    dotenvy::from_path_iter(path)
        .map_err(to_error)?
        .map(|item| item.map_err(to_error))
        .collect()
}
