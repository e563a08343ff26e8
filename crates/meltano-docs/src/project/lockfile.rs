//! Locked Hub definitions (`plugins/<type>/<name>--<variant>.lock`).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::ProjectError;
use super::manifest::PluginType;
use crate::model::{Capability, Setting};

const LOCK_DIR: &str = "plugins";
const LOCK_EXTENSION: &str = "lock";

/// A plugin variant definition pinned from Meltano Hub.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginDefinition {
    pub name: String,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
    #[serde(default)]
    pub settings: Vec<Setting>,
}

/// Path of the lock file for a plugin variant.
pub(crate) fn lock_path(
    project_root: &Path,
    plugin_type: PluginType,
    name: &str,
    variant: Option<&str>,
) -> PathBuf {
    let stem = match variant {
        Some(variant) => format!("{name}--{variant}"),
        None => name.to_string(),
    };
    project_root
        .join(LOCK_DIR)
        .join(plugin_type.as_str())
        .join(format!("{stem}.{LOCK_EXTENSION}"))
}

/// Load a locked definition if one exists.
pub(crate) fn load_locked_definition(
    project_root: &Path,
    plugin_type: PluginType,
    name: &str,
    variant: Option<&str>,
) -> Result<Option<PluginDefinition>, ProjectError> {
    let path = lock_path(project_root, plugin_type, name, variant);
    if !path.is_file() {
        tracing::trace!(?path, "No lock file for plugin");
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ProjectError::Io {
        path: path.clone(),
        source: e,
    })?;
    let definition: PluginDefinition =
        serde_json::from_str(&contents).map_err(|e| ProjectError::Json {
            path: path.clone(),
            source: e,
        })?;
    tracing::debug!(?path, name = %definition.name, "Loaded locked plugin definition");
    Ok(Some(definition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_lock_path_with_variant() {
        let path = lock_path(
            Path::new("/p"),
            PluginType::Extractors,
            "tap-gitlab",
            Some("meltanolabs"),
        );
        assert_eq!(
            path,
            PathBuf::from("/p/plugins/extractors/tap-gitlab--meltanolabs.lock")
        );
    }

    #[test]
    fn test_lock_path_without_variant() {
        let path = lock_path(Path::new("/p"), PluginType::Loaders, "target-csv", None);
        assert_eq!(path, PathBuf::from("/p/plugins/loaders/target-csv.lock"));
    }

    #[test]
    fn test_load_missing_lock_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded =
            load_locked_definition(dir.path(), PluginType::Extractors, "tap-foo", Some("x"))
                .unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_lock_file() {
        let dir = tempfile::tempdir().unwrap();
        let lock_dir = dir.path().join("plugins/extractors");
        fs::create_dir_all(&lock_dir).unwrap();
        fs::write(
            lock_dir.join("tap-gitlab--meltanolabs.lock"),
            r#"{
  "plugin_type": "extractors",
  "name": "tap-gitlab",
  "namespace": "tap_gitlab",
  "variant": "meltanolabs",
  "label": "GitLab",
  "docs": "https://hub.meltano.com/extractors/tap-gitlab--meltanolabs",
  "description": "Source code management",
  "capabilities": ["catalog", "discover", "state"],
  "settings": [{"name": "private_token", "kind": "password"}]
}"#,
        )
        .unwrap();

        let definition = load_locked_definition(
            dir.path(),
            PluginType::Extractors,
            "tap-gitlab",
            Some("meltanolabs"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(definition.label.as_deref(), Some("GitLab"));
        assert_eq!(definition.capabilities.len(), 3);
        assert!(definition.settings[0].is_redacted());
    }

    #[test]
    fn test_invalid_lock_file() {
        let dir = tempfile::tempdir().unwrap();
        let lock_dir = dir.path().join("plugins/extractors");
        fs::create_dir_all(&lock_dir).unwrap();
        fs::write(lock_dir.join("tap-foo.lock"), "{ not json").unwrap();

        let result = load_locked_definition(dir.path(), PluginType::Extractors, "tap-foo", None);
        assert!(matches!(result, Err(ProjectError::Json { .. })));
    }
}
