//! Project plugin resolution: enumeration by type, inheritance, and parent lookup.

use std::fmt;

use serde_json::{Map, Value};

use super::error::ProjectError;
use super::lockfile::{load_locked_definition, PluginDefinition};
use super::manifest::{PluginDecl, PluginType};
use super::Project;
use crate::model::{Capability, Setting};

/// Where a parent plugin definition comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionSource {
    /// The Hub definition pinned in the project's lock files.
    Hub,
    /// Another plugin of the same project named by `inherit_from`.
    Inherited,
}

impl fmt::Display for DefinitionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hub => f.write_str("Meltano Hub"),
            Self::Inherited => f.write_str("inherited plugin"),
        }
    }
}

/// The resolved base of a project plugin.
#[derive(Debug, Clone)]
pub enum PluginParent {
    Project(Box<ProjectPlugin>),
    Locked(PluginDefinition),
}

/// A parent definition as seen by documentation: where it came from and what
/// it says about the plugin.
#[derive(Debug, Clone)]
pub struct ParentDefinition {
    pub source: DefinitionSource,
    pub name: String,
    pub variant: Option<String>,
    pub description: Option<String>,
}

/// A plugin declared in the project, with its parent chain resolved.
#[derive(Debug, Clone)]
pub struct ProjectPlugin {
    plugin_type: PluginType,
    decl: PluginDecl,
    parent: Option<PluginParent>,
}

impl ProjectPlugin {
    pub fn plugin_type(&self) -> PluginType {
        self.plugin_type
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }

    pub fn inherit_from(&self) -> Option<&str> {
        self.decl.inherit_from.as_deref()
    }

    pub fn parent(&self) -> Option<&PluginParent> {
        self.parent.as_ref()
    }

    /// The description declared on this plugin itself (never inherited).
    pub fn description(&self) -> Option<&str> {
        self.decl.description.as_deref().filter(|d| !d.is_empty())
    }

    /// Own description, falling back through the parent chain.
    pub fn effective_description(&self) -> Option<&str> {
        self.description().or_else(|| match &self.parent {
            Some(PluginParent::Project(parent)) => parent.effective_description(),
            Some(PluginParent::Locked(def)) => def.description.as_deref(),
            None => None,
        })
    }

    pub fn variant(&self) -> Option<&str> {
        self.decl.variant.as_deref().or_else(|| match &self.parent {
            Some(PluginParent::Project(parent)) => parent.variant(),
            Some(PluginParent::Locked(def)) => def.variant.as_deref(),
            None => None,
        })
    }

    pub fn label(&self) -> Option<&str> {
        self.decl.label.as_deref().or_else(|| match &self.parent {
            Some(PluginParent::Project(parent)) => parent.label(),
            Some(PluginParent::Locked(def)) => def.label.as_deref(),
            None => None,
        })
    }

    pub fn capabilities(&self) -> Vec<Capability> {
        if let Some(own) = &self.decl.capabilities {
            return own.clone();
        }
        match &self.parent {
            Some(PluginParent::Project(parent)) => parent.capabilities(),
            Some(PluginParent::Locked(def)) => def.capabilities.clone(),
            None => Vec::new(),
        }
    }

    /// Parent settings, overridden or extended by settings declared on this plugin.
    pub fn all_settings(&self) -> Vec<Setting> {
        let mut settings = match &self.parent {
            Some(PluginParent::Project(parent)) => parent.all_settings(),
            Some(PluginParent::Locked(def)) => def.settings.clone(),
            None => Vec::new(),
        };
        for own in &self.decl.settings {
            match settings.iter_mut().find(|s| s.name == own.name) {
                Some(existing) => *existing = own.clone(),
                None => settings.push(own.clone()),
            }
        }
        settings
    }

    /// The `config:` block declared in `meltano.yml`.
    pub fn config(&self) -> &Map<String, Value> {
        &self.decl.config
    }

    /// Project plugins this one inherits from, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &ProjectPlugin> {
        std::iter::successors(self.project_parent(), |p| p.project_parent())
    }

    fn project_parent(&self) -> Option<&ProjectPlugin> {
        match &self.parent {
            Some(PluginParent::Project(parent)) => Some(parent),
            _ => None,
        }
    }
}

/// Lookup service over the plugins declared in a project.
#[derive(Debug, Clone, Copy)]
pub struct ProjectPlugins<'a> {
    project: &'a Project,
}

impl<'a> ProjectPlugins<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self { project }
    }

    /// All plugins of a type, in declaration order.
    ///
    /// With `ensure_parent`, each plugin's parent chain is resolved so that
    /// settings, capabilities and labels fall back to the parent definition.
    pub fn get_plugins_of_type(
        &self,
        plugin_type: PluginType,
        ensure_parent: bool,
    ) -> Result<Vec<ProjectPlugin>, ProjectError> {
        self.project
            .manifest()
            .plugins
            .of_type(plugin_type)
            .iter()
            .map(|decl| {
                if ensure_parent {
                    self.resolve(plugin_type, decl, &mut Vec::new())
                } else {
                    Ok(ProjectPlugin {
                        plugin_type,
                        decl: decl.clone(),
                        parent: None,
                    })
                }
            })
            .collect()
    }

    /// Find one plugin by name, with its parent chain resolved.
    pub fn find_plugin(
        &self,
        plugin_type: PluginType,
        name: &str,
    ) -> Result<ProjectPlugin, ProjectError> {
        let decl = self.find_decl(plugin_type, name)?;
        self.resolve(plugin_type, decl, &mut Vec::new())
    }

    /// Find the definition a plugin is based on.
    ///
    /// A plugin with `inherit_from` is based on that project plugin, whose
    /// description falls back through its own chain. Any other plugin is based
    /// on its pinned Hub definition. Returns `None` for custom plugins without
    /// a lock file.
    pub fn find_parent(
        &self,
        plugin: &ProjectPlugin,
    ) -> Result<Option<ParentDefinition>, ProjectError> {
        let Some(parent_name) = plugin.inherit_from() else {
            return self.hub_definition(plugin);
        };

        let resolved;
        let parent = match plugin.project_parent() {
            Some(parent) => parent,
            None => {
                resolved = self.find_plugin(plugin.plugin_type(), parent_name)?;
                &resolved
            }
        };
        Ok(Some(ParentDefinition {
            source: DefinitionSource::Inherited,
            name: parent.name().to_string(),
            variant: parent.variant().map(str::to_string),
            description: parent.effective_description().map(str::to_string),
        }))
    }

    fn hub_definition(&self, plugin: &ProjectPlugin) -> Result<Option<ParentDefinition>, ProjectError> {
        let definition = match plugin.parent() {
            Some(PluginParent::Locked(def)) => Some(def.clone()),
            _ => load_locked_definition(
                self.project.root(),
                plugin.plugin_type(),
                plugin.name(),
                plugin.decl.variant.as_deref(),
            )?,
        };
        Ok(definition.map(|def| ParentDefinition {
            source: DefinitionSource::Hub,
            name: def.name,
            variant: def.variant,
            description: def.description,
        }))
    }

    fn find_decl(&self, plugin_type: PluginType, name: &str) -> Result<&'a PluginDecl, ProjectError> {
        self.project
            .manifest()
            .plugins
            .of_type(plugin_type)
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| ProjectError::PluginNotFound {
                plugin_type,
                name: name.to_string(),
            })
    }

    fn resolve(
        &self,
        plugin_type: PluginType,
        decl: &PluginDecl,
        chain: &mut Vec<String>,
    ) -> Result<ProjectPlugin, ProjectError> {
        if chain.contains(&decl.name) {
            chain.push(decl.name.clone());
            return Err(ProjectError::InheritanceCycle {
                plugin_type,
                name: chain[0].clone(),
                chain: chain.join(" -> "),
            });
        }
        chain.push(decl.name.clone());

        let parent = match &decl.inherit_from {
            Some(parent_name) => {
                let parent_decl = self.find_decl(plugin_type, parent_name)?;
                let parent = self.resolve(plugin_type, parent_decl, chain)?;
                Some(PluginParent::Project(Box::new(parent)))
            }
            None => load_locked_definition(
                self.project.root(),
                plugin_type,
                &decl.name,
                decl.variant.as_deref(),
            )?
            .map(PluginParent::Locked),
        };

        tracing::trace!(
            %plugin_type,
            name = %decl.name,
            has_parent = parent.is_some(),
            "Resolved plugin"
        );

        Ok(ProjectPlugin {
            plugin_type,
            decl: decl.clone(),
            parent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_project(dir: &Path, manifest: &str) {
        fs::write(dir.join("meltano.yml"), manifest).unwrap();
    }

    fn write_lock(dir: &Path, file: &str, contents: &str) {
        let lock_dir = dir.join("plugins/extractors");
        fs::create_dir_all(&lock_dir).unwrap();
        fs::write(lock_dir.join(file), contents).unwrap();
    }

    const INHERITING: &str = r#"
plugins:
  extractors:
    - name: tap-gitlab
      variant: meltanolabs
      config:
        projects: meltano/meltano
    - name: tap-gitlab-internal
      inherit_from: tap-gitlab
      settings:
        - name: internal_only
          kind: boolean
"#;

    const GITLAB_LOCK: &str = r#"{
  "name": "tap-gitlab",
  "variant": "meltanolabs",
  "label": "GitLab",
  "description": "Source code hosting",
  "capabilities": ["catalog", "discover"],
  "settings": [
    {"name": "projects", "kind": "string"},
    {"name": "private_token", "kind": "password"}
  ]
}"#;

    #[test]
    fn test_plugins_in_declaration_order() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), INHERITING);
        let project = Project::load(dir.path()).unwrap();

        let plugins = ProjectPlugins::new(&project)
            .get_plugins_of_type(PluginType::Extractors, false)
            .unwrap();
        let names: Vec<_> = plugins.iter().map(ProjectPlugin::name).collect();
        assert_eq!(names, vec!["tap-gitlab", "tap-gitlab-internal"]);
        assert!(plugins.iter().all(|p| p.parent().is_none()));
    }

    #[test]
    fn test_ensure_parent_resolves_lock_and_inheritance() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), INHERITING);
        write_lock(dir.path(), "tap-gitlab--meltanolabs.lock", GITLAB_LOCK);
        let project = Project::load(dir.path()).unwrap();

        let plugins = ProjectPlugins::new(&project)
            .get_plugins_of_type(PluginType::Extractors, true)
            .unwrap();

        let base = &plugins[0];
        assert!(matches!(base.parent(), Some(PluginParent::Locked(_))));
        assert_eq!(base.label(), Some("GitLab"));
        assert_eq!(base.all_settings().len(), 2);

        let child = &plugins[1];
        assert!(matches!(child.parent(), Some(PluginParent::Project(_))));
        assert_eq!(child.variant(), Some("meltanolabs"));
        assert_eq!(child.capabilities().len(), 2);
        let names: Vec<_> = child.all_settings().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["projects", "private_token", "internal_only"]);
        assert_eq!(child.ancestors().count(), 1);
        assert_eq!(child.effective_description(), Some("Source code hosting"));
        assert!(child.description().is_none());
    }

    #[test]
    fn test_missing_inherit_from_target() {
        let dir = tempfile::tempdir().unwrap();
        write_project(
            dir.path(),
            "plugins:\n  extractors:\n    - name: tap-a\n      inherit_from: tap-missing\n",
        );
        let project = Project::load(dir.path()).unwrap();
        let result =
            ProjectPlugins::new(&project).get_plugins_of_type(PluginType::Extractors, true);
        assert!(matches!(result, Err(ProjectError::PluginNotFound { .. })));
    }

    #[test]
    fn test_inheritance_cycle_detected() {
        let dir = tempfile::tempdir().unwrap();
        write_project(
            dir.path(),
            r#"
plugins:
  extractors:
    - name: tap-a
      inherit_from: tap-b
    - name: tap-b
      inherit_from: tap-a
"#,
        );
        let project = Project::load(dir.path()).unwrap();
        let err = ProjectPlugins::new(&project)
            .find_plugin(PluginType::Extractors, "tap-a")
            .unwrap_err();
        match err {
            ProjectError::InheritanceCycle { chain, .. } => {
                assert_eq!(chain, "tap-a -> tap-b -> tap-a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_find_parent_prefers_inherited_plugin() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), INHERITING);
        write_lock(dir.path(), "tap-gitlab--meltanolabs.lock", GITLAB_LOCK);
        let project = Project::load(dir.path()).unwrap();
        let plugins = ProjectPlugins::new(&project);

        let child = plugins
            .find_plugin(PluginType::Extractors, "tap-gitlab-internal")
            .unwrap();
        let parent = plugins.find_parent(&child).unwrap().unwrap();
        assert_eq!(parent.source, DefinitionSource::Inherited);
        assert_eq!(parent.name, "tap-gitlab");

        let base = plugins.find_plugin(PluginType::Extractors, "tap-gitlab").unwrap();
        let hub = plugins.find_parent(&base).unwrap().unwrap();
        assert_eq!(hub.source, DefinitionSource::Hub);
        assert_eq!(hub.description.as_deref(), Some("Source code hosting"));
    }

    #[test]
    fn test_find_parent_falls_back_without_lock() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), INHERITING);
        let project = Project::load(dir.path()).unwrap();
        let plugins = ProjectPlugins::new(&project);

        let child = plugins
            .find_plugin(PluginType::Extractors, "tap-gitlab-internal")
            .unwrap();
        let parent = plugins.find_parent(&child).unwrap().unwrap();
        assert_eq!(parent.source, DefinitionSource::Inherited);

        let base = plugins.find_plugin(PluginType::Extractors, "tap-gitlab").unwrap();
        assert!(plugins.find_parent(&base).unwrap().is_none());
    }
}
