//! Layered plugin configuration with provenance.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::env::{cast_env_value, setting_env_vars};
use crate::model::{Setting, SettingSource};
use crate::project::{EnvironmentDecl, Project, ProjectPlugin};

/// Placeholder written in place of secret values.
pub const REDACTED_VALUE: &str = "(redacted)";

/// One setting's effective value and the layer that supplied it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSetting {
    pub name: String,
    pub value: Value,
    pub source: SettingSource,
    pub setting: Setting,
}

/// Resolves plugin settings across configuration layers.
///
/// Layers are consulted in priority order and the first one holding a value
/// wins: overrides, process environment, `.env`, the selected environment's
/// config block, `meltano.yml`, inherited plugin config, schema default.
/// The environment is always an explicit argument; nothing here holds an
/// "active environment".
#[derive(Debug)]
pub struct SettingsService<'a> {
    project: &'a Project,
    process_env: HashMap<String, String>,
    overrides: HashMap<String, Map<String, Value>>,
}

impl<'a> SettingsService<'a> {
    /// A service with an empty process environment and no overrides.
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            process_env: HashMap::new(),
            overrides: HashMap::new(),
        }
    }

    pub fn project(&self) -> &'a Project {
        self.project
    }

    /// Use `vars` as the process environment layer.
    pub fn with_process_env(mut self, vars: HashMap<String, String>) -> Self {
        self.process_env = vars;
        self
    }

    /// Force a value for one plugin setting, above every other layer.
    pub fn with_override(mut self, plugin: &str, setting: &str, value: Value) -> Self {
        self.overrides
            .entry(plugin.to_string())
            .or_default()
            .insert(setting.to_string(), value);
        self
    }

    /// Resolve every setting of `plugin` under `environment` (`None` for base).
    ///
    /// Declared settings come first in schema order, followed by undeclared
    /// config keys. Keys starting with `_` are extras and are skipped. With
    /// `redacted`, non-null values of secret settings are masked.
    pub fn config_with_metadata(
        &self,
        plugin: &ProjectPlugin,
        environment: Option<&EnvironmentDecl>,
        redacted: bool,
    ) -> Vec<ResolvedSetting> {
        let overlay = environment.and_then(|env| env.plugin_config(plugin.plugin_type(), plugin.name()));
        let declared = plugin.all_settings();
        let custom = custom_settings(&declared, plugin.config(), overlay);

        declared
            .into_iter()
            .chain(custom)
            .map(|setting| {
                let (value, source) = self.resolve_setting(plugin, &setting, overlay);
                let value = if redacted && setting.is_redacted() && !value.is_null() {
                    Value::String(REDACTED_VALUE.to_string())
                } else {
                    value
                };
                ResolvedSetting {
                    name: setting.name.clone(),
                    value,
                    source,
                    setting,
                }
            })
            .collect()
    }

    fn resolve_setting(
        &self,
        plugin: &ProjectPlugin,
        setting: &Setting,
        overlay: Option<&Map<String, Value>>,
    ) -> (Value, SettingSource) {
        if let Some(value) = self
            .overrides
            .get(plugin.name())
            .and_then(|config| lookup(config, setting))
        {
            return (value.clone(), SettingSource::ConfigOverride);
        }

        let env_vars = setting_env_vars(plugin.name(), setting);
        if let Some(raw) = env_vars.iter().find_map(|var| self.process_env.get(var)) {
            return (cast_env_value(raw, setting.kind), SettingSource::Env);
        }
        if let Some(raw) = env_vars.iter().find_map(|var| self.project.dotenv().get(var)) {
            return (cast_env_value(raw, setting.kind), SettingSource::Dotenv);
        }

        if let Some(value) = overlay.and_then(|config| lookup(config, setting)) {
            return (value.clone(), SettingSource::MeltanoEnvironment);
        }
        if let Some(value) = lookup(plugin.config(), setting) {
            return (value.clone(), SettingSource::MeltanoYml);
        }
        if let Some(value) = plugin
            .ancestors()
            .find_map(|ancestor| lookup(ancestor.config(), setting))
        {
            return (value.clone(), SettingSource::Inherited);
        }

        (
            setting.value.clone().unwrap_or(Value::Null),
            SettingSource::Default,
        )
    }
}

/// Find a setting's value in a config block by name, alias, or dotted path.
fn lookup<'m>(config: &'m Map<String, Value>, setting: &Setting) -> Option<&'m Value> {
    setting
        .names()
        .find_map(|name| lookup_path(config, name))
        .filter(|value| !value.is_null())
}

fn lookup_path<'m>(config: &'m Map<String, Value>, name: &str) -> Option<&'m Value> {
    if let Some(value) = config.get(name) {
        return Some(value);
    }
    let (head, rest) = name.split_once('.')?;
    match config.get(head)? {
        Value::Object(nested) => lookup_path(nested, rest),
        _ => None,
    }
}

/// Config keys that match no declared setting, as ad-hoc settings.
///
/// Objects holding declared dotted settings are walked so that undeclared
/// siblings surface as their own dotted paths.
fn custom_settings(
    declared: &[Setting],
    config: &Map<String, Value>,
    overlay: Option<&Map<String, Value>>,
) -> Vec<Setting> {
    let names: Vec<&str> = declared.iter().flat_map(Setting::names).collect();
    let mut keys = Vec::new();
    collect_custom_keys(config, None, &names, &mut keys);
    if let Some(overlay) = overlay {
        collect_custom_keys(overlay, None, &names, &mut keys);
    }
    keys.into_iter().map(Setting::custom).collect()
}

fn collect_custom_keys(
    config: &Map<String, Value>,
    prefix: Option<&str>,
    declared: &[&str],
    keys: &mut Vec<String>,
) {
    for (key, value) in config {
        if key.starts_with('_') {
            continue;
        }
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        if declared.contains(&path.as_str()) {
            continue;
        }
        let holds_declared = declared.iter().any(|name| {
            name.strip_prefix(path.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
        });
        match value {
            Value::Object(nested) if holds_declared => {
                collect_custom_keys(nested, Some(&path), declared, keys);
            }
            _ if holds_declared => {}
            _ => {
                if !keys.contains(&path) {
                    keys.push(path);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{PluginType, ProjectPlugins};
    use serde_json::json;
    use std::fs;

    const MANIFEST: &str = r#"
plugins:
  extractors:
    - name: tap-foo
      variant: default
      settings:
        - name: account_id
          kind: string
          value: ""
        - name: api_key
          kind: password
        - name: page_size
          kind: integer
          value: 100
        - name: auth.username
        - name: start_date
          aliases: [startDate]
          kind: date_iso8601
      config:
        startDate: "2024-01-01"
        auth:
          username: ops
        _extra: ignored
        custom_flag: true
    - name: tap-foo-eu
      inherit_from: tap-foo
      config:
        page_size: 50
environments:
  - name: prod
    config:
      plugins:
        extractors:
          - name: tap-foo
            config:
              account_id: "123"
              region: eu-west-1
"#;

    fn project(dotenv: Option<&str>) -> (tempfile::TempDir, Project) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("meltano.yml"), MANIFEST).unwrap();
        if let Some(contents) = dotenv {
            fs::write(dir.path().join(".env"), contents).unwrap();
        }
        let project = Project::load(dir.path()).unwrap();
        (dir, project)
    }

    fn by_name<'r>(resolved: &'r [ResolvedSetting], name: &str) -> &'r ResolvedSetting {
        resolved.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn test_base_resolution_sources() {
        let (_dir, project) = project(None);
        let plugin = ProjectPlugins::new(&project)
            .find_plugin(PluginType::Extractors, "tap-foo")
            .unwrap();
        let resolved = SettingsService::new(&project).config_with_metadata(&plugin, None, true);

        let names: Vec<_> = resolved.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["account_id", "api_key", "page_size", "auth.username", "start_date", "custom_flag"]
        );

        let account = by_name(&resolved, "account_id");
        assert_eq!(account.source, SettingSource::Default);
        assert_eq!(account.value, json!(""));

        let api_key = by_name(&resolved, "api_key");
        assert_eq!(api_key.source, SettingSource::Default);
        assert_eq!(api_key.value, Value::Null);

        assert_eq!(by_name(&resolved, "auth.username").value, json!("ops"));
        let start = by_name(&resolved, "start_date");
        assert_eq!(start.source, SettingSource::MeltanoYml);
        assert_eq!(start.value, json!("2024-01-01"));
        assert_eq!(by_name(&resolved, "custom_flag").source, SettingSource::MeltanoYml);
    }

    #[test]
    fn test_undeclared_nested_keys_become_dotted_settings() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("meltano.yml"),
            r#"
plugins:
  extractors:
    - name: tap-foo
      settings:
        - name: auth.username
      config:
        auth:
          username: ops
          password: hunter2
          _hint: ignored
        options:
          retries: 3
"#,
        )
        .unwrap();
        let project = Project::load(dir.path()).unwrap();
        let plugin = ProjectPlugins::new(&project)
            .find_plugin(PluginType::Extractors, "tap-foo")
            .unwrap();
        let resolved = SettingsService::new(&project).config_with_metadata(&plugin, None, true);

        let names: Vec<_> = resolved.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["auth.username", "auth.password", "options"]);
        let password = by_name(&resolved, "auth.password");
        assert_eq!(password.source, SettingSource::MeltanoYml);
        assert_eq!(password.value, json!("hunter2"));
        assert_eq!(by_name(&resolved, "options").value, json!({ "retries": 3 }));
    }

    #[test]
    fn test_environment_overlay() {
        let (_dir, project) = project(None);
        let plugin = ProjectPlugins::new(&project)
            .find_plugin(PluginType::Extractors, "tap-foo")
            .unwrap();
        let prod = project.environment("prod").unwrap();
        let resolved =
            SettingsService::new(&project).config_with_metadata(&plugin, Some(prod), true);

        let account = by_name(&resolved, "account_id");
        assert_eq!(account.source, SettingSource::MeltanoEnvironment);
        assert_eq!(account.value, json!("123"));
        let region = by_name(&resolved, "region");
        assert_eq!(region.source, SettingSource::MeltanoEnvironment);
    }

    #[test]
    fn test_env_layers_and_redaction() {
        let (_dir, project) = project(Some("TAP_FOO_API_KEY=secret\nTAP_FOO_PAGE_SIZE=25\n"));
        let plugin = ProjectPlugins::new(&project)
            .find_plugin(PluginType::Extractors, "tap-foo")
            .unwrap();

        let mut process_env = HashMap::new();
        process_env.insert("TAP_FOO_PAGE_SIZE".to_string(), "10".to_string());
        let service = SettingsService::new(&project).with_process_env(process_env);

        let redacted = service.config_with_metadata(&plugin, None, true);
        let api_key = by_name(&redacted, "api_key");
        assert_eq!(api_key.source, SettingSource::Dotenv);
        assert_eq!(api_key.value, json!(REDACTED_VALUE));

        let page_size = by_name(&redacted, "page_size");
        assert_eq!(page_size.source, SettingSource::Env);
        assert_eq!(page_size.value, json!(10));

        let plain = service.config_with_metadata(&plugin, None, false);
        assert_eq!(by_name(&plain, "api_key").value, json!("secret"));
    }

    #[test]
    fn test_override_wins() {
        let (_dir, project) = project(None);
        let plugin = ProjectPlugins::new(&project)
            .find_plugin(PluginType::Extractors, "tap-foo")
            .unwrap();
        let prod = project.environment("prod").unwrap();
        let resolved = SettingsService::new(&project)
            .with_override("tap-foo", "account_id", json!("forced"))
            .config_with_metadata(&plugin, Some(prod), true);
        let account = by_name(&resolved, "account_id");
        assert_eq!(account.source, SettingSource::ConfigOverride);
        assert_eq!(account.value, json!("forced"));
    }

    #[test]
    fn test_inherited_values() {
        let (_dir, project) = project(None);
        let plugin = ProjectPlugins::new(&project)
            .find_plugin(PluginType::Extractors, "tap-foo-eu")
            .unwrap();
        let resolved = SettingsService::new(&project).config_with_metadata(&plugin, None, true);

        let page_size = by_name(&resolved, "page_size");
        assert_eq!(page_size.source, SettingSource::MeltanoYml);
        assert_eq!(page_size.value, json!(50));

        let start = by_name(&resolved, "start_date");
        assert_eq!(start.source, SettingSource::Inherited);
        assert_eq!(start.value, json!("2024-01-01"));
    }
}
