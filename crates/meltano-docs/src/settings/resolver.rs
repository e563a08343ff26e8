//! Per-environment setting snapshots for documentation.

use crate::model::{EnvironmentSettingValues, SettingSource, SettingValue, BASE_ENVIRONMENT};
use crate::project::{ProjectError, ProjectPlugin};

use super::service::{ResolvedSetting, SettingsService};

/// Sources shown in the base snapshot: values in effect without any
/// environment overlay.
const BASE_SOURCES: [SettingSource; 4] = [
    SettingSource::Default,
    SettingSource::MeltanoYml,
    SettingSource::Inherited,
    SettingSource::Dotenv,
];

/// Sources shown for a named environment: only what that environment contributes.
const ENVIRONMENT_SOURCES: [SettingSource; 1] = [SettingSource::MeltanoEnvironment];

/// Produces the [`EnvironmentSettingValues`] of a plugin for one environment.
#[derive(Debug)]
pub struct EnvironmentResolver<'s, 'p> {
    service: &'s SettingsService<'p>,
}

impl<'s, 'p> EnvironmentResolver<'s, 'p> {
    pub fn new(service: &'s SettingsService<'p>) -> Self {
        Self { service }
    }

    /// Resolve `plugin` under `environment` (`"base"` for no overlay).
    ///
    /// The base snapshot keeps default, `meltano.yml`, inherited and `.env`
    /// values; a named environment keeps only the values its own config block
    /// supplies, so each environment section shows its diff against base.
    pub fn environment_setting_values(
        &self,
        plugin: &ProjectPlugin,
        environment: &str,
    ) -> Result<EnvironmentSettingValues, ProjectError> {
        let (env, retained) = if environment == BASE_ENVIRONMENT {
            (None, &BASE_SOURCES[..])
        } else {
            (
                Some(self.service.project().environment(environment)?),
                &ENVIRONMENT_SOURCES[..],
            )
        };

        let setting_values: Vec<SettingValue> = self
            .service
            .config_with_metadata(plugin, env, true)
            .into_iter()
            .filter(|resolved| retained.contains(&resolved.source))
            .map(setting_value)
            .collect();

        tracing::debug!(
            plugin = plugin.name(),
            environment,
            retained = setting_values.len(),
            "Resolved environment setting values"
        );

        Ok(EnvironmentSettingValues {
            environment: environment.to_string(),
            setting_values,
        })
    }
}

fn setting_value(resolved: ResolvedSetting) -> SettingValue {
    SettingValue {
        is_redacted: resolved.setting.is_redacted(),
        name: resolved.name,
        source: resolved.source,
        value: resolved.value,
    }
}
