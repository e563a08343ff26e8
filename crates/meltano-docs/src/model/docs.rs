//! Document model handed to the template renderer and serialized to
//! `extract/<name>-<variant>.json`.

use std::fmt;

use comfy_table::presets::ASCII_FULL;
use comfy_table::{Table, TableComponent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Capability, Setting};

/// Environment name used for resolution without any environment overlay.
pub const BASE_ENVIRONMENT: &str = "base";

const LOCK_ICON: &str = ":octicon:`lock`";

/// A documented value with optional provenance tooltip.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DocsField {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub tooltip: Option<String>,
}

/// The configuration layer that supplied a resolved setting's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingSource {
    ConfigOverride,
    Env,
    Dotenv,
    MeltanoEnvironment,
    MeltanoYml,
    Db,
    Inherited,
    Default,
    Auto,
}

impl SettingSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConfigOverride => "config_override",
            Self::Env => "env",
            Self::Dotenv => "dotenv",
            Self::MeltanoEnvironment => "meltano_environment",
            Self::MeltanoYml => "meltano_yml",
            Self::Db => "db",
            Self::Inherited => "inherited",
            Self::Default => "default",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value in effect for one setting under one environment.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SettingValue {
    pub name: String,
    pub is_redacted: bool,
    pub source: SettingSource,
    #[serde(default)]
    pub value: Value,
}

/// Resolved setting values for one environment (`base` for none).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EnvironmentSettingValues {
    pub setting_values: Vec<SettingValue>,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_environment() -> String {
    BASE_ENVIRONMENT.to_string()
}

impl EnvironmentSettingValues {
    pub fn is_base(&self) -> bool {
        self.environment == BASE_ENVIRONMENT
    }

    /// Render the values as an RST grid table.
    pub fn as_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(ASCII_FULL)
            // grid tables need `+` wherever a separator meets a column line
            .set_style(TableComponent::MiddleHeaderIntersections, '+')
            .set_style(TableComponent::LeftBorderIntersections, '+')
            .set_style(TableComponent::RightBorderIntersections, '+')
            .set_header(vec![LOCK_ICON, "Setting", "Value", "Source"]);

        for sv in &self.setting_values {
            table.add_row(vec![
                if sv.is_redacted { LOCK_ICON.to_string() } else { String::new() },
                format!("``{}``", sv.name),
                display_value(&sv.value),
                sv.source.to_string(),
            ]);
        }
        table.to_string()
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.replace('\n', " "),
        other => other.to_string(),
    }
}

/// Extractor details, used when rendering docs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExtractorDocs {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub description: Option<DocsField>,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
    #[serde(default)]
    pub settings: Vec<Setting>,
    #[serde(default)]
    pub environment_setting_values: Vec<EnvironmentSettingValues>,
}
