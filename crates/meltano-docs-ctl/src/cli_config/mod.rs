//! CLI configuration for project locations and rendering defaults.
//!
//! Values here fill in whatever the command line and `MELTANO_DOCS_*`
//! environment variables leave unset.

pub(crate) mod loader;

pub(crate) use loader::{expand_path, load_cli_config};

use serde::Deserialize;

/// Contents of `.meltano-docs.toml`.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct CliConfig {
    /// Meltano project directory. Default: "meltano".
    pub project_root: Option<String>,

    /// Output directory, relative to `source-dir`. Default: "meltano".
    pub docs_root: Option<String>,

    /// Documentation source directory. Default: ".".
    pub source_dir: Option<String>,

    /// Directory of template overrides.
    pub template_dir: Option<String>,

    /// Include resolved setting values per environment. Default: false.
    pub include_setting_values: Option<bool>,
}
