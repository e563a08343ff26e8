//! meltano-docs-ctl: reference documentation for Meltano projects.
//!
//! Generates an RST documentation tree from a Meltano project, expands
//! `.. meltano-extractor::` directives in standalone documents, and inspects
//! plugins and their resolved settings.

mod cli_config;
mod commands;
mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use meltano_docs::BuilderOptions;
use tracing_subscriber::EnvFilter;

use cli_config::{expand_path, CliConfig};

#[derive(Debug, Parser)]
#[command(
    name = "meltano-docs-ctl",
    version,
    about = "Generate reference documentation for Meltano project plugins",
    styles = output::clap_styles()
)]
struct Cli {
    #[command(flatten)]
    project: ProjectArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Project and output locations, shared by every command.
#[derive(Debug, Args)]
pub(crate) struct ProjectArgs {
    /// Meltano project directory
    #[arg(long, global = true, env = "MELTANO_DOCS_PROJECT_ROOT")]
    project_root: Option<PathBuf>,

    /// Output directory, relative to the source directory
    #[arg(long, global = true, env = "MELTANO_DOCS_DOCS_ROOT")]
    docs_root: Option<PathBuf>,

    /// Documentation source directory
    #[arg(long, global = true, env = "MELTANO_DOCS_SOURCE_DIR")]
    source_dir: Option<PathBuf>,

    /// Directory searched for templates before the built-in ones
    #[arg(long, global = true, env = "MELTANO_DOCS_TEMPLATE_DIR")]
    template_dir: Option<PathBuf>,

    /// Include resolved setting values for each environment
    #[arg(long, global = true, env = "MELTANO_DOCS_INCLUDE_SETTING_VALUES")]
    include_setting_values: bool,
}

impl ProjectArgs {
    /// Merge flags over the config file over built-in defaults.
    pub(crate) fn into_options(self, config: &CliConfig) -> BuilderOptions {
        let defaults = BuilderOptions::default();
        let pick = |flag: Option<PathBuf>, configured: &Option<String>, default: PathBuf| {
            flag.or_else(|| configured.as_deref().map(expand_path))
                .unwrap_or(default)
        };
        BuilderOptions {
            project_root: pick(self.project_root, &config.project_root, defaults.project_root),
            docs_root: pick(self.docs_root, &config.docs_root, defaults.docs_root),
            source_dir: pick(self.source_dir, &config.source_dir, defaults.source_dir),
            template_dir: self
                .template_dir
                .or_else(|| config.template_dir.as_deref().map(expand_path)),
            include_setting_values: self.include_setting_values
                || config.include_setting_values.unwrap_or(false),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Regenerate the documentation tree under the docs root
    Render {
        /// Expand directives in the generated pages
        #[arg(long)]
        expand: bool,
    },
    /// Expand `.. meltano-extractor::` directives in a document
    Expand {
        /// RST document to expand
        input: PathBuf,
        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the project's extractors
    Plugins,
    /// Show an extractor's resolved setting values
    Settings {
        /// Extractor name
        plugin: String,
        /// Only this environment ("base" for no environment)
        #[arg(short, long)]
        environment: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("meltano_docs=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli_config::load_cli_config();
    let options = cli.project.into_options(&config);

    let result = match cli.command {
        Commands::Render { expand } => commands::handle_render_command(options, expand),
        Commands::Expand { input, output } => {
            commands::handle_expand_command(&options, &input, output.as_deref())
        }
        Commands::Plugins => commands::handle_plugins_command(&options),
        Commands::Settings {
            plugin,
            environment,
        } => commands::handle_settings_command(&options, &plugin, environment.as_deref()),
    };

    if let Err(e) = result {
        output::error(format!("{e:#}"));
        std::process::exit(1);
    }
    Ok(())
}
