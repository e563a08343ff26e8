//! Project inspection: extractor listing and resolved settings.

use meltano_docs::model::BASE_ENVIRONMENT;
use meltano_docs::project::{PluginType, Project, ProjectPlugins};
use meltano_docs::settings::{EnvironmentResolver, SettingsService};
use meltano_docs::BuilderOptions;

use crate::output;

pub(crate) fn handle_plugins_command(options: &BuilderOptions) -> anyhow::Result<()> {
    let project = Project::load(&options.project_root)?;
    let plugins = ProjectPlugins::new(&project);
    let extractors = plugins.get_plugins_of_type(PluginType::Extractors, true)?;

    if extractors.is_empty() {
        output::warning("No extractors declared in the project.");
        return Ok(());
    }

    output::header("Extractors:");
    output::blank();
    for plugin in &extractors {
        output::item(format!(
            "{} [{}]",
            plugin.name(),
            plugin.variant().unwrap_or("default")
        ));
        match plugins.find_parent(plugin)? {
            Some(parent) => output::dim(format!("    based on {} ({})", parent.name, parent.source)),
            None => output::dim("    custom plugin"),
        }
        if let Some(description) = plugin.effective_description() {
            output::dim(format!("    {}", first_line(description)));
        }
    }
    output::blank();
    Ok(())
}

pub(crate) fn handle_settings_command(
    options: &BuilderOptions,
    plugin_name: &str,
    environment: Option<&str>,
) -> anyhow::Result<()> {
    let project = Project::load(&options.project_root)?;
    let plugin = ProjectPlugins::new(&project).find_plugin(PluginType::Extractors, plugin_name)?;
    let service = SettingsService::new(&project).with_process_env(super::process_env());
    let resolver = EnvironmentResolver::new(&service);

    let environments: Vec<&str> = match environment {
        Some(name) => vec![name],
        None => std::iter::once(BASE_ENVIRONMENT)
            .chain(project.environments().iter().map(|e| e.name.as_str()))
            .collect(),
    };

    output::label("Extractor", plugin.name());
    for name in environments {
        let values = resolver.environment_setting_values(&plugin, name)?;
        output::blank();
        output::header(&values.environment);
        if values.setting_values.is_empty() {
            output::dim("  (no values from this environment)");
        } else {
            output::plain(values.as_table());
        }
    }
    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default().trim()
}
