//! Documentation tree generation for a Meltano project.
//!
//! [`ProjectDocsBuilder::render`] regenerates the whole tree under the docs
//! root:
//!
//! ```text
//! <docs_root>/
//!   index.rst                      toctree -> plugins
//!   plugins.rst                    toctree -> extractors
//!   extractors.rst                 toctree -> extract/*
//!   extract/<name>-<variant>.json  ExtractorDocs
//!   extract/<name>-<variant>.rst   `.. meltano-extractor::` stub
//! ```

mod error;
mod options;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::Context;

pub use error::BuildError;
pub use options::BuilderOptions;

use options::normalize_path;

use crate::directive::{Diagnostic, DirectiveExpander};
use crate::model::{DocsField, EnvironmentSettingValues, ExtractorDocs, BASE_ENVIRONMENT};
use crate::project::{DefinitionSource, PluginType, Project, ProjectPlugin, ProjectPlugins};
use crate::settings::{EnvironmentResolver, SettingsService};
use crate::template_engine::{
    TemplateEngine, EXTRACTORS_TEMPLATE, EXTRACTOR_TEMPLATE, INDEX_TEMPLATE, PLUGINS_TEMPLATE,
};

const EXTRACT_DIR: &str = "extract";
const DEFAULT_VARIANT: &str = "default";

/// Renders documentation for the plugins of one project.
#[derive(Debug)]
pub struct ProjectDocsBuilder {
    options: BuilderOptions,
    docs_root: PathBuf,
    project: Project,
    engine: TemplateEngine,
    process_env: HashMap<String, String>,
}

impl ProjectDocsBuilder {
    /// Load the project and templates. Nothing is written until a render call.
    pub fn new(options: BuilderOptions) -> Result<Self, BuildError> {
        let project = Project::load(&options.project_root)?;
        let engine = TemplateEngine::new(options.template_dir.as_deref())?;
        let docs_root = options.normalized_docs_root();
        Ok(Self {
            options,
            docs_root,
            project,
            engine,
            process_env: HashMap::new(),
        })
    }

    /// Use `vars` as the process environment layer when resolving settings.
    pub fn with_process_env(mut self, vars: HashMap<String, String>) -> Self {
        self.process_env = vars;
        self
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    pub fn docs_root(&self) -> &Path {
        &self.docs_root
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    fn settings_service(&self) -> SettingsService<'_> {
        SettingsService::new(&self.project).with_process_env(self.process_env.clone())
    }

    /// Setting values for base followed by every declared environment.
    pub fn get_all_settings(
        &self,
        plugin: &ProjectPlugin,
    ) -> Result<Vec<EnvironmentSettingValues>, BuildError> {
        let service = self.settings_service();
        let resolver = EnvironmentResolver::new(&service);

        let mut all = vec![resolver.environment_setting_values(plugin, BASE_ENVIRONMENT)?];
        for environment in self.project.environments() {
            all.push(resolver.environment_setting_values(plugin, &environment.name)?);
        }
        Ok(all)
    }

    /// Assemble the document model of one extractor.
    pub fn get_extractor_documentation(
        &self,
        plugin: &ProjectPlugin,
    ) -> Result<ExtractorDocs, BuildError> {
        let description = match plugin.description() {
            Some(own) => DocsField {
                name: "description".to_string(),
                value: Some(own.to_string()),
                tooltip: None,
            },
            None => {
                let parent = ProjectPlugins::new(&self.project)
                    .find_parent(plugin)?
                    .filter(|parent| parent.description.is_some());
                let tooltip = parent.as_ref().map(|parent| {
                    let origin = match parent.source {
                        DefinitionSource::Hub => "retrieved from Meltano Hub".to_string(),
                        DefinitionSource::Inherited => format!("inherited from '{}'", parent.name),
                    };
                    format!(
                        "This value was {origin}. Use 'meltano config {} set description <value>' to override.",
                        plugin.name()
                    )
                });
                DocsField {
                    name: "description".to_string(),
                    value: parent.and_then(|parent| parent.description),
                    tooltip,
                }
            }
        };

        let environment_setting_values = if self.options.include_setting_values {
            self.get_all_settings(plugin)?
        } else {
            Vec::new()
        };

        tracing::debug!(
            plugin = plugin.name(),
            environments = environment_setting_values.len(),
            "Assembled extractor documentation"
        );

        Ok(ExtractorDocs {
            name: plugin.name().to_string(),
            label: plugin.label().map(str::to_string),
            variant: plugin.variant().map(str::to_string),
            description: Some(description),
            capabilities: plugin.capabilities(),
            settings: plugin.all_settings(),
            environment_setting_values,
        })
    }

    /// Write the JSON document and stub page of each extractor, then
    /// `extractors.rst`. Returns the stub pages in plugin order.
    pub fn render_extractors(&self, extractors: &[ProjectPlugin]) -> Result<Vec<PathBuf>, BuildError> {
        let definitions = extractors
            .iter()
            .map(|plugin| self.get_extractor_documentation(plugin))
            .collect::<Result<Vec<_>, _>>()?;

        let stems = document_stems(&definitions)?;

        let extract_root = self.docs_root.join(EXTRACT_DIR);
        create_dir(&extract_root)?;

        let mut pages = Vec::with_capacity(definitions.len());
        let mut include = Vec::with_capacity(definitions.len());
        for (definition, stem) in definitions.iter().zip(&stems) {
            let json_path = extract_root.join(format!("{stem}.json"));
            let json = serde_json::to_string_pretty(definition).map_err(|e| BuildError::Serialize {
                name: definition.name.clone(),
                source: e,
            })?;
            write_file(&json_path, &json)?;

            let mut context = Context::new();
            context.insert("extractor_def", &json_path.display().to_string());
            let page = extract_root.join(format!("{stem}.rst"));
            write_file(&page, &self.engine.render(EXTRACTOR_TEMPLATE, &context)?)?;

            pages.push(page);
            include.push(format!("{EXTRACT_DIR}/{stem}"));
        }

        self.render_toc(EXTRACTORS_TEMPLATE, "extractors.rst", &include)?;
        Ok(pages)
    }

    pub fn render_plugins(&self, include: &[&str]) -> Result<(), BuildError> {
        self.render_toc(PLUGINS_TEMPLATE, "plugins.rst", include)
    }

    pub fn render_index(&self, include: &[&str]) -> Result<(), BuildError> {
        self.render_toc(INDEX_TEMPLATE, "index.rst", include)
    }

    fn render_toc<S: Serialize>(
        &self,
        template: &str,
        filename: &str,
        include: &[S],
    ) -> Result<(), BuildError> {
        let mut context = Context::new();
        context.insert("include", include);
        let rst = self.engine.render(template, &context)?;
        write_file(&self.docs_root.join(filename), &rst)
    }

    /// Regenerate the documentation tree from scratch.
    ///
    /// The docs root is deleted first, so a failure part way leaves a partial
    /// tree. Returns the per-extractor stub pages.
    pub fn render(&self) -> Result<Vec<PathBuf>, BuildError> {
        if absolute(self.project.root()).starts_with(absolute(&self.docs_root)) {
            return Err(BuildError::DocsRootContainsProject {
                docs_root: self.docs_root.clone(),
                project_root: self.project.root().to_path_buf(),
            });
        }
        reset_dir(&self.docs_root)?;

        let extractors = ProjectPlugins::new(&self.project)
            .get_plugins_of_type(PluginType::Extractors, true)?;
        let pages = self.render_extractors(&extractors)?;
        self.render_plugins(&["extractors"])?;
        self.render_index(&["plugins"])?;

        tracing::info!(
            docs_root = %self.docs_root.display(),
            extractors = extractors.len(),
            include_setting_values = self.options.include_setting_values,
            "Rendered project documentation"
        );
        Ok(pages)
    }

    /// [`render`](Self::render), then expand the directive in every extractor
    /// page so the tree reads without a directive-aware renderer.
    pub fn render_with_expansion(&self) -> Result<Vec<Diagnostic>, BuildError> {
        let pages = self.render()?;
        let expander = DirectiveExpander::new(&self.engine, PathBuf::new());
        let mut diagnostics = Vec::new();
        for page in &pages {
            diagnostics.extend(expander.expand_file(page)?);
        }
        Ok(diagnostics)
    }
}

/// `<name>-<variant>` per document, failing on the first collision.
fn document_stems(definitions: &[ExtractorDocs]) -> Result<Vec<String>, BuildError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut stems = Vec::with_capacity(definitions.len());
    for definition in definitions {
        let stem = format!(
            "{}-{}",
            definition.name,
            definition.variant.as_deref().unwrap_or(DEFAULT_VARIANT)
        );
        if let Some(first) = seen.insert(stem.clone(), &definition.name) {
            return Err(BuildError::DuplicateDocument {
                stem,
                first: first.to_string(),
                second: definition.name.clone(),
            });
        }
        stems.push(stem);
    }
    Ok(stems)
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        let joined = std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf());
        normalize_path(&joined)
    })
}

fn reset_dir(path: &Path) -> Result<(), BuildError> {
    if path.exists() {
        tracing::debug!(path = %path.display(), "Removing previous docs tree");
        fs::remove_dir_all(path).map_err(|e| BuildError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    create_dir(path)
}

fn create_dir(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|e| BuildError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    fs::write(path, contents).map_err(|e| BuildError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
