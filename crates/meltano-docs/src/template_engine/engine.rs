//! Tera-based template rendering engine with custom filter registration.

use std::path::Path;

use tera::{Context, Tera};

use super::filters;
use super::loader::{load_templates_from_dir, LoaderError, BUILTIN_TEMPLATES};

/// Template engine over the built-in templates and an optional override directory.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Build the engine, registering templates from `template_dir` over the
    /// built-ins.
    pub fn new(template_dir: Option<&Path>) -> Result<Self, EngineError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN_TEMPLATES)
            .map_err(|e| EngineError::Load(e.to_string()))?;

        if let Some(dir) = template_dir {
            let overrides = load_templates_from_dir(dir)?;
            tracing::debug!(
                template_dir = %dir.display(),
                templates = overrides.len(),
                "Loaded template overrides"
            );
            tera.add_raw_templates(overrides)
                .map_err(|e| EngineError::Load(e.to_string()))?;
        }

        tera.register_filter("kebab_case", filters::kebab_case);
        tera.register_filter("md2rst", filters::md2rst);
        tera.register_filter("md2html", filters::md2html);
        tera.register_filter("settings_table", filters::settings_table);
        tera.register_filter("heading", filters::heading);
        tera.register_filter("indent_block", filters::indent_block);

        Ok(Self { tera })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render the named template.
    pub fn render(&self, template: &str, context: &Context) -> Result<String, EngineError> {
        if !self.has_template(template) {
            return Err(EngineError::TemplateNotFound(template.to_string()));
        }
        self.tera
            .render(template, context)
            .map_err(|e| EngineError::Render {
                template: template.to_string(),
                source: e,
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("template directory error: {0}")]
    Loader(#[from] LoaderError),
    #[error("template load error: {0}")]
    Load(String),
    #[error("template '{0}' not found")]
    TemplateNotFound(String),
    #[error("render error for '{template}': {source}")]
    Render {
        template: String,
        source: tera::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_engine::{INDEX_TEMPLATE, PLUGIN_TEMPLATE};
    use serde_json::json;
    use std::fs;

    fn include(items: &[&str]) -> Context {
        let mut context = Context::new();
        context.insert("include", items);
        context
    }

    #[test]
    fn test_builtin_index() {
        let engine = TemplateEngine::new(None).unwrap();
        let rendered = engine.render(INDEX_TEMPLATE, &include(&["plugins"])).unwrap();
        assert_eq!(
            rendered,
            "Meltano Project\n===============\n\n.. toctree::\n   :maxdepth: 3\n\n   plugins\n"
        );
    }

    #[test]
    fn test_override_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("build")).unwrap();
        fs::write(
            dir.path().join("build").join("index.rst"),
            "Custom\n{% for doc in include %}{{ doc }}{% endfor %}\n",
        )
        .unwrap();

        let engine = TemplateEngine::new(Some(dir.path())).unwrap();
        let rendered = engine.render(INDEX_TEMPLATE, &include(&["plugins"])).unwrap();
        assert_eq!(rendered, "Custom\nplugins\n");
        // untouched built-ins remain available
        assert!(engine.has_template(PLUGIN_TEMPLATE));
    }

    #[test]
    fn test_plugin_template() {
        let engine = TemplateEngine::new(None).unwrap();
        let mut context = Context::new();
        context.insert(
            "docs",
            &json!({
                "name": "tap-foo",
                "label": "Foo",
                "variant": "meltanolabs",
                "description": {"name": "description", "value": "Pulls **foo** data.", "tooltip": null},
                "capabilities": ["catalog", "discover"],
                "settings": [{"name": "account_id", "kind": "string", "value": "", "protected": false}],
                "environment_setting_values": []
            }),
        );
        let rendered = engine.render(PLUGIN_TEMPLATE, &context).unwrap();
        assert!(rendered.starts_with(".. _extractor-tap-foo:\n\nFoo\n===\n"));
        assert!(rendered.contains(":Variant: ``meltanolabs``"));
        assert!(rendered.contains(":Capabilities: catalog, discover"));
        assert!(rendered.contains("Pulls **foo** data."));
        assert!(rendered.contains("``account_id``\n~~~~~~~~~~~~~~"));
        assert!(rendered.contains(":Default: ``\"\"``"));
        assert!(!rendered.contains("Setting Values"));
    }

    #[test]
    fn test_missing_template() {
        let engine = TemplateEngine::new(None).unwrap();
        let result = engine.render("nonexistent.rst", &Context::new());
        assert!(matches!(result, Err(EngineError::TemplateNotFound(_))));
    }

    #[test]
    fn test_broken_override_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("plugin.rst"), "{% if %}").unwrap();
        let result = TemplateEngine::new(Some(dir.path()));
        assert!(matches!(result, Err(EngineError::Load(_))));
    }
}
