//! The `.. meltano-extractor:: <path>` directive.
//!
//! Per-plugin pages written by the builder hold a single directive line that
//! points at the plugin's intermediate JSON document. [`ExtractorDirective`]
//! turns one such reference into the full plugin page and
//! [`DirectiveExpander`] applies it to every directive in a document.

use std::path::{Path, PathBuf};

use tera::Context;

use crate::model::ExtractorDocs;
use crate::template_engine::{EngineError, TemplateEngine, PLUGIN_TEMPLATE};

pub const DIRECTIVE_NAME: &str = "meltano-extractor";

const DIRECTIVE_MARKER: &str = ".. meltano-extractor::";

#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    /// A mistake in the document itself, reported back to its author.
    #[error("{message}")]
    Authoring { message: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid extractor document {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl DirectiveError {
    fn authoring(message: impl Into<String>) -> Self {
        Self::Authoring {
            message: message.into(),
        }
    }
}

/// Renders one extractor reference page from its intermediate JSON file.
#[derive(Debug)]
pub struct ExtractorDirective<'e> {
    engine: &'e TemplateEngine,
    base_dir: PathBuf,
}

impl<'e> ExtractorDirective<'e> {
    /// Relative arguments are resolved against `base_dir`.
    pub fn new(engine: &'e TemplateEngine, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            base_dir: base_dir.into(),
        }
    }

    /// Run the directive with its argument text.
    pub fn run(&self, argument: &str) -> Result<String, DirectiveError> {
        let docs = self.plugin_definition(argument)?;
        let mut context = Context::new();
        context.insert("docs", &docs);
        Ok(self.engine.render(PLUGIN_TEMPLATE, &context)?)
    }

    /// Load the [`ExtractorDocs`] named by the directive argument.
    pub fn plugin_definition(&self, argument: &str) -> Result<ExtractorDocs, DirectiveError> {
        let argument = argument.trim();
        if argument.is_empty() {
            return Err(DirectiveError::authoring(format!(
                "Error in \"{DIRECTIVE_NAME}\" directive: 1 argument(s) required, 0 supplied."
            )));
        }

        let path = self.base_dir.join(argument);
        if !path.exists() {
            return Err(DirectiveError::authoring(format!(
                "Argument file path \"{argument}\" does not exist."
            )));
        }
        if !path.is_file() {
            return Err(DirectiveError::authoring(format!(
                "Argument file path \"{argument}\" is not a file."
            )));
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| DirectiveError::Io {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_str(&contents).map_err(|e| DirectiveError::Json { path, source: e })
    }
}

/// An authoring error found while expanding a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line of the offending directive.
    pub line: usize,
    pub message: String,
}

/// A document with every directive replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Replaces `.. meltano-extractor::` lines in RST text with rendered pages.
#[derive(Debug)]
pub struct DirectiveExpander<'e> {
    directive: ExtractorDirective<'e>,
}

impl<'e> DirectiveExpander<'e> {
    pub fn new(engine: &'e TemplateEngine, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            directive: ExtractorDirective::new(engine, base_dir),
        }
    }

    /// Expand every directive in `text`.
    ///
    /// Authoring errors are written in place as `.. error::` blocks and
    /// collected in [`Expansion::diagnostics`]; any other failure aborts.
    pub fn expand(&self, text: &str) -> Result<Expansion, DirectiveError> {
        let mut lines = Vec::new();
        let mut diagnostics = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let trimmed = line.trim_start();
            let Some(argument) = trimmed.strip_prefix(DIRECTIVE_MARKER) else {
                lines.push(line.to_string());
                continue;
            };
            let indent = &line[..line.len() - trimmed.len()];

            let block = match self.directive.run(argument) {
                Ok(rendered) => rendered,
                Err(DirectiveError::Authoring { message }) => {
                    tracing::warn!(line = index + 1, %message, "Directive error");
                    let block = error_block(index + 1, &message);
                    diagnostics.push(Diagnostic {
                        line: index + 1,
                        message,
                    });
                    block
                }
                Err(e) => return Err(e),
            };
            lines.extend(block.trim_end().lines().map(|l| {
                if l.is_empty() {
                    String::new()
                } else {
                    format!("{indent}{l}")
                }
            }));
        }

        let mut expanded = lines.join("\n");
        if text.ends_with('\n') {
            expanded.push('\n');
        }
        Ok(Expansion {
            text: expanded,
            diagnostics,
        })
    }

    /// Expand a file in place.
    pub fn expand_file(&self, path: &Path) -> Result<Vec<Diagnostic>, DirectiveError> {
        let io_err = |e| DirectiveError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        let text = std::fs::read_to_string(path).map_err(io_err)?;
        let expansion = self.expand(&text)?;
        std::fs::write(path, expansion.text).map_err(io_err)?;
        Ok(expansion.diagnostics)
    }
}

fn error_block(line: usize, message: &str) -> String {
    format!(".. error::\n\n   {message}\n\n   (line {line})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_docs(dir: &Path) -> PathBuf {
        let path = dir.join("tap-foo-default.json");
        fs::write(
            &path,
            r#"{"name": "tap-foo", "label": "Foo", "variant": null, "description": null,
                "capabilities": [], "settings": [], "environment_setting_values": []}"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_run_renders_plugin_page() {
        let dir = tempfile::tempdir().unwrap();
        write_docs(dir.path());
        let engine = TemplateEngine::new(None).unwrap();
        let directive = ExtractorDirective::new(&engine, dir.path());

        let rendered = directive.run("tap-foo-default.json").unwrap();
        assert!(rendered.contains("Foo\n==="));
        assert!(rendered.contains(":Variant: ``default``"));
    }

    #[test]
    fn test_missing_and_non_file_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let engine = TemplateEngine::new(None).unwrap();
        let directive = ExtractorDirective::new(&engine, dir.path());

        match directive.run("missing.json") {
            Err(DirectiveError::Authoring { message }) => {
                assert_eq!(message, "Argument file path \"missing.json\" does not exist.")
            }
            other => panic!("unexpected: {other:?}"),
        }

        fs::create_dir(dir.path().join("extract")).unwrap();
        match directive.run("extract") {
            Err(DirectiveError::Authoring { message }) => {
                assert_eq!(message, "Argument file path \"extract\" is not a file.")
            }
            other => panic!("unexpected: {other:?}"),
        }

        assert!(matches!(
            directive.run("  "),
            Err(DirectiveError::Authoring { .. })
        ));
    }

    #[test]
    fn test_invalid_json_is_not_an_authoring_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "{\"name\": 1}").unwrap();
        let engine = TemplateEngine::new(None).unwrap();
        let directive = ExtractorDirective::new(&engine, dir.path());
        assert!(matches!(
            directive.run("bad.json"),
            Err(DirectiveError::Json { .. })
        ));
    }

    #[test]
    fn test_expand_replaces_directives_and_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        write_docs(dir.path());
        let engine = TemplateEngine::new(None).unwrap();
        let expander = DirectiveExpander::new(&engine, dir.path());

        let text = "Intro\n\n.. meltano-extractor:: tap-foo-default.json\n\n.. meltano-extractor:: gone.json\n";
        let expansion = expander.expand(text).unwrap();

        assert!(expansion.text.starts_with("Intro\n\n.. _extractor-tap-foo:"));
        assert!(!expansion.text.contains(".. meltano-extractor::"));
        assert!(expansion
            .text
            .contains(".. error::\n\n   Argument file path \"gone.json\" does not exist.\n\n   (line 5)"));
        assert!(expansion.text.ends_with('\n'));
        assert_eq!(
            expansion.diagnostics,
            vec![Diagnostic {
                line: 5,
                message: "Argument file path \"gone.json\" does not exist.".to_string(),
            }]
        );
    }

    #[test]
    fn test_expand_keeps_indentation() {
        let engine = TemplateEngine::new(None).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let expander = DirectiveExpander::new(&engine, dir.path());
        let expansion = expander
            .expand(".. note::\n\n   .. meltano-extractor:: nope.json")
            .unwrap();
        assert!(expansion.text.contains("\n   .. error::\n\n      Argument file path"));
        assert!(!expansion.text.ends_with('\n'));
    }
}
