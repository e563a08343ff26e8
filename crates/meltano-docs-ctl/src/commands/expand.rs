//! Directive expansion for standalone documents.

use std::path::{Path, PathBuf};

use anyhow::Context;
use meltano_docs::template_engine::TemplateEngine;
use meltano_docs::{BuilderOptions, DirectiveExpander};

use crate::output;

/// Expand `input` and write the result to `output_path` or stdout.
///
/// Directive paths resolve against the working directory. Authoring errors
/// are left in the output as `.. error::` blocks and fail the command after
/// the document is written.
pub(crate) fn handle_expand_command(
    options: &BuilderOptions,
    input: &Path,
    output_path: Option<&Path>,
) -> anyhow::Result<()> {
    let engine = TemplateEngine::new(options.template_dir.as_deref())?;
    let expander = DirectiveExpander::new(&engine, PathBuf::new());

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let expansion = expander.expand(&text)?;

    match output_path {
        Some(path) => {
            std::fs::write(path, &expansion.text)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => output::plain(expansion.text.trim_end()),
    }

    for diagnostic in &expansion.diagnostics {
        output::warning(format!(
            "{}:{}: {}",
            input.display(),
            diagnostic.line,
            diagnostic.message
        ));
    }
    if !expansion.diagnostics.is_empty() {
        anyhow::bail!(
            "{} directive error(s) in {}",
            expansion.diagnostics.len(),
            input.display()
        );
    }
    if let Some(path) = output_path {
        output::success(format!("Expanded {} into {}", input.display(), path.display()));
    }
    Ok(())
}
