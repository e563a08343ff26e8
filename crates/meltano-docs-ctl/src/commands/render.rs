//! Documentation tree rendering.

use anyhow::Context;
use meltano_docs::{BuildError, BuilderOptions, ProjectDocsBuilder};

use crate::output;

pub(crate) fn handle_render_command(options: BuilderOptions, expand: bool) -> anyhow::Result<()> {
    let project_root = options.project_root.clone();
    let builder = ProjectDocsBuilder::new(options)
        .with_context(|| format!("failed to load project at {}", project_root.display()))?
        .with_process_env(super::process_env());

    if expand {
        let diagnostics = builder.render_with_expansion().map_err(with_hint)?;
        for diagnostic in &diagnostics {
            output::warning(format!("line {}: {}", diagnostic.line, diagnostic.message));
        }
    } else {
        builder.render().map_err(with_hint)?;
    }

    output::success(format!(
        "Rendered documentation to {}",
        builder.docs_root().display()
    ));
    Ok(())
}

/// Point at the docs root settings when the default paths collide.
fn with_hint(err: BuildError) -> anyhow::Error {
    match err {
        BuildError::DocsRootContainsProject { .. } => anyhow::Error::new(err).context(
            "choose a separate output directory with --docs-root or `docs-root` in .meltano-docs.toml",
        ),
        other => other.into(),
    }
}
