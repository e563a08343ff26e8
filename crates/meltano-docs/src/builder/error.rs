use std::path::PathBuf;

use crate::directive::DirectiveError;
use crate::project::ProjectError;
use crate::template_engine::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Directive(#[from] DirectiveError),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize docs for '{name}': {source}")]
    Serialize {
        name: String,
        source: serde_json::Error,
    },

    #[error(
        "docs root {} would replace the project at {}",
        docs_root.display(),
        project_root.display()
    )]
    DocsRootContainsProject {
        docs_root: PathBuf,
        project_root: PathBuf,
    },

    #[error("extractors '{first}' and '{second}' would both be written as '{stem}'")]
    DuplicateDocument {
        stem: String,
        first: String,
        second: String,
    },
}
