//! Tera template engine for rendered documentation pages.
//!
//! Built-in templates ship inside the crate. A template directory, when
//! configured, is searched first: any file there whose relative path matches
//! a built-in name (`plugin.rst`, `build/extractor.rst`, ...) replaces it.

mod engine;
mod filters;
mod loader;

pub use engine::{EngineError, TemplateEngine};
pub use loader::LoaderError;

/// Per-plugin stub page holding the extractor directive.
pub const EXTRACTOR_TEMPLATE: &str = "build/extractor.rst";
/// Table of contents over all extractor pages.
pub const EXTRACTORS_TEMPLATE: &str = "build/extractors.rst";
pub const PLUGINS_TEMPLATE: &str = "build/plugins.rst";
pub const INDEX_TEMPLATE: &str = "build/index.rst";
/// Full plugin reference, rendered from `ExtractorDocs`.
pub const PLUGIN_TEMPLATE: &str = "plugin.rst";
