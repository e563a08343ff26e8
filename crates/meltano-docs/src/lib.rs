//! Reference documentation generator for Meltano projects.
//!
//! Reads a project directory (`meltano.yml`, `.env`, plugin lock files) and
//! writes one reStructuredText page per extractor describing its identity,
//! capabilities, setting schema and, optionally, the setting values in effect
//! for each environment.
//!
//! # Modules
//!
//! - [`model`]: the documentable shape of a plugin (`ExtractorDocs` and friends)
//! - [`project`]: project loading, plugin enumeration and inheritance
//! - [`settings`]: layered setting resolution with provenance
//! - [`markup`]: markdown to RST and HTML
//! - [`template_engine`]: Tera templates with built-ins and an override directory
//! - [`builder`]: the documentation tree writer
//! - [`directive`]: expansion of `.. meltano-extractor::` directives

pub mod builder;
pub mod directive;
pub mod markup;
pub mod model;
pub mod project;
pub mod settings;
pub mod template_engine;

pub use builder::{BuildError, BuilderOptions, ProjectDocsBuilder};
pub use directive::{DirectiveError, DirectiveExpander, ExtractorDirective};
