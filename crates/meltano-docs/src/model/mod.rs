//! Plugin document model.
//!
//! Describes the documentable shape of a plugin: identity, description,
//! capabilities, setting schema, and per-environment resolved values. The
//! enumerations (`Capability`, `Kind`, `SettingSource`) are closed sets and
//! unknown values fail deserialization.

mod capability;
mod docs;
mod setting;

pub use capability::Capability;
pub use docs::{
    DocsField, EnvironmentSettingValues, ExtractorDocs, SettingSource, SettingValue,
    BASE_ENVIRONMENT,
};
pub use setting::{Kind, Oauth, Setting, SettingOption};
