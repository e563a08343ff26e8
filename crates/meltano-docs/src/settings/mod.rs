//! Plugin setting resolution.
//!
//! [`SettingsService`] walks the configuration layers of a plugin and reports
//! each setting's effective value together with the layer that supplied it.
//! [`EnvironmentResolver`] narrows that view to what one environment section
//! of the documentation should show.

mod env;
mod resolver;
mod service;

pub use resolver::EnvironmentResolver;
pub use service::{ResolvedSetting, SettingsService, REDACTED_VALUE};
