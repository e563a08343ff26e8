//! Command handlers for the meltano-docs CLI.

pub(crate) mod expand;
pub(crate) mod plugin;
pub(crate) mod render;

pub(crate) use expand::handle_expand_command;
pub(crate) use plugin::{handle_plugins_command, handle_settings_command};
pub(crate) use render::handle_render_command;

/// Snapshot of the process environment for the `env` settings layer.
pub(crate) fn process_env() -> std::collections::HashMap<String, String> {
    std::env::vars().collect()
}
