//! Environment variable naming and string value casting.

use serde_json::Value;

use crate::model::{Kind, Setting};

/// `<PLUGIN_NAME>_<SETTING_NAME>` with non-alphanumerics replaced by `_`.
pub(crate) fn setting_env_var(plugin_name: &str, setting_name: &str) -> String {
    format!("{plugin_name}_{setting_name}")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Variable names that can populate a setting, in lookup order.
pub(crate) fn setting_env_vars(plugin_name: &str, setting: &Setting) -> Vec<String> {
    let mut names = Vec::with_capacity(2);
    if let Some(env) = &setting.env {
        names.push(env.clone());
    }
    let default = setting_env_var(plugin_name, &setting.name);
    if !names.contains(&default) {
        names.push(default);
    }
    names
}

/// Cast a raw string from an environment source to the setting's kind.
///
/// Values that do not parse as the declared kind are kept as strings.
pub(crate) fn cast_env_value(raw: &str, kind: Option<Kind>) -> Value {
    match kind {
        Some(Kind::Integer) => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        Some(Kind::Boolean) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" | "yes" | "y" | "on" => Value::Bool(true),
            "false" | "f" | "0" | "no" | "n" | "off" => Value::Bool(false),
            _ => Value::String(raw.to_string()),
        },
        Some(Kind::Object) | Some(Kind::Array) => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        }
        _ => Value::String(raw.to_string()),
    }
}
