//! Custom Tera filters for RST output.

use std::collections::HashMap;

use heck::ToKebabCase;
use tera::{Result, Value};

use crate::markup::{md_to_html, md_to_rst};
use crate::model::EnvironmentSettingValues;

fn optional_str<'v>(value: &'v Value, filter: &str) -> Result<Option<&'v str>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        _ => Err(tera::Error::msg(format!(
            "{filter} filter expects a string or null"
        ))),
    }
}

pub(crate) fn kebab_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("kebab_case filter expects a string"))?;
    Ok(Value::String(s.to_kebab_case()))
}

pub(crate) fn md2rst(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let markdown = optional_str(value, "md2rst")?;
    Ok(Value::String(md_to_rst(markdown)))
}

pub(crate) fn md2html(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let markdown = optional_str(value, "md2html")?;
    Ok(Value::String(md_to_html(markdown)))
}

/// `{{ env | settings_table }}` renders an `EnvironmentSettingValues` as a grid table.
pub(crate) fn settings_table(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let values: EnvironmentSettingValues = serde_json::from_value(value.clone())
        .map_err(|e| tera::Error::chain("settings_table filter expects setting values", e))?;
    Ok(Value::String(values.as_table()))
}

/// `{{ title | heading(char="=") }}` underlines a title to its own width.
pub(crate) fn heading(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let title = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("heading filter expects a string"))?;
    let underline = match args.get("char") {
        Some(Value::String(c)) if c.chars().count() == 1 => c.as_str(),
        Some(_) => return Err(tera::Error::msg("heading filter `char` must be one character")),
        None => "=",
    };
    Ok(Value::String(format!(
        "{title}\n{}",
        underline.repeat(title.chars().count())
    )))
}

/// `{{ block | indent_block(width=3) }}` indents every non-empty line.
pub(crate) fn indent_block(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("indent_block filter expects a string"))?;
    let width = match args.get("width") {
        Some(w) => w
            .as_u64()
            .ok_or_else(|| tera::Error::msg("indent_block filter `width` must be a number"))?,
        None => 3,
    };
    let prefix = " ".repeat(width as usize);
    let indented: Vec<String> = text
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect();
    Ok(Value::String(indented.join("\n")))
}
