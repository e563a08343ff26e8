//! Plugin setting schema (`settings:` entries in `meltano.yml` and lock files).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The type of value a setting contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Oauth,
    Hidden,
    Password,
    #[serde(rename = "date_iso8601")]
    DateIso8601,
    File,
    Email,
    Integer,
    Options,
    Object,
    Array,
    Boolean,
    String,
}

/// OAuth provider descriptor for `kind: oauth` settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Oauth {
    /// The name of a Meltano-supported OAuth provider (e.g. `google-adwords`).
    pub provider: String,
}

/// One selectable value of a `kind: options` setting.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SettingOption {
    pub label: Option<String>,
    pub value: Value,
}

/// One configurable field of a plugin.
///
/// Unknown keys are rejected so that schema typos fail at load time rather
/// than silently disappearing from the generated reference.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Setting {
    /// The name of the setting (e.g. `account_id`).
    pub name: String,

    /// Alternative names accepted in `meltano.yml` and `meltano config set`.
    pub aliases: Option<Vec<String>>,

    /// A user friendly label (e.g. `Account ID`).
    pub label: Option<String>,

    /// The default value of this setting if not otherwise defined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// A placeholder value (e.g. `Ex. 18161`).
    pub placeholder: Option<String>,

    /// The type of value this setting contains.
    pub kind: Option<Kind>,

    /// What this setting does (markdown).
    pub description: Option<String>,

    /// Additional information on this setting.
    pub tooltip: Option<String>,

    /// A link to documentation on this setting.
    pub documentation: Option<String>,

    /// A protected setting cannot be changed from the UI.
    #[serde(default)]
    pub protected: bool,

    /// Alternative environment variable populated with this setting's value.
    pub env: Option<String>,

    /// Use with `kind: object` to automatically nest flattened keys.
    pub value_processor: Option<Value>,

    /// Post-processing applied to the resolved value.
    pub value_post_processor: Option<Value>,

    /// Marks the value as secret regardless of kind.
    pub sensitive: Option<bool>,

    /// Allowed values for `kind: options`.
    pub options: Option<Vec<SettingOption>>,

    pub oauth: Option<Oauth>,
}

impl Setting {
    /// Build a bare setting with only a name, as used for undeclared config keys.
    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: None,
            label: None,
            value: None,
            placeholder: None,
            kind: None,
            description: None,
            tooltip: None,
            documentation: None,
            protected: false,
            env: None,
            value_processor: None,
            value_post_processor: None,
            sensitive: None,
            options: None,
            oauth: None,
        }
    }

    /// Whether resolved values of this setting must be masked in output.
    pub fn is_redacted(&self) -> bool {
        matches!(self.kind, Some(Kind::Password) | Some(Kind::Oauth))
            || self.sensitive.unwrap_or(false)
    }

    /// The setting name followed by its aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.aliases.iter().flatten().map(String::as_str))
    }
}
