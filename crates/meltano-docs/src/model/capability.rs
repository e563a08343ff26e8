//! Declared plugin capabilities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A feature flag a plugin declares support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Properties,
    Catalog,
    Discover,
    State,
    About,
    StreamMaps,
    ActivateVersion,
    Batch,
    Test,
    LogBased,
    SchemaFlattening,
}

impl Capability {
    /// The identifier used in `meltano.yml`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Properties => "properties",
            Self::Catalog => "catalog",
            Self::Discover => "discover",
            Self::State => "state",
            Self::About => "about",
            Self::StreamMaps => "stream-maps",
            Self::ActivateVersion => "activate-version",
            Self::Batch => "batch",
            Self::Test => "test",
            Self::LogBased => "log-based",
            Self::SchemaFlattening => "schema-flattening",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
