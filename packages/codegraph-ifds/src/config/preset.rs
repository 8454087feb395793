//! Solver presets

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Sound by default: values computed, returns past seeds not followed,
    /// no edge history
    #[default]
    Balanced,

    /// IFDS reachability only: skips value computation
    Reachability,

    /// Keeps the full path-edge history and intermediate edge functions for
    /// dumps and DOT export
    Diagnostics,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "balanced" => Ok(Self::Balanced),
            "reachability" => Ok(Self::Reachability),
            "diagnostics" => Ok(Self::Diagnostics),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Reachability => "reachability",
            Self::Diagnostics => "diagnostics",
        }
    }
}
