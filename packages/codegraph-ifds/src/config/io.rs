//! YAML configuration files
//!
//! Schema v1:
//!
//! ```yaml
//! version: 1
//! preset: balanced
//! overrides:
//!   follow_returns_past_seeds: true
//!   worklist_order: fifo
//! dot:
//!   graph_name: MyESG
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::dot_config::DotConfig;
use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::solver_config::{SolverConfig, WorklistOrder};
use super::validation::Validatable;

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset
    #[serde(default)]
    pub preset: Preset,

    /// Per-field overrides on top of the preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<SolverConfigPatch>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot: Option<DotConfig>,
}

/// Patch type for SolverConfig (all fields optional)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_returns_past_seeds: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_add_zero: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_values: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_edges: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emit_esg: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worklist_order: Option<WorklistOrder>,
}

impl SolverConfigPatch {
    pub fn apply(&self, mut base: SolverConfig) -> SolverConfig {
        if let Some(v) = self.follow_returns_past_seeds {
            base.follow_returns_past_seeds = v;
        }
        if let Some(v) = self.auto_add_zero {
            base.auto_add_zero = v;
        }
        if let Some(v) = self.compute_values {
            base.compute_values = v;
        }
        if let Some(v) = self.record_edges {
            base.record_edges = v;
        }
        if let Some(v) = self.emit_esg {
            base.emit_esg = v;
        }
        if let Some(v) = self.worklist_order {
            base.worklist_order = v;
        }
        base
    }

    /// Fields of `config` that differ from `base`
    pub fn diff(base: &SolverConfig, config: &SolverConfig) -> Self {
        fn changed<T: PartialEq + Copy>(base: T, value: T) -> Option<T> {
            (base != value).then_some(value)
        }
        Self {
            follow_returns_past_seeds: changed(
                base.follow_returns_past_seeds,
                config.follow_returns_past_seeds,
            ),
            auto_add_zero: changed(base.auto_add_zero, config.auto_add_zero),
            compute_values: changed(base.compute_values, config.compute_values),
            record_edges: changed(base.record_edges, config.record_edges),
            emit_esg: changed(base.emit_esg, config.emit_esg),
            worklist_order: changed(base.worklist_order, config.worklist_order),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ConfigFileV1 {
    /// Parse and check the schema version
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;
        match file.version {
            None => Err(ConfigError::MissingVersion),
            Some(v) if !SUPPORTED_VERSIONS.contains(&v) => Err(ConfigError::UnsupportedVersion {
                found: v,
                supported: SUPPORTED_VERSIONS.to_vec(),
            }),
            Some(_) => Ok(file),
        }
    }

    /// Resolved, validated solver config
    pub fn solver_config(&self) -> ConfigResult<SolverConfig> {
        let base = SolverConfig::preset(self.preset);
        let config = match &self.overrides {
            Some(patch) => patch.apply(base),
            None => base,
        };
        if let Err(err) = config.validate() {
            warn!(config = config.config_name(), error = %err, "rejected configuration file");
            return Err(err);
        }
        Ok(config)
    }

    /// DOT settings, defaulted when the section is absent
    pub fn dot_config(&self) -> ConfigResult<DotConfig> {
        let dot = self.dot.clone().unwrap_or_default();
        dot.validate()?;
        Ok(dot)
    }
}

impl SolverConfig {
    /// Load from YAML text (schema v1)
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        ConfigFileV1::parse(content)?.solver_config()
    }

    /// Load from a YAML file (schema v1)
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Export as schema v1 relative to `preset`, writing only changed fields
    pub fn to_yaml(&self, preset: Preset) -> ConfigResult<String> {
        let patch = SolverConfigPatch::diff(&SolverConfig::preset(preset), self);
        let file = ConfigFileV1 {
            version: Some(1),
            preset,
            overrides: (!patch.is_empty()).then_some(patch),
            dot: None,
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}
