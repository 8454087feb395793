//! IFDS/IDE solver configuration

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::Validatable;

/// Order in which pending path edges (and phase-two values) are dequeued
///
/// Both orders reach the same fixed point; they differ only in how much
/// redundant re-processing happens on the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorklistOrder {
    /// Most recently discovered edge first (depth-first)
    #[default]
    Lifo,
    /// Oldest edge first (breadth-first)
    Fifo,
}

/// Policy flags consumed by the solver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Propagate zero-fact exits to every static caller when no caller was
    /// seen during the analysis (unbalanced returns)
    pub follow_returns_past_seeds: bool,

    /// Wrap client flow functions so the zero fact always maps to itself
    #[serde(default = "default_true")]
    pub auto_add_zero: bool,

    /// Run phase II and resolve lattice values
    #[serde(default = "default_true")]
    pub compute_values: bool,

    /// Keep the intra/inter path-edge history for dumps and DOT export
    pub record_edges: bool,

    /// Keep intermediate edge functions per exploded edge (DOT labels)
    pub emit_esg: bool,

    pub worklist_order: WorklistOrder,
}

fn default_true() -> bool {
    true
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::preset(Preset::Balanced)
    }
}

impl SolverConfig {
    pub fn preset(preset: Preset) -> Self {
        let balanced = Self {
            follow_returns_past_seeds: false,
            auto_add_zero: true,
            compute_values: true,
            record_edges: false,
            emit_esg: false,
            worklist_order: WorklistOrder::Lifo,
        };
        match preset {
            Preset::Balanced => balanced,
            Preset::Reachability => Self {
                compute_values: false,
                ..balanced
            },
            Preset::Diagnostics => Self {
                record_edges: true,
                emit_esg: true,
                ..balanced
            },
        }
    }

    /// Reachability-only preset (no phase II)
    pub fn reachability() -> Self {
        Self::preset(Preset::Reachability)
    }

    /// Edge history and ESG labels enabled
    pub fn diagnostics() -> Self {
        Self::preset(Preset::Diagnostics)
    }

    // Builder-style setters

    pub fn follow_returns_past_seeds(mut self, enabled: bool) -> Self {
        self.follow_returns_past_seeds = enabled;
        self
    }

    pub fn auto_add_zero(mut self, enabled: bool) -> Self {
        self.auto_add_zero = enabled;
        self
    }

    pub fn compute_values(mut self, enabled: bool) -> Self {
        self.compute_values = enabled;
        self
    }

    pub fn record_edges(mut self, enabled: bool) -> Self {
        self.record_edges = enabled;
        self
    }

    pub fn emit_esg(mut self, enabled: bool) -> Self {
        self.emit_esg = enabled;
        self
    }

    pub fn worklist_order(mut self, order: WorklistOrder) -> Self {
        self.worklist_order = order;
        self
    }
}

impl Validatable for SolverConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.emit_esg && !self.record_edges {
            return Err(ConfigError::conflict(
                "emit_esg requires the path-edge history",
                "set record_edges: true or disable emit_esg",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "SolverConfig"
    }
}
