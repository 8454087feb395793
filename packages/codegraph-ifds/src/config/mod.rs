//! Solver configuration
//!
//! Two tiers:
//! - Preset: `SolverConfig::preset(Preset::Reachability)`
//! - YAML: versioned file with a base preset plus per-field overrides
//!
//! ```rust,ignore
//! use codegraph_ifds::config::{Preset, SolverConfig};
//!
//! let config = SolverConfig::preset(Preset::Balanced);
//! let config = SolverConfig::from_yaml_str("version: 1\npreset: diagnostics\n")?;
//! ```

pub mod dot_config;
pub mod error;
pub mod io;
pub mod preset;
pub mod solver_config;
pub mod validation;

pub use dot_config::DotConfig;
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigFileV1, SolverConfigPatch};
pub use preset::Preset;
pub use solver_config::{SolverConfig, WorklistOrder};
pub use validation::Validatable;
