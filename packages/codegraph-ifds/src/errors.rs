//! Error types for codegraph-ifds
//!
//! Client panics inside flow or edge functions are not caught; everything the
//! solver itself can detect surfaces as an [`IfdsError`].

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for solver operations
#[derive(Debug, Error)]
pub enum IfdsError {
    /// `solve()` was called on a solver whose tables are already final
    #[error("Solver already ran to completion; tables are read-only")]
    AlreadySolved,

    /// The ICFG could not name the procedure containing a node
    #[error("ICFG has no procedure for node {node}")]
    MissingProcedure { node: String },

    /// The in-memory ICFG builder rejected a node or edge
    #[error("Invalid ICFG: {0}")]
    InvalidIcfg(String),

    /// A path-edge dump was requested without `record_edges`
    #[error("Path-edge recording is disabled; enable `record_edges` in the solver config")]
    EdgeRecordingDisabled,

    /// Cooperative cancellation fired between worklist dequeues
    #[error("Solver interrupted after {processed} path edges")]
    Interrupted { processed: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Formatting error while writing a dump
    #[error("Format error: {0}")]
    Format(#[from] std::fmt::Error),
}

impl IfdsError {
    /// Create an ICFG validation error
    pub fn invalid_icfg(msg: impl Into<String>) -> Self {
        IfdsError::InvalidIcfg(msg.into())
    }

    /// Create a missing-procedure error from any debuggable node
    pub fn missing_procedure(node: &impl std::fmt::Debug) -> Self {
        IfdsError::MissingProcedure {
            node: format!("{node:?}"),
        }
    }
}

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, IfdsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = IfdsError::missing_procedure(&"bb3");
        assert_eq!(err.to_string(), "ICFG has no procedure for node \"bb3\"");

        let err = IfdsError::Interrupted { processed: 12 };
        assert!(err.to_string().contains("12 path edges"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: IfdsError = ConfigError::UnknownPreset("turbo".to_string()).into();
        assert!(matches!(err, IfdsError::Config(_)));
        assert!(err.to_string().contains("turbo"));
    }
}
