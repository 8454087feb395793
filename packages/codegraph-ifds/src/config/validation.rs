//! Configuration validation

use super::error::ConfigResult;

/// Trait for validatable configuration objects
///
/// The solver validates its configuration once at construction; callers
/// building configs by hand can validate early the same way.
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Get the configuration name for error messages
    fn config_name(&self) -> &'static str;
}
