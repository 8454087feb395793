//! Shared utilities used across the solver

#[macro_use]
pub mod macros;
pub mod table;

pub use table::Table;
