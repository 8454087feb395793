/*
 * Codegraph IFDS - Interprocedural Tabulation Solver
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Sparse tables, logging macros
 * - config/      : Solver configuration (YAML, presets, validation)
 * - features/    : ifds_ide (domain → ports → infrastructure)
 *
 * Algorithm:
 * - Phase I : path-edge propagation over the exploded supergraph
 * - Phase II: value computation along the discovered jump functions
 */

#![allow(clippy::too_many_arguments)] // Edge-function queries carry full exploded-edge keys
#![allow(clippy::type_complexity)] // Nested solver tables
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::should_implement_trait)] // from_str naming intentional

/// Shared utilities (sparse tables, macros)
#[macro_use]
pub mod shared;

/// Error types
pub mod errors;

/// Solver configuration
pub mod config;

/// Feature modules
pub mod features;

pub use config::{ConfigError, ConfigResult, DotConfig, Preset, SolverConfig, Validatable, WorklistOrder};
pub use errors::{IfdsError, Result};
pub use features::ifds_ide::domain::{
    BinaryDomain, DataflowFact, DataflowNode, DataflowProcedure, EdgeFunction, EdgeFunctionImpl,
    FactSet, FlowFunction, FlowFunctionPtr, IdeValue, InitialSeeds, PathEdge,
};
pub use features::ifds_ide::infrastructure::{
    CacheStatistics, EsgEdgeKind, FlowEdgeFunctionCache, FunctionKind, IdeSolver, IfdsSolver,
    JumpFunctions, OwningSolverResults, ProgramIcfg, SolverResults, SolverStatistics,
    SpecialSummaries,
};
pub use features::ifds_ide::ports::{Icfg, IdeProblem, IfdsProblem, IfdsProblemAdapter};
