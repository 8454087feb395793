//! Feature modules (vertical slices)
//!
//! Each feature follows hexagonal architecture:
//! - domain/: Core types and algebra (no dependencies on the solver)
//! - ports/: Interfaces the solver consumes (ICFG, data-flow problem)
//! - infrastructure/: Solver tables, the solver itself, result views

pub mod ifds_ide;
