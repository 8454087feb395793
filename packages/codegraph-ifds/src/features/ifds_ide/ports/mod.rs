//! Ports: the interfaces the solver consumes

pub mod icfg;
pub mod problem;

pub use icfg::Icfg;
pub use problem::{IdeProblem, IfdsProblem, IfdsProblemAdapter};
