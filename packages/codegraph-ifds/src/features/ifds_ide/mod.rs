//! IFDS/IDE tabulation solver
//!
//! Computes, for every reachable program point of an interprocedural CFG, the
//! data-flow facts that hold there together with a lattice value per fact.
//!
//! References:
//! - Reps, Horwitz, Sagiv (1995): "Precise Interprocedural Dataflow Analysis via Graph Reachability"
//! - Sagiv, Reps, Horwitz (1996): "Precise Interprocedural Dataflow Analysis with Applications to Constant Propagation"
//! - Naeem, Lhoták, Rodriguez (2010): "Practical Extensions to the IFDS Algorithm"

pub mod domain;
pub mod infrastructure;
pub mod ports;
