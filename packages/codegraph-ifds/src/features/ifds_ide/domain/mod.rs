//! Domain types: lattices, edge functions, flow functions, path edges

pub mod edge_function;
pub mod flow_function;
pub mod lattice;
pub mod path_edge;
pub mod seeds;

use std::fmt::Debug;
use std::hash::Hash;

pub use edge_function::{EdgeFunction, EdgeFunctionComposer, EdgeFunctionImpl, JoinEdgeFunction};
pub use flow_function::{FactSet, FlowFunction, FlowFunctionPtr};
pub use lattice::{BinaryDomain, IdeValue};
pub use path_edge::PathEdge;
pub use seeds::InitialSeeds;

/// Program point (statement/instruction) identity
///
/// Opaque to the solver apart from equality, hashing and ordering. Ordering is
/// only used to make dumps and result iteration deterministic.
pub trait DataflowNode: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> DataflowNode for T {}

/// Data-flow fact (tainted value, variable, memory location, ...)
///
/// Facts are captured by shared flow functions, hence `Send + Sync + 'static`.
pub trait DataflowFact: Clone + Eq + Hash + Ord + Debug + Send + Sync + 'static {}

impl<T: Clone + Eq + Hash + Ord + Debug + Send + Sync + 'static> DataflowFact for T {}

/// Procedure (function/method) identity
pub trait DataflowProcedure: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> DataflowProcedure for T {}
