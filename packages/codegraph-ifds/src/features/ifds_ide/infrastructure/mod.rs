//! Infrastructure: solver tables, the solver itself, result views and dumps

pub mod edge_history;
pub mod esg_dot;
pub mod flow_edge_cache;
pub mod ide_solver;
pub mod jump_functions;
pub mod program_icfg;
pub mod solver_results;
pub mod special_summaries;
pub mod statistics;
pub mod summary_tables;

pub use edge_history::{EdgeHistory, EsgEdgeKind};
pub use esg_dot::write_esg_dot;
pub use flow_edge_cache::FlowEdgeFunctionCache;
pub use ide_solver::{IdeSolver, IfdsSolver};
pub use jump_functions::JumpFunctions;
pub use program_icfg::ProgramIcfg;
pub use solver_results::{OwningSolverResults, SolverResults};
pub use special_summaries::{SpecialSummaries, SpecialSummary};
pub use statistics::{CacheCounter, CacheStatistics, FunctionKind, SolverStatistics};
pub use summary_tables::{EndSummaryTable, IncomingTable};
