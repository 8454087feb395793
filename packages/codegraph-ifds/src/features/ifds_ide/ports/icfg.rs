//! Interprocedural control-flow graph port
//!
//! The solver never owns program points; it only asks the host IR structural
//! questions through this trait. Sequence-returning methods must not repeat
//! elements.

use crate::features::ifds_ide::domain::{DataflowNode, DataflowProcedure};

pub trait Icfg {
    type Node: DataflowNode;
    type Procedure: DataflowProcedure;

    /// Intraprocedural successors, in a stable order
    fn successors_of(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn is_call_site(&self, node: &Self::Node) -> bool;

    fn is_exit(&self, node: &Self::Node) -> bool;

    fn is_start_point(&self, node: &Self::Node) -> bool;

    /// Possible callees at a call site (resolved by the host's call graph)
    fn callees_of_call_at(&self, node: &Self::Node) -> Vec<Self::Procedure>;

    fn return_sites_of_call_at(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Entry nodes of a procedure; empty for declarations without a body
    fn start_points_of(&self, procedure: &Self::Procedure) -> Vec<Self::Node>;

    /// Every call site that may call `procedure`
    fn callers_of(&self, procedure: &Self::Procedure) -> Vec<Self::Node>;

    /// Procedure containing `node`
    fn procedure_of(&self, node: &Self::Node) -> Option<Self::Procedure>;

    /// Call sites inside `procedure`
    fn calls_from_within(&self, procedure: &Self::Procedure) -> Vec<Self::Node>;

    /// Every node that is neither a call site nor a start point
    fn all_non_call_start_nodes(&self) -> Vec<Self::Node>;

    fn procedure_name(&self, procedure: &Self::Procedure) -> String {
        format!("{procedure:?}")
    }

    /// Statement text for dumps
    fn node_label(&self, node: &Self::Node) -> String {
        format!("{node:?}")
    }
}
