//! Special summaries registry
//!
//! Hand-written effects for procedures that should not be analysed (library
//! calls, intrinsics). The registry is an ordinary value handed to the solver
//! at construction, so every analysis run has its own.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::features::ifds_ide::domain::{EdgeFunction, FlowFunctionPtr};

pub struct SpecialSummary<D, L> {
    pub flow_function: FlowFunctionPtr<D>,
    /// Applied to every (call fact, return fact) pair the flow function produces
    pub edge_function: EdgeFunction<L>,
}

impl<D, L: Clone> Clone for SpecialSummary<D, L> {
    fn clone(&self) -> Self {
        Self {
            flow_function: self.flow_function.clone(),
            edge_function: self.edge_function.clone(),
        }
    }
}

pub struct SpecialSummaries<M, D, L> {
    summaries: FxHashMap<M, SpecialSummary<D, L>>,
}

impl<M, D, L> Default for SpecialSummaries<M, D, L> {
    fn default() -> Self {
        Self {
            summaries: FxHashMap::default(),
        }
    }
}

impl<M: Eq + Hash, D, L: Clone> SpecialSummaries<M, D, L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the summary of `callee`
    pub fn register(
        &mut self,
        callee: M,
        flow_function: FlowFunctionPtr<D>,
        edge_function: EdgeFunction<L>,
    ) -> &mut Self {
        self.summaries.insert(
            callee,
            SpecialSummary {
                flow_function,
                edge_function,
            },
        );
        self
    }

    pub fn get(&self, callee: &M) -> Option<&SpecialSummary<D, L>> {
        self.summaries.get(callee)
    }

    pub fn flow_function(&self, callee: &M) -> Option<FlowFunctionPtr<D>> {
        self.summaries.get(callee).map(|s| s.flow_function.clone())
    }

    pub fn edge_function(&self, callee: &M) -> Option<EdgeFunction<L>> {
        self.summaries.get(callee).map(|s| s.edge_function.clone())
    }

    pub fn contains(&self, callee: &M) -> bool {
        self.summaries.contains_key(callee)
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ifds_ide::domain::flow_function::{identity_flow, kill_all_flow};
    use crate::features::ifds_ide::domain::BinaryDomain;

    #[test]
    fn test_register_and_replace() {
        let mut registry: SpecialSummaries<&str, u32, BinaryDomain> = SpecialSummaries::new();
        registry.register("memcpy", identity_flow(), EdgeFunction::Identity);
        registry.register("free", kill_all_flow(), EdgeFunction::AllBottom);
        registry.register("free", identity_flow(), EdgeFunction::Identity);

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&"memcpy"));
        assert_eq!(registry.edge_function(&"free"), Some(EdgeFunction::Identity));
        let flow = registry.flow_function(&"free").unwrap();
        assert_eq!(flow.compute_targets(&7).len(), 1);
        assert!(registry.get(&"printf").is_none());
    }
}
