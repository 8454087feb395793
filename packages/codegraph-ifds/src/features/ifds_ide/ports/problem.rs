//! Data-flow problem ports
//!
//! An [`IdeProblem`] supplies flow functions (which facts reach which facts)
//! and edge functions (how values change along those edges). An
//! [`IfdsProblem`] supplies only flow functions and is solved through
//! [`IfdsProblemAdapter`] with `L = BinaryDomain`.

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use crate::config::SolverConfig;
use crate::features::ifds_ide::domain::{
    BinaryDomain, DataflowFact, DataflowNode, DataflowProcedure, EdgeFunction, FactSet,
    FlowFunctionPtr, IdeValue, InitialSeeds,
};
use crate::features::ifds_ide::infrastructure::SolverResults;

/// IDE problem definition
///
/// Edge-function arguments name one exploded-supergraph edge: the source
/// (node, fact) and the target (node, fact).
pub trait IdeProblem {
    type Node: DataflowNode;
    type Fact: DataflowFact;
    type Procedure: DataflowProcedure;
    type Value: IdeValue;

    /// The Λ fact that holds everywhere reachable
    fn zero_value(&self) -> Self::Fact;

    fn is_zero_value(&self, fact: &Self::Fact) -> bool {
        *fact == self.zero_value()
    }

    /// Start nodes with their facts and values; the zero fact is added by the
    /// solver where missing
    fn initial_seeds(&self) -> InitialSeeds<Self::Node, Self::Fact, Self::Value>;

    // ------------------------------------------------------------------
    // Flow functions
    // ------------------------------------------------------------------

    fn normal_flow_function(&self, curr: &Self::Node, succ: &Self::Node)
        -> FlowFunctionPtr<Self::Fact>;

    /// Maps actual-side facts into the callee's start facts
    fn call_flow_function(
        &self,
        call_site: &Self::Node,
        callee: &Self::Procedure,
    ) -> FlowFunctionPtr<Self::Fact>;

    /// Maps callee exit facts back to the caller's return site
    fn return_flow_function(
        &self,
        call_site: &Self::Node,
        callee: &Self::Procedure,
        exit: &Self::Node,
        return_site: &Self::Node,
    ) -> FlowFunctionPtr<Self::Fact>;

    /// Facts that bypass the callees (locals, untouched globals)
    fn call_to_return_flow_function(
        &self,
        call_site: &Self::Node,
        return_site: &Self::Node,
        callees: &[Self::Procedure],
    ) -> FlowFunctionPtr<Self::Fact>;

    /// Hand-written summary that replaces analysing `callee` (library models)
    fn summary_flow_function(
        &self,
        _call_site: &Self::Node,
        _callee: &Self::Procedure,
    ) -> Option<FlowFunctionPtr<Self::Fact>> {
        None
    }

    // ------------------------------------------------------------------
    // Edge functions
    // ------------------------------------------------------------------

    fn normal_edge_function(
        &self,
        curr: &Self::Node,
        curr_fact: &Self::Fact,
        succ: &Self::Node,
        succ_fact: &Self::Fact,
    ) -> EdgeFunction<Self::Value>;

    fn call_edge_function(
        &self,
        call_site: &Self::Node,
        src_fact: &Self::Fact,
        callee: &Self::Procedure,
        dest_fact: &Self::Fact,
    ) -> EdgeFunction<Self::Value>;

    fn return_edge_function(
        &self,
        call_site: &Self::Node,
        callee: &Self::Procedure,
        exit: &Self::Node,
        exit_fact: &Self::Fact,
        return_site: &Self::Node,
        return_fact: &Self::Fact,
    ) -> EdgeFunction<Self::Value>;

    fn call_to_return_edge_function(
        &self,
        call_site: &Self::Node,
        call_fact: &Self::Fact,
        return_site: &Self::Node,
        return_fact: &Self::Fact,
        callees: &[Self::Procedure],
    ) -> EdgeFunction<Self::Value>;

    /// Edge function paired with [`IdeProblem::summary_flow_function`]
    fn summary_edge_function(
        &self,
        _call_site: &Self::Node,
        _call_fact: &Self::Fact,
        _return_site: &Self::Node,
        _return_fact: &Self::Fact,
    ) -> EdgeFunction<Self::Value> {
        EdgeFunction::Identity
    }

    // ------------------------------------------------------------------
    // Hooks
    // ------------------------------------------------------------------

    /// Called when a zero-fact path edge leaves a procedure that has neither a
    /// recorded nor a static caller (only with `follow_returns_past_seeds`)
    fn apply_unbalanced_return_side_effects(
        &self,
        _callee: &Self::Procedure,
        _exit: &Self::Node,
        _exit_fact: &Self::Fact,
    ) {
    }

    /// Configuration used by `IdeSolver::new`
    fn solver_config(&self) -> SolverConfig {
        SolverConfig::default()
    }

    fn fact_label(&self, fact: &Self::Fact) -> String {
        format!("{fact:?}")
    }

    fn value_label(&self, value: &Self::Value) -> String {
        format!("{value:?}")
    }

    /// Client-specific report over the final values
    fn emit_text_report(
        &self,
        _results: &SolverResults<'_, Self::Node, Self::Fact, Self::Value>,
        out: &mut dyn Write,
    ) -> fmt::Result {
        writeln!(out, "No text report available!")
    }
}

/// IFDS problem definition (reachability only)
pub trait IfdsProblem {
    type Node: DataflowNode;
    type Fact: DataflowFact;
    type Procedure: DataflowProcedure;

    fn zero_value(&self) -> Self::Fact;

    fn is_zero_value(&self, fact: &Self::Fact) -> bool {
        *fact == self.zero_value()
    }

    fn initial_seeds(&self) -> BTreeMap<Self::Node, FactSet<Self::Fact>>;

    fn normal_flow_function(&self, curr: &Self::Node, succ: &Self::Node)
        -> FlowFunctionPtr<Self::Fact>;

    fn call_flow_function(
        &self,
        call_site: &Self::Node,
        callee: &Self::Procedure,
    ) -> FlowFunctionPtr<Self::Fact>;

    fn return_flow_function(
        &self,
        call_site: &Self::Node,
        callee: &Self::Procedure,
        exit: &Self::Node,
        return_site: &Self::Node,
    ) -> FlowFunctionPtr<Self::Fact>;

    fn call_to_return_flow_function(
        &self,
        call_site: &Self::Node,
        return_site: &Self::Node,
        callees: &[Self::Procedure],
    ) -> FlowFunctionPtr<Self::Fact>;

    fn summary_flow_function(
        &self,
        _call_site: &Self::Node,
        _callee: &Self::Procedure,
    ) -> Option<FlowFunctionPtr<Self::Fact>> {
        None
    }

    fn apply_unbalanced_return_side_effects(
        &self,
        _callee: &Self::Procedure,
        _exit: &Self::Node,
        _exit_fact: &Self::Fact,
    ) {
    }

    fn solver_config(&self) -> SolverConfig {
        SolverConfig::default()
    }

    fn fact_label(&self, fact: &Self::Fact) -> String {
        format!("{fact:?}")
    }

    /// Report over the final results; a fact holds where its value is `Bottom`
    fn emit_text_report(
        &self,
        _results: &SolverResults<'_, Self::Node, Self::Fact, BinaryDomain>,
        out: &mut dyn Write,
    ) -> fmt::Result {
        writeln!(out, "No text report available!")
    }
}

/// Runs an [`IfdsProblem`] through the IDE solver
///
/// Every edge function is the identity and every seed is `Bottom`, so a fact
/// holds at a node exactly when its computed value there is `Bottom`.
#[derive(Debug, Clone)]
pub struct IfdsProblemAdapter<P> {
    problem: P,
}

impl<P: IfdsProblem> IfdsProblemAdapter<P> {
    pub fn new(problem: P) -> Self {
        Self { problem }
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn into_inner(self) -> P {
        self.problem
    }
}

impl<P: IfdsProblem> IdeProblem for IfdsProblemAdapter<P> {
    type Node = P::Node;
    type Fact = P::Fact;
    type Procedure = P::Procedure;
    type Value = BinaryDomain;

    fn zero_value(&self) -> P::Fact {
        self.problem.zero_value()
    }

    fn is_zero_value(&self, fact: &P::Fact) -> bool {
        self.problem.is_zero_value(fact)
    }

    fn initial_seeds(&self) -> InitialSeeds<P::Node, P::Fact, BinaryDomain> {
        let mut seeds = InitialSeeds::new();
        for (node, facts) in self.problem.initial_seeds() {
            if facts.is_empty() {
                seeds.add_seed(node.clone(), self.problem.zero_value(), BinaryDomain::Bottom);
            }
            for fact in facts {
                seeds.add_seed(node.clone(), fact, BinaryDomain::Bottom);
            }
        }
        seeds
    }

    fn normal_flow_function(&self, curr: &P::Node, succ: &P::Node) -> FlowFunctionPtr<P::Fact> {
        self.problem.normal_flow_function(curr, succ)
    }

    fn call_flow_function(
        &self,
        call_site: &P::Node,
        callee: &P::Procedure,
    ) -> FlowFunctionPtr<P::Fact> {
        self.problem.call_flow_function(call_site, callee)
    }

    fn return_flow_function(
        &self,
        call_site: &P::Node,
        callee: &P::Procedure,
        exit: &P::Node,
        return_site: &P::Node,
    ) -> FlowFunctionPtr<P::Fact> {
        self.problem
            .return_flow_function(call_site, callee, exit, return_site)
    }

    fn call_to_return_flow_function(
        &self,
        call_site: &P::Node,
        return_site: &P::Node,
        callees: &[P::Procedure],
    ) -> FlowFunctionPtr<P::Fact> {
        self.problem
            .call_to_return_flow_function(call_site, return_site, callees)
    }

    fn summary_flow_function(
        &self,
        call_site: &P::Node,
        callee: &P::Procedure,
    ) -> Option<FlowFunctionPtr<P::Fact>> {
        self.problem.summary_flow_function(call_site, callee)
    }

    fn normal_edge_function(
        &self,
        _curr: &P::Node,
        _curr_fact: &P::Fact,
        _succ: &P::Node,
        _succ_fact: &P::Fact,
    ) -> EdgeFunction<BinaryDomain> {
        EdgeFunction::Identity
    }

    fn call_edge_function(
        &self,
        _call_site: &P::Node,
        _src_fact: &P::Fact,
        _callee: &P::Procedure,
        _dest_fact: &P::Fact,
    ) -> EdgeFunction<BinaryDomain> {
        EdgeFunction::Identity
    }

    fn return_edge_function(
        &self,
        _call_site: &P::Node,
        _callee: &P::Procedure,
        _exit: &P::Node,
        _exit_fact: &P::Fact,
        _return_site: &P::Node,
        _return_fact: &P::Fact,
    ) -> EdgeFunction<BinaryDomain> {
        EdgeFunction::Identity
    }

    fn call_to_return_edge_function(
        &self,
        _call_site: &P::Node,
        _call_fact: &P::Fact,
        _return_site: &P::Node,
        _return_fact: &P::Fact,
        _callees: &[P::Procedure],
    ) -> EdgeFunction<BinaryDomain> {
        EdgeFunction::Identity
    }

    fn apply_unbalanced_return_side_effects(
        &self,
        callee: &P::Procedure,
        exit: &P::Node,
        exit_fact: &P::Fact,
    ) {
        self.problem
            .apply_unbalanced_return_side_effects(callee, exit, exit_fact)
    }

    fn solver_config(&self) -> SolverConfig {
        self.problem.solver_config()
    }

    fn fact_label(&self, fact: &P::Fact) -> String {
        self.problem.fact_label(fact)
    }

    fn emit_text_report(
        &self,
        results: &SolverResults<'_, P::Node, P::Fact, BinaryDomain>,
        out: &mut dyn Write,
    ) -> fmt::Result {
        self.problem.emit_text_report(results, out)
    }
}
