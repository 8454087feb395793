//! Flow/edge function cache
//!
//! Memoises every flow and edge function the solver asks the problem for,
//! keyed by the full query tuple. The same transformer is typically queried
//! once per incoming fact, so without the cache a problem would rebuild it
//! over and over. Cache misses and hits are counted per [`FunctionKind`] for
//! diagnostics; nothing in the solver depends on them.

use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::special_summaries::SpecialSummaries;
use super::statistics::{CacheStatistics, FunctionKind};
use crate::features::ifds_ide::domain::flow_function::ZeroedFlowFunction;
use crate::features::ifds_ide::domain::{EdgeFunction, FlowFunctionPtr};
use crate::features::ifds_ide::ports::IdeProblem;

type N<P> = <P as IdeProblem>::Node;
type D<P> = <P as IdeProblem>::Fact;
type M<P> = <P as IdeProblem>::Procedure;
type EF<P> = EdgeFunction<<P as IdeProblem>::Value>;

/// Who supplied the summary flow function for a (call site, callee) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SummaryOrigin {
    Problem,
    Registry,
}

pub struct FlowEdgeFunctionCache<'a, P: IdeProblem> {
    problem: &'a P,
    special_summaries: SpecialSummaries<M<P>, D<P>, P::Value>,
    auto_add_zero: bool,
    zero_value: D<P>,

    normal_flow: FxHashMap<(N<P>, N<P>), FlowFunctionPtr<D<P>>>,
    call_flow: FxHashMap<(N<P>, M<P>), FlowFunctionPtr<D<P>>>,
    return_flow: FxHashMap<(N<P>, M<P>, N<P>, N<P>), FlowFunctionPtr<D<P>>>,
    call_to_return_flow: FxHashMap<(N<P>, N<P>), FlowFunctionPtr<D<P>>>,
    summary_flow: FxHashMap<(N<P>, M<P>), Option<(FlowFunctionPtr<D<P>>, SummaryOrigin)>>,

    normal_edge: FxHashMap<(N<P>, D<P>, N<P>, D<P>), EF<P>>,
    call_edge: FxHashMap<(N<P>, D<P>, M<P>, D<P>), EF<P>>,
    return_edge: FxHashMap<(N<P>, M<P>, N<P>, D<P>, N<P>, D<P>), EF<P>>,
    call_to_return_edge: FxHashMap<(N<P>, D<P>, N<P>, D<P>), EF<P>>,
    summary_edge: FxHashMap<(N<P>, D<P>, M<P>, N<P>, D<P>), EF<P>>,

    stats: CacheStatistics,
}

/// Returns the cached value for `key`, building and inserting it on a miss
fn cached<K: Eq + Hash, V: Clone>(
    map: &mut FxHashMap<K, V>,
    key: K,
    record: impl FnOnce(bool),
    build: impl FnOnce() -> V,
) -> V {
    if let Some(value) = map.get(&key) {
        record(true);
        return value.clone();
    }
    record(false);
    let value = build();
    map.insert(key, value.clone());
    value
}

fn with_zero<T>(auto_add_zero: bool, zero: &T, flow: FlowFunctionPtr<T>) -> FlowFunctionPtr<T>
where
    T: Clone + Ord + Send + Sync + 'static,
{
    if auto_add_zero {
        Arc::new(ZeroedFlowFunction::new(flow, zero.clone()))
    } else {
        flow
    }
}

impl<'a, P: IdeProblem> FlowEdgeFunctionCache<'a, P> {
    pub fn new(
        problem: &'a P,
        special_summaries: SpecialSummaries<M<P>, D<P>, P::Value>,
        auto_add_zero: bool,
    ) -> Self {
        Self {
            problem,
            special_summaries,
            auto_add_zero,
            zero_value: problem.zero_value(),
            normal_flow: FxHashMap::default(),
            call_flow: FxHashMap::default(),
            return_flow: FxHashMap::default(),
            call_to_return_flow: FxHashMap::default(),
            summary_flow: FxHashMap::default(),
            normal_edge: FxHashMap::default(),
            call_edge: FxHashMap::default(),
            return_edge: FxHashMap::default(),
            call_to_return_edge: FxHashMap::default(),
            summary_edge: FxHashMap::default(),
            stats: CacheStatistics::default(),
        }
    }

    // ------------------------------------------------------------------
    // Flow functions
    // ------------------------------------------------------------------

    pub fn normal_flow_function(&mut self, curr: &N<P>, succ: &N<P>) -> FlowFunctionPtr<D<P>> {
        let problem = self.problem;
        cached(
            &mut self.normal_flow,
            (curr.clone(), succ.clone()),
            |hit| self.stats.record_flow(FunctionKind::Normal, hit),
            || {
                with_zero(
                    self.auto_add_zero,
                    &self.zero_value,
                    problem.normal_flow_function(curr, succ),
                )
            },
        )
    }

    pub fn call_flow_function(&mut self, call_site: &N<P>, callee: &M<P>) -> FlowFunctionPtr<D<P>> {
        let problem = self.problem;
        cached(
            &mut self.call_flow,
            (call_site.clone(), callee.clone()),
            |hit| self.stats.record_flow(FunctionKind::Call, hit),
            || {
                with_zero(
                    self.auto_add_zero,
                    &self.zero_value,
                    problem.call_flow_function(call_site, callee),
                )
            },
        )
    }

    pub fn return_flow_function(
        &mut self,
        call_site: &N<P>,
        callee: &M<P>,
        exit: &N<P>,
        return_site: &N<P>,
    ) -> FlowFunctionPtr<D<P>> {
        let problem = self.problem;
        cached(
            &mut self.return_flow,
            (
                call_site.clone(),
                callee.clone(),
                exit.clone(),
                return_site.clone(),
            ),
            |hit| self.stats.record_flow(FunctionKind::Return, hit),
            || {
                with_zero(
                    self.auto_add_zero,
                    &self.zero_value,
                    problem.return_flow_function(call_site, callee, exit, return_site),
                )
            },
        )
    }

    /// Keyed by (call site, return site); the callee set is a function of the call site
    pub fn call_to_return_flow_function(
        &mut self,
        call_site: &N<P>,
        return_site: &N<P>,
        callees: &[M<P>],
    ) -> FlowFunctionPtr<D<P>> {
        let problem = self.problem;
        cached(
            &mut self.call_to_return_flow,
            (call_site.clone(), return_site.clone()),
            |hit| self.stats.record_flow(FunctionKind::CallToReturn, hit),
            || {
                with_zero(
                    self.auto_add_zero,
                    &self.zero_value,
                    problem.call_to_return_flow_function(call_site, return_site, callees),
                )
            },
        )
    }

    /// Summary from the problem, else from the special-summaries registry;
    /// `None` means "analyse the callee"
    pub fn summary_flow_function(
        &mut self,
        call_site: &N<P>,
        callee: &M<P>,
    ) -> Option<FlowFunctionPtr<D<P>>> {
        self.summary_entry(call_site, callee).map(|(flow, _)| flow)
    }

    fn summary_entry(
        &mut self,
        call_site: &N<P>,
        callee: &M<P>,
    ) -> Option<(FlowFunctionPtr<D<P>>, SummaryOrigin)> {
        let problem = self.problem;
        let registry = &self.special_summaries;
        let (auto_add_zero, zero) = (self.auto_add_zero, &self.zero_value);
        cached(
            &mut self.summary_flow,
            (call_site.clone(), callee.clone()),
            |hit| self.stats.record_flow(FunctionKind::Summary, hit),
            || {
                problem
                    .summary_flow_function(call_site, callee)
                    .map(|flow| (flow, SummaryOrigin::Problem))
                    .or_else(|| {
                        registry
                            .flow_function(callee)
                            .map(|flow| (flow, SummaryOrigin::Registry))
                    })
                    .map(|(flow, origin)| (with_zero(auto_add_zero, zero, flow), origin))
            },
        )
    }

    // ------------------------------------------------------------------
    // Edge functions
    // ------------------------------------------------------------------

    pub fn normal_edge_function(
        &mut self,
        curr: &N<P>,
        curr_fact: &D<P>,
        succ: &N<P>,
        succ_fact: &D<P>,
    ) -> EF<P> {
        let problem = self.problem;
        cached(
            &mut self.normal_edge,
            (
                curr.clone(),
                curr_fact.clone(),
                succ.clone(),
                succ_fact.clone(),
            ),
            |hit| self.stats.record_edge(FunctionKind::Normal, hit),
            || problem.normal_edge_function(curr, curr_fact, succ, succ_fact),
        )
    }

    pub fn call_edge_function(
        &mut self,
        call_site: &N<P>,
        src_fact: &D<P>,
        callee: &M<P>,
        dest_fact: &D<P>,
    ) -> EF<P> {
        let problem = self.problem;
        cached(
            &mut self.call_edge,
            (
                call_site.clone(),
                src_fact.clone(),
                callee.clone(),
                dest_fact.clone(),
            ),
            |hit| self.stats.record_edge(FunctionKind::Call, hit),
            || problem.call_edge_function(call_site, src_fact, callee, dest_fact),
        )
    }

    pub fn return_edge_function(
        &mut self,
        call_site: &N<P>,
        callee: &M<P>,
        exit: &N<P>,
        exit_fact: &D<P>,
        return_site: &N<P>,
        return_fact: &D<P>,
    ) -> EF<P> {
        let problem = self.problem;
        cached(
            &mut self.return_edge,
            (
                call_site.clone(),
                callee.clone(),
                exit.clone(),
                exit_fact.clone(),
                return_site.clone(),
                return_fact.clone(),
            ),
            |hit| self.stats.record_edge(FunctionKind::Return, hit),
            || {
                problem.return_edge_function(
                    call_site,
                    callee,
                    exit,
                    exit_fact,
                    return_site,
                    return_fact,
                )
            },
        )
    }

    pub fn call_to_return_edge_function(
        &mut self,
        call_site: &N<P>,
        call_fact: &D<P>,
        return_site: &N<P>,
        return_fact: &D<P>,
        callees: &[M<P>],
    ) -> EF<P> {
        let problem = self.problem;
        cached(
            &mut self.call_to_return_edge,
            (
                call_site.clone(),
                call_fact.clone(),
                return_site.clone(),
                return_fact.clone(),
            ),
            |hit| self.stats.record_edge(FunctionKind::CallToReturn, hit),
            || {
                problem.call_to_return_edge_function(
                    call_site,
                    call_fact,
                    return_site,
                    return_fact,
                    callees,
                )
            },
        )
    }

    /// Edge function paired with the summary flow function of `callee`
    pub fn summary_edge_function(
        &mut self,
        call_site: &N<P>,
        call_fact: &D<P>,
        callee: &M<P>,
        return_site: &N<P>,
        return_fact: &D<P>,
    ) -> EF<P> {
        let origin = self
            .summary_flow
            .get(&(call_site.clone(), callee.clone()))
            .and_then(|entry| entry.as_ref().map(|(_, origin)| *origin));
        let problem = self.problem;
        let registry = &self.special_summaries;
        cached(
            &mut self.summary_edge,
            (
                call_site.clone(),
                call_fact.clone(),
                callee.clone(),
                return_site.clone(),
                return_fact.clone(),
            ),
            |hit| self.stats.record_edge(FunctionKind::Summary, hit),
            || match origin {
                Some(SummaryOrigin::Registry) => registry
                    .edge_function(callee)
                    .unwrap_or(EdgeFunction::Identity),
                _ => problem.summary_edge_function(call_site, call_fact, return_site, return_fact),
            },
        )
    }

    pub fn statistics(&self) -> &CacheStatistics {
        &self.stats
    }

    pub fn special_summaries(&self) -> &SpecialSummaries<M<P>, D<P>, P::Value> {
        &self.special_summaries
    }
}
