/*
 * IDE Solver (Interprocedural Distributive Environment Solver)
 *
 * Tabulation over the exploded supergraph, in two phases:
 *
 * Phase I  (path edges):
 *   - seed <d, sp, d> for every initial seed (zero fact added where missing)
 *   - pop path edges from the worklist and dispatch on the target node:
 *     call site → callee expansion, summary reuse, call-to-return flow
 *     exit      → end summary, return to every recorded caller
 *     otherwise → normal flow to each successor
 *   - propagate() joins the new edge function into the jump-function table
 *     and only re-enqueues when the joined function changed
 *
 * Phase II (values, see value_computation.rs):
 *   (i)  push seed values down to call sites and callee start points
 *   (ii) evaluate every jump function ending at a non-call, non-start node
 *
 * Composition convention: `f.compose_with(g)` is "f, then g".
 *
 * References:
 * - Reps, Horwitz, Sagiv (1995): "Precise Interprocedural Dataflow Analysis via Graph Reachability"
 * - Sagiv, Reps, Horwitz (1996): "Precise Interprocedural Dataflow Analysis with Applications to Constant Propagation"
 * - Naeem, Lhoták, Rodriguez (2010): "Practical Extensions to the IFDS Algorithm"
 */

mod value_computation;

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt::Write;
use std::time::Instant;

use tracing::{debug, info};

use super::edge_history::{EdgeHistory, EsgEdgeKind};
use super::esg_dot::write_esg_dot;
use super::flow_edge_cache::FlowEdgeFunctionCache;
use super::jump_functions::JumpFunctions;
use super::solver_results::{write_results, OwningSolverResults, SolverResults};
use super::special_summaries::SpecialSummaries;
use super::statistics::{CacheStatistics, SolverStatistics};
use super::summary_tables::{EndSummaryTable, IncomingTable};
use crate::config::{DotConfig, SolverConfig, Validatable, WorklistOrder};
use crate::errors::{IfdsError, Result};
use crate::features::ifds_ide::domain::{EdgeFunction, FactSet, IdeValue, InitialSeeds, PathEdge};
use crate::features::ifds_ide::ports::{Icfg, IdeProblem, IfdsProblemAdapter};
use crate::shared::Table;

type N<P> = <P as IdeProblem>::Node;
type D<P> = <P as IdeProblem>::Fact;
type M<P> = <P as IdeProblem>::Procedure;
type L<P> = <P as IdeProblem>::Value;
type EF<P> = EdgeFunction<<P as IdeProblem>::Value>;

/// IDE tabulation solver
///
/// Usage:
/// ```text
/// let mut solver = IdeSolver::new(&problem, &icfg)?;
/// solver.solve()?;
/// let x = solver.solver_results().result_at(&node, &fact);
/// ```
pub struct IdeSolver<'a, P, I>
where
    P: IdeProblem,
    I: Icfg<Node = P::Node, Procedure = P::Procedure>,
{
    problem: &'a P,
    icfg: &'a I,
    config: SolverConfig,
    zero_value: D<P>,

    cached_flow_edge_functions: FlowEdgeFunctionCache<'a, P>,

    jump_functions: JumpFunctions<N<P>, D<P>, L<P>>,
    end_summaries: EndSummaryTable<N<P>, D<P>, L<P>>,
    incoming: IncomingTable<N<P>, D<P>>,

    /// (node, fact) → value; absent means top
    value_table: Table<N<P>, D<P>, L<P>>,

    initial_seeds: InitialSeeds<N<P>, D<P>, L<P>>,
    unbalanced_return_sites: BTreeSet<N<P>>,

    path_edge_worklist: VecDeque<PathEdge<N<P>, D<P>>>,
    value_worklist: VecDeque<(N<P>, D<P>)>,

    history: EdgeHistory<N<P>, D<P>, L<P>>,
    stats: SolverStatistics,
    solved: bool,
}

/// IFDS problems run through the IDE solver over `BinaryDomain`
pub type IfdsSolver<'a, P, I> = IdeSolver<'a, IfdsProblemAdapter<P>, I>;

impl<'a, P, I> IdeSolver<'a, P, I>
where
    P: IdeProblem,
    I: Icfg<Node = P::Node, Procedure = P::Procedure>,
{
    /// Solver configured by `problem.solver_config()`
    pub fn new(problem: &'a P, icfg: &'a I) -> Result<Self> {
        Self::with_config(problem, icfg, problem.solver_config())
    }

    pub fn with_config(problem: &'a P, icfg: &'a I, config: SolverConfig) -> Result<Self> {
        Self::with_special_summaries(problem, icfg, config, SpecialSummaries::new())
    }

    /// Solver with an explicit special-summaries registry for this run
    pub fn with_special_summaries(
        problem: &'a P,
        icfg: &'a I,
        config: SolverConfig,
        special_summaries: SpecialSummaries<M<P>, D<P>, L<P>>,
    ) -> Result<Self> {
        config.validate()?;
        debug!(
            config = ?config,
            special_summaries = special_summaries.len(),
            "Creating IDE solver"
        );

        Ok(Self {
            problem,
            icfg,
            zero_value: problem.zero_value(),
            cached_flow_edge_functions: FlowEdgeFunctionCache::new(
                problem,
                special_summaries,
                config.auto_add_zero,
            ),
            jump_functions: JumpFunctions::new(),
            end_summaries: EndSummaryTable::new(),
            incoming: IncomingTable::new(),
            value_table: Table::new(),
            initial_seeds: problem.initial_seeds(),
            unbalanced_return_sites: BTreeSet::new(),
            path_edge_worklist: VecDeque::new(),
            value_worklist: VecDeque::new(),
            history: EdgeHistory::new(config.emit_esg),
            stats: SolverStatistics::default(),
            solved: false,
            config,
        })
    }

    /// Runs both phases to completion
    pub fn solve(&mut self) -> Result<()> {
        self.solve_until(|| false)
    }

    /// Runs the solver, checking `should_stop` before every path-edge dequeue
    ///
    /// On interruption the tables hold a partial (unsound) fixed point and the
    /// solver cannot be resumed.
    pub fn solve_until(&mut self, mut should_stop: impl FnMut() -> bool) -> Result<()> {
        if self.solved {
            return Err(IfdsError::AlreadySolved);
        }
        self.solved = true;

        info!(
            seeds = self.initial_seeds.count_initial_seeds(),
            "IDE solver: phase I (path-edge propagation)"
        );
        let start = Instant::now();
        self.submit_initial_seeds();
        self.forward_tabulate(&mut should_stop)?;
        self.stats.phase_one_time_ms = start.elapsed().as_millis() as u64;

        if self.config.compute_values {
            info!("IDE solver: phase II (value computation)");
            let start = Instant::now();
            self.compute_values()?;
            self.stats.phase_two_time_ms = start.elapsed().as_millis() as u64;
        }

        info!(
            path_edges = self.stats.path_edges_processed,
            jump_functions = self.jump_functions.len(),
            values = self.value_table.len(),
            phase_one_ms = self.stats.phase_one_time_ms,
            phase_two_ms = self.stats.phase_two_time_ms,
            "IDE solver finished"
        );
        Ok(())
    }

    /// Adds the zero fact (at bottom) to every seed node, then seeds `<d, sp, d>`
    fn submit_initial_seeds(&mut self) {
        let zero = self.zero_value.clone();
        let bottom = <L<P> as IdeValue>::bottom();
        for (_, facts) in self.initial_seeds.nodes_mut() {
            facts.entry(zero.clone()).or_insert_with(|| bottom.clone());
        }

        let seeds: Vec<(N<P>, D<P>)> = self
            .initial_seeds
            .iter()
            .map(|(n, d, _)| (n.clone(), d.clone()))
            .collect();
        debug!(count = seeds.len(), "Submitting initial seeds");
        for (start_point, fact) in seeds {
            self.propagate(
                fact.clone(),
                start_point,
                fact,
                EdgeFunction::Identity,
                None,
                false,
            );
        }
    }

    fn forward_tabulate(&mut self, should_stop: &mut impl FnMut() -> bool) -> Result<()> {
        let mut processed = 0;
        loop {
            if self.path_edge_worklist.is_empty() {
                return Ok(());
            }
            if should_stop() {
                info!(processed, "IDE solver interrupted");
                return Err(IfdsError::Interrupted { processed });
            }
            let next = match self.config.worklist_order {
                WorklistOrder::Lifo => self.path_edge_worklist.pop_back(),
                WorklistOrder::Fifo => self.path_edge_worklist.pop_front(),
            };
            if let Some(edge) = next {
                self.path_edge_processing_task(edge)?;
                processed += 1;
            }
        }
    }

    fn path_edge_processing_task(&mut self, edge: PathEdge<N<P>, D<P>>) -> Result<()> {
        self.stats.path_edges_processed += 1;
        hot_trace!(edge = %edge, "Processing path edge");

        if self.icfg.is_call_site(&edge.target) {
            self.process_call(&edge);
        } else {
            if self.icfg.is_exit(&edge.target) {
                self.process_exit(&edge)?;
            }
            if !self.icfg.successors_of(&edge.target).is_empty() {
                self.process_normal_flow(&edge);
            }
        }
        Ok(())
    }

    /// Current jump function of a path edge (AllTop if absent)
    fn jump_function(&self, edge: &PathEdge<N<P>, D<P>>) -> EF<P> {
        self.jump_functions
            .function(&edge.source_fact, &edge.target, &edge.target_fact)
            .cloned()
            .unwrap_or(EdgeFunction::AllTop)
    }

    /// Joins `function` into `<source_fact, target, target_fact>` and enqueues
    /// the path edge if that changed the stored function
    fn propagate(
        &mut self,
        source_fact: D<P>,
        target: N<P>,
        target_fact: D<P>,
        function: EF<P>,
        related_call_site: Option<&N<P>>,
        is_unbalanced_return: bool,
    ) {
        let old = self
            .jump_functions
            .function(&source_fact, &target, &target_fact)
            .cloned()
            .unwrap_or(EdgeFunction::AllTop);
        let merged = old.join_with(&function);
        if merged == old {
            return;
        }

        hot_trace!(
            source_fact = ?source_fact,
            target = ?target,
            target_fact = ?target_fact,
            function = %merged,
            call_site = ?related_call_site,
            unbalanced = is_unbalanced_return,
            "New path edge"
        );
        self.jump_functions.add_function(
            source_fact.clone(),
            target.clone(),
            target_fact.clone(),
            merged,
        );
        self.path_edge_worklist
            .push_back(PathEdge::new(source_fact, target, target_fact));
        self.stats.path_edges_propagated += 1;
    }

    fn save_edges(&mut self, from: &N<P>, to: &N<P>, source_fact: &D<P>, targets: &FactSet<D<P>>, kind: EsgEdgeKind) {
        if self.config.record_edges {
            self.history
                .save_edges(from, to, source_fact, targets, kind);
        }
    }

    fn save_edge_function(&mut self, from: &N<P>, source_fact: &D<P>, to: &N<P>, target_fact: &D<P>, function: &EF<P>) {
        if self.config.record_edges {
            self.history
                .save_edge_function(from, source_fact, to, target_fact, function);
        }
    }

    // ------------------------------------------------------------------
    // Path-edge handlers
    // ------------------------------------------------------------------

    /// Normal flow: (d1, n, d2) → (d1, succ, d3) for each successor
    fn process_normal_flow(&mut self, edge: &PathEdge<N<P>, D<P>>) {
        self.stats.normal_flows_processed += 1;
        let (d1, n, d2) = (&edge.source_fact, &edge.target, &edge.target_fact);
        let f = self.jump_function(edge);

        for succ in self.icfg.successors_of(n) {
            let flow = self.cached_flow_edge_functions.normal_flow_function(n, &succ);
            let targets = flow.compute_targets(d2);
            self.save_edges(n, &succ, d2, &targets, EsgEdgeKind::Normal);
            if self.problem.is_zero_value(d2) {
                self.stats.gen_facts += targets.iter().filter(|d3| *d3 != d2).count();
            }

            for d3 in targets {
                let g = self
                    .cached_flow_edge_functions
                    .normal_edge_function(n, d2, &succ, &d3);
                self.save_edge_function(n, d2, &succ, &d3, &g);
                let f_prime = f.compose_with(&g);
                self.propagate(d1.clone(), succ.clone(), d3, f_prime, None, false);
            }
        }
    }

    /// Call site: descend into callees (or apply their summaries) and take
    /// the call-to-return edges
    fn process_call(&mut self, edge: &PathEdge<N<P>, D<P>>) {
        self.stats.calls_processed += 1;
        let (d1, n, d2) = (&edge.source_fact, &edge.target, &edge.target_fact);
        let f = self.jump_function(edge);
        let return_sites = self.icfg.return_sites_of_call_at(n);
        let callees = self.icfg.callees_of_call_at(n);
        let mut resolved_callees = 0;

        for callee in &callees {
            if let Some(summary) = self
                .cached_flow_edge_functions
                .summary_flow_function(n, callee)
            {
                resolved_callees += 1;
                self.stats.special_summary_applications += 1;
                let targets = summary.compute_targets(d2);
                for return_site in &return_sites {
                    self.save_edges(n, return_site, d2, &targets, EsgEdgeKind::Summary);
                    for d3 in &targets {
                        let summary_edge = self
                            .cached_flow_edge_functions
                            .summary_edge_function(n, d2, callee, return_site, d3);
                        self.save_edge_function(n, d2, return_site, d3, &summary_edge);
                        self.propagate(
                            d1.clone(),
                            return_site.clone(),
                            d3.clone(),
                            f.compose_with(&summary_edge),
                            Some(n),
                            false,
                        );
                    }
                }
                continue;
            }

            let start_points = self.icfg.start_points_of(callee);
            if start_points.is_empty() {
                self.stats.calls_without_callee_body += 1;
                debug!(call_site = ?n, callee = ?callee, "Callee has no body; only call-to-return flow applies");
                continue;
            }
            resolved_callees += 1;

            let call_flow = self.cached_flow_edge_functions.call_flow_function(n, callee);
            let callee_facts = call_flow.compute_targets(d2);
            for start_point in &start_points {
                self.save_edges(n, start_point, d2, &callee_facts, EsgEdgeKind::Call);
                for d3 in &callee_facts {
                    // Callee context <d3, sp, d3>, analysed once however many callers reach it
                    self.propagate(
                        d3.clone(),
                        start_point.clone(),
                        d3.clone(),
                        EdgeFunction::Identity,
                        Some(n),
                        false,
                    );
                    self.incoming
                        .add(start_point.clone(), d3.clone(), n.clone(), d2.clone());

                    for (exit, d4, callee_summary) in self.end_summaries.get(start_point, d3) {
                        self.apply_end_summary(
                            edge,
                            &f,
                            callee,
                            d3,
                            &exit,
                            &d4,
                            &callee_summary,
                            &return_sites,
                        );
                    }
                }
            }
        }

        let kind = if !callees.is_empty() && resolved_callees == 0 {
            EsgEdgeKind::SkipUnknownFunction
        } else {
            EsgEdgeKind::CallToReturn
        };
        for return_site in &return_sites {
            let flow = self
                .cached_flow_edge_functions
                .call_to_return_flow_function(n, return_site, &callees);
            let targets = flow.compute_targets(d2);
            self.save_edges(n, return_site, d2, &targets, kind);
            for d3 in targets {
                let edge_fn = self
                    .cached_flow_edge_functions
                    .call_to_return_edge_function(n, d2, return_site, &d3, &callees);
                self.save_edge_function(n, d2, return_site, &d3, &edge_fn);
                self.propagate(
                    d1.clone(),
                    return_site.clone(),
                    d3,
                    f.compose_with(&edge_fn),
                    Some(n),
                    false,
                );
            }
        }
    }

    /// Reuses an existing end summary of `(sp, d3)` at the call edge `edge`
    fn apply_end_summary(
        &mut self,
        edge: &PathEdge<N<P>, D<P>>,
        f: &EF<P>,
        callee: &M<P>,
        d3: &D<P>,
        exit: &N<P>,
        d4: &D<P>,
        callee_summary: &EF<P>,
        return_sites: &[N<P>],
    ) {
        let (d1, n, d2) = (&edge.source_fact, &edge.target, &edge.target_fact);
        for return_site in return_sites {
            let return_flow = self
                .cached_flow_edge_functions
                .return_flow_function(n, callee, exit, return_site);
            let return_facts = return_flow.compute_targets(d4);
            self.save_edges(exit, return_site, d4, &return_facts, EsgEdgeKind::Return);

            for d5 in return_facts {
                let f4 = self
                    .cached_flow_edge_functions
                    .call_edge_function(n, d2, callee, d3);
                let f5 = self
                    .cached_flow_edge_functions
                    .return_edge_function(n, callee, exit, d4, return_site, &d5);
                let f_prime = f4.compose_with(callee_summary).compose_with(&f5);
                self.stats.summary_reuses += 1;
                debug!(call_site = ?n, callee = ?callee, exit = ?exit, "Reusing end summary");
                self.propagate(
                    d1.clone(),
                    return_site.clone(),
                    d5,
                    f.compose_with(&f_prime),
                    Some(n),
                    false,
                );
            }
        }
    }

    /// Exit: record the end summary and return into every recorded caller
    fn process_exit(&mut self, edge: &PathEdge<N<P>, D<P>>) -> Result<()> {
        self.stats.exits_processed += 1;
        let (d1, n, d2) = (&edge.source_fact, &edge.target, &edge.target_fact);
        let f = self.jump_function(edge);
        let procedure = self
            .icfg
            .procedure_of(n)
            .ok_or_else(|| IfdsError::missing_procedure(n))?;

        // call site → facts that held there when entering <d1, sp>
        let mut callers: BTreeMap<N<P>, FactSet<D<P>>> = BTreeMap::new();
        for start_point in self.icfg.start_points_of(&procedure) {
            self.end_summaries.insert(
                start_point.clone(),
                d1.clone(),
                n.clone(),
                d2.clone(),
                f.clone(),
            );
            for (call_site, facts) in self.incoming.get(&start_point, d1) {
                callers.entry(call_site).or_default().extend(facts);
            }
        }

        for (call_site, call_facts) in &callers {
            for return_site in self.icfg.return_sites_of_call_at(call_site) {
                let return_flow = self
                    .cached_flow_edge_functions
                    .return_flow_function(call_site, &procedure, n, &return_site);
                let return_facts = return_flow.compute_targets(d2);
                self.save_edges(n, &return_site, d2, &return_facts, EsgEdgeKind::Return);

                for d4 in call_facts {
                    for d5 in &return_facts {
                        let f4 = self
                            .cached_flow_edge_functions
                            .call_edge_function(call_site, d4, &procedure, d1);
                        let f5 = self.cached_flow_edge_functions.return_edge_function(
                            call_site,
                            &procedure,
                            n,
                            d2,
                            &return_site,
                            d5,
                        );
                        self.save_edge_function(n, d2, &return_site, d5, &f5);
                        let f_prime = f4.compose_with(&f).compose_with(&f5);

                        // Every caller-side context that explains d4 at the call site
                        let mut caller_contexts: Vec<(D<P>, EF<P>)> = self
                            .jump_functions
                            .reverse_lookup(call_site, d4)
                            .map(|entries| {
                                entries
                                    .iter()
                                    .map(|(d3, f3)| (d3.clone(), f3.clone()))
                                    .collect()
                            })
                            .unwrap_or_default();
                        caller_contexts.sort_by(|a, b| a.0.cmp(&b.0));

                        for (d3, f3) in caller_contexts {
                            if f3.is_all_top() {
                                continue;
                            }
                            self.propagate(
                                d3,
                                return_site.clone(),
                                d5.clone(),
                                f3.compose_with(&f_prime),
                                Some(call_site),
                                false,
                            );
                        }
                    }
                }
            }
        }

        if self.config.follow_returns_past_seeds
            && callers.is_empty()
            && self.problem.is_zero_value(d1)
        {
            self.process_unbalanced_return(&procedure, n, d2, &f);
        }
        Ok(())
    }

    /// Zero-fact exit with no recorded caller: return to every static caller
    fn process_unbalanced_return(&mut self, procedure: &M<P>, exit: &N<P>, d2: &D<P>, f: &EF<P>) {
        let static_callers = self.icfg.callers_of(procedure);
        if static_callers.is_empty() {
            debug!(procedure = ?procedure, exit = ?exit, "Unbalanced return without callers");
            self.problem
                .apply_unbalanced_return_side_effects(procedure, exit, d2);
            return;
        }

        for call_site in &static_callers {
            self.stats.unbalanced_returns += 1;
            debug!(procedure = ?procedure, call_site = ?call_site, "Following unbalanced return");
            for return_site in self.icfg.return_sites_of_call_at(call_site) {
                let return_flow = self
                    .cached_flow_edge_functions
                    .return_flow_function(call_site, procedure, exit, &return_site);
                let return_facts = return_flow.compute_targets(d2);
                self.save_edges(exit, &return_site, d2, &return_facts, EsgEdgeKind::Return);

                for d5 in return_facts {
                    let f5 = self.cached_flow_edge_functions.return_edge_function(
                        call_site,
                        procedure,
                        exit,
                        d2,
                        &return_site,
                        &d5,
                    );
                    self.propagate(
                        self.zero_value.clone(),
                        return_site.clone(),
                        d5,
                        f.compose_with(&f5),
                        Some(call_site),
                        true,
                    );
                    self.unbalanced_return_sites.insert(return_site.clone());
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Query surface
    // ------------------------------------------------------------------

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Seeds as submitted (with the zero fact once `solve()` has run)
    pub fn initial_seeds(&self) -> &InitialSeeds<N<P>, D<P>, L<P>> {
        &self.initial_seeds
    }

    pub fn jump_functions(&self) -> &JumpFunctions<N<P>, D<P>, L<P>> {
        &self.jump_functions
    }

    pub fn end_summaries(&self) -> &EndSummaryTable<N<P>, D<P>, L<P>> {
        &self.end_summaries
    }

    pub fn incoming(&self) -> &IncomingTable<N<P>, D<P>> {
        &self.incoming
    }

    pub fn unbalanced_return_sites(&self) -> &BTreeSet<N<P>> {
        &self.unbalanced_return_sites
    }

    pub fn statistics(&self) -> &SolverStatistics {
        &self.stats
    }

    pub fn cache_statistics(&self) -> &CacheStatistics {
        self.cached_flow_edge_functions.statistics()
    }

    pub fn edge_history(&self) -> &EdgeHistory<N<P>, D<P>, L<P>> {
        &self.history
    }

    /// Facts with a path edge ending at `node` (available without phase II)
    pub fn facts_at(&self, node: &N<P>) -> FactSet<D<P>> {
        self.jump_functions
            .lookup_by_target(node)
            .map(|table| table.cells().map(|(_, d2, _)| d2.clone()).collect())
            .unwrap_or_default()
    }

    pub fn solver_results(&self) -> SolverResults<'_, N<P>, D<P>, L<P>> {
        SolverResults::new(&self.value_table, &self.zero_value)
    }

    /// Moves the value table out; the solver keeps its other tables
    pub fn consume_solver_results(&mut self) -> OwningSolverResults<N<P>, D<P>, L<P>> {
        OwningSolverResults::new(
            std::mem::take(&mut self.value_table),
            self.zero_value.clone(),
        )
    }

    // ------------------------------------------------------------------
    // Dumps
    // ------------------------------------------------------------------

    /// Results grouped by procedure, labelled through the problem
    pub fn dump_results(&self, out: &mut impl Write) -> Result<()> {
        let problem = self.problem;
        write_results(
            &self.value_table,
            &self.zero_value,
            self.icfg,
            |d| problem.fact_label(d),
            |v| problem.value_label(v),
            out,
        )?;
        Ok(())
    }

    /// The problem's own report over the current value table
    pub fn emit_text_report(&self, out: &mut impl Write) -> Result<()> {
        self.problem.emit_text_report(&self.solver_results(), out)?;
        Ok(())
    }

    pub fn dump_jump_functions(&self, out: &mut impl Write) -> Result<()> {
        self.jump_functions.dump(out)?;
        Ok(())
    }

    pub fn dump_end_summaries(&self, out: &mut impl Write) -> Result<()> {
        self.end_summaries.dump(out)?;
        Ok(())
    }

    pub fn dump_incoming(&self, out: &mut impl Write) -> Result<()> {
        self.incoming.dump(out)?;
        Ok(())
    }

    pub fn dump_intra_path_edges(&self, out: &mut impl Write) -> Result<()> {
        self.require_edge_recording()?;
        self.history.dump_intra(out)?;
        Ok(())
    }

    pub fn dump_inter_path_edges(&self, out: &mut impl Write) -> Result<()> {
        self.require_edge_recording()?;
        self.history.dump_inter(out)?;
        Ok(())
    }

    /// Exploded supergraph as DOT (needs `record_edges`; labels need `emit_esg`)
    pub fn emit_esg_as_dot(&self, out: &mut impl Write, config: &DotConfig) -> Result<()> {
        self.require_edge_recording()?;
        config.validate()?;
        let problem = self.problem;
        write_esg_dot(
            out,
            self.icfg,
            &self.history,
            &self.zero_value,
            |d| problem.fact_label(d),
            config,
        )?;
        Ok(())
    }

    fn require_edge_recording(&self) -> Result<()> {
        if self.config.record_edges {
            Ok(())
        } else {
            Err(IfdsError::EdgeRecordingDisabled)
        }
    }
}
