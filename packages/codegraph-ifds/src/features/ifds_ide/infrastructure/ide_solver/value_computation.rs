//! Phase II: value computation
//!
//! (i)  Seed values (plus `top` at unbalanced return sites) are pushed through
//!      the jump functions to the call sites of the seed's procedure, and from
//!      each call site into the callees' start points, until no value changes.
//! (ii) Every non-call, non-start node is then evaluated once:
//!      `val(n, d) ⊔= f(val(sp, d'))` for each jump function `<d', n, d> → f`.

use std::collections::BTreeMap;

use super::{IdeSolver, D, EF, L, N};
use crate::config::WorklistOrder;
use crate::errors::{IfdsError, Result};
use crate::features::ifds_ide::domain::IdeValue;
use crate::features::ifds_ide::ports::{Icfg, IdeProblem};

impl<'a, P, I> IdeSolver<'a, P, I>
where
    P: IdeProblem,
    I: Icfg<Node = P::Node, Procedure = P::Procedure>,
{
    pub(super) fn compute_values(&mut self) -> Result<()> {
        // Phase II(i)
        let mut all_seeds: BTreeMap<N<P>, BTreeMap<D<P>, L<P>>> = BTreeMap::new();
        for (node, fact, value) in self.initial_seeds.iter() {
            all_seeds
                .entry(node.clone())
                .or_default()
                .insert(fact.clone(), value.clone());
        }
        for return_site in &self.unbalanced_return_sites {
            all_seeds.entry(return_site.clone()).or_insert_with(|| {
                BTreeMap::from([(self.zero_value.clone(), <L<P> as IdeValue>::top())])
            });
        }

        for (start_point, facts) in all_seeds {
            for (fact, value) in facts {
                let joined = self.val(&start_point, &fact).join(&value);
                self.set_val(&start_point, &fact, joined);
                self.value_worklist.push_back((start_point.clone(), fact));
            }
        }

        loop {
            let next = match self.config.worklist_order {
                WorklistOrder::Lifo => self.value_worklist.pop_back(),
                WorklistOrder::Fifo => self.value_worklist.pop_front(),
            };
            let Some((node, fact)) = next else {
                break;
            };
            self.value_propagation_task(&node, &fact)?;
        }

        // Phase II(ii)
        for node in self.icfg.all_non_call_start_nodes() {
            self.value_computation_task(&node)?;
        }
        Ok(())
    }

    fn value_propagation_task(&mut self, node: &N<P>, fact: &D<P>) -> Result<()> {
        self.stats.value_propagations += 1;
        if self.icfg.is_start_point(node)
            || self.initial_seeds.contains_initial_seeds_for(node)
            || self.unbalanced_return_sites.contains(node)
        {
            self.propagate_value_at_start(node, fact)?;
        }
        if self.icfg.is_call_site(node) {
            self.propagate_value_at_call(node, fact);
        }
        Ok(())
    }

    /// From a start context to every call site of the same procedure
    fn propagate_value_at_start(&mut self, node: &N<P>, fact: &D<P>) -> Result<()> {
        let procedure = self
            .icfg
            .procedure_of(node)
            .ok_or_else(|| IfdsError::missing_procedure(node))?;
        let value = self.val(node, fact);

        for call_site in self.icfg.calls_from_within(&procedure) {
            let mut reached: Vec<(D<P>, EF<P>)> = self
                .jump_functions
                .forward_lookup(fact, &call_site)
                .map(|entries| {
                    entries
                        .iter()
                        .map(|(d, f)| (d.clone(), f.clone()))
                        .collect()
                })
                .unwrap_or_default();
            reached.sort_by(|a, b| a.0.cmp(&b.0));

            for (d_prime, f_prime) in reached {
                let target_value = f_prime.compute_target(&value);
                self.propagate_value(&call_site, &d_prime, target_value);
            }
        }
        Ok(())
    }

    /// From a call site into the start points of its analysed callees
    fn propagate_value_at_call(&mut self, call_site: &N<P>, fact: &D<P>) {
        let value = self.val(call_site, fact);
        for callee in self.icfg.callees_of_call_at(call_site) {
            // Summarised callees were never entered
            if self
                .cached_flow_edge_functions
                .summary_flow_function(call_site, &callee)
                .is_some()
            {
                continue;
            }
            let start_points = self.icfg.start_points_of(&callee);
            if start_points.is_empty() {
                continue;
            }

            let call_flow = self
                .cached_flow_edge_functions
                .call_flow_function(call_site, &callee);
            for d_prime in call_flow.compute_targets(fact) {
                let edge_fn = self
                    .cached_flow_edge_functions
                    .call_edge_function(call_site, fact, &callee, &d_prime);
                let target_value = edge_fn.compute_target(&value);
                for start_point in &start_points {
                    self.propagate_value(start_point, &d_prime, target_value.clone());
                }
            }
        }
    }

    fn propagate_value(&mut self, node: &N<P>, fact: &D<P>, value: L<P>) {
        let old = self.val(node, fact);
        let joined = old.join(&value);
        if joined != old {
            hot_trace!(node = ?node, fact = ?fact, value = ?joined, "Value changed");
            self.set_val(node, fact, joined);
            self.value_worklist.push_back((node.clone(), fact.clone()));
        }
    }

    /// Evaluates every jump function ending at `node`
    fn value_computation_task(&mut self, node: &N<P>) -> Result<()> {
        let mut entries: Vec<(D<P>, D<P>, EF<P>)> = match self.jump_functions.lookup_by_target(node) {
            Some(table) => table
                .cells()
                .map(|(d1, d2, f)| (d1.clone(), d2.clone(), f.clone()))
                .collect(),
            None => return Ok(()),
        };
        entries.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));

        let procedure = self
            .icfg
            .procedure_of(node)
            .ok_or_else(|| IfdsError::missing_procedure(node))?;
        for start_point in self.icfg.start_points_of(&procedure) {
            for (d_prime, d, f) in &entries {
                let start_value = self.val(&start_point, d_prime);
                let computed = f.compute_target(&start_value);
                let joined = self.val(node, d).join(&computed);
                self.set_val(node, d, joined);
                self.stats.value_computations += 1;
            }
        }
        Ok(())
    }

    pub(super) fn val(&self, node: &N<P>, fact: &D<P>) -> L<P> {
        self.value_table
            .get(node, fact)
            .cloned()
            .unwrap_or_else(<L<P> as IdeValue>::top)
    }

    /// Stores a value; `top` removes the entry
    pub(super) fn set_val(&mut self, node: &N<P>, fact: &D<P>, value: L<P>) {
        if value.is_top() {
            self.value_table.remove(node, fact);
        } else {
            self.value_table.insert(node.clone(), fact.clone(), value);
        }
    }
}
