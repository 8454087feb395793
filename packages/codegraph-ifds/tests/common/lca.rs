//! Linear constant propagation over named variables
//!
//! Statements are `x = c` and `x = a * y + b`. Calls pass variables through
//! explicit bindings (actual → formal, callee → caller), or pass every
//! variable unchanged when a call site has no bindings.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write};

use codegraph_ifds::features::ifds_ide::domain::edge_function::same_edge_function;
use codegraph_ifds::features::ifds_ide::domain::flow_function::{
    identity_flow, lambda_flow, transfer_flow,
};
use codegraph_ifds::{
    EdgeFunction, EdgeFunctionImpl, FactSet, FlowFunctionPtr, IdeProblem, IdeValue, InitialSeeds,
    SolverConfig, SolverResults,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Var {
    Zero,
    Named(&'static str),
}

pub fn var(name: &'static str) -> Var {
    Var::Named(name)
}

/// Flat constant lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lca {
    Top,
    Const(i64),
    Bottom,
}

impl IdeValue for Lca {
    fn top() -> Self {
        Lca::Top
    }

    fn bottom() -> Self {
        Lca::Bottom
    }

    fn join(&self, other: &Self) -> Self {
        match (self, other) {
            (Lca::Top, x) | (x, Lca::Top) => *x,
            (Lca::Const(a), Lca::Const(b)) if a == b => Lca::Const(*a),
            _ => Lca::Bottom,
        }
    }
}

/// λx. a * x + b
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearEdge {
    pub a: i64,
    pub b: i64,
}

impl LinearEdge {
    pub fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }

    /// Edge function handle; λx.x collapses to Identity
    pub fn function(self) -> EdgeFunction<Lca> {
        if self.a == 1 && self.b == 0 {
            EdgeFunction::Identity
        } else {
            EdgeFunction::custom(self)
        }
    }
}

impl EdgeFunctionImpl<Lca> for LinearEdge {
    fn compute_target(&self, source: &Lca) -> Lca {
        match source {
            Lca::Const(v) => Lca::Const(self.a.wrapping_mul(*v).wrapping_add(self.b)),
            other => *other,
        }
    }

    fn compose_with(&self, second: &EdgeFunction<Lca>) -> Option<EdgeFunction<Lca>> {
        second.downcast_ref::<LinearEdge>().map(|next| {
            LinearEdge::new(
                self.a.wrapping_mul(next.a),
                next.a.wrapping_mul(self.b).wrapping_add(next.b),
            )
            .function()
        })
    }

    fn join_with(&self, other: &EdgeFunction<Lca>) -> Option<EdgeFunction<Lca>> {
        match other.downcast_ref::<LinearEdge>() {
            Some(other) if other == self => Some(EdgeFunction::custom(*self)),
            _ => Some(EdgeFunction::AllBottom),
        }
    }

    fn equal_to(&self, other: &dyn EdgeFunctionImpl<Lca>) -> bool {
        same_edge_function(self, other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// λx. k * x; composes and joins only through the generic fallbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleEdge(pub i64);

impl ScaleEdge {
    pub fn function(self) -> EdgeFunction<Lca> {
        EdgeFunction::custom(self)
    }
}

impl EdgeFunctionImpl<Lca> for ScaleEdge {
    fn compute_target(&self, source: &Lca) -> Lca {
        match source {
            Lca::Const(v) => Lca::Const(self.0.wrapping_mul(*v)),
            other => *other,
        }
    }

    fn equal_to(&self, other: &dyn EdgeFunctionImpl<Lca>) -> bool {
        same_edge_function(self, other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Const { lhs: Var, value: i64 },
    Linear { lhs: Var, rhs: Var, edge: LinearEdge },
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub from: Var,
    pub to: Var,
    pub edge: LinearEdge,
}

fn binding_flow(bindings: &[Binding]) -> FlowFunctionPtr<Var> {
    let pairs: Vec<(Var, Var)> = bindings
        .iter()
        .map(|b| (b.from.clone(), b.to.clone()))
        .collect();
    lambda_flow(move |source: &Var| {
        pairs
            .iter()
            .filter(|(from, _)| from == source)
            .map(|(_, to)| to.clone())
            .collect()
    })
}

fn binding_edge(bindings: Option<&Vec<Binding>>, from: &Var, to: &Var) -> EdgeFunction<Lca> {
    bindings
        .and_then(|bindings| bindings.iter().find(|b| b.from == *from && b.to == *to))
        .map(|b| b.edge.function())
        .unwrap_or(EdgeFunction::Identity)
}

#[derive(Debug, Clone)]
pub struct LcaProblem {
    entry: String,
    seeds: Vec<(String, Var, Lca)>,
    stmts: BTreeMap<String, Stmt>,
    call_bindings: BTreeMap<String, Vec<Binding>>,
    return_bindings: BTreeMap<String, Vec<Binding>>,
    locals: BTreeSet<Var>,
    config: SolverConfig,
}

impl LcaProblem {
    pub fn new(entry: &str) -> Self {
        Self {
            entry: entry.to_string(),
            seeds: Vec::new(),
            stmts: BTreeMap::new(),
            call_bindings: BTreeMap::new(),
            return_bindings: BTreeMap::new(),
            locals: BTreeSet::new(),
            config: SolverConfig::default(),
        }
    }

    /// `lhs = value` at `node`
    pub fn assign_const(mut self, node: &str, lhs: &'static str, value: i64) -> Self {
        self.stmts.insert(
            node.to_string(),
            Stmt::Const {
                lhs: var(lhs),
                value,
            },
        );
        self
    }

    /// `lhs = a * rhs + b` at `node`
    pub fn assign_linear(
        mut self,
        node: &str,
        lhs: &'static str,
        rhs: &'static str,
        a: i64,
        b: i64,
    ) -> Self {
        self.stmts.insert(
            node.to_string(),
            Stmt::Linear {
                lhs: var(lhs),
                rhs: var(rhs),
                edge: LinearEdge::new(a, b),
            },
        );
        self
    }

    /// Actual `actual` of `call_site` becomes formal `formal` through `edge`
    pub fn bind_call(
        mut self,
        call_site: &str,
        actual: &'static str,
        formal: &'static str,
        edge: LinearEdge,
    ) -> Self {
        self.call_bindings
            .entry(call_site.to_string())
            .or_default()
            .push(Binding {
                from: var(actual),
                to: var(formal),
                edge,
            });
        self
    }

    /// Callee variable `callee_var` lands in `caller_var` at the return site
    pub fn bind_return(
        mut self,
        call_site: &str,
        callee_var: &'static str,
        caller_var: &'static str,
        edge: LinearEdge,
    ) -> Self {
        self.return_bindings
            .entry(call_site.to_string())
            .or_default()
            .push(Binding {
                from: var(callee_var),
                to: var(caller_var),
                edge,
            });
        self
    }

    /// Variables that survive a call on the caller's side
    pub fn local(mut self, name: &'static str) -> Self {
        self.locals.insert(var(name));
        self
    }

    pub fn seed(mut self, node: &str, name: &'static str, value: i64) -> Self {
        self.seeds.push((node.to_string(), var(name), Lca::Const(value)));
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }
}

impl IdeProblem for LcaProblem {
    type Node = String;
    type Fact = Var;
    type Procedure = String;
    type Value = Lca;

    fn zero_value(&self) -> Var {
        Var::Zero
    }

    fn initial_seeds(&self) -> InitialSeeds<String, Var, Lca> {
        let mut seeds = InitialSeeds::new();
        seeds.add_seed(self.entry.clone(), Var::Zero, Lca::Bottom);
        for (node, fact, value) in &self.seeds {
            seeds.add_seed(node.clone(), fact.clone(), *value);
        }
        seeds
    }

    fn normal_flow_function(&self, curr: &String, _succ: &String) -> FlowFunctionPtr<Var> {
        match self.stmts.get(curr) {
            Some(Stmt::Const { lhs, .. }) => transfer_flow(lhs.clone(), Var::Zero),
            Some(Stmt::Linear { lhs, rhs, .. }) if lhs != rhs => {
                transfer_flow(lhs.clone(), rhs.clone())
            }
            _ => identity_flow(),
        }
    }

    fn call_flow_function(&self, call_site: &String, _callee: &String) -> FlowFunctionPtr<Var> {
        match self.call_bindings.get(call_site) {
            Some(bindings) => binding_flow(bindings),
            None => identity_flow(),
        }
    }

    fn return_flow_function(
        &self,
        call_site: &String,
        _callee: &String,
        _exit: &String,
        _return_site: &String,
    ) -> FlowFunctionPtr<Var> {
        match self.return_bindings.get(call_site) {
            Some(bindings) => binding_flow(bindings),
            None => identity_flow(),
        }
    }

    fn call_to_return_flow_function(
        &self,
        _call_site: &String,
        _return_site: &String,
        _callees: &[String],
    ) -> FlowFunctionPtr<Var> {
        let locals = self.locals.clone();
        lambda_flow(move |source: &Var| {
            if locals.contains(source) {
                FactSet::from([source.clone()])
            } else {
                FactSet::new()
            }
        })
    }

    fn normal_edge_function(
        &self,
        curr: &String,
        curr_fact: &Var,
        _succ: &String,
        succ_fact: &Var,
    ) -> EdgeFunction<Lca> {
        match self.stmts.get(curr) {
            Some(Stmt::Const { lhs, value }) if *curr_fact == Var::Zero && succ_fact == lhs => {
                EdgeFunction::constant(Lca::Const(*value))
            }
            Some(Stmt::Linear { lhs, rhs, edge }) if curr_fact == rhs && succ_fact == lhs => {
                edge.function()
            }
            _ => EdgeFunction::Identity,
        }
    }

    fn call_edge_function(
        &self,
        call_site: &String,
        src_fact: &Var,
        _callee: &String,
        dest_fact: &Var,
    ) -> EdgeFunction<Lca> {
        binding_edge(self.call_bindings.get(call_site), src_fact, dest_fact)
    }

    fn return_edge_function(
        &self,
        call_site: &String,
        _callee: &String,
        _exit: &String,
        exit_fact: &Var,
        _return_site: &String,
        return_fact: &Var,
    ) -> EdgeFunction<Lca> {
        binding_edge(self.return_bindings.get(call_site), exit_fact, return_fact)
    }

    fn call_to_return_edge_function(
        &self,
        _call_site: &String,
        _call_fact: &Var,
        _return_site: &String,
        _return_fact: &Var,
        _callees: &[String],
    ) -> EdgeFunction<Lca> {
        EdgeFunction::Identity
    }

    fn solver_config(&self) -> SolverConfig {
        self.config.clone()
    }

    fn fact_label(&self, fact: &Var) -> String {
        match fact {
            Var::Zero => "Λ".to_string(),
            Var::Named(name) => name.to_string(),
        }
    }

    fn value_label(&self, value: &Lca) -> String {
        match value {
            Lca::Top => "TOP".to_string(),
            Lca::Const(v) => v.to_string(),
            Lca::Bottom => "BOTTOM".to_string(),
        }
    }

    /// One `node: var = c` line per variable holding a constant
    fn emit_text_report(
        &self,
        results: &SolverResults<'_, String, Var, Lca>,
        out: &mut dyn Write,
    ) -> fmt::Result {
        writeln!(out, "Linear constants:")?;
        for (node, fact, value) in results.all_result_entries() {
            if let (Var::Named(name), Lca::Const(c)) = (fact, value) {
                writeln!(out, "{node}: {name} = {c}")?;
            }
        }
        Ok(())
    }
}
