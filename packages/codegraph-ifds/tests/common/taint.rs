//! Taint reachability as an IFDS problem

use std::collections::{BTreeMap, BTreeSet};

use codegraph_ifds::features::ifds_ide::domain::flow_function::{gen_flow, identity_flow, kill_flow};
use codegraph_ifds::{FactSet, FlowFunctionPtr, IfdsProblem, SolverConfig};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Taint {
    Zero,
    Value(&'static str),
}

pub fn tainted(name: &'static str) -> Taint {
    Taint::Value(name)
}

#[derive(Debug, Clone)]
pub struct TaintProblem {
    entry: String,
    /// Call sites whose result is tainted (library sources without a body)
    sources: BTreeMap<String, Taint>,
    /// Statements that taint a value unconditionally
    gens: BTreeMap<String, Taint>,
    sanitizers: BTreeMap<String, Taint>,
    config: SolverConfig,
}

impl TaintProblem {
    pub fn new(entry: &str) -> Self {
        Self {
            entry: entry.to_string(),
            sources: BTreeMap::new(),
            gens: BTreeMap::new(),
            sanitizers: BTreeMap::new(),
            config: SolverConfig::default(),
        }
    }

    pub fn source_call(mut self, call_site: &str, name: &'static str) -> Self {
        self.sources.insert(call_site.to_string(), tainted(name));
        self
    }

    pub fn gen_at(mut self, node: &str, name: &'static str) -> Self {
        self.gens.insert(node.to_string(), tainted(name));
        self
    }

    pub fn sanitize_at(mut self, node: &str, name: &'static str) -> Self {
        self.sanitizers.insert(node.to_string(), tainted(name));
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }
}

impl IfdsProblem for TaintProblem {
    type Node = String;
    type Fact = Taint;
    type Procedure = String;

    fn zero_value(&self) -> Taint {
        Taint::Zero
    }

    fn initial_seeds(&self) -> BTreeMap<String, FactSet<Taint>> {
        BTreeMap::from([(self.entry.clone(), BTreeSet::new())])
    }

    fn normal_flow_function(&self, curr: &String, _succ: &String) -> FlowFunctionPtr<Taint> {
        if let Some(fact) = self.gens.get(curr) {
            gen_flow(fact.clone(), Taint::Zero)
        } else if let Some(fact) = self.sanitizers.get(curr) {
            kill_flow(fact.clone())
        } else {
            identity_flow()
        }
    }

    fn call_flow_function(&self, _call_site: &String, _callee: &String) -> FlowFunctionPtr<Taint> {
        identity_flow()
    }

    fn return_flow_function(
        &self,
        _call_site: &String,
        _callee: &String,
        _exit: &String,
        _return_site: &String,
    ) -> FlowFunctionPtr<Taint> {
        identity_flow()
    }

    fn call_to_return_flow_function(
        &self,
        call_site: &String,
        _return_site: &String,
        _callees: &[String],
    ) -> FlowFunctionPtr<Taint> {
        match self.sources.get(call_site) {
            Some(fact) => gen_flow(fact.clone(), Taint::Zero),
            None => identity_flow(),
        }
    }

    fn solver_config(&self) -> SolverConfig {
        self.config.clone()
    }
}
