/*
 * In-memory ICFG
 *
 * String-keyed interprocedural CFG with a checked builder. Suitable for tests,
 * benchmarks and small embedders that do not have an IR of their own.
 *
 * Shape rules enforced by the builder:
 * - every node belongs to exactly one procedure
 * - normal edges stay inside one procedure
 * - a call site and its return sites share a procedure
 * - call sites have no normal successors (the solver never asks for them)
 */

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::errors::{IfdsError, Result};
use crate::features::ifds_ide::ports::Icfg;

#[derive(Debug, Clone, Default)]
struct ProcedureInfo {
    start_points: Vec<String>,
    exits: BTreeSet<String>,
    nodes: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
struct CallInfo {
    callees: Vec<String>,
    return_sites: Vec<String>,
}

/// Interprocedural CFG over `String` nodes and procedure names
#[derive(Debug, Clone, Default)]
pub struct ProgramIcfg {
    procedures: FxHashMap<String, ProcedureInfo>,
    node_procedure: FxHashMap<String, String>,

    /// Adjacency list: node → successors (insertion order)
    successors: FxHashMap<String, Vec<String>>,

    calls: FxHashMap<String, CallInfo>,

    /// Procedure → call sites that may call it
    callers: FxHashMap<String, Vec<String>>,

    labels: FxHashMap<String, String>,
}

impl ProgramIcfg {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a procedure with a body starting at `start`
    pub fn add_procedure(
        &mut self,
        procedure: impl Into<String>,
        start: impl Into<String>,
    ) -> Result<()> {
        let procedure = procedure.into();
        let start = start.into();
        if self.procedures.contains_key(&procedure) {
            return Err(IfdsError::invalid_icfg(format!(
                "duplicate procedure '{procedure}'"
            )));
        }
        self.ensure_new_node(&start)?;

        let mut info = ProcedureInfo::default();
        info.start_points.push(start.clone());
        info.nodes.insert(start.clone());
        self.procedures.insert(procedure.clone(), info);
        self.node_procedure.insert(start, procedure);
        Ok(())
    }

    /// Adds a procedure without a body (external declaration)
    pub fn add_declaration(&mut self, procedure: impl Into<String>) -> Result<()> {
        let procedure = procedure.into();
        if self.procedures.contains_key(&procedure) {
            return Err(IfdsError::invalid_icfg(format!(
                "duplicate procedure '{procedure}'"
            )));
        }
        self.procedures.insert(procedure, ProcedureInfo::default());
        Ok(())
    }

    pub fn add_node(&mut self, procedure: &str, node: impl Into<String>) -> Result<()> {
        let node = node.into();
        self.ensure_new_node(&node)?;
        let info = self.procedure_info_mut(procedure)?;
        if info.start_points.is_empty() {
            return Err(IfdsError::invalid_icfg(format!(
                "'{procedure}' is a declaration and cannot hold nodes"
            )));
        }
        info.nodes.insert(node.clone());
        self.node_procedure.insert(node, procedure.to_string());
        Ok(())
    }

    /// Marks `node` as an exit of `procedure`, adding it first if it is new
    pub fn add_exit(&mut self, procedure: &str, node: impl Into<String>) -> Result<()> {
        let node = node.into();
        match self.node_procedure.get(&node).cloned() {
            None => self.add_node(procedure, node.clone())?,
            Some(owner) if owner != procedure => {
                return Err(IfdsError::invalid_icfg(format!(
                    "exit '{node}' belongs to '{owner}', not '{procedure}'"
                )));
            }
            Some(_) => {}
        }
        self.procedure_info_mut(procedure)?.exits.insert(node);
        Ok(())
    }

    /// Adds an intraprocedural control-flow edge
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<()> {
        let from_procedure = self.owner_of(from)?;
        let to_procedure = self.owner_of(to)?;
        if from_procedure != to_procedure {
            return Err(IfdsError::invalid_icfg(format!(
                "edge {from} -> {to} crosses procedures ('{from_procedure}' -> '{to_procedure}')"
            )));
        }
        if self.calls.contains_key(from) {
            return Err(IfdsError::invalid_icfg(format!(
                "call site '{from}' cannot have normal successors; use add_call"
            )));
        }

        let successors = self.successors.entry(from.to_string()).or_default();
        if !successors.iter().any(|s| s == to) {
            successors.push(to.to_string());
        }
        Ok(())
    }

    /// Makes `call_site` call `callee` and resume at `return_site`
    ///
    /// May be repeated to add callees (indirect calls) or return sites.
    pub fn add_call(&mut self, call_site: &str, callee: &str, return_site: &str) -> Result<()> {
        let caller = self.owner_of(call_site)?;
        let return_owner = self.owner_of(return_site)?;
        if caller != return_owner {
            return Err(IfdsError::invalid_icfg(format!(
                "return site '{return_site}' is not in '{caller}'"
            )));
        }
        if !self.procedures.contains_key(callee) {
            return Err(IfdsError::invalid_icfg(format!(
                "unknown callee '{callee}'"
            )));
        }
        if self.successors.contains_key(call_site) {
            return Err(IfdsError::invalid_icfg(format!(
                "'{call_site}' already has normal successors"
            )));
        }

        let call = self.calls.entry(call_site.to_string()).or_default();
        if !call.callees.iter().any(|c| c == callee) {
            call.callees.push(callee.to_string());
            self.callers
                .entry(callee.to_string())
                .or_default()
                .push(call_site.to_string());
        }
        if !call.return_sites.iter().any(|r| r == return_site) {
            call.return_sites.push(return_site.to_string());
        }
        Ok(())
    }

    /// Statement text shown in dumps and DOT output
    pub fn set_label(&mut self, node: &str, label: impl Into<String>) -> Result<()> {
        self.owner_of(node)?;
        self.labels.insert(node.to_string(), label.into());
        Ok(())
    }

    pub fn num_nodes(&self) -> usize {
        self.node_procedure.len()
    }

    pub fn procedures(&self) -> Vec<String> {
        let mut names: Vec<String> = self.procedures.keys().cloned().collect();
        names.sort();
        names
    }

    fn ensure_new_node(&self, node: &str) -> Result<()> {
        match self.node_procedure.get(node) {
            Some(owner) => Err(IfdsError::invalid_icfg(format!(
                "node '{node}' already belongs to '{owner}'"
            ))),
            None => Ok(()),
        }
    }

    fn owner_of(&self, node: &str) -> Result<String> {
        self.node_procedure
            .get(node)
            .cloned()
            .ok_or_else(|| IfdsError::invalid_icfg(format!("unknown node '{node}'")))
    }

    fn procedure_info_mut(&mut self, procedure: &str) -> Result<&mut ProcedureInfo> {
        self.procedures
            .get_mut(procedure)
            .ok_or_else(|| IfdsError::invalid_icfg(format!("unknown procedure '{procedure}'")))
    }

    fn is_start(&self, node: &str) -> bool {
        self.node_procedure
            .get(node)
            .and_then(|m| self.procedures.get(m))
            .is_some_and(|info| info.start_points.iter().any(|s| s == node))
    }
}

impl Icfg for ProgramIcfg {
    type Node = String;
    type Procedure = String;

    fn successors_of(&self, node: &String) -> Vec<String> {
        self.successors.get(node).cloned().unwrap_or_default()
    }

    fn is_call_site(&self, node: &String) -> bool {
        self.calls.contains_key(node)
    }

    fn is_exit(&self, node: &String) -> bool {
        self.node_procedure
            .get(node)
            .and_then(|m| self.procedures.get(m))
            .is_some_and(|info| info.exits.contains(node))
    }

    fn is_start_point(&self, node: &String) -> bool {
        self.is_start(node)
    }

    fn callees_of_call_at(&self, node: &String) -> Vec<String> {
        self.calls
            .get(node)
            .map(|call| call.callees.clone())
            .unwrap_or_default()
    }

    fn return_sites_of_call_at(&self, node: &String) -> Vec<String> {
        self.calls
            .get(node)
            .map(|call| call.return_sites.clone())
            .unwrap_or_default()
    }

    fn start_points_of(&self, procedure: &String) -> Vec<String> {
        self.procedures
            .get(procedure)
            .map(|info| info.start_points.clone())
            .unwrap_or_default()
    }

    fn callers_of(&self, procedure: &String) -> Vec<String> {
        self.callers.get(procedure).cloned().unwrap_or_default()
    }

    fn procedure_of(&self, node: &String) -> Option<String> {
        self.node_procedure.get(node).cloned()
    }

    fn calls_from_within(&self, procedure: &String) -> Vec<String> {
        self.procedures
            .get(procedure)
            .map(|info| {
                info.nodes
                    .iter()
                    .filter(|n| self.calls.contains_key(*n))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn all_non_call_start_nodes(&self) -> Vec<String> {
        let mut nodes: Vec<String> = self
            .node_procedure
            .keys()
            .filter(|n| !self.calls.contains_key(*n) && !self.is_start(n))
            .cloned()
            .collect();
        nodes.sort();
        nodes
    }

    fn procedure_name(&self, procedure: &String) -> String {
        procedure.clone()
    }

    fn node_label(&self, node: &String) -> String {
        match self.labels.get(node) {
            Some(label) => format!("{node}: {label}"),
            None => node.clone(),
        }
    }
}
