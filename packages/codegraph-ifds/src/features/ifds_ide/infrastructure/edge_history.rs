//! Recorded exploded-supergraph edges
//!
//! Kept only with `record_edges`. Every flow-function application the solver
//! performs is stored as `(from, to, kind) → source fact → target facts`.
//! With `emit_esg` the edge function of each exploded edge is kept as well, for
//! DOT labels.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Write};
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::features::ifds_ide::domain::{EdgeFunction, FactSet, IdeValue};

/// How an exploded edge was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EsgEdgeKind {
    Normal,
    Call,
    CallToReturn,
    Return,
    /// Special summary applied in place of the callee
    Summary,
    /// Call-to-return edge of a call whose callees have neither body nor summary
    SkipUnknownFunction,
}

impl EsgEdgeKind {
    /// Call and return edges cross procedure boundaries
    pub fn is_inter(self) -> bool {
        matches!(self, EsgEdgeKind::Call | EsgEdgeKind::Return)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EsgEdgeKind::Normal => "Normal",
            EsgEdgeKind::Call => "Call",
            EsgEdgeKind::CallToReturn => "CallToReturn",
            EsgEdgeKind::Return => "Return",
            EsgEdgeKind::Summary => "Summary",
            EsgEdgeKind::SkipUnknownFunction => "SkipUnknownFunction",
        }
    }
}

impl fmt::Display for EsgEdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type FactEdges<D> = BTreeMap<D, FactSet<D>>;

#[derive(Debug, Clone)]
pub struct EdgeHistory<N, D, L> {
    edges: BTreeMap<(N, N, EsgEdgeKind), FactEdges<D>>,
    edge_functions: FxHashMap<(N, D, N, D), EdgeFunction<L>>,
    keep_edge_functions: bool,
}

impl<N, D, L> EdgeHistory<N, D, L>
where
    N: Clone + Eq + Hash + Ord + Debug,
    D: Clone + Eq + Hash + Ord + Debug,
    L: IdeValue,
{
    pub fn new(keep_edge_functions: bool) -> Self {
        Self {
            edges: BTreeMap::new(),
            edge_functions: FxHashMap::default(),
            keep_edge_functions,
        }
    }

    /// Records one flow-function application; empty results are kept so kills show up
    pub fn save_edges(
        &mut self,
        from: &N,
        to: &N,
        source_fact: &D,
        targets: &FactSet<D>,
        kind: EsgEdgeKind,
    ) {
        self.edges
            .entry((from.clone(), to.clone(), kind))
            .or_default()
            .entry(source_fact.clone())
            .or_default()
            .extend(targets.iter().cloned());
    }

    /// Keeps the edge function of one exploded edge (no-op without `emit_esg`)
    pub fn save_edge_function(
        &mut self,
        from: &N,
        source_fact: &D,
        to: &N,
        target_fact: &D,
        function: &EdgeFunction<L>,
    ) {
        if !self.keep_edge_functions {
            return;
        }
        self.edge_functions.insert(
            (from.clone(), source_fact.clone(), to.clone(), target_fact.clone()),
            function.clone(),
        );
    }

    pub fn edge_function(&self, from: &N, source_fact: &D, to: &N, target_fact: &D) -> Option<&EdgeFunction<L>> {
        self.edge_functions.get(&(
            from.clone(),
            source_fact.clone(),
            to.clone(),
            target_fact.clone(),
        ))
    }

    /// Intraprocedural edges (normal, call-to-return, summary, skipped calls)
    pub fn intra_edges(&self) -> impl Iterator<Item = (&(N, N, EsgEdgeKind), &FactEdges<D>)> {
        self.edges.iter().filter(|((_, _, kind), _)| !kind.is_inter())
    }

    /// Call and return edges
    pub fn inter_edges(&self) -> impl Iterator<Item = (&(N, N, EsgEdgeKind), &FactEdges<D>)> {
        self.edges.iter().filter(|((_, _, kind), _)| kind.is_inter())
    }

    /// Every (node, fact) pair that appears on either end of a recorded edge
    pub fn exploded_nodes(&self) -> BTreeMap<N, FactSet<D>> {
        let mut nodes: BTreeMap<N, FactSet<D>> = BTreeMap::new();
        for ((from, to, _), facts) in &self.edges {
            for (source, targets) in facts {
                nodes.entry(from.clone()).or_default().insert(source.clone());
                nodes
                    .entry(to.clone())
                    .or_default()
                    .extend(targets.iter().cloned());
            }
        }
        nodes
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn dump_intra(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(out, "==== Intraprocedural path edges ====")?;
        Self::dump_edges(self.intra_edges(), out)
    }

    pub fn dump_inter(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(out, "==== Interprocedural path edges ====")?;
        Self::dump_edges(self.inter_edges(), out)
    }

    fn dump_edges<'e>(
        edges: impl Iterator<Item = (&'e (N, N, EsgEdgeKind), &'e FactEdges<D>)>,
        out: &mut impl Write,
    ) -> fmt::Result
    where
        N: 'e,
        D: 'e,
    {
        for ((from, to, kind), facts) in edges {
            writeln!(out, "{from:?} -> {to:?} [{kind}]")?;
            for (source, targets) in facts {
                let targets: Vec<String> = targets.iter().map(|d| format!("{d:?}")).collect();
                writeln!(out, "\t{source:?} => {{{}}}", targets.join(", "))?;
            }
        }
        Ok(())
    }
}
