//! Solver statistics

use std::fmt;

use serde::Serialize;

/// Kinds of flow / edge function queries the solver makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionKind {
    Normal,
    Call,
    Return,
    CallToReturn,
    Summary,
}

impl FunctionKind {
    pub const ALL: [FunctionKind; 5] = [
        FunctionKind::Normal,
        FunctionKind::Call,
        FunctionKind::Return,
        FunctionKind::CallToReturn,
        FunctionKind::Summary,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FunctionKind::Normal => "Normal",
            FunctionKind::Call => "Call",
            FunctionKind::Return => "Return",
            FunctionKind::CallToReturn => "CallToReturn",
            FunctionKind::Summary => "Summary",
        }
    }
}

/// Construction / hit counter pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheCounter {
    pub constructions: usize,
    pub hits: usize,
}

/// Flow/edge function cache counters (diagnostics only)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStatistics {
    flow: [CacheCounter; 5],
    edge: [CacheCounter; 5],
}

impl CacheStatistics {
    pub fn flow(&self, kind: FunctionKind) -> CacheCounter {
        self.flow[kind.index()]
    }

    pub fn edge(&self, kind: FunctionKind) -> CacheCounter {
        self.edge[kind.index()]
    }

    pub(crate) fn record_flow(&mut self, kind: FunctionKind, hit: bool) {
        Self::bump(&mut self.flow[kind.index()], hit);
    }

    pub(crate) fn record_edge(&mut self, kind: FunctionKind, hit: bool) {
        Self::bump(&mut self.edge[kind.index()], hit);
    }

    fn bump(counter: &mut CacheCounter, hit: bool) {
        if hit {
            counter.hits += 1;
        } else {
            counter.constructions += 1;
        }
    }

    pub fn total_flow_constructions(&self) -> usize {
        self.flow.iter().map(|c| c.constructions).sum()
    }

    pub fn total_edge_constructions(&self) -> usize {
        self.edge.iter().map(|c| c.constructions).sum()
    }
}

impl fmt::Display for CacheStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Flow-function cache:")?;
        for kind in FunctionKind::ALL {
            let c = self.flow(kind);
            writeln!(
                f,
                "  {:<13} Construction: {:>8}  Cache Hit: {:>8}",
                kind.as_str(),
                c.constructions,
                c.hits
            )?;
        }
        writeln!(f, "Edge-function cache:")?;
        for kind in FunctionKind::ALL {
            let c = self.edge(kind);
            writeln!(
                f,
                "  {:<13} Construction: {:>8}  Cache Hit: {:>8}",
                kind.as_str(),
                c.constructions,
                c.hits
            )?;
        }
        Ok(())
    }
}

/// IDE solver statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct SolverStatistics {
    /// Path edges whose jump function strictly improved
    pub path_edges_propagated: usize,

    /// Worklist dequeues in phase I
    pub path_edges_processed: usize,

    pub normal_flows_processed: usize,
    pub calls_processed: usize,
    pub exits_processed: usize,

    /// End summaries applied at a call site without re-entering the callee
    pub summary_reuses: usize,

    pub special_summary_applications: usize,

    /// Call sites whose callee had no body (declaration only)
    pub calls_without_callee_body: usize,

    pub unbalanced_returns: usize,

    /// Number of facts generated from the zero fact
    pub gen_facts: usize,

    /// Phase II value-worklist dequeues
    pub value_propagations: usize,

    /// Phase II (node, fact) values computed in the final sweep
    pub value_computations: usize,

    pub phase_one_time_ms: u64,
    pub phase_two_time_ms: u64,
}

impl fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IDE solver statistics:")?;
        writeln!(f, "  path edges propagated : {}", self.path_edges_propagated)?;
        writeln!(f, "  path edges processed  : {}", self.path_edges_processed)?;
        writeln!(
            f,
            "  normal / call / exit  : {} / {} / {}",
            self.normal_flows_processed, self.calls_processed, self.exits_processed
        )?;
        writeln!(f, "  summary reuses        : {}", self.summary_reuses)?;
        writeln!(f, "  special summaries     : {}", self.special_summary_applications)?;
        writeln!(f, "  bodiless callees      : {}", self.calls_without_callee_body)?;
        writeln!(f, "  unbalanced returns    : {}", self.unbalanced_returns)?;
        writeln!(f, "  generated facts       : {}", self.gen_facts)?;
        writeln!(f, "  value propagations    : {}", self.value_propagations)?;
        writeln!(f, "  value computations    : {}", self.value_computations)?;
        writeln!(
            f,
            "  time (phase I / II)   : {} ms / {} ms",
            self.phase_one_time_ms, self.phase_two_time_ms
        )
    }
}
