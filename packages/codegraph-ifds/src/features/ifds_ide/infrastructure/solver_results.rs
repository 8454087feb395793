//! Read-only view over the final value table
//!
//! Absent entries mean `top` (the value table never stores it).

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Write};
use std::hash::Hash;

use crate::features::ifds_ide::domain::{BinaryDomain, FactSet, IdeValue};
use crate::features::ifds_ide::ports::Icfg;
use crate::shared::Table;

/// Borrowed results of a finished solver run
#[derive(Debug, Clone)]
pub struct SolverResults<'r, N, D, L> {
    values: &'r Table<N, D, L>,
    zero_value: &'r D,
}

impl<'r, N, D, L> SolverResults<'r, N, D, L>
where
    N: Clone + Eq + Hash + Ord + Debug,
    D: Clone + Eq + Hash + Ord + Debug,
    L: IdeValue,
{
    pub fn new(values: &'r Table<N, D, L>, zero_value: &'r D) -> Self {
        Self { values, zero_value }
    }

    /// Value of `fact` at `node`; `top` when nothing reached it
    pub fn result_at(&self, node: &N, fact: &D) -> L {
        self.values
            .get(node, fact)
            .cloned()
            .unwrap_or_else(L::top)
    }

    /// Every fact with a non-top value at `node`
    pub fn results_at(&self, node: &N, strip_zero: bool) -> BTreeMap<D, L> {
        self.values
            .row(node)
            .map(|row| {
                row.iter()
                    .filter(|(d, _)| !(strip_zero && *d == self.zero_value))
                    .map(|(d, v)| (d.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All `(node, fact, value)` entries, sorted by node then fact
    pub fn all_result_entries(&self) -> Vec<(N, D, L)> {
        let mut entries: Vec<_> = self
            .values
            .cells()
            .map(|(n, d, v)| (n.clone(), d.clone(), v.clone()))
            .collect();
        entries.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        entries
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn zero_value(&self) -> &D {
        self.zero_value
    }

    /// Text dump grouped by procedure (zero fact omitted)
    pub fn dump_results<I>(&self, icfg: &I, out: &mut impl Write) -> fmt::Result
    where
        I: Icfg<Node = N>,
    {
        write_results(
            self.values,
            self.zero_value,
            icfg,
            |d| format!("{d:?}"),
            |v| format!("{v:?}"),
            out,
        )
    }
}

impl<N, D> SolverResults<'_, N, D, BinaryDomain>
where
    N: Clone + Eq + Hash + Ord + Debug,
    D: Clone + Eq + Hash + Ord + Debug,
{
    /// Facts holding at `node` in an IFDS run (value `BOTTOM`), zero excluded
    pub fn ifds_results_at(&self, node: &N) -> FactSet<D> {
        self.values
            .row(node)
            .map(|row| {
                row.iter()
                    .filter(|(d, v)| v.is_bottom() && *d != self.zero_value)
                    .map(|(d, _)| d.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Results moved out of a solver
#[derive(Debug, Clone)]
pub struct OwningSolverResults<N, D, L> {
    values: Table<N, D, L>,
    zero_value: D,
}

impl<N, D, L> OwningSolverResults<N, D, L>
where
    N: Clone + Eq + Hash + Ord + Debug,
    D: Clone + Eq + Hash + Ord + Debug,
    L: IdeValue,
{
    pub fn new(values: Table<N, D, L>, zero_value: D) -> Self {
        Self { values, zero_value }
    }

    pub fn get(&self) -> SolverResults<'_, N, D, L> {
        SolverResults::new(&self.values, &self.zero_value)
    }

    pub fn into_table(self) -> Table<N, D, L> {
        self.values
    }
}

pub(crate) fn write_results<N, D, L, I>(
    values: &Table<N, D, L>,
    zero_value: &D,
    icfg: &I,
    fact_label: impl Fn(&D) -> String,
    value_label: impl Fn(&L) -> String,
    out: &mut impl Write,
) -> fmt::Result
where
    N: Clone + Eq + Hash + Ord + Debug,
    D: Clone + Eq + Hash + Ord + Debug,
    I: Icfg<Node = N>,
{
    writeln!(out, "***************************************************************")?;
    writeln!(out, "*                  Raw IDESolver results                      *")?;
    writeln!(out, "***************************************************************")?;

    // procedure name → node → sorted (fact, value) rows
    let mut by_procedure: BTreeMap<String, BTreeMap<&N, Vec<(&D, &L)>>> = BTreeMap::new();
    for (node, row) in values.rows() {
        let procedure = icfg
            .procedure_of(node)
            .map(|m| icfg.procedure_name(&m))
            .unwrap_or_else(|| "<unknown>".to_string());
        let mut facts: Vec<(&D, &L)> = row.iter().filter(|(d, _)| *d != zero_value).collect();
        if facts.is_empty() {
            continue;
        }
        facts.sort_by(|a, b| a.0.cmp(b.0));
        by_procedure.entry(procedure).or_default().insert(node, facts);
    }

    for (procedure, nodes) in by_procedure {
        writeln!(out, "\n============ Results for function '{procedure}' ============")?;
        for (node, facts) in nodes {
            writeln!(out, "N: {}", icfg.node_label(node))?;
            writeln!(out, "---------------------------------------------------------------")?;
            for (fact, value) in facts {
                writeln!(out, "\tD: {} | V: {}", fact_label(fact), value_label(value))?;
            }
        }
    }
    Ok(())
}
