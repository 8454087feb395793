//! End-summary and incoming tables
//!
//! Both are keyed by a callee context `(start point, fact at start)`:
//! - [`EndSummaryTable`]: exit facts reached from that context, with the jump
//!   function at the exit. Reused by every later call into the same context.
//! - [`IncomingTable`]: call sites (and facts there) that entered the context,
//!   so a summary completed later can be pushed back to all of them.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Write};
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::features::ifds_ide::domain::{EdgeFunction, FactSet, IdeValue};
use crate::shared::Table;

#[derive(Debug, Clone)]
pub struct EndSummaryTable<N, D, L> {
    summaries: FxHashMap<(N, D), Table<N, D, EdgeFunction<L>>>,
}

impl<N, D, L> Default for EndSummaryTable<N, D, L> {
    fn default() -> Self {
        Self {
            summaries: FxHashMap::default(),
        }
    }
}

impl<N, D, L> EndSummaryTable<N, D, L>
where
    N: Clone + Eq + Hash + Ord + Debug,
    D: Clone + Eq + Hash + Ord + Debug,
    L: IdeValue,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the jump function at `(exit, exit_fact)` for one callee context
    ///
    /// Overwrites: exit handling always passes the current (joined) jump function.
    pub fn insert(
        &mut self,
        start_point: N,
        start_fact: D,
        exit: N,
        exit_fact: D,
        function: EdgeFunction<L>,
    ) {
        self.summaries
            .entry((start_point, start_fact))
            .or_default()
            .insert(exit, exit_fact, function);
    }

    /// Snapshot of `(exit, exit fact, f)` for a context, in stable order
    pub fn get(&self, start_point: &N, start_fact: &D) -> Vec<(N, D, EdgeFunction<L>)> {
        let Some(table) = self.summaries.get(&(start_point.clone(), start_fact.clone())) else {
            return Vec::new();
        };
        let mut entries: Vec<_> = table
            .cells()
            .map(|(n, d, f)| (n.clone(), d.clone(), f.clone()))
            .collect();
        entries.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        entries
    }

    /// Number of summarised callee contexts
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn dump(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(out, "==== End summaries ====")?;
        let mut contexts: Vec<_> = self.summaries.keys().collect();
        contexts.sort();
        for (sp, d1) in contexts {
            writeln!(out, "SP: {sp:?} | D: {d1:?}")?;
            for (exit, d2, f) in self.get(sp, d1) {
                writeln!(out, "\t{exit:?} | {d2:?} : {f}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct IncomingTable<N, D> {
    incoming: FxHashMap<(N, D), BTreeMap<N, FactSet<D>>>,
}

impl<N, D> Default for IncomingTable<N, D> {
    fn default() -> Self {
        Self {
            incoming: FxHashMap::default(),
        }
    }
}

impl<N, D> IncomingTable<N, D>
where
    N: Clone + Eq + Hash + Ord + Debug,
    D: Clone + Eq + Hash + Ord + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `call_site` (holding `call_fact`) entered `(start_point, start_fact)`
    ///
    /// Returns `false` if the pair was already known.
    pub fn add(&mut self, start_point: N, start_fact: D, call_site: N, call_fact: D) -> bool {
        self.incoming
            .entry((start_point, start_fact))
            .or_default()
            .entry(call_site)
            .or_default()
            .insert(call_fact)
    }

    /// Snapshot of the callers of a context
    pub fn get(&self, start_point: &N, start_fact: &D) -> Vec<(N, FactSet<D>)> {
        self.incoming
            .get(&(start_point.clone(), start_fact.clone()))
            .map(|callers| {
                callers
                    .iter()
                    .map(|(n, facts)| (n.clone(), facts.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_callers(&self, start_point: &N, start_fact: &D) -> bool {
        self.incoming
            .get(&(start_point.clone(), start_fact.clone()))
            .is_some_and(|callers| !callers.is_empty())
    }

    pub fn len(&self) -> usize {
        self.incoming.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incoming.is_empty()
    }

    pub fn dump(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(out, "==== Incoming ====")?;
        let mut contexts: Vec<_> = self.incoming.iter().collect();
        contexts.sort_by(|a, b| a.0.cmp(b.0));
        for ((sp, d), callers) in contexts {
            writeln!(out, "SP: {sp:?} | D: {d:?}")?;
            for (call_site, facts) in callers {
                let facts: Vec<String> = facts.iter().map(|f| format!("{f:?}")).collect();
                writeln!(out, "\t{call_site:?} <- {{{}}}", facts.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ifds_ide::domain::BinaryDomain;

    #[test]
    fn test_end_summary_overwrites_per_exit_fact() {
        let mut table: EndSummaryTable<&str, u32, BinaryDomain> = EndSummaryTable::new();
        table.insert("sp", 0, "exit", 1, EdgeFunction::Identity);
        table.insert("sp", 0, "exit", 1, EdgeFunction::AllBottom);
        table.insert("sp", 0, "exit", 2, EdgeFunction::Identity);

        let entries = table.get(&"sp", &0);
        assert_eq!(
            entries,
            vec![
                ("exit", 1, EdgeFunction::AllBottom),
                ("exit", 2, EdgeFunction::Identity),
            ]
        );
        assert!(table.get(&"sp", &7).is_empty());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_incoming_collects_facts_per_call_site() {
        let mut incoming: IncomingTable<&str, u32> = IncomingTable::new();
        assert!(incoming.add("sp", 0, "c1", 0));
        assert!(incoming.add("sp", 0, "c1", 3));
        assert!(!incoming.add("sp", 0, "c1", 3));
        assert!(incoming.add("sp", 0, "c2", 0));

        let callers = incoming.get(&"sp", &0);
        assert_eq!(callers.len(), 2);
        assert_eq!(callers[0], ("c1", FactSet::from([0, 3])));
        assert!(incoming.has_callers(&"sp", &0));
        assert!(!incoming.has_callers(&"sp", &1));
    }

    #[test]
    fn test_dumps_are_sorted() {
        let mut incoming: IncomingTable<&str, u32> = IncomingTable::new();
        incoming.add("b", 0, "c", 0);
        incoming.add("a", 0, "c", 1);
        let mut text = String::new();
        incoming.dump(&mut text).unwrap();
        assert!(text.find("SP: \"a\"").unwrap() < text.find("SP: \"b\"").unwrap());
        assert!(text.contains("\"c\" <- {1}"));
    }
}
