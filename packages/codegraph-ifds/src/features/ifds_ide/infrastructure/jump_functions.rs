//! Jump-function table
//!
//! Jump functions correspond to path edges: `<d1, n, d2> → f` says that if `d1`
//! holds at the start of n's procedure, `d2` holds at `n` with the value
//! transformed by `f`. The source node is implicit.
//!
//! Three indices are kept in sync on every insert so forward lookups (phase
//! II), reverse lookups (propagate, exit handling) and per-node sweeps (phase
//! II) all cost O(matching entries). AllTop is never stored: absence means
//! AllTop. Inserting overwrites; callers store the join of old and new.

use std::fmt::{self, Write};
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::features::ifds_ide::domain::{EdgeFunction, IdeValue};
use crate::shared::Table;

#[derive(Debug, Clone)]
pub struct JumpFunctions<N, D, L> {
    /// (target, target fact) → source fact → f
    non_empty_reverse_lookup: Table<N, D, FxHashMap<D, EdgeFunction<L>>>,
    /// (source fact, target) → target fact → f
    non_empty_forward_lookup: Table<D, N, FxHashMap<D, EdgeFunction<L>>>,
    /// target → (source fact, target fact) → f
    non_empty_lookup_by_target_node: FxHashMap<N, Table<D, D, EdgeFunction<L>>>,
    len: usize,
}

impl<N, D, L> Default for JumpFunctions<N, D, L> {
    fn default() -> Self {
        Self {
            non_empty_reverse_lookup: Table::default(),
            non_empty_forward_lookup: Table::default(),
            non_empty_lookup_by_target_node: FxHashMap::default(),
            len: 0,
        }
    }
}

impl<N, D, L> JumpFunctions<N, D, L>
where
    N: Clone + Eq + Hash + Ord + fmt::Debug,
    D: Clone + Eq + Hash + Ord + fmt::Debug,
    L: IdeValue,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or overwrites) `<source_fact, target, target_fact> → function`
    ///
    /// AllTop is the implicit default and is not stored.
    pub fn add_function(
        &mut self,
        source_fact: D,
        target: N,
        target_fact: D,
        function: EdgeFunction<L>,
    ) {
        if function.is_all_top() {
            return;
        }

        let previous = self
            .non_empty_lookup_by_target_node
            .entry(target.clone())
            .or_default()
            .insert(source_fact.clone(), target_fact.clone(), function.clone());
        if previous.is_none() {
            self.len += 1;
        }

        Self::index_insert(
            &mut self.non_empty_reverse_lookup,
            target.clone(),
            target_fact.clone(),
            source_fact.clone(),
            function.clone(),
        );
        Self::index_insert(
            &mut self.non_empty_forward_lookup,
            source_fact,
            target,
            target_fact,
            function,
        );
    }

    fn index_insert<R: Eq + Hash, C: Eq + Hash>(
        index: &mut Table<R, C, FxHashMap<D, EdgeFunction<L>>>,
        row: R,
        column: C,
        fact: D,
        function: EdgeFunction<L>,
    ) {
        match index.get_mut(&row, &column) {
            Some(entries) => {
                entries.insert(fact, function);
            }
            None => {
                let mut entries = FxHashMap::default();
                entries.insert(fact, function);
                index.insert(row, column, entries);
            }
        }
    }

    /// Source facts (with their functions) that explain `target_fact` at `target`
    pub fn reverse_lookup(&self, target: &N, target_fact: &D) -> Option<&FxHashMap<D, EdgeFunction<L>>> {
        self.non_empty_reverse_lookup.get(target, target_fact)
    }

    /// Target facts (with their functions) reached at `target` from `source_fact`
    pub fn forward_lookup(&self, source_fact: &D, target: &N) -> Option<&FxHashMap<D, EdgeFunction<L>>> {
        self.non_empty_forward_lookup.get(source_fact, target)
    }

    /// Every `(source fact, target fact) → f` ending at `target`
    pub fn lookup_by_target(&self, target: &N) -> Option<&Table<D, D, EdgeFunction<L>>> {
        self.non_empty_lookup_by_target_node.get(target)
    }

    /// The stored function for one triple; `None` means AllTop
    pub fn function(&self, source_fact: &D, target: &N, target_fact: &D) -> Option<&EdgeFunction<L>> {
        self.non_empty_lookup_by_target_node
            .get(target)
            .and_then(|table| table.get(source_fact, target_fact))
    }

    /// Removes one triple from all three indices
    pub fn remove_function(&mut self, source_fact: &D, target: &N, target_fact: &D) -> bool {
        let Some(by_target) = self.non_empty_lookup_by_target_node.get_mut(target) else {
            return false;
        };
        if by_target.remove(source_fact, target_fact).is_none() {
            return false;
        }
        if by_target.is_empty() {
            self.non_empty_lookup_by_target_node.remove(target);
        }

        Self::index_remove(&mut self.non_empty_reverse_lookup, target, target_fact, source_fact);
        Self::index_remove(&mut self.non_empty_forward_lookup, source_fact, target, target_fact);
        self.len -= 1;
        true
    }

    fn index_remove<R: Eq + Hash, C: Eq + Hash>(
        index: &mut Table<R, C, FxHashMap<D, EdgeFunction<L>>>,
        row: &R,
        column: &C,
        fact: &D,
    ) {
        let now_empty = match index.get_mut(row, column) {
            Some(entries) => {
                entries.remove(fact);
                entries.is_empty()
            }
            None => false,
        };
        if now_empty {
            index.remove(row, column);
        }
    }

    pub fn clear(&mut self) {
        self.non_empty_reverse_lookup.clear();
        self.non_empty_forward_lookup.clear();
        self.non_empty_lookup_by_target_node.clear();
        self.len = 0;
    }

    /// Number of stored (non-AllTop) jump functions
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All entries as `(target, source fact, target fact, f)`, sorted
    pub fn entries(&self) -> Vec<(N, D, D, EdgeFunction<L>)> {
        let mut entries: Vec<_> = self
            .non_empty_lookup_by_target_node
            .iter()
            .flat_map(|(n, table)| {
                table
                    .cells()
                    .map(move |(d1, d2, f)| (n.clone(), d1.clone(), d2.clone(), f.clone()))
            })
            .collect();
        entries.sort_by(|a, b| (&a.0, &a.1, &a.2).cmp(&(&b.0, &b.1, &b.2)));
        entries
    }

    /// Human-readable dump grouped by target node
    pub fn dump(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(out, "==== Jump functions ({}) ====", self.len)?;
        let mut current: Option<N> = None;
        for (n, d1, d2, f) in self.entries() {
            if current.as_ref() != Some(&n) {
                writeln!(out, "N: {n:?}")?;
                current = Some(n);
            }
            writeln!(out, "\t<{d1:?}> -> <{d2:?}> : {f}")?;
        }
        Ok(())
    }
}
