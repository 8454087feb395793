//! Initial seeds: start nodes with the facts (and values) holding there

use std::collections::BTreeMap;

use super::lattice::IdeValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialSeeds<N, D, L> {
    seeds: BTreeMap<N, BTreeMap<D, L>>,
}

impl<N, D, L> Default for InitialSeeds<N, D, L> {
    fn default() -> Self {
        Self {
            seeds: BTreeMap::new(),
        }
    }
}

impl<N: Ord, D: Ord, L: IdeValue> InitialSeeds<N, D, L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed every fact at `node` with `value`
    pub fn from_facts(node: N, facts: impl IntoIterator<Item = D>, value: L) -> Self {
        let row = facts.into_iter().map(|d| (d, value.clone())).collect();
        let mut seeds = Self::new();
        seeds.seeds.insert(node, row);
        seeds
    }

    /// Adds (or replaces) the value seeded for `fact` at `node`
    pub fn add_seed(&mut self, node: N, fact: D, value: L) {
        self.seeds.entry(node).or_default().insert(fact, value);
    }

    pub fn contains_initial_seeds_for(&self, node: &N) -> bool {
        self.seeds.contains_key(node)
    }

    pub fn seeds_at(&self, node: &N) -> Option<&BTreeMap<D, L>> {
        self.seeds.get(node)
    }

    /// Number of (node, fact) seeds
    pub fn count_initial_seeds(&self) -> usize {
        self.seeds.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.seeds.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&N, &D, &L)> {
        self.seeds
            .iter()
            .flat_map(|(n, facts)| facts.iter().map(move |(d, l)| (n, d, l)))
    }

    /// Mutable fact map of every seeded node
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = (&N, &mut BTreeMap<D, L>)> {
        self.seeds.iter_mut()
    }
}
