//! Sparse two-dimensional table
//!
//! Row-major `R -> C -> V` map backed by `FxHashMap`. Used for the value table,
//! the per-node jump-function sub-tables and the solver's keyed summaries.
//! Empty rows are dropped on removal so `len()` and `rows()` only see live cells.

use std::hash::Hash;

use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct Table<R, C, V> {
    rows: FxHashMap<R, FxHashMap<C, V>>,
    cells: usize,
}

impl<R, C, V> Default for Table<R, C, V> {
    fn default() -> Self {
        Self {
            rows: FxHashMap::default(),
            cells: 0,
        }
    }
}

impl<R: Eq + Hash, C: Eq + Hash, V> Table<R, C, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell, returning the previous value if any
    pub fn insert(&mut self, row: R, column: C, value: V) -> Option<V> {
        let old = self.rows.entry(row).or_default().insert(column, value);
        if old.is_none() {
            self.cells += 1;
        }
        old
    }

    pub fn get(&self, row: &R, column: &C) -> Option<&V> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn get_mut(&mut self, row: &R, column: &C) -> Option<&mut V> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(column))
    }

    pub fn contains(&self, row: &R, column: &C) -> bool {
        self.get(row, column).is_some()
    }

    pub fn contains_row(&self, row: &R) -> bool {
        self.rows.contains_key(row)
    }

    pub fn row(&self, row: &R) -> Option<&FxHashMap<C, V>> {
        self.rows.get(row)
    }

    /// Remove a single cell; the row disappears with its last cell
    pub fn remove(&mut self, row: &R, column: &C) -> Option<V> {
        let cells = self.rows.get_mut(row)?;
        let old = cells.remove(column)?;
        if cells.is_empty() {
            self.rows.remove(row);
        }
        self.cells -= 1;
        Some(old)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&R, &FxHashMap<C, V>)> {
        self.rows.iter()
    }

    /// All cells as `(row, column, value)` in unspecified order
    pub fn cells(&self) -> impl Iterator<Item = (&R, &C, &V)> {
        self.rows
            .iter()
            .flat_map(|(r, cols)| cols.iter().map(move |(c, v)| (r, c, v)))
    }

    pub fn len(&self) -> usize {
        self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells == 0
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.cells = 0;
    }
}
