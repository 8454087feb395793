//! Path edges: the solver's unit of work

use std::fmt::{self, Debug, Display};

/// Path edge: (d1, n, d2)
///
/// Represents "if `source_fact` holds at the start of the procedure containing
/// `target`, then `target_fact` holds at `target`".
///
/// Example:
///   PathEdge(Λ, line_10, Tainted(x))
///   → "x is tainted at line_10 whenever line_10 is reached"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathEdge<N, D> {
    /// Fact at the procedure's start point
    pub source_fact: D,

    pub target: N,

    /// Fact at `target`
    pub target_fact: D,
}

impl<N, D> PathEdge<N, D> {
    pub fn new(source_fact: D, target: N, target_fact: D) -> Self {
        Self {
            source_fact,
            target,
            target_fact,
        }
    }

    pub fn into_parts(self) -> (D, N, D) {
        (self.source_fact, self.target, self.target_fact)
    }
}

impl<N: Debug, D: Debug> Display for PathEdge<N, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{:?}> -> <{:?}, {:?}>",
            self.source_fact, self.target, self.target_fact
        )
    }
}
