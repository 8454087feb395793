//! IDE value lattices
//!
//! Orientation used throughout the solver: `top` is the least-informative
//! value (nothing reached yet) and the identity of `join`; `bottom` is the
//! most conservative value and absorbs every join.

use std::fmt::{self, Debug, Display};

/// Value in the IDE lattice
///
/// Example:
///   - Constant propagation: Top / Const(i64) / Bottom (not a constant)
///   - IFDS reachability: [`BinaryDomain`]
///
/// `join` must be commutative, associative and idempotent, and the lattice
/// must have finite height. The solver does not detect infinite ascending
/// chains; they show up as non-termination.
pub trait IdeValue: Clone + Eq + Debug + Send + Sync + 'static {
    /// Top element (⊤): no information / unreached
    fn top() -> Self;

    /// Bottom element (⊥): overdefined
    fn bottom() -> Self;

    /// Least upper bound towards ⊥
    ///
    /// Properties:
    /// - Top is identity: join(a, Top) = a
    /// - Bottom is zero: join(a, Bottom) = Bottom
    fn join(&self, other: &Self) -> Self;

    fn is_top(&self) -> bool {
        *self == Self::top()
    }

    fn is_bottom(&self) -> bool {
        *self == Self::bottom()
    }
}

/// Two-point lattice making IDE coincide with IFDS
///
/// A fact holds at a node iff its value there is `Bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BinaryDomain {
    Bottom,
    Top,
}

impl IdeValue for BinaryDomain {
    fn top() -> Self {
        BinaryDomain::Top
    }

    fn bottom() -> Self {
        BinaryDomain::Bottom
    }

    fn join(&self, other: &Self) -> Self {
        match (self, other) {
            (BinaryDomain::Top, BinaryDomain::Top) => BinaryDomain::Top,
            _ => BinaryDomain::Bottom,
        }
    }
}

impl Display for BinaryDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryDomain::Top => write!(f, "TOP"),
            BinaryDomain::Bottom => write!(f, "BOTTOM"),
        }
    }
}
