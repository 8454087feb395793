/*
 * Edge Functions (IDE micro-functions)
 *
 * An edge function is a pure, immutable transformer L → L attached to an
 * exploded-supergraph edge. Jump functions are built by composing and joining
 * them.
 *
 * Representation:
 * - Closed fast-path variants: Identity, AllTop, AllBottom, Constant
 * - Open client variants: `Custom(Arc<dyn EdgeFunctionImpl<L>>)`
 * - Built-in open variants: EdgeFunctionComposer, JoinEdgeFunction
 *
 * Conventions:
 * - `f.compose_with(g)` is "first f, then g": (f;g)(x) = g(f(x))
 * - AllTop is the "no path" element: it annihilates composition on both
 *   sides and is the identity of join
 * - Equality is structural; the solver's fixed-point check depends on it
 */

use std::any::Any;
use std::fmt::{self, Debug, Display};
use std::sync::Arc;

use super::lattice::IdeValue;

/// Distinct members a [`JoinEdgeFunction`] keeps before widening to AllBottom
pub const JOIN_EDGE_FUNCTION_LIMIT: usize = 8;

/// Client-defined edge function
///
/// Implementations should be small immutable values. `compose_with` and
/// `join_with` may return a simplified function of a different kind (two
/// linear functions composing into one, a linear function after a constant
/// collapsing into a constant); returning `None` makes the solver fall back to
/// the generic [`EdgeFunctionComposer`] / [`JoinEdgeFunction`].
///
/// Clients whose compositions never simplify must make sure the generic
/// fallbacks cannot nest forever, e.g. by joining to AllBottom.
pub trait EdgeFunctionImpl<L>: Debug + Send + Sync + 'static {
    fn compute_target(&self, source: &L) -> L;

    /// Specialised composition: `self` first, then `second`
    fn compose_with(&self, _second: &EdgeFunction<L>) -> Option<EdgeFunction<L>> {
        None
    }

    /// Specialised pointwise join with `other`
    ///
    /// Must agree with the answer `other` would give for `self`: the solver
    /// asks client functions before the generic join set, but between two
    /// client functions it asks the left operand first.
    fn join_with(&self, _other: &EdgeFunction<L>) -> Option<EdgeFunction<L>> {
        None
    }

    /// Structural equality; see [`same_edge_function`]
    fn equal_to(&self, other: &dyn EdgeFunctionImpl<L>) -> bool;

    fn as_any(&self) -> &dyn Any;
}

/// `equal_to` for implementations that derive `PartialEq`
pub fn same_edge_function<T, L: 'static>(this: &T, other: &dyn EdgeFunctionImpl<L>) -> bool
where
    T: PartialEq + 'static,
{
    other
        .as_any()
        .downcast_ref::<T>()
        .is_some_and(|other| other == this)
}

/// Edge function handle (cheap to clone)
#[derive(Debug, Clone)]
pub enum EdgeFunction<L> {
    /// λx.x
    Identity,
    /// λx.⊤; never stored in the jump-function table
    AllTop,
    /// λx.⊥
    AllBottom,
    /// λx.c; build through [`EdgeFunction::constant`] so ⊤/⊥ collapse
    Constant(L),
    Custom(Arc<dyn EdgeFunctionImpl<L>>),
}

impl<L: IdeValue> EdgeFunction<L> {
    pub fn custom(function: impl EdgeFunctionImpl<L>) -> Self {
        EdgeFunction::Custom(Arc::new(function))
    }

    /// Constant function, normalised to AllTop / AllBottom at the extremes
    pub fn constant(value: L) -> Self {
        if value.is_top() {
            EdgeFunction::AllTop
        } else if value.is_bottom() {
            EdgeFunction::AllBottom
        } else {
            EdgeFunction::Constant(value)
        }
    }

    pub fn compute_target(&self, source: &L) -> L {
        match self {
            EdgeFunction::Identity => source.clone(),
            EdgeFunction::AllTop => L::top(),
            EdgeFunction::AllBottom => L::bottom(),
            EdgeFunction::Constant(value) => value.clone(),
            EdgeFunction::Custom(function) => function.compute_target(source),
        }
    }

    /// `self` first, then `second`
    pub fn compose_with(&self, second: &EdgeFunction<L>) -> EdgeFunction<L> {
        match (self, second) {
            (EdgeFunction::AllTop, _) | (_, EdgeFunction::AllTop) => EdgeFunction::AllTop,
            (EdgeFunction::Identity, _) => second.clone(),
            (_, EdgeFunction::Identity) => self.clone(),
            // A constant-valued first function fixes the input of `second`
            (EdgeFunction::AllBottom, _) => Self::constant(second.compute_target(&L::bottom())),
            (EdgeFunction::Constant(value), _) => Self::constant(second.compute_target(value)),
            (_, EdgeFunction::AllBottom) | (_, EdgeFunction::Constant(_)) => second.clone(),
            (EdgeFunction::Custom(first), _) => first
                .compose_with(second)
                .unwrap_or_else(|| EdgeFunctionComposer::create(self.clone(), second.clone())),
        }
    }

    /// Pointwise join
    pub fn join_with(&self, other: &EdgeFunction<L>) -> EdgeFunction<L> {
        if self == other {
            return self.clone();
        }
        match (self, other) {
            (EdgeFunction::AllTop, _) => other.clone(),
            (_, EdgeFunction::AllTop) => self.clone(),
            (EdgeFunction::AllBottom, _) | (_, EdgeFunction::AllBottom) => EdgeFunction::AllBottom,
            (EdgeFunction::Constant(a), EdgeFunction::Constant(b)) => Self::constant(a.join(b)),
            _ => {
                // Client functions answer before the generic composer / join
                // set, whichever side they are on
                let (first, second) = if other.is_client_function() && !self.is_client_function() {
                    (other, self)
                } else {
                    (self, other)
                };
                first
                    .custom_join(second)
                    .or_else(|| second.custom_join(first))
                    .unwrap_or_else(|| JoinEdgeFunction::create(self, other))
            }
        }
    }

    fn custom_join(&self, other: &EdgeFunction<L>) -> Option<EdgeFunction<L>> {
        match self {
            EdgeFunction::Custom(function) => function.join_with(other),
            _ => None,
        }
    }

    /// `Custom` function that is neither a composer nor a join set
    fn is_client_function(&self) -> bool {
        matches!(self, EdgeFunction::Custom(_))
            && self.downcast_ref::<EdgeFunctionComposer<L>>().is_none()
            && self.downcast_ref::<JoinEdgeFunction<L>>().is_none()
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, EdgeFunction::Identity)
    }

    pub fn is_all_top(&self) -> bool {
        matches!(self, EdgeFunction::AllTop)
    }

    pub fn is_all_bottom(&self) -> bool {
        matches!(self, EdgeFunction::AllBottom)
    }

    /// Ignores its input
    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            EdgeFunction::AllTop | EdgeFunction::AllBottom | EdgeFunction::Constant(_)
        )
    }

    /// Concrete client implementation behind a `Custom` handle
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            EdgeFunction::Custom(function) => function.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl<L: IdeValue> PartialEq for EdgeFunction<L> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (EdgeFunction::Identity, EdgeFunction::Identity)
            | (EdgeFunction::AllTop, EdgeFunction::AllTop)
            | (EdgeFunction::AllBottom, EdgeFunction::AllBottom) => true,
            (EdgeFunction::Constant(a), EdgeFunction::Constant(b)) => a == b,
            (EdgeFunction::Custom(a), EdgeFunction::Custom(b)) => {
                Arc::ptr_eq(a, b) || a.equal_to(b.as_ref())
            }
            _ => false,
        }
    }
}

impl<L: IdeValue> Eq for EdgeFunction<L> {}

impl<L: IdeValue> Display for EdgeFunction<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeFunction::Identity => write!(f, "EdgeIdentity"),
            EdgeFunction::AllTop => write!(f, "AllTop"),
            EdgeFunction::AllBottom => write!(f, "AllBottom"),
            EdgeFunction::Constant(value) => write!(f, "Const[{value:?}]"),
            EdgeFunction::Custom(function) => write!(f, "{function:?}"),
        }
    }
}

/// Generic `first` then `second`
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeFunctionComposer<L: IdeValue> {
    first: EdgeFunction<L>,
    second: EdgeFunction<L>,
}

impl<L: IdeValue> EdgeFunctionComposer<L> {
    pub fn create(first: EdgeFunction<L>, second: EdgeFunction<L>) -> EdgeFunction<L> {
        EdgeFunction::custom(Self { first, second })
    }

    pub fn first(&self) -> &EdgeFunction<L> {
        &self.first
    }

    pub fn second(&self) -> &EdgeFunction<L> {
        &self.second
    }
}

impl<L: IdeValue> EdgeFunctionImpl<L> for EdgeFunctionComposer<L> {
    fn compute_target(&self, source: &L) -> L {
        self.second
            .compute_target(&self.first.compute_target(source))
    }

    // (f;s);g = f;(s;g), giving `s` the chance to simplify with `g`
    fn compose_with(&self, second: &EdgeFunction<L>) -> Option<EdgeFunction<L>> {
        Some(self.first.compose_with(&self.second.compose_with(second)))
    }

    fn equal_to(&self, other: &dyn EdgeFunctionImpl<L>) -> bool {
        same_edge_function(self, other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Pointwise join of a set of functions
///
/// Constant members are merged eagerly. More than
/// [`JOIN_EDGE_FUNCTION_LIMIT`] distinct members widen to AllBottom, which
/// bounds chains of joins built from non-simplifying client functions.
#[derive(Debug, Clone)]
pub struct JoinEdgeFunction<L: IdeValue> {
    members: Vec<EdgeFunction<L>>,
}

impl<L: IdeValue> JoinEdgeFunction<L> {
    pub fn create(a: &EdgeFunction<L>, b: &EdgeFunction<L>) -> EdgeFunction<L> {
        Self::from_members(Self::flatten(a).chain(Self::flatten(b)))
    }

    pub fn members(&self) -> &[EdgeFunction<L>] {
        &self.members
    }

    fn flatten(function: &EdgeFunction<L>) -> Box<dyn Iterator<Item = EdgeFunction<L>> + '_> {
        match function.downcast_ref::<JoinEdgeFunction<L>>() {
            Some(join) => Box::new(join.members.iter().cloned()),
            None => Box::new(std::iter::once(function.clone())),
        }
    }

    fn from_members(candidates: impl Iterator<Item = EdgeFunction<L>>) -> EdgeFunction<L> {
        let mut members: Vec<EdgeFunction<L>> = Vec::new();
        let mut constant: Option<L> = None;
        for member in candidates {
            match member {
                EdgeFunction::AllTop => {}
                EdgeFunction::AllBottom => return EdgeFunction::AllBottom,
                EdgeFunction::Constant(value) => {
                    let merged = match constant.take() {
                        Some(existing) => existing.join(&value),
                        None => value,
                    };
                    if merged.is_bottom() {
                        return EdgeFunction::AllBottom;
                    }
                    constant = Some(merged);
                }
                other => {
                    if !members.contains(&other) {
                        members.push(other);
                    }
                }
            }
        }
        if let Some(value) = constant {
            members.push(EdgeFunction::constant(value));
        }

        match members.len() {
            0 => EdgeFunction::AllTop,
            1 => members.remove(0),
            n if n > JOIN_EDGE_FUNCTION_LIMIT => EdgeFunction::AllBottom,
            _ => EdgeFunction::custom(Self { members }),
        }
    }
}

impl<L: IdeValue> PartialEq for JoinEdgeFunction<L> {
    fn eq(&self, other: &Self) -> bool {
        self.members.len() == other.members.len()
            && self.members.iter().all(|m| other.members.contains(m))
    }
}

impl<L: IdeValue> EdgeFunctionImpl<L> for JoinEdgeFunction<L> {
    fn compute_target(&self, source: &L) -> L {
        self.members
            .iter()
            .map(|m| m.compute_target(source))
            .fold(L::top(), |acc, v| acc.join(&v))
    }

    fn join_with(&self, other: &EdgeFunction<L>) -> Option<EdgeFunction<L>> {
        Some(Self::from_members(
            self.members.iter().cloned().chain(Self::flatten(other)),
        ))
    }

    fn equal_to(&self, other: &dyn EdgeFunctionImpl<L>) -> bool {
        same_edge_function(self, other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
