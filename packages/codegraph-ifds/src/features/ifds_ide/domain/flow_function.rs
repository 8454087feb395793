//! Flow functions: transformers over sets of data-flow facts
//!
//! A flow function maps one source fact to the set of facts it generates at
//! the target. Functions are shared as `Arc<dyn FlowFunction<D>>` so the
//! solver's cache can hand the same object out for every query on one edge.

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::sync::Arc;

/// Result set of a flow function (ordered, for deterministic traversal)
pub type FactSet<D> = BTreeSet<D>;

pub trait FlowFunction<D>: Send + Sync {
    fn compute_targets(&self, source: &D) -> FactSet<D>;
}

pub type FlowFunctionPtr<D> = Arc<dyn FlowFunction<D>>;

/// Identity flow function: every fact flows through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFlow;

impl<D: Clone + Ord> FlowFunction<D> for IdentityFlow {
    fn compute_targets(&self, source: &D) -> FactSet<D> {
        FactSet::from([source.clone()])
    }
}

/// Kills every fact (the zero fact survives only through the auto-zero wrapper)
#[derive(Debug, Clone, Copy, Default)]
pub struct KillAllFlow;

impl<D: Ord> FlowFunction<D> for KillAllFlow {
    fn compute_targets(&self, _source: &D) -> FactSet<D> {
        FactSet::new()
    }
}

/// Generates `generated` whenever `from` holds; everything else flows through
#[derive(Debug, Clone)]
pub struct GenFlow<D> {
    pub generated: D,
    pub from: D,
}

impl<D: Clone + Ord + Send + Sync> FlowFunction<D> for GenFlow<D> {
    fn compute_targets(&self, source: &D) -> FactSet<D> {
        if *source == self.from {
            FactSet::from([source.clone(), self.generated.clone()])
        } else {
            FactSet::from([source.clone()])
        }
    }
}

/// Generates several facts from `from`
#[derive(Debug, Clone)]
pub struct GenAllFlow<D> {
    pub generated: FactSet<D>,
    pub from: D,
}

impl<D: Clone + Ord + Send + Sync> FlowFunction<D> for GenAllFlow<D> {
    fn compute_targets(&self, source: &D) -> FactSet<D> {
        let mut targets = FactSet::from([source.clone()]);
        if *source == self.from {
            targets.extend(self.generated.iter().cloned());
        }
        targets
    }
}

/// Kills one fact
#[derive(Debug, Clone)]
pub struct KillFlow<D> {
    pub killed: D,
}

impl<D: Clone + Ord + Send + Sync> FlowFunction<D> for KillFlow<D> {
    fn compute_targets(&self, source: &D) -> FactSet<D> {
        if *source == self.killed {
            FactSet::new()
        } else {
            FactSet::from([source.clone()])
        }
    }
}

/// Kills a set of facts
#[derive(Debug, Clone)]
pub struct KillMultipleFlow<D> {
    pub killed: FactSet<D>,
}

impl<D: Clone + Ord + Send + Sync> FlowFunction<D> for KillMultipleFlow<D> {
    fn compute_targets(&self, source: &D) -> FactSet<D> {
        if self.killed.contains(source) {
            FactSet::new()
        } else {
            FactSet::from([source.clone()])
        }
    }
}

/// Strong update `to := from`: `from` also produces `to`, the old `to` dies
#[derive(Debug, Clone)]
pub struct TransferFlow<D> {
    pub to: D,
    pub from: D,
}

impl<D: Clone + Ord + Send + Sync> FlowFunction<D> for TransferFlow<D> {
    fn compute_targets(&self, source: &D) -> FactSet<D> {
        if *source == self.from {
            FactSet::from([self.from.clone(), self.to.clone()])
        } else if *source == self.to {
            FactSet::new()
        } else {
            FactSet::from([source.clone()])
        }
    }
}

/// Union of the results of several flow functions
pub struct UnionFlow<D> {
    pub flows: Vec<FlowFunctionPtr<D>>,
}

impl<D: Ord> FlowFunction<D> for UnionFlow<D> {
    fn compute_targets(&self, source: &D) -> FactSet<D> {
        self.flows
            .iter()
            .flat_map(|flow| flow.compute_targets(source))
            .collect()
    }
}

/// Closure-backed flow function
pub struct LambdaFlow<F> {
    function: F,
}

impl<D, F> FlowFunction<D> for LambdaFlow<F>
where
    F: Fn(&D) -> FactSet<D> + Send + Sync,
{
    fn compute_targets(&self, source: &D) -> FactSet<D> {
        (self.function)(source)
    }
}

/// Keeps the zero fact alive through `inner`
///
/// Installed by the solver's cache when `auto_add_zero` is on, so client flow
/// functions never have to propagate the zero fact themselves.
pub struct ZeroedFlowFunction<D> {
    inner: FlowFunctionPtr<D>,
    zero: D,
}

impl<D> ZeroedFlowFunction<D> {
    pub fn new(inner: FlowFunctionPtr<D>, zero: D) -> Self {
        Self { inner, zero }
    }
}

impl<D: Clone + Ord + Send + Sync> FlowFunction<D> for ZeroedFlowFunction<D> {
    fn compute_targets(&self, source: &D) -> FactSet<D> {
        let mut targets = self.inner.compute_targets(source);
        if *source == self.zero {
            targets.insert(self.zero.clone());
        }
        targets
    }
}

// Constructors returning shared handles

pub fn identity_flow<D: Clone + Ord + 'static>() -> FlowFunctionPtr<D> {
    Arc::new(IdentityFlow)
}

pub fn kill_all_flow<D: Ord + 'static>() -> FlowFunctionPtr<D> {
    Arc::new(KillAllFlow)
}

pub fn gen_flow<D: Clone + Ord + Send + Sync + 'static>(generated: D, from: D) -> FlowFunctionPtr<D> {
    Arc::new(GenFlow { generated, from })
}

pub fn gen_all_flow<D: Clone + Ord + Send + Sync + 'static>(
    generated: impl IntoIterator<Item = D>,
    from: D,
) -> FlowFunctionPtr<D> {
    Arc::new(GenAllFlow {
        generated: generated.into_iter().collect(),
        from,
    })
}

pub fn kill_flow<D: Clone + Ord + Send + Sync + 'static>(killed: D) -> FlowFunctionPtr<D> {
    Arc::new(KillFlow { killed })
}

pub fn kill_multiple_flow<D: Clone + Ord + Send + Sync + 'static>(
    killed: impl IntoIterator<Item = D>,
) -> FlowFunctionPtr<D> {
    Arc::new(KillMultipleFlow {
        killed: killed.into_iter().collect(),
    })
}

pub fn transfer_flow<D: Clone + Ord + Send + Sync + 'static>(to: D, from: D) -> FlowFunctionPtr<D> {
    Arc::new(TransferFlow { to, from })
}

pub fn union_flows<D: Ord + Send + Sync + 'static>(
    flows: impl IntoIterator<Item = FlowFunctionPtr<D>>,
) -> FlowFunctionPtr<D> {
    Arc::new(UnionFlow {
        flows: flows.into_iter().collect(),
    })
}

pub fn lambda_flow<D, F>(function: F) -> FlowFunctionPtr<D>
where
    D: 'static,
    F: Fn(&D) -> FactSet<D> + Send + Sync + 'static,
{
    Arc::new(LambdaFlow { function })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
    enum TestFact {
        Zero,
        Var(&'static str),
    }

    use TestFact::*;

    fn facts<const N: usize>(items: [TestFact; N]) -> FactSet<TestFact> {
        FactSet::from(items)
    }

    #[test]
    fn test_identity_flow() {
        let flow = identity_flow();
        assert_eq!(flow.compute_targets(&Var("x")), facts([Var("x")]));
    }

    #[test]
    fn test_kill_all_flow() {
        let flow = kill_all_flow();
        assert!(flow.compute_targets(&Var("x")).is_empty());
        assert!(flow.compute_targets(&Zero).is_empty());
    }

    #[test]
    fn test_gen_flow_only_from_trigger() {
        let flow = gen_flow(Var("x"), Zero);
        assert_eq!(flow.compute_targets(&Zero), facts([Zero, Var("x")]));
        assert_eq!(flow.compute_targets(&Var("y")), facts([Var("y")]));
    }

    #[test]
    fn test_gen_all_flow() {
        let flow = gen_all_flow([Var("a"), Var("b")], Zero);
        assert_eq!(flow.compute_targets(&Zero), facts([Zero, Var("a"), Var("b")]));
        assert_eq!(flow.compute_targets(&Var("a")), facts([Var("a")]));
    }

    #[test]
    fn test_kill_flows() {
        let flow = kill_flow(Var("x"));
        assert!(flow.compute_targets(&Var("x")).is_empty());
        assert_eq!(flow.compute_targets(&Var("y")), facts([Var("y")]));

        let flow = kill_multiple_flow([Var("x"), Var("y")]);
        assert!(flow.compute_targets(&Var("y")).is_empty());
        assert_eq!(flow.compute_targets(&Var("z")), facts([Var("z")]));
    }

    #[test]
    fn test_transfer_flow_is_strong_update() {
        let flow = transfer_flow(Var("y"), Var("x"));
        assert_eq!(flow.compute_targets(&Var("x")), facts([Var("x"), Var("y")]));
        assert!(flow.compute_targets(&Var("y")).is_empty());
        assert_eq!(flow.compute_targets(&Var("z")), facts([Var("z")]));
    }

    #[test]
    fn test_union_flows() {
        let flow = union_flows([gen_flow(Var("a"), Zero), gen_flow(Var("b"), Zero)]);
        assert_eq!(flow.compute_targets(&Zero), facts([Zero, Var("a"), Var("b")]));
    }

    #[test]
    fn test_lambda_flow() {
        let flow = lambda_flow(|d: &TestFact| match d {
            Var(name) if name.starts_with('t') => facts([d.clone(), Var("sink")]),
            _ => facts([d.clone()]),
        });
        assert_eq!(flow.compute_targets(&Var("tmp")), facts([Var("tmp"), Var("sink")]));
    }

    #[test]
    fn test_zeroed_wrapper_preserves_zero_only() {
        let flow = ZeroedFlowFunction::new(kill_all_flow(), Zero);
        assert_eq!(flow.compute_targets(&Zero), facts([Zero]));
        assert!(flow.compute_targets(&Var("x")).is_empty());
    }
}
