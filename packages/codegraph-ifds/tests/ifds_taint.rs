//! Taint reachability through the IFDS adapter

mod common;

use codegraph_ifds::features::ifds_ide::domain::flow_function::gen_flow;
use codegraph_ifds::{
    DotConfig, EdgeFunction, FunctionKind, IfdsProblemAdapter, IfdsSolver, SolverConfig,
    SpecialSummaries,
};
use common::*;

#[test]
fn test_source_result_reaches_sink_call() {
    let icfg = source_sink_icfg(false);
    let adapter = IfdsProblemAdapter::new(TaintProblem::new("m0").source_call("m0", "secret"));
    let mut solver = IfdsSolver::new(&adapter, &icfg).unwrap();
    solver.solve().unwrap();

    let results = solver.solver_results();
    assert!(!results.ifds_results_at(&node("m0")).contains(&tainted("secret")));
    assert!(results.ifds_results_at(&node("m1")).contains(&tainted("secret")));
    assert!(results.ifds_results_at(&node("m2")).contains(&tainted("secret")));
    assert_eq!(solver.statistics().gen_facts, 0);
}

#[test]
fn test_taint_generated_inside_analysed_source() {
    let icfg = source_sink_icfg(true);
    let adapter = IfdsProblemAdapter::new(TaintProblem::new("m0").gen_at("s0", "secret"));
    let mut solver = IfdsSolver::new(&adapter, &icfg).unwrap();
    solver.solve().unwrap();

    let results = solver.solver_results();
    assert!(results.ifds_results_at(&node("s0")).is_empty());
    assert!(results.ifds_results_at(&node("s1")).contains(&tainted("secret")));
    assert!(results.ifds_results_at(&node("m1")).contains(&tainted("secret")));
    assert!(!results.ifds_results_at(&node("m0")).contains(&tainted("secret")));
    assert_eq!(solver.statistics().gen_facts, 1);
}

#[test]
fn test_sanitizer_kills_taint() {
    let icfg = sanitized_icfg();
    let adapter = IfdsProblemAdapter::new(
        TaintProblem::new("m0")
            .source_call("m0", "secret")
            .sanitize_at("m1", "secret"),
    );
    let mut solver = IfdsSolver::new(&adapter, &icfg).unwrap();
    solver.solve().unwrap();

    assert!(solver.facts_at(&node("m1")).contains(&tainted("secret")));
    assert!(!solver.facts_at(&node("m2")).contains(&tainted("secret")));
    assert!(solver
        .solver_results()
        .ifds_results_at(&node("m2"))
        .is_empty());
}

#[test]
fn test_reachability_preset_keeps_facts_without_values() {
    let icfg = source_sink_icfg(false);
    let adapter = IfdsProblemAdapter::new(
        TaintProblem::new("m0")
            .source_call("m0", "secret")
            .with_config(SolverConfig::reachability()),
    );
    let mut solver = IfdsSolver::new(&adapter, &icfg).unwrap();
    solver.solve().unwrap();

    assert!(solver.solver_results().is_empty());
    assert!(solver.facts_at(&node("m1")).contains(&tainted("secret")));
    assert_eq!(solver.statistics().phase_two_time_ms, 0);
}

#[test]
fn test_special_summary_models_declared_source() {
    let icfg = source_sink_icfg(false);
    let adapter = IfdsProblemAdapter::new(TaintProblem::new("m0"));

    let mut summaries = SpecialSummaries::new();
    summaries.register(
        node("source"),
        gen_flow(tainted("secret"), Taint::Zero),
        EdgeFunction::Identity,
    );
    let mut solver =
        IfdsSolver::with_special_summaries(&adapter, &icfg, SolverConfig::default(), summaries)
            .unwrap();
    solver.solve().unwrap();

    assert!(solver
        .solver_results()
        .ifds_results_at(&node("m1"))
        .contains(&tainted("secret")));
    assert_eq!(solver.statistics().special_summary_applications, 1);
    assert_eq!(
        solver.cache_statistics().flow(FunctionKind::Summary).constructions,
        2
    );
}

#[test]
fn test_esg_dot_shows_taint_flow() {
    let icfg = source_sink_icfg(true);
    let adapter = IfdsProblemAdapter::new(
        TaintProblem::new("m0")
            .gen_at("s0", "secret")
            .with_config(SolverConfig::diagnostics()),
    );
    let mut solver = IfdsSolver::new(&adapter, &icfg).unwrap();
    solver.solve().unwrap();

    let mut dot = String::new();
    solver.emit_esg_as_dot(&mut dot, &DotConfig::default()).unwrap();
    assert!(dot.starts_with("digraph \"ESG\" {"));
    assert!(dot.contains("label=\"main\""));
    assert!(dot.contains("label=\"source\""));
    assert!(dot.contains("Value(\\\"secret\\\")"));
    assert!(dot.contains("label=\"EdgeIdentity\""));
}

#[test]
fn test_default_text_report() {
    let icfg = source_sink_icfg(false);
    let adapter = IfdsProblemAdapter::new(TaintProblem::new("m0").source_call("m0", "secret"));
    let mut solver = IfdsSolver::new(&adapter, &icfg).unwrap();
    solver.solve().unwrap();

    let mut report = String::new();
    solver.emit_text_report(&mut report).unwrap();
    assert_eq!(report, "No text report available!\n");
}
