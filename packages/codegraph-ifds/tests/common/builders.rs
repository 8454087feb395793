//! Synthetic ICFGs
//!
//! Node names carry their procedure's initial (`m*` for main, `f*` for foo
//! and so on); the source program each graph models is in the doc comment.

use codegraph_ifds::ProgramIcfg;

/// Procedure with a straight-line body `nodes[0] → … → nodes[last]`
fn straight_line(icfg: &mut ProgramIcfg, procedure: &str, nodes: &[&str]) {
    icfg.add_procedure(procedure, nodes[0]).unwrap();
    for node in &nodes[1..nodes.len() - 1] {
        icfg.add_node(procedure, *node).unwrap();
    }
    icfg.add_exit(procedure, nodes[nodes.len() - 1]).unwrap();
}

/// ```text
/// foo()  { f0: x = 42; f1: return; }
/// main() { m0: foo(); m1: y = x + 1; m2: return; }
/// ```
pub fn globals_icfg() -> ProgramIcfg {
    let mut icfg = ProgramIcfg::new();
    straight_line(&mut icfg, "foo", &["f0", "f1"]);
    icfg.add_edge("f0", "f1").unwrap();

    straight_line(&mut icfg, "main", &["m0", "m1", "m2"]);
    icfg.add_edge("m1", "m2").unwrap();
    icfg.add_call("m0", "foo", "m1").unwrap();

    icfg.set_label("f0", "x = 42").unwrap();
    icfg.set_label("m1", "y = x + 1").unwrap();
    icfg
}

/// ```text
/// g(p)   { g0: r = p + 3; g1: return r; }
/// main() { m0: a = 1; m1: b = g(a); m2: return; }
/// ```
pub fn parameter_icfg() -> ProgramIcfg {
    let mut icfg = ProgramIcfg::new();
    straight_line(&mut icfg, "g", &["g0", "g1"]);
    icfg.add_edge("g0", "g1").unwrap();

    straight_line(&mut icfg, "main", &["m0", "m1", "m2"]);
    icfg.add_edge("m0", "m1").unwrap();
    icfg.add_call("m1", "g", "m2").unwrap();
    icfg
}

/// ```text
/// f(n)   { f0: if (n > 0) { f1: f(n - 1); f2: } f3: return; }
/// main() { m0: n = DEPTH; m1: f(n); m2: return; }
/// ```
pub fn recursion_icfg() -> ProgramIcfg {
    let mut icfg = ProgramIcfg::new();
    icfg.add_procedure("f", "f0").unwrap();
    icfg.add_node("f", "f1").unwrap();
    icfg.add_node("f", "f2").unwrap();
    icfg.add_exit("f", "f3").unwrap();
    icfg.add_edge("f0", "f1").unwrap();
    icfg.add_edge("f0", "f3").unwrap();
    icfg.add_edge("f2", "f3").unwrap();
    icfg.add_call("f1", "f", "f2").unwrap();

    straight_line(&mut icfg, "main", &["m0", "m1", "m2"]);
    icfg.add_edge("m0", "m1").unwrap();
    icfg.add_call("m1", "f", "m2").unwrap();
    icfg
}

/// ```text
/// inc()  { i0: x = x + 1; i1: return; }
/// main() {
///   m0: if (*) { m1: x = 1; } else { m2: x = 2; }
///   m3: inc(); m4: inc(); m5: y = 2 * x; m6: return;
/// }
/// ```
pub fn diamond_icfg() -> ProgramIcfg {
    let mut icfg = ProgramIcfg::new();
    straight_line(&mut icfg, "inc", &["i0", "i1"]);
    icfg.add_edge("i0", "i1").unwrap();

    straight_line(&mut icfg, "main", &["m0", "m1", "m2", "m3", "m4", "m5", "m6"]);
    icfg.add_edge("m0", "m1").unwrap();
    icfg.add_edge("m0", "m2").unwrap();
    icfg.add_edge("m1", "m3").unwrap();
    icfg.add_edge("m2", "m3").unwrap();
    icfg.add_call("m3", "inc", "m4").unwrap();
    icfg.add_call("m4", "inc", "m5").unwrap();
    icfg.add_edge("m5", "m6").unwrap();
    icfg
}

/// ```text
/// foo()  { f0: ; f1: ; f2: return; }
/// main() { m0: foo(); m1: foo(); m2: foo(); m3: return; }
/// ```
pub fn repeated_calls_icfg() -> ProgramIcfg {
    let mut icfg = ProgramIcfg::new();
    straight_line(&mut icfg, "foo", &["f0", "f1", "f2"]);
    icfg.add_edge("f0", "f1").unwrap();
    icfg.add_edge("f1", "f2").unwrap();

    straight_line(&mut icfg, "main", &["m0", "m1", "m2", "m3"]);
    icfg.add_call("m0", "foo", "m1").unwrap();
    icfg.add_call("m1", "foo", "m2").unwrap();
    icfg.add_call("m2", "foo", "m3").unwrap();
    icfg
}

/// ```text
/// foo()  { f0: ; f1: ; f2: return; }
/// main() { m0: foo(); m1: ; m2: ; m3: ; m4: foo(); m5: return; }
/// ```
pub fn late_second_call_icfg() -> ProgramIcfg {
    let mut icfg = ProgramIcfg::new();
    straight_line(&mut icfg, "foo", &["f0", "f1", "f2"]);
    icfg.add_edge("f0", "f1").unwrap();
    icfg.add_edge("f1", "f2").unwrap();

    straight_line(&mut icfg, "main", &["m0", "m1", "m2", "m3", "m4", "m5"]);
    icfg.add_call("m0", "foo", "m1").unwrap();
    icfg.add_edge("m1", "m2").unwrap();
    icfg.add_edge("m2", "m3").unwrap();
    icfg.add_edge("m3", "m4").unwrap();
    icfg.add_call("m4", "foo", "m5").unwrap();
    icfg
}

/// ```text
/// main() { m0: t = source(); m1: sink(t); m2: return; }
/// ```
///
/// With `source_body`, `source` is analysed (`s0 → s1`); otherwise both
/// callees are declarations.
pub fn source_sink_icfg(source_body: bool) -> ProgramIcfg {
    let mut icfg = ProgramIcfg::new();
    if source_body {
        straight_line(&mut icfg, "source", &["s0", "s1"]);
        icfg.add_edge("s0", "s1").unwrap();
    } else {
        icfg.add_declaration("source").unwrap();
    }
    icfg.add_declaration("sink").unwrap();

    straight_line(&mut icfg, "main", &["m0", "m1", "m2"]);
    icfg.add_call("m0", "source", "m1").unwrap();
    icfg.add_call("m1", "sink", "m2").unwrap();
    icfg
}

/// ```text
/// main() { m0: t = source(); m1: t = clean(t); m2: sink(t); m3: return; }
/// ```
pub fn sanitized_icfg() -> ProgramIcfg {
    let mut icfg = ProgramIcfg::new();
    icfg.add_declaration("source").unwrap();
    icfg.add_declaration("sink").unwrap();

    straight_line(&mut icfg, "main", &["m0", "m1", "m2", "m3"]);
    icfg.add_call("m0", "source", "m1").unwrap();
    icfg.add_edge("m1", "m2").unwrap();
    icfg.add_call("m2", "sink", "m3").unwrap();
    icfg
}

pub fn node(name: &str) -> String {
    name.to_string()
}
