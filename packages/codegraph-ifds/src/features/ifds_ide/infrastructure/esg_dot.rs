//! Exploded-supergraph DOT export
//!
//! One cluster per procedure. Each statement gets a header node and one node
//! per fact recorded at it; intraprocedural fact edges are drawn inside the
//! clusters, call and return edges between them.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Write};
use std::hash::Hash;

use super::edge_history::EdgeHistory;
use crate::config::DotConfig;
use crate::features::ifds_ide::domain::IdeValue;
use crate::features::ifds_ide::ports::Icfg;

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

pub fn write_esg_dot<I, D, L>(
    out: &mut impl Write,
    icfg: &I,
    history: &EdgeHistory<I::Node, D, L>,
    zero_value: &D,
    fact_label: impl Fn(&D) -> String,
    config: &DotConfig,
) -> fmt::Result
where
    I: Icfg,
    D: Clone + Eq + Hash + Ord + Debug,
    L: IdeValue,
{
    let exploded = history.exploded_nodes();

    // Stable ids: statements by position, facts by first appearance in fact order
    let statement_ids: BTreeMap<&I::Node, usize> =
        exploded.keys().enumerate().map(|(i, n)| (n, i)).collect();
    let mut fact_ids: BTreeMap<&D, usize> = BTreeMap::new();
    for facts in exploded.values() {
        for fact in facts {
            let next = fact_ids.len();
            fact_ids.entry(fact).or_insert(next);
        }
    }
    let fact_node = |n: &I::Node, d: &D| -> String {
        format!("n{}_d{}", statement_ids[n], fact_ids[d])
    };
    let label_of = |d: &D| -> String {
        if d == zero_value {
            config.zero_fact_label.clone()
        } else {
            fact_label(d)
        }
    };

    let mut clusters: BTreeMap<String, Vec<&I::Node>> = BTreeMap::new();
    for node in exploded.keys() {
        let procedure = icfg
            .procedure_of(node)
            .map(|m| icfg.procedure_name(&m))
            .unwrap_or_else(|| "<unknown>".to_string());
        clusters.entry(procedure).or_default().push(node);
    }

    writeln!(out, "digraph \"{}\" {{", escape(&config.graph_name))?;
    writeln!(out, "  fontname=\"{}\";", escape(&config.font))?;
    writeln!(out, "  node [fontname=\"{}\"];", escape(&config.font))?;
    writeln!(out, "  edge [fontname=\"{}\"];", escape(&config.font))?;

    for (index, (procedure, nodes)) in clusters.iter().enumerate() {
        writeln!(out, "  subgraph cluster_{index} {{")?;
        writeln!(out, "    label=\"{}\";", escape(procedure))?;
        for node in nodes {
            let id = statement_ids[*node];
            writeln!(
                out,
                "    n{id} [label=\"{}\", {}];",
                escape(&icfg.node_label(node)),
                config.statement_node_style
            )?;
            for fact in &exploded[*node] {
                let style = if fact == zero_value {
                    &config.zero_fact_node_style
                } else {
                    &config.fact_node_style
                };
                writeln!(
                    out,
                    "    {} [label=\"{}\", {}];",
                    fact_node(*node, fact),
                    escape(&label_of(fact)),
                    style
                )?;
            }
        }
        writeln!(out, "  }}")?;
    }

    // Control flow between statement headers, once per node pair
    let mut cfg_pairs: Vec<(usize, usize)> = history
        .intra_edges()
        .map(|((from, to, _), _)| (statement_ids[from], statement_ids[to]))
        .collect();
    cfg_pairs.dedup();
    for (from, to) in cfg_pairs {
        writeln!(out, "  n{from} -> n{to} [{}];", config.cfg_edge_style)?;
    }

    for (edges, style) in [
        (history.intra_edges().collect::<Vec<_>>(), &config.intra_edge_style),
        (history.inter_edges().collect::<Vec<_>>(), &config.inter_edge_style),
    ] {
        for ((from, to, kind), facts) in edges {
            for (source, targets) in facts {
                for target in targets {
                    let mut attributes = style.clone();
                    let function = history.edge_function(from, source, to, target);
                    match function {
                        Some(function) if config.show_edge_functions => {
                            write!(attributes, ", label=\"{}\"", escape(&function.to_string()))?;
                        }
                        _ if kind.is_inter() => {
                            write!(attributes, ", label=\"{kind}\"")?;
                        }
                        _ => {}
                    }
                    writeln!(
                        out,
                        "  {} -> {} [{}];",
                        fact_node(from, source),
                        fact_node(to, target),
                        attributes
                    )?;
                }
            }
        }
    }

    writeln!(out, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ifds_ide::domain::{BinaryDomain, EdgeFunction, FactSet};
    use crate::features::ifds_ide::infrastructure::edge_history::EsgEdgeKind;
    use crate::features::ifds_ide::infrastructure::program_icfg::ProgramIcfg;

    fn icfg() -> ProgramIcfg {
        let mut icfg = ProgramIcfg::new();
        icfg.add_procedure("main", "m0").unwrap();
        icfg.add_node("main", "m1").unwrap();
        icfg.add_exit("main", "m2").unwrap();
        icfg.add_procedure("foo", "f0").unwrap();
        icfg.add_exit("foo", "f1").unwrap();
        icfg.add_edge("f0", "f1").unwrap();
        icfg.add_edge("m1", "m2").unwrap();
        icfg.add_call("m0", "foo", "m1").unwrap();
        icfg
    }

    #[test]
    fn test_dot_has_one_cluster_per_procedure() {
        let icfg = icfg();
        let mut history: EdgeHistory<String, u32, BinaryDomain> = EdgeHistory::new(true);
        let m1 = "m1".to_string();
        let m2 = "m2".to_string();
        history.save_edges(&m1, &m2, &0, &FactSet::from([0, 1]), EsgEdgeKind::Normal);
        history.save_edge_function(&m1, &0, &m2, &1, &EdgeFunction::AllBottom);
        history.save_edges(
            &"m0".to_string(),
            &"f0".to_string(),
            &0,
            &FactSet::from([0]),
            EsgEdgeKind::Call,
        );

        let mut dot = String::new();
        write_esg_dot(&mut dot, &icfg, &history, &0, |d| format!("v{d}"), &DotConfig::default())
            .unwrap();

        assert!(dot.starts_with("digraph \"ESG\" {"));
        assert_eq!(dot.matches("subgraph cluster_").count(), 2);
        assert!(dot.contains("label=\"main\""));
        assert!(dot.contains("label=\"foo\""));
        assert!(dot.contains("label=\"Λ\""));
        assert!(dot.contains("label=\"v1\""));
        assert!(dot.contains("style=dotted, label=\"AllBottom\""));
        assert!(dot.contains("style=dashed, weight=0.1, label=\"Call\""));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape("x = \"a\""), "x = \\\"a\\\"");
    }
}
