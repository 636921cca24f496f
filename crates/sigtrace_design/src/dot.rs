//! DOT rendering of the closed dependency matrix.
//!
//! One node per port (in-ports as boxes, out-ports as ellipses) and one
//! edge per reachable (in, out) pair. Internal signals never appear in
//! the graph; they only carry reachability during closure.

use crate::analyze::DependencyAnalysis;

/// Renders the in→out reachability of an analysis as a DOT digraph.
pub fn to_dot(analysis: &DependencyAnalysis) -> String {
    let mut out = String::new();
    out.push_str(&format!("digraph {} {{\n", analysis.arch_name));
    out.push_str(&format!(
        "label = \"Architecture {} of entity {}\";\n",
        analysis.arch_name.to_uppercase(),
        analysis.entity_name.to_uppercase()
    ));

    for (name, _) in &analysis.in_ports {
        out.push_str(&format!("   {name} [shape=box];\n"));
    }
    for (name, _) in &analysis.out_ports {
        out.push_str(&format!("   {name} [shape=ellipse];\n"));
    }

    for (in_name, i) in &analysis.in_ports {
        for (out_name, j) in &analysis.out_ports {
            if analysis.matrix.get(*i, *j) {
                out.push_str(&format!("   {in_name} -> {out_name};\n"));
            }
        }
    }

    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::tests::analyze;

    #[test]
    fn identity_wire_graph() {
        let analysis = analyze(
            "entity e is port (a: in bit; b: out bit); end e;\n\
             architecture r of e is begin b <= a; end r;",
        );
        let dot = to_dot(&analysis);
        assert_eq!(
            dot,
            "digraph r {\n\
             label = \"Architecture R of entity E\";\n\
             \x20\x20\x20a [shape=box];\n\
             \x20\x20\x20b [shape=ellipse];\n\
             \x20\x20\x20a -> b;\n\
             }\n"
        );
    }

    #[test]
    fn through_signal_edge_appears_but_signal_node_does_not() {
        let analysis = analyze(
            "entity e is port (a: in bit; z: out bit); end e;\n\
             architecture r of e is signal s: bit; begin s <= a; z <= s; end r;",
        );
        let dot = to_dot(&analysis);
        assert!(dot.contains("   a -> z;\n"));
        assert!(!dot.contains("s [shape"));
        assert!(!dot.contains("a -> s"));
    }

    #[test]
    fn unconnected_ports_still_get_nodes() {
        let analysis = analyze(
            "entity e is port (a: in bit; b: out bit); end e;\n\
             architecture r of e is begin end r;",
        );
        let dot = to_dot(&analysis);
        assert!(dot.contains("   a [shape=box];\n"));
        assert!(dot.contains("   b [shape=ellipse];\n"));
        assert!(!dot.contains("->"));
    }

    #[test]
    fn gated_wire_has_both_edges() {
        let analysis = analyze(
            "entity e is port (a: in bit; g: in bit; b: out bit); end e;\n\
             architecture r of e is begin b <= a when g = '1' else '0'; end r;",
        );
        let dot = to_dot(&analysis);
        assert!(dot.contains("   a -> b;\n"));
        assert!(dot.contains("   g -> b;\n"));
    }
}
