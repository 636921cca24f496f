//! The dependency walk over an architecture's statements.
//!
//! Identifiers get dense matrix indices in a fixed order — entity
//! in-ports, entity out-ports, architecture signals, each in declaration
//! order. The walk then carries a "master list" down the statement tree:
//! identifiers that condition whatever executes below (process
//! sensitivity, if/elsif guards). Every assignment target picks up a
//! dependency on the union of the current masters and the identifiers
//! referenced by its right-hand side. Closing the matrix afterwards turns
//! direct dependencies into reachability.
//!
//! Statements outside the analysis subset (blocks, concurrent procedure
//! calls, asserts, selected assignments, entity/configuration
//! instantiations, and component instantiations) contribute no edges.
//! For component instantiations specifically, chaining dependencies
//! through the port map would need port directions that component
//! declarations are allowed to omit, so no semantics is invented.

use crate::errors::DesignError;
use crate::matrix::DepMatrix;
use crate::model::{Architecture, DesignFile};
use sigtrace_vhdl_parser::{SyntaxNode, Tag};
use std::collections::HashMap;

/// The result of analyzing one architecture: the identifier index maps
/// and the closed dependency matrix.
#[derive(Debug)]
pub struct DependencyAnalysis {
    /// The architecture's name.
    pub arch_name: String,
    /// The entity's name.
    pub entity_name: String,
    /// Identifier names by matrix index.
    pub names: Vec<String>,
    /// (name, index) of every in-port, in declaration order.
    pub in_ports: Vec<(String, usize)>,
    /// (name, index) of every out-port, in declaration order.
    pub out_ports: Vec<(String, usize)>,
    /// (name, index) of every architecture signal, in declaration order.
    pub signals: Vec<(String, usize)>,
    /// The dependency matrix, closed transitively.
    pub matrix: DepMatrix,
}

/// Builds and closes the dependency matrix for `arch`.
///
/// Fails with [`DesignError::MissingChild`] when a subtree the walk relies
/// on is absent (a malformed or truncated tree file).
pub fn analyze_architecture(
    file: &DesignFile,
    arch: &Architecture,
) -> Result<DependencyAnalysis, DesignError> {
    let entity = file
        .entity(&arch.entity_name)
        .ok_or_else(|| DesignError::UnknownEntity {
            architecture: arch.name.clone(),
            entity: arch.entity_name.clone(),
        })?;

    let mut names: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut in_ports = Vec::new();
    let mut out_ports = Vec::new();
    let mut signals = Vec::new();

    for port in &entity.in_ports {
        let idx = names.len();
        names.push(port.name.clone());
        index.insert(port.name.clone(), idx);
        in_ports.push((port.name.clone(), idx));
    }
    for port in &entity.out_ports {
        let idx = names.len();
        names.push(port.name.clone());
        index.insert(port.name.clone(), idx);
        out_ports.push((port.name.clone(), idx));
    }
    for signal in &arch.signals {
        let idx = names.len();
        names.push(signal.name.clone());
        index.insert(signal.name.clone(), idx);
        signals.push((signal.name.clone(), idx));
    }

    let mut walker = Walker {
        index: &index,
        matrix: DepMatrix::identity(names.len()),
    };

    let stmts = arch
        .node
        .child(Tag::ParallelStatements)
        .ok_or(DesignError::MissingChild("parallelStatements"))?;
    walker.walk_parallel(stmts, &[])?;

    let mut matrix = walker.matrix;
    matrix.close();

    Ok(DependencyAnalysis {
        arch_name: arch.name.clone(),
        entity_name: entity.name.clone(),
        names,
        in_ports,
        out_ports,
        signals,
        matrix,
    })
}

struct Walker<'a> {
    index: &'a HashMap<String, usize>,
    matrix: DepMatrix,
}

impl Walker<'_> {
    fn walk_parallel(&mut self, stmts: &SyntaxNode, masters: &[String]) -> Result<(), DesignError> {
        for stmt in &stmts.children {
            match stmt.tag {
                Tag::ProcessParallelStatement => {
                    // Sensitivity list identifiers condition everything in
                    // the process body.
                    let mut local = masters.to_vec();
                    for child in &stmt.children {
                        if matches!(child.tag, Tag::Parameters | Tag::Range) {
                            collect_objects(child, &mut local);
                        }
                    }
                    let body = stmt
                        .child(Tag::SequentialStatements)
                        .ok_or(DesignError::MissingChild("sequentialStatements"))?;
                    self.walk_sequential(body, &local)?;
                }
                Tag::AssignParallelStatement => {
                    self.record_assignment(stmt, masters);
                }
                Tag::IfParallelStatement => {
                    let mut local = masters.to_vec();
                    for child in &stmt.children {
                        if child.tag.is_expression() {
                            collect_objects(child, &mut local);
                        }
                    }
                    let inner = stmt
                        .child(Tag::Generate)
                        .ok_or(DesignError::MissingChild("generate"))?
                        .child(Tag::ParallelStatements)
                        .ok_or(DesignError::MissingChild("parallelStatements"))?;
                    self.walk_parallel(inner, &local)?;
                }
                Tag::ForParallelStatement => {
                    let inner = stmt
                        .child(Tag::Generate)
                        .ok_or(DesignError::MissingChild("generate"))?
                        .child(Tag::ParallelStatements)
                        .ok_or(DesignError::MissingChild("parallelStatements"))?;
                    self.walk_parallel(inner, masters)?;
                }
                // Outside the analysis subset; no edges.
                Tag::ComponentParallelStatement
                | Tag::BlockParallelStatement
                | Tag::ProcedureParallelStatement
                | Tag::AssertParallelStatement
                | Tag::SelectParallelStatement
                | Tag::EntityParallelStatement
                | Tag::ConfigurationParallelStatement => {}
                _ => {}
            }
        }
        Ok(())
    }

    fn walk_sequential(
        &mut self,
        stmts: &SyntaxNode,
        masters: &[String],
    ) -> Result<(), DesignError> {
        for stmt in &stmts.children {
            match stmt.tag {
                Tag::SignalAssignSequentialStatement => {
                    self.record_assignment(stmt, masters);
                }
                Tag::IfSequentialStatement => {
                    // Guard identifiers accumulate branch by branch: the
                    // else arm is conditioned by every guard before it.
                    let mut local = masters.to_vec();
                    for child in &stmt.children {
                        if child.tag.is_expression() {
                            collect_objects(child, &mut local);
                        }
                    }

                    let then = stmt
                        .child(Tag::Then)
                        .ok_or(DesignError::MissingChild("then"))?;
                    let body = then
                        .child(Tag::SequentialStatements)
                        .ok_or(DesignError::MissingChild("sequentialStatements"))?;
                    self.walk_sequential(body, &local)?;

                    for elseif in stmt.children_tagged(Tag::Elseif) {
                        for child in &elseif.children {
                            if child.tag.is_expression() {
                                collect_objects(child, &mut local);
                            }
                        }
                        let then = elseif
                            .child(Tag::Then)
                            .ok_or(DesignError::MissingChild("then"))?;
                        let body = then
                            .child(Tag::SequentialStatements)
                            .ok_or(DesignError::MissingChild("sequentialStatements"))?;
                        self.walk_sequential(body, &local)?;
                    }

                    if let Some(else_branch) = stmt.child(Tag::Else) {
                        let body = else_branch
                            .child(Tag::SequentialStatements)
                            .ok_or(DesignError::MissingChild("sequentialStatements"))?;
                        self.walk_sequential(body, &local)?;
                    }
                }
                // Variable assignments, loops, waits, calls and the rest
                // carry no signal-level dependencies in this model.
                _ => {}
            }
        }
        Ok(())
    }

    /// Records the edges of one (parallel or sequential) signal
    /// assignment: direct `objectExpression` children are targets, and the
    /// masters are the inherited list plus everything referenced under
    /// `recordExpression`/`aggregateExpression` children and `signalValue`
    /// subtrees (which include the `when` guard conditions).
    fn record_assignment(&mut self, stmt: &SyntaxNode, masters: &[String]) {
        let mut local = masters.to_vec();
        let mut targets = Vec::new();

        for child in &stmt.children {
            match child.tag {
                Tag::ObjectExpression => {
                    if let Some(id) = child.id() {
                        targets.push(id.to_string());
                    }
                }
                Tag::RecordExpression | Tag::AggregateExpression => {
                    collect_objects(child, &mut local);
                }
                _ => {}
            }
        }
        for value in stmt.children_tagged(Tag::SignalValue) {
            collect_objects(value, &mut local);
        }

        for target in &targets {
            self.set_dependencies(&local, target);
        }
    }

    /// Marks every known master as driving `slave`. Identifiers outside
    /// the index (literal lexemes, loop variables, functions) are ignored.
    fn set_dependencies(&mut self, masters: &[String], slave: &str) {
        let Some(&slave_idx) = self.index.get(slave) else {
            return;
        };
        for master in masters {
            if let Some(&master_idx) = self.index.get(master) {
                self.matrix.set(master_idx, slave_idx);
            }
        }
    }
}

/// Collects the `id` of `node` (when it is itself an `objectExpression`)
/// and of every `objectExpression` below it.
fn collect_objects(node: &SyntaxNode, out: &mut Vec<String>) {
    if node.tag == Tag::ObjectExpression {
        if let Some(id) = node.id() {
            out.push(id.to_string());
        }
    }
    for obj in node.find_descendants(Tag::ObjectExpression) {
        if let Some(id) = obj.id() {
            out.push(id.to_string());
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use sigtrace_diagnostics::DiagnosticSink;
    use sigtrace_normalize::normalize;
    use sigtrace_source::SourceDb;
    use sigtrace_vhdl_parser::parse_file;

    pub(crate) fn analyze(source: &str) -> DependencyAnalysis {
        let mut db = SourceDb::new();
        let id = db.add_source("test.vhd", source.to_string());
        let sink = DiagnosticSink::new();
        let mut tree = parse_file(db.get_file(id), &sink);
        assert!(!sink.has_errors(), "parse errors: {:?}", sink.diagnostics());
        normalize(&mut tree);
        let file = crate::loader::load_file("test.vhd", &tree).unwrap();
        let arch = &file.architectures[0];
        analyze_architecture(&file, arch).unwrap()
    }

    fn reaches(analysis: &DependencyAnalysis, from: &str, to: &str) -> bool {
        let i = analysis.names.iter().position(|n| n == from).unwrap();
        let j = analysis.names.iter().position(|n| n == to).unwrap();
        analysis.matrix.get(i, j)
    }

    #[test]
    fn identity_wire() {
        let a = analyze(
            "entity e is port (a: in bit; b: out bit); end e;\n\
             architecture r of e is begin b <= a; end r;",
        );
        assert!(reaches(&a, "a", "b"));
        assert!(!reaches(&a, "b", "a"));
    }

    #[test]
    fn index_order_is_in_out_signal() {
        let a = analyze(
            "entity e is port (a: in bit; b: out bit; c: in bit); end e;\n\
             architecture r of e is signal s: bit; begin end r;",
        );
        assert_eq!(a.names, ["a", "c", "b", "s"]);
        assert_eq!(a.in_ports.len(), 2);
        assert_eq!(a.out_ports, [("b".to_string(), 2)]);
        assert_eq!(a.signals, [("s".to_string(), 3)]);
    }

    #[test]
    fn gated_wire_picks_up_condition() {
        let a = analyze(
            "entity e is port (a: in bit; g: in bit; b: out bit); end e;\n\
             architecture r of e is begin b <= a when g = '1' else '0'; end r;",
        );
        assert!(reaches(&a, "a", "b"));
        assert!(reaches(&a, "g", "b"));
    }

    #[test]
    fn through_signal_closes_transitively() {
        let a = analyze(
            "entity e is port (a: in bit; z: out bit); end e;\n\
             architecture r of e is signal s: bit; begin s <= a; z <= s; end r;",
        );
        assert!(reaches(&a, "a", "s"));
        assert!(reaches(&a, "s", "z"));
        assert!(reaches(&a, "a", "z"));
        assert!(a.matrix.is_closed());
    }

    #[test]
    fn process_sensitivity_and_guard() {
        let a = analyze(
            "entity e is port (clk: in bit; d: in bit; q: out bit); end e;\n\
             architecture r of e is begin\n\
             process (clk) begin\n\
             if rising_edge(clk) then q <= d; end if;\n\
             end process;\n\
             end r;",
        );
        assert!(reaches(&a, "clk", "q"));
        assert!(reaches(&a, "d", "q"));
    }

    #[test]
    fn bare_signal_guard_is_a_master() {
        let a = analyze(
            "entity e is port (en: in bit; d: in bit; q: out bit); end e;\n\
             architecture r of e is begin\n\
             process (en, d) begin if en then q <= d; end if; end process;\n\
             end r;",
        );
        assert!(reaches(&a, "en", "q"));
    }

    #[test]
    fn elsif_guards_accumulate_into_else() {
        // No sensitivity list: the only masters are the guards themselves,
        // so the else arm must see both of them.
        let a = analyze(
            "entity e is port (s0: in bit; s1: in bit; x: in bit; q: out bit); end e;\n\
             architecture r of e is begin\n\
             process begin\n\
             if s0 = '1' then null;\n\
             elsif s1 = '1' then null;\n\
             else q <= x;\n\
             end if;\n\
             end process;\n\
             end r;",
        );
        assert!(reaches(&a, "s0", "q"));
        assert!(reaches(&a, "s1", "q"));
        assert!(reaches(&a, "x", "q"));
    }

    #[test]
    fn sibling_statements_do_not_share_masters() {
        let a = analyze(
            "entity e is port (g: in bit; x: in bit; y: in bit; p: out bit; q: out bit); end e;\n\
             architecture r of e is begin\n\
             p <= x when g = '1' else '0';\n\
             q <= y;\n\
             end r;",
        );
        assert!(reaches(&a, "g", "p"));
        assert!(!reaches(&a, "g", "q"));
        assert!(reaches(&a, "y", "q"));
    }

    #[test]
    fn if_generate_guard_conditions_inner_assigns() {
        let a = analyze(
            "entity e is port (mode: in bit; a: in bit; b: out bit); end e;\n\
             architecture r of e is begin\n\
             g0: if mode = '1' generate b <= a; end generate;\n\
             end r;",
        );
        assert!(reaches(&a, "mode", "b"));
        assert!(reaches(&a, "a", "b"));
    }

    #[test]
    fn for_generate_passes_masters_through() {
        let a = analyze(
            "entity e is port (a: in bit; b: out bit); end e;\n\
             architecture r of e is begin\n\
             g0: for i in 0 to 3 generate b <= a; end generate;\n\
             end r;",
        );
        assert!(reaches(&a, "a", "b"));
    }

    #[test]
    fn component_instantiation_contributes_no_edges() {
        let a = analyze(
            "entity e is port (a: in bit; b: out bit); end e;\n\
             architecture r of e is\n\
             component buf is port (x: in bit; z: out bit); end component;\n\
             begin\n\
             u0: buf port map (x => a, z => b);\n\
             end r;",
        );
        assert!(!reaches(&a, "a", "b"));
    }

    #[test]
    fn redundant_assignment_changes_nothing() {
        let once = analyze(
            "entity e is port (a: in bit; b: out bit); end e;\n\
             architecture r of e is begin b <= a; end r;",
        );
        let twice = analyze(
            "entity e is port (a: in bit; b: out bit); end e;\n\
             architecture r of e is begin b <= a; b <= a; end r;",
        );
        assert_eq!(once.matrix, twice.matrix);
    }

    #[test]
    fn unknown_identifiers_are_ignored() {
        // Literals and functions on the RHS don't blow up the index.
        let a = analyze(
            "entity e is port (a: in bit; b: out bit); end e;\n\
             architecture r of e is begin b <= f(a) and '1'; end r;",
        );
        assert!(reaches(&a, "a", "b"));
    }

    #[test]
    fn serialized_and_in_memory_trees_analyze_identically() {
        let source = "entity e is port (a: in bit; g: in bit; z: out bit); end e;\n\
                      architecture r of e is signal s: bit; begin\n\
                      s <= a when g = '1' else '0';\n\
                      z <= s;\n\
                      end r;";

        let mut db = SourceDb::new();
        let id = db.add_source("test.vhd", source.to_string());
        let sink = DiagnosticSink::new();
        let tree = parse_file(db.get_file(id), &sink);
        assert!(!sink.has_errors());

        // Directly on the in-memory tree.
        let mut direct = tree.clone();
        normalize(&mut direct);
        let direct_file = crate::loader::load_file("test.vhd", &direct).unwrap();
        let direct_dot = crate::dot::to_dot(
            &analyze_architecture(&direct_file, &direct_file.architectures[0]).unwrap(),
        );

        // Through the tree format, as the separate executables would.
        let text = sigtrace_vhdl_parser::xml::tree_to_string(&tree).unwrap();
        let mut reloaded = sigtrace_vhdl_parser::xml::read_tree(text.as_bytes()).unwrap();
        normalize(&mut reloaded);
        let reloaded_file = crate::loader::load_file("test.vhd", &reloaded).unwrap();
        let reloaded_dot = crate::dot::to_dot(
            &analyze_architecture(&reloaded_file, &reloaded_file.architectures[0]).unwrap(),
        );

        assert_eq!(direct_dot, reloaded_dot);
        assert!(direct_dot.contains("   a -> z;\n"));
        assert!(direct_dot.contains("   g -> z;\n"));
    }

    #[test]
    fn missing_statements_subtree_is_an_error() {
        use sigtrace_vhdl_parser::SyntaxNode;
        let file = DesignFile {
            name: "t.vhd".into(),
            entities: vec![crate::model::Entity {
                name: "e".into(),
                generics: Vec::new(),
                in_ports: Vec::new(),
                out_ports: Vec::new(),
                inout_ports: Vec::new(),
            }],
            architectures: vec![crate::model::Architecture {
                name: "r".into(),
                entity_name: "e".into(),
                signals: Vec::new(),
                components: Vec::new(),
                node: SyntaxNode::new(Tag::Architecture),
            }],
        };
        let err = analyze_architecture(&file, &file.architectures[0]).unwrap_err();
        assert_eq!(err, DesignError::MissingChild("parallelStatements"));
    }
}
