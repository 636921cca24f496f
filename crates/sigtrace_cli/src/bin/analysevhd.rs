//! `analysevhd` — signal dependency analysis of a normalized tree.
//!
//! For each `file.vhd.optim.xml` argument, loads the design model,
//! analyzes the first architecture, and writes the in-port → out-port
//! reachability graph to `file.vhd.dot`.

use clap::Parser;
use sigtrace_cli::{run_over_files, strip_suffix};
use sigtrace_design::{analyze_architecture, dot, load_file, Design, DesignError};
use sigtrace_vhdl_parser::xml;
use std::path::{Path, PathBuf};
use std::process;

/// Analyze signal dependencies of a normalized VHDL tree.
#[derive(Parser, Debug)]
#[command(
    name = "analysevhd",
    version,
    about = "Emit the signal dependency graph of a normalized tree"
)]
struct Cli {
    /// Normalized tree files produced by optimvhd.
    #[arg(required = true, value_name = "FILE.optim.xml")]
    files: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    process::exit(run_over_files(&cli.files, process_file));
}

fn process_file(path: &Path) -> Result<(), String> {
    let stem = strip_suffix(path, ".optim.xml").ok_or("expected a .optim.xml file")?;

    let input = std::fs::read(path).map_err(|e| e.to_string())?;
    let tree = xml::read_tree(&input).map_err(|e| e.to_string())?;

    let mut design = Design::new("design");
    let loaded = load_file(path.display().to_string(), &tree).map_err(|e| e.to_string())?;
    design.add_file(loaded);

    let file = &design.files[0];
    let arch = file
        .architectures
        .first()
        .ok_or_else(|| DesignError::NoArchitecture(path.display().to_string()).to_string())?;

    let analysis = analyze_architecture(file, arch).map_err(|e| e.to_string())?;
    let graph = dot::to_dot(&analysis);

    let mut out_path = stem.into_os_string();
    out_path.push(".dot");
    std::fs::write(&out_path, graph).map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_arguments() {
        let cli = Cli::parse_from(["analysevhd", "top.vhd.optim.xml"]);
        assert_eq!(cli.files, vec![PathBuf::from("top.vhd.optim.xml")]);
    }

    #[test]
    fn missing_argument_is_a_usage_error() {
        let err = Cli::try_parse_from(["analysevhd"]).unwrap_err();
        assert!(err.to_string().contains("Usage"));
    }

    #[test]
    fn wrong_extension_is_rejected() {
        let code = run_over_files(&[PathBuf::from("top.vhd.xml")], process_file);
        assert_eq!(code, 1);
    }

    #[test]
    fn writes_dependency_graph() {
        use sigtrace_diagnostics::DiagnosticSink;
        use sigtrace_normalize::normalize;
        use sigtrace_source::SourceDb;

        let mut db = SourceDb::new();
        let id = db.add_source(
            "top.vhd",
            "entity top is port (a: in bit; z: out bit); end top;\n\
             architecture rtl of top is signal s: bit; begin s <= a; z <= s; end rtl;"
                .to_string(),
        );
        let sink = DiagnosticSink::new();
        let mut tree = sigtrace_vhdl_parser::parse_file(db.get_file(id), &sink);
        assert!(!sink.has_errors());
        normalize(&mut tree);

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("top.vhd.optim.xml");
        std::fs::write(&input, xml::tree_to_string(&tree).unwrap()).unwrap();

        process_file(&input).unwrap();

        let graph = std::fs::read_to_string(dir.path().join("top.vhd.dot")).unwrap();
        assert!(graph.starts_with("digraph rtl {\n"));
        assert!(graph.contains("label = \"Architecture RTL of entity TOP\";\n"));
        assert!(graph.contains("   a [shape=box];\n"));
        assert!(graph.contains("   z [shape=ellipse];\n"));
        assert!(graph.contains("   a -> z;\n"));
        assert!(graph.ends_with("}\n"));
    }
}
