//! `optimvhd` — normalize a syntax tree XML file.
//!
//! For each `file.vhd.xml` argument, inlines generic parameters, expands
//! multi-identifier declarations, and writes `file.vhd.optim.xml`.

use clap::Parser;
use sigtrace_cli::{run_over_files, strip_suffix};
use sigtrace_normalize::normalize;
use sigtrace_vhdl_parser::xml;
use std::path::{Path, PathBuf};
use std::process;

/// Normalize parsed VHDL syntax trees.
#[derive(Parser, Debug)]
#[command(name = "optimvhd", version, about = "Normalize a syntax tree XML file")]
struct Cli {
    /// Tree files produced by vhd2xml.
    #[arg(required = true, value_name = "FILE.xml")]
    files: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    process::exit(run_over_files(&cli.files, process_file));
}

fn process_file(path: &Path) -> Result<(), String> {
    let stem = strip_suffix(path, ".xml").ok_or("expected a .xml file")?;

    let input = std::fs::read(path).map_err(|e| e.to_string())?;
    let mut tree = xml::read_tree(&input).map_err(|e| e.to_string())?;

    normalize(&mut tree);

    let text = xml::tree_to_string(&tree).map_err(|e| e.to_string())?;
    let mut out_path = stem.into_os_string();
    out_path.push(".optim.xml");
    std::fs::write(&out_path, text).map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_arguments() {
        let cli = Cli::parse_from(["optimvhd", "top.vhd.xml"]);
        assert_eq!(cli.files, vec![PathBuf::from("top.vhd.xml")]);
    }

    #[test]
    fn missing_argument_is_a_usage_error() {
        let err = Cli::try_parse_from(["optimvhd"]).unwrap_err();
        assert!(err.to_string().contains("Usage"));
    }

    #[test]
    fn non_xml_name_is_rejected() {
        let code = run_over_files(&[PathBuf::from("top.vhd")], process_file);
        assert_eq!(code, 1);
    }

    #[test]
    fn normalizes_tree_file() {
        use sigtrace_diagnostics::DiagnosticSink;
        use sigtrace_source::SourceDb;

        let mut db = SourceDb::new();
        let id = db.add_source(
            "top.vhd",
            "architecture rtl of top is signal x, y: bit; begin end rtl;".to_string(),
        );
        let sink = DiagnosticSink::new();
        let tree = sigtrace_vhdl_parser::parse_file(db.get_file(id), &sink);
        assert!(!sink.has_errors());

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("top.vhd.xml");
        std::fs::write(&input, xml::tree_to_string(&tree).unwrap()).unwrap();

        process_file(&input).unwrap();

        let out = std::fs::read_to_string(dir.path().join("top.vhd.optim.xml")).unwrap();
        assert!(out.contains("<optimalVHDL"));
        assert!(out.contains("signalDeclaration"));
        assert!(out.contains("id=\"x\""));
        assert!(out.contains("id=\"y\""));
        assert!(!out.contains("<ids>"));
    }
}
