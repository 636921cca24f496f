//! `vhd2xml` — parse VHDL-93 source into a syntax tree XML file.
//!
//! For each `file.vhd` argument, writes `file.vhd.xml` next to it. Lexer
//! and parser diagnostics go to stderr as `<file>:<line>:<message>`; a
//! file with any error is skipped (no output written) and the final exit
//! code becomes non-zero, but remaining arguments are still processed.

use clap::Parser;
use sigtrace_cli::run_over_files;
use sigtrace_diagnostics::{DiagnosticSink, TerminalRenderer};
use sigtrace_source::SourceDb;
use sigtrace_vhdl_parser::{parse_file, xml};
use std::path::{Path, PathBuf};
use std::process;

/// Parse VHDL source files into syntax tree XML.
#[derive(Parser, Debug)]
#[command(name = "vhd2xml", version, about = "Parse VHDL into a syntax tree XML file")]
struct Cli {
    /// VHDL source files to parse.
    #[arg(required = true, value_name = "FILE.vhd")]
    files: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    process::exit(run_over_files(&cli.files, process_file));
}

fn process_file(path: &Path) -> Result<(), String> {
    let mut db = SourceDb::new();
    let id = db.load_file(path).map_err(|e| e.to_string())?;

    let sink = DiagnosticSink::new();
    let tree = parse_file(db.get_file(id), &sink);

    let errored = sink.has_errors();
    let diags = sink.take_all();
    TerminalRenderer::render_all(&diags, &db, &mut std::io::stderr())
        .map_err(|e| e.to_string())?;
    if errored {
        return Err(String::from("parse failed"));
    }

    let text = xml::tree_to_string(&tree).map_err(|e| e.to_string())?;
    let mut out_path = path.as_os_str().to_owned();
    out_path.push(".xml");
    std::fs::write(&out_path, text).map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_file_argument() {
        let cli = Cli::parse_from(["vhd2xml", "top.vhd"]);
        assert_eq!(cli.files, vec![PathBuf::from("top.vhd")]);
    }

    #[test]
    fn parses_multiple_file_arguments() {
        let cli = Cli::parse_from(["vhd2xml", "a.vhd", "b.vhd"]);
        assert_eq!(cli.files.len(), 2);
    }

    #[test]
    fn missing_argument_is_a_usage_error() {
        let err = Cli::try_parse_from(["vhd2xml"]).unwrap_err();
        assert!(err.to_string().contains("Usage"));
    }

    #[test]
    fn missing_input_file_is_reported_not_fatal() {
        let code = run_over_files(&[PathBuf::from("/nonexistent/x.vhd")], process_file);
        assert_eq!(code, 1);
    }

    #[test]
    fn writes_tree_file_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let vhd = dir.path().join("top.vhd");
        std::fs::write(
            &vhd,
            "entity top is port (a: in bit; b: out bit); end top;\n\
             architecture rtl of top is begin b <= a; end rtl;\n",
        )
        .unwrap();

        process_file(&vhd).unwrap();

        let xml = std::fs::read_to_string(dir.path().join("top.vhd.xml")).unwrap();
        assert!(xml.contains("<vhdl"));
        assert!(xml.contains("id=\"top\""));
        assert!(xml.contains("assignParallelStatement"));
    }

    #[test]
    fn invalid_source_writes_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let vhd = dir.path().join("bad.vhd");
        std::fs::write(&vhd, "entity broken\n").unwrap();

        assert!(process_file(&vhd).is_err());
        assert!(!dir.path().join("bad.vhd.xml").exists());
    }
}
