//! XML serialization of the syntax tree.
//!
//! `vhd2xml` writes the parsed tree under a `vhdl` root; `optimvhd` reads
//! it back, normalizes, and writes an `optimalVHDL` root for `analysevhd`.
//! Elements are indented two spaces per depth, attributes keep node
//! insertion order, and childless elements are self-closing. The tag
//! vocabulary is closed: reading an unknown element name is an error, not
//! an extension point.
//!
//! Reading a tree written by [`write_tree`] restores the exact
//! [`SyntaxNode`] structure, which is what lets the three tools run as
//! separate processes without losing information.

use crate::node::{SyntaxNode, Tag};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

/// Errors produced while reading or writing the XML tree format.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Malformed XML or an I/O failure underneath the XML layer.
    #[error("malformed tree file: {0}")]
    Xml(String),
    /// An element name outside the closed tag vocabulary.
    #[error("unknown tag '{0}'")]
    UnknownTag(String),
    /// The document contained no element at all.
    #[error("empty tree file")]
    Empty,
    /// A closing tag appeared without a matching opening tag.
    #[error("unbalanced tree file")]
    Unbalanced,
}

/// Serializes a tree to XML with a leading declaration.
pub fn tree_to_string(root: &SyntaxNode) -> Result<String, TreeError> {
    let mut buffer = Cursor::new(Vec::new());
    let mut writer = Writer::new_with_indent(&mut buffer, b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| TreeError::Xml(e.to_string()))?;
    write_node(&mut writer, root)?;

    let mut bytes = buffer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| TreeError::Xml(e.to_string()))
}

fn write_node<W: std::io::Write>(
    writer: &mut Writer<W>,
    node: &SyntaxNode,
) -> Result<(), TreeError> {
    let name = node.tag.as_str();
    let mut start = BytesStart::new(name);
    for (attr_name, attr_value) in node.attrs() {
        start.push_attribute((attr_name.as_str(), attr_value.as_str()));
    }

    if node.children.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| TreeError::Xml(e.to_string()))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| TreeError::Xml(e.to_string()))?;
    for child in &node.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| TreeError::Xml(e.to_string()))?;
    Ok(())
}

/// Reads a tree from XML text.
pub fn read_tree(input: &[u8]) -> Result<SyntaxNode, TreeError> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<SyntaxNode> = Vec::new();
    let mut root: Option<SyntaxNode> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let node = element_to_node(e)?;
                stack.push(node);
            }
            Ok(Event::Empty(ref e)) => {
                let node = element_to_node(e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => {
                let node = stack.pop().ok_or(TreeError::Unbalanced)?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {} // declaration, comments, stray text
            Err(e) => {
                return Err(TreeError::Xml(format!(
                    "parse error at byte {}: {e}",
                    reader.error_position()
                )));
            }
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(TreeError::Unbalanced);
    }
    root.ok_or(TreeError::Empty)
}

fn element_to_node(e: &BytesStart<'_>) -> Result<SyntaxNode, TreeError> {
    let name_bytes = e.name();
    let name = std::str::from_utf8(name_bytes.as_ref())
        .map_err(|err| TreeError::Xml(err.to_string()))?;
    let tag = Tag::parse(name).ok_or_else(|| TreeError::UnknownTag(name.to_string()))?;

    let mut node = SyntaxNode::new(tag);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| TreeError::Xml(err.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| TreeError::Xml(err.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| TreeError::Xml(err.to_string()))?
            .into_owned();
        node.set_attr(&key, value);
    }
    Ok(node)
}

fn attach(
    stack: &mut Vec<SyntaxNode>,
    root: &mut Option<SyntaxNode>,
    node: SyntaxNode,
) -> Result<(), TreeError> {
    if let Some(parent) = stack.last_mut() {
        parent.push(node);
    } else if root.is_none() {
        *root = Some(node);
    } else {
        return Err(TreeError::Xml(String::from("multiple root elements")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tests::parse_ok;

    #[test]
    fn write_then_read_is_identity() {
        let tree = parse_ok(
            "entity e is\n\
             port (a: in bit; b: out bit);\n\
             end e;\n\
             architecture r of e is\n\
             signal s: bit;\n\
             begin\n\
             s <= a;\n\
             b <= s when en = '1' else '0';\n\
             end r;",
        );
        let text = tree_to_string(&tree).unwrap();
        let back = read_tree(text.as_bytes()).unwrap();
        assert_eq!(tree, back);
    }

    #[test]
    fn output_is_indented_xml() {
        let tree = parse_ok("entity e is port (a: in bit); end e;");
        let text = tree_to_string(&tree).unwrap();
        assert!(text.starts_with("<?xml"));
        assert!(text.contains("<vhdl file=\"test.vhd\">"));
        assert!(text.contains("\n  <entity line=\"1\" id=\"e\">"));
        assert!(text.contains("port line=\"1\" id=\"a\" io=\"in\""));
        assert!(text.ends_with("</vhdl>\n"));
    }

    #[test]
    fn childless_elements_self_close() {
        let tree = parse_ok("entity e is port (a: in bit); end e;");
        let text = tree_to_string(&tree).unwrap();
        // The type mark has no children.
        assert!(text.contains("<type id=\"bit\" line=\"1\"/>"));
    }

    #[test]
    fn attribute_values_escape_and_unescape() {
        let tree = parse_ok(
            "architecture r of e is begin assert a < b report \"x < y\"; end r;",
        );
        let text = tree_to_string(&tree).unwrap();
        assert!(text.contains("&lt;"));
        let back = read_tree(text.as_bytes()).unwrap();
        assert_eq!(tree, back);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = read_tree(b"<vhdl><wat/></vhdl>").unwrap_err();
        assert!(matches!(err, TreeError::UnknownTag(t) if t == "wat"));
    }

    #[test]
    fn empty_document_is_rejected() {
        assert!(matches!(
            read_tree(b"<?xml version=\"1.0\"?>"),
            Err(TreeError::Empty)
        ));
    }

    #[test]
    fn unbalanced_document_is_rejected() {
        assert!(read_tree(b"<vhdl><entity id=\"e\">").is_err());
    }

    #[test]
    fn renamed_root_roundtrips() {
        let mut tree = parse_ok("entity e is end e;");
        tree.tag = Tag::OptimalVhdl;
        let text = tree_to_string(&tree).unwrap();
        assert!(text.contains("<optimalVHDL"));
        let back = read_tree(text.as_bytes()).unwrap();
        assert_eq!(back.tag, Tag::OptimalVhdl);
    }
}
