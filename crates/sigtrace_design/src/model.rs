//! The design model: entities, architectures, ports, signals, components.
//!
//! Everything is held in vectors in source order. Declaration order is
//! load-bearing: the analyzer assigns matrix indices by walking in-ports,
//! out-ports, and signals in exactly this order, so two runs over the same
//! file always number identifiers identically.

use sigtrace_vhdl_parser::SyntaxNode;

/// A whole run's design: one or more loaded files.
pub struct Design {
    /// Design name (cosmetic; appears nowhere in outputs).
    pub name: String,
    /// Loaded files in argument order.
    pub files: Vec<DesignFile>,
}

impl Design {
    /// Creates an empty design.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
        }
    }

    /// Adds a loaded file.
    pub fn add_file(&mut self, file: DesignFile) {
        self.files.push(file);
    }
}

/// One loaded source file: its entities and architectures.
#[derive(Debug)]
pub struct DesignFile {
    /// The file name the design was loaded from.
    pub name: String,
    /// Entities in source order.
    pub entities: Vec<Entity>,
    /// Architectures in source order.
    pub architectures: Vec<Architecture>,
}

impl DesignFile {
    /// Finds an entity by name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Finds an architecture by name.
    pub fn architecture(&self, name: &str) -> Option<&Architecture> {
        self.architectures.iter().find(|a| a.name == name)
    }
}

/// An entity interface: generics plus ports split by direction.
#[derive(Debug)]
pub struct Entity {
    /// The entity name.
    pub name: String,
    /// Generic parameter names in declaration order.
    pub generics: Vec<String>,
    /// `in` ports in declaration order.
    pub in_ports: Vec<Port>,
    /// `out` ports in declaration order.
    pub out_ports: Vec<Port>,
    /// `inout` ports in declaration order.
    pub inout_ports: Vec<Port>,
}

/// One port of an entity or component.
#[derive(Debug)]
pub struct Port {
    /// The port name.
    pub name: String,
    /// The port direction.
    pub direction: PortDirection,
}

/// Port direction. `inout` is its own case throughout; it never folds
/// into `out`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PortDirection {
    /// Input port.
    In,
    /// Output port.
    Out,
    /// Bidirectional port.
    Inout,
}

/// An architecture body bound to its entity by name.
#[derive(Debug)]
pub struct Architecture {
    /// The architecture name.
    pub name: String,
    /// Name of the entity this architecture implements. The entity itself
    /// lives in the owning [`DesignFile`]; the link stays by name so the
    /// model has no cycles.
    pub entity_name: String,
    /// Signals declared in the architecture, in source order.
    pub signals: Vec<Signal>,
    /// Components declared in the architecture.
    pub components: Vec<Component>,
    /// The architecture's syntax subtree; the analyzer walks its
    /// `parallelStatements` child.
    pub node: SyntaxNode,
}

/// An internal signal of an architecture.
#[derive(Debug)]
pub struct Signal {
    /// The signal name.
    pub name: String,
}

/// A component declaration with its port interface.
#[derive(Debug)]
pub struct Component {
    /// The component name.
    pub name: String,
    /// `in` ports.
    pub in_ports: Vec<Port>,
    /// `out` ports.
    pub out_ports: Vec<Port>,
    /// `inout` ports.
    pub inout_ports: Vec<Port>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigtrace_vhdl_parser::{SyntaxNode, Tag};

    #[test]
    fn design_file_lookups() {
        let file = DesignFile {
            name: "t.vhd".into(),
            entities: vec![Entity {
                name: "e".into(),
                generics: Vec::new(),
                in_ports: vec![Port {
                    name: "a".into(),
                    direction: PortDirection::In,
                }],
                out_ports: Vec::new(),
                inout_ports: Vec::new(),
            }],
            architectures: vec![Architecture {
                name: "rtl".into(),
                entity_name: "e".into(),
                signals: Vec::new(),
                components: Vec::new(),
                node: SyntaxNode::new(Tag::Architecture),
            }],
        };
        assert!(file.entity("e").is_some());
        assert!(file.entity("missing").is_none());
        assert_eq!(file.architecture("rtl").unwrap().entity_name, "e");
    }

    #[test]
    fn design_collects_files() {
        let mut design = Design::new("top");
        design.add_file(DesignFile {
            name: "a.vhd".into(),
            entities: Vec::new(),
            architectures: Vec::new(),
        });
        assert_eq!(design.files.len(), 1);
    }
}
