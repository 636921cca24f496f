//! Loads the design model from a normalized syntax tree.
//!
//! Runs once over the tree: entities first (so architectures can resolve
//! their entity by name), then architectures with their signals and
//! component declarations. Expects normalized input — declarations carry
//! `id` attributes, not `ids` lists.

use crate::errors::DesignError;
use crate::model::{Architecture, Component, DesignFile, Entity, Port, PortDirection, Signal};
use sigtrace_vhdl_parser::{SyntaxNode, Tag};

/// Loads one file's entities and architectures from its tree root.
///
/// Fails with [`DesignError::UnknownEntity`] when an architecture names an
/// entity that is not in the same file.
pub fn load_file(name: impl Into<String>, root: &SyntaxNode) -> Result<DesignFile, DesignError> {
    let mut file = DesignFile {
        name: name.into(),
        entities: Vec::new(),
        architectures: Vec::new(),
    };

    for node in root.children_tagged(Tag::Entity) {
        let entity = load_entity(node);
        file.entities.push(entity);
    }

    for node in root.children_tagged(Tag::Architecture) {
        let arch = load_architecture(node, &file)?;
        file.architectures.push(arch);
    }

    Ok(file)
}

fn load_entity(node: &SyntaxNode) -> Entity {
    let mut entity = Entity {
        name: node.id().unwrap_or_default().to_string(),
        generics: Vec::new(),
        in_ports: Vec::new(),
        out_ports: Vec::new(),
        inout_ports: Vec::new(),
    };

    if let Some(generic) = node.child(Tag::Generic) {
        for param in generic.children_tagged(Tag::Parameter) {
            if let Some(id) = param.id() {
                entity.generics.push(id.to_string());
            }
        }
    }

    if let Some(ports) = node.child(Tag::Ports) {
        for port in ports.children_tagged(Tag::Port) {
            let Some(name) = port.id() else { continue };
            match port.attr("io") {
                Some("in") => entity.in_ports.push(Port {
                    name: name.to_string(),
                    direction: PortDirection::In,
                }),
                Some("out") => entity.out_ports.push(Port {
                    name: name.to_string(),
                    direction: PortDirection::Out,
                }),
                Some("inout") => entity.inout_ports.push(Port {
                    name: name.to_string(),
                    direction: PortDirection::Inout,
                }),
                _ => {}
            }
        }
    }

    entity
}

fn load_architecture(node: &SyntaxNode, file: &DesignFile) -> Result<Architecture, DesignError> {
    let name = node.id().unwrap_or_default().to_string();
    let entity_name = node.attr("entity").unwrap_or_default().to_string();

    if file.entity(&entity_name).is_none() {
        return Err(DesignError::UnknownEntity {
            architecture: name,
            entity: entity_name,
        });
    }

    let mut arch = Architecture {
        name,
        entity_name,
        signals: Vec::new(),
        components: Vec::new(),
        node: node.clone(),
    };

    if let Some(decls) = node.child(Tag::Declarations) {
        for decl in decls.children_tagged(Tag::SignalDeclaration) {
            if let Some(id) = decl.id() {
                arch.signals.push(Signal {
                    name: id.to_string(),
                });
            }
        }
        for decl in decls.children_tagged(Tag::ComponentDeclaration) {
            arch.components.push(load_component(decl));
        }
    }

    Ok(arch)
}

fn load_component(node: &SyntaxNode) -> Component {
    let mut component = Component {
        name: node.id().unwrap_or_default().to_string(),
        in_ports: Vec::new(),
        out_ports: Vec::new(),
        inout_ports: Vec::new(),
    };

    if let Some(ports) = node.child(Tag::Ports) {
        for port in ports.children_tagged(Tag::Port) {
            let Some(name) = port.id() else { continue };
            match port.attr("io") {
                Some("in") => component.in_ports.push(Port {
                    name: name.to_string(),
                    direction: PortDirection::In,
                }),
                Some("out") => component.out_ports.push(Port {
                    name: name.to_string(),
                    direction: PortDirection::Out,
                }),
                Some("inout") => component.inout_ports.push(Port {
                    name: name.to_string(),
                    direction: PortDirection::Inout,
                }),
                _ => {}
            }
        }
    }

    component
}
