//! Tree normalization: the pass between parsing and analysis.
//!
//! Two canonicalizations run over the parsed tree, in this order:
//!
//! 1. **Generic inlining** — every reference to a generic parameter inside
//!    the owning entity's ports or a bound architecture is replaced by a
//!    deep clone of the parameter's default value expression, so later
//!    passes never see parameter names.
//! 2. **Declaration expansion** — a declaration carrying an `ids` list
//!    (`signal x, y, z: bit;`) is replaced by one sibling copy per
//!    identifier, each with an `id` attribute and the `ids` child removed.
//!
//! Order matters: clones produced by inlining flow through expansion.
//! Both passes rebuild child lists from a snapshot, so rewrites never
//! invalidate the walk, and both are idempotent.

#![warn(missing_docs)]

use sigtrace_vhdl_parser::{SyntaxNode, Tag};

/// Declaration tags whose `ids` lists get expanded, in pass order.
const EXPANSION_TAGS: [Tag; 8] = [
    Tag::SignalDeclaration,
    Tag::VariableDeclaration,
    Tag::FileDeclaration,
    Tag::ConstantDeclaration,
    Tag::SignalParameter,
    Tag::VariableParameter,
    Tag::ConstantParameter,
    Tag::IdParameter,
];

/// Runs the full normalization in place and retags the root as
/// `optimalVHDL`.
pub fn normalize(root: &mut SyntaxNode) {
    inline_generics(root);
    for tag in EXPANSION_TAGS {
        expand_declarations(root, tag);
    }
    root.tag = Tag::OptimalVhdl;
    root.remove_attr("file");
}

/// Substitutes generic parameter references by clones of their default
/// value expressions.
///
/// For each entity with a `generic` clause, every `objectExpression` whose
/// `id` matches a parameter name is replaced — inside the entity's `ports`
/// subtree and inside every architecture whose `entity` attribute names
/// that entity. Parameters without a default value are left alone.
pub fn inline_generics(root: &mut SyntaxNode) {
    // Collect (entity, parameter, value) substitutions before mutating.
    let mut substitutions: Vec<(String, Vec<(String, SyntaxNode)>)> = Vec::new();
    for entity in root.children_tagged(Tag::Entity) {
        let Some(entity_id) = entity.id() else {
            continue;
        };
        let Some(generic) = entity.child(Tag::Generic) else {
            continue;
        };
        let mut params = Vec::new();
        for param in generic.children_tagged(Tag::Parameter) {
            let Some(name) = param.id() else { continue };
            let Some(value) = param.child(Tag::Value) else {
                continue;
            };
            let Some(expr) = value.children.first() else {
                continue;
            };
            params.push((name.to_string(), expr.clone()));
        }
        if !params.is_empty() {
            substitutions.push((entity_id.to_string(), params));
        }
    }

    for (entity_id, params) in &substitutions {
        for unit in root.children.iter_mut() {
            match unit.tag {
                Tag::Entity if unit.id() == Some(entity_id) => {
                    if let Some(ports) = unit.child_mut(Tag::Ports) {
                        for (name, value) in params {
                            replace_references(ports, name, value);
                        }
                    }
                }
                Tag::Architecture if unit.attr("entity") == Some(entity_id.as_str()) => {
                    for (name, value) in params {
                        replace_references(unit, name, value);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Replaces every `objectExpression` named `name` under `node` by a clone
/// of `value`. Replacements are not revisited.
fn replace_references(node: &mut SyntaxNode, name: &str, value: &SyntaxNode) {
    for child in node.children.iter_mut() {
        if child.tag == Tag::ObjectExpression && child.id() == Some(name) {
            *child = value.clone();
        } else {
            replace_references(child, name, value);
        }
    }
}

/// Expands declarations of the given tag that still carry an `ids` child:
/// each becomes one copy per identifier, inserted where the original
/// stood, with the `ids` child removed and the `id` attribute set.
///
/// Single-identifier declarations are canonicalized the same way, so after
/// this pass no declaration of `tag` has an `ids` child.
pub fn expand_declarations(node: &mut SyntaxNode, tag: Tag) {
    let old = std::mem::take(&mut node.children);
    for mut child in old {
        expand_declarations(&mut child, tag);

        if child.tag == tag {
            if let Some(ids) = child.child(Tag::Ids) {
                let names: Vec<String> = ids
                    .children_tagged(Tag::Id)
                    .filter_map(|id| id.id().map(String::from))
                    .collect();
                let mut template = child.clone();
                template.children.retain(|c| c.tag != Tag::Ids);
                for name in names {
                    let mut copy = template.clone();
                    copy.set_attr("id", name);
                    node.children.push(copy);
                }
                continue;
            }
        }
        node.children.push(child);
    }
}
