//! The tagged syntax tree.
//!
//! Parser actions build [`SyntaxNode`]s: a [`Tag`] from a closed
//! vocabulary, string attributes in insertion order, and ordered children.
//! Each node exclusively owns its children; there are no parent links, so
//! the tree is a plain ownership hierarchy that the normalizer can rewrite
//! in place and the analyzer can walk downward.
//!
//! Nodes built from a concrete source location carry a `line` attribute
//! holding the 1-based line number as a decimal string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of node tags.
///
/// Variant names are the CamelCase form of the wire names used by the XML
/// tree format (e.g. [`Tag::SignalAssignSequentialStatement`] serializes as
/// `signalAssignSequentialStatement`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Tag {
    // === Roots and library units ===
    /// Root of a parsed file.
    Vhdl,
    /// Root of a normalized file.
    OptimalVhdl,
    /// `library` clause with its `use` items.
    UseClause,
    /// A single `use` item.
    Use,
    /// Entity declaration.
    Entity,
    /// Architecture body.
    Architecture,
    /// Package declaration.
    Package,
    /// Package body.
    PackageBody,
    /// Configuration declaration.
    Configuration,
    /// Architecture binding inside a configuration.
    ForArchitecture,
    /// Block configuration item.
    BlockConfiguration,
    /// Component configuration item.
    ComponentConfiguration,
    /// Configuration item list.
    ConfigList,
    /// `use entity` binding.
    UseEntity,
    /// `use configuration` binding.
    UseConfiguration,
    /// Declarative region.
    Declarations,
    /// Concurrent statement list.
    ParallelStatements,
    /// Sequential statement list.
    SequentialStatements,
    /// Generate body wrapper.
    Generate,

    // === Interface ===
    /// Generic clause.
    Generic,
    /// One generic parameter.
    Parameter,
    /// Port clause.
    Ports,
    /// One port.
    Port,
    /// Default value wrapper.
    Value,
    /// Type mark of a declaration.
    Type,
    /// Function parameter list.
    FunctionParameters,
    /// Procedure parameter list.
    ProcedureParameters,
    /// `constant`-class subprogram parameter.
    ConstantParameter,
    /// `variable`-class subprogram parameter.
    VariableParameter,
    /// `signal`-class subprogram parameter.
    SignalParameter,
    /// Classless subprogram parameter.
    IdParameter,

    // === Declarations ===
    /// Type declaration.
    TypeDeclaration,
    /// Subtype declaration.
    SubtypeDeclaration,
    /// Constant declaration.
    ConstantDeclaration,
    /// Variable declaration.
    VariableDeclaration,
    /// Signal declaration.
    SignalDeclaration,
    /// File declaration.
    FileDeclaration,
    /// Alias declaration.
    AliasDeclaration,
    /// Attribute declaration or specification.
    AttributeDeclaration,
    /// Component declaration.
    ComponentDeclaration,
    /// Function declaration or body.
    FunctionDeclaration,
    /// Procedure declaration or body.
    ProcedureDeclaration,
    /// `for` configuration specification.
    ForDeclaration,
    /// Identifier list of a declaration.
    Ids,
    /// One identifier in a list.
    Id,
    /// Record type field list.
    Records,
    /// One record field.
    Record,
    /// Index ranges of an array type.
    RangesTypes,
    /// Range list of a subtype constraint.
    Ranges,
    /// A single range (`expr to|downto expr` or an unconstrained box).
    Range,
    /// Array type definition.
    Array,
    /// Access type definition.
    Access,
    /// File type definition.
    FileOf,

    // === Expressions ===
    /// `and|nand|or|nor|xor|xnor` node.
    LogicalExpression,
    /// `=|/=|<|<=|>|>=` node.
    RelationalExpression,
    /// `sll|srl|sla|sra|rol|ror` node.
    ShiftExpression,
    /// `+|-|&` node.
    AddingExpression,
    /// `*|/|mod|rem` node.
    MultiplyingExpression,
    /// `**` node.
    ExponentialExpression,
    /// Unary `+|-|not|abs` node.
    PrefixExpression,
    /// Literal leaf carrying its lexeme.
    ConstantExpression,
    /// `new` allocator.
    NewExpression,
    /// Physical literal (`10 ns`).
    TimeExpression,
    /// Name leaf: identifier plus optional indexing/call suffixes.
    ObjectExpression,
    /// Dotted selection chain.
    RecordExpression,
    /// Aggregate.
    AggregateExpression,
    /// Waveform expression list.
    Expressions,
    /// `expr after time` wrapper.
    AfterExpression,
    /// Call/index argument list.
    Parameters,
    /// `choices => value` (or `formal => actual`) association.
    Connect,
    /// Choice list.
    Choices,
    /// `others` choice.
    Others,
    /// String or `all` suffix in a selected name.
    Suffix,
    /// `'attr` selection on a name.
    Attribute,
    /// `open` actual in a map.
    Open,
    /// `null` waveform element.
    Null,
    /// `unaffected` waveform.
    Unaffected,
    /// `reject time` pulse rejection.
    Reject,

    // === Parallel statements ===
    /// Block statement.
    BlockParallelStatement,
    /// Process statement.
    ProcessParallelStatement,
    /// Concurrent procedure call.
    ProcedureParallelStatement,
    /// Concurrent signal assignment.
    AssignParallelStatement,
    /// Concurrent assertion.
    AssertParallelStatement,
    /// Selected signal assignment (`with … select`).
    SelectParallelStatement,
    /// Component instantiation.
    ComponentParallelStatement,
    /// Direct entity instantiation.
    EntityParallelStatement,
    /// Configuration instantiation.
    ConfigurationParallelStatement,
    /// If-generate.
    IfParallelStatement,
    /// For-generate.
    ForParallelStatement,
    /// One driven waveform arm.
    SignalValue,
    /// Condition (or choice set) attached to a waveform arm.
    When,
    /// One formal/actual association.
    Map,
    /// Port map.
    PortMap,
    /// Generic map.
    GenericMap,
    /// Association list before its port/generic role is known.
    UniversalMap,

    // === Sequential statements ===
    /// Wait statement.
    WaitSequentialStatement,
    /// `wait on` sensitivity wrapper.
    On,
    /// `wait until` condition wrapper.
    Until,
    /// `wait for` timeout wrapper.
    For,
    /// Sequential assertion.
    AssertSequentialStatement,
    /// Report statement.
    ReportSequentialStatement,
    /// Sequential signal assignment.
    SignalAssignSequentialStatement,
    /// Variable assignment.
    VariableAssignSequentialStatement,
    /// Sequential procedure call.
    ProcedureSequentialStatement,
    /// If statement.
    IfSequentialStatement,
    /// `then` branch wrapper.
    Then,
    /// `elsif` branch.
    Elseif,
    /// `else` branch wrapper.
    Else,
    /// Case statement.
    CaseSequentialStatement,
    /// One `when` alternative of a case.
    Case,
    /// While (or bare) loop.
    WhileSequentialStatement,
    /// For loop.
    ForSequentialStatement,
    /// Next statement.
    NextSequentialStatement,
    /// Exit statement.
    ExitSequentialStatement,
    /// Return statement.
    ReturnSequentialStatement,
    /// Null statement.
    NullSequentialStatement,
}

impl Tag {
    /// Returns the wire name of this tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Vhdl => "vhdl",
            Tag::OptimalVhdl => "optimalVHDL",
            Tag::UseClause => "useClause",
            Tag::Use => "use",
            Tag::Entity => "entity",
            Tag::Architecture => "architecture",
            Tag::Package => "package",
            Tag::PackageBody => "packageBody",
            Tag::Configuration => "configuration",
            Tag::ForArchitecture => "forArchitecture",
            Tag::BlockConfiguration => "blockConfiguration",
            Tag::ComponentConfiguration => "componentConfiguration",
            Tag::ConfigList => "configList",
            Tag::UseEntity => "useEntity",
            Tag::UseConfiguration => "useConfiguration",
            Tag::Declarations => "declarations",
            Tag::ParallelStatements => "parallelStatements",
            Tag::SequentialStatements => "sequentialStatements",
            Tag::Generate => "generate",
            Tag::Generic => "generic",
            Tag::Parameter => "parameter",
            Tag::Ports => "ports",
            Tag::Port => "port",
            Tag::Value => "value",
            Tag::Type => "type",
            Tag::FunctionParameters => "functionParameters",
            Tag::ProcedureParameters => "procedureParameters",
            Tag::ConstantParameter => "constantParameter",
            Tag::VariableParameter => "variableParameter",
            Tag::SignalParameter => "signalParameter",
            Tag::IdParameter => "idParameter",
            Tag::TypeDeclaration => "typeDeclaration",
            Tag::SubtypeDeclaration => "subtypeDeclaration",
            Tag::ConstantDeclaration => "constantDeclaration",
            Tag::VariableDeclaration => "variableDeclaration",
            Tag::SignalDeclaration => "signalDeclaration",
            Tag::FileDeclaration => "fileDeclaration",
            Tag::AliasDeclaration => "aliasDeclaration",
            Tag::AttributeDeclaration => "attributeDeclaration",
            Tag::ComponentDeclaration => "componentDeclaration",
            Tag::FunctionDeclaration => "functionDeclaration",
            Tag::ProcedureDeclaration => "procedureDeclaration",
            Tag::ForDeclaration => "forDeclaration",
            Tag::Ids => "ids",
            Tag::Id => "id",
            Tag::Records => "records",
            Tag::Record => "record",
            Tag::RangesTypes => "rangesTypes",
            Tag::Ranges => "ranges",
            Tag::Range => "range",
            Tag::Array => "array",
            Tag::Access => "access",
            Tag::FileOf => "fileOf",
            Tag::LogicalExpression => "logicalExpression",
            Tag::RelationalExpression => "relationalExpression",
            Tag::ShiftExpression => "shiftExpression",
            Tag::AddingExpression => "addingExpression",
            Tag::MultiplyingExpression => "multiplyingExpression",
            Tag::ExponentialExpression => "exponentialExpression",
            Tag::PrefixExpression => "prefixExpression",
            Tag::ConstantExpression => "constantExpression",
            Tag::NewExpression => "newExpression",
            Tag::TimeExpression => "timeExpression",
            Tag::ObjectExpression => "objectExpression",
            Tag::RecordExpression => "recordExpression",
            Tag::AggregateExpression => "aggregateExpression",
            Tag::Expressions => "expressions",
            Tag::AfterExpression => "afterExpression",
            Tag::Parameters => "parameters",
            Tag::Connect => "connect",
            Tag::Choices => "choices",
            Tag::Others => "others",
            Tag::Suffix => "suffix",
            Tag::Attribute => "attribute",
            Tag::Open => "open",
            Tag::Null => "null",
            Tag::Unaffected => "unaffected",
            Tag::Reject => "reject",
            Tag::BlockParallelStatement => "blockParallelStatement",
            Tag::ProcessParallelStatement => "processParallelStatement",
            Tag::ProcedureParallelStatement => "procedureParallelStatement",
            Tag::AssignParallelStatement => "assignParallelStatement",
            Tag::AssertParallelStatement => "assertParallelStatement",
            Tag::SelectParallelStatement => "selectParallelStatement",
            Tag::ComponentParallelStatement => "componentParallelStatement",
            Tag::EntityParallelStatement => "entityParallelStatement",
            Tag::ConfigurationParallelStatement => "configurationParallelStatement",
            Tag::IfParallelStatement => "ifParallelStatement",
            Tag::ForParallelStatement => "forParallelStatement",
            Tag::SignalValue => "signalValue",
            Tag::When => "when",
            Tag::Map => "map",
            Tag::PortMap => "portMap",
            Tag::GenericMap => "genericMap",
            Tag::UniversalMap => "universalMap",
            Tag::WaitSequentialStatement => "waitSequentialStatement",
            Tag::On => "on",
            Tag::Until => "until",
            Tag::For => "for",
            Tag::AssertSequentialStatement => "assertSequentialStatement",
            Tag::ReportSequentialStatement => "reportSequentialStatement",
            Tag::SignalAssignSequentialStatement => "signalAssignSequentialStatement",
            Tag::VariableAssignSequentialStatement => "variableAssignSequentialStatement",
            Tag::ProcedureSequentialStatement => "procedureSequentialStatement",
            Tag::IfSequentialStatement => "ifSequentialStatement",
            Tag::Then => "then",
            Tag::Elseif => "elseif",
            Tag::Else => "else",
            Tag::CaseSequentialStatement => "caseSequentialStatement",
            Tag::Case => "case",
            Tag::WhileSequentialStatement => "whileSequentialStatement",
            Tag::ForSequentialStatement => "forSequentialStatement",
            Tag::NextSequentialStatement => "nextSequentialStatement",
            Tag::ExitSequentialStatement => "exitSequentialStatement",
            Tag::ReturnSequentialStatement => "returnSequentialStatement",
            Tag::NullSequentialStatement => "nullSequentialStatement",
        }
    }

    /// Looks a tag up from its wire name.
    pub fn parse(s: &str) -> Option<Tag> {
        ALL_TAGS.iter().copied().find(|t| t.as_str() == s)
    }

    /// True for the tags the dependency walker treats as expressions when
    /// collecting referenced identifiers from a statement's direct
    /// children.
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            Tag::LogicalExpression
                | Tag::RelationalExpression
                | Tag::ShiftExpression
                | Tag::AddingExpression
                | Tag::MultiplyingExpression
                | Tag::ExponentialExpression
                | Tag::PrefixExpression
                | Tag::ConstantExpression
                | Tag::NewExpression
                | Tag::TimeExpression
                | Tag::ObjectExpression
                | Tag::RecordExpression
                | Tag::AggregateExpression
        )
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ALL_TAGS: [Tag; 116] = [
    Tag::Vhdl,
    Tag::OptimalVhdl,
    Tag::UseClause,
    Tag::Use,
    Tag::Entity,
    Tag::Architecture,
    Tag::Package,
    Tag::PackageBody,
    Tag::Configuration,
    Tag::ForArchitecture,
    Tag::BlockConfiguration,
    Tag::ComponentConfiguration,
    Tag::ConfigList,
    Tag::UseEntity,
    Tag::UseConfiguration,
    Tag::Declarations,
    Tag::ParallelStatements,
    Tag::SequentialStatements,
    Tag::Generate,
    Tag::Generic,
    Tag::Parameter,
    Tag::Ports,
    Tag::Port,
    Tag::Value,
    Tag::Type,
    Tag::FunctionParameters,
    Tag::ProcedureParameters,
    Tag::ConstantParameter,
    Tag::VariableParameter,
    Tag::SignalParameter,
    Tag::IdParameter,
    Tag::TypeDeclaration,
    Tag::SubtypeDeclaration,
    Tag::ConstantDeclaration,
    Tag::VariableDeclaration,
    Tag::SignalDeclaration,
    Tag::FileDeclaration,
    Tag::AliasDeclaration,
    Tag::AttributeDeclaration,
    Tag::ComponentDeclaration,
    Tag::FunctionDeclaration,
    Tag::ProcedureDeclaration,
    Tag::ForDeclaration,
    Tag::Ids,
    Tag::Id,
    Tag::Records,
    Tag::Record,
    Tag::RangesTypes,
    Tag::Ranges,
    Tag::Range,
    Tag::Array,
    Tag::Access,
    Tag::FileOf,
    Tag::LogicalExpression,
    Tag::RelationalExpression,
    Tag::ShiftExpression,
    Tag::AddingExpression,
    Tag::MultiplyingExpression,
    Tag::ExponentialExpression,
    Tag::PrefixExpression,
    Tag::ConstantExpression,
    Tag::NewExpression,
    Tag::TimeExpression,
    Tag::ObjectExpression,
    Tag::RecordExpression,
    Tag::AggregateExpression,
    Tag::Expressions,
    Tag::AfterExpression,
    Tag::Parameters,
    Tag::Connect,
    Tag::Choices,
    Tag::Others,
    Tag::Suffix,
    Tag::Attribute,
    Tag::Open,
    Tag::Null,
    Tag::Unaffected,
    Tag::Reject,
    Tag::BlockParallelStatement,
    Tag::ProcessParallelStatement,
    Tag::ProcedureParallelStatement,
    Tag::AssignParallelStatement,
    Tag::AssertParallelStatement,
    Tag::SelectParallelStatement,
    Tag::ComponentParallelStatement,
    Tag::EntityParallelStatement,
    Tag::ConfigurationParallelStatement,
    Tag::IfParallelStatement,
    Tag::ForParallelStatement,
    Tag::SignalValue,
    Tag::When,
    Tag::Map,
    Tag::PortMap,
    Tag::GenericMap,
    Tag::UniversalMap,
    Tag::WaitSequentialStatement,
    Tag::On,
    Tag::Until,
    Tag::For,
    Tag::AssertSequentialStatement,
    Tag::ReportSequentialStatement,
    Tag::SignalAssignSequentialStatement,
    Tag::VariableAssignSequentialStatement,
    Tag::ProcedureSequentialStatement,
    Tag::IfSequentialStatement,
    Tag::Then,
    Tag::Elseif,
    Tag::Else,
    Tag::CaseSequentialStatement,
    Tag::Case,
    Tag::WhileSequentialStatement,
    Tag::ForSequentialStatement,
    Tag::NextSequentialStatement,
    Tag::ExitSequentialStatement,
    Tag::ReturnSequentialStatement,
    Tag::NullSequentialStatement,
];

/// One node of the syntax tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyntaxNode {
    /// The node's tag.
    pub tag: Tag,
    attrs: Vec<(String, String)>,
    /// Ordered children, exclusively owned.
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Creates a node with no attributes or children.
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`set_attr`](Self::set_attr).
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder form of [`push`](Self::push).
    pub fn with_child(mut self, child: SyntaxNode) -> Self {
        self.children.push(child);
        self
    }

    /// Sets an attribute, replacing any existing value under that name.
    /// New attributes keep insertion order.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name.to_string(), value));
        }
    }

    /// Returns an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Removes an attribute if present.
    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(n, _)| n != name);
    }

    /// All attributes in insertion order.
    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    /// The `id` attribute, if any.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Sets the `line` attribute from a 1-based line number.
    pub fn set_line(&mut self, line: u32) {
        self.set_attr("line", line.to_string());
    }

    /// Appends a child.
    pub fn push(&mut self, child: SyntaxNode) {
        self.children.push(child);
    }

    /// First child with the given tag.
    pub fn child(&self, tag: Tag) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Mutable access to the first child with the given tag.
    pub fn child_mut(&mut self, tag: Tag) -> Option<&mut SyntaxNode> {
        self.children.iter_mut().find(|c| c.tag == tag)
    }

    /// Direct children with the given tag.
    pub fn children_tagged(&self, tag: Tag) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Pre-order traversal of all descendants (not including `self`).
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// All descendants with the given tag, in document order.
    pub fn find_descendants(&self, tag: Tag) -> impl Iterator<Item = &SyntaxNode> {
        self.descendants().filter(move |n| n.tag == tag)
    }

    /// The `line` attribute of this node or, failing that, of its first
    /// child, recursively. Assignment statements are keyed by their
    /// target's position, which lives in a child node.
    pub fn first_line(&self) -> Option<&str> {
        if let Some(line) = self.attr("line") {
            return Some(line);
        }
        self.children.first().and_then(|c| c.first_line())
    }
}

/// Iterator over a node's descendants in document order.
pub struct Descendants<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<&'a SyntaxNode> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
