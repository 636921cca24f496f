//! Parser infrastructure and top-level VHDL-93 rules.
//!
//! [`VhdlParser`] owns the token stream and provides the primitive
//! operations (advance, eat, expect, error recovery); the top-level methods
//! here parse design files, library/use clauses, entities, architectures,
//! packages, and configurations. Declarations, statements, and expressions
//! live in the sibling modules and extend the same struct.

use crate::lexer;
use crate::node::{SyntaxNode, Tag};
use crate::token::{Token, VhdlToken};
use sigtrace_diagnostics::code::{Category, DiagnosticCode};
use sigtrace_diagnostics::{Diagnostic, DiagnosticSink};
use sigtrace_source::{SourceFile, Span};

/// Lexes and parses one source file into a `vhdl` tree.
///
/// Lexer and parser diagnostics land in `sink`; the caller decides whether
/// an errored tree is still worth serializing (the CLI does not).
pub fn parse_file(file: &SourceFile, sink: &DiagnosticSink) -> SyntaxNode {
    let tokens = lexer::lex(&file.content, file.id, sink);
    let mut parser = VhdlParser::new(tokens, file, sink);
    parser.parse_design_file()
}

/// A recursive descent parser for VHDL-93.
///
/// Reductions construct [`SyntaxNode`]s directly, so the parser output is
/// the tagged tree the rest of the pipeline consumes. Errors are emitted to
/// the sink as `invalid syntax '<token>'` / `unexpected EOF` and recovery
/// continues at the next semicolon (or the next token at top level).
pub struct VhdlParser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    file: &'src SourceFile,
    sink: &'src DiagnosticSink,
}

impl<'src> VhdlParser<'src> {
    /// Creates a parser over a token stream.
    pub fn new(tokens: Vec<Token>, file: &'src SourceFile, sink: &'src DiagnosticSink) -> Self {
        Self {
            tokens,
            pos: 0,
            file,
            sink,
        }
    }

    // ========================================================================
    // Primitive operations
    // ========================================================================

    pub(crate) fn current(&self) -> VhdlToken {
        self.tokens[self.pos].kind
    }

    pub(crate) fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    /// Source text of the current token.
    pub(crate) fn current_text(&self) -> &'src str {
        let span = self.current_span();
        self.file.snippet(span.start, span.end)
    }

    /// Source text of the current token, lowercased. Identifier values and
    /// operator lexemes are stored in attributes in this form.
    pub(crate) fn current_text_lower(&self) -> String {
        self.current_text().to_ascii_lowercase()
    }

    /// 1-based line of the current token.
    pub(crate) fn current_line(&self) -> u32 {
        self.file.line_of(self.current_span().start)
    }

    pub(crate) fn at(&self, kind: VhdlToken) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.current() == VhdlToken::Eof
    }

    pub(crate) fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    pub(crate) fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    /// Consumes the current token if it matches. Returns whether it did.
    pub(crate) fn eat(&mut self, kind: VhdlToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Requires the current token to match, emitting a syntax error if not.
    pub(crate) fn expect(&mut self, kind: VhdlToken) {
        if !self.eat(kind) {
            self.syntax_error();
        }
    }

    /// Requires an identifier and returns its lowercased text.
    pub(crate) fn expect_ident(&mut self) -> String {
        if self.at(VhdlToken::Identifier) {
            let text = self.current_text_lower();
            self.advance();
            text
        } else {
            self.syntax_error();
            String::from("<missing>")
        }
    }

    /// Consumes an identifier if present.
    pub(crate) fn eat_ident(&mut self) -> Option<String> {
        if self.at(VhdlToken::Identifier) {
            Some(self.expect_ident())
        } else {
            None
        }
    }

    pub(crate) fn peek_is(&self, kind: VhdlToken) -> bool {
        self.tokens
            .get(self.pos + 1)
            .map(|t| t.kind == kind)
            .unwrap_or(false)
    }

    /// Saves the position for single-token backtracking (labeled-statement
    /// disambiguation).
    pub(crate) fn mark(&self) -> usize {
        self.pos
    }

    pub(crate) fn rewind(&mut self, mark: usize) {
        self.pos = mark;
    }

    // ========================================================================
    // Errors and recovery
    // ========================================================================

    /// Reports a syntax error at the current token: `invalid syntax '<t>'`,
    /// or `unexpected EOF` at end of input.
    pub(crate) fn syntax_error(&self) {
        let (number, message) = if self.at_eof() {
            (100, String::from("unexpected EOF"))
        } else {
            (101, format!("invalid syntax '{}'", self.current_text()))
        };
        self.sink.emit(Diagnostic::error(
            DiagnosticCode::new(Category::Parse, number),
            message,
            self.current_span(),
        ));
    }

    /// Skips to the next semicolon, consuming it.
    pub(crate) fn recover_to_semicolon(&mut self) {
        while !self.at_eof() && !self.at(VhdlToken::Semicolon) {
            self.advance();
        }
        self.eat(VhdlToken::Semicolon);
    }

    /// A node of `tag` stamped with the current token's line.
    pub(crate) fn node_here(&self, tag: Tag) -> SyntaxNode {
        let mut node = SyntaxNode::new(tag);
        node.set_line(self.current_line());
        node
    }

    // ========================================================================
    // Top level
    // ========================================================================

    /// Parses a whole design file into a `vhdl` root node.
    pub fn parse_design_file(&mut self) -> SyntaxNode {
        let mut root = SyntaxNode::new(Tag::Vhdl)
            .with_attr("file", self.file.path.display().to_string());

        while !self.at_eof() {
            match self.current() {
                VhdlToken::Library | VhdlToken::Use => {
                    let clause = self.parse_use_clause();
                    root.push(clause);
                }
                VhdlToken::Entity => {
                    let e = self.parse_entity();
                    root.push(e);
                }
                VhdlToken::Architecture => {
                    let a = self.parse_architecture();
                    root.push(a);
                }
                VhdlToken::Package => {
                    let p = if self.peek_is(VhdlToken::Body) {
                        self.parse_package_body()
                    } else {
                        self.parse_package()
                    };
                    root.push(p);
                }
                VhdlToken::Configuration => {
                    let c = self.parse_configuration();
                    root.push(c);
                }
                _ => {
                    // Single-token recovery at top level.
                    self.syntax_error();
                    self.advance();
                }
            }
        }

        root
    }

    /// Parses `library name;` followed by any number of `use a.b[.c];`
    /// items, or a bare run of `use` items, into one `useClause` node.
    fn parse_use_clause(&mut self) -> SyntaxNode {
        let mut clause = self.node_here(Tag::UseClause);

        if self.eat(VhdlToken::Library) {
            let name = self.expect_ident();
            clause.set_attr("library", name);
            self.expect(VhdlToken::Semicolon);
        }

        while self.at(VhdlToken::Use) {
            let item = self.parse_use_item();
            clause.push(item);
        }

        clause
    }

    /// Parses `use ID.ID[.ID|.all];` into a `use` node whose `id` carries
    /// the dotted name.
    fn parse_use_item(&mut self) -> SyntaxNode {
        let mut item = self.node_here(Tag::Use);
        self.expect(VhdlToken::Use);

        let mut name = self.expect_ident();
        while self.eat(VhdlToken::Dot) {
            name.push('.');
            if self.eat(VhdlToken::All) {
                name.push_str("all");
                break;
            }
            name.push_str(&self.expect_ident());
        }
        item.set_attr("id", name);

        self.expect(VhdlToken::Semicolon);
        item
    }

    // ========================================================================
    // Entity / Architecture / Package / Configuration
    // ========================================================================

    fn parse_entity(&mut self) -> SyntaxNode {
        let mut entity = self.node_here(Tag::Entity);
        self.expect(VhdlToken::Entity);
        let name = self.expect_ident();
        entity.set_attr("id", name);
        self.expect(VhdlToken::Is);

        if self.at(VhdlToken::Generic) {
            let g = self.parse_generic_clause();
            entity.push(g);
        }
        if self.at(VhdlToken::Port) {
            let p = self.parse_port_clause();
            entity.push(p);
        }

        let decls = self.parse_declarations();
        if !decls.children.is_empty() {
            entity.push(decls);
        }

        if self.eat(VhdlToken::Begin) {
            let stmts = self.parse_parallel_statements();
            entity.push(stmts);
        }

        self.expect(VhdlToken::End);
        self.eat(VhdlToken::Entity);
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        entity
    }

    fn parse_architecture(&mut self) -> SyntaxNode {
        let mut arch = self.node_here(Tag::Architecture);
        self.expect(VhdlToken::Architecture);
        let name = self.expect_ident();
        arch.set_attr("id", name);
        self.expect(VhdlToken::Of);
        let entity = self.expect_ident();
        arch.set_attr("entity", entity);
        self.expect(VhdlToken::Is);

        // Both regions are always present so downstream passes can rely on
        // the children existing even for empty bodies.
        let decls = self.parse_declarations();
        arch.push(decls);
        self.expect(VhdlToken::Begin);
        let stmts = self.parse_parallel_statements();
        arch.push(stmts);

        self.expect(VhdlToken::End);
        self.eat(VhdlToken::Architecture);
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        arch
    }

    fn parse_package(&mut self) -> SyntaxNode {
        let mut pkg = self.node_here(Tag::Package);
        self.expect(VhdlToken::Package);
        let name = self.expect_ident();
        pkg.set_attr("id", name);
        self.expect(VhdlToken::Is);

        let decls = self.parse_declarations();
        if !decls.children.is_empty() {
            pkg.push(decls);
        }

        self.expect(VhdlToken::End);
        self.eat(VhdlToken::Package);
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        pkg
    }

    fn parse_package_body(&mut self) -> SyntaxNode {
        let mut body = self.node_here(Tag::PackageBody);
        self.expect(VhdlToken::Package);
        self.expect(VhdlToken::Body);
        let name = self.expect_ident();
        body.set_attr("id", name);
        self.expect(VhdlToken::Is);

        let decls = self.parse_declarations();
        if !decls.children.is_empty() {
            body.push(decls);
        }

        self.expect(VhdlToken::End);
        if self.eat(VhdlToken::Package) {
            self.eat(VhdlToken::Body);
        }
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        body
    }

    fn parse_configuration(&mut self) -> SyntaxNode {
        let mut cfg = self.node_here(Tag::Configuration);
        self.expect(VhdlToken::Configuration);
        let name = self.expect_ident();
        cfg.set_attr("id", name);
        self.expect(VhdlToken::Of);
        let entity = self.expect_ident();
        cfg.set_attr("entity", entity);
        self.expect(VhdlToken::Is);

        let mut for_arch = self.node_here(Tag::ForArchitecture);
        self.expect(VhdlToken::For);
        let arch = self.expect_ident();
        for_arch.set_attr("id", arch);

        while self.at(VhdlToken::For) {
            let item = self.parse_configuration_item();
            for_arch.push(item);
        }

        self.expect(VhdlToken::End);
        self.expect(VhdlToken::For);
        self.expect(VhdlToken::Semicolon);
        cfg.push(for_arch);

        self.expect(VhdlToken::End);
        self.eat(VhdlToken::Configuration);
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        cfg
    }

    /// Parses one `for …` item inside a configuration: a block
    /// configuration (`for label … end for;`) or a component configuration
    /// (`for all|label : comp use entity|configuration …; end for;`).
    fn parse_configuration_item(&mut self) -> SyntaxNode {
        let line = self.current_line();
        self.expect(VhdlToken::For);

        let which = if self.eat(VhdlToken::All) {
            String::from("all")
        } else {
            self.expect_ident()
        };

        if !self.at(VhdlToken::Colon) {
            // Block configuration over a label.
            let mut block = SyntaxNode::new(Tag::BlockConfiguration);
            block.set_attr("label", which);
            block.set_line(line);
            while self.at(VhdlToken::For) {
                let item = self.parse_configuration_item();
                block.push(item);
            }
            self.expect(VhdlToken::End);
            self.expect(VhdlToken::For);
            self.expect(VhdlToken::Semicolon);
            return block;
        }

        self.expect(VhdlToken::Colon);
        let component = self.expect_ident();
        let mut comp_cfg = SyntaxNode::new(Tag::ComponentConfiguration)
            .with_attr("which", which)
            .with_attr("id", component);
        comp_cfg.set_line(line);

        self.expect(VhdlToken::Use);
        let binding = if self.eat(VhdlToken::Entity) {
            let mut use_entity = self.node_here(Tag::UseEntity);
            let name = self.parse_dotted_name();
            use_entity.set_attr("id", name);
            if self.eat(VhdlToken::LeftParen) {
                let arch = self.expect_ident();
                use_entity.set_attr("architecture", arch);
                self.expect(VhdlToken::RightParen);
            }
            self.parse_map_aspects(&mut use_entity);
            self.expect(VhdlToken::Semicolon);
            if self.at(VhdlToken::For) {
                let nested = self.parse_nested_for_architecture();
                use_entity.push(nested);
            }
            use_entity
        } else {
            self.expect(VhdlToken::Configuration);
            let mut use_cfg = self.node_here(Tag::UseConfiguration);
            let name = self.parse_dotted_name();
            use_cfg.set_attr("id", name);
            self.parse_map_aspects(&mut use_cfg);
            self.expect(VhdlToken::Semicolon);
            use_cfg
        };
        comp_cfg.push(binding);

        self.expect(VhdlToken::End);
        self.expect(VhdlToken::For);
        self.expect(VhdlToken::Semicolon);
        comp_cfg
    }

    fn parse_nested_for_architecture(&mut self) -> SyntaxNode {
        let mut for_arch = self.node_here(Tag::ForArchitecture);
        self.expect(VhdlToken::For);
        let arch = self.expect_ident();
        for_arch.set_attr("id", arch);
        while self.at(VhdlToken::For) {
            let item = self.parse_configuration_item();
            for_arch.push(item);
        }
        self.expect(VhdlToken::End);
        self.expect(VhdlToken::For);
        self.expect(VhdlToken::Semicolon);
        for_arch
    }

    /// Parses `ID{.ID}` into a dotted string.
    pub(crate) fn parse_dotted_name(&mut self) -> String {
        let mut name = self.expect_ident();
        while self.at(VhdlToken::Dot) && self.peek_is(VhdlToken::Identifier) {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_ident());
        }
        name
    }

    // ========================================================================
    // Interface clauses
    // ========================================================================

    /// Parses `generic ( ID : type [:= expr] {; …} );` into a `generic`
    /// node of `parameter` children.
    pub(crate) fn parse_generic_clause(&mut self) -> SyntaxNode {
        let mut generic = SyntaxNode::new(Tag::Generic);
        self.expect(VhdlToken::Generic);
        self.expect(VhdlToken::LeftParen);

        loop {
            let param = self.parse_generic_parameter();
            generic.push(param);
            if !self.eat(VhdlToken::Semicolon) {
                break;
            }
            if self.at(VhdlToken::RightParen) {
                break;
            }
        }

        self.expect(VhdlToken::RightParen);
        self.expect(VhdlToken::Semicolon);
        generic
    }

    fn parse_generic_parameter(&mut self) -> SyntaxNode {
        let mut param = self.node_here(Tag::Parameter);
        let name = self.expect_ident();
        param.set_attr("id", name);
        self.expect(VhdlToken::Colon);
        let ty = self.parse_typeid();
        param.push(ty);
        if let Some(value) = self.parse_default_value() {
            param.push(value);
        }
        param
    }

    /// Parses `port ( ID : in|out|inout type [:= expr] {; …} );` into a
    /// `ports` node of `port` children.
    pub(crate) fn parse_port_clause(&mut self) -> SyntaxNode {
        let mut ports = SyntaxNode::new(Tag::Ports);
        self.expect(VhdlToken::Port);
        self.expect(VhdlToken::LeftParen);

        loop {
            let port = self.parse_port();
            ports.push(port);
            if !self.eat(VhdlToken::Semicolon) {
                break;
            }
            if self.at(VhdlToken::RightParen) {
                break;
            }
        }

        self.expect(VhdlToken::RightParen);
        self.expect(VhdlToken::Semicolon);
        ports
    }

    fn parse_port(&mut self) -> SyntaxNode {
        let mut port = self.node_here(Tag::Port);
        let name = self.expect_ident();
        port.set_attr("id", name);
        self.expect(VhdlToken::Colon);
        let io = self.parse_port_direction();
        port.set_attr("io", io);
        let ty = self.parse_typeid();
        port.push(ty);
        if let Some(value) = self.parse_default_value() {
            port.push(value);
        }
        port
    }

    /// Parses `in`, `out`, or `inout`, returning the lexeme. Defaults to
    /// `in` (with an error) on anything else.
    pub(crate) fn parse_port_direction(&mut self) -> String {
        match self.current() {
            VhdlToken::In | VhdlToken::Out | VhdlToken::Inout => {
                let text = self.current_text_lower();
                self.advance();
                text
            }
            _ => {
                self.syntax_error();
                String::from("in")
            }
        }
    }

    /// Parses `:= expr` into a `value` node, if present.
    pub(crate) fn parse_default_value(&mut self) -> Option<SyntaxNode> {
        if self.eat(VhdlToken::ColonEquals) {
            let expr = self.parse_expr();
            Some(SyntaxNode::new(Tag::Value).with_child(expr))
        } else {
            None
        }
    }

    /// Parses a type mark — a name with optional constraint parentheses —
    /// and retags it `type`.
    pub(crate) fn parse_typeid(&mut self) -> SyntaxNode {
        let mut ty = self.parse_id_item();
        ty.tag = Tag::Type;
        ty
    }

    // ========================================================================
    // Map aspects
    // ========================================================================

    /// Parses optional `generic map (…)` and `port map (…)` aspects,
    /// appending them to `parent`.
    pub(crate) fn parse_map_aspects(&mut self, parent: &mut SyntaxNode) {
        if self.at(VhdlToken::Generic) {
            self.advance();
            self.expect(VhdlToken::Map);
            let map = self.parse_map_list(Tag::GenericMap);
            parent.push(map);
        }
        if self.at(VhdlToken::Port) {
            self.advance();
            self.expect(VhdlToken::Map);
            let map = self.parse_map_list(Tag::PortMap);
            parent.push(map);
        }
    }

    /// Parses `( [formal =>] actual {, …} )` into a map-list node. Named
    /// associations become `map` nodes; positional actuals are kept as bare
    /// expression children.
    pub(crate) fn parse_map_list(&mut self, tag: Tag) -> SyntaxNode {
        let mut list = SyntaxNode::new(tag);
        self.expect(VhdlToken::LeftParen);

        loop {
            let element = self.parse_map_element();
            list.push(element);
            if !self.eat(VhdlToken::Comma) {
                break;
            }
        }

        self.expect(VhdlToken::RightParen);
        list
    }

    fn parse_map_element(&mut self) -> SyntaxNode {
        if self.at(VhdlToken::Open) {
            let open = self.node_here(Tag::Open);
            self.advance();
            return open;
        }
        let first = self.parse_expr();
        if self.eat(VhdlToken::Arrow) {
            let mut map = SyntaxNode::new(Tag::Map).with_child(first);
            if self.at(VhdlToken::Open) {
                let open = self.node_here(Tag::Open);
                self.advance();
                map.push(open);
            } else {
                let actual = self.parse_expr();
                map.push(actual);
            }
            map
        } else {
            first
        }
    }
}
