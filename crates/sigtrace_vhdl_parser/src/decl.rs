//! Declaration parsing for VHDL-93.
//!
//! Covers type, subtype, constant, variable (plain and `shared`), signal,
//! file (all three forms), alias, attribute (declaration and
//! specification), component, function (pure/impure), procedure, and the
//! `for` configuration specification. Multi-identifier declarations keep
//! their `ids` child here; the normalizer expands them later.

use crate::node::{SyntaxNode, Tag};
use crate::parser::VhdlParser;
use crate::token::VhdlToken;

impl VhdlParser<'_> {
    /// Parses declarations into a `declarations` node until `begin`,
    /// `end`, or EOF.
    pub(crate) fn parse_declarations(&mut self) -> SyntaxNode {
        let mut decls = SyntaxNode::new(Tag::Declarations);
        loop {
            match self.current() {
                VhdlToken::Begin | VhdlToken::End | VhdlToken::Eof => break,
                _ => {
                    if let Some(decl) = self.parse_declaration() {
                        decls.push(decl);
                    }
                }
            }
        }
        decls
    }

    /// Parses one declaration including its trailing semicolon. Returns
    /// `None` if error recovery consumed the input instead.
    fn parse_declaration(&mut self) -> Option<SyntaxNode> {
        match self.current() {
            VhdlToken::Type => Some(self.parse_type_declaration()),
            VhdlToken::Subtype => Some(self.parse_subtype_declaration()),
            VhdlToken::Constant => Some(self.parse_constant_declaration()),
            VhdlToken::Variable | VhdlToken::Shared => Some(self.parse_variable_declaration()),
            VhdlToken::Signal => Some(self.parse_signal_declaration()),
            VhdlToken::File => Some(self.parse_file_declaration()),
            VhdlToken::Alias => Some(self.parse_alias_declaration()),
            VhdlToken::Attribute => Some(self.parse_attribute_declaration()),
            VhdlToken::Component => Some(self.parse_component_declaration()),
            VhdlToken::Function | VhdlToken::Pure | VhdlToken::Impure => {
                Some(self.parse_function_declaration())
            }
            VhdlToken::Procedure => Some(self.parse_procedure_declaration()),
            VhdlToken::For => Some(self.parse_for_specification()),
            _ => {
                self.syntax_error();
                self.recover_to_semicolon();
                None
            }
        }
    }

    /// Parses `ID {, ID}` into an `ids` node of `id` children.
    pub(crate) fn parse_ids_list(&mut self) -> SyntaxNode {
        let mut ids = SyntaxNode::new(Tag::Ids);
        loop {
            let mut id = self.node_here(Tag::Id);
            let name = self.expect_ident();
            id.set_attr("id", name);
            ids.push(id);
            if !self.eat(VhdlToken::Comma) {
                break;
            }
        }
        ids
    }

    fn parse_type_declaration(&mut self) -> SyntaxNode {
        let mut decl = self.node_here(Tag::TypeDeclaration);
        self.expect(VhdlToken::Type);
        let name = self.expect_ident();
        decl.set_attr("id", name);
        self.expect(VhdlToken::Is);

        let def = match self.current() {
            // Enumeration: (lit, lit, …)
            VhdlToken::LeftParen => {
                self.advance();
                let ids = self.parse_enum_literals();
                self.expect(VhdlToken::RightParen);
                ids
            }
            // Integer/real range
            VhdlToken::Range => {
                self.advance();
                self.parse_range()
            }
            VhdlToken::Array => self.parse_array_type_def(),
            VhdlToken::Record => self.parse_record_type_def(),
            VhdlToken::Access => {
                self.advance();
                let ty = self.parse_typeid();
                SyntaxNode::new(Tag::Access).with_child(ty)
            }
            VhdlToken::File => {
                self.advance();
                self.expect(VhdlToken::Of);
                let ty = self.parse_typeid();
                SyntaxNode::new(Tag::FileOf).with_child(ty)
            }
            _ => {
                self.syntax_error();
                self.recover_to_semicolon();
                return decl;
            }
        };
        decl.push(def);

        self.expect(VhdlToken::Semicolon);
        decl
    }

    /// Enumeration literals: identifiers or character literals.
    fn parse_enum_literals(&mut self) -> SyntaxNode {
        let mut ids = SyntaxNode::new(Tag::Ids);
        loop {
            let mut id = self.node_here(Tag::Id);
            match self.current() {
                VhdlToken::Identifier => {
                    let name = self.expect_ident();
                    id.set_attr("id", name);
                }
                VhdlToken::Literal => {
                    id.set_attr("id", self.current_text().to_string());
                    self.advance();
                }
                _ => {
                    self.syntax_error();
                    break;
                }
            }
            ids.push(id);
            if !self.eat(VhdlToken::Comma) {
                break;
            }
        }
        ids
    }

    fn parse_array_type_def(&mut self) -> SyntaxNode {
        self.expect(VhdlToken::Array);
        self.expect(VhdlToken::LeftParen);

        let mut indices = SyntaxNode::new(Tag::RangesTypes);
        loop {
            let index = self.parse_discrete_range();
            indices.push(index);
            if !self.eat(VhdlToken::Comma) {
                break;
            }
        }
        self.expect(VhdlToken::RightParen);

        self.expect(VhdlToken::Of);
        let element = self.parse_expr();
        SyntaxNode::new(Tag::Array)
            .with_child(indices)
            .with_child(element)
    }

    fn parse_record_type_def(&mut self) -> SyntaxNode {
        self.expect(VhdlToken::Record);
        let mut records = SyntaxNode::new(Tag::Records);

        while !self.at(VhdlToken::End) && !self.at_eof() {
            let line = self.current_line();
            let ids = self.parse_ids_list();
            self.expect(VhdlToken::Colon);
            let ty = self.parse_typeid();
            self.expect(VhdlToken::Semicolon);
            let mut field = SyntaxNode::new(Tag::Record);
            field.set_line(line);
            field.push(ids);
            field.push(ty);
            records.push(field);
        }

        self.expect(VhdlToken::End);
        self.expect(VhdlToken::Record);
        records
    }

    fn parse_subtype_declaration(&mut self) -> SyntaxNode {
        let mut decl = self.node_here(Tag::SubtypeDeclaration);
        self.expect(VhdlToken::Subtype);
        let name = self.expect_ident();
        decl.set_attr("id", name);
        self.expect(VhdlToken::Is);

        let mut base = self.node_here(Tag::Id);
        let base_name = self.expect_ident();
        base.set_attr("id", base_name);
        decl.push(base);

        if self.eat(VhdlToken::Range) {
            let range = self.parse_range();
            decl.push(range);
        } else if self.eat(VhdlToken::LeftParen) {
            let mut ranges = SyntaxNode::new(Tag::Ranges);
            loop {
                let r = self.parse_discrete_range();
                ranges.push(r);
                if !self.eat(VhdlToken::Comma) {
                    break;
                }
            }
            self.expect(VhdlToken::RightParen);
            decl.push(ranges);
        }

        self.expect(VhdlToken::Semicolon);
        decl
    }

    fn parse_constant_declaration(&mut self) -> SyntaxNode {
        let mut decl = self.node_here(Tag::ConstantDeclaration);
        self.expect(VhdlToken::Constant);
        let ids = self.parse_ids_list();
        decl.push(ids);
        self.expect(VhdlToken::Colon);
        let ty = self.parse_typeid();
        decl.push(ty);
        self.expect(VhdlToken::ColonEquals);
        let expr = self.parse_expr();
        decl.push(SyntaxNode::new(Tag::Value).with_child(expr));
        self.expect(VhdlToken::Semicolon);
        decl
    }

    fn parse_variable_declaration(&mut self) -> SyntaxNode {
        let mut decl = self.node_here(Tag::VariableDeclaration);
        let shared = self.eat(VhdlToken::Shared);
        decl.set_attr("shared", if shared { "true" } else { "false" });
        self.expect(VhdlToken::Variable);
        let ids = self.parse_ids_list();
        decl.push(ids);
        self.expect(VhdlToken::Colon);
        let ty = self.parse_typeid();
        decl.push(ty);
        if let Some(value) = self.parse_default_value() {
            decl.push(value);
        }
        self.expect(VhdlToken::Semicolon);
        decl
    }

    fn parse_signal_declaration(&mut self) -> SyntaxNode {
        let mut decl = self.node_here(Tag::SignalDeclaration);
        self.expect(VhdlToken::Signal);
        let ids = self.parse_ids_list();
        decl.push(ids);
        self.expect(VhdlToken::Colon);
        let ty = self.parse_typeid();
        decl.push(ty);
        if let Some(value) = self.parse_default_value() {
            decl.push(value);
        }
        self.expect(VhdlToken::Semicolon);
        decl
    }

    /// File declarations come in three forms: plain, `is IN|OUT "name"`,
    /// and `is open MODE is "name"`.
    fn parse_file_declaration(&mut self) -> SyntaxNode {
        let mut decl = self.node_here(Tag::FileDeclaration);
        self.expect(VhdlToken::File);
        let ids = self.parse_ids_list();
        decl.push(ids);
        self.expect(VhdlToken::Colon);
        let ty = self.parse_typeid();
        decl.push(ty);

        if self.eat(VhdlToken::Is) {
            if self.eat(VhdlToken::Open) {
                let mode = match self.current() {
                    VhdlToken::ReadMode | VhdlToken::WriteMode | VhdlToken::AppendMode => {
                        let text = self.current_text_lower();
                        self.advance();
                        text
                    }
                    _ => {
                        self.syntax_error();
                        String::from("read_mode")
                    }
                };
                decl.set_attr("mode", mode);
                self.expect(VhdlToken::Is);
            } else {
                let io = match self.current() {
                    VhdlToken::In | VhdlToken::Out => {
                        let text = self.current_text_lower();
                        self.advance();
                        text
                    }
                    _ => {
                        self.syntax_error();
                        String::from("in")
                    }
                };
                decl.set_attr("io", io);
            }
            if self.at(VhdlToken::StringLiteral) {
                decl.set_attr("name", self.current_text().to_string());
                self.advance();
            } else {
                self.syntax_error();
            }
        }

        self.expect(VhdlToken::Semicolon);
        decl
    }

    fn parse_alias_declaration(&mut self) -> SyntaxNode {
        let mut decl = self.node_here(Tag::AliasDeclaration);
        self.expect(VhdlToken::Alias);
        let name = self.expect_ident();
        decl.set_attr("id", name);
        self.expect(VhdlToken::Colon);
        let ty = self.parse_typeid();
        decl.push(ty);
        self.expect(VhdlToken::Is);
        let aliased = self.parse_id_item();
        decl.push(aliased);
        self.expect(VhdlToken::Semicolon);
        decl
    }

    /// Attribute declaration (`attribute a : type;`) or specification
    /// (`attribute a of x : signal is expr;`).
    fn parse_attribute_declaration(&mut self) -> SyntaxNode {
        let mut decl = self.node_here(Tag::AttributeDeclaration);
        self.expect(VhdlToken::Attribute);
        let name = self.expect_ident();
        decl.set_attr("id", name);

        if self.eat(VhdlToken::Colon) {
            let ty = self.parse_typeid();
            decl.push(ty);
        } else if self.eat(VhdlToken::Of) {
            let which = match self.current() {
                VhdlToken::Others | VhdlToken::All => {
                    let text = self.current_text_lower();
                    self.advance();
                    text
                }
                _ => self.expect_ident(),
            };
            decl.set_attr("of", which);
            self.expect(VhdlToken::Colon);
            // The entity class is a keyword (signal, label, entity, …).
            let class = self.current_text_lower();
            self.advance();
            decl.set_attr("class", class);
            self.expect(VhdlToken::Is);
            let value = self.parse_expr();
            decl.push(value);
        } else {
            self.syntax_error();
            self.recover_to_semicolon();
            return decl;
        }

        self.expect(VhdlToken::Semicolon);
        decl
    }

    fn parse_component_declaration(&mut self) -> SyntaxNode {
        let mut decl = self.node_here(Tag::ComponentDeclaration);
        self.expect(VhdlToken::Component);
        let name = self.expect_ident();
        decl.set_attr("id", name);
        self.eat(VhdlToken::Is);

        if self.at(VhdlToken::Generic) {
            let g = self.parse_generic_clause();
            decl.push(g);
        }
        if self.at(VhdlToken::Port) {
            let p = self.parse_port_clause();
            decl.push(p);
        }

        self.expect(VhdlToken::End);
        self.expect(VhdlToken::Component);
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        decl
    }

    fn parse_function_declaration(&mut self) -> SyntaxNode {
        let mut decl = self.node_here(Tag::FunctionDeclaration);
        let pure = if self.eat(VhdlToken::Impure) {
            false
        } else {
            self.eat(VhdlToken::Pure);
            true
        };
        self.expect(VhdlToken::Function);
        let name = self.expect_ident();
        decl.set_attr("id", name);
        decl.set_attr("pure", if pure { "true" } else { "false" });

        if self.at(VhdlToken::LeftParen) {
            let params = self.parse_subprogram_parameters(Tag::FunctionParameters);
            decl.push(params);
        }

        self.expect(VhdlToken::Return);
        let ret = self.parse_typeid();
        decl.push(ret);

        if self.eat(VhdlToken::Is) {
            let body_decls = self.parse_declarations();
            if !body_decls.children.is_empty() {
                decl.push(body_decls);
            }
            self.expect(VhdlToken::Begin);
            let stmts = self.parse_sequential_statements();
            decl.push(stmts);
            self.expect(VhdlToken::End);
            self.eat(VhdlToken::Function);
            self.eat_ident();
        }

        self.expect(VhdlToken::Semicolon);
        decl
    }

    fn parse_procedure_declaration(&mut self) -> SyntaxNode {
        let mut decl = self.node_here(Tag::ProcedureDeclaration);
        self.expect(VhdlToken::Procedure);
        let name = self.expect_ident();
        decl.set_attr("id", name);

        if self.at(VhdlToken::LeftParen) {
            let params = self.parse_subprogram_parameters(Tag::ProcedureParameters);
            decl.push(params);
        }

        if self.eat(VhdlToken::Is) {
            let body_decls = self.parse_declarations();
            if !body_decls.children.is_empty() {
                decl.push(body_decls);
            }
            self.expect(VhdlToken::Begin);
            let stmts = self.parse_sequential_statements();
            decl.push(stmts);
            self.expect(VhdlToken::End);
            self.eat(VhdlToken::Procedure);
            self.eat_ident();
        }

        self.expect(VhdlToken::Semicolon);
        decl
    }

    /// Parses `( [class] ids : [mode] type [:= expr] {; …} )` into the
    /// given parameter-list tag. Each item's node tag records the object
    /// class; mode goes into the `io` attribute when written out.
    fn parse_subprogram_parameters(&mut self, tag: Tag) -> SyntaxNode {
        let mut list = SyntaxNode::new(tag);
        self.expect(VhdlToken::LeftParen);

        loop {
            let param = self.parse_subprogram_parameter();
            list.push(param);
            if !self.eat(VhdlToken::Semicolon) {
                break;
            }
            if self.at(VhdlToken::RightParen) {
                break;
            }
        }

        self.expect(VhdlToken::RightParen);
        list
    }

    fn parse_subprogram_parameter(&mut self) -> SyntaxNode {
        let line = self.current_line();
        let tag = match self.current() {
            VhdlToken::Constant => {
                self.advance();
                Tag::ConstantParameter
            }
            VhdlToken::Variable => {
                self.advance();
                Tag::VariableParameter
            }
            VhdlToken::Signal => {
                self.advance();
                Tag::SignalParameter
            }
            _ => Tag::IdParameter,
        };

        let mut param = SyntaxNode::new(tag);
        param.set_line(line);
        let ids = self.parse_ids_list();
        param.push(ids);
        self.expect(VhdlToken::Colon);

        if matches!(
            self.current(),
            VhdlToken::In | VhdlToken::Out | VhdlToken::Inout
        ) {
            let io = self.current_text_lower();
            self.advance();
            param.set_attr("io", io);
        }

        let ty = self.parse_typeid();
        param.push(ty);
        if let Some(value) = self.parse_default_value() {
            param.push(value);
        }
        param
    }

    /// Parses a `for` configuration specification:
    /// `for all|others|label : comp use entity|configuration name …;`.
    fn parse_for_specification(&mut self) -> SyntaxNode {
        let mut decl = self.node_here(Tag::ForDeclaration);
        self.expect(VhdlToken::For);

        let which = match self.current() {
            VhdlToken::Others | VhdlToken::All => {
                let text = self.current_text_lower();
                self.advance();
                text
            }
            _ => self.expect_ident(),
        };
        decl.set_attr("which", which);
        self.expect(VhdlToken::Colon);
        let component = self.expect_ident();
        decl.set_attr("id", component);
        self.expect(VhdlToken::Use);

        if self.eat(VhdlToken::Entity) {
            let name = self.parse_dotted_name();
            decl.set_attr("entity", name);
            if self.eat(VhdlToken::LeftParen) {
                let arch = self.expect_ident();
                decl.set_attr("architecture", arch);
                self.expect(VhdlToken::RightParen);
            }
        } else {
            self.expect(VhdlToken::Configuration);
            let name = self.parse_dotted_name();
            decl.set_attr("configuration", name);
        }

        self.parse_map_aspects(&mut decl);
        self.expect(VhdlToken::Semicolon);
        decl
    }
}

#[cfg(test)]
mod tests {
    use crate::node::Tag;
    use crate::parser::tests::parse_ok;
    use crate::node::SyntaxNode;

    fn arch_decls(body: &str) -> SyntaxNode {
        let source = format!("architecture r of e is {body} begin end r;");
        let tree = parse_ok(&source);
        tree.children[0].child(Tag::Declarations).unwrap().clone()
    }

    fn pkg_decls(body: &str) -> SyntaxNode {
        let source = format!("package p is {body} end package p;");
        let tree = parse_ok(&source);
        tree.children[0].child(Tag::Declarations).unwrap().clone()
    }

    #[test]
    fn signal_declaration_with_ids() {
        let decls = arch_decls("signal x, y, z: bit;");
        let sig = &decls.children[0];
        assert_eq!(sig.tag, Tag::SignalDeclaration);
        let ids: Vec<&str> = sig
            .child(Tag::Ids)
            .unwrap()
            .children_tagged(Tag::Id)
            .filter_map(|n| n.id())
            .collect();
        assert_eq!(ids, ["x", "y", "z"]);
        assert_eq!(sig.child(Tag::Type).unwrap().id(), Some("bit"));
    }

    #[test]
    fn signal_with_default_value() {
        let decls = arch_decls("signal en: bit := '0';");
        let value = decls.children[0].child(Tag::Value).unwrap();
        assert_eq!(value.children[0].id(), Some("'0'"));
    }

    #[test]
    fn constant_declaration() {
        let decls = pkg_decls("constant width: natural := 8;");
        let c = &decls.children[0];
        assert_eq!(c.tag, Tag::ConstantDeclaration);
        assert!(c.child(Tag::Value).is_some());
    }

    #[test]
    fn shared_variable() {
        let decls = arch_decls("shared variable v: natural := 0;");
        let v = &decls.children[0];
        assert_eq!(v.tag, Tag::VariableDeclaration);
        assert_eq!(v.attr("shared"), Some("true"));
    }

    #[test]
    fn plain_variable_is_not_shared() {
        let decls = arch_decls("variable v: natural;");
        assert_eq!(decls.children[0].attr("shared"), Some("false"));
    }

    #[test]
    fn enum_type_declaration() {
        let decls = pkg_decls("type state is (idle, run, halt);");
        let t = &decls.children[0];
        assert_eq!(t.tag, Tag::TypeDeclaration);
        assert_eq!(t.id(), Some("state"));
        let ids = t.child(Tag::Ids).unwrap();
        assert_eq!(ids.children.len(), 3);
    }

    #[test]
    fn range_type_declaration() {
        let decls = pkg_decls("type small is range 0 to 255;");
        let range = decls.children[0].child(Tag::Range).unwrap();
        assert_eq!(range.attr("direction"), Some("to"));
    }

    #[test]
    fn array_type_declaration() {
        let decls = pkg_decls("type word_array is array (0 to 15) of bit_vector(7 downto 0);");
        let array = decls.children[0].child(Tag::Array).unwrap();
        let indices = array.child(Tag::RangesTypes).unwrap();
        assert_eq!(indices.children[0].tag, Tag::Range);
        assert_eq!(array.children[1].id(), Some("bit_vector"));
    }

    #[test]
    fn unconstrained_array_type() {
        let decls = pkg_decls("type mem is array (natural range <>) of bit;");
        let indices = decls.children[0]
            .child(Tag::Array)
            .unwrap()
            .child(Tag::RangesTypes)
            .unwrap();
        let r = &indices.children[0];
        assert_eq!(r.tag, Tag::Range);
        assert_eq!(r.id(), Some("natural"));
        assert!(r.children.is_empty());
    }

    #[test]
    fn record_type_declaration() {
        let decls = pkg_decls(
            "type pixel is record r: byte; g: byte; b: byte; end record;",
        );
        let records = decls.children[0].child(Tag::Records).unwrap();
        assert_eq!(records.children.len(), 3);
        let field = &records.children[0];
        assert_eq!(field.tag, Tag::Record);
        assert!(field.child(Tag::Ids).is_some());
        assert!(field.child(Tag::Type).is_some());
    }

    #[test]
    fn access_and_file_types() {
        let decls = pkg_decls("type ptr is access cell; type log is file of character;");
        assert!(decls.children[0].child(Tag::Access).is_some());
        assert!(decls.children[1].child(Tag::FileOf).is_some());
    }

    #[test]
    fn subtype_with_constraint() {
        let decls = pkg_decls("subtype byte is bit_vector(7 downto 0);");
        let s = &decls.children[0];
        assert_eq!(s.tag, Tag::SubtypeDeclaration);
        assert_eq!(s.child(Tag::Id).unwrap().id(), Some("bit_vector"));
        assert!(s.child(Tag::Ranges).is_some());
    }

    #[test]
    fn subtype_with_range() {
        let decls = pkg_decls("subtype small is integer range 0 to 15;");
        assert!(decls.children[0].child(Tag::Range).is_some());
    }

    #[test]
    fn file_declaration_forms() {
        let decls = arch_decls(
            "file f0: text; \
             file f1: text is in \"input.txt\"; \
             file f2: text is open write_mode is \"out.txt\";",
        );
        assert_eq!(decls.children[0].attr("io"), None);
        assert_eq!(decls.children[1].attr("io"), Some("in"));
        assert_eq!(decls.children[1].attr("name"), Some("\"input.txt\""));
        assert_eq!(decls.children[2].attr("mode"), Some("write_mode"));
        assert_eq!(decls.children[2].attr("name"), Some("\"out.txt\""));
    }

    #[test]
    fn alias_declaration() {
        let decls = arch_decls("alias msb: bit is data(7);");
        let a = &decls.children[0];
        assert_eq!(a.tag, Tag::AliasDeclaration);
        assert_eq!(a.id(), Some("msb"));
        let aliased = a.child(Tag::ObjectExpression).unwrap();
        assert_eq!(aliased.id(), Some("data"));
    }

    #[test]
    fn attribute_declaration_and_spec() {
        let decls = arch_decls(
            "attribute keep: boolean; attribute keep of clk: signal is true;",
        );
        let spec = &decls.children[1];
        assert_eq!(spec.attr("of"), Some("clk"));
        assert_eq!(spec.attr("class"), Some("signal"));
    }

    #[test]
    fn component_declaration() {
        let decls = arch_decls(
            "component counter is generic (width: natural := 8); \
             port (clk: in bit); end component counter;",
        );
        let c = &decls.children[0];
        assert_eq!(c.tag, Tag::ComponentDeclaration);
        assert!(c.child(Tag::Generic).is_some());
        assert!(c.child(Tag::Ports).is_some());
    }

    #[test]
    fn function_declaration_without_body() {
        let decls = pkg_decls("function parity(v: in bit_vector) return bit;");
        let f = &decls.children[0];
        assert_eq!(f.tag, Tag::FunctionDeclaration);
        assert_eq!(f.attr("pure"), Some("true"));
        let params = f.child(Tag::FunctionParameters).unwrap();
        assert_eq!(params.children[0].tag, Tag::IdParameter);
        assert_eq!(params.children[0].attr("io"), Some("in"));
        assert!(f.child(Tag::SequentialStatements).is_none());
    }

    #[test]
    fn impure_function_with_body() {
        let decls = pkg_decls(
            "impure function tick return natural is begin return 1; end tick;",
        );
        let f = &decls.children[0];
        assert_eq!(f.attr("pure"), Some("false"));
        assert!(f.child(Tag::SequentialStatements).is_some());
    }

    #[test]
    fn procedure_with_classed_parameters() {
        let decls = pkg_decls(
            "procedure reset(signal clk: in bit; variable count: inout natural);",
        );
        let p = &decls.children[0];
        assert_eq!(p.tag, Tag::ProcedureDeclaration);
        let params = p.child(Tag::ProcedureParameters).unwrap();
        assert_eq!(params.children[0].tag, Tag::SignalParameter);
        assert_eq!(params.children[1].tag, Tag::VariableParameter);
        assert_eq!(params.children[1].attr("io"), Some("inout"));
    }

    #[test]
    fn for_configuration_specification() {
        let decls = arch_decls("for all: gate use entity work.gate(behav);");
        let f = &decls.children[0];
        assert_eq!(f.tag, Tag::ForDeclaration);
        assert_eq!(f.attr("which"), Some("all"));
        assert_eq!(f.id(), Some("gate"));
        assert_eq!(f.attr("entity"), Some("work.gate"));
        assert_eq!(f.attr("architecture"), Some("behav"));
    }

    #[test]
    fn bad_declaration_recovers_to_next() {
        let source = "architecture r of e is bogus stuff here; signal ok: bit; begin end r;";
        let (tree, diags) = crate::parser::tests::parse_vhdl(source);
        assert!(!diags.is_empty());
        let decls = tree.children[0].child(Tag::Declarations).unwrap();
        assert!(decls
            .children
            .iter()
            .any(|d| d.tag == Tag::SignalDeclaration));
    }
}
