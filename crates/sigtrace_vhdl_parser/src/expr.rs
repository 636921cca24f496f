//! Expression parsing for VHDL-93.
//!
//! The precedence ladder, lowest binding first:
//!
//! 1. logical (`and nand or nor xor xnor`)
//! 2. relational (`= /= < <= > >=`)
//! 3. shift (`sll srl sla sra rol ror`)
//! 4. adding (`+ - &`)
//! 5. multiplying (`* / mod rem`)
//! 6. exponential (`**`)
//! 7. prefix (`+ - not abs`), whose operand is a primary
//!
//! Every binary level is left-associative, `**` included. Each level that
//! actually combines two operands produces its tagged node with an `op`
//! attribute holding the operator lexeme; single operands pass through
//! untouched, so `a` parses to a bare `objectExpression` with no wrapper
//! chain.
//!
//! Names are the context-sensitive corner of the grammar: `p(i)` may be a
//! call or an index, so both parse to `objectExpression` with a
//! `parameters` child and the question stays open. Parenthesized single
//! expressions are transparent (no node); anything with commas, `|`,
//! ranges, or `=>` inside parentheses becomes an `aggregateExpression`.

use crate::node::{SyntaxNode, Tag};
use crate::parser::VhdlParser;
use crate::token::VhdlToken;

impl VhdlParser<'_> {
    /// Parses a full expression (logical level).
    pub(crate) fn parse_expr(&mut self) -> SyntaxNode {
        let mut lhs = self.parse_relational();
        while matches!(
            self.current(),
            VhdlToken::And
                | VhdlToken::Nand
                | VhdlToken::Or
                | VhdlToken::Nor
                | VhdlToken::Xor
                | VhdlToken::Xnor
        ) {
            lhs = self.binary_rhs(Tag::LogicalExpression, lhs, Self::parse_relational);
        }
        lhs
    }

    fn parse_relational(&mut self) -> SyntaxNode {
        let mut lhs = self.parse_shift();
        while matches!(
            self.current(),
            VhdlToken::Equals
                | VhdlToken::SlashEquals
                | VhdlToken::LessThan
                | VhdlToken::LessEquals
                | VhdlToken::GreaterThan
                | VhdlToken::GreaterEquals
        ) {
            lhs = self.binary_rhs(Tag::RelationalExpression, lhs, Self::parse_shift);
        }
        lhs
    }

    fn parse_shift(&mut self) -> SyntaxNode {
        let mut lhs = self.parse_adding();
        while matches!(
            self.current(),
            VhdlToken::Sll
                | VhdlToken::Srl
                | VhdlToken::Sla
                | VhdlToken::Sra
                | VhdlToken::Rol
                | VhdlToken::Ror
        ) {
            lhs = self.binary_rhs(Tag::ShiftExpression, lhs, Self::parse_adding);
        }
        lhs
    }

    fn parse_adding(&mut self) -> SyntaxNode {
        let mut lhs = self.parse_multiplying();
        while matches!(
            self.current(),
            VhdlToken::Plus | VhdlToken::Minus | VhdlToken::Ampersand
        ) {
            lhs = self.binary_rhs(Tag::AddingExpression, lhs, Self::parse_multiplying);
        }
        lhs
    }

    fn parse_multiplying(&mut self) -> SyntaxNode {
        let mut lhs = self.parse_exponential();
        while matches!(
            self.current(),
            VhdlToken::Star | VhdlToken::Slash | VhdlToken::Mod | VhdlToken::Rem
        ) {
            lhs = self.binary_rhs(Tag::MultiplyingExpression, lhs, Self::parse_exponential);
        }
        lhs
    }

    fn parse_exponential(&mut self) -> SyntaxNode {
        let mut lhs = self.parse_factor();
        while self.at(VhdlToken::DoubleStar) {
            lhs = self.binary_rhs(Tag::ExponentialExpression, lhs, Self::parse_factor);
        }
        lhs
    }

    /// Consumes the current operator token and the right operand, wrapping
    /// both sides in a binary node carrying the operator lexeme.
    fn binary_rhs(
        &mut self,
        tag: Tag,
        lhs: SyntaxNode,
        rhs: fn(&mut Self) -> SyntaxNode,
    ) -> SyntaxNode {
        let op = self.current_text_lower();
        self.advance();
        let right = rhs(self);
        SyntaxNode::new(tag)
            .with_attr("op", op)
            .with_child(lhs)
            .with_child(right)
    }

    fn parse_factor(&mut self) -> SyntaxNode {
        if matches!(
            self.current(),
            VhdlToken::Plus | VhdlToken::Minus | VhdlToken::Not | VhdlToken::Abs
        ) {
            let op = self.current_text_lower();
            self.advance();
            let operand = self.parse_primary();
            return SyntaxNode::new(Tag::PrefixExpression)
                .with_attr("op", op)
                .with_child(operand);
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> SyntaxNode {
        match self.current() {
            VhdlToken::Literal => {
                let line = self.current_line();
                let text = self.current_text().to_string();
                self.advance();
                // A unit name directly after a numeric literal makes a
                // physical literal: `10 ns`, `50 ps`.
                if self.at(VhdlToken::Identifier) {
                    let unit = self.expect_ident();
                    let mut time = SyntaxNode::new(Tag::TimeExpression)
                        .with_attr("value", text)
                        .with_attr("id", unit);
                    time.set_line(line);
                    return time;
                }
                let mut lit = SyntaxNode::new(Tag::ConstantExpression).with_attr("id", text);
                lit.set_line(line);
                lit
            }
            VhdlToken::StringLiteral => {
                let mut lit = SyntaxNode::new(Tag::ConstantExpression)
                    .with_attr("id", self.current_text().to_string());
                lit.set_line(self.current_line());
                self.advance();
                lit
            }
            VhdlToken::New => {
                let mut alloc = self.node_here(Tag::NewExpression);
                self.advance();
                let name = self.expect_ident();
                alloc.set_attr("id", name);
                // Qualified allocator: new t'(expr)
                if self.at(VhdlToken::Tick) && self.peek_is(VhdlToken::LeftParen) {
                    self.advance();
                    self.expect(VhdlToken::LeftParen);
                    let expr = self.parse_expr();
                    self.expect(VhdlToken::RightParen);
                    alloc.push(SyntaxNode::new(Tag::Attribute).with_child(expr));
                }
                alloc
            }
            VhdlToken::LeftParen => self.parse_paren_or_aggregate(),
            VhdlToken::Identifier => self.parse_name(),
            _ => {
                self.syntax_error();
                let mut err = SyntaxNode::new(Tag::ConstantExpression).with_attr("id", "<error>");
                err.set_line(self.current_line());
                self.advance();
                err
            }
        }
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// Parses a name: an object with optional index/call suffixes, dotted
    /// selections (folded into `recordExpression`), and one trailing
    /// attribute selection.
    pub(crate) fn parse_name(&mut self) -> SyntaxNode {
        let mut node = self.parse_id_item();

        while self.at(VhdlToken::Dot) {
            self.advance();
            let suffix = match self.current() {
                VhdlToken::Identifier => self.parse_id_item(),
                VhdlToken::StringLiteral => {
                    let mut s = self.node_here(Tag::Suffix);
                    s.set_attr("id", self.current_text().to_string());
                    self.advance();
                    s
                }
                VhdlToken::All => {
                    let mut s = self.node_here(Tag::Suffix);
                    s.set_attr("id", "all");
                    self.advance();
                    s
                }
                _ => {
                    self.syntax_error();
                    break;
                }
            };
            if node.tag == Tag::RecordExpression {
                node.push(suffix);
            } else {
                node = SyntaxNode::new(Tag::RecordExpression)
                    .with_child(node)
                    .with_child(suffix);
            }
        }

        // Attribute selection: name'attr or name'attr(expr). The lexer has
        // already decided this tick is not a character literal.
        if self.at(VhdlToken::Tick) && self.peek_is(VhdlToken::Identifier) {
            self.advance();
            let mut attr = self.node_here(Tag::Attribute);
            let name = self.expect_ident();
            attr.set_attr("id", name);
            if self.eat(VhdlToken::LeftParen) {
                let arg = self.parse_expr();
                self.expect(VhdlToken::RightParen);
                attr.push(arg);
            }
            node.push(attr);
        }

        node
    }

    /// Parses `ID { ( … ) }` into an `objectExpression` with one
    /// `parameters` or `range` child per parenthesized suffix. Whether a
    /// suffix is a call or an index is not decidable here and is left open.
    pub(crate) fn parse_id_item(&mut self) -> SyntaxNode {
        let line = self.current_line();
        let name = self.expect_ident();
        let mut obj = SyntaxNode::new(Tag::ObjectExpression).with_attr("id", name);
        obj.set_line(line);

        while self.eat(VhdlToken::LeftParen) {
            let suffix = self.parse_paren_suffix();
            obj.push(suffix);
        }
        obj
    }

    /// Parses the inside of an `id_item` parenthesis (the `(` is already
    /// consumed): a range, an unconstrained `ID range <>`, or a parameter
    /// list. Consumes the closing `)`.
    fn parse_paren_suffix(&mut self) -> SyntaxNode {
        if self.at(VhdlToken::Identifier) && self.peek_is(VhdlToken::Range) {
            let range = self.parse_named_range();
            self.expect(VhdlToken::RightParen);
            return range;
        }

        let first = self.parse_expr();

        if matches!(self.current(), VhdlToken::To | VhdlToken::Downto) {
            let range = self.finish_range(first);
            self.expect(VhdlToken::RightParen);
            return range;
        }

        let mut params = SyntaxNode::new(Tag::Parameters);
        params.push(self.finish_association(first));
        while self.eat(VhdlToken::Comma) {
            let first = self.parse_expr();
            let item = self.finish_association(first);
            params.push(item);
        }
        self.expect(VhdlToken::RightParen);
        params
    }

    /// Completes a parameter item: a bare expression, or a named
    /// association `formal => actual` folded into a `connect` node.
    fn finish_association(&mut self, first: SyntaxNode) -> SyntaxNode {
        if !self.eat(VhdlToken::Arrow) {
            return first;
        }
        let simple_id = if first.tag == Tag::ObjectExpression && first.children.is_empty() {
            first.id().map(String::from)
        } else {
            None
        };
        let formal = match simple_id {
            Some(id) => SyntaxNode::new(Tag::Id).with_attr("id", id),
            None => first,
        };
        let actual = self.parse_expr();
        SyntaxNode::new(Tag::Connect)
            .with_child(formal)
            .with_child(actual)
    }

    // ========================================================================
    // Ranges
    // ========================================================================

    /// Parses `expr to|downto expr` into a `range` node with a `direction`
    /// attribute and the two bound expressions as children.
    pub(crate) fn parse_range(&mut self) -> SyntaxNode {
        let left = self.parse_expr();
        self.finish_range(left)
    }

    /// Completes a range whose left bound is already parsed.
    fn finish_range(&mut self, left: SyntaxNode) -> SyntaxNode {
        let direction = if self.eat(VhdlToken::To) {
            "to"
        } else if self.eat(VhdlToken::Downto) {
            "downto"
        } else {
            self.syntax_error();
            "to"
        };
        let right = self.parse_expr();
        SyntaxNode::new(Tag::Range)
            .with_attr("direction", direction)
            .with_child(left)
            .with_child(right)
    }

    /// Parses `ID range <>` (unconstrained) or `ID range expr dir expr`
    /// into a `range` node carrying the type name as `id`.
    fn parse_named_range(&mut self) -> SyntaxNode {
        let name = self.expect_ident();
        self.expect(VhdlToken::Range);
        if self.eat(VhdlToken::Box) {
            return SyntaxNode::new(Tag::Range).with_attr("id", name);
        }
        let mut range = self.parse_range();
        range.set_attr("id", name);
        range
    }

    /// Parses a discrete range in array/type contexts: an explicit range,
    /// an unconstrained `ID range <>`, or a bare type mark.
    pub(crate) fn parse_discrete_range(&mut self) -> SyntaxNode {
        if self.at(VhdlToken::Identifier) && self.peek_is(VhdlToken::Range) {
            return self.parse_named_range();
        }
        let first = self.parse_expr();
        if matches!(self.current(), VhdlToken::To | VhdlToken::Downto) {
            return self.finish_range(first);
        }
        // A bare name used as a range is a type mark.
        let mut ty = first;
        if ty.tag == Tag::ObjectExpression {
            ty.tag = Tag::Type;
        }
        ty
    }

    // ========================================================================
    // Aggregates and choices
    // ========================================================================

    /// Parses `( … )` in expression position: transparent for a single
    /// inner expression, an `aggregateExpression` otherwise.
    fn parse_paren_or_aggregate(&mut self) -> SyntaxNode {
        self.expect(VhdlToken::LeftParen);

        if self.at(VhdlToken::Others) {
            let first = self.parse_choice_association();
            return self.finish_aggregate(first);
        }

        let first = self.parse_expr();
        match self.current() {
            VhdlToken::RightParen => {
                self.advance();
                first
            }
            VhdlToken::Arrow
            | VhdlToken::Bar
            | VhdlToken::To
            | VhdlToken::Downto => {
                let item = self.finish_choice_association(first);
                self.finish_aggregate(item)
            }
            VhdlToken::Comma => self.finish_aggregate(first),
            _ => {
                self.syntax_error();
                self.expect(VhdlToken::RightParen);
                first
            }
        }
    }

    /// Collects the remaining comma-separated aggregate elements after the
    /// first, consuming the closing `)`.
    fn finish_aggregate(&mut self, first: SyntaxNode) -> SyntaxNode {
        let mut agg = SyntaxNode::new(Tag::AggregateExpression).with_child(first);
        while self.eat(VhdlToken::Comma) {
            let element = self.parse_aggregate_element();
            agg.push(element);
        }
        self.expect(VhdlToken::RightParen);
        agg
    }

    fn parse_aggregate_element(&mut self) -> SyntaxNode {
        if self.at(VhdlToken::Others) {
            return self.parse_choice_association();
        }
        let first = self.parse_expr();
        if matches!(
            self.current(),
            VhdlToken::Arrow | VhdlToken::Bar | VhdlToken::To | VhdlToken::Downto
        ) {
            return self.finish_choice_association(first);
        }
        first
    }

    /// Parses `choices => value` starting at the first choice.
    fn parse_choice_association(&mut self) -> SyntaxNode {
        let first = self.parse_choice();
        self.finish_choices_then_value(first)
    }

    /// Parses `choices => value` where the first choice expression is
    /// already parsed (and may still grow into a range).
    fn finish_choice_association(&mut self, first: SyntaxNode) -> SyntaxNode {
        let first = if matches!(self.current(), VhdlToken::To | VhdlToken::Downto) {
            self.finish_range(first)
        } else {
            first
        };
        self.finish_choices_then_value(first)
    }

    fn finish_choices_then_value(&mut self, first: SyntaxNode) -> SyntaxNode {
        let mut choices = SyntaxNode::new(Tag::Choices).with_child(first);
        while self.eat(VhdlToken::Bar) {
            let choice = self.parse_choice();
            choices.push(choice);
        }
        self.expect(VhdlToken::Arrow);
        let value = self.parse_expr();
        SyntaxNode::new(Tag::Connect)
            .with_child(choices)
            .with_child(value)
    }

    /// Parses one choice: `others`, a range, or an expression.
    pub(crate) fn parse_choice(&mut self) -> SyntaxNode {
        if self.at(VhdlToken::Others) {
            self.advance();
            return SyntaxNode::new(Tag::Others);
        }
        let expr = self.parse_expr();
        if matches!(self.current(), VhdlToken::To | VhdlToken::Downto) {
            return self.finish_range(expr);
        }
        expr
    }

    /// Parses a `when`-clause choice list: `choice {| choice}` into a
    /// `choices` node.
    pub(crate) fn parse_choice_list(&mut self) -> SyntaxNode {
        let first = self.parse_choice();
        let mut choices = SyntaxNode::new(Tag::Choices).with_child(first);
        while self.eat(VhdlToken::Bar) {
            let choice = self.parse_choice();
            choices.push(choice);
        }
        choices
    }

    /// Parses an assignment target: a name, or an aggregate (which keeps
    /// its `aggregateExpression` wrapper even for one element).
    pub(crate) fn parse_target(&mut self) -> SyntaxNode {
        if !self.at(VhdlToken::LeftParen) {
            return self.parse_name();
        }
        self.expect(VhdlToken::LeftParen);
        let mut agg = SyntaxNode::new(Tag::AggregateExpression);
        loop {
            let element = self.parse_aggregate_element();
            agg.push(element);
            if !self.eat(VhdlToken::Comma) {
                break;
            }
        }
        self.expect(VhdlToken::RightParen);
        agg
    }
}
