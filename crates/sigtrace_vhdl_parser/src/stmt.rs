//! Concurrent and sequential statement parsing for VHDL-93.
//!
//! The grammar's worst ambiguity lives here: a statement starting with
//! `label : name` can be a component instantiation, a concurrent procedure
//! call, or a labeled signal assignment. The contract is positional — a
//! trailing generic/port map makes it an instantiation, a following `<=`
//! makes it an assignment, anything else is a procedure call.

use crate::node::{SyntaxNode, Tag};
use crate::parser::VhdlParser;
use crate::token::VhdlToken;

impl VhdlParser<'_> {
    // ========================================================================
    // Concurrent statements
    // ========================================================================

    /// Parses concurrent statements into a `parallelStatements` node until
    /// `end` or EOF.
    pub(crate) fn parse_parallel_statements(&mut self) -> SyntaxNode {
        let mut stmts = SyntaxNode::new(Tag::ParallelStatements);
        loop {
            match self.current() {
                VhdlToken::End | VhdlToken::Eof => break,
                _ => {
                    if let Some(stmt) = self.parse_parallel_statement() {
                        stmts.push(stmt);
                    }
                }
            }
        }
        stmts
    }

    fn parse_parallel_statement(&mut self) -> Option<SyntaxNode> {
        match self.current() {
            VhdlToken::Process => Some(self.parse_process(None, false)),
            VhdlToken::Assert => Some(self.parse_concurrent_assert(None, false)),
            VhdlToken::With => Some(self.parse_selected_assign(None, false)),
            VhdlToken::Postponed => {
                self.advance();
                match self.current() {
                    VhdlToken::Process => Some(self.parse_process(None, true)),
                    VhdlToken::Assert => Some(self.parse_concurrent_assert(None, true)),
                    VhdlToken::With => Some(self.parse_selected_assign(None, true)),
                    _ => self.parse_assign_or_call(None, true),
                }
            }
            VhdlToken::Identifier => self.parse_labeled_or_assign(),
            VhdlToken::LeftParen => self.parse_assign_or_call(None, false),
            _ => {
                self.syntax_error();
                self.recover_to_semicolon();
                None
            }
        }
    }

    /// Disambiguates a statement starting with an identifier: a label
    /// introduces the labeled forms; otherwise the identifier begins an
    /// assignment target or procedure call and the parser backtracks one
    /// token.
    fn parse_labeled_or_assign(&mut self) -> Option<SyntaxNode> {
        let mark = self.mark();
        let label = self.expect_ident();

        if !self.eat(VhdlToken::Colon) {
            self.rewind(mark);
            return self.parse_assign_or_call(None, false);
        }

        match self.current() {
            VhdlToken::Process => Some(self.parse_process(Some(label), false)),
            VhdlToken::Block => Some(self.parse_block(label)),
            VhdlToken::If => Some(self.parse_if_generate(label)),
            VhdlToken::For => Some(self.parse_for_generate(label)),
            VhdlToken::Assert => Some(self.parse_concurrent_assert(Some(label), false)),
            VhdlToken::With => Some(self.parse_selected_assign(Some(label), false)),
            VhdlToken::Entity => Some(self.parse_entity_instantiation(label)),
            VhdlToken::Configuration => Some(self.parse_configuration_instantiation(label)),
            VhdlToken::Postponed => {
                self.advance();
                match self.current() {
                    VhdlToken::Process => Some(self.parse_process(Some(label), true)),
                    VhdlToken::Assert => Some(self.parse_concurrent_assert(Some(label), true)),
                    VhdlToken::With => Some(self.parse_selected_assign(Some(label), true)),
                    _ => self.parse_assign_or_call(Some(label), true),
                }
            }
            VhdlToken::Identifier | VhdlToken::LeftParen => {
                self.parse_assign_or_call(Some(label), false)
            }
            _ => {
                self.syntax_error();
                self.recover_to_semicolon();
                None
            }
        }
    }

    /// Parses the `name …` remainder of a concurrent statement: a
    /// component instantiation when a map aspect follows, a signal
    /// assignment on `<=`, a procedure call otherwise.
    fn parse_assign_or_call(
        &mut self,
        label: Option<String>,
        postponed: bool,
    ) -> Option<SyntaxNode> {
        let target = self.parse_target();

        if self.at(VhdlToken::Generic) || self.at(VhdlToken::Port) {
            // Instantiation: `label : comp generic/port map (…)`.
            let mut inst = SyntaxNode::new(Tag::ComponentParallelStatement);
            if let Some(label) = label {
                inst.set_attr("label", label);
            } else {
                self.syntax_error();
            }
            if let Some(id) = target.id() {
                inst.set_attr("id", id.to_string());
            }
            if let Some(line) = target.first_line() {
                inst.set_attr("line", line.to_string());
            }
            self.parse_map_aspects(&mut inst);
            self.expect(VhdlToken::Semicolon);
            return Some(inst);
        }

        if self.at(VhdlToken::LessEquals) {
            return Some(self.parse_concurrent_assign(label, postponed, target));
        }

        // Concurrent procedure call: retag the parsed name.
        let mut call = target;
        call.tag = Tag::ProcedureParallelStatement;
        if let Some(label) = label {
            call.set_attr("label", label);
        }
        call.set_attr("postponed", if postponed { "true" } else { "false" });
        self.expect(VhdlToken::Semicolon);
        Some(call)
    }

    /// Parses `<= [guarded] [delay] value {when cond else value};` with the
    /// target already in hand.
    fn parse_concurrent_assign(
        &mut self,
        label: Option<String>,
        postponed: bool,
        target: SyntaxNode,
    ) -> SyntaxNode {
        self.expect(VhdlToken::LessEquals);

        let guarded = self.eat(VhdlToken::Guarded);
        let (delay, reject) = self.parse_delay_mechanism();

        let mut assign = SyntaxNode::new(Tag::AssignParallelStatement);
        if let Some(label) = label {
            assign.set_attr("label", label);
        }
        assign.set_attr("postponed", if postponed { "true" } else { "false" });
        assign.set_attr("guarded", if guarded { "true" } else { "false" });
        if let Some(delay) = delay {
            assign.set_attr("delay", delay);
        }
        if let Some(line) = target.first_line() {
            assign.set_attr("line", line.to_string());
        }

        assign.push(target);
        if let Some(reject) = reject {
            assign.push(reject);
        }

        // Conditional waveform chain: each guarded arm records its
        // condition as a `when` child inside its own signalValue.
        loop {
            let mut arm = self.parse_signal_value();
            if self.eat(VhdlToken::When) {
                let cond = self.parse_expr();
                arm.push(SyntaxNode::new(Tag::When).with_child(cond));
                assign.push(arm);
                self.expect(VhdlToken::Else);
            } else {
                assign.push(arm);
                break;
            }
        }

        self.expect(VhdlToken::Semicolon);
        assign
    }

    /// Parses one waveform into a `signalValue` node: `unaffected` or a
    /// comma-separated list of `expr [after time]` elements.
    fn parse_signal_value(&mut self) -> SyntaxNode {
        let mut value = SyntaxNode::new(Tag::SignalValue);

        if self.eat(VhdlToken::Unaffected) {
            value.push(SyntaxNode::new(Tag::Unaffected));
            return value;
        }

        let mut exprs = SyntaxNode::new(Tag::Expressions);
        loop {
            let element = if self.at(VhdlToken::Null) {
                let null = self.node_here(Tag::Null);
                self.advance();
                null
            } else {
                self.parse_expr()
            };
            let element = if self.at(VhdlToken::After) {
                let line = self.current_line();
                self.advance();
                let time = self.parse_expr();
                let mut after = SyntaxNode::new(Tag::AfterExpression)
                    .with_child(element)
                    .with_child(time);
                after.set_line(line);
                after
            } else {
                element
            };
            exprs.push(element);
            if !self.eat(VhdlToken::Comma) {
                break;
            }
        }
        value.push(exprs);
        value
    }

    /// Parses an optional delay mechanism: `transport`, `inertial`, or
    /// `reject time inertial`. Returns the `delay` attribute value and the
    /// `reject` node if present.
    fn parse_delay_mechanism(&mut self) -> (Option<&'static str>, Option<SyntaxNode>) {
        if self.eat(VhdlToken::Transport) {
            return (Some("transport"), None);
        }
        if self.eat(VhdlToken::Inertial) {
            return (Some("inertial"), None);
        }
        if self.eat(VhdlToken::Reject) {
            let time = self.parse_expr();
            self.expect(VhdlToken::Inertial);
            let reject = SyntaxNode::new(Tag::Reject).with_child(time);
            return (Some("inertial"), Some(reject));
        }
        (None, None)
    }

    fn parse_process(&mut self, label: Option<String>, postponed: bool) -> SyntaxNode {
        let mut process = self.node_here(Tag::ProcessParallelStatement);
        if let Some(label) = label {
            process.set_attr("label", label);
        }
        process.set_attr("postponed", if postponed { "true" } else { "false" });
        self.expect(VhdlToken::Process);

        if self.eat(VhdlToken::LeftParen) {
            let sens = self.parse_sensitivity_list();
            process.push(sens);
            self.expect(VhdlToken::RightParen);
        }
        self.eat(VhdlToken::Is);

        let decls = self.parse_declarations();
        if !decls.children.is_empty() {
            process.push(decls);
        }

        self.expect(VhdlToken::Begin);
        let stmts = self.parse_sequential_statements();
        process.push(stmts);

        self.expect(VhdlToken::End);
        self.eat(VhdlToken::Postponed);
        self.expect(VhdlToken::Process);
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        process
    }

    /// Parses the inside of a sensitivity list: normally a comma-separated
    /// signal list (a `parameters` node), occasionally a range.
    fn parse_sensitivity_list(&mut self) -> SyntaxNode {
        let first = self.parse_expr();
        if matches!(self.current(), VhdlToken::To | VhdlToken::Downto) {
            let direction = self.current_text_lower();
            self.advance();
            let right = self.parse_expr();
            return SyntaxNode::new(Tag::Range)
                .with_attr("direction", direction)
                .with_child(first)
                .with_child(right);
        }
        let mut params = SyntaxNode::new(Tag::Parameters).with_child(first);
        while self.eat(VhdlToken::Comma) {
            let signal = self.parse_expr();
            params.push(signal);
        }
        params
    }

    fn parse_block(&mut self, label: String) -> SyntaxNode {
        let mut block = self.node_here(Tag::BlockParallelStatement);
        block.set_attr("label", label);
        self.expect(VhdlToken::Block);
        self.eat(VhdlToken::Is);

        if self.at(VhdlToken::Generic) {
            let mut generic = self.parse_generic_clause();
            if self.at(VhdlToken::Generic) && self.peek_is(VhdlToken::Map) {
                self.advance();
                self.expect(VhdlToken::Map);
                let map = self.parse_map_list(Tag::GenericMap);
                self.expect(VhdlToken::Semicolon);
                generic.push(map);
            }
            block.push(generic);
        }
        if self.at(VhdlToken::Port) {
            let mut ports = self.parse_port_clause();
            if self.at(VhdlToken::Port) && self.peek_is(VhdlToken::Map) {
                self.advance();
                self.expect(VhdlToken::Map);
                let map = self.parse_map_list(Tag::PortMap);
                self.expect(VhdlToken::Semicolon);
                ports.push(map);
            }
            block.push(ports);
        }

        let decls = self.parse_declarations();
        if !decls.children.is_empty() {
            block.push(decls);
        }

        self.expect(VhdlToken::Begin);
        let stmts = self.parse_parallel_statements();
        block.push(stmts);

        self.expect(VhdlToken::End);
        self.expect(VhdlToken::Block);
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        block
    }

    fn parse_if_generate(&mut self, label: String) -> SyntaxNode {
        let mut gen = self.node_here(Tag::IfParallelStatement);
        gen.set_attr("label", label);
        self.expect(VhdlToken::If);
        let condition = self.parse_expr();
        gen.push(condition);
        self.expect(VhdlToken::Generate);

        let stmts = self.parse_parallel_statements();
        gen.push(SyntaxNode::new(Tag::Generate).with_child(stmts));

        self.expect(VhdlToken::End);
        self.expect(VhdlToken::Generate);
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        gen
    }

    fn parse_for_generate(&mut self, label: String) -> SyntaxNode {
        let mut gen = self.node_here(Tag::ForParallelStatement);
        gen.set_attr("label", label);
        self.expect(VhdlToken::For);
        let var = self.expect_ident();
        gen.set_attr("id", var);
        self.expect(VhdlToken::In);
        let range = self.parse_range();
        gen.push(range);
        self.expect(VhdlToken::Generate);

        let stmts = self.parse_parallel_statements();
        gen.push(SyntaxNode::new(Tag::Generate).with_child(stmts));

        self.expect(VhdlToken::End);
        self.expect(VhdlToken::Generate);
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        gen
    }

    fn parse_concurrent_assert(&mut self, label: Option<String>, postponed: bool) -> SyntaxNode {
        let mut assert = self.node_here(Tag::AssertParallelStatement);
        if let Some(label) = label {
            assert.set_attr("label", label);
        }
        assert.set_attr("postponed", if postponed { "true" } else { "false" });
        self.expect(VhdlToken::Assert);
        let condition = self.parse_expr();
        assert.push(condition);

        if self.eat(VhdlToken::Report) {
            if self.at(VhdlToken::StringLiteral) {
                assert.set_attr("report", self.current_text().to_string());
                self.advance();
            } else {
                self.syntax_error();
            }
        }
        if let Some(severity) = self.parse_severity() {
            assert.set_attr("severity", severity);
        }

        self.expect(VhdlToken::Semicolon);
        assert
    }

    /// Parses `severity note|warning|error|failure` if present.
    fn parse_severity(&mut self) -> Option<String> {
        if !self.eat(VhdlToken::Severity) {
            return None;
        }
        match self.current() {
            VhdlToken::Note | VhdlToken::Warning | VhdlToken::ErrorKw | VhdlToken::Failure => {
                let text = self.current_text_lower();
                self.advance();
                Some(text)
            }
            _ => {
                self.syntax_error();
                None
            }
        }
    }

    /// Parses `with expr select target <= [options] value when choices
    /// {, value when choices};`.
    fn parse_selected_assign(&mut self, label: Option<String>, postponed: bool) -> SyntaxNode {
        let mut select = self.node_here(Tag::SelectParallelStatement);
        if let Some(label) = label {
            select.set_attr("label", label);
        }
        select.set_attr("postponed", if postponed { "true" } else { "false" });

        self.expect(VhdlToken::With);
        let selector = self.parse_expr();
        self.expect(VhdlToken::Select);
        let target = self.parse_target();
        self.expect(VhdlToken::LessEquals);

        let guarded = self.eat(VhdlToken::Guarded);
        select.set_attr("guarded", if guarded { "true" } else { "false" });
        let (delay, reject) = self.parse_delay_mechanism();
        if let Some(delay) = delay {
            select.set_attr("delay", delay);
        }

        select.push(selector);
        select.push(target);
        if let Some(reject) = reject {
            select.push(reject);
        }

        loop {
            let mut arm = self.parse_signal_value();
            self.expect(VhdlToken::When);
            let choices = self.parse_choice_list();
            arm.push(SyntaxNode::new(Tag::When).with_child(choices));
            select.push(arm);
            if !self.eat(VhdlToken::Comma) {
                break;
            }
        }

        self.expect(VhdlToken::Semicolon);
        select
    }

    fn parse_entity_instantiation(&mut self, label: String) -> SyntaxNode {
        let mut inst = self.node_here(Tag::EntityParallelStatement);
        inst.set_attr("label", label);
        self.expect(VhdlToken::Entity);
        let name = self.parse_dotted_name();
        inst.set_attr("id", name);
        if self.eat(VhdlToken::LeftParen) {
            let arch = self.expect_ident();
            inst.set_attr("architecture", arch);
            self.expect(VhdlToken::RightParen);
        }
        self.parse_map_aspects(&mut inst);
        self.expect(VhdlToken::Semicolon);
        inst
    }

    fn parse_configuration_instantiation(&mut self, label: String) -> SyntaxNode {
        let mut inst = self.node_here(Tag::ConfigurationParallelStatement);
        inst.set_attr("label", label);
        self.expect(VhdlToken::Configuration);
        let name = self.parse_dotted_name();
        inst.set_attr("id", name);
        self.parse_map_aspects(&mut inst);
        self.expect(VhdlToken::Semicolon);
        inst
    }

    // ========================================================================
    // Sequential statements
    // ========================================================================

    /// Parses sequential statements into a `sequentialStatements` node
    /// until `end`, `elsif`, `else`, `when`, or EOF.
    pub(crate) fn parse_sequential_statements(&mut self) -> SyntaxNode {
        let mut stmts = SyntaxNode::new(Tag::SequentialStatements);
        loop {
            match self.current() {
                VhdlToken::End
                | VhdlToken::Elsif
                | VhdlToken::Else
                | VhdlToken::When
                | VhdlToken::Eof => break,
                _ => {
                    if let Some(stmt) = self.parse_sequential_statement() {
                        stmts.push(stmt);
                    }
                }
            }
        }
        stmts
    }

    fn parse_sequential_statement(&mut self) -> Option<SyntaxNode> {
        match self.current() {
            VhdlToken::Wait => Some(self.parse_wait()),
            VhdlToken::Assert => Some(self.parse_sequential_assert()),
            VhdlToken::Report => Some(self.parse_report()),
            VhdlToken::If => Some(self.parse_if_sequential(None)),
            VhdlToken::Case => Some(self.parse_case(None)),
            VhdlToken::While | VhdlToken::Loop => Some(self.parse_while(None)),
            VhdlToken::For => Some(self.parse_for_sequential(None)),
            VhdlToken::Next => Some(self.parse_next_or_exit(Tag::NextSequentialStatement)),
            VhdlToken::Exit => Some(self.parse_next_or_exit(Tag::ExitSequentialStatement)),
            VhdlToken::Return => Some(self.parse_return()),
            VhdlToken::Null => Some(self.parse_null()),
            VhdlToken::LeftParen => self.parse_sequential_assign_or_call(),
            VhdlToken::Identifier => {
                let mark = self.mark();
                let label = self.expect_ident();
                if self.eat(VhdlToken::Colon) {
                    match self.current() {
                        VhdlToken::If => Some(self.parse_if_sequential(Some(label))),
                        VhdlToken::Case => Some(self.parse_case(Some(label))),
                        VhdlToken::While | VhdlToken::Loop => Some(self.parse_while(Some(label))),
                        VhdlToken::For => Some(self.parse_for_sequential(Some(label))),
                        _ => {
                            self.syntax_error();
                            self.recover_to_semicolon();
                            None
                        }
                    }
                } else {
                    self.rewind(mark);
                    self.parse_sequential_assign_or_call()
                }
            }
            _ => {
                self.syntax_error();
                self.recover_to_semicolon();
                None
            }
        }
    }

    /// Parses an assignment (`<=` or `:=`) or a procedure call, the three
    /// sequential statements that start with a name.
    fn parse_sequential_assign_or_call(&mut self) -> Option<SyntaxNode> {
        let target = self.parse_target();

        match self.current() {
            VhdlToken::LessEquals => {
                self.advance();
                let (delay, reject) = self.parse_delay_mechanism();
                let mut assign = SyntaxNode::new(Tag::SignalAssignSequentialStatement);
                if let Some(delay) = delay {
                    assign.set_attr("delay", delay);
                }
                if let Some(line) = target.first_line() {
                    assign.set_attr("line", line.to_string());
                }
                assign.push(target);
                if let Some(reject) = reject {
                    assign.push(reject);
                }
                let value = self.parse_signal_value();
                assign.push(value);
                self.expect(VhdlToken::Semicolon);
                Some(assign)
            }
            VhdlToken::ColonEquals => {
                self.advance();
                let mut assign = SyntaxNode::new(Tag::VariableAssignSequentialStatement);
                if let Some(line) = target.first_line() {
                    assign.set_attr("line", line.to_string());
                }
                assign.push(target);
                let value = self.parse_expr();
                assign.push(value);
                self.expect(VhdlToken::Semicolon);
                Some(assign)
            }
            _ => {
                let mut call = target;
                call.tag = Tag::ProcedureSequentialStatement;
                self.expect(VhdlToken::Semicolon);
                Some(call)
            }
        }
    }

    fn parse_wait(&mut self) -> SyntaxNode {
        let mut wait = self.node_here(Tag::WaitSequentialStatement);
        self.expect(VhdlToken::Wait);

        if self.eat(VhdlToken::On) {
            let ids = self.parse_ids_list();
            wait.push(SyntaxNode::new(Tag::On).with_child(ids));
        }
        if self.eat(VhdlToken::Until) {
            let condition = self.parse_expr();
            wait.push(SyntaxNode::new(Tag::Until).with_child(condition));
        }
        if self.eat(VhdlToken::For) {
            let duration = self.parse_expr();
            wait.push(SyntaxNode::new(Tag::For).with_child(duration));
        }

        self.expect(VhdlToken::Semicolon);
        wait
    }

    fn parse_sequential_assert(&mut self) -> SyntaxNode {
        let mut assert = self.node_here(Tag::AssertSequentialStatement);
        self.expect(VhdlToken::Assert);
        let condition = self.parse_expr();
        assert.push(condition);

        if self.eat(VhdlToken::Report) {
            if self.at(VhdlToken::StringLiteral) {
                assert.set_attr("report", self.current_text().to_string());
                self.advance();
            } else {
                self.syntax_error();
            }
        }
        if let Some(severity) = self.parse_severity() {
            assert.set_attr("severity", severity);
        }

        self.expect(VhdlToken::Semicolon);
        assert
    }

    fn parse_report(&mut self) -> SyntaxNode {
        let mut report = self.node_here(Tag::ReportSequentialStatement);
        self.expect(VhdlToken::Report);
        if self.at(VhdlToken::StringLiteral) {
            report.set_attr("report", self.current_text().to_string());
            self.advance();
        } else {
            self.syntax_error();
        }
        if let Some(severity) = self.parse_severity() {
            report.set_attr("severity", severity);
        }
        self.expect(VhdlToken::Semicolon);
        report
    }

    fn parse_if_sequential(&mut self, label: Option<String>) -> SyntaxNode {
        let mut stmt = self.node_here(Tag::IfSequentialStatement);
        if let Some(label) = label {
            stmt.set_attr("label", label);
        }
        self.expect(VhdlToken::If);
        let condition = self.parse_expr();
        stmt.push(condition);
        self.expect(VhdlToken::Then);

        let then_stmts = self.parse_sequential_statements();
        stmt.push(SyntaxNode::new(Tag::Then).with_child(then_stmts));

        while self.at(VhdlToken::Elsif) {
            self.advance();
            let condition = self.parse_expr();
            self.expect(VhdlToken::Then);
            let branch_stmts = self.parse_sequential_statements();
            let elseif = SyntaxNode::new(Tag::Elseif)
                .with_child(condition)
                .with_child(SyntaxNode::new(Tag::Then).with_child(branch_stmts));
            stmt.push(elseif);
        }

        if self.eat(VhdlToken::Else) {
            let else_stmts = self.parse_sequential_statements();
            stmt.push(SyntaxNode::new(Tag::Else).with_child(else_stmts));
        }

        self.expect(VhdlToken::End);
        self.expect(VhdlToken::If);
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        stmt
    }

    fn parse_case(&mut self, label: Option<String>) -> SyntaxNode {
        let mut stmt = self.node_here(Tag::CaseSequentialStatement);
        if let Some(label) = label {
            stmt.set_attr("label", label);
        }
        self.expect(VhdlToken::Case);
        let selector = self.parse_expr();
        stmt.push(selector);
        self.expect(VhdlToken::Is);

        while self.at(VhdlToken::When) {
            self.advance();
            let choices = self.parse_choice_list();
            self.expect(VhdlToken::Arrow);
            let arm_stmts = self.parse_sequential_statements();
            let arm = SyntaxNode::new(Tag::Case)
                .with_child(choices)
                .with_child(arm_stmts);
            stmt.push(arm);
        }

        self.expect(VhdlToken::End);
        self.expect(VhdlToken::Case);
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        stmt
    }

    /// Parses a while loop; a bare `loop … end loop` is a while without a
    /// condition child.
    fn parse_while(&mut self, label: Option<String>) -> SyntaxNode {
        let mut stmt = self.node_here(Tag::WhileSequentialStatement);
        if let Some(label) = label {
            stmt.set_attr("label", label);
        }
        if self.eat(VhdlToken::While) {
            let condition = self.parse_expr();
            stmt.push(condition);
        }
        self.expect(VhdlToken::Loop);

        let body = self.parse_sequential_statements();
        stmt.push(body);

        self.expect(VhdlToken::End);
        self.expect(VhdlToken::Loop);
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        stmt
    }

    fn parse_for_sequential(&mut self, label: Option<String>) -> SyntaxNode {
        let mut stmt = self.node_here(Tag::ForSequentialStatement);
        if let Some(label) = label {
            stmt.set_attr("label", label);
        }
        self.expect(VhdlToken::For);
        let var = self.expect_ident();
        stmt.set_attr("id", var);
        self.expect(VhdlToken::In);
        let range = self.parse_range();
        stmt.push(range);
        self.expect(VhdlToken::Loop);

        let body = self.parse_sequential_statements();
        stmt.push(body);

        self.expect(VhdlToken::End);
        self.expect(VhdlToken::Loop);
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        stmt
    }

    fn parse_next_or_exit(&mut self, tag: Tag) -> SyntaxNode {
        let mut stmt = self.node_here(tag);
        self.advance(); // next / exit
        if let Some(label) = self.eat_ident() {
            stmt.set_attr("label", label);
        }
        if self.eat(VhdlToken::When) {
            let condition = self.parse_expr();
            stmt.push(condition);
        }
        self.expect(VhdlToken::Semicolon);
        stmt
    }

    fn parse_return(&mut self) -> SyntaxNode {
        let mut stmt = self.node_here(Tag::ReturnSequentialStatement);
        self.expect(VhdlToken::Return);
        if !self.at(VhdlToken::Semicolon) {
            let value = self.parse_expr();
            stmt.push(value);
        }
        self.expect(VhdlToken::Semicolon);
        stmt
    }

    fn parse_null(&mut self) -> SyntaxNode {
        let stmt = self.node_here(Tag::NullSequentialStatement);
        self.advance();
        self.expect(VhdlToken::Semicolon);
        stmt
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{SyntaxNode, Tag};
    use crate::parser::tests::{parse_ok, parse_vhdl};

    fn arch_stmts(body: &str) -> SyntaxNode {
        let source = format!("architecture r of e is begin {body} end r;");
        let tree = parse_ok(&source);
        tree.children[0]
            .child(Tag::ParallelStatements)
            .unwrap()
            .clone()
    }

    fn process_stmts(body: &str) -> SyntaxNode {
        let stmts = arch_stmts(&format!("process (clk) begin {body} end process;"));
        stmts.children[0]
            .child(Tag::SequentialStatements)
            .unwrap()
            .clone()
    }

    #[test]
    fn simple_concurrent_assign() {
        let stmts = arch_stmts("b <= a;");
        let assign = &stmts.children[0];
        assert_eq!(assign.tag, Tag::AssignParallelStatement);
        assert_eq!(assign.attr("postponed"), Some("false"));
        assert_eq!(assign.attr("guarded"), Some("false"));
        assert_eq!(assign.children[0].id(), Some("b"));
        let sv = assign.child(Tag::SignalValue).unwrap();
        let exprs = sv.child(Tag::Expressions).unwrap();
        assert_eq!(exprs.children[0].id(), Some("a"));
    }

    #[test]
    fn assign_line_comes_from_target() {
        let tree = parse_ok(
            "architecture r of e is\nbegin\nb <= a;\nend r;",
        );
        let stmts = tree.children[0].child(Tag::ParallelStatements).unwrap();
        assert_eq!(stmts.children[0].attr("line"), Some("3"));
    }

    #[test]
    fn labeled_assign() {
        let stmts = arch_stmts("drv: b <= a;");
        assert_eq!(stmts.children[0].attr("label"), Some("drv"));
    }

    #[test]
    fn conditional_assign_records_when_inside_each_arm() {
        let stmts = arch_stmts("b <= a when g = '1' else '0';");
        let assign = &stmts.children[0];
        let arms: Vec<&SyntaxNode> = assign.children_tagged(Tag::SignalValue).collect();
        assert_eq!(arms.len(), 2);
        let when = arms[0].child(Tag::When).expect("when in first arm");
        assert_eq!(when.children[0].tag, Tag::RelationalExpression);
        assert!(arms[1].child(Tag::When).is_none());
    }

    #[test]
    fn guarded_transport_assign() {
        let stmts = arch_stmts("b <= guarded transport a;");
        let assign = &stmts.children[0];
        assert_eq!(assign.attr("guarded"), Some("true"));
        assert_eq!(assign.attr("delay"), Some("transport"));
    }

    #[test]
    fn reject_inertial_assign_keeps_reject_node() {
        let stmts = arch_stmts("b <= reject 2 ns inertial a;");
        let assign = &stmts.children[0];
        assert_eq!(assign.attr("delay"), Some("inertial"));
        let reject = assign.child(Tag::Reject).expect("reject node");
        assert_eq!(reject.children[0].tag, Tag::TimeExpression);
    }

    #[test]
    fn waveform_with_after() {
        let stmts = arch_stmts("b <= a after 5 ns, '0' after 10 ns;");
        let exprs = stmts.children[0]
            .child(Tag::SignalValue)
            .unwrap()
            .child(Tag::Expressions)
            .unwrap();
        assert_eq!(exprs.children.len(), 2);
        assert_eq!(exprs.children[0].tag, Tag::AfterExpression);
    }

    #[test]
    fn unaffected_waveform() {
        let stmts = arch_stmts("b <= unaffected when g = '1' else a;");
        let first = stmts.children[0].child(Tag::SignalValue).unwrap();
        assert!(first.child(Tag::Unaffected).is_some());
    }

    #[test]
    fn process_with_sensitivity_list() {
        let stmts = arch_stmts("process (clk, rst) begin end process;");
        let process = &stmts.children[0];
        assert_eq!(process.tag, Tag::ProcessParallelStatement);
        assert_eq!(process.attr("postponed"), Some("false"));
        let sens = process.child(Tag::Parameters).expect("sensitivity list");
        assert_eq!(sens.children.len(), 2);
        assert!(process.child(Tag::SequentialStatements).is_some());
    }

    #[test]
    fn labeled_postponed_process() {
        let stmts = arch_stmts("p0: postponed process begin wait; end postponed process p0;");
        let process = &stmts.children[0];
        assert_eq!(process.attr("label"), Some("p0"));
        assert_eq!(process.attr("postponed"), Some("true"));
    }

    #[test]
    fn process_declarations_region() {
        let stmts = arch_stmts(
            "process variable count: natural := 0; begin count := count + 1; end process;",
        );
        let process = &stmts.children[0];
        let decls = process.child(Tag::Declarations).unwrap();
        assert_eq!(decls.children[0].tag, Tag::VariableDeclaration);
    }

    #[test]
    fn component_instantiation_requires_map() {
        let stmts = arch_stmts("u1: counter port map (clk => clk, q => count);");
        let inst = &stmts.children[0];
        assert_eq!(inst.tag, Tag::ComponentParallelStatement);
        assert_eq!(inst.attr("label"), Some("u1"));
        assert_eq!(inst.id(), Some("counter"));
        let pm = inst.child(Tag::PortMap).unwrap();
        assert_eq!(pm.children.len(), 2);
        assert_eq!(pm.children[0].tag, Tag::Map);
    }

    #[test]
    fn instantiation_with_generic_map() {
        let stmts = arch_stmts(
            "u1: counter generic map (width => 16) port map (clk => clk);",
        );
        let inst = &stmts.children[0];
        assert!(inst.child(Tag::GenericMap).is_some());
        assert!(inst.child(Tag::PortMap).is_some());
    }

    #[test]
    fn labeled_call_without_map_is_procedure() {
        let stmts = arch_stmts("go: pulse(clk);");
        let call = &stmts.children[0];
        assert_eq!(call.tag, Tag::ProcedureParallelStatement);
        assert_eq!(call.attr("label"), Some("go"));
        assert_eq!(call.id(), Some("pulse"));
        assert!(call.child(Tag::Parameters).is_some());
    }

    #[test]
    fn port_map_with_open_actual() {
        let stmts = arch_stmts("u1: counter port map (clk => clk, q => open);");
        let pm = stmts.children[0].child(Tag::PortMap).unwrap();
        let second = &pm.children[1];
        assert_eq!(second.children[1].tag, Tag::Open);
    }

    #[test]
    fn entity_instantiation() {
        let stmts = arch_stmts("u1: entity work.counter(rtl) port map (clk => clk);");
        let inst = &stmts.children[0];
        assert_eq!(inst.tag, Tag::EntityParallelStatement);
        assert_eq!(inst.id(), Some("work.counter"));
        assert_eq!(inst.attr("architecture"), Some("rtl"));
    }

    #[test]
    fn configuration_instantiation() {
        let stmts = arch_stmts("u1: configuration work.cfg port map (clk => clk);");
        assert_eq!(stmts.children[0].tag, Tag::ConfigurationParallelStatement);
    }

    #[test]
    fn concurrent_assert_with_report() {
        let stmts = arch_stmts("assert ok report \"bad state\" severity warning;");
        let assert_stmt = &stmts.children[0];
        assert_eq!(assert_stmt.tag, Tag::AssertParallelStatement);
        assert_eq!(assert_stmt.attr("report"), Some("\"bad state\""));
        assert_eq!(assert_stmt.attr("severity"), Some("warning"));
    }

    #[test]
    fn selected_assign() {
        let stmts = arch_stmts(
            "with sel select y <= a when \"00\", b when \"01\", '0' when others;",
        );
        let select = &stmts.children[0];
        assert_eq!(select.tag, Tag::SelectParallelStatement);
        // selector, target, then one arm per waveform
        assert_eq!(select.children[0].id(), Some("sel"));
        assert_eq!(select.children[1].id(), Some("y"));
        let arms: Vec<&SyntaxNode> = select.children_tagged(Tag::SignalValue).collect();
        assert_eq!(arms.len(), 3);
        let when = arms[2].child(Tag::When).unwrap();
        assert_eq!(when.children[0].tag, Tag::Choices);
    }

    #[test]
    fn if_generate() {
        let stmts = arch_stmts("g0: if width = 8 generate b <= a; end generate g0;");
        let gen = &stmts.children[0];
        assert_eq!(gen.tag, Tag::IfParallelStatement);
        assert_eq!(gen.attr("label"), Some("g0"));
        assert_eq!(gen.children[0].tag, Tag::RelationalExpression);
        let inner = gen
            .child(Tag::Generate)
            .unwrap()
            .child(Tag::ParallelStatements)
            .unwrap();
        assert_eq!(inner.children[0].tag, Tag::AssignParallelStatement);
    }

    #[test]
    fn for_generate() {
        let stmts = arch_stmts("g0: for i in 0 to 7 generate b <= a; end generate;");
        let gen = &stmts.children[0];
        assert_eq!(gen.tag, Tag::ForParallelStatement);
        assert_eq!(gen.id(), Some("i"));
        assert!(gen.child(Tag::Range).is_some());
        assert!(gen.child(Tag::Generate).is_some());
    }

    #[test]
    fn block_statement() {
        let stmts = arch_stmts("b0: block signal t: bit; begin t <= a; end block b0;");
        let block = &stmts.children[0];
        assert_eq!(block.tag, Tag::BlockParallelStatement);
        assert_eq!(block.attr("label"), Some("b0"));
        assert!(block.child(Tag::Declarations).is_some());
        assert!(block.child(Tag::ParallelStatements).is_some());
    }

    // -- sequential --

    #[test]
    fn sequential_signal_assign() {
        let stmts = process_stmts("q <= d;");
        let assign = &stmts.children[0];
        assert_eq!(assign.tag, Tag::SignalAssignSequentialStatement);
        assert_eq!(assign.children[0].id(), Some("q"));
        assert!(assign.child(Tag::SignalValue).is_some());
    }

    #[test]
    fn variable_assign() {
        let stmts = process_stmts("v := v + 1;");
        let assign = &stmts.children[0];
        assert_eq!(assign.tag, Tag::VariableAssignSequentialStatement);
        assert_eq!(assign.children[1].tag, Tag::AddingExpression);
    }

    #[test]
    fn procedure_call_statement() {
        let stmts = process_stmts("advance(count, 2);");
        let call = &stmts.children[0];
        assert_eq!(call.tag, Tag::ProcedureSequentialStatement);
        assert_eq!(call.id(), Some("advance"));
    }

    #[test]
    fn if_elsif_else_structure() {
        let stmts = process_stmts(
            "if sel = \"00\" then q <= a; elsif sel = \"01\" then q <= b; else q <= c; end if;",
        );
        let ifstmt = &stmts.children[0];
        assert_eq!(ifstmt.tag, Tag::IfSequentialStatement);
        assert_eq!(ifstmt.children[0].tag, Tag::RelationalExpression);
        assert!(ifstmt.child(Tag::Then).is_some());
        assert_eq!(ifstmt.children_tagged(Tag::Elseif).count(), 1);
        assert!(ifstmt.child(Tag::Else).is_some());
        let elseif = ifstmt.child(Tag::Elseif).unwrap();
        assert_eq!(elseif.children[0].tag, Tag::RelationalExpression);
        assert!(elseif.child(Tag::Then).is_some());
    }

    #[test]
    fn rising_edge_style_guard() {
        let stmts = process_stmts("if clk'event and clk = '1' then q <= d; end if;");
        let ifstmt = &stmts.children[0];
        let guard = &ifstmt.children[0];
        assert_eq!(guard.tag, Tag::LogicalExpression);
        assert_eq!(guard.attr("op"), Some("and"));
    }

    #[test]
    fn case_statement() {
        let stmts = process_stmts(
            "case sel is when \"00\" => q <= a; when others => q <= '0'; end case;",
        );
        let case = &stmts.children[0];
        assert_eq!(case.tag, Tag::CaseSequentialStatement);
        assert_eq!(case.children_tagged(Tag::Case).count(), 2);
        let arm = case.child(Tag::Case).unwrap();
        assert_eq!(arm.children[0].tag, Tag::Choices);
        assert_eq!(arm.children[1].tag, Tag::SequentialStatements);
    }

    #[test]
    fn while_and_bare_loop() {
        let stmts = process_stmts(
            "while i < 8 loop i := i + 1; end loop; loop exit; end loop;",
        );
        let while_stmt = &stmts.children[0];
        assert_eq!(while_stmt.tag, Tag::WhileSequentialStatement);
        assert_eq!(while_stmt.children[0].tag, Tag::RelationalExpression);
        let bare = &stmts.children[1];
        assert_eq!(bare.tag, Tag::WhileSequentialStatement);
        assert_eq!(bare.children[0].tag, Tag::SequentialStatements);
    }

    #[test]
    fn for_loop_with_range() {
        let stmts = process_stmts("for i in 7 downto 0 loop q <= d; end loop;");
        let for_stmt = &stmts.children[0];
        assert_eq!(for_stmt.tag, Tag::ForSequentialStatement);
        assert_eq!(for_stmt.id(), Some("i"));
        assert_eq!(
            for_stmt.child(Tag::Range).unwrap().attr("direction"),
            Some("downto")
        );
    }

    #[test]
    fn next_and_exit_with_condition() {
        let stmts = process_stmts(
            "for i in 0 to 7 loop next when skip; exit outer when done; end loop;",
        );
        let body = stmts.children[0].child(Tag::SequentialStatements).unwrap();
        let next = &body.children[0];
        assert_eq!(next.tag, Tag::NextSequentialStatement);
        assert_eq!(next.attr("label"), None);
        assert_eq!(next.children[0].id(), Some("skip"));
        let exit = &body.children[1];
        assert_eq!(exit.attr("label"), Some("outer"));
    }

    #[test]
    fn wait_forms() {
        let stmts = process_stmts(
            "wait; wait on clk; wait until clk = '1'; wait for 10 ns; \
             wait on clk until en = '1' for 5 ns;",
        );
        assert!(stmts.children[0].children.is_empty());
        assert!(stmts.children[1].child(Tag::On).is_some());
        assert!(stmts.children[2].child(Tag::Until).is_some());
        assert!(stmts.children[3].child(Tag::For).is_some());
        let full = &stmts.children[4];
        assert!(full.child(Tag::On).is_some());
        assert!(full.child(Tag::Until).is_some());
        assert!(full.child(Tag::For).is_some());
    }

    #[test]
    fn report_and_null() {
        let stmts = process_stmts("report \"tick\" severity note; null;");
        assert_eq!(stmts.children[0].attr("report"), Some("\"tick\""));
        assert_eq!(stmts.children[0].attr("severity"), Some("note"));
        assert_eq!(stmts.children[1].tag, Tag::NullSequentialStatement);
    }

    #[test]
    fn return_with_and_without_value() {
        let tree = parse_ok(
            "package body p is \
             function f return natural is begin return 1; end f; \
             procedure g is begin return; end g; \
             end package body p;",
        );
        let decls = tree.children[0].child(Tag::Declarations).unwrap();
        let f_stmts = decls.children[0].child(Tag::SequentialStatements).unwrap();
        assert_eq!(f_stmts.children[0].children.len(), 1);
        let g_stmts = decls.children[1].child(Tag::SequentialStatements).unwrap();
        assert!(g_stmts.children[0].children.is_empty());
    }

    #[test]
    fn aggregate_target_assign() {
        let stmts = arch_stmts("(hi, lo) <= word;");
        let assign = &stmts.children[0];
        assert_eq!(assign.tag, Tag::AssignParallelStatement);
        assert_eq!(assign.children[0].tag, Tag::AggregateExpression);
    }

    #[test]
    fn bad_statement_recovers_at_semicolon() {
        let (tree, diags) = parse_vhdl(
            "architecture r of e is begin then bogus; b <= a; end r;",
        );
        assert!(!diags.is_empty());
        let stmts = tree.children[0].child(Tag::ParallelStatements).unwrap();
        assert!(stmts
            .children
            .iter()
            .any(|s| s.tag == Tag::AssignParallelStatement));
    }
}
