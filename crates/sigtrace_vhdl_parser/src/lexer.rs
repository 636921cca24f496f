//! Lexical analyzer for VHDL-93 source text.
//!
//! Produces a token stream terminated by [`VhdlToken::Eof`]. Whitespace and
//! `--` line comments are skipped. Errors are reported to the
//! [`DiagnosticSink`] and recovered by skipping a single byte, so one pass
//! surfaces every lexical problem in a file.
//!
//! The apostrophe is the one genuinely ambiguous character: it introduces a
//! character/vector literal (`'1'`, `'Z'`) but is also the attribute tick
//! (`clk'event`). A quote only starts a literal when the closing quote
//! appears before any whitespace; otherwise it lexes as [`VhdlToken::Tick`].

use crate::token::{lookup_keyword, Token, VhdlToken};
use sigtrace_diagnostics::code::{Category, DiagnosticCode};
use sigtrace_diagnostics::{Diagnostic, DiagnosticSink};
use sigtrace_source::{FileId, Span};

/// Lexes `source` into a vector of tokens ending with [`VhdlToken::Eof`].
pub fn lex(source: &str, file: FileId, sink: &DiagnosticSink) -> Vec<Token> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
        file,
        sink,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    file: FileId,
    sink: &'a DiagnosticSink,
}

impl<'a> Lexer<'a> {
    fn lex_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: VhdlToken::Eof,
                    span: Span::new(self.file, self.pos as u32, self.pos as u32),
                });
                break;
            }
            tokens.push(self.next_token());
        }
        tokens
    }

    fn peek(&self) -> u8 {
        if self.pos < self.source.len() {
            self.source[self.pos]
        } else {
            0
        }
    }

    fn peek_at(&self, offset: usize) -> u8 {
        let idx = self.pos + offset;
        if idx < self.source.len() {
            self.source[idx]
        } else {
            0
        }
    }

    fn advance(&mut self) -> u8 {
        let b = self.source[self.pos];
        self.pos += 1;
        b
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file, start as u32, self.pos as u32)
    }

    fn error(&self, msg: &str, span: Span) {
        self.sink.emit(Diagnostic::error(
            DiagnosticCode::new(Category::Lex, 1),
            msg,
            span,
        ));
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.peek() == b'-' && self.peek_at(1) == b'-' {
                self.pos += 2;
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            break;
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let b = self.peek();

        if b == b'\'' {
            if let Some(end) = self.tick_literal_end(self.pos) {
                self.pos = end;
                return Token {
                    kind: VhdlToken::Literal,
                    span: self.span_from(start),
                };
            }
            self.pos += 1;
            return Token {
                kind: VhdlToken::Tick,
                span: self.span_from(start),
            };
        }

        if is_ident_start(b) {
            return self.lex_identifier_or_keyword(start);
        }

        if b.is_ascii_digit() {
            return self.lex_number(start);
        }

        if b == b'"' {
            return self.lex_string(start);
        }

        self.lex_symbol(start)
    }

    /// If a character/vector literal starts at `from`, returns the offset
    /// just past its closing quote. The closing quote must come before any
    /// whitespace; this is what makes `clk'event` lex as tick + identifier
    /// while `'1'` and `'ZZZZ'` lex as literals.
    fn tick_literal_end(&self, from: usize) -> Option<usize> {
        let mut i = from + 1;
        while i < self.source.len() {
            match self.source[i] {
                b'\'' => return Some(i + 1),
                b' ' | b'\t' | b'\r' | b'\n' => return None,
                _ => i += 1,
            }
        }
        None
    }

    fn lex_identifier_or_keyword(&mut self, start: usize) -> Token {
        while self.pos < self.source.len() && is_ident_char(self.source[self.pos]) {
            self.pos += 1;
        }

        let text = &self.source[start..self.pos];

        // B/O/X prefix glued to a quoted form restarts as a bit-string
        // literal: X"FF", b"1010", o'7'.
        if text.len() == 1 && matches!(text[0].to_ascii_lowercase(), b'b' | b'o' | b'x') {
            if self.peek() == b'"' {
                return self.lex_quoted_tail(start, "unterminated bit string literal");
            }
            if self.peek() == b'\'' {
                if let Some(end) = self.tick_literal_end(self.pos) {
                    self.pos = end;
                    return Token {
                        kind: VhdlToken::Literal,
                        span: self.span_from(start),
                    };
                }
            }
        }

        let lower: String = text.iter().map(|b| b.to_ascii_lowercase() as char).collect();
        let kind = lookup_keyword(&lower).unwrap_or(VhdlToken::Identifier);

        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn lex_number(&mut self, start: usize) -> Token {
        self.eat_digits();

        // Based literal: digits#hexdigits#
        if self.peek() == b'#' {
            self.pos += 1;
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_hexdigit() {
                self.pos += 1;
            }
            if self.peek() == b'#' {
                self.pos += 1;
            } else {
                self.error("expected closing '#' in based literal", self.span_from(start));
                return Token {
                    kind: VhdlToken::Error,
                    span: self.span_from(start),
                };
            }
            return Token {
                kind: VhdlToken::Literal,
                span: self.span_from(start),
            };
        }

        // Real literal: digits.digits
        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            self.pos += 1;
            self.eat_digits();
        }

        Token {
            kind: VhdlToken::Literal,
            span: self.span_from(start),
        }
    }

    fn eat_digits(&mut self) {
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
    }

    /// Lexes the `"..."` tail of a bit-string literal starting at the
    /// current position (the opening quote).
    fn lex_quoted_tail(&mut self, start: usize, unterminated_msg: &str) -> Token {
        self.pos += 1; // opening quote
        loop {
            if self.pos >= self.source.len() || self.source[self.pos] == b'\n' {
                self.error(unterminated_msg, self.span_from(start));
                return Token {
                    kind: VhdlToken::Error,
                    span: self.span_from(start),
                };
            }
            match self.source[self.pos] {
                b'\\' => self.pos += 2,
                b'"' => {
                    self.pos += 1;
                    return Token {
                        kind: VhdlToken::Literal,
                        span: self.span_from(start),
                    };
                }
                _ => self.pos += 1,
            }
        }
    }

    fn lex_string(&mut self, start: usize) -> Token {
        self.pos += 1; // opening quote
        loop {
            if self.pos >= self.source.len() || self.source[self.pos] == b'\n' {
                self.error("unterminated string literal", self.span_from(start));
                return Token {
                    kind: VhdlToken::Error,
                    span: self.span_from(start),
                };
            }
            match self.source[self.pos] {
                b'\\' => self.pos += 2,
                b'"' => {
                    self.pos += 1;
                    return Token {
                        kind: VhdlToken::StringLiteral,
                        span: self.span_from(start),
                    };
                }
                _ => self.pos += 1,
            }
        }
    }

    fn lex_symbol(&mut self, start: usize) -> Token {
        let b = self.advance();
        let kind = match b {
            b';' => VhdlToken::Semicolon,
            b'(' => VhdlToken::LeftParen,
            b')' => VhdlToken::RightParen,
            b',' => VhdlToken::Comma,
            b'.' => VhdlToken::Dot,
            b'+' => VhdlToken::Plus,
            b'-' => VhdlToken::Minus,
            b'&' => VhdlToken::Ampersand,
            b'|' => VhdlToken::Bar,
            b':' => {
                if self.peek() == b'=' {
                    self.pos += 1;
                    VhdlToken::ColonEquals
                } else {
                    VhdlToken::Colon
                }
            }
            b'=' => {
                if self.peek() == b'>' {
                    self.pos += 1;
                    VhdlToken::Arrow
                } else {
                    VhdlToken::Equals
                }
            }
            b'/' => {
                if self.peek() == b'=' {
                    self.pos += 1;
                    VhdlToken::SlashEquals
                } else {
                    VhdlToken::Slash
                }
            }
            b'<' => match self.peek() {
                b'=' => {
                    self.pos += 1;
                    VhdlToken::LessEquals
                }
                b'>' => {
                    self.pos += 1;
                    VhdlToken::Box
                }
                _ => VhdlToken::LessThan,
            },
            b'>' => {
                if self.peek() == b'=' {
                    self.pos += 1;
                    VhdlToken::GreaterEquals
                } else {
                    VhdlToken::GreaterThan
                }
            }
            b'*' => {
                if self.peek() == b'*' {
                    self.pos += 1;
                    VhdlToken::DoubleStar
                } else {
                    VhdlToken::Star
                }
            }
            _ => {
                self.error(
                    &format!("illegal character '{}'", b as char),
                    self.span_from(start),
                );
                VhdlToken::Error
            }
        };
        Token {
            kind,
            span: self.span_from(start),
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
