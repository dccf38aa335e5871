use crate::parser::ast::{Ident, Name, ParseError, Program};
use crate::parser::lexer::{
    Lexer,
    token::{Token, TokenKind},
};
use crate::parser::span::Span;
use smallvec::SmallVec;

mod attributes;
mod control_flow;
mod definitions;
mod expr;
mod stmt;
mod types;

pub struct Parser<'src> {
    pub(super) lexer: Lexer<'src>,
    pub(super) current_token: Token,
    pub(super) next_token: Token,
    pub(super) errors: Vec<ParseError>,
    pub(super) current_doc_comment: Option<Span>,
    pub(super) next_doc_comment: Option<Span>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src [u8]) -> Self {
        let mut parser = Self {
            lexer: Lexer::new(source),
            current_token: Token {
                kind: TokenKind::Eof,
                span: Span::default(),
            },
            next_token: Token {
                kind: TokenKind::Eof,
                span: Span::default(),
            },
            errors: Vec::new(),
            current_doc_comment: None,
            next_doc_comment: None,
        };
        parser.bump();
        parser.bump();
        parser
    }

    /// Parse a whole source text in one call.
    pub fn parse(source: &'src str) -> Program {
        Self::new(source.as_bytes()).parse_program()
    }

    pub(super) fn bump(&mut self) {
        self.current_token = self.next_token;
        self.current_doc_comment = self.next_doc_comment;
        self.next_doc_comment = None;
        loop {
            let token = self.lexer.next().unwrap_or(Token {
                kind: TokenKind::Eof,
                span: Span::new(self.lexer.source().len(), self.lexer.source().len()),
            });
            if token.kind == TokenKind::DocComment {
                self.next_doc_comment = Some(token.span);
            } else if token.kind != TokenKind::Comment {
                self.next_token = token;
                break;
            }
        }
    }

    pub(super) fn error(&mut self, span: Span, message: &'static str) {
        self.errors.push(ParseError { span, message });
    }

    pub(super) fn text(&self, span: Span) -> String {
        String::from_utf8_lossy(self.lexer.slice(span)).into_owned()
    }

    /// Extract the current token as an identifier and advance past it.
    pub(super) fn eat_ident(&mut self) -> Ident {
        let token = self.current_token;
        self.bump();
        Ident {
            name: self.text(token.span),
            span: token.span,
        }
    }

    pub(super) fn missing_ident(&self) -> Ident {
        Ident {
            name: String::new(),
            span: Span::new(self.current_token.span.start, self.current_token.span.start),
        }
    }

    pub(super) fn expect_semicolon(&mut self) {
        if self.current_token.kind == TokenKind::SemiColon {
            self.bump();
        } else if self.current_token.kind == TokenKind::CloseTag
            || self.current_token.kind == TokenKind::Eof
        {
            // Implicit semicolon at close tag or EOF.
        } else {
            self.error(self.current_token.span, "Missing semicolon");
            self.sync_to_statement_end();
        }
    }

    pub(super) fn expect(&mut self, kind: TokenKind, message: &'static str) -> bool {
        if self.current_token.kind == kind {
            self.bump();
            true
        } else {
            self.error(self.current_token.span, message);
            false
        }
    }

    pub(super) fn parse_name(&mut self) -> Name {
        let start = self.current_token.span.start;
        let mut parts: SmallVec<[String; 2]> = SmallVec::new();
        let mut leading_slash = false;
        let mut relative = false;

        if self.current_token.kind == TokenKind::NsSeparator {
            leading_slash = true;
            self.bump();
        } else if self.current_token.kind == TokenKind::Namespace
            && self.next_token.kind == TokenKind::NsSeparator
        {
            relative = true;
            self.bump();
            self.bump();
        }

        let mut end = start;
        loop {
            if self.current_token.kind == TokenKind::Identifier
                || self.current_token.kind.is_semi_reserved()
            {
                end = self.current_token.span.end;
                parts.push(self.text(self.current_token.span));
                self.bump();
            } else {
                break;
            }

            if self.current_token.kind == TokenKind::NsSeparator {
                self.bump();
            } else {
                break;
            }
        }

        Name {
            parts,
            leading_slash,
            relative,
            span: Span::new(start, end),
        }
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while self.current_token.kind != TokenKind::Eof {
            statements.push(self.parse_top_stmt());
        }

        let span = if let (Some(first), Some(last)) = (statements.first(), statements.last()) {
            Span::new(first.span().start, last.span().end)
        } else {
            Span::default()
        };

        Program {
            statements,
            errors: std::mem::take(&mut self.errors),
            span,
        }
    }

    pub(super) fn sync_to_statement_end(&mut self) {
        while !matches!(
            self.current_token.kind,
            TokenKind::SemiColon | TokenKind::CloseBrace | TokenKind::CloseTag | TokenKind::Eof
        ) {
            self.bump();
        }
        if self.current_token.kind == TokenKind::SemiColon {
            self.bump();
        }
    }
}
