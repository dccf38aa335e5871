use super::Parser;
use crate::parser::ast::{
    Catch, ConstEntry, Ident, Modifier, StaticVar, Stmt, UseItem, UseKind,
};
use crate::parser::lexer::token::TokenKind;
use crate::parser::span::Span;

impl<'src> Parser<'src> {
    pub(super) fn parse_stmt(&mut self) -> Stmt {
        self.parse_stmt_impl(false)
    }

    pub(super) fn parse_top_stmt(&mut self) -> Stmt {
        self.parse_stmt_impl(true)
    }

    fn parse_stmt_impl(&mut self, top_level: bool) -> Stmt {
        let doc_comment = self.current_doc_comment;

        if self.current_token.kind == TokenKind::Identifier
            && self.next_token.kind == TokenKind::Colon
        {
            let name = self.eat_ident();
            let colon_end = self.current_token.span.end;
            self.bump();
            let span = Span::new(name.span.start, colon_end);
            return Stmt::Label { name, span };
        }

        match self.current_token.kind {
            TokenKind::Attribute => {
                let attributes = self.parse_attributes();
                match self.current_token.kind {
                    TokenKind::Function => self.parse_function(attributes, doc_comment),
                    TokenKind::Class => self.parse_class(attributes, Vec::new(), doc_comment),
                    TokenKind::Interface => self.parse_interface(attributes, doc_comment),
                    TokenKind::Trait => self.parse_trait(attributes, doc_comment),
                    TokenKind::Enum if self.next_token.kind == TokenKind::Identifier => {
                        self.parse_enum(attributes, doc_comment)
                    }
                    TokenKind::Const => self.parse_const_stmt(attributes, doc_comment),
                    TokenKind::Final | TokenKind::Abstract | TokenKind::Readonly => {
                        let modifiers = self.parse_class_modifiers();
                        if self.current_token.kind == TokenKind::Class {
                            self.parse_class(attributes, modifiers, doc_comment)
                        } else {
                            let span = self.current_token.span;
                            self.sync_to_statement_end();
                            Stmt::Error { span }
                        }
                    }
                    _ => {
                        let span = self.current_token.span;
                        self.error(span, "Expected declaration after attributes");
                        self.sync_to_statement_end();
                        Stmt::Error { span }
                    }
                }
            }
            TokenKind::Final | TokenKind::Abstract => {
                let modifiers = self.parse_class_modifiers();
                if self.current_token.kind == TokenKind::Class {
                    self.parse_class(Vec::new(), modifiers, doc_comment)
                } else {
                    let span = self.current_token.span;
                    self.error(span, "Expected 'class'");
                    self.sync_to_statement_end();
                    Stmt::Error { span }
                }
            }
            TokenKind::Readonly if self.next_token.kind == TokenKind::Class => {
                let modifiers = self.parse_class_modifiers();
                self.parse_class(Vec::new(), modifiers, doc_comment)
            }
            TokenKind::Echo | TokenKind::OpenTagEcho => self.parse_echo(),
            TokenKind::Return => self.parse_return(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Foreach => self.parse_foreach(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Function
                if matches!(
                    self.next_token.kind,
                    TokenKind::Identifier | TokenKind::Ampersand
                ) =>
            {
                self.parse_function(Vec::new(), doc_comment)
            }
            TokenKind::Class => self.parse_class(Vec::new(), Vec::new(), doc_comment),
            TokenKind::Interface => self.parse_interface(Vec::new(), doc_comment),
            TokenKind::Trait => self.parse_trait(Vec::new(), doc_comment),
            TokenKind::Enum if self.next_token.kind == TokenKind::Identifier => {
                self.parse_enum(Vec::new(), doc_comment)
            }
            TokenKind::Namespace if self.next_token.kind != TokenKind::NsSeparator => {
                if !top_level {
                    self.error(
                        self.current_token.span,
                        "Namespace declarations are only allowed at the top level",
                    );
                }
                self.parse_namespace()
            }
            TokenKind::Use => {
                if !top_level {
                    self.error(
                        self.current_token.span,
                        "Use declarations are only allowed at the top level",
                    );
                }
                self.parse_use()
            }
            TokenKind::Try => self.parse_try(),
            TokenKind::Throw => self.parse_throw(),
            TokenKind::Const => self.parse_const_stmt(Vec::new(), doc_comment),
            TokenKind::Goto => {
                let start = self.current_token.span.start;
                self.bump();
                let label = if self.current_token.kind == TokenKind::Identifier {
                    self.eat_ident()
                } else {
                    self.error(self.current_token.span, "Expected label after goto");
                    self.missing_ident()
                };
                self.expect_semicolon();
                let span = Span::new(start, self.current_token.span.start);
                Stmt::Goto { label, span }
            }
            TokenKind::Break => {
                let start = self.current_token.span.start;
                self.bump();
                if !matches!(
                    self.current_token.kind,
                    TokenKind::SemiColon | TokenKind::CloseTag | TokenKind::Eof
                ) {
                    self.parse_expr(0);
                }
                self.expect_semicolon();
                Stmt::Break {
                    span: Span::new(start, self.current_token.span.start),
                }
            }
            TokenKind::Continue => {
                let start = self.current_token.span.start;
                self.bump();
                if !matches!(
                    self.current_token.kind,
                    TokenKind::SemiColon | TokenKind::CloseTag | TokenKind::Eof
                ) {
                    self.parse_expr(0);
                }
                self.expect_semicolon();
                Stmt::Continue {
                    span: Span::new(start, self.current_token.span.start),
                }
            }
            TokenKind::Declare => self.parse_declare(),
            TokenKind::Global => self.parse_global(),
            TokenKind::Static
                if matches!(
                    self.next_token.kind,
                    TokenKind::Variable | TokenKind::Ampersand
                ) =>
            {
                self.parse_static_vars()
            }
            TokenKind::Unset => self.parse_unset(),
            TokenKind::OpenBrace => self.parse_block(),
            TokenKind::SemiColon => {
                let span = self.current_token.span;
                self.bump();
                Stmt::Nop { span }
            }
            TokenKind::CloseBrace => {
                let span = self.current_token.span;
                self.error(span, "Unexpected '}'");
                self.bump();
                Stmt::Error { span }
            }
            TokenKind::CloseTag | TokenKind::OpenTag => {
                let span = self.current_token.span;
                self.bump();
                Stmt::Nop { span }
            }
            TokenKind::InlineHtml => {
                let span = self.current_token.span;
                self.bump();
                Stmt::InlineHtml { span }
            }
            _ => {
                let start = self.current_token.span.start;
                let expr = self.parse_expr(0);
                self.expect_semicolon();
                Stmt::Expression {
                    expr,
                    span: Span::new(start, self.current_token.span.start),
                }
            }
        }
    }

    pub(super) fn parse_class_modifiers(&mut self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        while matches!(
            self.current_token.kind,
            TokenKind::Final | TokenKind::Abstract | TokenKind::Readonly
        ) {
            modifiers.push(match self.current_token.kind {
                TokenKind::Final => Modifier::Final,
                TokenKind::Abstract => Modifier::Abstract,
                _ => Modifier::Readonly,
            });
            self.bump();
        }
        modifiers
    }

    fn parse_echo(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();

        let mut exprs = vec![self.parse_expr(0)];
        while self.current_token.kind == TokenKind::Comma {
            self.bump();
            exprs.push(self.parse_expr(0));
        }
        self.expect_semicolon();

        Stmt::Echo {
            exprs,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_return(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();

        let expr = if matches!(
            self.current_token.kind,
            TokenKind::SemiColon | TokenKind::CloseTag | TokenKind::Eof | TokenKind::CloseBrace
        ) {
            None
        } else {
            Some(self.parse_expr(0))
        };
        self.expect_semicolon();

        Stmt::Return {
            expr,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    pub(super) fn parse_block(&mut self) -> Stmt {
        let start = self.current_token.span.start;

        if !self.expect(TokenKind::OpenBrace, "Expected '{'") {
            return Stmt::Error {
                span: self.current_token.span,
            };
        }

        let mut statements = Vec::new();
        while self.current_token.kind != TokenKind::CloseBrace
            && self.current_token.kind != TokenKind::Eof
        {
            statements.push(self.parse_stmt());
        }
        let end = self.current_token.span.end;
        if self.current_token.kind == TokenKind::CloseBrace {
            self.bump();
        } else {
            self.error(self.current_token.span, "Missing '}'");
        }

        Stmt::Block {
            statements,
            span: Span::new(start, end),
        }
    }

    /// Parse either a `{ ... }` block or a single statement, returning the
    /// flattened statement list.
    pub(super) fn parse_body(&mut self) -> Vec<Stmt> {
        if self.current_token.kind == TokenKind::OpenBrace {
            match self.parse_block() {
                Stmt::Block { statements, .. } => statements,
                other => vec![other],
            }
        } else {
            vec![self.parse_stmt()]
        }
    }

    fn parse_namespace(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();

        let name = if matches!(
            self.current_token.kind,
            TokenKind::Identifier | TokenKind::NsSeparator
        ) {
            Some(self.parse_name())
        } else {
            None
        };

        let body = if self.current_token.kind == TokenKind::OpenBrace {
            self.bump();
            let mut statements = Vec::new();
            while self.current_token.kind != TokenKind::CloseBrace
                && self.current_token.kind != TokenKind::Eof
            {
                statements.push(self.parse_top_stmt());
            }
            if self.current_token.kind == TokenKind::CloseBrace {
                self.bump();
            } else {
                self.error(self.current_token.span, "Missing '}'");
            }
            Some(statements)
        } else {
            self.expect_semicolon();
            None
        };

        Stmt::Namespace {
            name,
            body,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_use(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();

        let kind = if self.current_token.kind == TokenKind::Function {
            self.bump();
            UseKind::Function
        } else if self.current_token.kind == TokenKind::Const {
            self.bump();
            UseKind::Const
        } else {
            UseKind::Normal
        };

        let mut uses = Vec::new();
        loop {
            let prefix = self.parse_name();

            if self.current_token.kind == TokenKind::OpenBrace {
                // Group use: `use Foo\{Bar, baz\Qux as Q};`
                self.bump();
                while self.current_token.kind != TokenKind::CloseBrace
                    && self.current_token.kind != TokenKind::Eof
                {
                    let mut element_kind = kind;
                    if matches!(
                        self.current_token.kind,
                        TokenKind::Function | TokenKind::Const
                    ) {
                        element_kind = if self.current_token.kind == TokenKind::Function {
                            UseKind::Function
                        } else {
                            UseKind::Const
                        };
                        self.bump();
                    }
                    let suffix = self.parse_name();
                    let alias = self.parse_use_alias();

                    let mut full = prefix.clone();
                    full.parts.extend(suffix.parts.iter().cloned());
                    full.span = Span::new(prefix.span.start, suffix.span.end);

                    let span = Span::new(
                        prefix.span.start,
                        alias.as_ref().map(|a| a.span.end).unwrap_or(suffix.span.end),
                    );
                    uses.push(UseItem {
                        name: full,
                        alias,
                        kind: element_kind,
                        span,
                    });

                    if self.current_token.kind == TokenKind::Comma {
                        self.bump();
                    } else {
                        break;
                    }
                }
                if self.current_token.kind == TokenKind::CloseBrace {
                    self.bump();
                } else {
                    self.error(self.current_token.span, "Missing '}'");
                }
            } else {
                let alias = self.parse_use_alias();
                let span = Span::new(
                    prefix.span.start,
                    alias.as_ref().map(|a| a.span.end).unwrap_or(prefix.span.end),
                );
                uses.push(UseItem {
                    name: prefix,
                    alias,
                    kind,
                    span,
                });
            }

            if self.current_token.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }

        self.expect_semicolon();

        Stmt::Use {
            uses,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_use_alias(&mut self) -> Option<Ident> {
        if self.current_token.kind == TokenKind::As {
            self.bump();
            if self.current_token.kind == TokenKind::Identifier {
                Some(self.eat_ident())
            } else {
                self.error(self.current_token.span, "Expected alias name");
                None
            }
        } else {
            None
        }
    }

    fn parse_try(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();

        let body = self.parse_body();

        let mut catches = Vec::new();
        while self.current_token.kind == TokenKind::Catch {
            let catch_start = self.current_token.span.start;
            self.bump();
            self.expect(TokenKind::OpenParen, "Expected '(' after catch");

            let mut types = Vec::new();
            loop {
                types.push(self.parse_name());
                if self.current_token.kind == TokenKind::Pipe {
                    self.bump();
                    continue;
                }
                break;
            }

            let var = if self.current_token.kind == TokenKind::Variable {
                let name = self.text(self.current_token.span);
                self.bump();
                Some(name)
            } else {
                None
            };
            self.expect(TokenKind::CloseParen, "Expected ')' after catch clause");

            let catch_body = self.parse_body();
            catches.push(Catch {
                types,
                var,
                body: catch_body,
                span: Span::new(catch_start, self.current_token.span.start),
            });
        }

        let finally = if self.current_token.kind == TokenKind::Finally {
            self.bump();
            Some(self.parse_body())
        } else {
            None
        };

        Stmt::Try {
            body,
            catches,
            finally,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_throw(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();
        let expr = self.parse_expr(0);
        self.expect_semicolon();

        Stmt::Throw {
            expr,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_const_stmt(
        &mut self,
        attributes: Vec<crate::parser::ast::AttributeGroup>,
        doc_comment: Option<Span>,
    ) -> Stmt {
        let start = if let Some(doc) = doc_comment {
            doc.start
        } else if let Some(first) = attributes.first() {
            first.span.start
        } else {
            self.current_token.span.start
        };
        self.bump();

        let mut consts = Vec::new();
        loop {
            let name = if self.current_token.kind == TokenKind::Identifier {
                self.eat_ident()
            } else {
                self.error(self.current_token.span, "Expected constant name");
                self.missing_ident()
            };

            if !self.expect(TokenKind::Eq, "Expected '=' in constant declaration") {
                self.sync_to_statement_end();
                break;
            }
            let value = self.parse_expr(0);
            let span = Span::new(name.span.start, value.span().end);
            consts.push(ConstEntry { name, value, span });

            if self.current_token.kind == TokenKind::Comma {
                self.bump();
                continue;
            }
            break;
        }

        self.expect_semicolon();

        Stmt::Const {
            attributes,
            consts,
            doc_comment,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_declare(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();
        self.expect(TokenKind::OpenParen, "Expected '(' after declare");
        while self.current_token.kind != TokenKind::CloseParen
            && self.current_token.kind != TokenKind::Eof
        {
            self.bump();
        }
        if self.current_token.kind == TokenKind::CloseParen {
            self.bump();
        }

        let body = if self.current_token.kind == TokenKind::OpenBrace {
            self.parse_body()
        } else {
            self.expect_semicolon();
            Vec::new()
        };

        Stmt::Declare {
            body,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_global(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();

        let mut vars = Vec::new();
        loop {
            vars.push(self.parse_expr(0));
            if self.current_token.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }
        self.expect_semicolon();

        Stmt::Global {
            vars,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_static_vars(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();

        let mut vars = Vec::new();
        loop {
            let var_start = self.current_token.span.start;
            let name = if self.current_token.kind == TokenKind::Variable {
                let name = self.text(self.current_token.span);
                self.bump();
                name
            } else {
                self.error(self.current_token.span, "Expected variable");
                String::new()
            };

            let default = if self.current_token.kind == TokenKind::Eq {
                self.bump();
                Some(self.parse_expr(0))
            } else {
                None
            };

            let end = default
                .as_ref()
                .map(|e| e.span().end)
                .unwrap_or(self.current_token.span.start);
            vars.push(StaticVar {
                name,
                default,
                span: Span::new(var_start, end),
            });

            if self.current_token.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }
        self.expect_semicolon();

        Stmt::StaticVars {
            vars,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_unset(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();
        self.expect(TokenKind::OpenParen, "Expected '(' after unset");

        let mut vars = Vec::new();
        loop {
            vars.push(self.parse_expr(0));
            if self.current_token.kind == TokenKind::Comma {
                self.bump();
                if self.current_token.kind == TokenKind::CloseParen {
                    break;
                }
            } else {
                break;
            }
        }
        if self.current_token.kind == TokenKind::CloseParen {
            self.bump();
        }
        self.expect_semicolon();

        Stmt::Unset {
            vars,
            span: Span::new(start, self.current_token.span.start),
        }
    }
}
