use super::Parser;
use crate::parser::ast::{Case, Stmt};
use crate::parser::lexer::token::TokenKind;
use crate::parser::span::Span;

impl<'src> Parser<'src> {
    pub(super) fn parse_if(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();
        self.expect(TokenKind::OpenParen, "Expected '(' after if");
        let condition = self.parse_expr(0);
        self.expect(TokenKind::CloseParen, "Expected ')' after condition");

        // Alternative syntax: `if (...): ... endif;`
        if self.current_token.kind == TokenKind::Colon {
            self.bump();
            let mut then_block = Vec::new();
            while !matches!(
                self.current_token.kind,
                TokenKind::ElseIf | TokenKind::Else | TokenKind::EndIf | TokenKind::Eof
            ) {
                then_block.push(self.parse_stmt());
            }
            let else_block = self.parse_alt_else(start);
            if self.current_token.kind == TokenKind::EndIf {
                self.bump();
                self.expect_semicolon();
            }
            return Stmt::If {
                condition,
                then_block,
                else_block,
                span: Span::new(start, self.current_token.span.start),
            };
        }

        let then_block = self.parse_body();

        let else_block = if self.current_token.kind == TokenKind::ElseIf {
            Some(vec![self.parse_if_from_elseif()])
        } else if self.current_token.kind == TokenKind::Else {
            self.bump();
            if self.current_token.kind == TokenKind::If {
                Some(vec![self.parse_if()])
            } else {
                Some(self.parse_body())
            }
        } else {
            None
        };

        Stmt::If {
            condition,
            then_block,
            else_block,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    /// `elseif` behaves as `else { if ... }`.
    fn parse_if_from_elseif(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();
        self.expect(TokenKind::OpenParen, "Expected '(' after elseif");
        let condition = self.parse_expr(0);
        self.expect(TokenKind::CloseParen, "Expected ')' after condition");
        let then_block = self.parse_body();

        let else_block = if self.current_token.kind == TokenKind::ElseIf {
            Some(vec![self.parse_if_from_elseif()])
        } else if self.current_token.kind == TokenKind::Else {
            self.bump();
            Some(self.parse_body())
        } else {
            None
        };

        Stmt::If {
            condition,
            then_block,
            else_block,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_alt_else(&mut self, start: usize) -> Option<Vec<Stmt>> {
        if self.current_token.kind == TokenKind::ElseIf {
            self.bump();
            self.expect(TokenKind::OpenParen, "Expected '(' after elseif");
            let condition = self.parse_expr(0);
            self.expect(TokenKind::CloseParen, "Expected ')' after condition");
            self.expect(TokenKind::Colon, "Expected ':' in alternative syntax");
            let mut then_block = Vec::new();
            while !matches!(
                self.current_token.kind,
                TokenKind::ElseIf | TokenKind::Else | TokenKind::EndIf | TokenKind::Eof
            ) {
                then_block.push(self.parse_stmt());
            }
            let else_block = self.parse_alt_else(start);
            return Some(vec![Stmt::If {
                condition,
                then_block,
                else_block,
                span: Span::new(start, self.current_token.span.start),
            }]);
        }
        if self.current_token.kind == TokenKind::Else {
            self.bump();
            self.expect(TokenKind::Colon, "Expected ':' in alternative syntax");
            let mut body = Vec::new();
            while !matches!(self.current_token.kind, TokenKind::EndIf | TokenKind::Eof) {
                body.push(self.parse_stmt());
            }
            return Some(body);
        }
        None
    }

    pub(super) fn parse_while(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();
        self.expect(TokenKind::OpenParen, "Expected '(' after while");
        let condition = self.parse_expr(0);
        self.expect(TokenKind::CloseParen, "Expected ')' after condition");

        let body = if self.current_token.kind == TokenKind::Colon {
            self.bump();
            let mut body = Vec::new();
            while !matches!(self.current_token.kind, TokenKind::EndWhile | TokenKind::Eof) {
                body.push(self.parse_stmt());
            }
            if self.current_token.kind == TokenKind::EndWhile {
                self.bump();
                self.expect_semicolon();
            }
            body
        } else {
            self.parse_body()
        };

        Stmt::While {
            condition,
            body,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    pub(super) fn parse_do_while(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();
        let body = self.parse_body();
        self.expect(TokenKind::While, "Expected 'while' after do block");
        self.expect(TokenKind::OpenParen, "Expected '(' after while");
        let condition = self.parse_expr(0);
        self.expect(TokenKind::CloseParen, "Expected ')' after condition");
        self.expect_semicolon();

        Stmt::DoWhile {
            body,
            condition,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    pub(super) fn parse_for(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();
        self.expect(TokenKind::OpenParen, "Expected '(' after for");

        let init = self.parse_for_expr_list(TokenKind::SemiColon);
        self.expect(TokenKind::SemiColon, "Expected ';' in for");
        let condition = self.parse_for_expr_list(TokenKind::SemiColon);
        self.expect(TokenKind::SemiColon, "Expected ';' in for");
        let loop_expr = self.parse_for_expr_list(TokenKind::CloseParen);
        self.expect(TokenKind::CloseParen, "Expected ')' after for");

        let body = if self.current_token.kind == TokenKind::Colon {
            self.bump();
            let mut body = Vec::new();
            while !matches!(self.current_token.kind, TokenKind::EndFor | TokenKind::Eof) {
                body.push(self.parse_stmt());
            }
            if self.current_token.kind == TokenKind::EndFor {
                self.bump();
                self.expect_semicolon();
            }
            body
        } else {
            self.parse_body()
        };

        Stmt::For {
            init,
            condition,
            loop_expr,
            body,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_for_expr_list(&mut self, terminator: TokenKind) -> Vec<crate::parser::ast::Expr> {
        let mut exprs = Vec::new();
        if self.current_token.kind == terminator {
            return exprs;
        }
        loop {
            exprs.push(self.parse_expr(0));
            if self.current_token.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }
        exprs
    }

    pub(super) fn parse_foreach(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();
        self.expect(TokenKind::OpenParen, "Expected '(' after foreach");
        let expr = self.parse_expr(0);
        self.expect(TokenKind::As, "Expected 'as' in foreach");

        let mut by_ref = false;
        if self.current_token.kind == TokenKind::Ampersand {
            by_ref = true;
            self.bump();
        }
        let first = self.parse_expr(0);

        let (key_var, value_var) = if self.current_token.kind == TokenKind::DoubleArrow {
            self.bump();
            if self.current_token.kind == TokenKind::Ampersand {
                by_ref = true;
                self.bump();
            }
            (Some(first), self.parse_expr(0))
        } else {
            (None, first)
        };
        self.expect(TokenKind::CloseParen, "Expected ')' after foreach");

        let body = if self.current_token.kind == TokenKind::Colon {
            self.bump();
            let mut body = Vec::new();
            while !matches!(
                self.current_token.kind,
                TokenKind::EndForeach | TokenKind::Eof
            ) {
                body.push(self.parse_stmt());
            }
            if self.current_token.kind == TokenKind::EndForeach {
                self.bump();
                self.expect_semicolon();
            }
            body
        } else {
            self.parse_body()
        };

        Stmt::Foreach {
            expr,
            key_var,
            by_ref,
            value_var,
            body,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    pub(super) fn parse_switch(&mut self) -> Stmt {
        let start = self.current_token.span.start;
        self.bump();
        self.expect(TokenKind::OpenParen, "Expected '(' after switch");
        let condition = self.parse_expr(0);
        self.expect(TokenKind::CloseParen, "Expected ')' after condition");

        let alternative = if self.current_token.kind == TokenKind::Colon {
            self.bump();
            true
        } else {
            self.expect(TokenKind::OpenBrace, "Expected '{' after switch");
            false
        };

        let mut cases = Vec::new();
        loop {
            match self.current_token.kind {
                TokenKind::Case => {
                    let case_start = self.current_token.span.start;
                    self.bump();
                    let condition = self.parse_expr(0);
                    if matches!(
                        self.current_token.kind,
                        TokenKind::Colon | TokenKind::SemiColon
                    ) {
                        self.bump();
                    }
                    let body = self.parse_case_body(alternative);
                    cases.push(Case {
                        condition: Some(condition),
                        body,
                        span: Span::new(case_start, self.current_token.span.start),
                    });
                }
                TokenKind::Default => {
                    let case_start = self.current_token.span.start;
                    self.bump();
                    if matches!(
                        self.current_token.kind,
                        TokenKind::Colon | TokenKind::SemiColon
                    ) {
                        self.bump();
                    }
                    let body = self.parse_case_body(alternative);
                    cases.push(Case {
                        condition: None,
                        body,
                        span: Span::new(case_start, self.current_token.span.start),
                    });
                }
                _ => break,
            }
        }

        if alternative {
            if self.current_token.kind == TokenKind::EndSwitch {
                self.bump();
                self.expect_semicolon();
            } else {
                self.error(self.current_token.span, "Expected 'endswitch'");
            }
        } else if self.current_token.kind == TokenKind::CloseBrace {
            self.bump();
        } else {
            self.error(self.current_token.span, "Missing '}'");
        }

        Stmt::Switch {
            condition,
            cases,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_case_body(&mut self, alternative: bool) -> Vec<Stmt> {
        let mut body = Vec::new();
        loop {
            match self.current_token.kind {
                TokenKind::Case | TokenKind::Default | TokenKind::Eof => break,
                TokenKind::CloseBrace if !alternative => break,
                TokenKind::EndSwitch if alternative => break,
                _ => body.push(self.parse_stmt()),
            }
        }
        body
    }
}
