use super::Parser;
use crate::parser::ast::{Attribute, AttributeGroup};
use crate::parser::lexer::token::TokenKind;
use crate::parser::span::Span;

impl<'src> Parser<'src> {
    pub(super) fn parse_attributes(&mut self) -> Vec<AttributeGroup> {
        let mut groups = Vec::new();
        while self.current_token.kind == TokenKind::Attribute {
            let start = self.current_token.span.start;
            self.bump(); // Eat #[

            let mut attributes = Vec::new();
            loop {
                let name = self.parse_name();

                let args = if self.current_token.kind == TokenKind::OpenParen {
                    self.parse_call_arguments().0
                } else {
                    Vec::new()
                };

                let span = Span::new(name.span.start, self.current_token.span.start);
                attributes.push(Attribute { name, args, span });

                if self.current_token.kind == TokenKind::Comma {
                    self.bump();
                    // Trailing comma before the closing bracket.
                    if self.current_token.kind == TokenKind::CloseBracket {
                        break;
                    }
                } else {
                    break;
                }
            }

            let end = self.current_token.span.end;
            if self.current_token.kind == TokenKind::CloseBracket {
                self.bump();
            } else {
                self.error(self.current_token.span, "Expected ']' after attributes");
            }

            groups.push(AttributeGroup {
                attributes,
                span: Span::new(start, end),
            });
        }
        groups
    }
}
