use super::Parser;
use crate::parser::ast::{Ident, Type};
use crate::parser::lexer::token::TokenKind;

impl<'src> Parser<'src> {
    fn parse_type_atomic(&mut self) -> Option<Type> {
        if self.current_token.kind == TokenKind::Question {
            self.bump();
            let ty = self.parse_type_atomic()?;
            Some(Type::Nullable(Box::new(ty)))
        } else if self.current_token.kind == TokenKind::OpenParen {
            // DNF parenthesized group: `(A&B)|C`
            self.bump();
            let ty = self.parse_type()?;
            if self.current_token.kind == TokenKind::CloseParen {
                self.bump();
            }
            Some(ty)
        } else if matches!(
            self.current_token.kind,
            TokenKind::Array
                | TokenKind::Static
                | TokenKind::TypeInt
                | TokenKind::TypeString
                | TokenKind::TypeBool
                | TokenKind::TypeFloat
                | TokenKind::TypeVoid
                | TokenKind::TypeObject
                | TokenKind::TypeMixed
                | TokenKind::TypeNever
                | TokenKind::TypeNull
                | TokenKind::TypeFalse
                | TokenKind::TypeTrue
                | TokenKind::TypeIterable
                | TokenKind::TypeCallable
        ) {
            let token = self.current_token;
            self.bump();
            Some(Type::Simple(Ident {
                name: self.text(token.span).to_ascii_lowercase(),
                span: token.span,
            }))
        } else if matches!(
            self.current_token.kind,
            TokenKind::Namespace | TokenKind::NsSeparator | TokenKind::Identifier
        ) || self.current_token.kind.is_semi_reserved()
        {
            Some(Type::Named(self.parse_name()))
        } else {
            None
        }
    }

    fn parse_type_intersection(&mut self) -> Option<Type> {
        let left = self.parse_type_atomic()?;

        if self.current_token.kind != TokenKind::Ampersand {
            return Some(left);
        }
        // Lookahead distinguishes `A&B $x` from a by-ref parameter `A &$x`.
        if !(self.next_token.kind == TokenKind::Identifier
            || self.next_token.kind == TokenKind::Question
            || self.next_token.kind == TokenKind::OpenParen
            || self.next_token.kind == TokenKind::NsSeparator
            || self.next_token.kind.is_semi_reserved())
        {
            return Some(left);
        }

        let mut types = vec![left];
        while self.current_token.kind == TokenKind::Ampersand {
            if !(self.next_token.kind == TokenKind::Identifier
                || self.next_token.kind == TokenKind::Question
                || self.next_token.kind == TokenKind::OpenParen
                || self.next_token.kind == TokenKind::NsSeparator
                || self.next_token.kind.is_semi_reserved())
            {
                break;
            }
            self.bump();
            if let Some(right) = self.parse_type_atomic() {
                types.push(right);
            } else {
                break;
            }
        }
        Some(Type::Intersection(types))
    }

    pub(super) fn parse_type(&mut self) -> Option<Type> {
        let left = self.parse_type_intersection()?;

        if self.current_token.kind != TokenKind::Pipe {
            return Some(left);
        }
        let mut types = vec![left];
        while self.current_token.kind == TokenKind::Pipe {
            self.bump();
            if let Some(right) = self.parse_type_intersection() {
                types.push(right);
            } else {
                break;
            }
        }
        Some(Type::Union(types))
    }

    pub(super) fn parse_return_type(&mut self) -> Option<Type> {
        if self.current_token.kind == TokenKind::Colon {
            self.bump();
            self.parse_type()
        } else {
            None
        }
    }
}
