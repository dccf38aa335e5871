use super::Parser;
use crate::parser::ast::{
    Arg, ArrayItem, AssignOp, AttributeGroup, BinaryOp, CastKind, ClosureUse, Expr, IncludeKind,
    MagicConstKind, MatchArm, Name, UnaryOp,
};
use crate::parser::lexer::{decode_string_literal, token::TokenKind};
use crate::parser::span::Span;
use smallvec::smallvec;

impl<'src> Parser<'src> {
    pub(super) fn parse_call_arguments(&mut self) -> (Vec<Arg>, Span) {
        let start = self.current_token.span.start;
        if self.current_token.kind != TokenKind::OpenParen {
            return (Vec::new(), Span::default());
        }
        self.bump();

        let mut args = Vec::new();
        let mut has_named = false;
        while !matches!(
            self.current_token.kind,
            TokenKind::CloseParen | TokenKind::Eof
        ) {
            let mut name = None;
            let mut unpack = false;
            let arg_start = self.current_token.span.start;

            if (self.current_token.kind == TokenKind::Identifier
                || self.current_token.kind.is_semi_reserved())
                && self.next_token.kind == TokenKind::Colon
            {
                name = Some(self.eat_ident());
                self.bump(); // Colon
                has_named = true;
            } else if self.current_token.kind == TokenKind::Ellipsis {
                if self.next_token.kind == TokenKind::CloseParen {
                    // First-class callable: `strlen(...)`.
                    let span = self.current_token.span;
                    self.bump();
                    args.push(Arg {
                        name: None,
                        value: Expr::VariadicPlaceholder { span },
                        unpack: false,
                        span,
                    });
                    continue;
                }
                unpack = true;
                self.bump();
            } else if has_named {
                self.error(
                    self.current_token.span,
                    "Cannot use positional argument after named argument",
                );
            }

            let value = self.parse_expr(0);
            let span = Span::new(arg_start, value.span().end);
            args.push(Arg {
                name,
                value,
                unpack,
                span,
            });

            if self.current_token.kind == TokenKind::Comma {
                self.bump();
                if self.current_token.kind == TokenKind::CloseParen {
                    break;
                }
            } else if self.current_token.kind != TokenKind::CloseParen {
                break;
            }
        }

        let end = self.current_token.span.end;
        if self.current_token.kind == TokenKind::CloseParen {
            self.bump();
        }
        (args, Span::new(start, end))
    }

    fn parse_use_list(&mut self) -> Vec<ClosureUse> {
        let mut uses = Vec::new();
        if self.current_token.kind != TokenKind::Use {
            return uses;
        }
        self.bump();
        self.expect(TokenKind::OpenParen, "Expected '(' after use");

        while !matches!(
            self.current_token.kind,
            TokenKind::CloseParen | TokenKind::Eof
        ) {
            let by_ref = if self.current_token.kind == TokenKind::Ampersand {
                self.bump();
                true
            } else {
                false
            };

            if self.current_token.kind == TokenKind::Variable {
                let span = self.current_token.span;
                let name = self.text(span).trim_start_matches('$').to_owned();
                self.bump();
                uses.push(ClosureUse { name, by_ref, span });
            } else {
                self.error(self.current_token.span, "Expected variable in use list");
                self.bump();
            }

            if self.current_token.kind == TokenKind::Comma {
                self.bump();
            }
        }
        if self.current_token.kind == TokenKind::CloseParen {
            self.bump();
        }
        uses
    }

    pub(super) fn parse_expr(&mut self, min_bp: u8) -> Expr {
        let mut left = self.parse_nud();

        loop {
            let op = match self.current_token.kind {
                TokenKind::Plus => BinaryOp::Plus,
                TokenKind::Minus => BinaryOp::Minus,
                TokenKind::Asterisk => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                TokenKind::Dot => BinaryOp::Concat,
                TokenKind::EqEq => BinaryOp::EqEq,
                TokenKind::EqEqEq => BinaryOp::EqEqEq,
                TokenKind::BangEq => BinaryOp::NotEq,
                TokenKind::BangEqEq => BinaryOp::NotEqEq,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::GtEq,
                TokenKind::AmpersandAmpersand => BinaryOp::And,
                TokenKind::PipePipe => BinaryOp::Or,
                TokenKind::Ampersand => BinaryOp::BitAnd,
                TokenKind::Pipe => BinaryOp::BitOr,
                TokenKind::Caret => BinaryOp::BitXor,
                TokenKind::LogicalAnd => BinaryOp::LogicalAnd,
                TokenKind::LogicalOr => BinaryOp::LogicalOr,
                TokenKind::LogicalXor => BinaryOp::LogicalXor,
                TokenKind::Coalesce => BinaryOp::Coalesce,
                TokenKind::Spaceship => BinaryOp::Spaceship,
                TokenKind::Pow => BinaryOp::Pow,
                TokenKind::Sl => BinaryOp::ShiftLeft,
                TokenKind::Sr => BinaryOp::ShiftRight,
                TokenKind::InstanceOf => BinaryOp::Instanceof,
                TokenKind::Question => {
                    let l_bp = 40;
                    if l_bp < min_bp {
                        break;
                    }
                    self.bump();

                    let if_true = if self.current_token.kind != TokenKind::Colon {
                        Some(Box::new(self.parse_expr(0)))
                    } else {
                        None
                    };
                    self.expect(TokenKind::Colon, "Expected ':' in ternary");
                    let if_false = self.parse_expr(l_bp - 1);

                    let span = Span::new(left.span().start, if_false.span().end);
                    left = Expr::Ternary {
                        condition: Box::new(left),
                        if_true,
                        if_false: Box::new(if_false),
                        span,
                    };
                    continue;
                }
                TokenKind::Eq => {
                    let l_bp = 35;
                    if l_bp < min_bp {
                        break;
                    }
                    self.bump();

                    if self.current_token.kind == TokenKind::Ampersand {
                        self.bump();
                        let right = self.parse_expr(l_bp - 1);
                        let span = Span::new(left.span().start, right.span().end);
                        left = Expr::AssignRef {
                            var: Box::new(left),
                            expr: Box::new(right),
                            span,
                        };
                        continue;
                    }

                    let right = self.parse_expr(l_bp - 1);
                    let span = Span::new(left.span().start, right.span().end);
                    left = Expr::Assign {
                        var: Box::new(left),
                        expr: Box::new(right),
                        span,
                    };
                    continue;
                }
                TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::MulEq
                | TokenKind::DivEq
                | TokenKind::ModEq
                | TokenKind::ConcatEq
                | TokenKind::AndEq
                | TokenKind::OrEq
                | TokenKind::XorEq
                | TokenKind::SlEq
                | TokenKind::SrEq
                | TokenKind::PowEq
                | TokenKind::CoalesceEq => {
                    let l_bp = 35;
                    if l_bp < min_bp {
                        break;
                    }
                    let op = match self.current_token.kind {
                        TokenKind::PlusEq => AssignOp::Plus,
                        TokenKind::MinusEq => AssignOp::Minus,
                        TokenKind::MulEq => AssignOp::Mul,
                        TokenKind::DivEq => AssignOp::Div,
                        TokenKind::ModEq => AssignOp::Mod,
                        TokenKind::ConcatEq => AssignOp::Concat,
                        TokenKind::AndEq => AssignOp::BitAnd,
                        TokenKind::OrEq => AssignOp::BitOr,
                        TokenKind::XorEq => AssignOp::BitXor,
                        TokenKind::SlEq => AssignOp::ShiftLeft,
                        TokenKind::SrEq => AssignOp::ShiftRight,
                        TokenKind::PowEq => AssignOp::Pow,
                        _ => AssignOp::Coalesce,
                    };
                    self.bump();
                    let right = self.parse_expr(l_bp - 1);
                    let span = Span::new(left.span().start, right.span().end);
                    left = Expr::AssignOp {
                        var: Box::new(left),
                        op,
                        expr: Box::new(right),
                        span,
                    };
                    continue;
                }
                TokenKind::OpenBracket => {
                    let l_bp = 210;
                    if l_bp < min_bp {
                        break;
                    }
                    self.bump();

                    let dim = if self.current_token.kind == TokenKind::CloseBracket {
                        None
                    } else {
                        Some(Box::new(self.parse_expr(0)))
                    };
                    let end = self.current_token.span.end;
                    if self.current_token.kind == TokenKind::CloseBracket {
                        self.bump();
                    } else {
                        self.error(self.current_token.span, "Expected ']'");
                    }

                    let span = Span::new(left.span().start, end);
                    left = Expr::ArrayDimFetch {
                        array: Box::new(left),
                        dim,
                        span,
                    };
                    continue;
                }
                TokenKind::Arrow | TokenKind::NullSafeArrow => {
                    let l_bp = 210;
                    if l_bp < min_bp {
                        break;
                    }
                    let nullsafe = self.current_token.kind == TokenKind::NullSafeArrow;
                    self.bump();

                    let member = self.parse_member_name();
                    if self.current_token.kind == TokenKind::OpenParen {
                        let (args, args_span) = self.parse_call_arguments();
                        let span = Span::new(left.span().start, args_span.end);
                        left = Expr::MethodCall {
                            target: Box::new(left),
                            method: Box::new(member),
                            args,
                            nullsafe,
                            span,
                        };
                    } else {
                        let span = Span::new(left.span().start, member.span().end);
                        left = Expr::PropertyFetch {
                            target: Box::new(left),
                            property: Box::new(member),
                            nullsafe,
                            span,
                        };
                    }
                    continue;
                }
                TokenKind::DoubleColon => {
                    let l_bp = 210;
                    if l_bp < min_bp {
                        break;
                    }
                    self.bump();

                    // `Foo::class` resolves the class name.
                    let member = if self.current_token.kind == TokenKind::Class {
                        let span = self.current_token.span;
                        self.bump();
                        Expr::Identifier {
                            name: "class".to_owned(),
                            span,
                        }
                    } else {
                        self.parse_member_name()
                    };

                    if self.current_token.kind == TokenKind::OpenParen {
                        let (args, args_span) = self.parse_call_arguments();
                        let span = Span::new(left.span().start, args_span.end);
                        left = Expr::StaticCall {
                            class: Box::new(left),
                            method: Box::new(member),
                            args,
                            span,
                        };
                    } else {
                        let span = Span::new(left.span().start, member.span().end);
                        left = Expr::ClassConstFetch {
                            class: Box::new(left),
                            constant: Box::new(member),
                            span,
                        };
                    }
                    continue;
                }
                TokenKind::OpenParen => {
                    let l_bp = 190;
                    if l_bp < min_bp {
                        break;
                    }
                    let (args, args_span) = self.parse_call_arguments();
                    let span = Span::new(left.span().start, args_span.end);
                    left = Expr::Call {
                        func: Box::new(left),
                        args,
                        span,
                    };
                    continue;
                }
                TokenKind::Inc => {
                    let l_bp = 180;
                    if l_bp < min_bp {
                        break;
                    }
                    let end = self.current_token.span.end;
                    self.bump();
                    let span = Span::new(left.span().start, end);
                    left = Expr::PostInc {
                        var: Box::new(left),
                        span,
                    };
                    continue;
                }
                TokenKind::Dec => {
                    let l_bp = 180;
                    if l_bp < min_bp {
                        break;
                    }
                    let end = self.current_token.span.end;
                    self.bump();
                    let span = Span::new(left.span().start, end);
                    left = Expr::PostDec {
                        var: Box::new(left),
                        span,
                    };
                    continue;
                }
                _ => break,
            };

            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }

            self.bump();
            let right = self.parse_expr(r_bp);
            let span = Span::new(left.span().start, right.span().end);
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            };
        }

        left
    }

    /// A member name after `->`, `?->`, or `::`.
    fn parse_member_name(&mut self) -> Expr {
        match self.current_token.kind {
            TokenKind::OpenBrace => {
                self.bump();
                let expr = self.parse_expr(0);
                if self.current_token.kind == TokenKind::CloseBrace {
                    self.bump();
                }
                expr
            }
            TokenKind::Variable => {
                let span = self.current_token.span;
                let name = self.text(span).trim_start_matches('$').to_owned();
                self.bump();
                Expr::Variable { name, span }
            }
            TokenKind::Dollar => {
                let start = self.current_token.span.start;
                self.bump();
                if self.current_token.kind == TokenKind::OpenBrace {
                    self.bump();
                    let expr = self.parse_expr(0);
                    if self.current_token.kind == TokenKind::CloseBrace {
                        self.bump();
                    }
                    let span = Span::new(start, self.current_token.span.start);
                    Expr::IndirectVariable {
                        name: Box::new(expr),
                        span,
                    }
                } else {
                    let span = Span::new(start, self.current_token.span.end);
                    Expr::Error { span }
                }
            }
            kind if kind == TokenKind::Identifier || kind.is_semi_reserved() => {
                let span = self.current_token.span;
                let name = self.text(span);
                self.bump();
                Expr::Identifier { name, span }
            }
            _ => {
                let span = self.current_token.span;
                self.error(span, "Expected member name");
                Expr::Error { span }
            }
        }
    }

    fn parse_nud(&mut self) -> Expr {
        let attributes = if self.current_token.kind == TokenKind::Attribute {
            self.parse_attributes()
        } else {
            Vec::new()
        };
        if !attributes.is_empty() {
            let start = attributes.first().map(|g| g.span.start).unwrap_or(0);
            return match self.current_token.kind {
                TokenKind::Function => {
                    self.bump();
                    self.parse_closure_expr(attributes, false, start)
                }
                TokenKind::Fn => {
                    self.bump();
                    self.parse_arrow_function(attributes, false, start)
                }
                TokenKind::Static => {
                    self.bump();
                    match self.current_token.kind {
                        TokenKind::Function => {
                            self.bump();
                            self.parse_closure_expr(attributes, true, start)
                        }
                        TokenKind::Fn => {
                            self.bump();
                            self.parse_arrow_function(attributes, true, start)
                        }
                        _ => {
                            let span = self.current_token.span;
                            self.error(span, "Expected closure after attributes");
                            Expr::Error { span }
                        }
                    }
                }
                _ => {
                    let span = self.current_token.span;
                    self.error(span, "Unexpected attributes in expression");
                    Expr::Error { span }
                }
            };
        }

        let token = self.current_token;
        match token.kind {
            TokenKind::Variable => {
                self.bump();
                Expr::Variable {
                    name: self.text(token.span).trim_start_matches('$').to_owned(),
                    span: token.span,
                }
            }
            TokenKind::Dollar => {
                let start = token.span.start;
                self.bump();
                if self.current_token.kind == TokenKind::OpenBrace {
                    self.bump();
                    let expr = self.parse_expr(0);
                    if self.current_token.kind == TokenKind::CloseBrace {
                        self.bump();
                    }
                    let span = Span::new(start, self.current_token.span.start);
                    Expr::IndirectVariable {
                        name: Box::new(expr),
                        span,
                    }
                } else {
                    let inner = self.parse_nud();
                    let span = Span::new(start, inner.span().end);
                    Expr::IndirectVariable {
                        name: Box::new(inner),
                        span,
                    }
                }
            }
            TokenKind::LNumber => {
                self.bump();
                Expr::Integer {
                    value: self.text(token.span),
                    span: token.span,
                }
            }
            TokenKind::DNumber => {
                self.bump();
                Expr::Float {
                    value: self.text(token.span),
                    span: token.span,
                }
            }
            TokenKind::StringLiteral => {
                self.bump();
                Expr::String {
                    value: decode_string_literal(self.lexer.slice(token.span)),
                    span: token.span,
                }
            }
            TokenKind::TypeTrue => {
                self.bump();
                Expr::Boolean {
                    value: true,
                    span: token.span,
                }
            }
            TokenKind::TypeFalse => {
                self.bump();
                Expr::Boolean {
                    value: false,
                    span: token.span,
                }
            }
            TokenKind::TypeNull => {
                self.bump();
                Expr::Null { span: token.span }
            }
            TokenKind::OpenParen => {
                self.bump();
                let expr = self.parse_expr(0);
                if self.current_token.kind == TokenKind::CloseParen {
                    self.bump();
                } else {
                    self.error(self.current_token.span, "Expected ')'");
                }
                expr
            }
            TokenKind::OpenBracket => {
                self.bump();
                self.parse_array_items(token.span.start, TokenKind::CloseBracket)
            }
            TokenKind::Array => {
                self.bump();
                if self.current_token.kind == TokenKind::OpenParen {
                    self.bump();
                    self.parse_array_items(token.span.start, TokenKind::CloseParen)
                } else {
                    Expr::ConstFetch {
                        name: Name {
                            parts: smallvec!["array".to_owned()],
                            leading_slash: false,
                            relative: false,
                            span: token.span,
                        },
                        span: token.span,
                    }
                }
            }
            TokenKind::List => {
                self.bump();
                if self.current_token.kind == TokenKind::OpenParen {
                    self.bump();
                    self.parse_array_items(token.span.start, TokenKind::CloseParen)
                } else {
                    let span = token.span;
                    self.error(span, "Expected '(' after list");
                    Expr::Error { span }
                }
            }
            TokenKind::Function => {
                self.bump();
                self.parse_closure_expr(Vec::new(), false, token.span.start)
            }
            TokenKind::Fn => {
                self.bump();
                self.parse_arrow_function(Vec::new(), false, token.span.start)
            }
            TokenKind::Static => match self.next_token.kind {
                TokenKind::Function => {
                    self.bump();
                    self.bump();
                    self.parse_closure_expr(Vec::new(), true, token.span.start)
                }
                TokenKind::Fn => {
                    self.bump();
                    self.bump();
                    self.parse_arrow_function(Vec::new(), true, token.span.start)
                }
                _ => {
                    self.bump();
                    Expr::ConstFetch {
                        name: Name {
                            parts: smallvec!["static".to_owned()],
                            leading_slash: false,
                            relative: false,
                            span: token.span,
                        },
                        span: token.span,
                    }
                }
            },
            TokenKind::New => self.parse_new(token.span.start),
            TokenKind::Match => self.parse_match(token.span.start),
            TokenKind::Clone => {
                self.bump();
                let expr = self.parse_expr(170);
                let span = Span::new(token.span.start, expr.span().end);
                Expr::Clone {
                    expr: Box::new(expr),
                    span,
                }
            }
            TokenKind::Throw => {
                self.bump();
                let expr = self.parse_expr(0);
                let span = Span::new(token.span.start, expr.span().end);
                Expr::Throw {
                    expr: Box::new(expr),
                    span,
                }
            }
            TokenKind::Print => {
                self.bump();
                let expr = self.parse_expr(31);
                let span = Span::new(token.span.start, expr.span().end);
                Expr::Print {
                    expr: Box::new(expr),
                    span,
                }
            }
            TokenKind::Yield => self.parse_yield(token.span.start),
            TokenKind::Empty => {
                self.bump();
                self.expect(TokenKind::OpenParen, "Expected '(' after empty");
                let expr = self.parse_expr(0);
                let end = self.current_token.span.end;
                if self.current_token.kind == TokenKind::CloseParen {
                    self.bump();
                }
                Expr::Empty {
                    expr: Box::new(expr),
                    span: Span::new(token.span.start, end),
                }
            }
            TokenKind::Isset => {
                self.bump();
                self.expect(TokenKind::OpenParen, "Expected '(' after isset");
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
                let end = self.current_token.span.end;
                if self.current_token.kind == TokenKind::CloseParen {
                    self.bump();
                }
                Expr::Isset {
                    vars,
                    span: Span::new(token.span.start, end),
                }
            }
            TokenKind::Eval => {
                self.bump();
                self.expect(TokenKind::OpenParen, "Expected '(' after eval");
                let expr = self.parse_expr(0);
                let end = self.current_token.span.end;
                if self.current_token.kind == TokenKind::CloseParen {
                    self.bump();
                }
                Expr::Eval {
                    expr: Box::new(expr),
                    span: Span::new(token.span.start, end),
                }
            }
            TokenKind::Exit | TokenKind::Die => {
                self.bump();
                let mut end = token.span.end;
                let expr = if self.current_token.kind == TokenKind::OpenParen {
                    self.bump();
                    let inner = if self.current_token.kind != TokenKind::CloseParen {
                        Some(Box::new(self.parse_expr(0)))
                    } else {
                        None
                    };
                    end = self.current_token.span.end;
                    if self.current_token.kind == TokenKind::CloseParen {
                        self.bump();
                    }
                    inner
                } else {
                    None
                };
                Expr::Exit {
                    expr,
                    span: Span::new(token.span.start, end),
                }
            }
            TokenKind::Include
            | TokenKind::IncludeOnce
            | TokenKind::Require
            | TokenKind::RequireOnce => {
                self.bump();
                let expr = self.parse_expr(0);
                let span = Span::new(token.span.start, expr.span().end);
                Expr::Include {
                    kind: match token.kind {
                        TokenKind::Include => IncludeKind::Include,
                        TokenKind::IncludeOnce => IncludeKind::IncludeOnce,
                        TokenKind::Require => IncludeKind::Require,
                        _ => IncludeKind::RequireOnce,
                    },
                    expr: Box::new(expr),
                    span,
                }
            }
            TokenKind::Line
            | TokenKind::File
            | TokenKind::Dir
            | TokenKind::ClassC
            | TokenKind::TraitC
            | TokenKind::MethodC
            | TokenKind::FuncC
            | TokenKind::NsC => {
                self.bump();
                Expr::MagicConst {
                    kind: match token.kind {
                        TokenKind::Line => MagicConstKind::Line,
                        TokenKind::File => MagicConstKind::File,
                        TokenKind::Dir => MagicConstKind::Dir,
                        TokenKind::ClassC => MagicConstKind::Class,
                        TokenKind::TraitC => MagicConstKind::Trait,
                        TokenKind::MethodC => MagicConstKind::Method,
                        TokenKind::FuncC => MagicConstKind::Function,
                        _ => MagicConstKind::Namespace,
                    },
                    span: token.span,
                }
            }
            TokenKind::IntCast
            | TokenKind::FloatCast
            | TokenKind::StringCast
            | TokenKind::ArrayCast
            | TokenKind::ObjectCast
            | TokenKind::BoolCast
            | TokenKind::UnsetCast => {
                self.bump();
                let expr = self.parse_expr(165);
                let span = Span::new(token.span.start, expr.span().end);
                Expr::Cast {
                    kind: match token.kind {
                        TokenKind::IntCast => CastKind::Int,
                        TokenKind::FloatCast => CastKind::Float,
                        TokenKind::StringCast => CastKind::String,
                        TokenKind::ArrayCast => CastKind::Array,
                        TokenKind::ObjectCast => CastKind::Object,
                        TokenKind::BoolCast => CastKind::Bool,
                        _ => CastKind::Unset,
                    },
                    expr: Box::new(expr),
                    span,
                }
            }
            TokenKind::Bang => {
                self.bump();
                let expr = self.parse_expr(160);
                let span = Span::new(token.span.start, expr.span().end);
                Expr::Unary {
                    op: UnaryOp::Not,
                    expr: Box::new(expr),
                    span,
                }
            }
            TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::BitNot
            | TokenKind::At
            | TokenKind::Inc
            | TokenKind::Dec
            | TokenKind::Ampersand => {
                self.bump();
                let op = match token.kind {
                    TokenKind::Minus => UnaryOp::Minus,
                    TokenKind::Plus => UnaryOp::Plus,
                    TokenKind::BitNot => UnaryOp::BitNot,
                    TokenKind::At => UnaryOp::ErrorSuppress,
                    TokenKind::Inc => UnaryOp::PreInc,
                    TokenKind::Dec => UnaryOp::PreDec,
                    _ => UnaryOp::Reference,
                };
                let expr = self.parse_expr(165);
                let span = Span::new(token.span.start, expr.span().end);
                Expr::Unary {
                    op,
                    expr: Box::new(expr),
                    span,
                }
            }
            kind if kind == TokenKind::Identifier
                || kind == TokenKind::NsSeparator
                || kind == TokenKind::Namespace
                || kind.is_semi_reserved() =>
            {
                let name = self.parse_name();
                if name.parts.is_empty() {
                    let span = self.current_token.span;
                    self.error(span, "Unexpected token in expression");
                    self.bump();
                    return Expr::Error { span };
                }
                let span = name.span;
                Expr::ConstFetch { name, span }
            }
            _ => {
                let span = token.span;
                self.error(span, "Unexpected token in expression");
                self.bump();
                Expr::Error { span }
            }
        }
    }

    fn parse_new(&mut self, start: usize) -> Expr {
        self.bump(); // eat new

        let attributes = if self.current_token.kind == TokenKind::Attribute {
            self.parse_attributes()
        } else {
            Vec::new()
        };

        if self.current_token.kind == TokenKind::Class {
            return self.parse_anonymous_class(attributes, start);
        }

        let class = match self.current_token.kind {
            TokenKind::Variable => {
                let span = self.current_token.span;
                let name = self.text(span).trim_start_matches('$').to_owned();
                self.bump();
                Expr::Variable { name, span }
            }
            TokenKind::OpenParen => {
                self.bump();
                let expr = self.parse_expr(0);
                if self.current_token.kind == TokenKind::CloseParen {
                    self.bump();
                }
                expr
            }
            _ => {
                let name = self.parse_name();
                if name.parts.is_empty() {
                    let span = self.current_token.span;
                    self.error(span, "Expected class name after new");
                    Expr::Error { span }
                } else {
                    let span = name.span;
                    Expr::ConstFetch { name, span }
                }
            }
        };

        // Static property access in the class position: `new $obj::$class`.
        let mut class = class;
        while matches!(
            self.current_token.kind,
            TokenKind::DoubleColon | TokenKind::Arrow | TokenKind::OpenBracket
        ) {
            match self.current_token.kind {
                TokenKind::DoubleColon | TokenKind::Arrow => {
                    let nullsafe = false;
                    let is_static = self.current_token.kind == TokenKind::DoubleColon;
                    self.bump();
                    let member = self.parse_member_name();
                    let span = Span::new(class.span().start, member.span().end);
                    class = if is_static {
                        Expr::ClassConstFetch {
                            class: Box::new(class),
                            constant: Box::new(member),
                            span,
                        }
                    } else {
                        Expr::PropertyFetch {
                            target: Box::new(class),
                            property: Box::new(member),
                            nullsafe,
                            span,
                        }
                    };
                }
                _ => {
                    self.bump();
                    let dim = if self.current_token.kind == TokenKind::CloseBracket {
                        None
                    } else {
                        Some(Box::new(self.parse_expr(0)))
                    };
                    let end = self.current_token.span.end;
                    if self.current_token.kind == TokenKind::CloseBracket {
                        self.bump();
                    }
                    let span = Span::new(class.span().start, end);
                    class = Expr::ArrayDimFetch {
                        array: Box::new(class),
                        dim,
                        span,
                    };
                }
            }
        }

        let (args, args_span) = if self.current_token.kind == TokenKind::OpenParen {
            self.parse_call_arguments()
        } else {
            (Vec::new(), Span::new(start, class.span().end))
        };

        let end = args_span.end.max(class.span().end);
        Expr::New {
            class: Box::new(class),
            args,
            span: Span::new(start, end),
        }
    }

    fn parse_match(&mut self, start: usize) -> Expr {
        self.bump(); // eat match
        self.expect(TokenKind::OpenParen, "Expected '(' after match");
        let condition = self.parse_expr(0);
        self.expect(TokenKind::CloseParen, "Expected ')' after match subject");
        self.expect(TokenKind::OpenBrace, "Expected '{' in match");

        let mut arms = Vec::new();
        while !matches!(
            self.current_token.kind,
            TokenKind::CloseBrace | TokenKind::Eof
        ) {
            let arm_start = self.current_token.span.start;
            let conditions = if self.current_token.kind == TokenKind::Default {
                self.bump();
                None
            } else {
                let mut conditions = Vec::new();
                loop {
                    conditions.push(self.parse_expr(0));
                    if self.current_token.kind == TokenKind::Comma {
                        self.bump();
                        if self.current_token.kind == TokenKind::DoubleArrow {
                            break;
                        }
                    } else {
                        break;
                    }
                }
                Some(conditions)
            };

            self.expect(TokenKind::DoubleArrow, "Expected '=>' in match arm");
            let body = self.parse_expr(0);
            let span = Span::new(arm_start, body.span().end);
            arms.push(MatchArm {
                conditions,
                body,
                span,
            });

            if self.current_token.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }

        let end = self.current_token.span.end;
        if self.current_token.kind == TokenKind::CloseBrace {
            self.bump();
        } else {
            self.error(self.current_token.span, "Missing '}' in match");
        }

        Expr::Match {
            condition: Box::new(condition),
            arms,
            span: Span::new(start, end),
        }
    }

    fn parse_yield(&mut self, start: usize) -> Expr {
        self.bump(); // eat yield

        let mut from = false;
        if self.current_token.kind == TokenKind::Identifier {
            let text = self.text(self.current_token.span);
            if text.eq_ignore_ascii_case("from") {
                from = true;
                self.bump();
            }
        }

        if from {
            let value = self.parse_expr(31);
            let span = Span::new(start, value.span().end);
            return Expr::Yield {
                key: None,
                value: Some(Box::new(value)),
                from: true,
                span,
            };
        }

        if matches!(
            self.current_token.kind,
            TokenKind::SemiColon
                | TokenKind::CloseTag
                | TokenKind::Eof
                | TokenKind::CloseBrace
                | TokenKind::CloseParen
                | TokenKind::Comma
        ) {
            let span = Span::new(start, self.current_token.span.start);
            return Expr::Yield {
                key: None,
                value: None,
                from: false,
                span,
            };
        }

        let first = self.parse_expr(31);
        let (key, value) = if self.current_token.kind == TokenKind::DoubleArrow {
            self.bump();
            let val = self.parse_expr(31);
            (Some(Box::new(first)), val)
        } else {
            (None, first)
        };
        let span = Span::new(start, value.span().end);
        Expr::Yield {
            key,
            value: Some(Box::new(value)),
            from: false,
            span,
        }
    }

    fn parse_array_items(&mut self, start: usize, terminator: TokenKind) -> Expr {
        let mut items = Vec::new();
        while self.current_token.kind != terminator && self.current_token.kind != TokenKind::Eof {
            let item_start = self.current_token.span.start;

            // Skipped entries in list destructuring: `[, $b] = ...`.
            if self.current_token.kind == TokenKind::Comma {
                self.bump();
                continue;
            }

            let unpack = if self.current_token.kind == TokenKind::Ellipsis {
                self.bump();
                true
            } else {
                false
            };
            let by_ref = if self.current_token.kind == TokenKind::Ampersand {
                self.bump();
                true
            } else {
                false
            };

            let first = self.parse_expr(0);
            let (key, value, by_ref) = if self.current_token.kind == TokenKind::DoubleArrow {
                self.bump();
                let value_by_ref = if self.current_token.kind == TokenKind::Ampersand {
                    self.bump();
                    true
                } else {
                    false
                };
                (Some(first), self.parse_expr(0), value_by_ref)
            } else {
                (None, first, by_ref)
            };

            let span = Span::new(item_start, value.span().end);
            items.push(ArrayItem {
                key,
                value,
                by_ref,
                unpack,
                span,
            });

            if self.current_token.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }

        let end = self.current_token.span.end;
        if self.current_token.kind == terminator {
            self.bump();
        } else {
            self.error(self.current_token.span, "Unterminated array literal");
        }

        Expr::Array {
            items,
            span: Span::new(start, end),
        }
    }

    pub(super) fn parse_closure_expr(
        &mut self,
        attributes: Vec<AttributeGroup>,
        is_static: bool,
        start: usize,
    ) -> Expr {
        let by_ref = if self.current_token.kind == TokenKind::Ampersand {
            self.bump();
            true
        } else {
            false
        };

        let params = self.parse_parameter_list();
        let uses = self.parse_use_list();
        let return_type = self.parse_return_type();

        let body = match self.parse_block() {
            crate::parser::ast::Stmt::Block { statements, .. } => statements,
            other => vec![other],
        };

        Expr::Closure {
            attributes,
            is_static,
            by_ref,
            params,
            uses,
            return_type,
            body,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    pub(super) fn parse_arrow_function(
        &mut self,
        attributes: Vec<AttributeGroup>,
        is_static: bool,
        start: usize,
    ) -> Expr {
        let by_ref = if self.current_token.kind == TokenKind::Ampersand {
            self.bump();
            true
        } else {
            false
        };

        let params = self.parse_parameter_list();
        let return_type = self.parse_return_type();
        self.expect(TokenKind::DoubleArrow, "Expected '=>' in arrow function");
        let expr = self.parse_expr(0);
        let span = Span::new(start, expr.span().end);

        Expr::ArrowFunction {
            attributes,
            is_static,
            by_ref,
            params,
            return_type,
            expr: Box::new(expr),
            span,
        }
    }
}

fn infix_binding_power(op: BinaryOp) -> (u8, u8) {
    match op {
        BinaryOp::LogicalOr => (10, 11),
        BinaryOp::LogicalXor => (12, 13),
        BinaryOp::LogicalAnd => (14, 15),
        BinaryOp::Coalesce => (45, 44),
        BinaryOp::Or => (50, 51),
        BinaryOp::And => (55, 56),
        BinaryOp::BitOr => (60, 61),
        BinaryOp::BitXor => (65, 66),
        BinaryOp::BitAnd => (70, 71),
        BinaryOp::EqEq
        | BinaryOp::NotEq
        | BinaryOp::EqEqEq
        | BinaryOp::NotEqEq => (80, 81),
        BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::Spaceship => (90, 91),
        BinaryOp::ShiftLeft | BinaryOp::ShiftRight => (100, 101),
        BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Concat => (110, 111),
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => (120, 121),
        BinaryOp::Instanceof => (150, 151),
        BinaryOp::Pow => (170, 169),
    }
}
