use super::Parser;
use crate::parser::ast::{
    Arg, AttributeGroup, ClassMember, ConstEntry, Expr, Ident, Modifier, Name, Param,
    PropertyEntry, Stmt, TraitAdaptation,
};
use crate::parser::lexer::token::TokenKind;
use crate::parser::span::Span;

#[derive(Debug, Clone, Copy)]
pub(super) enum ClassMemberCtx {
    Class { is_abstract: bool },
    Interface,
    Trait,
    Enum { backed: bool },
}

impl<'src> Parser<'src> {
    pub(super) fn parse_class(
        &mut self,
        attributes: Vec<AttributeGroup>,
        modifiers: Vec<Modifier>,
        doc_comment: Option<Span>,
    ) -> Stmt {
        let start = if let Some(doc) = doc_comment {
            doc.start
        } else if let Some(first) = attributes.first() {
            first.span.start
        } else {
            self.current_token.span.start
        };
        self.bump(); // Eat class

        let name = if matches!(
            self.current_token.kind,
            TokenKind::Identifier | TokenKind::Enum | TokenKind::Match
        ) {
            self.eat_ident()
        } else {
            self.error(self.current_token.span, "Expected class name");
            self.missing_ident()
        };

        let mut extends = None;
        if self.current_token.kind == TokenKind::Extends {
            self.bump();
            extends = Some(self.parse_name());
        }

        let implements = self.parse_implements_list(&name);

        if self.current_token.kind != TokenKind::OpenBrace {
            self.error(self.current_token.span, "Expected '{'");
            return Stmt::Class {
                attributes,
                modifiers,
                name,
                extends,
                implements,
                members: Vec::new(),
                doc_comment,
                span: Span::new(start, self.current_token.span.end),
            };
        }
        self.bump();

        let class_is_abstract = modifiers.contains(&Modifier::Abstract);
        if modifiers.contains(&Modifier::Abstract) && modifiers.contains(&Modifier::Final) {
            self.error(name.span, "abstract and final cannot be combined");
        }

        let mut members = Vec::new();
        while !matches!(
            self.current_token.kind,
            TokenKind::CloseBrace | TokenKind::Eof | TokenKind::CloseTag
        ) {
            members.push(self.parse_class_member(ClassMemberCtx::Class {
                is_abstract: class_is_abstract,
            }));
        }

        let end = self.current_token.span.end;
        if self.current_token.kind == TokenKind::CloseBrace {
            self.bump();
        } else {
            self.error(self.current_token.span, "Missing '}'");
        }

        Stmt::Class {
            attributes,
            modifiers,
            name,
            extends,
            implements,
            members,
            doc_comment,
            span: Span::new(start, end),
        }
    }

    fn parse_implements_list(&mut self, name: &Ident) -> Vec<Name> {
        let mut implements = Vec::new();
        if self.current_token.kind == TokenKind::Implements {
            self.bump();
            loop {
                implements.push(self.parse_name());
                if self.current_token.kind == TokenKind::Comma {
                    self.bump();
                } else {
                    break;
                }
            }
            for (i, n) in implements.iter().enumerate() {
                if n.is_unqualified() && n.parts[0].eq_ignore_ascii_case(&name.name) {
                    self.error(n.span, "class cannot implement itself");
                }
                for prev in implements.iter().take(i) {
                    if prev.parts.len() == n.parts.len()
                        && prev
                            .parts
                            .iter()
                            .zip(n.parts.iter())
                            .all(|(a, b)| a.eq_ignore_ascii_case(b))
                    {
                        self.error(n.span, "duplicate interface in implements list");
                        break;
                    }
                }
            }
        }
        implements
    }

    pub(super) fn parse_anonymous_class(
        &mut self,
        attributes: Vec<AttributeGroup>,
        start: usize,
    ) -> Expr {
        self.bump(); // eat class

        let args = if self.current_token.kind == TokenKind::OpenParen {
            self.parse_call_arguments().0
        } else {
            Vec::new()
        };

        let mut extends = None;
        if self.current_token.kind == TokenKind::Extends {
            self.bump();
            extends = Some(self.parse_name());
        }

        let mut implements = Vec::new();
        if self.current_token.kind == TokenKind::Implements {
            self.bump();
            loop {
                implements.push(self.parse_name());
                if self.current_token.kind == TokenKind::Comma {
                    self.bump();
                } else {
                    break;
                }
            }
        }

        if self.current_token.kind != TokenKind::OpenBrace {
            self.error(self.current_token.span, "Expected '{'");
            return Expr::AnonymousClass {
                attributes,
                args,
                extends,
                implements,
                members: Vec::new(),
                span: Span::new(start, self.current_token.span.end),
            };
        }
        self.bump();

        let mut members = Vec::new();
        while !matches!(
            self.current_token.kind,
            TokenKind::CloseBrace | TokenKind::Eof | TokenKind::CloseTag
        ) {
            members.push(self.parse_class_member(ClassMemberCtx::Class { is_abstract: false }));
        }

        let end = self.current_token.span.end;
        if self.current_token.kind == TokenKind::CloseBrace {
            self.bump();
        } else {
            self.error(self.current_token.span, "Missing '}'");
        }

        Expr::AnonymousClass {
            attributes,
            args,
            extends,
            implements,
            members,
            span: Span::new(start, end),
        }
    }

    pub(super) fn parse_interface(
        &mut self,
        attributes: Vec<AttributeGroup>,
        doc_comment: Option<Span>,
    ) -> Stmt {
        let start = if let Some(doc) = doc_comment {
            doc.start
        } else if let Some(first) = attributes.first() {
            first.span.start
        } else {
            self.current_token.span.start
        };
        self.bump(); // Eat interface

        let name = if matches!(
            self.current_token.kind,
            TokenKind::Identifier | TokenKind::Match
        ) {
            self.eat_ident()
        } else {
            self.error(self.current_token.span, "Expected interface name");
            self.missing_ident()
        };

        let mut extends = Vec::new();
        if self.current_token.kind == TokenKind::Extends {
            self.bump();
            loop {
                extends.push(self.parse_name());
                if self.current_token.kind == TokenKind::Comma {
                    self.bump();
                } else {
                    break;
                }
            }
        }

        if self.current_token.kind != TokenKind::OpenBrace {
            self.error(self.current_token.span, "Expected '{'");
            return Stmt::Interface {
                attributes,
                name,
                extends,
                members: Vec::new(),
                doc_comment,
                span: Span::new(start, self.current_token.span.end),
            };
        }
        self.bump();

        let mut members = Vec::new();
        while !matches!(
            self.current_token.kind,
            TokenKind::CloseBrace | TokenKind::Eof | TokenKind::CloseTag
        ) {
            members.push(self.parse_class_member(ClassMemberCtx::Interface));
        }

        let end = self.current_token.span.end;
        if self.current_token.kind == TokenKind::CloseBrace {
            self.bump();
        } else {
            self.error(self.current_token.span, "Missing '}'");
        }

        Stmt::Interface {
            attributes,
            name,
            extends,
            members,
            doc_comment,
            span: Span::new(start, end),
        }
    }

    pub(super) fn parse_trait(
        &mut self,
        attributes: Vec<AttributeGroup>,
        doc_comment: Option<Span>,
    ) -> Stmt {
        let start = if let Some(doc) = doc_comment {
            doc.start
        } else if let Some(first) = attributes.first() {
            first.span.start
        } else {
            self.current_token.span.start
        };
        self.bump(); // Eat trait

        let name = if matches!(
            self.current_token.kind,
            TokenKind::Identifier | TokenKind::Match
        ) {
            self.eat_ident()
        } else {
            self.error(self.current_token.span, "Expected trait name");
            self.missing_ident()
        };

        if self.current_token.kind != TokenKind::OpenBrace {
            self.error(self.current_token.span, "Expected '{'");
            return Stmt::Trait {
                attributes,
                name,
                members: Vec::new(),
                doc_comment,
                span: Span::new(start, self.current_token.span.end),
            };
        }
        self.bump();

        let mut members = Vec::new();
        while !matches!(
            self.current_token.kind,
            TokenKind::CloseBrace | TokenKind::Eof | TokenKind::CloseTag
        ) {
            members.push(self.parse_class_member(ClassMemberCtx::Trait));
        }

        let end = self.current_token.span.end;
        if self.current_token.kind == TokenKind::CloseBrace {
            self.bump();
        } else {
            self.error(self.current_token.span, "Missing '}'");
        }

        Stmt::Trait {
            attributes,
            name,
            members,
            doc_comment,
            span: Span::new(start, end),
        }
    }

    pub(super) fn parse_enum(
        &mut self,
        attributes: Vec<AttributeGroup>,
        doc_comment: Option<Span>,
    ) -> Stmt {
        let start = if let Some(doc) = doc_comment {
            doc.start
        } else if let Some(first) = attributes.first() {
            first.span.start
        } else {
            self.current_token.span.start
        };
        self.bump(); // Eat enum

        let name = if self.current_token.kind == TokenKind::Identifier {
            self.eat_ident()
        } else {
            self.error(self.current_token.span, "Expected enum name");
            self.missing_ident()
        };

        let backed_type = if self.current_token.kind == TokenKind::Colon {
            self.bump();
            self.parse_type()
        } else {
            None
        };

        let implements = self.parse_implements_list(&name);

        if self.current_token.kind != TokenKind::OpenBrace {
            self.error(self.current_token.span, "Expected '{'");
            return Stmt::Enum {
                attributes,
                name,
                backed_type,
                implements,
                members: Vec::new(),
                doc_comment,
                span: Span::new(start, self.current_token.span.end),
            };
        }
        self.bump();

        let backed = backed_type.is_some();
        let mut members = Vec::new();
        while !matches!(
            self.current_token.kind,
            TokenKind::CloseBrace | TokenKind::Eof | TokenKind::CloseTag
        ) {
            members.push(self.parse_class_member(ClassMemberCtx::Enum { backed }));
        }

        let end = self.current_token.span.end;
        if self.current_token.kind == TokenKind::CloseBrace {
            self.bump();
        } else {
            self.error(self.current_token.span, "Missing '}'");
        }

        Stmt::Enum {
            attributes,
            name,
            backed_type,
            implements,
            members,
            doc_comment,
            span: Span::new(start, end),
        }
    }

    pub(super) fn parse_member_modifiers(&mut self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        while self.current_token.kind.is_modifier() {
            // `static` may begin a closure member initializer; only consume
            // it as a modifier when the member continues afterwards.
            let modifier = match self.current_token.kind {
                TokenKind::Public => Modifier::Public,
                TokenKind::Protected => Modifier::Protected,
                TokenKind::Private => Modifier::Private,
                TokenKind::Static => Modifier::Static,
                TokenKind::Abstract => Modifier::Abstract,
                TokenKind::Final => Modifier::Final,
                _ => Modifier::Readonly,
            };
            self.bump();
            modifiers.push(modifier);
        }
        self.validate_modifiers(&modifiers);
        modifiers
    }

    fn validate_modifiers(&mut self, modifiers: &[Modifier]) {
        let span = self.current_token.span;
        let visibility_count = modifiers
            .iter()
            .filter(|m| {
                matches!(
                    m,
                    Modifier::Public | Modifier::Protected | Modifier::Private
                )
            })
            .count();
        if visibility_count > 1 {
            self.error(span, "Multiple visibility modifiers");
        }
        for unique in [
            Modifier::Static,
            Modifier::Abstract,
            Modifier::Final,
            Modifier::Readonly,
        ] {
            if modifiers.iter().filter(|&&m| m == unique).count() > 1 {
                self.error(span, "Duplicate modifier");
            }
        }
        if modifiers.contains(&Modifier::Abstract) && modifiers.contains(&Modifier::Final) {
            self.error(span, "abstract and final cannot be combined");
        }
    }

    fn parse_class_member(&mut self, ctx: ClassMemberCtx) -> ClassMember {
        let doc_comment = self.current_doc_comment;
        let attributes = if self.current_token.kind == TokenKind::Attribute {
            self.parse_attributes()
        } else {
            Vec::new()
        };

        let start = if let Some(doc) = doc_comment {
            doc.start
        } else if let Some(first) = attributes.first() {
            first.span.start
        } else {
            self.current_token.span.start
        };

        let modifiers = self.parse_member_modifiers();

        if self.current_token.kind == TokenKind::Case && modifiers.is_empty() {
            return self.parse_enum_case(attributes, doc_comment, ctx, start);
        }

        if self.current_token.kind == TokenKind::Use && modifiers.is_empty() {
            return self.parse_trait_use(start);
        }

        if self.current_token.kind == TokenKind::Function {
            return self.parse_method(attributes, modifiers, doc_comment, ctx, start);
        }

        if self.current_token.kind == TokenKind::Const {
            return self.parse_class_const(attributes, modifiers, doc_comment, ctx, start);
        }

        self.parse_property(attributes, modifiers, doc_comment, ctx, start)
    }

    fn parse_enum_case(
        &mut self,
        attributes: Vec<AttributeGroup>,
        doc_comment: Option<Span>,
        ctx: ClassMemberCtx,
        start: usize,
    ) -> ClassMember {
        self.bump(); // eat case
        let name = if self.current_token.kind == TokenKind::Identifier
            || self.current_token.kind.is_semi_reserved()
        {
            self.eat_ident()
        } else {
            self.error(self.current_token.span, "Expected case name");
            self.missing_ident()
        };

        let value = if self.current_token.kind == TokenKind::Eq {
            self.bump();
            Some(self.parse_expr(0))
        } else {
            None
        };

        match ctx {
            ClassMemberCtx::Enum { backed: true } if value.is_none() => {
                self.error(name.span, "backed enum cases require a value");
            }
            ClassMemberCtx::Enum { backed: false } if value.is_some() => {
                self.error(name.span, "pure enum cases cannot have values");
            }
            ClassMemberCtx::Enum { .. } => {}
            _ => self.error(name.span, "case not allowed here"),
        }

        self.expect_semicolon();

        ClassMember::Case {
            attributes,
            name,
            value,
            doc_comment,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_trait_use(&mut self, start: usize) -> ClassMember {
        self.bump(); // eat use
        let mut traits = Vec::new();
        loop {
            traits.push(self.parse_name());
            if self.current_token.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }

        let mut adaptations = Vec::new();
        if self.current_token.kind == TokenKind::OpenBrace {
            self.bump();
            while !matches!(
                self.current_token.kind,
                TokenKind::CloseBrace | TokenKind::Eof
            ) {
                let adapt_start = self.current_token.span.start;
                let (trait_name, method) = self.parse_trait_method_ref();

                if self.current_token.kind == TokenKind::Insteadof {
                    self.bump();
                    let mut insteadof = Vec::new();
                    loop {
                        insteadof.push(self.parse_name());
                        if self.current_token.kind == TokenKind::Comma {
                            self.bump();
                            continue;
                        }
                        break;
                    }
                    match trait_name {
                        Some(trait_name) => adaptations.push(TraitAdaptation::Precedence {
                            trait_name,
                            method,
                            insteadof,
                            span: Span::new(adapt_start, self.current_token.span.start),
                        }),
                        None => self.error(
                            method.span,
                            "insteadof requires a qualified Trait::method reference",
                        ),
                    }
                } else if self.current_token.kind == TokenKind::As {
                    self.bump();
                    let visibility = match self.current_token.kind {
                        TokenKind::Public => Some(Modifier::Public),
                        TokenKind::Protected => Some(Modifier::Protected),
                        TokenKind::Private => Some(Modifier::Private),
                        _ => None,
                    };
                    if visibility.is_some() {
                        self.bump();
                    }

                    let alias = if self.current_token.kind == TokenKind::Identifier
                        || self.current_token.kind.is_semi_reserved()
                    {
                        Some(self.eat_ident())
                    } else {
                        None
                    };

                    if visibility.is_none() && alias.is_none() {
                        self.error(
                            self.current_token.span,
                            "Expected alias name or visibility after 'as'",
                        );
                    }

                    adaptations.push(TraitAdaptation::Alias {
                        trait_name,
                        method,
                        alias,
                        visibility,
                        span: Span::new(adapt_start, self.current_token.span.start),
                    });
                } else {
                    self.error(
                        self.current_token.span,
                        "Expected insteadof or as in trait adaptation",
                    );
                }

                self.expect_semicolon();
            }
            if self.current_token.kind == TokenKind::CloseBrace {
                self.bump();
            }
        } else {
            self.expect_semicolon();
        }

        ClassMember::TraitUse {
            traits,
            adaptations,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_trait_method_ref(&mut self) -> (Option<Name>, Ident) {
        let name = self.parse_name();

        if self.current_token.kind == TokenKind::DoubleColon {
            self.bump();
            let method = if self.current_token.kind == TokenKind::Identifier
                || self.current_token.kind.is_semi_reserved()
            {
                self.eat_ident()
            } else {
                self.error(self.current_token.span, "Expected method name");
                self.missing_ident()
            };
            return (Some(name), method);
        }

        if name.parts.len() > 1 {
            self.error(name.span, "Method name cannot be qualified");
        }
        let method = Ident {
            name: name.parts.first().cloned().unwrap_or_default(),
            span: name.span,
        };
        (None, method)
    }

    fn parse_method(
        &mut self,
        attributes: Vec<AttributeGroup>,
        modifiers: Vec<Modifier>,
        doc_comment: Option<Span>,
        ctx: ClassMemberCtx,
        start: usize,
    ) -> ClassMember {
        self.bump(); // eat function

        let by_ref = if self.current_token.kind == TokenKind::Ampersand {
            self.bump();
            true
        } else {
            false
        };

        let name = if self.current_token.kind == TokenKind::Identifier
            || self.current_token.kind.is_semi_reserved()
        {
            self.eat_ident()
        } else {
            self.error(self.current_token.span, "Expected method name");
            self.missing_ident()
        };

        let params = self.parse_parameter_list();
        let return_type = self.parse_return_type();

        let is_abstract =
            modifiers.contains(&Modifier::Abstract) || matches!(ctx, ClassMemberCtx::Interface);

        let body = if self.current_token.kind == TokenKind::OpenBrace {
            let block = self.parse_block();
            let statements = match block {
                Stmt::Block { statements, .. } => statements,
                other => vec![other],
            };
            if is_abstract {
                self.error(name.span, "abstract method cannot have a body");
            }
            Some(statements)
        } else {
            self.expect_semicolon();
            if !is_abstract {
                self.error(name.span, "non-abstract method must have a body");
            }
            None
        };

        if let ClassMemberCtx::Class { is_abstract: class_abstract } = ctx {
            if modifiers.contains(&Modifier::Abstract) && !class_abstract {
                self.error(name.span, "abstract method in non-abstract class");
            }
        }
        if matches!(ctx, ClassMemberCtx::Enum { .. }) && modifiers.contains(&Modifier::Abstract) {
            self.error(name.span, "abstract methods not allowed in enums");
        }
        if matches!(ctx, ClassMemberCtx::Interface)
            && modifiers
                .iter()
                .any(|m| matches!(m, Modifier::Protected | Modifier::Private | Modifier::Final))
        {
            self.error(name.span, "invalid modifier in interface method");
        }

        if !name.name.eq_ignore_ascii_case("__construct") {
            for param in &params {
                if !param.modifiers.is_empty() {
                    self.error(param.span, "property promotion is only allowed in constructors");
                    break;
                }
            }
        } else if matches!(ctx, ClassMemberCtx::Interface) {
            for param in &params {
                if !param.modifiers.is_empty() {
                    self.error(param.span, "property promotion not allowed in interfaces");
                    break;
                }
            }
        }

        ClassMember::Method {
            attributes,
            modifiers,
            name,
            by_ref,
            params,
            return_type,
            body,
            doc_comment,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_class_const(
        &mut self,
        attributes: Vec<AttributeGroup>,
        modifiers: Vec<Modifier>,
        doc_comment: Option<Span>,
        ctx: ClassMemberCtx,
        start: usize,
    ) -> ClassMember {
        self.bump(); // eat const

        if modifiers
            .iter()
            .any(|m| matches!(m, Modifier::Static | Modifier::Abstract | Modifier::Readonly))
        {
            self.error(
                self.current_token.span,
                "invalid modifier on class constant",
            );
        }
        if matches!(ctx, ClassMemberCtx::Interface)
            && modifiers
                .iter()
                .any(|m| matches!(m, Modifier::Protected | Modifier::Private))
        {
            self.error(self.current_token.span, "Interface constants must be public");
        }

        // An optional type may precede the first name: `const int FOO = 1;`.
        // When the next-but-one token is `=`, the current token is already
        // the constant name.
        let ty = if self.next_token.kind != TokenKind::Eq {
            self.parse_type()
        } else {
            None
        };

        let mut consts = Vec::new();
        loop {
            let name = if self.current_token.kind == TokenKind::Identifier
                || self.current_token.kind.is_semi_reserved()
            {
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

        ClassMember::Const {
            attributes,
            modifiers,
            ty,
            consts,
            doc_comment,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    fn parse_property(
        &mut self,
        attributes: Vec<AttributeGroup>,
        modifiers: Vec<Modifier>,
        doc_comment: Option<Span>,
        ctx: ClassMemberCtx,
        start: usize,
    ) -> ClassMember {
        if matches!(ctx, ClassMemberCtx::Enum { .. }) {
            self.error(self.current_token.span, "enums cannot declare properties");
        }
        if matches!(ctx, ClassMemberCtx::Interface) {
            self.error(
                self.current_token.span,
                "interfaces cannot declare properties",
            );
        }
        if modifiers.contains(&Modifier::Abstract) {
            self.error(
                self.current_token.span,
                "Properties cannot be declared abstract",
            );
        }
        if modifiers.contains(&Modifier::Readonly) && modifiers.contains(&Modifier::Static) {
            self.error(
                self.current_token.span,
                "readonly properties cannot be static",
            );
        }

        let ty = if self.current_token.kind != TokenKind::Variable {
            self.parse_type()
        } else {
            None
        };

        if modifiers.contains(&Modifier::Readonly) && ty.is_none() {
            self.error(self.current_token.span, "readonly property requires a type");
        }

        let mut entries = Vec::new();
        loop {
            let entry_start = self.current_token.span.start;
            let name = if self.current_token.kind == TokenKind::Variable {
                let text = self.text(self.current_token.span);
                self.bump();
                text.trim_start_matches('$').to_owned()
            } else {
                self.error(self.current_token.span, "Expected property variable");
                let is_terminator = matches!(
                    self.current_token.kind,
                    TokenKind::SemiColon
                        | TokenKind::CloseBrace
                        | TokenKind::CloseTag
                        | TokenKind::Eof
                );
                if !is_terminator {
                    self.bump();
                }
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
            entries.push(PropertyEntry {
                name,
                default,
                span: Span::new(entry_start, end),
            });

            if self.current_token.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }

        self.expect_semicolon();

        ClassMember::Property {
            attributes,
            modifiers,
            ty,
            entries,
            doc_comment,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    pub(super) fn parse_function(
        &mut self,
        attributes: Vec<AttributeGroup>,
        doc_comment: Option<Span>,
    ) -> Stmt {
        let start = if let Some(doc) = doc_comment {
            doc.start
        } else if let Some(first) = attributes.first() {
            first.span.start
        } else {
            self.current_token.span.start
        };
        self.bump(); // Eat function

        let by_ref = if self.current_token.kind == TokenKind::Ampersand {
            self.bump();
            true
        } else {
            false
        };

        let name = if self.current_token.kind == TokenKind::Identifier
            || self.current_token.kind == TokenKind::Readonly
        {
            self.eat_ident()
        } else {
            self.error(self.current_token.span, "Expected function name");
            self.missing_ident()
        };

        let params = self.parse_parameter_list();
        let return_type = self.parse_return_type();

        let body = self.parse_body();

        Stmt::Function {
            attributes,
            name,
            by_ref,
            params,
            return_type,
            body,
            doc_comment,
            span: Span::new(start, self.current_token.span.start),
        }
    }

    pub(super) fn parse_parameter_list(&mut self) -> Vec<Param> {
        if self.current_token.kind == TokenKind::OpenParen {
            self.bump();
        }
        let mut params = Vec::new();
        while !matches!(
            self.current_token.kind,
            TokenKind::CloseParen | TokenKind::Eof
        ) {
            params.push(self.parse_param());
            if self.current_token.kind == TokenKind::Comma {
                self.bump();
            }
        }
        if self.current_token.kind == TokenKind::CloseParen {
            self.bump();
        }
        params
    }

    fn parse_param(&mut self) -> Param {
        let attributes = if self.current_token.kind == TokenKind::Attribute {
            self.parse_attributes()
        } else {
            Vec::new()
        };

        let start = if let Some(first) = attributes.first() {
            first.span.start
        } else {
            self.current_token.span.start
        };

        let mut modifiers = Vec::new();
        while matches!(
            self.current_token.kind,
            TokenKind::Public | TokenKind::Protected | TokenKind::Private | TokenKind::Readonly
        ) {
            modifiers.push(match self.current_token.kind {
                TokenKind::Public => Modifier::Public,
                TokenKind::Protected => Modifier::Protected,
                TokenKind::Private => Modifier::Private,
                _ => Modifier::Readonly,
            });
            self.bump();
        }

        let ty = if self.current_token.kind != TokenKind::Variable {
            self.parse_type()
        } else {
            None
        };

        let by_ref = if self.current_token.kind == TokenKind::Ampersand {
            self.bump();
            true
        } else {
            false
        };

        let variadic = if self.current_token.kind == TokenKind::Ellipsis {
            self.bump();
            true
        } else {
            false
        };

        if self.current_token.kind == TokenKind::Variable {
            let name_span = self.current_token.span;
            let name = self.text(name_span).trim_start_matches('$').to_owned();
            self.bump();

            let default = if self.current_token.kind == TokenKind::Eq {
                self.bump();
                Some(self.parse_expr(0))
            } else {
                None
            };

            let end = default
                .as_ref()
                .map(|e| e.span().end)
                .unwrap_or(name_span.end);

            Param {
                attributes,
                modifiers,
                name,
                ty,
                default,
                by_ref,
                variadic,
                span: Span::new(start, end),
            }
        } else {
            let span = Span::new(start, self.current_token.span.end);
            self.error(span, "Expected parameter variable");
            self.bump();
            Param {
                attributes,
                modifiers,
                name: String::new(),
                ty: None,
                default: None,
                by_ref,
                variadic,
                span,
            }
        }
    }
}
