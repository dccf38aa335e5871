use crate::parser::span::{LineInfo, Span};
use serde::Serialize;
use smallvec::SmallVec;

pub mod visitor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub span: Span,
    pub message: &'static str,
}

impl ParseError {
    pub fn to_human_readable(&self, source: &[u8]) -> String {
        self.to_human_readable_with_path(source, None)
    }

    pub fn to_human_readable_with_path(&self, source: &[u8], path: Option<&str>) -> String {
        let Some(LineInfo {
            line,
            column,
            line_text,
        }) = self.span.line_info(source)
        else {
            return format!("error: {}", self.message);
        };

        let line_str = String::from_utf8_lossy(line_text);
        let gutter_width = line.to_string().len();
        let padding = std::cmp::min(line_text.len(), column.saturating_sub(1));
        let highlight_len = std::cmp::max(
            1,
            std::cmp::min(self.span.len(), line_text.len().saturating_sub(padding)),
        );

        let mut marker = String::new();
        marker.push_str(&" ".repeat(padding));
        marker.push_str(&"^".repeat(highlight_len));

        let location = match path {
            Some(path) => format!("{path}:{line}:{column}"),
            None => format!("line {line}, column {column}"),
        };

        format!(
            "error: {}\n --> {}\n{gutter}|\n{line_no:>width$} | {line_src}\n{gutter}| {marker}",
            self.message,
            location,
            gutter = " ".repeat(gutter_width + 1),
            line_no = line,
            width = gutter_width,
            line_src = line_str,
            marker = marker,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub errors: Vec<ParseError>,
    pub span: Span,
}

/// An identifier with its source span, already extracted to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// A possibly-qualified name. `leading_slash` marks fully-qualified names
/// (`\Foo\Bar`), `relative` marks `namespace\Foo` references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Name {
    pub parts: SmallVec<[String; 2]>,
    pub leading_slash: bool,
    pub relative: bool,
    pub span: Span,
}

impl Name {
    pub fn is_unqualified(&self) -> bool {
        !self.leading_slash && !self.relative && self.parts.len() == 1
    }

    pub fn joined(&self) -> String {
        self.parts.join("\\")
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.leading_slash {
            f.write_str("\\")?;
        } else if self.relative {
            f.write_str("namespace\\")?;
        }
        f.write_str(&self.joined())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Abstract,
    Final,
    Readonly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Echo {
        exprs: Vec<Expr>,
        span: Span,
    },
    Return {
        expr: Option<Expr>,
        span: Span,
    },
    If {
        condition: Expr,
        then_block: Vec<Stmt>,
        else_block: Option<Vec<Stmt>>,
        span: Span,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
        span: Span,
    },
    DoWhile {
        body: Vec<Stmt>,
        condition: Expr,
        span: Span,
    },
    For {
        init: Vec<Expr>,
        condition: Vec<Expr>,
        loop_expr: Vec<Expr>,
        body: Vec<Stmt>,
        span: Span,
    },
    Foreach {
        expr: Expr,
        key_var: Option<Expr>,
        by_ref: bool,
        value_var: Expr,
        body: Vec<Stmt>,
        span: Span,
    },
    Block {
        statements: Vec<Stmt>,
        span: Span,
    },
    Function {
        attributes: Vec<AttributeGroup>,
        name: Ident,
        by_ref: bool,
        params: Vec<Param>,
        return_type: Option<Type>,
        body: Vec<Stmt>,
        doc_comment: Option<Span>,
        span: Span,
    },
    Class {
        attributes: Vec<AttributeGroup>,
        modifiers: Vec<Modifier>,
        name: Ident,
        extends: Option<Name>,
        implements: Vec<Name>,
        members: Vec<ClassMember>,
        doc_comment: Option<Span>,
        span: Span,
    },
    Interface {
        attributes: Vec<AttributeGroup>,
        name: Ident,
        extends: Vec<Name>,
        members: Vec<ClassMember>,
        doc_comment: Option<Span>,
        span: Span,
    },
    Trait {
        attributes: Vec<AttributeGroup>,
        name: Ident,
        members: Vec<ClassMember>,
        doc_comment: Option<Span>,
        span: Span,
    },
    Enum {
        attributes: Vec<AttributeGroup>,
        name: Ident,
        backed_type: Option<Type>,
        implements: Vec<Name>,
        members: Vec<ClassMember>,
        doc_comment: Option<Span>,
        span: Span,
    },
    Namespace {
        name: Option<Name>,
        body: Option<Vec<Stmt>>,
        span: Span,
    },
    Use {
        uses: Vec<UseItem>,
        span: Span,
    },
    Switch {
        condition: Expr,
        cases: Vec<Case>,
        span: Span,
    },
    Try {
        body: Vec<Stmt>,
        catches: Vec<Catch>,
        finally: Option<Vec<Stmt>>,
        span: Span,
    },
    Throw {
        expr: Expr,
        span: Span,
    },
    Const {
        attributes: Vec<AttributeGroup>,
        consts: Vec<ConstEntry>,
        doc_comment: Option<Span>,
        span: Span,
    },
    Break {
        span: Span,
    },
    Continue {
        span: Span,
    },
    Goto {
        label: Ident,
        span: Span,
    },
    Label {
        name: Ident,
        span: Span,
    },
    Global {
        vars: Vec<Expr>,
        span: Span,
    },
    StaticVars {
        vars: Vec<StaticVar>,
        span: Span,
    },
    Unset {
        vars: Vec<Expr>,
        span: Span,
    },
    Expression {
        expr: Expr,
        span: Span,
    },
    InlineHtml {
        span: Span,
    },
    Declare {
        body: Vec<Stmt>,
        span: Span,
    },
    Nop {
        span: Span,
    },
    Error {
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticVar {
    pub name: String,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub attributes: Vec<AttributeGroup>,
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub ty: Option<Type>,
    pub default: Option<Expr>,
    pub by_ref: bool,
    pub variadic: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Assign {
        var: Box<Expr>,
        expr: Box<Expr>,
        span: Span,
    },
    AssignRef {
        var: Box<Expr>,
        expr: Box<Expr>,
        span: Span,
    },
    AssignOp {
        var: Box<Expr>,
        op: AssignOp,
        expr: Box<Expr>,
        span: Span,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
        span: Span,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
        span: Span,
    },
    Ternary {
        condition: Box<Expr>,
        if_true: Option<Box<Expr>>,
        if_false: Box<Expr>,
        span: Span,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Arg>,
        span: Span,
    },
    MethodCall {
        target: Box<Expr>,
        method: Box<Expr>,
        args: Vec<Arg>,
        nullsafe: bool,
        span: Span,
    },
    StaticCall {
        class: Box<Expr>,
        method: Box<Expr>,
        args: Vec<Arg>,
        span: Span,
    },
    PropertyFetch {
        target: Box<Expr>,
        property: Box<Expr>,
        nullsafe: bool,
        span: Span,
    },
    ClassConstFetch {
        class: Box<Expr>,
        constant: Box<Expr>,
        span: Span,
    },
    ArrayDimFetch {
        array: Box<Expr>,
        dim: Option<Box<Expr>>,
        span: Span,
    },
    Array {
        items: Vec<ArrayItem>,
        span: Span,
    },
    New {
        class: Box<Expr>,
        args: Vec<Arg>,
        span: Span,
    },
    AnonymousClass {
        attributes: Vec<AttributeGroup>,
        args: Vec<Arg>,
        extends: Option<Name>,
        implements: Vec<Name>,
        members: Vec<ClassMember>,
        span: Span,
    },
    Closure {
        attributes: Vec<AttributeGroup>,
        is_static: bool,
        by_ref: bool,
        params: Vec<Param>,
        uses: Vec<ClosureUse>,
        return_type: Option<Type>,
        body: Vec<Stmt>,
        span: Span,
    },
    ArrowFunction {
        attributes: Vec<AttributeGroup>,
        is_static: bool,
        by_ref: bool,
        params: Vec<Param>,
        return_type: Option<Type>,
        expr: Box<Expr>,
        span: Span,
    },
    Variable {
        name: String,
        span: Span,
    },
    IndirectVariable {
        name: Box<Expr>,
        span: Span,
    },
    /// A bare (possibly qualified) name in expression position: a constant
    /// reference, or a class name before `::`.
    ConstFetch {
        name: Name,
        span: Span,
    },
    /// A member name after `->` or `::`.
    Identifier {
        name: String,
        span: Span,
    },
    Integer {
        value: String,
        span: Span,
    },
    Float {
        value: String,
        span: Span,
    },
    Boolean {
        value: bool,
        span: Span,
    },
    Null {
        span: Span,
    },
    String {
        value: String,
        span: Span,
    },
    Match {
        condition: Box<Expr>,
        arms: Vec<MatchArm>,
        span: Span,
    },
    Cast {
        kind: CastKind,
        expr: Box<Expr>,
        span: Span,
    },
    Isset {
        vars: Vec<Expr>,
        span: Span,
    },
    Empty {
        expr: Box<Expr>,
        span: Span,
    },
    Eval {
        expr: Box<Expr>,
        span: Span,
    },
    Exit {
        expr: Option<Box<Expr>>,
        span: Span,
    },
    Include {
        kind: IncludeKind,
        expr: Box<Expr>,
        span: Span,
    },
    MagicConst {
        kind: MagicConstKind,
        span: Span,
    },
    Print {
        expr: Box<Expr>,
        span: Span,
    },
    Yield {
        key: Option<Box<Expr>>,
        value: Option<Box<Expr>>,
        from: bool,
        span: Span,
    },
    Clone {
        expr: Box<Expr>,
        span: Span,
    },
    Throw {
        expr: Box<Expr>,
        span: Span,
    },
    PostInc {
        var: Box<Expr>,
        span: Span,
    },
    PostDec {
        var: Box<Expr>,
        span: Span,
    },
    VariadicPlaceholder {
        span: Span,
    },
    Error {
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosureUse {
    pub name: String,
    pub by_ref: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CastKind {
    Int,
    Bool,
    Float,
    String,
    Array,
    Object,
    Unset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchArm {
    /// `None` for the `default` arm.
    pub conditions: Option<Vec<Expr>>,
    pub body: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    PreInc,
    PreDec,
    ErrorSuppress,
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Concat,
    EqEq,
    EqEqEq,
    NotEq,
    NotEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Coalesce,
    Spaceship,
    Pow,
    ShiftLeft,
    ShiftRight,
    LogicalAnd,
    LogicalOr,
    LogicalXor,
    Instanceof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Concat,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    Pow,
    Coalesce,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arg {
    pub name: Option<Ident>,
    pub value: Expr,
    pub unpack: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayItem {
    pub key: Option<Expr>,
    pub value: Expr,
    pub by_ref: bool,
    pub unpack: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyEntry {
    pub name: String,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ClassMember {
    Property {
        attributes: Vec<AttributeGroup>,
        modifiers: Vec<Modifier>,
        ty: Option<Type>,
        entries: Vec<PropertyEntry>,
        doc_comment: Option<Span>,
        span: Span,
    },
    Method {
        attributes: Vec<AttributeGroup>,
        modifiers: Vec<Modifier>,
        name: Ident,
        by_ref: bool,
        params: Vec<Param>,
        return_type: Option<Type>,
        body: Option<Vec<Stmt>>,
        doc_comment: Option<Span>,
        span: Span,
    },
    Const {
        attributes: Vec<AttributeGroup>,
        modifiers: Vec<Modifier>,
        ty: Option<Type>,
        consts: Vec<ConstEntry>,
        doc_comment: Option<Span>,
        span: Span,
    },
    TraitUse {
        traits: Vec<Name>,
        adaptations: Vec<TraitAdaptation>,
        span: Span,
    },
    Case {
        attributes: Vec<AttributeGroup>,
        name: Ident,
        value: Option<Expr>,
        doc_comment: Option<Span>,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Case {
    /// `None` for `default:`.
    pub condition: Option<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstEntry {
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TraitAdaptation {
    Precedence {
        trait_name: Name,
        method: Ident,
        insteadof: Vec<Name>,
        span: Span,
    },
    Alias {
        trait_name: Option<Name>,
        method: Ident,
        alias: Option<Ident>,
        visibility: Option<Modifier>,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catch {
    pub types: Vec<Name>,
    pub var: Option<String>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UseItem {
    pub name: Name,
    pub alias: Option<Ident>,
    pub kind: UseKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UseKind {
    Normal,
    Function,
    Const,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: Name,
    pub args: Vec<Arg>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeGroup {
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Type {
    Simple(Ident),
    Named(Name),
    Nullable(Box<Type>),
    Union(Vec<Type>),
    Intersection(Vec<Type>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IncludeKind {
    Include,
    IncludeOnce,
    Require,
    RequireOnce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MagicConstKind {
    Dir,
    File,
    Line,
    Function,
    Class,
    Trait,
    Method,
    Namespace,
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Assign { span, .. } => *span,
            Expr::AssignRef { span, .. } => *span,
            Expr::AssignOp { span, .. } => *span,
            Expr::Binary { span, .. } => *span,
            Expr::Unary { span, .. } => *span,
            Expr::Ternary { span, .. } => *span,
            Expr::Call { span, .. } => *span,
            Expr::MethodCall { span, .. } => *span,
            Expr::StaticCall { span, .. } => *span,
            Expr::PropertyFetch { span, .. } => *span,
            Expr::ClassConstFetch { span, .. } => *span,
            Expr::ArrayDimFetch { span, .. } => *span,
            Expr::Array { span, .. } => *span,
            Expr::New { span, .. } => *span,
            Expr::AnonymousClass { span, .. } => *span,
            Expr::Closure { span, .. } => *span,
            Expr::ArrowFunction { span, .. } => *span,
            Expr::Variable { span, .. } => *span,
            Expr::IndirectVariable { span, .. } => *span,
            Expr::ConstFetch { span, .. } => *span,
            Expr::Identifier { span, .. } => *span,
            Expr::Integer { span, .. } => *span,
            Expr::Float { span, .. } => *span,
            Expr::Boolean { span, .. } => *span,
            Expr::Null { span } => *span,
            Expr::String { span, .. } => *span,
            Expr::Match { span, .. } => *span,
            Expr::Cast { span, .. } => *span,
            Expr::Isset { span, .. } => *span,
            Expr::Empty { span, .. } => *span,
            Expr::Eval { span, .. } => *span,
            Expr::Exit { span, .. } => *span,
            Expr::Include { span, .. } => *span,
            Expr::MagicConst { span, .. } => *span,
            Expr::Print { span, .. } => *span,
            Expr::Yield { span, .. } => *span,
            Expr::Clone { span, .. } => *span,
            Expr::Throw { span, .. } => *span,
            Expr::PostInc { span, .. } => *span,
            Expr::PostDec { span, .. } => *span,
            Expr::VariadicPlaceholder { span } => *span,
            Expr::Error { span } => *span,
        }
    }
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Echo { span, .. } => *span,
            Stmt::Return { span, .. } => *span,
            Stmt::If { span, .. } => *span,
            Stmt::While { span, .. } => *span,
            Stmt::DoWhile { span, .. } => *span,
            Stmt::For { span, .. } => *span,
            Stmt::Foreach { span, .. } => *span,
            Stmt::Block { span, .. } => *span,
            Stmt::Function { span, .. } => *span,
            Stmt::Class { span, .. } => *span,
            Stmt::Interface { span, .. } => *span,
            Stmt::Trait { span, .. } => *span,
            Stmt::Enum { span, .. } => *span,
            Stmt::Namespace { span, .. } => *span,
            Stmt::Use { span, .. } => *span,
            Stmt::Switch { span, .. } => *span,
            Stmt::Try { span, .. } => *span,
            Stmt::Throw { span, .. } => *span,
            Stmt::Const { span, .. } => *span,
            Stmt::Break { span } => *span,
            Stmt::Continue { span } => *span,
            Stmt::Goto { span, .. } => *span,
            Stmt::Label { span, .. } => *span,
            Stmt::Global { span, .. } => *span,
            Stmt::StaticVars { span, .. } => *span,
            Stmt::Unset { span, .. } => *span,
            Stmt::Expression { span, .. } => *span,
            Stmt::InlineHtml { span } => *span,
            Stmt::Declare { span, .. } => *span,
            Stmt::Nop { span } => *span,
            Stmt::Error { span } => *span,
        }
    }
}

impl ClassMember {
    pub fn span(&self) -> Span {
        match self {
            ClassMember::Property { span, .. } => *span,
            ClassMember::Method { span, .. } => *span,
            ClassMember::Const { span, .. } => *span,
            ClassMember::TraitUse { span, .. } => *span,
            ClassMember::Case { span, .. } => *span,
        }
    }
}
