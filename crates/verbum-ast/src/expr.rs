//! Expression node variants (spec §3 "Expressions").

use crate::common::{Meta, TypeExpr};
use crate::stmt::{Block, Param};

/// Any expression. Composite nodes box their operands so the enum stays a
/// fixed size regardless of nesting depth.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(IdentifierExpr),
    Ego(Meta),
    Literal(LiteralExpr),
    Template(TemplateExpr),
    Array(ArrayExpr),
    Object(ObjectExpr),
    Range(RangeExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Call(CallExpr),
    Member(MemberExpr),
    Lambda(LambdaExpr),
    Assignment(AssignmentExpr),
    Cede(CedeExpr),
    Novum(NovumExpr),
    Finge(FingeExpr),
    Conditional(ConditionalExpr),
    Qua(QuaExpr),
    Est(EstExpr),
    Praefixum(PraefixumExpr),
    Scriptum(ScriptumExpr),
    Lege(LegeExpr),
    Regex(RegexExpr),
    CollectionDsl(CollectionDslExpr),
    Spread(SpreadExpr),
}

impl Expr {
    pub fn meta(&self) -> &Meta {
        match self {
            Expr::Identifier(e) => &e.meta,
            Expr::Ego(m) => m,
            Expr::Literal(e) => &e.meta,
            Expr::Template(e) => &e.meta,
            Expr::Array(e) => &e.meta,
            Expr::Object(e) => &e.meta,
            Expr::Range(e) => &e.meta,
            Expr::Binary(e) => &e.meta,
            Expr::Unary(e) => &e.meta,
            Expr::Call(e) => &e.meta,
            Expr::Member(e) => &e.meta,
            Expr::Lambda(e) => &e.meta,
            Expr::Assignment(e) => &e.meta,
            Expr::Cede(e) => &e.meta,
            Expr::Novum(e) => &e.meta,
            Expr::Finge(e) => &e.meta,
            Expr::Conditional(e) => &e.meta,
            Expr::Qua(e) => &e.meta,
            Expr::Est(e) => &e.meta,
            Expr::Praefixum(e) => &e.meta,
            Expr::Scriptum(e) => &e.meta,
            Expr::Lege(e) => &e.meta,
            Expr::Regex(e) => &e.meta,
            Expr::CollectionDsl(e) => &e.meta,
            Expr::Spread(e) => &e.meta,
        }
    }

    /// Whether this expression is a valid assignment target (spec §7
    /// "assignment to non-lvalue" is a parse-time semantic conflict).
    pub fn is_lvalue(&self) -> bool {
        matches!(self, Expr::Identifier(_) | Expr::Member(_) | Expr::Ego(_))
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        match self {
            Expr::Identifier(e) => &mut e.meta,
            Expr::Ego(m) => m,
            Expr::Literal(e) => &mut e.meta,
            Expr::Template(e) => &mut e.meta,
            Expr::Array(e) => &mut e.meta,
            Expr::Object(e) => &mut e.meta,
            Expr::Range(e) => &mut e.meta,
            Expr::Binary(e) => &mut e.meta,
            Expr::Unary(e) => &mut e.meta,
            Expr::Call(e) => &mut e.meta,
            Expr::Member(e) => &mut e.meta,
            Expr::Lambda(e) => &mut e.meta,
            Expr::Assignment(e) => &mut e.meta,
            Expr::Cede(e) => &mut e.meta,
            Expr::Novum(e) => &mut e.meta,
            Expr::Finge(e) => &mut e.meta,
            Expr::Conditional(e) => &mut e.meta,
            Expr::Qua(e) => &mut e.meta,
            Expr::Est(e) => &mut e.meta,
            Expr::Praefixum(e) => &mut e.meta,
            Expr::Scriptum(e) => &mut e.meta,
            Expr::Lege(e) => &mut e.meta,
            Expr::Regex(e) => &mut e.meta,
            Expr::CollectionDsl(e) => &mut e.meta,
            Expr::Spread(e) => &mut e.meta,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierExpr {
    pub meta: Meta,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    BigInt(String),
    Str(String),
    Nihil,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub meta: Meta,
    pub value: LiteralValue,
    /// The exact source spelling, for numeric fidelity in codegen
    /// (spec §4.3 "numbers emitted with fidelity to source raw").
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Text(String),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateExpr {
    pub meta: Meta,
    pub parts: Vec<TemplatePart>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    pub meta: Meta,
    pub elements: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectProperty {
    KeyValue { key: String, value: Box<Expr> },
    Spread(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpr {
    pub meta: Meta,
    pub properties: Vec<ObjectProperty>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeExpr {
    pub meta: Meta,
    pub start: Box<Expr>,
    pub end: Box<Expr>,
    /// `usque` (inclusive) vs `ante`/`..` (exclusive).
    pub inclusive: bool,
    pub step: Option<Box<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    BitOr,
    BitXor,
    BitAnd,
    Shl,
    Shr,
    And,
    Or,
    /// `vel` used as nullish coalescing (not the default-value-introducer
    /// use in parameter lists -- see spec §9 open question).
    Nullish,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub meta: Meta,
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    BitNot,
    /// `non` -- logical not, the Latin spelling of `!`.
    LogicalNot,
    /// `nulla` -- emptiness check (length test for collections, else
    /// truthiness).
    IsEmpty,
    /// `nonnulla` -- negated emptiness check.
    IsNotEmpty,
    /// `nihil x` -- null check.
    IsNull,
    /// `nonnihil x` -- negated null check.
    IsNotNull,
    Negativum,
    Positivum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub meta: Meta,
    pub op: UnaryOp,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub meta: Meta,
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    /// `?(` -- optional-chained call.
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberKey {
    Name(String),
    Index(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub meta: Meta,
    pub object: Box<Expr>,
    pub property: MemberKey,
    /// `?.`/`?[` -- short-circuits to null if `object` is null.
    pub optional: bool,
    /// `!.`/`![` -- asserts `object` is non-null without a runtime check.
    pub non_null: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LambdaBody {
    Block(Block),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpr {
    pub meta: Meta,
    pub is_async: bool,
    pub params: Vec<Param>,
    pub body: LambdaBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpr {
    pub meta: Meta,
    pub op: AssignOp,
    pub target: Box<Expr>,
    pub value: Box<Expr>,
}

/// `cede EXPR` -- await outside a generator, yield inside one. The parser
/// does not record which; codegen decides from its own `in_generator`
/// state at emission time (spec §4.3 "Cede").
#[derive(Debug, Clone, PartialEq)]
pub struct CedeExpr {
    pub meta: Meta,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WithClause {
    Object(ObjectExpr),
    Spread(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NovumExpr {
    pub meta: Meta,
    pub type_name: String,
    pub args: Vec<Expr>,
    pub with_clause: Option<WithClause>,
}

/// `finge Variant(args...)` -- constructs a `discretio` variant value.
#[derive(Debug, Clone, PartialEq)]
pub struct FingeExpr {
    pub meta: Meta,
    pub variant_name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalForm {
    /// `cond ? then : else`
    Ternary,
    /// `si cond ergo then secus else`, used in expression position.
    SicSecus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    pub meta: Meta,
    pub condition: Box<Expr>,
    pub then_branch: Box<Expr>,
    pub else_branch: Box<Expr>,
    pub form: ConditionalForm,
}

/// `EXPR qua TYPE` -- type assertion.
#[derive(Debug, Clone, PartialEq)]
pub struct QuaExpr {
    pub meta: Meta,
    pub operand: Box<Expr>,
    pub target_type: TypeExpr,
}

/// `EXPR est TYPE` / `EXPR non est TYPE` -- runtime type check.
#[derive(Debug, Clone, PartialEq)]
pub struct EstExpr {
    pub meta: Meta,
    pub operand: Box<Expr>,
    pub type_name: String,
    pub negated: bool,
}

/// `praefixum EXPR` -- compile-time-evaluated prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct PraefixumExpr {
    pub meta: Meta,
    pub operand: Box<Expr>,
}

/// `scriptum "fmt §" args...` -- a format-string expression; `§` is the
/// canonical placeholder marker (spec §4.3 "Scriptum").
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptumExpr {
    pub meta: Meta,
    pub format: String,
    pub args: Vec<Expr>,
}

/// `lege [prompt]` -- read a line from stdin, with an optional prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct LegeExpr {
    pub meta: Meta,
    pub prompt: Option<Box<Expr>>,
}

/// `sed "pattern" flags?`
#[derive(Debug, Clone, PartialEq)]
pub struct RegexExpr {
    pub meta: Meta,
    pub pattern: String,
    pub flags: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DslEntry {
    Ex,
    Ab,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DslFilterKind {
    /// `ab src active` -- boolean-property shorthand.
    Shorthand(String),
    /// `ab src ubi EXPR` -- full predicate.
    Predicate(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DslFilter {
    pub negated: bool,
    pub kind: DslFilterKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DslTransform {
    Prima(Box<Expr>),
    Ultima(Box<Expr>),
    Summa,
}

/// The `ex`/`ab` collection pipeline DSL as an expression (spec §4.2
/// "Collection DSL"): a source, an optional filter, and an ordered chain
/// of transforms.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionDslExpr {
    pub meta: Meta,
    pub source: Box<Expr>,
    pub entry: DslEntry,
    pub filter: Option<DslFilter>,
    pub transforms: Vec<DslTransform>,
}

/// `sparge EXPR` -- spread, used inside array/object literals and calls.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadExpr {
    pub meta: Meta,
    pub operand: Box<Expr>,
}
