//! Statement and declaration node variants (spec §3 "Declarations" and
//! "Control").

use crate::common::{Annotation, Meta, Pattern, Specifier, TypeExpr};
use crate::expr::Expr;

/// A brace-delimited sequence of statements. Every construct that spec.md
/// calls `BLOCK` is one of these.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub meta: Meta,
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Importa(ImportaStmt),
    Destructure(DestructureStmt),
    Varia(VariaDecl),
    Functio(FunctioDecl),
    Pactum(PactumDecl),
    Genus(GenusDecl),
    TypeAlias(TypeAliasDecl),
    Ordo(OrdoDecl),
    Discretio(DiscretioDecl),

    Si(SiStmt),
    Dum(DumStmt),
    Iteratio(IteratioStmt),
    In(InStmt),
    Elige(EligeStmt),
    Discerne(DiscerneStmt),
    Custodi(CustodiStmt),
    Adfirma(AdfirmaStmt),
    Redde(ReddeStmt),
    Rumpe(Meta),
    Perge(Meta),
    Iace(IaceStmt),
    Scribe(ScribeStmt),
    Tempta(TemptaStmt),
    Fac(FacStmt),
    Cura(CuraStmt),
    Ad(AdStmt),
    Incipit(IncipitStmt),

    Probandum(ProbandumStmt),
    Proba(ProbaStmt),
    Hook(HookStmt),

    Block(Block),
    /// A bare expression used as a statement (e.g. a call with no
    /// enclosing construct). Not named in spec.md's catalog, but required
    /// by the grammar -- see SPEC_FULL.md "Supplemented features".
    Expr(Box<Expr>),
}

impl Stmt {
    pub fn meta(&self) -> &Meta {
        match self {
            Stmt::Importa(s) => &s.meta,
            Stmt::Destructure(s) => &s.meta,
            Stmt::Varia(s) => &s.meta,
            Stmt::Functio(s) => &s.meta,
            Stmt::Pactum(s) => &s.meta,
            Stmt::Genus(s) => &s.meta,
            Stmt::TypeAlias(s) => &s.meta,
            Stmt::Ordo(s) => &s.meta,
            Stmt::Discretio(s) => &s.meta,
            Stmt::Si(s) => &s.meta,
            Stmt::Dum(s) => &s.meta,
            Stmt::Iteratio(s) => &s.meta,
            Stmt::In(s) => &s.meta,
            Stmt::Elige(s) => &s.meta,
            Stmt::Discerne(s) => &s.meta,
            Stmt::Custodi(s) => &s.meta,
            Stmt::Adfirma(s) => &s.meta,
            Stmt::Redde(s) => &s.meta,
            Stmt::Rumpe(m) => m,
            Stmt::Perge(m) => m,
            Stmt::Iace(s) => &s.meta,
            Stmt::Scribe(s) => &s.meta,
            Stmt::Tempta(s) => &s.meta,
            Stmt::Fac(s) => &s.meta,
            Stmt::Cura(s) => &s.meta,
            Stmt::Ad(s) => &s.meta,
            Stmt::Incipit(s) => &s.meta,
            Stmt::Probandum(s) => &s.meta,
            Stmt::Proba(s) => &s.meta,
            Stmt::Hook(s) => &s.meta,
            Stmt::Block(b) => &b.meta,
            Stmt::Expr(e) => e.meta(),
        }
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        match self {
            Stmt::Importa(s) => &mut s.meta,
            Stmt::Destructure(s) => &mut s.meta,
            Stmt::Varia(s) => &mut s.meta,
            Stmt::Functio(s) => &mut s.meta,
            Stmt::Pactum(s) => &mut s.meta,
            Stmt::Genus(s) => &mut s.meta,
            Stmt::TypeAlias(s) => &mut s.meta,
            Stmt::Ordo(s) => &mut s.meta,
            Stmt::Discretio(s) => &mut s.meta,
            Stmt::Si(s) => &mut s.meta,
            Stmt::Dum(s) => &mut s.meta,
            Stmt::Iteratio(s) => &mut s.meta,
            Stmt::In(s) => &mut s.meta,
            Stmt::Elige(s) => &mut s.meta,
            Stmt::Discerne(s) => &mut s.meta,
            Stmt::Custodi(s) => &mut s.meta,
            Stmt::Adfirma(s) => &mut s.meta,
            Stmt::Redde(s) => &mut s.meta,
            Stmt::Rumpe(m) => m,
            Stmt::Perge(m) => m,
            Stmt::Iace(s) => &mut s.meta,
            Stmt::Scribe(s) => &mut s.meta,
            Stmt::Tempta(s) => &mut s.meta,
            Stmt::Fac(s) => &mut s.meta,
            Stmt::Cura(s) => &mut s.meta,
            Stmt::Ad(s) => &mut s.meta,
            Stmt::Incipit(s) => &mut s.meta,
            Stmt::Probandum(s) => &mut s.meta,
            Stmt::Proba(s) => &mut s.meta,
            Stmt::Hook(s) => &mut s.meta,
            Stmt::Block(b) => &mut b.meta,
            Stmt::Expr(e) => e.meta_mut(),
        }
    }

    /// Declaration-kind statements are the only ones an `Annotation` may
    /// attach to (spec §3 "Annotation ... attachment to other statements
    /// is a parse error").
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            Stmt::Importa(_)
                | Stmt::Destructure(_)
                | Stmt::Varia(_)
                | Stmt::Functio(_)
                | Stmt::Pactum(_)
                | Stmt::Genus(_)
                | Stmt::TypeAlias(_)
                | Stmt::Ordo(_)
                | Stmt::Discretio(_)
        )
    }
}

// ── Declarations ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ImportaStmt {
    pub meta: Meta,
    pub annotations: Option<Vec<Annotation>>,
    pub source: Box<Expr>,
    pub specifiers: Vec<Specifier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariaKind {
    Varia,
    Fixum,
    Figendum,
    Variandum,
}

impl VariaKind {
    /// `figendum`/`variandum` are the async-gerundive kinds whose
    /// initializer is implicitly awaited (spec §4.3 "Varia").
    pub fn is_async(self) -> bool {
        matches!(self, VariaKind::Figendum | VariaKind::Variandum)
    }

    /// `fixum`/`figendum` are immutable; `varia`/`variandum` are mutable.
    pub fn is_mutable(self) -> bool {
        matches!(self, VariaKind::Varia | VariaKind::Variandum)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DestructureStmt {
    pub meta: Meta,
    pub annotations: Option<Vec<Annotation>>,
    pub kind: VariaKind,
    pub source: Box<Expr>,
    pub specifiers: Vec<Specifier>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariaDecl {
    pub meta: Meta,
    pub annotations: Option<Vec<Annotation>>,
    pub kind: VariaKind,
    pub pattern: Pattern,
    pub type_annotation: Option<TypeExpr>,
    pub initializer: Option<Box<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamPreposition {
    /// `de` -- shared borrow.
    De,
    /// `in` -- mutable borrow.
    In,
    /// `ex` -- move/take ownership of the source.
    Ex,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub external_name: Option<String>,
    pub internal_name: String,
    pub preposition: Option<ParamPreposition>,
    pub type_annotation: Option<TypeExpr>,
    pub default: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnVerb {
    /// `->` -- async/generator determined by `futura`/`cursor` modifiers.
    Arrow,
    Fit,
    Fiet,
    Fiunt,
    Fient,
}

impl ReturnVerb {
    pub fn implies_async(self) -> bool {
        matches!(self, ReturnVerb::Fiet | ReturnVerb::Fient)
    }

    pub fn implies_generator(self) -> bool {
        matches!(self, ReturnVerb::Fiunt | ReturnVerb::Fient)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctioDecl {
    pub meta: Meta,
    pub annotations: Option<Vec<Annotation>>,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    /// `None` when no verb/arrow appears at all (spec §3 invariant: a
    /// `FunctioDeclaration` has exactly one of `returnVerb` or none).
    pub return_verb: Option<ReturnVerb>,
    pub return_type: Option<TypeExpr>,
    pub is_async: bool,
    pub is_generator: bool,
    /// Set when the function is named `creo` (spec §9 open question: the
    /// constructor-by-name convention).
    pub is_constructor: bool,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PactumMember {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PactumDecl {
    pub meta: Meta,
    pub annotations: Option<Vec<Annotation>>,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<String>,
    pub members: Vec<PactumMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenusField {
    pub name: String,
    pub type_annotation: Option<TypeExpr>,
    pub default: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenusDecl {
    pub meta: Meta,
    pub annotations: Option<Vec<Annotation>>,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub sub: Option<String>,
    pub implements: Vec<String>,
    pub fields: Vec<GenusField>,
    pub methods: Vec<FunctioDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub meta: Meta,
    pub annotations: Option<Vec<Annotation>>,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub aliased: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrdoDecl {
    pub meta: Meta,
    pub annotations: Option<Vec<Annotation>>,
    pub name: String,
    pub variants: Vec<String>,
}

/// A single `discretio` variant. Zero fields means a unit variant,
/// non-empty means a payload variant (spec §3 invariant).
#[derive(Debug, Clone, PartialEq)]
pub struct DiscretioVariant {
    pub name: String,
    pub fields: Vec<GenusField>,
}

impl DiscretioVariant {
    pub fn is_unit(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscretioDecl {
    pub meta: Meta,
    pub annotations: Option<Vec<Annotation>>,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub variants: Vec<DiscretioVariant>,
}

// ── Control flow ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SiThen {
    /// `si EXPR ergo STMT`
    Ergo(Box<Stmt>),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapeClause {
    pub binding: Option<String>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiStmt {
    pub meta: Meta,
    pub condition: Box<Expr>,
    pub then_branch: SiThen,
    pub cape: Option<CapeClause>,
    /// `sin` (else-if, itself a nested `Stmt::Si`) or `secus` (a plain
    /// block, represented as `Stmt::Block`).
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DumStmt {
    pub meta: Meta,
    pub condition: Box<Expr>,
    pub body: Block,
}

/// Covers both `ex`-iteration and `de`-iteration (for-in-keys); the only
/// difference is `over_keys`.
#[derive(Debug, Clone, PartialEq)]
pub struct IteratioStmt {
    pub meta: Meta,
    pub source: Box<Expr>,
    pub over_keys: bool,
    pub is_async: bool,
    pub binding: String,
    pub body: Block,
}

/// `in EXPR { ... }` -- a mutation block against an implicit context.
#[derive(Debug, Clone, PartialEq)]
pub struct InStmt {
    pub meta: Meta,
    pub target: Box<Expr>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EligeCase {
    /// `None` for the `secus` (default) arm.
    pub test: Option<Box<Expr>>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EligeStmt {
    pub meta: Meta,
    pub discriminant: Box<Expr>,
    pub cases: Vec<EligeCase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantCase {
    pub variant_name: String,
    pub bindings: Vec<String>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscerneStmt {
    pub meta: Meta,
    pub discriminant: Box<Expr>,
    pub cases: Vec<VariantCase>,
}

/// `custodi { si EXPR BLOCK ... }` -- an ordered guard chain.
#[derive(Debug, Clone, PartialEq)]
pub struct CustodiStmt {
    pub meta: Meta,
    pub guards: Vec<(Box<Expr>, Block)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdfirmaStmt {
    pub meta: Meta,
    pub condition: Box<Expr>,
    pub message: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReddeStmt {
    pub meta: Meta,
    pub value: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IaceStmt {
    pub meta: Meta,
    pub value: Box<Expr>,
    /// `mori` (fatal, unrecoverable) vs `iace` (recoverable).
    pub fatal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Scribe,
    Vide,
    Mone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScribeStmt {
    pub meta: Meta,
    pub kind: LogKind,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemptaStmt {
    pub meta: Meta,
    pub body: Block,
    pub cape: Option<CapeClause>,
    pub demum: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacStmt {
    pub meta: Meta,
    pub body: Block,
    pub cape: Option<CapeClause>,
    /// `fac BLOCK dum EXPR` -- present means this is a do-while loop.
    pub while_condition: Option<Box<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CuraResourceKind {
    Arena,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CuraBindingVerb {
    Pro,
    Fit,
    Fiet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CuraStmt {
    pub meta: Meta,
    pub resource_kind: Option<CuraResourceKind>,
    pub expr: Option<Box<Expr>>,
    pub binding_verb: Option<CuraBindingVerb>,
    pub type_annotation: Option<TypeExpr>,
    /// Explicit binding identifier, or a synthesized `_<kind>_<counter>`
    /// (spec §3 invariant on `CuraStatement`).
    pub binding: String,
    pub body: Block,
    pub cape: Option<CapeClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdStmt {
    pub meta: Meta,
    pub target: String,
    pub args: Vec<Expr>,
    pub binding_verb: Option<ReturnVerb>,
    pub type_annotation: Option<TypeExpr>,
    pub binding_name: Option<String>,
    pub alias: Option<String>,
    pub body: Option<Block>,
    pub cape: Option<CapeClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IncipitBody {
    Block(Block),
    /// `incipit ergo STMT`
    Ergo(Box<Stmt>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncipitStmt {
    pub meta: Meta,
    pub is_async: bool,
    pub body: IncipitBody,
}

// ── Testing ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ProbandumStmt {
    pub meta: Meta,
    pub name: String,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProbaModifier {
    Omitte,
    Futurum(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbaStmt {
    pub meta: Meta,
    pub name: String,
    pub modifier: Option<ProbaModifier>,
    pub body: Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Praepara,
    Praeparabit,
    Postpara,
    Postparabit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HookStmt {
    pub meta: Meta,
    pub kind: HookKind,
    pub all: bool,
    pub body: Block,
}
