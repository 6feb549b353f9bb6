//! Fields every AST node carries, plus the small value types (`Comment`,
//! `Annotation`, `Pattern`, `TypeExpr`) that are shared across statement
//! and expression nodes rather than owned by any single one.

use verbum_common::{CommentKind, Position};

/// The fields spec §3 says every AST node has in common: its introducing
/// token's position, and whatever comments attached to it during parsing.
///
/// Declaration-kind nodes carry an additional `annotations` field directly
/// (not here), since annotation attachment is a parse error on any other
/// statement kind -- see spec §3 "Annotation".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Meta {
    pub position: Option<Position>,
    pub leading_comments: Vec<Comment>,
    pub trailing_comments: Vec<Comment>,
}

impl Meta {
    pub fn at(position: Position) -> Self {
        Self { position: Some(position), leading_comments: Vec::new(), trailing_comments: Vec::new() }
    }
}

/// A comment captured by the tokenizer and attached to exactly one AST
/// node, as either leading or trailing (spec §3 "Comment").
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub kind: CommentKind,
    pub value: String,
    pub position: Position,
}

/// `@ mod1 mod2 ...` metadata attached to the next declaration statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub modifiers: Vec<String>,
    pub position: Position,
}

impl Annotation {
    /// Whether this annotation's modifier list contains `name`. Codegen
    /// uses this to extract visibility (`pub`) and similar flags from the
    /// annotation list attached to a declaration.
    pub fn has(&self, name: &str) -> bool {
        self.modifiers.iter().any(|m| m == name)
    }
}

// ── Patterns ─────────────────────────────────────────────────────────────

/// A binding pattern: a plain name, or a destructuring array/object shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Identifier(String),
    Array(ArrayPattern),
    Object(ObjectPattern),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPattern {
    pub elements: Vec<ArrayPatternElement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayPatternElement {
    Binding(String),
    /// `_` -- explicitly discard this slot.
    Skip,
    /// `ceteri rest` -- bind the remaining elements.
    Rest(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPattern {
    pub properties: Vec<ObjectPatternProperty>,
    pub rest: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPatternProperty {
    pub key: String,
    /// `b: alias` -- the local binding name, when different from `key`.
    pub alias: Option<String>,
}

/// A single specifier in a destructure declaration or import list:
/// `nomen ut n` binds the local name `n` to the imported/object key
/// `nomen`; `ceteri rest` collects the remainder under `rest`.
#[derive(Debug, Clone, PartialEq)]
pub struct Specifier {
    pub imported: String,
    pub local: Option<String>,
    pub rest: bool,
}

// ── Types ────────────────────────────────────────────────────────────────

/// A type annotation. `NamedType` covers both plain names (`numerus`) and
/// generic instantiations (`unio<A, B>`, `lista<textus>`).
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Named(NamedType),
    /// `T[]`. The `bool` preserves the shorthand spelling for round-trip
    /// formatting (spec §4.2 "Array-element type T[] desugars...").
    Array(Box<TypeExpr>, bool),
    /// `unio<A, B>` desugars to this directly, per spec §4.2.
    Union(Vec<TypeExpr>),
    Nullable(Box<TypeExpr>),
    Borrowed(BorrowPreposition, Box<TypeExpr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedType {
    pub name: String,
    pub type_args: Vec<TypeExpr>,
}

impl NamedType {
    pub fn simple(name: impl Into<String>) -> Self {
        Self { name: name.into(), type_args: Vec::new() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowPreposition {
    /// `de` -- shared borrow.
    De,
    /// `in` -- mutable borrow.
    In,
}
