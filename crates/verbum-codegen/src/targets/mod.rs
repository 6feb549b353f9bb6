//! Per-target lexical idiom: the small spellings (keywords, literals,
//! comment syntax) that differ target to target but aren't part of the
//! structural AST-dispatch the framework does. One submodule per target,
//! grouped here so `framework.rs` can match on [`crate::Target`] and
//! delegate to the matching module.

pub(crate) mod dynamic;
pub(crate) mod structural;
pub(crate) mod systems;
