//! Dynamically typed target idiom: indentation-significant blocks,
//! f-strings, `#` comments.

use verbum_ast::LogKind;

/// This target has no declaration keyword distinct between mutable and
/// immutable bindings -- plain assignment covers both.
pub(crate) fn varia_keyword() -> &'static str {
    ""
}

pub(crate) fn bool_literal(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

pub(crate) const NULL_LITERAL: &str = "None";

pub(crate) fn comment_line(text: &str) -> String {
    format!("#{text}")
}

pub(crate) fn log_call(kind: LogKind) -> &'static str {
    match kind {
        LogKind::Scribe => "print",
        LogKind::Vide => "logging.debug",
        LogKind::Mone => "logging.warning",
    }
}

/// An indentation-significant target cannot emit an empty block; it needs
/// an explicit no-op statement.
pub(crate) const EMPTY_BLOCK_PLACEHOLDER: &str = "pass";
