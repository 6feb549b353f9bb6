//! Structural/duck-typed target idiom: brace-delimited blocks, template
//! literals, `const`/`let` bindings.

use verbum_ast::{LogKind, VariaKind};

pub(crate) fn varia_keyword(kind: VariaKind) -> &'static str {
    if kind.is_mutable() {
        "let"
    } else {
        "const"
    }
}

pub(crate) fn bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

pub(crate) const NULL_LITERAL: &str = "null";

pub(crate) fn comment_line(text: &str) -> String {
    format!("//{text}")
}

pub(crate) fn log_call(kind: LogKind) -> &'static str {
    match kind {
        LogKind::Scribe => "console.log",
        LogKind::Vide => "console.debug",
        LogKind::Mone => "console.warn",
    }
}

pub(crate) const EMPTY_BLOCK_PLACEHOLDER: &str = "";

pub(crate) fn export_prefix(is_exported: bool) -> &'static str {
    if is_exported {
        "export "
    } else {
        ""
    }
}
