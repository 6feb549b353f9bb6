//! Systems target idiom: static types, explicit ownership, `format!`-style
//! interpolation, `//` comments.

use verbum_ast::{LogKind, VariaKind};

pub(crate) fn varia_keyword(kind: VariaKind) -> &'static str {
    if kind.is_mutable() {
        "let mut"
    } else {
        "let"
    }
}

pub(crate) fn bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

pub(crate) const NULL_LITERAL: &str = "None";

pub(crate) fn comment_line(text: &str) -> String {
    format!("//{text}")
}

pub(crate) fn log_call(kind: LogKind) -> &'static str {
    match kind {
        LogKind::Scribe => "println!",
        LogKind::Vide => "log::debug!",
        LogKind::Mone => "log::warn!",
    }
}

pub(crate) const EMPTY_BLOCK_PLACEHOLDER: &str = "";

pub(crate) fn visibility_prefix(is_exported: bool) -> &'static str {
    if is_exported {
        "pub "
    } else {
        ""
    }
}
