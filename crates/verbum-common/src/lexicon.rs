//! The Lexicon Interface: a read-only mapping from nominative Latin type
//! forms to a canonical identifier.
//!
//! Per spec §1, the real declension tables (Latin morphology, the full
//! nominative/genitive/etc. lookup) are an external collaborator's
//! concern. The core only needs to ask "is this identifier a builtin type
//! name, and if so what is its canonical form?" — that query is captured
//! by the `TypeLexicon` trait so the parser and codegen can depend on an
//! abstract lexicon rather than a concrete morphology implementation.

/// Read-only query surface the parser/codegen use to recognize builtin
/// type names among otherwise-ordinary identifiers.
pub trait TypeLexicon {
    /// Resolve a nominative-form identifier (e.g. `"textus"`) to its
    /// canonical type name, if it names a builtin type.
    fn resolve(&self, nominative: &str) -> Option<&str>;

    /// Whether `nominative` names a builtin type at all.
    fn is_builtin_type(&self, nominative: &str) -> bool {
        self.resolve(nominative).is_some()
    }
}

/// The canonical builtin type names spec.md §4.3 names explicitly. A
/// minimal fixture lexicon over just these names, for use where the host
/// has not supplied a full morphology-aware lexicon (e.g. in parser/codegen
/// unit tests). The real declension tables are out of core.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLexicon;

const CANONICAL_NAMES: &[&str] = &[
    "textus", "numerus", "fractus", "decimus", "magnus", "bivalens", "nihil", "vacuum",
    "numquam", "octeti", "objectum", "lista", "tabula", "copia", "promissum", "erratum",
    "cursor", "ignotum",
];

impl TypeLexicon for FixtureLexicon {
    fn resolve(&self, nominative: &str) -> Option<&str> {
        CANONICAL_NAMES.iter().copied().find(|&name| name == nominative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_lexicon_resolves_known_names() {
        let lex = FixtureLexicon;
        assert_eq!(lex.resolve("textus"), Some("textus"));
        assert!(lex.is_builtin_type("numerus"));
    }

    #[test]
    fn fixture_lexicon_rejects_unknown_names() {
        let lex = FixtureLexicon;
        assert_eq!(lex.resolve("nomenUsoris"), None);
        assert!(!lex.is_builtin_type("nomenUsoris"));
    }
}
