//! The one public entry point a host or driver depends on: the three
//! pipeline functions spec §6 names, re-exported from their owning crates
//! with nothing added. Carries no I/O, no CLI, no file handling -- those
//! are a collaborator's concern (spec §1, §6).

pub use verbum_ast::printer::print;
pub use verbum_ast::Program;
pub use verbum_codegen::{generate, Feature, FeatureSet, FrameworkError, Target};
pub use verbum_common::{Diagnostic, DiagnosticCode, Position, Token, TokenKind};
pub use verbum_parser::{parse, ParseError};

/// Tokenize `source` into its full token stream plus any lexical
/// diagnostics (spec §6 `tokenize`).
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    verbum_lexer::tokenize(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_runs_tokenize_parse_generate_end_to_end() {
        let source = r#"incipit { scribe "hello" }"#;
        let (tokens, lex_diagnostics) = tokenize(source);
        assert!(lex_diagnostics.is_empty());
        assert!(matches!(tokens.last().unwrap().kind, TokenKind::Eof));

        let (program, parse_diagnostics) = parse(source);
        assert!(parse_diagnostics.is_empty());

        let (code, features) = generate(&program, Target::Systems).unwrap();
        assert!(code.contains("fn main()"));
        assert!(features.is_empty());
    }

    #[test]
    fn target_round_trips_through_its_string_form() {
        for target in [Target::Structural, Target::Dynamic, Target::Systems] {
            let parsed: Target = target.to_string().parse().unwrap();
            assert_eq!(parsed, target);
        }
    }
}
