//! The stable diagnostic code taxonomy from spec §7, shared between the
//! lexer and the parser so a host can match on `code` rather than on
//! `message` text.

use serde::Serialize;
use std::fmt;

use crate::position::Position;

/// One error/diagnostic record: `{ code, message, position }` per spec §6.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    pub position: Position,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>, position: Position) -> Self {
        Self { code, message: message.into(), position }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.position, self.code, self.message)
    }
}

impl std::error::Error for Diagnostic {}

/// Stable diagnostic codes, grouped by the six families spec §7 describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticCode {
    // 1. Lexical anomalies
    UnterminatedString,
    InvalidNumberLiteral,
    StrayCharacter,

    // 2. Unexpected token (generic fallback)
    UnexpectedToken,

    // 3. Expected X
    ExpectedKeyword,
    ExpectedPunctuation,
    ExpectedIdentifier,
    ExpectedTypeName,
    ExpectedModuleName,
    ExpectedStringLiteral,

    // 4. Invalid construct start
    InvalidExIntroducer,
    InvalidCaseStarter,

    // 5. Semantic conflict at parse time
    VerbModifierConflict,
    AnnotationOnNonDeclaration,
    MixedNullishAndOr,
    NegativeStringEnumValue,
    AssignmentToNonLvalue,

    // 6. Pattern rejection
    RestPatternNotSupported,
    TypeAnnotationOnDeclaration,
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_displays_position_code_and_message() {
        let d = Diagnostic::new(
            DiagnosticCode::ExpectedIdentifier,
            "expected identifier after 'fixum'",
            Position::new(2, 5, 10),
        );
        let rendered = d.to_string();
        assert!(rendered.contains("2:5"));
        assert!(rendered.contains("ExpectedIdentifier"));
        assert!(rendered.contains("expected identifier"));
    }
}
