//! Parser error type. Mirrors the shared `Diagnostic` shape but additionally
//! carries an optional related secondary location, used for errors like
//! "unclosed delimiter" where pointing at the opening token helps.

use std::fmt;
use verbum_common::{Diagnostic, DiagnosticCode, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub code: DiagnosticCode,
    pub message: String,
    pub position: Position,
    pub related: Option<(String, Position)>,
}

impl ParseError {
    pub fn new(code: DiagnosticCode, message: impl Into<String>, position: Position) -> Self {
        Self { code, message: message.into(), position, related: None }
    }

    pub fn with_related(mut self, message: impl Into<String>, position: Position) -> Self {
        self.related = Some((message.into(), position));
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.position, self.code, self.message)?;
        if let Some((message, position)) = &self.related {
            write!(f, " (related at {position}: {message})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(diagnostic.code, diagnostic.message, diagnostic.position)
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Diagnostic {
        let message = match err.related {
            Some((msg, pos)) => format!("{} (related at {pos}: {msg})", err.message),
            None => err.message,
        };
        Diagnostic::new(err.code, message, err.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn related_location_is_folded_into_diagnostic_message() {
        let err = ParseError::new(DiagnosticCode::UnexpectedToken, "unclosed block", Position::new(3, 0, 20))
            .with_related("opened here", Position::new(1, 0, 0));
        let diagnostic: Diagnostic = err.into();
        assert!(diagnostic.message.contains("opened here"));
    }
}
