//! Shared types for the verbum front-end pipeline: positions, tokens, the
//! builtin-type lexicon interface, and the diagnostic record shape.

pub mod diagnostic;
pub mod lexicon;
pub mod position;
pub mod token;

pub use diagnostic::{Diagnostic, DiagnosticCode};
pub use lexicon::{FixtureLexicon, TypeLexicon};
pub use position::{Position, PositionTracker};
pub use token::{CommentKind, Keyword, Token, TokenKind};
