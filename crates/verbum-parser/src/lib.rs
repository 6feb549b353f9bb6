//! Recursive-descent parser for the verbum surface language.
//!
//! The parser never aborts on a malformed construct: every statement-level
//! failure is recorded as a diagnostic and the parser synchronizes to the
//! next likely statement boundary, so `parse` always returns a best-effort
//! `Program` alongside whatever diagnostics it collected (spec §4.2 "error
//! recovery").

mod error;
mod expressions;
mod patterns;
mod statements;

pub use error::ParseError;

use verbum_ast::{Block, Comment, Program, Stmt};
use verbum_common::{Diagnostic, DiagnosticCode, Keyword, Position, Token, TokenKind};

/// Parse `source` into a best-effort `Program` plus every diagnostic
/// encountered along the way (lexical and syntactic). The returned program
/// is never `None`; an empty source yields an empty program.
pub fn parse(source: &str) -> (Program, Vec<Diagnostic>) {
    let mut parser = Parser::new(source);
    let mut statements = Vec::new();
    while !parser.is_eof() {
        match parser.parse_statement() {
            Ok(stmt) => statements.push(stmt),
            Err(err) => {
                parser.errors.push(err);
                parser.synchronize();
            }
        }
    }
    let diagnostics = parser.errors.into_iter().map(Diagnostic::from).collect();
    (Program::new(statements), diagnostics)
}

/// Parses a single expression fragment re-lexed out of a `${...}`
/// template-string interpolation segment.
pub(crate) fn parse_fragment(source: &str) -> (Program, Vec<Diagnostic>) {
    let mut parser = Parser::new(source);
    let program = match parser.parse_expression() {
        Ok(expr) => Program::new(vec![Stmt::Expr(Box::new(expr))]),
        Err(err) => {
            parser.errors.push(err);
            Program::new(Vec::new())
        }
    };
    let diagnostics = parser.errors.into_iter().map(Diagnostic::from).collect();
    (program, diagnostics)
}

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    comments: Vec<Comment>,
    comment_idx: usize,
    errors: Vec<ParseError>,
    cura_counter: u32,
}

impl Parser {
    fn new(source: &str) -> Self {
        let (raw_tokens, lex_diagnostics) = verbum_lexer::tokenize(source);
        let mut tokens = Vec::with_capacity(raw_tokens.len());
        let mut comments = Vec::new();
        for token in raw_tokens {
            if token.kind == TokenKind::Comment {
                comments.push(Comment {
                    kind: token.comment_kind.expect("comment token always carries a CommentKind"),
                    value: token.lexeme,
                    position: token.position,
                });
            } else {
                tokens.push(token);
            }
        }
        Self {
            tokens,
            pos: 0,
            comments,
            comment_idx: 0,
            errors: lex_diagnostics.into_iter().map(ParseError::from).collect(),
            cura_counter: 0,
        }
    }

    fn is_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek2(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        self.peek().is_keyword(kw)
    }

    fn check2_keyword(&self, kw: Keyword) -> bool {
        self.peek2().is_keyword(kw)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let tok = self.peek().clone();
            Err(ParseError::new(
                DiagnosticCode::ExpectedPunctuation,
                format!("expected {what}, found '{}'", tok.lexeme),
                tok.position,
            ))
        }
    }

    fn expect_keyword(&mut self, kw: Keyword, name: &str) -> Result<Token, ParseError> {
        if self.check_keyword(kw) {
            Ok(self.advance())
        } else {
            let tok = self.peek().clone();
            Err(ParseError::new(
                DiagnosticCode::ExpectedKeyword,
                format!("expected keyword '{name}', found '{}'", tok.lexeme),
                tok.position,
            ))
        }
    }

    fn expect_identifier(&mut self) -> Result<(String, Position), ParseError> {
        if self.check(TokenKind::Identifier) {
            let tok = self.advance();
            Ok((tok.lexeme, tok.position))
        } else {
            let tok = self.peek().clone();
            Err(ParseError::new(
                DiagnosticCode::ExpectedIdentifier,
                format!("expected identifier, found '{}'", tok.lexeme),
                tok.position,
            ))
        }
    }

    fn expect_string_literal(&mut self) -> Result<(String, Position), ParseError> {
        if self.check(TokenKind::String) {
            let tok = self.advance();
            Ok((tok.lexeme, tok.position))
        } else {
            let tok = self.peek().clone();
            Err(ParseError::new(
                DiagnosticCode::ExpectedStringLiteral,
                format!("expected string literal, found '{}'", tok.lexeme),
                tok.position,
            ))
        }
    }

    /// Consumes every pending comment positioned before `before_offset` as
    /// leading comments of the node about to be parsed.
    fn take_leading_comments(&mut self, before_offset: u32) -> Vec<Comment> {
        let mut out = Vec::new();
        while self.comment_idx < self.comments.len() && self.comments[self.comment_idx].position.offset < before_offset {
            out.push(self.comments[self.comment_idx].clone());
            self.comment_idx += 1;
        }
        out
    }

    /// Consumes a single pending comment as a trailing comment, only if it
    /// starts on `line` (i.e. shares the line the node just finished on).
    fn take_trailing_comment(&mut self, line: u32) -> Vec<Comment> {
        if self.comment_idx < self.comments.len() && self.comments[self.comment_idx].position.line == line {
            let comment = self.comments[self.comment_idx].clone();
            self.comment_idx += 1;
            vec![comment]
        } else {
            Vec::new()
        }
    }

    fn leading_comments_for(&mut self, start: Position) -> Vec<Comment> {
        self.take_leading_comments(start.offset)
    }

    /// Synthesizes a `_<prefix>_<n>` binding name for an implicit `cura`
    /// resource (spec §3 "CuraStatement" invariant).
    fn next_cura_binding(&mut self, prefix: &str) -> String {
        self.cura_counter += 1;
        format!("_{prefix}_{}", self.cura_counter)
    }

    /// Skips tokens until a likely statement boundary: past a consumed
    /// semicolon, at a closing brace, at EOF, or at a token that starts a
    /// new statement.
    fn synchronize(&mut self) {
        while !self.is_eof() {
            if self.match_token(TokenKind::Semicolon) {
                return;
            }
            if self.check(TokenKind::RBrace) {
                return;
            }
            if self.at_statement_start() {
                return;
            }
            self.advance();
        }
    }

    /// Like `synchronize`, but scoped to a `genus` body: skips tokens until
    /// a likely field/method boundary (a consumed semicolon, the closing
    /// brace of a malformed method body, or a token that starts a new
    /// field/method), without running past the enclosing `genus`'s own
    /// closing brace (spec §7 "invalid construct start" recovery, scoped to
    /// one member instead of unwinding the whole declaration).
    pub(crate) fn synchronize_genus_member(&mut self) {
        while !self.is_eof() {
            if self.match_token(TokenKind::Semicolon) {
                return;
            }
            if self.check(TokenKind::RBrace) {
                return;
            }
            if self.check_keyword(Keyword::Functio) || self.check(TokenKind::Identifier) {
                return;
            }
            self.advance();
        }
    }

    /// `{ statement* }`
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        let open = self.expect(TokenKind::LBrace, "'{'")?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_eof() {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize();
                }
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Block { meta: verbum_ast::Meta::at(open.position), statements })
    }

    fn at_statement_start(&self) -> bool {
        use Keyword::*;
        matches!(
            self.peek().keyword,
            Some(
                Varia | Fixum | Figendum | Variandum
                    | Functio
                    | Pactum
                    | Genus
                    | Ordo
                    | Discretio
                    | Si
                    | Dum
                    | Ex
                    | De
                    | In
                    | Elige
                    | Discerne
                    | Custodi
                    | Adfirma
                    | Redde
                    | Rumpe
                    | Perge
                    | Iace
                    | Mori
                    | Tempta
                    | Fac
                    | Scribe
                    | Vide
                    | Mone
                    | Cura
                    | Ad
                    | Incipit
                    | Probandum
                    | Proba
                    | Praepara
                    | Praeparabit
                    | Postpara
                    | Postparabit
            )
        )
    }
}
