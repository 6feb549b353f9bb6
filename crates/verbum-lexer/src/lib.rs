//! Tokenizer for the verbum surface language.
//!
//! Converts a UTF-8 source buffer into a finite token stream ending with an
//! `Eof` sentinel. Never fails outright: lexical anomalies (unterminated
//! strings, invalid numeric literals, stray characters) become
//! `TokenKind::Error` tokens paired with a diagnostic, per spec §4.1/§7.

mod cursor;

use cursor::Cursor;
use verbum_common::{CommentKind, Diagnostic, DiagnosticCode, Keyword, Position, Token, TokenKind};

/// Tokenize `source` into its full token stream plus any lexical
/// diagnostics. The last token is always `Eof`; this never panics and
/// never returns an empty vector.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    let mut diagnostics = Vec::new();
    loop {
        let (token, diag) = lexer.next_token();
        if let Some(d) = diag {
            diagnostics.push(d);
        }
        let is_eof = token.is_eof();
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    (tokens, diagnostics)
}

struct Lexer<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self { cursor: Cursor::new(source) }
    }

    fn next_token(&mut self) -> (Token, Option<Diagnostic>) {
        self.skip_whitespace();
        let start = self.cursor.position();

        let Some(c) = self.cursor.peek() else {
            return (Token::eof(start), None);
        };

        match c {
            '(' => (self.single(TokenKind::LParen, start), None),
            ')' => (self.single(TokenKind::RParen, start), None),
            '{' => (self.single(TokenKind::LBrace, start), None),
            '}' => (self.single(TokenKind::RBrace, start), None),
            '[' => (self.single(TokenKind::LBracket, start), None),
            ']' => (self.single(TokenKind::RBracket, start), None),
            ',' => (self.single(TokenKind::Comma, start), None),
            ';' => (self.single(TokenKind::Semicolon, start), None),
            '@' => (self.single(TokenKind::At, start), None),
            '~' => (self.single(TokenKind::Tilde, start), None),
            '^' => (self.single(TokenKind::Caret, start), None),

            ':' => (self.lex_colon(start), None),
            '.' => (self.lex_dot(start), None),
            '?' => (self.lex_question(start), None),
            '!' => (self.lex_bang(start), None),
            '=' => (self.lex_eq(start), None),
            '<' => (self.lex_lt(start), None),
            '>' => (self.lex_gt(start), None),
            '&' => (self.lex_amp(start), None),
            '|' => (self.lex_pipe(start), None),
            '+' => (self.lex_compoundable(start, '+', TokenKind::Plus, TokenKind::PlusEq), None),
            '-' => (self.lex_minus(start), None),
            '*' => (self.lex_compoundable(start, '*', TokenKind::Star, TokenKind::StarEq), None),
            '/' => self.lex_slash(start),
            '%' => (self.lex_compoundable(start, '%', TokenKind::Percent, TokenKind::PercentEq), None),

            '"' => self.lex_string(start),
            '`' => self.lex_template_string(start),

            '0'..='9' => (self.lex_number(start), None),

            c if is_ident_start(c) => (self.lex_ident(start), None),

            _ => {
                self.cursor.advance();
                let lexeme = c.to_string();
                (
                    Token::new(TokenKind::Error, lexeme, start),
                    Some(Diagnostic::new(
                        DiagnosticCode::StrayCharacter,
                        format!("unexpected character '{c}'"),
                        start,
                    )),
                )
            }
        }
    }

    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(|c| c.is_whitespace());
    }

    fn single(&mut self, kind: TokenKind, start: Position) -> Token {
        let c = self.cursor.advance().unwrap();
        Token::new(kind, c.to_string(), start)
    }

    fn two(&mut self, kind: TokenKind, start: Position, lexeme: &str) -> Token {
        self.cursor.advance();
        self.cursor.advance();
        Token::new(kind, lexeme, start)
    }

    /// Lex `ch` as either the bare operator `plain`, or `ch=` as
    /// `compound` (covers `+=`, `-=`, `*=`, `/=`, `%=`, `&=`, `|=`).
    fn lex_compoundable(
        &mut self,
        start: Position,
        ch: char,
        plain: TokenKind,
        compound: TokenKind,
    ) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            Token::new(compound, format!("{ch}="), start)
        } else {
            Token::new(plain, ch.to_string(), start)
        }
    }

    fn lex_colon(&mut self, start: Position) -> Token {
        self.single(TokenKind::Colon, start)
    }

    /// `.` -> Dot, `..` -> DotDot
    fn lex_dot(&mut self, start: Position) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('.') {
            self.cursor.advance();
            Token::new(TokenKind::DotDot, "..", start)
        } else {
            Token::new(TokenKind::Dot, ".", start)
        }
    }

    /// `?` -> Question, `?.` -> QuestionDot, `?[` -> QuestionLBracket,
    /// `?(` -> QuestionLParen
    fn lex_question(&mut self, start: Position) -> Token {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('.') => self.two(TokenKind::QuestionDot, start, "?."),
            Some('[') => self.two(TokenKind::QuestionLBracket, start, "?["),
            Some('(') => self.two(TokenKind::QuestionLParen, start, "?("),
            _ => Token::new(TokenKind::Question, "?", start),
        }
    }

    /// `!` -> Bang, `!=` -> NotEq, `!==` -> NotEqEq, `!.` -> BangDot,
    /// `![` -> BangLBracket, `!(` -> BangLParen
    fn lex_bang(&mut self, start: Position) -> Token {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('=') => {
                self.cursor.advance();
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    Token::new(TokenKind::NotEqEq, "!==", start)
                } else {
                    Token::new(TokenKind::NotEq, "!=", start)
                }
            }
            Some('.') => self.two(TokenKind::BangDot, start, "!."),
            Some('[') => self.two(TokenKind::BangLBracket, start, "!["),
            Some('(') => self.two(TokenKind::BangLParen, start, "!("),
            _ => Token::new(TokenKind::Bang, "!", start),
        }
    }

    /// `=` -> Eq, `==` -> EqEq, `===` -> EqEqEq, `=>` -> Arrow
    fn lex_eq(&mut self, start: Position) -> Token {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('=') => {
                self.cursor.advance();
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    Token::new(TokenKind::EqEqEq, "===", start)
                } else {
                    Token::new(TokenKind::EqEq, "==", start)
                }
            }
            Some('>') => self.two(TokenKind::Arrow, start, "=>"),
            _ => Token::new(TokenKind::Eq, "=", start),
        }
    }

    /// `<` -> Lt, `<=` -> LtEq, `<<` -> Shl
    fn lex_lt(&mut self, start: Position) -> Token {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('=') => self.two(TokenKind::LtEq, start, "<="),
            Some('<') => self.two(TokenKind::Shl, start, "<<"),
            _ => Token::new(TokenKind::Lt, "<", start),
        }
    }

    /// `>` -> Gt, `>=` -> GtEq, `>>` -> Shr
    fn lex_gt(&mut self, start: Position) -> Token {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('=') => self.two(TokenKind::GtEq, start, ">="),
            Some('>') => self.two(TokenKind::Shr, start, ">>"),
            _ => Token::new(TokenKind::Gt, ">", start),
        }
    }

    /// `&` -> Amp, `&&` -> AmpAmp, `&=` -> AmpEq
    fn lex_amp(&mut self, start: Position) -> Token {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('&') => self.two(TokenKind::AmpAmp, start, "&&"),
            Some('=') => self.two(TokenKind::AmpEq, start, "&="),
            _ => Token::new(TokenKind::Amp, "&", start),
        }
    }

    /// `|` -> Pipe, `||` -> PipePipe, `|=` -> PipeEq
    fn lex_pipe(&mut self, start: Position) -> Token {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('|') => self.two(TokenKind::PipePipe, start, "||"),
            Some('=') => self.two(TokenKind::PipeEq, start, "|="),
            _ => Token::new(TokenKind::Pipe, "|", start),
        }
    }

    /// `-` -> Minus, `-=` -> MinusEq, `->` -> ThinArrow
    fn lex_minus(&mut self, start: Position) -> Token {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('=') => self.two(TokenKind::MinusEq, start, "-="),
            Some('>') => self.two(TokenKind::ThinArrow, start, "->"),
            _ => Token::new(TokenKind::Minus, "-", start),
        }
    }

    /// `/` -> Slash, `/=` -> SlashEq, `//` -> line comment, `/*` -> block
    /// comment, `///` -> doc comment.
    fn lex_slash(&mut self, start: Position) -> (Token, Option<Diagnostic>) {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('=') => (self.two(TokenKind::SlashEq, start, "/="), None),
            Some('/') => (self.lex_line_comment(start), None),
            Some('*') => self.lex_block_comment(start),
            _ => (Token::new(TokenKind::Slash, "/", start), None),
        }
    }

    fn lex_line_comment(&mut self, start: Position) -> Token {
        self.cursor.advance(); // second '/'
        let kind = if self.cursor.peek() == Some('/') {
            self.cursor.advance();
            CommentKind::Doc
        } else {
            CommentKind::Line
        };
        let text_start = self.cursor.position().offset;
        self.cursor.eat_while(|c| c != '\n');
        let text_end = self.cursor.position().offset;
        let lexeme = self.cursor.slice(text_start, text_end);
        Token::comment(kind, lexeme, start)
    }

    fn lex_block_comment(&mut self, start: Position) -> (Token, Option<Diagnostic>) {
        self.cursor.advance(); // consume '*'
        let text_start = self.cursor.position().offset;
        loop {
            match self.cursor.peek() {
                None => {
                    let lexeme = self.cursor.slice(text_start, self.cursor.position().offset);
                    return (
                        Token::comment(CommentKind::Block, lexeme, start),
                        Some(Diagnostic::new(
                            DiagnosticCode::UnterminatedString,
                            "unterminated block comment",
                            start,
                        )),
                    );
                }
                Some('*') if self.cursor.peek_next() == Some('/') => {
                    let text_end = self.cursor.position().offset;
                    let lexeme = self.cursor.slice(text_start, text_end).to_string();
                    self.cursor.advance();
                    self.cursor.advance();
                    return (Token::comment(CommentKind::Block, lexeme, start), None);
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn lex_string(&mut self, start: Position) -> (Token, Option<Diagnostic>) {
        self.cursor.advance(); // opening quote
        let content_start = self.cursor.position().offset;
        loop {
            match self.cursor.peek() {
                None => {
                    let lexeme = self.cursor.slice(content_start, self.cursor.position().offset);
                    return (
                        Token::new(TokenKind::String, lexeme, start),
                        Some(Diagnostic::new(
                            DiagnosticCode::UnterminatedString,
                            "unterminated string literal",
                            start,
                        )),
                    );
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('"') => {
                    let content_end = self.cursor.position().offset;
                    let lexeme = self.cursor.slice(content_start, content_end).to_string();
                    self.cursor.advance();
                    return (Token::new(TokenKind::String, lexeme, start), None);
                }
                Some('\n') => {
                    let lexeme = self.cursor.slice(content_start, self.cursor.position().offset);
                    return (
                        Token::new(TokenKind::String, lexeme, start),
                        Some(Diagnostic::new(
                            DiagnosticCode::UnterminatedString,
                            "unterminated string literal",
                            start,
                        )),
                    );
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Template strings are delimited by backticks and may contain
    /// `${expr}` interpolation. The lexer does not tokenize the interior
    /// expressions (that happens in the parser, which re-lexes each
    /// `${...}` segment on demand) -- it only needs to find the matching
    /// closing backtick, tracking brace depth so a `}` inside an
    /// interpolated expression doesn't end the template early.
    fn lex_template_string(&mut self, start: Position) -> (Token, Option<Diagnostic>) {
        self.cursor.advance(); // opening backtick
        let content_start = self.cursor.position().offset;
        let mut brace_depth: u32 = 0;
        loop {
            match self.cursor.peek() {
                None => {
                    let lexeme = self.cursor.slice(content_start, self.cursor.position().offset);
                    return (
                        Token::new(TokenKind::TemplateString, lexeme, start),
                        Some(Diagnostic::new(
                            DiagnosticCode::UnterminatedString,
                            "unterminated template string",
                            start,
                        )),
                    );
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('$') if self.cursor.peek_next() == Some('{') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    brace_depth += 1;
                }
                Some('{') if brace_depth > 0 => {
                    self.cursor.advance();
                    brace_depth += 1;
                }
                Some('}') if brace_depth > 0 => {
                    self.cursor.advance();
                    brace_depth -= 1;
                }
                Some('`') if brace_depth == 0 => {
                    let content_end = self.cursor.position().offset;
                    let lexeme = self.cursor.slice(content_start, content_end).to_string();
                    self.cursor.advance();
                    return (Token::new(TokenKind::TemplateString, lexeme, start), None);
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Numbers: decimal, hex (`0x`), optional fractional part, optional
    /// `n` bigint suffix.
    fn lex_number(&mut self, start: Position) -> Token {
        let offset_start = self.cursor.position().offset;
        let first = self.cursor.advance().unwrap();

        if first == '0' && matches!(self.cursor.peek(), Some('x' | 'X')) {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
            let end = self.cursor.position().offset;
            let lexeme = self.cursor.slice(offset_start, end);
            return Token::new(TokenKind::Number, lexeme, start);
        }

        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');

        let mut is_float = false;
        if self.cursor.peek() == Some('.') && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            is_float = true;
            self.cursor.advance();
            if matches!(self.cursor.peek(), Some('+' | '-')) {
                self.cursor.advance();
            }
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        if !is_float && self.cursor.peek() == Some('n') {
            self.cursor.advance();
            let end = self.cursor.position().offset;
            let lexeme = self.cursor.slice(offset_start, end);
            return Token::new(TokenKind::BigInt, lexeme, start);
        }

        let end = self.cursor.position().offset;
        let lexeme = self.cursor.slice(offset_start, end);
        Token::new(TokenKind::Number, lexeme, start)
    }

    fn lex_ident(&mut self, start: Position) -> Token {
        let offset_start = self.cursor.position().offset;
        self.cursor.eat_while(is_ident_continue);
        let end = self.cursor.position().offset;
        let lexeme = self.cursor.slice(offset_start, end);

        match Keyword::from_str(lexeme) {
            Some(kw) => Token::keyword(kw, lexeme, start),
            None => Token::new(TokenKind::Identifier, lexeme, start),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_yields_just_eof() {
        let (tokens, diags) = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
        assert!(diags.is_empty());
    }

    #[test]
    fn last_token_is_always_eof() {
        let (tokens, _) = tokenize("varia x = 1");
        assert!(tokens.last().unwrap().is_eof());
    }

    #[test]
    fn positions_are_monotone_by_offset() {
        let (tokens, _) = tokenize("varia x = 1 + 2");
        let offsets: Vec<u32> = tokens.iter().map(|t| t.position.offset).collect();
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn keyword_classification() {
        let (tokens, _) = tokenize("functio fit redde");
        assert!(tokens[0].is_keyword(Keyword::Functio));
        assert!(tokens[1].is_keyword(Keyword::Fit));
        assert!(tokens[2].is_keyword(Keyword::Redde));
    }

    #[test]
    fn generic_identifier_not_in_keyword_table() {
        let (tokens, _) = tokenize("fibonacci");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn hex_number_literal() {
        let (tokens, _) = tokenize("0xFF");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "0xFF");
    }

    #[test]
    fn bigint_suffix() {
        let (tokens, _) = tokenize("123n");
        assert_eq!(tokens[0].kind, TokenKind::BigInt);
    }

    #[test]
    fn float_literal() {
        let (tokens, _) = tokenize("3.14");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "3.14");
    }

    #[test]
    fn range_dot_dot_is_not_two_dots() {
        assert_eq!(kinds("1..5"), vec![TokenKind::Number, TokenKind::DotDot, TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn unterminated_string_still_produces_a_token_and_a_diagnostic() {
        let (tokens, diags) = tokenize("\"abc");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::UnterminatedString);
    }

    #[test]
    fn line_and_doc_comments_are_classified() {
        let (tokens, _) = tokenize("// plain\n/// doc");
        assert_eq!(tokens[0].comment_kind, Some(CommentKind::Line));
        assert_eq!(tokens[1].comment_kind, Some(CommentKind::Doc));
    }

    #[test]
    fn block_comment_is_classified() {
        let (tokens, _) = tokenize("/* hi */");
        assert_eq!(tokens[0].comment_kind, Some(CommentKind::Block));
        assert_eq!(tokens[0].lexeme, " hi ");
    }

    #[test]
    fn optional_and_nonnull_chaining_operators() {
        assert_eq!(
            kinds("a?.b?[0]?(x)!.c"),
            vec![
                TokenKind::Identifier,
                TokenKind::QuestionDot,
                TokenKind::Identifier,
                TokenKind::QuestionLBracket,
                TokenKind::Number,
                TokenKind::RBracket,
                TokenKind::QuestionLParen,
                TokenKind::Identifier,
                TokenKind::RParen,
                TokenKind::BangDot,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn template_string_balances_nested_braces() {
        let (tokens, _) = tokenize("`hi ${ { 1: 2 } } bye`");
        assert_eq!(tokens[0].kind, TokenKind::TemplateString);
        assert_eq!(tokens[0].lexeme, "hi ${ { 1: 2 } } bye");
    }

    #[test]
    fn stray_character_becomes_error_token_with_diagnostic() {
        let (tokens, diags) = tokenize("$");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(diags[0].code, DiagnosticCode::StrayCharacter);
    }
}
