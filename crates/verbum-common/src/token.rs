//! Token kinds, keyword classification, and comment sub-kinds.

use serde::Serialize;

use crate::position::Position;

/// A single lexical token.
///
/// `lexeme` is the exact source slice the token was scanned from (so
/// literal `raw` text survives for fidelity in codegen, per spec §4.3).
/// `keyword` is set when `kind == TokenKind::Keyword`, `comment_kind` when
/// `kind == TokenKind::Comment`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
    pub keyword: Option<Keyword>,
    pub comment_kind: Option<CommentKind>,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            position,
            keyword: None,
            comment_kind: None,
        }
    }

    pub fn keyword(kw: Keyword, lexeme: impl Into<String>, position: Position) -> Self {
        Self {
            kind: TokenKind::Keyword,
            lexeme: lexeme.into(),
            position,
            keyword: Some(kw),
            comment_kind: None,
        }
    }

    pub fn comment(kind: CommentKind, lexeme: impl Into<String>, position: Position) -> Self {
        Self {
            kind: TokenKind::Comment,
            lexeme: lexeme.into(),
            position,
            keyword: None,
            comment_kind: Some(kind),
        }
    }

    pub fn eof(position: Position) -> Self {
        Self::new(TokenKind::Eof, "", position)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.keyword == Some(kw)
    }
}

/// The coarse classification of a token; see `Keyword`/`CommentKind` for
/// the finer sub-classification carried alongside `Keyword`/`Comment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    // ── Punctuation ──────────────────────────────────────────────────
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Semicolon,
    Dot,
    DotDot,
    Question,
    Bang,
    At,
    Arrow,     // =>
    ThinArrow, // ->

    // ── Operators ────────────────────────────────────────────────────
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AmpAmp,
    PipePipe,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Shl,
    Shr,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    QuestionDot,   // ?.
    QuestionLBracket, // ?[
    QuestionLParen,   // ?(
    BangDot,       // !.
    BangLBracket,  // ![
    BangLParen,    // !(

    // ── Literals ─────────────────────────────────────────────────────
    Number,
    BigInt,
    String,
    TemplateString,

    // ── Names ────────────────────────────────────────────────────────
    Identifier,
    Keyword,

    // ── Trivia ───────────────────────────────────────────────────────
    Comment,

    // ── Sentinel ─────────────────────────────────────────────────────
    Eof,
    /// A lexical anomaly recovered to a best-effort token (spec §4.1).
    Error,
}

/// Every Latin keyword the tokenizer recognizes, per spec §4.1's fixed
/// classification table. An identifier not in this table is a generic
/// `TokenKind::Identifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    // declarations
    Varia,
    Fixum,
    Figendum,
    Variandum,
    Functio,
    Pactum,
    Genus,
    Typus,
    Ordo,
    Discretio,
    Sub,
    Implet,
    Importa,

    // return-verb forms
    Fit,
    Fiet,
    Fiunt,
    Fient,
    Futura,
    Cursor,

    // control flow
    Si,
    Ergo,
    Sin,
    Secus,
    Dum,
    Pro,
    Ex,
    Ab,
    De,
    In,
    Elige,
    Discerne,
    Custodi,
    Adfirma,
    Redde,
    Rumpe,
    Perge,
    Iace,
    Mori,
    Tempta,
    Cape,
    Demum,
    Fac,

    // logging
    Scribe,
    Vide,
    Mone,

    // testing
    Probandum,
    Proba,
    Omitte,
    Futurum,
    Praepara,
    Praeparabit,
    Postpara,
    Postparabit,
    Omnia,

    // resources / dispatch / entry
    Cura,
    Arena,
    Page,
    Ad,
    Ut,
    Incipit,
    Incipiet,

    // DSL
    Prima,
    Ultima,
    Summa,
    Ubi,
    Non,
    Usque,
    Ante,
    Per,
    Sed,

    // expressions
    Vel,
    Aut,
    Et,
    Qua,
    Est,
    Nulla,
    Nonnulla,
    Nihil,
    Nonnihil,
    Negativum,
    Positivum,
    Cede,
    Novum,
    Finge,
    Praefixum,
    Scriptum,
    Lege,
    Ego,
    Verum,
    Falsum,
    Sparge,
    Ceteri,
    Vacuum,

    // value keyword ("with" clause on Novum)
    Cum,
}

impl Keyword {
    /// Classify a lexeme as a keyword, if it is one. Any identifier not
    /// found here is a generic identifier.
    pub fn from_str(s: &str) -> Option<Keyword> {
        use Keyword::*;
        Some(match s {
            "varia" => Varia,
            "fixum" => Fixum,
            "figendum" => Figendum,
            "variandum" => Variandum,
            "functio" => Functio,
            "pactum" => Pactum,
            "genus" => Genus,
            "typus" => Typus,
            "ordo" => Ordo,
            "discretio" => Discretio,
            "sub" => Sub,
            "implet" => Implet,
            "importa" => Importa,
            "fit" => Fit,
            "fiet" => Fiet,
            "fiunt" => Fiunt,
            "fient" => Fient,
            "futura" => Futura,
            "cursor" => Cursor,
            "si" => Si,
            "ergo" => Ergo,
            "sin" => Sin,
            "secus" => Secus,
            "dum" => Dum,
            "pro" => Pro,
            "ex" => Ex,
            "ab" => Ab,
            "de" => De,
            "in" => In,
            "elige" => Elige,
            "discerne" => Discerne,
            "custodi" => Custodi,
            "adfirma" => Adfirma,
            "redde" => Redde,
            "rumpe" => Rumpe,
            "perge" => Perge,
            "iace" => Iace,
            "mori" => Mori,
            "tempta" => Tempta,
            "cape" => Cape,
            "demum" => Demum,
            "fac" => Fac,
            "scribe" => Scribe,
            "vide" => Vide,
            "mone" => Mone,
            "probandum" => Probandum,
            "proba" => Proba,
            "omitte" => Omitte,
            "futurum" => Futurum,
            "praepara" => Praepara,
            "praeparabit" => Praeparabit,
            "postpara" => Postpara,
            "postparabit" => Postparabit,
            "omnia" => Omnia,
            "cura" => Cura,
            "arena" => Arena,
            "page" => Page,
            "ad" => Ad,
            "ut" => Ut,
            "incipit" => Incipit,
            "incipiet" => Incipiet,
            "prima" => Prima,
            "ultima" => Ultima,
            "summa" => Summa,
            "ubi" => Ubi,
            "non" => Non,
            "usque" => Usque,
            "ante" => Ante,
            "per" => Per,
            "sed" => Sed,
            "vel" => Vel,
            "aut" => Aut,
            "et" => Et,
            "qua" => Qua,
            "est" => Est,
            "nulla" => Nulla,
            "nonnulla" => Nonnulla,
            "nihil" => Nihil,
            "nonnihil" => Nonnihil,
            "negativum" => Negativum,
            "positivum" => Positivum,
            "cede" => Cede,
            "novum" => Novum,
            "finge" => Finge,
            "praefixum" => Praefixum,
            "scriptum" => Scriptum,
            "lege" => Lege,
            "ego" => Ego,
            "verum" => Verum,
            "falsum" => Falsum,
            "sparge" => Sparge,
            "ceteri" => Ceteri,
            "vacuum" => Vacuum,
            "cum" => Cum,
            _ => return None,
        })
    }
}

/// The sub-kind of a `TokenKind::Comment` token, per spec §3/§4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommentKind {
    Line,
    Block,
    Doc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_hits_and_misses() {
        assert_eq!(Keyword::from_str("functio"), Some(Keyword::Functio));
        assert_eq!(Keyword::from_str("fiunt"), Some(Keyword::Fiunt));
        assert_eq!(Keyword::from_str("nonExistentWord"), None);
    }

    #[test]
    fn token_constructors_set_expected_fields() {
        let pos = Position::start();
        let t = Token::keyword(Keyword::Si, "si", pos);
        assert!(t.is_keyword(Keyword::Si));
        assert_eq!(t.kind, TokenKind::Keyword);

        let c = Token::comment(CommentKind::Doc, "## hi", pos);
        assert!(c.is_comment());
        assert_eq!(c.comment_kind, Some(CommentKind::Doc));

        let e = Token::eof(pos);
        assert!(e.is_eof());
    }
}
