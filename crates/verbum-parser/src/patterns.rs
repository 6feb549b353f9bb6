//! Binding-pattern and type-annotation parsing, shared by `varia`
//! declarations, destructuring, and function parameters.

use crate::error::ParseError;
use crate::Parser;
use verbum_ast::{
    ArrayPattern, ArrayPatternElement, BorrowPreposition, NamedType, ObjectPattern,
    ObjectPatternProperty, Pattern, Specifier, TypeExpr,
};
use verbum_common::{DiagnosticCode, Keyword, TokenKind};

impl Parser {
    /// `IDENT` | `[ pattern-elements ]` | `{ pattern-properties }`
    pub(crate) fn parse_pattern(&mut self) -> Result<Pattern, ParseError> {
        if self.check(TokenKind::LBracket) {
            self.parse_array_pattern()
        } else if self.check(TokenKind::LBrace) {
            self.parse_object_pattern()
        } else {
            let (name, _) = self.expect_identifier()?;
            Ok(Pattern::Identifier(name))
        }
    }

    fn parse_array_pattern(&mut self) -> Result<Pattern, ParseError> {
        self.expect(TokenKind::LBracket, "'['")?;
        let mut elements = Vec::new();
        while !self.check(TokenKind::RBracket) {
            if self.match_keyword(Keyword::Ceteri) {
                let (name, _) = self.expect_identifier()?;
                elements.push(ArrayPatternElement::Rest(name));
            } else if self.check(TokenKind::Identifier) && self.peek().lexeme == "_" {
                self.advance();
                elements.push(ArrayPatternElement::Skip);
            } else {
                let (name, _) = self.expect_identifier()?;
                elements.push(ArrayPatternElement::Binding(name));
            }
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "']'")?;
        Ok(Pattern::Array(ArrayPattern { elements }))
    }

    fn parse_object_pattern(&mut self) -> Result<Pattern, ParseError> {
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut properties = Vec::new();
        let mut rest = None;
        while !self.check(TokenKind::RBrace) {
            if self.match_keyword(Keyword::Ceteri) {
                let (name, _) = self.expect_identifier()?;
                rest = Some(name);
            } else {
                let (key, _) = self.expect_identifier()?;
                let alias = if self.match_keyword(Keyword::Ut) {
                    Some(self.expect_identifier()?.0)
                } else {
                    None
                };
                properties.push(ObjectPatternProperty { key, alias });
            }
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Pattern::Object(ObjectPattern { properties, rest }))
    }

    /// Destructure/import specifier list: `nomen ut n, ceteri rest`.
    pub(crate) fn parse_specifiers(&mut self) -> Result<Vec<Specifier>, ParseError> {
        let mut specifiers = Vec::new();
        loop {
            if self.match_keyword(Keyword::Ceteri) {
                let (name, _) = self.expect_identifier()?;
                specifiers.push(Specifier { imported: name, local: None, rest: true });
            } else {
                let (imported, _) = self.expect_identifier()?;
                let local = if self.match_keyword(Keyword::Ut) {
                    Some(self.expect_identifier()?.0)
                } else {
                    None
                };
                specifiers.push(Specifier { imported, local, rest: false });
            }
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        Ok(specifiers)
    }

    /// `NAME` | `NAME<T, ...>` | `T[]` | `unio<A, B>` | `T?` | `de T` | `in T`
    pub(crate) fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        let mut ty = self.parse_type_primary()?;
        loop {
            if self.check(TokenKind::LBracket) && self.check2(TokenKind::RBracket) {
                self.advance();
                self.advance();
                ty = TypeExpr::Array(Box::new(ty), true);
                continue;
            }
            if self.match_token(TokenKind::Question) {
                ty = TypeExpr::Nullable(Box::new(ty));
                continue;
            }
            break;
        }
        Ok(ty)
    }

    pub(crate) fn check2(&self, kind: TokenKind) -> bool {
        self.peek2().kind == kind
    }

    fn parse_type_primary(&mut self) -> Result<TypeExpr, ParseError> {
        if self.match_keyword(Keyword::De) {
            return Ok(TypeExpr::Borrowed(BorrowPreposition::De, Box::new(self.parse_type()?)));
        }
        if self.match_keyword(Keyword::In) {
            return Ok(TypeExpr::Borrowed(BorrowPreposition::In, Box::new(self.parse_type()?)));
        }

        let tok = self.peek().clone();
        if tok.kind != TokenKind::Identifier {
            return Err(ParseError::new(
                DiagnosticCode::ExpectedTypeName,
                format!("expected a type name, found '{}'", tok.lexeme),
                tok.position,
            ));
        }
        let name = self.advance().lexeme;

        if name == "unio" && self.check(TokenKind::Lt) {
            self.advance();
            let mut members = Vec::new();
            loop {
                members.push(self.parse_type()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::Gt, "'>'")?;
            return Ok(TypeExpr::Union(members));
        }

        let mut type_args = Vec::new();
        if self.match_token(TokenKind::Lt) {
            loop {
                type_args.push(self.parse_type()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::Gt, "'>'")?;
        }
        Ok(TypeExpr::Named(NamedType { name, type_args }))
    }
}
