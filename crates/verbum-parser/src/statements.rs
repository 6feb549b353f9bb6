//! Statement-level dispatch: one parse function per leading keyword, plus
//! the annotation prefix and the bare-expression-statement fallback.

use crate::error::ParseError;
use crate::Parser;
use verbum_ast::*;
use verbum_common::{DiagnosticCode, Keyword, Position, TokenKind};

impl Parser {
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let annotations = self.parse_annotations()?;
        let start = self.peek().position;
        let leading = self.leading_comments_for(start);

        let mut is_futura = false;
        let mut is_cursor = false;
        loop {
            if self.check_keyword(Keyword::Futura) {
                is_futura = true;
                self.advance();
            } else if self.check_keyword(Keyword::Cursor) {
                is_cursor = true;
                self.advance();
            } else {
                break;
            }
        }
        if (is_futura || is_cursor) && !self.check_keyword(Keyword::Functio) {
            let tok = self.peek().clone();
            return Err(ParseError::new(
                DiagnosticCode::ExpectedKeyword,
                format!("expected 'functio' after 'futura'/'cursor' modifier, found '{}'", tok.lexeme),
                tok.position,
            ));
        }

        let mut stmt = if self.check_keyword(Keyword::Functio) {
            self.parse_functio_decl(start, annotations, is_futura, is_cursor)?
        } else if self.check_keyword(Keyword::Varia)
            || self.check_keyword(Keyword::Fixum)
            || self.check_keyword(Keyword::Figendum)
            || self.check_keyword(Keyword::Variandum)
        {
            self.parse_varia_decl(start, annotations)?
        } else if self.check_keyword(Keyword::Ex) {
            self.parse_ex_led(start, annotations)?
        } else if self.check_keyword(Keyword::De) {
            self.advance();
            self.parse_iteratio_tail(start, true)?
        } else if self.check_keyword(Keyword::Pactum) {
            self.parse_pactum(start, annotations)?
        } else if self.check_keyword(Keyword::Genus) {
            self.parse_genus(start, annotations)?
        } else if self.check_keyword(Keyword::Typus) {
            self.parse_type_alias(start, annotations)?
        } else if self.check_keyword(Keyword::Ordo) {
            self.parse_ordo(start, annotations)?
        } else if self.check_keyword(Keyword::Discretio) {
            self.parse_discretio(start, annotations)?
        } else if self.check_keyword(Keyword::Si) {
            self.parse_si(start)?
        } else if self.check_keyword(Keyword::Dum) {
            self.parse_dum(start)?
        } else if self.check_keyword(Keyword::In) {
            self.parse_in_stmt(start)?
        } else if self.check_keyword(Keyword::Elige) {
            self.parse_elige(start)?
        } else if self.check_keyword(Keyword::Discerne) {
            self.parse_discerne(start)?
        } else if self.check_keyword(Keyword::Custodi) {
            self.parse_custodi(start)?
        } else if self.check_keyword(Keyword::Adfirma) {
            self.parse_adfirma(start)?
        } else if self.check_keyword(Keyword::Redde) {
            self.parse_redde(start)?
        } else if self.check_keyword(Keyword::Rumpe) {
            self.advance();
            self.expect(TokenKind::Semicolon, "';'")?;
            Stmt::Rumpe(Meta::at(start))
        } else if self.check_keyword(Keyword::Perge) {
            self.advance();
            self.expect(TokenKind::Semicolon, "';'")?;
            Stmt::Perge(Meta::at(start))
        } else if self.check_keyword(Keyword::Iace) || self.check_keyword(Keyword::Mori) {
            self.parse_iace(start)?
        } else if self.check_keyword(Keyword::Scribe) || self.check_keyword(Keyword::Vide) || self.check_keyword(Keyword::Mone) {
            self.parse_scribe(start)?
        } else if self.check_keyword(Keyword::Tempta) {
            self.parse_tempta(start)?
        } else if self.check_keyword(Keyword::Fac) {
            self.parse_fac(start)?
        } else if self.check_keyword(Keyword::Cura) {
            self.parse_cura(start)?
        } else if self.check_keyword(Keyword::Ad) {
            self.parse_ad(start)?
        } else if self.check_keyword(Keyword::Incipit) {
            self.parse_incipit(start)?
        } else if self.check_keyword(Keyword::Probandum) {
            self.parse_probandum(start)?
        } else if self.check_keyword(Keyword::Proba) {
            self.parse_proba(start)?
        } else if matches!(
            self.peek().keyword,
            Some(Keyword::Praepara | Keyword::Praeparabit | Keyword::Postpara | Keyword::Postparabit)
        ) {
            self.parse_hook(start)?
        } else if self.check(TokenKind::LBrace) {
            Stmt::Block(self.parse_block()?)
        } else {
            let expr = self.parse_expression()?;
            self.expect(TokenKind::Semicolon, "';'")?;
            Stmt::Expr(Box::new(expr))
        };

        if annotations.is_some() && !stmt.is_declaration() {
            self.errors.push(ParseError::new(
                DiagnosticCode::AnnotationOnNonDeclaration,
                "annotations may only attach to a declaration",
                start,
            ));
        }

        let meta = stmt.meta_mut();
        meta.leading_comments = leading;
        meta.trailing_comments = self.take_trailing_comment(start.line);
        Ok(stmt)
    }

    /// `@ mod1 mod2 ...` lines preceding a declaration. Multiple annotation
    /// lines accumulate into one list.
    fn parse_annotations(&mut self) -> Result<Option<Vec<Annotation>>, ParseError> {
        let mut annotations = Vec::new();
        while self.check(TokenKind::At) {
            let pos = self.advance().position;
            let mut modifiers = Vec::new();
            while self.check(TokenKind::Identifier) {
                modifiers.push(self.advance().lexeme);
            }
            annotations.push(Annotation { modifiers, position: pos });
        }
        Ok(if annotations.is_empty() { None } else { Some(annotations) })
    }

    // ── Declarations ─────────────────────────────────────────────────────

    fn parse_varia_kind(&mut self) -> Result<VariaKind, ParseError> {
        let kind = if self.check_keyword(Keyword::Varia) {
            VariaKind::Varia
        } else if self.check_keyword(Keyword::Fixum) {
            VariaKind::Fixum
        } else if self.check_keyword(Keyword::Figendum) {
            VariaKind::Figendum
        } else if self.check_keyword(Keyword::Variandum) {
            VariaKind::Variandum
        } else {
            let tok = self.peek().clone();
            return Err(ParseError::new(
                DiagnosticCode::ExpectedKeyword,
                format!("expected 'varia'/'fixum'/'figendum'/'variandum', found '{}'", tok.lexeme),
                tok.position,
            ));
        };
        self.advance();
        Ok(kind)
    }

    fn parse_varia_decl(&mut self, pos: Position, annotations: Option<Vec<Annotation>>) -> Result<Stmt, ParseError> {
        let kind = self.parse_varia_kind()?;
        let pattern = self.parse_pattern()?;
        let type_annotation = if self.match_token(TokenKind::Colon) { Some(self.parse_type()?) } else { None };
        let initializer = if self.match_token(TokenKind::Eq) { Some(Box::new(self.parse_expression()?)) } else { None };
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Stmt::Varia(VariaDecl { meta: Meta::at(pos), annotations, kind, pattern, type_annotation, initializer }))
    }

    /// `ex` is the single entry point for three productions, picked by a
    /// 2-token lookahead right after `ex` (spec §4.2): an import source is
    /// always the lone string-literal token (`ex "module" importa …`); a
    /// destructure's binding kind follows its (single-token) source
    /// directly (`ex SOURCE (fixum|varia|figendum|variandum) …`); anything
    /// else is an iteration, whose source may itself carry a DSL filter/
    /// transform chain before the binding verb (`ex EXPR [DSL…] (pro|fit|
    /// fiet) IDENT …`).
    fn parse_ex_led(&mut self, pos: Position, annotations: Option<Vec<Annotation>>) -> Result<Stmt, ParseError> {
        self.advance(); // 'ex'
        if self.check2_keyword(Keyword::Importa) {
            return self.parse_importa_tail(pos, annotations);
        }
        if matches!(self.peek2().keyword, Some(Keyword::Varia | Keyword::Fixum | Keyword::Figendum | Keyword::Variandum)) {
            return self.parse_destructure_tail(pos, annotations);
        }
        self.parse_iteratio_tail(pos, false)
    }

    /// `ex "module" importa SPECIFIERS;`
    fn parse_importa_tail(&mut self, pos: Position, annotations: Option<Vec<Annotation>>) -> Result<Stmt, ParseError> {
        let (path, path_pos) = self.expect_string_literal()?;
        let source = Box::new(Expr::Literal(LiteralExpr {
            meta: Meta::at(path_pos),
            value: LiteralValue::Str(path.clone()),
            raw: path,
        }));
        self.expect_keyword(Keyword::Importa, "importa")?;
        let specifiers = self.parse_specifiers()?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Stmt::Importa(ImportaStmt { meta: Meta::at(pos), annotations, source, specifiers }))
    }

    /// `ex SOURCE (fixum|varia|figendum|variandum) SPECIFIERS;`
    fn parse_destructure_tail(&mut self, pos: Position, annotations: Option<Vec<Annotation>>) -> Result<Stmt, ParseError> {
        let source = Box::new(self.parse_postfix()?);
        if !matches!(self.peek().keyword, Some(Keyword::Varia | Keyword::Fixum | Keyword::Figendum | Keyword::Variandum)) {
            let tok = self.peek().clone();
            return Err(ParseError::new(
                DiagnosticCode::InvalidExIntroducer,
                format!("expected a binding kind after 'ex SOURCE', found '{}'", tok.lexeme),
                tok.position,
            ));
        }
        let kind = self.parse_varia_kind()?;
        let specifiers = self.parse_specifiers()?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Stmt::Destructure(DestructureStmt { meta: Meta::at(pos), annotations, kind, source, specifiers }))
    }

    fn parse_type_params(&mut self) -> Result<Vec<TypeParam>, ParseError> {
        let mut params = Vec::new();
        if self.match_token(TokenKind::Lt) {
            loop {
                let (name, _) = self.expect_identifier()?;
                params.push(TypeParam { name });
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::Gt, "'>'")?;
        }
        Ok(params)
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) {
            let preposition = if self.match_keyword(Keyword::De) {
                Some(ParamPreposition::De)
            } else if self.match_keyword(Keyword::In) {
                Some(ParamPreposition::In)
            } else if self.match_keyword(Keyword::Ex) {
                Some(ParamPreposition::Ex)
            } else {
                None
            };
            let (first, _) = self.expect_identifier()?;
            // An external label is only introduced via `ut`; bare juxtaposition of
            // two identifiers is instead the "user type + name" shorthand (spec
            // §4.2 "Two consecutive identifiers ... indicate user type + name").
            let (external_name, internal_name, mut type_annotation) = if self.match_keyword(Keyword::Ut) {
                let (alias, _) = self.expect_identifier()?;
                (Some(first), alias, None)
            } else if self.check(TokenKind::Identifier) {
                let (second, _) = self.expect_identifier()?;
                (None, second, Some(TypeExpr::Named(NamedType::simple(first))))
            } else {
                (None, first, None)
            };
            if self.match_token(TokenKind::Colon) {
                type_annotation = Some(self.parse_type()?);
            }
            let default = if self.match_token(TokenKind::Eq) || self.match_keyword(Keyword::Vel) {
                Some(Box::new(self.parse_expression()?))
            } else {
                None
            };
            params.push(Param { external_name, internal_name, preposition, type_annotation, default });
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(params)
    }

    fn parse_return_clause(&mut self) -> Result<(Option<ReturnVerb>, Option<TypeExpr>), ParseError> {
        let verb = if self.match_token(TokenKind::ThinArrow) {
            Some(ReturnVerb::Arrow)
        } else if self.match_keyword(Keyword::Fit) {
            Some(ReturnVerb::Fit)
        } else if self.match_keyword(Keyword::Fiet) {
            Some(ReturnVerb::Fiet)
        } else if self.match_keyword(Keyword::Fiunt) {
            Some(ReturnVerb::Fiunt)
        } else if self.match_keyword(Keyword::Fient) {
            Some(ReturnVerb::Fient)
        } else {
            None
        };
        let return_type = if verb.is_some() { Some(self.parse_type()?) } else { None };
        Ok((verb, return_type))
    }

    fn parse_functio_decl(
        &mut self,
        pos: Position,
        annotations: Option<Vec<Annotation>>,
        modifier_futura: bool,
        modifier_cursor: bool,
    ) -> Result<Stmt, ParseError> {
        self.advance(); // 'functio'
        let (name, _) = self.expect_identifier()?;
        let is_constructor = name == "creo";
        let type_params = self.parse_type_params()?;
        let params = self.parse_params()?;
        let (return_verb, return_type) = self.parse_return_clause()?;
        let is_async = modifier_futura || return_verb.is_some_and(ReturnVerb::implies_async);
        let is_generator = modifier_cursor || return_verb.is_some_and(ReturnVerb::implies_generator);
        let body = self.parse_block()?;
        Ok(Stmt::Functio(FunctioDecl {
            meta: Meta::at(pos),
            annotations,
            name,
            type_params,
            params,
            return_verb,
            return_type,
            is_async,
            is_generator,
            is_constructor,
            body,
        }))
    }

    fn parse_pactum(&mut self, pos: Position, annotations: Option<Vec<Annotation>>) -> Result<Stmt, ParseError> {
        self.advance(); // 'pactum'
        let (name, _) = self.expect_identifier()?;
        let type_params = self.parse_type_params()?;
        let mut extends = Vec::new();
        if self.match_keyword(Keyword::Implet) {
            loop {
                extends.push(self.expect_identifier()?.0);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut members = Vec::new();
        while !self.check(TokenKind::RBrace) {
            self.expect_keyword(Keyword::Sub, "sub")?;
            let (member_name, _) = self.expect_identifier()?;
            let params = self.parse_params()?;
            let (_, return_type) = self.parse_return_clause()?;
            self.expect(TokenKind::Semicolon, "';'")?;
            members.push(PactumMember { name: member_name, params, return_type });
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Stmt::Pactum(PactumDecl { meta: Meta::at(pos), annotations, name, type_params, extends, members }))
    }

    fn parse_genus_field(&mut self) -> Result<GenusField, ParseError> {
        let (name, _) = self.expect_identifier()?;
        let type_annotation = if self.match_token(TokenKind::Colon) { Some(self.parse_type()?) } else { None };
        let default = if self.match_token(TokenKind::Eq) { Some(Box::new(self.parse_expression()?)) } else { None };
        Ok(GenusField { name, type_annotation, default })
    }

    fn parse_genus(&mut self, pos: Position, annotations: Option<Vec<Annotation>>) -> Result<Stmt, ParseError> {
        self.advance(); // 'genus'
        let (name, _) = self.expect_identifier()?;
        let type_params = self.parse_type_params()?;
        let sub = if self.match_keyword(Keyword::Sub) { Some(self.expect_identifier()?.0) } else { None };
        let mut implements = Vec::new();
        if self.match_keyword(Keyword::Implet) {
            loop {
                implements.push(self.expect_identifier()?.0);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut fields = Vec::new();
        let mut methods = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_eof() {
            let member = if self.check_keyword(Keyword::Functio) {
                let method_pos = self.peek().position;
                self.parse_functio_decl(method_pos, None, false, false).map(|stmt| match stmt {
                    Stmt::Functio(f) => methods.push(f),
                    _ => unreachable!(),
                })
            } else {
                self.parse_genus_field().and_then(|field| {
                    fields.push(field);
                    self.expect(TokenKind::Semicolon, "';'").map(|_| ())
                })
            };
            if let Err(err) = member {
                self.errors.push(err);
                self.synchronize_genus_member();
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Stmt::Genus(GenusDecl { meta: Meta::at(pos), annotations, name, type_params, sub, implements, fields, methods }))
    }

    fn parse_type_alias(&mut self, pos: Position, annotations: Option<Vec<Annotation>>) -> Result<Stmt, ParseError> {
        self.advance(); // 'typus'
        let (name, _) = self.expect_identifier()?;
        let type_params = self.parse_type_params()?;
        self.expect(TokenKind::Eq, "'='")?;
        let aliased = self.parse_type()?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Stmt::TypeAlias(TypeAliasDecl { meta: Meta::at(pos), annotations, name, type_params, aliased }))
    }

    fn parse_ordo(&mut self, pos: Position, annotations: Option<Vec<Annotation>>) -> Result<Stmt, ParseError> {
        self.advance(); // 'ordo'
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut variants = Vec::new();
        while !self.check(TokenKind::RBrace) {
            variants.push(self.expect_identifier()?.0);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Stmt::Ordo(OrdoDecl { meta: Meta::at(pos), annotations, name, variants }))
    }

    fn parse_discretio(&mut self, pos: Position, annotations: Option<Vec<Annotation>>) -> Result<Stmt, ParseError> {
        self.advance(); // 'discretio'
        let (name, _) = self.expect_identifier()?;
        let type_params = self.parse_type_params()?;
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut variants = Vec::new();
        while !self.check(TokenKind::RBrace) {
            let (variant_name, _) = self.expect_identifier()?;
            let mut fields = Vec::new();
            if self.match_token(TokenKind::LParen) {
                while !self.check(TokenKind::RParen) {
                    fields.push(self.parse_genus_field()?);
                    if !self.match_token(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RParen, "')'")?;
            }
            variants.push(DiscretioVariant { name: variant_name, fields });
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Stmt::Discretio(DiscretioDecl { meta: Meta::at(pos), annotations, name, type_params, variants }))
    }

    // ── Control flow ─────────────────────────────────────────────────────

    fn parse_cape_clause(&mut self) -> Result<Option<CapeClause>, ParseError> {
        if self.match_keyword(Keyword::Cape) {
            let binding = if self.check(TokenKind::Identifier) { Some(self.advance().lexeme) } else { None };
            let body = self.parse_block()?;
            Ok(Some(CapeClause { binding, body }))
        } else {
            Ok(None)
        }
    }

    fn parse_si(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        self.advance(); // 'si'
        self.parse_si_tail(pos)
    }

    /// Shared by `si` and `sin` (else-if): both consume their own leading
    /// keyword themselves, then share condition/then/cape/else parsing.
    fn parse_si_tail(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        let condition = Box::new(self.parse_expression()?);
        let then_branch = if self.match_keyword(Keyword::Ergo) {
            SiThen::Ergo(Box::new(self.parse_statement()?))
        } else {
            SiThen::Block(self.parse_block()?)
        };
        let cape = self.parse_cape_clause()?;
        let else_branch = if self.check_keyword(Keyword::Sin) {
            let sin_pos = self.advance().position;
            Some(Box::new(self.parse_si_tail(sin_pos)?))
        } else if self.match_keyword(Keyword::Secus) {
            Some(Box::new(Stmt::Block(self.parse_block()?)))
        } else {
            None
        };
        Ok(Stmt::Si(SiStmt { meta: Meta::at(pos), condition, then_branch, cape, else_branch }))
    }

    fn parse_dum(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        self.advance(); // 'dum'
        let condition = Box::new(self.parse_expression()?);
        let body = self.parse_block()?;
        Ok(Stmt::Dum(DumStmt { meta: Meta::at(pos), condition, body }))
    }

    /// `EXPR [DSL…] (pro|fit|fiet) IDENT { body }` -- the shared tail of
    /// both `ex`-iteration (`over_keys = false`) and `de`-iteration
    /// (`over_keys = true`, for-in-keys, spec §4.2). `fiet` marks the loop
    /// async, matching the binding-verb set `cura`/`ad` already use.
    fn parse_iteratio_tail(&mut self, pos: Position, over_keys: bool) -> Result<Stmt, ParseError> {
        let mut source = Box::new(self.parse_postfix()?);
        let (filter, transforms) = self.parse_dsl_filter_and_transforms()?;
        if filter.is_some() || !transforms.is_empty() {
            source = Box::new(Expr::CollectionDsl(CollectionDslExpr {
                meta: source.meta().clone(),
                source,
                entry: DslEntry::Ex,
                filter,
                transforms,
            }));
        }
        if !matches!(self.peek().keyword, Some(Keyword::Pro | Keyword::Fit | Keyword::Fiet)) {
            let tok = self.peek().clone();
            return Err(ParseError::new(
                DiagnosticCode::ExpectedKeyword,
                format!("expected 'pro', 'fit', or 'fiet' in an iteration, found '{}'", tok.lexeme),
                tok.position,
            ));
        }
        let is_async = self.check_keyword(Keyword::Fiet);
        self.advance();
        let (binding, _) = self.expect_identifier()?;
        let body = self.parse_block()?;
        Ok(Stmt::Iteratio(IteratioStmt { meta: Meta::at(pos), source, over_keys, is_async, binding, body }))
    }

    fn parse_in_stmt(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        self.advance(); // 'in'
        let target = Box::new(self.parse_expression()?);
        let body = self.parse_block()?;
        Ok(Stmt::In(InStmt { meta: Meta::at(pos), target, body }))
    }

    fn parse_elige(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        self.advance(); // 'elige'
        let discriminant = Box::new(self.parse_expression()?);
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut cases = Vec::new();
        while !self.check(TokenKind::RBrace) {
            let test = if self.match_keyword(Keyword::Secus) {
                None
            } else {
                self.expect_keyword(Keyword::Si, "si")?;
                Some(Box::new(self.parse_expression()?))
            };
            let body = self.parse_block()?;
            cases.push(EligeCase { test, body });
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Stmt::Elige(EligeStmt { meta: Meta::at(pos), discriminant, cases }))
    }

    fn parse_discerne(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        self.advance(); // 'discerne'
        let discriminant = Box::new(self.parse_expression()?);
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut cases = Vec::new();
        while !self.check(TokenKind::RBrace) {
            let (variant_name, case_pos) = self.expect_identifier()?;
            let mut bindings = Vec::new();
            if self.match_token(TokenKind::LParen) {
                while !self.check(TokenKind::RParen) {
                    bindings.push(self.expect_identifier()?.0);
                    if !self.match_token(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RParen, "')'")?;
            } else if !self.check(TokenKind::LBrace) {
                let tok = self.peek().clone();
                return Err(ParseError::new(
                    DiagnosticCode::InvalidCaseStarter,
                    format!("expected '(' or '{{' after discerne case '{variant_name}', found '{}'", tok.lexeme),
                    case_pos,
                ));
            }
            let body = self.parse_block()?;
            cases.push(VariantCase { variant_name, bindings, body });
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Stmt::Discerne(DiscerneStmt { meta: Meta::at(pos), discriminant, cases }))
    }

    fn parse_custodi(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        self.advance(); // 'custodi'
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut guards = Vec::new();
        while !self.check(TokenKind::RBrace) {
            self.expect_keyword(Keyword::Si, "si")?;
            let condition = Box::new(self.parse_expression()?);
            let body = self.parse_block()?;
            guards.push((condition, body));
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Stmt::Custodi(CustodiStmt { meta: Meta::at(pos), guards }))
    }

    fn parse_adfirma(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        self.advance(); // 'adfirma'
        let condition = Box::new(self.parse_expression()?);
        let message = if self.match_token(TokenKind::Comma) { Some(Box::new(self.parse_expression()?)) } else { None };
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Stmt::Adfirma(AdfirmaStmt { meta: Meta::at(pos), condition, message }))
    }

    fn parse_redde(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        self.advance(); // 'redde'
        let value = if self.check(TokenKind::Semicolon) { None } else { Some(Box::new(self.parse_expression()?)) };
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Stmt::Redde(ReddeStmt { meta: Meta::at(pos), value }))
    }

    /// `iace EXPR;` (recoverable) or `mori EXPR;` (fatal).
    fn parse_iace(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        let fatal = self.check_keyword(Keyword::Mori);
        self.advance();
        let value = Box::new(self.parse_expression()?);
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Stmt::Iace(IaceStmt { meta: Meta::at(pos), value, fatal }))
    }

    fn parse_scribe(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        let kind = if self.check_keyword(Keyword::Scribe) {
            LogKind::Scribe
        } else if self.check_keyword(Keyword::Vide) {
            LogKind::Vide
        } else {
            LogKind::Mone
        };
        self.advance();
        let mut arguments = Vec::new();
        while !self.check(TokenKind::Semicolon) {
            arguments.push(self.parse_expression()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Stmt::Scribe(ScribeStmt { meta: Meta::at(pos), kind, arguments }))
    }

    fn parse_tempta(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        self.advance(); // 'tempta'
        let body = self.parse_block()?;
        let cape = self.parse_cape_clause()?;
        let demum = if self.match_keyword(Keyword::Demum) { Some(self.parse_block()?) } else { None };
        Ok(Stmt::Tempta(TemptaStmt { meta: Meta::at(pos), body, cape, demum }))
    }

    /// `fac { body } [cape [binding] { ... }] [dum EXPR];` -- a do-while
    /// loop when the trailing `dum` clause is present.
    fn parse_fac(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        self.advance(); // 'fac'
        let body = self.parse_block()?;
        let cape = self.parse_cape_clause()?;
        let while_condition = if self.match_keyword(Keyword::Dum) {
            let condition = self.parse_expression()?;
            self.expect(TokenKind::Semicolon, "';'")?;
            Some(Box::new(condition))
        } else {
            None
        };
        Ok(Stmt::Fac(FacStmt { meta: Meta::at(pos), body, cape, while_condition }))
    }

    /// `cura [arena|page] [EXPR] [pro|fit|fiet [IDENT] [: TYPE]] { body } [cape ...]`
    fn parse_cura(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        self.advance(); // 'cura'
        let resource_kind = if self.match_keyword(Keyword::Arena) {
            Some(CuraResourceKind::Arena)
        } else if self.match_keyword(Keyword::Page) {
            Some(CuraResourceKind::Page)
        } else {
            None
        };

        let expr = if !self.check(TokenKind::LBrace)
            && !matches!(self.peek().keyword, Some(Keyword::Pro | Keyword::Fit | Keyword::Fiet))
        {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        let binding_verb = if self.match_keyword(Keyword::Pro) {
            Some(CuraBindingVerb::Pro)
        } else if self.match_keyword(Keyword::Fit) {
            Some(CuraBindingVerb::Fit)
        } else if self.match_keyword(Keyword::Fiet) {
            Some(CuraBindingVerb::Fiet)
        } else {
            None
        };

        let explicit_binding = if binding_verb.is_some() && self.check(TokenKind::Identifier) {
            Some(self.advance().lexeme)
        } else {
            None
        };
        let type_annotation = if self.match_token(TokenKind::Colon) { Some(self.parse_type()?) } else { None };

        let prefix = match resource_kind {
            Some(CuraResourceKind::Arena) => "arena",
            Some(CuraResourceKind::Page) => "page",
            None => "cura",
        };
        let binding = explicit_binding.unwrap_or_else(|| self.next_cura_binding(prefix));

        let body = self.parse_block()?;
        let cape = self.parse_cape_clause()?;
        Ok(Stmt::Cura(CuraStmt { meta: Meta::at(pos), resource_kind, expr, binding_verb, type_annotation, binding, body, cape }))
    }

    /// `ad TARGET(args...) [fit|fiet|arrow [IDENT] [: TYPE]] [ut ALIAS] [{ body }] [cape ...]`
    fn parse_ad(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        self.advance(); // 'ad'
        let (target, _) = self.expect_identifier()?;
        self.expect(TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        while !self.check(TokenKind::RParen) {
            args.push(self.parse_expression()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')'")?;

        let binding_verb = if self.match_token(TokenKind::ThinArrow) {
            Some(ReturnVerb::Arrow)
        } else if self.match_keyword(Keyword::Fit) {
            Some(ReturnVerb::Fit)
        } else if self.match_keyword(Keyword::Fiet) {
            Some(ReturnVerb::Fiet)
        } else {
            None
        };
        let binding_name = if binding_verb.is_some() && self.check(TokenKind::Identifier) {
            Some(self.advance().lexeme)
        } else {
            None
        };
        let type_annotation = if self.match_token(TokenKind::Colon) { Some(self.parse_type()?) } else { None };
        let alias = if self.match_keyword(Keyword::Ut) { Some(self.expect_identifier()?.0) } else { None };
        let body = if self.check(TokenKind::LBrace) { Some(self.parse_block()?) } else { None };
        let cape = self.parse_cape_clause()?;
        if body.is_none() && cape.is_none() {
            self.expect(TokenKind::Semicolon, "';'")?;
        }
        Ok(Stmt::Ad(AdStmt { meta: Meta::at(pos), target, args, binding_verb, type_annotation, binding_name, alias, body, cape }))
    }

    fn parse_incipit(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        self.advance(); // 'incipit'
        let is_async = self.match_keyword(Keyword::Futura);
        let body = if self.match_keyword(Keyword::Ergo) {
            IncipitBody::Ergo(Box::new(self.parse_statement()?))
        } else {
            IncipitBody::Block(self.parse_block()?)
        };
        Ok(Stmt::Incipit(IncipitStmt { meta: Meta::at(pos), is_async, body }))
    }

    // ── Testing ──────────────────────────────────────────────────────────

    fn parse_probandum(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        self.advance(); // 'probandum'
        let (name, _) = self.expect_string_literal()?;
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut body = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_eof() {
            match self.parse_statement() {
                Ok(stmt) => body.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize();
                }
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Stmt::Probandum(ProbandumStmt { meta: Meta::at(pos), name, body }))
    }

    fn parse_proba(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        self.advance(); // 'proba'
        let modifier = if self.match_keyword(Keyword::Omitte) {
            Some(ProbaModifier::Omitte)
        } else if self.match_keyword(Keyword::Futurum) {
            let (reason, _) = self.expect_string_literal()?;
            Some(ProbaModifier::Futurum(reason))
        } else {
            None
        };
        let (name, _) = self.expect_string_literal()?;
        let body = self.parse_block()?;
        Ok(Stmt::Proba(ProbaStmt { meta: Meta::at(pos), name, modifier, body }))
    }

    fn parse_hook(&mut self, pos: Position) -> Result<Stmt, ParseError> {
        let kind = match self.peek().keyword {
            Some(Keyword::Praepara) => HookKind::Praepara,
            Some(Keyword::Praeparabit) => HookKind::Praeparabit,
            Some(Keyword::Postpara) => HookKind::Postpara,
            _ => HookKind::Postparabit,
        };
        self.advance();
        let all = self.match_keyword(Keyword::Omnia);
        let body = self.parse_block()?;
        Ok(Stmt::Hook(HookStmt { meta: Meta::at(pos), kind, all, body }))
    }
}
