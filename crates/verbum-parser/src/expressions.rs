//! Expression parsing: a cascade of precedence levels from assignment down
//! to primary, plus the postfix chain (call/member/optional-chaining) and
//! the collection-DSL/template-string special forms.

use crate::error::ParseError;
use crate::Parser;
use verbum_ast::*;
use verbum_common::{DiagnosticCode, Keyword, Position, TokenKind};

impl Parser {
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let target = self.parse_ternary()?;

        let op = match self.peek().kind {
            TokenKind::Eq => Some(AssignOp::Assign),
            TokenKind::PlusEq => Some(AssignOp::AddAssign),
            TokenKind::MinusEq => Some(AssignOp::SubAssign),
            TokenKind::StarEq => Some(AssignOp::MulAssign),
            TokenKind::SlashEq => Some(AssignOp::DivAssign),
            TokenKind::PercentEq => Some(AssignOp::ModAssign),
            TokenKind::AmpEq => Some(AssignOp::AndAssign),
            TokenKind::PipeEq => Some(AssignOp::OrAssign),
            _ => None,
        };
        let Some(op) = op else { return Ok(target) };
        let pos = self.advance().position;

        if !target.is_lvalue() {
            self.errors.push(ParseError::new(
                DiagnosticCode::AssignmentToNonLvalue,
                "left-hand side of assignment is not assignable",
                pos,
            ));
        }
        let value = self.parse_assignment()?;
        Ok(Expr::Assignment(AssignmentExpr {
            meta: Meta::at(pos),
            op,
            target: Box::new(target),
            value: Box::new(value),
        }))
    }

    /// `cond ? then : else`. The `si ... ergo ... secus ...` form is parsed
    /// directly in `parse_primary` since it is keyword-introduced.
    fn parse_ternary(&mut self) -> Result<Expr, ParseError> {
        let condition = self.parse_nullish_or()?;
        if self.match_token(TokenKind::Question) {
            let pos = condition.meta().position.unwrap_or(Position::start());
            let then_branch = self.parse_assignment()?;
            self.expect(TokenKind::Colon, "':'")?;
            let else_branch = self.parse_assignment()?;
            return Ok(Expr::Conditional(ConditionalExpr {
                meta: Meta::at(pos),
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
                form: ConditionalForm::Ternary,
            }));
        }
        Ok(condition)
    }

    /// `aut` (or) and `vel` (nullish-coalescing) at the same precedence
    /// level. Mixing both without parentheses is flagged but not fatal
    /// (spec §7 family 5).
    fn parse_nullish_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        let mut seen_or = false;
        let mut seen_nullish = false;
        loop {
            let (op, is_nullish) = if self.check_keyword(Keyword::Aut) {
                (BinaryOp::Or, false)
            } else if self.check_keyword(Keyword::Vel) {
                (BinaryOp::Nullish, true)
            } else {
                break;
            };
            let pos = self.advance().position;
            if is_nullish {
                seen_nullish = true;
            } else {
                seen_or = true;
            }
            let right = self.parse_and()?;
            left = Expr::Binary(BinaryExpr { meta: Meta::at(pos), op, left: Box::new(left), right: Box::new(right) });
            if seen_or && seen_nullish {
                self.errors.push(ParseError::new(
                    DiagnosticCode::MixedNullishAndOr,
                    "'aut' and 'vel' cannot be combined without parentheses",
                    pos,
                ));
            }
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_bit_or()?;
        while self.check_keyword(Keyword::Et) {
            let pos = self.advance().position;
            let right = self.parse_bit_or()?;
            left = Expr::Binary(BinaryExpr { meta: Meta::at(pos), op: BinaryOp::And, left: Box::new(left), right: Box::new(right) });
        }
        Ok(left)
    }

    fn parse_bit_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_bit_xor()?;
        while self.check(TokenKind::Pipe) {
            let pos = self.advance().position;
            let right = self.parse_bit_xor()?;
            left = Expr::Binary(BinaryExpr { meta: Meta::at(pos), op: BinaryOp::BitOr, left: Box::new(left), right: Box::new(right) });
        }
        Ok(left)
    }

    fn parse_bit_xor(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_bit_and()?;
        while self.check(TokenKind::Caret) {
            let pos = self.advance().position;
            let right = self.parse_bit_and()?;
            left = Expr::Binary(BinaryExpr { meta: Meta::at(pos), op: BinaryOp::BitXor, left: Box::new(left), right: Box::new(right) });
        }
        Ok(left)
    }

    fn parse_bit_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;
        while self.check(TokenKind::Amp) {
            let pos = self.advance().position;
            let right = self.parse_equality()?;
            left = Expr::Binary(BinaryExpr { meta: Meta::at(pos), op: BinaryOp::BitAnd, left: Box::new(left), right: Box::new(right) });
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::EqEqEq => BinaryOp::StrictEq,
                TokenKind::NotEqEq => BinaryOp::StrictNotEq,
                _ => break,
            };
            let pos = self.advance().position;
            let right = self.parse_relational()?;
            left = Expr::Binary(BinaryExpr { meta: Meta::at(pos), op, left: Box::new(left), right: Box::new(right) });
        }
        Ok(left)
    }

    /// Handles `<`/`<=`/`>`/`>=` plus the postfix-ish `qua TYPE` assertion
    /// and `[non] est NAME` type test, all at the same binding strength.
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_shift()?;
        loop {
            if self.check_keyword(Keyword::Qua) {
                let pos = self.advance().position;
                let target_type = self.parse_type()?;
                left = Expr::Qua(QuaExpr { meta: Meta::at(pos), operand: Box::new(left), target_type });
                continue;
            }
            if self.check_keyword(Keyword::Est) {
                let pos = self.advance().position;
                let (type_name, _) = self.expect_identifier()?;
                left = Expr::Est(EstExpr { meta: Meta::at(pos), operand: Box::new(left), type_name, negated: false });
                continue;
            }
            if self.check_keyword(Keyword::Non) && self.check2_keyword(Keyword::Est) {
                let pos = self.advance().position;
                self.advance();
                let (type_name, _) = self.expect_identifier()?;
                left = Expr::Est(EstExpr { meta: Meta::at(pos), operand: Box::new(left), type_name, negated: true });
                continue;
            }
            let op = match self.peek().kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => break,
            };
            let pos = self.advance().position;
            let right = self.parse_shift()?;
            left = Expr::Binary(BinaryExpr { meta: Meta::at(pos), op, left: Box::new(left), right: Box::new(right) });
        }
        Ok(left)
    }

    fn parse_shift(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_range()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Shl => BinaryOp::Shl,
                TokenKind::Shr => BinaryOp::Shr,
                _ => break,
            };
            let pos = self.advance().position;
            let right = self.parse_range()?;
            left = Expr::Binary(BinaryExpr { meta: Meta::at(pos), op, left: Box::new(left), right: Box::new(right) });
        }
        Ok(left)
    }

    /// `a..b`, `a usque b`, `a ante b`, optionally `per step`.
    fn parse_range(&mut self) -> Result<Expr, ParseError> {
        let start = self.parse_additive()?;
        let inclusive = if self.check(TokenKind::DotDot) {
            self.advance();
            false
        } else if self.check_keyword(Keyword::Usque) {
            self.advance();
            true
        } else if self.check_keyword(Keyword::Ante) {
            self.advance();
            false
        } else {
            return Ok(start);
        };
        let pos = start.meta().position.unwrap_or(Position::start());
        let end = self.parse_additive()?;
        let step = if self.match_keyword(Keyword::Per) { Some(Box::new(self.parse_additive()?)) } else { None };
        Ok(Expr::Range(RangeExpr { meta: Meta::at(pos), start: Box::new(start), end: Box::new(end), inclusive, step }))
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let pos = self.advance().position;
            let right = self.parse_multiplicative()?;
            left = Expr::Binary(BinaryExpr { meta: Meta::at(pos), op, left: Box::new(left), right: Box::new(right) });
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            let pos = self.advance().position;
            let right = self.parse_unary()?;
            left = Expr::Binary(BinaryExpr { meta: Meta::at(pos), op, left: Box::new(left), right: Box::new(right) });
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek().kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            let pos = self.advance().position;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary(UnaryExpr { meta: Meta::at(pos), op, operand: Box::new(operand) }));
        }

        if self.check_keyword(Keyword::Non) {
            let pos = self.advance().position;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary(UnaryExpr { meta: Meta::at(pos), op: UnaryOp::LogicalNot, operand: Box::new(operand) }));
        }
        if self.check_keyword(Keyword::Nulla) {
            let pos = self.advance().position;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary(UnaryExpr { meta: Meta::at(pos), op: UnaryOp::IsEmpty, operand: Box::new(operand) }));
        }
        if self.check_keyword(Keyword::Nonnulla) {
            let pos = self.advance().position;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary(UnaryExpr { meta: Meta::at(pos), op: UnaryOp::IsNotEmpty, operand: Box::new(operand) }));
        }
        if self.check_keyword(Keyword::Nonnihil) {
            let pos = self.advance().position;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary(UnaryExpr { meta: Meta::at(pos), op: UnaryOp::IsNotNull, operand: Box::new(operand) }));
        }
        if self.check_keyword(Keyword::Nihil) && self.starts_expression(self.peek2()) {
            let pos = self.advance().position;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary(UnaryExpr { meta: Meta::at(pos), op: UnaryOp::IsNull, operand: Box::new(operand) }));
        }
        if self.check_keyword(Keyword::Negativum) {
            let pos = self.advance().position;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary(UnaryExpr { meta: Meta::at(pos), op: UnaryOp::Negativum, operand: Box::new(operand) }));
        }
        if self.check_keyword(Keyword::Positivum) {
            let pos = self.advance().position;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary(UnaryExpr { meta: Meta::at(pos), op: UnaryOp::Positivum, operand: Box::new(operand) }));
        }
        if self.check_keyword(Keyword::Cede) {
            let pos = self.advance().position;
            let operand = self.parse_unary()?;
            return Ok(Expr::Cede(CedeExpr { meta: Meta::at(pos), operand: Box::new(operand) }));
        }
        if self.check_keyword(Keyword::Sparge) {
            let pos = self.advance().position;
            let operand = self.parse_unary()?;
            return Ok(Expr::Spread(SpreadExpr { meta: Meta::at(pos), operand: Box::new(operand) }));
        }
        if self.check_keyword(Keyword::Praefixum) {
            let pos = self.advance().position;
            let operand = self.parse_unary()?;
            return Ok(Expr::Praefixum(PraefixumExpr { meta: Meta::at(pos), operand: Box::new(operand) }));
        }

        self.parse_postfix()
    }

    fn starts_expression(&self, tok: &verbum_common::Token) -> bool {
        !matches!(tok.kind, TokenKind::Semicolon | TokenKind::RBrace | TokenKind::RParen | TokenKind::Comma | TokenKind::Eof)
    }

    pub(crate) fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek().kind {
                TokenKind::Dot => {
                    self.advance();
                    let (name, pos) = self.expect_identifier()?;
                    expr = Expr::Member(MemberExpr {
                        meta: Meta::at(pos),
                        object: Box::new(expr),
                        property: MemberKey::Name(name),
                        optional: false,
                        non_null: false,
                    });
                }
                TokenKind::QuestionDot => {
                    let pos = self.advance().position;
                    let (name, _) = self.expect_identifier()?;
                    expr = Expr::Member(MemberExpr {
                        meta: Meta::at(pos),
                        object: Box::new(expr),
                        property: MemberKey::Name(name),
                        optional: true,
                        non_null: false,
                    });
                }
                TokenKind::BangDot => {
                    let pos = self.advance().position;
                    let (name, _) = self.expect_identifier()?;
                    expr = Expr::Member(MemberExpr {
                        meta: Meta::at(pos),
                        object: Box::new(expr),
                        property: MemberKey::Name(name),
                        optional: false,
                        non_null: true,
                    });
                }
                TokenKind::LBracket => {
                    let pos = self.advance().position;
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    expr = Expr::Member(MemberExpr {
                        meta: Meta::at(pos),
                        object: Box::new(expr),
                        property: MemberKey::Index(Box::new(index)),
                        optional: false,
                        non_null: false,
                    });
                }
                TokenKind::QuestionLBracket => {
                    let pos = self.advance().position;
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    expr = Expr::Member(MemberExpr {
                        meta: Meta::at(pos),
                        object: Box::new(expr),
                        property: MemberKey::Index(Box::new(index)),
                        optional: true,
                        non_null: false,
                    });
                }
                TokenKind::BangLBracket => {
                    let pos = self.advance().position;
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    expr = Expr::Member(MemberExpr {
                        meta: Meta::at(pos),
                        object: Box::new(expr),
                        property: MemberKey::Index(Box::new(index)),
                        optional: false,
                        non_null: true,
                    });
                }
                TokenKind::LParen => {
                    let pos = self.advance().position;
                    let args = self.parse_arguments()?;
                    expr = Expr::Call(CallExpr { meta: Meta::at(pos), callee: Box::new(expr), args, optional: false });
                }
                TokenKind::QuestionLParen => {
                    let pos = self.advance().position;
                    let args = self.parse_arguments()?;
                    expr = Expr::Call(CallExpr { meta: Meta::at(pos), callee: Box::new(expr), args, optional: true });
                }
                TokenKind::BangLParen => {
                    let pos = self.advance().position;
                    let args = self.parse_arguments()?;
                    expr = Expr::Call(CallExpr { meta: Meta::at(pos), callee: Box::new(expr), args, optional: false });
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        while !self.check(TokenKind::RParen) {
            args.push(self.parse_expression()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.peek().clone();
        let leading = self.leading_comments_for(tok.position);

        let mut expr = match tok.kind {
            TokenKind::Number => {
                self.advance();
                let value = if tok.lexeme.contains('.') || tok.lexeme.contains('e') || tok.lexeme.contains('E') {
                    LiteralValue::Float(tok.lexeme.parse().unwrap_or(0.0))
                } else if let Some(hex) = tok.lexeme.strip_prefix("0x").or_else(|| tok.lexeme.strip_prefix("0X")) {
                    LiteralValue::Int(i64::from_str_radix(&hex.replace('_', ""), 16).unwrap_or(0))
                } else {
                    LiteralValue::Int(tok.lexeme.replace('_', "").parse().unwrap_or(0))
                };
                Expr::Literal(LiteralExpr { meta: Meta::at(tok.position), value, raw: tok.lexeme })
            }
            TokenKind::BigInt => {
                self.advance();
                let digits = tok.lexeme.trim_end_matches('n').to_string();
                Expr::Literal(LiteralExpr { meta: Meta::at(tok.position), value: LiteralValue::BigInt(digits), raw: tok.lexeme })
            }
            TokenKind::String => {
                self.advance();
                Expr::Literal(LiteralExpr { meta: Meta::at(tok.position), value: LiteralValue::Str(tok.lexeme.clone()), raw: tok.lexeme })
            }
            TokenKind::TemplateString => {
                self.advance();
                Expr::Template(self.parse_template_parts(&tok.lexeme, tok.position)?)
            }
            TokenKind::LBracket => self.parse_array_literal(tok.position)?,
            TokenKind::LBrace => self.parse_object_literal(tok.position)?,
            TokenKind::LParen => self.parse_paren_or_lambda(tok.position)?,
            _ if tok.is_keyword(Keyword::Verum) => {
                self.advance();
                Expr::Literal(LiteralExpr { meta: Meta::at(tok.position), value: LiteralValue::Bool(true), raw: tok.lexeme })
            }
            _ if tok.is_keyword(Keyword::Falsum) => {
                self.advance();
                Expr::Literal(LiteralExpr { meta: Meta::at(tok.position), value: LiteralValue::Bool(false), raw: tok.lexeme })
            }
            _ if tok.is_keyword(Keyword::Nihil) => {
                self.advance();
                Expr::Literal(LiteralExpr { meta: Meta::at(tok.position), value: LiteralValue::Nihil, raw: tok.lexeme })
            }
            _ if tok.is_keyword(Keyword::Ego) => {
                self.advance();
                Expr::Ego(Meta::at(tok.position))
            }
            _ if tok.is_keyword(Keyword::Novum) => self.parse_novum()?,
            _ if tok.is_keyword(Keyword::Finge) => self.parse_finge()?,
            _ if tok.is_keyword(Keyword::Scriptum) => self.parse_scriptum()?,
            _ if tok.is_keyword(Keyword::Lege) => self.parse_lege()?,
            _ if tok.is_keyword(Keyword::Sed) => self.parse_regex()?,
            _ if tok.is_keyword(Keyword::Si) => self.parse_si_expression()?,
            _ if tok.is_keyword(Keyword::Ex) || tok.is_keyword(Keyword::Ab) => self.parse_collection_dsl()?,
            _ if tok.kind == TokenKind::Identifier => {
                self.advance();
                if self.check(TokenKind::Arrow) {
                    self.parse_lambda_single_param(tok.lexeme, tok.position)?
                } else {
                    Expr::Identifier(IdentifierExpr { meta: Meta::at(tok.position), name: tok.lexeme })
                }
            }
            _ => {
                self.advance();
                return Err(ParseError::new(
                    DiagnosticCode::UnexpectedToken,
                    format!("unexpected token '{}' in expression position", tok.lexeme),
                    tok.position,
                ));
            }
        };

        expr.meta_mut().leading_comments = leading;
        Ok(expr)
    }

    fn parse_paren_or_lambda(&mut self, pos: Position) -> Result<Expr, ParseError> {
        // Try a parameter list for a lambda: `(a, b) => expr`. Since verbum
        // parameters can't appear bare outside a lambda/function head, a
        // parenthesized group that is immediately followed by `=>` is
        // always a lambda.
        let checkpoint = self.pos;
        self.advance(); // '('
        if let Ok(params) = self.try_parse_lambda_params() {
            if self.match_token(TokenKind::Arrow) {
                let body = self.parse_lambda_body()?;
                return Ok(Expr::Lambda(LambdaExpr { meta: Meta::at(pos), is_async: false, params, body }));
            }
        }
        self.pos = checkpoint;
        self.advance(); // '('
        let inner = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(inner)
    }

    fn try_parse_lambda_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) {
            let (name, _) = self.expect_identifier()?;
            let type_annotation = if self.match_token(TokenKind::Colon) { Some(self.parse_type()?) } else { None };
            let default = if self.match_token(TokenKind::Eq) { Some(Box::new(self.parse_assignment()?)) } else { None };
            params.push(Param { external_name: None, internal_name: name, preposition: None, type_annotation, default });
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(params)
    }

    fn parse_lambda_single_param(&mut self, name: String, pos: Position) -> Result<Expr, ParseError> {
        self.advance(); // '=>'
        let params = vec![Param { external_name: None, internal_name: name, preposition: None, type_annotation: None, default: None }];
        let body = self.parse_lambda_body()?;
        Ok(Expr::Lambda(LambdaExpr { meta: Meta::at(pos), is_async: false, params, body }))
    }

    fn parse_lambda_body(&mut self) -> Result<LambdaBody, ParseError> {
        if self.check(TokenKind::LBrace) {
            Ok(LambdaBody::Block(self.parse_block()?))
        } else {
            Ok(LambdaBody::Expr(Box::new(self.parse_assignment()?)))
        }
    }

    fn parse_array_literal(&mut self, pos: Position) -> Result<Expr, ParseError> {
        self.advance(); // '['
        let mut elements = Vec::new();
        while !self.check(TokenKind::RBracket) {
            elements.push(self.parse_expression()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "']'")?;
        Ok(Expr::Array(ArrayExpr { meta: Meta::at(pos), elements }))
    }

    fn parse_object_literal(&mut self, pos: Position) -> Result<Expr, ParseError> {
        self.advance(); // '{'
        let mut properties = Vec::new();
        while !self.check(TokenKind::RBrace) {
            if self.check_keyword(Keyword::Sparge) {
                self.advance();
                properties.push(ObjectProperty::Spread(Box::new(self.parse_assignment()?)));
            } else {
                let (key, _) = if self.check(TokenKind::String) {
                    self.expect_string_literal()?
                } else {
                    self.expect_identifier()?
                };
                self.expect(TokenKind::Colon, "':'")?;
                let value = Box::new(self.parse_assignment()?);
                properties.push(ObjectProperty::KeyValue { key, value });
            }
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Expr::Object(ObjectExpr { meta: Meta::at(pos), properties }))
    }

    fn parse_novum(&mut self) -> Result<Expr, ParseError> {
        let pos = self.advance().position;
        let (type_name, _) = self.expect_identifier()?;
        self.expect(TokenKind::LParen, "'('")?;
        let args = self.parse_arguments()?;
        let with_clause = if self.match_keyword(Keyword::Cum) {
            if self.check_keyword(Keyword::Sparge) {
                self.advance();
                Some(WithClause::Spread(Box::new(self.parse_assignment()?)))
            } else {
                let obj_pos = self.peek().position;
                match self.parse_object_literal(obj_pos)? {
                    Expr::Object(obj) => Some(WithClause::Object(obj)),
                    _ => None,
                }
            }
        } else {
            None
        };
        Ok(Expr::Novum(NovumExpr { meta: Meta::at(pos), type_name, args, with_clause }))
    }

    fn parse_finge(&mut self) -> Result<Expr, ParseError> {
        let pos = self.advance().position;
        let (variant_name, _) = self.expect_identifier()?;
        let args = if self.match_token(TokenKind::LParen) { self.parse_arguments()? } else { Vec::new() };
        Ok(Expr::Finge(FingeExpr { meta: Meta::at(pos), variant_name, args }))
    }

    /// `scriptum "fmt with § placeholders" args...`
    fn parse_scriptum(&mut self) -> Result<Expr, ParseError> {
        let pos = self.advance().position;
        let (format, _) = self.expect_string_literal()?;
        let mut args = Vec::new();
        while !matches!(
            self.peek().kind,
            TokenKind::Semicolon | TokenKind::RParen | TokenKind::RBrace | TokenKind::Comma | TokenKind::Eof
        ) {
            args.push(self.parse_unary()?);
        }
        Ok(Expr::Scriptum(ScriptumExpr { meta: Meta::at(pos), format, args }))
    }

    fn parse_lege(&mut self) -> Result<Expr, ParseError> {
        let pos = self.advance().position;
        let prompt = if self.check(TokenKind::String) { Some(Box::new(self.parse_unary()?)) } else { None };
        Ok(Expr::Lege(LegeExpr { meta: Meta::at(pos), prompt }))
    }

    fn parse_regex(&mut self) -> Result<Expr, ParseError> {
        let pos = self.advance().position;
        let (pattern, _) = self.expect_string_literal()?;
        let flags = if self.check(TokenKind::Identifier) { self.advance().lexeme } else { String::new() };
        Ok(Expr::Regex(RegexExpr { meta: Meta::at(pos), pattern, flags }))
    }

    /// `ex SOURCE [non] ubi ... | IDENT` (filter) then `prima`/`ultima`/
    /// `summa` transforms, per spec §4.2 "Collection DSL".
    fn parse_collection_dsl(&mut self) -> Result<Expr, ParseError> {
        let tok = self.advance();
        let entry = if tok.is_keyword(Keyword::Ex) { DslEntry::Ex } else { DslEntry::Ab };
        let pos = tok.position;
        let source = Box::new(self.parse_postfix()?);
        let (filter, transforms) = self.parse_dsl_filter_and_transforms()?;
        Ok(Expr::CollectionDsl(CollectionDslExpr { meta: Meta::at(pos), source, entry, filter, transforms }))
    }

    /// `[non]? (IDENT | ubi EXPR)` then `prima`/`ultima`/`summa` transforms
    /// (spec §4.2 "Collection DSL": `ab SRC [non]? (IDENT | ubi EXPR) [,
    /// TRANSFORMS]`) -- `IDENT` and `ubi EXPR` are sibling alternatives, so
    /// the bare shorthand is reachable whether or not `ubi` appears. Shared
    /// by the DSL expression form and `ex`/`de`-led iteration.
    pub(crate) fn parse_dsl_filter_and_transforms(&mut self) -> Result<(Option<DslFilter>, Vec<DslTransform>), ParseError> {
        let negated = self.match_keyword(Keyword::Non);
        let filter = if self.match_keyword(Keyword::Ubi) {
            let kind = DslFilterKind::Predicate(Box::new(self.parse_nullish_or()?));
            Some(DslFilter { negated, kind })
        } else if self.check(TokenKind::Identifier) {
            let kind = DslFilterKind::Shorthand(self.advance().lexeme);
            Some(DslFilter { negated, kind })
        } else if negated {
            let tok = self.peek().clone();
            return Err(ParseError::new(
                DiagnosticCode::ExpectedKeyword,
                format!("expected 'ubi' or an identifier after 'non', found '{}'", tok.lexeme),
                tok.position,
            ));
        } else {
            None
        };

        let mut transforms = Vec::new();
        loop {
            if self.match_keyword(Keyword::Prima) {
                transforms.push(DslTransform::Prima(Box::new(self.parse_unary()?)));
            } else if self.match_keyword(Keyword::Ultima) {
                transforms.push(DslTransform::Ultima(Box::new(self.parse_unary()?)));
            } else if self.match_keyword(Keyword::Summa) {
                transforms.push(DslTransform::Summa);
            } else {
                break;
            }
        }

        Ok((filter, transforms))
    }

    /// `si cond ergo then secus else`, used in expression position.
    fn parse_si_expression(&mut self) -> Result<Expr, ParseError> {
        let pos = self.advance().position;
        let condition = self.parse_assignment()?;
        self.expect_keyword(Keyword::Ergo, "ergo")?;
        let then_branch = self.parse_assignment()?;
        self.expect_keyword(Keyword::Secus, "secus")?;
        let else_branch = self.parse_assignment()?;
        Ok(Expr::Conditional(ConditionalExpr {
            meta: Meta::at(pos),
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
            form: ConditionalForm::SicSecus,
        }))
    }

    /// Splits a raw template-string lexeme (already brace-balanced by the
    /// lexer) into text and `${...}` expression segments, re-lexing and
    /// re-parsing each segment independently.
    fn parse_template_parts(&mut self, raw: &str, pos: Position) -> Result<TemplateExpr, ParseError> {
        let mut parts = Vec::new();
        let mut rest = raw;
        loop {
            match rest.find("${") {
                None => {
                    if !rest.is_empty() {
                        parts.push(TemplatePart::Text(rest.to_string()));
                    }
                    break;
                }
                Some(start) => {
                    if start > 0 {
                        parts.push(TemplatePart::Text(rest[..start].to_string()));
                    }
                    let after = &rest[start + 2..];
                    let mut depth = 1usize;
                    let mut end = 0usize;
                    for (i, c) in after.char_indices() {
                        match c {
                            '{' => depth += 1,
                            '}' => {
                                depth -= 1;
                                if depth == 0 {
                                    end = i;
                                    break;
                                }
                            }
                            _ => {}
                        }
                    }
                    let segment = &after[..end];
                    let (sub_program, sub_diags) = crate::parse_fragment(segment);
                    self.errors.extend(sub_diags.into_iter().map(ParseError::from));
                    if let Some(Stmt::Expr(expr)) = sub_program.statements.into_iter().next() {
                        parts.push(TemplatePart::Expr(expr));
                    }
                    rest = &after[end + 1..];
                }
            }
        }
        Ok(TemplateExpr { meta: Meta::at(pos), parts })
    }
}
