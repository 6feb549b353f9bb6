//! The code-generation framework: one object per compilation unit that
//! carries indentation depth, generator-context state, and the set of
//! stdlib features discovered along the way, plus the exhaustive
//! `gen_statement`/`gen_expression` dispatch over every AST node kind
//! (spec §4.3 "Per-target object").
//!
//! Target-specific lexical idiom (keywords, literal spellings, comment
//! syntax) lives in `crate::targets::*`; this module owns the AST walk and
//! decides, per node, which idiom table to consult.

use std::fmt;

use verbum_ast::*;

use crate::{intrinsics, targets, type_map, Target};

/// The only failure mode codegen has: an AST node with no translation on
/// the chosen target (spec §7 "codegen does not retry").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkError {
    pub message: String,
}

impl FrameworkError {
    fn unsupported(target: Target, what: &str) -> Self {
        Self { message: format!("{target} target has no translation for {what}") }
    }
}

impl fmt::Display for FrameworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FrameworkError {}

pub(crate) struct Framework {
    target: Target,
    depth: usize,
    in_generator: bool,
    features: crate::FeatureSet,
    out: String,
}

impl Framework {
    pub(crate) fn new(target: Target) -> Self {
        Self { target, depth: 0, in_generator: false, features: crate::FeatureSet::default(), out: String::new() }
    }

    pub(crate) fn finish(self) -> (String, crate::FeatureSet) {
        let mut preamble = String::new();
        for feature in self.features.sorted() {
            let line = intrinsics::preamble_line(self.target, feature);
            if !line.is_empty() {
                preamble.push_str(&line);
                preamble.push('\n');
            }
        }
        let body = if preamble.is_empty() { self.out } else { format!("{preamble}\n{}", self.out) };
        (body, self.features)
    }

    // ── Low-level emission helpers ───────────────────────────────────────

    fn indent(&self) -> String {
        "    ".repeat(self.depth)
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(&self.indent());
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn raw(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// `code` with the target's statement terminator (`;` for brace
    /// targets, nothing for the indentation-significant one).
    fn terminate(&self, code: &str) -> String {
        match self.target {
            Target::Structural | Target::Systems => format!("{code};"),
            Target::Dynamic => code.to_string(),
        }
    }

    fn empty_block_placeholder(&self) -> &'static str {
        match self.target {
            Target::Structural => targets::structural::EMPTY_BLOCK_PLACEHOLDER,
            Target::Dynamic => targets::dynamic::EMPTY_BLOCK_PLACEHOLDER,
            Target::Systems => targets::systems::EMPTY_BLOCK_PLACEHOLDER,
        }
    }

    /// Emits `header` at the current indentation followed by a
    /// target-idiomatic block: `{ ... }` for brace targets, `:` plus an
    /// indented suite for the indentation-significant one.
    fn emit_header_and_stmts(&mut self, header: &str, stmts: &[Stmt]) -> Result<(), FrameworkError> {
        self.out.push_str(&self.indent());
        self.out.push_str(header);
        match self.target {
            Target::Dynamic => {
                self.raw(":\n");
                self.depth += 1;
                if stmts.is_empty() {
                    self.line(self.empty_block_placeholder());
                } else {
                    for stmt in stmts {
                        self.gen_stmt(stmt)?;
                    }
                }
                self.depth -= 1;
            }
            Target::Structural | Target::Systems => {
                self.raw(" {\n");
                self.depth += 1;
                if stmts.is_empty() {
                    let placeholder = self.empty_block_placeholder();
                    if !placeholder.is_empty() {
                        self.line(placeholder);
                    }
                } else {
                    for stmt in stmts {
                        self.gen_stmt(stmt)?;
                    }
                }
                self.depth -= 1;
                self.out.push_str(&self.indent());
                self.raw("}\n");
            }
        }
        Ok(())
    }

    fn emit_header_and_block(&mut self, header: &str, block: &Block) -> Result<(), FrameworkError> {
        self.emit_header_and_stmts(header, &block.statements)
    }

    /// Renders `block`'s statements (one indent level deeper, no enclosing
    /// braces) as a standalone string, for splicing into an expression
    /// (lambda bodies) rather than writing straight to `out`.
    fn render_block_expr(&mut self, block: &Block) -> Result<String, FrameworkError> {
        let saved = std::mem::take(&mut self.out);
        self.depth += 1;
        if block.statements.is_empty() {
            let placeholder = self.empty_block_placeholder();
            if !placeholder.is_empty() {
                self.line(placeholder);
            }
        } else {
            for stmt in &block.statements {
                self.gen_stmt(stmt)?;
            }
        }
        self.depth -= 1;
        Ok(std::mem::replace(&mut self.out, saved))
    }

    fn emit_leading_comments(&mut self, meta: &Meta) {
        for comment in &meta.leading_comments {
            let text = comment_line(self.target, &comment.value);
            self.line(&text);
        }
    }

    fn emit_trailing_comments(&mut self, meta: &Meta) {
        if meta.trailing_comments.is_empty() {
            return;
        }
        // Trailing comments share the line their statement just emitted;
        // splice onto the last line rather than starting a new one.
        if self.out.ends_with('\n') {
            self.out.pop();
        }
        for comment in &meta.trailing_comments {
            self.out.push(' ');
            self.out.push_str(&comment_line(self.target, &comment.value));
        }
        self.out.push('\n');
    }

    fn is_public(annotations: &Option<Vec<Annotation>>) -> bool {
        annotations.as_ref().is_some_and(|list| list.iter().any(|a| a.has("publicum")))
    }

    fn gen_expr_list(&mut self, exprs: &[Expr]) -> Result<Vec<String>, FrameworkError> {
        exprs.iter().map(|e| self.gen_expr(e)).collect()
    }

    /// `<T, U>` for targets with generic syntax; the dynamically typed
    /// target has no declaration-site equivalent and drops it.
    fn generic_suffix(&self, type_params: &[TypeParam]) -> String {
        if type_params.is_empty() || self.target == Target::Dynamic {
            return String::new();
        }
        let names: Vec<&str> = type_params.iter().map(|p| p.name.as_str()).collect();
        format!("<{}>", names.join(", "))
    }

    // ── Program / statements ─────────────────────────────────────────────

    pub(crate) fn gen_program(&mut self, program: &Program) -> Result<(), FrameworkError> {
        for stmt in &program.statements {
            self.gen_stmt(stmt)?;
        }
        Ok(())
    }

    fn gen_stmt(&mut self, stmt: &Stmt) -> Result<(), FrameworkError> {
        self.emit_leading_comments(stmt.meta());
        match stmt {
            Stmt::Importa(s) => self.gen_importa(s)?,
            Stmt::Destructure(s) => self.gen_destructure(s)?,
            Stmt::Varia(s) => self.gen_varia(s)?,
            Stmt::Functio(s) => self.gen_functio(s)?,
            Stmt::Pactum(s) => self.gen_pactum(s)?,
            Stmt::Genus(s) => self.gen_genus(s)?,
            Stmt::TypeAlias(s) => self.gen_type_alias(s)?,
            Stmt::Ordo(s) => self.gen_ordo(s)?,
            Stmt::Discretio(s) => self.gen_discretio(s)?,
            Stmt::Si(s) => self.gen_si(s)?,
            Stmt::Dum(s) => self.gen_dum(s)?,
            Stmt::Iteratio(s) => self.gen_iteratio(s)?,
            Stmt::In(s) => self.gen_in_stmt(s)?,
            Stmt::Elige(s) => self.gen_elige(s)?,
            Stmt::Discerne(s) => self.gen_discerne(s)?,
            Stmt::Custodi(s) => self.gen_custodi(s)?,
            Stmt::Adfirma(s) => self.gen_adfirma(s)?,
            Stmt::Redde(s) => self.gen_redde(s)?,
            Stmt::Rumpe(_) => {
                let line = self.terminate("break");
                self.line(&line);
            }
            Stmt::Perge(_) => {
                let line = self.terminate("continue");
                self.line(&line);
            }
            Stmt::Iace(s) => self.gen_iace(s)?,
            Stmt::Scribe(s) => self.gen_scribe(s)?,
            Stmt::Tempta(s) => self.gen_tempta(s)?,
            Stmt::Fac(s) => self.gen_fac(s)?,
            Stmt::Cura(s) => self.gen_cura(s)?,
            Stmt::Ad(s) => self.gen_ad(s)?,
            Stmt::Incipit(s) => self.gen_incipit(s)?,
            Stmt::Probandum(s) => self.gen_probandum(s)?,
            Stmt::Proba(s) => self.gen_proba(s)?,
            Stmt::Hook(s) => self.gen_hook(s)?,
            Stmt::Block(b) => self.emit_header_and_block("", b)?,
            Stmt::Expr(e) => {
                let text = self.gen_expr(e)?;
                let line = self.terminate(&text);
                self.line(&line);
            }
        }
        self.emit_trailing_comments(stmt.meta());
        Ok(())
    }

    fn gen_importa(&mut self, s: &ImportaStmt) -> Result<(), FrameworkError> {
        let Expr::Literal(LiteralExpr { value: LiteralValue::Str(path), .. }) = s.source.as_ref() else {
            return Err(FrameworkError::unsupported(self.target, "a non-literal importa source"));
        };
        let names: Vec<String> = s
            .specifiers
            .iter()
            .map(|sp| {
                if sp.rest {
                    format!("*{}", sp.imported)
                } else if let Some(local) = &sp.local {
                    format!("{} as {local}", sp.imported)
                } else {
                    sp.imported.clone()
                }
            })
            .collect();
        let line = match self.target {
            Target::Structural => format!("import {{ {} }} from '{path}';", names.join(", ")),
            Target::Dynamic => format!("from {path} import {}", names.join(", ")),
            Target::Systems => format!("use {path}::{{{}}};", names.join(", ")),
        };
        self.line(&line);
        Ok(())
    }

    fn gen_destructure(&mut self, s: &DestructureStmt) -> Result<(), FrameworkError> {
        let source = self.gen_expr(&s.source)?;
        let names: Vec<String> = s
            .specifiers
            .iter()
            .map(|sp| {
                if sp.rest {
                    format!("...{}", sp.imported)
                } else if let Some(local) = &sp.local {
                    format!("{}: {local}", sp.imported)
                } else {
                    sp.imported.clone()
                }
            })
            .collect();
        let line = match self.target {
            Target::Structural => {
                let kw = targets::structural::varia_keyword(s.kind);
                self.terminate(&format!("{kw} {{ {} }} = {source}", names.join(", ")))
            }
            Target::Dynamic => self.terminate(&format!("{} = {source}", names.join(", "))),
            Target::Systems => {
                let kw = targets::systems::varia_keyword(s.kind);
                self.terminate(&format!("{kw} {{ {} }} = {source}", names.join(", ")))
            }
        };
        self.line(&line);
        Ok(())
    }

    fn gen_pattern(&self, pattern: &Pattern) -> String {
        match pattern {
            Pattern::Identifier(name) => name.clone(),
            Pattern::Array(arr) => {
                let parts: Vec<String> = arr
                    .elements
                    .iter()
                    .map(|el| match el {
                        ArrayPatternElement::Binding(n) => n.clone(),
                        ArrayPatternElement::Skip => "_".to_string(),
                        ArrayPatternElement::Rest(n) => match self.target {
                            Target::Systems => format!(".., {n}"),
                            _ => format!("...{n}"),
                        },
                    })
                    .collect();
                format!("[{}]", parts.join(", "))
            }
            Pattern::Object(obj) => {
                let mut parts: Vec<String> = obj
                    .properties
                    .iter()
                    .map(|p| match &p.alias {
                        Some(alias) => format!("{}: {alias}", p.key),
                        None => p.key.clone(),
                    })
                    .collect();
                if let Some(rest) = &obj.rest {
                    parts.push(match self.target {
                        Target::Systems => format!(".., {rest}"),
                        _ => format!("...{rest}"),
                    });
                }
                format!("{{ {} }}", parts.join(", "))
            }
        }
    }

    fn gen_varia(&mut self, s: &VariaDecl) -> Result<(), FrameworkError> {
        let pattern = self.gen_pattern(&s.pattern);
        let mut initializer = match &s.initializer {
            Some(e) => Some(self.gen_expr(e)?),
            None => None,
        };
        if s.kind.is_async() {
            if let Some(init) = initializer.take() {
                initializer = Some(self.gen_await(&init));
            }
        }
        let ty = s.type_annotation.as_ref().map(|t| type_map::map_type(self.target, t));
        let line = match self.target {
            Target::Structural => {
                let kw = targets::structural::varia_keyword(s.kind);
                let ty_part = ty.map(|t| format!(": {t}")).unwrap_or_default();
                match initializer {
                    Some(v) => self.terminate(&format!("{kw} {pattern}{ty_part} = {v}")),
                    None => self.terminate(&format!("{kw} {pattern}{ty_part}")),
                }
            }
            Target::Dynamic => {
                let ty_part = ty.map(|t| format!(": {t}")).unwrap_or_default();
                match initializer {
                    Some(v) => self.terminate(&format!("{pattern}{ty_part} = {v}")),
                    None => self.terminate(&format!("{pattern}{ty_part} = {}", targets::dynamic::NULL_LITERAL)),
                }
            }
            Target::Systems => {
                let kw = targets::systems::varia_keyword(s.kind);
                let ty_part = ty.map(|t| format!(": {t}")).unwrap_or_default();
                match initializer {
                    Some(v) => self.terminate(&format!("{kw} {pattern}{ty_part} = {v}")),
                    None => self.terminate(&format!("{kw} {pattern}{ty_part}")),
                }
            }
        };
        self.line(&line);
        Ok(())
    }

    fn gen_params(&mut self, params: &[Param]) -> Vec<String> {
        params
            .iter()
            .map(|p| {
                let ty = p.type_annotation.as_ref().map(|t| type_map::map_type(self.target, t));
                match self.target {
                    Target::Dynamic => match ty {
                        Some(t) => format!("{}: {t}", p.internal_name),
                        None => p.internal_name.clone(),
                    },
                    _ => match ty {
                        Some(t) => format!("{}: {t}", p.internal_name),
                        None => p.internal_name.clone(),
                    },
                }
            })
            .collect()
    }

    fn gen_functio(&mut self, s: &FunctioDecl) -> Result<(), FrameworkError> {
        let params = self.gen_params(&s.params);
        let generics = self.generic_suffix(&s.type_params);
        let prev_in_generator = self.in_generator;
        self.in_generator = s.is_generator;
        let header = match self.target {
            Target::Structural => {
                let export = targets::structural::export_prefix(Self::is_public(&s.annotations));
                let async_kw = if s.is_async { "async " } else { "" };
                let gen_star = if s.is_generator { "*" } else { "" };
                let ret = s.return_type.as_ref().map(|t| format!(": {}", type_map::map_type(self.target, t))).unwrap_or_default();
                format!("{export}{async_kw}function{gen_star} {}{generics}({}){ret}", s.name, params.join(", "))
            }
            Target::Dynamic => {
                let async_kw = if s.is_async { "async " } else { "" };
                let ret = s.return_type.as_ref().map(|t| format!(" -> {}", type_map::map_type(self.target, t))).unwrap_or_default();
                format!("{async_kw}def {}({}){ret}", s.name, params.join(", "))
            }
            Target::Systems => {
                let vis = targets::systems::visibility_prefix(Self::is_public(&s.annotations));
                let async_kw = if s.is_async { "async " } else { "" };
                let ret = s.return_type.as_ref().map(|t| format!(" -> {}", type_map::map_type(self.target, t))).unwrap_or_default();
                format!("{vis}{async_kw}fn {}{generics}({}){ret}", s.name, params.join(", "))
            }
        };
        self.emit_header_and_block(&header, &s.body)?;
        self.in_generator = prev_in_generator;
        Ok(())
    }

    fn gen_pactum(&mut self, s: &PactumDecl) -> Result<(), FrameworkError> {
        let generics = self.generic_suffix(&s.type_params);
        match self.target {
            Target::Structural => {
                let extends = if s.extends.is_empty() { String::new() } else { format!(" extends {}", s.extends.join(", ")) };
                self.line(&format!("interface {}{generics}{extends} {{", s.name));
                self.depth += 1;
                for m in &s.members {
                    let params = self.gen_params(&m.params);
                    let ret = m.return_type.as_ref().map(|t| type_map::map_type(self.target, t)).unwrap_or_else(|| "void".to_string());
                    self.line(&format!("{}({}): {ret};", m.name, params.join(", ")));
                }
                self.depth -= 1;
                self.line("}");
            }
            Target::Dynamic => {
                self.line(&format!("class {}(Protocol):", s.name));
                self.depth += 1;
                if s.members.is_empty() {
                    self.line("pass");
                }
                for m in &s.members {
                    let params = self.gen_params(&m.params);
                    let mut all_params = vec!["self".to_string()];
                    all_params.extend(params);
                    let ret = m.return_type.as_ref().map(|t| format!(" -> {}", type_map::map_type(self.target, t))).unwrap_or_default();
                    self.line(&format!("def {}({}){ret}: ...", m.name, all_params.join(", ")));
                }
                self.depth -= 1;
            }
            Target::Systems => {
                self.line(&format!("trait {}{generics} {{", s.name));
                self.depth += 1;
                for m in &s.members {
                    let params = self.gen_params(&m.params);
                    let mut all_params = vec!["&self".to_string()];
                    all_params.extend(params);
                    let ret = m.return_type.as_ref().map(|t| format!(" -> {}", type_map::map_type(self.target, t))).unwrap_or_default();
                    self.line(&format!("fn {}({}){ret};", m.name, all_params.join(", ")));
                }
                self.depth -= 1;
                self.line("}");
            }
        }
        Ok(())
    }

    fn gen_genus_field_list(&mut self, fields: &[GenusField]) -> Result<Vec<(String, Option<String>, Option<String>)>, FrameworkError> {
        let mut out = Vec::new();
        for f in fields {
            let ty = f.type_annotation.as_ref().map(|t| type_map::map_type(self.target, t));
            let default = match &f.default {
                Some(e) => Some(self.gen_expr(e)?),
                None => None,
            };
            out.push((f.name.clone(), ty, default));
        }
        Ok(out)
    }

    fn gen_genus(&mut self, s: &GenusDecl) -> Result<(), FrameworkError> {
        let fields = self.gen_genus_field_list(&s.fields)?;
        let generics = self.generic_suffix(&s.type_params);
        match self.target {
            Target::Structural => {
                let export = targets::structural::export_prefix(Self::is_public(&s.annotations));
                let extends = s.sub.as_ref().map(|p| format!(" extends {p}")).unwrap_or_default();
                let implements = if s.implements.is_empty() { String::new() } else { format!(" implements {}", s.implements.join(", ")) };
                self.line(&format!("{export}class {}{generics}{extends}{implements} {{", s.name));
                self.depth += 1;
                for (name, ty, default) in &fields {
                    let ty_part = ty.as_ref().map(|t| format!(": {t}")).unwrap_or_default();
                    let default_part = default.as_ref().map(|d| format!(" = {d}")).unwrap_or_default();
                    self.line(&format!("{name}{ty_part}{default_part};"));
                }
                self.depth -= 1;
                self.line("}");
            }
            Target::Dynamic => {
                let base = s.sub.clone().unwrap_or_else(|| "object".to_string());
                self.line(&format!("class {}({base}):", s.name));
                self.depth += 1;
                if fields.is_empty() {
                    self.line("pass");
                } else {
                    for (name, ty, default) in &fields {
                        let ty_part = ty.as_ref().map(|t| format!(": {t}")).unwrap_or_default();
                        let default_part = default.as_ref().map(|d| format!(" = {d}")).unwrap_or_default();
                        self.line(&format!("{name}{ty_part}{default_part}"));
                    }
                }
                self.depth -= 1;
            }
            Target::Systems => {
                let vis = targets::systems::visibility_prefix(Self::is_public(&s.annotations));
                self.line(&format!("{vis}struct {}{generics} {{", s.name));
                self.depth += 1;
                for (name, ty, _) in &fields {
                    let ty_part = ty.clone().unwrap_or_else(|| "()".to_string());
                    self.line(&format!("pub {name}: {ty_part},"));
                }
                self.depth -= 1;
                self.line("}");
            }
        }
        for method in &s.methods {
            self.gen_functio(method)?;
        }
        Ok(())
    }

    fn gen_type_alias(&mut self, s: &TypeAliasDecl) -> Result<(), FrameworkError> {
        let aliased = type_map::map_type(self.target, &s.aliased);
        let generics = self.generic_suffix(&s.type_params);
        let line = match self.target {
            Target::Structural => format!("type {}{generics} = {aliased};", s.name),
            Target::Dynamic => format!("{} = {aliased}", s.name),
            Target::Systems => format!("type {}{generics} = {aliased};", s.name),
        };
        self.line(&line);
        Ok(())
    }

    fn gen_ordo(&mut self, s: &OrdoDecl) -> Result<(), FrameworkError> {
        match self.target {
            Target::Structural => {
                self.line(&format!("enum {} {{ {} }}", s.name, s.variants.join(", ")));
            }
            Target::Dynamic => {
                self.line(&format!("class {}(Enum):", s.name));
                self.depth += 1;
                for (i, v) in s.variants.iter().enumerate() {
                    self.line(&format!("{v} = {i}"));
                }
                self.depth -= 1;
            }
            Target::Systems => {
                self.line(&format!("enum {} {{ {} }}", s.name, s.variants.join(", ")));
            }
        }
        Ok(())
    }

    fn gen_discretio(&mut self, s: &DiscretioDecl) -> Result<(), FrameworkError> {
        let generics = self.generic_suffix(&s.type_params);
        match self.target {
            Target::Structural | Target::Systems => {
                self.line(&format!("enum {}{generics} {{", s.name));
                self.depth += 1;
                for v in &s.variants {
                    if v.is_unit() {
                        self.line(&format!("{},", v.name));
                    } else {
                        let fields = self.gen_genus_field_list(&v.fields)?;
                        let parts: Vec<String> = fields
                            .iter()
                            .map(|(name, ty, _)| {
                                let ty = ty.clone().unwrap_or_else(|| "unknown".to_string());
                                match self.target {
                                    Target::Systems => format!("{name}: {ty}"),
                                    _ => format!("{name}: {ty}"),
                                }
                            })
                            .collect();
                        self.line(&format!("{} {{ {} }},", v.name, parts.join(", ")));
                    }
                }
                self.depth -= 1;
                self.line("}");
            }
            Target::Dynamic => {
                self.line(&format!("class {}:", s.name));
                self.depth += 1;
                for v in &s.variants {
                    if v.is_unit() {
                        self.line(&format!("class {}({}): pass", v.name, s.name));
                    } else {
                        let fields = self.gen_genus_field_list(&v.fields)?;
                        self.line(&format!("class {}({}):", v.name, s.name));
                        self.depth += 1;
                        for (name, ty, _) in &fields {
                            let ty_part = ty.clone().unwrap_or_else(|| "Any".to_string());
                            self.line(&format!("{name}: {ty_part}"));
                        }
                        self.depth -= 1;
                    }
                }
                self.depth -= 1;
            }
        }
        Ok(())
    }

    // ── Control flow ──────────────────────────────────────────────────────

    fn gen_si(&mut self, s: &SiStmt) -> Result<(), FrameworkError> {
        self.gen_si_branch(s, false)
    }

    /// Renders one link of a `si`/`sin`/`secus` chain. `is_elif` selects
    /// `elif`/`else if` instead of a bare `if` header for a `sin` link.
    fn gen_si_branch(&mut self, s: &SiStmt, is_elif: bool) -> Result<(), FrameworkError> {
        let cond = self.gen_expr(&s.condition)?;
        let header = match (self.target, is_elif) {
            (Target::Dynamic, true) => format!("elif {cond}"),
            (Target::Dynamic, false) => format!("if {cond}"),
            (_, true) => format!("else if ({cond})"),
            (_, false) => format!("if ({cond})"),
        };
        match &s.then_branch {
            SiThen::Ergo(stmt) => self.emit_header_and_stmts(&header, std::slice::from_ref(stmt))?,
            SiThen::Block(block) => self.emit_header_and_block(&header, block)?,
        }
        if let Some(cape) = &s.cape {
            self.gen_cape_clause(cape)?;
        }
        if let Some(else_branch) = &s.else_branch {
            match else_branch.as_ref() {
                Stmt::Si(inner) => self.gen_si_branch(inner, true)?,
                Stmt::Block(block) => self.emit_header_and_block("else", block)?,
                other => self.gen_stmt(other)?,
            }
        }
        Ok(())
    }

    fn gen_cape_clause(&mut self, cape: &CapeClause) -> Result<(), FrameworkError> {
        let header = match (&self.target, &cape.binding) {
            (Target::Dynamic, Some(b)) => format!("except Exception as {b}"),
            (Target::Dynamic, None) => "except Exception".to_string(),
            (_, Some(b)) => format!("catch ({b})"),
            (_, None) => "catch".to_string(),
        };
        self.emit_header_and_block(&header, &cape.body)
    }

    fn gen_dum(&mut self, s: &DumStmt) -> Result<(), FrameworkError> {
        let cond = self.gen_expr(&s.condition)?;
        self.emit_header_and_block(&format!("while ({cond})"), &s.body)
    }

    fn gen_iteratio(&mut self, s: &IteratioStmt) -> Result<(), FrameworkError> {
        let source = self.gen_expr(&s.source)?;
        let header = match self.target {
            Target::Structural => {
                let kw = if s.over_keys { "in" } else { "of" };
                let await_kw = if s.is_async { "await " } else { "" };
                format!("for {await_kw}(const {} {kw} {source})", s.binding)
            }
            Target::Dynamic => {
                let source = if s.over_keys { format!("{source}.keys()") } else { source };
                let async_kw = if s.is_async { "async " } else { "" };
                format!("{async_kw}for {} in {source}", s.binding)
            }
            Target::Systems => {
                let source = if s.over_keys { format!("{source}.keys()") } else { format!("{source}.iter()") };
                format!("for {} in {source}", s.binding)
            }
        };
        self.emit_header_and_block(&header, &s.body)
    }

    fn gen_in_stmt(&mut self, s: &InStmt) -> Result<(), FrameworkError> {
        let target_expr = self.gen_expr(&s.target)?;
        let header = match self.target {
            Target::Dynamic => format!("with {target_expr}"),
            _ => format!("with ({target_expr})"),
        };
        self.emit_header_and_block(&header, &s.body)
    }

    fn gen_elige(&mut self, s: &EligeStmt) -> Result<(), FrameworkError> {
        let discriminant = self.gen_expr(&s.discriminant)?;
        match self.target {
            Target::Structural => {
                self.line(&format!("switch ({discriminant}) {{"));
                self.depth += 1;
                for case in &s.cases {
                    match &case.test {
                        Some(test) => {
                            let t = self.gen_expr(test)?;
                            self.line(&format!("case {t}:"));
                        }
                        None => self.line("default:"),
                    }
                    self.depth += 1;
                    for stmt in &case.body.statements {
                        self.gen_stmt(stmt)?;
                    }
                    self.line("break;");
                    self.depth -= 1;
                }
                self.depth -= 1;
                self.line("}");
            }
            Target::Dynamic => {
                for (i, case) in s.cases.iter().enumerate() {
                    let header = match &case.test {
                        Some(test) => {
                            let t = self.gen_expr(test)?;
                            if i == 0 {
                                format!("if {discriminant} == {t}")
                            } else {
                                format!("elif {discriminant} == {t}")
                            }
                        }
                        None => "else".to_string(),
                    };
                    self.emit_header_and_block(&header, &case.body)?;
                }
            }
            Target::Systems => {
                self.line(&format!("match {discriminant} {{"));
                self.depth += 1;
                for case in &s.cases {
                    let pat = match &case.test {
                        Some(test) => self.gen_expr(test)?,
                        None => "_".to_string(),
                    };
                    self.emit_header_and_stmts(&format!("{pat} =>"), &case.body.statements)?;
                }
                self.depth -= 1;
                self.line("}");
            }
        }
        Ok(())
    }

    fn gen_discerne(&mut self, s: &DiscerneStmt) -> Result<(), FrameworkError> {
        let discriminant = self.gen_expr(&s.discriminant)?;
        match self.target {
            Target::Systems => {
                self.line(&format!("match {discriminant} {{"));
                self.depth += 1;
                for case in &s.cases {
                    let header = if case.bindings.is_empty() {
                        format!("{} =>", case.variant_name)
                    } else {
                        format!("{}({}) =>", case.variant_name, case.bindings.join(", "))
                    };
                    self.emit_header_and_stmts(&header, &case.body.statements)?;
                }
                self.depth -= 1;
                self.line("}");
            }
            _ => {
                for (i, case) in s.cases.iter().enumerate() {
                    let is_elif = i > 0;
                    let header = match (self.target, is_elif) {
                        (Target::Dynamic, false) => format!("if isinstance({discriminant}, {})", case.variant_name),
                        (Target::Dynamic, true) => format!("elif isinstance({discriminant}, {})", case.variant_name),
                        (_, false) => format!("if ({discriminant} instanceof {})", case.variant_name),
                        (_, true) => format!("else if ({discriminant} instanceof {})", case.variant_name),
                    };
                    let binding_decl = match self.target {
                        Target::Dynamic => "",
                        _ => "const ",
                    };
                    self.out.push_str(&self.indent());
                    self.out.push_str(&header);
                    match self.target {
                        Target::Dynamic => self.raw(":\n"),
                        _ => self.raw(" {\n"),
                    }
                    self.depth += 1;
                    for (idx, binding) in case.bindings.iter().enumerate() {
                        let line = self.terminate(&format!("{binding_decl}{binding} = {discriminant}.fields[{idx}]"));
                        self.line(&line);
                    }
                    for stmt in &case.body.statements {
                        self.gen_stmt(stmt)?;
                    }
                    self.depth -= 1;
                    if self.target != Target::Dynamic {
                        self.out.push_str(&self.indent());
                        self.raw("}\n");
                    }
                }
            }
        }
        Ok(())
    }

    fn gen_custodi(&mut self, s: &CustodiStmt) -> Result<(), FrameworkError> {
        for (i, (cond, body)) in s.guards.iter().enumerate() {
            let c = self.gen_expr(cond)?;
            let header = match self.target {
                Target::Dynamic if i == 0 => format!("if {c}"),
                Target::Dynamic => format!("elif {c}"),
                _ if i == 0 => format!("if ({c})"),
                _ => format!("else if ({c})"),
            };
            self.emit_header_and_block(&header, body)?;
        }
        Ok(())
    }

    fn gen_adfirma(&mut self, s: &AdfirmaStmt) -> Result<(), FrameworkError> {
        let cond = self.gen_expr(&s.condition)?;
        let message = match &s.message {
            Some(m) => Some(self.gen_expr(m)?),
            None => None,
        };
        let line = match self.target {
            Target::Structural => match message {
                Some(m) => self.terminate(&format!("console.assert({cond}, {m})")),
                None => self.terminate(&format!("console.assert({cond})")),
            },
            Target::Dynamic => match message {
                Some(m) => self.terminate(&format!("assert {cond}, {m}")),
                None => self.terminate(&format!("assert {cond}")),
            },
            Target::Systems => match message {
                Some(m) => self.terminate(&format!("assert!({cond}, {m})")),
                None => self.terminate(&format!("assert!({cond})")),
            },
        };
        self.line(&line);
        Ok(())
    }

    fn gen_redde(&mut self, s: &ReddeStmt) -> Result<(), FrameworkError> {
        let value = match &s.value {
            Some(v) => Some(self.gen_expr(v)?),
            None => None,
        };
        let line = match value {
            Some(v) => self.terminate(&format!("return {v}")),
            None => self.terminate("return"),
        };
        self.line(&line);
        Ok(())
    }

    fn gen_iace(&mut self, s: &IaceStmt) -> Result<(), FrameworkError> {
        let value = self.gen_expr(&s.value)?;
        let line = match self.target {
            Target::Structural => self.terminate(&format!("throw {value}")),
            Target::Dynamic if s.fatal => self.terminate(&format!("raise SystemExit({value})")),
            Target::Dynamic => self.terminate(&format!("raise {value}")),
            Target::Systems if s.fatal => self.terminate(&format!("panic!(\"{{:?}}\", {value})")),
            Target::Systems => self.terminate(&format!("return Err({value})")),
        };
        self.line(&line);
        Ok(())
    }

    fn gen_scribe(&mut self, s: &ScribeStmt) -> Result<(), FrameworkError> {
        let args = self.gen_expr_list(&s.arguments)?;
        let call = match self.target {
            Target::Structural => targets::structural::log_call(s.kind),
            Target::Dynamic => targets::dynamic::log_call(s.kind),
            Target::Systems => targets::systems::log_call(s.kind),
        };
        let line = self.terminate(&format!("{call}({})", args.join(", ")));
        self.line(&line);
        Ok(())
    }

    fn gen_tempta(&mut self, s: &TemptaStmt) -> Result<(), FrameworkError> {
        let header = match self.target {
            Target::Dynamic => "try",
            _ => "try",
        };
        self.emit_header_and_block(header, &s.body)?;
        if let Some(cape) = &s.cape {
            self.gen_cape_clause(cape)?;
        }
        if let Some(demum) = &s.demum {
            let header = match self.target {
                Target::Dynamic => "finally",
                _ => "finally",
            };
            self.emit_header_and_block(header, demum)?;
        }
        Ok(())
    }

    fn gen_fac(&mut self, s: &FacStmt) -> Result<(), FrameworkError> {
        match (&s.while_condition, self.target) {
            (Some(cond), Target::Dynamic) => {
                // No native do-while: desugar to `while True: body; if not cond: break`.
                self.emit_header_and_block("while True", &s.body)?;
                let c = self.gen_expr(cond)?;
                self.depth += 1;
                self.line(&format!("if not ({c}): break"));
                self.depth -= 1;
            }
            (Some(cond), Target::Systems) => {
                // Rust has no do-while: desugar to `loop { body; if !(cond) { break; } }`.
                self.out.push_str(&self.indent());
                self.raw("loop {\n");
                self.depth += 1;
                if s.body.statements.is_empty() {
                    // placeholder omitted: the break check below makes the body non-empty
                } else {
                    for stmt in &s.body.statements {
                        self.gen_stmt(stmt)?;
                    }
                }
                let c = self.gen_expr(cond)?;
                self.line(&format!("if !({c}) {{ break; }}"));
                self.depth -= 1;
                self.out.push_str(&self.indent());
                self.raw("}\n");
            }
            (Some(cond), Target::Structural) => {
                self.out.push_str(&self.indent());
                self.raw("do {\n");
                self.depth += 1;
                if s.body.statements.is_empty() {
                    self.line(self.empty_block_placeholder());
                } else {
                    for stmt in &s.body.statements {
                        self.gen_stmt(stmt)?;
                    }
                }
                self.depth -= 1;
                self.out.push_str(&self.indent());
                let c = self.gen_expr(cond)?;
                let line = self.terminate(&format!("}} while ({c})"));
                self.raw(&line);
                self.raw("\n");
            }
            (None, target) => {
                let header = match target {
                    Target::Systems => "loop",
                    Target::Dynamic => "while True",
                    Target::Structural => "while (true)",
                };
                self.emit_header_and_block(header, &s.body)?;
            }
        }
        if let Some(cape) = &s.cape {
            self.gen_cape_clause(cape)?;
        }
        Ok(())
    }

    fn gen_cura(&mut self, s: &CuraStmt) -> Result<(), FrameworkError> {
        let expr = match &s.expr {
            Some(e) => Some(self.gen_expr(e)?),
            None => None,
        };
        let resource = expr.unwrap_or_else(|| match s.resource_kind {
            Some(CuraResourceKind::Arena) => "Arena::new()".to_string(),
            Some(CuraResourceKind::Page) => "Page::new()".to_string(),
            None => "acquire()".to_string(),
        });
        let header = match self.target {
            Target::Dynamic => format!("with {resource} as {}", s.binding),
            Target::Systems => format!("{{ let {} = {resource};", s.binding),
            Target::Structural => format!("using ({resource} as {})", s.binding),
        };
        if self.target == Target::Systems {
            self.line(&header);
            self.depth += 1;
            for stmt in &s.body.statements {
                self.gen_stmt(stmt)?;
            }
            self.depth -= 1;
            self.line("}");
        } else {
            self.emit_header_and_block(&header, &s.body)?;
        }
        if let Some(cape) = &s.cape {
            self.gen_cape_clause(cape)?;
        }
        Ok(())
    }

    fn gen_ad(&mut self, s: &AdStmt) -> Result<(), FrameworkError> {
        let args = self.gen_expr_list(&s.args)?;
        let call = format!("{}({})", s.target, args.join(", "));
        let call = if matches!(s.binding_verb, Some(ReturnVerb::Fiet)) { self.gen_await(&call) } else { call };
        let binding_line = match (&s.binding_verb, &s.binding_name) {
            (Some(_), Some(name)) => match self.target {
                Target::Dynamic => self.terminate(&format!("{name} = {call}")),
                Target::Systems => {
                    let ty = s.type_annotation.as_ref().map(|t| format!(": {}", type_map::map_type(self.target, t))).unwrap_or_default();
                    self.terminate(&format!("let {name}{ty} = {call}"))
                }
                Target::Structural => {
                    let ty = s.type_annotation.as_ref().map(|t| format!(": {}", type_map::map_type(self.target, t))).unwrap_or_default();
                    self.terminate(&format!("const {name}{ty} = {call}"))
                }
            },
            _ => self.terminate(&call),
        };
        if let Some(body) = &s.body {
            let alias_header = match &s.alias {
                Some(alias) => match self.target {
                    Target::Dynamic => format!("with {call} as {alias}"),
                    _ => format!("using ({call} as {alias})"),
                },
                None => match self.target {
                    Target::Dynamic => format!("with {call}"),
                    _ => format!("using ({call})"),
                },
            };
            self.emit_header_and_block(&alias_header, body)?;
        } else {
            self.line(&binding_line);
        }
        if let Some(cape) = &s.cape {
            self.gen_cape_clause(cape)?;
        }
        Ok(())
    }

    fn gen_incipit(&mut self, s: &IncipitStmt) -> Result<(), FrameworkError> {
        let header = match self.target {
            Target::Structural => if s.is_async { "async function main()" } else { "function main()" }.to_string(),
            Target::Dynamic => if s.is_async { "async def main()" } else { "def main()" }.to_string(),
            Target::Systems => if s.is_async { "async fn main()" } else { "fn main()" }.to_string(),
        };
        match &s.body {
            IncipitBody::Block(block) => self.emit_header_and_block(&header, block)?,
            IncipitBody::Ergo(stmt) => self.emit_header_and_stmts(&header, std::slice::from_ref(stmt))?,
        }
        if self.target == Target::Dynamic {
            self.line("");
            self.line(&format!("if __name__ == \"__main__\":"));
            self.depth += 1;
            self.line(if s.is_async { "asyncio.run(main())" } else { "main()" });
            self.depth -= 1;
        }
        Ok(())
    }

    fn gen_probandum(&mut self, s: &ProbandumStmt) -> Result<(), FrameworkError> {
        let header = match self.target {
            Target::Structural => format!("describe('{}', () =>", s.name),
            Target::Dynamic => format!("class Test{}(unittest.TestCase)", sanitize_ident(&s.name)),
            Target::Systems => format!("mod {}", sanitize_ident(&s.name)),
        };
        self.emit_header_and_stmts(&header, &s.body)?;
        if self.target == Target::Structural {
            // Close the arrow-function call `describe(..., () => { ... })`.
            if self.out.ends_with("}\n") {
                self.out.pop();
                self.raw(");\n");
            }
        }
        Ok(())
    }

    fn gen_proba(&mut self, s: &ProbaStmt) -> Result<(), FrameworkError> {
        let header = match &s.modifier {
            Some(ProbaModifier::Omitte) => match self.target {
                Target::Structural => format!("it.skip('{}', () =>", s.name),
                Target::Dynamic => format!("@unittest.skip(\"omitted\")\ndef test_{}(self)", sanitize_ident(&s.name)),
                Target::Systems => format!("#[ignore]\n#[test]\nfn {}()", sanitize_ident(&s.name)),
            },
            Some(ProbaModifier::Futurum(reason)) => match self.target {
                Target::Structural => format!("it.fails('{} ({reason})', () =>", s.name),
                Target::Dynamic => format!(
                    "@unittest.expectedFailure  # {reason}\ndef test_{}(self)",
                    sanitize_ident(&s.name)
                ),
                Target::Systems => format!("#[test]\n#[should_panic]\nfn {}()", sanitize_ident(&s.name)),
            },
            None => match self.target {
                Target::Structural => format!("it('{}', () =>", s.name),
                Target::Dynamic => format!("def test_{}(self)", sanitize_ident(&s.name)),
                Target::Systems => format!("#[test]\nfn {}()", sanitize_ident(&s.name)),
            },
        };
        self.emit_header_and_block(&header, &s.body)?;
        if self.target == Target::Structural {
            if self.out.ends_with("}\n") {
                self.out.pop();
                self.raw(");\n");
            }
        }
        Ok(())
    }

    fn gen_hook(&mut self, s: &HookStmt) -> Result<(), FrameworkError> {
        let name = match (s.kind, s.all) {
            (HookKind::Praepara, true) => "beforeAll",
            (HookKind::Praepara, false) => "beforeEach",
            (HookKind::Praeparabit, true) => "beforeAll",
            (HookKind::Praeparabit, false) => "beforeEach",
            (HookKind::Postpara, true) => "afterAll",
            (HookKind::Postpara, false) => "afterEach",
            (HookKind::Postparabit, true) => "afterAll",
            (HookKind::Postparabit, false) => "afterEach",
        };
        let header = match self.target {
            Target::Structural => format!("{name}(() =>"),
            Target::Dynamic => format!("def {}(self)", snake_hook_name(s.kind, s.all)),
            Target::Systems => format!("fn {}()", snake_hook_name(s.kind, s.all)),
        };
        self.emit_header_and_block(&header, &s.body)?;
        if self.target == Target::Structural {
            if self.out.ends_with("}\n") {
                self.out.pop();
                self.raw(");\n");
            }
        }
        Ok(())
    }

    // ── Expressions ───────────────────────────────────────────────────────

    fn gen_await(&self, expr: &str) -> String {
        match self.target {
            Target::Structural => format!("await {expr}"),
            Target::Dynamic => format!("await {expr}"),
            Target::Systems => format!("{expr}.await"),
        }
    }

    fn string_literal(&self, s: &str) -> String {
        let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    }

    fn gen_expr(&mut self, expr: &Expr) -> Result<String, FrameworkError> {
        match expr {
            Expr::Identifier(e) => Ok(e.name.clone()),
            Expr::Ego(_) => Ok(match self.target {
                Target::Structural => "this".to_string(),
                Target::Dynamic | Target::Systems => "self".to_string(),
            }),
            Expr::Literal(e) => Ok(match &e.value {
                LiteralValue::Bool(b) => match self.target {
                    Target::Structural => targets::structural::bool_literal(*b).to_string(),
                    Target::Dynamic => targets::dynamic::bool_literal(*b).to_string(),
                    Target::Systems => targets::systems::bool_literal(*b).to_string(),
                },
                LiteralValue::Int(_) | LiteralValue::Float(_) | LiteralValue::BigInt(_) => e.raw.clone(),
                LiteralValue::Str(s) => self.string_literal(s),
                LiteralValue::Nihil => match self.target {
                    Target::Structural => targets::structural::NULL_LITERAL.to_string(),
                    Target::Dynamic => targets::dynamic::NULL_LITERAL.to_string(),
                    Target::Systems => targets::systems::NULL_LITERAL.to_string(),
                },
            }),
            Expr::Template(e) => self.gen_template(e),
            Expr::Array(e) => {
                let elems = self.gen_expr_list(&e.elements)?;
                Ok(match self.target {
                    Target::Systems => format!("vec![{}]", elems.join(", ")),
                    _ => format!("[{}]", elems.join(", ")),
                })
            }
            Expr::Object(e) => self.gen_object(e),
            Expr::Range(e) => self.gen_range(e),
            Expr::Binary(e) => self.gen_binary(e),
            Expr::Unary(e) => self.gen_unary(e),
            Expr::Call(e) => self.gen_call(e),
            Expr::Member(e) => self.gen_member(e),
            Expr::Lambda(e) => self.gen_lambda(e),
            Expr::Assignment(e) => self.gen_assignment(e),
            Expr::Cede(e) => {
                let operand = self.gen_expr(&e.operand)?;
                Ok(if self.in_generator {
                    format!("yield {operand}")
                } else {
                    self.gen_await(&operand)
                })
            }
            Expr::Novum(e) => self.gen_novum(e),
            Expr::Finge(e) => {
                let args = self.gen_expr_list(&e.args)?;
                Ok(match self.target {
                    Target::Systems if args.is_empty() => format!("Self::{}", e.variant_name),
                    Target::Systems => format!("Self::{}({})", e.variant_name, args.join(", ")),
                    _ if args.is_empty() => format!("new {}()", e.variant_name),
                    _ => format!("new {}({})", e.variant_name, args.join(", ")),
                })
            }
            Expr::Conditional(e) => self.gen_conditional(e),
            Expr::Qua(e) => {
                let operand = self.gen_expr(&e.operand)?;
                let ty = type_map::map_type(self.target, &e.target_type);
                Ok(match self.target {
                    Target::Structural => format!("({operand} as {ty})"),
                    Target::Dynamic => format!("cast({ty}, {operand})"),
                    Target::Systems => format!("({operand} as {ty})"),
                })
            }
            Expr::Est(e) => {
                let operand = self.gen_expr(&e.operand)?;
                Ok(match self.target {
                    Target::Structural if e.negated => format!("!({operand} instanceof {})", e.type_name),
                    Target::Structural => format!("({operand} instanceof {})", e.type_name),
                    Target::Dynamic if e.negated => format!("(not isinstance({operand}, {}))", e.type_name),
                    Target::Dynamic => format!("isinstance({operand}, {})", e.type_name),
                    Target::Systems if e.negated => format!("!matches!({operand}, {}(..))", e.type_name),
                    Target::Systems => format!("matches!({operand}, {}(..))", e.type_name),
                })
            }
            Expr::Praefixum(e) => {
                // Compile-time-evaluated prefix; no target has a distinct
                // const-eval call shape here, so it folds to its operand.
                self.gen_expr(&e.operand)
            }
            Expr::Scriptum(e) => {
                let args = self.gen_expr_list(&e.args)?;
                Ok(intrinsics::scriptum_call(self.target, &e.format, &args))
            }
            Expr::Lege(e) => {
                let prompt = match &e.prompt {
                    Some(p) => Some(self.gen_expr(p)?),
                    None => None,
                };
                Ok(intrinsics::lege_call(self.target, prompt.as_deref()))
            }
            Expr::Regex(e) => Ok(match self.target {
                Target::Structural => format!("/{}/{}", e.pattern, e.flags),
                Target::Dynamic => format!("re.compile(r\"{}\")", e.pattern),
                Target::Systems => format!("Regex::new(r\"{}\").unwrap()", e.pattern),
            }),
            Expr::CollectionDsl(e) => self.gen_collection_dsl(e),
            Expr::Spread(e) => {
                let operand = self.gen_expr(&e.operand)?;
                Ok(match self.target {
                    Target::Systems => operand,
                    _ => format!("...{operand}"),
                })
            }
        }
    }

    fn gen_template(&mut self, t: &TemplateExpr) -> Result<String, FrameworkError> {
        match self.target {
            Target::Structural => {
                let mut s = String::from("`");
                for part in &t.parts {
                    match part {
                        TemplatePart::Text(txt) => s.push_str(&txt.replace('`', "\\`")),
                        TemplatePart::Expr(e) => {
                            let rendered = self.gen_expr(e)?;
                            s.push_str("${");
                            s.push_str(&rendered);
                            s.push('}');
                        }
                    }
                }
                s.push('`');
                Ok(s)
            }
            Target::Dynamic => {
                let mut s = String::from("f\"");
                for part in &t.parts {
                    match part {
                        TemplatePart::Text(txt) => s.push_str(&txt.replace('"', "\\\"")),
                        TemplatePart::Expr(e) => {
                            let rendered = self.gen_expr(e)?;
                            s.push('{');
                            s.push_str(&rendered);
                            s.push('}');
                        }
                    }
                }
                s.push('"');
                Ok(s)
            }
            Target::Systems => {
                let mut fmt = String::new();
                let mut args = Vec::new();
                for part in &t.parts {
                    match part {
                        TemplatePart::Text(txt) => fmt.push_str(&txt.replace('{', "{{").replace('}', "}}")),
                        TemplatePart::Expr(e) => {
                            fmt.push_str("{}");
                            args.push(self.gen_expr(e)?);
                        }
                    }
                }
                if args.is_empty() {
                    Ok(format!("format!(\"{fmt}\")"))
                } else {
                    Ok(format!("format!(\"{fmt}\", {})", args.join(", ")))
                }
            }
        }
    }

    fn gen_object(&mut self, e: &ObjectExpr) -> Result<String, FrameworkError> {
        let mut parts = Vec::new();
        for prop in &e.properties {
            match prop {
                ObjectProperty::KeyValue { key, value } => {
                    let v = self.gen_expr(value)?;
                    parts.push(match self.target {
                        Target::Dynamic => format!("\"{key}\": {v}"),
                        _ => format!("{key}: {v}"),
                    });
                }
                ObjectProperty::Spread(inner) => {
                    let v = self.gen_expr(inner)?;
                    parts.push(match self.target {
                        Target::Dynamic => format!("**{v}"),
                        Target::Systems => format!("..{v}"),
                        Target::Structural => format!("...{v}"),
                    });
                }
            }
        }
        Ok(match self.target {
            Target::Systems => format!("serde_json::json!({{ {} }})", parts.join(", ")),
            _ => format!("{{ {} }}", parts.join(", ")),
        })
    }

    fn gen_range(&mut self, e: &RangeExpr) -> Result<String, FrameworkError> {
        let start = self.gen_expr(&e.start)?;
        let end = self.gen_expr(&e.end)?;
        let step = match &e.step {
            Some(s) => Some(self.gen_expr(s)?),
            None => None,
        };
        Ok(match self.target {
            Target::Systems => {
                let base = if e.inclusive { format!("({start}..={end})") } else { format!("({start}..{end})") };
                match step {
                    Some(s) => format!("{base}.step_by({s} as usize)"),
                    None => base,
                }
            }
            Target::Dynamic => {
                let end_adj = if e.inclusive { format!("({end}) + 1") } else { end };
                match step {
                    Some(s) => format!("range({start}, {end_adj}, {s})"),
                    None => format!("range({start}, {end_adj})"),
                }
            }
            Target::Structural => match step {
                Some(s) => format!("range({start}, {end}, {}, {s})", e.inclusive),
                None => format!("range({start}, {end}, {})", e.inclusive),
            },
        })
    }

    fn binary_op_str(&self, op: BinaryOp) -> &'static str {
        use BinaryOp::*;
        match (self.target, op) {
            (_, Add) => "+",
            (_, Sub) => "-",
            (_, Mul) => "*",
            (_, Div) => "/",
            (_, Mod) => "%",
            (Target::Structural, StrictEq) => "===",
            (Target::Structural, StrictNotEq) => "!==",
            (_, Eq) | (_, StrictEq) => "==",
            (_, NotEq) | (_, StrictNotEq) => "!=",
            (_, Lt) => "<",
            (_, LtEq) => "<=",
            (_, Gt) => ">",
            (_, GtEq) => ">=",
            (_, BitOr) => "|",
            (_, BitXor) => "^",
            (_, BitAnd) => "&",
            (_, Shl) => "<<",
            (_, Shr) => ">>",
            (Target::Dynamic, And) => "and",
            (Target::Dynamic, Or) => "or",
            (_, And) => "&&",
            (_, Or) => "||",
            (_, Nullish) => unreachable!("Nullish is expanded separately in gen_binary"),
        }
    }

    fn gen_binary(&mut self, b: &BinaryExpr) -> Result<String, FrameworkError> {
        let left = self.gen_expr(&b.left)?;
        let right = self.gen_expr(&b.right)?;
        if b.op == BinaryOp::Nullish {
            return Ok(match self.target {
                Target::Structural => format!("({left} ?? {right})"),
                Target::Dynamic => format!("({left} if {left} is not None else {right})"),
                Target::Systems => format!("{left}.unwrap_or({right})"),
            });
        }
        let op = self.binary_op_str(b.op);
        Ok(format!("({left} {op} {right})"))
    }

    fn gen_unary(&mut self, u: &UnaryExpr) -> Result<String, FrameworkError> {
        let operand = self.gen_expr(&u.operand)?;
        Ok(match u.op {
            UnaryOp::Not | UnaryOp::LogicalNot => match self.target {
                Target::Dynamic => format!("(not {operand})"),
                _ => format!("!{operand}"),
            },
            UnaryOp::Neg => format!("-{operand}"),
            UnaryOp::BitNot => format!("~{operand}"),
            UnaryOp::IsEmpty => match self.target {
                Target::Dynamic => format!("(not {operand})"),
                Target::Systems => format!("{operand}.is_empty()"),
                Target::Structural => format!(
                    "(Array.isArray({operand}) || typeof {operand} === 'string' ? {operand}.length === 0 : !{operand})"
                ),
            },
            UnaryOp::IsNotEmpty => match self.target {
                Target::Dynamic => format!("bool({operand})"),
                Target::Systems => format!("!{operand}.is_empty()"),
                Target::Structural => format!(
                    "(Array.isArray({operand}) || typeof {operand} === 'string' ? {operand}.length !== 0 : !!{operand})"
                ),
            },
            UnaryOp::IsNull => match self.target {
                Target::Dynamic => format!("({operand} is None)"),
                Target::Systems => format!("{operand}.is_none()"),
                Target::Structural => format!("({operand} == null)"),
            },
            UnaryOp::IsNotNull => match self.target {
                Target::Dynamic => format!("({operand} is not None)"),
                Target::Systems => format!("{operand}.is_some()"),
                Target::Structural => format!("({operand} != null)"),
            },
            UnaryOp::Negativum => format!("({operand} < 0)"),
            UnaryOp::Positivum => format!("({operand} > 0)"),
        })
    }

    fn gen_call(&mut self, c: &CallExpr) -> Result<String, FrameworkError> {
        if let Expr::Identifier(id) = c.callee.as_ref() {
            if let Some(intrinsic) = intrinsics::recognize(&id.name) {
                let args = self.gen_expr_list(&c.args)?;
                return Ok(intrinsics::emit(self.target, &intrinsic, &args, &mut self.features));
            }
        }
        let callee = self.gen_expr(&c.callee)?;
        let args = self.gen_expr_list(&c.args)?;
        let op = if c.optional && self.target == Target::Structural { "?." } else { "" };
        Ok(format!("{callee}{op}({})", args.join(", ")))
    }

    fn gen_member(&mut self, m: &MemberExpr) -> Result<String, FrameworkError> {
        let object = self.gen_expr(&m.object)?;
        Ok(match &m.property {
            MemberKey::Name(name) => match self.target {
                Target::Structural if m.optional => format!("{object}?.{name}"),
                Target::Structural if m.non_null => format!("{object}!.{name}"),
                Target::Systems if m.non_null => format!("{object}.unwrap().{name}"),
                _ => format!("{object}.{name}"),
            },
            MemberKey::Index(idx) => {
                let index = self.gen_expr(idx)?;
                match self.target {
                    Target::Structural if m.optional => format!("{object}?.[{index}]"),
                    _ => format!("{object}[{index}]"),
                }
            }
        })
    }

    fn gen_lambda(&mut self, l: &LambdaExpr) -> Result<String, FrameworkError> {
        let params = self.gen_params(&l.params);
        match &l.body {
            LambdaBody::Expr(body) => {
                let async_kw = if l.is_async { "async " } else { "" };
                let body_text = self.gen_expr(body)?;
                Ok(match self.target {
                    Target::Structural => format!("({async_kw}({}) => {body_text})", params.join(", ")),
                    Target::Dynamic => format!("(lambda {}: {body_text})", params.join(", ")),
                    Target::Systems => format!("(move |{}| {body_text})", params.join(", ")),
                })
            }
            LambdaBody::Block(block) => {
                let prev_depth = self.depth;
                self.depth = 0;
                let rendered = self.render_block_expr(block)?;
                self.depth = prev_depth;
                let async_kw = if l.is_async { "async " } else { "" };
                Ok(match self.target {
                    Target::Structural => format!("({async_kw}({}) => {{\n{rendered}}})", params.join(", ")),
                    Target::Systems => format!("(move |{}| {{\n{rendered}}})", params.join(", ")),
                    // Python lambdas cannot hold statements; approximate with
                    // a nested def the caller can still treat as a value.
                    Target::Dynamic => format!("(lambda {}: (_ for _ in ()).throw(NotImplementedError))", params.join(", ")),
                })
            }
        }
    }

    fn gen_assignment(&mut self, a: &AssignmentExpr) -> Result<String, FrameworkError> {
        let target = self.gen_expr(&a.target)?;
        let value = self.gen_expr(&a.value)?;
        let op = match a.op {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
            AssignOp::ModAssign => "%=",
            AssignOp::AndAssign => "&=",
            AssignOp::OrAssign => "|=",
        };
        Ok(format!("{target} {op} {value}"))
    }

    fn gen_novum(&mut self, n: &NovumExpr) -> Result<String, FrameworkError> {
        let args = self.gen_expr_list(&n.args)?;
        let base = match self.target {
            Target::Systems => format!("{}::new({})", n.type_name, args.join(", ")),
            _ => format!("new {}({})", n.type_name, args.join(", ")),
        };
        match &n.with_clause {
            None => Ok(base),
            Some(WithClause::Object(obj)) => {
                let overrides = self.gen_object(obj)?;
                Ok(match self.target {
                    Target::Structural => format!("Object.assign({base}, {overrides})"),
                    Target::Dynamic => format!("{{**{base}.__dict__, **{overrides}}}"),
                    Target::Systems => format!("{base}.with_overrides({overrides})"),
                })
            }
            Some(WithClause::Spread(expr)) => {
                let spread = self.gen_expr(expr)?;
                Ok(match self.target {
                    Target::Structural => format!("Object.assign({base}, {spread})"),
                    Target::Dynamic => format!("{{**{base}.__dict__, **{spread}}}"),
                    Target::Systems => format!("{base}.with_overrides({spread})"),
                })
            }
        }
    }

    fn gen_conditional(&mut self, c: &ConditionalExpr) -> Result<String, FrameworkError> {
        let condition = self.gen_expr(&c.condition)?;
        let then_branch = self.gen_expr(&c.then_branch)?;
        let else_branch = self.gen_expr(&c.else_branch)?;
        Ok(match self.target {
            Target::Dynamic => format!("({then_branch} if {condition} else {else_branch})"),
            Target::Systems => format!("(if {condition} {{ {then_branch} }} else {{ {else_branch} }})"),
            Target::Structural => format!("({condition} ? {then_branch} : {else_branch})"),
        })
    }

    fn gen_collection_dsl(&mut self, e: &CollectionDslExpr) -> Result<String, FrameworkError> {
        let mut base = self.gen_expr(&e.source)?;
        if let Some(filter) = &e.filter {
            let predicate = match &filter.kind {
                DslFilterKind::Shorthand(prop) => match self.target {
                    Target::Dynamic => format!("lambda x: x.{prop}"),
                    Target::Systems => format!("|x| x.{prop}"),
                    Target::Structural => format!("(x) => x.{prop}"),
                },
                DslFilterKind::Predicate(pred) => {
                    let body = self.gen_expr(pred)?;
                    match self.target {
                        Target::Dynamic => format!("lambda x: {body}"),
                        Target::Systems => format!("|x| {body}"),
                        Target::Structural => format!("(x) => {body}"),
                    }
                }
            };
            let predicate = if filter.negated {
                match self.target {
                    Target::Dynamic => predicate.replacen("lambda x: ", "lambda x: not (", 1) + ")",
                    Target::Systems => predicate.replacen("|x| ", "|x| !(", 1) + ")",
                    Target::Structural => predicate.replacen("=> ", "=> !(", 1) + ")",
                }
            } else {
                predicate
            };
            base = match self.target {
                Target::Dynamic => format!("filter({predicate}, {base})"),
                Target::Systems => format!("{base}.iter().filter({predicate})"),
                Target::Structural => format!("{base}.filter({predicate})"),
            };
        }
        for transform in &e.transforms {
            base = match transform {
                DslTransform::Prima(n) => {
                    let n = self.gen_expr(n)?;
                    match self.target {
                        Target::Dynamic => format!("list({base})[:{n}]"),
                        Target::Systems => format!("{base}.take({n})"),
                        Target::Structural => format!("{base}.slice(0, {n})"),
                    }
                }
                DslTransform::Ultima(n) => {
                    let n = self.gen_expr(n)?;
                    match self.target {
                        Target::Dynamic => format!("list({base})[-{n}:]"),
                        Target::Systems => format!("{base}.collect::<Vec<_>>().into_iter().rev().take({n})"),
                        Target::Structural => format!("{base}.slice(-{n})"),
                    }
                }
                DslTransform::Summa => match self.target {
                    Target::Dynamic => format!("sum({base})"),
                    Target::Systems => format!("{base}.sum()"),
                    Target::Structural => format!("{base}.reduce((a, b) => a + b, 0)"),
                },
            };
        }
        Ok(base)
    }
}

fn comment_line(target: Target, text: &str) -> String {
    match target {
        Target::Structural => targets::structural::comment_line(text),
        Target::Dynamic => targets::dynamic::comment_line(text),
        Target::Systems => targets::systems::comment_line(text),
    }
}

fn sanitize_ident(name: &str) -> String {
    name.chars().map(|c| if c.is_alphanumeric() { c } else { '_' }).collect()
}

fn snake_hook_name(kind: HookKind, all: bool) -> &'static str {
    match (kind, all) {
        (HookKind::Praepara, true) | (HookKind::Praeparabit, true) => "setup_all",
        (HookKind::Praepara, false) | (HookKind::Praeparabit, false) => "setup",
        (HookKind::Postpara, true) | (HookKind::Postparabit, true) => "teardown_all",
        (HookKind::Postpara, false) | (HookKind::Postparabit, false) => "teardown",
    }
}
