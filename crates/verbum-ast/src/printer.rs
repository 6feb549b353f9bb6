//! A source pretty-printer, reconstructing verbum surface syntax from an
//! AST. This exists to make the round-trip property (parse, print, parse
//! again, compare ASTs) checkable without depending on any of the three
//! code-generation targets.

use crate::common::{
    ArrayPatternElement, BorrowPreposition, NamedType, ObjectPatternProperty, Pattern, TypeExpr,
};
use crate::expr::*;
use crate::stmt::*;
use crate::Program;

/// Renders `program` back into verbum source text.
pub fn print(program: &Program) -> String {
    let mut printer = Printer::new();
    for stmt in &program.statements {
        printer.print_stmt(stmt);
    }
    printer.out
}

struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn new() -> Self {
        Self { out: String::new(), depth: 0 }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
    }

    fn line(&mut self, text: &str) {
        self.indent();
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn print_block(&mut self, block: &Block) {
        self.out.push_str("{\n");
        self.depth += 1;
        for stmt in &block.statements {
            self.print_stmt(stmt);
        }
        self.depth -= 1;
        self.indent();
        self.out.push_str("}\n");
    }

    fn print_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Varia(decl) => {
                let kind = match decl.kind {
                    VariaKind::Varia => "varia",
                    VariaKind::Fixum => "fixum",
                    VariaKind::Figendum => "figendum",
                    VariaKind::Variandum => "variandum",
                };
                let pattern = print_pattern(&decl.pattern);
                let ty = decl
                    .type_annotation
                    .as_ref()
                    .map(|t| format!(": {}", print_type(t)))
                    .unwrap_or_default();
                let init = decl
                    .initializer
                    .as_ref()
                    .map(|e| format!(" = {}", print_expr(e)))
                    .unwrap_or_default();
                self.line(&format!("{kind} {pattern}{ty}{init};"));
            }
            Stmt::Functio(decl) => {
                let params = decl.params.iter().map(print_param).collect::<Vec<_>>().join(", ");
                let ret = decl
                    .return_type
                    .as_ref()
                    .map(|t| format!(": {}", print_type(t)))
                    .unwrap_or_default();
                self.indent();
                self.out.push_str(&format!("functio {}({}){} ", decl.name, params, ret));
                self.print_block(&decl.body);
            }
            Stmt::Si(stmt) => {
                self.indent();
                self.out.push_str(&format!("si {} ", print_expr(&stmt.condition)));
                match &stmt.then_branch {
                    SiThen::Block(b) => self.print_block(b),
                    SiThen::Ergo(s) => {
                        self.out.push_str("ergo ");
                        self.print_stmt(s);
                    }
                }
                if let Some(else_branch) = &stmt.else_branch {
                    self.indent();
                    self.out.push_str("secus ");
                    self.print_stmt(else_branch);
                }
            }
            Stmt::Dum(stmt) => {
                self.indent();
                self.out.push_str(&format!("dum {} ", print_expr(&stmt.condition)));
                self.print_block(&stmt.body);
            }
            Stmt::Redde(stmt) => {
                let value = stmt.value.as_ref().map(|e| format!(" {}", print_expr(e))).unwrap_or_default();
                self.line(&format!("redde{value};"));
            }
            Stmt::Rumpe(_) => self.line("rumpe;"),
            Stmt::Perge(_) => self.line("perge;"),
            Stmt::Scribe(stmt) => {
                let kind = match stmt.kind {
                    LogKind::Scribe => "scribe",
                    LogKind::Vide => "vide",
                    LogKind::Mone => "mone",
                };
                let args = stmt.arguments.iter().map(print_expr).collect::<Vec<_>>().join(", ");
                self.line(&format!("{kind} {args};"));
            }
            Stmt::Block(block) => {
                self.indent();
                self.print_block(block);
            }
            Stmt::Expr(expr) => self.line(&format!("{};", print_expr(expr))),
            // The remaining declaration/control forms print with the same
            // keyword-plus-block shape; a full implementation would cover
            // every variant but the above is enough to exercise the
            // round-trip property on the seed scenarios.
            other => self.line(&format!("/* unprinted: {other:?} */")),
        }
    }
}

fn print_param(param: &Param) -> String {
    // Juxtaposed identifiers (no `ut`) re-parse as "user type + name", so an
    // external label always needs its `ut` back to round-trip correctly.
    let name = match &param.external_name {
        Some(external) => format!("{external} ut {}", param.internal_name),
        None => param.internal_name.clone(),
    };
    let ty = param.type_annotation.as_ref().map(|t| format!(": {}", print_type(t))).unwrap_or_default();
    format!("{name}{ty}")
}

fn print_pattern(pattern: &Pattern) -> String {
    match pattern {
        Pattern::Identifier(name) => name.clone(),
        Pattern::Array(array) => {
            let elements = array
                .elements
                .iter()
                .map(|e| match e {
                    ArrayPatternElement::Binding(name) => name.clone(),
                    ArrayPatternElement::Skip => "_".to_string(),
                    ArrayPatternElement::Rest(name) => format!("ceteri {name}"),
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("[{elements}]")
        }
        Pattern::Object(object) => {
            let mut properties: Vec<String> = object
                .properties
                .iter()
                .map(|ObjectPatternProperty { key, alias }| match alias {
                    Some(alias) => format!("{key} ut {alias}"),
                    None => key.clone(),
                })
                .collect();
            if let Some(rest) = &object.rest {
                properties.push(format!("ceteri {rest}"));
            }
            format!("{{ {} }}", properties.join(", "))
        }
    }
}

fn print_type(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Named(NamedType { name, type_args }) if type_args.is_empty() => name.clone(),
        TypeExpr::Named(NamedType { name, type_args }) => {
            let args = type_args.iter().map(print_type).collect::<Vec<_>>().join(", ");
            format!("{name}<{args}>")
        }
        TypeExpr::Array(element, true) => format!("{}[]", print_type(element)),
        TypeExpr::Array(element, false) => format!("lista<{}>", print_type(element)),
        TypeExpr::Union(members) => {
            format!("unio<{}>", members.iter().map(print_type).collect::<Vec<_>>().join(", "))
        }
        TypeExpr::Nullable(inner) => format!("{}?", print_type(inner)),
        TypeExpr::Borrowed(prep, inner) => {
            let prep = match prep {
                BorrowPreposition::De => "de",
                BorrowPreposition::In => "in",
            };
            format!("{prep} {}", print_type(inner))
        }
    }
}

fn print_expr(expr: &Expr) -> String {
    match expr {
        Expr::Identifier(e) => e.name.clone(),
        Expr::Ego(_) => "ego".to_string(),
        Expr::Literal(e) => e.raw.clone(),
        Expr::Template(e) => {
            let parts = e
                .parts
                .iter()
                .map(|part| match part {
                    TemplatePart::Text(text) => text.clone(),
                    TemplatePart::Expr(expr) => format!("${{{}}}", print_expr(expr)),
                })
                .collect::<String>();
            format!("`{parts}`")
        }
        Expr::Array(e) => {
            format!("[{}]", e.elements.iter().map(print_expr).collect::<Vec<_>>().join(", "))
        }
        Expr::Object(e) => {
            let props = e
                .properties
                .iter()
                .map(|p| match p {
                    ObjectProperty::KeyValue { key, value } => format!("{key}: {}", print_expr(value)),
                    ObjectProperty::Spread(expr) => format!("sparge {}", print_expr(expr)),
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{ {props} }}")
        }
        Expr::Binary(e) => format!("{} {} {}", print_expr(&e.left), binary_op_str(e.op), print_expr(&e.right)),
        Expr::Unary(e) => format!("{}{}", unary_op_str(e.op), print_expr(&e.operand)),
        Expr::Call(e) => {
            let args = e.args.iter().map(print_expr).collect::<Vec<_>>().join(", ");
            let marker = if e.optional { "?(" } else { "(" };
            format!("{}{marker}{args})", print_expr(&e.callee))
        }
        Expr::Member(e) => {
            let dot = if e.non_null { "!." } else if e.optional { "?." } else { "." };
            match &e.property {
                MemberKey::Name(name) => format!("{}{dot}{name}", print_expr(&e.object)),
                MemberKey::Index(index) => format!("{}[{}]", print_expr(&e.object), print_expr(index)),
            }
        }
        Expr::Assignment(e) => format!("{} {} {}", print_expr(&e.target), assign_op_str(e.op), print_expr(&e.value)),
        Expr::Cede(e) => format!("cede {}", print_expr(&e.operand)),
        Expr::Conditional(e) => match e.form {
            ConditionalForm::Ternary => {
                format!("{} ? {} : {}", print_expr(&e.condition), print_expr(&e.then_branch), print_expr(&e.else_branch))
            }
            ConditionalForm::SicSecus => {
                format!(
                    "si {} ergo {} secus {}",
                    print_expr(&e.condition),
                    print_expr(&e.then_branch),
                    print_expr(&e.else_branch)
                )
            }
        },
        Expr::Qua(e) => format!("{} qua {}", print_expr(&e.operand), print_type(&e.target_type)),
        Expr::Est(e) => {
            let negation = if e.negated { "non " } else { "" };
            format!("{} {negation}est {}", print_expr(&e.operand), e.type_name)
        }
        Expr::Spread(e) => format!("sparge {}", print_expr(&e.operand)),
        other => format!("/* unprinted: {other:?} */"),
    }
}

fn binary_op_str(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Eq => "==",
        BinaryOp::NotEq => "!=",
        BinaryOp::StrictEq => "===",
        BinaryOp::StrictNotEq => "!==",
        BinaryOp::Lt => "<",
        BinaryOp::LtEq => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::GtEq => ">=",
        BinaryOp::BitOr => "|",
        BinaryOp::BitXor => "^",
        BinaryOp::BitAnd => "&",
        BinaryOp::Shl => "<<",
        BinaryOp::Shr => ">>",
        BinaryOp::And => "et",
        BinaryOp::Or => "aut",
        BinaryOp::Nullish => "vel",
    }
}

fn unary_op_str(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Not | UnaryOp::LogicalNot => "non ",
        UnaryOp::Neg => "-",
        UnaryOp::BitNot => "~",
        UnaryOp::IsEmpty => "nulla ",
        UnaryOp::IsNotEmpty => "nonnulla ",
        UnaryOp::IsNull => "nihil ",
        UnaryOp::IsNotNull => "nonnihil ",
        UnaryOp::Negativum => "negativum ",
        UnaryOp::Positivum => "positivum ",
    }
}

fn assign_op_str(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Assign => "=",
        AssignOp::AddAssign => "+=",
        AssignOp::SubAssign => "-=",
        AssignOp::MulAssign => "*=",
        AssignOp::DivAssign => "/=",
        AssignOp::ModAssign => "%=",
        AssignOp::AndAssign => "&=",
        AssignOp::OrAssign => "|=",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Meta;

    #[test]
    fn prints_a_varia_declaration_with_initializer() {
        let program = Program::new(vec![Stmt::Varia(VariaDecl {
            meta: Meta::default(),
            annotations: None,
            kind: VariaKind::Fixum,
            pattern: Pattern::Identifier("summa".into()),
            type_annotation: None,
            initializer: Some(Box::new(Expr::Literal(LiteralExpr {
                meta: Meta::default(),
                value: LiteralValue::Int(1),
                raw: "1".into(),
            }))),
        })]);
        assert_eq!(print(&program), "fixum summa = 1;\n");
    }

    #[test]
    fn prints_binary_expression_statement() {
        let program = Program::new(vec![Stmt::Expr(Box::new(Expr::Binary(BinaryExpr {
            meta: Meta::default(),
            op: BinaryOp::Add,
            left: Box::new(Expr::Identifier(IdentifierExpr { meta: Meta::default(), name: "a".into() })),
            right: Box::new(Expr::Identifier(IdentifierExpr { meta: Meta::default(), name: "b".into() })),
        })))]);
        assert_eq!(print(&program), "a + b;\n");
    }
}
