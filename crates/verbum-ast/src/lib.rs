//! The AST node model for the verbum surface language: a closed,
//! position-tracked tree with no cross-references between nodes (spec §3).

pub mod common;
pub mod expr;
pub mod printer;
pub mod stmt;

pub use common::{
    Annotation, ArrayPattern, ArrayPatternElement, BorrowPreposition, Comment, Meta, NamedType,
    ObjectPattern, ObjectPatternProperty, Pattern, Specifier, TypeExpr,
};
pub use expr::*;
pub use stmt::*;

/// The root node: an ordered sequence of top-level statements. A verbum
/// source file desugars to exactly one of these.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_program_has_no_statements() {
        let program = Program::default();
        assert!(program.statements.is_empty());
    }

    #[test]
    fn varia_kind_distinguishes_mutability_and_async() {
        assert!(VariaKind::Varia.is_mutable());
        assert!(!VariaKind::Fixum.is_mutable());
        assert!(VariaKind::Figendum.is_async());
        assert!(!VariaKind::Varia.is_async());
    }

    #[test]
    fn return_verb_implies_async_and_generator_correctly() {
        assert!(!ReturnVerb::Fit.implies_async());
        assert!(!ReturnVerb::Fit.implies_generator());
        assert!(ReturnVerb::Fiet.implies_async());
        assert!(!ReturnVerb::Fiet.implies_generator());
        assert!(!ReturnVerb::Fiunt.implies_async());
        assert!(ReturnVerb::Fiunt.implies_generator());
        assert!(ReturnVerb::Fient.implies_async());
        assert!(ReturnVerb::Fient.implies_generator());
    }

    #[test]
    fn stmt_is_declaration_only_for_declaration_kinds() {
        let functio = Stmt::Functio(FunctioDecl {
            meta: Meta::default(),
            annotations: None,
            name: "exemplum".into(),
            type_params: Vec::new(),
            params: Vec::new(),
            return_verb: None,
            return_type: None,
            is_async: false,
            is_generator: false,
            is_constructor: false,
            body: Block::default(),
        });
        assert!(functio.is_declaration());

        let rumpe = Stmt::Rumpe(Meta::default());
        assert!(!rumpe.is_declaration());
    }

    #[test]
    fn discretio_variant_is_unit_when_fieldless() {
        let unit = DiscretioVariant { name: "Nullum".into(), fields: Vec::new() };
        assert!(unit.is_unit());

        let payload = DiscretioVariant {
            name: "Aliquid".into(),
            fields: vec![GenusField { name: "valor".into(), type_annotation: None, default: None }],
        };
        assert!(!payload.is_unit());
    }
}
