//! Canonical Latin type names to per-target equivalents (spec §4.3 "Type
//! mapping").

use verbum_ast::{BorrowPreposition, TypeExpr};

use crate::Target;

/// Maps one of the fixed canonical primitive/builtin names. A name not in
/// this table is a user-defined `genus`/`pactum`/`discretio`/`ordo` and
/// passes through unchanged.
fn map_named(target: Target, name: &str) -> String {
    let mapped = match (target, name) {
        (Target::Structural, "textus") => "string",
        (Target::Structural, "numerus") => "number",
        (Target::Structural, "fractus") => "number",
        (Target::Structural, "decimus") => "Decimal",
        (Target::Structural, "magnus") => "bigint",
        (Target::Structural, "bivalens") => "boolean",
        (Target::Structural, "nihil") => "null",
        (Target::Structural, "vacuum") => "void",
        (Target::Structural, "numquam") => "never",
        (Target::Structural, "octeti") => "Uint8Array",
        (Target::Structural, "objectum") => "object",
        (Target::Structural, "lista") => "Array",
        (Target::Structural, "tabula") => "Map",
        (Target::Structural, "copia") => "Set",
        (Target::Structural, "promissum") => "Promise",
        (Target::Structural, "erratum") => "Error",
        (Target::Structural, "cursor") => "Generator",
        (Target::Structural, "ignotum") => "unknown",

        (Target::Dynamic, "textus") => "str",
        (Target::Dynamic, "numerus") => "int",
        (Target::Dynamic, "fractus") => "float",
        (Target::Dynamic, "decimus") => "Decimal",
        (Target::Dynamic, "magnus") => "int",
        (Target::Dynamic, "bivalens") => "bool",
        (Target::Dynamic, "nihil") => "None",
        (Target::Dynamic, "vacuum") => "None",
        (Target::Dynamic, "numquam") => "NoReturn",
        (Target::Dynamic, "octeti") => "bytes",
        (Target::Dynamic, "objectum") => "dict",
        (Target::Dynamic, "lista") => "list",
        (Target::Dynamic, "tabula") => "dict",
        (Target::Dynamic, "copia") => "set",
        (Target::Dynamic, "promissum") => "Awaitable",
        (Target::Dynamic, "erratum") => "Exception",
        (Target::Dynamic, "cursor") => "Iterator",
        (Target::Dynamic, "ignotum") => "Any",

        (Target::Systems, "textus") => "String",
        (Target::Systems, "numerus") => "i64",
        (Target::Systems, "fractus") => "f64",
        (Target::Systems, "decimus") => "Decimal",
        (Target::Systems, "magnus") => "i128",
        (Target::Systems, "bivalens") => "bool",
        (Target::Systems, "nihil") => "()",
        (Target::Systems, "vacuum") => "()",
        (Target::Systems, "numquam") => "!",
        (Target::Systems, "octeti") => "Vec<u8>",
        (Target::Systems, "objectum") => "Value",
        (Target::Systems, "lista") => "Vec",
        (Target::Systems, "tabula") => "HashMap",
        (Target::Systems, "copia") => "HashSet",
        (Target::Systems, "promissum") => "BoxFuture",
        (Target::Systems, "erratum") => "Box<dyn Error>",
        (Target::Systems, "cursor") => "Box<dyn Iterator>",
        (Target::Systems, "ignotum") => "Box<dyn Any>",

        _ => return name.to_string(),
    };
    mapped.to_string()
}

/// Generics map `typeParameters` positionally onto the target's own
/// generic-instantiation syntax.
fn with_type_args(base: &str, args: &[String]) -> String {
    if args.is_empty() {
        base.to_string()
    } else {
        format!("{base}<{}>", args.join(", "))
    }
}

/// Translates a parsed type annotation into `target`'s idiom, honoring the
/// array shorthand flag, union operator, nullability, and borrow
/// prepositions each target spells differently.
pub(crate) fn map_type(target: Target, ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Named(named) => {
            let base = map_named(target, &named.name);
            let args: Vec<String> = named.type_args.iter().map(|a| map_type(target, a)).collect();
            with_type_args(&base, &args)
        }
        TypeExpr::Array(elem, shorthand) => {
            let inner = map_type(target, elem);
            match target {
                Target::Structural if *shorthand => format!("{inner}[]"),
                Target::Structural => format!("Array<{inner}>"),
                Target::Dynamic => format!("list[{inner}]"),
                Target::Systems => format!("Vec<{inner}>"),
            }
        }
        TypeExpr::Union(members) => {
            let parts: Vec<String> = members.iter().map(|m| map_type(target, m)).collect();
            match target {
                Target::Structural => parts.join(" | "),
                Target::Dynamic => format!("Union[{}]", parts.join(", ")),
                // Systems has no native union; emit a generated-looking marker enum name.
                Target::Systems => format!("Either<{}>", parts.join(", ")),
            }
        }
        TypeExpr::Nullable(inner) => {
            let mapped = map_type(target, inner);
            match target {
                Target::Structural => format!("{mapped} | null"),
                Target::Dynamic => format!("Optional[{mapped}]"),
                Target::Systems => format!("Option<{mapped}>"),
            }
        }
        TypeExpr::Borrowed(prep, inner) => {
            let mapped = map_type(target, inner);
            match (target, prep) {
                (Target::Systems, BorrowPreposition::De) => format!("&{mapped}"),
                (Target::Systems, BorrowPreposition::In) => format!("&mut {mapped}"),
                // Structural/dynamic targets have no borrow checker; the
                // preposition carries no runtime meaning there.
                _ => mapped,
            }
        }
    }
}
