//! Generates each of the three targets from small verbum programs and
//! checks the canonical idiom lands where it should, the way
//! snow-codegen's inline tests assert on substrings of emitted LLVM IR
//! rather than diffing whole modules.

use verbum_codegen::{generate, Feature, Target};

fn gen(source: &str, target: Target) -> String {
    let (program, diagnostics) = verbum_parser::parse(source);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    let (code, _features) = generate(&program, target).expect("generation should succeed");
    code
}

#[test]
fn hello_world_emits_print_call_per_target() {
    let source = r#"incipit { scribe "hello" }"#;

    let structural = gen(source, Target::Structural);
    assert!(structural.contains("function main()"));
    assert!(structural.contains(r#"console.log("hello")"#));

    let dynamic = gen(source, Target::Dynamic);
    assert!(dynamic.contains("def main()"));
    assert!(dynamic.contains(r#"print("hello")"#));
    assert!(dynamic.contains("if __name__ == \"__main__\":"));

    let systems = gen(source, Target::Systems);
    assert!(systems.contains("fn main()"));
    assert!(systems.contains(r#"println!("hello")"#));
}

#[test]
fn fibonacci_recurses_with_ergo_form_si() {
    let source = "functio fib(numerus n) fit numerus { si n < 2 ergo redde n  redde fib(n-1) + fib(n-2) }";

    let systems = gen(source, Target::Systems);
    assert!(systems.contains("fn fib(n: i64) -> i64"));
    assert!(systems.contains("if ((n < 2))"));
    assert!(systems.contains("return n;"));
    assert!(systems.contains("return (fib((n - 1)) + fib((n - 2)));"));

    let dynamic = gen(source, Target::Dynamic);
    assert!(dynamic.contains("def fib(n: int) -> int"));
    assert!(dynamic.contains("if (n < 2)"));
}

#[test]
fn destructure_declaration_carries_rest_binding() {
    let source = "ex user fixum nomen ut n, ceteri rest";

    let structural = gen(source, Target::Structural);
    assert!(structural.contains("const { nomen: n, ...rest } = user;"));

    let systems = gen(source, Target::Systems);
    assert!(systems.contains("let { nomen: n, ...rest } = user;"));
}

#[test]
fn discerne_match_covers_each_variant_with_its_bindings() {
    let source = "discerne event { si Click pro x, y { scribe x } si Quit { } }";

    let systems = gen(source, Target::Systems);
    assert!(systems.contains("match event {"));
    assert!(systems.contains("Click(x, y) =>"));
    assert!(systems.contains("Quit =>"));

    let dynamic = gen(source, Target::Dynamic);
    assert!(dynamic.contains("if isinstance(event, Click)"));
    assert!(dynamic.contains("elif isinstance(event, Quit)"));
}

#[test]
fn varia_declaration_picks_mutability_keyword_per_target() {
    let mutable = gen("varia n = 1", Target::Structural);
    assert!(mutable.contains("let n = 1;"));

    let immutable = gen("fixum n = 1", Target::Structural);
    assert!(immutable.contains("const n = 1;"));

    let systems_mutable = gen("varia n = 1", Target::Systems);
    assert!(systems_mutable.contains("let mut n = 1;"));

    let systems_immutable = gen("fixum n = 1", Target::Systems);
    assert!(systems_immutable.contains("let n = 1;"));
}

#[test]
fn dum_loop_and_rumpe_perge_translate_per_target() {
    let source = "dum n < 10 { si n est numerus ergo perge  rumpe }";

    let structural = gen(source, Target::Structural);
    assert!(structural.contains("while ((n < 10)) {"));
    assert!(structural.contains("continue;"));
    assert!(structural.contains("break;"));

    let dynamic = gen(source, Target::Dynamic);
    assert!(dynamic.contains("while ((n < 10)):"));
    assert!(dynamic.contains("continue"));
    assert!(dynamic.contains("break"));
}

#[test]
fn aleatorium_intrinsic_marks_random_feature_per_target() {
    let source = "scribe aleatorium()";

    let (program, diagnostics) = verbum_parser::parse(source);
    assert!(diagnostics.is_empty());

    let (structural_code, structural_features) = generate(&program, Target::Structural).unwrap();
    assert!(structural_code.contains("Math.random()"));
    assert!(structural_features.contains(Feature::Random));

    let (systems_code, systems_features) = generate(&program, Target::Systems).unwrap();
    assert!(systems_code.contains("rand::random::<f64>()"));
    assert!(systems_features.contains(Feature::Random));
    assert!(systems_code.starts_with("use rand;"));
}

#[test]
fn si_sin_secus_chain_emits_else_if_ladder() {
    let source = "si a ergo redde 1 sin b ergo redde 2 secus redde 3";

    let structural = gen(source, Target::Structural);
    assert!(structural.contains("if (a) {"));
    assert!(structural.contains("else if (b) {"));
    assert!(structural.contains("else {"));

    let dynamic = gen(source, Target::Dynamic);
    assert!(dynamic.contains("if a:"));
    assert!(dynamic.contains("elif b:"));
    assert!(dynamic.contains("else:"));
}

#[test]
fn cura_block_scopes_a_resource_binding() {
    let source = "cura page fit p { scribe p }";

    let systems = gen(source, Target::Systems);
    assert!(systems.contains("let p ="));
    assert!(systems.contains("println!(p)"));

    let dynamic = gen(source, Target::Dynamic);
    assert!(dynamic.contains("with "));
    assert!(dynamic.contains(" as p:"));
}

#[test]
fn error_recovery_still_generates_the_surviving_statement() {
    let source = "fixum = 1\nscribe \"ok\"";
    let (program, diagnostics) = verbum_parser::parse(source);
    assert!(!diagnostics.is_empty(), "malformed declaration should produce a diagnostic");

    let code = generate(&program, Target::Structural).unwrap().0;
    assert!(code.contains(r#"console.log("ok");"#));
}
