//! Multi-target code generation (spec §4.3/§4.4).
//!
//! `generate` turns an already-parsed [`Program`] into source text for one
//! of three reference targets. Codegen never re-lexes or re-parses; it
//! consumes the AST structurally and assumes it is well-formed, tolerating
//! whatever optional fields a recovered parse left unset.

mod framework;
mod intrinsics;
mod targets;
mod type_map;

use std::fmt;
use std::str::FromStr;

pub use framework::FrameworkError;

use verbum_ast::Program;

/// The reference code-generation targets spec §2 describes generically
/// ("a statically-typed structural target, a dynamically-typed target, a
/// systems target"). Named concretely here since both the surface language
/// and its targets are synthetic for this exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Structural/duck-typed target: generics, `| null` unions, template
    /// literals.
    Structural,
    /// Dynamically typed target: indentation-significant blocks, f-strings.
    Dynamic,
    /// Systems target: static types, explicit ownership, `format!`-style
    /// interpolation.
    Systems,
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "structural" => Ok(Target::Structural),
            "dynamic" => Ok(Target::Dynamic),
            "systems" => Ok(Target::Systems),
            other => Err(format!("unknown target '{other}' (expected structural, dynamic, or systems)")),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Target::Structural => "structural",
            Target::Dynamic => "dynamic",
            Target::Systems => "systems",
        };
        f.write_str(s)
    }
}

/// A stdlib import/prelude a compilation unit needs, discovered
/// incrementally during emission (spec §4.3 "Feature tracking").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Random,
    Decimal,
    Uuid,
    Secrets,
}

/// The set of features an emission required, in a stable order so preamble
/// output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    features: rustc_hash::FxHashSet<Feature>,
}

impl FeatureSet {
    pub fn mark(&mut self, feature: Feature) {
        self.features.insert(feature);
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features in a stable, deterministic order (not hash-map iteration
    /// order), so the preamble a caller gets is reproducible.
    pub fn sorted(&self) -> Vec<Feature> {
        let mut out: Vec<Feature> = self.features.iter().copied().collect();
        out.sort();
        out
    }
}

/// Generates `target`'s source text for `program`, returning it alongside
/// the stdlib features the emission needed. The only failure mode is a
/// fatal "this AST node has no translation on this target" (spec §7).
pub fn generate(program: &Program, target: Target) -> Result<(String, FeatureSet), FrameworkError> {
    let mut fw = framework::Framework::new(target);
    fw.gen_program(program)?;
    Ok(fw.finish())
}
