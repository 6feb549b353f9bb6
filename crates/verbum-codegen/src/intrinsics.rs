//! Per-target standard-library call shapes for surface-level intrinsics
//! that aren't a direct syntax translation (spec §2 "stdlib call
//! registries", illustrated there by random-number dispatch).
//!
//! The surface language exposes these as ordinary calls to a handful of
//! reserved lowercase names; `dispatch` recognizes them before falling
//! back to a plain call emission.

use crate::{Feature, FeatureSet, Target};

/// A call-position name the framework special-cases instead of emitting
/// as a literal function call.
pub(crate) enum Intrinsic {
    /// `aleatorium()` -- a random float in `[0, 1)`.
    Aleatorium,
    /// `identitas()` -- a fresh random unique identifier.
    Identitas,
    /// `secretum(n)` -- `n` cryptographically random bytes, hex-encoded.
    Secretum,
}

pub(crate) fn recognize(name: &str) -> Option<Intrinsic> {
    match name {
        "aleatorium" => Some(Intrinsic::Aleatorium),
        "identitas" => Some(Intrinsic::Identitas),
        "secretum" => Some(Intrinsic::Secretum),
        _ => None,
    }
}

/// Emits the target call for `intrinsic`, flipping the feature flag its
/// preamble will need. `args` are the already-emitted argument expressions.
pub(crate) fn emit(target: Target, intrinsic: &Intrinsic, args: &[String], features: &mut FeatureSet) -> String {
    match intrinsic {
        Intrinsic::Aleatorium => {
            features.mark(Feature::Random);
            match target {
                Target::Structural => "Math.random()".to_string(),
                Target::Dynamic => "random.random()".to_string(),
                Target::Systems => "rand::random::<f64>()".to_string(),
            }
        }
        Intrinsic::Identitas => {
            features.mark(Feature::Uuid);
            match target {
                Target::Structural => "crypto.randomUUID()".to_string(),
                Target::Dynamic => "str(uuid.uuid4())".to_string(),
                Target::Systems => "Uuid::new_v4().to_string()".to_string(),
            }
        }
        Intrinsic::Secretum => {
            features.mark(Feature::Secrets);
            let n = args.first().cloned().unwrap_or_else(|| "32".to_string());
            match target {
                Target::Structural => format!("crypto.randomBytes({n}).toString('hex')"),
                Target::Dynamic => format!("secrets.token_hex({n})"),
                Target::Systems => format!("hex::encode(rand::random::<[u8; {n}]>())"),
            }
        }
    }
}

/// The import/prelude line a feature needs on this target, for the
/// preamble assembled once per compilation unit (spec §4.3).
pub(crate) fn preamble_line(target: Target, feature: Feature) -> String {
    match (target, feature) {
        (Target::Structural, Feature::Random) => String::new(),
        (Target::Structural, Feature::Uuid) => "import { randomUUID as _unused } from 'node:crypto';".to_string(),
        (Target::Structural, Feature::Secrets) => "import crypto from 'node:crypto';".to_string(),
        (Target::Structural, Feature::Decimal) => "import Decimal from 'decimal.js';".to_string(),

        (Target::Dynamic, Feature::Random) => "import random".to_string(),
        (Target::Dynamic, Feature::Uuid) => "import uuid".to_string(),
        (Target::Dynamic, Feature::Secrets) => "import secrets".to_string(),
        (Target::Dynamic, Feature::Decimal) => "from decimal import Decimal".to_string(),

        (Target::Systems, Feature::Random) => "use rand;".to_string(),
        (Target::Systems, Feature::Uuid) => "use uuid::Uuid;".to_string(),
        (Target::Systems, Feature::Secrets) => "use hex;".to_string(),
        (Target::Systems, Feature::Decimal) => "use rust_decimal::Decimal;".to_string(),
    }
}

/// `scriptum "fmt §" args...` -- substitutes each `§` with the target's
/// positional/named placeholder and wraps it in the target's formatting
/// call shape.
pub(crate) fn scriptum_call(target: Target, format: &str, args: &[String]) -> String {
    match target {
        Target::Structural => {
            let mut out = String::from("`");
            let mut arg_iter = args.iter();
            for ch in format.chars() {
                if ch == '§' {
                    if let Some(a) = arg_iter.next() {
                        out.push_str("${");
                        out.push_str(a);
                        out.push('}');
                        continue;
                    }
                }
                out.push(ch);
            }
            out.push('`');
            out
        }
        Target::Dynamic => {
            let mut out = String::from("f\"");
            let mut arg_iter = args.iter();
            for ch in format.chars() {
                if ch == '§' {
                    if let Some(a) = arg_iter.next() {
                        out.push('{');
                        out.push_str(a);
                        out.push('}');
                        continue;
                    }
                }
                out.push(ch);
            }
            out.push('"');
            out
        }
        Target::Systems => {
            let rust_fmt: String = format.chars().map(|c| if c == '§' { '\u{1}' } else { c }).collect();
            let rust_fmt = rust_fmt.replace('\u{1}', "{}");
            if args.is_empty() {
                format!("format!(\"{rust_fmt}\")")
            } else {
                format!("format!(\"{rust_fmt}\", {})", args.join(", "))
            }
        }
    }
}

/// `lege [prompt]` -- reads one line from stdin.
pub(crate) fn lege_call(target: Target, prompt: Option<&str>) -> String {
    match target {
        Target::Structural => match prompt {
            Some(p) => format!("await readLine({p})"),
            None => "await readLine()".to_string(),
        },
        Target::Dynamic => match prompt {
            Some(p) => format!("input({p})"),
            None => "input()".to_string(),
        },
        Target::Systems => {
            let prefix = match prompt {
                Some(p) => format!("print!(\"{{}}\", {p}); "),
                None => String::new(),
            };
            format!("{{ {prefix}let mut _line = String::new(); std::io::stdin().read_line(&mut _line).unwrap(); _line.trim().to_string() }}")
        }
    }
}
