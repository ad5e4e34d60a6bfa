//! `$m.*` payload reference resolution.
//!
//! Any config value that is a string of the form `"$m." + name` is resolved
//! against an "origin" molecule before it's used in a comparison or copied
//! into a newly created molecule's payload. Non-string values, and strings
//! that don't match the `$m.` prefix, pass through unchanged.

use crate::model::{Molecule, PayloadValue};

const PREFIX: &str = "$m.";

/// Resolve a single config value against `origin`. Returns a clone of
/// `value` unchanged unless it is a `"$m.<name>"` string that resolves to
/// something.
pub fn resolve(value: &PayloadValue, origin: &Molecule) -> PayloadValue {
    let PayloadValue::String(s) = value else {
        return value.clone();
    };
    let Some(name) = s.strip_prefix(PREFIX) else {
        return value.clone();
    };
    resolve_field(name, origin).unwrap_or_else(|| value.clone())
}

/// Look up `name` against an origin molecule, in a fixed precedence order:
/// well-known scalar fields first (by every alias the wire format accepts),
/// then the payload.
pub fn resolve_field(name: &str, origin: &Molecule) -> Option<PayloadValue> {
    match name {
        "energy" => Some(PayloadValue::Number(origin.energy)),
        "stability" => Some(PayloadValue::Number(origin.stability)),
        "id" => Some(PayloadValue::String(origin.id.clone())),
        "species" => Some(PayloadValue::String(origin.species.clone())),
        "created_at" | "createdAt" | "CreatedAt" => {
            Some(PayloadValue::Number(origin.created_at as f64))
        }
        "last_touched_at" | "lastTouchedAt" | "LastTouchedAt" => {
            Some(PayloadValue::Number(origin.last_touched_at as f64))
        }
        _ => origin.payload.get(name).cloned(),
    }
}
