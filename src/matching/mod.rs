//! Reference resolution, equality/comparison, and the per-tick index that
//! gives the reaction evaluator bounded-cost candidate lookup.

mod compare;
mod index;
mod resolve;

pub use compare::{compare, equals};
pub use index::TickIndex;
pub use resolve::{resolve, resolve_field};

use crate::model::{Molecule, WhereConfig};

/// A candidate matches a `where` clause when, for every entry, the
/// candidate's payload carries the field and its value equals the
/// reference-resolved target (resolved against `origin`).
pub fn matches_where(candidate: &Molecule, where_clause: &WhereConfig, origin: &Molecule) -> bool {
    where_clause.iter().all(|(field, predicate)| {
        let Some(candidate_value) = candidate.payload.get(field) else {
            return false;
        };
        predicate.entries().iter().all(|(op, target)| {
            let resolved = resolve(target, origin);
            compare::compare(*op, candidate_value, &resolved)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Predicate, Species};
    use std::collections::HashMap;

    fn molecule(id: &str, ip: &str) -> Molecule {
        let mut payload = HashMap::new();
        payload.insert("ip".to_string(), crate::model::PayloadValue::from_str(ip));
        Molecule {
            id: id.into(),
            species: "Suspicion".into(),
            payload,
            energy: 1.0,
            stability: 1.0,
            tags: None,
            created_at: 0,
            last_touched_at: 0,
        }
    }

    #[test]
    fn empty_where_matches_everything() {
        let m = molecule("a", "1.2.3.4");
        assert!(matches_where(&m, &WhereConfig::new(), &m));
    }

    #[test]
    fn where_with_reference_to_origin() {
        let a = molecule("a", "1.2.3.4");
        let b = molecule("b", "1.2.3.4");
        let mut where_clause = WhereConfig::new();
        where_clause.insert(
            "ip".to_string(),
            Predicate {
                eq: Some(crate::model::PayloadValue::from_str("$m.ip")),
                ..Default::default()
            },
        );
        assert!(matches_where(&b, &where_clause, &a));

        let c = molecule("c", "9.9.9.9");
        assert!(!matches_where(&c, &where_clause, &a));
    }

    #[test]
    fn missing_field_never_matches() {
        let a = molecule("a", "1.2.3.4");
        let mut where_clause = WhereConfig::new();
        where_clause.insert(
            "missing".to_string(),
            Predicate {
                eq: Some(crate::model::PayloadValue::Number(1.0)),
                ..Default::default()
            },
        );
        assert!(!matches_where(&a, &where_clause, &a));
        let _ = Species::new("Suspicion");
    }
}
