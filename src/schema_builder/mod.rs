//! Builds validated, installable schemas from the JSON reaction DSL.

mod validate;

pub use validate::validate_schema_config;

use crate::errors::CoreResult;
use crate::evaluator::{ConfigReaction, Reaction};
use crate::model::{SchemaConfig, Species};
use std::collections::HashMap;
use std::sync::Arc;

/// A validated, installable schema: species declarations plus the ordered
/// reaction list, each reaction already wrapped behind the polymorphic
/// `Reaction` capability.
pub struct Schema {
    pub name: String,
    pub species: HashMap<String, Species>,
    pub reactions: Vec<Arc<dyn Reaction>>,
}

impl Schema {
    pub fn species_declared(&self, name: &str) -> bool {
        self.species.contains_key(name)
    }
}

/// Runs `validate_schema_config` first; only on success does it construct
/// the runtime `Schema` — a schema is never partially built from invalid
/// config.
pub fn build_schema_from_config(cfg: SchemaConfig) -> CoreResult<Schema> {
    validate_schema_config(&cfg)?;

    let species = cfg
        .species
        .into_iter()
        .map(|s| (s.name.clone(), s))
        .collect();

    let reactions = cfg
        .reactions
        .into_iter()
        .map(|r| Arc::new(ConfigReaction::new(r)) as Arc<dyn Reaction>)
        .collect();

    Ok(Schema {
        name: cfg.name,
        species,
        reactions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InputPatternConfig, ReactionConfig, WhereConfig};

    #[test]
    fn builds_schema_from_valid_config() {
        let cfg = SchemaConfig {
            name: "s1".into(),
            species: vec![Species::new("A"), Species::new("B")],
            reactions: vec![ReactionConfig {
                id: "r1".into(),
                name: "consume A".into(),
                input: InputPatternConfig {
                    species: "A".into(),
                    where_clause: WhereConfig::new(),
                    partners: Vec::new(),
                },
                rate: 1.0,
                catalysts: Vec::new(),
                effects: Vec::new(),
                notify: None,
            }],
        };
        let schema = build_schema_from_config(cfg).unwrap();
        assert_eq!(schema.name, "s1");
        assert_eq!(schema.reactions.len(), 1);
        assert!(schema.species_declared("A"));
        assert!(!schema.species_declared("Z"));
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = SchemaConfig {
            name: String::new(),
            species: Vec::new(),
            reactions: Vec::new(),
        };
        assert!(build_schema_from_config(cfg).is_err());
    }
}
