//! `ValidateSchemaConfig` — structural checks over the raw DSL config.
//!
//! Collects every issue instead of short-circuiting on the first one, and
//! returns them as a single aggregate `CoreError::ValidationError`.

use crate::errors::CoreError;
use crate::model::{EffectNode, SchemaConfig};
use std::collections::HashSet;

pub fn validate_schema_config(cfg: &SchemaConfig) -> Result<(), CoreError> {
    let mut issues = Vec::new();

    if cfg.name.trim().is_empty() {
        issues.push("schema name must not be empty".to_string());
    }

    let mut species_names = HashSet::new();
    for species in &cfg.species {
        if species.name.trim().is_empty() {
            issues.push("species name must not be empty".to_string());
            continue;
        }
        if !species_names.insert(species.name.as_str()) {
            issues.push(format!("duplicate species name: {}", species.name));
        }
    }

    let mut reaction_ids = HashSet::new();
    for reaction in &cfg.reactions {
        if reaction.id.trim().is_empty() {
            issues.push("reaction id must not be empty".to_string());
        } else if !reaction_ids.insert(reaction.id.as_str()) {
            issues.push(format!("duplicate reaction id: {}", reaction.id));
        }

        if !species_names.contains(reaction.input.species.as_str()) {
            issues.push(format!(
                "reaction {}: input species {} is not declared",
                reaction.id, reaction.input.species
            ));
        }

        for partner in &reaction.input.partners {
            if !species_names.contains(partner.species.as_str()) {
                issues.push(format!(
                    "reaction {}: partner species {} is not declared",
                    reaction.id, partner.species
                ));
            }
        }

        for catalyst in &reaction.catalysts {
            if !species_names.contains(catalyst.species.as_str()) {
                issues.push(format!(
                    "reaction {}: catalyst species {} is not declared",
                    reaction.id, catalyst.species
                ));
            }
        }

        for effect in &reaction.effects {
            validate_effect_node(effect, &reaction.id, &species_names, &mut issues);
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(CoreError::ValidationError(issues))
    }
}

fn validate_effect_node(
    node: &EffectNode,
    reaction_id: &str,
    species_names: &HashSet<&str>,
    issues: &mut Vec<String>,
) {
    if let Some(create) = &node.create {
        if !species_names.contains(create.species.as_str()) {
            issues.push(format!(
                "reaction {reaction_id}: create species {} is not declared",
                create.species
            ));
        }
    }

    if let Some(cond) = &node.if_cond {
        let has_field = cond.field.is_some();
        let has_count = cond.count_molecules.is_some();
        match (has_field, has_count) {
            (true, true) => issues.push(format!(
                "reaction {reaction_id}: conditional effect mixes field and count_molecules"
            )),
            (false, false) => issues.push(format!(
                "reaction {reaction_id}: conditional effect has neither field nor count_molecules"
            )),
            _ => {}
        }

        if let Some(count_cfg) = &cond.count_molecules {
            if !species_names.contains(count_cfg.species.as_str()) {
                issues.push(format!(
                    "reaction {reaction_id}: count_molecules species {} is not declared",
                    count_cfg.species
                ));
            }
            if cond.op.single().is_none() {
                issues.push(format!(
                    "reaction {reaction_id}: count_molecules.op must have exactly one operator"
                ));
            }
        }
    }

    for child in node.then.iter().chain(node.else_branch.iter()) {
        validate_effect_node(child, reaction_id, species_names, issues);
    }
}
