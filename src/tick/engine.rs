//! Phase B: the lock-free per-tick compute pass. A pure function of a
//! molecule snapshot, a schema, and a PRNG draw source — no locks, no I/O.
//! Kept free of `Environment` so it can be unit tested without an async
//! runtime.

use super::rng::TickRng;
use crate::evaluator::{Reaction, ReactionEffect};
use crate::matching::TickIndex;
use crate::model::Molecule;
use crate::notify::NotificationEvent;
use crate::schema_builder::Schema;
use std::collections::{HashMap, HashSet};

pub struct PhaseBOutput {
    pub consumed: HashSet<String>,
    pub changes: HashMap<String, Molecule>,
    pub new_molecules: Vec<Molecule>,
    pub events: Vec<(NotificationEvent, Option<Vec<String>>)>,
}

/// Runs every reaction in schema order against every not-yet-consumed
/// molecule in `molecules`, merging effects as it goes. A molecule consumed
/// by one reaction is not offered to subsequent reactions in the same tick.
pub fn run_phase_b(
    environment_id: &str,
    molecules: &[Molecule],
    schema: &Schema,
    rng: &TickRng,
    tick: i64,
    fired_at_unix_ms: i64,
) -> PhaseBOutput {
    let index = TickIndex::build(molecules);
    let mut consumed: HashSet<String> = HashSet::new();
    let mut changes: HashMap<String, Molecule> = HashMap::new();
    let mut new_molecules: Vec<Molecule> = Vec::new();
    let mut events = Vec::new();

    for m in molecules {
        if consumed.contains(&m.id) {
            continue;
        }

        for reaction in &schema.reactions {
            if consumed.contains(&m.id) {
                break;
            }
            if !reaction.input_pattern(m) {
                continue;
            }

            let rate = reaction.effective_rate(m, &index);
            if rng.draw() > rate {
                continue;
            }

            let effect = reaction.apply(m, &index, tick);
            if effect.is_empty() {
                continue;
            }

            for id in &effect.consumed {
                consumed.insert(id.clone());
            }
            for (id, updated) in &effect.changes {
                changes.insert(id.clone(), updated.clone());
            }
            new_molecules.extend(effect.new_molecules.iter().cloned());

            let event = build_event(environment_id, reaction.as_ref(), m, &effect, &index, tick, fired_at_unix_ms);
            let notifier_ids = reaction
                .notify_config()
                .map(|cfg| cfg.notifier_ids.clone())
                .filter(|ids| !ids.is_empty());
            events.push((event, notifier_ids));
        }
    }

    PhaseBOutput {
        consumed,
        changes,
        new_molecules,
        events,
    }
}

fn build_event(
    environment_id: &str,
    reaction: &dyn Reaction,
    m: &Molecule,
    effect: &ReactionEffect,
    index: &TickIndex<'_>,
    tick: i64,
    fired_at_unix_ms: i64,
) -> NotificationEvent {
    let consumed_molecules = effect
        .consumed
        .iter()
        .filter_map(|id| index.get(id).cloned())
        .collect();
    let updated_molecules = effect.changes.values().cloned().collect();

    NotificationEvent {
        environment_id: environment_id.to_string(),
        reaction_id: reaction.id().to_string(),
        reaction_name: reaction.name().to_string(),
        tick,
        fired_at_unix_ms,
        input_molecule: m.clone(),
        partners: effect.partners.clone(),
        consumed_molecules,
        updated_molecules,
        created_molecules: effect.new_molecules.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::ConfigReaction;
    use crate::model::{EffectNode, InputPatternConfig, ReactionConfig, WhereConfig};
    use std::sync::Arc;

    fn consume_reaction(species: &str, rate: f64) -> Arc<dyn Reaction> {
        Arc::new(ConfigReaction::new(ReactionConfig {
            id: "r1".into(),
            name: "consume".into(),
            input: InputPatternConfig {
                species: species.into(),
                where_clause: WhereConfig::new(),
                partners: Vec::new(),
            },
            rate,
            catalysts: Vec::new(),
            effects: vec![EffectNode {
                consume: Some(true),
                ..Default::default()
            }],
            notify: None,
        }))
    }

    fn molecule(id: &str, species: &str) -> Molecule {
        Molecule {
            id: id.into(),
            species: species.into(),
            payload: Default::default(),
            energy: 1.0,
            stability: 1.0,
            tags: None,
            created_at: 0,
            last_touched_at: 0,
        }
    }

    /// `rate <= 0` on the reaction itself falls back to 1.0 — the wire
    /// schema can't distinguish an omitted `rate` from an explicit `0`. The
    /// only way to drive the *effective* rate to exactly zero is a matching
    /// catalyst whose `max_rate` caps it there; that's what this test
    /// exercises.
    #[test]
    fn catalyst_capped_zero_rate_reaction_never_fires_across_many_ticks() {
        let schema = Schema {
            name: "s".into(),
            species: Default::default(),
            reactions: vec![Arc::new(ConfigReaction::new(ReactionConfig {
                id: "r1".into(),
                name: "consume".into(),
                input: InputPatternConfig {
                    species: "A".into(),
                    where_clause: WhereConfig::new(),
                    partners: Vec::new(),
                },
                rate: 1.0,
                catalysts: vec![crate::model::CatalystConfig {
                    species: "Cat".into(),
                    where_clause: WhereConfig::new(),
                    rate_boost: Some(0.0),
                    max_rate: Some(0.0),
                }],
                effects: vec![EffectNode {
                    consume: Some(true),
                    ..Default::default()
                }],
                notify: None,
            }))],
        };
        let rng = TickRng::seeded(1);
        for tick in 0..500 {
            let molecules = vec![molecule("a", "A"), molecule("c", "Cat")];
            let output = run_phase_b("env", &molecules, &schema, &rng, tick, 0);
            assert!(output.consumed.is_empty(), "fired at tick {tick}");
        }
    }

    #[test]
    fn rate_one_reaction_always_fires_and_consumes() {
        let schema = Schema {
            name: "s".into(),
            species: Default::default(),
            reactions: vec![consume_reaction("A", 1.0)],
        };
        let rng = TickRng::seeded(2);
        let molecules = vec![molecule("a", "A")];
        let output = run_phase_b("env", &molecules, &schema, &rng, 1, 0);
        assert!(output.consumed.contains("a"));
        assert_eq!(output.events.len(), 1);
    }

    #[test]
    fn consumed_molecule_is_not_offered_to_later_reactions_in_the_same_tick() {
        let schema = Schema {
            name: "s".into(),
            species: Default::default(),
            reactions: vec![consume_reaction("A", 1.0), consume_reaction("A", 1.0)],
        };
        let rng = TickRng::seeded(3);
        let molecules = vec![molecule("a", "A")];
        let output = run_phase_b("env", &molecules, &schema, &rng, 1, 0);
        assert_eq!(output.events.len(), 1);
    }
}
