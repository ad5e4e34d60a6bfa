//! The reaction evaluator: rate, catalyst boost, partner discovery,
//! conditional effects, and effect accumulation.
//!
//! The `Reaction` trait is the polymorphism seam: today there is a single
//! concrete implementation (`ConfigReaction`, built from the DSL), but the
//! tick engine only ever talks to `dyn Reaction`, leaving room for a
//! code-native variant that never goes through JSON at all.

mod effect;

pub use effect::ReactionEffect;

use crate::matching::{compare, matches_where, resolve, TickIndex};
use crate::model::{
    ConditionConfig, CountMoleculesConfig, CreateConfig, EffectNode, InputPatternConfig,
    Molecule, NotifyConfig, Payload, PayloadValue, ReactionConfig, UpdateConfig,
};

/// Capability set every reaction — config-driven or code-native — must
/// provide. The tick engine drives ticks purely through this trait.
pub trait Reaction: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn rate(&self) -> f64;

    /// Pure function of `(m, index)` — must never mutate the environment
    /// or draw from the PRNG. Catalyst boosts and `max_rate` caps are
    /// applied here.
    fn effective_rate(&self, m: &Molecule, index: &TickIndex<'_>) -> f64;

    /// Species equality plus `where`, evaluated with `m` as its own origin.
    fn input_pattern(&self, m: &Molecule) -> bool;

    /// Partner discovery, then effect application, entirely side-effect
    /// free: the returned `ReactionEffect` is only ever merged by the tick
    /// engine's Phase B accumulator.
    fn apply(&self, m: &Molecule, index: &TickIndex<'_>, tick: i64) -> ReactionEffect;

    fn notify_config(&self) -> Option<&NotifyConfig>;
}

/// A reaction built from the JSON reaction DSL.
pub struct ConfigReaction {
    config: ReactionConfig,
}

impl ConfigReaction {
    pub fn new(config: ReactionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReactionConfig {
        &self.config
    }
}

impl Reaction for ConfigReaction {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    fn rate(&self) -> f64 {
        self.config.rate
    }

    fn effective_rate(&self, m: &Molecule, index: &TickIndex<'_>) -> f64 {
        effective_rate(&self.config, m, index)
    }

    fn input_pattern(&self, m: &Molecule) -> bool {
        input_pattern(&self.config.input, m)
    }

    fn apply(&self, m: &Molecule, index: &TickIndex<'_>, tick: i64) -> ReactionEffect {
        apply(&self.config, m, index, tick)
    }

    fn notify_config(&self) -> Option<&NotifyConfig> {
        self.config.notify.as_ref()
    }
}

/// Species equality plus `where`, matched against the molecule as its own
/// origin.
pub fn input_pattern(pattern: &InputPatternConfig, m: &Molecule) -> bool {
    m.species == pattern.species && matches_where(m, &pattern.where_clause, m)
}

/// Base rate (falling back to 1.0 when `rate <= 0`), boosted by every
/// matching catalyst and capped by the running minimum of declared
/// `max_rate`s, finally clamped to `[0, 1]`.
pub fn effective_rate(cfg: &ReactionConfig, m: &Molecule, index: &TickIndex<'_>) -> f64 {
    let mut rate = if cfg.rate <= 0.0 { 1.0 } else { cfg.rate };
    let mut cap = f64::INFINITY;

    for catalyst in &cfg.catalysts {
        // Unlike partners, the firing molecule itself is an eligible catalyst.
        let matched = !index
            .find(&catalyst.species, &catalyst.where_clause, m)
            .is_empty();
        if matched {
            rate += catalyst.rate_boost.unwrap_or(0.1);
            if let Some(max_rate) = catalyst.max_rate {
                cap = cap.min(max_rate);
            }
        }
    }

    rate.min(cap).clamp(0.0, 1.0)
}

/// Partner discovery. Returns `None` when any partner spec comes up short,
/// signalling the caller to fail the reaction with an empty effect.
pub fn discover_partners<'a>(
    pattern: &InputPatternConfig,
    m: &Molecule,
    index: &TickIndex<'a>,
) -> Option<Vec<&'a Molecule>> {
    let mut partners = Vec::new();

    for spec in &pattern.partners {
        let required = spec.count.unwrap_or(1).max(1);
        let mut candidates: Vec<&Molecule> = index
            .find(&spec.species, &spec.where_clause, m)
            .into_iter()
            .filter(|candidate| candidate.id != m.id)
            .collect();

        if candidates.len() < required {
            return None;
        }
        candidates.truncate(required);
        partners.append(&mut candidates);
    }

    Some(partners)
}

/// Full effect application for a single firing: partner discovery followed
/// by document-order effect evaluation. Total: never errors, never touches
/// the environment.
pub fn apply(cfg: &ReactionConfig, m: &Molecule, index: &TickIndex<'_>, tick: i64) -> ReactionEffect {
    let mut out = ReactionEffect::default();

    let Some(partners) = discover_partners(&cfg.input, m, index) else {
        return out;
    };
    out.partners = partners.into_iter().cloned().collect();

    for node in &cfg.effects {
        apply_effect_node(node, m, index, tick, &mut out);
    }

    out
}

fn apply_effect_node(
    node: &EffectNode,
    m: &Molecule,
    index: &TickIndex<'_>,
    tick: i64,
    out: &mut ReactionEffect,
) {
    if let Some(cond) = &node.if_cond {
        let branch = if evaluate_condition(cond, m, index) {
            &node.then
        } else {
            &node.else_branch
        };
        for child in branch {
            apply_effect_node(child, m, index, tick, out);
        }
        return;
    }

    if node.consume == Some(true) {
        out.consumed.insert(m.id.clone());
    }
    if let Some(update) = &node.update {
        apply_update(out, m, update, tick);
    }
    if let Some(create) = &node.create {
        apply_create(out, m, create, tick);
    }
}

fn apply_update(out: &mut ReactionEffect, m: &Molecule, cfg: &UpdateConfig, tick: i64) {
    let pending = out.changes.entry(m.id.clone()).or_insert_with(|| m.clone());
    if let Some(add) = cfg.energy_add {
        pending.energy += add;
    }
    pending.last_touched_at = tick;
}

fn apply_create(out: &mut ReactionEffect, m: &Molecule, cfg: &CreateConfig, tick: i64) {
    let mut payload: Payload = Payload::with_capacity(cfg.payload.len());
    for (field, value) in &cfg.payload {
        payload.insert(field.clone(), resolve(value, m));
    }

    let energy = resolve_numeric_override(&cfg.energy, m).unwrap_or(1.0);
    let stability = resolve_numeric_override(&cfg.stability, m).unwrap_or(1.0);

    out.new_molecules.push(Molecule {
        id: String::new(),
        species: cfg.species.clone(),
        payload,
        energy,
        stability,
        tags: None,
        created_at: tick,
        last_touched_at: tick,
    });
}

fn resolve_numeric_override(value: &Option<PayloadValue>, origin: &Molecule) -> Option<f64> {
    value.as_ref().map(|v| resolve(v, origin)).and_then(|v| v.as_f64())
}

/// Evaluates a conditional effect's guard against `m` and the environment
/// view.
pub fn evaluate_condition(cond: &ConditionConfig, m: &Molecule, index: &TickIndex<'_>) -> bool {
    if let Some(field) = &cond.field {
        let candidate_value = m.payload.get(field).cloned().unwrap_or(PayloadValue::Null);
        cond.op.entries().iter().all(|(op, target)| {
            let resolved = resolve(target, m);
            compare(*op, &candidate_value, &resolved)
        })
    } else if let Some(count_cfg) = &cond.count_molecules {
        let Some((op, target)) = cond.op.single() else {
            return false;
        };
        let count = count_molecules(count_cfg, m, index) as f64;
        let target = target.as_f64().unwrap_or(0.0);
        compare(op, &PayloadValue::Number(count), &PayloadValue::Number(target))
    } else {
        false
    }
}

/// `count_molecules` aggregate: molecules of the named species matching
/// `where` against `origin`, excluding `origin`.
pub fn count_molecules(cfg: &CountMoleculesConfig, origin: &Molecule, index: &TickIndex<'_>) -> usize {
    index
        .find(&cfg.species, &cfg.where_clause, origin)
        .into_iter()
        .filter(|candidate| candidate.id != origin.id)
        .count()
}
