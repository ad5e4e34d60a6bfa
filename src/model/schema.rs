//! The reaction DSL's config-level shape — everything deserialized
//! straight from a `SchemaConfig` JSON document, before `schema_builder`
//! validates it and turns it into runnable reactions.

use super::payload::{Payload, PayloadValue};
use super::species::Species;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single `{op: value}` equality/comparison predicate. Exactly one field
/// must be set — `schema_builder::validate` enforces that for
/// `count_molecules.op`; `matching::compare` tolerates more than one being
/// set by using the first it finds, but well-formed config never does.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Predicate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<PayloadValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ne: Option<PayloadValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<PayloadValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<PayloadValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<PayloadValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<PayloadValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Predicate {
    /// The operator/value pairs actually set, in a fixed, stable order.
    /// A well-formed predicate has exactly one.
    pub fn entries(&self) -> Vec<(Op, &PayloadValue)> {
        let mut out = Vec::new();
        if let Some(v) = &self.eq {
            out.push((Op::Eq, v));
        }
        if let Some(v) = &self.ne {
            out.push((Op::Ne, v));
        }
        if let Some(v) = &self.gt {
            out.push((Op::Gt, v));
        }
        if let Some(v) = &self.gte {
            out.push((Op::Gte, v));
        }
        if let Some(v) = &self.lt {
            out.push((Op::Lt, v));
        }
        if let Some(v) = &self.lte {
            out.push((Op::Lte, v));
        }
        out
    }

    /// The single operator, if exactly one is set.
    pub fn single(&self) -> Option<(Op, &PayloadValue)> {
        let entries = self.entries();
        if entries.len() == 1 {
            Some(entries[0])
        } else {
            None
        }
    }
}

/// `field -> {eq: value}` equality matching, used by input patterns,
/// partner specs, catalyst specs, and `count_molecules`.
pub type WhereConfig = HashMap<String, Predicate>;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PartnerConfig {
    pub species: String,
    #[serde(default, rename = "where")]
    pub where_clause: WhereConfig,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalystConfig {
    pub species: String,
    #[serde(default, rename = "where")]
    pub where_clause: WhereConfig,
    #[serde(default)]
    pub rate_boost: Option<f64>,
    #[serde(default)]
    pub max_rate: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputPatternConfig {
    pub species: String,
    #[serde(default, rename = "where")]
    pub where_clause: WhereConfig,
    #[serde(default)]
    pub partners: Vec<PartnerConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CountMoleculesConfig {
    pub species: String,
    #[serde(default, rename = "where")]
    pub where_clause: WhereConfig,
}

/// A conditional effect's guard: either a field predicate evaluated against
/// the firing molecule, or a `count_molecules` aggregate over the
/// environment. Exactly one of `field` / `count_molecules` is populated —
/// `schema_builder::validate` rejects both-or-neither.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConditionConfig {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub count_molecules: Option<CountMoleculesConfig>,
    pub op: Predicate,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateConfig {
    #[serde(default)]
    pub energy_add: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateConfig {
    pub species: String,
    #[serde(default)]
    pub payload: Payload,
    #[serde(default)]
    pub energy: Option<PayloadValue>,
    #[serde(default)]
    pub stability: Option<PayloadValue>,
}

/// One node in an effect list. `consume`/`update`/`create` are direct
/// effects; `if` makes the node conditional, in which case any sibling
/// direct effect on the same node is ignored and `then`/`else` are applied
/// instead.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EffectNode {
    #[serde(default)]
    pub consume: Option<bool>,
    #[serde(default)]
    pub update: Option<UpdateConfig>,
    #[serde(default)]
    pub create: Option<CreateConfig>,
    #[serde(default, rename = "if")]
    pub if_cond: Option<ConditionConfig>,
    #[serde(default)]
    pub then: Vec<EffectNode>,
    #[serde(default, rename = "else")]
    pub else_branch: Vec<EffectNode>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub notifier_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReactionConfig {
    pub id: String,
    pub name: String,
    pub input: InputPatternConfig,
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub catalysts: Vec<CatalystConfig>,
    #[serde(default)]
    pub effects: Vec<EffectNode>,
    #[serde(default)]
    pub notify: Option<NotifyConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchemaConfig {
    pub name: String,
    pub species: Vec<Species>,
    #[serde(default)]
    pub reactions: Vec<ReactionConfig>,
}
