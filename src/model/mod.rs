//! Immutable typed definitions shared across the engine: molecules,
//! species, and the reaction DSL's config-level shape.

mod molecule;
mod payload;
mod schema;
mod species;

pub use molecule::{InsertMoleculeRequest, Molecule};
pub use payload::{Payload, PayloadValue};
pub use schema::{
    CatalystConfig, ConditionConfig, CountMoleculesConfig, CreateConfig, EffectNode,
    InputPatternConfig, NotifyConfig, Op, PartnerConfig, Predicate, ReactionConfig, SchemaConfig,
    UpdateConfig, WhereConfig,
};
pub use species::Species;
