//! The per-match output accumulated by `Reaction::apply`.

use crate::model::Molecule;
use std::collections::{HashMap, HashSet};

/// Everything a single reaction firing produced: molecules consumed,
/// changed, or newly created. `partners` is carried alongside purely so the
/// tick engine can populate
/// `NotificationEvent::partners` without a second pass over the schema.
#[derive(Debug, Clone, Default)]
pub struct ReactionEffect {
    pub consumed: HashSet<String>,
    /// Last-writer-wins within a tick: a later `update` effect for the same
    /// id overwrites an earlier one outright.
    pub changes: HashMap<String, Molecule>,
    pub new_molecules: Vec<Molecule>,
    pub partners: Vec<Molecule>,
}

impl ReactionEffect {
    /// A `NotificationEvent` is only built when this is `false` —
    /// `partners` alone never counts as "observable".
    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty() && self.changes.is_empty() && self.new_molecules.is_empty()
    }
}
