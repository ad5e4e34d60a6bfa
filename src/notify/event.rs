//! `NotificationEvent` — what every registered notifier receives when a
//! reaction fires with a non-empty effect.

use crate::model::Molecule;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub environment_id: String,
    pub reaction_id: String,
    pub reaction_name: String,
    pub tick: i64,
    pub fired_at_unix_ms: i64,
    pub input_molecule: Molecule,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub partners: Vec<Molecule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consumed_molecules: Vec<Molecule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub updated_molecules: Vec<Molecule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub created_molecules: Vec<Molecule>,
}
