//! Molecule — the unit of state an environment carries across ticks.

use super::payload::Payload;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Molecule {
    pub id: String,
    pub species: String,
    #[serde(default)]
    pub payload: Payload,
    #[serde(default = "default_energy")]
    pub energy: f64,
    #[serde(default = "default_stability")]
    pub stability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub created_at: i64,
    pub last_touched_at: i64,
}

fn default_energy() -> f64 {
    1.0
}

fn default_stability() -> f64 {
    1.0
}

impl Molecule {
    /// Builds a molecule as it would appear freshly inserted at `tick`,
    /// before the caller supplies an id (the tick engine's apply phase
    /// assigns one when missing).
    pub fn new(species: impl Into<String>, payload: Payload, tick: i64) -> Self {
        Self {
            id: String::new(),
            species: species.into(),
            payload,
            energy: default_energy(),
            stability: default_stability(),
            tags: None,
            created_at: tick,
            last_touched_at: tick,
        }
    }
}

/// Request body for `POST /env/{id}/molecule` — species and payload only;
/// everything else (id, energy, stability, timestamps) is assigned by the
/// environment on insert.
#[derive(Debug, Clone, Deserialize)]
pub struct InsertMoleculeRequest {
    pub species: String,
    #[serde(default)]
    pub payload: Payload,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub stability: Option<f64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}
