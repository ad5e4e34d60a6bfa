//! The per-tick index that gives the matcher bounded cost.
//!
//! Built once per tick from the Phase A snapshot. Two indices:
//! `by_species` (species -> ordered molecule list) and
//! `by_species_field_value` (species -> field -> canonical string key ->
//! molecule list). The index is an optimization, never a semantic source
//! of truth: a `where` with more than one field, or with a non-equality
//! operator on its single field, falls back to a linear scan that runs the
//! real `matches_where` check.

use super::{matches_where, resolve};
use crate::model::{Molecule, Op, WhereConfig};
use std::collections::HashMap;

pub struct TickIndex<'a> {
    molecules: &'a [Molecule],
    by_id: HashMap<&'a str, usize>,
    by_species: HashMap<&'a str, Vec<usize>>,
    by_species_field_value: HashMap<&'a str, HashMap<&'a str, HashMap<String, Vec<usize>>>>,
}

impl<'a> TickIndex<'a> {
    pub fn build(molecules: &'a [Molecule]) -> Self {
        let mut by_id = HashMap::with_capacity(molecules.len());
        let mut by_species: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut by_species_field_value: HashMap<&str, HashMap<&str, HashMap<String, Vec<usize>>>> =
            HashMap::new();

        for (idx, m) in molecules.iter().enumerate() {
            by_id.insert(m.id.as_str(), idx);
            by_species.entry(m.species.as_str()).or_default().push(idx);

            let by_field = by_species_field_value.entry(m.species.as_str()).or_default();
            for (field, value) in &m.payload {
                by_field
                    .entry(field.as_str())
                    .or_default()
                    .entry(value.to_string())
                    .or_default()
                    .push(idx);
            }
        }

        Self {
            molecules,
            by_id,
            by_species,
            by_species_field_value,
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a Molecule> {
        self.by_id.get(id).map(|&idx| &self.molecules[idx])
    }

    pub fn by_species(&self, species: &str) -> impl Iterator<Item = &'a Molecule> + '_ {
        self.by_species
            .get(species)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.molecules[idx])
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    /// Resolve candidates of `species` matching `where_clause` against
    /// `origin`. Uses the indexed lookup for the empty-`where` and
    /// single-equality-field cases; falls back to a linear scan with a
    /// full `matches_where` check otherwise.
    pub fn find(
        &self,
        species: &str,
        where_clause: &WhereConfig,
        origin: &Molecule,
    ) -> Vec<&'a Molecule> {
        if where_clause.is_empty() {
            return self.by_species(species).collect();
        }

        if where_clause.len() == 1 {
            let (field, predicate) = where_clause.iter().next().expect("len checked above");
            if let Some((Op::Eq, target)) = predicate.single() {
                let resolved = resolve(target, origin);
                let key = resolved.to_string();
                return self
                    .by_species_field_value
                    .get(species)
                    .and_then(|by_field| by_field.get(field.as_str()))
                    .and_then(|by_value| by_value.get(&key))
                    .into_iter()
                    .flatten()
                    .map(|&idx| &self.molecules[idx])
                    .collect();
            }
        }

        self.by_species(species)
            .filter(|m| matches_where(m, where_clause, origin))
            .collect()
    }
}
