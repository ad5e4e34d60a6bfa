//! Atomic snapshot persistence: write to a temp file, `fsync`, then rename
//! into place, so a reader never observes a half-written snapshot.

use crate::errors::{CoreError, CoreResult};
use crate::model::Molecule;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub environment_id: String,
    pub schema_name: String,
    pub tick: i64,
    pub molecules: Vec<Molecule>,
}

/// Writes `snapshot` to `<dir>/<environment_id>.snapshot.json`. A no-op
/// when `dir` is `None` — persistence is opt-in.
pub fn save_snapshot(dir: Option<&Path>, snapshot: &Snapshot) -> CoreResult<()> {
    let Some(dir) = dir else {
        return Ok(());
    };
    fs::create_dir_all(dir)?;

    let final_path = snapshot_path(dir, &snapshot.environment_id);
    let tmp_path = final_path.with_extension("json.tmp");

    let json = serde_json::to_vec(snapshot)?;
    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(&json)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, &final_path)?;
    Ok(())
}

/// Loads the snapshot for `environment_id` from `dir`. A missing file is not
/// an error: returns `Ok(None)` so the caller starts with an empty
/// environment instead.
pub fn load_snapshot(dir: &Path, environment_id: &str) -> CoreResult<Option<Snapshot>> {
    let path = snapshot_path(dir, environment_id);
    if !path.exists() {
        return Ok(None);
    }

    let bytes = fs::read(&path)?;
    let snapshot: Snapshot = serde_json::from_slice(&bytes)?;

    if snapshot.environment_id != environment_id {
        return Err(CoreError::Mismatch {
            expected: environment_id.to_string(),
            found: snapshot.environment_id,
        });
    }

    let mut seen_ids = std::collections::HashSet::with_capacity(snapshot.molecules.len());
    for molecule in &snapshot.molecules {
        if !seen_ids.insert(molecule.id.as_str()) {
            return Err(CoreError::DuplicateId(molecule.id.clone()));
        }
    }

    Ok(Some(snapshot))
}

pub(crate) fn snapshot_path(dir: &Path, environment_id: &str) -> PathBuf {
    dir.join(format!("{environment_id}.snapshot.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn molecule(id: &str) -> Molecule {
        Molecule {
            id: id.into(),
            species: "A".into(),
            payload: HashMap::new(),
            energy: 1.0,
            stability: 1.0,
            tags: None,
            created_at: 0,
            last_touched_at: 0,
        }
    }

    #[test]
    fn round_trips_through_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = Snapshot {
            environment_id: "env1".into(),
            schema_name: "s1".into(),
            tick: 42,
            molecules: vec![molecule("a"), molecule("b")],
        };
        save_snapshot(Some(dir.path()), &snapshot).unwrap();
        let loaded = load_snapshot(dir.path(), "env1").unwrap().unwrap();
        assert_eq!(loaded.tick, 42);
        assert_eq!(loaded.molecules.len(), 2);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_snapshot(dir.path(), "nope").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn save_is_noop_without_a_directory() {
        let snapshot = Snapshot {
            environment_id: "env1".into(),
            schema_name: "s1".into(),
            tick: 0,
            molecules: Vec::new(),
        };
        assert!(save_snapshot(None, &snapshot).is_ok());
    }

    #[test]
    fn mismatched_environment_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        // Written under "env1"'s own filename but queried as "env2" by
        // writing directly at env2's expected path.
        let snapshot = Snapshot {
            environment_id: "env1".into(),
            schema_name: "s1".into(),
            tick: 0,
            molecules: Vec::new(),
        };
        let json = serde_json::to_vec(&snapshot).unwrap();
        fs::write(snapshot_path(dir.path(), "env2"), json).unwrap();

        let err = load_snapshot(dir.path(), "env2").unwrap_err();
        assert!(matches!(err, CoreError::Mismatch { .. }));
    }

    #[test]
    fn duplicate_molecule_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = Snapshot {
            environment_id: "env1".into(),
            schema_name: "s1".into(),
            tick: 0,
            molecules: vec![molecule("dup"), molecule("dup")],
        };
        let json = serde_json::to_vec(&snapshot).unwrap();
        fs::write(snapshot_path(dir.path(), "env1"), json).unwrap();

        let err = load_snapshot(dir.path(), "env1").unwrap_err();
        assert!(matches!(err, CoreError::DuplicateId(_)));
    }
}
