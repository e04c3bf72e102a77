//! JSON file backend: one `<namespace>.json` file per store.

use crate::store::{Snapshot, StoreResult, TournamentRepository};
use chrono::Utc;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default namespace (file stem) of the store.
pub const DEFAULT_NAMESPACE: &str = "fifa_tournament_manager";

#[derive(Clone, Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Open (creating the directory if needed) the store `<dir>/<namespace>.json`.
    pub fn open(dir: impl AsRef<Path>, namespace: &str) -> StoreResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(format!("{}.json", namespace)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TournamentRepository for JsonFileRepository {
    fn read_snapshot(&self) -> StoreResult<Snapshot> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Snapshot::default()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Snapshot::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a temporary file and rename it over the store, so a failed
    /// write leaves the previous snapshot in place.
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> StoreResult<()> {
        let mut snapshot = snapshot.clone();
        snapshot.last_updated = Utc::now();
        let bytes = serde_json::to_vec(&snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
