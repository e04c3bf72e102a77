//! In-memory backend, for tests and embedding.

use crate::store::{Snapshot, StoreResult, TournamentRepository};
use chrono::Utc;
use std::io;

#[derive(Clone, Debug, Default)]
pub struct MemoryRepository {
    snapshot: Snapshot,
    read_only: bool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            read_only: false,
        }
    }

    /// While read-only every write fails with a permission error.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}

impl TournamentRepository for MemoryRepository {
    fn read_snapshot(&self) -> StoreResult<Snapshot> {
        Ok(self.snapshot.clone())
    }

    fn write_snapshot(&mut self, snapshot: &Snapshot) -> StoreResult<()> {
        if self.read_only {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "store is read-only").into());
        }
        self.snapshot = snapshot.clone();
        self.snapshot.last_updated = Utc::now();
        Ok(())
    }
}
