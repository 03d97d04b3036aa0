//! Model listener that keeps the data file in step with the store.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use huddle_core::persistence;
use huddle_core::{Model, ModelChange, ModelListener};
use tracing::error;

/// Shared handle reporting whether the store has changes the data file
/// does not hold yet.
#[derive(Debug, Clone, Default)]
pub struct SaveStatus(Rc<Cell<bool>>);

impl SaveStatus {
    /// Whether the last save attempt failed.
    pub fn is_dirty(&self) -> bool {
        self.0.get()
    }
}

/// Saves the current snapshot whenever the store changes.
///
/// Selection and filter changes leave the store untouched and are skipped.
/// A failed save is logged and marks the [`SaveStatus`] dirty until a later
/// save succeeds.
pub struct SaveOnCommit {
    path: PathBuf,
    status: SaveStatus,
}

impl SaveOnCommit {
    /// Create a listener that writes to `path`.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            status: SaveStatus::default(),
        }
    }

    /// A handle on this listener's save status.
    pub fn status(&self) -> SaveStatus {
        self.status.clone()
    }
}

impl ModelListener for SaveOnCommit {
    fn on_change(&mut self, change: &ModelChange, model: &Model) {
        if !changes_store(change) {
            return;
        }
        match persistence::save(&self.path, model.store()) {
            Ok(()) => self.status.0.set(false),
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to save data file");
                self.status.0.set(true);
            }
        }
    }
}

const fn changes_store(change: &ModelChange) -> bool {
    matches!(
        change,
        ModelChange::Committed { .. } | ModelChange::Undone | ModelChange::Redone
    )
}
