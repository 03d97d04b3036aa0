//! The versioned history: a cursor over an append-only run of snapshots.
//!
//! # Design
//!
//! - **Linear**: committing after an undo discards the redo tail.
//! - **Never empty**: the initial snapshot at position 0 is never discarded.
//! - **Immutable entries**: snapshots are only reachable through shared
//!   references once committed; changes go through clone-then-commit.
//! - **No no-op detection**: committing an identical snapshot still grows
//!   the history. Callers commit only when a mutation happened.

use tracing::debug;

use huddle_types::CommitId;

use crate::HistoryError;

/// Description recorded for the snapshot a history starts from.
const INITIAL_DESCRIPTION: &str = "initial state";

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// One snapshot in the history with its commit metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit<S> {
    id: CommitId,
    description: String,
    snapshot: S,
}

impl<S> Commit<S> {
    fn new(snapshot: S, description: String) -> Self {
        Self {
            id: CommitId::new(),
            description,
            snapshot,
        }
    }

    /// Unique identifier of this commit.
    pub const fn id(&self) -> CommitId {
        self.id
    }

    /// Short description of the change, usually the command word.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The committed snapshot.
    pub const fn snapshot(&self) -> &S {
        &self.snapshot
    }
}

// ---------------------------------------------------------------------------
// VersionedHistory
// ---------------------------------------------------------------------------

/// Linear undo/redo history over snapshots of type `S`.
///
/// Maintains `pointer < commits.len()` at all times; `commits[0]` is the
/// initial snapshot.
#[derive(Debug, Clone)]
pub struct VersionedHistory<S> {
    /// Every retained commit, oldest first.
    commits: Vec<Commit<S>>,
    /// Position of the active snapshot.
    pointer: usize,
}

impl<S> VersionedHistory<S> {
    /// Start a history whose only entry is `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            commits: vec![Commit::new(initial, INITIAL_DESCRIPTION.to_owned())],
            pointer: 0,
        }
    }

    /// Append `snapshot` after the cursor and make it current.
    ///
    /// Every snapshot after the cursor (the redo tail) is discarded first.
    pub fn commit(&mut self, snapshot: S, description: impl Into<String>) -> &Commit<S> {
        let keep = self.pointer.saturating_add(1);
        let discarded = self.commits.len().saturating_sub(keep);
        self.commits.truncate(keep);
        self.commits.push(Commit::new(snapshot, description.into()));
        self.pointer = self.commits.len().saturating_sub(1);

        let commit = self.current_commit();
        debug!(
            id = %commit.id(),
            description = commit.description(),
            pointer = self.pointer,
            len = self.commits.len(),
            discarded,
            "snapshot committed"
        );
        commit
    }

    /// The active commit.
    #[allow(clippy::indexing_slicing)]
    pub fn current_commit(&self) -> &Commit<S> {
        // Every mutator keeps pointer < commits.len().
        &self.commits[self.pointer]
    }

    /// The active snapshot.
    pub fn current(&self) -> &S {
        self.current_commit().snapshot()
    }

    /// Whether there is an earlier snapshot to return to.
    pub const fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    /// Whether there is a later snapshot to return to.
    pub fn can_redo(&self) -> bool {
        self.pointer < self.commits.len().saturating_sub(1)
    }

    /// Move the cursor back one snapshot and return it.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NoPreviousState`] at the initial snapshot.
    pub fn undo(&mut self) -> Result<&S, HistoryError> {
        if !self.can_undo() {
            return Err(HistoryError::NoPreviousState);
        }
        self.pointer = self.pointer.saturating_sub(1);
        debug!(pointer = self.pointer, "history undo");
        Ok(self.current())
    }

    /// Move the cursor forward one snapshot and return it.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NoNextState`] at the newest snapshot.
    pub fn redo(&mut self) -> Result<&S, HistoryError> {
        if !self.can_redo() {
            return Err(HistoryError::NoNextState);
        }
        self.pointer = self.pointer.saturating_add(1);
        debug!(pointer = self.pointer, "history redo");
        Ok(self.current())
    }

    /// Position of the active snapshot (0 is the initial state).
    pub const fn pointer(&self) -> usize {
        self.pointer
    }

    /// Number of retained snapshots, including the initial one.
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Always `false`: the initial snapshot is never discarded.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Number of snapshots reachable by redo.
    pub fn redo_depth(&self) -> usize {
        self.commits
            .len()
            .saturating_sub(1)
            .saturating_sub(self.pointer)
    }

    /// Every retained commit, oldest first.
    pub fn commits(&self) -> &[Commit<S>] {
        &self.commits
    }
}
