//! The [`Model`]: the one owner of the history, selection and view.
//!
//! Commands receive `&mut Model` and change it only through crate-private
//! mutators. Listeners get read-only access after each change.

use serde::Serialize;
use tracing::{debug, info};

use huddle_store::{EntityStore, VersionedHistory};
use huddle_types::{Event, EventKey, Person, PersonKey};

use crate::command::Command;
use crate::error::CommandError;
use crate::selection::Selection;
use crate::view::{EventFilter, PersonFilter, ViewFilter};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// How a successful command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandStatus {
    /// A new snapshot was committed, or the history cursor moved.
    Committed,
    /// Read-only, or changed only the selection or view.
    Completed,
}

/// Feedback from a successful command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    /// Message for the user.
    pub feedback: String,
    /// Whether the command produced a snapshot transition.
    pub status: CommandStatus,
}

impl CommandResult {
    pub(crate) fn committed(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            status: CommandStatus::Committed,
        }
    }

    pub(crate) fn completed(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            status: CommandStatus::Completed,
        }
    }
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

/// What just changed in the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelChange {
    /// A new snapshot was committed.
    Committed {
        /// The command word that produced it.
        description: String,
    },
    /// The history cursor moved back.
    Undone,
    /// The history cursor moved forward.
    Redone,
    /// The logged-in user or selected event changed.
    SelectionChanged,
    /// A person or event filter changed.
    FilterChanged,
}

/// Observer notified after every model change.
///
/// Implementations can refresh a display, persist the store, and so on.
/// They see the model only after the change is complete.
pub trait ModelListener {
    /// Called once per change, in the order the changes happened.
    fn on_change(&mut self, change: &ModelChange, model: &Model);
}

/// A listener that ignores every change.
pub struct NoOpListener;

impl ModelListener for NoOpListener {
    fn on_change(&mut self, _change: &ModelChange, _model: &Model) {}
}

// ---------------------------------------------------------------------------
// Display projection
// ---------------------------------------------------------------------------

/// Read-only projection of the model after a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState<'m> {
    /// People passing the person filter.
    pub people: Vec<&'m Person>,
    /// Events passing the event filter.
    pub events: Vec<&'m Event>,
    /// The logged-in user.
    pub current_user: Option<&'m PersonKey>,
    /// The selected event.
    pub selected_event: Option<&'m EventKey>,
    /// Whether `undo` would succeed.
    pub can_undo: bool,
    /// Whether `redo` would succeed.
    pub can_redo: bool,
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Owns the versioned store, the selection and the view.
pub struct Model {
    history: VersionedHistory<EntityStore>,
    selection: Selection,
    view: ViewFilter,
    /// Command words in execution order.
    executed: Vec<String>,
    listeners: Vec<Box<dyn ModelListener>>,
}

impl Model {
    /// A model over an empty store.
    pub fn new() -> Self {
        Self::with_store(EntityStore::new())
    }

    /// A model whose initial snapshot is `store`.
    pub fn with_store(store: EntityStore) -> Self {
        Self {
            history: VersionedHistory::new(store),
            selection: Selection::new(),
            view: ViewFilter::new(),
            executed: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Register a listener for subsequent changes.
    pub fn add_listener(&mut self, listener: Box<dyn ModelListener>) {
        self.listeners.push(listener);
    }

    /// The current snapshot.
    pub fn store(&self) -> &EntityStore {
        self.history.current()
    }

    /// The snapshot history.
    pub const fn history(&self) -> &VersionedHistory<EntityStore> {
        &self.history
    }

    /// The logged-in user and selected event.
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The active filters.
    pub const fn view(&self) -> &ViewFilter {
        &self.view
    }

    /// Command words executed so far, oldest first.
    pub fn executed_commands(&self) -> &[String] {
        &self.executed
    }

    /// People currently shown.
    pub fn filtered_people(&self) -> Vec<&Person> {
        self.view.people(self.store())
    }

    /// Events currently shown.
    pub fn filtered_events(&self) -> Vec<&Event> {
        self.view.events(self.store())
    }

    /// Run `command` against this model.
    ///
    /// On error nothing was committed and neither the selection nor the
    /// view changed. The command word is recorded either way.
    ///
    /// # Errors
    ///
    /// Returns the [`CommandError`] describing the failed precondition.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        let word = command.word();
        let outcome = command.execute(self);
        self.executed.push(word.to_owned());

        match &outcome {
            Ok(result) => info!(
                command = word,
                status = ?result.status,
                pointer = self.history.pointer(),
                "command executed"
            ),
            Err(err) => info!(command = word, error = %err, "command rejected"),
        }
        outcome
    }

    /// Projection of the model for display.
    pub fn display_state(&self) -> DisplayState<'_> {
        DisplayState {
            people: self.filtered_people(),
            events: self.filtered_events(),
            current_user: self.selection.current_user(),
            selected_event: self.selection.selected_event(),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }

    // -----------------------------------------------------------------------
    // Crate-private mutators
    // -----------------------------------------------------------------------

    /// Push `store` as the new current snapshot and revalidate the
    /// selection against it.
    pub(crate) fn commit(&mut self, store: EntityStore, description: &str) {
        self.commit_following(store, description, |_| false);
    }

    /// Like [`commit`](Self::commit), first letting `follow` move the
    /// selection onto renamed entities. `follow` returns whether it changed
    /// the selection.
    pub(crate) fn commit_following(
        &mut self,
        store: EntityStore,
        description: &str,
        follow: impl FnOnce(&mut Selection) -> bool,
    ) {
        let followed = follow(&mut self.selection);
        self.history.commit(store, description);
        let revalidated = self.selection.revalidate(self.history.current());
        let selection_changed = followed || revalidated;
        self.notify(&ModelChange::Committed {
            description: description.to_owned(),
        });
        if selection_changed {
            self.notify(&ModelChange::SelectionChanged);
        }
    }

    pub(crate) fn undo(&mut self) -> Result<(), CommandError> {
        self.history.undo()?;
        let selection_changed = self.selection.revalidate(self.history.current());
        self.notify(&ModelChange::Undone);
        if selection_changed {
            self.notify(&ModelChange::SelectionChanged);
        }
        Ok(())
    }

    pub(crate) fn redo(&mut self) -> Result<(), CommandError> {
        self.history.redo()?;
        let selection_changed = self.selection.revalidate(self.history.current());
        self.notify(&ModelChange::Redone);
        if selection_changed {
            self.notify(&ModelChange::SelectionChanged);
        }
        Ok(())
    }

    pub(crate) const fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Notify listeners that the selection was changed through
    /// [`selection_mut`](Self::selection_mut).
    pub(crate) fn selection_changed(&mut self) {
        self.notify(&ModelChange::SelectionChanged);
    }

    pub(crate) fn set_person_filter(&mut self, filter: PersonFilter) {
        self.view.set_person_filter(filter);
        self.notify(&ModelChange::FilterChanged);
    }

    pub(crate) fn set_event_filter(&mut self, filter: EventFilter) {
        self.view.set_event_filter(filter);
        self.notify(&ModelChange::FilterChanged);
    }

    fn notify(&mut self, change: &ModelChange) {
        debug!(?change, listeners = self.listeners.len(), "model changed");
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in &mut listeners {
            listener.on_change(change, self);
        }
        self.listeners = listeners;
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Model {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Model")
            .field("history", &self.history)
            .field("selection", &self.selection)
            .field("view", &self.view)
            .field("executed", &self.executed)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
