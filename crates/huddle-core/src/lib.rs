//! Command engine for the Huddle contact/event manager.
//!
//! This crate turns the entity store and its history into an application:
//! a [`Model`] owns the versioned store together with the selection state
//! (logged-in user, selected event) and the filtered views, and every change
//! goes through a [`Command`].
//!
//! # Modules
//!
//! - [`model`] -- The [`Model`] context, command results and listeners.
//! - [`command`] -- The [`Command`] catalogue and its execution rules.
//! - [`selection`] -- Logged-in user and selected event, kept consistent
//!   across undo and redo.
//! - [`view`] -- Person and event filters, recomputed on every read.
//! - [`error`] -- [`CommandError`], the single error type commands report.
//! - [`config`] -- Configuration loading from `huddle-config.yaml`.
//! - [`persistence`] -- JSON load and atomic save of the current snapshot.
//!
//! # Execution contract
//!
//! A command reads the selection and the current snapshot, validates, and
//! either fails with nothing changed or commits exactly one new snapshot.
//! After every commit, undo and redo the selection is re-resolved against
//! the new snapshot; references to entities that no longer exist are
//! cleared.
//!
//! ```
//! use huddle_core::{Command, CommandError, Model};
//!
//! let mut model = Model::new();
//! let add: Command = serde_json::from_str(
//!     r#"{"type": "addPerson", "data": {
//!         "name": "Alice", "phone": "94351253",
//!         "email": "alice@example.com", "address": "123, Jurong West Ave 6"}}"#,
//! )?;
//! model.execute(add)?;
//! assert_eq!(model.history().len(), 2);
//!
//! model.execute(Command::Undo)?;
//! assert!(model.store().people().is_empty());
//! assert_eq!(model.execute(Command::Undo), Err(CommandError::NoPreviousState));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod model;
pub mod persistence;
pub mod selection;
pub mod view;

pub use command::Command;
pub use error::{CommandError, EntityKind};
pub use model::{
    CommandResult, CommandStatus, DisplayState, Model, ModelChange, ModelListener, NoOpListener,
};
pub use selection::Selection;
pub use view::{EventFilter, PersonFilter, ViewFilter};
