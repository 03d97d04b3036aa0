//! Entity store and versioned snapshot history for the Huddle contact/event
//! manager.
//!
//! Every person and event lives in one [`EntityStore`]. The store is a plain
//! value: it is cloned, mutated, and the mutated copy is committed to a
//! [`VersionedHistory`] as a new snapshot. Snapshots already in the history
//! are never mutated again, which is what makes undo and redo exact.
//!
//! # Architecture
//!
//! - [`store`] -- The [`EntityStore`]: people, events and their relationships,
//!   with identity-aware duplicate detection and cascading updates.
//! - [`history`] -- The [`VersionedHistory`]: a cursor over an append-only
//!   sequence of snapshots with commit, undo and redo.
//!
//! # Relationship invariant
//!
//! Every friend, organiser, participant and voter reference names a person
//! present in the same snapshot. References are identity keys, never
//! pointers, so a snapshot can be copied without fixing anything up:
//!
//! ```text
//! for every reference r in snapshot S: exists p in S.people with p.matches(r)
//! ```
//!
//! # Usage
//!
//! ```
//! use huddle_store::{EntityStore, VersionedHistory};
//! use huddle_types::{Address, Email, Name, Person, Phone};
//! use std::collections::BTreeSet;
//!
//! let mut history = VersionedHistory::new(EntityStore::new());
//!
//! let alice = Person::new(
//!     Name::parse("Alice")?,
//!     Phone::parse("94351253")?,
//!     Email::parse("alice@example.com")?,
//!     Address::parse("123, Jurong West Ave 6")?,
//!     BTreeSet::new(),
//!     BTreeSet::new(),
//! );
//!
//! let mut working = history.current().clone();
//! working.add_person(alice)?;
//! history.commit(working, "addPerson");
//!
//! assert_eq!(history.len(), 2);
//! assert!(history.undo().is_ok());
//! assert!(history.current().people().is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod history;
pub mod store;

// Re-export primary types at crate root.
pub use history::{Commit, VersionedHistory};
pub use store::EntityStore;

use huddle_types::{EventKey, PersonKey};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised by entity store mutations.
///
/// Every check runs before the store is touched, so an `Err` always leaves
/// the store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A person with the same identity already exists.
    #[error("this person already exists in the address book: {0}")]
    DuplicatePerson(PersonKey),

    /// An event with the same name already exists.
    #[error("this event already exists in the address book: {0}")]
    DuplicateEvent(EventKey),

    /// No person matches the given key.
    #[error("person not found: {0}")]
    PersonNotFound(PersonKey),

    /// No event matches the given key.
    #[error("event not found: {0}")]
    EventNotFound(EventKey),

    /// A relationship names a person who is not in the store.
    #[error("{owner} refers to {missing}, who is not in the address book")]
    DanglingReference {
        /// Display name of the person or event holding the reference.
        owner: String,
        /// The unresolved key.
        missing: PersonKey,
    },

    /// The two targets of a paired update are the same person.
    #[error("paired update targets the same person twice: {0}")]
    OverlappingTargets(PersonKey),
}

/// Errors raised when moving the history cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// The cursor is already at the initial snapshot.
    #[error("No more commands to undo!")]
    NoPreviousState,

    /// The cursor is already at the newest snapshot.
    #[error("No more commands to redo!")]
    NoNextState,
}
