//! Shared type definitions for the Huddle contact/event manager.
//!
//! This crate is the single source of truth for the entities stored in the
//! entity store and carried by commands. Field values are validated on
//! construction and on deserialization, so an invalid value cannot reach the
//! store from either a command or a loaded file.
//!
//! # Modules
//!
//! - [`fields`] -- Validated newtypes (`Name`, `Phone`, `Email`, ...) and [`TimeRange`]
//! - [`ids`] -- [`CommitId`] for history entries and one-based [`Index`]
//! - [`keys`] -- Identity keys used for lookups and relationships
//! - [`person`] -- The [`Person`] entity
//! - [`event`] -- The [`Event`] entity
//! - [`poll`] -- [`Poll`]s attached to events

pub mod event;
pub mod fields;
pub mod ids;
pub mod keys;
pub mod person;
pub mod poll;

// Re-export all public types at crate root for convenience.
pub use event::Event;
pub use fields::{Address, Email, FieldError, Interest, Label, Name, Phone, Tag, TimeRange};
pub use ids::{CommitId, Index};
pub use keys::{EventKey, PersonKey};
pub use person::Person;
pub use poll::{Poll, PollError, PollOption};
