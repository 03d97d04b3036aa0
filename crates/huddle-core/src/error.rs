//! The error type every command reports.
//!
//! Lower layers keep their own enums ([`FieldError`], [`PollError`],
//! [`StoreError`], [`HistoryError`]); they convert into [`CommandError`] so
//! commands can propagate them with `?`.

use huddle_store::{HistoryError, StoreError};
use huddle_types::{FieldError, PollError};

/// The kind of entity a [`CommandError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A person.
    Person,
    /// An event.
    Event,
    /// A poll within an event.
    Poll,
    /// An option within a poll.
    PollOption,
    /// A vote for a poll option.
    Vote,
    /// A friendship between two people.
    Friendship,
    /// A participant of an event.
    Participant,
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Person => "person",
            Self::Event => "event",
            Self::Poll => "poll",
            Self::PollOption => "poll option",
            Self::Vote => "vote",
            Self::Friendship => "friendship",
            Self::Participant => "participant",
        };
        f.write_str(label)
    }
}

/// Why a command was rejected.
///
/// A command that returns any of these has not committed anything and has
/// not touched the selection or the view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The new or edited entity collides with an existing one.
    #[error("this {kind} already exists: {key}")]
    DuplicateEntity {
        /// What kind of entity collided.
        kind: EntityKind,
        /// Display form of the colliding key.
        key: String,
    },

    /// A lookup by identity found nothing.
    #[error("{kind} not found: {key}")]
    EntityNotFound {
        /// What kind of entity was looked up.
        kind: EntityKind,
        /// Display form of the missing key.
        key: String,
    },

    /// A one-based index is past the end of the displayed list.
    #[error("the {kind} index provided is invalid: {index} (only {len} shown)")]
    InvalidIndex {
        /// Which list the index addresses.
        kind: EntityKind,
        /// The one-based index given.
        index: usize,
        /// Length of the list it was checked against.
        len: usize,
    },

    /// Undo at the initial snapshot.
    #[error("No more commands to undo!")]
    NoPreviousState,

    /// Redo at the newest snapshot.
    #[error("No more commands to redo!")]
    NoNextState,

    /// The command needs a logged-in user.
    #[error("no user is logged in")]
    NoUserLoggedIn,

    /// The command needs a selected event.
    #[error("no event is selected")]
    NoEventSelected,

    /// Only the organiser of the event may do this.
    #[error("only the organiser of {event} can do this")]
    NotEventOrganiser {
        /// Name of the event.
        event: String,
    },

    /// A field value violates its constraint.
    #[error(transparent)]
    InvalidFieldValue(#[from] FieldError),

    /// An edit command named no field to change.
    #[error("at least one field to edit must be provided")]
    NothingToEdit,

    /// The logged-in user targeted themselves as a friend.
    #[error("you cannot be your own friend")]
    CannotFriendSelf,
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicatePerson(key) | StoreError::OverlappingTargets(key) => {
                Self::DuplicateEntity {
                    kind: EntityKind::Person,
                    key: key.to_string(),
                }
            }
            StoreError::DuplicateEvent(key) => Self::DuplicateEntity {
                kind: EntityKind::Event,
                key: key.to_string(),
            },
            StoreError::PersonNotFound(key) | StoreError::DanglingReference { missing: key, .. } => {
                Self::EntityNotFound {
                    kind: EntityKind::Person,
                    key: key.to_string(),
                }
            }
            StoreError::EventNotFound(key) => Self::EntityNotFound {
                kind: EntityKind::Event,
                key: key.to_string(),
            },
        }
    }
}

impl From<HistoryError> for CommandError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::NoPreviousState => Self::NoPreviousState,
            HistoryError::NoNextState => Self::NoNextState,
        }
    }
}

impl From<PollError> for CommandError {
    fn from(err: PollError) -> Self {
        match err {
            PollError::DuplicateOption { option, .. } => Self::DuplicateEntity {
                kind: EntityKind::PollOption,
                key: option,
            },
            PollError::NoSuchOption { option, .. } => Self::EntityNotFound {
                kind: EntityKind::PollOption,
                key: option,
            },
            PollError::AlreadyVoted { voter, option } => Self::DuplicateEntity {
                kind: EntityKind::Vote,
                key: format!("{voter} for {option}"),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use huddle_types::{Email, Name, PersonKey, Phone};

    use super::*;

    #[test]
    fn history_errors_keep_their_messages() {
        let err = CommandError::from(HistoryError::NoPreviousState);
        assert_eq!(err, CommandError::NoPreviousState);
        assert_eq!(err.to_string(), "No more commands to undo!");
    }

    #[test]
    fn poll_errors_map_to_entity_kinds() {
        let err = CommandError::from(PollError::NoSuchOption {
            poll: "When".to_owned(),
            option: "Monday".to_owned(),
        });
        assert!(matches!(
            err,
            CommandError::EntityNotFound {
                kind: EntityKind::PollOption,
                ..
            }
        ));
    }

    #[test]
    fn overlapping_targets_report_the_repeated_person() {
        let key = PersonKey::new(
            Name::parse("Alice").unwrap(),
            Phone::parse("94351253").unwrap(),
            Email::parse("alice@example.com").unwrap(),
        );
        let err = CommandError::from(StoreError::OverlappingTargets(key.clone()));
        assert_eq!(
            err,
            CommandError::DuplicateEntity {
                kind: EntityKind::Person,
                key: key.to_string(),
            }
        );
    }

    #[test]
    fn invalid_index_mentions_list_kind() {
        let err = CommandError::InvalidIndex {
            kind: EntityKind::Event,
            index: 4,
            len: 2,
        };
        assert!(err.to_string().contains("event index"));
    }
}
