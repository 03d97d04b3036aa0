//! Commands: every operation a user can run against the [`Model`].
//!
//! A [`Command`] is a plain serde value. Parsing the user's text into one is
//! the caller's job; the JSON shape is adjacently tagged:
//!
//! ```json
//! {"type": "deletePerson", "data": {"index": 2}}
//! {"type": "undo"}
//! ```
//!
//! Execution consumes the command, so a command value runs at most once.
//! Each run either fails before touching the model or commits exactly one
//! snapshot (or changes only the selection or view, for the read-only
//! commands).
//!
//! # Modules
//!
//! - [`person`] -- People, login and friendships
//! - [`event`] -- Events, scheduling and joining
//! - [`poll`] -- Polls on the selected event
//! - [`history`] -- Undo, redo, clear and the command log

pub mod event;
pub mod history;
pub mod person;
pub mod poll;

#[cfg(test)]
mod fixtures;

use serde::{Deserialize, Serialize};

use huddle_types::{Event, EventKey};

use crate::error::CommandError;
use crate::model::{CommandResult, Model};

pub use event::{
    AddEvent, DeleteEvent, EditEvent, FindEvent, JoinEvent, SelectEvent, SetDate, SetTime,
};
pub use person::{
    AddFriend, AddPerson, DeleteFriend, DeletePerson, EditPerson, FindPerson, FindUserByPhone,
    Login,
};
pub use poll::{AddPoll, AddPollOption, DisplayPoll, Vote};

/// A single executable operation.
///
/// The `type` tag is the command word ([`Command::word`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Command {
    /// Add a new person.
    AddPerson(AddPerson),
    /// Delete a person from the person list.
    DeletePerson(DeletePerson),
    /// Edit a person from the person list.
    EditPerson(EditPerson),
    /// Show people whose name contains a keyword.
    FindPerson(FindPerson),
    /// Show the person with a given phone number.
    FindUserByPhone(FindUserByPhone),
    /// Show every person.
    ListPeople,
    /// Log in as a person from the person list.
    Login(Login),
    /// Log out.
    Logout,
    /// Befriend a person from the person list.
    AddFriend(AddFriend),
    /// Unfriend a person from the person list.
    DeleteFriend(DeleteFriend),
    /// Add an event organised by the logged-in user.
    AddEvent(AddEvent),
    /// Delete an event from the event list.
    DeleteEvent(DeleteEvent),
    /// Edit an event from the event list.
    EditEvent(EditEvent),
    /// Select an event from the event list.
    SelectEvent(SelectEvent),
    /// Join an event from the event list.
    JoinEvent(JoinEvent),
    /// Set the date of the selected event.
    SetDate(SetDate),
    /// Set the time of the selected event.
    SetTime(SetTime),
    /// Show events whose name contains a keyword.
    FindEvent(FindEvent),
    /// Show every event.
    ListEvents,
    /// Add a poll to the selected event.
    AddPoll(AddPoll),
    /// Add an option to a poll of the selected event.
    AddPollOption(AddPollOption),
    /// Vote for a poll option as the logged-in user.
    Vote(Vote),
    /// Show a poll of the selected event.
    DisplayPoll(DisplayPoll),
    /// Remove every person and event.
    Clear,
    /// Return to the previous snapshot.
    Undo,
    /// Return to the snapshot undone last.
    Redo,
    /// List previously executed command words.
    History,
}

impl Command {
    /// The command word, as used in the serde tag and the command log.
    pub const fn word(&self) -> &'static str {
        match self {
            Self::AddPerson(_) => "addPerson",
            Self::DeletePerson(_) => "deletePerson",
            Self::EditPerson(_) => "editPerson",
            Self::FindPerson(_) => "findPerson",
            Self::FindUserByPhone(_) => "findUserByPhone",
            Self::ListPeople => "listPeople",
            Self::Login(_) => "login",
            Self::Logout => "logout",
            Self::AddFriend(_) => "addFriend",
            Self::DeleteFriend(_) => "deleteFriend",
            Self::AddEvent(_) => "addEvent",
            Self::DeleteEvent(_) => "deleteEvent",
            Self::EditEvent(_) => "editEvent",
            Self::SelectEvent(_) => "selectEvent",
            Self::JoinEvent(_) => "joinEvent",
            Self::SetDate(_) => "setDate",
            Self::SetTime(_) => "setTime",
            Self::FindEvent(_) => "findEvent",
            Self::ListEvents => "listEvents",
            Self::AddPoll(_) => "addPoll",
            Self::AddPollOption(_) => "addPollOption",
            Self::Vote(_) => "vote",
            Self::DisplayPoll(_) => "displayPoll",
            Self::Clear => "clear",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::History => "history",
        }
    }

    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        match self {
            Self::AddPerson(c) => c.execute(model),
            Self::DeletePerson(c) => c.execute(model),
            Self::EditPerson(c) => c.execute(model),
            Self::FindPerson(c) => Ok(c.execute(model)),
            Self::FindUserByPhone(c) => Ok(c.execute(model)),
            Self::ListPeople => Ok(person::list_people(model)),
            Self::Login(c) => c.execute(model),
            Self::Logout => person::logout(model),
            Self::AddFriend(c) => c.execute(model),
            Self::DeleteFriend(c) => c.execute(model),
            Self::AddEvent(c) => c.execute(model),
            Self::DeleteEvent(c) => c.execute(model),
            Self::EditEvent(c) => c.execute(model),
            Self::SelectEvent(c) => c.execute(model),
            Self::JoinEvent(c) => c.execute(model),
            Self::SetDate(c) => c.execute(model),
            Self::SetTime(c) => c.execute(model),
            Self::FindEvent(c) => Ok(c.execute(model)),
            Self::ListEvents => Ok(event::list_events(model)),
            Self::AddPoll(c) => c.execute(model),
            Self::AddPollOption(c) => c.execute(model),
            Self::Vote(c) => c.execute(model),
            Self::DisplayPoll(c) => c.execute(model),
            Self::Clear => Ok(history::clear(model)),
            Self::Undo => history::undo(model),
            Self::Redo => history::redo(model),
            Self::History => Ok(history::list(model)),
        }
    }
}

/// The selected event, provided the logged-in user organises it.
///
/// Checks run in order: logged in, event selected, organiser.
fn organised_event(model: &Model) -> Result<&Event, CommandError> {
    let store = model.store();
    let user = model.selection().resolve_user(store)?;
    let event = model.selection().resolve_event(store)?;
    if !event.is_organised_by(&user.key()) {
        return Err(CommandError::NotEventOrganiser {
            event: event.name.to_string(),
        });
    }
    Ok(event)
}

/// Replace the event `target` with `updated` and commit the result.
fn commit_event(
    model: &mut Model,
    target: &EventKey,
    updated: Event,
    description: &str,
) -> Result<(), CommandError> {
    let mut working = model.store().clone();
    working.update_event(target, updated)?;
    model.commit(working, description);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bare_commands_deserialize_from_type_tag() {
        let cmd: Command = serde_json::from_str(r#"{"type":"undo"}"#).unwrap();
        assert_eq!(cmd, Command::Undo);
        assert_eq!(cmd.word(), "undo");
    }

    #[test]
    fn payload_commands_carry_data() {
        let cmd: Command =
            serde_json::from_str(r#"{"type":"deletePerson","data":{"index":2}}"#).unwrap();
        assert_eq!(cmd.word(), "deletePerson");
    }

    #[test]
    fn zero_index_is_rejected_at_parse_time() {
        let result: Result<Command, _> =
            serde_json::from_str(r#"{"type":"deletePerson","data":{"index":0}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_field_is_rejected_at_parse_time() {
        let json = r#"{"type":"findUserByPhone","data":{"phone":"12ab"}}"#;
        assert!(serde_json::from_str::<Command>(json).is_err());
    }

    #[test]
    fn tag_matches_word() {
        let json = serde_json::to_value(Command::ListEvents).unwrap();
        assert_eq!(json["type"], "listEvents");
    }
}
