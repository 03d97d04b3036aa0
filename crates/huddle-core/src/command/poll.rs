//! Poll commands on the selected event. Polls are addressed by their
//! one-based position in the event, options by their label.

use serde::{Deserialize, Serialize};

use huddle_types::{Event, Index, Label, Poll};

use super::{commit_event, organised_event};
use crate::error::{CommandError, EntityKind};
use crate::model::{CommandResult, Model};

fn poll_at(event: &Event, index: Index) -> Result<&Poll, CommandError> {
    event
        .polls
        .get(index.zero_based())
        .ok_or(CommandError::InvalidIndex {
            kind: EntityKind::Poll,
            index: index.one_based(),
            len: event.polls.len(),
        })
}

fn poll_at_mut(event: &mut Event, index: Index) -> Result<&mut Poll, CommandError> {
    let len = event.polls.len();
    event
        .polls
        .get_mut(index.zero_based())
        .ok_or(CommandError::InvalidIndex {
            kind: EntityKind::Poll,
            index: index.one_based(),
            len,
        })
}

/// Add a poll to the selected event. Only its organiser may.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPoll {
    /// Poll title.
    pub name: Label,
}

impl AddPoll {
    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        let event = organised_event(model)?;
        let target = event.key();
        let mut updated = event.clone();
        let feedback = format!(
            "Poll {} created with index {}",
            self.name,
            updated.polls.len().saturating_add(1)
        );
        updated.polls.push(Poll::new(self.name));

        commit_event(model, &target, updated, "addPoll")?;
        Ok(CommandResult::committed(feedback))
    }
}

/// Add an option to a poll of the selected event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPollOption {
    /// One-based position of the poll in the event.
    pub poll: Index,
    /// The new option.
    pub option: Label,
}

impl AddPollOption {
    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        let event = model.selection().resolve_event(model.store())?;
        let target = event.key();
        let mut updated = event.clone();
        let feedback = format!("{} added to poll {}", self.option, self.poll);
        poll_at_mut(&mut updated, self.poll)?.add_option(self.option)?;

        commit_event(model, &target, updated, "addPollOption")?;
        Ok(CommandResult::committed(feedback))
    }
}

/// Vote for an option of a poll of the selected event as the logged-in
/// user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// One-based position of the poll in the event.
    pub poll: Index,
    /// The option voted for.
    pub option: Label,
}

impl Vote {
    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        let store = model.store();
        let voter = model.selection().resolve_user(store)?.key();
        let event = model.selection().resolve_event(store)?;
        let target = event.key();
        let mut updated = event.clone();
        let feedback = format!("{} voted for {} in poll {}", voter.name, self.option, self.poll);
        poll_at_mut(&mut updated, self.poll)?.vote(&self.option, voter)?;

        commit_event(model, &target, updated, "vote")?;
        Ok(CommandResult::committed(feedback))
    }
}

/// Show a poll of the selected event with its vote counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPoll {
    /// One-based position of the poll in the event.
    pub poll: Index,
}

impl DisplayPoll {
    pub(crate) fn execute(self, model: &Model) -> Result<CommandResult, CommandError> {
        let event = model.selection().resolve_event(model.store())?;
        let poll = poll_at(event, self.poll)?;
        Ok(CommandResult::completed(format!(
            "Poll {} displayed.\n{}",
            self.poll,
            poll.display()
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::command::fixtures::{index, login, model_with_people, model_with_selected_event};
    use crate::model::CommandStatus;

    fn label(s: &str) -> Label {
        Label::parse(s).unwrap()
    }

    fn add_poll(name: &str) -> Command {
        Command::AddPoll(AddPoll { name: label(name) })
    }

    fn add_option(poll: usize, option: &str) -> Command {
        Command::AddPollOption(AddPollOption {
            poll: index(poll),
            option: label(option),
        })
    }

    fn vote(poll: usize, option: &str) -> Command {
        Command::Vote(Vote {
            poll: index(poll),
            option: label(option),
        })
    }

    fn with_date_poll() -> Model {
        let mut model = model_with_selected_event();
        model.execute(add_poll("Date poll")).unwrap();
        model.execute(add_option(1, "12 August")).unwrap();
        model.execute(add_option(1, "13 August")).unwrap();
        model
    }

    #[test]
    fn add_poll_reports_index() {
        let mut model = model_with_selected_event();
        let result = model.execute(add_poll("Date poll")).unwrap();
        assert_eq!(result.feedback, "Poll Date poll created with index 1");
    }

    #[test]
    fn add_poll_requires_organiser() {
        let mut model = model_with_selected_event();
        login(&mut model, 2);
        let err = model.execute(add_poll("Date poll")).unwrap_err();
        assert!(matches!(err, CommandError::NotEventOrganiser { .. }));
    }

    #[test]
    fn add_option_needs_selected_event_and_poll() {
        let mut model = model_with_people();
        assert_eq!(
            model.execute(add_option(1, "Monday")).unwrap_err(),
            CommandError::NoEventSelected
        );

        let mut model = model_with_selected_event();
        let err = model.execute(add_option(1, "Monday")).unwrap_err();
        assert_eq!(
            err,
            CommandError::InvalidIndex {
                kind: EntityKind::Poll,
                index: 1,
                len: 0,
            }
        );
    }

    #[test]
    fn duplicate_option_is_rejected() {
        let mut model = with_date_poll();
        let before = model.history().len();
        let err = model.execute(add_option(1, "12 August")).unwrap_err();
        assert!(matches!(
            err,
            CommandError::DuplicateEntity {
                kind: EntityKind::PollOption,
                ..
            }
        ));
        assert_eq!(model.history().len(), before);
    }

    #[test]
    fn votes_are_counted_once_per_option() {
        let mut model = with_date_poll();
        login(&mut model, 2);
        model.execute(vote(1, "12 August")).unwrap();
        let err = model.execute(vote(1, "12 August")).unwrap_err();
        assert!(matches!(
            err,
            CommandError::DuplicateEntity {
                kind: EntityKind::Vote,
                ..
            }
        ));

        let err = model.execute(vote(1, "14 August")).unwrap_err();
        assert!(matches!(
            err,
            CommandError::EntityNotFound {
                kind: EntityKind::PollOption,
                ..
            }
        ));
    }

    #[test]
    fn display_poll_is_read_only() {
        let mut model = with_date_poll();
        model.execute(vote(1, "13 August")).unwrap();
        let before = model.history().len();

        let result = model
            .execute(Command::DisplayPoll(DisplayPoll { poll: index(1) }))
            .unwrap();
        assert_eq!(result.status, CommandStatus::Completed);
        assert!(result.feedback.starts_with("Poll 1 displayed.\nDate poll\n"));
        assert!(result.feedback.contains("13 August: 1 vote(s) [Alice]"));
        assert_eq!(model.history().len(), before);
    }

    #[test]
    fn deleting_a_voter_removes_their_votes() {
        let mut model = with_date_poll();
        login(&mut model, 2);
        model.execute(vote(1, "12 August")).unwrap();
        model
            .execute(Command::DeletePerson(crate::command::DeletePerson {
                index: index(2),
            }))
            .unwrap();

        let event = model.store().events().first().unwrap();
        let poll = event.polls.first().unwrap();
        assert_eq!(poll.voters().count(), 0);
    }
}
