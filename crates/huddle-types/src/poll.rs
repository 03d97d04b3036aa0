//! Polls attached to events: named questions with voteable options.

use serde::{Deserialize, Serialize};

use crate::fields::Label;
use crate::keys::PersonKey;

/// Errors raised by poll mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollError {
    /// The poll already offers an option with this label.
    #[error("option {option:?} already exists in poll {poll:?}")]
    DuplicateOption {
        /// The poll name.
        poll: String,
        /// The duplicated option.
        option: String,
    },

    /// No option with this label exists.
    #[error("option {option:?} does not exist in poll {poll:?}")]
    NoSuchOption {
        /// The poll name.
        poll: String,
        /// The missing option.
        option: String,
    },

    /// The voter already voted for this option.
    #[error("{voter} has already voted for {option:?}")]
    AlreadyVoted {
        /// The voter's display name.
        voter: String,
        /// The option voted for.
        option: String,
    },
}

/// One choice within a poll, with the people who voted for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    /// The option text.
    pub name: Label,
    /// Keys of people who voted for this option, in voting order.
    #[serde(default)]
    pub voters: Vec<PersonKey>,
}

/// A poll attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    /// The poll question or title.
    pub name: Label,
    /// Options in the order they were added.
    #[serde(default)]
    pub options: Vec<PollOption>,
}

impl Poll {
    /// Create a poll with no options.
    pub const fn new(name: Label) -> Self {
        Self {
            name,
            options: Vec::new(),
        }
    }

    /// Look up an option by label.
    pub fn option(&self, name: &Label) -> Option<&PollOption> {
        self.options.iter().find(|o| &o.name == name)
    }

    /// Add a new option.
    ///
    /// # Errors
    ///
    /// Returns [`PollError::DuplicateOption`] if the label is already present.
    pub fn add_option(&mut self, name: Label) -> Result<(), PollError> {
        if self.option(&name).is_some() {
            return Err(PollError::DuplicateOption {
                poll: self.name.to_string(),
                option: name.to_string(),
            });
        }
        self.options.push(PollOption {
            name,
            voters: Vec::new(),
        });
        Ok(())
    }

    /// Record `voter`'s vote for the option labelled `option`.
    ///
    /// A person may vote for several options of the same poll, but only
    /// once per option.
    ///
    /// # Errors
    ///
    /// Returns [`PollError::NoSuchOption`] if the option does not exist, or
    /// [`PollError::AlreadyVoted`] if `voter` already voted for it.
    pub fn vote(&mut self, option: &Label, voter: PersonKey) -> Result<(), PollError> {
        let poll_name = self.name.to_string();
        let entry = self
            .options
            .iter_mut()
            .find(|o| &o.name == option)
            .ok_or_else(|| PollError::NoSuchOption {
                poll: poll_name,
                option: option.to_string(),
            })?;

        if entry.voters.iter().any(|v| v.same_person(&voter)) {
            return Err(PollError::AlreadyVoted {
                voter: voter.name.to_string(),
                option: option.to_string(),
            });
        }
        entry.voters.push(voter);
        Ok(())
    }

    /// Drop every vote cast by `voter`.
    pub fn remove_voter(&mut self, voter: &PersonKey) {
        for option in &mut self.options {
            option.voters.retain(|v| !v.same_person(voter));
        }
    }

    /// Replace votes cast under `old` with `new`.
    pub fn rekey_voter(&mut self, old: &PersonKey, new: &PersonKey) {
        for option in &mut self.options {
            for voter in &mut option.voters {
                if voter.same_person(old) {
                    voter.clone_from(new);
                }
            }
        }
    }

    /// Every voter key across all options.
    pub fn voters(&self) -> impl Iterator<Item = &PersonKey> {
        self.options.iter().flat_map(|o| o.voters.iter())
    }

    /// Render the poll as text: one line per option with its vote count
    /// and voter names.
    pub fn display(&self) -> String {
        let mut out = format!("{}\n", self.name);
        for option in &self.options {
            let names: Vec<String> = option.voters.iter().map(|v| v.name.to_string()).collect();
            out.push_str(&format!(
                "{}: {} vote(s) [{}]\n",
                option.name,
                option.voters.len(),
                names.join(", ")
            ));
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fields::{Email, Name, Phone};

    fn label(s: &str) -> Label {
        Label::parse(s).unwrap()
    }

    fn voter(name: &str) -> PersonKey {
        PersonKey::new(
            Name::parse(name).unwrap(),
            Phone::parse("12345").unwrap(),
            Email::parse("someone@example.com").unwrap(),
        )
    }

    #[test]
    fn options_are_unique() {
        let mut poll = Poll::new(label("Date poll"));
        assert!(poll.add_option(label("12 August")).is_ok());
        assert!(matches!(
            poll.add_option(label("12 August")),
            Err(PollError::DuplicateOption { .. })
        ));
        assert_eq!(poll.options.len(), 1);
    }

    #[test]
    fn vote_requires_existing_option() {
        let mut poll = Poll::new(label("Date poll"));
        let result = poll.vote(&label("13 August"), voter("Alice"));
        assert!(matches!(result, Err(PollError::NoSuchOption { .. })));
    }

    #[test]
    fn double_vote_is_rejected() {
        let mut poll = Poll::new(label("Date poll"));
        poll.add_option(label("12 August")).unwrap();
        assert!(poll.vote(&label("12 August"), voter("Alice")).is_ok());
        assert!(matches!(
            poll.vote(&label("12 August"), voter("Alice")),
            Err(PollError::AlreadyVoted { .. })
        ));
        assert_eq!(poll.voters().count(), 1);
    }

    #[test]
    fn removing_a_voter_clears_all_their_votes() {
        let mut poll = Poll::new(label("Date poll"));
        poll.add_option(label("12 August")).unwrap();
        poll.add_option(label("13 August")).unwrap();
        poll.vote(&label("12 August"), voter("Alice")).unwrap();
        poll.vote(&label("13 August"), voter("Alice")).unwrap();
        poll.vote(&label("13 August"), voter("Bob")).unwrap();

        poll.remove_voter(&voter("Alice"));
        assert_eq!(poll.voters().count(), 1);
    }

    #[test]
    fn display_lists_counts() {
        let mut poll = Poll::new(label("Date poll"));
        poll.add_option(label("12 August")).unwrap();
        poll.vote(&label("12 August"), voter("Alice")).unwrap();
        let text = poll.display();
        assert!(text.starts_with("Date poll\n"));
        assert!(text.contains("12 August: 1 vote(s) [Alice]"));
    }
}
