//! The [`Event`] entity.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::{Address, Name, Tag, TimeRange};
use crate::keys::{EventKey, PersonKey};
use crate::poll::Poll;

/// An event with an optional schedule, an organiser, participants and polls.
///
/// Identity is the name alone ([`EventKey`]). Organiser, participant and
/// voter entries are [`PersonKey`]s of people in the same snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event name (identity).
    pub name: Name,
    /// Venue.
    pub address: Address,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
    /// Confirmed date, once set by the organiser.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Confirmed start and end time, once set by the organiser.
    #[serde(default)]
    pub time: Option<TimeRange>,
    /// The person allowed to change the schedule and polls.
    #[serde(default)]
    pub organiser: Option<PersonKey>,
    /// People who joined the event, in joining order.
    #[serde(default)]
    pub participants: Vec<PersonKey>,
    /// Polls in creation order.
    #[serde(default)]
    pub polls: Vec<Poll>,
}

impl Event {
    /// Create an unscheduled event with no participants or polls.
    pub const fn new(
        name: Name,
        address: Address,
        tags: BTreeSet<Tag>,
        organiser: Option<PersonKey>,
    ) -> Self {
        Self {
            name,
            address,
            tags,
            date: None,
            time: None,
            organiser,
            participants: Vec::new(),
            polls: Vec::new(),
        }
    }

    /// The identity key of this event.
    pub fn key(&self) -> EventKey {
        EventKey(self.name.clone())
    }

    /// Whether `person` organises this event.
    pub fn is_organised_by(&self, person: &PersonKey) -> bool {
        self.organiser.as_ref().is_some_and(|o| o.same_person(person))
    }

    /// Whether `person` has joined this event.
    pub fn has_participant(&self, person: &PersonKey) -> bool {
        self.participants.iter().any(|p| p.same_person(person))
    }

    /// Every person key referenced by this event: organiser, participants
    /// and poll voters.
    pub fn referenced_people(&self) -> impl Iterator<Item = &PersonKey> {
        self.organiser
            .iter()
            .chain(self.participants.iter())
            .chain(self.polls.iter().flat_map(Poll::voters))
    }

    /// Drop every reference to `person`. An organiser reference is cleared.
    pub fn forget_person(&mut self, person: &PersonKey) {
        if self.is_organised_by(person) {
            self.organiser = None;
        }
        self.participants.retain(|p| !p.same_person(person));
        for poll in &mut self.polls {
            poll.remove_voter(person);
        }
    }

    /// Rewrite every reference to `old` as `new`.
    pub fn rekey_person(&mut self, old: &PersonKey, new: &PersonKey) {
        if let Some(organiser) = self.organiser.as_mut() {
            if organiser.same_person(old) {
                organiser.clone_from(new);
            }
        }
        for participant in &mut self.participants {
            if participant.same_person(old) {
                participant.clone_from(new);
            }
        }
        for poll in &mut self.polls {
            poll.rekey_voter(old, new);
        }
    }

    /// The date formatted as `dd-mm-yyyy`, or an empty string when unset.
    pub fn date_string(&self) -> String {
        self.date
            .map(|d| d.format("%d-%m-%Y").to_string())
            .unwrap_or_default()
    }
}

impl core::fmt::Display for Event {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} Address: {}", self.name, self.address)?;
        if self.date.is_some() {
            write!(f, " Date: {}", self.date_string())?;
        }
        if let Some(time) = self.time {
            write!(f, " Time: {time}")?;
        }
        f.write_str(" Tags: ")?;
        for tag in &self.tags {
            write!(f, "[{tag}]")?;
        }
        Ok(())
    }
}
