//! Event commands: creating, editing, selecting, joining and scheduling.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use huddle_types::{Address, Event, Index, Name, Tag, TimeRange};

use super::{commit_event, organised_event};
use crate::error::{CommandError, EntityKind};
use crate::model::{CommandResult, Model};
use crate::view::EventFilter;

/// Add an event organised by the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddEvent {
    /// Event name.
    pub name: Name,
    /// Venue.
    pub address: Address,
    /// Tags.
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
}

impl AddEvent {
    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        let organiser = model.selection().resolve_user(model.store())?.key();
        let event = Event::new(self.name, self.address, self.tags, Some(organiser));
        let feedback = format!("New event added: {event}");

        let mut working = model.store().clone();
        working.add_event(event)?;
        model.commit(working, "addEvent");
        Ok(CommandResult::committed(feedback))
    }
}

/// Delete the event at `index` in the event list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEvent {
    /// One-based position in the displayed event list.
    pub index: Index,
}

impl DeleteEvent {
    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        let target = model.view().event_at(model.store(), self.index)?.key();

        let mut working = model.store().clone();
        let removed = working.delete_event(&target)?;
        model.commit(working, "deleteEvent");
        Ok(CommandResult::committed(format!("Deleted Event: {removed}")))
    }
}

/// Edit the event at `index` in the event list. Only its organiser may.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditEvent {
    /// One-based position in the displayed event list.
    pub index: Index,
    /// New name.
    #[serde(default)]
    pub name: Option<Name>,
    /// New venue.
    #[serde(default)]
    pub address: Option<Address>,
    /// Replacement tags.
    #[serde(default)]
    pub tags: Option<BTreeSet<Tag>>,
}

impl EditEvent {
    /// An edit of the event at `index` that changes nothing yet.
    pub const fn new(index: Index) -> Self {
        Self {
            index,
            name: None,
            address: None,
            tags: None,
        }
    }

    /// Whether no field would change.
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none() && self.tags.is_none()
    }

    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        if self.is_empty() {
            return Err(CommandError::NothingToEdit);
        }
        let store = model.store();
        let user = model.selection().resolve_user(store)?;
        let target = model.view().event_at(store, self.index)?;
        if !target.is_organised_by(&user.key()) {
            return Err(CommandError::NotEventOrganiser {
                event: target.name.to_string(),
            });
        }

        let old_key = target.key();
        let mut edited = target.clone();
        if let Some(name) = self.name {
            edited.name = name;
        }
        if let Some(address) = self.address {
            edited.address = address;
        }
        if let Some(tags) = self.tags {
            edited.tags = tags;
        }
        let new_key = edited.key();
        let feedback = format!("Edited Event: {edited}");

        let mut working = store.clone();
        working.update_event(&old_key, edited)?;
        model.commit_following(working, "editEvent", |selection| {
            selection.follow_event(&old_key, &new_key)
        });
        Ok(CommandResult::committed(feedback))
    }
}

/// Select the event at `index` in the event list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectEvent {
    /// One-based position in the displayed event list.
    pub index: Index,
}

impl SelectEvent {
    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        let event = model.view().event_at(model.store(), self.index)?.key();
        let feedback = format!("Selected Event: {}", self.index);

        model.selection_mut().select_event(event);
        model.selection_changed();
        Ok(CommandResult::completed(feedback))
    }
}

/// Add the logged-in user to the participants of the event at `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinEvent {
    /// One-based position in the displayed event list.
    pub index: Index,
}

impl JoinEvent {
    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        let store = model.store();
        let user = model.selection().resolve_user(store)?.key();
        let event = model.view().event_at(store, self.index)?;
        if event.has_participant(&user) {
            return Err(CommandError::DuplicateEntity {
                kind: EntityKind::Participant,
                key: user.to_string(),
            });
        }

        let target = event.key();
        let mut joined = event.clone();
        let feedback = format!("{} has joined {}", user.name, joined.name);
        joined.participants.push(user);

        commit_event(model, &target, joined, "joinEvent")?;
        Ok(CommandResult::committed(feedback))
    }
}

/// Set the date of the selected event. Only its organiser may.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDate {
    /// The date, written `dd-mm-yyyy`.
    #[serde(with = "day_month_year")]
    pub date: NaiveDate,
}

impl SetDate {
    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        let event = organised_event(model)?;
        let target = event.key();
        let mut scheduled = event.clone();
        scheduled.date = Some(self.date);
        let feedback = format!(
            "Date {} set for {}",
            scheduled.date_string(),
            scheduled.name
        );

        commit_event(model, &target, scheduled, "setDate")?;
        Ok(CommandResult::committed(feedback))
    }
}

/// Set the start and end time of the selected event. Only its organiser
/// may.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTime {
    /// Start time, written `HH:MM`.
    #[serde(with = "hour_minute")]
    pub start: NaiveTime,
    /// End time, written `HH:MM`; must not precede `start`.
    #[serde(with = "hour_minute")]
    pub end: NaiveTime,
}

impl SetTime {
    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        let event = organised_event(model)?;
        let time = TimeRange::new(self.start, self.end)?;
        let target = event.key();
        let mut scheduled = event.clone();
        scheduled.time = Some(time);
        let feedback = format!("Time {time} set for {}", scheduled.name);

        commit_event(model, &target, scheduled, "setTime")?;
        Ok(CommandResult::committed(feedback))
    }
}

/// Show events whose name contains any of the keywords as a whole word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindEvent {
    /// Keywords, matched case-insensitively.
    pub keywords: Vec<String>,
}

impl FindEvent {
    pub(crate) fn execute(self, model: &mut Model) -> CommandResult {
        model.set_event_filter(EventFilter::NameKeywords(self.keywords));
        let shown = model.filtered_events().len();
        CommandResult::completed(format!("{shown} events listed!"))
    }
}

pub(crate) fn list_events(model: &mut Model) -> CommandResult {
    model.set_event_filter(EventFilter::All);
    CommandResult::completed("Listed all events")
}

/// Serde adapter for dates written `dd-mm-yyyy`.
mod day_month_year {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%d-%m-%Y";

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for times written `HH:MM`.
mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
