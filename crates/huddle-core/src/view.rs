//! Filtered views over the current snapshot.
//!
//! A view is a pure function of the snapshot and the active filter. Nothing
//! is cached: every read recomputes the list, so a view can never show an
//! entity that is not in the current snapshot.

use huddle_store::EntityStore;
use huddle_types::{Event, Index, Person, Phone};

use crate::error::{CommandError, EntityKind};

/// Which people the person list shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PersonFilter {
    /// Everyone.
    #[default]
    All,
    /// People whose name contains any of these words.
    NameKeywords(Vec<String>),
    /// People with exactly this phone number.
    Phone(Phone),
}

impl PersonFilter {
    /// Whether `person` passes this filter.
    pub fn matches(&self, person: &Person) -> bool {
        match self {
            Self::All => true,
            Self::NameKeywords(words) => any_word_in(person.name.as_str(), words),
            Self::Phone(phone) => &person.phone == phone,
        }
    }
}

/// Which events the event list shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EventFilter {
    /// Every event.
    #[default]
    All,
    /// Events whose name contains any of these words.
    NameKeywords(Vec<String>),
}

impl EventFilter {
    /// Whether `event` passes this filter.
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Self::All => true,
            Self::NameKeywords(words) => any_word_in(event.name.as_str(), words),
        }
    }
}

/// Whole-word, case-insensitive match of any keyword against `sentence`.
fn any_word_in(sentence: &str, keywords: &[String]) -> bool {
    sentence.split_whitespace().any(|word| {
        let word = word.to_lowercase();
        keywords.iter().any(|k| k.to_lowercase() == word)
    })
}

/// The active person and event filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    people: PersonFilter,
    events: EventFilter,
}

impl ViewFilter {
    /// Show everything.
    pub const fn new() -> Self {
        Self {
            people: PersonFilter::All,
            events: EventFilter::All,
        }
    }

    /// People in `store` that pass the person filter, in store order.
    pub fn people<'s>(&self, store: &'s EntityStore) -> Vec<&'s Person> {
        store
            .people()
            .iter()
            .filter(|p| self.people.matches(p))
            .collect()
    }

    /// Events in `store` that pass the event filter, in store order.
    pub fn events<'s>(&self, store: &'s EntityStore) -> Vec<&'s Event> {
        store
            .events()
            .iter()
            .filter(|e| self.events.matches(e))
            .collect()
    }

    /// The person at `index` in the filtered person list.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidIndex`] when `index` is past the end.
    pub fn person_at<'s>(
        &self,
        store: &'s EntityStore,
        index: Index,
    ) -> Result<&'s Person, CommandError> {
        let shown = self.people(store);
        shown
            .get(index.zero_based())
            .copied()
            .ok_or(CommandError::InvalidIndex {
                kind: EntityKind::Person,
                index: index.one_based(),
                len: shown.len(),
            })
    }

    /// The event at `index` in the filtered event list.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidIndex`] when `index` is past the end.
    pub fn event_at<'s>(
        &self,
        store: &'s EntityStore,
        index: Index,
    ) -> Result<&'s Event, CommandError> {
        let shown = self.events(store);
        shown
            .get(index.zero_based())
            .copied()
            .ok_or(CommandError::InvalidIndex {
                kind: EntityKind::Event,
                index: index.one_based(),
                len: shown.len(),
            })
    }

    pub(crate) fn set_person_filter(&mut self, filter: PersonFilter) {
        self.people = filter;
    }

    pub(crate) fn set_event_filter(&mut self, filter: EventFilter) {
        self.events = filter;
    }
}
