//! The entity store: every person and event in one snapshot.
//!
//! The [`EntityStore`] owns people and events together with their
//! relationships. It enforces two invariants on every mutation:
//!
//! 1. No two people are the same person, and no two events share a name.
//! 2. Every friend, organiser, participant and voter reference resolves to
//!    a person in this store.
//!
//! Mutations validate first and only then touch the store, so a failed call
//! leaves it unchanged. Cascades (removing a deleted person from friend
//! lists, rewriting references after an edit) happen inside the same call.

use tracing::debug;

use huddle_types::{Event, EventKey, Person, PersonKey};

use crate::StoreError;

/// People and events with identity-aware duplicate detection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityStore {
    /// People in insertion order.
    people: Vec<Person>,
    /// Events in insertion order.
    events: Vec<Event>,
}

impl EntityStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            people: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Build a store from loaded records, applying the same duplicate and
    /// reference checks as live mutations.
    ///
    /// References may point forward (a friend listed later in `people`), so
    /// they are verified once everything is inserted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicatePerson`] or [`StoreError::DuplicateEvent`]
    /// on an identity collision, or [`StoreError::DanglingReference`] if a
    /// relationship names a missing person.
    pub fn from_parts(people: Vec<Person>, events: Vec<Event>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for person in people {
            store.insert_person(person)?;
        }
        for event in events {
            store.insert_event(event)?;
        }
        store.verify_references()?;
        Ok(store)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// All people, in insertion order.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// All events, in insertion order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Whether the store holds neither people nor events.
    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.events.is_empty()
    }

    /// Whether a person matching `key` exists.
    pub fn has_person(&self, key: &PersonKey) -> bool {
        self.person_position(key).is_some()
    }

    /// The person matching `key`, if any.
    pub fn find_person(&self, key: &PersonKey) -> Option<&Person> {
        self.people.iter().find(|p| p.matches(key))
    }

    /// Whether an event named by `key` exists.
    pub fn has_event(&self, key: &EventKey) -> bool {
        self.event_position(key).is_some()
    }

    /// The event named by `key`, if any.
    pub fn find_event(&self, key: &EventKey) -> Option<&Event> {
        self.events.iter().find(|e| e.name == key.0)
    }

    fn person_position(&self, key: &PersonKey) -> Option<usize> {
        self.people.iter().position(|p| p.matches(key))
    }

    fn event_position(&self, key: &EventKey) -> Option<usize> {
        self.events.iter().position(|e| e.name == key.0)
    }

    /// Whether a person other than the one at `skip` matches `key`.
    fn other_person_matches(&self, skip: Option<usize>, key: &PersonKey) -> bool {
        self.people
            .iter()
            .enumerate()
            .any(|(i, p)| Some(i) != skip && p.matches(key))
    }

    // -----------------------------------------------------------------------
    // People
    // -----------------------------------------------------------------------

    /// Add a new person.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicatePerson`] if someone with the same
    /// identity exists, or [`StoreError::DanglingReference`] if a friend
    /// entry names a missing person.
    pub fn add_person(&mut self, person: Person) -> Result<(), StoreError> {
        self.check_friends(None, &person)?;
        self.insert_person(person)
    }

    fn insert_person(&mut self, person: Person) -> Result<(), StoreError> {
        let key = person.key();
        if self.has_person(&key) {
            return Err(StoreError::DuplicatePerson(key));
        }
        debug!(person = %key, "person added");
        self.people.push(person);
        Ok(())
    }

    /// Remove the person matching `key` and every reference to them.
    ///
    /// Friend lists lose the entry, events drop them as participant and
    /// voter, and events they organised lose their organiser. Returns the
    /// removed person.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PersonNotFound`] if nobody matches `key`.
    pub fn delete_person(&mut self, key: &PersonKey) -> Result<Person, StoreError> {
        let position = self
            .person_position(key)
            .ok_or_else(|| StoreError::PersonNotFound(key.clone()))?;
        let removed = self.people.remove(position);
        let removed_key = removed.key();

        let mut friend_lists_updated: usize = 0;
        for person in &mut self.people {
            if person.remove_friend(&removed_key) {
                friend_lists_updated = friend_lists_updated.saturating_add(1);
            }
        }
        for event in &mut self.events {
            event.forget_person(&removed_key);
        }

        debug!(person = %removed_key, friend_lists_updated, "person deleted");
        Ok(removed)
    }

    /// Replace the person matching `target` with `replacement`.
    ///
    /// If the identity key changes, every reference to the old key is
    /// rewritten in the same call.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PersonNotFound`] if `target` is absent,
    /// [`StoreError::DuplicatePerson`] if `replacement` collides with a
    /// different person, or [`StoreError::DanglingReference`] if a friend of
    /// `replacement` is missing.
    pub fn update_person(
        &mut self,
        target: &PersonKey,
        replacement: Person,
    ) -> Result<(), StoreError> {
        let position = self
            .person_position(target)
            .ok_or_else(|| StoreError::PersonNotFound(target.clone()))?;
        self.check_friends(Some(position), &replacement)?;
        self.replace_person(target, replacement)
    }

    /// Replace two people in one step: both replacements apply or neither
    /// does.
    ///
    /// Used when an edit to one person has to patch a back-reference held by
    /// another, such as making two people friends of each other.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OverlappingTargets`] if both targets are the same
    /// person, and otherwise the errors of [`update_person`] for either side.
    ///
    /// [`update_person`]: EntityStore::update_person
    pub fn update_person_pair(
        &mut self,
        first_target: &PersonKey,
        first_replacement: Person,
        second_target: &PersonKey,
        second_replacement: Person,
    ) -> Result<(), StoreError> {
        if first_target.same_person(second_target) {
            return Err(StoreError::OverlappingTargets(first_target.clone()));
        }

        let mut next = self.clone();
        next.replace_person(first_target, first_replacement)?;
        next.replace_person(second_target, second_replacement)?;
        next.verify_references()?;
        *self = next;
        Ok(())
    }

    /// Swap in `replacement` and rewrite references if the key changed.
    ///
    /// Checks existence and duplicates but not the replacement's friends.
    fn replace_person(&mut self, target: &PersonKey, replacement: Person) -> Result<(), StoreError> {
        let position = self
            .person_position(target)
            .ok_or_else(|| StoreError::PersonNotFound(target.clone()))?;
        let new_key = replacement.key();
        if self.other_person_matches(Some(position), &new_key) {
            return Err(StoreError::DuplicatePerson(new_key));
        }

        let Some(slot) = self.people.get_mut(position) else {
            return Err(StoreError::PersonNotFound(target.clone()));
        };
        let old_key = slot.key();
        *slot = replacement;

        if old_key != new_key {
            self.rekey_person(&old_key, &new_key);
        }
        debug!(person = %new_key, "person updated");
        Ok(())
    }

    fn rekey_person(&mut self, old: &PersonKey, new: &PersonKey) {
        for person in &mut self.people {
            person.rekey_friend(old, new);
        }
        for event in &mut self.events {
            event.rekey_person(old, new);
        }
    }

    /// Every friend of `person` must be someone else in the store. `skip`
    /// is the slot `person` will occupy, which cannot be its own friend.
    fn check_friends(&self, skip: Option<usize>, person: &Person) -> Result<(), StoreError> {
        let own_key = person.key();
        for friend in &person.friends {
            if friend.same_person(&own_key) || !self.other_person_matches(skip, friend) {
                return Err(StoreError::DanglingReference {
                    owner: person.name.to_string(),
                    missing: friend.clone(),
                });
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Add a new event.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateEvent`] if an event with the same name
    /// exists, or [`StoreError::DanglingReference`] if the organiser, a
    /// participant or a voter is missing.
    pub fn add_event(&mut self, event: Event) -> Result<(), StoreError> {
        self.check_event_references(&event)?;
        self.insert_event(event)
    }

    fn insert_event(&mut self, event: Event) -> Result<(), StoreError> {
        let key = event.key();
        if self.has_event(&key) {
            return Err(StoreError::DuplicateEvent(key));
        }
        debug!(event = %key, "event added");
        self.events.push(event);
        Ok(())
    }

    /// Remove the event named by `key` and return it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EventNotFound`] if no event has that name.
    pub fn delete_event(&mut self, key: &EventKey) -> Result<Event, StoreError> {
        let position = self
            .event_position(key)
            .ok_or_else(|| StoreError::EventNotFound(key.clone()))?;
        debug!(event = %key, "event deleted");
        Ok(self.events.remove(position))
    }

    /// Replace the event named by `target` with `replacement`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EventNotFound`] if `target` is absent,
    /// [`StoreError::DuplicateEvent`] if `replacement` is renamed onto another
    /// event, or [`StoreError::DanglingReference`] for a missing person.
    pub fn update_event(&mut self, target: &EventKey, replacement: Event) -> Result<(), StoreError> {
        let position = self
            .event_position(target)
            .ok_or_else(|| StoreError::EventNotFound(target.clone()))?;
        let new_key = replacement.key();
        let collides = self
            .events
            .iter()
            .enumerate()
            .any(|(i, e)| i != position && e.name == new_key.0);
        if collides {
            return Err(StoreError::DuplicateEvent(new_key));
        }
        self.check_event_references(&replacement)?;

        let Some(slot) = self.events.get_mut(position) else {
            return Err(StoreError::EventNotFound(target.clone()));
        };
        *slot = replacement;
        debug!(event = %new_key, "event updated");
        Ok(())
    }

    fn check_event_references(&self, event: &Event) -> Result<(), StoreError> {
        match event.referenced_people().find(|k| !self.has_person(k)) {
            Some(missing) => Err(StoreError::DanglingReference {
                owner: event.name.to_string(),
                missing: missing.clone(),
            }),
            None => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // Invariants
    // -----------------------------------------------------------------------

    /// Check that every relationship reference resolves within this store.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError::DanglingReference`] found.
    pub fn verify_references(&self) -> Result<(), StoreError> {
        for (position, person) in self.people.iter().enumerate() {
            self.check_friends(Some(position), person)?;
        }
        for event in &self.events {
            self.check_event_references(event)?;
        }
        Ok(())
    }
}
